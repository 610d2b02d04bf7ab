//! Engine settings.

mod settings_model;

pub use settings_model::RebalanceSettings;
