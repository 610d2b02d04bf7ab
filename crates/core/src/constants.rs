use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Percentages are expressed on a 0-100 scale.
pub const PERCENT_SCALE: Decimal = dec!(100);

/// Default rebalance threshold, in percentage points.
pub const DEFAULT_REBALANCE_THRESHOLD: Decimal = dec!(5);

/// Absolute deviation above which an asset-class alert is HIGH priority.
pub const DEFAULT_HIGH_PRIORITY_DEVIATION: Decimal = dec!(10);

/// Asset class used for funds without a grouping.
pub const UNKNOWN_ASSET_CLASS: &str = "UNKNOWN";

/// Tolerance used when checking whether targets add up to 100%.
pub const TARGET_SUM_TOLERANCE: Decimal = dec!(0.01);

/// Largest accepted holding value or cash amount.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Largest accepted portfolio total. Products of a total with a cash amount
/// stay far inside `Decimal`'s range below this bound.
pub const MAX_PORTFOLIO_VALUE: Decimal = dec!(1000000000000000);
