use rust_decimal::Decimal;
use rusty_money::{Money, iso};

/// Formats a payment amount for display (calendar tooltips, import reports).
/// Amounts are tracked currency-less in the data model; EUR is the display
/// currency of the product.
pub fn format_amount(amount: Decimal) -> String {
    Money::from_decimal(amount, iso::EUR).to_string()
}
