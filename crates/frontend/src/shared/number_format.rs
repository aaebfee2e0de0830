//! Money formatting for totals and price cells

/// Formats a value as "R$ 1234.50" (two decimals, no grouping)
pub fn format_money(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("R$ {:.2}", value)
}
