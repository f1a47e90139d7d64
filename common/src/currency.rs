/// Format a dollar amount for display, e.g. `$23.00`.
pub fn format_amount(amount: f64) -> String {
    format!("${amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "$0.00");
        assert_eq!(format_amount(23.0), "$23.00");
        assert_eq!(format_amount(2.3 * 3.0), "$6.90");
    }
}
