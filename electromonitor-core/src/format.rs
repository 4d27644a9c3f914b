//! Display helpers shared by notifications, reminders and the console views.

use time::{format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime};

/// `en-IN` style, 12-hour clock: `19/10/2026, 2:35:07 pm`.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[day]/[month]/[year], [hour repr:12 padding:none]:[minute]:[second] [period case:lower]"
);

pub fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).unwrap_or_else(|_| ts.to_string())
}

/// Rupee amount without rounding; whole amounts print without a fraction.
pub fn format_amount(amount: f64) -> String {
    format!("₹{amount}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn timestamp_uses_day_first_twelve_hour_clock() {
        assert_eq!(
            format_timestamp(datetime!(2026-10-19 14:35:07 UTC)),
            "19/10/2026, 2:35:07 pm"
        );
        assert_eq!(
            format_timestamp(datetime!(2026-01-05 09:05:00 +05:30)),
            "05/01/2026, 9:05:00 am"
        );
    }

    #[test]
    fn amounts_keep_fractions_and_drop_trailing_zero() {
        assert_eq!(format_amount(1015.0), "₹1015");
        assert_eq!(format_amount(302.5), "₹302.5");
    }
}
