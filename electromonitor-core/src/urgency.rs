//! Late-payment classification.
//!
//! Urgency is never stored: it is recomputed from the record and the current
//! time every time it is asked for.

use time::{Duration, OffsetDateTime};

use crate::{
    domain::{Customer, UsageRecord},
    format::{format_amount, format_timestamp},
};

/// Days after the last update before an unpaid bill is overdue.
pub const LATE_PAYMENT_PERIOD_DAYS: i64 = 2;

/// Width of the warning window before the due date.
pub const DUE_SOON_WINDOW_DAYS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatePaymentPolicy {
    pub period: Duration,
    pub due_soon_window: Duration,
}

impl Default for LatePaymentPolicy {
    fn default() -> Self {
        Self {
            period: Duration::days(LATE_PAYMENT_PERIOD_DAYS),
            due_soon_window: Duration::days(DUE_SOON_WINDOW_DAYS),
        }
    }
}

impl LatePaymentPolicy {
    /// Clamped to the last representable date for very long periods.
    pub fn due_date(&self, record: &UsageRecord) -> OffsetDateTime {
        record.updated_at.saturating_add(self.period)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentUrgency {
    Paid,
    OnTime { due: OffsetDateTime },
    DueSoon { due: OffsetDateTime, remaining: Duration },
    Overdue { due: OffsetDateTime, days: i64 },
}

impl PaymentUrgency {
    pub fn is_overdue(&self) -> bool {
        matches!(self, Self::Overdue { .. })
    }
}

pub fn classify(record: &UsageRecord, now: OffsetDateTime, policy: &LatePaymentPolicy) -> PaymentUrgency {
    if record.is_paid() {
        return PaymentUrgency::Paid;
    }

    let due = policy.due_date(record);
    if now > due {
        let days = (now - due).whole_days().max(0);
        return PaymentUrgency::Overdue { due, days };
    }

    let remaining = due - now;
    if now < due && remaining < policy.due_soon_window {
        PaymentUrgency::DueSoon { due, remaining }
    } else {
        PaymentUrgency::OnTime { due }
    }
}

/// Reminder text for the late-payment card, if the urgency warrants one.
pub fn reminder_message(
    customer: &Customer,
    record: &UsageRecord,
    urgency: &PaymentUrgency,
) -> Option<String> {
    match urgency {
        PaymentUrgency::Overdue { due, days } => Some(format!(
            "⚠️ {}, your payment of {} is overdue by {} day(s). It was due on {}. Please pay immediately to avoid disconnection.",
            customer.name,
            format_amount(record.payable),
            days,
            format_timestamp(*due),
        )),
        PaymentUrgency::DueSoon { due, .. } => Some(format!(
            "⏰ {}, your payment of {} is due by {}. Please pay before the due date to avoid late charges.",
            customer.name,
            format_amount(record.payable),
            format_timestamp(*due),
        )),
        PaymentUrgency::Paid | PaymentUrgency::OnTime { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PaymentStatus, PaymentType};
    use time::macros::datetime;

    fn record(updated_at: OffsetDateTime, status: PaymentStatus) -> UsageRecord {
        UsageRecord {
            customer_id: "c1".to_string(),
            usage: 243.0,
            payable: 1015.0,
            chip_id: "CHIP99".to_string(),
            updated_at,
            payment_status: status,
            payment_type: None,
            paid_at: None,
        }
    }

    #[test]
    fn equality_with_due_date_is_not_overdue() {
        let policy = LatePaymentPolicy::default();
        let now = datetime!(2026-10-19 12:00:00 UTC);
        let r = record(now - Duration::days(2), PaymentStatus::Unpaid);

        assert!(!classify(&r, now, &policy).is_overdue());
        assert_eq!(
            classify(&r, now + Duration::milliseconds(1), &policy),
            PaymentUrgency::Overdue { due: now, days: 0 }
        );
    }

    #[test]
    fn three_days_old_bill_is_one_day_overdue() {
        let policy = LatePaymentPolicy::default();
        let now = datetime!(2026-10-19 12:00:00 UTC);
        let r = record(now - Duration::days(3), PaymentStatus::Unpaid);

        assert_eq!(
            classify(&r, now, &policy),
            PaymentUrgency::Overdue { due: now - Duration::days(1), days: 1 }
        );
    }

    #[test]
    fn overdue_days_are_floored() {
        let policy = LatePaymentPolicy::default();
        let now = datetime!(2026-10-19 12:00:00 UTC);
        let r = record(now - Duration::days(4) - Duration::hours(23), PaymentStatus::Unpaid);

        assert!(matches!(classify(&r, now, &policy), PaymentUrgency::Overdue { days: 2, .. }));
    }

    #[test]
    fn inside_warning_window_is_due_soon() {
        let policy = LatePaymentPolicy::default();
        let now = datetime!(2026-10-19 12:00:00 UTC);
        let r = record(now - Duration::hours(1), PaymentStatus::Unpaid);

        assert_eq!(
            classify(&r, now, &policy),
            PaymentUrgency::DueSoon {
                due: now + Duration::hours(47),
                remaining: Duration::hours(47),
            }
        );
    }

    #[test]
    fn outside_warning_window_is_on_time() {
        let policy = LatePaymentPolicy {
            period: Duration::days(10),
            due_soon_window: Duration::days(2),
        };
        let now = datetime!(2026-10-19 12:00:00 UTC);
        let r = record(now - Duration::days(1), PaymentStatus::Unpaid);

        assert_eq!(
            classify(&r, now, &policy),
            PaymentUrgency::OnTime { due: now + Duration::days(9) }
        );
    }

    #[test]
    fn huge_period_does_not_overflow() {
        let policy = LatePaymentPolicy {
            period: Duration::days(10_000_000),
            due_soon_window: Duration::days(2),
        };
        let now = datetime!(2026-10-19 12:00:00 UTC);
        let r = record(now, PaymentStatus::Unpaid);

        assert!(matches!(classify(&r, now, &policy), PaymentUrgency::OnTime { .. }));
    }

    #[test]
    fn paid_records_are_paid_regardless_of_age() {
        let policy = LatePaymentPolicy::default();
        let now = datetime!(2026-10-19 12:00:00 UTC);
        let mut r = record(now - Duration::days(30), PaymentStatus::Paid);
        r.payment_type = Some(PaymentType::Offline);

        assert_eq!(classify(&r, now, &policy), PaymentUrgency::Paid);
        assert_eq!(classify(&r, now - Duration::days(60), &policy), PaymentUrgency::Paid);
    }

    #[test]
    fn reminder_text_marks_overdue_and_due_soon() {
        let policy = LatePaymentPolicy::default();
        let customer = Customer::new("c1", "Arun Kumar");
        let now = datetime!(2026-10-19 12:00:00 UTC);

        let overdue = record(now - Duration::days(3), PaymentStatus::Unpaid);
        let msg = reminder_message(&customer, &overdue, &classify(&overdue, now, &policy)).unwrap();
        assert!(msg.starts_with("⚠️ Arun Kumar"));
        assert!(msg.contains("₹1015"));
        assert!(msg.contains("overdue by 1 day(s)"));

        let fresh = record(now - Duration::hours(1), PaymentStatus::Unpaid);
        let msg = reminder_message(&customer, &fresh, &classify(&fresh, now, &policy)).unwrap();
        assert!(msg.starts_with("⏰ Arun Kumar"));
        assert!(msg.contains("due by 21/10/2026, 11:00:00 am"));

        let paid = record(now - Duration::days(3), PaymentStatus::Paid);
        assert!(reminder_message(&customer, &paid, &classify(&paid, now, &policy)).is_none());
    }
}
