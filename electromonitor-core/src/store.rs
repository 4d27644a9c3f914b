//! In-memory usage record store.
//!
//! Holds at most one record per customer. New usage is merged into an unpaid
//! record and replaces a paid one.

use std::collections::HashMap;

use time::OffsetDateTime;

use crate::{
    domain::{Customer, PaymentStatus, PaymentType, UsageRecord},
    format::format_amount,
    tariff::Tariff,
    urgency::{classify, reminder_message, LatePaymentPolicy},
};

/// Result of [`UsageStore::record_usage`].
#[derive(Debug, Clone, PartialEq)]
pub struct UsageOutcome {
    pub record: UsageRecord,
    /// Payable for this entry alone.
    pub entry_payable: f64,
    /// Whether the entry was merged into an existing unpaid record.
    pub merged: bool,
    pub notification: String,
}

#[derive(Debug, Default)]
pub struct UsageStore {
    tariff: Tariff,
    records: HashMap<String, UsageRecord>,
    reminders: HashMap<String, String>,
}

impl UsageStore {
    pub fn new(tariff: Tariff) -> Self {
        Self {
            tariff,
            records: HashMap::new(),
            reminders: HashMap::new(),
        }
    }

    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    pub fn get(&self, customer_id: &str) -> Option<&UsageRecord> {
        self.records.get(customer_id)
    }

    /// All records, ordered by customer id.
    pub fn records(&self) -> Vec<&UsageRecord> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by(|a, b| a.customer_id.cmp(&b.customer_id));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bill a new reading for `customer`.
    ///
    /// Input is expected to be validated already: `usage` positive and
    /// `chip_id` non-empty. The merged payable is the sum of per-entry
    /// payables, so slabs already charged are not re-priced.
    pub fn record_usage(
        &mut self,
        customer: &Customer,
        usage: f64,
        chip_id: &str,
        now: OffsetDateTime,
    ) -> UsageOutcome {
        let entry_payable = self.tariff.payable(usage);

        let (record, merged) = match self.records.get(&customer.id) {
            Some(existing) if !existing.is_paid() => (
                UsageRecord {
                    customer_id: customer.id.clone(),
                    usage: existing.usage + usage,
                    payable: existing.payable + entry_payable,
                    chip_id: chip_id.to_string(),
                    updated_at: now,
                    payment_status: PaymentStatus::Unpaid,
                    payment_type: None,
                    paid_at: None,
                },
                true,
            ),
            _ => (
                UsageRecord {
                    customer_id: customer.id.clone(),
                    usage,
                    payable: entry_payable,
                    chip_id: chip_id.to_string(),
                    updated_at: now,
                    payment_status: PaymentStatus::Unpaid,
                    payment_type: None,
                    paid_at: None,
                },
                false,
            ),
        };

        let mut notification = format!(
            "Notification: {} - New usage data entered. Payable Amount is {}.",
            customer.name,
            format_amount(entry_payable)
        );
        if merged {
            notification.push_str(&format!(" Total Outstanding: {}.", format_amount(record.payable)));
        }

        self.records.insert(customer.id.clone(), record.clone());

        UsageOutcome {
            record,
            entry_payable,
            merged,
            notification,
        }
    }

    /// Settle the customer's bill.
    ///
    /// Returns the record if the customer has one. An already paid record is
    /// left untouched. Any pending reminder for the customer is cleared.
    pub fn mark_paid(
        &mut self,
        customer_id: &str,
        method: Option<PaymentType>,
        now: OffsetDateTime,
    ) -> Option<&UsageRecord> {
        self.reminders.remove(customer_id);

        let record = self.records.get_mut(customer_id)?;
        if !record.is_paid() {
            record.payment_status = PaymentStatus::Paid;
            record.payment_type = method;
            record.paid_at = Some(now);
        }
        Some(&*record)
    }

    /// Reclassify the customer's record and keep the reminder text in sync.
    pub fn refresh_reminder(
        &mut self,
        customer: &Customer,
        now: OffsetDateTime,
        policy: &LatePaymentPolicy,
    ) -> Option<String> {
        let message = self.records.get(&customer.id).and_then(|record| {
            let urgency = classify(record, now, policy);
            reminder_message(customer, record, &urgency)
        });

        match &message {
            Some(text) => {
                self.reminders.insert(customer.id.clone(), text.clone());
            }
            None => {
                self.reminders.remove(&customer.id);
            }
        }
        message
    }

    pub fn pending_reminder(&self, customer_id: &str) -> Option<&str> {
        self.reminders.get(customer_id).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tariff::calculate_payable;
    use time::{macros::datetime, Duration};

    fn arun() -> Customer {
        Customer::new("c1", "Arun Kumar")
    }

    #[test]
    fn first_entry_creates_unpaid_record() {
        let mut store = UsageStore::default();
        let now = datetime!(2026-10-19 10:00:00 UTC);

        let out = store.record_usage(&arun(), 243.0, "CHIP99", now);

        assert!(!out.merged);
        assert_eq!(out.record.usage, 243.0);
        assert_eq!(out.record.payable, 1015.0);
        assert_eq!(out.record.chip_id, "CHIP99");
        assert_eq!(out.record.payment_status, PaymentStatus::Unpaid);
        assert_eq!(
            out.notification,
            "Notification: Arun Kumar - New usage data entered. Payable Amount is ₹1015."
        );
        assert_eq!(store.get("c1"), Some(&out.record));
    }

    #[test]
    fn second_unpaid_entry_merges_per_entry_payables() {
        let mut store = UsageStore::default();
        let t0 = datetime!(2026-10-19 10:00:00 UTC);
        let t1 = t0 + Duration::minutes(5);

        store.record_usage(&arun(), 99.0, "F1", t0);
        let out = store.record_usage(&arun(), 175.0, "F2", t1);

        assert!(out.merged);
        assert_eq!(out.record.usage, 274.0);
        assert_eq!(out.record.payable, 972.0);
        assert_eq!(out.record.payable, calculate_payable(99.0) + calculate_payable(175.0));
        assert_ne!(out.record.payable, calculate_payable(274.0));
        assert_eq!(out.record.chip_id, "F2");
        assert_eq!(out.record.updated_at, t1);
        assert_eq!(
            out.notification,
            "Notification: Arun Kumar - New usage data entered. Payable Amount is ₹675. Total Outstanding: ₹972."
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn merged_payable_is_sum_of_entry_tariffs() {
        let now = datetime!(2026-10-19 10:00:00 UTC);
        let pairs = [(1.0, 1.0), (50.0, 60.0), (99.0, 175.0), (120.5, 300.0), (400.0, 20.0)];

        for (u1, u2) in pairs {
            let mut store = UsageStore::default();
            store.record_usage(&arun(), u1, "A1", now);
            let out = store.record_usage(&arun(), u2, "A2", now);

            assert_eq!(out.record.usage, u1 + u2);
            assert_eq!(out.record.payable, calculate_payable(u1) + calculate_payable(u2));
        }
    }

    #[test]
    fn entry_after_payment_replaces_paid_record() {
        let mut store = UsageStore::default();
        let t0 = datetime!(2026-10-19 10:00:00 UTC);

        store.record_usage(&arun(), 99.0, "F1", t0);
        store.mark_paid("c1", Some(PaymentType::Offline), t0);
        let out = store.record_usage(&arun(), 50.0, "F3", t0 + Duration::days(1));

        assert!(!out.merged);
        assert_eq!(out.record.usage, 50.0);
        assert_eq!(out.record.payable, 150.0);
        assert_eq!(out.record.payment_status, PaymentStatus::Unpaid);
        assert!(out.record.payment_type.is_none());
        assert!(out.record.paid_at.is_none());
    }

    #[test]
    fn mark_paid_is_idempotent() {
        let mut store = UsageStore::default();
        let t0 = datetime!(2026-10-19 10:00:00 UTC);
        store.record_usage(&arun(), 120.0, "CHIP1", t0);

        let first = store
            .mark_paid("c1", Some(PaymentType::Online("phonepe".to_string())), t0)
            .cloned()
            .unwrap();
        let second = store
            .mark_paid("c1", Some(PaymentType::Offline), t0 + Duration::hours(1))
            .cloned()
            .unwrap();

        assert_eq!(first.payment_status, PaymentStatus::Paid);
        assert_eq!(first, second);
        assert_eq!(second.payment_type, Some(PaymentType::Online("phonepe".to_string())));
        assert_eq!(second.paid_at, Some(t0));
    }

    #[test]
    fn mark_paid_without_record_is_a_no_op() {
        let mut store = UsageStore::default();
        let now = datetime!(2026-10-19 10:00:00 UTC);
        assert!(store.mark_paid("c2", None, now).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn reminders_follow_classification_and_clear_on_payment() {
        let mut store = UsageStore::default();
        let policy = LatePaymentPolicy::default();
        let now = datetime!(2026-10-19 10:00:00 UTC);
        store.record_usage(&arun(), 243.0, "CHIP99", now - Duration::days(3));

        let text = store.refresh_reminder(&arun(), now, &policy).unwrap();
        assert!(text.contains("overdue by 1 day(s)"));
        assert_eq!(store.pending_reminder("c1"), Some(text.as_str()));

        store.mark_paid("c1", None, now);
        assert!(store.pending_reminder("c1").is_none());
        assert!(store.refresh_reminder(&arun(), now, &policy).is_none());
    }

    #[test]
    fn records_are_listed_by_customer_id() {
        let mut store = UsageStore::default();
        let now = datetime!(2026-10-19 10:00:00 UTC);
        store.record_usage(&Customer::new("c2", "Sneha Bhat"), 85.0, "CHIPY", now);
        store.record_usage(&arun(), 250.0, "CHIPX", now);

        let ids: Vec<_> = store.records().iter().map(|r| r.customer_id.as_str()).collect();
        assert_eq!(ids, ["c1", "c2"]);
        assert_eq!(store.get("c2").map(|r| r.payable), Some(255.0));
    }
}
