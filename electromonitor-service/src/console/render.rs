//! Plain-text views for the console.

use electromonitor_core::{
    domain::{Customer, CustomerDirectory, UsageRecord},
    format::{format_amount, format_timestamp},
    PaymentUrgency, Tariff,
};

pub const NO_USAGE_MESSAGE: &str =
    "No usage data available yet. Please check back once your EB Officer enters the data.";

pub fn role_prompt() -> Vec<String> {
    vec![
        "Welcome to ElectroMonitor - Track & Manage Electricity Smartly".to_string(),
        "Select Role: `role officer` (EB Officer) or `role customer` (Customer)".to_string(),
    ]
}

pub fn help() -> Vec<String> {
    [
        "role officer|customer            choose a role",
        "switch                           back to role selection",
        "usage <customer-id> <kWh> <chip> officer: record a reading",
        "table                            officer: current usage records",
        "paid <customer-id>               officer: record an offline payment",
        "select <customer-id>             customer: choose whose bill to view",
        "view                             customer: usage & payment summary",
        "pay [method]                     customer: pay the outstanding bill",
        "signup <phone> <name> <pw> <pw>  customer: register",
        "login <phone> <pw>               customer: log in",
        "dismiss                          close the notification banner",
        "records                          dump records as JSON",
        "metrics                          show counters",
        "quit                             leave",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn banner(message: &str) -> String {
    format!("[!] {message} (type `dismiss` to close)")
}

fn status_label(record: &UsageRecord) -> String {
    match (&record.payment_type, record.is_paid()) {
        (Some(method), true) => format!("paid ({method})"),
        (None, true) => "paid".to_string(),
        (_, false) => "unpaid".to_string(),
    }
}

/// One row per customer, `-` where no reading has been entered.
pub fn officer_table<'a, F>(directory: &CustomerDirectory, record_for: F) -> Vec<String>
where
    F: Fn(&str) -> Option<&'a UsageRecord>,
{
    let mut lines = vec![
        "Current Usage Records".to_string(),
        format!(
            "{:<14} {:<9} {:>19} {:>19} {:<24} {}",
            "Customer", "Chip ID", "Latest Usage (kWh)", "Payable Amount (₹)", "Last Updated", "Status"
        ),
    ];

    for customer in directory.iter() {
        let row = match record_for(&customer.id) {
            Some(r) => format!(
                "{:<14} {:<9} {:>19} {:>19} {:<24} {}",
                customer.name,
                r.chip_id,
                r.usage,
                format_amount(r.payable),
                format_timestamp(r.updated_at),
                status_label(r)
            ),
            None => format!(
                "{:<14} {:<9} {:>19} {:>19} {:<24} {}",
                customer.name, "-", "-", "-", "-", "-"
            ),
        };
        lines.push(row);
    }

    lines
}

pub fn customer_dashboard(
    customer: &Customer,
    record: Option<&UsageRecord>,
    tariff: &Tariff,
    urgency: Option<&PaymentUrgency>,
) -> Vec<String> {
    let mut lines = vec![
        format!("Welcome, {}!", customer.name),
        "Electricity Usage & Payment Summary".to_string(),
    ];

    let Some(record) = record else {
        lines.push(NO_USAGE_MESSAGE.to_string());
        return lines;
    };

    lines.push(format!("Latest Usage: {} kWh", record.usage));
    lines.push(format!("Payable Amount: {}", format_amount(record.payable)));
    let cumulative = tariff.payable(record.usage);
    if cumulative == record.payable {
        lines.push("Slab breakdown:".to_string());
    } else {
        lines.push(format!(
            "Slab breakdown (indicative, {} for {} kWh at once; readings are billed one by one):",
            format_amount(cumulative),
            record.usage
        ));
    }
    for charge in tariff.breakdown(record.usage) {
        let range = match charge.upto {
            Some(upto) => format!("{}-{} kWh", charge.from, upto),
            None => format!("above {} kWh", charge.from),
        };
        lines.push(format!(
            "  {range}: {} x {} = {}",
            charge.units,
            format_amount(charge.rate),
            format_amount(charge.amount)
        ));
    }
    lines.push(format!("Chip ID: {}", record.chip_id));
    lines.push(format!("Last Updated: {}", format_timestamp(record.updated_at)));

    let status = match urgency {
        Some(PaymentUrgency::Paid) | None if record.is_paid() => match record.paid_at {
            Some(at) => format!("Payment Status: {} on {}", status_label(record), format_timestamp(at)),
            None => format!("Payment Status: {}", status_label(record)),
        },
        Some(PaymentUrgency::Overdue { due, days }) => format!(
            "Payment Status: OVERDUE by {days} day(s) (was due {})",
            format_timestamp(*due)
        ),
        Some(PaymentUrgency::DueSoon { due, .. }) => {
            format!("Payment Status: due soon (by {})", format_timestamp(*due))
        }
        Some(PaymentUrgency::OnTime { due }) => {
            format!("Payment Status: unpaid (due by {})", format_timestamp(*due))
        }
        _ => format!("Payment Status: {}", status_label(record)),
    };
    lines.push(status);

    lines
}
