//! Periodic late-payment reminder for the active customer view.

use std::{sync::Arc, time::Duration};

use electromonitor_core::{domain::Customer, LatePaymentPolicy, UsageStore};
use tokio::{
    sync::{mpsc, Mutex},
    time::MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;

/// Reminder text for one customer, as queued for the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub customer_id: String,
    pub text: String,
}

/// Running reminder task. Dropping the handle stops the task.
pub struct ReminderHandle {
    customer_id: String,
    token: CancellationToken,
}

impl ReminderHandle {
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for ReminderHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Re-classify `customer`'s bill every `interval` and push reminder text to
/// `tx`. The first check runs immediately.
pub fn spawn(
    store: Arc<Mutex<UsageStore>>,
    customer: Customer,
    policy: LatePaymentPolicy,
    interval: Duration,
    clock: Clock,
    tx: mpsc::Sender<Reminder>,
) -> ReminderHandle {
    let token = CancellationToken::new();
    let child = token.clone();
    let customer_id = customer.id.clone();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = child.cancelled() => break,
                _ = ticker.tick() => {
                    let message = store
                        .lock()
                        .await
                        .refresh_reminder(&customer, clock.now(), &policy);
                    tracing::debug!(customer_id = %customer.id, reminder = message.is_some(), "reminder tick");

                    if let Some(text) = message {
                        metrics::counter!("reminders_emitted_total").increment(1);
                        let reminder = Reminder {
                            customer_id: customer.id.clone(),
                            text,
                        };
                        if tx.send(reminder).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    });

    ReminderHandle { customer_id, token }
}
