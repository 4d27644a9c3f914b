//! One user's console session: role, selected customer, notification banner
//! and the reminder task of the active customer view.

use std::{sync::Arc, time::Duration};

use electromonitor_core::{
    classify,
    domain::{CustomerDirectory, PaymentType},
    format::format_amount,
    LatePaymentPolicy, Tariff, UsageStore,
};
use time::OffsetDateTime;
use tokio::sync::{mpsc, Mutex};

use crate::{
    clock::Clock,
    config::AppConfig,
    console::{
        command::{Command, Role},
        render,
    },
    prometheus,
    reminder::{self, Reminder, ReminderHandle},
    validation::{validate_login, validate_signup, validate_usage_entry, LoginForm, SignUpForm},
};

/// Lines to print for one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn lines(lines: Vec<String>) -> Self {
        Self { lines, quit: false }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::lines(vec![line.into()])
    }
}

pub struct Session {
    directory: CustomerDirectory,
    store: Arc<Mutex<UsageStore>>,
    policy: LatePaymentPolicy,
    reminder_interval: Duration,
    clock: Clock,
    reminder_tx: mpsc::Sender<Reminder>,
    role: Option<Role>,
    selected: Option<String>,
    notification: Option<String>,
    reminder: Option<ReminderHandle>,
}

impl Session {
    pub fn new(config: &AppConfig, clock: Clock, reminder_tx: mpsc::Sender<Reminder>) -> anyhow::Result<Self> {
        Ok(Self::from_parts(
            config.customer_directory(),
            config.tariff()?,
            config.late_payment_policy(),
            config.reminder_interval(),
            clock,
            reminder_tx,
        ))
    }

    pub fn from_parts(
        directory: CustomerDirectory,
        tariff: Tariff,
        policy: LatePaymentPolicy,
        reminder_interval: Duration,
        clock: Clock,
        reminder_tx: mpsc::Sender<Reminder>,
    ) -> Self {
        Self {
            directory,
            store: Arc::new(Mutex::new(UsageStore::new(tariff))),
            policy,
            reminder_interval,
            clock,
            reminder_tx,
            role: None,
            selected: None,
            notification: None,
            reminder: None,
        }
    }

    pub fn store(&self) -> Arc<Mutex<UsageStore>> {
        self.store.clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn selected_customer(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    /// Customer whose reminder task is running, if any.
    pub fn reminding(&self) -> Option<&str> {
        self.reminder.as_ref().map(ReminderHandle::customer_id)
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Text of a queued reminder, or `None` when it no longer applies: the
    /// view it was raised for has been left, or the bill changed since.
    pub async fn deliver(&self, reminder: &Reminder) -> Option<String> {
        if self.reminding() != Some(reminder.customer_id.as_str()) {
            tracing::debug!(customer_id = %reminder.customer_id, "stale reminder dropped");
            return None;
        }
        let store = self.store.lock().await;
        if store.pending_reminder(&reminder.customer_id) != Some(reminder.text.as_str()) {
            tracing::debug!(customer_id = %reminder.customer_id, "outdated reminder dropped");
            return None;
        }
        Some(reminder.text.clone())
    }

    pub fn greeting(&self) -> Vec<String> {
        render::role_prompt()
    }

    pub async fn handle_line(&mut self, line: &str, now: OffsetDateTime) -> Reply {
        if line.trim().is_empty() {
            return Reply::default();
        }
        match line.parse::<Command>() {
            Ok(cmd) => self.handle(cmd, now).await,
            Err(e) => Reply::line(e.to_string()),
        }
    }

    pub async fn handle(&mut self, cmd: Command, now: OffsetDateTime) -> Reply {
        match cmd {
            Command::Role(role) => self.enter_role(role, now).await,
            Command::Switch => {
                self.leave_view();
                self.role = None;
                Reply::lines(render::role_prompt())
            }
            Command::Usage {
                customer_id,
                usage,
                chip_id,
            } => match self.require(Role::Officer) {
                Some(reply) => reply,
                None => self.record_usage(&customer_id, &usage, &chip_id, now).await,
            },
            Command::Table => match self.require(Role::Officer) {
                Some(reply) => reply,
                None => self.table().await,
            },
            Command::Paid { customer_id } => match self.require(Role::Officer) {
                Some(reply) => reply,
                None => self.settle(&customer_id, Some(PaymentType::Offline), now).await,
            },
            Command::Select { customer_id } => match self.require(Role::Customer) {
                Some(reply) => reply,
                None => self.select(&customer_id, now).await,
            },
            Command::View => match self.require(Role::Customer) {
                Some(reply) => reply,
                None => self.dashboard(now).await,
            },
            Command::Pay { method } => match self.require(Role::Customer) {
                Some(reply) => reply,
                None => match self.selected.clone() {
                    Some(id) => self.settle(&id, method, now).await,
                    None => Reply::line("Select a customer first (`select <customer-id>`)."),
                },
            },
            Command::SignUp(form) => match self.require(Role::Customer) {
                Some(reply) => reply,
                None => self.sign_up(form, now).await,
            },
            Command::Login(form) => match self.require(Role::Customer) {
                Some(reply) => reply,
                None => self.login(form, now).await,
            },
            Command::Dismiss => {
                self.notification = None;
                Reply::default()
            }
            Command::Records => self.records_json().await,
            Command::Metrics => Reply::line(
                prometheus::render()
                    .unwrap_or_else(|| "Metrics are disabled (set [metrics] enabled = true).".to_string()),
            ),
            Command::Help => Reply::lines(render::help()),
            Command::Quit => {
                self.shutdown();
                Reply {
                    lines: vec!["Goodbye.".to_string()],
                    quit: true,
                }
            }
        }
    }

    /// Stop the reminder task, if one is running.
    pub fn shutdown(&mut self) {
        self.leave_view();
    }

    fn require(&self, role: Role) -> Option<Reply> {
        if self.role == Some(role) {
            return None;
        }
        let hint = match role {
            Role::Officer => "role officer",
            Role::Customer => "role customer",
        };
        Some(Reply::line(format!("This action needs the {role} role (`{hint}`).")))
    }

    fn leave_view(&mut self) {
        if let Some(handle) = self.reminder.take() {
            handle.cancel();
        }
        self.selected = None;
    }

    fn with_banner(&self, mut lines: Vec<String>) -> Vec<String> {
        if let Some(message) = &self.notification {
            lines.insert(0, render::banner(message));
        }
        lines
    }

    async fn enter_role(&mut self, role: Role, now: OffsetDateTime) -> Reply {
        self.leave_view();
        self.role = Some(role);
        tracing::info!(%role, "role selected");

        match role {
            Role::Officer => {
                let mut lines = vec!["Usage Data Entry: `usage <customer-id> <kWh> <chip-id>`".to_string()];
                lines.extend(self.table().await.lines);
                Reply::lines(lines)
            }
            Role::Customer => match self.directory.first().map(|c| c.id.clone()) {
                Some(id) => self.select(&id, now).await,
                None => Reply::line("No customers are registered yet (`signup ...`)."),
            },
        }
    }

    async fn record_usage(
        &mut self,
        customer_id: &str,
        usage: &str,
        chip_id: &str,
        now: OffsetDateTime,
    ) -> Reply {
        let entry = match validate_usage_entry(&self.directory, customer_id, usage, chip_id) {
            Ok(entry) => entry,
            Err(e) => {
                metrics::counter!("validation_rejected_total").increment(1);
                tracing::warn!(error = %e, customer_id, "usage entry rejected");
                return Reply::line(e.to_string());
            }
        };

        let outcome = self
            .store
            .lock()
            .await
            .record_usage(entry.customer, entry.usage, &entry.chip_id, now);

        metrics::counter!("usage_entries_recorded_total").increment(1);
        if outcome.merged {
            metrics::counter!("usage_entries_merged_total").increment(1);
        }
        tracing::info!(
            customer_id = %outcome.record.customer_id,
            usage = entry.usage,
            payable = outcome.entry_payable,
            total = outcome.record.payable,
            merged = outcome.merged,
            "usage recorded"
        );

        self.notification = Some(outcome.notification);
        let lines = self.table().await.lines;
        Reply::lines(lines)
    }

    async fn table(&self) -> Reply {
        let store = self.store.lock().await;
        let lines = render::officer_table(&self.directory, |id| store.get(id));
        Reply::lines(self.with_banner(lines))
    }

    async fn settle(&mut self, customer_id: &str, method: Option<PaymentType>, now: OffsetDateTime) -> Reply {
        let Some(customer) = self.directory.get(customer_id) else {
            return Reply::line(format!("Unknown customer '{customer_id}'."));
        };

        let mut store = self.store.lock().await;
        let was_unpaid = store.get(customer_id).is_some_and(|r| !r.is_paid());
        let Some(record) = store.mark_paid(customer_id, method, now) else {
            return Reply::line(format!("No bill found for {}.", customer.name));
        };

        if !was_unpaid {
            return Reply::line(format!("{}'s bill is already paid.", customer.name));
        }

        metrics::counter!("payments_recorded_total").increment(1);
        tracing::info!(
            customer_id,
            amount = record.payable,
            method = ?record.payment_type,
            "payment recorded"
        );

        let via = record
            .payment_type
            .as_ref()
            .map(|m| format!(" via {m}"))
            .unwrap_or_default();
        Reply::line(format!(
            "Payment of {} received from {}{via}. Thank you!",
            format_amount(record.payable),
            customer.name
        ))
    }

    async fn select(&mut self, customer_id: &str, now: OffsetDateTime) -> Reply {
        let Some(customer) = self.directory.get(customer_id).cloned() else {
            return Reply::line(format!("Unknown customer '{customer_id}'."));
        };

        self.leave_view();
        self.selected = Some(customer.id.clone());
        self.reminder = Some(reminder::spawn(
            self.store.clone(),
            customer,
            self.policy,
            self.reminder_interval,
            self.clock,
            self.reminder_tx.clone(),
        ));

        self.dashboard(now).await
    }

    async fn dashboard(&self, now: OffsetDateTime) -> Reply {
        let Some(customer) = self.selected.as_deref().and_then(|id| self.directory.get(id)) else {
            return Reply::line("Select a customer first (`select <customer-id>`).");
        };

        let store = self.store.lock().await;
        let record = store.get(&customer.id);
        let urgency = record.map(|r| classify(r, now, &self.policy));
        let lines = render::customer_dashboard(customer, record, store.tariff(), urgency.as_ref());
        Reply::lines(self.with_banner(lines))
    }

    async fn sign_up(&mut self, form: SignUpForm, now: OffsetDateTime) -> Reply {
        if let Err(e) = validate_signup(&form) {
            metrics::counter!("validation_rejected_total").increment(1);
            return Reply::line(e.to_string());
        }
        if self.directory.find_by_phone(&form.phone).is_some() {
            return Reply::line("An account with this phone number already exists. Please log in.");
        }

        let id = self
            .directory
            .register(form.name.trim(), Some(form.phone.clone()))
            .id
            .clone();
        tracing::info!(customer_id = %id, "customer registered");

        let mut reply = self.select(&id, now).await;
        reply.lines.insert(0, format!("Registered {} as {id}.", form.name.trim()));
        reply
    }

    async fn login(&mut self, form: LoginForm, now: OffsetDateTime) -> Reply {
        if let Err(e) = validate_login(&form) {
            metrics::counter!("validation_rejected_total").increment(1);
            return Reply::line(e.to_string());
        }

        match self.directory.find_by_phone(&form.phone).map(|c| c.id.clone()) {
            Some(id) => self.select(&id, now).await,
            None => Reply::line("No customer is registered with this phone number."),
        }
    }

    async fn records_json(&self) -> Reply {
        let store = self.store.lock().await;
        match serde_json::to_string_pretty(&store.records()) {
            Ok(json) => Reply::lines(json.lines().map(str::to_string).collect()),
            Err(e) => Reply::line(format!("failed to serialize records: {e}")),
        }
    }
}
