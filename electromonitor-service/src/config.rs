use electromonitor_core::{
    domain::{Customer, CustomerDirectory},
    LatePaymentPolicy, Slab, Tariff,
};
use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

const DEFAULT_CONFIG_PATH: &str = "electromonitor.toml";

/// Upper bound for `late_payment_period_days` and `due_soon_window_days`.
pub const MAX_BILLING_PERIOD_DAYS: i64 = 3650;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    /// Empty means the built-in 3/5/7 slab table.
    pub slabs: Vec<Slab>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    pub late_payment_period_days: i64,
    pub due_soon_window_days: i64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            late_payment_period_days: electromonitor_core::urgency::LATE_PAYMENT_PERIOD_DAYS,
            due_soon_window_days: electromonitor_core::urgency::DUE_SOON_WINDOW_DAYS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    pub interval_ms: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self { interval_ms: 7000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tariff: TariffConfig,
    pub billing: BillingConfig,
    pub reminder: ReminderConfig,
    pub customers: Vec<CustomerConfig>,
    pub metrics: MetricsConfig,
}

impl AppConfig {
    /// Read `ELECTROMONITOR_CONFIG`, falling back to `electromonitor.toml` in
    /// the working directory and then to built-in defaults.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        match env::var("ELECTROMONITOR_CONFIG") {
            Ok(path) => Self::from_file(&path),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config {path}: {e}"))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        for (name, days) in [
            ("late_payment_period_days", cfg.billing.late_payment_period_days),
            ("due_soon_window_days", cfg.billing.due_soon_window_days),
        ] {
            if !(0..=MAX_BILLING_PERIOD_DAYS).contains(&days) {
                anyhow::bail!("billing.{name} must be between 0 and {MAX_BILLING_PERIOD_DAYS} days, got {days}");
            }
        }
        if cfg.reminder.interval_ms == 0 {
            anyhow::bail!("reminder.interval_ms must be positive");
        }
        Ok(cfg)
    }

    pub fn tariff(&self) -> anyhow::Result<Tariff> {
        if self.tariff.slabs.is_empty() {
            return Ok(Tariff::default());
        }
        Ok(Tariff::new(self.tariff.slabs.clone())?)
    }

    pub fn late_payment_policy(&self) -> LatePaymentPolicy {
        LatePaymentPolicy {
            period: time::Duration::days(self.billing.late_payment_period_days),
            due_soon_window: time::Duration::days(self.billing.due_soon_window_days),
        }
    }

    pub fn reminder_interval(&self) -> Duration {
        Duration::from_millis(self.reminder.interval_ms)
    }

    /// Configured customers, or the seeded demo customers when none are set.
    pub fn customer_directory(&self) -> CustomerDirectory {
        if self.customers.is_empty() {
            return CustomerDirectory::seeded();
        }
        CustomerDirectory::new(
            self.customers
                .iter()
                .map(|c| Customer {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    phone: c.phone.clone(),
                })
                .collect(),
        )
    }
}
