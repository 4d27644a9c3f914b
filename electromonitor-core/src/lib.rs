pub mod domain;
pub mod format;
pub mod store;
pub mod tariff;
pub mod urgency;

pub use store::{UsageOutcome, UsageStore};
pub use tariff::{calculate_payable, Slab, SlabCharge, Tariff, TariffError};
pub use urgency::{classify, LatePaymentPolicy, PaymentUrgency};
