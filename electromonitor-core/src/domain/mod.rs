pub mod customer;
pub mod usage_record;

pub use customer::{Customer, CustomerDirectory};
pub use usage_record::{PaymentStatus, PaymentType, UsageRecord};
