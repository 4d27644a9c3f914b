pub mod clock;
pub mod config;
pub mod console;
pub mod observability;
pub mod pipeline;
pub mod prometheus;
pub mod reminder;
pub mod session;
pub mod sources;
pub mod validation;

pub use pipeline::{Envelope, PipelineError};
pub use session::{Reply, Session};
