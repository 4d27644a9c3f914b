use time::{OffsetDateTime, UtcOffset};

/// Wall clock pinned to one UTC offset.
///
/// The local offset can only be read reliably while the process is
/// single-threaded, so [`Clock::local`] must run before the runtime starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    offset: UtcOffset,
}

impl Clock {
    pub fn local() -> Self {
        match UtcOffset::current_local_offset() {
            Ok(offset) => Self { offset },
            Err(e) => {
                tracing::warn!(error = %e, "local offset unavailable, using UTC");
                Self::utc()
            }
        }
    }

    pub fn utc() -> Self {
        Self::with_offset(UtcOffset::UTC)
    }

    pub fn with_offset(offset: UtcOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}
