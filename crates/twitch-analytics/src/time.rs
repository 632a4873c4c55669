//! Clock abstraction for token expiry
//!
//! The token manager asks a `Clock` for the current time so tests can move
//! time forward without sleeping.

use chrono::{DateTime, Utc};

/// Trait for getting the current time
pub trait Clock: Send + Sync {
    /// Returns the current time
    fn now(&self) -> DateTime<Utc>;
}

/// System clock that returns the actual current time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub use mock::MockClock;
