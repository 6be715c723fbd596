//! Calendar gateway: the boundary between the scheduling core and the
//! calendar provider.
//!
//! The core only ever talks to the [`CalendarGateway`] trait; the Google
//! implementation lives in [`google`]. Credentials are threaded in
//! explicitly through [`CredentialProvider`] rather than read from any
//! ambient store.

pub mod credentials;
pub mod google;

use chrono::{DateTime, Utc};

use crate::error::GatewayError;
use crate::interval::Interval;

pub use credentials::{CredentialProvider, StaticCredentials};
pub use google::GoogleCalendarGateway;

/// Abstract calendar provider operations the scheduler depends on.
pub trait CalendarGateway: Send + Sync {
    /// List busy intervals on the primary calendar within `[range_start, range_end)`.
    fn list_busy(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<Interval>, GatewayError>;

    /// Create an event at `interval` with the given label, returning the
    /// provider's event id.
    fn create_event(&self, label: &str, interval: &Interval) -> Result<String, GatewayError>;
}
