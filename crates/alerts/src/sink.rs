//! Alert persistence boundary.

use stockyard_core::{AlertId, StorageError};

use crate::alert::AlertRecord;

/// Destination for alert records produced during dispatch.
///
/// Called concurrently from simultaneous dispatches; implementations own any
/// serialization they need.
pub trait AlertSink: Send + Sync {
    /// Persist one record; returns once the write is confirmed.
    fn insert_alert(&self, record: &AlertRecord) -> Result<(), StorageError>;
}

/// Read and acknowledge side of alert storage.
pub trait AlertStore: AlertSink {
    /// Most recent alerts first, at most `limit`.
    fn list_alerts(&self, limit: usize) -> Result<Vec<AlertRecord>, StorageError>;

    /// Mark an alert read; `None` when the alert does not exist.
    fn mark_alert_read(&self, id: AlertId) -> Result<Option<AlertRecord>, StorageError>;
}

impl<S> AlertSink for std::sync::Arc<S>
where
    S: AlertSink + ?Sized,
{
    fn insert_alert(&self, record: &AlertRecord) -> Result<(), StorageError> {
        (**self).insert_alert(record)
    }
}
