//! Stock-change notification dispatch.
//!
//! ```text
//! StockChanged
//!   ↓
//! for each evaluator, in registration order:
//!     observe (telemetry) → evaluate → sink.insert_alert
//!   ↓
//! DispatchReport { alerts, failures }
//! ```
//!
//! A failure in one evaluator is recorded and the next evaluator still runs.
//! The registry is filled at startup and only read afterwards, so concurrent
//! dispatches share it through `&self` without locking.

use thiserror::Error;
use tracing::{debug, info, warn};

use stockyard_core::{Entity, ItemId};
use stockyard_events::StockChanged;

use crate::alert::AlertRecord;
use crate::evaluator::{
    AlertEvaluator, DashboardNotifier, EvaluatorError, LowStockEvaluator, OutOfStockEvaluator,
};
use crate::sink::AlertSink;

/// One evaluator's side effect that could not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorFailure {
    pub evaluator: &'static str,
    pub error: EvaluatorError,
}

impl core::fmt::Display for EvaluatorFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.evaluator, self.error)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Some evaluators failed; the others ran and their alerts were persisted.
    #[error("{} of {} alert evaluators failed", .failures.len(), .failures.len() + .succeeded)]
    Partial {
        failures: Vec<EvaluatorFailure>,
        succeeded: usize,
        alerts: Vec<AlertRecord>,
    },
}

/// Outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub item_id: ItemId,
    /// Records that were produced and confirmed by the sink.
    pub alerts: Vec<AlertRecord>,
    pub failures: Vec<EvaluatorFailure>,
    /// Number of evaluators invoked.
    pub evaluated: usize,
}

impl DispatchReport {
    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    pub fn succeeded(&self) -> usize {
        self.evaluated - self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn into_result(self) -> Result<Vec<AlertRecord>, DispatchError> {
        if self.failures.is_empty() {
            return Ok(self.alerts);
        }
        let succeeded = self.succeeded();
        Err(DispatchError::Partial {
            failures: self.failures,
            succeeded,
            alerts: self.alerts,
        })
    }
}

/// Ordered registry of alert evaluators bound to one alert sink.
///
/// Constructed once at process start and shared by reference; there is no
/// global instance. Registering the same evaluator twice runs it twice.
pub struct NotificationDispatcher<K> {
    sink: K,
    evaluators: Vec<Box<dyn AlertEvaluator>>,
}

impl<K> core::fmt::Debug for NotificationDispatcher<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("evaluators", &self.evaluator_names())
            .finish_non_exhaustive()
    }
}

impl<K> NotificationDispatcher<K> {
    /// Dispatcher with no evaluators.
    pub fn new(sink: K) -> Self {
        Self {
            sink,
            evaluators: Vec::new(),
        }
    }

    /// Low stock, out of stock, then a log-only dashboard notifier.
    pub fn with_standard_evaluators(sink: K) -> Self {
        Self::new(sink)
            .with_evaluator(LowStockEvaluator)
            .with_evaluator(OutOfStockEvaluator)
            .with_evaluator(DashboardNotifier::new())
    }

    /// Append an evaluator; it runs after every evaluator registered before it.
    pub fn register<E>(&mut self, evaluator: E) -> &mut Self
    where
        E: AlertEvaluator + 'static,
    {
        debug!(evaluator = evaluator.name(), position = self.evaluators.len(), "evaluator registered");
        self.evaluators.push(Box::new(evaluator));
        self
    }

    pub fn with_evaluator<E>(mut self, evaluator: E) -> Self
    where
        E: AlertEvaluator + 'static,
    {
        self.register(evaluator);
        self
    }

    pub fn evaluator_names(&self) -> Vec<&'static str> {
        self.evaluators.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }
}

impl<K> NotificationDispatcher<K>
where
    K: AlertSink,
{
    /// Run every evaluator against `event`, in registration order.
    pub fn dispatch(&self, event: &StockChanged) -> DispatchReport {
        let mut alerts = Vec::new();
        let mut failures = Vec::new();

        for evaluator in &self.evaluators {
            match self.run_one(evaluator.as_ref(), event) {
                Ok(Some(record)) => {
                    debug!(evaluator = evaluator.name(), alert = %record.id(), "alert persisted");
                    alerts.push(record);
                }
                Ok(None) => {}
                Err(error) => {
                    warn!(evaluator = evaluator.name(), item = %event.item_id, %error, "alert evaluator failed");
                    failures.push(EvaluatorFailure {
                        evaluator: evaluator.name(),
                        error,
                    });
                }
            }
        }

        info!(
            item = %event.item_id,
            quantity = event.quantity,
            evaluators = self.evaluators.len(),
            alerts = alerts.len(),
            failures = failures.len(),
            "stock change dispatched"
        );

        DispatchReport {
            item_id: event.item_id,
            alerts,
            failures,
            evaluated: self.evaluators.len(),
        }
    }

    fn run_one(
        &self,
        evaluator: &dyn AlertEvaluator,
        event: &StockChanged,
    ) -> Result<Option<AlertRecord>, EvaluatorError> {
        evaluator.observe(event)?;
        match evaluator.evaluate(event) {
            Some(record) => {
                self.sink.insert_alert(&record)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}
