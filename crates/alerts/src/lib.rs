//! Alert rules and the dispatcher that runs them on every stock change.

pub mod alert;
pub mod dispatcher;
pub mod evaluator;
pub mod sink;

pub use alert::{AlertRecord, AlertType};
pub use dispatcher::{DispatchError, DispatchReport, EvaluatorFailure, NotificationDispatcher};
pub use evaluator::{
    AlertEvaluator, DashboardNotifier, EvaluatorError, LowStockEvaluator, OutOfStockEvaluator,
};
pub use sink::{AlertSink, AlertStore};
