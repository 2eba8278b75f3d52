//! Stock-change events and the live feed they are broadcast on.

pub mod feed;
pub mod in_memory_feed;
pub mod stock_changed;

pub use feed::{Feed, Subscription};
pub use in_memory_feed::{FeedError, InMemoryFeed};
pub use stock_changed::{Event, StockChanged, StockLevel};
