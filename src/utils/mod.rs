//! # Utility Modules
//!
//! Supporting utilities shared by the codec, validator and dispatcher.
//!
//! ## Components
//! - **Logging**: Structured logging configuration
//! - **Metrics**: Thread-safe observability counters
//! - **Time**: Clock abstraction for rate limits and rolling windows

pub mod logging;
pub mod metrics;
pub mod time;

pub use metrics::{global_metrics, Metrics, MetricsSnapshot};
pub use time::{Clock, ManualClock, SystemClock};
