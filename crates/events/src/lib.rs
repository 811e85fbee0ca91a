//! Hub event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`HubEvent`]: a timestamped [`GenerationEvent`].

pub mod bus;

pub use bus::{EventBus, GenerationEvent, HubEvent};
