//! `truck-middleware` – in-process message routing
//!
//! Routes readings between the periodic tasks without caring about what they
//! mean.
//!
//! # Modules
//!
//! - [`bus`] – Headless, topic-based publish/subscribe event bus backed by a
//!   mutex-guarded callback registry.

pub mod bus;

pub use bus::{Callback, EventBus, SubscriptionHandle};
