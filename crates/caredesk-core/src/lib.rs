//! Core reactive primitives for Caredesk.
//!
//! This crate provides the building blocks the form layer is assembled from:
//!
//! - **Signal/Slot System**: Synchronous, type-safe change notification
//! - **Property System**: Interior-mutable values with change detection
//! - **Logging**: Tracing targets and performance spans
//!
//! # Example
//!
//! ```
//! use caredesk_core::{Property, Signal};
//! use std::sync::Arc;
//!
//! struct ActivePatient {
//!     id: Property<Option<String>>,
//!     changed: Signal<Option<String>>,
//! }
//!
//! let state = Arc::new(ActivePatient { id: Property::default(), changed: Signal::new() });
//!
//! let _guard = state.changed.connect_scoped(|id| println!("now viewing {:?}", id));
//!
//! state.id.set_silent(Some("p-42".to_string()));
//! state.changed.emit(state.id.get());
//! ```

mod error;
pub mod logging;
pub mod property;
pub mod signal;

pub use error::{Result, SignalError};
pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
