//! Property system for Caredesk.
//!
//! Properties hold the mutable half of the reactive state model. A
//! [`Property`] wraps a value behind a lock and reports whether a write
//! actually changed it; the owner decides which [`Signal`](crate::Signal) to
//! emit in response.
//!
//! # Example
//!
//! ```
//! use caredesk_core::{Property, Signal};
//!
//! struct Query {
//!     text: Property<String>,
//!     text_changed: Signal<String>,
//! }
//!
//! impl Query {
//!     fn set_text(&self, text: &str) {
//!         if self.text.set(text.to_string()) {
//!             self.text_changed.emit(text.to_string());
//!         }
//!     }
//! }
//!
//! let query = Query { text: Property::default(), text_changed: Signal::new() };
//! query.set_text("asp");
//! assert_eq!(query.text.get(), "asp");
//! ```

use parking_lot::RwLock;

use crate::logging::targets;

/// An interior-mutable value with change detection.
///
/// Readers take a shared lock; [`set`](Self::set) compares before writing so
/// the owner can skip redundant notifications, while
/// [`set_silent`](Self::set_silent) overwrites unconditionally for state that
/// must notify on every write.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a property holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// A clone of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Borrow the value for the duration of `f`.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Overwrite the value without comparing.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Store `value`, returning `true` if it differs from the previous one.
    ///
    /// Equal values leave the property untouched.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current == value {
            return false;
        }
        *current = value;
        tracing::trace!(target: targets::PROPERTY, "property changed");
        true
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

static_assertions::assert_impl_all!(Property<Option<String>>: Send, Sync);
