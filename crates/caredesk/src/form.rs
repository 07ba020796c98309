//! Form-state collaborators.
//!
//! [`FieldBinding`] is the capability a form hands to field widgets: read a
//! field's current value, write a new one. [`FormState`] is a small
//! in-memory implementation keyed by field name, with a change signal for
//! whatever renders the form.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use caredesk_core::logging::targets;
use caredesk_core::Signal;
use parking_lot::RwLock;

/// Typed access to the fields of an externally owned form.
pub trait FieldBinding<V>: Send + Sync {
    /// The current value of `field`, if it has one.
    fn current_value(&self, field: &str) -> Option<V>;

    /// Store `value` into `field`.
    fn set_value(&self, field: &str, value: V);
}

impl<V, B: FieldBinding<V> + ?Sized> FieldBinding<V> for Arc<B> {
    fn current_value(&self, field: &str) -> Option<V> {
        (**self).current_value(field)
    }

    fn set_value(&self, field: &str, value: V) {
        (**self).set_value(field, value);
    }
}

impl<V, B: FieldBinding<V> + ?Sized> FieldBinding<V> for &B {
    fn current_value(&self, field: &str) -> Option<V> {
        (**self).current_value(field)
    }

    fn set_value(&self, field: &str, value: V) {
        (**self).set_value(field, value);
    }
}

/// Notification payload for [`FormState::field_changed`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange<V> {
    /// Name of the field that was written.
    pub field: String,
    /// The value that was written.
    pub value: V,
}

/// An in-memory form keyed by field name.
///
/// # Signals
///
/// - `field_changed(FieldChange<V>)`: Emitted after every write through
///   [`set`](Self::set) or [`FieldBinding::set_value`]
pub struct FormState<V> {
    values: RwLock<HashMap<String, V>>,

    /// Signal emitted after a field is written.
    pub field_changed: Signal<FieldChange<V>>,
}

impl<V: Clone + Send + Sync + 'static> Default for FormState<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync + 'static> FormState<V> {
    /// Create an empty form.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            field_changed: Signal::new(),
        }
    }

    /// Create a form pre-populated with default values.
    pub fn with_defaults<I, K>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        let values = defaults.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            values: RwLock::new(values),
            field_changed: Signal::new(),
        }
    }

    /// Get the value of a field.
    pub fn get(&self, field: &str) -> Option<V> {
        self.values.read().get(field).cloned()
    }

    /// Write a field and emit `field_changed`.
    pub fn set(&self, field: impl Into<String>, value: V) {
        let field = field.into();
        tracing::debug!(target: targets::FORM, field = %field, "form field set");
        self.values.write().insert(field.clone(), value.clone());
        self.field_changed.emit(FieldChange { field, value });
    }

    /// Remove a field's value, returning it.
    pub fn remove(&self, field: &str) -> Option<V> {
        self.values.write().remove(field)
    }

    /// Whether a field has a value.
    pub fn contains(&self, field: &str) -> bool {
        self.values.read().contains_key(field)
    }

    /// Number of fields with a value.
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Whether no field has a value.
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    /// Remove every value.
    pub fn clear(&self) {
        self.values.write().clear();
    }

    /// A copy of all field values, e.g. for submission.
    pub fn snapshot(&self) -> HashMap<String, V> {
        self.values.read().clone()
    }
}

impl<V: Clone + Send + Sync + 'static> FieldBinding<V> for FormState<V> {
    fn current_value(&self, field: &str) -> Option<V> {
        self.get(field)
    }

    fn set_value(&self, field: &str, value: V) {
        self.set(field, value);
    }
}

impl<V: fmt::Debug> fmt::Debug for FormState<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormState")
            .field("values", &*self.values.read())
            .finish()
    }
}
