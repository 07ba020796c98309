//! Searchable option binder.
//!
//! [`OptionBinder`] is the state behind a combo-box form field: the user
//! types into a query box, the candidate list narrows to matching labels,
//! and confirming an option writes its value into the owning form.
//!
//! Typing never touches the form. Only [`OptionBinder::on_select`] does, and
//! it writes exactly once per confirmed option. A confirmed selection
//! survives later queries that filter it out of view.
//!
//! # Example
//!
//! ```
//! use caredesk::binder::OptionBinder;
//! use caredesk::form::FormState;
//! use caredesk::option::SelectOption;
//! use std::sync::Arc;
//!
//! # fn main() -> caredesk::Result<()> {
//! let form = Arc::new(FormState::<String>::new());
//! let binder = OptionBinder::new(
//!     "provider",
//!     vec![
//!         SelectOption::new("Dr. Smith", "p1".to_string()),
//!         SelectOption::new("Dr. Jones", "p2".to_string()),
//!     ],
//!     form.clone(),
//! );
//!
//! binder.on_query_change("jo");
//! let jones = binder.filtered_options()[0].clone();
//! binder.on_select(&jones)?;
//!
//! assert_eq!(form.get("provider").as_deref(), Some("p2"));
//! # Ok(())
//! # }
//! ```

use std::fmt;

use caredesk_core::logging::targets;
use caredesk_core::{PerfSpan, Property, Signal};

use crate::error::{FormError, Result};
use crate::form::FieldBinding;
use crate::option::{filter_options, SelectOption};

/// Binds a searchable, fixed candidate list to one field of a form.
///
/// # Signals
///
/// - `query_changed(String)`: Emitted when the query text actually changes
/// - `selection_changed(SelectOption<V>)`: Emitted after an option is confirmed
pub struct OptionBinder<V, B> {
    /// Key of the bound field in the owning form.
    field_name: String,

    /// Fixed candidate set, in display order.
    candidates: Vec<SelectOption<V>>,

    /// The owning form's field-update capability.
    binding: B,

    /// Current free-text query.
    query: Property<String>,

    /// The confirmed option, always a member of `candidates`.
    selected: Property<Option<SelectOption<V>>>,

    // Signals
    /// Signal emitted when the query text changes.
    pub query_changed: Signal<String>,

    /// Signal emitted when an option is confirmed.
    pub selection_changed: Signal<SelectOption<V>>,
}

impl<V, B> OptionBinder<V, B>
where
    V: Clone + PartialEq + Send + Sync + 'static,
    B: FieldBinding<V>,
{
    /// Create a binder for `field_name` over a fixed candidate list.
    ///
    /// The binder starts with an empty query and no selection. It never
    /// reads the form's current value; restoring a prior selection is up to
    /// the host (see [`find_by_value`](Self::find_by_value)).
    pub fn new<I>(field_name: impl Into<String>, candidates: I, binding: B) -> Self
    where
        I: IntoIterator<Item = SelectOption<V>>,
    {
        let field_name = field_name.into();
        let candidates: Vec<_> = candidates.into_iter().collect();
        tracing::trace!(
            target: targets::BINDER,
            field = %field_name,
            candidates = candidates.len(),
            "option binder created"
        );
        Self {
            field_name,
            candidates,
            binding,
            query: Property::default(),
            selected: Property::new(None),
            query_changed: Signal::new(),
            selection_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The bound field's name.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// The full candidate list, in original order.
    pub fn candidates(&self) -> &[SelectOption<V>] {
        &self.candidates
    }

    /// Whether the candidate list is empty.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The form binding this binder writes through.
    pub fn binding(&self) -> &B {
        &self.binding
    }

    /// The current query text.
    pub fn query(&self) -> String {
        self.query.get()
    }

    /// The candidates matching the current query, in original order.
    ///
    /// Recomputed on every call.
    pub fn filtered_options(&self) -> Vec<&SelectOption<V>> {
        let _span = PerfSpan::new("filter_options");
        self.query.with(|query| filter_options(query, &self.candidates))
    }

    /// The confirmed option, if any.
    pub fn selected_option(&self) -> Option<SelectOption<V>> {
        self.selected.get()
    }

    /// Find the candidate carrying `value`.
    pub fn find_by_value(&self, value: &V) -> Option<&SelectOption<V>> {
        self.candidates.iter().find(|option| option.value == *value)
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Replace the query text.
    ///
    /// Any string is accepted. The selection and the form are left untouched.
    /// Re-entering the current text does not emit `query_changed`.
    pub fn on_query_change(&self, text: impl Into<String>) {
        let text = text.into();
        if self.query.set(text.clone()) {
            tracing::trace!(target: targets::BINDER, field = %self.field_name, query = %text, "query changed");
            self.query_changed.emit(text);
        }
    }

    /// Reset the query to the empty string.
    pub fn clear_query(&self) {
        self.on_query_change(String::new());
    }

    /// Confirm `option` and write its value into the bound form field.
    ///
    /// `option` must be one of the binder's candidates (compared by label and
    /// value). A foreign option fails with [`FormError::ForeignOption`] and
    /// leaves both the binder and the form untouched.
    pub fn on_select(&self, option: &SelectOption<V>) -> Result<()> {
        let Some(candidate) = self.candidates.iter().find(|c| *c == option) else {
            tracing::warn!(
                target: targets::BINDER,
                field = %self.field_name,
                label = %option.label,
                "rejected option outside the candidate list"
            );
            return Err(FormError::foreign_option(&self.field_name, &option.label));
        };

        tracing::debug!(target: targets::BINDER, field = %self.field_name, label = %candidate.label, "option selected");
        self.selected.set_silent(Some(candidate.clone()));
        self.binding.set_value(&self.field_name, candidate.value.clone());
        self.selection_changed.emit(candidate.clone());
        Ok(())
    }
}

impl<V: Clone + fmt::Debug, B> fmt::Debug for OptionBinder<V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionBinder")
            .field("field_name", &self.field_name)
            .field("candidates", &self.candidates)
            .field("query", &self.query.get())
            .field("selected", &self.selected.get())
            .finish_non_exhaustive()
    }
}
