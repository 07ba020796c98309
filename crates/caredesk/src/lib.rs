//! Caredesk: state layer for a patient-records front-end.
//!
//! Record pages (diagnoses, imaging, medications, providers, ...) share two
//! pieces of state logic, both provided here independent of any particular
//! UI toolkit:
//!
//! - [`selection`]: the "currently active patient", shared across a page
//!   subtree with synchronous change notification
//! - [`binder`]: a searchable combo-box field that filters a fixed option
//!   list and writes the confirmed value into a form
//!
//! Around them sit the form-state collaborator ([`form`]), the option type
//! and matcher ([`option`]), record kinds ([`record`]), advisory admin
//! gating ([`access`]) and TOML configuration ([`config`]).
//!
//! # Example
//!
//! ```
//! use caredesk::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> caredesk::Result<()> {
//! let _page = SelectionContext::provide(None);
//! SelectionContext::read()?.select(Some(PatientId::from("p-42")));
//!
//! let form = Arc::new(FormState::new());
//! let providers = OptionBinder::new(
//!     "provider",
//!     [SelectOption::new("Dr. Smith", "p1"), SelectOption::new("Dr. Jones", "p2")],
//!     form.clone(),
//! );
//!
//! providers.on_query_change("smi");
//! let smith = providers.filtered_options()[0].clone();
//! providers.on_select(&smith)?;
//! assert_eq!(form.get("provider"), Some("p1"));
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod binder;
pub mod config;
mod error;
pub mod form;
pub mod option;
pub mod prelude;
pub mod record;
pub mod selection;

pub use error::{ConfigError, FormError, Result};
