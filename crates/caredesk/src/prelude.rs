//! Commonly used types.
//!
//! ```
//! use caredesk::prelude::*;
//! ```

pub use crate::access::{AccessPolicy, PageMode};
pub use crate::binder::OptionBinder;
pub use crate::config::CaredeskConfig;
pub use crate::form::{FieldBinding, FormState};
pub use crate::option::{filter_options, SelectOption};
pub use crate::record::RecordKind;
pub use crate::selection::{PatientId, SelectionContext, SelectionHandle};
pub use crate::{FormError, Result};
pub use caredesk_core::{ConnectionGuard, Property, Signal};
