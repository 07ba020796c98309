//! Advisory page gating.
//!
//! Admins listed in the configuration get the create/edit form on record
//! pages; everyone else gets the read-only table. This decides what to
//! render and nothing more. It is not an authorization boundary.

use caredesk_core::logging::targets;

use crate::record::RecordKind;

/// How a record page should render for a given user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// Create/edit form.
    Edit,
    /// Read-only table.
    ReadOnly,
}

/// Email-based admin roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    admin_emails: Vec<String>,
}

impl AccessPolicy {
    /// Create a policy from a list of admin emails.
    ///
    /// Emails are trimmed and lowercased; blank entries are dropped.
    pub fn new<I, S>(admin_emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut admin_emails: Vec<String> = admin_emails
            .into_iter()
            .map(|email| normalize(email.as_ref()))
            .filter(|email| !email.is_empty())
            .collect();
        admin_emails.sort();
        admin_emails.dedup();
        Self { admin_emails }
    }

    /// The normalized admin emails.
    pub fn admin_emails(&self) -> &[String] {
        &self.admin_emails
    }

    /// Whether `email` is on the admin roster.
    pub fn is_admin(&self, email: &str) -> bool {
        let email = normalize(email);
        !email.is_empty() && self.admin_emails.binary_search(&email).is_ok()
    }

    /// Decide how the page for `kind` renders for `email`.
    pub fn page_mode(&self, kind: RecordKind, email: &str) -> PageMode {
        let mode = if kind.has_form() && self.is_admin(email) {
            PageMode::Edit
        } else {
            PageMode::ReadOnly
        };
        tracing::debug!(target: targets::ACCESS, page = kind.slug(), ?mode, "page mode resolved");
        mode
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}
