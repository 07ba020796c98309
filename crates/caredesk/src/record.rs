//! Clinical record kinds.
//!
//! Each kind backs one page of the records front-end. The slug doubles as
//! the route segment and as the serialized form used in configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The clinical record types a patient chart is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    Diagnoses,
    Imaging,
    Institutions,
    Interventions,
    Medications,
    Providers,
    Timeline,
    FamilyHistory,
}

impl RecordKind {
    /// Every record kind, in navigation order.
    pub const ALL: [RecordKind; 8] = [
        RecordKind::Diagnoses,
        RecordKind::Imaging,
        RecordKind::Institutions,
        RecordKind::Interventions,
        RecordKind::Medications,
        RecordKind::Providers,
        RecordKind::Timeline,
        RecordKind::FamilyHistory,
    ];

    /// Route segment and serialized name.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Diagnoses => "diagnoses",
            Self::Imaging => "imaging",
            Self::Institutions => "institutions",
            Self::Interventions => "interventions",
            Self::Medications => "medications",
            Self::Providers => "providers",
            Self::Timeline => "timeline",
            Self::FamilyHistory => "family-history",
        }
    }

    /// Human-readable page title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Diagnoses => "Diagnoses",
            Self::Imaging => "Imaging",
            Self::Institutions => "Institutions",
            Self::Interventions => "Interventions",
            Self::Medications => "Medications",
            Self::Providers => "Providers",
            Self::Timeline => "Timeline",
            Self::FamilyHistory => "Family History",
        }
    }

    /// Look up a kind by its slug.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    /// Whether the page offers a create/edit form.
    ///
    /// The timeline is assembled from the other records and is table-only.
    pub fn has_form(self) -> bool {
        !matches!(self, Self::Timeline)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Error returned when parsing an unknown record slug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown record kind '{0}'")]
pub struct UnknownRecordKind(pub String);

impl FromStr for RecordKind {
    type Err = UnknownRecordKind;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| UnknownRecordKind(s.to_string()))
    }
}
