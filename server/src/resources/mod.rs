//! Entity records exposed by the site
//!
//! One module per resource. Each module owns the record type, its create
//! payload (including the legacy field-name aliases) and its partial update.

pub mod admissions;
pub mod alumni;
pub mod messages;
pub mod news;
pub mod publications;
pub mod settings;

pub use admissions::{Admission, AdmissionPatch, AdmissionStatus, NewAdmission};
pub use alumni::{AlumniPatch, AlumniProfile, NewAlumniProfile};
pub use messages::{ContactMessage, MessagePatch, NewContactMessage};
pub use news::{NewNewsItem, NewsItem, NewsStatus};
pub use publications::{NewPublication, Publication};
pub use settings::{Settings, SettingsInput, SocialLinks};

/// Resolve a field that clients may send under two names.
///
/// `preferred` wins when both are present; the other name only fills a gap.
pub(crate) fn reconcile<T>(preferred: Option<T>, other: Option<T>) -> Option<T> {
    preferred.or(other)
}

/// A field that must arrive under one of its names
pub(crate) fn required<T>(value: Option<T>, field: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("missing field `{}`", field))
}
