//! Resource Models
//!
//! Wire types for the five back-office resources. Every resource comes in
//! three shapes:
//!
//! - the **record** as read from the server (carries the server-assigned `id`),
//! - the **draft** sent on creation (no `id` field at all),
//! - the **patch** sent on update (every field optional, absent fields omitted).
//!
//! Relationships are written as bare identifiers and may be read either as an
//! identifier or as the embedded object, see [`Related`].

mod client;
mod decimal;
mod document;
mod invoice;
mod timesheet;

pub use client::{Client, ClientPatch, NewClient};
pub use document::{DocumentPatch, DocumentStatus, NewDocument, UploadedDocument};
pub use invoice::{Invoice, InvoicePatch, InvoiceStatus, NewInvoice};
pub use timesheet::{
    DailyEntry, EntryPatch, NewEntry, NewTimesheet, TimesheetPatch, TimesheetStatus,
    WeeklyTimesheet, Weekday,
};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Server-assigned identifier shared by all resources
pub type Id = u64;

/// A remote collection exposed through CRUD endpoints
pub trait Resource:
    DeserializeOwned + Serialize + Clone + std::fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// Creation payload (never carries an identifier)
    type Draft: Serialize + Clone + Default + std::fmt::Debug + PartialEq + Send + Sync + 'static;

    /// Partial update payload
    type Patch: Serialize + Clone + Default + std::fmt::Debug + PartialEq + Send + Sync + 'static;

    /// Collection path segment, e.g. `clients` for `/clients/`
    const COLLECTION: &'static str;

    /// Singular name used in logs and notifications
    const LABEL: &'static str;

    fn id(&self) -> Id;
}

/// A relationship that the server may return either collapsed to its
/// identifier or expanded to the full object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Related<T> {
    Id(Id),
    Embedded(Box<T>),
}

impl<T: Resource> Related<T> {
    /// Identifier of the related record, whichever form was received
    pub fn id(&self) -> Id {
        match self {
            Related::Id(id) => *id,
            Related::Embedded(inner) => inner.id(),
        }
    }

    /// The expanded object, if the server embedded it
    pub fn embedded(&self) -> Option<&T> {
        match self {
            Related::Id(_) => None,
            Related::Embedded(inner) => Some(inner),
        }
    }
}

/// Error returned when a wire enum is parsed from an unknown string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value} (expected one of: {expected})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Generates `as_str`, `label`, `ALL`, `Display` and `FromStr` for a
/// lowercase wire enum.
macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => ($wire:literal, $label:literal)),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Value as sent on the wire
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Label shown in the console
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    _ => Err($crate::models::ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                        expected: [$($wire),+].join(", "),
                    }),
                }
            }
        }
    };
}

pub(crate) use wire_enum;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_related_accepts_both_forms() {
        let by_id: Related<Client> = serde_json::from_str("7").unwrap();
        assert_eq!(by_id.id(), 7);
        assert!(by_id.embedded().is_none());

        let embedded: Related<Client> =
            serde_json::from_str(r#"{"id": 3, "name": "Transports Martin"}"#).unwrap();
        assert_eq!(embedded.id(), 3);
        assert_eq!(embedded.embedded().unwrap().name, "Transports Martin");
    }

    #[test]
    fn test_parse_enum_error_lists_choices() {
        let err = "archived".parse::<InvoiceStatus>().unwrap_err();
        assert_eq!(err.kind, "invoice status");
        assert!(err.to_string().contains("draft, sent, paid, cancelled"));
    }
}
