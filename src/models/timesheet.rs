//! Weekly timesheets and their daily entries

use serde::{Deserialize, Serialize};

use super::{decimal, wire_enum, Client, Id, Related, Resource, UploadedDocument};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimesheetStatus {
    #[default]
    Pending,
    Validated,
    Invoiced,
}

wire_enum!(TimesheetStatus, "timesheet status", {
    Pending => ("pending", "En attente"),
    Validated => ("validated", "Validé"),
    Invoiced => ("invoiced", "Facturé"),
});

/// Day of a timesheet week, Sunday first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Dimanche,
    #[default]
    Lundi,
    Mardi,
    Mercredi,
    Jeudi,
    Vendredi,
    Samedi,
}

wire_enum!(Weekday, "day", {
    Dimanche => ("dimanche", "Dimanche"),
    Lundi => ("lundi", "Lundi"),
    Mardi => ("mardi", "Mardi"),
    Mercredi => ("mercredi", "Mercredi"),
    Jeudi => ("jeudi", "Jeudi"),
    Vendredi => ("vendredi", "Vendredi"),
    Samedi => ("samedi", "Samedi"),
});

/// One vehicle/driver week.
///
/// `client` and `document` are read in whichever form the server sends;
/// some endpoints return the sibling `client_id` / `document_id` instead, so
/// use [`client_ref`](Self::client_ref) and
/// [`document_ref`](Self::document_ref) rather than the raw fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTimesheet {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    pub week_start: String,
    pub week_end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Related<Client>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Id>,
    #[serde(deserialize_with = "decimal::deserialize")]
    pub km_total: String,
    #[serde(
        default,
        deserialize_with = "decimal::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub consumables: Option<String>,
    #[serde(deserialize_with = "decimal::deserialize")]
    pub total_hours: String,
    pub status: TimesheetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Related<UploadedDocument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<Id>,
    #[serde(default)]
    pub entries: Vec<DailyEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl WeeklyTimesheet {
    pub fn client_ref(&self) -> Option<Id> {
        self.client.as_ref().map(Related::id).or(self.client_id)
    }

    pub fn document_ref(&self) -> Option<Id> {
        self.document.as_ref().map(Related::id).or(self.document_id)
    }

    /// Client name when the server embedded the client
    pub fn client_name(&self) -> Option<&str> {
        self.client
            .as_ref()
            .and_then(Related::embedded)
            .map(|c| c.name.as_str())
    }

    /// Kilometres reported by the source document, when embedded
    pub fn document_km(&self) -> Option<&str> {
        self.document
            .as_ref()
            .and_then(Related::embedded)
            .and_then(|d| d.km_total.as_deref())
    }
}

/// Timesheet creation payload; relationships are sent as bare ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewTimesheet {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    pub week_start: String,
    pub week_end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub km_total: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumables: Option<String>,
    pub status: TimesheetStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimesheetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub km_total: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumables: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TimesheetStatus>,
}

impl TimesheetPatch {
    pub fn status(status: TimesheetStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl Resource for WeeklyTimesheet {
    type Draft = NewTimesheet;
    type Patch = TimesheetPatch;

    const COLLECTION: &'static str = "timesheets";
    const LABEL: &'static str = "timesheet";

    fn id(&self) -> Id {
        self.id
    }
}

/// One day of a timesheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub id: Id,
    /// Parent timesheet; nested entries inside a timesheet may omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timesheet: Option<Related<WeeklyTimesheet>>,
    pub day: Weekday,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<String>,
    #[serde(deserialize_with = "decimal::deserialize")]
    pub transport_hours: String,
    pub meals: bool,
    pub perdiem: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "decimal::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub km: Option<String>,
    #[serde(
        default,
        deserialize_with = "decimal::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub consumables: Option<String>,
    #[serde(deserialize_with = "decimal::deserialize")]
    pub total_hours: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl DailyEntry {
    pub fn timesheet_id(&self) -> Option<Id> {
        self.timesheet.as_ref().map(Related::id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewEntry {
    pub timesheet: Id,
    pub day: Weekday,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<String>,
    pub transport_hours: String,
    pub meals: bool,
    pub perdiem: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub km: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumables: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<Weekday>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meals: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perdiem: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub km: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumables: Option<String>,
}

impl Resource for DailyEntry {
    type Draft = NewEntry;
    type Patch = EntryPatch;

    const COLLECTION: &'static str = "entries";
    const LABEL: &'static str = "daily entry";

    fn id(&self) -> Id {
        self.id
    }
}
