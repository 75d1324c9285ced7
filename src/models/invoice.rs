//! Invoices issued from validated timesheets

use serde::{Deserialize, Serialize};

use super::{decimal, wire_enum, Client, Id, Related, Resource, WeeklyTimesheet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Cancelled,
}

wire_enum!(InvoiceStatus, "invoice status", {
    Draft => ("draft", "Brouillon"),
    Sent => ("sent", "Envoyée"),
    Paid => ("paid", "Payée"),
    Cancelled => ("cancelled", "Annulée"),
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Id,
    pub timesheet: Related<WeeklyTimesheet>,
    pub invoice_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Related<Client>>,
    #[serde(deserialize_with = "decimal::deserialize")]
    pub amount: String,
    pub status: InvoiceStatus,
    pub created_at: String,
}

impl Invoice {
    pub fn timesheet_id(&self) -> Id {
        self.timesheet.id()
    }

    pub fn client_name(&self) -> Option<&str> {
        self.client
            .as_ref()
            .and_then(Related::embedded)
            .map(|c| c.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewInvoice {
    pub timesheet: Id,
    pub invoice_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Id>,
    pub amount: String,
    pub status: InvoiceStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
}

impl InvoicePatch {
    pub fn status(status: InvoiceStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl Resource for Invoice {
    type Draft = NewInvoice;
    type Patch = InvoicePatch;

    const COLLECTION: &'static str = "invoices";
    const LABEL: &'static str = "invoice";

    fn id(&self) -> Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_stays_textual() {
        let json = r#"{"id": 1, "timesheet": 4, "invoice_number": "F-2024-001",
                       "amount": "1499.99", "status": "sent", "created_at": "2024-01-09T10:00:00Z"}"#;
        let invoice: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.amount, "1499.99");
        assert_eq!(invoice.timesheet_id(), 4);
        assert_eq!(invoice.status, InvoiceStatus::Sent);
        assert!(invoice.client_name().is_none());

        let back = serde_json::to_value(&invoice).unwrap();
        assert_eq!(back["amount"], "1499.99");
    }

    #[test]
    fn test_float_amount_is_decode_error() {
        for amount in ["420.10", "12345678901234567.89"] {
            let json = format!(
                r#"{{"id": 1, "timesheet": 4, "invoice_number": "F-1", "amount": {amount},
                     "status": "draft", "created_at": "2024-01-09T10:00:00Z"}}"#
            );
            assert!(serde_json::from_str::<Invoice>(&json).is_err(), "{amount}");
        }

        let json = r#"{"id": 1, "timesheet": 4, "invoice_number": "F-1", "amount": "420.10",
                       "status": "draft", "created_at": "2024-01-09T10:00:00Z"}"#;
        let invoice: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.amount, "420.10");
    }

    #[test]
    fn test_status_patch() {
        let patch = InvoicePatch::status(InvoiceStatus::Paid);
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({"status": "paid"})
        );
        assert_eq!(InvoiceStatus::Cancelled.label(), "Annulée");
    }
}
