//! Plain-text tables for console output

use crate::models::{Client, DailyEntry, Invoice, UploadedDocument, WeeklyTimesheet};

/// Column-aligned text table
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from records
    pub fn from_records<'a, T: Tabular + 'a>(records: impl IntoIterator<Item = &'a T>) -> Self {
        let mut table = Self::new(T::headers().iter().copied());
        for record in records {
            table.push(record.row());
        }
        table
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }

        let line = |cells: &[String]| {
            cells
                .iter()
                .enumerate()
                .map(|(i, cell)| pad(cell, widths[i]))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        let mut out = vec![line(&self.headers), "-".repeat(total)];
        out.extend(self.rows.iter().map(|row| line(row)));
        out.join("\n")
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

// `{:<n}` pads by chars, which is what the widths count
fn pad(cell: &str, width: usize) -> String {
    format!("{:<width$}", cell, width = width)
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Records that can be listed as table rows
pub trait Tabular {
    fn headers() -> &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

impl Tabular for Client {
    fn headers() -> &'static [&'static str] {
        &["ID", "Nom", "Email", "Téléphone"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            or_dash(self.email.as_deref()),
            or_dash(self.phone.as_deref()),
        ]
    }
}

impl Tabular for UploadedDocument {
    fn headers() -> &'static [&'static str] {
        &["ID", "Fichier", "Date", "Statut", "Km"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.file_name().to_string(),
            self.uploaded_at.chars().take(10).collect(),
            self.status.label().to_string(),
            or_dash(self.km_total.as_deref()),
        ]
    }
}

impl Tabular for WeeklyTimesheet {
    fn headers() -> &'static [&'static str] {
        &["ID", "Nom", "Semaine", "Client", "Km", "Heures", "Statut"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            format!("{} → {}", self.week_start, self.week_end),
            match (self.client_name(), self.client_ref()) {
                (Some(name), _) => name.to_string(),
                (None, Some(id)) => format!("#{}", id),
                (None, None) => "-".to_string(),
            },
            self.km_total.clone(),
            self.total_hours.clone(),
            self.status.label().to_string(),
        ]
    }
}

impl Tabular for DailyEntry {
    fn headers() -> &'static [&'static str] {
        &["ID", "Feuille", "Jour", "Entrée", "Sortie", "Heures", "Km"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.timesheet_id()
                .map(|id| format!("#{}", id))
                .unwrap_or_else(|| "-".to_string()),
            self.day.label().to_string(),
            or_dash(self.entry_time.as_deref()),
            or_dash(self.exit_time.as_deref()),
            self.total_hours.clone(),
            or_dash(self.km.as_deref()),
        ]
    }
}

impl Tabular for Invoice {
    fn headers() -> &'static [&'static str] {
        &["ID", "Numéro", "Feuille", "Client", "Montant", "Statut"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.invoice_number.clone(),
            format!("#{}", self.timesheet_id()),
            or_dash(self.client_name()),
            self.amount.clone(),
            self.status.label().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_align() {
        let mut table = Table::new(["ID", "Nom"]);
        table.push(vec!["1".to_string(), "Transports Martin".to_string()]);
        table.push(vec!["12".to_string(), "Élan".to_string()]);

        let rendered = table.render();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "ID  Nom");
        assert_eq!(lines[1], "-".repeat(2 + 2 + 17));
        assert_eq!(lines[2], "1   Transports Martin");
        assert_eq!(lines[3], "12  Élan");
    }

    #[test]
    fn test_client_rows() {
        let clients: Vec<Client> = serde_json::from_str(
            r#"[{"id": 1, "name": "ACME", "email": "a@acme.fr"}, {"id": 2, "name": "Dupont"}]"#,
        )
        .unwrap();

        let table = Table::from_records(&clients);
        assert!(!table.is_empty());
        let rendered = table.to_string();
        assert!(rendered.starts_with("ID  Nom"));
        assert!(rendered.lines().nth(3).unwrap().contains("Dupont  -"));
    }
}
