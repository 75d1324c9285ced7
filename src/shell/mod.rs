//! Application shell
//!
//! Navigation between pages and the greeting shown in the top bar.

mod table;

pub use table::{Table, Tabular};

use chrono::Timelike;

/// Pages reachable from the sidebar, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Documents,
    Timesheets,
    DailyEntries,
    Clients,
    Invoices,
    Settings,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Home,
        Page::Documents,
        Page::Timesheets,
        Page::DailyEntries,
        Page::Clients,
        Page::Invoices,
        Page::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Accueil",
            Page::Documents => "Documents",
            Page::Timesheets => "Feuilles de temps",
            Page::DailyEntries => "Entrées quotidiennes",
            Page::Clients => "Clients",
            Page::Invoices => "Factures",
            Page::Settings => "Paramètres",
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Documents => "/documents",
            Page::Timesheets => "/timesheets",
            Page::DailyEntries => "/daily-entries",
            Page::Clients => "/clients",
            Page::Invoices => "/invoices",
            Page::Settings => "/settings",
        }
    }

    /// Page for a route; unknown routes land on the home page
    pub fn from_route(route: &str) -> Page {
        let route = match route.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        Page::ALL
            .into_iter()
            .find(|page| page.route() == route)
            .unwrap_or(Page::Home)
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Sidebar menu with the active page marked
pub fn sidebar(active: Page) -> String {
    Page::ALL
        .iter()
        .map(|page| {
            let marker = if *page == active { ">" } else { " " };
            format!("{} {:<22} {}", marker, page.title(), page.route())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Greeting for the hour of day (0-23)
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Bonjour",
        12..=17 => "Bon après-midi",
        _ => "Bonsoir",
    }
}

pub fn greeting_now() -> &'static str {
    greeting(chrono::Local::now().hour())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_boundaries() {
        assert_eq!(greeting(0), "Bonjour");
        assert_eq!(greeting(11), "Bonjour");
        assert_eq!(greeting(12), "Bon après-midi");
        assert_eq!(greeting(17), "Bon après-midi");
        assert_eq!(greeting(18), "Bonsoir");
        assert_eq!(greeting(23), "Bonsoir");
    }

    #[test]
    fn test_routes() {
        assert_eq!(Page::from_route("/daily-entries"), Page::DailyEntries);
        assert_eq!(Page::from_route("/invoices/"), Page::Invoices);
        assert_eq!(Page::from_route("/"), Page::Home);
        assert_eq!(Page::from_route("/nowhere"), Page::Home);
        for page in Page::ALL {
            assert_eq!(Page::from_route(page.route()), page);
        }
    }

    #[test]
    fn test_sidebar_marks_active() {
        let menu = sidebar(Page::Clients);
        let lines: Vec<_> = menu.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[4].starts_with("> Clients"));
        assert!(lines[0].starts_with("  Accueil"));
    }
}
