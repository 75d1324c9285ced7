//! Backoffice console
//!
//! Command-line front end for the back-office pages:
//! - Dashboard counters
//! - Documents: list, search, upload, delete
//! - Timesheets, clients, invoices and daily entries: list, show, create, delete

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use backoffice::config::generate_default_config;
use backoffice::logging::init_logging;
use backoffice::models::{InvoicePatch, NewClient, NewInvoice, NewTimesheet, Resource};
use backoffice::pages::{Dashboard, DeleteOutcome};
use backoffice::shell::{greeting_now, sidebar, Page, Table, Tabular};
use backoffice::{
    ApiClient, ClientsPage, Config, Confirm, Controller, DocumentsPage, EntriesPage, Id,
    InvoiceStatus, InvoicesPage, Notifier, TimesheetStatus, TimesheetsPage, UploadFile,
};

#[derive(Parser)]
#[command(name = "backoffice")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fleet back-office console")]
#[command(long_about = "Manage uploaded documents, weekly timesheets, daily entries, clients and invoices\nstored on the back-office REST server.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Do not ask before deleting
    #[arg(short, long, global = true)]
    pub yes: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show dashboard counters
    Dashboard,

    /// Uploaded documents
    Documents {
        #[command(subcommand)]
        action: DocumentsCommand,
    },

    /// Weekly timesheets
    Timesheets {
        #[command(subcommand)]
        action: TimesheetsCommand,
    },

    /// Clients
    Clients {
        #[command(subcommand)]
        action: ClientsCommand,
    },

    /// Invoices
    Invoices {
        #[command(subcommand)]
        action: InvoicesCommand,
    },

    /// Daily timesheet entries
    Entries {
        #[command(subcommand)]
        action: EntriesCommand,
    },

    /// List the application pages
    Pages,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum DocumentsCommand {
    List {
        /// Only documents whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    Show {
        id: Id,
    },
    /// Upload a file for extraction
    Upload {
        path: PathBuf,
    },
    Delete {
        id: Id,
    },
}

#[derive(Subcommand)]
pub enum TimesheetsCommand {
    List {
        /// pending, validated or invoiced
        #[arg(short, long)]
        status: Option<TimesheetStatus>,
    },
    Show {
        id: Id,
    },
    Create {
        name: String,
        /// First day of the week (YYYY-MM-DD)
        #[arg(long)]
        week_start: String,
        /// Last day of the week (YYYY-MM-DD)
        #[arg(long)]
        week_end: String,
        #[arg(long)]
        vehicle: Option<String>,
        #[arg(long)]
        city: Option<String>,
        /// Client id
        #[arg(long)]
        client: Option<Id>,
        /// Source document id
        #[arg(long)]
        document: Option<Id>,
        #[arg(long, default_value = "pending")]
        status: TimesheetStatus,
    },
    SetStatus {
        id: Id,
        status: TimesheetStatus,
    },
    Delete {
        id: Id,
    },
}

#[derive(Subcommand)]
pub enum ClientsCommand {
    List,
    Show {
        id: Id,
    },
    Create {
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    Delete {
        id: Id,
    },
}

#[derive(Subcommand)]
pub enum InvoicesCommand {
    List,
    Show {
        id: Id,
    },
    Create {
        /// Timesheet id
        timesheet: Id,
        /// Invoice number, e.g. F-2024-001
        #[arg(long)]
        number: String,
        /// Amount, e.g. 420.00
        #[arg(long)]
        amount: String,
        /// Client id
        #[arg(long)]
        client: Option<Id>,
        #[arg(long, default_value = "draft")]
        status: InvoiceStatus,
    },
    SetStatus {
        id: Id,
        status: InvoiceStatus,
    },
    Delete {
        id: Id,
    },
}

#[derive(Subcommand)]
pub enum EntriesCommand {
    List {
        /// Only entries of this timesheet
        #[arg(short, long)]
        timesheet: Option<Id>,
    },
    Show {
        id: Id,
    },
    Delete {
        id: Id,
    },
}

/// Delete confirmation read from stdin
struct Prompt {
    assume_yes: bool,
}

impl Confirm for Prompt {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{} [y/N] ", message);
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "o" | "oui")
    }
}

struct Console {
    api: ApiClient,
    notifier: Notifier,
    format: OutputFormat,
    prompt: Prompt,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    init_logging(&config.logging)?;

    tracing::debug!(base_url = %config.api.base_url, "backoffice v{}", env!("CARGO_PKG_VERSION"));

    let console = Console {
        api: ApiClient::new(&config.api)?,
        notifier: Notifier::new(&config.notifications),
        format: cli.format,
        prompt: Prompt {
            assume_yes: cli.yes,
        },
    };

    let result = console.run(cli.command).await;

    let shown = console.notifier.drain();
    for notification in &shown {
        eprintln!("{}", notification);
    }

    match result {
        // Page failures were already reported as notifications
        Err(err) if !shown.is_empty() => {
            tracing::debug!(error = %err, "command failed");
            std::process::exit(1);
        }
        other => other,
    }
}

impl Console {
    async fn run(&self, command: Commands) -> anyhow::Result<()> {
        match command {
            Commands::Dashboard => self.dashboard().await,
            Commands::Documents { action } => self.documents(action).await,
            Commands::Timesheets { action } => self.timesheets(action).await,
            Commands::Clients { action } => self.clients(action).await,
            Commands::Invoices { action } => self.invoices(action).await,
            Commands::Entries { action } => self.entries(action).await,
            Commands::Pages => {
                println!("{}", greeting_now());
                println!();
                println!("{}", sidebar(Page::Home));
                Ok(())
            }
            Commands::Config { .. } => Ok(()),
        }
    }

    async fn dashboard(&self) -> anyhow::Result<()> {
        let mut home = Dashboard::new(self.api.clone(), self.notifier.clone());
        home.mount().await?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(home.stats())?),
            OutputFormat::Table => {
                println!("{}", greeting_now());
                println!();
                println!("Tableau de bord");
                for (label, value) in home.stats().cards() {
                    println!("  {:<20} {}", label, value);
                }
            }
        }
        Ok(())
    }

    async fn documents(&self, action: DocumentsCommand) -> anyhow::Result<()> {
        let mut page = DocumentsPage::new(self.api.clone(), self.notifier.clone());

        match action {
            DocumentsCommand::List { search } => {
                page.mount().await?;
                if let Some(search) = search {
                    page.set_search(search);
                }
                self.print_records(page.visible(), "documents")?;
            }
            DocumentsCommand::Show { id } => self.show(&mut *page, id).await?,
            DocumentsCommand::Upload { path } => {
                let file = UploadFile::from_path(&path)
                    .await
                    .with_context(|| format!("reading {}", path.display()))?;
                page.open_upload();
                page.select_file(file);
                let doc = page.upload().await?;
                self.print_records([&doc], "documents")?;
            }
            DocumentsCommand::Delete { id } => self.delete(&mut *page, id).await?,
        }
        Ok(())
    }

    async fn timesheets(&self, action: TimesheetsCommand) -> anyhow::Result<()> {
        let mut page = TimesheetsPage::new(self.api.clone(), self.notifier.clone());

        match action {
            TimesheetsCommand::List { status } => {
                page.mount().await?;
                page.set_status_filter(status);
                self.print_records(page.visible(), "timesheets")?;
            }
            TimesheetsCommand::Show { id } => {
                let timesheet = page.open_detail(id).await?;
                self.print_records([&timesheet], "timesheets")?;
                if self.format == OutputFormat::Table && !timesheet.entries.is_empty() {
                    println!();
                    println!("{}", Table::from_records(&timesheet.entries));
                }
            }
            TimesheetsCommand::Create {
                name,
                week_start,
                week_end,
                vehicle,
                city,
                client,
                document,
                status,
            } => {
                page.open_create();
                if let Some(form) = page.form_mut() {
                    *form = NewTimesheet {
                        name,
                        vehicle,
                        week_start,
                        week_end,
                        city,
                        client_id: client,
                        document_id: document,
                        status,
                        ..form.clone()
                    };
                }
                let created = page.submit_create().await?;
                self.print_records([&created], "timesheets")?;
            }
            TimesheetsCommand::SetStatus { id, status } => {
                let updated = page.set_status(id, status).await?;
                self.print_records([&updated], "timesheets")?;
            }
            TimesheetsCommand::Delete { id } => self.delete(&mut *page, id).await?,
        }
        Ok(())
    }

    async fn clients(&self, action: ClientsCommand) -> anyhow::Result<()> {
        let mut page: ClientsPage<ApiClient> =
            Controller::new(self.api.clone(), self.notifier.clone());

        match action {
            ClientsCommand::List => self.list(&mut page).await?,
            ClientsCommand::Show { id } => self.show(&mut page, id).await?,
            ClientsCommand::Create {
                name,
                email,
                phone,
                address,
            } => {
                page.open_create();
                if let Some(form) = page.form_mut() {
                    *form = NewClient {
                        name,
                        email,
                        phone,
                        address,
                    };
                }
                let created = page.submit_create().await?;
                self.print_records([&created], "clients")?;
            }
            ClientsCommand::Delete { id } => self.delete(&mut page, id).await?,
        }
        Ok(())
    }

    async fn invoices(&self, action: InvoicesCommand) -> anyhow::Result<()> {
        let mut page: InvoicesPage<ApiClient> =
            Controller::new(self.api.clone(), self.notifier.clone());

        match action {
            InvoicesCommand::List => self.list(&mut page).await?,
            InvoicesCommand::Show { id } => self.show(&mut page, id).await?,
            InvoicesCommand::Create {
                timesheet,
                number,
                amount,
                client,
                status,
            } => {
                page.open_create();
                if let Some(form) = page.form_mut() {
                    *form = NewInvoice {
                        timesheet,
                        invoice_number: number,
                        client_id: client,
                        amount,
                        status,
                    };
                }
                let created = page.submit_create().await?;
                self.print_records([&created], "invoices")?;
            }
            InvoicesCommand::SetStatus { id, status } => {
                let updated = page.update(id, &InvoicePatch::status(status)).await?;
                self.print_records([&updated], "invoices")?;
            }
            InvoicesCommand::Delete { id } => self.delete(&mut page, id).await?,
        }
        Ok(())
    }

    async fn entries(&self, action: EntriesCommand) -> anyhow::Result<()> {
        let mut page: EntriesPage<ApiClient> =
            Controller::new(self.api.clone(), self.notifier.clone());

        match action {
            EntriesCommand::List { timesheet } => {
                page.mount().await?;
                let visible = page
                    .items()
                    .iter()
                    .filter(|e| timesheet.is_none() || e.timesheet_id() == timesheet);
                self.print_records(visible, "entries")?;
            }
            EntriesCommand::Show { id } => self.show(&mut page, id).await?,
            EntriesCommand::Delete { id } => self.delete(&mut page, id).await?,
        }
        Ok(())
    }

    async fn list<R: Resource + Tabular>(
        &self,
        page: &mut Controller<R, ApiClient>,
    ) -> anyhow::Result<()> {
        page.mount().await?;
        self.print_records(page.items(), R::COLLECTION)
    }

    async fn show<R: Resource + Tabular>(
        &self,
        page: &mut Controller<R, ApiClient>,
        id: Id,
    ) -> anyhow::Result<()> {
        let record = page.open_detail(id).await?;
        self.print_records([&record], R::COLLECTION)
    }

    async fn delete<R: Resource>(
        &self,
        page: &mut Controller<R, ApiClient>,
        id: Id,
    ) -> anyhow::Result<()> {
        if page.delete(id, &self.prompt).await? == DeleteOutcome::Cancelled {
            eprintln!("Cancelled");
        }
        Ok(())
    }

    fn print_records<'a, T>(
        &self,
        records: impl IntoIterator<Item = &'a T>,
        collection: &str,
    ) -> anyhow::Result<()>
    where
        T: Tabular + Serialize + 'a,
    {
        let records: Vec<&T> = records.into_iter().collect();

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
            OutputFormat::Table if records.is_empty() => println!("No {} yet.", collection),
            OutputFormat::Table => println!("{}", Table::from_records(records)),
        }
        Ok(())
    }
}
