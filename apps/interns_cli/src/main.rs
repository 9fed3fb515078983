use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    controller::events::NO_RESULTS_NOTICE, ApiOptions, FixedConfirmer, HttpInternsApi,
    InternFilters, InternsPage, PageEvent, PagePorts, PageView,
};
use shared::{domain::InternId, protocol::Location};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::{load_settings, normalize_base_url};
use terminal::{PrintingNavigator, StderrNotifier, StdinConfirmer};

#[derive(Parser, Debug)]
#[command(about = "Browse, message, and remove intern registrations")]
struct Args {
    /// Overrides the API base URL from settings.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List interns, optionally filtered server-side.
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "")]
        skills: String,
        #[arg(long, default_value = "")]
        school: String,
    },
    /// Delete an intern registration after confirmation.
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Start a direct-message thread with an intern.
    Dm { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings()?;
    if let Some(url) = args.api_url {
        settings.api_base_url = normalize_base_url(&url)?;
    }
    if let Some(token) = args.token {
        settings.api_token = Some(token);
    }
    info!(api_base_url = %settings.api_base_url, "using interns api");

    let api = HttpInternsApi::new(ApiOptions {
        base_url: settings.api_base_url.clone(),
        token: settings.api_token.clone(),
        timeout: settings.request_timeout(),
    })
    .context("failed to build http client")?;
    let api = Arc::new(api);
    let navigator = PrintingNavigator::default();

    match args.command {
        Command::List {
            search,
            skills,
            school,
        } => {
            let ports = PagePorts::new(StdinConfirmer, StderrNotifier, navigator.clone());
            let mut page =
                InternsPage::with_filters(api, ports, InternFilters::new(search, skills, school));
            page.open();
            page.settle().await;
            print_view(&page.view());
        }
        Command::Delete { id, yes } => {
            let ports = if yes {
                PagePorts::new(FixedConfirmer(true), StderrNotifier, navigator.clone())
            } else {
                PagePorts::new(StdinConfirmer, StderrNotifier, navigator.clone())
            };
            let mut page = InternsPage::new(api, ports);
            page.dispatch(PageEvent::DeleteClicked(InternId(id)));
            page.settle().await;
            if page.view().loaded {
                print_view(&page.view());
            }
        }
        Command::Dm { id } => {
            let ports = PagePorts::new(StdinConfirmer, StderrNotifier, navigator.clone());
            let mut page = InternsPage::new(api, ports);
            page.dispatch(PageEvent::StartThreadClicked(InternId(id)));
            page.settle().await;
        }
    }

    if navigator.last() == Some(Location::Login) {
        anyhow::bail!("authentication required; sign in at {}", Location::Login.path());
    }
    Ok(())
}

fn print_view(view: &PageView) {
    if view.no_results {
        println!("{NO_RESULTS_NOTICE}");
    }
    for row in &view.rows {
        println!("[{}] {}  {}  ({})", row.id, row.display_name, row.subtitle, row.detail_path);
    }
}
