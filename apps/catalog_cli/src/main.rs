use std::path::PathBuf;

use anyhow::{Context, Result};
use catalog_core::{
    view::{ListView, ProductDetailView, NO_ROWS},
    CatalogClient, CatalogEvent, DetailState, PageButton, PaginationWindow, QueryState, ShapeMode,
    SortSpec,
};
use catalog_types::domain::{Category, PageSize, SortKey};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser, Debug)]
#[command(about = "Browse a product catalog served over HTTP")]
struct Cli {
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Overrides the configured catalog base URL.
    #[arg(long)]
    server_url: Option<String>,
    /// Reject list items with missing or mistyped fields.
    #[arg(long)]
    strict: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists one page of products.
    List {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value_t = Category::All)]
        category: Category,
        #[arg(long, default_value_t = SortKey::NameAZ)]
        sort: SortKey,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<PageSize>,
    },
    /// Shows one product.
    Show { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = config::load_settings(&cli.config);
    if let Some(url) = cli.server_url {
        settings.server_url = url;
    }
    if cli.strict {
        settings.payload_mode = ShapeMode::Strict;
    }

    let client = CatalogClient::new(settings).context("failed to build catalog client")?;
    let mut events = client.subscribe_events();

    match cli.command {
        Command::List {
            query,
            category,
            sort,
            page,
            limit,
        } => {
            let mut initial = QueryState::new(limit.unwrap_or(client.settings().default_page_size));
            initial.set_query(query);
            initial.set_category(category);
            initial.set_sort(SortSpec::new(sort));
            initial.set_page(page);

            let session = client.open_list_with(initial);
            let mut state = session.subscribe();
            let state = state
                .wait_for(|state| !state.is_loading())
                .await
                .context("list session closed before the page arrived")?
                .clone();
            print_list(&ListView::new(&state, session.query_state()));
        }
        Command::Show { id } => {
            let detail = client.product_detail(&id).await;
            print_detail(&detail);
        }
    }

    print_notifications(&mut events);
    Ok(())
}

fn print_list(view: &ListView) {
    match view {
        ListView::Loading => println!("Loading..."),
        ListView::Error(message) => println!("Error: {message}"),
        ListView::Table { rows, pagination } => {
            if rows.is_empty() {
                println!("{NO_ROWS}");
            }
            for row in rows {
                println!(
                    "{:<32} {:>10}  {:<12} {:<13} {}",
                    row.link_label, row.price_label, row.category, row.stock_label, row.href
                );
            }
            println!("{}", render_pagination(pagination));
        }
    }
}

fn render_pagination(window: &PaginationWindow) -> String {
    let mut parts = Vec::with_capacity(window.buttons().len() + 2);
    parts.push(if window.previous_enabled() { "<" } else { " " }.to_string());
    for button in window.buttons() {
        parts.push(match button {
            PageButton::Page {
                number,
                active: true,
            } => format!("[{number}]"),
            PageButton::Page { number, .. } => number.to_string(),
            PageButton::Ellipsis => "...".to_string(),
        });
    }
    parts.push(if window.next_enabled() { ">" } else { " " }.to_string());
    parts.join(" ")
}

fn print_detail(detail: &DetailState) {
    match (ProductDetailView::from_state(detail), detail.error()) {
        (Some(view), _) => {
            println!("{}", view.name);
            println!("  Price:       {}", view.price_label);
            println!("  Category:    {}", view.category);
            println!("  In stock:    {}", view.stock_label);
            println!("  Description: {}", view.description);
        }
        (None, Some(error)) => println!("Error: {error}"),
        (None, None) => println!("Loading..."),
    }
}

fn print_notifications(events: &mut broadcast::Receiver<CatalogEvent>) {
    while let Ok(event) = events.try_recv() {
        if let CatalogEvent::Notification(notification) = event {
            eprintln!(
                "[{}] {}",
                notification.raised_at.format("%H:%M:%S"),
                notification.message
            );
        }
    }
}
