//! Inventory Dashboard Example
//!
//! Loads the inventory from a running household backend and prints:
//! - the dashboard headline
//! - the first page of the inventory table, optionally filtered
//! - the current task list
//!
//! Usage: `cargo run --example inventory_dashboard -- [config.yaml] [filter]`

use anyhow::Result;
use household::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (RUST_LOG=household=debug for request logs)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => HouseholdConfig::from_yaml_file(&path)?,
        None => HouseholdConfig::default(),
    };
    let filter = args.next();

    println!("🏠 Household backend: {}", config.api.base_url);

    let client = RemoteClient::from_config(&config.api)?;
    let storage = config.session.open_storage();
    let store = MirrorStore::with_session(storage, &config.session.namespace)?;

    let mut inventory = InventoryView::new(client.clone(), store.clone(), &config.table)?;
    inventory.load().await?;

    let dashboard = Dashboard::new(store.clone());
    println!("📦 {}", dashboard.inventory_headline());

    if let Some(query) = filter {
        inventory.table_mut().set_global_filter(query);
    }

    let table = inventory.table();
    let headers: Vec<&str> = table.columns().iter().map(|c| c.header.as_str()).collect();
    println!("\n{}", headers.join(" | "));
    for row in table.render_page() {
        let marker = match row.severity {
            Some(Severity::Violation) => "🔴",
            Some(Severity::Warning) => "🟡",
            _ => "  ",
        };
        println!("{} {}", marker, row.cells.join(" | "));
    }
    let meta = table.page().meta;
    println!(
        "\nPage {} of {} ({} rows)",
        meta.page_index + 1,
        meta.page_count,
        table.pre_pagination_count()
    );

    let tasks = TaskListView::new(client, config.polling.task_refresh());
    match tasks.load().await {
        Ok(list) => {
            println!("\n📝 Tasks");
            for task in list.iter() {
                println!("  - {}", task.title);
            }
        }
        Err(e) => println!("\n⚠️  {}", e),
    }

    store.end_session()?;
    Ok(())
}
