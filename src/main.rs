mod cli;
mod db;
mod entities;
mod error;
mod model;
mod presenter;
mod shell;
mod store;
mod util;

use std::io;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, ItemAdd, ItemId, ItemList, ListStatusArg, StoreKindArg};
use crate::error::AppError;
use crate::model::{Item, ItemStatus};
use crate::presenter::{ListPresenter, SubmitOutcome};
use crate::store::{ItemStore, MemoryStore, SqliteStore};
use crate::util::format_item_list;

const DEFAULT_LOG_FILTER: &str = "todolite=warn";

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

// Logs go to stderr so stdout carries only the list.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

async fn run() -> Result<(), AppError> {
    let Cli {
        db: db_flag,
        store,
        command,
    } = Cli::parse();

    match store {
        StoreKindArg::Memory => {
            let store = MemoryStore::new();
            with_store(&store, command).await
        }
        StoreKindArg::Sqlite => {
            let db_path = db::resolve_db_path(db_flag)?;
            db::ensure_parent_dir(&db_path)?;
            let mut lock = db::open_lock(&db_path)?;
            let _guard = lock.write()?;

            let conn = db::connect(&db_path).await?;
            debug!(path = %db_path.display(), "database opened");
            let store = SqliteStore::new(conn);
            with_store(&store, command).await
        }
    }
}

async fn with_store(store: &dyn ItemStore, command: Command) -> Result<(), AppError> {
    store.initialize().await?;
    let result = handle_command(store, command).await;
    let closed = store.close().await;
    result.and(closed)
}

async fn handle_command(store: &dyn ItemStore, command: Command) -> Result<(), AppError> {
    match command {
        Command::Init => {
            println!("Item store ready.");
            Ok(())
        }
        Command::Add(args) => handle_add(store, args).await,
        Command::Done(args) => handle_done(store, args).await,
        Command::Remove(args) => handle_remove(store, args).await,
        Command::List(args) => handle_list(store, args).await,
        Command::Show => handle_show(store).await,
        Command::Shell => handle_shell(store).await,
    }
}

async fn handle_add(store: &dyn ItemStore, args: ItemAdd) -> Result<(), AppError> {
    let mut presenter = ListPresenter::new(store);
    presenter.load().await?;
    match presenter.submit_new(Some(args.text.as_str())).await? {
        SubmitOutcome::Added(item) => {
            println!("Added item ID: {}", item.id);
            print_view(&presenter)
        }
        SubmitOutcome::Rejected => Err(AppError::InvalidInput(
            "item text cannot be empty".to_string(),
        )),
    }
}

async fn handle_done(store: &dyn ItemStore, args: ItemId) -> Result<(), AppError> {
    let mut presenter = ListPresenter::new(store);
    presenter.load().await?;
    if presenter.complete(args.id).await? {
        println!("Item ID: {} marked done.", args.id);
    } else {
        println!("No pending item with ID: {}.", args.id);
    }
    print_view(&presenter)
}

async fn handle_remove(store: &dyn ItemStore, args: ItemId) -> Result<(), AppError> {
    let mut presenter = ListPresenter::new(store);
    presenter.load().await?;
    if presenter.remove(args.id).await? {
        println!("Item ID: {} removed.", args.id);
    } else {
        println!("No item with ID: {}.", args.id);
    }
    print_view(&presenter)
}

async fn handle_list(store: &dyn ItemStore, args: ItemList) -> Result<(), AppError> {
    let items = match args.status {
        ListStatusArg::Pending => store.list_by_status(ItemStatus::Pending).await?,
        ListStatusArg::Done => store.list_by_status(ItemStatus::Done).await?,
        ListStatusArg::All => list_all(store).await?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    if items.is_empty() {
        println!("{}", shell::EMPTY_VIEW);
        return Ok(());
    }
    println!("{}", format_item_list(&items));
    Ok(())
}

async fn handle_show(store: &dyn ItemStore) -> Result<(), AppError> {
    let mut presenter = ListPresenter::new(store);
    presenter.load().await?;
    print_view(&presenter)
}

async fn handle_shell(store: &dyn ItemStore) -> Result<(), AppError> {
    let mut presenter = ListPresenter::new(store);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    shell::run(&mut presenter, stdin.lock(), &mut stdout, &mut stderr).await
}

async fn list_all(store: &dyn ItemStore) -> Result<Vec<Item>, AppError> {
    let mut items = store.list_by_status(ItemStatus::Pending).await?;
    items.extend(store.list_by_status(ItemStatus::Done).await?);
    items.sort_by_key(|item| item.id);
    Ok(items)
}

fn print_view(presenter: &ListPresenter<'_>) -> Result<(), AppError> {
    shell::write_view(&mut io::stdout(), presenter)
}
