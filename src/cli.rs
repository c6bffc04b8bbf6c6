use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "todolite",
    version,
    about = "Keep a to-do list in a local SQLite database"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Database file (defaults to $TODOLITE_DB, then ~/.todolite/todolite.db)"
    )]
    pub db: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = StoreKindArg::Sqlite,
        help = "Where items are kept"
    )]
    pub store: StoreKindArg,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the item table if it does not exist yet
    Init,
    /// Add a pending item
    Add(ItemAdd),
    /// Mark an item done
    Done(ItemId),
    /// Delete an item
    Remove(ItemId),
    /// Print one partition, or both
    List(ItemList),
    /// Print the pending and completed sections
    Show,
    /// Read intents from stdin, one per line
    Shell,
}

#[derive(Args, Debug)]
pub struct ItemAdd {
    pub text: String,
}

#[derive(Args, Debug)]
pub struct ItemId {
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct ItemList {
    #[arg(long, value_enum, default_value_t = ListStatusArg::All)]
    pub status: ListStatusArg,
    #[arg(long, help = "Print items as JSON")]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StoreKindArg {
    Sqlite,
    Memory,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ListStatusArg {
    Pending,
    Done,
    All,
}
