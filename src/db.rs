use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};
use url::Url;

use crate::error::AppError;

pub const DB_PATH_ENV: &str = "TODOLITE_DB";

const CREATE_ITEMS_TABLE: &str = "CREATE TABLE IF NOT EXISTS items (\
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL, \
    done INTEGER, \
    value TEXT\
);";

pub fn resolve_data_dir(home: &Path) -> PathBuf {
    home.join(".todolite")
}

pub fn resolve_default_db_path(home: &Path) -> PathBuf {
    resolve_data_dir(home).join("todolite.db")
}

/// Picks the database file: explicit flag, then `TODOLITE_DB`, then the
/// per-user default under `$HOME`.
pub fn resolve_db_path(flag: Option<PathBuf>) -> Result<PathBuf, AppError> {
    if let Some(path) = flag {
        return Ok(path);
    }

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        return Ok(resolve_default_db_path(Path::new(&home)));
    }

    Err(AppError::InvalidInput(format!(
        "unable to resolve database path; pass --db or set {DB_PATH_ENV}"
    )))
}

pub fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub fn open_lock(path: &Path) -> Result<fd_lock::RwLock<File>, AppError> {
    let lock_path = path.with_extension("lock");
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(lock_path)?;
    Ok(fd_lock::RwLock::new(file))
}

pub async fn connect(path: &Path) -> Result<DatabaseConnection, AppError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let mut url = Url::from_file_path(&absolute).map_err(|_| {
        AppError::InvalidInput(format!("invalid sqlite path: {}", path.display()))
    })?;
    url.set_query(Some("mode=rwc"));
    let sqlite_url = url.as_str().replacen("file://", "sqlite://", 1);
    open(sqlite_url).await
}

#[cfg(test)]
pub async fn connect_in_memory() -> Result<DatabaseConnection, AppError> {
    open("sqlite::memory:".to_string()).await
}

// A single pooled connection keeps every store operation serialized and
// keeps an in-memory database alive for the lifetime of the pool.
async fn open(url: String) -> Result<DatabaseConnection, AppError> {
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    Ok(Database::connect(options).await?)
}

pub async fn ensure_schema<C: ConnectionTrait>(db: &C) -> Result<(), AppError> {
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        CREATE_ITEMS_TABLE,
    ))
    .await?;
    Ok(())
}
