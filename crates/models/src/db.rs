use once_cell::sync::Lazy;
use sea_orm::{Database, DatabaseConnection};
use std::env;

pub static DATABASE_URL: Lazy<String> = Lazy::new(|| {
    // Load .env if present
    let _ = dotenvy::dotenv();
    env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/loopin.sqlite?mode=rwc".to_string())
});

pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(DATABASE_URL.as_str()).await?;
    Ok(db)
}
