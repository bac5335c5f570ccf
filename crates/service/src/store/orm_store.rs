use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::domain::Update;
use crate::errors::ServiceError;
use crate::store::UpdateStore;

/// Table-backed update store over SeaORM.
///
/// Atomicity is per statement only; the handler's lookup + ownership check +
/// mutate sequence is not wrapped in a transaction.
pub struct OrmUpdateStore {
    db: DatabaseConnection,
}

impl OrmUpdateStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn from_row(row: models::update::Model) -> Update {
    Update {
        id: row.id,
        name: row.name,
        message: row.message,
        timestamp: row.timestamp.with_timezone(&Utc),
    }
}

#[async_trait]
impl UpdateStore for OrmUpdateStore {
    async fn list_all(&self) -> Result<Vec<Update>, ServiceError> {
        let rows = models::update::list_desc(&self.db).await?;
        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Update>, ServiceError> {
        let row = models::update::find_by_id(&self.db, id).await?;
        Ok(row.map(from_row))
    }

    async fn insert(&self, update: Update) -> Result<(), ServiceError> {
        models::update::create(
            &self.db,
            &update.id,
            &update.name,
            &update.message,
            update.timestamp,
        )
        .await?;
        Ok(())
    }

    async fn update_fields(
        &self,
        id: &str,
        message: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<bool, ServiceError> {
        Ok(models::update::set_message(&self.db, id, message, timestamp).await?)
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        Ok(models::update::delete_by_id(&self.db, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::MigratorTrait;

    async fn setup_store() -> OrmUpdateStore {
        let db = sea_orm::Database::connect("sqlite::memory:")
            .await
            .expect("sqlite memory");
        migration::Migrator::up(&db, None).await.expect("migrate up");
        OrmUpdateStore::new(db)
    }

    #[tokio::test]
    async fn trait_round_trip_matches_file_backend_contract() {
        let store = setup_store().await;
        assert!(store.list_all().await.expect("list").is_empty());

        let first = Update::new("Kamran Arbaz", "hello");
        let mut second = Update::new("Abigail Das", "newer");
        // force a strictly later timestamp so the ordering assertion is stable
        second.timestamp = first.timestamp + chrono::Duration::seconds(1);
        store.insert(first.clone()).await.expect("insert");
        store.insert(second.clone()).await.expect("insert");

        let all = store.list_all().await.expect("list");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);

        let found = store.get(&first.id).await.expect("get").expect("present");
        assert_eq!(found.message, "hello");

        assert!(store.update_fields(&first.id, "edited", Utc::now()).await.expect("edit"));
        let found = store.get(&first.id).await.expect("get").expect("present");
        assert_eq!(found.message, "edited");
        assert_eq!(found.name, "Kamran Arbaz");

        assert!(store.delete(&first.id).await.expect("delete"));
        assert!(!store.delete(&first.id).await.expect("delete twice"));
    }

    #[tokio::test]
    async fn unknown_id_is_not_an_error() {
        let store = setup_store().await;
        assert!(store.get("missing").await.expect("get").is_none());
        assert!(!store.update_fields("missing", "x", Utc::now()).await.expect("edit"));
        assert!(!store.delete("missing").await.expect("delete"));
    }
}
