use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

/// A posted board update. The primary key is the same opaque hex token the
/// file-backed store uses, so rows and file records are interchangeable.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "updates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub message: String,
    pub timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn validate_message(message: &str) -> Result<(), errors::ModelError> {
    if message.trim().is_empty() {
        return Err(errors::ModelError::Validation("message required".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    id: &str,
    name: &str,
    message: &str,
    timestamp: DateTime<Utc>,
) -> Result<Model, errors::ModelError> {
    validate_message(message)?;
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    let am = ActiveModel {
        id: Set(id.to_string()),
        name: Set(name.to_string()),
        message: Set(message.to_string()),
        timestamp: Set(timestamp.into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Most-recent-first listing.
pub async fn list_desc(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_desc(Column::Timestamp)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Overwrite message and timestamp in place; returns whether the row existed.
pub async fn set_message(
    db: &DatabaseConnection,
    id: &str,
    message: &str,
    timestamp: DateTime<Utc>,
) -> Result<bool, errors::ModelError> {
    let found = find_by_id(db, id).await?;
    let Some(found) = found else { return Ok(false) };
    let mut am: ActiveModel = found.into();
    am.message = Set(message.to_string());
    am.timestamp = Set(timestamp.into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(true)
}

/// Returns whether a row was removed.
pub async fn delete_by_id(db: &DatabaseConnection, id: &str) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id.to_string())
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::MigratorTrait;

    async fn setup_db() -> DatabaseConnection {
        let db = sea_orm::Database::connect("sqlite::memory:")
            .await
            .expect("sqlite memory");
        migration::Migrator::up(&db, None).await.expect("migrate up");
        db
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let db = setup_db().await;

        let id = new_id();
        let created = create(&db, &id, "Kamran Arbaz", "hello", Utc::now())
            .await
            .expect("create");
        assert_eq!(created.name, "Kamran Arbaz");

        let found = find_by_id(&db, &id).await.expect("find").expect("present");
        assert_eq!(found.message, "hello");

        let edited = set_message(&db, &id, "hello again", Utc::now()).await.expect("edit");
        assert!(edited);
        let found = find_by_id(&db, &id).await.expect("find").expect("present");
        assert_eq!(found.message, "hello again");
        // authorship untouched by edits
        assert_eq!(found.name, "Kamran Arbaz");

        let removed = delete_by_id(&db, &id).await.expect("delete");
        assert!(removed);
        let removed_again = delete_by_id(&db, &id).await.expect("delete twice");
        assert!(!removed_again);
    }

    #[tokio::test]
    async fn listing_is_timestamp_descending() {
        let db = setup_db().await;
        let base = Utc::now();
        for (i, msg) in ["first", "second", "third"].iter().enumerate() {
            let ts = base + chrono::Duration::seconds(i as i64);
            create(&db, &new_id(), "Drishya CM", msg, ts).await.expect("create");
        }
        let rows = list_desc(&db).await.expect("list");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].message, "third");
        assert_eq!(rows[2].message, "first");
    }

    #[tokio::test]
    async fn rejects_blank_message() {
        let db = setup_db().await;
        let err = create(&db, &new_id(), "Drishya CM", "   ", Utc::now()).await;
        assert!(matches!(err, Err(errors::ModelError::Validation(_))));
    }
}
