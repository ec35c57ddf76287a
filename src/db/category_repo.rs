use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DerivePartialModel, EntityTrait, PaginatorTrait,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::category;
use super::entities::prelude::Category;

/// Name-only projection used by the list page and the item form's
/// selection control.
#[derive(Debug, Clone, PartialEq, Eq, DerivePartialModel)]
#[sea_orm(entity = "Category")]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    description: &str,
) -> Result<category::Model, sea_orm::DbErr> {
    let model = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        ..Default::default()
    };
    model.insert(db).await
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: &Uuid,
) -> Result<Option<category::Model>, sea_orm::DbErr> {
    Category::find_by_id(*id).one(db).await
}

pub async fn list_by_name(
    db: &DatabaseConnection,
) -> Result<Vec<CategorySummary>, sea_orm::DbErr> {
    Category::find()
        .order_by_asc(category::Column::Name)
        .into_partial_model::<CategorySummary>()
        .all(db)
        .await
}

pub async fn update(
    db: &DatabaseConnection,
    id: &Uuid,
    name: &str,
    description: &str,
) -> Result<Option<category::Model>, sea_orm::DbErr> {
    let Some(existing) = Category::find_by_id(*id).one(db).await? else {
        return Ok(None);
    };
    let mut active: category::ActiveModel = existing.into();
    active.name = Set(name.to_string());
    active.description = Set(description.to_string());
    active.updated_at = Set(Utc::now().fixed_offset());
    Ok(Some(active.update(db).await?))
}

pub async fn delete(db: &DatabaseConnection, id: &Uuid) -> Result<bool, sea_orm::DbErr> {
    let result = Category::delete_by_id(*id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

pub async fn count(db: &DatabaseConnection) -> Result<u64, sea_orm::DbErr> {
    Category::find().count(db).await
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::db::entities::category;

    fn ts() -> chrono::DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn category_model(id: Uuid, name: &str) -> category::Model {
        let now = ts();
        category::Model {
            id,
            name: name.to_string(),
            description: "desc".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn find_by_id_returns_none_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();

        let result = super::find_by_id(&db, &Uuid::new_v4())
            .await
            .expect("query should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn update_returns_updated_model() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![category_model(id, "Fruits")],
                vec![category_model(id, "Vegetables")],
            ])
            .into_connection();

        let updated = super::update(&db, &id, "Vegetables", "desc")
            .await
            .expect("query should succeed")
            .expect("category should exist");
        assert_eq!(updated.name, "Vegetables");
    }

    #[tokio::test]
    async fn update_returns_none_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();

        let result = super::update(&db, &Uuid::new_v4(), "Vegetables", "desc")
            .await
            .expect("query should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let deleted = super::delete(&db, &Uuid::new_v4())
            .await
            .expect("query should succeed");
        assert!(!deleted);
    }
}
