use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DerivePartialModel, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::item;
use super::entities::prelude::Item;

/// Name-only projection for the item list page.
#[derive(Debug, Clone, PartialEq, Eq, DerivePartialModel)]
#[sea_orm(entity = "Item")]
pub struct ItemSummary {
    pub id: Uuid,
    pub name: String,
}

pub struct ItemFields<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub category_id: Uuid,
    pub price: f64,
    pub stock: i32,
}

pub async fn create(
    db: &DatabaseConnection,
    fields: ItemFields<'_>,
) -> Result<item::Model, sea_orm::DbErr> {
    let model = item::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(fields.name.to_string()),
        description: Set(fields.description.to_string()),
        category_id: Set(fields.category_id),
        price: Set(fields.price),
        stock: Set(fields.stock),
        ..Default::default()
    };
    model.insert(db).await
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: &Uuid,
) -> Result<Option<item::Model>, sea_orm::DbErr> {
    Item::find_by_id(*id).one(db).await
}

pub async fn list_by_name(db: &DatabaseConnection) -> Result<Vec<ItemSummary>, sea_orm::DbErr> {
    Item::find()
        .order_by_asc(item::Column::Name)
        .into_partial_model::<ItemSummary>()
        .all(db)
        .await
}

/// Items referencing a category, sorted by name. Used by the category detail
/// page and by the dependent-record check that guards category deletion.
pub async fn list_in_category(
    db: &DatabaseConnection,
    category_id: &Uuid,
) -> Result<Vec<item::Model>, sea_orm::DbErr> {
    Item::find()
        .filter(item::Column::CategoryId.eq(*category_id))
        .order_by_asc(item::Column::Name)
        .all(db)
        .await
}

pub async fn update(
    db: &DatabaseConnection,
    id: &Uuid,
    fields: ItemFields<'_>,
) -> Result<Option<item::Model>, sea_orm::DbErr> {
    let Some(existing) = Item::find_by_id(*id).one(db).await? else {
        return Ok(None);
    };
    let mut active: item::ActiveModel = existing.into();
    active.name = Set(fields.name.to_string());
    active.description = Set(fields.description.to_string());
    active.category_id = Set(fields.category_id);
    active.price = Set(fields.price);
    active.stock = Set(fields.stock);
    active.updated_at = Set(Utc::now().fixed_offset());
    Ok(Some(active.update(db).await?))
}

pub async fn delete(db: &DatabaseConnection, id: &Uuid) -> Result<bool, sea_orm::DbErr> {
    let result = Item::delete_by_id(*id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

pub async fn count(db: &DatabaseConnection) -> Result<u64, sea_orm::DbErr> {
    Item::find().count(db).await
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::db::entities::item;

    fn ts() -> chrono::DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn item_model(id: Uuid, category_id: Uuid, name: &str) -> item::Model {
        let now = ts();
        item::Model {
            id,
            name: name.to_string(),
            description: "desc".to_string(),
            category_id,
            price: 1.5,
            stock: 100,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn list_in_category_returns_matches() {
        let category_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                item_model(Uuid::new_v4(), category_id, "Apple"),
                item_model(Uuid::new_v4(), category_id, "Banana"),
            ]])
            .into_connection();

        let items = super::list_in_category(&db, &category_id)
            .await
            .expect("query should succeed");
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| item.category_id == category_id));
    }

    #[tokio::test]
    async fn update_returns_none_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<item::Model>::new()])
            .into_connection();

        let fields = super::ItemFields {
            name: "Apple",
            description: "Crisp",
            category_id: Uuid::new_v4(),
            price: 1.5,
            stock: 100,
        };
        let result = super::update(&db, &Uuid::new_v4(), fields)
            .await
            .expect("query should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_reports_removed_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let deleted = super::delete(&db, &Uuid::new_v4())
            .await
            .expect("query should succeed");
        assert!(deleted);
    }
}
