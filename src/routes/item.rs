use std::sync::Arc;

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    db::{
        category_repo,
        entities::{category, item},
        item_repo::{self, ItemFields},
    },
    error::AppError,
    forms::{self, ITEM_RULES},
    routes::{category_url, item_url, render},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ItemForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub stock: String,
}

/// Sanitized copy of a submission, kept as text so invalid numeric input can
/// be redisplayed exactly as the user typed it.
struct ItemInput {
    name: String,
    description: String,
    category: String,
    price: String,
    stock: String,
}

impl ItemInput {
    fn from_form(form: &ItemForm) -> Self {
        Self {
            name: forms::sanitize(&form.name),
            description: forms::sanitize(&form.description),
            category: forms::sanitize(&form.category),
            price: forms::sanitize(&form.price),
            stock: forms::sanitize(&form.stock),
        }
    }

    fn validate(&self) -> Vec<String> {
        forms::validate(
            ITEM_RULES,
            &[
                ("name", &self.name),
                ("description", &self.description),
                ("category", &self.category),
                ("price", &self.price),
                ("stock", &self.stock),
            ],
        )
        .iter()
        .map(|e| e.message.to_string())
        .collect()
    }

    /// Typed field values. Only called after validation passed; the category
    /// id is the one value the select control cannot guarantee, so a
    /// malformed one is a bad request rather than an internal error. The
    /// referenced category is deliberately not checked for existence here.
    fn fields(&self) -> Result<ItemFields<'_>, AppError> {
        let category_id = self
            .category
            .parse::<Uuid>()
            .map_err(|_| AppError::new(StatusCode::BAD_REQUEST, "Invalid category id"))?;
        let price = self
            .price
            .parse::<f64>()
            .map_err(|_| AppError::internal("Price failed to parse after validation"))?;
        let stock = self
            .stock
            .parse::<i32>()
            .map_err(|_| AppError::internal("Stock failed to parse after validation"))?;
        Ok(ItemFields {
            name: &self.name,
            description: &self.description,
            category_id,
            price,
            stock,
        })
    }
}

struct ItemRow {
    name: String,
    url: String,
}

struct CategoryOption {
    id: String,
    name: String,
}

#[derive(Template)]
#[template(path = "item_list.html")]
struct ListTemplate {
    title: String,
    items: Vec<ItemRow>,
}

#[derive(Template)]
#[template(path = "item_detail.html")]
struct DetailTemplate {
    title: String,
    item: item::Model,
    category: category::Model,
    category_link: String,
    update_url: String,
    delete_url: String,
}

#[derive(Template)]
#[template(path = "item_form.html")]
struct FormTemplate {
    title: String,
    name: String,
    description: String,
    selected_category: String,
    price: String,
    stock: String,
    categories: Vec<CategoryOption>,
    errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "item_delete.html")]
struct DeleteTemplate {
    title: String,
    item: item::Model,
    category: category::Model,
    category_link: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/store/items", get(list))
        .route("/store/item/create", get(create_form).post(create_submit))
        .route("/store/item/{id}/update", get(update_form).post(update_submit))
        .route("/store/item/{id}/delete", get(delete_form).post(delete_submit))
        .route("/store/item/{id}", get(detail))
        .with_state(state)
}

async fn list(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let items = item_repo::list_by_name(&state.db).await?;
    let items = items
        .into_iter()
        .map(|summary| ItemRow {
            url: item_url(&summary.id),
            name: summary.name,
        })
        .collect();

    Ok(render(&ListTemplate {
        title: "Item List".to_string(),
        items,
    })?
    .into_response())
}

async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let item = item_repo::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("No item found"))?;

    // Populate the category reference. A dangling reference means the
    // category was removed out from under the item, which the write path
    // never prevents; surface it as a server error.
    let category = category_repo::find_by_id(&state.db, &item.category_id)
        .await?
        .ok_or_else(|| AppError::internal("Item references a missing category"))?;

    Ok(render(&DetailTemplate {
        title: "Item Detail".to_string(),
        category_link: category_url(&category.id),
        update_url: format!("{}/update", item_url(&item.id)),
        delete_url: format!("{}/delete", item_url(&item.id)),
        item,
        category,
    })?
    .into_response())
}

async fn create_form(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let categories = category_options(&state).await?;

    Ok(render(&FormTemplate {
        title: "Create Item".to_string(),
        name: String::new(),
        description: String::new(),
        selected_category: String::new(),
        price: String::new(),
        stock: String::new(),
        categories,
        errors: Vec::new(),
    })?
    .into_response())
}

async fn create_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ItemForm>,
) -> Result<Response, AppError> {
    let input = ItemInput::from_form(&form);

    let errors = input.validate();
    if !errors.is_empty() {
        let categories = category_options(&state).await?;
        return Ok(render(&form_template("Create Item", input, categories, errors))?
            .into_response());
    }

    let created = item_repo::create(&state.db, input.fields()?).await?;
    Ok(Redirect::to(&item_url(&created.id)).into_response())
}

async fn update_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (item, categories) = tokio::try_join!(
        item_repo::find_by_id(&state.db, &id),
        category_repo::list_by_name(&state.db)
    )?;
    let item = item.ok_or_else(|| AppError::not_found("No item found"))?;
    let categories = categories
        .into_iter()
        .map(|summary| CategoryOption {
            id: summary.id.to_string(),
            name: summary.name,
        })
        .collect();

    Ok(render(&FormTemplate {
        title: "Update Item".to_string(),
        name: item.name,
        description: item.description,
        selected_category: item.category_id.to_string(),
        price: item.price.to_string(),
        stock: item.stock.to_string(),
        categories,
        errors: Vec::new(),
    })?
    .into_response())
}

async fn update_submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Form(form): Form<ItemForm>,
) -> Result<Response, AppError> {
    let input = ItemInput::from_form(&form);

    let errors = input.validate();
    if !errors.is_empty() {
        let categories = category_options(&state).await?;
        return Ok(render(&form_template("Update Item", input, categories, errors))?
            .into_response());
    }

    let updated = item_repo::update(&state.db, &id, input.fields()?)
        .await?
        .ok_or_else(|| AppError::not_found("No item found"))?;
    Ok(Redirect::to(&item_url(&updated.id)).into_response())
}

async fn delete_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let item = item_repo::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("No item found"))?;

    // Confirmation page shows the category too, so populate it like the
    // detail page does.
    let category = category_repo::find_by_id(&state.db, &item.category_id)
        .await?
        .ok_or_else(|| AppError::internal("Item references a missing category"))?;

    Ok(render(&DeleteTemplate {
        title: "Delete Item".to_string(),
        category_link: category_url(&category.id),
        item,
        category,
    })?
    .into_response())
}

async fn delete_submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    // Items have no dependents, so deletion is unconditional once the id
    // resolves.
    item_repo::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("No item found"))?;

    item_repo::delete(&state.db, &id).await?;
    Ok(Redirect::to("/store/items").into_response())
}

async fn category_options(state: &AppState) -> Result<Vec<CategoryOption>, AppError> {
    let categories = category_repo::list_by_name(&state.db).await?;
    Ok(categories
        .into_iter()
        .map(|summary| CategoryOption {
            id: summary.id.to_string(),
            name: summary.name,
        })
        .collect())
}

fn form_template(
    title: &str,
    input: ItemInput,
    categories: Vec<CategoryOption>,
    errors: Vec<String>,
) -> FormTemplate {
    FormTemplate {
        title: title.to_string(),
        name: input.name,
        description: input.description,
        selected_category: input.category,
        price: input.price,
        stock: input.stock,
        categories,
        errors,
    }
}
