use std::sync::Arc;

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    db::{category_repo, entities::category, item_repo},
    error::AppError,
    forms::{self, CATEGORY_RULES},
    routes::{category_url, item_url, render},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

struct CategoryRow {
    name: String,
    url: String,
}

struct ItemRow {
    name: String,
    description: String,
    url: String,
}

#[derive(Template)]
#[template(path = "category_list.html")]
struct ListTemplate {
    title: String,
    categories: Vec<CategoryRow>,
}

#[derive(Template)]
#[template(path = "category_detail.html")]
struct DetailTemplate {
    title: String,
    category: category::Model,
    items: Vec<ItemRow>,
    update_url: String,
    delete_url: String,
}

#[derive(Template)]
#[template(path = "category_form.html")]
struct FormTemplate {
    title: String,
    name: String,
    description: String,
    errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "category_delete.html")]
struct DeleteTemplate {
    title: String,
    category: category::Model,
    items: Vec<ItemRow>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/store/categories", get(list))
        .route("/store/category/create", get(create_form).post(create_submit))
        .route(
            "/store/category/{id}/update",
            get(update_form).post(update_submit),
        )
        .route(
            "/store/category/{id}/delete",
            get(delete_form).post(delete_submit),
        )
        .route("/store/category/{id}", get(detail))
        .with_state(state)
}

async fn list(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let categories = category_repo::list_by_name(&state.db).await?;
    let categories = categories
        .into_iter()
        .map(|summary| CategoryRow {
            url: category_url(&summary.id),
            name: summary.name,
        })
        .collect();

    Ok(render(&ListTemplate {
        title: "Category List".to_string(),
        categories,
    })?
    .into_response())
}

async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (category, items) = fetch_with_items(&state, &id).await?;

    Ok(render(&DetailTemplate {
        title: "Category Detail".to_string(),
        update_url: format!("{}/update", category_url(&category.id)),
        delete_url: format!("{}/delete", category_url(&category.id)),
        category,
        items,
    })?
    .into_response())
}

async fn create_form() -> Result<Response, AppError> {
    Ok(render(&FormTemplate {
        title: "Create Category".to_string(),
        name: String::new(),
        description: String::new(),
        errors: Vec::new(),
    })?
    .into_response())
}

async fn create_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CategoryForm>,
) -> Result<Response, AppError> {
    let name = forms::sanitize(&form.name);
    let description = forms::sanitize(&form.description);

    let errors = forms::validate(
        CATEGORY_RULES,
        &[("name", &name), ("description", &description)],
    );
    if !errors.is_empty() {
        // Re-render the form with the sanitized values and every error
        return Ok(render(&FormTemplate {
            title: "Create Category".to_string(),
            name,
            description,
            errors: errors.iter().map(|e| e.message.to_string()).collect(),
        })?
        .into_response());
    }

    let created = category_repo::create(&state.db, &name, &description).await?;
    Ok(Redirect::to(&category_url(&created.id)).into_response())
}

async fn update_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let category = category_repo::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::not_found("No category found"))?;

    Ok(render(&FormTemplate {
        title: "Update Category".to_string(),
        name: category.name,
        description: category.description,
        errors: Vec::new(),
    })?
    .into_response())
}

async fn update_submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Form(form): Form<CategoryForm>,
) -> Result<Response, AppError> {
    let name = forms::sanitize(&form.name);
    let description = forms::sanitize(&form.description);

    let errors = forms::validate(
        CATEGORY_RULES,
        &[("name", &name), ("description", &description)],
    );
    if !errors.is_empty() {
        return Ok(render(&FormTemplate {
            title: "Update Category".to_string(),
            name,
            description,
            errors: errors.iter().map(|e| e.message.to_string()).collect(),
        })?
        .into_response());
    }

    let updated = category_repo::update(&state.db, &id, &name, &description)
        .await?
        .ok_or_else(|| AppError::not_found("No category found"))?;
    Ok(Redirect::to(&category_url(&updated.id)).into_response())
}

async fn delete_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (category, items) = fetch_with_items(&state, &id).await?;

    Ok(render(&DeleteTemplate {
        title: "Delete Category".to_string(),
        category,
        items,
    })?
    .into_response())
}

async fn delete_submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (category, items) = fetch_with_items(&state, &id).await?;

    if !items.is_empty() {
        // Items still reference the category. Block the deletion and show
        // the confirmation page again, exactly as the GET route does.
        return Ok(render(&DeleteTemplate {
            title: "Delete Category".to_string(),
            category,
            items,
        })?
        .into_response());
    }

    category_repo::delete(&state.db, &id).await?;
    Ok(Redirect::to("/store/categories").into_response())
}

/// The category and its referencing items, fetched concurrently. NotFound
/// when the category id does not resolve.
async fn fetch_with_items(
    state: &AppState,
    id: &Uuid,
) -> Result<(category::Model, Vec<ItemRow>), AppError> {
    let (category, items) = tokio::try_join!(
        category_repo::find_by_id(&state.db, id),
        item_repo::list_in_category(&state.db, id)
    )?;
    let category = category.ok_or_else(|| AppError::not_found("No category found"))?;
    let items = items
        .into_iter()
        .map(|item| ItemRow {
            url: item_url(&item.id),
            name: item.name,
            description: item.description,
        })
        .collect();
    Ok((category, items))
}
