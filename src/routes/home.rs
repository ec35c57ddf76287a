use std::sync::Arc;

use askama::Template;
use axum::{Router, extract::State, response::Html, routing::get};

use crate::{
    db::{category_repo, item_repo},
    error::AppError,
    routes::render,
    state::AppState,
};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    title: String,
    category_count: u64,
    item_count: u64,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/store", get(index))
        .route("/store/", get(index))
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let (category_count, item_count) = tokio::try_join!(
        category_repo::count(&state.db),
        item_repo::count(&state.db)
    )?;

    render(&IndexTemplate {
        title: "Store Home".to_string(),
        category_count,
        item_count,
    })
}
