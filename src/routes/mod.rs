use std::sync::Arc;

use askama::Template;
use axum::{Router, response::Html};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub mod category;
pub mod home;
pub mod item;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(home::router(state.clone()))
        .merge(category::router(state.clone()))
        .merge(item::router(state))
}

/// Canonical path for a category's detail page.
pub fn category_url(id: &Uuid) -> String {
    format!("/store/category/{id}")
}

/// Canonical path for an item's detail page.
pub fn item_url(id: &Uuid) -> String {
    format!("/store/item/{id}")
}

pub(crate) fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|err| {
        tracing::error!("template render error: {err}");
        AppError::internal("Failed to render page")
    })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    #[test]
    fn detail_urls_contain_the_id() {
        let id = Uuid::new_v4();
        assert_eq!(super::category_url(&id), format!("/store/category/{id}"));
        assert_eq!(super::item_url(&id), format!("/store/item/{id}"));
    }
}
