pub mod category_repo;
pub mod entities;
pub mod item_repo;
