pub mod dto;
pub mod errors;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod update;

#[cfg(test)]
pub mod memory;
#[cfg(test)]
pub mod mock;

pub use repo::{PgProductRepository, ProductRepository};
pub use services::ProductService;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::product_routes()
}
