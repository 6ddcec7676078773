use crate::products::{PgProductRepository, ProductRepository, ProductService};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        Self::from_repository(Arc::new(PgProductRepository::new(db)))
    }

    pub fn from_repository(repo: Arc<dyn ProductRepository>) -> Self {
        Self {
            products: ProductService::new(repo),
        }
    }

    #[cfg(test)]
    pub fn fake() -> (Self, Arc<crate::products::memory::MemoryProductRepository>) {
        let repo = Arc::new(crate::products::memory::MemoryProductRepository::new());
        (Self::from_repository(repo.clone()), repo)
    }
}
