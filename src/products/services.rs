use std::sync::Arc;

use tracing::debug;

use super::dto::ProductInput;
use super::repo::{ProductRepository, RepoError};
use super::repo_types::Product;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("product not found")]
    NotFound,
    #[error(transparent)]
    Store(RepoError),
}

impl From<RepoError> for ServiceError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound => ServiceError::NotFound,
            other => ServiceError::Store(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Business rules over products. Update and delete check that the row exists
/// before touching it; the check and the write are separate statements.
#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.repo.get_all().await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Product> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn create(&self, input: &ProductInput) -> ServiceResult<Product> {
        Ok(self.repo.create(input).await?)
    }

    pub async fn update(&self, id: i64, input: &ProductInput) -> ServiceResult<Product> {
        self.repo.get_by_id(id).await?;
        let product = self.repo.update_non_blank(id, input).await?;
        debug!(product_id = id, "product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        self.repo.get_by_id(id).await?;
        self.repo.delete(id).await?;
        debug!(product_id = id, "product deleted");
        Ok(())
    }
}
