use async_trait::async_trait;
use mockall::mock;

use super::dto::ProductInput;
use super::repo::{ProductRepository, RepoResult};
use super::repo_types::Product;

mock! {
    pub ProductRepository {}

    #[async_trait]
    impl ProductRepository for ProductRepository {
        async fn get_all(&self) -> RepoResult<Vec<Product>>;
        async fn get_by_id(&self, id: i64) -> RepoResult<Product>;
        async fn create(&self, input: &ProductInput) -> RepoResult<Product>;
        async fn update_non_blank(&self, id: i64, input: &ProductInput) -> RepoResult<Product>;
        async fn delete(&self, id: i64) -> RepoResult<()>;
    }
}
