use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use super::dto::ProductInput;
use super::repo_types::{Product, ProductRow};
use super::update::{self, SqlParam, UpdateStatement};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("product not found")]
    NotFound,
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence operations over the `products` table.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get_all(&self) -> RepoResult<Vec<Product>>;
    async fn get_by_id(&self, id: i64) -> RepoResult<Product>;
    async fn create(&self, input: &ProductInput) -> RepoResult<Product>;
    async fn update_non_blank(&self, id: i64, input: &ProductInput) -> RepoResult<Product>;
    async fn delete(&self, id: i64) -> RepoResult<()>;
}

#[derive(Clone)]
pub struct PgProductRepository {
    db: PgPool,
}

impl PgProductRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn get_all(&self) -> RepoResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, sku_code, sku_name, sku_amount, expiration, create_at, update_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get_by_id(&self, id: i64) -> RepoResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, sku_code, sku_name, sku_amount, expiration, create_at, update_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        row.map(Product::from).ok_or(RepoError::NotFound)
    }

    async fn create(&self, input: &ProductInput) -> RepoResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (sku_code, sku_name, sku_amount, expiration)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sku_code, sku_name, sku_amount, expiration, create_at, update_at
            "#,
        )
        .bind(&input.sku_code)
        .bind(&input.sku_name)
        .bind(input.sku_amount)
        .bind(non_blank(&input.expiration)) // "" → NULL
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn update_non_blank(&self, id: i64, input: &ProductInput) -> RepoResult<Product> {
        let UpdateStatement { sql, params, .. } =
            update::update_non_blank(id, input, OffsetDateTime::now_utc());

        let mut query = sqlx::query_as::<_, ProductRow>(&sql);
        for param in params {
            query = match param {
                SqlParam::Text(v) => query.bind(v),
                SqlParam::Int(v) => query.bind(v),
                SqlParam::BigInt(v) => query.bind(v),
                SqlParam::Timestamp(v) => query.bind(v),
            };
        }

        let row = query.fetch_optional(&self.db).await?;
        row.map(Product::from).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query(r#"DELETE FROM products WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

fn non_blank(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}
