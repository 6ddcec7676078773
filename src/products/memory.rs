use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use super::dto::ProductInput;
use super::repo::{ProductRepository, RepoError, RepoResult};
use super::repo_types::Product;

/// In-process stand-in for the Postgres repository, used by router tests.
/// Mirrors the store's partial-update rules and counts mutating calls.
#[derive(Default)]
pub struct MemoryProductRepository {
    rows: Mutex<BTreeMap<i64, Product>>,
    next_id: Mutex<i64>,
    writes: AtomicUsize,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn get_all(&self) -> RepoResult<Vec<Product>> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> RepoResult<Product> {
        self.rows
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn create(&self, input: &ProductInput) -> RepoResult<Product> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        let now = OffsetDateTime::now_utc();
        let product = Product {
            id,
            sku_code: input.sku_code.clone(),
            sku_name: input.sku_name.clone(),
            sku_amount: input.sku_amount,
            expiration: input.expiration.clone(),
            create_at: Some(now),
            update_at: Some(now),
        };
        self.rows.lock().unwrap().insert(id, product.clone());
        Ok(product)
    }

    async fn update_non_blank(&self, id: i64, input: &ProductInput) -> RepoResult<Product> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(&id).ok_or(RepoError::NotFound)?;
        if !input.sku_code.is_empty() {
            row.sku_code = input.sku_code.clone();
        }
        if !input.sku_name.is_empty() {
            row.sku_name = input.sku_name.clone();
        }
        if !input.expiration.is_empty() {
            row.expiration = input.expiration.clone();
        }
        row.sku_amount = input.sku_amount;
        row.update_at = Some(OffsetDateTime::now_utc());
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}
