mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::*;

/// Persistence seam shared by the handlers and the auth gate.
///
/// Every write is atomic: either the entity and its links change together
/// or nothing changes. Relationship listings are ordered by id.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    // ── Items ────────────────────────────────────────────────────────────────

    async fn list_items(&self) -> AppResult<Vec<Item>>;

    async fn fetch_item(&self, id: i64) -> AppResult<Item>;

    async fn insert_item(&self, fields: &ItemFields) -> AppResult<Item>;

    async fn update_item(&self, id: i64, fields: &ItemFields) -> AppResult<Item>;

    /// Removes the item and every link pointing at it.
    async fn delete_item(&self, id: i64) -> AppResult<()>;

    async fn suppliers_for_item(&self, id: i64) -> AppResult<Vec<Supplier>>;

    /// Ids from `ids` with no matching item, in input order.
    async fn missing_item_ids(&self, ids: &[i64]) -> AppResult<Vec<i64>>;

    // ── Suppliers ────────────────────────────────────────────────────────────

    async fn list_suppliers(&self) -> AppResult<Vec<Supplier>>;

    async fn fetch_supplier(&self, id: i64) -> AppResult<Supplier>;

    async fn insert_supplier(&self, fields: &SupplierFields) -> AppResult<Supplier>;

    /// Replaces the supplier's fields and its whole link set.
    async fn update_supplier(&self, id: i64, fields: &SupplierFields) -> AppResult<Supplier>;

    async fn delete_supplier(&self, id: i64) -> AppResult<()>;

    async fn items_for_supplier(&self, id: i64) -> AppResult<Vec<Item>>;

    // ── Tokens ───────────────────────────────────────────────────────────────

    async fn find_token(&self, key: &str) -> AppResult<Option<ApiToken>>;

    /// Store `key` for `username`, re-activating it if it already exists.
    async fn register_token(&self, username: &str, key: &str) -> AppResult<ApiToken>;

    /// Mark a key inactive. Returns false when the key is unknown.
    async fn revoke_token(&self, key: &str) -> AppResult<bool>;

    async fn issue_token(&self, username: &str) -> AppResult<ApiToken> {
        self.register_token(username, &ApiToken::generate_key()).await
    }
}

pub(crate) fn item_not_found(id: i64) -> crate::error::AppError {
    crate::error::AppError::NotFound(format!("Item {} not found", id))
}

pub(crate) fn supplier_not_found(id: i64) -> crate::error::AppError {
    crate::error::AppError::NotFound(format!("Supplier {} not found", id))
}
