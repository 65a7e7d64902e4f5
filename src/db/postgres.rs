use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use tracing::info;

use super::{item_not_found, supplier_not_found, InventoryStore};
use crate::error::AppResult;
use crate::models::*;
use crate::serializers::{supplier::does_not_exist, ValidationErrors};

/// Supplier columns with the linked item ids folded into one array.
const SELECT_SUPPLIER: &str = r#"
    SELECT s.id, s.name, s.contact_information,
           ARRAY(
               SELECT si.item_id FROM supplier_items si
               WHERE si.supplier_id = s.id
               ORDER BY si.item_id
           ) AS items
    FROM suppliers s
"#;

/// PostgreSQL-backed store. Supplier writes run in one transaction each.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool and apply pending migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> AppResult<Self> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        info!("Database connection pool established.");

        info!("Running migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Migrations complete.");

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn item_exists(&self, id: i64) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM items WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn supplier_exists(&self, id: i64) -> AppResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

/// Lock the referenced items for the rest of the transaction and link them.
/// Fails with a field error if any id is gone.
async fn link_items(
    tx: &mut Transaction<'_, Postgres>,
    supplier_id: i64,
    item_ids: &[i64],
) -> AppResult<()> {
    if item_ids.is_empty() {
        return Ok(());
    }

    let found: Vec<i64> =
        sqlx::query_scalar("SELECT id FROM items WHERE id = ANY($1) FOR SHARE")
            .bind(item_ids)
            .fetch_all(&mut **tx)
            .await?;
    if let Some(&missing) = item_ids.iter().find(|id| !found.contains(id)) {
        return Err(ValidationErrors::single("items", does_not_exist(missing)).into());
    }

    sqlx::query(
        r#"
        INSERT INTO supplier_items (supplier_id, item_id)
        SELECT $1, UNNEST($2::bigint[])
        "#,
    )
    .bind(supplier_id)
    .bind(item_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl InventoryStore for PgStore {
    // ── Items ────────────────────────────────────────────────────────────────

    async fn list_items(&self) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT id, name, description, price_cents FROM items ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn fetch_item(&self, id: i64) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(
            "SELECT id, name, description, price_cents FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| item_not_found(id))
    }

    async fn insert_item(&self, fields: &ItemFields) -> AppResult<Item> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, description, price_cents)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, price_cents
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    async fn update_item(&self, id: i64, fields: &ItemFields) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET name        = $1,
                description = $2,
                price_cents = $3
            WHERE id = $4
            RETURNING id, name, description, price_cents
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| item_not_found(id))
    }

    async fn delete_item(&self, id: i64) -> AppResult<()> {
        // supplier_items rows go with it (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(item_not_found(id));
        }
        Ok(())
    }

    async fn suppliers_for_item(&self, id: i64) -> AppResult<Vec<Supplier>> {
        if !self.item_exists(id).await? {
            return Err(item_not_found(id));
        }

        let sql = format!(
            "{} JOIN supplier_items link ON link.supplier_id = s.id \
             WHERE link.item_id = $1 ORDER BY s.id",
            SELECT_SUPPLIER
        );
        let suppliers = sqlx::query_as::<_, Supplier>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(suppliers)
    }

    async fn missing_item_ids(&self, ids: &[i64]) -> AppResult<Vec<i64>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found: Vec<i64> = sqlx::query_scalar("SELECT id FROM items WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }

    // ── Suppliers ────────────────────────────────────────────────────────────

    async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let sql = format!("{} ORDER BY s.id", SELECT_SUPPLIER);
        let suppliers = sqlx::query_as::<_, Supplier>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(suppliers)
    }

    async fn fetch_supplier(&self, id: i64) -> AppResult<Supplier> {
        let sql = format!("{} WHERE s.id = $1", SELECT_SUPPLIER);
        sqlx::query_as::<_, Supplier>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| supplier_not_found(id))
    }

    async fn insert_supplier(&self, fields: &SupplierFields) -> AppResult<Supplier> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO suppliers (name, contact_information) VALUES ($1, $2) RETURNING id",
        )
        .bind(&fields.name)
        .bind(&fields.contact_information)
        .fetch_one(&mut *tx)
        .await?;

        link_items(&mut tx, id, &fields.items).await?;

        let sql = format!("{} WHERE s.id = $1", SELECT_SUPPLIER);
        let supplier = sqlx::query_as::<_, Supplier>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(supplier)
    }

    async fn update_supplier(&self, id: i64, fields: &SupplierFields) -> AppResult<Supplier> {
        let mut tx = self.pool.begin().await?;

        // Dropping `tx` on any early return rolls everything back.
        sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE suppliers
            SET name                = $1,
                contact_information = $2
            WHERE id = $3
            RETURNING id
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.contact_information)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| supplier_not_found(id))?;

        sqlx::query("DELETE FROM supplier_items WHERE supplier_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        link_items(&mut tx, id, &fields.items).await?;

        let sql = format!("{} WHERE s.id = $1", SELECT_SUPPLIER);
        let supplier = sqlx::query_as::<_, Supplier>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(supplier)
    }

    async fn delete_supplier(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(supplier_not_found(id));
        }
        Ok(())
    }

    async fn items_for_supplier(&self, id: i64) -> AppResult<Vec<Item>> {
        if !self.supplier_exists(id).await? {
            return Err(supplier_not_found(id));
        }

        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT i.id, i.name, i.description, i.price_cents
            FROM items i
            JOIN supplier_items si ON si.item_id = i.id
            WHERE si.supplier_id = $1
            ORDER BY i.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    // ── Tokens ───────────────────────────────────────────────────────────────

    async fn find_token(&self, key: &str) -> AppResult<Option<ApiToken>> {
        let token = sqlx::query_as::<_, ApiToken>(
            "SELECT key, username, is_active, created FROM api_tokens WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(token)
    }

    async fn register_token(&self, username: &str, key: &str) -> AppResult<ApiToken> {
        let token = sqlx::query_as::<_, ApiToken>(
            r#"
            INSERT INTO api_tokens (key, username)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE
            SET username = EXCLUDED.username,
                is_active = TRUE
            RETURNING key, username, is_active, created
            "#,
        )
        .bind(key)
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(token)
    }

    async fn revoke_token(&self, key: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE api_tokens SET is_active = FALSE WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
