use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{item_not_found, supplier_not_found, InventoryStore};
use crate::error::AppResult;
use crate::models::*;
use crate::serializers::{supplier::does_not_exist, ValidationErrors};

#[derive(Debug, Clone)]
struct SupplierRow {
    name: String,
    contact_information: Option<String>,
}

/// Tables behind one lock. Links are kept in both directions so either side
/// of the relation is a range scan.
#[derive(Debug, Default)]
struct Tables {
    last_item_id: i64,
    last_supplier_id: i64,
    items: BTreeMap<i64, Item>,
    suppliers: BTreeMap<i64, SupplierRow>,
    /// (supplier_id, item_id)
    links: BTreeSet<(i64, i64)>,
    /// (item_id, supplier_id)
    reverse_links: BTreeSet<(i64, i64)>,
    tokens: HashMap<String, ApiToken>,
}

impl Tables {
    fn linked_items(&self, supplier_id: i64) -> Vec<i64> {
        self.links
            .range((supplier_id, i64::MIN)..=(supplier_id, i64::MAX))
            .map(|&(_, item_id)| item_id)
            .collect()
    }

    fn linked_suppliers(&self, item_id: i64) -> Vec<i64> {
        self.reverse_links
            .range((item_id, i64::MIN)..=(item_id, i64::MAX))
            .map(|&(_, supplier_id)| supplier_id)
            .collect()
    }

    fn supplier(&self, id: i64) -> Option<Supplier> {
        self.suppliers.get(&id).map(|row| Supplier {
            id,
            name: row.name.clone(),
            contact_information: row.contact_information.clone(),
            items: self.linked_items(id),
        })
    }

    fn check_items_exist(&self, ids: &[i64]) -> AppResult<()> {
        match ids.iter().find(|&&id| !self.items.contains_key(&id)) {
            Some(&missing) => Err(ValidationErrors::single("items", does_not_exist(missing)).into()),
            None => Ok(()),
        }
    }

    fn unlink_supplier(&mut self, supplier_id: i64) {
        for item_id in self.linked_items(supplier_id) {
            self.links.remove(&(supplier_id, item_id));
            self.reverse_links.remove(&(item_id, supplier_id));
        }
    }

    fn unlink_item(&mut self, item_id: i64) {
        for supplier_id in self.linked_suppliers(item_id) {
            self.links.remove(&(supplier_id, item_id));
            self.reverse_links.remove(&(item_id, supplier_id));
        }
    }

    fn link(&mut self, supplier_id: i64, item_ids: &[i64]) {
        for &item_id in item_ids {
            self.links.insert((supplier_id, item_id));
            self.reverse_links.insert((item_id, supplier_id));
        }
    }
}

/// In-process store used by tests and by runs without `DATABASE_URL`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn list_items(&self) -> AppResult<Vec<Item>> {
        Ok(self.tables.read().await.items.values().cloned().collect())
    }

    async fn fetch_item(&self, id: i64) -> AppResult<Item> {
        self.tables
            .read()
            .await
            .items
            .get(&id)
            .cloned()
            .ok_or_else(|| item_not_found(id))
    }

    async fn insert_item(&self, fields: &ItemFields) -> AppResult<Item> {
        let mut tables = self.tables.write().await;
        tables.last_item_id += 1;
        let item = Item {
            id: tables.last_item_id,
            name: fields.name.clone(),
            description: fields.description.clone(),
            price: fields.price,
        };
        tables.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: i64, fields: &ItemFields) -> AppResult<Item> {
        let mut tables = self.tables.write().await;
        let item = tables.items.get_mut(&id).ok_or_else(|| item_not_found(id))?;
        item.name = fields.name.clone();
        item.description = fields.description.clone();
        item.price = fields.price;
        Ok(item.clone())
    }

    async fn delete_item(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.items.remove(&id).is_none() {
            return Err(item_not_found(id));
        }
        tables.unlink_item(id);
        Ok(())
    }

    async fn suppliers_for_item(&self, id: i64) -> AppResult<Vec<Supplier>> {
        let tables = self.tables.read().await;
        if !tables.items.contains_key(&id) {
            return Err(item_not_found(id));
        }
        Ok(tables
            .linked_suppliers(id)
            .into_iter()
            .filter_map(|supplier_id| tables.supplier(supplier_id))
            .collect())
    }

    async fn missing_item_ids(&self, ids: &[i64]) -> AppResult<Vec<i64>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !tables.items.contains_key(id))
            .collect())
    }

    async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let tables = self.tables.read().await;
        Ok(tables
            .suppliers
            .keys()
            .filter_map(|&id| tables.supplier(id))
            .collect())
    }

    async fn fetch_supplier(&self, id: i64) -> AppResult<Supplier> {
        self.tables
            .read()
            .await
            .supplier(id)
            .ok_or_else(|| supplier_not_found(id))
    }

    async fn insert_supplier(&self, fields: &SupplierFields) -> AppResult<Supplier> {
        let mut tables = self.tables.write().await;
        tables.check_items_exist(&fields.items)?;

        tables.last_supplier_id += 1;
        let id = tables.last_supplier_id;
        tables.suppliers.insert(
            id,
            SupplierRow {
                name: fields.name.clone(),
                contact_information: fields.contact_information.clone(),
            },
        );
        tables.link(id, &fields.items);

        tables.supplier(id).ok_or_else(|| supplier_not_found(id))
    }

    async fn update_supplier(&self, id: i64, fields: &SupplierFields) -> AppResult<Supplier> {
        let mut tables = self.tables.write().await;
        if !tables.suppliers.contains_key(&id) {
            return Err(supplier_not_found(id));
        }
        tables.check_items_exist(&fields.items)?;

        tables.suppliers.insert(
            id,
            SupplierRow {
                name: fields.name.clone(),
                contact_information: fields.contact_information.clone(),
            },
        );
        tables.unlink_supplier(id);
        tables.link(id, &fields.items);

        tables.supplier(id).ok_or_else(|| supplier_not_found(id))
    }

    async fn delete_supplier(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.suppliers.remove(&id).is_none() {
            return Err(supplier_not_found(id));
        }
        tables.unlink_supplier(id);
        Ok(())
    }

    async fn items_for_supplier(&self, id: i64) -> AppResult<Vec<Item>> {
        let tables = self.tables.read().await;
        if !tables.suppliers.contains_key(&id) {
            return Err(supplier_not_found(id));
        }
        Ok(tables
            .linked_items(id)
            .into_iter()
            .filter_map(|item_id| tables.items.get(&item_id).cloned())
            .collect())
    }

    async fn find_token(&self, key: &str) -> AppResult<Option<ApiToken>> {
        Ok(self.tables.read().await.tokens.get(key).cloned())
    }

    async fn register_token(&self, username: &str, key: &str) -> AppResult<ApiToken> {
        let mut tables = self.tables.write().await;
        let token = tables
            .tokens
            .entry(key.to_string())
            .and_modify(|token| {
                token.username = username.to_string();
                token.is_active = true;
            })
            .or_insert_with(|| ApiToken {
                key: key.to_string(),
                username: username.to_string(),
                is_active: true,
                created: Utc::now(),
            });
        Ok(token.clone())
    }

    async fn revoke_token(&self, key: &str) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(match tables.tokens.get_mut(key) {
            Some(token) => {
                token.is_active = false;
                true
            }
            None => false,
        })
    }
}
