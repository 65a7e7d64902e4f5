use serde::Serialize;

/// Supplier entity. `items` holds the linked item ids, ordered by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact_information: Option<String>,
    pub items: Vec<i64>,
}

/// Validated values for a full supplier write. `items` is already
/// de-duplicated; existence is checked by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierFields {
    pub name: String,
    pub contact_information: Option<String>,
    pub items: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub contact_information: Option<Option<String>>,
    pub items: Option<Vec<i64>>,
}

impl SupplierPatch {
    pub fn apply(self, existing: &Supplier) -> SupplierFields {
        SupplierFields {
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            contact_information: self
                .contact_information
                .unwrap_or_else(|| existing.contact_information.clone()),
            items: self.items.unwrap_or_else(|| existing.items.clone()),
        }
    }
}
