use indexmap::IndexSet;
use serde_json::{Map, Value};

use super::{
    expect_object, optional_text, present, required_text, type_name, Mode, ValidationErrors,
    NAME_MAX_LENGTH, NOT_NULL,
};
use crate::db::InventoryStore;
use crate::error::AppResult;
use crate::models::{SupplierFields, SupplierPatch};

/// Validate a create/replace body, including that every linked item exists.
pub async fn validate(data: &Value, store: &dyn InventoryStore) -> AppResult<SupplierFields> {
    let patch = read(data, Mode::Full, store).await?;
    Ok(SupplierFields {
        name: present(patch.name, "name")?,
        contact_information: patch.contact_information.flatten(),
        items: present(patch.items, "items")?,
    })
}

pub async fn validate_patch(data: &Value, store: &dyn InventoryStore) -> AppResult<SupplierPatch> {
    read(data, Mode::Partial, store).await
}

async fn read(data: &Value, mode: Mode, store: &dyn InventoryStore) -> AppResult<SupplierPatch> {
    let object = expect_object(data)?;
    let mut errors = ValidationErrors::new();

    let name = required_text(object, "name", Some(NAME_MAX_LENGTH), mode, &mut errors);
    let contact_information = optional_text(object, "contact_information", mode, &mut errors);
    let items = item_ids(object, mode, &mut errors);

    if let Some(ids) = &items {
        let missing = store.missing_item_ids(ids).await?;
        if let Some(first) = missing.first() {
            errors.add("items", does_not_exist(*first));
        }
    }

    Ok(errors.into_result(SupplierPatch {
        name,
        contact_information,
        items,
    })?)
}

pub fn does_not_exist(id: i64) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

/// Parse `items` into distinct ids, first occurrence wins. In full mode an
/// absent `items` means no links.
fn item_ids(data: &Map<String, Value>, mode: Mode, errors: &mut ValidationErrors) -> Option<Vec<i64>> {
    let values = match data.get("items") {
        None => {
            return match mode {
                Mode::Full => Some(Vec::new()),
                Mode::Partial => None,
            }
        }
        Some(Value::Null) => {
            errors.add("items", NOT_NULL);
            return None;
        }
        Some(Value::Array(values)) => values,
        Some(other) => {
            errors.add(
                "items",
                format!(
                    "Expected a list of items but got type \"{}\".",
                    type_name(other)
                ),
            );
            return None;
        }
    };

    let mut ids = IndexSet::with_capacity(values.len());
    for value in values {
        match primary_key(value) {
            Some(id) => {
                ids.insert(id);
            }
            None => {
                errors.add(
                    "items",
                    format!(
                        "Incorrect type. Expected pk value, received {}.",
                        type_name(value)
                    ),
                );
                return None;
            }
        }
    }
    Some(ids.into_iter().collect())
}

fn primary_key(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
