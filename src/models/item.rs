use serde::Serialize;

use super::Price;

/// Core item entity.
///
/// The reverse `suppliers` relation is not a field here; it is only
/// reachable through `GET /api/items/{id}/suppliers/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(rename = "price_cents")]
    pub price: Price,
}

// ── Write payloads ───────────────────────────────────────────────────────────

/// Validated values for a full item write (create or replace).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
}

/// Validated values for a partial update. `None` leaves the field untouched;
/// `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<Price>,
}

impl ItemPatch {
    /// Merge onto the stored item, producing a full write.
    pub fn apply(self, existing: &Item) -> ItemFields {
        ItemFields {
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            description: self
                .description
                .unwrap_or_else(|| existing.description.clone()),
            price: self.price.unwrap_or(existing.price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Item {
        Item {
            id: 7,
            name: "Test Item".to_string(),
            description: Some("This is a test item".to_string()),
            price: "10.99".parse().unwrap(),
        }
    }

    #[test]
    fn serializes_flat_with_string_price() {
        let value = serde_json::to_value(stored()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 7,
                "name": "Test Item",
                "description": "This is a test item",
                "price": "10.99",
            })
        );
        assert!(value.get("suppliers").is_none());
    }

    #[test]
    fn empty_patch_keeps_everything() {
        let item = stored();
        let fields = ItemPatch::default().apply(&item);
        assert_eq!(fields.name, item.name);
        assert_eq!(fields.description, item.description);
        assert_eq!(fields.price, item.price);
    }

    #[test]
    fn patch_can_clear_description() {
        let patch = ItemPatch {
            description: Some(None),
            price: Some("1.50".parse().unwrap()),
            ..Default::default()
        };
        let fields = patch.apply(&stored());
        assert_eq!(fields.name, "Test Item");
        assert_eq!(fields.description, None);
        assert_eq!(fields.price.cents(), 150);
    }
}
