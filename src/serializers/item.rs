use serde_json::{Map, Value};

use super::{
    expect_object, optional_text, present, required_text, Mode, ValidationErrors,
    NAME_MAX_LENGTH, NOT_NULL, REQUIRED,
};
use crate::models::{ItemFields, ItemPatch, Price};

const INVALID_NUMBER: &str = "A valid number is required.";

/// Validate a create/replace body.
pub fn validate(data: &Value) -> Result<ItemFields, ValidationErrors> {
    let patch = read(data, Mode::Full)?;
    Ok(ItemFields {
        name: present(patch.name, "name")?,
        description: patch.description.flatten(),
        price: present(patch.price, "price")?,
    })
}

/// Validate a partial-update body.
pub fn validate_patch(data: &Value) -> Result<ItemPatch, ValidationErrors> {
    read(data, Mode::Partial)
}

fn read(data: &Value, mode: Mode) -> Result<ItemPatch, ValidationErrors> {
    let object = expect_object(data)?;
    let mut errors = ValidationErrors::new();

    let name = required_text(object, "name", Some(NAME_MAX_LENGTH), mode, &mut errors);
    let description = optional_text(object, "description", mode, &mut errors);
    let price = price(object, mode, &mut errors);

    errors.into_result(ItemPatch {
        name,
        description,
        price,
    })
}

fn price(data: &Map<String, Value>, mode: Mode, errors: &mut ValidationErrors) -> Option<Price> {
    let raw = match data.get("price") {
        None => {
            if mode == Mode::Full {
                errors.add("price", REQUIRED);
            }
            return None;
        }
        Some(Value::Null) => {
            errors.add("price", NOT_NULL);
            return None;
        }
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            errors.add("price", INVALID_NUMBER);
            return None;
        }
    };

    match raw.parse::<Price>() {
        Ok(price) => Some(price),
        Err(err) => {
            errors.add("price", err.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_full_payload() {
        let fields = validate(&json!({
            "name": "New Item",
            "description": "This is a new test item",
            "price": "15.99",
        }))
        .unwrap();
        assert_eq!(fields.name, "New Item");
        assert_eq!(fields.description.as_deref(), Some("This is a new test item"));
        assert_eq!(fields.price.cents(), 1599);
    }

    #[test]
    fn description_is_optional() {
        let fields = validate(&json!({ "name": "Bare", "price": 3 })).unwrap();
        assert_eq!(fields.description, None);
        assert_eq!(fields.price.to_string(), "3.00");
    }

    #[test]
    fn accepts_numeric_price() {
        let fields = validate(&json!({ "name": "Float", "price": 10.5 })).unwrap();
        assert_eq!(fields.price.cents(), 1050);
    }

    #[test]
    fn missing_required_fields_are_reported_per_field() {
        let errors = validate(&json!({ "description": "only this" })).unwrap_err();
        assert_eq!(errors.field("name").unwrap(), [REQUIRED]);
        assert_eq!(errors.field("price").unwrap(), [REQUIRED]);
        assert!(errors.field("description").is_none());
    }

    #[test]
    fn invalid_price_messages() {
        let errors = validate(&json!({ "name": "x", "price": "cheap" })).unwrap_err();
        assert_eq!(errors.field("price").unwrap(), [INVALID_NUMBER]);

        let errors = validate(&json!({ "name": "x", "price": "1.234" })).unwrap_err();
        assert_eq!(
            errors.field("price").unwrap(),
            ["Ensure that there are no more than 2 decimal places."]
        );

        let errors = validate(&json!({ "name": "x", "price": [1] })).unwrap_err();
        assert_eq!(errors.field("price").unwrap(), [INVALID_NUMBER]);

        let errors = validate(&json!({ "name": "x", "price": null })).unwrap_err();
        assert_eq!(errors.field("price").unwrap(), [NOT_NULL]);
    }

    #[test]
    fn null_character_in_name_is_a_field_error() {
        let errors = validate(&json!({ "name": "a\0b", "price": "1.00" })).unwrap_err();
        assert_eq!(
            errors.field("name").unwrap(),
            [super::super::NULL_CHARACTER]
        );
    }

    #[test]
    fn patch_allows_missing_fields() {
        let patch = validate_patch(&json!({ "price": "2.00" })).unwrap();
        assert_eq!(patch.name, None);
        assert_eq!(patch.description, None);
        assert_eq!(patch.price.map(Price::cents), Some(200));
    }

    #[test]
    fn patch_still_rejects_blank_name() {
        let errors = validate_patch(&json!({ "name": "" })).unwrap_err();
        assert_eq!(errors.field("name").unwrap(), [super::super::NOT_BLANK]);
    }
}
