//! Inventory item form
//!
//! Holds the values of the add/edit modal and gates submission on
//! field validation.

use serde::Serialize;
use std::collections::BTreeMap;
use validator::Validate;

use super::validators::{describe, parse_integer, strip_quotes};
use crate::core::error::{FieldValidationError, ValidationError};
use crate::entities::InventoryItem;

/// The editable fields of [`InventoryForm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    Name,
    Quantity,
    Threshold,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Quantity, FormField::Threshold];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Quantity => "quantity",
            FormField::Threshold => "threshold",
        }
    }
}

/// Values of the inventory add/edit form
///
/// `original_name` and `id` are only set while editing an existing item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InventoryForm {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(length(min = 3, max = 20))]
    pub name: String,

    #[validate(range(min = 0, max = 1000))]
    pub quantity: i64,

    #[validate(range(min = 0, max = 100))]
    pub threshold: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,

    /// Parse failures of raw numeric input, reported ahead of rule failures
    #[serde(skip)]
    parse_errors: BTreeMap<FormField, String>,
}

impl InventoryForm {
    /// Form pre-filled from an existing item, in edit mode
    pub fn for_edit(item: &InventoryItem) -> Self {
        Self {
            id: (!item.id.is_empty()).then(|| item.id.clone()),
            name: item.name.clone(),
            quantity: item.quantity as i64,
            threshold: item.threshold as i64,
            original_name: Some(item.name.clone()),
            parse_errors: BTreeMap::new(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.original_name.is_some() || self.id.is_some()
    }

    /// Restore the default (empty, create-mode) values
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set a field from raw text input
    ///
    /// Numeric fields that do not parse keep their previous value and record
    /// a parse error, which blocks submission until corrected.
    pub fn set_input(&mut self, field: FormField, raw: &str) {
        self.parse_errors.remove(&field);
        match field {
            FormField::Name => self.name = raw.to_string(),
            FormField::Quantity | FormField::Threshold => {
                match parse_integer(field.as_str(), raw) {
                    Ok(v) if field == FormField::Quantity => self.quantity = v,
                    Ok(v) => self.threshold = v,
                    Err(message) => {
                        self.parse_errors.insert(field, message);
                    }
                }
            }
        }
    }

    /// Run every rule, collecting all failures in field order
    pub fn check(&self) -> Result<(), ValidationError> {
        let mut errors: Vec<FieldValidationError> = self
            .parse_errors
            .iter()
            .map(|(field, message)| FieldValidationError {
                field: field.as_str().to_string(),
                message: message.clone(),
            })
            .collect();

        if let Err(rule_errors) = self.validate() {
            let by_field = rule_errors.field_errors();
            for field in FormField::ALL {
                let Some(list) = by_field.get(field.as_str()) else {
                    continue;
                };
                errors.extend(list.iter().map(|e| FieldValidationError {
                    field: field.as_str().to_string(),
                    message: describe(field.as_str(), e),
                }));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            errors.sort_by_key(|e| {
                FormField::ALL
                    .iter()
                    .position(|f| f.as_str() == e.field)
                    .unwrap_or(usize::MAX)
            });
            Err(ValidationError::FieldErrors(errors))
        }
    }

    /// First error message of a field, ready for inline display
    pub fn field_error(&self, field: FormField) -> Option<String> {
        let Err(err) = self.check() else {
            return None;
        };
        err.first_messages()
            .get(field.as_str())
            .map(|m| strip_quotes(m))
    }

    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_form() -> InventoryForm {
        InventoryForm {
            name: "Milk".to_string(),
            quantity: 2,
            threshold: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().check().is_ok());
    }

    #[test]
    fn test_default_form_is_invalid_on_name() {
        let form = InventoryForm::default();
        let err = form.check().unwrap_err();
        let first = err.first_messages();
        assert!(first.contains_key("name"));
        assert!(!first.contains_key("quantity"));
    }

    #[test]
    fn test_bounds() {
        let mut form = valid_form();
        form.quantity = 1001;
        form.threshold = 101;
        form.name = "x".repeat(21);
        let first = form.check().unwrap_err().first_messages();
        assert_eq!(first.len(), 3);

        form.quantity = 1000;
        form.threshold = 100;
        form.name = "x".repeat(20);
        assert!(form.is_valid());
    }

    #[test]
    fn test_field_error_strips_quotes() {
        let mut form = valid_form();
        form.name = "ab".to_string();
        let message = form.field_error(FormField::Name).expect("name is invalid");
        assert!(!message.contains('"'));
        assert!(message.starts_with("name"));
        assert_eq!(form.field_error(FormField::Quantity), None);
    }

    #[test]
    fn test_unparseable_input_blocks_submission() {
        let mut form = valid_form();
        form.set_input(FormField::Quantity, "lots");
        assert_eq!(form.quantity, 2);
        assert!(!form.is_valid());
        assert!(form.field_error(FormField::Quantity).is_some());

        form.set_input(FormField::Quantity, "7");
        assert_eq!(form.quantity, 7);
        assert!(form.is_valid());
    }

    #[test]
    fn test_edit_payload_carries_id_and_original_name() {
        let item = InventoryItem::new("abc", "Milk", 2, 5);
        let mut form = InventoryForm::for_edit(&item);
        assert!(form.is_edit());
        form.set_input(FormField::Name, "Oat milk");

        let body = serde_json::to_value(&form).unwrap();
        assert_eq!(
            body,
            json!({
                "_id": "abc",
                "name": "Oat milk",
                "quantity": 2,
                "threshold": 5,
                "originalName": "Milk"
            })
        );
    }

    #[test]
    fn test_create_payload_omits_edit_fields() {
        let body = serde_json::to_value(valid_form()).unwrap();
        assert_eq!(body, json!({"name": "Milk", "quantity": 2, "threshold": 5}));
    }

    #[test]
    fn test_reset_returns_to_create_mode() {
        let mut form = InventoryForm::for_edit(&InventoryItem::new("abc", "Milk", 2, 5));
        form.reset();
        assert!(!form.is_edit());
        assert_eq!(form, InventoryForm::default());
    }
}
