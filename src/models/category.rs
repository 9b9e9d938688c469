//! Product categories.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::trimmed;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub brand: String,
}

/// Create/update body. `id` is only checked against the path on update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryInput {
    pub id: Option<i32>,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 100, message = "brand must be at most 100 characters"))]
    pub brand: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_defaults_to_empty() {
        let input: CategoryInput = serde_json::from_str(r#"{"name": "Books"}"#).unwrap();
        assert_eq!(input.brand, "");
        assert!(input.id.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn whitespace_name_rejected() {
        let input: CategoryInput = serde_json::from_str(r#"{"name": "   "}"#).unwrap();
        assert_eq!(input.name, "");
        assert!(input.validate().is_err());
    }

    #[test]
    fn name_and_brand_trimmed() {
        let input: CategoryInput =
            serde_json::from_str(r#"{"name": " Books ", "brand": " Literature "}"#).unwrap();
        assert_eq!(input.name, "Books");
        assert_eq!(input.brand, "Literature");
    }

    #[test]
    fn empty_name_rejected() {
        let input: CategoryInput =
            serde_json::from_str(r#"{"name": "", "brand": "Tech"}"#).unwrap();
        assert!(input.validate().is_err());
    }
}
