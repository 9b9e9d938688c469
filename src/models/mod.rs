//! Database models and DTOs for all domain entities.

pub mod category;
pub mod money;
pub mod order;
pub mod pagination;
pub mod product;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Deserialize a string with surrounding whitespace removed, so length
/// validation sees what will be stored.
pub(crate) fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let s = String::deserialize(deserializer)?;
    Ok(s.trim().to_string())
}

/// Deserialize an optional string where a blank value counts as absent.
pub(crate) fn blank_as_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let s = Option::<String>::deserialize(deserializer)?;
    Ok(s.filter(|v| !v.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "trimmed")]
        name: String,
        #[serde(default, deserialize_with = "blank_as_none")]
        secret: Option<String>,
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let s: Sample = serde_json::from_str(r#"{"name": "  Books \n"}"#).unwrap();
        assert_eq!(s.name, "Books");
        assert!(s.secret.is_none());
    }

    #[test]
    fn blank_optional_is_none() {
        let s: Sample = serde_json::from_str(r#"{"name": "x", "secret": "   "}"#).unwrap();
        assert!(s.secret.is_none());
        let s: Sample = serde_json::from_str(r#"{"name": "x", "secret": null}"#).unwrap();
        assert!(s.secret.is_none());
    }

    #[test]
    fn non_blank_optional_kept_verbatim() {
        let s: Sample = serde_json::from_str(r#"{"name": "x", "secret": " pass "}"#).unwrap();
        assert_eq!(s.secret.as_deref(), Some(" pass "));
    }
}
