use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use crate::relations::Character;

/// Reads a character list from a JSON file.
pub fn load_characters(path: &Path) -> Result<Vec<Character>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read characters from {}", path.display()))?;
    parse_characters(&raw).with_context(|| format!("invalid character file {}", path.display()))
}

/// Accepts either a bare array of characters or an object holding one under
/// `characters`.
pub fn parse_characters(raw: &str) -> Result<Vec<Character>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON")?;
    let list = match &parsed {
        Value::Array(_) => &parsed,
        Value::Object(object) => object
            .get("characters")
            .ok_or_else(|| anyhow!("expected a \"characters\" array"))?,
        _ => return Err(anyhow!("expected an array of characters")),
    };

    Vec::<Character>::deserialize(list).context("malformed character entry")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::Role;

    #[test]
    fn bare_array_is_accepted() {
        let characters = parse_characters(
            r#"[
                { "id": "a", "name": "Aria", "role": "protagonist" },
                { "id": "b", "name": "Bren" }
            ]"#,
        )
        .unwrap();
        assert_eq!(characters.len(), 2);
        assert_eq!(characters[0].role, Role::Protagonist);
        assert_eq!(characters[1].role, Role::Other);
    }

    #[test]
    fn wrapped_list_keeps_extra_payload() {
        let characters = parse_characters(
            r#"{ "characters": [
                { "id": "a", "name": "Aria", "extra": { "relationships": ["Bren (friend)"] } }
            ] }"#,
        )
        .unwrap();
        assert_eq!(characters[0].extra["relationships"][0], "Bren (friend)");
    }

    #[test]
    fn wrong_shapes_are_errors() {
        assert!(parse_characters("42").is_err());
        assert!(parse_characters(r#"{ "cast": [] }"#).is_err());
        assert!(parse_characters(r#"[{ "name": "no id" }]"#).is_err());
        assert!(parse_characters("not json").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = load_characters(Path::new("/no/such/cast.json")).unwrap_err();
        assert!(format!("{error:#}").contains("/no/such/cast.json"));
    }
}
