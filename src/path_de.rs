use serde::de::DeserializeOwned;

use crate::error::FormError;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, FormError> {
    deserialize_with_path(&mut serde_json::Deserializer::from_str(src))
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, FormError> {
    deserialize_with_path(&mut serde_json::Deserializer::from_slice(bytes))
}

fn deserialize_with_path<'de, D, T>(de: D) -> Result<T, FormError>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned,
{
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        FormError::Decode(format!("at JSON path {path} → {}", err.into_inner()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn flat_values_decode_in_order() {
        let values: IndexMap<String, String> =
            from_str_with_path(r#"{"b": "2", "a": "1"}"#).unwrap();
        let keys: Vec<&str> = values.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn error_names_the_offending_key() {
        let err = from_slice_with_path::<IndexMap<String, String>>(br#"{"ok": "x", "age": 18}"#)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("age"), "{msg}");
    }

    #[test]
    fn str_and_slice_report_the_same_path() {
        let src = r#"{"rows": {"things": 2, "tags": "three"}}"#;
        let a = from_str_with_path::<IndexMap<String, IndexMap<String, usize>>>(src).unwrap_err();
        let b = from_slice_with_path::<IndexMap<String, IndexMap<String, usize>>>(src.as_bytes()).unwrap_err();
        assert_eq!(a.to_string(), b.to_string());
        assert!(a.to_string().starts_with("at JSON path rows.tags"), "{a}");
    }
}
