//! Required-field presence check, the only validation the forms perform

use super::types::FieldSpec;
use serde_json::{Map, Value};

/// Whether a draft value counts as filled in.
///
/// Blank strings, `null`, `false`, empty arrays and empty objects are empty;
/// numbers always count as filled, including zero.
pub fn has_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(_)) => true,
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => map.values().any(|v| has_value(Some(v))),
    }
}

/// First required field without a value, in schema order
pub fn first_missing<'a>(fields: &'a [FieldSpec], draft: &Map<String, Value>) -> Option<&'a FieldSpec> {
    fields
        .iter()
        .filter(|f| f.required && f.kind.stores_value())
        .find(|f| !has_value(draft.get(f.name)))
}

/// Message shown when a required field is empty
pub fn required_message(label: &str) -> String {
    format!("O campo \"{}\" é obrigatório!", label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metadata::FieldKind;
    use serde_json::json;

    #[test]
    fn test_has_value() {
        assert!(!has_value(None));
        assert!(!has_value(Some(&json!(null))));
        assert!(!has_value(Some(&json!("   "))));
        assert!(has_value(Some(&json!("x"))));
        assert!(has_value(Some(&json!(0))));
        assert!(!has_value(Some(&json!({"nome": ""}))));
        assert!(has_value(Some(&json!({"nome": "Ana"}))));
    }

    #[test]
    fn test_first_missing_in_schema_order() {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::text("nome", "Nome").required(),
            FieldSpec::text("empresa", "Empresa"),
            FieldSpec::new("CNPJ", "CNPJ", FieldKind::Text).required(),
        ];
        let mut draft = Map::new();
        assert_eq!(first_missing(FIELDS, &draft).map(|f| f.name), Some("nome"));

        draft.insert("nome".into(), json!("Ana"));
        assert_eq!(first_missing(FIELDS, &draft).map(|f| f.label), Some("CNPJ"));

        draft.insert("CNPJ".into(), json!("12.345.678/0001-90"));
        assert!(first_missing(FIELDS, &draft).is_none());
    }

    #[test]
    fn test_required_message() {
        assert_eq!(required_message("Nome"), "O campo \"Nome\" é obrigatório!");
    }
}
