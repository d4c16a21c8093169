//! Type-safe schema generation for OpenAI structured outputs.
//!
//! Uses the `schemars` crate to generate JSON schemas from Rust types and
//! rewrites them into the subset OpenAI accepts in strict mode.
//!
//! # Example
//!
//! ```rust,ignore
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use openai_client::StructuredOutput;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct SearchQueries {
//!     queries: Vec<String>,
//! }
//!
//! let schema = SearchQueries::openai_schema();
//! ```

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Trait for types that can be used as OpenAI structured output.
///
/// Automatically implemented for any type that implements `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate an OpenAI-compatible JSON schema for this type.
    ///
    /// OpenAI strict mode requires:
    /// 1. `additionalProperties: false` on every object schema
    /// 2. every property listed in `required`, even nullable ones
    /// 3. no `$ref` into `definitions`
    /// 4. no numeric `format` hints such as `uint8` or `float`
    fn openai_schema() -> Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        let definitions = match &mut value {
            Value::Object(map) => {
                map.remove("$schema");
                map.remove("definitions")
            }
            _ => None,
        };

        if let Some(defs) = definitions {
            inline_refs(&mut value, &defs);
        }
        make_strict(&mut value);

        value
    }

    /// Get the schema name for this type.
    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Close every object schema and drop keywords strict mode rejects.
fn make_strict(value: &mut Value) {
    match value {
        Value::Object(map) => {
            flatten_single_all_of(map);
            // Documented enum variants come out as `oneOf`, strict mode only takes `anyOf`.
            if let Some(one_of) = map.remove("oneOf") {
                map.insert("anyOf".to_string(), one_of);
            }
            if map.get("type").and_then(Value::as_str) == Some("object") {
                close_object(map);
            }
            if is_numeric(map) {
                map.remove("format");
            }
            for (_, v) in map.iter_mut() {
                make_strict(v);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(make_strict),
        _ => {}
    }
}

/// schemars wraps documented struct fields as `{"description", "allOf": [inner]}`.
fn flatten_single_all_of(map: &mut Map<String, Value>) {
    let single = match map.get("allOf").and_then(Value::as_array) {
        Some(items) if items.len() == 1 && items[0].is_object() => items[0].clone(),
        _ => return,
    };
    map.remove("allOf");
    if let Value::Object(inner) = single {
        for (k, v) in inner {
            map.entry(k).or_insert(v);
        }
    }
}

fn close_object(map: &mut Map<String, Value>) {
    map.insert("additionalProperties".to_string(), Value::Bool(false));

    let keys: Option<Vec<Value>> = map
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| props.keys().cloned().map(Value::String).collect());

    if let Some(keys) = keys {
        map.insert("required".to_string(), Value::Array(keys));
    }
}

fn is_numeric(map: &Map<String, Value>) -> bool {
    let is_num = |t: &str| t == "integer" || t == "number";
    match map.get("type") {
        Some(Value::String(t)) => is_num(t),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(is_num),
        _ => false,
    }
}

/// Replace `{"$ref": "#/definitions/X"}` with the definition of `X`.
fn inline_refs(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
                .cloned();

            if let Some(mut def) = target {
                inline_refs(&mut def, definitions);
                // Keep sibling keywords such as `description`.
                map.remove("$ref");
                if let Value::Object(def_map) = def {
                    for (k, v) in def_map {
                        map.entry(k).or_insert(v);
                    }
                }
                return;
            }

            for (_, v) in map.iter_mut() {
                inline_refs(v, definitions);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|v| inline_refs(v, definitions)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    #[serde(rename_all = "snake_case")]
    #[allow(dead_code)]
    enum Label {
        Supported,
        Refuted,
    }

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Item {
        /// Item text
        text: String,
        priority: u8,
        note: Option<String>,
    }

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Envelope {
        items: Vec<Item>,
        label: Label,
        score: f32,
    }

    #[test]
    fn test_root_has_no_definitions_or_schema_key() {
        let schema = Envelope::openai_schema();
        let obj = schema.as_object().unwrap();

        assert!(!obj.contains_key("definitions"));
        assert!(!obj.contains_key("$schema"));
        assert_eq!(obj.get("additionalProperties"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_nested_objects_are_inlined_and_closed() {
        let schema = Envelope::openai_schema();
        let text = serde_json::to_string(&schema).unwrap();
        assert!(!text.contains("$ref"), "refs should be inlined: {}", text);

        let item = &schema["properties"]["items"]["items"];
        assert_eq!(item["type"], "object");
        assert_eq!(item["additionalProperties"], Value::Bool(false));

        let required: Vec<&str> = item["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(required.contains(&"text"));
        assert!(required.contains(&"priority"));
        assert!(required.contains(&"note"), "Option fields must be required too");
    }

    #[test]
    fn test_enum_is_inlined_with_variants() {
        let schema = Envelope::openai_schema();
        let label = &schema["properties"]["label"];
        let variants: Vec<&str> = label["enum"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(variants, vec!["supported", "refuted"]);
    }

    #[test]
    fn test_numeric_formats_are_removed() {
        let schema = Envelope::openai_schema();
        assert!(schema["properties"]["score"].get("format").is_none());
        assert!(schema["properties"]["items"]["items"]["properties"]["priority"]
            .get("format")
            .is_none());
    }

    #[test]
    fn test_documented_struct_field_is_flattened() {
        #[derive(Deserialize, JsonSchema)]
        #[allow(dead_code)]
        struct Wrapper {
            /// The wrapped item
            item: Item,
        }

        let schema = Wrapper::openai_schema();
        let item = &schema["properties"]["item"];
        assert!(item.get("allOf").is_none());
        assert_eq!(item["type"], "object");
        assert_eq!(item["additionalProperties"], Value::Bool(false));
        assert_eq!(item["description"], "The wrapped item");
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Envelope::type_name(), "Envelope");
    }
}
