//! JSON-schema-like property descriptions
//!
//! Some node types describe their configuration as an object keyed by property
//! name instead of a `paramDefs` list. Each entry carries a type, requiredness,
//! an optional default, an optional enum and a display format.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Type of a schema property
///
/// Backends are free to grow new type names (`"file"`, `"null"`, ...). Those
/// decode as `Unknown` so one unfamiliar property never hides its node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    #[serde(other)]
    Unknown,
}

/// One property of a `properties` schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Allowed values
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Display hint (e.g., "uri", "regex", "sound-file")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Property schemas keyed by property name
pub type PropertyMap = BTreeMap<String, PropertySchema>;

impl PropertySchema {
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type,
            required: false,
            default: None,
            enum_values: None,
            format: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.enum_values = Some(values.iter().map(|v| Value::from(*v)).collect());
        self
    }

    /// Value a required property gets when it has no declared default
    pub fn empty_value(&self) -> Value {
        if let Some(first) = self.enum_values.as_ref().and_then(|e| e.first()) {
            return first.clone();
        }
        match self.property_type {
            PropertyType::String => Value::String(String::new()),
            PropertyType::Number | PropertyType::Integer => Value::from(0),
            PropertyType::Boolean => Value::Bool(false),
            PropertyType::Array => Value::Array(Vec::new()),
            PropertyType::Object => Value::Object(Map::new()),
            PropertyType::Unknown => Value::Null,
        }
    }

    pub fn initial_value(&self) -> Option<Value> {
        match &self.default {
            Some(default) => Some(default.clone()),
            None if self.required => Some(self.empty_value()),
            None => None,
        }
    }

    /// True when `value` matches the declared type and enum
    pub fn accepts(&self, value: &Value) -> bool {
        if let Some(allowed) = &self.enum_values {
            if !allowed.is_empty() && !allowed.contains(value) {
                return false;
            }
        }
        match self.property_type {
            PropertyType::String => value.is_string(),
            PropertyType::Number => value.is_number(),
            PropertyType::Integer => value.is_i64() || value.is_u64(),
            PropertyType::Boolean => value.is_boolean(),
            PropertyType::Array => value.is_array(),
            PropertyType::Object => value.is_object(),
            PropertyType::Unknown => true,
        }
    }
}

/// Derive the initial properties object for a `properties` schema
pub fn derive_property_defaults(properties: &PropertyMap) -> Map<String, Value> {
    properties
        .iter()
        .filter_map(|(key, schema)| schema.initial_value().map(|v| (key.clone(), v)))
        .collect()
}
