//! Declarative parameter definitions
//!
//! A `ParamDefinition` describes one configurable field: its type, whether it is
//! required, an optional default and, for selects, the allowed options. The same
//! shape drives node properties, journey actions and delay configs.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Select,
    /// Reference to a template of `ParamDefinition::template_type`
    TemplateSelect,
    /// Reference to a transfer group
    TransferGroupSelect,
    /// Reference to an uploaded recording
    RecordingSelect,
    /// Digit → destination table of an IVR menu
    IvrOptions,
}

/// Kind of template a `TemplateSelect` parameter points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    Sms,
    Email,
    Script,
    Voicemail,
    Transfer,
}

/// Schema of one configurable field
///
/// Shared by journey actions, journey delays and dial-plan node types that
/// ship `paramDefs`. The editor renders one input per definition and
/// `derive_defaults` builds the initial config from the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDefinition {
    /// Key under which the value is stored (e.g., "transferNumber")
    pub id: String,
    /// Human-readable label
    pub name: String,
    /// Field type
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Whether a value must be present
    #[serde(default)]
    pub required: bool,
    /// Declared default, copied verbatim into derived configs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Allowed values for `Select`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Template kind for `TemplateSelect`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_type: Option<TemplateType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParamDefinition {
    fn new(id: &str, name: &str, param_type: ParamType) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            param_type,
            required: false,
            default: None,
            options: None,
            template_type: None,
            description: None,
        }
    }

    pub fn string(id: &str, name: &str) -> Self {
        Self::new(id, name, ParamType::String)
    }

    pub fn number(id: &str, name: &str) -> Self {
        Self::new(id, name, ParamType::Number)
    }

    pub fn boolean(id: &str, name: &str) -> Self {
        Self::new(id, name, ParamType::Boolean)
    }

    pub fn select(id: &str, name: &str, options: &[&str]) -> Self {
        let mut def = Self::new(id, name, ParamType::Select);
        def.options = Some(options.iter().map(|o| o.to_string()).collect());
        def
    }

    pub fn template(id: &str, name: &str, template_type: TemplateType) -> Self {
        let mut def = Self::new(id, name, ParamType::TemplateSelect);
        def.template_type = Some(template_type);
        def
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Non-empty options list, if any
    pub fn options(&self) -> Option<&[String]> {
        self.options.as_deref().filter(|o| !o.is_empty())
    }

    /// Check the select-default invariant: a select with options and a default
    /// must have the default among its options.
    pub fn check(&self) -> Result<(), SchemaError> {
        if self.param_type != ParamType::Select {
            return Ok(());
        }
        if let (Some(options), Some(default)) = (self.options(), &self.default) {
            let member = default
                .as_str()
                .map(|d| options.iter().any(|o| o == d))
                .unwrap_or(false);
            if !member {
                return Err(SchemaError::DefaultNotInOptions {
                    param: self.id.clone(),
                    default: default.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Value a required field gets when it has no declared default
    pub fn empty_value(&self) -> Value {
        match self.param_type {
            ParamType::String
            | ParamType::TemplateSelect
            | ParamType::TransferGroupSelect
            | ParamType::RecordingSelect => Value::String(String::new()),
            ParamType::Number => Value::from(0),
            ParamType::Boolean => Value::Bool(false),
            ParamType::Select => self
                .options()
                .and_then(|o| o.first())
                .map(|first| Value::String(first.clone()))
                .unwrap_or_else(|| Value::String(String::new())),
            ParamType::IvrOptions => Value::Array(Vec::new()),
        }
    }

    /// Initial value for a fresh config, or None when the key should be omitted
    pub fn initial_value(&self) -> Option<Value> {
        match &self.default {
            Some(default) => Some(default.clone()),
            None if self.required => Some(self.empty_value()),
            None => None,
        }
    }

    /// True when `value` has the JSON shape this parameter expects
    pub fn accepts(&self, value: &Value) -> bool {
        match self.param_type {
            ParamType::String
            | ParamType::TemplateSelect
            | ParamType::TransferGroupSelect
            | ParamType::RecordingSelect => value.is_string() || value.is_number(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Select => match (self.options(), value.as_str()) {
                (Some(options), Some(v)) => options.iter().any(|o| o == v),
                (None, Some(_)) => true,
                _ => false,
            },
            ParamType::IvrOptions => value.is_array() || value.is_object(),
        }
    }
}

/// Derive the initial config object for a parameter list
///
/// Declared defaults win; required fields without one get an empty value of
/// their type; everything else is left out.
pub fn derive_defaults(params: &[ParamDefinition]) -> Map<String, Value> {
    params
        .iter()
        .filter_map(|p| p.initial_value().map(|v| (p.id.clone(), v)))
        .collect()
}
