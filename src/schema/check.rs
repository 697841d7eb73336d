//! Checking user-edited configs against their schema

use crate::schema::param::ParamDefinition;
use crate::schema::property::{PropertyMap, PropertySchema};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// A single problem found in a config object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigIssue {
    /// A required field has no value (absent or null)
    MissingRequired { field: String },
    /// A key the schema does not declare
    UnknownField { field: String },
    /// A value of the wrong type, or a select value outside its options
    InvalidValue { field: String, value: Value },
}

impl ConfigIssue {
    pub fn field(&self) -> &str {
        match self {
            ConfigIssue::MissingRequired { field }
            | ConfigIssue::UnknownField { field }
            | ConfigIssue::InvalidValue { field, .. } => field,
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigIssue::MissingRequired { field } => write!(f, "'{}' is required", field),
            ConfigIssue::UnknownField { field } => write!(f, "'{}' is not a known field", field),
            ConfigIssue::InvalidValue { field, value } => {
                write!(f, "'{}' has an invalid value: {}", field, value)
            }
        }
    }
}

/// Common view over the two schema shapes
trait FieldSpec {
    fn is_required(&self) -> bool;
    fn accepts(&self, value: &Value) -> bool;
}

impl FieldSpec for ParamDefinition {
    fn is_required(&self) -> bool {
        self.required
    }

    fn accepts(&self, value: &Value) -> bool {
        ParamDefinition::accepts(self, value)
    }
}

impl FieldSpec for PropertySchema {
    fn is_required(&self) -> bool {
        self.required
    }

    fn accepts(&self, value: &Value) -> bool {
        PropertySchema::accepts(self, value)
    }
}

fn check_fields<'a, S: FieldSpec + 'a>(
    fields: impl Iterator<Item = (&'a str, &'a S)> + Clone,
    config: &Map<String, Value>,
) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    for (key, spec) in fields.clone() {
        match config.get(key) {
            None | Some(Value::Null) => {
                if spec.is_required() {
                    issues.push(ConfigIssue::MissingRequired { field: key.to_string() });
                }
            }
            Some(value) if !spec.accepts(value) => {
                issues.push(ConfigIssue::InvalidValue {
                    field: key.to_string(),
                    value: value.clone(),
                });
            }
            Some(_) => {}
        }
    }

    for key in config.keys() {
        if !fields.clone().any(|(k, _)| k == key) {
            issues.push(ConfigIssue::UnknownField { field: key.clone() });
        }
    }

    issues
}

/// Check `config` against a `paramDefs` list
pub fn check_config(params: &[ParamDefinition], config: &Map<String, Value>) -> Vec<ConfigIssue> {
    check_fields(params.iter().map(|p| (p.id.as_str(), p)), config)
}

/// Check `config` against a `properties` schema
pub fn check_properties(properties: &PropertyMap, config: &Map<String, Value>) -> Vec<ConfigIssue> {
    check_fields(properties.iter().map(|(k, s)| (k.as_str(), s)), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::property::PropertyType;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn reports_missing_unknown_and_invalid() {
        let params = vec![
            ParamDefinition::string("url", "URL").required(),
            ParamDefinition::select("method", "Method", &["GET", "POST"]).default_value("POST"),
            ParamDefinition::number("retries", "Retries"),
        ];
        let config = as_map(json!({ "method": "TRACE", "retries": "three", "extra": 1 }));

        let issues = check_config(&params, &config);

        assert_eq!(
            issues,
            vec![
                ConfigIssue::MissingRequired { field: "url".into() },
                ConfigIssue::InvalidValue { field: "method".into(), value: json!("TRACE") },
                ConfigIssue::InvalidValue { field: "retries".into(), value: json!("three") },
                ConfigIssue::UnknownField { field: "extra".into() },
            ]
        );
    }

    #[test]
    fn null_counts_as_missing() {
        let params = vec![ParamDefinition::string("subject", "Subject").required()];
        let issues = check_config(&params, &as_map(json!({ "subject": null })));
        assert_eq!(issues[0].field(), "subject");
    }

    #[test]
    fn property_schema_enum_is_enforced() {
        let mut properties = PropertyMap::new();
        properties.insert(
            "tech".into(),
            PropertySchema::new(PropertyType::String).one_of(&["PJSIP", "SIP"]),
        );

        assert!(check_properties(&properties, &as_map(json!({ "tech": "SIP" }))).is_empty());
        assert_eq!(check_properties(&properties, &as_map(json!({ "tech": "H323" }))).len(), 1);
    }
}
