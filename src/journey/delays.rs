//! Delay type registry for journey steps

use crate::error::SchemaError;
use crate::schema::{check_config, derive_defaults, ConfigIssue, ParamDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

/// How long a step waits before its action runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayType {
    Immediate,
    FixedTime,
    DelayAfterPrevious,
    DelayAfterEnrollment,
    SpecificDays,
}

impl DelayType {
    pub const ALL: [DelayType; 5] = [
        DelayType::Immediate,
        DelayType::FixedTime,
        DelayType::DelayAfterPrevious,
        DelayType::DelayAfterEnrollment,
        DelayType::SpecificDays,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DelayType::Immediate => "immediate",
            DelayType::FixedTime => "fixed_time",
            DelayType::DelayAfterPrevious => "delay_after_previous",
            DelayType::DelayAfterEnrollment => "delay_after_enrollment",
            DelayType::SpecificDays => "specific_days",
        }
    }
}

impl fmt::Display for DelayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DelayType {
    type Err = SchemaError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| SchemaError::UnknownDelayType(tag.to_string()))
    }
}

fn relative_delay_params() -> Vec<ParamDefinition> {
    vec![
        ParamDefinition::number("minutes", "Minutes").default_value(0),
        ParamDefinition::number("hours", "Hours").default_value(0),
        ParamDefinition::number("days", "Days").default_value(0),
    ]
}

/// Parameters accepted by a delay type's config
pub fn delay_type_params(delay_type: DelayType) -> Vec<ParamDefinition> {
    match delay_type {
        DelayType::Immediate => Vec::new(),
        DelayType::FixedTime => vec![ParamDefinition::string("time", "Time of Day")
            .required()
            .describe("24h clock, HH:MM")],
        DelayType::DelayAfterPrevious | DelayType::DelayAfterEnrollment => relative_delay_params(),
        DelayType::SpecificDays => vec![
            ParamDefinition::select(
                "days",
                "Days",
                &["mon", "tue", "wed", "thu", "fri", "sat", "sun"],
            )
            .required(),
            ParamDefinition::string("time", "Time of Day").required(),
        ],
    }
}

/// Parameters for a raw tag; unknown tags are an error
pub fn delay_type_params_for_tag(tag: &str) -> Result<Vec<ParamDefinition>, SchemaError> {
    Ok(delay_type_params(tag.parse()?))
}

/// Initial config for a new delay of this type
pub fn default_delay_config_values(delay_type: DelayType) -> Map<String, Value> {
    derive_defaults(&delay_type_params(delay_type))
}

/// Delay attached to a journey step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayConfig {
    #[serde(rename = "type")]
    pub delay_type: DelayType,
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl DelayConfig {
    pub fn new(delay_type: DelayType) -> Self {
        Self {
            delay_type,
            config: default_delay_config_values(delay_type),
        }
    }

    pub fn retype(&mut self, delay_type: DelayType) {
        *self = Self::new(delay_type);
    }

    pub fn issues(&self) -> Vec<ConfigIssue> {
        check_config(&delay_type_params(self.delay_type), &self.config)
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self::new(DelayType::Immediate)
    }
}
