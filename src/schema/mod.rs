//! Parameter Schema Layer
//!
//! Declarative field descriptions shared by dial-plan node types, journey
//! actions and delay configs:
//! - `ParamDefinition` lists (flat, ordered, UI display order)
//! - JSON-schema-like `properties` maps
//! - Default-value derivation and config checking for both shapes

// Flat parameter definitions and default derivation
pub mod param;

// JSON-schema-like property maps
pub mod property;

// Config-vs-schema checking
pub mod check;

pub use check::{check_config, check_properties, ConfigIssue};
pub use param::{derive_defaults, ParamDefinition, ParamType, TemplateType};
pub use property::{derive_property_defaults, PropertyMap, PropertySchema, PropertyType};
