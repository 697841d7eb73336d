//! Journey Configuration Layer
//!
//! Schema-driven configuration of lead-nurturing journey steps:
//! - Action type registry (call, sms, email, webhook, ...)
//! - Delay type registry (immediate, fixed_time, ...)
//! - Steps combining an action with its delay

// Action type → parameter table
pub mod actions;

// Delay type → parameter table
pub mod delays;

// Journey steps
pub mod step;

pub use actions::{
    action_type_params, action_type_params_for_tag, default_action_config_values, JourneyAction,
    JourneyActionType,
};
pub use delays::{
    default_delay_config_values, delay_type_params, delay_type_params_for_tag, DelayConfig,
    DelayType,
};
pub use step::JourneyStep;
