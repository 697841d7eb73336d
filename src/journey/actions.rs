//! Journey action type registry
//!
//! Maps each action type to the ordered list of parameters its config accepts.
//! The tables are fixture data: list order is the canonical display order.

use crate::error::SchemaError;
use crate::schema::{check_config, derive_defaults, ConfigIssue, ParamDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

/// Discriminant of a journey step action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyActionType {
    Call,
    Sms,
    Email,
    StatusChange,
    TagUpdate,
    Webhook,
    WaitForEvent,
    ConditionalBranch,
    LeadAssignment,
    DataUpdate,
    JourneyTransfer,
    Delay,
}

impl JourneyActionType {
    /// Every action type, in declaration order
    pub const ALL: [JourneyActionType; 12] = [
        JourneyActionType::Call,
        JourneyActionType::Sms,
        JourneyActionType::Email,
        JourneyActionType::StatusChange,
        JourneyActionType::TagUpdate,
        JourneyActionType::Webhook,
        JourneyActionType::WaitForEvent,
        JourneyActionType::ConditionalBranch,
        JourneyActionType::LeadAssignment,
        JourneyActionType::DataUpdate,
        JourneyActionType::JourneyTransfer,
        JourneyActionType::Delay,
    ];

    /// Wire tag (e.g., "status_change")
    pub fn as_str(&self) -> &'static str {
        match self {
            JourneyActionType::Call => "call",
            JourneyActionType::Sms => "sms",
            JourneyActionType::Email => "email",
            JourneyActionType::StatusChange => "status_change",
            JourneyActionType::TagUpdate => "tag_update",
            JourneyActionType::Webhook => "webhook",
            JourneyActionType::WaitForEvent => "wait_for_event",
            JourneyActionType::ConditionalBranch => "conditional_branch",
            JourneyActionType::LeadAssignment => "lead_assignment",
            JourneyActionType::DataUpdate => "data_update",
            JourneyActionType::JourneyTransfer => "journey_transfer",
            JourneyActionType::Delay => "delay",
        }
    }
}

impl fmt::Display for JourneyActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JourneyActionType {
    type Err = SchemaError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| SchemaError::UnknownActionType(tag.to_string()))
    }
}

/// Events a `wait_for_event` step can wait on
pub const WAIT_EVENT_TYPES: [&str; 8] = [
    "email_opened",
    "email_clicked",
    "sms_replied",
    "sms_clicked",
    "call_completed",
    "call_answered",
    "form_submitted",
    "status_changed",
];

/// Parameters accepted by an action type's config
pub fn action_type_params(action_type: JourneyActionType) -> Vec<ParamDefinition> {
    use ParamDefinition as P;

    match action_type {
        JourneyActionType::Call => vec![
            P::string("transferNumber", "Transfer Number")
                .required()
                .describe("Number the lead is bridged to once answered"),
            P::string("scriptId", "Call Script"),
            P::string("fallbackDID", "Fallback DID"),
            P::boolean("useLocalDID", "Use Local DID").default_value(true),
            P::number("maxAttempts", "Max Attempts").default_value(3),
            P::boolean("voicemailDetection", "Voicemail Detection").default_value(true),
            P::string("voicemailMessage", "Voicemail Message"),
            P::string("callerId", "Caller ID"),
            P::boolean("recordCall", "Record Call").default_value(true),
            P::boolean("respectBusinessHours", "Respect Business Hours").default_value(true),
        ],
        JourneyActionType::Sms => vec![
            P::string("message", "Message"),
            P::string("templateId", "SMS Template"),
            P::string("from", "From Number"),
            P::boolean("trackClicks", "Track Clicks").default_value(true),
            P::boolean("optOutMessage", "Append Opt-Out Message").default_value(true),
        ],
        JourneyActionType::Email => vec![
            P::string("subject", "Subject").required(),
            P::string("templateId", "Email Template").required(),
            P::string("from", "From Address"),
            P::string("fromName", "From Name"),
            P::string("replyTo", "Reply-To"),
            P::boolean("trackOpens", "Track Opens").default_value(true),
            P::boolean("trackClicks", "Track Clicks").default_value(true),
        ],
        JourneyActionType::StatusChange => vec![
            P::string("newStatus", "New Status").required(),
            P::boolean("recordNote", "Record Note").default_value(true),
            P::string("noteText", "Note Text").default_value("Status changed by journey"),
            P::boolean("updateLastAttempt", "Update Last Attempt").default_value(true),
        ],
        JourneyActionType::TagUpdate => vec![
            P::select("operation", "Operation", &["add", "remove", "set"])
                .required()
                .default_value("add"),
            P::string("tags", "Tags")
                .required()
                .describe("Comma-separated tag names"),
            P::boolean("recordNote", "Record Note").default_value(true),
            P::string("noteText", "Note Text").default_value("Tags updated by journey"),
        ],
        JourneyActionType::Webhook => vec![
            P::string("url", "URL").required(),
            P::select("method", "Method", &["GET", "POST", "PUT", "PATCH", "DELETE"])
                .default_value("POST"),
            P::number("timeout", "Timeout (ms)").default_value(10000),
            P::number("retries", "Retries").default_value(3),
            P::boolean("updateLeadData", "Update Lead Data")
                .default_value(false)
                .describe("Merge the JSON response into the lead record"),
        ],
        JourneyActionType::WaitForEvent => vec![
            P::select("eventType", "Event Type", &WAIT_EVENT_TYPES).required(),
            P::number("timeoutDays", "Timeout (days)").default_value(7),
            P::select("timeoutAction", "On Timeout", &["skip_step", "end_journey"])
                .default_value("skip_step"),
            P::boolean("captureData", "Capture Event Data").default_value(true),
        ],
        JourneyActionType::ConditionalBranch => vec![
            P::string("conditionField", "Field").required(),
            P::select(
                "operator",
                "Operator",
                &["=", "!=", ">", "<", ">=", "<=", "contains", "not_contains", "exists", "not_exists"],
            )
            .required(),
            P::string("value", "Value"),
            P::number("nextStepId", "Next Step (match)").required(),
            P::number("defaultNextStepId", "Next Step (no match)"),
        ],
        JourneyActionType::LeadAssignment => vec![
            P::select("assignmentType", "Assign To", &["user", "team"]).required(),
            P::string("assignToId", "Assignee").required(),
            P::boolean("notifyAssignee", "Notify Assignee").default_value(true),
            P::select("notificationMethod", "Notification Method", &["email", "sms", "system"])
                .default_value("email"),
            P::string("assignmentNote", "Assignment Note"),
            P::select("priority", "Priority", &["low", "medium", "high", "urgent"])
                .default_value("medium"),
        ],
        JourneyActionType::DataUpdate => vec![
            P::string("field", "Field").required(),
            P::string("value", "Value").required(),
            P::select("operation", "Operation", &["set", "increment", "decrement"])
                .default_value("set"),
            P::boolean("recordNote", "Record Note").default_value(true),
        ],
        JourneyActionType::JourneyTransfer => vec![
            P::number("targetJourneyId", "Target Journey").required(),
            P::boolean("exitCurrentJourney", "Exit Current Journey").default_value(true),
            P::boolean("transferContextData", "Transfer Context Data").default_value(true),
            P::number("startAtStep", "Start At Step"),
        ],
        JourneyActionType::Delay => vec![
            P::number("minutes", "Minutes").default_value(0),
            P::number("hours", "Hours").default_value(0),
            P::number("days", "Days").default_value(0),
            P::boolean("businessHoursOnly", "Business Hours Only").default_value(true),
            P::string("exactDateTime", "Exact Date/Time")
                .describe("ISO-8601 timestamp; overrides the relative delay when set"),
            P::boolean("overrideStepDelay", "Override Step Delay").default_value(true),
        ],
    }
}

/// Parameters for a raw tag; unknown tags are an error
pub fn action_type_params_for_tag(tag: &str) -> Result<Vec<ParamDefinition>, SchemaError> {
    Ok(action_type_params(tag.parse()?))
}

/// Initial config for a new action of this type
pub fn default_action_config_values(action_type: JourneyActionType) -> Map<String, Value> {
    derive_defaults(&action_type_params(action_type))
}

/// One configured step action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyAction {
    #[serde(rename = "type")]
    pub action_type: JourneyActionType,
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl JourneyAction {
    /// Action pre-filled with the type's derived defaults
    pub fn new(action_type: JourneyActionType) -> Self {
        Self {
            action_type,
            config: default_action_config_values(action_type),
        }
    }

    /// Switch type; the config is re-derived, previous values are dropped
    pub fn retype(&mut self, action_type: JourneyActionType) {
        *self = Self::new(action_type);
    }

    pub fn params(&self) -> Vec<ParamDefinition> {
        action_type_params(self.action_type)
    }

    /// Problems in the current config
    pub fn issues(&self) -> Vec<ConfigIssue> {
        check_config(&self.params(), &self.config)
    }
}
