//! A nurture journey step: one action plus the delay before it runs

use crate::journey::actions::{JourneyAction, JourneyActionType};
use crate::journey::delays::DelayConfig;
use crate::schema::ConfigIssue;
use serde::{Deserialize, Serialize};

/// One step of a lead-nurturing journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyStep {
    /// 1-based position in the journey
    pub step_order: u32,
    pub action: JourneyAction,
    #[serde(default)]
    pub delay: DelayConfig,
}

/// Where a step's issue was found
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPart {
    Action,
    Delay,
}

impl JourneyStep {
    pub fn new(step_order: u32, action_type: JourneyActionType) -> Self {
        Self {
            step_order,
            action: JourneyAction::new(action_type),
            delay: DelayConfig::default(),
        }
    }

    /// Config issues of both the action and the delay
    pub fn issues(&self) -> Vec<(StepPart, ConfigIssue)> {
        self.action
            .issues()
            .into_iter()
            .map(|i| (StepPart::Action, i))
            .chain(self.delay.issues().into_iter().map(|i| (StepPart::Delay, i)))
            .collect()
    }
}

/// Step ids referenced by branching actions that do not exist in `steps`
///
/// `conditional_branch` jumps by `nextStepId` / `defaultNextStepId`, which refer
/// to `step_order` values.
pub fn dangling_branch_targets(steps: &[JourneyStep]) -> Vec<(u32, u64)> {
    let known: Vec<u32> = steps.iter().map(|s| s.step_order).collect();
    let known = &known;

    steps
        .iter()
        .filter(|s| s.action.action_type == JourneyActionType::ConditionalBranch)
        .flat_map(move |s| {
            ["nextStepId", "defaultNextStepId"]
                .into_iter()
                .filter_map(move |key| s.action.config.get(key).and_then(|v| v.as_u64()))
                .filter(move |target| !known.iter().any(|k| u64::from(*k) == *target))
                .map(move |target| (s.step_order, target))
        })
        .collect()
}
