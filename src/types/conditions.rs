// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Status conditions shared by every riff resource.
//!
//! Each kind binds a [`ConditionSet`]: the designated ready condition plus a table of dependent
//! conditions and whether each one is required for the resource to be ready. The set computes
//! the aggregate ready condition whenever a dependent changes.

use k8s_openapi::api::apps::v1::DeploymentStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Condition type every riff resource reports its aggregate readiness with
pub const READY: &str = "Ready";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConditionStatus::True => "True",
            ConditionStatus::False => "False",
            ConditionStatus::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

impl From<&str> for ConditionStatus {
    fn from(s: &str) -> Self {
        match s {
            "True" => ConditionStatus::True,
            "False" => ConditionStatus::False,
            _ => ConditionStatus::Unknown,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: ConditionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    pub fn new(condition_type: &str, status: ConditionStatus) -> Self {
        Condition {
            condition_type: condition_type.to_string(),
            status,
            reason: None,
            message: None,
        }
    }

    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }

    pub fn is_false(&self) -> bool {
        self.status == ConditionStatus::False
    }
}

/// Status fields common to every riff resource
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl Status {
    pub fn get_condition(&self, condition_type: &str) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.condition_type == condition_type)
    }

    fn set_condition(&mut self, condition: Condition) {
        match self
            .conditions
            .iter_mut()
            .find(|c| c.condition_type == condition.condition_type)
        {
            Some(existing) => *existing = condition,
            None => self.conditions.push(condition),
        }
    }
}

/// Aggregation rule from dependent conditions to the ready condition
#[derive(Debug)]
pub struct ConditionSet {
    ready: &'static str,
    dependents: &'static [(&'static str, bool)],
}

impl ConditionSet {
    /// A set whose `Ready` condition aggregates the given `(condition, required)` table
    pub const fn living(dependents: &'static [(&'static str, bool)]) -> Self {
        ConditionSet {
            ready: READY,
            dependents,
        }
    }

    pub fn ready_condition_type(&self) -> &'static str {
        self.ready
    }

    pub fn is_required(&self, condition_type: &str) -> bool {
        self.dependents
            .iter()
            .any(|(name, required)| *required && *name == condition_type)
    }

    pub fn is_happy(&self, status: &Status) -> bool {
        status
            .get_condition(self.ready)
            .is_some_and(Condition::is_true)
    }

    pub fn manage<'a>(&'static self, status: &'a mut Status) -> ConditionManager<'a> {
        ConditionManager { set: self, status }
    }
}

/// Mutates a status according to its kind's condition set
pub struct ConditionManager<'a> {
    set: &'static ConditionSet,
    status: &'a mut Status,
}

impl ConditionManager<'_> {
    pub fn is_happy(&self) -> bool {
        self.set.is_happy(self.status)
    }

    pub fn get_condition(&self, condition_type: &str) -> Option<&Condition> {
        self.status.get_condition(condition_type)
    }

    /// Add any missing condition as Unknown, or True when the resource is already ready
    pub fn initialize_conditions(&mut self) {
        if self.status.get_condition(self.set.ready).is_none() {
            self.status
                .set_condition(Condition::new(self.set.ready, ConditionStatus::Unknown));
        }
        let initial = if self.is_happy() {
            ConditionStatus::True
        } else {
            ConditionStatus::Unknown
        };
        for (name, _) in self.set.dependents {
            if self.status.get_condition(name).is_none() {
                self.status.set_condition(Condition::new(name, initial));
            }
        }
    }

    pub fn mark_true(&mut self, condition_type: &str) {
        self.status
            .set_condition(Condition::new(condition_type, ConditionStatus::True));

        let all_required_true = self
            .set
            .dependents
            .iter()
            .filter(|(_, required)| *required)
            .all(|(name, _)| self.status.get_condition(name).is_some_and(Condition::is_true));
        if all_required_true {
            self.status
                .set_condition(Condition::new(self.set.ready, ConditionStatus::True));
        }
    }

    pub fn mark_false(&mut self, condition_type: &str, reason: &str, message: &str) {
        let condition = Condition {
            reason: Some(reason.to_string()),
            message: Some(message.to_string()),
            ..Condition::new(condition_type, ConditionStatus::False)
        };
        self.status.set_condition(condition.clone());

        if condition_type != self.set.ready && self.set.is_required(condition_type) {
            self.status.set_condition(Condition {
                condition_type: self.set.ready.to_string(),
                ..condition
            });
        }
    }

    pub fn mark_unknown(&mut self, condition_type: &str, reason: &str, message: &str) {
        let condition = Condition {
            reason: Some(reason.to_string()),
            message: Some(message.to_string()),
            ..Condition::new(condition_type, ConditionStatus::Unknown)
        };
        self.status.set_condition(condition.clone());

        if condition_type == self.set.ready || !self.set.is_required(condition_type) {
            return;
        }
        // another required dependent that is False keeps the resource False
        let other_false = self.set.dependents.iter().any(|(name, required)| {
            *required
                && *name != condition_type
                && self.status.get_condition(name).is_some_and(Condition::is_false)
        });
        if !other_false {
            self.status.set_condition(Condition {
                condition_type: self.set.ready.to_string(),
                ..condition
            });
        }
    }

    /// Reflect a Deployment's Available/Progressing conditions onto `condition_type`
    pub fn propagate_deployment_status(&mut self, condition_type: &str, status: &DeploymentStatus) {
        let conditions = status.conditions.as_deref().unwrap_or_default();
        let find = |t: &str| conditions.iter().find(|c| c.type_ == t);
        let (Some(available), Some(progressing)) = (find("Available"), find("Progressing")) else {
            return;
        };
        let text = |t: &Option<String>| t.clone().unwrap_or_default();

        // Available is False while a rollout progresses, that is not a failure
        if progressing.status == "True" && available.status == "False" {
            self.mark_unknown(
                condition_type,
                &text(&progressing.reason),
                &text(&progressing.message),
            );
            return;
        }
        match ConditionStatus::from(available.status.as_str()) {
            ConditionStatus::True => self.mark_true(condition_type),
            ConditionStatus::False => self.mark_false(
                condition_type,
                &text(&available.reason),
                &text(&available.message),
            ),
            ConditionStatus::Unknown => self.mark_unknown(
                condition_type,
                &text(&available.reason),
                &text(&available.message),
            ),
        }
    }
}
