//! Supply domain models.
//!
//! `SupplyState` is the single record describing how much paper a household
//! has on hand. It is never mutated in place by callers; transitions go
//! through [`SupplyMachine`](super::SupplyMachine) and yield a new record.

use serde::{Deserialize, Serialize};

/// Counting rules and input ranges for the supply model.
///
/// Injected wherever supply arithmetic happens so tests can run with
/// alternate values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplyRules {
    pub sheets_per_roll: u32,
    pub sheets_per_visit: u32,
    pub max_rolls: u32,
    pub min_visits: u32,
    pub max_visits: u32,
    pub min_persons: u32,
    pub max_persons: u32,
    pub default_rolls: u32,
    pub default_visits: u32,
    pub default_persons: u32,
}

pub const SHEETS_PER_ROLL: u32 = 160;
pub const SHEETS_PER_VISIT: u32 = 7;

impl Default for SupplyRules {
    fn default() -> Self {
        Self {
            sheets_per_roll: SHEETS_PER_ROLL,
            sheets_per_visit: SHEETS_PER_VISIT,
            max_rolls: 48,
            min_visits: 1,
            max_visits: 8,
            min_persons: 1,
            max_persons: 16,
            default_rolls: 4,
            default_visits: 3,
            default_persons: 2,
        }
    }
}

impl SupplyRules {
    pub fn clamp_rolls(&self, rolls: u32) -> u32 {
        rolls.min(self.max_rolls)
    }

    /// The upper bound wins when a hand-built rule set has `min > max`.
    pub fn clamp_visits(&self, visits: u32) -> u32 {
        visits.max(self.min_visits).min(self.max_visits)
    }

    pub fn clamp_persons(&self, persons: u32) -> u32 {
        persons.max(self.min_persons).min(self.max_persons)
    }

    /// Sheet count for `rolls` full rolls.
    pub fn full_rolls(&self, rolls: u32) -> u32 {
        rolls.saturating_mul(self.sheets_per_roll)
    }
}

/// Household supply counters.
///
/// Serializes with the field names used by the `"state"` storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyState {
    /// Whole rolls on hand.
    #[serde(rename = "rollsCount")]
    pub rolls_count: u32,
    /// Remaining sheets across all rolls.
    #[serde(rename = "sheetsCount")]
    pub sheets_remaining: u32,
    #[serde(rename = "toiletVisits")]
    pub toilet_visits_per_day: u32,
    #[serde(rename = "personsCount")]
    pub persons_count: u32,
}

impl SupplyState {
    pub fn defaults(rules: &SupplyRules) -> Self {
        Self {
            rolls_count: rules.default_rolls,
            sheets_remaining: rules.full_rolls(rules.default_rolls),
            toilet_visits_per_day: rules.default_visits,
            persons_count: rules.default_persons,
        }
    }

    /// Build a state from a partially stored record, filling gaps from defaults.
    ///
    /// A missing sheet count is derived from the (possibly stored) roll count.
    /// Out-of-range values are clamped.
    pub fn from_patch(patch: &SupplyPatch, rules: &SupplyRules) -> Self {
        let rolls_count = rules.clamp_rolls(patch.rolls_count.unwrap_or(rules.default_rolls));
        let sheets_remaining = patch
            .sheets_remaining
            .unwrap_or_else(|| rules.full_rolls(rolls_count));
        let toilet_visits_per_day =
            rules.clamp_visits(patch.toilet_visits_per_day.unwrap_or(rules.default_visits));
        let persons_count =
            rules.clamp_persons(patch.persons_count.unwrap_or(rules.default_persons));

        #[cfg(feature = "tracing")]
        if patch.rolls_count.is_some_and(|r| r != rolls_count)
            || patch.toilet_visits_per_day.is_some_and(|v| v != toilet_visits_per_day)
            || patch.persons_count.is_some_and(|p| p != persons_count)
        {
            tracing::debug!(?patch, "stored supply values clamped into range");
        }

        Self {
            rolls_count,
            sheets_remaining,
            toilet_visits_per_day,
            persons_count,
        }
    }

    /// Overlay the fields present in `patch` onto this snapshot.
    pub fn merged(&self, patch: &SupplyPatch) -> Self {
        Self {
            rolls_count: patch.rolls_count.unwrap_or(self.rolls_count),
            sheets_remaining: patch.sheets_remaining.unwrap_or(self.sheets_remaining),
            toilet_visits_per_day: patch
                .toilet_visits_per_day
                .unwrap_or(self.toilet_visits_per_day),
            persons_count: patch.persons_count.unwrap_or(self.persons_count),
        }
    }
}

/// Partial supply record.
///
/// Used both for decoding the `"state"` key (any field may be absent) and
/// for explicit override fields on a throttled write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyPatch {
    #[serde(rename = "rollsCount", default, skip_serializing_if = "Option::is_none")]
    pub rolls_count: Option<u32>,
    #[serde(rename = "sheetsCount", default, skip_serializing_if = "Option::is_none")]
    pub sheets_remaining: Option<u32>,
    #[serde(rename = "toiletVisits", default, skip_serializing_if = "Option::is_none")]
    pub toilet_visits_per_day: Option<u32>,
    #[serde(rename = "personsCount", default, skip_serializing_if = "Option::is_none")]
    pub persons_count: Option<u32>,
}

impl SupplyPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
