//! Supply state machine.
//!
//! Defines a pure state transition function for household supply counters.

use crate::notification::Notification;

use super::model::{SupplyRules, SupplyState};

/// Commands that drive the supply counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyCommand {
    /// Slider: number of full rolls on hand. Resets the sheet count.
    SetRolls(u32),
    /// Slider: toilet visits per person per day.
    SetVisits(u32),
    /// Slider: people in the household.
    SetPersons(u32),
    /// One sheet used.
    ConsumeSheet,
}

/// Side-effects produced by state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyAction {
    /// Persist the snapshot through the throttled write channel.
    PersistThrottled,
    /// Persist the snapshot right away and report the outcome to the caller.
    PersistNow,
    /// Show a transient notification.
    Notify(Notification),
}

/// Pure supply state machine.
///
/// 纯状态机：不包含副作用。
pub struct SupplyMachine;

impl SupplyMachine {
    pub fn transition(
        state: SupplyState,
        command: SupplyCommand,
        rules: &SupplyRules,
    ) -> (SupplyState, Vec<SupplyAction>) {
        match command {
            SupplyCommand::SetRolls(rolls) => {
                let rolls = rules.clamp_rolls(rolls);
                if rolls == state.rolls_count {
                    return (state, Vec::new());
                }
                (
                    SupplyState {
                        rolls_count: rolls,
                        sheets_remaining: rules.full_rolls(rolls),
                        ..state
                    },
                    vec![SupplyAction::PersistThrottled],
                )
            }
            SupplyCommand::SetVisits(visits) => {
                let visits = rules.clamp_visits(visits);
                if visits == state.toilet_visits_per_day {
                    return (state, Vec::new());
                }
                (
                    SupplyState {
                        toilet_visits_per_day: visits,
                        ..state
                    },
                    vec![SupplyAction::PersistThrottled],
                )
            }
            SupplyCommand::SetPersons(persons) => {
                let persons = rules.clamp_persons(persons);
                if persons == state.persons_count {
                    return (state, Vec::new());
                }
                (
                    SupplyState {
                        persons_count: persons,
                        ..state
                    },
                    vec![SupplyAction::PersistThrottled],
                )
            }
            SupplyCommand::ConsumeSheet => Self::consume_sheet(state, rules),
        }
    }

    fn consume_sheet(state: SupplyState, rules: &SupplyRules) -> (SupplyState, Vec<SupplyAction>) {
        if state.sheets_remaining == 0 {
            let mut actions = vec![SupplyAction::Notify(Notification::OutOfPaper)];
            if state.rolls_count != 0 {
                actions.push(SupplyAction::PersistNow);
            }
            return (
                SupplyState {
                    rolls_count: 0,
                    ..state
                },
                actions,
            );
        }

        let remaining = state.sheets_remaining - 1;
        let whole_rolls = remaining / rules.sheets_per_roll.max(1);
        // The last partial roll keeps counting as one until it is empty.
        let rolls_count = if whole_rolls != state.rolls_count && whole_rolls != 0 {
            whole_rolls
        } else {
            state.rolls_count
        };

        let notice = if remaining == 0 {
            Notification::OutOfPaper
        } else {
            Notification::SheetUsed { remaining }
        };

        (
            SupplyState {
                rolls_count,
                sheets_remaining: remaining,
                ..state
            },
            vec![SupplyAction::Notify(notice), SupplyAction::PersistNow],
        )
    }
}
