use super::model::{SupplyRules, SupplyState};

/// Days the current stock lasts at the configured consumption rate.
///
/// `round(rolls * sheets_per_roll / (sheets_per_visit * visits * persons))`,
/// rounding halves up. Only whole rolls count; a partly used roll is ignored
/// until the roll count itself drops.
pub fn days_remaining(state: &SupplyState, rules: &SupplyRules) -> u32 {
    let total = u64::from(state.rolls_count) * u64::from(rules.sheets_per_roll);
    let per_day = u64::from(rules.sheets_per_visit)
        * u64::from(state.toilet_visits_per_day.max(1))
        * u64::from(state.persons_count.max(1));
    if per_day == 0 {
        return 0;
    }

    // Integer form of floor(total / per_day + 0.5).
    let days = (2 * total + per_day) / (2 * per_day);
    u32::try_from(days).unwrap_or(u32::MAX)
}
