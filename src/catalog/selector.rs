use super::history::UsageHistory;
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("No product records found")]
    NoRecords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownPolicy {
    pub days: i64,
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self { days: 5 }
    }
}

impl CooldownPolicy {
    /// Absent records are always eligible. Dates in the future count as resting.
    pub fn is_eligible(&self, last_used: Option<NaiveDate>, today: NaiveDate) -> bool {
        match last_used {
            None => true,
            Some(date) => (today - date).num_days() >= self.days,
        }
    }
}

/// Picks one identifier uniformly among those out of cooldown, or among all of
/// them when every record is still resting.
pub fn select<'a, R: Rng + ?Sized>(
    ids: &'a [String],
    history: &UsageHistory,
    policy: CooldownPolicy,
    today: NaiveDate,
    rng: &mut R,
) -> Result<&'a str, SelectError> {
    if ids.is_empty() {
        return Err(SelectError::NoRecords);
    }

    let eligible: Vec<&'a str> = ids
        .iter()
        .map(String::as_str)
        .filter(|id| policy.is_eligible(history.get(*id).copied(), today))
        .collect();

    log::info!(
        "{} of {} records outside the {}-day cooldown",
        eligible.len(),
        ids.len(),
        policy.days
    );

    let chosen = match eligible.choose(rng) {
        Some(id) => *id,
        None => {
            log::warn!("all records in cooldown, picking from the full set");
            ids.choose(rng).ok_or(SelectError::NoRecords)?.as_str()
        }
    };
    Ok(chosen)
}
