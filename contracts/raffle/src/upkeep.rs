use cosmwasm_std::Timestamp;
use raffle_common::RaffleState;

use crate::error::ContractError;
use crate::state::{Ledger, RaffleConfig};

/// First condition that keeps a round from resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpkeepBlocker {
    NotOpen,
    IntervalNotElapsed,
    NoParticipants,
    EmptyPool,
}

impl UpkeepBlocker {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpkeepBlocker::NotOpen => "round is not open",
            UpkeepBlocker::IntervalNotElapsed => "interval has not elapsed",
            UpkeepBlocker::NoParticipants => "no participants",
            UpkeepBlocker::EmptyPool => "pool is empty",
        }
    }
}

/// Decide whether the current round may resolve at `now`.
///
/// Resolution needs an open round, `interval_seconds` elapsed since the last
/// resolution, at least one participant and a non-empty pool. Pure: reads
/// only its arguments.
pub fn evaluate_upkeep(
    config: &RaffleConfig,
    ledger: &Ledger,
    now: Timestamp,
) -> Result<(), UpkeepBlocker> {
    if ledger.state != RaffleState::Open {
        return Err(UpkeepBlocker::NotOpen);
    }
    let elapsed = now
        .seconds()
        .saturating_sub(ledger.last_resolved_at.seconds());
    if elapsed < config.interval_seconds {
        return Err(UpkeepBlocker::IntervalNotElapsed);
    }
    if ledger.num_participants == 0 {
        return Err(UpkeepBlocker::NoParticipants);
    }
    if ledger.pool.is_zero() {
        return Err(UpkeepBlocker::EmptyPool);
    }
    Ok(())
}

pub fn upkeep_needed(config: &RaffleConfig, ledger: &Ledger, now: Timestamp) -> bool {
    evaluate_upkeep(config, ledger, now).is_ok()
}

/// Same predicate, as the error `PerformUpkeep` rejects with.
pub fn ensure_upkeep_needed(
    config: &RaffleConfig,
    ledger: &Ledger,
    now: Timestamp,
) -> Result<(), ContractError> {
    evaluate_upkeep(config, ledger, now).map_err(|blocker| ContractError::UpkeepNotNeeded {
        reason: blocker.as_str().to_string(),
        pool: ledger.pool,
        num_players: ledger.num_participants,
        state: ledger.state.as_str().to_string(),
    })
}
