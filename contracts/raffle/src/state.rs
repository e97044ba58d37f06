use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdError, Timestamp, Uint128, Uint256};
use cw_storage_plus::{Item, Map};
use raffle_common::{OracleParams, RaffleState};

use crate::error::ContractError;

pub const CONFIG: Item<RaffleConfig> = Item::new("config");
pub const LEDGER: Item<Ledger> = Item::new("ledger");
pub const STATS: Item<RaffleStats> = Item::new("stats");

/// Entries keyed by (round, entry index). Duplicate addresses are separate entries.
/// Only the current round's roster is kept; the settled round's entries are
/// cleared by the first entry of the next round.
pub const PARTICIPANTS: Map<(u64, u32), Addr> = Map::new("participants");

pub const RECENT_WINNER: Item<Addr> = Item::new("recent_winner");
/// Resolved rounds keyed by round number
pub const WINNERS: Map<u64, WinnerRecord> = Map::new("winners");

/// Per-user win tracking
pub const USER_WIN_COUNT: Map<&Addr, u32> = Map::new("user_win_count");
pub const USER_TOTAL_WON: Map<&Addr, Uint128> = Map::new("user_total_won");

#[cw_serde]
pub struct RaffleConfig {
    /// Minimum payment per entry
    pub entry_fee: Uint128,
    pub denom: String,
    /// Minimum seconds since the last resolution before a round may resolve
    pub interval_seconds: u64,
    pub vrf_coordinator: Addr,
    pub oracle: OracleParams,
}

/// The single mutable ledger of the raffle.
///
/// Mutated only by entry admission and the resolve cycle. `pending_request`
/// is `Some` exactly when `state` is `Resolving`.
#[cw_serde]
pub struct Ledger {
    pub state: RaffleState,
    /// Current round number; participants of this round live under this key
    pub round: u64,
    pub num_participants: u32,
    /// Sum of entry payments accepted since the last payout
    pub pool: Uint128,
    pub last_resolved_at: Timestamp,
    pub pending_request: Option<u64>,
    /// Request ids are never reused, so a stale fulfillment cannot match
    pub next_request_id: u64,
    /// Entries of the previous round still in storage under `round - 1`
    pub stale_entries: u32,
}

impl Ledger {
    pub fn new(now: Timestamp) -> Self {
        Ledger {
            state: RaffleState::Open,
            round: 1,
            num_participants: 0,
            pool: Uint128::zero(),
            last_resolved_at: now,
            pending_request: None,
            next_request_id: 1,
            stale_entries: 0,
        }
    }

    /// Record one entry of `amount` and return the entry's index in the round.
    pub fn admit(&mut self, amount: Uint128) -> Result<u32, ContractError> {
        if self.state != RaffleState::Open {
            return Err(ContractError::RoundClosed);
        }
        let index = self.num_participants;
        let num_participants = index.checked_add(1).ok_or(ContractError::RosterFull)?;
        self.pool = self.pool.checked_add(amount).map_err(StdError::from)?;
        self.num_participants = num_participants;
        Ok(index)
    }

    /// Move Open -> Resolving and allocate the correlation id for the request.
    pub fn begin_resolution(&mut self) -> u64 {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.pending_request = Some(request_id);
        self.state = RaffleState::Resolving;
        request_id
    }

    /// Take the settled round's roster for cleanup: `(round, count)`.
    pub fn take_stale_roster(&mut self) -> Option<(u64, u32)> {
        if self.stale_entries == 0 {
            return None;
        }
        let count = std::mem::take(&mut self.stale_entries);
        Some((self.round - 1, count))
    }

    /// Close the round after a payout: empty roster, empty pool, back to Open.
    pub fn settle(&mut self, now: Timestamp) {
        self.state = RaffleState::Open;
        self.stale_entries = self.num_participants;
        self.round += 1;
        self.num_participants = 0;
        self.pool = Uint128::zero();
        self.pending_request = None;
        self.last_resolved_at = now;
    }
}

#[cw_serde]
pub struct RaffleStats {
    pub rounds_completed: u64,
    pub total_paid_out: Uint128,
}

#[cw_serde]
pub struct WinnerRecord {
    pub round: u64,
    pub request_id: u64,
    pub winner: Addr,
    pub winner_index: u32,
    pub num_participants: u32,
    pub amount: Uint128,
    pub random_word: Uint256,
    pub resolved_at: Timestamp,
}
