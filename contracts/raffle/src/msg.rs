use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Timestamp, Uint128, Uint256};
use raffle_common::{OracleParams, RaffleState};

use crate::state::{Ledger, RaffleConfig, RaffleStats, WinnerRecord};

#[cw_serde]
pub struct InstantiateMsg {
    /// Minimum payment per entry
    pub entry_fee: Uint128,
    pub denom: String,
    pub interval_seconds: u64,
    pub vrf_coordinator: String,
    pub oracle: OracleParams,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Enter the current round. Send at least the entry fee in info.funds.
    Enter {},
    /// Start resolving the round if upkeep is needed. Anyone can call.
    PerformUpkeep {},
    /// Randomness callback. Only the configured coordinator can call.
    FulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(RaffleConfig)]
    Config {},
    #[returns(Ledger)]
    Ledger {},
    #[returns(CheckUpkeepResponse)]
    CheckUpkeep {},
    #[returns(RaffleState)]
    RaffleState {},
    #[returns(Uint128)]
    EntranceFee {},
    #[returns(u64)]
    Interval {},
    #[returns(Uint128)]
    Pool {},
    #[returns(u32)]
    NumPlayers {},
    #[returns(Addr)]
    Player { index: u32 },
    #[returns(PlayersResponse)]
    Players {
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(Timestamp)]
    LatestTimestamp {},
    #[returns(Option<u64>)]
    PendingRequest {},
    #[returns(Option<Addr>)]
    RecentWinner {},
    #[returns(WinnersResponse)]
    Winners {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(UserWinsResponse)]
    UserWins { address: String },
    #[returns(RaffleStats)]
    Stats {},
}

#[cw_serde]
pub struct CheckUpkeepResponse {
    pub upkeep_needed: bool,
    /// First failing condition when upkeep is not needed
    pub reason: Option<String>,
}

#[cw_serde]
pub struct PlayersResponse {
    pub round: u64,
    pub players: Vec<Addr>,
}

#[cw_serde]
pub struct WinnersResponse {
    pub winners: Vec<WinnerRecord>,
}

#[cw_serde]
pub struct UserWinsResponse {
    pub address: String,
    pub total_wins: u32,
    pub total_won_amount: Uint128,
}
