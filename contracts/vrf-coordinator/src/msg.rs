use cosmwasm_schema::{cw_serde, QueryResponses};
use raffle_common::OracleParams;

use crate::state::{CoordinatorConfig, RandomnessRequest, StoredBeacon};

#[cw_serde]
pub struct InstantiateMsg {
    pub operators: Vec<String>,
    /// Hex-encoded quicknet public key (96 bytes = 192 hex chars)
    pub quicknet_pubkey_hex: String,
    pub chain_hash: String,
    pub genesis_time: u64,
    pub period_seconds: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Submit a drand beacon for verification and storage. Operators only.
    SubmitBeacon {
        round: u64,
        /// Hex-encoded BLS signature (48 bytes = 96 hex chars)
        signature_hex: String,
    },
    /// Register a randomness request. The sender is the consumer.
    RequestRandomness {
        request_id: u64,
        params: OracleParams,
    },
    /// Deliver random words for a pending request once its beacon is stored.
    /// Anyone can call.
    FulfillRandomness { consumer: String, request_id: u64 },
    /// Update operator list (admin only).
    UpdateOperators {
        add: Vec<String>,
        remove: Vec<String>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(CoordinatorConfig)]
    Config {},

    #[returns(Option<StoredBeacon>)]
    Beacon { round: u64 },

    #[returns(u64)]
    LatestRound {},

    /// Drand round published at the current block time
    #[returns(u64)]
    CurrentRound {},

    #[returns(Option<RandomnessRequest>)]
    Request { consumer: String, request_id: u64 },
}
