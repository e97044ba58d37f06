use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp};
use cw_storage_plus::{Item, Map};
use raffle_common::OracleParams;

pub const CONFIG: Item<CoordinatorConfig> = Item::new("config");
pub const BEACONS: Map<u64, StoredBeacon> = Map::new("beacons");
pub const LATEST_ROUND: Item<u64> = Item::new("latest_round");
/// Requests keyed by (consumer, consumer-chosen request id)
pub const REQUESTS: Map<(&Addr, u64), RandomnessRequest> = Map::new("requests");

/// Upper bound on words per request
pub const MAX_NUM_WORDS: u32 = 10;

/// Lowest accepted distance, in drand rounds, between the round at request
/// time and the target round. Block time trails wall-clock time, so a target
/// only one round ahead may already be published when the request executes.
pub const MIN_REQUEST_CONFIRMATIONS: u16 = 3;

#[cw_serde]
pub struct CoordinatorConfig {
    pub admin: Addr,
    pub operators: Vec<Addr>,
    /// Quicknet public key, 96 bytes (G2 point)
    pub quicknet_pubkey: Vec<u8>,
    /// Chain hash identifying the drand network; requests must name it as key_hash
    pub chain_hash: String,
    /// Genesis time of the drand network (unix seconds)
    pub genesis_time: u64,
    /// Period between rounds in seconds (3 for quicknet)
    pub period_seconds: u64,
}

#[cw_serde]
pub struct StoredBeacon {
    pub round: u64,
    /// sha256(signature), 32 bytes
    pub randomness: Vec<u8>,
    /// BLS signature on G1, 48 bytes
    pub signature: Vec<u8>,
    pub submitted_at: Timestamp,
    pub submitted_by: Addr,
}

#[cw_serde]
pub enum RequestStatus {
    Pending,
    Fulfilled,
}

#[cw_serde]
pub struct RandomnessRequest {
    pub consumer: Addr,
    pub request_id: u64,
    /// Only the beacon of this round can fulfill the request
    pub target_round: u64,
    pub params: OracleParams,
    pub status: RequestStatus,
    pub requested_at: Timestamp,
    pub fulfilled_at: Option<Timestamp>,
}

/// Carried through the callback sub-message so a failed callback can be traced
/// back to its request.
#[cw_serde]
pub struct CallbackPayload {
    pub consumer: Addr,
    pub request_id: u64,
}
