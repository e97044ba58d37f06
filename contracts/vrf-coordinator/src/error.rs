use cosmwasm_std::{Addr, StdError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("beacon for round {round} already exists")]
    BeaconAlreadyExists { round: u64 },

    #[error("BLS verification failed: {reason}")]
    VerificationFailed { reason: String },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("beacon not found for round {round}")]
    BeaconNotFound { round: u64 },

    #[error("invalid pubkey length: expected 96 bytes, got {got}")]
    InvalidPubkeyLength { got: usize },

    #[error("invalid period: must be greater than zero")]
    InvalidPeriod,

    #[error("key hash {key_hash} does not match this coordinator's chain hash")]
    InvalidKeyHash { key_hash: String },

    #[error("num_words {num_words} out of range [1, {max}]")]
    InvalidNumWords { num_words: u32, max: u32 },

    #[error("request {request_id} from {consumer} already exists")]
    RequestAlreadyExists { consumer: Addr, request_id: u64 },

    #[error("request {request_id} from {consumer} not found")]
    RequestNotFound { consumer: String, request_id: u64 },

    #[error("request {request_id} from {consumer} already fulfilled")]
    RequestAlreadyFulfilled { consumer: String, request_id: u64 },
}
