use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("insufficient payment: sent {sent}, entry fee is {required}")]
    InsufficientPayment { sent: Uint128, required: Uint128 },

    #[error("must send at most one coin ({denom})")]
    InvalidFunds { denom: String },

    #[error("must pay entry fee in {expected}, got {denom}")]
    WrongDenom { expected: String, denom: String },

    #[error("round is closed while a winner is being drawn")]
    RoundClosed,

    #[error("round roster is full")]
    RosterFull,

    #[error("upkeep not needed: {reason} (pool {pool}, players {num_players}, state {state})")]
    UpkeepNotNeeded {
        reason: String,
        pool: Uint128,
        num_players: u32,
        state: String,
    },

    #[error("unknown randomness request {request_id}")]
    UnknownRequest { request_id: u64 },

    #[error("fulfillment carried no random words")]
    NoRandomWords,

    #[error("payout transfer failed: {reason}")]
    PayoutTransferFailed { reason: String },
}
