use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint256;

/// Lifecycle of the current raffle round.
///
/// `Open` accepts entries. `Resolving` rejects entries and waits for exactly
/// one outstanding randomness fulfillment.
#[cw_serde]
#[derive(Copy)]
pub enum RaffleState {
    Open,
    Resolving,
}

impl RaffleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RaffleState::Open => "open",
            RaffleState::Resolving => "resolving",
        }
    }
}

/// Randomness request parameters.
///
/// The raffle never interprets these; they are forwarded to the coordinator
/// with every request exactly as configured.
#[cw_serde]
pub struct OracleParams {
    /// Selects the beacon network (the coordinator checks it against its chain hash)
    pub key_hash: String,
    pub subscription_id: u64,
    /// Number of beacon rounds to wait past the request before it can be fulfilled
    pub request_confirmations: u16,
    /// Gas cap for the fulfillment callback into the consumer
    pub callback_gas_limit: u64,
    pub num_words: u32,
}

/// Messages a consumer contract sends to the randomness coordinator.
#[cw_serde]
pub enum CoordinatorExecuteMsg {
    /// Register a randomness request. `request_id` is chosen by the consumer and
    /// echoed back in the fulfillment.
    RequestRandomness {
        request_id: u64,
        params: OracleParams,
    },
}

/// Callback the coordinator sends to the consumer that requested randomness.
#[cw_serde]
pub enum ConsumerExecuteMsg {
    FulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
}
