use cosmwasm_std::{
    to_json_binary, DepsMut, Env, Event, MessageInfo, Response, SubMsg, WasmMsg,
};
use raffle_common::{ConsumerExecuteMsg, OracleParams};

use crate::beacon::{derive_random_words, round_at, verify_beacon};
use crate::error::ContractError;
use crate::state::{
    CallbackPayload, RandomnessRequest, RequestStatus, StoredBeacon, BEACONS, CONFIG,
    LATEST_ROUND, MAX_NUM_WORDS, MIN_REQUEST_CONFIRMATIONS, REQUESTS,
};

pub const CALLBACK_REPLY_ID: u64 = 1;

/// Submit a drand beacon. Only operators can call this.
pub fn submit_beacon(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    round: u64,
    signature_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if !config.operators.contains(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only operators can submit beacons".to_string(),
        });
    }

    if BEACONS.has(deps.storage, round) {
        return Err(ContractError::BeaconAlreadyExists { round });
    }

    let signature = hex::decode(&signature_hex).map_err(|_| ContractError::InvalidHex {
        field: "signature_hex".to_string(),
    })?;

    let randomness = verify_beacon(&config.quicknet_pubkey, round, &signature).map_err(|e| {
        ContractError::VerificationFailed {
            reason: e.to_string(),
        }
    })?;

    BEACONS.save(
        deps.storage,
        round,
        &StoredBeacon {
            round,
            randomness: randomness.to_vec(),
            signature,
            submitted_at: env.block.time,
            submitted_by: info.sender.clone(),
        },
    )?;

    let current_latest = LATEST_ROUND.may_load(deps.storage)?.unwrap_or(0);
    if round > current_latest {
        LATEST_ROUND.save(deps.storage, &round)?;
    }

    Ok(Response::new()
        .add_attribute("action", "submit_beacon")
        .add_attribute("round", round.to_string())
        .add_attribute("submitted_by", info.sender.to_string())
        .add_event(
            Event::new("vrf_beacon_submitted")
                .add_attribute("round", round.to_string())
                .add_attribute("randomness", hex::encode(randomness))
                .add_attribute("submitted_by", info.sender.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Register a randomness request from the sending contract.
///
/// The request is pinned to a drand round that is not yet published:
/// `current_round + max(MIN_REQUEST_CONFIRMATIONS, request_confirmations)`.
pub fn request_randomness(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    params: OracleParams,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if params.key_hash != config.chain_hash {
        return Err(ContractError::InvalidKeyHash {
            key_hash: params.key_hash,
        });
    }
    if params.num_words == 0 || params.num_words > MAX_NUM_WORDS {
        return Err(ContractError::InvalidNumWords {
            num_words: params.num_words,
            max: MAX_NUM_WORDS,
        });
    }

    let consumer = info.sender;
    if REQUESTS.has(deps.storage, (&consumer, request_id)) {
        return Err(ContractError::RequestAlreadyExists {
            consumer,
            request_id,
        });
    }

    let current_round = round_at(env.block.time, config.genesis_time, config.period_seconds);
    let confirmations = params.request_confirmations.max(MIN_REQUEST_CONFIRMATIONS);
    let target_round = current_round + u64::from(confirmations);

    let request = RandomnessRequest {
        consumer: consumer.clone(),
        request_id,
        target_round,
        params,
        status: RequestStatus::Pending,
        requested_at: env.block.time,
        fulfilled_at: None,
    };
    REQUESTS.save(deps.storage, (&consumer, request_id), &request)?;

    Ok(Response::new()
        .add_attribute("action", "request_randomness")
        .add_attribute("consumer", consumer.to_string())
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("vrf_randomness_requested")
                .add_attribute("consumer", consumer.to_string())
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("target_round", target_round.to_string())
                .add_attribute("num_words", request.params.num_words.to_string())
                .add_attribute(
                    "subscription_id",
                    request.params.subscription_id.to_string(),
                ),
        ))
}

/// Deliver random words to the consumer. Anyone can call once the target
/// beacon has been submitted.
///
/// The callback runs as a sub-message capped at `callback_gas_limit`. If it
/// fails, `reply` puts the request back to Pending so it can be delivered again.
pub fn fulfill_randomness(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    consumer: String,
    request_id: u64,
) -> Result<Response, ContractError> {
    let consumer_addr = deps.api.addr_validate(&consumer)?;
    let mut request = REQUESTS
        .may_load(deps.storage, (&consumer_addr, request_id))?
        .ok_or(ContractError::RequestNotFound {
            consumer: consumer.clone(),
            request_id,
        })?;

    if request.status != RequestStatus::Pending {
        return Err(ContractError::RequestAlreadyFulfilled {
            consumer,
            request_id,
        });
    }

    let beacon = BEACONS
        .may_load(deps.storage, request.target_round)?
        .ok_or(ContractError::BeaconNotFound {
            round: request.target_round,
        })?;

    let random_words = derive_random_words(
        &beacon.randomness,
        &consumer_addr,
        request_id,
        request.params.num_words,
    );

    request.status = RequestStatus::Fulfilled;
    request.fulfilled_at = Some(env.block.time);
    REQUESTS.save(deps.storage, (&consumer_addr, request_id), &request)?;

    let callback = WasmMsg::Execute {
        contract_addr: consumer_addr.to_string(),
        msg: to_json_binary(&ConsumerExecuteMsg::FulfillRandomWords {
            request_id,
            random_words,
        })?,
        funds: vec![],
    };
    let mut callback = SubMsg::reply_on_error(callback, CALLBACK_REPLY_ID).with_payload(
        to_json_binary(&CallbackPayload {
            consumer: consumer_addr.clone(),
            request_id,
        })?,
    );
    if request.params.callback_gas_limit > 0 {
        callback = callback.with_gas_limit(request.params.callback_gas_limit);
    }

    Ok(Response::new()
        .add_submessage(callback)
        .add_attribute("action", "fulfill_randomness")
        .add_attribute("consumer", consumer_addr.to_string())
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("vrf_randomness_fulfilled")
                .add_attribute("consumer", consumer_addr.to_string())
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("round", beacon.round.to_string())
                .add_attribute("fulfilled_by", info.sender.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// A consumer callback failed: reopen the request for another delivery.
pub fn reopen_request(
    deps: DepsMut,
    payload: CallbackPayload,
    error: String,
) -> Result<Response, ContractError> {
    let CallbackPayload {
        consumer,
        request_id,
    } = payload;

    let mut request = REQUESTS
        .may_load(deps.storage, (&consumer, request_id))?
        .ok_or(ContractError::RequestNotFound {
            consumer: consumer.to_string(),
            request_id,
        })?;
    request.status = RequestStatus::Pending;
    request.fulfilled_at = None;
    REQUESTS.save(deps.storage, (&consumer, request_id), &request)?;

    Ok(Response::new()
        .add_attribute("action", "callback_failed")
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("vrf_callback_failed")
                .add_attribute("consumer", consumer.to_string())
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("error", error),
        ))
}

/// Update the operator list. Admin only.
pub fn update_operators(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update operators".to_string(),
        });
    }

    for addr_str in &remove {
        let addr = deps.api.addr_validate(addr_str)?;
        config.operators.retain(|a| *a != addr);
    }

    for addr_str in &add {
        let addr = deps.api.addr_validate(addr_str)?;
        if !config.operators.contains(&addr) {
            config.operators.push(addr);
        }
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_operators")
        .add_attribute("added", add.join(","))
        .add_attribute("removed", remove.join(",")))
}
