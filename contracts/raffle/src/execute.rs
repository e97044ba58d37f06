use cosmwasm_std::{
    coins, to_json_binary, BankMsg, CosmosMsg, DepsMut, Env, Event, MessageInfo, Response,
    StdError, StdResult, SubMsg, Uint128, Uint256, WasmMsg,
};
use raffle_common::{select_winner_index, CoordinatorExecuteMsg};

use crate::error::ContractError;
use crate::state::{
    RaffleConfig, WinnerRecord, CONFIG, LEDGER, PARTICIPANTS, RECENT_WINNER, STATS,
    USER_TOTAL_WON, USER_WIN_COUNT, WINNERS,
};
use crate::upkeep::ensure_upkeep_needed;

pub const PAYOUT_REPLY_ID: u64 = 1;

/// Amount of `denom` attached to the message. No coin counts as zero.
fn paid_amount(info: &MessageInfo, denom: &str) -> Result<Uint128, ContractError> {
    match info.funds.as_slice() {
        [] => Ok(Uint128::zero()),
        [coin] if coin.denom == denom => Ok(coin.amount),
        [coin] => Err(ContractError::WrongDenom {
            expected: denom.to_string(),
            denom: coin.denom.clone(),
        }),
        _ => Err(ContractError::InvalidFunds {
            denom: denom.to_string(),
        }),
    }
}

/// Enter the current round with at least the entry fee.
pub fn enter(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let amount = paid_amount(&info, &config.denom)?;
    if amount < config.entry_fee {
        return Err(ContractError::InsufficientPayment {
            sent: amount,
            required: config.entry_fee,
        });
    }

    let mut ledger = LEDGER.load(deps.storage)?;
    let index = ledger.admit(amount)?;
    if let Some((settled_round, count)) = ledger.take_stale_roster() {
        for i in 0..count {
            PARTICIPANTS.remove(deps.storage, (settled_round, i));
        }
    }
    PARTICIPANTS.save(deps.storage, (ledger.round, index), &info.sender)?;
    LEDGER.save(deps.storage, &ledger)?;

    Ok(Response::new()
        .add_attribute("action", "enter")
        .add_attribute("player", info.sender.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("raffle_enter")
                .add_attribute("player", info.sender.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("round", ledger.round.to_string())
                .add_attribute("num_players", ledger.num_participants.to_string())
                .add_attribute("pool", ledger.pool.to_string()),
        ))
}

/// Build the outbound randomness request for `request_id`.
/// Oracle parameters are forwarded exactly as configured.
fn randomness_request_msg(config: &RaffleConfig, request_id: u64) -> StdResult<CosmosMsg> {
    Ok(WasmMsg::Execute {
        contract_addr: config.vrf_coordinator.to_string(),
        msg: to_json_binary(&CoordinatorExecuteMsg::RequestRandomness {
            request_id,
            params: config.oracle.clone(),
        })?,
        funds: vec![],
    }
    .into())
}

/// Start resolving the round. Anyone can call; the upkeep predicate is
/// re-evaluated here against the current block time.
pub fn perform_upkeep(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut ledger = LEDGER.load(deps.storage)?;

    ensure_upkeep_needed(&config, &ledger, env.block.time)?;

    let request_id = ledger.begin_resolution();
    LEDGER.save(deps.storage, &ledger)?;

    let request_msg = randomness_request_msg(&config, request_id)?;

    Ok(Response::new()
        .add_message(request_msg)
        .add_attribute("action", "perform_upkeep")
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("raffle_resolution_requested")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("round", ledger.round.to_string())
                .add_attribute("num_players", ledger.num_participants.to_string())
                .add_attribute("pool", ledger.pool.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Randomness callback from the coordinator.
///
/// 1. Only the coordinator may call, and only for the pending request id
/// 2. winner_index = random_words[0] % num_players
/// 3. Check the contract can cover the pool and the totals do not overflow,
///    then reset the ledger
/// 4. Send the whole pool to the winner; a failed send reverts everything
///    (see `reply`), leaving the request pending for a retry
pub fn fulfill_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    random_words: Vec<Uint256>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.vrf_coordinator {
        return Err(ContractError::Unauthorized {
            reason: "only the vrf coordinator can fulfill".to_string(),
        });
    }

    let mut ledger = LEDGER.load(deps.storage)?;
    if ledger.pending_request != Some(request_id) {
        return Err(ContractError::UnknownRequest { request_id });
    }

    let random_word = *random_words.first().ok_or(ContractError::NoRandomWords)?;
    let num_participants = ledger.num_participants;
    let winner_index = select_winner_index(random_word, num_participants)
        .ok_or_else(|| StdError::generic_err("resolving round has no participants"))?;
    let winner = PARTICIPANTS.load(deps.storage, (ledger.round, winner_index))?;

    let prize = ledger.pool;
    let balance = deps
        .querier
        .query_balance(&env.contract.address, &config.denom)?;
    if balance.amount < prize {
        return Err(ContractError::PayoutTransferFailed {
            reason: format!(
                "contract holds {}{}, pool is {}{}",
                balance.amount, config.denom, prize, config.denom
            ),
        });
    }

    let mut stats = STATS.load(deps.storage)?;
    stats.rounds_completed += 1;
    stats.total_paid_out = stats
        .total_paid_out
        .checked_add(prize)
        .map_err(StdError::from)?;
    let win_count = USER_WIN_COUNT.may_load(deps.storage, &winner)?.unwrap_or(0);
    let user_total = USER_TOTAL_WON
        .may_load(deps.storage, &winner)?
        .unwrap_or(Uint128::zero())
        .checked_add(prize)
        .map_err(StdError::from)?;

    let round = ledger.round;
    ledger.settle(env.block.time);
    LEDGER.save(deps.storage, &ledger)?;

    RECENT_WINNER.save(deps.storage, &winner)?;
    WINNERS.save(
        deps.storage,
        round,
        &WinnerRecord {
            round,
            request_id,
            winner: winner.clone(),
            winner_index,
            num_participants,
            amount: prize,
            random_word,
            resolved_at: env.block.time,
        },
    )?;
    STATS.save(deps.storage, &stats)?;
    USER_WIN_COUNT.save(deps.storage, &winner, &win_count.saturating_add(1))?;
    USER_TOTAL_WON.save(deps.storage, &winner, &user_total)?;

    let payout = SubMsg::reply_on_error(
        BankMsg::Send {
            to_address: winner.to_string(),
            amount: coins(prize.u128(), &config.denom),
        },
        PAYOUT_REPLY_ID,
    );

    Ok(Response::new()
        .add_submessage(payout)
        .add_attribute("action", "fulfill_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("winner", winner.to_string())
        .add_attribute("amount", prize.to_string())
        .add_event(
            Event::new("raffle_winner_picked")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("round", round.to_string())
                .add_attribute("winner", winner.to_string())
                .add_attribute("amount", prize.to_string())
                .add_attribute("denom", config.denom)
                .add_attribute("winner_index", winner_index.to_string())
                .add_attribute("num_players", num_participants.to_string())
                .add_attribute("random_word", random_word.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}
