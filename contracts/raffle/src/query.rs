use cosmwasm_std::{to_json_binary, Binary, Deps, Env, Order, StdResult, Uint128};
use cw_storage_plus::Bound;

use crate::msg::{CheckUpkeepResponse, PlayersResponse, UserWinsResponse, WinnersResponse};
use crate::state::{
    CONFIG, LEDGER, PARTICIPANTS, RECENT_WINNER, STATS, USER_TOTAL_WON, USER_WIN_COUNT, WINNERS,
};
use crate::upkeep::evaluate_upkeep;

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_ledger(deps: Deps) -> StdResult<Binary> {
    let ledger = LEDGER.load(deps.storage)?;
    to_json_binary(&ledger)
}

pub fn query_check_upkeep(deps: Deps, env: Env) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let ledger = LEDGER.load(deps.storage)?;
    let response = match evaluate_upkeep(&config, &ledger, env.block.time) {
        Ok(()) => CheckUpkeepResponse {
            upkeep_needed: true,
            reason: None,
        },
        Err(blocker) => CheckUpkeepResponse {
            upkeep_needed: false,
            reason: Some(blocker.as_str().to_string()),
        },
    };
    to_json_binary(&response)
}

pub fn query_raffle_state(deps: Deps) -> StdResult<Binary> {
    let ledger = LEDGER.load(deps.storage)?;
    to_json_binary(&ledger.state)
}

pub fn query_entrance_fee(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.entry_fee)
}

pub fn query_interval(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.interval_seconds)
}

pub fn query_pool(deps: Deps) -> StdResult<Binary> {
    let ledger = LEDGER.load(deps.storage)?;
    to_json_binary(&ledger.pool)
}

pub fn query_num_players(deps: Deps) -> StdResult<Binary> {
    let ledger = LEDGER.load(deps.storage)?;
    to_json_binary(&ledger.num_participants)
}

/// Player at `index` in the current round. Errors past the end of the roster.
pub fn query_player(deps: Deps, index: u32) -> StdResult<Binary> {
    let ledger = LEDGER.load(deps.storage)?;
    let player = PARTICIPANTS.load(deps.storage, (ledger.round, index))?;
    to_json_binary(&player)
}

pub fn query_players(
    deps: Deps,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let ledger = LEDGER.load(deps.storage)?;
    let limit = limit.unwrap_or(30).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let players: Vec<_> = PARTICIPANTS
        .prefix(ledger.round)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, addr)| addr)
        .collect();

    to_json_binary(&PlayersResponse {
        round: ledger.round,
        players,
    })
}

pub fn query_latest_timestamp(deps: Deps) -> StdResult<Binary> {
    let ledger = LEDGER.load(deps.storage)?;
    to_json_binary(&ledger.last_resolved_at)
}

pub fn query_pending_request(deps: Deps) -> StdResult<Binary> {
    let ledger = LEDGER.load(deps.storage)?;
    to_json_binary(&ledger.pending_request)
}

pub fn query_recent_winner(deps: Deps) -> StdResult<Binary> {
    let winner = RECENT_WINNER.may_load(deps.storage)?;
    to_json_binary(&winner)
}

pub fn query_winners(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let winners: Vec<_> = WINNERS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, record)| record)
        .collect();

    to_json_binary(&WinnersResponse { winners })
}

pub fn query_user_wins(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let total_wins = USER_WIN_COUNT.may_load(deps.storage, &addr)?.unwrap_or(0);
    let total_won = USER_TOTAL_WON
        .may_load(deps.storage, &addr)?
        .unwrap_or(Uint128::zero());

    to_json_binary(&UserWinsResponse {
        address,
        total_wins,
        total_won_amount: total_won,
    })
}

pub fn query_stats(deps: Deps) -> StdResult<Binary> {
    let stats = STATS.load(deps.storage)?;
    to_json_binary(&stats)
}
