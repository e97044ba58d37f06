use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, StdError, StdResult,
    SubMsgResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute::{self, PAYOUT_REPLY_ID};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{Ledger, RaffleConfig, RaffleStats, CONFIG, LEDGER, STATS};

const CONTRACT_NAME: &str = "crates.io:raffle";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.entry_fee.is_zero() {
        return Err(ContractError::InvalidConfig {
            reason: "entry fee must be greater than zero".to_string(),
        });
    }
    if msg.denom.is_empty() {
        return Err(ContractError::InvalidConfig {
            reason: "denom must not be empty".to_string(),
        });
    }
    if msg.oracle.num_words == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "num_words must be at least 1".to_string(),
        });
    }

    let config = RaffleConfig {
        entry_fee: msg.entry_fee,
        denom: msg.denom,
        interval_seconds: msg.interval_seconds,
        vrf_coordinator: deps.api.addr_validate(&msg.vrf_coordinator)?,
        oracle: msg.oracle,
    };
    CONFIG.save(deps.storage, &config)?;
    LEDGER.save(deps.storage, &Ledger::new(env.block.time))?;
    STATS.save(
        deps.storage,
        &RaffleStats {
            rounds_completed: 0,
            total_paid_out: Uint128::zero(),
        },
    )?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "raffle")
        .add_attribute("creator", info.sender.to_string())
        .add_attribute("entry_fee", config.entry_fee.to_string())
        .add_attribute("interval_seconds", config.interval_seconds.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Enter {} => execute::enter(deps, env, info),
        ExecuteMsg::PerformUpkeep {} => execute::perform_upkeep(deps, env, info),
        ExecuteMsg::FulfillRandomWords {
            request_id,
            random_words,
        } => execute::fulfill_random_words(deps, env, info, request_id, random_words),
    }
}

/// A failed payout fails the whole fulfillment, so the ledger reset made in
/// `fulfill_random_words` is reverted along with it.
#[entry_point]
pub fn reply(_deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        PAYOUT_REPLY_ID => match msg.result {
            SubMsgResult::Err(reason) => Err(ContractError::PayoutTransferFailed { reason }),
            SubMsgResult::Ok(_) => Ok(Response::new()),
        },
        id => Err(StdError::generic_err(format!("unknown reply id {}", id)).into()),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Ledger {} => query::query_ledger(deps),
        QueryMsg::CheckUpkeep {} => query::query_check_upkeep(deps, env),
        QueryMsg::RaffleState {} => query::query_raffle_state(deps),
        QueryMsg::EntranceFee {} => query::query_entrance_fee(deps),
        QueryMsg::Interval {} => query::query_interval(deps),
        QueryMsg::Pool {} => query::query_pool(deps),
        QueryMsg::NumPlayers {} => query::query_num_players(deps),
        QueryMsg::Player { index } => query::query_player(deps, index),
        QueryMsg::Players { start_after, limit } => {
            query::query_players(deps, start_after, limit)
        }
        QueryMsg::LatestTimestamp {} => query::query_latest_timestamp(deps),
        QueryMsg::PendingRequest {} => query::query_pending_request(deps),
        QueryMsg::RecentWinner {} => query::query_recent_winner(deps),
        QueryMsg::Winners { start_after, limit } => {
            query::query_winners(deps, start_after, limit)
        }
        QueryMsg::UserWins { address } => query::query_user_wins(deps, address),
        QueryMsg::Stats {} => query::query_stats(deps),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
