use cosmwasm_std::{to_json_binary, Binary, Deps, Env, StdResult};

use crate::beacon::round_at;
use crate::state::{BEACONS, CONFIG, LATEST_ROUND, REQUESTS};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_beacon(deps: Deps, round: u64) -> StdResult<Binary> {
    let beacon = BEACONS.may_load(deps.storage, round)?;
    to_json_binary(&beacon)
}

pub fn query_latest_round(deps: Deps) -> StdResult<Binary> {
    let round = LATEST_ROUND.may_load(deps.storage)?.unwrap_or(0);
    to_json_binary(&round)
}

pub fn query_current_round(deps: Deps, env: Env) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let round = round_at(env.block.time, config.genesis_time, config.period_seconds);
    to_json_binary(&round)
}

pub fn query_request(deps: Deps, consumer: String, request_id: u64) -> StdResult<Binary> {
    let consumer = deps.api.addr_validate(&consumer)?;
    let request = REQUESTS.may_load(deps.storage, (&consumer, request_id))?;
    to_json_binary(&request)
}
