//! End-to-end tests for the raffle and its randomness coordinator.
//!
//! Both contracts run on their own mock storage. Messages one contract emits
//! are decoded and fed into the other's entry points by hand, so the full
//! enter → upkeep → request → beacon → fulfill → payout cycle runs on the
//! real wire formats.
//!
//! Run:
//! ```bash
//! cargo test -p raffle-integration-tests
//! ```

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    coins, from_json, Addr, BankMsg, CosmosMsg, Env, MemoryStorage, OwnedDeps, Reply, Response,
    SubMsg, SubMsgResult, Timestamp, Uint128, WasmMsg,
};
use raffle_common::{select_winner_index, OracleParams, RaffleState};
use vrf_coordinator::beacon::{derive_random_words, QUICKNET_PK_HEX};

type MockDeps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Constants ───

const CHAIN_HASH: &str = "52db9ba70e0cc0f6eaf7803dd07447a1f5477735fd3f661792ba94600c84e971";
const GENESIS_TIME: u64 = 1692803367;

/// Real quicknet test vector: round 1000
const TEST_ROUND: u64 = 1000;
const TEST_SIG_HEX: &str = "b44679b9a59af2ec876b1a6b1ad52ea9b1615fc3982b19576350f93447cb1125e342b73a8dd2bacbe47e4b6b63ed5e39";
const TEST_RANDOMNESS_HEX: &str =
    "fe290beca10872ef2fb164d2aa4442de4566183ec51c56ff3cd603d930e54fdd";

const FEE: u128 = 1_000_000;
const DENOM: &str = "uraffle";
const INTERVAL: u64 = 60;

// ─── Environment ───

struct Harness {
    raffle: MockDeps,
    coordinator: MockDeps,
    raffle_addr: Addr,
    coordinator_addr: Addr,
    /// Raffle block time; the coordinator clock is pinned at round 997 so
    /// with the minimum three confirmations every request targets round 1000.
    raffle_time: Timestamp,
}

impl Harness {
    fn new() -> Self {
        let api = MockApi::default();
        let mut h = Harness {
            raffle: mock_dependencies(),
            coordinator: mock_dependencies(),
            raffle_addr: api.addr_make("raffle"),
            coordinator_addr: api.addr_make("coordinator"),
            raffle_time: mock_env().block.time,
        };

        let admin = api.addr_make("admin");
        let env = h.coordinator_env();
        vrf_coordinator::contract::instantiate(
            h.coordinator.as_mut(),
            env,
            message_info(&admin, &[]),
            vrf_coordinator::msg::InstantiateMsg {
                operators: vec![api.addr_make("operator").to_string()],
                quicknet_pubkey_hex: QUICKNET_PK_HEX.to_string(),
                chain_hash: CHAIN_HASH.to_string(),
                genesis_time: GENESIS_TIME,
                period_seconds: 3,
            },
        )
        .unwrap();

        let env = h.raffle_env();
        raffle::contract::instantiate(
            h.raffle.as_mut(),
            env,
            message_info(&admin, &[]),
            raffle::msg::InstantiateMsg {
                entry_fee: Uint128::new(FEE),
                denom: DENOM.to_string(),
                interval_seconds: INTERVAL,
                vrf_coordinator: h.coordinator_addr.to_string(),
                oracle: OracleParams {
                    key_hash: CHAIN_HASH.to_string(),
                    subscription_id: 790,
                    request_confirmations: 1,
                    callback_gas_limit: 500_000,
                    num_words: 1,
                },
            },
        )
        .unwrap();

        h
    }

    fn raffle_env(&self) -> Env {
        let mut env = mock_env();
        env.block.time = self.raffle_time;
        env.contract.address = self.raffle_addr.clone();
        env
    }

    fn coordinator_env(&self) -> Env {
        let mut env = mock_env();
        env.block.time = Timestamp::from_seconds(GENESIS_TIME + (TEST_ROUND - 4) * 3);
        env.contract.address = self.coordinator_addr.clone();
        env
    }

    fn advance(&mut self, seconds: u64) {
        self.raffle_time = self.raffle_time.plus_seconds(seconds);
    }

    /// Bank balance the raffle contract holds, as the mock querier sees it.
    fn fund_raffle(&mut self, amount: u128) {
        self.raffle
            .querier
            .bank
            .update_balance(&self.raffle_addr, coins(amount, DENOM));
    }

    fn enter(&mut self, name: &str) -> Addr {
        let player = MockApi::default().addr_make(name);
        let env = self.raffle_env();
        raffle::contract::execute(
            self.raffle.as_mut(),
            env,
            message_info(&player, &coins(FEE, DENOM)),
            raffle::msg::ExecuteMsg::Enter {},
        )
        .unwrap();
        player
    }

    /// Run upkeep on the raffle and relay its randomness request to the
    /// coordinator. Returns the request id.
    fn perform_upkeep(&mut self) -> u64 {
        let keeper = MockApi::default().addr_make("keeper");
        let env = self.raffle_env();
        let res = raffle::contract::execute(
            self.raffle.as_mut(),
            env,
            message_info(&keeper, &[]),
            raffle::msg::ExecuteMsg::PerformUpkeep {},
        )
        .unwrap();
        assert_eq!(res.messages.len(), 1);

        let (contract_addr, msg) = wasm_execute(&res.messages[0]);
        assert_eq!(contract_addr, self.coordinator_addr.to_string());
        let request: vrf_coordinator::msg::ExecuteMsg = from_json(&msg).unwrap();
        let request_id = match &request {
            vrf_coordinator::msg::ExecuteMsg::RequestRandomness { request_id, .. } => *request_id,
            other => panic!("unexpected coordinator message: {:?}", other),
        };

        let raffle_addr = self.raffle_addr.clone();
        let env = self.coordinator_env();
        vrf_coordinator::contract::execute(
            self.coordinator.as_mut(),
            env,
            message_info(&raffle_addr, &[]),
            request,
        )
        .unwrap();
        request_id
    }

    fn submit_beacon(&mut self) {
        let operator = MockApi::default().addr_make("operator");
        let env = self.coordinator_env();
        vrf_coordinator::contract::execute(
            self.coordinator.as_mut(),
            env,
            message_info(&operator, &[]),
            vrf_coordinator::msg::ExecuteMsg::SubmitBeacon {
                round: TEST_ROUND,
                signature_hex: TEST_SIG_HEX.to_string(),
            },
        )
        .unwrap();
    }

    /// Ask the coordinator to fulfill and return the callback sub-message.
    fn fulfill(&mut self, request_id: u64) -> SubMsg {
        let relayer = MockApi::default().addr_make("relayer");
        let consumer = self.raffle_addr.to_string();
        let env = self.coordinator_env();
        let res = vrf_coordinator::contract::execute(
            self.coordinator.as_mut(),
            env,
            message_info(&relayer, &[]),
            vrf_coordinator::msg::ExecuteMsg::FulfillRandomness {
                consumer,
                request_id,
            },
        )
        .unwrap();
        assert_eq!(res.messages.len(), 1);
        res.messages[0].clone()
    }

    /// Deliver the coordinator's callback to the raffle. A failed callback is
    /// reported back through the coordinator's `reply`, as the chain would.
    fn deliver(&mut self, callback: &SubMsg) -> Result<Response, raffle::ContractError> {
        let (contract_addr, msg) = wasm_execute(callback);
        assert_eq!(contract_addr, self.raffle_addr.to_string());
        let coordinator_addr = self.coordinator_addr.clone();
        let env = self.raffle_env();
        let result = raffle::contract::execute(
            self.raffle.as_mut(),
            env,
            message_info(&coordinator_addr, &[]),
            from_json(&msg).unwrap(),
        );

        if let Err(err) = &result {
            let env = self.coordinator_env();
            vrf_coordinator::contract::reply(
                self.coordinator.as_mut(),
                env,
                Reply {
                    id: callback.id,
                    payload: callback.payload.clone(),
                    gas_used: 0,
                    result: SubMsgResult::Err(err.to_string()),
                },
            )
            .unwrap();
        }
        result
    }

    fn raffle_query<T: serde::de::DeserializeOwned>(&self, msg: raffle::msg::QueryMsg) -> T {
        from_json(raffle::contract::query(self.raffle.as_ref(), self.raffle_env(), msg).unwrap())
            .unwrap()
    }

    fn request_status(&self, request_id: u64) -> vrf_coordinator::state::RequestStatus {
        let request: Option<vrf_coordinator::state::RandomnessRequest> = from_json(
            vrf_coordinator::contract::query(
                self.coordinator.as_ref(),
                self.coordinator_env(),
                vrf_coordinator::msg::QueryMsg::Request {
                    consumer: self.raffle_addr.to_string(),
                    request_id,
                },
            )
            .unwrap(),
        )
        .unwrap();
        request.unwrap().status
    }
}

fn wasm_execute(sub: &SubMsg) -> (String, cosmwasm_std::Binary) {
    match &sub.msg {
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr, msg, ..
        }) => (contract_addr.clone(), msg.clone()),
        other => panic!("expected wasm execute, got {:?}", other),
    }
}

fn expected_winner_index(raffle_addr: &Addr, request_id: u64, num_players: u32) -> u32 {
    let randomness = hex::decode(TEST_RANDOMNESS_HEX).unwrap();
    let word = derive_random_words(&randomness, raffle_addr, request_id, 1)[0];
    select_winner_index(word, num_players).unwrap()
}

fn payout_of(res: &Response) -> (String, Uint128) {
    res.messages
        .iter()
        .find_map(|sub| match &sub.msg {
            CosmosMsg::Bank(BankMsg::Send { to_address, amount }) => {
                Some((to_address.clone(), amount[0].amount))
            }
            _ => None,
        })
        .expect("payout message")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_full_round_pays_the_drawn_player() {
    let mut h = Harness::new();

    let players: Vec<Addr> = ["alice", "bob", "carol"]
        .iter()
        .map(|name| h.enter(name))
        .collect();
    h.fund_raffle(FEE * 3);

    // Interval has not elapsed yet
    let check: raffle::msg::CheckUpkeepResponse =
        h.raffle_query(raffle::msg::QueryMsg::CheckUpkeep {});
    assert!(!check.upkeep_needed);

    h.advance(INTERVAL);
    let request_id = h.perform_upkeep();
    assert_eq!(request_id, 1);

    let state: RaffleState = h.raffle_query(raffle::msg::QueryMsg::RaffleState {});
    assert_eq!(state, RaffleState::Resolving);

    h.submit_beacon();
    let callback = h.fulfill(request_id);
    let res = h.deliver(&callback).unwrap();

    let index = expected_winner_index(&h.raffle_addr, request_id, 3);
    let winner = &players[index as usize];
    let (to, amount) = payout_of(&res);
    assert_eq!(to, winner.to_string());
    assert_eq!(amount, Uint128::new(FEE * 3));

    let recent: Option<Addr> = h.raffle_query(raffle::msg::QueryMsg::RecentWinner {});
    assert_eq!(recent.as_ref(), Some(winner));

    let ledger: raffle::state::Ledger = h.raffle_query(raffle::msg::QueryMsg::Ledger {});
    assert_eq!(ledger.state, RaffleState::Open);
    assert_eq!(ledger.round, 2);
    assert_eq!(ledger.num_participants, 0);
    assert_eq!(ledger.pool, Uint128::zero());
    assert_eq!(ledger.pending_request, None);
    assert_eq!(ledger.last_resolved_at, h.raffle_time);

    assert_eq!(
        h.request_status(request_id),
        vrf_coordinator::state::RequestStatus::Fulfilled
    );
}

#[test]
fn test_failed_payout_reopens_request_for_retry() {
    let mut h = Harness::new();
    h.enter("alice");
    h.enter("bob");
    // Contract balance does not cover the pool
    h.fund_raffle(FEE);

    h.advance(INTERVAL);
    let request_id = h.perform_upkeep();
    h.submit_beacon();

    let callback = h.fulfill(request_id);
    let err = h.deliver(&callback).unwrap_err();
    assert!(
        matches!(err, raffle::ContractError::PayoutTransferFailed { .. }),
        "expected payout failure, got: {:?}",
        err
    );

    // Raffle is still waiting on the same request; coordinator reopened it
    let pending: Option<u64> = h.raffle_query(raffle::msg::QueryMsg::PendingRequest {});
    assert_eq!(pending, Some(request_id));
    let pool: Uint128 = h.raffle_query(raffle::msg::QueryMsg::Pool {});
    assert_eq!(pool, Uint128::new(FEE * 2));
    assert_eq!(
        h.request_status(request_id),
        vrf_coordinator::state::RequestStatus::Pending
    );

    h.fund_raffle(FEE * 2);
    let callback = h.fulfill(request_id);
    let res = h.deliver(&callback).unwrap();
    let (_, amount) = payout_of(&res);
    assert_eq!(amount, Uint128::new(FEE * 2));

    let state: RaffleState = h.raffle_query(raffle::msg::QueryMsg::RaffleState {});
    assert_eq!(state, RaffleState::Open);
}

#[test]
fn test_consecutive_rounds_use_fresh_requests() {
    let mut h = Harness::new();
    h.submit_beacon();

    // Round 1: single player always wins
    let alice = h.enter("alice");
    h.fund_raffle(FEE);
    h.advance(INTERVAL);
    let first = h.perform_upkeep();
    let callback = h.fulfill(first);
    let res = h.deliver(&callback).unwrap();
    assert_eq!(payout_of(&res).0, alice.to_string());

    // Round 2 starts empty and needs a full interval again
    let check: raffle::msg::CheckUpkeepResponse =
        h.raffle_query(raffle::msg::QueryMsg::CheckUpkeep {});
    assert!(!check.upkeep_needed);

    let players: Vec<Addr> = ["bob", "carol", "dave", "erin"]
        .iter()
        .map(|name| h.enter(name))
        .collect();
    let roster: raffle::msg::PlayersResponse = h.raffle_query(raffle::msg::QueryMsg::Players {
        start_after: None,
        limit: None,
    });
    assert_eq!(roster.round, 2);
    assert_eq!(roster.players, players);

    h.fund_raffle(FEE * 4);
    h.advance(INTERVAL);
    let second = h.perform_upkeep();
    assert_eq!(second, first + 1);

    // The first request's words cannot be replayed into the new round
    let (_, stale_msg) = wasm_execute(&callback);
    let env = h.raffle_env();
    let coordinator_addr = h.coordinator_addr.clone();
    let err = raffle::contract::execute(
        h.raffle.as_mut(),
        env,
        message_info(&coordinator_addr, &[]),
        from_json(&stale_msg).unwrap(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        raffle::ContractError::UnknownRequest { request_id: 1 }
    ));

    let callback = h.fulfill(second);
    let res = h.deliver(&callback).unwrap();
    let index = expected_winner_index(&h.raffle_addr, second, 4);
    assert_eq!(payout_of(&res).0, players[index as usize].to_string());

    let stats: raffle::state::RaffleStats = h.raffle_query(raffle::msg::QueryMsg::Stats {});
    assert_eq!(stats.rounds_completed, 2);
    assert_eq!(stats.total_paid_out, Uint128::new(FEE * 5));

    let history: raffle::msg::WinnersResponse = h.raffle_query(raffle::msg::QueryMsg::Winners {
        start_after: None,
        limit: None,
    });
    assert_eq!(history.winners.len(), 2);
    assert_eq!(history.winners[0].round, 1);
    assert_eq!(history.winners[1].request_id, second);
}
