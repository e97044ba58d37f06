pub mod selection;
pub mod types;

pub use selection::select_winner_index;
pub use types::{ConsumerExecuteMsg, CoordinatorExecuteMsg, OracleParams, RaffleState};
