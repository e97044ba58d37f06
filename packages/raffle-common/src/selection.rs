use cosmwasm_std::{Uint128, Uint256};

/// Map a random word onto a participant index: `random_word % num_participants`.
///
/// Returns `None` when there are no participants to choose from.
pub fn select_winner_index(random_word: Uint256, num_participants: u32) -> Option<u32> {
    if num_participants == 0 {
        return None;
    }
    let index = random_word % Uint256::from(num_participants);
    // index < num_participants, so it always fits back into a u32
    Uint128::try_from(index)
        .ok()
        .and_then(|v| u32::try_from(v.u128()).ok())
}
