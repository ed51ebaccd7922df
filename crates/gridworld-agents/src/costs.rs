//! Energy costs per action type.
//!
//! All values are `u32`. The cost is debited once, when the agent executes
//! the action; deciding is free.

use gridworld_types::Action;

/// Energy cost of one directional move.
pub const MOVE_COST: u32 = 1;

/// Energy cost of picking up or dropping a resource.
pub const HANDLING_COST: u32 = 2;

/// Energy cost of broadcasting a message.
pub const COMMUNICATE_COST: u32 = 1;

/// Return the energy cost for a given action.
///
/// - Move (any direction): 1
/// - Pickup, Drop: 2
/// - Communicate: 1
/// - Wait: 0
pub const fn energy_cost(action: Action) -> u32 {
    match action {
        Action::MoveNorth | Action::MoveSouth | Action::MoveEast | Action::MoveWest => MOVE_COST,
        Action::Pickup | Action::Drop => HANDLING_COST,
        Action::Communicate => COMMUNICATE_COST,
        Action::Wait => 0,
    }
}
