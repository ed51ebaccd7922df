//! Single-step path selection toward a known target.
//!
//! The heuristic looks one cell ahead. Each cardinal neighbor that survives
//! the filters is scored as `move_cost + manhattan distance to target`, and
//! the cheapest wins. Ties go to the first neighbor in north, south, east,
//! west order.
//!
//! Filters, in order:
//!
//! 1. off-grid (negative coordinate), wall (believed or visible), another
//!    visible agent, hazard (believed or visible): rejected outright;
//! 2. dead ends: a neighbor that is not the target and whose onward
//!    neighbors are all off-grid, walls or hazards is dropped, but only when
//!    some other neighbor survived step 1.

use gridworld_types::{Action, CellType, Perception, Position};

use crate::world_model::WorldModel;

/// Heuristic cost of stepping into a believed wall.
pub const WALL_COST: u32 = 10;

/// Heuristic cost of stepping onto a believed resource.
pub const RESOURCE_COST: u32 = 2;

/// Heuristic cost of stepping onto a believed goal or empty cell.
pub const KNOWN_COST: u32 = 1;

/// Heuristic cost of stepping into a never-observed cell.
pub const UNKNOWN_COST: u32 = 3;

/// Heuristic cost of entering `pos` given what the agent believes.
///
/// `None` stands for infinite cost (a believed hazard).
pub fn move_cost(model: &WorldModel, pos: Position) -> Option<u32> {
    match model.belief(pos) {
        Some(CellType::Hazard) => None,
        Some(CellType::Wall) => Some(WALL_COST),
        Some(CellType::Resource) => Some(RESOURCE_COST),
        Some(CellType::Goal | CellType::Empty) => Some(KNOWN_COST),
        None => Some(UNKNOWN_COST),
    }
}

/// Whether `pos` is believed or seen to be `kind`.
fn is_kind(model: &WorldModel, perception: &Perception, pos: Position, kind: CellType) -> bool {
    model.is_known(pos, kind) || perception.cell_at(pos) == Some(kind)
}

/// Step-1 filter: can the agent step into `pos` at all?
fn is_enterable(model: &WorldModel, perception: &Perception, pos: Position) -> bool {
    !pos.is_negative()
        && !is_kind(model, perception, pos, CellType::Wall)
        && !is_kind(model, perception, pos, CellType::Hazard)
        && !perception.is_occupied(pos)
}

/// Whether every way out of `pos`, other than back to `from`, is blocked.
fn is_dead_end(model: &WorldModel, perception: &Perception, from: Position, pos: Position) -> bool {
    pos.neighbors().into_iter().filter(|&n| n != from).all(|n| {
        n.is_negative()
            || is_kind(model, perception, n, CellType::Wall)
            || is_kind(model, perception, n, CellType::Hazard)
    })
}

/// Pick the single move that best approaches `target`.
///
/// Returns `None` when no neighbor survives the filters.
pub fn select_step(model: &WorldModel, perception: &Perception, target: Position) -> Option<Action> {
    let from = perception.current_position;

    let enterable: Vec<(Action, Position)> = Action::MOVES
        .into_iter()
        .filter_map(|action| {
            let (dx, dy) = action.offset()?;
            let pos = from.translated(dx, dy);
            is_enterable(model, perception, pos).then_some((action, pos))
        })
        .collect();

    let has_alternative = enterable.len() > 1;

    let mut best: Option<(u32, Action)> = None;
    for &(action, pos) in &enterable {
        if pos != target && has_alternative && is_dead_end(model, perception, from, pos) {
            continue;
        }
        let Some(cost) = move_cost(model, pos) else {
            continue;
        };
        let score = cost.saturating_add(pos.distance_to(target));
        if best.is_none_or(|(lowest, _)| score < lowest) {
            best = Some((score, action));
        }
    }

    best.map(|(_, action)| action)
}
