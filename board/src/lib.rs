#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Read-only queries over a turn's board snapshot.
//!
//! Every function here is a pure projection of [`GameState`]: bounds checks,
//! tile and occupancy reads, the legal-move sets the strategy layer consumes,
//! and distance orderings for placement decisions. Nothing in this crate
//! mutates state or holds any of its own.

use grimhold_core::{Direction, GameState, GridPos, PriceTable, Team, Tower, OPEN_LANE_TILE};

/// True iff `(x, y)` falls outside the floor grid's column or row range.
///
/// The column range is taken from the first row, matching the bounds rule
/// the rest of the engine assumes for (possibly ragged) grids.
#[must_use]
pub fn is_out_of_bounds(state: &GameState, x: i32, y: i32) -> bool {
    x < 0 || y < 0 || y as usize >= state.rows() || x as usize >= state.columns()
}

/// Floor-tile label at `(x, y)`, or `None` when the read is out of bounds.
#[must_use]
pub fn tile_at(state: &GameState, x: i32, y: i32) -> Option<&str> {
    if x < 0 || y < 0 {
        return None;
    }
    state
        .floor_tiles
        .get(y as usize)?
        .get(x as usize)
        .map(String::as_str)
}

/// Occupancy label at `(x, y)`, or `None` when the read is out of bounds.
#[must_use]
pub fn occupant_at(state: &GameState, x: i32, y: i32) -> Option<&str> {
    if x < 0 || y < 0 {
        return None;
    }
    state
        .entity_grid
        .get(y as usize)?
        .get(x as usize)
        .map(String::as_str)
}

/// Position of `team`'s own base.
#[must_use]
pub fn base_position(state: &GameState, team: Team) -> GridPos {
    match team {
        Team::Red => state.base_red.position(),
        Team::Blue => state.base_blue.position(),
    }
}

/// Position of the opposing base.
#[must_use]
pub fn enemy_base_position(state: &GameState, team: Team) -> GridPos {
    base_position(state, team.opponent())
}

/// Spendable money reported for `team` this turn.
#[must_use]
pub fn money(state: &GameState, team: Team) -> i64 {
    match team {
        Team::Red => state.money_red,
        Team::Blue => state.money_blue,
    }
}

/// Tower prices quoted to `team` this turn.
#[must_use]
pub fn prices(state: &GameState, team: Team) -> &PriceTable {
    match team {
        Team::Red => &state.prices_red,
        Team::Blue => &state.prices_blue,
    }
}

/// Display name reported for `team`, possibly empty.
#[must_use]
pub fn team_name(state: &GameState, team: Team) -> &str {
    match team {
        Team::Red => &state.team_name_red,
        Team::Blue => &state.team_name_blue,
    }
}

/// Directions whose adjacent tile from `team`'s base is an open lane.
///
/// Probed in the fixed [`Direction::CARDINALS`] order; the returned sequence
/// keeps that order, which downstream tie-breaking relies on.
#[must_use]
pub fn legal_mercenary_lanes(state: &GameState, team: Team) -> Vec<Direction> {
    let base = base_position(state, team);
    Direction::CARDINALS
        .into_iter()
        .filter(|direction| {
            let probe = base.step(*direction);
            tile_at(state, probe.x, probe.y) == Some(OPEN_LANE_TILE)
        })
        .collect()
}

/// Every position whose floor tile belongs to `team` and is unoccupied.
///
/// Scanned row-major, so equidistant placement candidates resolve in a
/// stable top-left-first order.
#[must_use]
pub fn legal_build_spaces(state: &GameState, team: Team) -> Vec<GridPos> {
    let label = team.tile_label();
    let mut spaces = Vec::new();
    for (y, row) in state.floor_tiles.iter().enumerate() {
        for (x, tile) in row.iter().enumerate() {
            if tile.as_str() != label {
                continue;
            }
            let free = state
                .entity_grid
                .get(y)
                .and_then(|occupants| occupants.get(x))
                .map_or(false, String::is_empty);
            if free {
                spaces.push(GridPos::new(x as i32, y as i32));
            }
        }
    }
    spaces
}

/// All towers currently owned by `team`.
#[must_use]
pub fn owned_towers(state: &GameState, team: Team) -> Vec<&Tower> {
    state
        .towers
        .iter()
        .filter(|tower| tower.team == team)
        .collect()
}

/// Number of combat-capable towers `team` owns per the server's list.
#[must_use]
pub fn defensive_tower_count(state: &GameState, team: Team) -> usize {
    state
        .towers
        .iter()
        .filter(|tower| tower.team == team && tower.kind.is_defensive())
        .count()
}

/// Number of mercenaries fielded by the opposing team.
#[must_use]
pub fn enemy_mercenary_count(state: &GameState, team: Team) -> usize {
    state
        .mercenaries
        .iter()
        .filter(|mercenary| mercenary.team != team)
        .count()
}

/// Number of demons currently fighting for `team`.
#[must_use]
pub fn own_demon_count(state: &GameState, team: Team) -> usize {
    state.demons.iter().filter(|demon| demon.team == team).count()
}

/// Positions sorted by ascending Euclidean distance from `origin`.
///
/// The sort is stable: equidistant positions keep their input order.
#[must_use]
pub fn order_by_distance(origin: GridPos, positions: &[GridPos]) -> Vec<GridPos> {
    let mut ordered = positions.to_vec();
    ordered.sort_by(|a, b| origin.distance(*a).total_cmp(&origin.distance(*b)));
    ordered
}

/// Position closest to `origin`; the earliest input position wins ties.
#[must_use]
pub fn nearest_to(origin: GridPos, positions: &[GridPos]) -> Option<GridPos> {
    order_by_distance(origin, positions).first().copied()
}

/// Position farthest from `origin`; the latest input position wins ties.
#[must_use]
pub fn farthest_from(origin: GridPos, positions: &[GridPos]) -> Option<GridPos> {
    order_by_distance(origin, positions).last().copied()
}
