#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure scoring system that ranks mercenary lanes by urgency.
//!
//! A lane's score rises when it lacks friendly defense, when enemy
//! mercenaries are already travelling it, and sharply when a demon spawner
//! feeds it; a small random jitter breaks ties between otherwise equal
//! lanes. Scores are consumed by the recruiting decision once per turn.

use grimhold_board::{legal_mercenary_lanes, owned_towers};
use grimhold_core::{Direction, GameState, Team};
use rand::Rng;

/// Score assigned to a direction that is not currently a legal lane.
pub const DISQUALIFIED_SCORE: i32 = -9999;

const DEFENSE_SLOTS: i32 = 5;
const DEFENSE_WEIGHT: i32 = 5;
const PRESSURE_WEIGHT: i32 = 8;
const SPAWNER_BONUS: i32 = 50;

/// Stable lane index of `direction` among the currently legal lanes.
///
/// Legal lanes are ordered alphabetically by label; the server tags towers,
/// mercenaries and spawners with indexes in that same order. Returns `None`
/// when the direction is not legal right now.
#[must_use]
pub fn lane_index(state: &GameState, team: Team, direction: Direction) -> Option<i64> {
    let mut lanes = legal_mercenary_lanes(state, team);
    lanes.sort_by_key(|lane| lane.label());
    lanes
        .iter()
        .position(|lane| *lane == direction)
        .map(|index| index as i64)
}

/// Urgency score for queueing a mercenary through `direction`.
///
/// Sums a defense-deficit term (capped at five wanted defenders), an
/// enemy-pressure term, uniform jitter in [-2, 2], and a flat bonus per
/// spawner aligned with the lane. Spawners count regardless of which side
/// they target. Illegal directions score [`DISQUALIFIED_SCORE`].
#[must_use]
pub fn score_lane<R>(state: &GameState, team: Team, direction: Direction, rng: &mut R) -> i32
where
    R: Rng + ?Sized,
{
    let index = match lane_index(state, team, direction) {
        Some(index) => index,
        None => return DISQUALIFIED_SCORE,
    };

    let defenders = owned_towers(state, team)
        .iter()
        .filter(|tower| tower.kind.is_defensive() && tower.lane == Some(index))
        .count() as i32;
    let pressure = state
        .mercenaries
        .iter()
        .filter(|mercenary| mercenary.team != team && mercenary.lane == Some(index))
        .count() as i32;
    let aligned_spawners = state
        .demon_spawners
        .iter()
        .filter(|spawner| spawner.lane == Some(index))
        .count() as i32;

    (DEFENSE_SLOTS - defenders).max(0) * DEFENSE_WEIGHT
        + pressure * PRESSURE_WEIGHT
        + rng.gen_range(-2..=2)
        + aligned_spawners * SPAWNER_BONUS
}

/// Picks the most urgent legal lane, or `None` when no lane is legal.
///
/// Directions are evaluated in the base probe order and the first maximum
/// wins, so a jitter tie resolves toward the earlier direction.
#[must_use]
pub fn choose_best_lane<R>(state: &GameState, team: Team, rng: &mut R) -> Option<Direction>
where
    R: Rng + ?Sized,
{
    let mut best: Option<(i32, Direction)> = None;
    for direction in legal_mercenary_lanes(state, team) {
        let score = score_lane(state, team, direction, rng);
        let beats_current = match best {
            Some((top_score, _)) => score > top_score,
            None => true,
        };
        if beats_current {
            best = Some((score, direction));
        }
    }
    best.map(|(_, direction)| direction)
}
