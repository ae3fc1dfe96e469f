//! Fixture support for assembling coherent [`GameState`] values in tests.
//!
//! Gated behind the `state_scaffolding` feature so production builds never
//! carry it; downstream crates enable the feature from their
//! dev-dependencies.

use crate::{
    Demon, DemonSpawner, GameState, Mercenary, PlayerBase, PriceTable, Team, Tower, TowerKind,
    OPEN_LANE_TILE,
};

/// Prices used by fixture states unless a test overrides them.
pub const FIXTURE_PRICES: PriceTable = PriceTable {
    crossbow: 20,
    cannon: 30,
    minigun: 70,
    house: 15,
    church: 40,
};

/// Incrementally assembles a [`GameState`] with coherent grids.
///
/// The board starts as plain ground (no build tiles, no lanes) with the red
/// base one tile in from the top-left corner and the blue base one tile in
/// from the bottom-right, 100 money per side, and [`FIXTURE_PRICES`].
#[derive(Clone, Debug)]
pub struct StateBuilder {
    state: GameState,
}

impl StateBuilder {
    /// Creates an empty board of the given dimensions.
    #[must_use]
    pub fn new(columns: usize, rows: usize) -> Self {
        let far_x = columns.saturating_sub(2) as i32;
        let far_y = rows.saturating_sub(2) as i32;
        let state = GameState {
            floor_tiles: vec![vec![".".to_owned(); columns]; rows],
            entity_grid: vec![vec![String::new(); columns]; rows],
            towers: Vec::new(),
            mercenaries: Vec::new(),
            demons: Vec::new(),
            demon_spawners: Vec::new(),
            base_red: PlayerBase {
                x: 1,
                y: 1,
                health: 100,
                money: 100,
            },
            base_blue: PlayerBase {
                x: far_x,
                y: far_y,
                health: 100,
                money: 100,
            },
            prices_red: FIXTURE_PRICES,
            prices_blue: FIXTURE_PRICES,
            money_red: 100,
            money_blue: 100,
            team_name_red: "RED".to_owned(),
            team_name_blue: "BLUE".to_owned(),
            turn: 0,
        };
        Self { state }
    }

    /// Moves a team's base to the given position.
    #[must_use]
    pub fn with_base(mut self, team: Team, x: i32, y: i32) -> Self {
        let base = match team {
            Team::Red => &mut self.state.base_red,
            Team::Blue => &mut self.state.base_blue,
        };
        base.x = x;
        base.y = y;
        self
    }

    /// Overwrites a single floor tile.
    #[must_use]
    pub fn with_tile(mut self, x: usize, y: usize, label: &str) -> Self {
        self.state.floor_tiles[y][x] = label.to_owned();
        self
    }

    /// Marks a floor tile as buildable for `team`.
    #[must_use]
    pub fn with_team_tile(self, team: Team, x: usize, y: usize) -> Self {
        self.with_tile(x, y, team.tile_label())
    }

    /// Marks a floor tile as an open mercenary lane.
    #[must_use]
    pub fn with_open_lane(self, x: usize, y: usize) -> Self {
        self.with_tile(x, y, OPEN_LANE_TILE)
    }

    /// Overwrites a single occupancy entry.
    #[must_use]
    pub fn with_occupant(mut self, x: usize, y: usize, label: &str) -> Self {
        self.state.entity_grid[y][x] = label.to_owned();
        self
    }

    /// Adds a tower without a lane assignment.
    #[must_use]
    pub fn with_tower(mut self, team: Team, kind: TowerKind, x: i32, y: i32) -> Self {
        self.state.towers.push(Tower {
            x,
            y,
            team,
            kind,
            lane: None,
        });
        self
    }

    /// Adds a tower assigned to a lane index.
    #[must_use]
    pub fn with_lane_tower(mut self, team: Team, kind: TowerKind, lane: i64) -> Self {
        self.state.towers.push(Tower {
            x: 0,
            y: 0,
            team,
            kind,
            lane: Some(lane),
        });
        self
    }

    /// Adds a mercenary, optionally assigned to a lane index.
    #[must_use]
    pub fn with_mercenary(mut self, team: Team, lane: Option<i64>) -> Self {
        self.state.mercenaries.push(Mercenary {
            x: 0,
            y: 0,
            team,
            health: 10,
            lane,
        });
        self
    }

    /// Adds a demon fighting for `team`.
    #[must_use]
    pub fn with_demon(mut self, team: Team) -> Self {
        self.state.demons.push(Demon {
            x: 0,
            y: 0,
            team,
            health: 15,
            lane: None,
        });
        self
    }

    /// Adds a demon spawner, optionally assigned to a lane index.
    #[must_use]
    pub fn with_spawner(mut self, target: Team, lane: Option<i64>) -> Self {
        self.state.demon_spawners.push(DemonSpawner {
            x: 0,
            y: 0,
            target,
            lane,
            reload_time: 3,
        });
        self
    }

    /// Sets a team's spendable money, keeping the base mirror in sync.
    #[must_use]
    pub fn with_money(mut self, team: Team, amount: i64) -> Self {
        match team {
            Team::Red => {
                self.state.money_red = amount;
                self.state.base_red.money = amount;
            }
            Team::Blue => {
                self.state.money_blue = amount;
                self.state.base_blue.money = amount;
            }
        }
        self
    }

    /// Sets the current turn number.
    #[must_use]
    pub fn with_turn(mut self, turn: u32) -> Self {
        self.state.turn = turn;
        self
    }

    /// Replaces a team's price table.
    #[must_use]
    pub fn with_prices(mut self, team: Team, prices: PriceTable) -> Self {
        match team {
            Team::Red => self.state.prices_red = prices,
            Team::Blue => self.state.prices_blue = prices,
        }
        self
    }

    /// Returns the assembled state.
    #[must_use]
    pub fn finish(self) -> GameState {
        self.state
    }
}
