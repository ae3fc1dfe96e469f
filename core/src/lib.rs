#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grimhold engine.
//!
//! This crate defines the data surface that connects the match server to the
//! decision engine: the decoded [`GameState`] snapshot handed to the engine
//! once per turn, the [`AIAction`] record the engine answers with, and the
//! small vocabulary types ([`Team`], [`Direction`], [`TowerKind`]) every
//! other crate speaks. Field names and label casing follow the server's wire
//! schema exactly; everything else in the workspace works in terms of these
//! types and never touches raw strings.

use std::fmt;

use serde::{de, ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};

#[cfg(any(test, feature = "state_scaffolding"))]
pub mod scaffolding;

/// Floor-tile label marking an open mercenary lane.
pub const OPEN_LANE_TILE: &str = "O";

/// Identifies one of the two competing sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// The side tagged `r` on the wire.
    #[serde(rename = "r")]
    Red,
    /// The side tagged `b` on the wire.
    #[serde(rename = "b")]
    Blue,
}

impl Team {
    /// Returns the opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// Single-letter tag used for team-owned floor tiles and wire records.
    #[must_use]
    pub const fn tile_label(self) -> &'static str {
        match self {
            Team::Red => "r",
            Team::Blue => "b",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Team::Red => "red",
            Team::Blue => "blue",
        };
        formatter.write_str(name)
    }
}

/// Cardinal directions a mercenary can be queued through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row numbers.
    #[serde(rename = "N")]
    North,
    /// Toward increasing row numbers.
    #[serde(rename = "S")]
    South,
    /// Toward increasing column numbers.
    #[serde(rename = "E")]
    East,
    /// Toward decreasing column numbers.
    #[serde(rename = "W")]
    West,
}

impl Direction {
    /// Fixed order in which the tiles around a base are probed for lanes.
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Grid offset of a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// Single-letter wire label, also the key for alphabetical lane order.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::South => "S",
            Direction::East => "E",
            Direction::West => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// A position on the board grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridPos {
    /// Column coordinate.
    pub x: i32,
    /// Row coordinate.
    pub y: i32,
}

impl GridPos {
    /// Creates a position from column and row coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Position one step away in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.x, self.y)
    }
}

/// Enumerates every tower kind the server can be asked to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TowerKind {
    /// Light ranged defense, the cheapest combat tier.
    Crossbow,
    /// Area-damage defense, the middle combat tier.
    Cannon,
    /// Heavy ranged defense, the top combat tier.
    Minigun,
    /// Economy tower that generates income.
    House,
    /// Sacred support tower.
    Church,
}

impl TowerKind {
    /// The three combat-capable kinds, in price-table order.
    pub const DEFENSIVE: [TowerKind; 3] =
        [TowerKind::Crossbow, TowerKind::Cannon, TowerKind::Minigun];

    /// Lowercase label used in outbound actions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TowerKind::Crossbow => "crossbow",
            TowerKind::Cannon => "cannon",
            TowerKind::Minigun => "minigun",
            TowerKind::House => "house",
            TowerKind::Church => "church",
        }
    }

    /// True for the combat-capable kinds.
    #[must_use]
    pub const fn is_defensive(self) -> bool {
        matches!(self, TowerKind::Crossbow | TowerKind::Cannon | TowerKind::Minigun)
    }
}

impl fmt::Display for TowerKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

impl Serialize for TowerKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

// The server reports capitalized kinds ("Cannon") while actions carry
// lowercase ones; decoding accepts any casing.
impl<'de> Deserialize<'de> for TowerKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        const VARIANTS: &[&str] = &["crossbow", "cannon", "minigun", "house", "church"];

        let raw = String::deserialize(deserializer)?;
        match raw.to_ascii_lowercase().as_str() {
            "crossbow" => Ok(TowerKind::Crossbow),
            "cannon" => Ok(TowerKind::Cannon),
            "minigun" => Ok(TowerKind::Minigun),
            "house" => Ok(TowerKind::House),
            "church" => Ok(TowerKind::Church),
            other => Err(de::Error::unknown_variant(other, VARIANTS)),
        }
    }
}

/// A tower standing on the board, as reported by the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    /// Column the tower occupies.
    pub x: i32,
    /// Row the tower occupies.
    pub y: i32,
    /// Owning side.
    #[serde(rename = "Team")]
    pub team: Team,
    /// Kind of the tower.
    #[serde(rename = "Type")]
    pub kind: TowerKind,
    /// Lane index the tower guards, when the server assigned one.
    #[serde(rename = "Lane", default)]
    pub lane: Option<i64>,
}

impl Tower {
    /// Board position of the tower.
    #[must_use]
    pub const fn position(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }
}

/// A hired mercenary travelling down a lane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mercenary {
    /// Column the mercenary occupies.
    pub x: i32,
    /// Row the mercenary occupies.
    pub y: i32,
    /// Side that hired the mercenary.
    #[serde(rename = "Team")]
    pub team: Team,
    /// Remaining hit points.
    #[serde(rename = "Health")]
    pub health: i32,
    /// Lane index the mercenary was queued into, when assigned.
    #[serde(rename = "Lane", default)]
    pub lane: Option<i64>,
}

impl Mercenary {
    /// Board position of the mercenary.
    #[must_use]
    pub const fn position(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }
}

/// A demon released by a spawner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Demon {
    /// Column the demon occupies.
    pub x: i32,
    /// Row the demon occupies.
    pub y: i32,
    /// Side the demon fights for.
    #[serde(rename = "Team")]
    pub team: Team,
    /// Remaining hit points.
    #[serde(rename = "Health")]
    pub health: i32,
    /// Lane index the demon travels, when assigned.
    #[serde(rename = "Lane", default)]
    pub lane: Option<i64>,
}

impl Demon {
    /// Board position of the demon.
    #[must_use]
    pub const fn position(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }
}

/// A neutral structure that periodically releases demons at a target side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DemonSpawner {
    /// Column the spawner occupies.
    pub x: i32,
    /// Row the spawner occupies.
    pub y: i32,
    /// Side the released demons attack.
    #[serde(rename = "Target")]
    pub target: Team,
    /// Lane index the spawner feeds, when assigned.
    #[serde(rename = "Lane", default)]
    pub lane: Option<i64>,
    /// Turns until the next release.
    #[serde(rename = "ReloadTime")]
    pub reload_time: i32,
}

impl DemonSpawner {
    /// Board position of the spawner.
    #[must_use]
    pub const fn position(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }
}

/// A team's base structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerBase {
    /// Column the base occupies.
    pub x: i32,
    /// Row the base occupies.
    pub y: i32,
    /// Remaining hit points.
    #[serde(rename = "Health")]
    pub health: i32,
    /// Money as mirrored into the base record by the server.
    #[serde(rename = "Money")]
    pub money: i64,
}

impl PlayerBase {
    /// Board position of the base.
    #[must_use]
    pub const fn position(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }
}

/// Per-team tower prices quoted by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTable {
    /// Price of the light ranged tower.
    #[serde(rename = "Crossbow")]
    pub crossbow: i64,
    /// Price of the area-damage tower.
    #[serde(rename = "Cannon")]
    pub cannon: i64,
    /// Price of the heavy ranged tower.
    #[serde(rename = "Minigun")]
    pub minigun: i64,
    /// Price of the economy tower.
    #[serde(rename = "House")]
    pub house: i64,
    /// Price of the sacred support tower.
    #[serde(rename = "Church")]
    pub church: i64,
}

impl PriceTable {
    /// Price quoted for `kind`.
    #[must_use]
    pub const fn price(&self, kind: TowerKind) -> i64 {
        match kind {
            TowerKind::Crossbow => self.crossbow,
            TowerKind::Cannon => self.cannon,
            TowerKind::Minigun => self.minigun,
            TowerKind::House => self.house,
            TowerKind::Church => self.church,
        }
    }

    /// Cheapest combat-capable kind; price ties keep the lighter tier.
    #[must_use]
    pub fn cheapest_defensive(&self) -> TowerKind {
        let mut cheapest = TowerKind::Crossbow;
        for kind in TowerKind::DEFENSIVE {
            if self.price(kind) < self.price(cheapest) {
                cheapest = kind;
            }
        }
        cheapest
    }
}

/// One turn's decoded board snapshot, read-only to the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Floor-tile labels; `r`/`b` are team build tiles, [`OPEN_LANE_TILE`]
    /// is a lane, anything else is obstacle or empty ground.
    #[serde(rename = "FloorTiles")]
    pub floor_tiles: Vec<Vec<String>>,
    /// Occupancy labels parallel to the floor grid; empty string means free.
    #[serde(rename = "EntityGrid")]
    pub entity_grid: Vec<Vec<String>>,
    /// Every tower currently standing.
    #[serde(rename = "Towers")]
    pub towers: Vec<Tower>,
    /// Every mercenary currently alive.
    #[serde(rename = "Mercenaries", default)]
    pub mercenaries: Vec<Mercenary>,
    /// Every demon currently alive.
    #[serde(rename = "Demons", default)]
    pub demons: Vec<Demon>,
    /// Every demon spawner on the board.
    #[serde(rename = "DemonSpawners", default)]
    pub demon_spawners: Vec<DemonSpawner>,
    /// Red base record.
    #[serde(rename = "PlayerBaseR")]
    pub base_red: PlayerBase,
    /// Blue base record.
    #[serde(rename = "PlayerBaseB")]
    pub base_blue: PlayerBase,
    /// Prices quoted to red.
    #[serde(rename = "TowerPricesR")]
    pub prices_red: PriceTable,
    /// Prices quoted to blue.
    #[serde(rename = "TowerPricesB")]
    pub prices_blue: PriceTable,
    /// Red's spendable money.
    #[serde(rename = "RedTeamMoney")]
    pub money_red: i64,
    /// Blue's spendable money.
    #[serde(rename = "BlueTeamMoney")]
    pub money_blue: i64,
    /// Red's display name.
    #[serde(rename = "TeamNameR", default)]
    pub team_name_red: String,
    /// Blue's display name.
    #[serde(rename = "TeamNameB", default)]
    pub team_name_blue: String,
    /// Current turn number, monotonically increasing across calls.
    #[serde(rename = "CurrentTurn")]
    pub turn: u32,
}

impl GameState {
    /// Number of grid columns, taken from the first floor row.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.floor_tiles.first().map_or(0, Vec::len)
    }

    /// Number of grid rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.floor_tiles.len()
    }
}

/// Structural choices available each turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Place a new tower.
    Build,
    /// Tear down an existing tower.
    Destroy,
    /// Take no structural action.
    Nothing,
}

impl ActionKind {
    /// Lowercase wire label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ActionKind::Build => "build",
            ActionKind::Destroy => "destroy",
            ActionKind::Nothing => "nothing",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// The single action submitted to the server each turn.
///
/// Exactly one structural choice is active per action; the mercenary hire
/// and the provoke flag are independent add-ons. Constructed fresh every
/// turn, serialized, then discarded.
#[derive(Clone, Debug, PartialEq)]
pub struct AIAction {
    /// Structural choice for this turn.
    pub kind: ActionKind,
    /// Target position of the structural choice.
    pub target: GridPos,
    /// Tower to place; set iff `kind` is a build.
    pub tower: Option<TowerKind>,
    /// Lane to hire a mercenary through, when recruiting.
    pub mercenary: Option<Direction>,
    /// Whether to provoke demon spawners this turn.
    pub provoke_demons: bool,
}

impl AIAction {
    /// Builds `tower` at `target`.
    #[must_use]
    pub const fn build(target: GridPos, tower: TowerKind) -> Self {
        Self {
            kind: ActionKind::Build,
            target,
            tower: Some(tower),
            mercenary: None,
            provoke_demons: false,
        }
    }

    /// Tears down whatever stands at `target`.
    #[must_use]
    pub const fn destroy(target: GridPos) -> Self {
        Self {
            kind: ActionKind::Destroy,
            target,
            tower: None,
            mercenary: None,
            provoke_demons: false,
        }
    }

    /// Takes no structural action this turn.
    #[must_use]
    pub const fn nothing() -> Self {
        Self {
            kind: ActionKind::Nothing,
            target: GridPos::new(0, 0),
            tower: None,
            mercenary: None,
            provoke_demons: false,
        }
    }

    /// Attaches an optional mercenary hire to the action.
    #[must_use]
    pub fn with_recruit(mut self, direction: Option<Direction>) -> Self {
        self.mercenary = direction;
        self
    }

    /// Sets the provoke-demons flag.
    #[must_use]
    pub fn with_provoke(mut self, provoke: bool) -> Self {
        self.provoke_demons = provoke;
        self
    }
}

// The server expects absent tower/mercenary choices as empty strings, not
// nulls, so the record is written by hand.
impl Serialize for AIAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut record = serializer.serialize_struct("AIAction", 6)?;
        record.serialize_field("action", self.kind.label())?;
        record.serialize_field("x", &self.target.x)?;
        record.serialize_field("y", &self.target.y)?;
        record.serialize_field("tower_type", self.tower.map_or("", TowerKind::label))?;
        record.serialize_field("merc_direction", self.mercenary.map_or("", Direction::label))?;
        record.serialize_field("provoke_demons", &self.provoke_demons)?;
        record.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn opponent_swaps_sides_and_round_trips() {
        assert_eq!(Team::Red.opponent(), Team::Blue);
        assert_eq!(Team::Blue.opponent(), Team::Red);
        assert_eq!(Team::Red.opponent().opponent(), Team::Red);
    }

    #[test]
    fn cardinal_offsets_match_screen_orientation() {
        assert_eq!(Direction::North.offset(), (0, -1));
        assert_eq!(Direction::South.offset(), (0, 1));
        assert_eq!(Direction::East.offset(), (1, 0));
        assert_eq!(Direction::West.offset(), (-1, 0));
    }

    #[test]
    fn step_applies_the_direction_offset() {
        let origin = GridPos::new(4, 7);
        assert_eq!(origin.step(Direction::North), GridPos::new(4, 6));
        assert_eq!(origin.step(Direction::West), GridPos::new(3, 7));
    }

    #[test]
    fn distance_is_euclidean() {
        let delta = GridPos::new(0, 0).distance(GridPos::new(3, 4));
        assert!((delta - 5.0).abs() < f64::EPSILON, "3-4-5 triangle, got {delta}");
    }

    #[test]
    fn tower_kinds_decode_case_insensitively() {
        let capitalized: TowerKind = serde_json::from_str("\"Cannon\"").expect("decode");
        let lowercase: TowerKind = serde_json::from_str("\"cannon\"").expect("decode");
        let shouted: TowerKind = serde_json::from_str("\"CROSSBOW\"").expect("decode");
        assert_eq!(capitalized, TowerKind::Cannon);
        assert_eq!(lowercase, TowerKind::Cannon);
        assert_eq!(shouted, TowerKind::Crossbow);
        assert!(serde_json::from_str::<TowerKind>("\"ballista\"").is_err());
    }

    #[test]
    fn defensive_kinds_exclude_economy_and_support() {
        for kind in TowerKind::DEFENSIVE {
            assert!(kind.is_defensive(), "{kind} should count as defense");
        }
        assert!(!TowerKind::House.is_defensive());
        assert!(!TowerKind::Church.is_defensive());
    }

    #[test]
    fn cheapest_defensive_prefers_lower_price_and_keeps_ties_light() {
        let mut prices = PriceTable {
            crossbow: 20,
            cannon: 30,
            minigun: 70,
            house: 15,
            church: 40,
        };
        assert_eq!(prices.cheapest_defensive(), TowerKind::Crossbow);

        prices.cannon = 10;
        assert_eq!(prices.cheapest_defensive(), TowerKind::Cannon);

        prices.cannon = 20;
        assert_eq!(
            prices.cheapest_defensive(),
            TowerKind::Crossbow,
            "ties resolve to the earlier tier"
        );
    }

    #[test]
    fn build_action_serializes_with_the_exact_wire_fields() {
        let action = AIAction::build(GridPos::new(5, 3), TowerKind::Cannon)
            .with_recruit(Some(Direction::North));
        let encoded = serde_json::to_value(&action).expect("encode");
        assert_eq!(
            encoded,
            json!({
                "action": "build",
                "x": 5,
                "y": 3,
                "tower_type": "cannon",
                "merc_direction": "N",
                "provoke_demons": false,
            })
        );
    }

    #[test]
    fn idle_action_writes_empty_labels() {
        let encoded = serde_json::to_value(AIAction::nothing()).expect("encode");
        assert_eq!(
            encoded,
            json!({
                "action": "nothing",
                "x": 0,
                "y": 0,
                "tower_type": "",
                "merc_direction": "",
                "provoke_demons": false,
            })
        );
    }

    #[test]
    fn provoke_flag_is_carried_through() {
        let action = AIAction::nothing().with_provoke(true);
        let encoded = serde_json::to_value(&action).expect("encode");
        assert_eq!(encoded["provoke_demons"], json!(true));
    }

    #[test]
    fn game_state_decodes_with_optional_lists_absent() {
        let payload = json!({
            "FloorTiles": [["r", "O"], [".", "b"]],
            "EntityGrid": [["", ""], ["", ""]],
            "Towers": [
                {"x": 0, "y": 0, "Team": "r", "Type": "Crossbow", "Lane": 1}
            ],
            "PlayerBaseR": {"x": 0, "y": 0, "Health": 100, "Money": 40},
            "PlayerBaseB": {"x": 1, "y": 1, "Health": 100, "Money": 55},
            "TowerPricesR": {"Crossbow": 20, "Cannon": 30, "Minigun": 70, "House": 15, "Church": 40},
            "TowerPricesB": {"Crossbow": 20, "Cannon": 30, "Minigun": 70, "House": 15, "Church": 40},
            "RedTeamMoney": 40,
            "BlueTeamMoney": 55,
            "CurrentTurn": 7
        });
        let state: GameState = serde_json::from_value(payload).expect("decode");

        assert_eq!(state.columns(), 2);
        assert_eq!(state.rows(), 2);
        assert_eq!(state.turn, 7);
        assert_eq!(state.towers[0].kind, TowerKind::Crossbow);
        assert_eq!(state.towers[0].lane, Some(1));
        assert!(state.mercenaries.is_empty(), "absent list decodes empty");
        assert!(state.demons.is_empty());
        assert!(state.demon_spawners.is_empty());
        assert!(state.team_name_red.is_empty(), "absent name decodes empty");
        assert_eq!(state.money_blue, 55);
    }

    #[test]
    fn game_state_rejects_payloads_missing_required_fields() {
        let payload = json!({
            "FloorTiles": [["r"]],
            "EntityGrid": [[""]],
            "CurrentTurn": 0
        });
        assert!(serde_json::from_value::<GameState>(payload).is_err());
    }
}
