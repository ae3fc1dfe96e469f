#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn strategy state machine driving tower construction.
//!
//! The policy is an ordered table of guarded rules, one band of turn numbers
//! at a time: open on economy, answer early pressure with cheap defense,
//! grow into cannons and churches through the midgame, and top up toward the
//! endgame tower mix before spending surplus money on miniguns. The first
//! rule whose guard holds orders a construction; an absolute money floor
//! gates the whole table. Mercenary recruiting is decided independently by
//! [`recruit_direction`] so that hiring stays orthogonal to building.

use grimhold_board as board;
use grimhold_core::{Direction, GameState, GridPos, PriceTable, Team, TowerKind};
use rand::Rng;

/// Money at or below which the engine neither builds nor recruits.
pub const MONEY_FLOOR: i64 = 10;

const LATE_MINIGUN_FUNDS: i64 = 50;

/// Per-turn inputs of the rule table, captured once from a snapshot.
#[derive(Clone, Debug)]
pub struct TurnContext {
    /// Current turn number.
    pub turn: u32,
    /// Spendable money this turn.
    pub money: i64,
    /// Every legal build position, in row-major scan order.
    pub build_spaces: Vec<GridPos>,
    /// Legal build position nearest the enemy base, when any exists.
    pub forward: Option<GridPos>,
    /// Legal build position farthest from the enemy base, when any exists.
    pub rearward: Option<GridPos>,
    /// Combat towers owned per the server's tower list.
    pub defensive_towers: usize,
    /// Opposing mercenaries on the board.
    pub enemy_mercenaries: usize,
    /// Demons fighting on our side.
    pub own_demons: usize,
    /// Prices quoted to us this turn.
    pub prices: PriceTable,
}

impl TurnContext {
    /// Captures the rule table's inputs for `team` from this turn's state.
    #[must_use]
    pub fn capture(state: &GameState, team: Team) -> Self {
        let build_spaces = board::legal_build_spaces(state, team);
        let enemy_base = board::enemy_base_position(state, team);
        let ordered = board::order_by_distance(enemy_base, &build_spaces);
        Self {
            turn: state.turn,
            money: board::money(state, team),
            forward: ordered.first().copied(),
            rearward: ordered.last().copied(),
            build_spaces,
            defensive_towers: board::defensive_tower_count(state, team),
            enemy_mercenaries: board::enemy_mercenary_count(state, team),
            own_demons: board::own_demon_count(state, team),
            prices: *board::prices(state, team),
        }
    }
}

/// Builds the policy believes it has queued so far this match.
///
/// Incremented when a build action is emitted and never reconciled against
/// the server's tower list, so the counts drift above ground truth when the
/// server rejects or loses a tower. That drift is part of the policy's
/// observable behavior and is kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TowerTally {
    /// Houses queued.
    pub houses: u32,
    /// Crossbows queued.
    pub crossbows: u32,
    /// Cannons queued.
    pub cannons: u32,
    /// Miniguns queued.
    pub miniguns: u32,
    /// Churches queued.
    pub churches: u32,
}

impl TowerTally {
    /// Records one emitted build of `kind`.
    pub fn record(&mut self, kind: TowerKind) {
        match kind {
            TowerKind::Crossbow => self.crossbows += 1,
            TowerKind::Cannon => self.cannons += 1,
            TowerKind::Minigun => self.miniguns += 1,
            TowerKind::House => self.houses += 1,
            TowerKind::Church => self.churches += 1,
        }
    }

    /// Count recorded for `kind`.
    #[must_use]
    pub const fn count(&self, kind: TowerKind) -> u32 {
        match kind {
            TowerKind::Crossbow => self.crossbows,
            TowerKind::Cannon => self.cannons,
            TowerKind::Minigun => self.miniguns,
            TowerKind::House => self.houses,
            TowerKind::Church => self.churches,
        }
    }
}

/// Where a rule wants its tower placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Site {
    /// The legal tile nearest the enemy base.
    Forward,
    /// The legal tile farthest from the enemy base.
    Rearward,
    /// A uniformly random legal tile.
    Anywhere,
}

/// A rule's chosen tower kind and placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Construction {
    kind: TowerKind,
    site: Site,
}

impl Construction {
    const fn forward(kind: TowerKind) -> Self {
        Self {
            kind,
            site: Site::Forward,
        }
    }

    const fn rearward(kind: TowerKind) -> Self {
        Self {
            kind,
            site: Site::Rearward,
        }
    }

    const fn anywhere(kind: TowerKind) -> Self {
        Self {
            kind,
            site: Site::Anywhere,
        }
    }
}

/// One prioritized rule: a guard plus the construction it orders.
struct Rule {
    name: &'static str,
    applies: fn(&TurnContext, &TowerTally) -> bool,
    order: fn(&TurnContext, &TowerTally) -> Construction,
}

fn church_condition(ctx: &TurnContext, tally: &TowerTally) -> bool {
    tally.houses >= 10 && ctx.defensive_towers >= 3 && ctx.enemy_mercenaries <= 2
}

fn endgame_ready(tally: &TowerTally) -> bool {
    tally.cannons >= 3 && tally.crossbows >= 2 && tally.churches >= 2
}

// Guards restate their turn band, so shadowing only happens inside a band
// and each entry stays testable on its own. Order within a band matters.
const RULES: &[Rule] = &[
    Rule {
        name: "opening_houses",
        applies: |ctx, _| ctx.turn < 6,
        order: |_, _| Construction::rearward(TowerKind::House),
    },
    Rule {
        name: "contested_sixth_turn",
        applies: |ctx, _| ctx.turn == 6 && ctx.enemy_mercenaries >= 2,
        order: |_, _| Construction::forward(TowerKind::Crossbow),
    },
    Rule {
        name: "sixth_turn_house",
        applies: |ctx, _| ctx.turn == 6,
        order: |_, _| Construction::rearward(TowerKind::House),
    },
    Rule {
        name: "first_defense",
        applies: |ctx, _| (7..=10).contains(&ctx.turn) && ctx.defensive_towers == 0,
        order: |_, _| Construction::forward(TowerKind::Crossbow),
    },
    Rule {
        name: "early_pressure_cannon",
        applies: |ctx, _| (7..=10).contains(&ctx.turn) && ctx.enemy_mercenaries >= 3,
        order: |_, _| Construction::forward(TowerKind::Cannon),
    },
    Rule {
        name: "early_house_growth",
        applies: |ctx, _| (7..=10).contains(&ctx.turn),
        order: |_, _| Construction::rearward(TowerKind::House),
    },
    Rule {
        name: "defense_floor_cannon",
        applies: |ctx, _| (11..=20).contains(&ctx.turn) && ctx.defensive_towers < 3,
        order: |_, _| Construction::forward(TowerKind::Cannon),
    },
    Rule {
        name: "house_expansion",
        applies: |ctx, tally| {
            (11..=20).contains(&ctx.turn) && tally.houses < 10 && ctx.enemy_mercenaries < 3
        },
        order: |_, _| Construction::rearward(TowerKind::House),
    },
    Rule {
        name: "midgame_pressure_cannon",
        applies: |ctx, _| (11..=20).contains(&ctx.turn) && ctx.enemy_mercenaries >= 3,
        order: |_, _| Construction::forward(TowerKind::Cannon),
    },
    Rule {
        name: "first_church",
        applies: |ctx, tally| (11..=20).contains(&ctx.turn) && church_condition(ctx, tally),
        order: |_, _| Construction::anywhere(TowerKind::Church),
    },
    Rule {
        name: "afford_minigun",
        applies: |ctx, _| (11..=20).contains(&ctx.turn) && ctx.money >= ctx.prices.minigun,
        order: |_, _| Construction::forward(TowerKind::Minigun),
    },
    Rule {
        name: "afford_cannon",
        applies: |ctx, _| (11..=20).contains(&ctx.turn) && ctx.money >= ctx.prices.cannon,
        order: |_, _| Construction::forward(TowerKind::Cannon),
    },
    Rule {
        name: "budget_crossbow",
        applies: |ctx, _| (11..=20).contains(&ctx.turn),
        order: |_, _| Construction::forward(TowerKind::Crossbow),
    },
    Rule {
        name: "late_pressure_cannon",
        applies: |ctx, _| (21..=30).contains(&ctx.turn) && ctx.enemy_mercenaries >= 3,
        order: |_, _| Construction::forward(TowerKind::Cannon),
    },
    Rule {
        name: "crossbow_pair",
        applies: |ctx, tally| (21..=30).contains(&ctx.turn) && tally.crossbows < 2,
        order: |_, _| Construction::forward(TowerKind::Crossbow),
    },
    Rule {
        name: "second_church",
        applies: |ctx, tally| {
            (21..=30).contains(&ctx.turn)
                && tally.crossbows == 2
                && tally.cannons == 3
                && tally.churches < 2
        },
        order: |_, _| Construction::anywhere(TowerKind::Church),
    },
    Rule {
        name: "minigun_splurge",
        applies: |ctx, tally| {
            (21..=30).contains(&ctx.turn) && tally.churches >= 2 && ctx.money > LATE_MINIGUN_FUNDS
        },
        order: |_, _| Construction::forward(TowerKind::Minigun),
    },
    Rule {
        name: "cheapest_defense",
        applies: |ctx, tally| (21..=30).contains(&ctx.turn) && tally.churches >= 2,
        order: |ctx, _| Construction::forward(ctx.prices.cheapest_defensive()),
    },
    Rule {
        name: "endgame_cannon_catchup",
        applies: |ctx, tally| ctx.turn > 30 && !endgame_ready(tally) && tally.cannons <= 3,
        order: |_, _| Construction::forward(TowerKind::Cannon),
    },
    Rule {
        name: "endgame_church_catchup",
        applies: |ctx, tally| ctx.turn > 30 && !endgame_ready(tally) && tally.churches <= 2,
        order: |_, _| Construction::anywhere(TowerKind::Church),
    },
    Rule {
        name: "endgame_crossbow_catchup",
        applies: |ctx, tally| ctx.turn > 30 && !endgame_ready(tally) && tally.crossbows <= 2,
        order: |_, _| Construction::forward(TowerKind::Crossbow),
    },
    Rule {
        name: "demon_escort_crossbow",
        applies: |ctx, tally| ctx.turn > 30 && endgame_ready(tally) && ctx.own_demons >= 5,
        order: |_, _| Construction::forward(TowerKind::Crossbow),
    },
    Rule {
        name: "endgame_pressure_cannon",
        applies: |ctx, tally| ctx.turn > 30 && endgame_ready(tally) && ctx.enemy_mercenaries >= 3,
        order: |_, _| Construction::forward(TowerKind::Cannon),
    },
    Rule {
        name: "endgame_minigun",
        applies: |ctx, tally| {
            ctx.turn > 30 && endgame_ready(tally) && ctx.money >= LATE_MINIGUN_FUNDS
        },
        order: |_, _| Construction::forward(TowerKind::Minigun),
    },
];

/// Outcome of one strategy evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnDirective {
    /// Queue a build of `kind` at `at`.
    Build {
        /// Tower kind to queue.
        kind: TowerKind,
        /// Board position to build on.
        at: GridPos,
    },
    /// Take no structural action.
    Stand,
}

/// A resolved strategy decision plus its diagnostic rule name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnPlan {
    /// What to do this turn.
    pub directive: TurnDirective,
    /// Name of the rule that fired; `None` for the money gate and the
    /// no-rule fallback.
    pub rule: Option<&'static str>,
}

/// Evaluates the rule table against this turn's context.
///
/// The money floor gates everything. After it, the first rule whose guard
/// holds orders a construction whose site resolves against the legal build
/// set; a build that cannot be placed because that set is empty degrades to
/// [`TurnDirective::Stand`], keeping the rule name for diagnostics. When no
/// rule fires the plan is a plain stand, which callers pair with the
/// recruiting decision to form the fallback mercenary-only turn.
#[must_use]
pub fn plan_turn<R>(ctx: &TurnContext, tally: &TowerTally, rng: &mut R) -> TurnPlan
where
    R: Rng + ?Sized,
{
    if ctx.money <= MONEY_FLOOR {
        return TurnPlan {
            directive: TurnDirective::Stand,
            rule: None,
        };
    }

    for rule in RULES {
        if !(rule.applies)(ctx, tally) {
            continue;
        }
        let construction = (rule.order)(ctx, tally);
        let target = match construction.site {
            Site::Forward => ctx.forward,
            Site::Rearward => ctx.rearward,
            Site::Anywhere => random_space(ctx, rng),
        };
        let directive = match target {
            Some(at) => TurnDirective::Build {
                kind: construction.kind,
                at,
            },
            None => TurnDirective::Stand,
        };
        return TurnPlan {
            directive,
            rule: Some(rule.name),
        };
    }

    TurnPlan {
        directive: TurnDirective::Stand,
        rule: None,
    }
}

fn random_space<R>(ctx: &TurnContext, rng: &mut R) -> Option<GridPos>
where
    R: Rng + ?Sized,
{
    if ctx.build_spaces.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..ctx.build_spaces.len());
    Some(ctx.build_spaces[index])
}

/// Selects whether and how mercenaries are hired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecruitMode {
    /// Hire into the best-scoring lane whenever funds and lanes allow.
    #[default]
    BestLane,
    /// Never hire; the structural policy runs alone.
    Disabled,
}

/// The uniform per-turn mercenary decision.
///
/// Returns `None` when recruiting is disabled, money sits at or below
/// [`MONEY_FLOOR`], or no lane is legal; otherwise the best-scoring lane.
/// Every strategy branch attaches this same decision, so hiring never
/// depends on which structural rule fired.
#[must_use]
pub fn recruit_direction<R>(
    state: &GameState,
    team: Team,
    mode: RecruitMode,
    rng: &mut R,
) -> Option<Direction>
where
    R: Rng + ?Sized,
{
    if mode == RecruitMode::Disabled {
        return None;
    }
    if board::money(state, team) <= MONEY_FLOOR {
        return None;
    }
    if board::legal_mercenary_lanes(state, team).is_empty() {
        return None;
    }
    grimhold_system_lane_scoring::choose_best_lane(state, team, rng)
}
