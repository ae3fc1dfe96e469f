#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Match-lifetime orchestration of the decision engine.
//!
//! An [`Agent`] owns everything that persists between turns: the team
//! identity fixed at the handshake, the tally of builds it has queued, and
//! the injected random source. Each [`Agent::act`] call runs one decision
//! pass over the turn's snapshot and returns the single action record the
//! wire expects. The tally counts emissions, not confirmations, so it may
//! drift above the server's tower list; [`Agent::resync_tally`] is the
//! explicit way back to ground truth and is never taken automatically.

use grimhold_board as board;
use grimhold_core::{AIAction, Direction, GameState, Team};
use grimhold_system_strategy::{
    plan_turn, recruit_direction, RecruitMode, TowerTally, TurnContext, TurnDirective,
};
use rand::Rng;
use tracing::{debug, info};

/// Display name reported to the server unless configured otherwise.
pub const DEFAULT_NAME: &str = "GRIM";

/// Per-match configuration fixed at initialization.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Display name sent during the handshake.
    pub name: String,
    /// How mercenaries are hired.
    pub recruit_mode: RecruitMode,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            recruit_mode: RecruitMode::default(),
        }
    }
}

/// The per-match decision engine.
#[derive(Debug)]
pub struct Agent<R> {
    team: Team,
    config: AgentConfig,
    tally: TowerTally,
    rng: R,
}

impl<R> Agent<R>
where
    R: Rng,
{
    /// Creates an agent for `team` from the opening state.
    ///
    /// Returns the agent together with the display name to report during
    /// the handshake. The tower tally starts at zero.
    #[must_use]
    pub fn initialize(
        state: &GameState,
        team: Team,
        config: AgentConfig,
        rng: R,
    ) -> (Self, String) {
        let name = config.name.clone();
        info!(
            team = %team,
            opponent = board::team_name(state, team.opponent()),
            "joining match"
        );
        let agent = Self {
            team,
            config,
            tally: TowerTally::default(),
            rng,
        };
        (agent, name)
    }

    /// Side this agent plays for.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Builds the agent believes it has queued so far.
    #[must_use]
    pub const fn tally(&self) -> TowerTally {
        self.tally
    }

    /// Decides this turn's action.
    ///
    /// Captures the query-layer context, runs the strategy table, records
    /// any emitted build in the tally, and attaches the uniform recruiting
    /// decision.
    pub fn act(&mut self, state: &GameState) -> AIAction {
        let ctx = TurnContext::capture(state, self.team);
        let plan = plan_turn(&ctx, &self.tally, &mut self.rng);
        let structural = match plan.directive {
            TurnDirective::Build { kind, at } => {
                self.tally.record(kind);
                AIAction::build(at, kind)
            }
            TurnDirective::Stand => AIAction::nothing(),
        };
        let recruit =
            recruit_direction(state, self.team, self.config.recruit_mode, &mut self.rng);
        debug!(
            turn = ctx.turn,
            rule = plan.rule.unwrap_or("fallback"),
            action = structural.kind.label(),
            recruit = recruit.map(Direction::label),
            "turn decided"
        );
        structural.with_recruit(recruit)
    }

    /// Overwrites the tally with confirmed counts from the server's list.
    ///
    /// Extension point for harnesses that want ground-truth counters
    /// between games; the per-turn path never calls it.
    pub fn resync_tally(&mut self, state: &GameState) {
        let mut tally = TowerTally::default();
        for tower in board::owned_towers(state, self.team) {
            tally.record(tower.kind);
        }
        self.tally = tally;
    }
}
