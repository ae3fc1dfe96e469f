use grimhold_core::scaffolding::{StateBuilder, FIXTURE_PRICES};
use grimhold_core::{Direction, GameState, GridPos, PriceTable, Team, TowerKind};
use grimhold_system_strategy::{
    plan_turn, recruit_direction, RecruitMode, TowerTally, TurnContext, TurnDirective, TurnPlan,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const FORWARD: GridPos = GridPos::new(7, 5);
const REARWARD: GridPos = GridPos::new(2, 1);

/// A 10x8 board with the red base at (1, 1), the blue base at (8, 6), and
/// three red build tiles strung between them. (7, 5) sits nearest the blue
/// base and (2, 1) farthest from it.
fn battlefield(turn: u32, money: i64) -> StateBuilder {
    StateBuilder::new(10, 8)
        .with_team_tile(Team::Red, 2, 1)
        .with_team_tile(Team::Red, 5, 3)
        .with_team_tile(Team::Red, 7, 5)
        .with_turn(turn)
        .with_money(Team::Red, money)
}

fn red_plan(state: &GameState, tally: &TowerTally, seed: u64) -> TurnPlan {
    let ctx = TurnContext::capture(state, Team::Red);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    plan_turn(&ctx, tally, &mut rng)
}

fn build_of(plan: &TurnPlan) -> (TowerKind, GridPos) {
    match plan.directive {
        TurnDirective::Build { kind, at } => (kind, at),
        TurnDirective::Stand => panic!("expected a build, got a stand ({:?})", plan.rule),
    }
}

fn ready_tally() -> TowerTally {
    TowerTally {
        cannons: 3,
        crossbows: 2,
        churches: 2,
        ..TowerTally::default()
    }
}

#[test]
fn stands_down_at_the_money_floor() {
    for money in [0, 5, 10] {
        let state = battlefield(1, money).finish();
        let plan = red_plan(&state, &TowerTally::default(), 0);
        assert_eq!(plan.directive, TurnDirective::Stand, "money {money}");
        assert_eq!(plan.rule, None, "money {money}");
    }
}

#[test]
fn builds_once_money_clears_the_floor() {
    let state = battlefield(1, 11).finish();
    let plan = red_plan(&state, &TowerTally::default(), 0);
    assert_eq!(build_of(&plan), (TowerKind::House, REARWARD));
    assert_eq!(plan.rule, Some("opening_houses"));
}

#[test]
fn opening_turns_grow_houses_rearward() {
    for turn in [0, 3, 5] {
        let state = battlefield(turn, 100).finish();
        let plan = red_plan(&state, &TowerTally::default(), 0);
        assert_eq!(build_of(&plan), (TowerKind::House, REARWARD), "turn {turn}");
        assert_eq!(plan.rule, Some("opening_houses"), "turn {turn}");
    }
}

#[test]
fn contested_sixth_turn_answers_with_crossbow() {
    let state = battlefield(6, 100)
        .with_mercenary(Team::Blue, None)
        .with_mercenary(Team::Blue, None)
        .finish();
    let plan = red_plan(&state, &TowerTally::default(), 0);
    assert_eq!(build_of(&plan), (TowerKind::Crossbow, FORWARD));
    assert_eq!(plan.rule, Some("contested_sixth_turn"));
}

#[test]
fn quiet_sixth_turn_keeps_growing() {
    let state = battlefield(6, 100).with_mercenary(Team::Blue, None).finish();
    let plan = red_plan(&state, &TowerTally::default(), 0);
    assert_eq!(build_of(&plan), (TowerKind::House, REARWARD));
    assert_eq!(plan.rule, Some("sixth_turn_house"));
}

#[test]
fn first_defense_goes_up_by_turn_seven() {
    for turn in [7, 10] {
        let state = battlefield(turn, 100).finish();
        let plan = red_plan(&state, &TowerTally::default(), 0);
        assert_eq!(
            build_of(&plan),
            (TowerKind::Crossbow, FORWARD),
            "turn {turn}"
        );
        assert_eq!(plan.rule, Some("first_defense"), "turn {turn}");
    }
}

#[test]
fn early_pressure_brings_a_cannon() {
    let state = battlefield(8, 100)
        .with_tower(Team::Red, TowerKind::Crossbow, 3, 2)
        .with_mercenary(Team::Blue, None)
        .with_mercenary(Team::Blue, None)
        .with_mercenary(Team::Blue, None)
        .finish();
    let plan = red_plan(&state, &TowerTally::default(), 0);
    assert_eq!(build_of(&plan), (TowerKind::Cannon, FORWARD));
    assert_eq!(plan.rule, Some("early_pressure_cannon"));
}

#[test]
fn defended_early_turns_keep_growing() {
    let state = battlefield(9, 100)
        .with_tower(Team::Red, TowerKind::Crossbow, 3, 2)
        .finish();
    let plan = red_plan(&state, &TowerTally::default(), 0);
    assert_eq!(build_of(&plan), (TowerKind::House, REARWARD));
    assert_eq!(plan.rule, Some("early_house_growth"));
}

#[test]
fn midgame_restores_the_defense_floor() {
    let state = battlefield(15, 100)
        .with_tower(Team::Red, TowerKind::Crossbow, 3, 2)
        .with_tower(Team::Red, TowerKind::Cannon, 4, 2)
        .finish();
    let plan = red_plan(&state, &TowerTally::default(), 0);
    assert_eq!(build_of(&plan), (TowerKind::Cannon, FORWARD));
    assert_eq!(plan.rule, Some("defense_floor_cannon"));
}

fn defended_battlefield(turn: u32, money: i64) -> StateBuilder {
    battlefield(turn, money)
        .with_tower(Team::Red, TowerKind::Crossbow, 3, 2)
        .with_tower(Team::Red, TowerKind::Cannon, 4, 2)
        .with_tower(Team::Red, TowerKind::Cannon, 6, 4)
}

#[test]
fn midgame_expands_houses_to_ten() {
    let state = defended_battlefield(15, 100)
        .with_mercenary(Team::Blue, None)
        .with_mercenary(Team::Blue, None)
        .finish();
    let tally = TowerTally {
        houses: 9,
        ..TowerTally::default()
    };
    let plan = red_plan(&state, &tally, 0);
    assert_eq!(build_of(&plan), (TowerKind::House, REARWARD));
    assert_eq!(plan.rule, Some("house_expansion"));
}

#[test]
fn midgame_pressure_overrides_house_expansion() {
    let state = defended_battlefield(15, 100)
        .with_mercenary(Team::Blue, None)
        .with_mercenary(Team::Blue, None)
        .with_mercenary(Team::Blue, None)
        .finish();
    let tally = TowerTally {
        houses: 9,
        ..TowerTally::default()
    };
    let plan = red_plan(&state, &tally, 0);
    assert_eq!(build_of(&plan), (TowerKind::Cannon, FORWARD));
    assert_eq!(plan.rule, Some("midgame_pressure_cannon"));
}

#[test]
fn established_midgame_founds_a_church() {
    let state = defended_battlefield(15, 100).finish();
    let tally = TowerTally {
        houses: 10,
        ..TowerTally::default()
    };
    for seed in 0..8 {
        let plan = red_plan(&state, &tally, seed);
        let (kind, at) = build_of(&plan);
        assert_eq!(kind, TowerKind::Church, "seed {seed}");
        assert!(
            [REARWARD, GridPos::new(5, 3), FORWARD].contains(&at),
            "seed {seed} picked {at} outside the legal set"
        );
        assert_eq!(plan.rule, Some("first_church"), "seed {seed}");
    }
}

#[test]
fn church_precedes_the_spending_ladder() {
    // Deep pockets would afford a minigun, but a settled economy founds
    // its church first.
    let state = defended_battlefield(15, 1000).finish();
    let tally = TowerTally {
        houses: 10,
        ..TowerTally::default()
    };
    let plan = red_plan(&state, &tally, 0);
    let (kind, _) = build_of(&plan);
    assert_eq!(kind, TowerKind::Church);
    assert_eq!(plan.rule, Some("first_church"));
}

#[test]
fn late_pressure_brings_a_cannon() {
    let state = battlefield(25, 100)
        .with_mercenary(Team::Blue, None)
        .with_mercenary(Team::Blue, None)
        .with_mercenary(Team::Blue, None)
        .finish();
    let plan = red_plan(&state, &TowerTally::default(), 0);
    assert_eq!(build_of(&plan), (TowerKind::Cannon, FORWARD));
    assert_eq!(plan.rule, Some("late_pressure_cannon"));
}

#[test]
fn late_game_completes_the_crossbow_pair() {
    for crossbows in [0, 1] {
        let state = battlefield(25, 100).finish();
        let tally = TowerTally {
            crossbows,
            ..TowerTally::default()
        };
        let plan = red_plan(&state, &tally, 0);
        assert_eq!(
            build_of(&plan),
            (TowerKind::Crossbow, FORWARD),
            "crossbows {crossbows}"
        );
        assert_eq!(plan.rule, Some("crossbow_pair"), "crossbows {crossbows}");
    }
}

#[test]
fn late_game_founds_the_second_church() {
    let state = battlefield(25, 100).finish();
    let tally = TowerTally {
        crossbows: 2,
        cannons: 3,
        churches: 1,
        ..TowerTally::default()
    };
    let plan = red_plan(&state, &tally, 0);
    let (kind, at) = build_of(&plan);
    assert_eq!(kind, TowerKind::Church);
    assert!([REARWARD, GridPos::new(5, 3), FORWARD].contains(&at));
    assert_eq!(plan.rule, Some("second_church"));
}

#[test]
fn churched_surplus_buys_a_minigun() {
    let state = battlefield(25, 51).finish();
    let tally = TowerTally {
        crossbows: 2,
        churches: 2,
        ..TowerTally::default()
    };
    let plan = red_plan(&state, &tally, 0);
    assert_eq!(build_of(&plan), (TowerKind::Minigun, FORWARD));
    assert_eq!(plan.rule, Some("minigun_splurge"));
}

#[test]
fn churched_budget_buys_the_cheapest_defense() {
    // At exactly 50 the splurge does not trigger.
    let state = battlefield(25, 50).finish();
    let tally = TowerTally {
        crossbows: 2,
        churches: 2,
        ..TowerTally::default()
    };
    let plan = red_plan(&state, &tally, 0);
    assert_eq!(build_of(&plan), (TowerKind::Crossbow, FORWARD));
    assert_eq!(plan.rule, Some("cheapest_defense"));
}

#[test]
fn cheapest_defense_follows_the_quoted_prices() {
    let discounted = PriceTable {
        cannon: 12,
        ..FIXTURE_PRICES
    };
    let state = battlefield(25, 50)
        .with_prices(Team::Red, discounted)
        .finish();
    let tally = TowerTally {
        crossbows: 2,
        churches: 2,
        ..TowerTally::default()
    };
    let plan = red_plan(&state, &tally, 0);
    assert_eq!(build_of(&plan), (TowerKind::Cannon, FORWARD));
    assert_eq!(plan.rule, Some("cheapest_defense"));
}

#[test]
fn unmatched_late_game_stands_down() {
    // Crossbows done, cannons short of three, churches short of two: no
    // late-game rule covers this corner.
    let state = battlefield(25, 40).finish();
    let tally = TowerTally {
        crossbows: 2,
        cannons: 2,
        churches: 1,
        ..TowerTally::default()
    };
    let plan = red_plan(&state, &tally, 0);
    assert_eq!(plan.directive, TurnDirective::Stand);
    assert_eq!(plan.rule, None);
}

#[test]
fn endgame_begins_after_turn_thirty() {
    let late = battlefield(30, 100).finish();
    let late_plan = red_plan(&late, &TowerTally::default(), 0);
    assert_eq!(late_plan.rule, Some("crossbow_pair"));

    let endgame = battlefield(31, 100).finish();
    let endgame_plan = red_plan(&endgame, &TowerTally::default(), 0);
    assert_eq!(build_of(&endgame_plan), (TowerKind::Cannon, FORWARD));
    assert_eq!(endgame_plan.rule, Some("endgame_cannon_catchup"));
}

#[test]
fn endgame_catchup_overshoots_cannons_to_four() {
    // Three cannons already meet the readiness bar, but with churches
    // missing the catch-up pass still queues a fourth.
    let state = battlefield(35, 100).finish();
    let tally = TowerTally {
        cannons: 3,
        crossbows: 2,
        ..TowerTally::default()
    };
    let plan = red_plan(&state, &tally, 0);
    assert_eq!(build_of(&plan), (TowerKind::Cannon, FORWARD));
    assert_eq!(plan.rule, Some("endgame_cannon_catchup"));
}

#[test]
fn endgame_catchup_founds_churches() {
    let state = battlefield(35, 100).finish();
    let tally = TowerTally {
        cannons: 4,
        crossbows: 2,
        churches: 1,
        ..TowerTally::default()
    };
    let plan = red_plan(&state, &tally, 0);
    let (kind, at) = build_of(&plan);
    assert_eq!(kind, TowerKind::Church);
    assert!([REARWARD, GridPos::new(5, 3), FORWARD].contains(&at));
    assert_eq!(plan.rule, Some("endgame_church_catchup"));
}

#[test]
fn endgame_catchup_adds_crossbows() {
    let state = battlefield(35, 100).finish();
    let tally = TowerTally {
        cannons: 4,
        churches: 3,
        crossbows: 1,
        ..TowerTally::default()
    };
    let plan = red_plan(&state, &tally, 0);
    assert_eq!(build_of(&plan), (TowerKind::Crossbow, FORWARD));
    assert_eq!(plan.rule, Some("endgame_crossbow_catchup"));
}

#[test]
fn demon_wave_gets_a_crossbow_escort() {
    let mut builder = battlefield(35, 100);
    for _ in 0..5 {
        builder = builder.with_demon(Team::Red);
    }
    let state = builder.finish();
    let plan = red_plan(&state, &ready_tally(), 0);
    assert_eq!(build_of(&plan), (TowerKind::Crossbow, FORWARD));
    assert_eq!(plan.rule, Some("demon_escort_crossbow"));
}

#[test]
fn endgame_pressure_brings_a_cannon() {
    let mut builder = battlefield(35, 100)
        .with_mercenary(Team::Blue, None)
        .with_mercenary(Team::Blue, None)
        .with_mercenary(Team::Blue, None);
    for _ in 0..4 {
        builder = builder.with_demon(Team::Red);
    }
    let state = builder.finish();
    let plan = red_plan(&state, &ready_tally(), 0);
    assert_eq!(build_of(&plan), (TowerKind::Cannon, FORWARD));
    assert_eq!(plan.rule, Some("endgame_pressure_cannon"));
}

#[test]
fn endgame_surplus_buys_a_minigun() {
    let flush = battlefield(35, 50).finish();
    let flush_plan = red_plan(&flush, &ready_tally(), 0);
    assert_eq!(build_of(&flush_plan), (TowerKind::Minigun, FORWARD));
    assert_eq!(flush_plan.rule, Some("endgame_minigun"));

    let broke = battlefield(35, 49).finish();
    let broke_plan = red_plan(&broke, &ready_tally(), 0);
    assert_eq!(broke_plan.directive, TurnDirective::Stand);
    assert_eq!(broke_plan.rule, None);
}

#[test]
fn build_orders_degrade_without_tiles() {
    let state = StateBuilder::new(10, 8)
        .with_turn(3)
        .with_money(Team::Red, 100)
        .finish();
    let plan = red_plan(&state, &TowerTally::default(), 0);
    assert_eq!(plan.directive, TurnDirective::Stand);
    assert_eq!(plan.rule, Some("opening_houses"));
}

#[test]
fn random_site_orders_degrade_without_tiles() {
    let state = StateBuilder::new(10, 8)
        .with_turn(35)
        .with_money(Team::Red, 100)
        .finish();
    let tally = TowerTally {
        cannons: 4,
        ..TowerTally::default()
    };
    let plan = red_plan(&state, &tally, 0);
    assert_eq!(plan.directive, TurnDirective::Stand);
    assert_eq!(plan.rule, Some("endgame_church_catchup"));
}

#[test]
fn context_capture_orients_the_board() {
    let state = defended_battlefield(12, 64)
        .with_mercenary(Team::Blue, None)
        .with_mercenary(Team::Red, None)
        .with_demon(Team::Red)
        .finish();
    let ctx = TurnContext::capture(&state, Team::Red);

    assert_eq!(ctx.turn, 12);
    assert_eq!(ctx.money, 64);
    assert_eq!(
        ctx.build_spaces,
        vec![REARWARD, GridPos::new(5, 3), FORWARD]
    );
    assert_eq!(ctx.forward, Some(FORWARD));
    assert_eq!(ctx.rearward, Some(REARWARD));
    assert_eq!(ctx.defensive_towers, 3);
    assert_eq!(ctx.enemy_mercenaries, 1);
    assert_eq!(ctx.own_demons, 1);
    assert_eq!(ctx.prices.crossbow, FIXTURE_PRICES.crossbow);
}

#[test]
fn recruiting_disabled_mode_never_hires() {
    let state = battlefield(5, 100).with_open_lane(1, 0).finish();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let lane = recruit_direction(&state, Team::Red, RecruitMode::Disabled, &mut rng);
    assert_eq!(lane, None);
}

#[test]
fn recruiting_respects_the_money_floor() {
    let gated = battlefield(5, 10).with_open_lane(1, 0).finish();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert_eq!(
        recruit_direction(&gated, Team::Red, RecruitMode::BestLane, &mut rng),
        None
    );

    let funded = battlefield(5, 11).with_open_lane(1, 0).finish();
    assert_eq!(
        recruit_direction(&funded, Team::Red, RecruitMode::BestLane, &mut rng),
        Some(Direction::North)
    );
}

#[test]
fn recruiting_needs_an_open_lane() {
    let state = battlefield(5, 100).finish();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let lane = recruit_direction(&state, Team::Red, RecruitMode::BestLane, &mut rng);
    assert_eq!(lane, None);
}

#[test]
fn recruiting_follows_spawner_pressure() {
    // Lanes north and south of the base sort to indexes 0 and 1; a spawner
    // on lane 1 outweighs the jitter on every seed.
    for seed in 0..16 {
        let state = StateBuilder::new(10, 8)
            .with_open_lane(1, 0)
            .with_open_lane(1, 2)
            .with_spawner(Team::Blue, Some(1))
            .with_money(Team::Red, 100)
            .finish();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let lane = recruit_direction(&state, Team::Red, RecruitMode::BestLane, &mut rng);
        assert_eq!(lane, Some(Direction::South), "seed {seed}");
    }
}
