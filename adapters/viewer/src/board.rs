//! Frame drawing: tile grid, occupant markers, and the status strip.

use std::collections::HashMap;

use glam::Vec2;
use grimhold_core::{GameState, Team, TowerKind, OPEN_LANE_TILE};
use macroquad::color::{Color, BLACK, BLUE, DARKGRAY, GRAY, LIGHTGRAY, RED, WHITE};

use crate::config::ViewerConfig;

/// Margin around the board and status strip, in pixels.
const MARGIN: f32 = 12.0;

/// Vertical space reserved under the board for the status strip.
const STATUS_HEIGHT: f32 = 96.0;

/// One drawable marker occupying a board cell.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Glyph {
    /// Large label drawn at the cell centre.
    pub(crate) main: String,
    /// Small annotation under the label, usually remaining health.
    pub(crate) sub: Option<String>,
    /// Tint applied to both labels.
    pub(crate) color: Color,
}

impl Glyph {
    fn lettered(main: &str, color: Color) -> Self {
        Self {
            main: main.to_owned(),
            sub: None,
            color,
        }
    }

    fn annotated(main: &str, sub: String, color: Color) -> Self {
        Self {
            main: main.to_owned(),
            sub: Some(sub),
            color,
        }
    }
}

/// Tint identifying `team` across every overlay.
pub(crate) fn team_color(team: Team) -> Color {
    match team {
        Team::Red => RED,
        Team::Blue => BLUE,
    }
}

/// Fill behind one floor tile, keyed by its label.
pub(crate) fn tile_color(label: &str) -> Color {
    if label == Team::Red.tile_label() {
        RED
    } else if label == Team::Blue.tile_label() {
        BLUE
    } else if label == OPEN_LANE_TILE {
        GRAY
    } else {
        WHITE
    }
}

/// Two-letter abbreviation drawn for a tower of `kind`.
pub(crate) const fn tower_glyph(kind: TowerKind) -> &'static str {
    match kind {
        TowerKind::Crossbow => "Cr",
        TowerKind::Cannon => "Ca",
        TowerKind::Minigun => "Mi",
        TowerKind::House => "Ho",
        TowerKind::Church => "Ch",
    }
}

/// Collects the marker for every occupied cell.
///
/// Insertion order settles contested cells: spawners sit under bases, bases
/// under towers, towers under mercenaries, and demons end up on top.
pub(crate) fn glyphs(state: &GameState) -> HashMap<(i32, i32), Glyph> {
    let mut map = HashMap::new();
    for spawner in &state.demon_spawners {
        let marker = Glyph::lettered("X", team_color(spawner.target));
        let _ = map.insert((spawner.x, spawner.y), marker);
    }
    let red = &state.base_red;
    let blue = &state.base_blue;
    let _ = map.insert((red.x, red.y), Glyph::lettered("B", RED));
    let _ = map.insert((blue.x, blue.y), Glyph::lettered("B", BLUE));
    for tower in &state.towers {
        let marker = Glyph::lettered(tower_glyph(tower.kind), BLACK);
        let _ = map.insert((tower.x, tower.y), marker);
    }
    for mercenary in &state.mercenaries {
        let sub = mercenary.health.to_string();
        let marker = Glyph::annotated("M", sub, team_color(mercenary.team));
        let _ = map.insert((mercenary.x, mercenary.y), marker);
    }
    for demon in &state.demons {
        let sub = demon.health.to_string();
        let marker = Glyph::annotated("D", sub, team_color(demon.team.opponent()));
        let _ = map.insert((demon.x, demon.y), marker);
    }
    map
}

/// The four status lines for `team`: name, base health, funds, and the
/// countdown of the first spawner aimed at it.
pub(crate) fn status_lines(state: &GameState, team: Team) -> [String; 4] {
    let (base, money, name) = match team {
        Team::Red => (&state.base_red, state.money_red, &state.team_name_red),
        Team::Blue => (&state.base_blue, state.money_blue, &state.team_name_blue),
    };
    let countdown = state
        .demon_spawners
        .iter()
        .find(|spawner| spawner.target == team)
        .map_or_else(|| "-".to_owned(), |spawner| spawner.reload_time.to_string());

    [
        name.clone(),
        format!("Health: {}", base.health),
        format!("Money: ${money}"),
        format!("Next Demon: {countdown}"),
    ]
}

/// Draws one decoded turn scaled to the current window: the tile grid, every
/// occupant marker, both status blocks, and the playback note.
pub(crate) fn draw_frame(state: &GameState, config: &ViewerConfig, playback: &str) {
    let columns = state.columns().max(1) as f32;
    let rows = state.rows().max(1) as f32;

    let usable_width = macroquad::window::screen_width() - 2.0 * MARGIN;
    let usable_height = macroquad::window::screen_height() - STATUS_HEIGHT - 2.0 * MARGIN;
    let cell = (usable_width / columns)
        .min(usable_height / rows)
        .min(config.cell_size)
        .max(4.0);
    let origin = Vec2::new(MARGIN, MARGIN);

    for (row, labels) in state.floor_tiles.iter().enumerate() {
        for (column, label) in labels.iter().enumerate() {
            let corner = origin + Vec2::new(column as f32, row as f32) * cell;
            macroquad::shapes::draw_rectangle(corner.x, corner.y, cell, cell, tile_color(label));
            macroquad::shapes::draw_rectangle_lines(corner.x, corner.y, cell, cell, 1.0, LIGHTGRAY);
        }
    }

    let main_size = (cell * 0.6).max(8.0);
    let sub_size = (cell * 0.3).max(6.0);
    for ((x, y), marker) in glyphs(state) {
        let corner = origin + Vec2::new(x as f32, y as f32) * cell;
        let main_centre = corner + Vec2::new(cell * 0.5, cell * 0.4);
        draw_centred(&marker.main, main_centre, main_size, marker.color);
        if let Some(sub) = &marker.sub {
            let sub_centre = corner + Vec2::new(cell * 0.5, cell * 0.8);
            draw_centred(sub, sub_centre, sub_size, marker.color);
        }
    }

    let strip_top = origin.y + rows * cell + MARGIN;
    draw_status(state, Team::Red, Vec2::new(origin.x, strip_top));
    let blue_corner = Vec2::new(origin.x + columns * cell * 0.5, strip_top);
    draw_status(state, Team::Blue, blue_corner);

    let note = format!("Turn {} ({playback})", state.turn);
    let dimensions = macroquad::text::measure_text(&note, None, 16, 1.0);
    macroquad::text::draw_text(
        &note,
        macroquad::window::screen_width() - MARGIN - dimensions.width,
        strip_top + STATUS_HEIGHT - 10.0,
        16.0,
        DARKGRAY,
    );
}

/// Draws the idle screen shown until the first turn arrives on stdin.
pub(crate) fn draw_waiting_banner() {
    let text = "waiting for a match stream on stdin";
    let dimensions = macroquad::text::measure_text(text, None, 24, 1.0);
    macroquad::text::draw_text(
        text,
        (macroquad::window::screen_width() - dimensions.width) * 0.5,
        macroquad::window::screen_height() * 0.5,
        24.0,
        DARKGRAY,
    );
}

fn draw_status(state: &GameState, team: Team, corner: Vec2) {
    let lines = status_lines(state, team);
    macroquad::text::draw_text(&lines[0], corner.x, corner.y + 16.0, 20.0, team_color(team));
    for (index, line) in lines.iter().enumerate().skip(1) {
        let y = corner.y + 16.0 + index as f32 * 18.0;
        macroquad::text::draw_text(line, corner.x, y, 16.0, DARKGRAY);
    }
}

fn draw_centred(text: &str, centre: Vec2, size: f32, color: Color) {
    let dimensions = macroquad::text::measure_text(text, None, size as u16, 1.0);
    let baseline = centre.y - dimensions.height * 0.5 + dimensions.offset_y;
    macroquad::text::draw_text(text, centre.x - dimensions.width * 0.5, baseline, size, color);
}
