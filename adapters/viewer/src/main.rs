#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spectator window that replays a match stream from standard input.
//!
//! Pipe a live server feed or a saved transcript in (`grimhold-viewer <
//! match.log`) and step through the decoded turns with the keyboard, or let
//! autoplay walk the history at a fixed cadence. Logs go to stderr; stdin
//! belongs to the wire.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the dependency is declared without its default features.
//! The window has no sound to play anyway.

mod board;
mod config;

use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use clap::Parser;
use grimhold_core::GameState;
use grimhold_protocol::StateStream;
use macroquad::input::{is_key_pressed, KeyCode};
use tracing::{info, warn};

use crate::config::ViewerConfig;

/// Command-line options of the spectator window.
#[derive(Debug, Parser)]
#[command(name = "grimhold-viewer", about = "Replays a match stream from stdin")]
struct Options {
    /// TOML file overriding the window and playback settings.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Start with autoplay on instead of waiting for keyboard input.
    #[arg(long)]
    autoplay: bool,
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` closes the window.
    quit_requested: bool,
    /// `Space` or `Right` steps one turn forward.
    step_forward: bool,
    /// `Left` steps one turn back.
    step_back: bool,
    /// `A` toggles autoplay.
    toggle_autoplay: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let step_forward = is_key_pressed(KeyCode::Space) || is_key_pressed(KeyCode::Right);
        let step_back = is_key_pressed(KeyCode::Left);
        let toggle_autoplay = is_key_pressed(KeyCode::A);

        Self {
            quit_requested,
            step_forward,
            step_back,
            toggle_autoplay,
        }
    }
}

/// Forwards every turn decoded from stdin to the render loop.
///
/// Greetings and frame sentinels are framing noise here; the stream yields
/// the states between them and ends on the first undecodable frame or EOF.
fn feed_states(sender: &Sender<GameState>) {
    let stream = StateStream::new(BufReader::new(io::stdin()));
    for state in stream {
        match state {
            Ok(state) => {
                if sender.send(state).is_err() {
                    return;
                }
            }
            Err(error) => {
                warn!(%error, "stopping on an undecodable frame");
                return;
            }
        }
    }
    info!("match stream ended");
}

/// Owns the turn history and redraws the selected frame until the window
/// closes.
async fn render_loop(receiver: Receiver<GameState>, config: ViewerConfig, start_autoplay: bool) {
    let mut history: Vec<GameState> = Vec::new();
    let mut cursor: usize = 0;
    let mut autoplay = start_autoplay;
    let mut autoplay_clock = 0.0_f32;

    loop {
        let keyboard = KeyboardShortcuts::poll();
        if keyboard.quit_requested {
            break;
        }
        if keyboard.toggle_autoplay {
            autoplay = !autoplay;
        }

        while let Ok(state) = receiver.try_recv() {
            history.push(state);
        }

        if autoplay {
            autoplay_clock += macroquad::time::get_frame_time();
            if autoplay_clock >= config.autoplay_delay {
                autoplay_clock = 0.0;
                if cursor + 1 < history.len() {
                    cursor += 1;
                }
            }
        }
        if keyboard.step_forward && cursor + 1 < history.len() {
            cursor += 1;
        }
        if keyboard.step_back {
            cursor = cursor.saturating_sub(1);
        }

        macroquad::window::clear_background(macroquad::color::WHITE);
        if let Some(state) = history.get(cursor) {
            let playback = if autoplay {
                format!("frame {} of {}, autoplay", cursor + 1, history.len())
            } else {
                format!("frame {} of {}", cursor + 1, history.len())
            };
            board::draw_frame(state, &config, &playback);
        } else {
            board::draw_waiting_banner();
        }

        macroquad::window::next_frame().await;
    }
}

/// Entry point for the spectator window.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let options = Options::parse();
    let config = ViewerConfig::load(options.config.as_deref())?;

    let (sender, receiver) = mpsc::channel();
    let _reader = thread::spawn(move || feed_states(&sender));

    let window_config = macroquad::window::Conf {
        window_title: config.window_title.clone(),
        window_width: config.window_width,
        window_height: config.window_height,
        ..macroquad::window::Conf::default()
    };
    let autoplay = options.autoplay;

    macroquad::Window::from_config(window_config, async move {
        render_loop(receiver, config, autoplay).await;
    });

    Ok(())
}
