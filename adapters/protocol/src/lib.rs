#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sentinel-framed line protocol between the engine and a match server.
//!
//! The server speaks newline-delimited text over stdin/stdout: one greeting
//! line fixing the team, then JSON state frames (possibly pretty-printed
//! across many lines) terminated by sentinel lines. [`ServerLink`] drives
//! the strict bot-side exchange; [`StateStream`] is the lenient read-only
//! variant the viewer uses, which skips framing noise instead of insisting
//! on the handshake order.

use std::io::{self, BufRead, Write};

use grimhold_core::{AIAction, GameState, Team};
use thiserror::Error;

/// Greeting line assigning the red side.
pub const RED_GREETING: &str = "--YOU ARE RED--";
/// Greeting line assigning the blue side.
pub const BLUE_GREETING: &str = "--YOU ARE BLUE--";
/// Terminator of the opening state frame.
pub const END_INITIAL_STATE: &str = "--END INITIAL GAME STATE--";
/// Terminator of every per-turn state frame.
pub const END_OF_TURN: &str = "--END OF TURN--";

/// Failures crossing the wire boundary.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The transport failed mid-exchange.
    #[error("connection failed: {0}")]
    Io(#[from] io::Error),
    /// The greeting line named no known team.
    #[error("greeting {0:?} names no known team")]
    UnknownGreeting(String),
    /// The stream ended inside a state frame.
    #[error("stream ended before {terminator:?}")]
    TruncatedState {
        /// Sentinel the unfinished frame was waiting for.
        terminator: String,
    },
    /// A frame failed to encode or decode as JSON.
    #[error("state codec failed: {0}")]
    Codec(#[from] serde_json::Error),
    /// Floor and occupancy grids disagree on row count.
    #[error("floor grid has {floor} rows but entity grid has {entity}")]
    MismatchedGridRows {
        /// Rows in the floor-tile grid.
        floor: usize,
        /// Rows in the occupancy grid.
        entity: usize,
    },
    /// A floor row and its occupancy row disagree on length.
    #[error("row {row} has {floor} floor columns but {entity} entity columns")]
    MismatchedGridColumns {
        /// Index of the offending row.
        row: usize,
        /// Columns in the floor row.
        floor: usize,
        /// Columns in the occupancy row.
        entity: usize,
    },
}

/// Decodes one accumulated state frame and checks its grids agree.
pub fn decode_state(payload: &str) -> Result<GameState, ProtocolError> {
    let state: GameState = serde_json::from_str(payload)?;
    validate_grids(&state)?;
    Ok(state)
}

fn validate_grids(state: &GameState) -> Result<(), ProtocolError> {
    if state.floor_tiles.len() != state.entity_grid.len() {
        return Err(ProtocolError::MismatchedGridRows {
            floor: state.floor_tiles.len(),
            entity: state.entity_grid.len(),
        });
    }
    for (row, (floor, entity)) in state.floor_tiles.iter().zip(&state.entity_grid).enumerate() {
        if floor.len() != entity.len() {
            return Err(ProtocolError::MismatchedGridColumns {
                row,
                floor: floor.len(),
                entity: entity.len(),
            });
        }
    }
    Ok(())
}

fn read_trimmed_line<R>(reader: &mut R) -> Result<Option<String>, ProtocolError>
where
    R: BufRead,
{
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        let _ = line.pop();
    }
    Ok(Some(line))
}

/// The bot side of the match exchange.
///
/// Owns both halves of the wire; every outbound line is flushed immediately
/// because the server reads the streams lockstep.
#[derive(Debug)]
pub struct ServerLink<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> ServerLink<R, W>
where
    R: BufRead,
    W: Write,
{
    /// Wraps the two transport halves.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Reads the greeting line and returns the assigned team.
    pub fn read_team(&mut self) -> Result<Team, ProtocolError> {
        let line = match read_trimmed_line(&mut self.reader)? {
            Some(line) => line,
            None => {
                return Err(ProtocolError::TruncatedState {
                    terminator: "greeting".to_owned(),
                })
            }
        };
        if line.trim() == RED_GREETING {
            return Ok(Team::Red);
        }
        if line.trim() == BLUE_GREETING {
            return Ok(Team::Blue);
        }
        Err(ProtocolError::UnknownGreeting(line))
    }

    /// Reads the opening state frame.
    pub fn read_initial_state(&mut self) -> Result<GameState, ProtocolError> {
        match self.read_frame(END_INITIAL_STATE)? {
            Some(payload) => decode_state(&payload),
            None => Err(ProtocolError::TruncatedState {
                terminator: END_INITIAL_STATE.to_owned(),
            }),
        }
    }

    /// Reads the next per-turn state frame.
    ///
    /// A clean end of stream before any frame content means the match is
    /// over and yields `Ok(None)`; an end of stream inside a frame is an
    /// error.
    pub fn next_turn(&mut self) -> Result<Option<GameState>, ProtocolError> {
        match self.read_frame(END_OF_TURN)? {
            Some(payload) => decode_state(&payload).map(Some),
            None => Ok(None),
        }
    }

    /// Sends the display name line of the handshake.
    pub fn send_name(&mut self, name: &str) -> Result<(), ProtocolError> {
        writeln!(self.writer, "{name}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Sends one action as a single JSON line.
    pub fn send_action(&mut self, action: &AIAction) -> Result<(), ProtocolError> {
        let line = serde_json::to_string(action)?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Accumulates lines until `terminator`; `Ok(None)` on a clean end of
    /// stream with nothing accumulated.
    fn read_frame(&mut self, terminator: &str) -> Result<Option<String>, ProtocolError> {
        let mut payload = String::new();
        loop {
            match read_trimmed_line(&mut self.reader)? {
                Some(line) => {
                    if line.trim() == terminator {
                        return Ok(Some(payload));
                    }
                    payload.push_str(&line);
                }
                None => {
                    if payload.trim().is_empty() {
                        return Ok(None);
                    }
                    return Err(ProtocolError::TruncatedState {
                        terminator: terminator.to_owned(),
                    });
                }
            }
        }
    }
}

/// Lenient read-only state feed for display tools.
///
/// Greeting lines are skipped, either terminator closes a frame, and stray
/// sentinels with nothing accumulated are ignored. Only a frame left
/// unterminated at end of stream surfaces as an error.
#[derive(Debug)]
pub struct StateStream<R> {
    reader: R,
}

impl<R> StateStream<R>
where
    R: BufRead,
{
    /// Wraps the transport to iterate decoded states.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R> Iterator for StateStream<R>
where
    R: BufRead,
{
    type Item = Result<GameState, ProtocolError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut payload = String::new();
        loop {
            let line = match read_trimmed_line(&mut self.reader) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    if payload.trim().is_empty() {
                        return None;
                    }
                    return Some(Err(ProtocolError::TruncatedState {
                        terminator: END_OF_TURN.to_owned(),
                    }));
                }
                Err(error) => return Some(Err(error)),
            };
            let trimmed = line.trim();
            if trimmed == RED_GREETING || trimmed == BLUE_GREETING {
                continue;
            }
            if trimmed == END_INITIAL_STATE || trimmed == END_OF_TURN {
                if payload.trim().is_empty() {
                    continue;
                }
                return Some(decode_state(&payload));
            }
            payload.push_str(&line);
        }
    }
}
