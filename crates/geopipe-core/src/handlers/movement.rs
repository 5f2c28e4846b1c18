use super::payload;
use crate::action::Action;
use crate::outcome::Outcome;
use crate::registry::{Accumulator, ActionHandler};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn all() -> &'static [Direction] {
        &[
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            Direction::North => "move-north",
            Direction::East => "move-east",
            Direction::South => "move-south",
            Direction::West => "move-west",
        }
    }

    /// `(d_lon, d_lat)` for a move of `distance` degrees.
    fn offset(self, distance: f64) -> (f64, f64) {
        match self {
            Direction::North => (0.0, distance),
            Direction::South => (0.0, -distance),
            Direction::East => (distance, 0.0),
            Direction::West => (-distance, 0.0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct MovePayload {
    distance: f64,
}

/// Translates every position by a fixed number of degrees.
#[derive(Debug, Clone, Copy)]
pub struct MoveHandler {
    direction: Direction,
}

impl MoveHandler {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }
}

impl ActionHandler for MoveHandler {
    fn kind(&self) -> &str {
        self.direction.kind()
    }

    fn handle(&self, acc: Accumulator, action: &Action) -> Accumulator {
        let MovePayload { distance } = match payload(action) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(id = %action.id, error = %e, "move skipped");
                return acc;
            }
        };
        if acc.state.first_position().is_none() {
            return acc;
        }

        let (d_lon, d_lat) = self.direction.offset(distance);
        let state = acc
            .state
            .map_positions(|p| p.set(p.lon() + d_lon, p.lat() + d_lat));
        let outcome = Outcome::simple(format!("Moved {} by {distance}", self.direction));
        acc.with(state, action.id, outcome)
    }
}
