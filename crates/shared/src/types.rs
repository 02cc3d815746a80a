use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// Slot of this team's player in a two-player match (red first).
    pub fn index(self) -> usize {
        match self {
            Team::Red => 0,
            Team::Blue => 1,
        }
    }

    pub fn from_index(idx: usize) -> Option<Team> {
        match idx {
            0 => Some(Team::Red),
            1 => Some(Team::Blue),
            _ => None,
        }
    }

    /// +1 when attacking towards `x = width` (red), -1 when attacking `x = 0` (blue).
    pub fn attack_sign(self) -> f32 {
        match self {
            Team::Red => 1.0,
            Team::Blue => -1.0,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Red => write!(f, "red"),
            Team::Blue => write!(f, "blue"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Striker,
    Defender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Parse a direction name. Unknown names yield `None`, which callers treat as a no-op.
    pub fn from_name(name: &str) -> Option<Direction> {
        match name {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit step in pitch coordinates (y grows downwards).
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Discrete action of the numeric-policy contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Noop,
    Up,
    Down,
    Left,
    Right,
    Kick,
}

impl Action {
    pub const ALL: [Action; crate::ACTION_COUNT] = [
        Action::Noop,
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Kick,
    ];

    pub fn from_index(idx: i64) -> Option<Action> {
        usize::try_from(idx)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Decode a raw policy output; anything outside `0..=5` is a noop.
    pub fn from_raw(raw: i64) -> Action {
        Self::from_index(raw).unwrap_or(Action::Noop)
    }

    pub fn index(self) -> u8 {
        match self {
            Action::Noop => 0,
            Action::Up => 1,
            Action::Down => 2,
            Action::Left => 3,
            Action::Right => 4,
            Action::Kick => 5,
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::Up => Some(Direction::Up),
            Action::Down => Some(Direction::Down),
            Action::Left => Some(Direction::Left),
            Action::Right => Some(Direction::Right),
            Action::Noop | Action::Kick => None,
        }
    }
}

/// Fixed-shape observation:
/// `[player_x, player_y, ball_x, ball_y, ball_vx / 10, ball_vy / 10]`,
/// positions relative to the playfield's top-left corner, velocities clamped to `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub data: [f32; crate::OBS_SIZE],
}

impl serde::Serialize for Observation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.as_slice().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Observation {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v: Vec<f32> = Vec::deserialize(deserializer)?;
        if v.len() != crate::OBS_SIZE {
            return Err(serde::de::Error::custom(format!(
                "expected {} floats, got {}",
                crate::OBS_SIZE,
                v.len()
            )));
        }
        let mut data = [0.0f32; crate::OBS_SIZE];
        data.copy_from_slice(&v);
        Ok(Observation { data })
    }
}

/// Logical human inputs, decoupled from device codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalInput {
    Up,
    Down,
    Left,
    Right,
    Kick,
    Pass,
    Tackle,
}

impl LogicalInput {
    pub const ALL: [LogicalInput; 7] = [
        LogicalInput::Up,
        LogicalInput::Down,
        LogicalInput::Left,
        LogicalInput::Right,
        LogicalInput::Kick,
        LogicalInput::Pass,
        LogicalInput::Tackle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LogicalInput::Up => "up",
            LogicalInput::Down => "down",
            LogicalInput::Left => "left",
            LogicalInput::Right => "right",
            LogicalInput::Kick => "kick",
            LogicalInput::Pass => "pass",
            LogicalInput::Tackle => "tackle",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for LogicalInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which logical inputs are held during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputSnapshot(u8);

impl InputSnapshot {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn with(mut self, input: LogicalInput) -> Self {
        self.set(input, true);
        self
    }

    pub fn set(&mut self, input: LogicalInput, active: bool) {
        if active {
            self.0 |= input.bit();
        } else {
            self.0 &= !input.bit();
        }
    }

    pub fn is_active(&self, input: LogicalInput) -> bool {
        self.0 & input.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfBoundsKind {
    /// Crossed an end line (x boundary) outside the goal mouth.
    Sideline,
    /// Crossed a touch line (y boundary).
    Corner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    RedWin,
    BlueWin,
    Draw,
}

impl MatchOutcome {
    /// Strictly greater score wins, otherwise a draw.
    pub fn from_scores(score_red: u32, score_blue: u32) -> Self {
        if score_red > score_blue {
            MatchOutcome::RedWin
        } else if score_blue > score_red {
            MatchOutcome::BlueWin
        } else {
            MatchOutcome::Draw
        }
    }

    pub fn winner(&self) -> Option<Team> {
        match self {
            MatchOutcome::RedWin => Some(Team::Red),
            MatchOutcome::BlueWin => Some(Team::Blue),
            MatchOutcome::Draw => None,
        }
    }

    pub fn points(&self, team: Team) -> u32 {
        match (self, team) {
            (MatchOutcome::RedWin, Team::Red) | (MatchOutcome::BlueWin, Team::Blue) => {
                crate::WIN_POINTS
            }
            (MatchOutcome::Draw, _) => crate::DRAW_POINTS,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    PreMatch,
    InPlay,
    GoalCelebration { scorer: Team, remaining_ticks: u32 },
    MatchEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub x: f32,
    pub y: f32,
    pub team: Team,
    pub has_ball: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub tick: u32,
    pub phase: MatchPhase,
    pub ball: BallSnapshot,
    pub players: [PlayerSnapshot; 2],
    pub score_red: u32,
    pub score_blue: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replay {
    pub config: MatchConfig,
    pub frames: Vec<ReplayFrame>,
    pub result: MatchResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    pub red_name: String,
    pub blue_name: String,
    pub sim_config: SimConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            red_name: "red".into(),
            blue_name: "blue".into(),
            sim_config: SimConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    pub goals: u32,
    pub kicks: u32,
    pub passes: u32,
    pub dribbles: u32,
    pub tackles: u32,
    pub possession_ticks: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub red: TeamStats,
    pub blue: TeamStats,
    pub out_of_bounds: u32,
}

impl MatchStats {
    pub fn team(&self, team: Team) -> &TeamStats {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }

    pub fn team_mut(&mut self, team: Team) -> &mut TeamStats {
        match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    pub final_tick: u32,
    pub elapsed_ms: u64,
    pub score_red: u32,
    pub score_blue: u32,
    pub stats: MatchStats,
}

/// Flat snapshot written when a match is paused or abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedMatch {
    pub ball: [f32; 2],
    pub red: [f32; 2],
    pub blue: [f32; 2],
    pub score_red: u32,
    pub score_blue: u32,
    pub elapsed_ms: u64,
}

impl SavedMatch {
    /// Reject snapshots that could not have come from a match on this pitch.
    pub fn validate(&self, config: &SimConfig) -> Result<(), ConfigError> {
        let pitch = &config.pitch;
        let player = &config.player;

        let coords = [self.ball, self.red, self.blue];
        if coords.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ConfigError::MalformedSave(
                "non-finite coordinate".to_string(),
            ));
        }

        let [bx, by] = self.ball;
        if !(0.0..=pitch.width).contains(&bx) || !(0.0..=pitch.height).contains(&by) {
            return Err(ConfigError::MalformedSave(format!(
                "ball ({bx}, {by}) is outside the pitch"
            )));
        }

        let max_x = pitch.width - player.width;
        let max_y = pitch.height - player.height;
        for (label, [x, y]) in [("red", self.red), ("blue", self.blue)] {
            if !(0.0..=max_x).contains(&x) || !(0.0..=max_y).contains(&y) {
                return Err(ConfigError::MalformedSave(format!(
                    "{label} player ({x}, {y}) is outside the playable area"
                )));
            }
        }

        Ok(())
    }
}
