use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::types::{InputSnapshot, LogicalInput, Team};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    pub width: f32,
    pub height: f32,
    /// Goal-mouth band on both end lines, `goal_top <= y <= goal_bottom`.
    pub goal_top: f32,
    pub goal_bottom: f32,
    /// How far inside the boundary an out-of-bounds restart is placed.
    pub out_inset: f32,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            goal_top: GOAL_TOP,
            goal_bottom: GOAL_BOTTOM,
            out_inset: OUT_INSET,
        }
    }
}

impl PitchConfig {
    pub fn in_goal_band(&self, y: f32) -> bool {
        y >= self.goal_top && y <= self.goal_bottom
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn goal_center_y(&self) -> f32 {
        (self.goal_top + self.goal_bottom) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    pub max_speed: f32,
    pub friction: f32,
    /// Velocity components below this magnitude snap to zero.
    pub deadband: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            max_speed: BALL_MAX_SPEED,
            friction: BALL_FRICTION,
            deadband: VELOCITY_DEADBAND,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub kick_radius: f32,
    pub kick_power: f32,
    /// Holding the ball, and the precondition for passing.
    pub possession_radius: f32,
    pub pass_power: f32,
    pub dribble_radius: f32,
    pub dribble_power: f32,
    pub tackle_radius: f32,
    /// Top-left corners at kick-off.
    pub red_start: [f32; 2],
    pub blue_start: [f32; 2],
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
            kick_radius: KICK_RADIUS,
            kick_power: KICK_POWER,
            possession_radius: POSSESSION_RADIUS,
            pass_power: PASS_POWER,
            dribble_radius: DRIBBLE_RADIUS,
            dribble_power: DRIBBLE_POWER,
            tackle_radius: TACKLE_RADIUS,
            red_start: RED_START,
            blue_start: BLUE_START,
        }
    }
}

impl PlayerConfig {
    pub fn start(&self, team: Team) -> Vec2 {
        match team {
            Team::Red => Vec2::from(self.red_start),
            Team::Blue => Vec2::from(self.blue_start),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub capture_radius: f32,
    pub shot_radius: f32,
    /// Shooting target sits this far in front of the opposing goal line.
    pub goal_target_depth: f32,
    pub pass_preference_radius: f32,
    pub chase_radius: f32,
    pub marking_offset: f32,
    pub dead_zone: f32,
    pub zigzag_period_ticks: u32,
    pub action_cooldown_ticks: u32,
    pub red_home_x: f32,
    pub blue_home_x: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            capture_radius: CAPTURE_RADIUS,
            shot_radius: SHOT_RADIUS,
            goal_target_depth: GOAL_TARGET_DEPTH,
            pass_preference_radius: PASS_PREFERENCE_RADIUS,
            chase_radius: CHASE_RADIUS,
            marking_offset: MARKING_OFFSET,
            dead_zone: AXIS_DEAD_ZONE,
            zigzag_period_ticks: ZIGZAG_PERIOD_TICKS,
            action_cooldown_ticks: ACTION_COOLDOWN_TICKS,
            red_home_x: RED_HOME_X,
            blue_home_x: BLUE_HOME_X,
        }
    }
}

impl BehaviorConfig {
    pub fn home_x(&self, team: Team) -> f32 {
        match team {
            Team::Red => self.red_home_x,
            Team::Blue => self.blue_home_x,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub tick_rate: u32,
    pub match_duration_ms: u64,
    pub celebration_ms: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            match_duration_ms: MATCH_DURATION_MS,
            celebration_ms: CELEBRATION_MS,
        }
    }
}

impl ClockConfig {
    pub fn ticks_to_ms(&self, ticks: u32) -> u64 {
        u64::from(ticks) * 1000 / u64::from(self.tick_rate.max(1))
    }

    pub fn ms_to_ticks(&self, ms: u64) -> u32 {
        let ticks = ms.saturating_mul(u64::from(self.tick_rate)) / 1000;
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }

    pub fn celebration_ticks(&self) -> u32 {
        self.ms_to_ticks(self.celebration_ms)
    }

    /// Wall-clock budget of one tick at the target rate.
    pub fn frame_budget(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.tick_rate.max(1)))
    }
}

/// Per-match tunables. Fixed for the duration of a match.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub pitch: PitchConfig,
    pub ball: BallConfig,
    pub player: PlayerConfig,
    pub behavior: BehaviorConfig,
    pub clock: ClockConfig,
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.pitch;
        positive("pitch.width", p.width)?;
        positive("pitch.height", p.height)?;
        if !(p.goal_top.is_finite() && p.goal_bottom.is_finite())
            || p.goal_top < 0.0
            || p.goal_bottom > p.height
            || p.goal_top >= p.goal_bottom
        {
            return Err(ConfigError::Invalid {
                field: "pitch.goal_top",
                reason: format!(
                    "goal band [{}, {}] must be non-empty and inside [0, {}]",
                    p.goal_top, p.goal_bottom, p.height
                ),
            });
        }
        if !(p.out_inset.is_finite() && p.out_inset >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "pitch.out_inset",
                reason: format!("must be non-negative, got {}", p.out_inset),
            });
        }

        let b = &self.ball;
        positive("ball.radius", b.radius)?;
        positive("ball.max_speed", b.max_speed)?;
        if !(b.friction > 0.0 && b.friction < 1.0) {
            return Err(ConfigError::Invalid {
                field: "ball.friction",
                reason: format!("must lie in (0, 1), got {}", b.friction),
            });
        }
        if !(b.deadband.is_finite() && b.deadband >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "ball.deadband",
                reason: format!("must be non-negative, got {}", b.deadband),
            });
        }

        let pl = &self.player;
        positive("player.width", pl.width)?;
        positive("player.height", pl.height)?;
        positive("player.speed", pl.speed)?;
        positive("player.kick_radius", pl.kick_radius)?;
        positive("player.kick_power", pl.kick_power)?;
        positive("player.possession_radius", pl.possession_radius)?;
        positive("player.pass_power", pl.pass_power)?;
        positive("player.dribble_radius", pl.dribble_radius)?;
        positive("player.dribble_power", pl.dribble_power)?;
        positive("player.tackle_radius", pl.tackle_radius)?;
        if pl.width >= p.width || pl.height >= p.height {
            return Err(ConfigError::Invalid {
                field: "player.width",
                reason: "player does not fit on the pitch".to_string(),
            });
        }
        for (field, [x, y]) in [("player.red_start", pl.red_start), ("player.blue_start", pl.blue_start)] {
            if !(0.0..=p.width - pl.width).contains(&x) || !(0.0..=p.height - pl.height).contains(&y) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("({x}, {y}) is outside the playable area"),
                });
            }
        }

        let bh = &self.behavior;
        positive("behavior.capture_radius", bh.capture_radius)?;
        positive("behavior.shot_radius", bh.shot_radius)?;
        positive("behavior.chase_radius", bh.chase_radius)?;
        if bh.zigzag_period_ticks == 0 {
            return Err(ConfigError::Invalid {
                field: "behavior.zigzag_period_ticks",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..1.0).contains(&bh.dead_zone) {
            return Err(ConfigError::Invalid {
                field: "behavior.dead_zone",
                reason: format!("must lie in [0, 1), got {}", bh.dead_zone),
            });
        }

        let c = &self.clock;
        if !(1..=MAX_TICK_RATE).contains(&c.tick_rate) {
            return Err(ConfigError::Invalid {
                field: "clock.tick_rate",
                reason: format!("must lie in [1, {MAX_TICK_RATE}], got {}", c.tick_rate),
            });
        }
        if !(1..=MAX_MATCH_DURATION_MS).contains(&c.match_duration_ms) {
            return Err(ConfigError::Invalid {
                field: "clock.match_duration_ms",
                reason: format!(
                    "must lie in [1, {MAX_MATCH_DURATION_MS}], got {}",
                    c.match_duration_ms
                ),
            });
        }
        if c.celebration_ms > MAX_CELEBRATION_MS {
            return Err(ConfigError::Invalid {
                field: "clock.celebration_ms",
                reason: format!(
                    "must be at most {MAX_CELEBRATION_MS}, got {}",
                    c.celebration_ms
                ),
            });
        }

        Ok(())
    }
}

// Keyboard codes of the default layout.
const KEY_W: u32 = 119;
const KEY_S: u32 = 115;
const KEY_A: u32 = 97;
const KEY_D: u32 = 100;
const KEY_E: u32 = 101;
const KEY_Q: u32 = 113;
const KEY_LSHIFT: u32 = 1_073_742_049;

/// Mapping from logical inputs to input-device codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputBindings {
    codes: BTreeMap<LogicalInput, u32>,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self::from_pairs([
            (LogicalInput::Up, KEY_W),
            (LogicalInput::Down, KEY_S),
            (LogicalInput::Left, KEY_A),
            (LogicalInput::Right, KEY_D),
            (LogicalInput::Kick, KEY_LSHIFT),
            (LogicalInput::Pass, KEY_E),
            (LogicalInput::Tackle, KEY_Q),
        ])
    }
}

impl InputBindings {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (LogicalInput, u32)>) -> Self {
        Self {
            codes: pairs.into_iter().collect(),
        }
    }

    pub fn code(&self, input: LogicalInput) -> Option<u32> {
        self.codes.get(&input).copied()
    }

    /// Every logical input must have a device code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match LogicalInput::ALL.iter().find(|i| !self.codes.contains_key(i)) {
            Some(missing) => Err(ConfigError::MissingBinding(*missing)),
            None => Ok(()),
        }
    }

    /// Translate a device query into a per-tick snapshot.
    pub fn snapshot(&self, is_pressed: impl Fn(u32) -> bool) -> InputSnapshot {
        let mut snapshot = InputSnapshot::empty();
        for (input, code) in &self.codes {
            if is_pressed(*code) {
                snapshot.set(*input, true);
            }
        }
        snapshot
    }
}

/// Everything a front end needs before a match can start.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub sim: SimConfig,
    pub bindings: InputBindings,
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sim.validate()?;
        self.bindings.validate()
    }
}
