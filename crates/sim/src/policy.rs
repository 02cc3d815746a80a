use glam::Vec2;
use kickoff_shared::{Action, Observation, PlayerConfig, SimConfig};

use crate::error::PolicyError;

/// Numeric policy: one observation in, one discrete action out, once per tick.
pub trait Policy: Send {
    fn name(&self) -> &str;
    fn act(&mut self, obs: &Observation) -> Result<Action, PolicyError>;
}

/// Stands still for the whole match. The baseline opponent.
pub struct IdlePolicy;

impl Policy for IdlePolicy {
    fn name(&self) -> &str {
        "idle"
    }

    fn act(&mut self, _obs: &Observation) -> Result<Action, PolicyError> {
        Ok(Action::Noop)
    }
}

/// Wraps a pure function returning the raw action integer. Integers outside
/// the action space decode to a noop.
pub struct FnPolicy<F> {
    name: String,
    f: F,
}

impl<F> FnPolicy<F>
where
    F: Fn(&Observation) -> i64 + Send,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> Policy for FnPolicy<F>
where
    F: Fn(&Observation) -> i64 + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn act(&mut self, obs: &Observation) -> Result<Action, PolicyError> {
        Ok(Action::from_raw((self.f)(obs)))
    }
}

/// Walks its foot onto the ball along the longer axis and kicks once the
/// ball is at its feet. Sees only the observation, so the body size and
/// kick range come from the match's player config.
#[derive(Debug, Clone, Copy)]
pub struct ChaserPolicy {
    width: f32,
    height: f32,
    kick_range: f32,
}

impl ChaserPolicy {
    pub fn new() -> Self {
        Self::with_player(&PlayerConfig::default())
    }

    pub fn for_config(config: &SimConfig) -> Self {
        Self::with_player(&config.player)
    }

    fn with_player(player: &PlayerConfig) -> Self {
        Self {
            width: player.width,
            height: player.height,
            kick_range: player.possession_radius,
        }
    }
}

impl Default for ChaserPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for ChaserPolicy {
    fn name(&self) -> &str {
        "chaser"
    }

    fn act(&mut self, obs: &Observation) -> Result<Action, PolicyError> {
        let d = &obs.data;
        let foot = Vec2::new(d[0] + self.width / 2.0, d[1] + self.height);
        let delta = Vec2::new(d[2], d[3]) - foot;
        let dist = delta.length();

        if dist < 1.0 {
            // standing on the ball: step off so a kick has a direction
            return Ok(Action::Up);
        }
        if dist < self.kick_range {
            return Ok(Action::Kick);
        }

        let action = if delta.x.abs() >= delta.y.abs() {
            if delta.x > 0.0 {
                Action::Right
            } else {
                Action::Left
            }
        } else if delta.y > 0.0 {
            Action::Down
        } else {
            Action::Up
        };
        Ok(action)
    }
}
