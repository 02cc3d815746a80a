use std::path::Path;
use std::time::Instant;

use kickoff_shared::{ConfigError, InputBindings, InputSnapshot, Role, SimConfig};
use log::warn;

use crate::behavior::{BehaviorEngine, DecisionContext};
use crate::error::PolicyError;
use crate::intent::Intent;
use crate::physics::SimState;
use crate::policy::Policy;
use crate::team::{ball_owner, teammate_of};

/// Anything that can report which logical inputs are held this tick.
pub trait InputSource: Send {
    fn name(&self) -> &str;
    fn poll(&mut self, tick: u32) -> InputSnapshot;
}

/// Recorded device codes, one list per tick, played back through bindings.
/// Ticks past the end of the recording have nothing pressed.
#[derive(Debug)]
pub struct KeyScript {
    name: String,
    bindings: InputBindings,
    frames: Vec<Vec<u32>>,
}

impl KeyScript {
    pub fn new(name: impl Into<String>, bindings: InputBindings, frames: Vec<Vec<u32>>) -> Self {
        Self {
            name: name.into(),
            bindings,
            frames,
        }
    }

    /// Load a JSON array of per-tick pressed-code arrays.
    pub fn load(path: &Path, bindings: InputBindings) -> Result<Self, ConfigError> {
        let bad = |reason: String| ConfigError::KeyScript {
            path: path.to_path_buf(),
            reason,
        };
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("keys")
            .to_string();
        let json = std::fs::read_to_string(path).map_err(|e| bad(e.to_string()))?;
        let frames: Vec<Vec<u32>> = serde_json::from_str(&json).map_err(|e| bad(e.to_string()))?;
        Ok(Self::new(name, bindings, frames))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl InputSource for KeyScript {
    fn name(&self) -> &str {
        &self.name
    }

    fn poll(&mut self, tick: u32) -> InputSnapshot {
        match self.frames.get(tick as usize) {
            Some(pressed) => self.bindings.snapshot(|code| pressed.contains(&code)),
            None => InputSnapshot::empty(),
        }
    }
}

/// Behavior engine plus the cooldown that gates its kicks and passes.
#[derive(Debug, Clone)]
pub struct ScriptedAgent {
    engine: BehaviorEngine,
    cooldown_ticks: u32,
}

impl ScriptedAgent {
    pub fn new(role: Role, config: &SimConfig) -> Self {
        Self {
            engine: BehaviorEngine::new(role, config),
            cooldown_ticks: config.behavior.action_cooldown_ticks,
        }
    }

    pub fn role(&self) -> Role {
        self.engine.role()
    }

    pub fn decide(&mut self, state: &SimState, idx: usize) -> Intent {
        let players = &state.players;
        let can_act_on_ball = state
            .ticks_since_touch(idx)
            .map_or(true, |since| since >= self.cooldown_ticks);
        let ctx = DecisionContext {
            me: &players[idx],
            ball: &state.ball,
            teammate: teammate_of(players, idx).map(|i| &players[i]),
            ball_owner: ball_owner(players).map(|i| &players[i]),
            can_act_on_ball,
        };
        self.engine.decide(&ctx)
    }
}

/// Per-side input source driven by the match loop.
pub enum Controller {
    Human(Box<dyn InputSource>),
    Scripted(ScriptedAgent),
    Policy(Box<dyn Policy>),
}

impl Controller {
    pub fn scripted(role: Role, config: &SimConfig) -> Self {
        Controller::Scripted(ScriptedAgent::new(role, config))
    }

    pub fn policy(policy: impl Policy + 'static) -> Self {
        Controller::Policy(Box::new(policy))
    }

    pub fn human(source: impl InputSource + 'static) -> Self {
        Controller::Human(Box::new(source))
    }

    pub fn name(&self) -> String {
        match self {
            Controller::Human(source) => format!("human:{}", source.name()),
            Controller::Scripted(agent) => match agent.role() {
                Role::Striker => "striker".to_string(),
                Role::Defender => "defender".to_string(),
            },
            Controller::Policy(policy) => policy.name().to_string(),
        }
    }

    /// Role the controlled player takes on the pitch.
    pub fn role(&self) -> Role {
        match self {
            Controller::Scripted(agent) => agent.role(),
            _ => Role::Striker,
        }
    }

    /// Produce this tick's intent for player slot `idx`.
    pub fn decide(&mut self, state: &SimState, idx: usize) -> Result<Intent, PolicyError> {
        match self {
            Controller::Human(source) => Ok(Intent::from_snapshot(&source.poll(state.tick))),
            Controller::Scripted(agent) => Ok(agent.decide(state, idx)),
            Controller::Policy(policy) => {
                let obs = state.observe(idx);
                let started = Instant::now();
                let action = policy.act(&obs)?;
                let took = started.elapsed();
                let budget = state.config.clock.frame_budget();
                if took > budget {
                    warn!(
                        "policy {} took {:?} at tick {} (budget {:?})",
                        policy.name(),
                        took,
                        state.tick,
                        budget
                    );
                }
                Ok(Intent::from_action(action, state.players[idx].has_ball))
            }
        }
    }
}
