pub mod defender;
pub mod steering;
pub mod striker;

use kickoff_shared::{BehaviorConfig, PitchConfig, Role, SimConfig};

use crate::ball::Ball;
use crate::intent::Intent;
use crate::player::Player;

/// Everything a rule-based agent looks at in one tick.
///
/// Optional collaborators are explicit: without a teammate the pass branch is
/// skipped, without an opposing owner the marking branch is skipped.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub me: &'a Player,
    pub ball: &'a Ball,
    pub teammate: Option<&'a Player>,
    pub ball_owner: Option<&'a Player>,
    /// Closed while the agent is still cooling down from its last ball action.
    pub can_act_on_ball: bool,
}

/// Role-driven decision function with its own tick counter.
#[derive(Debug, Clone)]
pub struct BehaviorEngine {
    role: Role,
    config: BehaviorConfig,
    pitch: PitchConfig,
    ticks: u32,
    zigzag_dir: f32,
}

impl BehaviorEngine {
    pub fn new(role: Role, config: &SimConfig) -> Self {
        Self {
            role,
            config: config.behavior,
            pitch: config.pitch,
            ticks: 0,
            zigzag_dir: 1.0,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    pub fn pitch(&self) -> &PitchConfig {
        &self.pitch
    }

    /// `+1` or `-1`: which way lateral dribbling currently leans.
    pub fn zigzag_dir(&self) -> f32 {
        self.zigzag_dir
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Advance the agent's clock by one tick and decide what to do.
    pub fn decide(&mut self, ctx: &DecisionContext<'_>) -> Intent {
        self.ticks += 1;
        if self.ticks % self.config.zigzag_period_ticks.max(1) == 0 {
            self.zigzag_dir = -self.zigzag_dir;
        }

        match self.role {
            Role::Striker => striker::decide(self, ctx),
            Role::Defender => defender::decide(self, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use kickoff_shared::{BallConfig, Team};

    #[test]
    fn test_zigzag_flips_on_own_counter() {
        let config = SimConfig::default();
        let mut engine = BehaviorEngine::new(Role::Striker, &config);
        let me = Player::new(Team::Red, Role::Striker, Vec2::new(100.0, 280.0), &config);
        let ball = Ball::new(Vec2::new(400.0, 300.0), &BallConfig::default());
        let ctx = DecisionContext {
            me: &me,
            ball: &ball,
            teammate: None,
            ball_owner: None,
            can_act_on_ball: false,
        };

        for _ in 0..17 {
            engine.decide(&ctx);
        }
        assert_eq!(engine.zigzag_dir(), 1.0);
        engine.decide(&ctx);
        assert_eq!(engine.zigzag_dir(), -1.0);
        for _ in 0..18 {
            engine.decide(&ctx);
        }
        assert_eq!(engine.zigzag_dir(), 1.0);
        assert_eq!(engine.ticks(), 36);
    }

    #[test]
    fn test_two_engines_agree() {
        let config = SimConfig::default();
        let me = Player::new(Team::Blue, Role::Striker, Vec2::new(500.0, 100.0), &config);
        let ball = Ball::new(Vec2::new(300.0, 400.0), &BallConfig::default());
        let ctx = DecisionContext {
            me: &me,
            ball: &ball,
            teammate: None,
            ball_owner: None,
            can_act_on_ball: true,
        };
        let mut a = BehaviorEngine::new(Role::Striker, &config);
        let mut b = BehaviorEngine::new(Role::Striker, &config);
        for _ in 0..50 {
            assert_eq!(a.decide(&ctx), b.decide(&ctx));
        }
    }
}
