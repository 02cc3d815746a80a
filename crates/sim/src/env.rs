use glam::Vec2;
use kickoff_shared::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::ball::Ball;
use crate::error::PolicyError;
use crate::geometry::angle_between;
use crate::observation::build_observation;
use crate::player::Player;
use crate::policy::Policy;

/// Where the ball may spawn at reset. Later phases spread it further from
/// the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurriculumPhase {
    Near,
    Midfield,
    Anywhere,
}

impl CurriculumPhase {
    pub fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(CurriculumPhase::Near),
            1 => Some(CurriculumPhase::Midfield),
            2 => Some(CurriculumPhase::Anywhere),
            _ => None,
        }
    }

    /// Inclusive integer spawn box `(x_min, x_max, y_min, y_max)`.
    fn spawn_box(self, pitch: &PitchConfig) -> (i32, i32, i32, i32) {
        let mid = (pitch.height / 2.0) as i32;
        let h = pitch.height as i32;
        match self {
            CurriculumPhase::Near => (500, 750, mid - 60, mid + 60),
            CurriculumPhase::Midfield => (250, 750, mid - 150, mid + 150),
            CurriculumPhase::Anywhere => (50, 750, 50, h - 50),
        }
    }
}

/// Shaping weights for the single-agent scoring task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    /// Per step, times foot-to-ball distance.
    pub distance: f32,
    /// Times the distance closed this step, while not holding the ball.
    pub approach: f32,
    /// Times the cosine between the kick and the attacking direction.
    pub kick_toward_goal: f32,
    pub kick_away: f32,
    pub holding: f32,
    pub goal: f32,
    pub own_goal: f32,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            distance: -0.002,
            approach: 0.10,
            kick_toward_goal: 3.0,
            kick_away: -0.2,
            holding: -0.01,
            goal: 30.0,
            own_goal: -2.0,
        }
    }
}

/// Result of one env step (plain data).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub obs: Observation,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub kicked: bool,
}

impl StepResult {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// One blue player alone on the pitch, attacking the left goal.
pub struct FootballEnv {
    config: SimConfig,
    weights: RewardWeights,
    phase: CurriculumPhase,
    rng: Pcg64,
    ball: Ball,
    player: Player,
    steps: u32,
    max_steps: u32,
    prev_dist: f32,
}

impl FootballEnv {
    pub fn new(config: SimConfig, phase: CurriculumPhase, seed: u64) -> Self {
        let mut env = Self {
            ball: Ball::new(config.pitch.center(), &config.ball),
            player: Player::new(Team::Blue, Role::Striker, Vec2::from(ENV_PLAYER_START), &config),
            config,
            weights: RewardWeights::default(),
            phase,
            rng: Pcg64::seed_from_u64(seed),
            steps: 0,
            max_steps: MAX_EPISODE_STEPS,
            prev_dist: 0.0,
        };
        env.reset(None);
        env
    }

    pub fn with_weights(mut self, weights: RewardWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn phase(&self) -> CurriculumPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: CurriculumPhase) {
        self.phase = phase;
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Start a new episode. A seed reseeds the spawn generator.
    pub fn reset(&mut self, seed: Option<u64>) -> Observation {
        if let Some(seed) = seed {
            self.rng = Pcg64::seed_from_u64(seed);
        }
        let (x0, x1, y0, y1) = self.phase.spawn_box(&self.config.pitch);
        let bx = self.rng.gen_range(x0..=x1) as f32;
        let by = self.rng.gen_range(y0..=y1) as f32;

        self.ball.place(Vec2::new(bx, by));
        self.player.place(Vec2::from(ENV_PLAYER_START));
        self.steps = 0;
        self.prev_dist = self.player.distance_to_ball(&self.ball);
        self.observe()
    }

    pub fn observe(&self) -> Observation {
        build_observation(&self.player, &self.ball)
    }

    pub fn step(&mut self, action: Action) -> StepResult {
        self.steps += 1;
        let w = self.weights;
        let kick_radius = self.player.config().kick_radius;
        let mut reward = 0.0f32;

        let mut kicked = false;
        if let Some(dir) = action.direction() {
            self.player.walk(dir);
        } else if action == Action::Kick && self.player.distance_to_ball(&self.ball) < kick_radius {
            kicked = self.player.kick_ball(&mut self.ball);
        }
        let kick_velocity = self.ball.velocity;

        self.ball.advance(&self.config.pitch);
        let dist = self.player.distance_to_ball(&self.ball);
        self.player.has_ball = dist < kick_radius;

        reward += w.distance * dist;
        if !self.player.has_ball {
            reward += w.approach * (self.prev_dist - dist);
        }
        self.prev_dist = dist;

        if kicked {
            if kick_velocity.x < 0.0 {
                let cos = angle_between(kick_velocity, Vec2::NEG_X).cos();
                reward += w.kick_toward_goal * cos;
            } else {
                reward += w.kick_away;
            }
        } else if self.player.has_ball {
            reward += w.holding;
        }

        let mut terminated = false;
        if self.ball.position.x <= GOAL_LINE_MARGIN {
            reward += w.goal;
            terminated = true;
        } else if self.ball.position.x >= self.config.pitch.width - GOAL_LINE_MARGIN {
            reward += w.own_goal;
            terminated = true;
        }

        StepResult {
            obs: self.observe(),
            reward,
            terminated,
            truncated: !terminated && self.steps >= self.max_steps,
            kicked,
        }
    }
}

/// How one episode went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub seed: u64,
    pub steps: u32,
    pub total_reward: f32,
    pub kicks: u32,
    pub scored: bool,
    pub own_goal: bool,
}

/// Play one episode from `seed` with `policy` in control.
pub fn rollout(
    env: &mut FootballEnv,
    policy: &mut dyn Policy,
    seed: u64,
) -> Result<EpisodeSummary, PolicyError> {
    let mut obs = env.reset(Some(seed));
    let mut summary = EpisodeSummary {
        seed,
        ..Default::default()
    };

    loop {
        let action = policy.act(&obs)?;
        let step = env.step(action);
        summary.steps += 1;
        summary.total_reward += step.reward;
        summary.kicks += u32::from(step.kicked);
        obs = step.obs;

        if step.terminated {
            summary.scored = env.ball().position.x <= GOAL_LINE_MARGIN;
            summary.own_goal = !summary.scored;
        }
        if step.done() {
            return Ok(summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{ChaserPolicy, FnPolicy, IdlePolicy};

    fn env(phase: CurriculumPhase, seed: u64) -> FootballEnv {
        FootballEnv::new(SimConfig::default(), phase, seed)
    }

    #[test]
    fn test_reset_is_seeded() {
        let mut a = env(CurriculumPhase::Anywhere, 1);
        let mut b = env(CurriculumPhase::Anywhere, 99);
        assert_eq!(a.reset(Some(7)), b.reset(Some(7)));
    }

    #[test]
    fn test_spawn_boxes() {
        let mut e = env(CurriculumPhase::Near, 3);
        for seed in 0..50 {
            e.reset(Some(seed));
            let p = e.ball().position;
            assert!((500.0..=750.0).contains(&p.x));
            assert!((240.0..=360.0).contains(&p.y));
        }
        e.set_phase(CurriculumPhase::Anywhere);
        for seed in 0..50 {
            e.reset(Some(seed));
            let p = e.ball().position;
            assert!((50.0..=750.0).contains(&p.x));
            assert!((50.0..=550.0).contains(&p.y));
        }
    }

    #[test]
    fn test_player_spawn() {
        let e = env(CurriculumPhase::Near, 0);
        assert_eq!(e.player().position, Vec2::new(700.0, 280.0));
        assert_eq!(e.player().team, Team::Blue);
    }

    #[test]
    fn test_idle_episode_truncates() {
        let mut e = env(CurriculumPhase::Near, 0).with_max_steps(50);
        let summary = rollout(&mut e, &mut IdlePolicy, 11).unwrap();
        assert_eq!(summary.steps, 50);
        assert!(!summary.scored);
        assert!(summary.total_reward < 0.0);
    }

    #[test]
    fn test_kick_out_of_reach_does_nothing() {
        let mut e = env(CurriculumPhase::Anywhere, 0);
        e.reset(Some(0));
        e.ball.place(Vec2::new(100.0, 100.0));
        e.prev_dist = e.player.distance_to_ball(&e.ball);
        let step = e.step(Action::Kick);
        assert!(!step.kicked);
        assert_eq!(e.ball().velocity, Vec2::ZERO);
    }

    #[test]
    fn test_leftward_kick_rewarded() {
        let mut e = env(CurriculumPhase::Near, 0);
        e.reset(Some(0));
        // foot (720, 320); ball straight to its left
        e.ball.place(Vec2::new(700.0, 320.0));
        e.prev_dist = e.player.distance_to_ball(&e.ball);
        let step = e.step(Action::Kick);
        assert!(step.kicked);
        assert!(step.reward > 2.5, "reward {}", step.reward);

        // and a kick away from goal is penalised
        e.ball.place(Vec2::new(740.0, 320.0));
        e.prev_dist = e.player.distance_to_ball(&e.ball);
        let away = e.step(Action::Kick);
        assert!(away.kicked);
        assert!(away.reward < 0.0);
    }

    #[test]
    fn test_goal_terminates() {
        let mut e = env(CurriculumPhase::Near, 0);
        e.reset(Some(0));
        e.ball.place(Vec2::new(7.0, 300.0));
        e.ball.velocity = Vec2::new(-4.0, 0.0);
        e.prev_dist = e.player.distance_to_ball(&e.ball);
        let step = e.step(Action::Noop);
        assert!(step.terminated);
        assert!(!step.truncated);
        assert!(step.reward > 25.0);
    }

    #[test]
    fn test_chaser_rollouts_are_deterministic() {
        let mut a = env(CurriculumPhase::Near, 0);
        let mut b = env(CurriculumPhase::Near, 0);
        let ra = rollout(&mut a, &mut ChaserPolicy::new(), 5).unwrap();
        let rb = rollout(&mut b, &mut ChaserPolicy::new(), 5).unwrap();
        assert_eq!(ra, rb);
        assert!(ra.kicks > 0);
    }

    #[test]
    fn test_policy_error_ends_rollout() {
        struct Gone;
        impl Policy for Gone {
            fn name(&self) -> &str {
                "gone"
            }
            fn act(&mut self, _obs: &Observation) -> Result<Action, PolicyError> {
                Err(PolicyError::Unavailable("no model".into()))
            }
        }
        let mut e = env(CurriculumPhase::Near, 0);
        assert!(rollout(&mut e, &mut Gone, 0).is_err());

        let mut left = FnPolicy::new("left", |_: &Observation| 3);
        let summary = rollout(&mut e, &mut left, 0).unwrap();
        assert!(summary.steps > 0);
    }
}
