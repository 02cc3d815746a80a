use glam::Vec2;
use kickoff_shared::{BallConfig, BallSnapshot, PitchConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub max_speed: f32,
    /// Multiplicative velocity decay applied every tick.
    pub friction: f32,
    pub deadband: f32,
}

impl Ball {
    pub fn new(position: Vec2, config: &BallConfig) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius: config.radius,
            max_speed: config.max_speed,
            friction: config.friction,
            deadband: config.deadband,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Advance one tick: integrate, decay, snap micro-drift to zero, then
    /// bounce off the walls. The end lines only bounce outside the goal mouth.
    pub fn advance(&mut self, pitch: &PitchConfig) {
        self.position += self.velocity;
        self.velocity *= self.friction;

        if self.velocity.x.abs() < self.deadband {
            self.velocity.x = 0.0;
        }
        if self.velocity.y.abs() < self.deadband {
            self.velocity.y = 0.0;
        }

        let r = self.radius;

        if self.position.y - r <= 0.0 {
            self.position.y = r;
            self.velocity.y = -self.velocity.y;
        } else if self.position.y + r >= pitch.height {
            self.position.y = pitch.height - r;
            self.velocity.y = -self.velocity.y;
        }

        let in_mouth = pitch.in_goal_band(self.position.y);
        if self.position.x - r < 0.0 {
            if !in_mouth {
                self.position.x = r;
                self.velocity.x = -self.velocity.x;
            }
        } else if self.position.x + r > pitch.width && !in_mouth {
            self.position.x = pitch.width - r;
            self.velocity.x = -self.velocity.x;
        }
    }

    /// Add an impulse, then rescale so the speed never exceeds `max_speed`.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse;
        let speed = self.velocity.length();
        if speed > self.max_speed {
            self.velocity *= self.max_speed / speed;
        }
    }

    /// Place the ball at rest.
    pub fn place(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
    }

    pub fn snapshot(&self) -> BallSnapshot {
        BallSnapshot {
            x: self.position.x,
            y: self.position.y,
            vx: self.velocity.x,
            vy: self.velocity.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ball_at(x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        let mut ball = Ball::new(Vec2::new(x, y), &BallConfig::default());
        ball.velocity = Vec2::new(vx, vy);
        ball
    }

    #[test]
    fn test_friction_decays_velocity() {
        let pitch = PitchConfig::default();
        let mut ball = ball_at(400.0, 300.0, 4.0, 0.0);
        ball.advance(&pitch);
        assert!((ball.position.x - 404.0).abs() < 1e-5);
        assert!((ball.velocity.x - 4.0 * 0.97).abs() < 1e-5);
    }

    #[test]
    fn test_deadband_snaps_to_exact_zero() {
        let pitch = PitchConfig::default();
        let mut ball = ball_at(400.0, 300.0, 0.03 / 0.97, -0.04);
        ball.advance(&pitch);
        assert_eq!(ball.velocity.x, 0.0);
        assert_eq!(ball.velocity.y, 0.0);
    }

    #[test]
    fn test_ball_comes_to_rest() {
        let pitch = PitchConfig::default();
        let mut ball = ball_at(400.0, 300.0, 5.0, 3.0);
        for _ in 0..1000 {
            ball.advance(&pitch);
        }
        assert_eq!(ball.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_top_wall_reflection() {
        let pitch = PitchConfig::default();
        let mut ball = ball_at(400.0, 5.0, 0.0, -2.0);
        ball.advance(&pitch);
        assert_eq!(ball.position.y, ball.radius);
        assert!(ball.velocity.y > 0.0);
        assert!((ball.velocity.y - 2.0 * 0.97).abs() < 1e-5);
    }

    #[test]
    fn test_bottom_wall_reflection() {
        let pitch = PitchConfig::default();
        let mut ball = ball_at(400.0, 596.0, 0.0, 2.0);
        ball.advance(&pitch);
        assert_eq!(ball.position.y, pitch.height - ball.radius);
        assert!(ball.velocity.y < 0.0);
    }

    #[test]
    fn test_goal_mouth_passthrough() {
        let pitch = PitchConfig::default();
        let mut ball = ball_at(3.0, 300.0, -2.0, 0.0);
        ball.advance(&pitch);
        assert!((ball.position.x - 1.0).abs() < 1e-5);
        assert!(ball.velocity.x < 0.0);

        ball.advance(&pitch);
        assert!(ball.position.x <= 0.0);
    }

    #[test]
    fn test_end_line_reflects_outside_goal_mouth() {
        let pitch = PitchConfig::default();
        let mut ball = ball_at(3.0, 100.0, -2.0, 0.0);
        ball.advance(&pitch);
        assert_eq!(ball.position.x, ball.radius);
        assert!(ball.velocity.x > 0.0);

        let mut right = ball_at(797.0, 500.0, 2.0, 0.0);
        right.advance(&pitch);
        assert_eq!(right.position.x, pitch.width - right.radius);
        assert!(right.velocity.x < 0.0);
    }

    #[test]
    fn test_impulse_rescaled_to_max_speed() {
        let mut ball = ball_at(400.0, 300.0, 0.0, 0.0);
        ball.apply_impulse(Vec2::new(30.0, 40.0));
        assert!((ball.speed() - ball.max_speed).abs() < 1e-5);
        // direction preserved
        assert!((ball.velocity.x / ball.velocity.y - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_small_impulses_accumulate_to_cap() {
        let mut ball = ball_at(400.0, 300.0, 0.0, 0.0);
        for _ in 0..20 {
            ball.apply_impulse(Vec2::new(0.5, 0.0));
        }
        assert!((ball.speed() - ball.max_speed).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_speed_never_exceeds_cap(
            impulses in prop::collection::vec((-20.0f32..20.0, -20.0f32..20.0), 1..40)
        ) {
            let mut ball = ball_at(400.0, 300.0, 0.0, 0.0);
            for (px, py) in impulses {
                ball.apply_impulse(Vec2::new(px, py));
                prop_assert!(ball.speed() <= ball.max_speed + 1e-4);
            }
        }
    }
}
