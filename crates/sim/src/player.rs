use glam::Vec2;
use kickoff_shared::{Direction, PlayerConfig, PlayerSnapshot, Role, SimConfig, Team};

use crate::ball::Ball;
use crate::geometry::{direction_vector, distance};

/// A player's bounding box on the pitch. `position` is the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub team: Team,
    pub role: Role,
    pub speed: f32,
    /// Cached by the possession resolver once per tick.
    pub has_ball: bool,
    reach: PlayerConfig,
    field: Vec2,
}

impl Player {
    pub fn new(team: Team, role: Role, position: Vec2, config: &SimConfig) -> Self {
        let mut player = Self {
            position,
            width: config.player.width,
            height: config.player.height,
            team,
            role,
            speed: config.player.speed,
            has_ball: false,
            reach: config.player,
            field: Vec2::new(config.pitch.width, config.pitch.height),
        };
        player.clamp_to_pitch();
        player
    }

    /// Bottom-centre of the bounding box; origin of every ball-distance check.
    pub fn foot_point(&self) -> Vec2 {
        Vec2::new(self.position.x + self.width / 2.0, self.position.y + self.height)
    }

    pub fn distance_to_ball(&self, ball: &Ball) -> f32 {
        distance(self.foot_point(), ball.position)
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.reach
    }

    /// Step one tick's worth of distance in `direction`, then clamp into the playable rectangle.
    pub fn walk(&mut self, direction: Direction) {
        self.position += direction.unit() * self.speed;
        self.clamp_to_pitch();
    }

    /// Teleport (kick-off, restarts). Possession is dropped.
    pub fn place(&mut self, position: Vec2) {
        self.position = position;
        self.has_ball = false;
        self.clamp_to_pitch();
    }

    fn clamp_to_pitch(&mut self) {
        self.position.x = self.position.x.clamp(0.0, self.field.x - self.width);
        self.position.y = self.position.y.clamp(0.0, self.field.y - self.height);
    }

    /// Strike the ball away from the foot. Requires the ball inside the kick
    /// radius and not exactly on the foot point.
    pub fn kick_ball(&mut self, ball: &mut Ball) -> bool {
        let foot = self.foot_point();
        let dist = distance(foot, ball.position);
        if dist >= self.reach.kick_radius || dist == 0.0 {
            return false;
        }

        self.has_ball = false;
        ball.apply_impulse(direction_vector(foot, ball.position) * self.reach.kick_power);
        true
    }

    /// Play the ball to a teammate. A silent no-op unless this player is
    /// within the possession radius of the ball.
    pub fn pass_to(&mut self, teammate: &mut Player, ball: &mut Ball) -> bool {
        let foot = self.foot_point();
        let dist = distance(foot, ball.position);
        if dist > self.reach.possession_radius || dist == 0.0 {
            return false;
        }

        let dir = direction_vector(foot, teammate.foot_point());
        if dir == Vec2::ZERO {
            return false;
        }

        self.has_ball = false;
        teammate.has_ball = true;
        ball.apply_impulse(dir * self.reach.pass_power);
        true
    }

    /// Nudge a ball sitting at the feet along `heading`, or straight ahead
    /// from the foot when the player is standing still.
    pub fn dribble(&mut self, ball: &mut Ball, heading: Vec2) -> bool {
        let foot = self.foot_point();
        let dist = distance(foot, ball.position);
        if dist >= self.reach.dribble_radius || dist == 0.0 {
            return false;
        }

        let mut dir = heading.normalize_or_zero();
        if dir == Vec2::ZERO {
            dir = direction_vector(foot, ball.position);
        }
        ball.apply_impulse(dir * self.reach.dribble_power);
        true
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            x: self.position.x,
            y: self.position.y,
            team: self.team,
            has_ball: self.has_ball,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kickoff_shared::BallConfig;
    use proptest::prelude::*;

    fn player_at(team: Team, x: f32, y: f32) -> Player {
        Player::new(team, Role::Striker, Vec2::new(x, y), &SimConfig::default())
    }

    fn ball_at(x: f32, y: f32) -> Ball {
        Ball::new(Vec2::new(x, y), &BallConfig::default())
    }

    #[test]
    fn test_foot_point() {
        let p = player_at(Team::Red, 100.0, 200.0);
        assert_eq!(p.foot_point(), Vec2::new(120.0, 240.0));
    }

    #[test]
    fn test_walk_moves_by_speed() {
        let mut p = player_at(Team::Red, 100.0, 200.0);
        p.walk(Direction::Right);
        assert_eq!(p.position, Vec2::new(102.5, 200.0));
        p.walk(Direction::Up);
        assert_eq!(p.position, Vec2::new(102.5, 197.5));
    }

    #[test]
    fn test_walk_clamps_to_pitch() {
        let mut p = player_at(Team::Red, 1.0, 559.0);
        p.walk(Direction::Left);
        assert_eq!(p.position.x, 0.0);
        p.walk(Direction::Down);
        assert_eq!(p.position.y, 560.0);
        p.walk(Direction::Down);
        assert_eq!(p.position.y, 560.0);
    }

    #[test]
    fn test_kick_within_radius() {
        let mut p = player_at(Team::Red, 100.0, 200.0);
        p.has_ball = true;
        // foot at (120, 240), ball 30 units to the right
        let mut ball = ball_at(150.0, 240.0);
        assert!(p.kick_ball(&mut ball));
        assert!(!p.has_ball);
        assert!((ball.velocity.x - 2.5).abs() < 1e-5);
        assert_eq!(ball.velocity.y, 0.0);
    }

    #[test]
    fn test_kick_out_of_range_is_noop() {
        let mut p = player_at(Team::Red, 100.0, 200.0);
        let mut ball = ball_at(170.0, 240.0);
        assert!(!p.kick_ball(&mut ball));
        assert_eq!(ball.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_kick_ball_on_foot_is_noop() {
        let mut p = player_at(Team::Red, 100.0, 200.0);
        p.has_ball = true;
        let mut ball = ball_at(120.0, 240.0);
        assert!(!p.kick_ball(&mut ball));
        assert!(p.has_ball);
        assert_eq!(ball.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_pass_transfers_possession() {
        let mut kicker = player_at(Team::Red, 100.0, 200.0);
        let mut mate = player_at(Team::Red, 300.0, 200.0);
        kicker.has_ball = true;
        let mut ball = ball_at(130.0, 240.0);

        assert!(kicker.pass_to(&mut mate, &mut ball));
        assert!(!kicker.has_ball);
        assert!(mate.has_ball);
        // teammate's foot is straight to the right of the kicker's foot
        assert!((ball.velocity.x - 2.5).abs() < 1e-5);
        assert!(ball.velocity.y.abs() < 1e-5);
    }

    #[test]
    fn test_pass_without_possession_is_noop() {
        let mut kicker = player_at(Team::Red, 100.0, 200.0);
        let mut mate = player_at(Team::Red, 300.0, 200.0);
        kicker.has_ball = true;
        let mut ball = ball_at(150.0, 240.0);

        assert!(!kicker.pass_to(&mut mate, &mut ball));
        assert_eq!(ball.velocity, Vec2::ZERO);
        assert!(kicker.has_ball);
        assert!(!mate.has_ball);
    }

    #[test]
    fn test_dribble_follows_heading() {
        let mut p = player_at(Team::Red, 100.0, 200.0);
        let mut ball = ball_at(125.0, 240.0);
        assert!(p.dribble(&mut ball, Vec2::new(0.0, -1.0)));
        assert_eq!(ball.velocity.x, 0.0);
        assert!((ball.velocity.y + 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_dribble_standing_pushes_away_from_foot() {
        let mut p = player_at(Team::Red, 100.0, 200.0);
        let mut ball = ball_at(130.0, 240.0);
        assert!(p.dribble(&mut ball, Vec2::ZERO));
        assert!((ball.velocity.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_dribble_out_of_range_is_noop() {
        let mut p = player_at(Team::Red, 100.0, 200.0);
        let mut ball = ball_at(145.0, 240.0);
        assert!(!p.dribble(&mut ball, Vec2::X));
        assert_eq!(ball.velocity, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_walk_stays_on_pitch(
            x in -100.0f32..900.0,
            y in -100.0f32..700.0,
            steps in prop::collection::vec(0u8..4, 0..200),
        ) {
            let mut p = player_at(Team::Blue, x, y);
            for s in steps {
                let dir = [Direction::Up, Direction::Down, Direction::Left, Direction::Right][s as usize];
                p.walk(dir);
                prop_assert!(p.position.x >= 0.0 && p.position.x <= 760.0);
                prop_assert!(p.position.y >= 0.0 && p.position.y <= 560.0);
            }
        }
    }
}
