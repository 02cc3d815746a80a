use kickoff_shared::*;

use crate::ball::Ball;
use crate::physics::SimState;
use crate::player::Player;

/// Build the six-float observation for one player.
pub fn build_observation(player: &Player, ball: &Ball) -> Observation {
    Observation {
        data: [
            player.position.x,
            player.position.y,
            ball.position.x,
            ball.position.y,
            (ball.velocity.x / OBS_VELOCITY_SCALE).clamp(-1.0, 1.0),
            (ball.velocity.y / OBS_VELOCITY_SCALE).clamp(-1.0, 1.0),
        ],
    }
}

impl SimState {
    /// Observation for player slot `idx` (0 = red, 1 = blue).
    pub fn observe(&self, idx: usize) -> Observation {
        build_observation(&self.players[idx], &self.ball)
    }
}
