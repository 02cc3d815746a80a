use glam::Vec2;
use kickoff_shared::{MatchOutcome, OutOfBoundsKind, PitchConfig, Team};

use crate::ball::Ball;

/// Where and how the ball last left the pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutOfBounds {
    pub kind: OutOfBoundsKind,
    /// Restart spot, inset from the boundary the ball crossed.
    pub restart: Vec2,
}

/// Pitch bookkeeping: score, goal detection, out-of-bounds memory.
///
/// Holds no tick state of its own; the match loop polls it once per tick.
#[derive(Debug, Clone)]
pub struct Stadium {
    pub pitch: PitchConfig,
    pub score_red: u32,
    pub score_blue: u32,
    last_out: Option<OutOfBounds>,
}

impl Stadium {
    pub fn new(pitch: PitchConfig) -> Self {
        Self {
            pitch,
            score_red: 0,
            score_blue: 0,
            last_out: None,
        }
    }

    pub fn with_score(pitch: PitchConfig, score_red: u32, score_blue: u32) -> Self {
        Self {
            score_red,
            score_blue,
            ..Self::new(pitch)
        }
    }

    pub fn score(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.score_red,
            Team::Blue => self.score_blue,
        }
    }

    /// Red attacks the right goal, blue the left. Increments the scorer's count.
    pub fn check_goal(&mut self, ball: &Ball) -> Option<Team> {
        if !self.pitch.in_goal_band(ball.position.y) {
            return None;
        }

        if ball.position.x <= 0.0 {
            self.score_blue += 1;
            Some(Team::Blue)
        } else if ball.position.x >= self.pitch.width {
            self.score_red += 1;
            Some(Team::Red)
        } else {
            None
        }
    }

    /// True when the ball centre has left the pitch anywhere but through a
    /// goal mouth. Records the restart spot on every positive answer.
    pub fn is_out(&mut self, ball: &Ball) -> bool {
        let p = &self.pitch;
        let Vec2 { x, y } = ball.position;
        let inset = p.out_inset;
        let in_mouth = p.in_goal_band(y);

        let out = if x < 0.0 && !in_mouth {
            Some((OutOfBoundsKind::Sideline, Vec2::new(inset, y)))
        } else if x > p.width && !in_mouth {
            Some((OutOfBoundsKind::Sideline, Vec2::new(p.width - inset, y)))
        } else if y < 0.0 {
            Some((OutOfBoundsKind::Corner, Vec2::new(x, inset)))
        } else if y > p.height {
            Some((OutOfBoundsKind::Corner, Vec2::new(x, p.height - inset)))
        } else {
            None
        };

        match out {
            Some((kind, spot)) => {
                let restart = spot.clamp(Vec2::splat(inset), Vec2::new(p.width - inset, p.height - inset));
                self.last_out = Some(OutOfBounds { kind, restart });
                true
            }
            None => false,
        }
    }

    pub fn last_out(&self) -> Option<&OutOfBounds> {
        self.last_out.as_ref()
    }

    /// Put the ball at rest at the remembered restart spot, or at the centre
    /// spot when there is none or `use_last_out` is false.
    pub fn reset_ball_position(&mut self, ball: &mut Ball, use_last_out: bool) {
        let spot = match (use_last_out, self.last_out.take()) {
            (true, Some(out)) => out.restart,
            _ => self.pitch.center(),
        };
        ball.place(spot);
    }

    pub fn decide_winner(&self) -> MatchOutcome {
        MatchOutcome::from_scores(self.score_red, self.score_blue)
    }
}
