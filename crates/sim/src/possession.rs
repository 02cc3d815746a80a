use glam::Vec2;

use crate::ball::Ball;
use crate::geometry::distance;
use crate::intent::BallRequest;
use crate::player::Player;
use crate::team::{opponents_of, pair_mut, teammate_of};

/// Recompute every `has_ball` flag. The nearest player inside its possession
/// radius owns the ball; on an exact tie the later player in evaluation order
/// wins. At most one flag is set afterwards.
pub fn resolve_possession(players: &mut [Player], ball: &Ball) -> Option<usize> {
    let mut owner = None;
    let mut best = f32::INFINITY;
    for (i, p) in players.iter().enumerate() {
        let d = p.distance_to_ball(ball);
        if d < p.config().possession_radius && d <= best {
            best = d;
            owner = Some(i);
        }
    }

    for (i, p) in players.iter_mut().enumerate() {
        p.has_ball = owner == Some(i);
    }
    owner
}

/// Per-tick exclusive right to touch the ball. The first successful actor
/// takes it; everyone after that in the same tick is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BallLock {
    holder: Option<usize>,
}

impl BallLock {
    pub fn holder(&self) -> Option<usize> {
        self.holder
    }

    pub fn is_taken(&self) -> bool {
        self.holder.is_some()
    }

    pub fn release(&mut self) {
        self.holder = None;
    }

    /// Run `touch` for `idx` unless someone already touched the ball this tick.
    /// The lock is only taken when `touch` reports success.
    pub fn try_with(&mut self, idx: usize, touch: impl FnOnce() -> bool) -> bool {
        if self.is_taken() {
            return false;
        }
        let done = touch();
        if done {
            self.holder = Some(idx);
        }
        done
    }
}

/// Strip the ball from an opponent standing within tackle range. The ball
/// stops dead at the tackler's feet.
pub fn tackle(players: &mut [Player], tackler: usize, ball: &mut Ball) -> bool {
    let victims: Vec<usize> = opponents_of(players, tackler).collect();
    for victim in victims {
        let Some((me, them)) = pair_mut(players, tackler, victim) else {
            continue;
        };
        if !them.has_ball {
            continue;
        }
        if distance(me.foot_point(), them.foot_point()) >= me.config().tackle_radius {
            continue;
        }

        them.has_ball = false;
        me.has_ball = true;
        ball.place(me.foot_point());
        return true;
    }
    false
}

/// Carry out one ball request for player `idx`. `heading` is how far the
/// player moved this tick and steers dribbles.
pub fn apply_request(
    players: &mut [Player],
    idx: usize,
    request: BallRequest,
    ball: &mut Ball,
    heading: Vec2,
) -> bool {
    match request {
        BallRequest::Kick => players.get_mut(idx).is_some_and(|p| p.kick_ball(ball)),
        BallRequest::Dribble => players.get_mut(idx).is_some_and(|p| p.dribble(ball, heading)),
        BallRequest::Pass => {
            let Some(mate) = teammate_of(players, idx) else {
                return false;
            };
            match pair_mut(players, idx, mate) {
                Some((me, mate)) => me.pass_to(mate, ball),
                None => false,
            }
        }
        BallRequest::Tackle => tackle(players, idx, ball),
    }
}
