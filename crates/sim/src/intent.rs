use kickoff_shared::{Action, Direction, InputSnapshot, LogicalInput};

/// Something a player asks to do to the ball this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallRequest {
    Kick,
    Pass,
    Dribble,
    Tackle,
}

/// One player's requests for one tick. Moves are applied in order, then ball
/// requests are tried in order until one succeeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Intent {
    pub moves: Vec<Direction>,
    pub ball: Vec<BallRequest>,
}

impl Intent {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn walk(mut self, direction: Direction) -> Self {
        self.moves.push(direction);
        self
    }

    pub fn request(mut self, request: BallRequest) -> Self {
        self.ball.push(request);
        self
    }

    pub fn is_idle(&self) -> bool {
        self.moves.is_empty() && self.ball.is_empty()
    }

    /// Translate a numeric-policy action. Kicks only count while holding the ball.
    pub fn from_action(action: Action, has_ball: bool) -> Self {
        match action {
            Action::Kick if has_ball => Self::idle().request(BallRequest::Kick),
            other => match other.direction() {
                Some(dir) => Self::idle().walk(dir),
                None => Self::idle(),
            },
        }
    }

    /// Translate a human input snapshot: up, down, left, right, then kick, pass, tackle.
    pub fn from_snapshot(snapshot: &InputSnapshot) -> Self {
        let mut intent = Self::idle();
        for (input, dir) in [
            (LogicalInput::Up, Direction::Up),
            (LogicalInput::Down, Direction::Down),
            (LogicalInput::Left, Direction::Left),
            (LogicalInput::Right, Direction::Right),
        ] {
            if snapshot.is_active(input) {
                intent.moves.push(dir);
            }
        }
        for (input, request) in [
            (LogicalInput::Kick, BallRequest::Kick),
            (LogicalInput::Pass, BallRequest::Pass),
            (LogicalInput::Tackle, BallRequest::Tackle),
        ] {
            if snapshot.is_active(input) {
                intent.ball.push(request);
            }
        }
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kick_needs_possession() {
        assert!(Intent::from_action(Action::Kick, false).is_idle());
        assert_eq!(
            Intent::from_action(Action::Kick, true).ball,
            vec![BallRequest::Kick]
        );
    }

    #[test]
    fn test_move_actions() {
        assert_eq!(Intent::from_action(Action::Left, false).moves, vec![Direction::Left]);
        assert!(Intent::from_action(Action::Noop, true).is_idle());
    }

    #[test]
    fn test_snapshot_order() {
        let snap = InputSnapshot::empty()
            .with(LogicalInput::Tackle)
            .with(LogicalInput::Right)
            .with(LogicalInput::Up)
            .with(LogicalInput::Kick);
        let intent = Intent::from_snapshot(&snap);
        assert_eq!(intent.moves, vec![Direction::Up, Direction::Right]);
        assert_eq!(intent.ball, vec![BallRequest::Kick, BallRequest::Tackle]);
    }
}
