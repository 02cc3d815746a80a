use glam::Vec2;
use kickoff_shared::Direction;

use crate::geometry::direction_vector;

/// Per-axis movement decision. Either axis may be idle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steer {
    pub horizontal: Option<Direction>,
    pub vertical: Option<Direction>,
}

impl Steer {
    pub fn into_moves(self) -> Vec<Direction> {
        self.horizontal.into_iter().chain(self.vertical).collect()
    }
}

fn axis(component: f32, dead_zone: f32, negative: Direction, positive: Direction) -> Option<Direction> {
    if component < -dead_zone {
        Some(negative)
    } else if component > dead_zone {
        Some(positive)
    } else {
        None
    }
}

/// Split the unit direction from `from` to `to` into independent axis moves.
/// Components inside `dead_zone` produce no move on that axis.
pub fn steer_towards(from: Vec2, to: Vec2, dead_zone: f32) -> Steer {
    let dir = direction_vector(from, to);
    Steer {
        horizontal: axis(dir.x, dead_zone, Direction::Left, Direction::Right),
        vertical: axis(dir.y, dead_zone, Direction::Up, Direction::Down),
    }
}
