use glam::Vec2;
use kickoff_shared::{Direction, Team};

use super::steering::steer_towards;
use super::{BehaviorEngine, DecisionContext};
use crate::geometry::distance;
use crate::intent::{BallRequest, Intent};

/// Aim point just in front of the goal this team attacks.
pub fn goal_point(engine: &BehaviorEngine, team: Team) -> Vec2 {
    let pitch = engine.pitch();
    let depth = engine.config().goal_target_depth;
    let x = match team {
        Team::Red => pitch.width - depth,
        Team::Blue => depth,
    };
    Vec2::new(x, pitch.goal_center_y())
}

pub fn decide(engine: &BehaviorEngine, ctx: &DecisionContext<'_>) -> Intent {
    if ctx.me.has_ball {
        drive_at_goal(engine, ctx)
    } else {
        chase_ball(engine, ctx)
    }
}

/// Dribble towards goal, weaving vertically, and shoot once close enough.
fn drive_at_goal(engine: &BehaviorEngine, ctx: &DecisionContext<'_>) -> Intent {
    let cfg = engine.config();
    let foot = ctx.me.foot_point();
    let goal = goal_point(engine, ctx.me.team);

    let steer = steer_towards(foot, goal, cfg.dead_zone);
    let weave = engine.zigzag_dir() > 0.0;
    let vertical = steer.vertical.map(|dir| match (dir, weave) {
        (Direction::Up, false) => Direction::Down,
        (Direction::Down, false) => Direction::Up,
        (dir, _) => dir,
    });

    let mut intent = Intent {
        moves: steer.horizontal.into_iter().chain(vertical).collect(),
        ball: Vec::new(),
    };
    if distance(foot, goal) < cfg.shot_radius {
        intent.ball.push(BallRequest::Kick);
    }
    intent.ball.push(BallRequest::Dribble);
    intent
}

fn chase_ball(engine: &BehaviorEngine, ctx: &DecisionContext<'_>) -> Intent {
    let cfg = engine.config();
    let foot = ctx.me.foot_point();
    let mut intent = Intent {
        moves: steer_towards(foot, ctx.ball.position, cfg.dead_zone).into_moves(),
        ball: Vec::new(),
    };

    if ctx.can_act_on_ball {
        let mate_close = ctx
            .teammate
            .is_some_and(|mate| distance(foot, mate.foot_point()) < cfg.pass_preference_radius);
        if mate_close {
            intent.ball.push(BallRequest::Pass);
        } else if distance(foot, ctx.ball.position) < cfg.capture_radius {
            intent.ball.push(BallRequest::Kick);
        }
    }
    intent
}
