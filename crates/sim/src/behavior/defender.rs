use glam::Vec2;
use kickoff_shared::{Direction, Team};

use super::steering::steer_towards;
use super::{BehaviorEngine, DecisionContext};
use crate::geometry::distance;
use crate::intent::{BallRequest, Intent};

fn pull_back(team: Team, foot_x: f32, home_x: f32) -> Option<Direction> {
    match team {
        Team::Red if foot_x > home_x => Some(Direction::Left),
        Team::Blue if foot_x < home_x => Some(Direction::Right),
        _ => None,
    }
}

fn in_own_half(team: Team, x: f32, half: f32) -> bool {
    match team {
        Team::Red => x < half,
        Team::Blue => x > half,
    }
}

pub fn decide(engine: &BehaviorEngine, ctx: &DecisionContext<'_>) -> Intent {
    let cfg = engine.config();
    let team = ctx.me.team;
    let foot = ctx.me.foot_point();
    let ball = ctx.ball.position;
    let half = engine.pitch().width / 2.0;

    let rival_owner = ctx.ball_owner.filter(|owner| owner.team != team);
    let target = match rival_owner {
        Some(owner) if in_own_half(team, owner.foot_point().x, half) => {
            // stand goal-side of the carrier
            Some(owner.foot_point() - Vec2::new(team.attack_sign() * cfg.marking_offset, 0.0))
        }
        _ if distance(foot, ball) < cfg.chase_radius => Some(ball),
        _ => None,
    };

    let mut steer = target
        .map(|t| steer_towards(foot, t, cfg.dead_zone))
        .unwrap_or_default();
    if let Some(back) = pull_back(team, foot.x, cfg.home_x(team)) {
        steer.horizontal = Some(back);
    }

    let mut intent = Intent {
        moves: steer.into_moves(),
        ball: Vec::new(),
    };
    if ctx.can_act_on_ball && distance(foot, ball) < cfg.capture_radius {
        intent.ball.push(if ctx.teammate.is_some() {
            BallRequest::Pass
        } else {
            BallRequest::Kick
        });
    }
    intent
}
