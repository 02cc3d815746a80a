use kickoff_shared::{SimConfig, Team};

use crate::player::Player;

/// First other player wearing the same colours.
pub fn teammate_of(players: &[Player], idx: usize) -> Option<usize> {
    let team = players.get(idx)?.team;
    players
        .iter()
        .enumerate()
        .find(|(i, p)| *i != idx && p.team == team)
        .map(|(i, _)| i)
}

/// Opponents of `idx`, in evaluation order.
pub fn opponents_of(players: &[Player], idx: usize) -> impl Iterator<Item = usize> + '_ {
    let team = players.get(idx).map(|p| p.team);
    players
        .iter()
        .enumerate()
        .filter(move |(_, p)| Some(p.team.opponent()) == team)
        .map(|(i, _)| i)
}

pub fn ball_owner(players: &[Player]) -> Option<usize> {
    players.iter().position(|p| p.has_ball)
}

/// Two distinct players borrowed mutably at once.
pub fn pair_mut(players: &mut [Player], a: usize, b: usize) -> Option<(&mut Player, &mut Player)> {
    if a == b || a >= players.len() || b >= players.len() {
        return None;
    }
    if a < b {
        let (left, right) = players.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = players.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}

/// Send everyone back to their kick-off spot.
pub fn reset_positions(players: &mut [Player], config: &SimConfig) {
    for p in players.iter_mut() {
        p.place(config.player.start(p.team));
    }
}

pub fn team_players(players: &[Player], team: Team) -> impl Iterator<Item = &Player> + '_ {
    players.iter().filter(move |p| p.team == team)
}
