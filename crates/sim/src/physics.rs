use glam::Vec2;
use kickoff_shared::*;
use log::debug;

use crate::ball::Ball;
use crate::intent::{BallRequest, Intent};
use crate::player::Player;
use crate::possession::{apply_request, resolve_possession, BallLock};
use crate::stadium::Stadium;
use crate::team::reset_positions;

/// What happened during one call to [`SimState::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub goal: Option<Team>,
    pub out_of_bounds: Option<OutOfBoundsKind>,
    /// Successful ball action per player slot.
    pub touches: [Option<BallRequest>; 2],
    pub phase_changed: bool,
}

/// Full simulation state for a 1v1 match. Slot 0 is red, slot 1 is blue.
#[derive(Debug, Clone)]
pub struct SimState {
    pub config: SimConfig,
    pub stadium: Stadium,
    pub ball: Ball,
    pub players: [Player; 2],
    pub tick: u32,
    pub phase: MatchPhase,
    pub stats: MatchStats,
    /// Player slot holding the ball after the last possession pass.
    pub owner: Option<usize>,
    lock: BallLock,
    last_touch_tick: [Option<u32>; 2],
    /// Clock offset when resuming a saved match.
    start_ms: u64,
}

impl SimState {
    pub fn new(config: SimConfig) -> Self {
        let players = [Team::Red, Team::Blue]
            .map(|team| Player::new(team, Role::Striker, config.player.start(team), &config));
        Self {
            stadium: Stadium::new(config.pitch),
            ball: Ball::new(config.pitch.center(), &config.ball),
            players,
            tick: 0,
            phase: MatchPhase::PreMatch,
            stats: MatchStats::default(),
            owner: None,
            lock: BallLock::default(),
            last_touch_tick: [None; 2],
            start_ms: 0,
            config,
        }
    }

    /// Rebuild a paused match. Malformed snapshots are rejected before any play.
    pub fn from_saved(config: SimConfig, saved: &SavedMatch) -> Result<Self, ConfigError> {
        config.validate()?;
        saved.validate(&config)?;

        let mut state = Self::new(config);
        state.ball.place(Vec2::from(saved.ball));
        state.players[0].place(Vec2::from(saved.red));
        state.players[1].place(Vec2::from(saved.blue));
        state.stadium = Stadium::with_score(config.pitch, saved.score_red, saved.score_blue);
        state.stats.red.goals = saved.score_red;
        state.stats.blue.goals = saved.score_blue;
        state.start_ms = saved.elapsed_ms;
        if state.elapsed_ms() >= config.clock.match_duration_ms {
            state.phase = MatchPhase::MatchEnded;
        }
        Ok(state)
    }

    /// Snapshot for pausing. Mid-celebration the layout play would resume
    /// from is saved, since the ball may still sit behind the goal line.
    pub fn to_saved(&self) -> SavedMatch {
        let (ball, red, blue) = match self.phase {
            MatchPhase::GoalCelebration { .. } => (
                self.config.pitch.center(),
                self.config.player.start(Team::Red),
                self.config.player.start(Team::Blue),
            ),
            _ => (
                self.ball.position,
                self.players[0].position,
                self.players[1].position,
            ),
        };
        SavedMatch {
            ball: ball.into(),
            red: red.into(),
            blue: blue.into(),
            score_red: self.stadium.score_red,
            score_blue: self.stadium.score_blue,
            elapsed_ms: self.elapsed_ms(),
        }
    }

    pub fn set_role(&mut self, idx: usize, role: Role) {
        if let Some(p) = self.players.get_mut(idx) {
            p.role = role;
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start_ms + self.config.clock.ticks_to_ms(self.tick)
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == MatchPhase::MatchEnded
    }

    pub fn outcome(&self) -> MatchOutcome {
        self.stadium.decide_winner()
    }

    pub fn result(&self) -> MatchResult {
        MatchResult {
            outcome: self.outcome(),
            final_tick: self.tick,
            elapsed_ms: self.elapsed_ms(),
            score_red: self.stadium.score_red,
            score_blue: self.stadium.score_blue,
            stats: self.stats,
        }
    }

    /// Ticks since `idx` last kicked, passed or tackled; `None` if it never has.
    pub fn ticks_since_touch(&self, idx: usize) -> Option<u32> {
        self.last_touch_tick
            .get(idx)
            .copied()
            .flatten()
            .map(|t| self.tick.saturating_sub(t))
    }

    pub fn snapshot(&self) -> ReplayFrame {
        ReplayFrame {
            tick: self.tick,
            phase: self.phase,
            ball: self.ball.snapshot(),
            players: [self.players[0].snapshot(), self.players[1].snapshot()],
            score_red: self.stadium.score_red,
            score_blue: self.stadium.score_blue,
        }
    }

    /// Advance one tick.
    pub fn step(&mut self, intents: &[Intent; 2]) -> TickEvents {
        let mut events = TickEvents::default();

        match self.phase {
            MatchPhase::MatchEnded => return events,
            MatchPhase::PreMatch => {
                debug!("kick-off at {} ms", self.elapsed_ms());
                self.phase = MatchPhase::InPlay;
                events.phase_changed = true;
            }
            MatchPhase::GoalCelebration {
                scorer,
                remaining_ticks,
            } => {
                // everything stays frozen; the clock keeps running
                if remaining_ticks <= 1 {
                    self.restart_after_goal();
                    debug!("play resumes after {scorer} goal");
                    events.phase_changed = true;
                } else {
                    self.phase = MatchPhase::GoalCelebration {
                        scorer,
                        remaining_ticks: remaining_ticks - 1,
                    };
                }
                self.advance_clock(&mut events);
                return events;
            }
            MatchPhase::InPlay => {}
        }

        self.lock.release();
        if let Some(kind) = self.restart_if_out() {
            events.out_of_bounds = Some(kind);
        }
        for (idx, intent) in intents.iter().enumerate() {
            if let Some(touch) = self.apply_intent(idx, intent) {
                events.touches[idx] = Some(touch);
            }
        }

        self.ball.advance(&self.config.pitch);

        if let Some(scorer) = self.stadium.check_goal(&self.ball) {
            self.stats.team_mut(scorer).goals += 1;
            events.goal = Some(scorer);
            events.phase_changed = true;
            debug!(
                "goal for {scorer} at tick {} ({}-{})",
                self.tick, self.stadium.score_red, self.stadium.score_blue
            );
            let celebration = self.config.clock.celebration_ticks();
            if celebration == 0 {
                self.restart_after_goal();
            } else {
                self.phase = MatchPhase::GoalCelebration {
                    scorer,
                    remaining_ticks: celebration,
                };
            }
        }

        self.owner = resolve_possession(&mut self.players, &self.ball);
        if let Some(owner) = self.owner {
            self.stats.team_mut(self.players[owner].team).possession_ticks += 1;
        }

        self.advance_clock(&mut events);
        events
    }

    /// Moves first, then ball requests until one lands or the ball is taken.
    fn apply_intent(&mut self, idx: usize, intent: &Intent) -> Option<BallRequest> {
        let before = self.players[idx].position;
        for dir in &intent.moves {
            self.players[idx].walk(*dir);
        }
        let heading = self.players[idx].position - before;

        for request in &intent.ball {
            let players = &mut self.players;
            let ball = &mut self.ball;
            let done = self
                .lock
                .try_with(idx, || apply_request(players, idx, *request, ball, heading));
            if !done {
                continue;
            }

            let team = self.players[idx].team;
            let stats = self.stats.team_mut(team);
            match request {
                BallRequest::Kick => stats.kicks += 1,
                BallRequest::Pass => stats.passes += 1,
                BallRequest::Dribble => stats.dribbles += 1,
                BallRequest::Tackle => stats.tackles += 1,
            }
            if *request != BallRequest::Dribble {
                self.last_touch_tick[idx] = Some(self.tick);
            }
            return Some(*request);
        }
        None
    }

    /// `Ball::advance` keeps the ball on the pitch, so this only fires for a
    /// ball placed off it between ticks (an editor, a front end, a test).
    fn restart_if_out(&mut self) -> Option<OutOfBoundsKind> {
        if !self.stadium.is_out(&self.ball) {
            return None;
        }
        let kind = self.stadium.last_out().map(|o| o.kind)?;
        self.stadium.reset_ball_position(&mut self.ball, true);
        self.stats.out_of_bounds += 1;
        debug!("ball out ({kind:?}), restart at {:?}", self.ball.position);
        Some(kind)
    }

    fn restart_after_goal(&mut self) {
        reset_positions(&mut self.players, &self.config);
        self.stadium.reset_ball_position(&mut self.ball, false);
        self.owner = None;
        self.phase = MatchPhase::InPlay;
    }

    fn advance_clock(&mut self, events: &mut TickEvents) {
        self.tick += 1;
        if self.elapsed_ms() >= self.config.clock.match_duration_ms {
            debug!("final whistle at tick {}", self.tick);
            self.phase = MatchPhase::MatchEnded;
            events.phase_changed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kickoff_shared::Direction;

    fn idle() -> [Intent; 2] {
        [Intent::idle(), Intent::idle()]
    }

    fn short_match(duration_ms: u64) -> SimConfig {
        let mut config = SimConfig::default();
        config.clock.match_duration_ms = duration_ms;
        config
    }

    #[test]
    fn test_initial_state() {
        let state = SimState::new(SimConfig::default());
        assert_eq!(state.phase, MatchPhase::PreMatch);
        assert_eq!(state.players[0].position, Vec2::new(100.0, 280.0));
        assert_eq!(state.players[1].position, Vec2::new(660.0, 280.0));
        assert_eq!(state.ball.position, Vec2::new(400.0, 300.0));
        assert_eq!(state.elapsed_ms(), 0);
    }

    #[test]
    fn test_first_step_kicks_off() {
        let mut state = SimState::new(SimConfig::default());
        let events = state.step(&idle());
        assert!(events.phase_changed);
        assert_eq!(state.phase, MatchPhase::InPlay);
        assert_eq!(state.tick, 1);
    }

    #[test]
    fn test_match_ends_on_time() {
        let mut state = SimState::new(short_match(1_000));
        for _ in 0..59 {
            state.step(&idle());
        }
        assert!(!state.is_terminal());
        state.step(&idle());
        assert!(state.is_terminal());
        assert_eq!(state.tick, 60);

        // further steps are ignored
        state.step(&idle());
        assert_eq!(state.tick, 60);
    }

    #[test]
    fn test_final_score_decides_winner() {
        let mut state = SimState::new(short_match(100));
        state.stadium.score_red = 3;
        state.stadium.score_blue = 1;
        while !state.is_terminal() {
            state.step(&idle());
        }
        assert_eq!(state.outcome(), MatchOutcome::RedWin);

        let mut level = SimState::new(short_match(100));
        level.stadium.score_red = 2;
        level.stadium.score_blue = 2;
        while !level.is_terminal() {
            level.step(&idle());
        }
        assert_eq!(level.outcome(), MatchOutcome::Draw);
    }

    #[test]
    fn test_goal_starts_celebration_then_resets() {
        let mut state = SimState::new(SimConfig::default());
        state.step(&idle());
        state.ball.place(Vec2::new(1.0, 300.0));
        state.ball.velocity = Vec2::new(-3.0, 0.0);
        state.players[0].place(Vec2::new(300.0, 100.0));

        let events = state.step(&idle());
        assert_eq!(events.goal, Some(Team::Blue));
        assert_eq!(state.stadium.score_blue, 1);
        assert_eq!(state.stats.blue.goals, 1);
        assert!(matches!(
            state.phase,
            MatchPhase::GoalCelebration { scorer: Team::Blue, remaining_ticks: 120 }
        ));

        // frozen: moves are ignored during the celebration
        let frozen_at = state.players[0].position;
        let push = [Intent::idle().walk(Direction::Down), Intent::idle()];
        for _ in 0..119 {
            state.step(&push);
        }
        assert_eq!(state.players[0].position, frozen_at);
        assert!(matches!(state.phase, MatchPhase::GoalCelebration { .. }));

        state.step(&push);
        assert_eq!(state.phase, MatchPhase::InPlay);
        assert_eq!(state.players[0].position, Vec2::new(100.0, 280.0));
        assert_eq!(state.ball.position, Vec2::new(400.0, 300.0));
        assert_eq!(state.ball.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_wide_shot_bounces_back_into_play() {
        let mut state = SimState::new(SimConfig::default());
        state.step(&idle());
        state.ball.place(Vec2::new(4.0, 100.0));
        state.ball.velocity = Vec2::new(-3.0, 0.0);

        let events = state.step(&idle());
        assert_eq!(events.goal, None);
        assert_eq!(events.out_of_bounds, None);
        assert_eq!(state.ball.position.x, state.ball.radius);
        assert!(state.ball.velocity.x > 0.0);
    }

    #[test]
    fn test_ball_off_the_pitch_restarts_inside() {
        let mut state = SimState::new(SimConfig::default());
        state.step(&idle());

        state.ball.place(Vec2::new(-10.0, 100.0));
        let events = state.step(&idle());
        assert_eq!(events.out_of_bounds, Some(OutOfBoundsKind::Sideline));
        assert_eq!(events.goal, None);
        assert_eq!(state.ball.position, Vec2::new(15.0, 100.0));
        assert_eq!(state.stats.out_of_bounds, 1);

        state.ball.place(Vec2::new(300.0, 610.0));
        let events = state.step(&idle());
        assert_eq!(events.out_of_bounds, Some(OutOfBoundsKind::Corner));
        assert_eq!(state.ball.position, Vec2::new(300.0, 585.0));
        assert_eq!(state.stats.out_of_bounds, 2);

        // back in play: nothing more to restart
        let events = state.step(&idle());
        assert_eq!(events.out_of_bounds, None);
        assert_eq!(state.stats.out_of_bounds, 2);
    }

    #[test]
    fn test_kick_takes_ball_lock() {
        let mut state = SimState::new(SimConfig::default());
        state.step(&idle());
        // both feet 10 from the ball
        state.players[0].place(Vec2::new(370.0, 260.0));
        state.players[1].place(Vec2::new(390.0, 260.0));
        state.ball.place(Vec2::new(400.0, 300.0));

        let kick = Intent::idle().request(BallRequest::Kick);
        let events = state.step(&[kick.clone(), kick]);
        assert_eq!(events.touches, [Some(BallRequest::Kick), None]);
        assert_eq!(state.stats.red.kicks, 1);
        assert_eq!(state.stats.blue.kicks, 0);
        assert!(state.ball.velocity.x > 0.0);
        assert_eq!(state.ticks_since_touch(0), Some(1));
        assert_eq!(state.ticks_since_touch(1), None);
    }

    #[test]
    fn test_possession_is_exclusive() {
        let mut state = SimState::new(SimConfig::default());
        state.step(&idle());
        state.players[0].place(Vec2::new(370.0, 260.0));
        state.players[1].place(Vec2::new(390.0, 260.0));
        state.ball.place(Vec2::new(400.0, 300.0));
        state.step(&idle());
        assert_eq!(state.owner, Some(1));
        assert!(!state.players[0].has_ball);
        assert!(state.players[1].has_ball);
        assert_eq!(state.stats.blue.possession_ticks, 1);
    }

    #[test]
    fn test_dribble_heading_follows_move() {
        let mut state = SimState::new(SimConfig::default());
        state.step(&idle());
        // foot (400, 300); ball just ahead
        state.players[0].place(Vec2::new(380.0, 260.0));
        state.ball.place(Vec2::new(410.0, 300.0));
        let dribble = Intent::idle().walk(Direction::Up).request(BallRequest::Dribble);
        let events = state.step(&[dribble, Intent::idle()]);
        assert_eq!(events.touches[0], Some(BallRequest::Dribble));
        assert!(state.ball.velocity.y < 0.0);
        assert_eq!(state.ball.velocity.x, 0.0);
        // dribbling does not close the ball-action gate
        assert_eq!(state.ticks_since_touch(0), None);
    }

    #[test]
    fn test_save_round_trip_through_state() {
        let mut state = SimState::new(SimConfig::default());
        for _ in 0..90 {
            state.step(&idle());
        }
        state.stadium.score_red = 2;
        let saved = state.to_saved();
        assert_eq!(saved.elapsed_ms, 1_500);

        let resumed = SimState::from_saved(SimConfig::default(), &saved).unwrap();
        assert_eq!(resumed.elapsed_ms(), 1_500);
        assert_eq!(resumed.stadium.score_red, 2);
        assert_eq!(resumed.players[1].position, state.players[1].position);
        assert_eq!(resumed.phase, MatchPhase::PreMatch);
    }

    #[test]
    fn test_save_during_celebration_uses_restart_layout() {
        let mut state = SimState::new(SimConfig::default());
        state.step(&idle());
        state.ball.place(Vec2::new(799.0, 300.0));
        state.ball.velocity = Vec2::new(3.0, 0.0);
        assert_eq!(state.step(&idle()).goal, Some(Team::Red));

        let saved = state.to_saved();
        assert_eq!(saved.ball, [400.0, 300.0]);
        assert_eq!(saved.red, RED_START);
        assert_eq!(saved.score_red, 1);
        assert!(saved.validate(&state.config).is_ok());
    }

    #[test]
    fn test_malformed_save_rejected() {
        let saved = SavedMatch {
            ball: [f32::NAN, 0.0],
            red: [100.0, 280.0],
            blue: [660.0, 280.0],
            score_red: 0,
            score_blue: 0,
            elapsed_ms: 0,
        };
        assert!(matches!(
            SimState::from_saved(SimConfig::default(), &saved),
            Err(ConfigError::MalformedSave(_))
        ));
    }

    #[test]
    fn test_resume_after_full_time_is_terminal() {
        let saved = SavedMatch {
            ball: [400.0, 300.0],
            red: [100.0, 280.0],
            blue: [660.0, 280.0],
            score_red: 1,
            score_blue: 0,
            elapsed_ms: MATCH_DURATION_MS,
        };
        let state = SimState::from_saved(SimConfig::default(), &saved).unwrap();
        assert!(state.is_terminal());
        assert_eq!(state.outcome(), MatchOutcome::RedWin);
    }
}
