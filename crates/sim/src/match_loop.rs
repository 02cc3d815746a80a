use kickoff_shared::*;
use log::info;

use crate::controller::Controller;
use crate::error::MatchError;
use crate::intent::Intent;
use crate::physics::{SimState, TickEvents};

fn decide(controller: &mut Controller, state: &SimState, idx: usize) -> Result<Intent, MatchError> {
    controller
        .decide(state, idx)
        .map_err(|source| MatchError::PolicyUnavailable {
            side: state.players[idx].team,
            tick: state.tick,
            source,
        })
}

/// Ask both controllers (red first) for an intent, then advance one tick.
fn play_tick(
    state: &mut SimState,
    red: &mut Controller,
    blue: &mut Controller,
) -> Result<TickEvents, MatchError> {
    let intents = [decide(red, state, 0)?, decide(blue, state, 1)?];
    Ok(state.step(&intents))
}

/// Play `state` to the final whistle, recording a frame every `FRAME_INTERVAL` ticks.
fn play_recorded(
    config: &MatchConfig,
    state: &mut SimState,
    red: &mut Controller,
    blue: &mut Controller,
) -> Result<Replay, MatchError> {
    info!(
        "{} ({}) vs {} ({}) from {} ms",
        config.red_name,
        red.name(),
        config.blue_name,
        blue.name(),
        state.elapsed_ms()
    );

    let mut frames = vec![state.snapshot()];
    while !state.is_terminal() {
        play_tick(state, red, blue)?;
        if state.tick % FRAME_INTERVAL == 0 {
            frames.push(state.snapshot());
        }
    }
    if frames.last().map(|f| f.tick) != Some(state.tick) {
        frames.push(state.snapshot());
    }

    let result = state.result();
    info!(
        "full time: {} {}-{} {} ({:?})",
        config.red_name, result.score_red, result.score_blue, config.blue_name, result.outcome
    );

    Ok(Replay {
        config: config.clone(),
        frames,
        result,
    })
}

fn prepare(config: &MatchConfig, red: &Controller, blue: &Controller) -> Result<SimState, MatchError> {
    config.sim_config.validate()?;
    let mut state = SimState::new(config.sim_config);
    state.set_role(0, red.role());
    state.set_role(1, blue.role());
    Ok(state)
}

/// Run a deterministic match between two controllers.
pub fn run_match(
    config: &MatchConfig,
    red: &mut Controller,
    blue: &mut Controller,
) -> Result<Replay, MatchError> {
    let mut state = prepare(config, red, blue)?;
    play_recorded(config, &mut state, red, blue)
}

/// Step-at-a-time match for interactive front ends: owns its controllers and
/// can be paused into a [`SavedMatch`] and resumed later.
pub struct Match {
    config: MatchConfig,
    state: SimState,
    controllers: [Controller; 2],
}

impl Match {
    pub fn new(config: MatchConfig, red: Controller, blue: Controller) -> Result<Self, MatchError> {
        let state = prepare(&config, &red, &blue)?;
        Ok(Self {
            config,
            state,
            controllers: [red, blue],
        })
    }

    /// Continue from a saved snapshot. A malformed snapshot is fatal.
    pub fn resume(
        config: MatchConfig,
        saved: &SavedMatch,
        red: Controller,
        blue: Controller,
    ) -> Result<Self, MatchError> {
        let mut state = SimState::from_saved(config.sim_config, saved)?;
        state.set_role(0, red.role());
        state.set_role(1, blue.role());
        info!(
            "resuming at {} ms, {}-{}",
            saved.elapsed_ms, saved.score_red, saved.score_blue
        );
        Ok(Self {
            config,
            state,
            controllers: [red, blue],
        })
    }

    pub fn tick(&mut self) -> Result<TickEvents, MatchError> {
        let [red, blue] = &mut self.controllers;
        play_tick(&mut self.state, red, blue)
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn save(&self) -> SavedMatch {
        self.state.to_saved()
    }

    pub fn result(&self) -> MatchResult {
        self.state.result()
    }

    /// Play until `elapsed_ms` reaches `limit_ms` or the match ends.
    pub fn play_until(&mut self, limit_ms: u64) -> Result<(), MatchError> {
        while !self.is_finished() && self.state.elapsed_ms() < limit_ms {
            self.tick()?;
        }
        Ok(())
    }

    /// Play the rest of the match and return its replay.
    pub fn play_out(&mut self) -> Result<Replay, MatchError> {
        let [red, blue] = &mut self.controllers;
        play_recorded(&self.config, &mut self.state, red, blue)
    }
}
