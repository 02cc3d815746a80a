pub mod ball;
pub mod behavior;
pub mod controller;
pub mod env;
pub mod error;
pub mod geometry;
pub mod intent;
pub mod match_loop;
pub mod observation;
pub mod onnx;
pub mod physics;
pub mod player;
pub mod policy;
pub mod possession;
pub mod stadium;
pub mod team;

pub use ball::Ball;
pub use controller::{Controller, InputSource, KeyScript, ScriptedAgent};
pub use env::{rollout, CurriculumPhase, EpisodeSummary, FootballEnv, RewardWeights, StepResult};
pub use error::{MatchError, PolicyError};
pub use intent::{BallRequest, Intent};
pub use match_loop::*;
pub use onnx::OnnxPolicy;
pub use physics::*;
pub use player::Player;
pub use policy::*;
pub use stadium::Stadium;
