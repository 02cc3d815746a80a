use std::path::Path;

use color_eyre::eyre::{bail, Result, WrapErr};
use kickoff_shared::{GameConfig, Role, SimConfig};
use kickoff_sim::{ChaserPolicy, Controller, IdlePolicy, KeyScript, OnnxPolicy, Policy};

pub const CONTROLLER_HELP: &str =
    "striker, defender, chaser, idle, human:<keys.json> or onnx:<model.onnx>";

/// Resolve a numeric policy: `chaser`, `idle` or `onnx:<model.onnx>`.
pub fn resolve_policy(spec: &str, config: &SimConfig) -> Result<Box<dyn Policy>> {
    match spec {
        "chaser" => Ok(Box::new(ChaserPolicy::for_config(config))),
        "idle" => Ok(Box::new(IdlePolicy)),
        other => match other.strip_prefix("onnx:") {
            Some(path) => {
                let policy = OnnxPolicy::load(Path::new(path))
                    .wrap_err_with(|| format!("loading ONNX policy from {path}"))?;
                Ok(Box::new(policy))
            }
            None => bail!("unknown policy '{other}' (expected chaser, idle or onnx:<model.onnx>)"),
        },
    }
}

/// Resolve a controller name from the command line.
pub fn resolve_controller(spec: &str, config: &GameConfig) -> Result<Controller> {
    match spec {
        "striker" => Ok(Controller::scripted(Role::Striker, &config.sim)),
        "defender" => Ok(Controller::scripted(Role::Defender, &config.sim)),
        "chaser" | "idle" => Ok(Controller::Policy(resolve_policy(spec, &config.sim)?)),
        other => {
            if let Some(path) = other.strip_prefix("human:") {
                let script = KeyScript::load(Path::new(path), config.bindings.clone())
                    .wrap_err_with(|| format!("loading key script {path}"))?;
                return Ok(Controller::human(script));
            }
            if other.starts_with("onnx:") {
                return Ok(Controller::Policy(resolve_policy(other, &config.sim)?));
            }
            bail!("unknown controller '{other}' (expected {CONTROLLER_HELP})")
        }
    }
}
