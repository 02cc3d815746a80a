use std::path::Path;

use kickoff_shared::{Action, Observation, ACTION_COUNT, MAX_MODEL_SIZE_BYTES, OBS_SIZE};
use ort::session::Session;
use ort::tensor::TensorElementType;
use ort::value::{Tensor, ValueType};

use crate::error::PolicyError;
use crate::policy::Policy;

// ---------------------------------------------------------------------------
// Shape checks
// ---------------------------------------------------------------------------

/// `[1, width]` or `[-1, width]` (dynamic batch).
fn batch_of(dims: &[i64], width: usize) -> bool {
    dims.len() == 2 && (dims[0] == 1 || dims[0] == -1) && dims[1] == width as i64
}

fn check_tensor(dtype: &ValueType, width: usize, what: &str) -> Result<Vec<i64>, PolicyError> {
    match dtype {
        ValueType::Tensor { ty, shape, .. } => {
            let dims: Vec<i64> = shape.iter().copied().collect();
            if *ty != TensorElementType::Float32 || !batch_of(&dims, width) {
                return Err(PolicyError::BadModel(format!(
                    "{what} must be float32 [1, {width}], got {ty:?} {dims:?}"
                )));
            }
            Ok(dims)
        }
        _ => Err(PolicyError::BadModel(format!("{what} is not a tensor"))),
    }
}

/// Index of the largest logit; the first maximum wins. NaN means the
/// network is broken and no action is returned.
pub fn pick_action(logits: &[f32]) -> Result<Action, PolicyError> {
    if logits.len() < ACTION_COUNT {
        return Err(PolicyError::Unavailable(format!(
            "{} logits, expected {ACTION_COUNT}",
            logits.len()
        )));
    }
    let logits = &logits[..ACTION_COUNT];
    if logits.iter().any(|v| v.is_nan()) {
        return Err(PolicyError::Unavailable("NaN logits".into()));
    }

    let mut best = 0;
    for (i, v) in logits.iter().enumerate() {
        if *v > logits[best] {
            best = i;
        }
    }
    Ok(Action::from_raw(best as i64))
}

// ---------------------------------------------------------------------------
// OnnxPolicy
// ---------------------------------------------------------------------------

/// An exported policy network run through ONNX Runtime. Takes the six-float
/// observation as a `[1, 6]` tensor and returns six action logits.
pub struct OnnxPolicy {
    session: Session,
    name: String,
}

impl std::fmt::Debug for OnnxPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxPolicy").field("name", &self.name).finish()
    }
}

impl OnnxPolicy {
    /// Load a model and check its input and output shapes before any play.
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let size = std::fs::metadata(path)?.len();
        if size > MAX_MODEL_SIZE_BYTES {
            return Err(PolicyError::BadModel(format!(
                "{} is {size} bytes (max {MAX_MODEL_SIZE_BYTES})",
                path.display()
            )));
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("onnx")
            .to_string();

        let session = Session::builder()
            .map_err(|e| PolicyError::BadModel(e.to_string()))?
            .commit_from_file(path)
            .map_err(|e| PolicyError::BadModel(e.to_string()))?;

        let inputs = session.inputs();
        let input = inputs
            .first()
            .ok_or_else(|| PolicyError::BadModel("model has no inputs".into()))?;
        check_tensor(input.dtype(), OBS_SIZE, "input")?;

        let outputs = session.outputs();
        let output = outputs
            .first()
            .ok_or_else(|| PolicyError::BadModel("model has no outputs".into()))?;
        check_tensor(output.dtype(), ACTION_COUNT, "output")?;

        Ok(Self { session, name })
    }
}

impl Policy for OnnxPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn act(&mut self, obs: &Observation) -> Result<Action, PolicyError> {
        let input = Tensor::from_array(([1usize, OBS_SIZE], obs.data.to_vec().into_boxed_slice()))
            .map_err(|e| PolicyError::Unavailable(format!("input tensor: {e}")))?;

        let outputs = self
            .session
            .run(ort::inputs![input])
            .map_err(|e| PolicyError::Unavailable(format!("{}: inference failed: {e}", self.name)))?;

        let (_shape, logits) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| PolicyError::Unavailable(format!("output tensor: {e}")))?;
        pick_action(logits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_shapes() {
        assert!(batch_of(&[1, 6], OBS_SIZE));
        assert!(batch_of(&[-1, 6], OBS_SIZE));
        assert!(!batch_of(&[2, 6], OBS_SIZE));
        assert!(!batch_of(&[1, 46], OBS_SIZE));
        assert!(!batch_of(&[6], OBS_SIZE));
        assert!(!batch_of(&[1, 1, 6], OBS_SIZE));
    }

    #[test]
    fn test_pick_action() {
        assert_eq!(pick_action(&[0.0, 0.1, 0.2, 3.0, 0.4, 0.5]).unwrap(), Action::Left);
        assert_eq!(pick_action(&[0.0, 0.0, 0.0, 0.0, 0.0, 9.0]).unwrap(), Action::Kick);
        // ties go to the first maximum
        assert_eq!(pick_action(&[1.0; ACTION_COUNT]).unwrap(), Action::Noop);
        assert_eq!(pick_action(&[0.0, 2.0, 2.0, 0.0, 0.0, 0.0]).unwrap(), Action::Up);
    }

    #[test]
    fn test_broken_logits_have_no_action() {
        let nan = [0.0, f32::NAN, 0.0, 0.0, 0.0, 0.0];
        assert!(matches!(pick_action(&nan), Err(PolicyError::Unavailable(_))));
        assert!(matches!(pick_action(&[1.0, 2.0]), Err(PolicyError::Unavailable(_))));
    }

    #[test]
    fn test_load_rejects_missing_and_garbage_files() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            OnnxPolicy::load(&dir.path().join("missing.onnx")),
            Err(PolicyError::Io(_))
        ));

        let garbage = dir.path().join("garbage.onnx");
        std::fs::write(&garbage, b"definitely not a protobuf").unwrap();
        assert!(OnnxPolicy::load(&garbage).is_err());
    }
}
