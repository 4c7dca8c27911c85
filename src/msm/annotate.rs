//! Mapping between discrete MSM states and upstream pharmacophore states.
//!
//! This is an extension point: the signature is fixed so callers can wire it
//! into their workflows, but no mapping strategy exists yet and the function
//! reports `MsmError::NotImplemented` instead of returning an empty result.
use crate::msm::errors::{MsmError, MsmResult};
use crate::trajectory::DiscreteTrajectory;

/// External description of the pharmacophore states a trajectory was parsed
/// from, one entry per superfeature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateMetadata {
    pub superfeatures: Vec<String>,
}

/// Annotation of each discrete state with the superfeatures it represents.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateAnnotation {
    pub by_state: Vec<Vec<String>>,
}

/// Annotate discrete states with pharmacophore metadata.
///
/// # Errors
/// - Always `MsmError::NotImplemented` for now.
pub fn map_pharmacophore_states(
    _traj: &DiscreteTrajectory, _metadata: &StateMetadata,
) -> MsmResult<StateAnnotation> {
    Err(MsmError::NotImplemented { hook: "map_pharmacophore_states" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The hook reports itself as unimplemented rather than succeeding silently.
    //
    // Given
    // -----
    // - Any trajectory and empty metadata.
    //
    // Expect
    // ------
    // - NotImplemented { hook: "map_pharmacophore_states" }.
    fn annotation_hook_is_explicitly_unimplemented() {
        let traj = DiscreteTrajectory::new(array![0, 1, 0], 2).expect("valid labels");

        let err = map_pharmacophore_states(&traj, &StateMetadata::default()).expect_err("stub");

        assert_eq!(err, MsmError::NotImplemented { hook: "map_pharmacophore_states" });
    }
}
