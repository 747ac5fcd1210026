//! Optional parameter sets for sources and the listener.
//!
//! Every field is independently optional; only the ones that are set reach
//! the driver. Vector fields are kept as plain float lists and their lengths
//! are checked by `validate` before anything is forwarded.

use crate::error::{AlError, Result};
use crate::math::{Pose, Vec3};
use crate::sys::*;

fn check_len(parameter: &'static str, values: &Option<Vec<f32>>, expected: usize) -> Result<()> {
    match values {
        Some(v) if v.len() != expected => Err(AlError::VectorLength {
            parameter,
            expected,
            actual: v.len(),
        }),
        _ => Ok(()),
    }
}

/// Per-source settings accepted by `change_source` and `play`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceParams {
    pub looping: Option<bool>,
    pub gain: Option<f32>,
    pub pitch: Option<f32>,
    /// Playback offset in seconds
    pub time: Option<f32>,
    pub min_gain: Option<f32>,
    pub max_gain: Option<f32>,
    pub max_distance: Option<f32>,
    pub rolloff_factor: Option<f32>,
    pub cone_outer_gain: Option<f32>,
    /// Degrees
    pub cone_inner_angle: Option<f32>,
    /// Degrees
    pub cone_outer_angle: Option<f32>,
    pub reference_distance: Option<f32>,
    /// Exactly 3 floats
    pub position: Option<Vec<f32>>,
    /// Exactly 3 floats
    pub velocity: Option<Vec<f32>>,
    /// Exactly 3 floats
    pub direction: Option<Vec<f32>>,
}

impl SourceParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = Some(looping);
        self
    }

    pub fn gain(mut self, gain: f32) -> Self {
        self.gain = Some(gain);
        self
    }

    pub fn pitch(mut self, pitch: f32) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn time(mut self, seconds: f32) -> Self {
        self.time = Some(seconds);
        self
    }

    pub fn min_gain(mut self, gain: f32) -> Self {
        self.min_gain = Some(gain);
        self
    }

    pub fn max_gain(mut self, gain: f32) -> Self {
        self.max_gain = Some(gain);
        self
    }

    pub fn max_distance(mut self, distance: f32) -> Self {
        self.max_distance = Some(distance);
        self
    }

    pub fn rolloff_factor(mut self, factor: f32) -> Self {
        self.rolloff_factor = Some(factor);
        self
    }

    pub fn cone_outer_gain(mut self, gain: f32) -> Self {
        self.cone_outer_gain = Some(gain);
        self
    }

    pub fn cone_inner_angle(mut self, degrees: f32) -> Self {
        self.cone_inner_angle = Some(degrees);
        self
    }

    pub fn cone_outer_angle(mut self, degrees: f32) -> Self {
        self.cone_outer_angle = Some(degrees);
        self
    }

    pub fn reference_distance(mut self, distance: f32) -> Self {
        self.reference_distance = Some(distance);
        self
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = Some(position.to_array().to_vec());
        self
    }

    pub fn velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = Some(velocity.to_array().to_vec());
        self
    }

    pub fn direction(mut self, direction: Vec3) -> Self {
        self.direction = Some(direction.to_array().to_vec());
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_len("position", &self.position, 3)?;
        check_len("velocity", &self.velocity, 3)?;
        check_len("direction", &self.direction, 3)?;
        Ok(())
    }

    /// Set scalar fields paired with their driver parameter.
    pub(crate) fn scalars(&self) -> impl Iterator<Item = (ALenum, f32)> + '_ {
        [
            (AL_GAIN, self.gain),
            (AL_PITCH, self.pitch),
            (AL_SEC_OFFSET, self.time),
            (AL_MIN_GAIN, self.min_gain),
            (AL_MAX_GAIN, self.max_gain),
            (AL_MAX_DISTANCE, self.max_distance),
            (AL_ROLLOFF_FACTOR, self.rolloff_factor),
            (AL_CONE_OUTER_GAIN, self.cone_outer_gain),
            (AL_CONE_INNER_ANGLE, self.cone_inner_angle),
            (AL_CONE_OUTER_ANGLE, self.cone_outer_angle),
            (AL_REFERENCE_DISTANCE, self.reference_distance),
        ]
        .into_iter()
        .filter_map(|(param, value)| value.map(|v| (param, v)))
    }

    /// Set vector fields paired with their driver parameter.
    pub(crate) fn vectors(&self) -> impl Iterator<Item = (ALenum, &[f32])> + '_ {
        [
            (AL_POSITION, self.position.as_deref()),
            (AL_VELOCITY, self.velocity.as_deref()),
            (AL_DIRECTION, self.direction.as_deref()),
        ]
        .into_iter()
        .filter_map(|(param, value)| value.map(|v| (param, v)))
    }
}

/// Listener settings accepted by [`AlListener::change`](crate::AlListener::change).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListenerParams {
    pub gain: Option<f32>,
    /// Exactly 3 floats
    pub position: Option<Vec<f32>>,
    /// Exactly 3 floats
    pub velocity: Option<Vec<f32>>,
    /// Exactly 6 floats: forward ("at") vector, then up vector
    pub orientation: Option<Vec<f32>>,
}

impl ListenerParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gain(mut self, gain: f32) -> Self {
        self.gain = Some(gain);
        self
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = Some(position.to_array().to_vec());
        self
    }

    pub fn velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = Some(velocity.to_array().to_vec());
        self
    }

    pub fn orientation(mut self, forward: Vec3, up: Vec3) -> Self {
        let mut values = forward.to_array().to_vec();
        values.extend_from_slice(&up.to_array());
        self.orientation = Some(values);
        self
    }

    pub fn orientation_from_pose(mut self, pose: Pose) -> Self {
        self.orientation = Some(pose.orientation().to_vec());
        self
    }

    /// Sets both position and orientation from a pose.
    pub fn pose(self, pose: Pose) -> Self {
        self.position(pose.position).orientation_from_pose(pose)
    }

    pub fn validate(&self) -> Result<()> {
        check_len("position", &self.position, 3)?;
        check_len("velocity", &self.velocity, 3)?;
        check_len("orientation", &self.orientation, 6)?;
        Ok(())
    }

    pub(crate) fn vectors(&self) -> impl Iterator<Item = (ALenum, &[f32])> + '_ {
        [
            (AL_POSITION, self.position.as_deref()),
            (AL_VELOCITY, self.velocity.as_deref()),
            (AL_ORIENTATION, self.orientation.as_deref()),
        ]
        .into_iter()
        .filter_map(|(param, value)| value.map(|v| (param, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_params_yield_nothing() {
        let params = SourceParams::new();
        assert_eq!(params.scalars().count(), 0);
        assert_eq!(params.vectors().count(), 0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_only_set_scalars_are_forwarded() {
        let params = SourceParams::new().gain(0.5).time(1.25).reference_distance(2.0);
        let scalars: Vec<_> = params.scalars().collect();
        assert_eq!(
            scalars,
            vec![(AL_GAIN, 0.5), (AL_SEC_OFFSET, 1.25), (AL_REFERENCE_DISTANCE, 2.0)]
        );
    }

    #[test]
    fn test_wrong_length_source_vector_is_rejected() {
        let params = SourceParams {
            velocity: Some(vec![1.0, 2.0]),
            ..Default::default()
        };
        match params.validate() {
            Err(AlError::VectorLength {
                parameter,
                expected,
                actual,
            }) => {
                assert_eq!(parameter, "velocity");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_source_has_no_six_float_vector() {
        let params = SourceParams {
            direction: Some(vec![0.0; 6]),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_listener_orientation_needs_six_floats() {
        let params = ListenerParams {
            orientation: Some(vec![0.0, 0.0, -1.0]),
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(AlError::VectorLength { parameter: "orientation", expected: 6, actual: 3 })
        ));

        let params = ListenerParams::new().orientation(-Vec3::Z, Vec3::Y);
        assert!(params.validate().is_ok());
        assert_eq!(
            params.orientation.as_deref(),
            Some(&[0.0, 0.0, -1.0, 0.0, 1.0, 0.0][..])
        );
    }

    #[test]
    fn test_listener_pose_sets_position_and_orientation() {
        let pose = Pose::from_position(Vec3::new(1.0, 2.0, 3.0));
        let params = ListenerParams::new().pose(pose);
        assert_eq!(params.position.as_deref(), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(params.orientation.as_ref().map(Vec::len), Some(6));
        assert!(params.gain.is_none());
    }
}
