//! The per-context listener.

use crate::dispatch::DispatchTable;
use crate::error::Result;
use crate::math::{Vec3, vec3_from_slice};
use crate::params::ListenerParams;
use crate::sys::*;

/// View of the context's listener. All listener state lives in the driver,
/// so this only borrows the dispatch table.
pub struct AlListener<'a> {
    table: &'a DispatchTable,
}

impl<'a> AlListener<'a> {
    pub(crate) fn new(table: &'a DispatchTable) -> Self {
        Self { table }
    }

    /// Forwards the set fields of `params`. Nothing is forwarded if any vector
    /// has the wrong length.
    pub fn change(&self, params: &ListenerParams) -> Result<()> {
        params.validate()?;
        // SAFETY: vectors were validated to match what each parameter reads.
        unsafe {
            if let Some(gain) = params.gain {
                (self.table.listener_f)(AL_GAIN, gain);
            }
            for (param, values) in params.vectors() {
                (self.table.listener_fv)(param, values.as_ptr());
            }
        }
        log::debug!("Listener updated: {:?}", params);
        Ok(())
    }

    pub fn gain(&self) -> f32 {
        let mut gain: ALfloat = 0.0;
        // SAFETY: out-pointer to one float.
        unsafe { (self.table.get_listener_f)(AL_GAIN, &mut gain) };
        gain
    }

    pub fn position(&self) -> Vec3 {
        self.vector(AL_POSITION)
    }

    pub fn velocity(&self) -> Vec3 {
        self.vector(AL_VELOCITY)
    }

    /// Forward and up vectors.
    pub fn orientation(&self) -> (Vec3, Vec3) {
        let mut values = [0.0 as ALfloat; 6];
        // SAFETY: room for the six orientation floats.
        unsafe { (self.table.get_listener_fv)(AL_ORIENTATION, values.as_mut_ptr()) };
        (vec3_from_slice(&values[..3]), vec3_from_slice(&values[3..]))
    }

    fn vector(&self, param: ALenum) -> Vec3 {
        let mut values = [0.0 as ALfloat; 3];
        // SAFETY: room for three floats.
        unsafe { (self.table.get_listener_fv)(param, values.as_mut_ptr()) };
        vec3_from_slice(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AlContext;
    use crate::driver_fake::{self, FakeDriver};
    use crate::error::AlError;
    use crate::math::Pose;

    fn open_fake() -> AlContext {
        let _ = env_logger::builder().is_test(true).try_init();
        AlContext::open_with(FakeDriver::new(), None).expect("fake driver must open")
    }

    #[test]
    fn test_change_and_read_back() {
        let context = open_fake();
        let listener = context.listener();
        let params = ListenerParams::new()
            .gain(0.8)
            .position(Vec3::new(1.0, 0.0, -2.0))
            .velocity(Vec3::new(0.0, 0.0, 3.0));
        listener.change(&params).unwrap();

        assert_eq!(listener.gain(), 0.8);
        assert_eq!(listener.position(), Vec3::new(1.0, 0.0, -2.0));
        assert_eq!(listener.velocity(), Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_orientation_from_pose() {
        let context = open_fake();
        let pose = Pose::looking_at(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0));
        context
            .listener()
            .change(&ListenerParams::new().orientation_from_pose(pose))
            .unwrap();

        let (forward, up) = context.listener().orientation();
        assert!(forward.abs_diff_eq(Vec3::X, 1e-5));
        assert!(up.abs_diff_eq(Vec3::Y, 1e-5));
        // position was not part of the update
        assert!(driver_fake::with_state(|s| !s.listener.contains_key(&AL_POSITION)));
    }

    #[test]
    fn test_bad_orientation_issues_no_driver_call() {
        let context = open_fake();
        driver_fake::clear_calls();
        let params = ListenerParams {
            gain: Some(0.5),
            orientation: Some(vec![0.0; 3]),
            ..Default::default()
        };
        assert!(matches!(
            context.listener().change(&params),
            Err(AlError::VectorLength { expected: 6, .. })
        ));
        assert!(driver_fake::calls().is_empty());
    }

    #[test]
    fn test_unset_fields_are_not_forwarded() {
        let context = open_fake();
        driver_fake::clear_calls();
        context.listener().change(&ListenerParams::new().gain(0.1)).unwrap();
        assert_eq!(driver_fake::calls(), vec!["alListenerf"]);
    }
}
