//! The automation host seen from the parameter store.
//!
//! The host adapter (CLAP, VST3, AU or a standalone shell) owns the
//! per-parameter automation plumbing. The store only needs to tell it which
//! parameters exist and when a value changed outside the host's own
//! automation, so that the change reaches the audio path and any host UI.

use crate::param_info::ParamDescriptor;

/// Automation host collaborator.
///
/// Implementations must be cheap and non-blocking: the store calls them from
/// the control thread once per changed parameter.
pub trait ParameterHost: Send + Sync {
    /// Announces a parameter. Called once per descriptor when a store is built.
    fn register_parameter(&self, descriptor: &ParamDescriptor);

    /// Publishes a new plain value for `id` to the host and its observers.
    fn set_value_notifying_observers(&self, id: &str, value: f32);
}

/// Host that ignores every call. Useful for tests and headless tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl ParameterHost for NullHost {
    fn register_parameter(&self, _descriptor: &ParamDescriptor) {}

    fn set_value_notifying_observers(&self, _id: &str, _value: f32) {}
}
