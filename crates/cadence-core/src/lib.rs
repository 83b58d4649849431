//! Cadence Core - parameter definitions and live parameter state
//!
//! This crate holds everything a plugin needs to describe its parameters and
//! to keep their current values: the immutable catalog, value ranges with
//! snapping and skewed normalization, text conversion, and a lock-free store
//! that can be snapshotted and restored as a [`StateTree`].
//!
//! # Core Abstractions
//!
//! ## Parameter Catalog
//!
//! - [`ParamDescriptor`] - Immutable definition of one parameter
//! - [`ParamRange`] - Plain value range with step and skew
//! - [`ParameterSet`] - Validated, process-lifetime collection of descriptors
//!
//! ## Live State
//!
//! - [`ParameterStore`] - Current values, readable from the audio thread
//! - [`StateTree`] - Deep-copied snapshot used by presets
//! - [`ParameterHost`] - Automation host collaborator notified on every write
//!
//! ## Utilities
//!
//! - Text converters in [`text`]: [`text::float_to_text`], [`text::choice_to_text`], etc.
//! - [`skew_factor`] for ranges centred on a chosen value
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{ParamDescriptor, ParamRange, ParameterSet, ParameterStore};
//!
//! let parameters = ParameterSet::new(vec![
//!     ParamDescriptor::gain_db("gain", "Gain", -60.0, 12.0, 0.0),
//!     ParamDescriptor::new("cutoff", "Cutoff", ParamRange::with_centre(20.0, 20000.0, 1000.0).unwrap(), 1000.0)
//!         .with_label("Hz"),
//!     ParamDescriptor::toggle("bypass", "Bypass", false),
//! ])
//! .unwrap();
//!
//! let store = ParameterStore::detached(parameters);
//! store.set("gain", -6.0);
//!
//! let snapshot = store.snapshot();
//! store.reset();
//! assert_eq!(store.get("gain"), Some(0.0));
//!
//! store.restore(&snapshot);
//! assert_eq!(store.get("gain"), Some(-6.0));
//! ```

pub mod error;
pub mod host;
pub mod param_info;
pub mod param_set;
pub mod range;
pub mod state;
pub mod store;
pub mod text;

// Re-export main types at crate root
pub use error::ParamError;
pub use host::{NullHost, ParameterHost};
pub use param_info::{ParamCategory, ParamDescriptor, ParamFlags};
pub use param_set::ParameterSet;
pub use range::{ParamRange, skew_factor};
pub use state::{DEFAULT_STATE_KIND, StateReport, StateTree};
pub use store::ParameterStore;
