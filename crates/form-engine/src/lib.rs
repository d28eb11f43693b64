//! Multi-step form engine
//!
//! Partitions a template's fields into ordered steps, validates a step's
//! answers against the declared per-field constraints, and drives the
//! linear current-step state machine of one editing session.

pub mod session;
pub mod steps;
pub mod validate;

pub use session::{FormSession, NavigationError, Progress};
pub use steps::{steps_of, FormStep};
pub use validate::{validate_step, FieldFailure, StepValidation};
