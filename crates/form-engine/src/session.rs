//! Linear current-step state machine for one editing session
//!
//! The session is in-memory only; persisted state lives with the document.
//! Backward navigation is always free. Forward navigation requires the
//! current step to validate, and a step's completed mark survives later
//! backward exploration until a fresh forward validation of it fails.

use crate::steps::{steps_of, FormStep};
use crate::validate::{validate_step, StepValidation};
use serde::Serialize;
use shared_types::{Answers, FormField, Template};
use std::collections::BTreeSet;
use thiserror::Error;

/// Outcome of a successful forward move
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "progress", rename_all = "snake_case")]
pub enum Progress {
    /// Moved forward; now at this step
    Advanced { step: u32 },
    /// Validated past the last step; ready for export
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("step {0} does not exist")]
    NoSuchStep(u32),
    #[error("step {0} has not been reached yet")]
    NotYetReached(u32),
}

pub struct FormSession {
    steps: Vec<FormStep>,
    current: u32,
    completed: BTreeSet<u32>,
}

impl FormSession {
    pub fn new(template: &Template) -> Self {
        Self {
            steps: steps_of(template),
            current: 1,
            completed: BTreeSet::new(),
        }
    }

    pub fn step_count(&self) -> u32 {
        self.steps.len() as u32
    }

    pub fn current_step(&self) -> u32 {
        self.current
    }

    pub fn completed_steps(&self) -> Vec<u32> {
        self.completed.iter().copied().collect()
    }

    pub fn is_completed(&self, step: u32) -> bool {
        self.completed.contains(&step)
    }

    /// Fields of the current step, empty past the end of the form
    pub fn current_fields(&self) -> &[FormField] {
        self.steps
            .get(self.current as usize - 1)
            .map(|s| s.fields.as_slice())
            .unwrap_or(&[])
    }

    /// Validate the current step against `answers` and move forward.
    ///
    /// On failure the session stays put, the step's completed mark is
    /// cleared, and the failures are returned for the caller to surface.
    /// Advancing past the last step reports [`Progress::Finished`] — the
    /// cue to hand off to export.
    pub fn advance(&mut self, answers: &Answers) -> Result<Progress, StepValidation> {
        let validation = validate_step(self.current_fields(), answers);
        if !validation.ok {
            self.completed.remove(&self.current);
            return Err(validation);
        }

        self.completed.insert(self.current);
        if self.current >= self.step_count() {
            Ok(Progress::Finished)
        } else {
            self.current += 1;
            Ok(Progress::Advanced { step: self.current })
        }
    }

    /// Step back one step; never validates
    pub fn back(&mut self) -> u32 {
        if self.current > 1 {
            self.current -= 1;
        }
        self.current
    }

    /// Jump to an earlier or already-completed step without validation
    pub fn go_to(&mut self, step: u32) -> Result<u32, NavigationError> {
        if step < 1 || step > self.step_count() {
            return Err(NavigationError::NoSuchStep(step));
        }
        if step > self.current && !self.completed.contains(&step) {
            return Err(NavigationError::NotYetReached(step));
        }
        self.current = step;
        Ok(step)
    }
}
