use crate::state::step::{StepDefinition, StepStatus};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("step {index} is out of range (wizard has {len} steps)")]
    OutOfRange { index: usize, len: usize },
    #[error("cannot jump ahead to step {target} from step {current}")]
    AheadOfCurrent { target: usize, current: usize },
    #[error("a submission is in flight")]
    SubmissionInFlight,
    #[error("the wizard has already been submitted")]
    Completed,
}

/// Ordered steps with a bounded cursor. Never skips forward on its own.
#[derive(Debug)]
pub struct Flow {
    steps: Vec<StepDefinition>,
    current: usize,
    statuses: Vec<StepStatus>,
}

impl Flow {
    pub fn new(steps: Vec<StepDefinition>) -> Self {
        let mut statuses = vec![StepStatus::Pending; steps.len()];
        if let Some(first) = statuses.first_mut() {
            *first = StepStatus::Active;
        }
        Self {
            steps,
            current: 0,
            statuses,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&StepDefinition> {
        self.steps.get(index)
    }

    pub fn status_at(&self, index: usize) -> StepStatus {
        self.statuses
            .get(index)
            .copied()
            .unwrap_or(StepStatus::Pending)
    }

    pub fn current_status(&self) -> StepStatus {
        self.status_at(self.current)
    }

    pub fn complete_current(&mut self) {
        if let Some(status) = self.statuses.get_mut(self.current) {
            *status = StepStatus::Done;
        }
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.steps.len()
    }

    pub fn is_terminal(&self) -> bool {
        !self.has_next()
    }

    pub fn advance(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.complete_current();
        self.current += 1;
        if let Some(status) = self.statuses.get_mut(self.current) {
            *status = StepStatus::Active;
        }
        true
    }

    pub fn retreat(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.leave_current();
        self.current -= 1;
        if let Some(status) = self.statuses.get_mut(self.current) {
            *status = StepStatus::Active;
        }
        true
    }

    /// Moves back to an already reached step. Steps after the target keep
    /// their `Done` mark.
    pub fn jump_to(&mut self, index: usize) -> Result<(), NavigationError> {
        if index >= self.steps.len() {
            return Err(NavigationError::OutOfRange {
                index,
                len: self.steps.len(),
            });
        }
        if index > self.current {
            return Err(NavigationError::AheadOfCurrent {
                target: index,
                current: self.current,
            });
        }
        if index != self.current {
            self.leave_current();
            self.current = index;
        }
        if let Some(status) = self.statuses.get_mut(self.current) {
            *status = StepStatus::Active;
        }
        Ok(())
    }

    fn leave_current(&mut self) {
        if let Some(status) = self.statuses.get_mut(self.current) {
            if *status == StepStatus::Active {
                *status = StepStatus::Pending;
            }
        }
    }

    pub fn reset(&mut self) {
        self.current = 0;
        for (index, status) in self.statuses.iter_mut().enumerate() {
            *status = if index == 0 {
                StepStatus::Active
            } else {
                StepStatus::Pending
            };
        }
    }

    pub fn progress_percentage(&self) -> f32 {
        if self.steps.is_empty() {
            return 0.0;
        }
        ((self.current + 1) as f32 / self.steps.len() as f32) * 100.0
    }

    pub fn current_step(&self) -> &StepDefinition {
        &self.steps[self.current]
    }
}
