use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Pipeline lifecycle states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Idle,
    Running {
        #[serde(skip)]
        started_at: Option<Instant>,
    },
    Stopped {
        #[serde(skip)]
        ran_for: Option<Duration>,
    },
    Faulted {
        error_msg: String,
    },
}

impl PipelineState {
    /// Check if transition from current state to target state is valid
    pub fn can_transition_to(&self, target: &PipelineState) -> bool {
        use PipelineState::*;

        matches!(
            (self, target),
            (Idle, Running { .. })
                | (Running { .. }, Stopped { .. })
                | (Running { .. }, Faulted { .. })
                | (Faulted { .. }, Stopped { .. })
        )
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Get human-readable state name
    pub fn name(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::Running { .. } => "Running",
            Self::Stopped { .. } => "Stopped",
            Self::Faulted { .. } => "Faulted",
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        let idle = PipelineState::Idle;
        let running = PipelineState::Running { started_at: None };
        let stopped = PipelineState::Stopped { ran_for: None };

        assert!(idle.can_transition_to(&running));
        assert!(running.can_transition_to(&stopped));
        assert!(!stopped.can_transition_to(&running));
        assert!(!idle.can_transition_to(&stopped));
    }

    #[test]
    fn test_fault_path() {
        let running = PipelineState::Running { started_at: None };
        let faulted = PipelineState::Faulted {
            error_msg: "source disconnected".to_string(),
        };
        let stopped = PipelineState::Stopped { ran_for: None };

        assert!(running.can_transition_to(&faulted));
        assert!(faulted.can_transition_to(&stopped));
        assert!(!faulted.can_transition_to(&running));
    }

    #[test]
    fn test_state_names() {
        assert_eq!(PipelineState::Idle.name(), "Idle");
        assert_eq!(PipelineState::default(), PipelineState::Idle);
    }
}
