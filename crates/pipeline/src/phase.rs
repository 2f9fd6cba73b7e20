//! Generation-loop phase transitions.
//!
//! The image-generation retry loop is driven by a small explicit state
//! machine so the transition rules (when to retry, how long to wait, when
//! to give up) are testable without any model calls or sleeping.

use std::time::Duration;

use crate::types::RetryPolicy;

/// Where the generation loop stands after each model attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    /// Attempt `attempt` is about to run (1-based).
    Generating { attempt: u32 },
    /// Attempt failed; wait `delay`, then run `next_attempt`.
    Retrying { next_attempt: u32, delay: Duration },
    /// All attempts exhausted (or cancelled); copy the source photo.
    Fallback,
}

impl GenerationPhase {
    /// Initial phase.
    #[must_use]
    pub fn start() -> Self {
        Self::Generating { attempt: 1 }
    }

    /// Transition after a retryable failure of attempt `attempt`.
    #[must_use]
    pub fn after_failure(attempt: u32, policy: &RetryPolicy) -> Self {
        if attempt >= policy.max_retries {
            Self::Fallback
        } else {
            Self::Retrying {
                next_attempt: attempt + 1,
                delay: policy.delay_after(attempt),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_first_attempt() {
        assert_eq!(GenerationPhase::start(), GenerationPhase::Generating { attempt: 1 });
    }

    #[test]
    fn failure_before_limit_schedules_linear_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(
            GenerationPhase::after_failure(1, &policy),
            GenerationPhase::Retrying {
                next_attempt: 2,
                delay: Duration::from_secs(1),
            }
        );
        assert_eq!(
            GenerationPhase::after_failure(2, &policy),
            GenerationPhase::Retrying {
                next_attempt: 3,
                delay: Duration::from_secs(2),
            }
        );
    }

    #[test]
    fn failure_at_limit_falls_back() {
        let policy = RetryPolicy::default();
        assert_eq!(GenerationPhase::after_failure(3, &policy), GenerationPhase::Fallback);
    }

    #[test]
    fn single_attempt_policy_never_retries() {
        let policy = RetryPolicy {
            max_retries: 1,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(GenerationPhase::after_failure(1, &policy), GenerationPhase::Fallback);
    }
}
