//! Bounded fixed-interval polling.
//!
//! A condition is checked up to `max_attempts` times with a fixed sleep after
//! every unmet check. Exhausting the attempts is reported as
//! [`PollOutcome::TimedOut`] rather than an error; whether a timeout is
//! acceptable is the caller's decision. Errors raised by the condition abort
//! the poll immediately.

use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const COMMAND_COMPLETION_MAX_ATTEMPTS: u32 = 60;
pub const NLB_READINESS_MAX_ATTEMPTS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl PollPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub fn command_completion() -> Self {
        Self::new(COMMAND_COMPLETION_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL)
    }

    pub fn nlb_readiness() -> Self {
        Self::new(NLB_READINESS_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Met { attempts: u32 },
    TimedOut { attempts: u32 },
}

impl PollOutcome {
    pub fn is_met(self) -> bool {
        matches!(self, Self::Met { .. })
    }

    pub fn attempts(self) -> u32 {
        match self {
            Self::Met { attempts } | Self::TimedOut { attempts } => attempts,
        }
    }
}

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

pub fn poll_until<E>(
    policy: PollPolicy,
    sleeper: &dyn Sleeper,
    mut condition: impl FnMut() -> Result<bool, E>,
) -> Result<PollOutcome, E> {
    for attempt in 1..=policy.max_attempts {
        if condition()? {
            return Ok(PollOutcome::Met { attempts: attempt });
        }
        sleeper.sleep(policy.delay);
    }

    Ok(PollOutcome::TimedOut {
        attempts: policy.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    #[derive(Default)]
    struct RecordingSleeper {
        sleeps: RefCell<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.sleeps.borrow_mut().push(duration);
        }
    }

    #[test]
    fn returns_immediately_when_condition_already_holds() {
        let sleeper = RecordingSleeper::default();
        let outcome = poll_until(PollPolicy::nlb_readiness(), &sleeper, || {
            Ok::<_, String>(true)
        })
        .expect("poll should succeed");

        assert_eq!(outcome, PollOutcome::Met { attempts: 1 });
        assert!(sleeper.sleeps.borrow().is_empty());
    }

    #[test]
    fn stops_as_soon_as_condition_is_met() {
        let sleeper = RecordingSleeper::default();
        let checks = Cell::new(0u32);
        let outcome = poll_until(PollPolicy::nlb_readiness(), &sleeper, || {
            checks.set(checks.get() + 1);
            Ok::<_, String>(checks.get() == 4)
        })
        .expect("poll should succeed");

        assert_eq!(outcome, PollOutcome::Met { attempts: 4 });
        assert_eq!(checks.get(), 4);
        assert_eq!(sleeper.sleeps.borrow().len(), 3);
    }

    #[test]
    fn gives_up_after_max_attempts_with_one_sleep_per_attempt() {
        let sleeper = RecordingSleeper::default();
        let checks = Cell::new(0u32);
        let outcome = poll_until(PollPolicy::command_completion(), &sleeper, || {
            checks.set(checks.get() + 1);
            Ok::<_, String>(false)
        })
        .expect("timeout is not an error");

        assert_eq!(outcome, PollOutcome::TimedOut { attempts: 60 });
        assert_eq!(checks.get(), 60);
        assert_eq!(sleeper.sleeps.borrow().len(), 60);
        assert!(sleeper
            .sleeps
            .borrow()
            .iter()
            .all(|duration| *duration == DEFAULT_POLL_INTERVAL));
    }

    #[test]
    fn condition_errors_abort_polling() {
        let sleeper = RecordingSleeper::default();
        let checks = Cell::new(0u32);
        let error = poll_until(PollPolicy::nlb_readiness(), &sleeper, || {
            checks.set(checks.get() + 1);
            if checks.get() == 3 {
                Err("throttled".to_string())
            } else {
                Ok(false)
            }
        })
        .expect_err("error should propagate");

        assert_eq!(error, "throttled");
        assert_eq!(sleeper.sleeps.borrow().len(), 2);
    }

    #[test]
    fn zero_attempts_times_out_without_checking() {
        let sleeper = RecordingSleeper::default();
        let outcome = poll_until(
            PollPolicy::new(0, DEFAULT_POLL_INTERVAL),
            &sleeper,
            || -> Result<bool, String> { panic!("condition must not run") },
        )
        .expect("poll should succeed");

        assert_eq!(outcome, PollOutcome::TimedOut { attempts: 0 });
    }
}
