//! Bounded retry strategies and predicates for transient failures.
//!
//! A [`RetryStrategy`] decides how many attempts a request gets and how long
//! to wait between them. A [`RetryPredicate`] can narrow which transient
//! failures are retried. Neither can make the executor retry an HTTP status
//! error, a malformed body or an unknown failure.

use crate::error::{ApiError, ErrorKind};
use rand::Rng;
use std::time::Duration;

/// Defines how many attempts a request gets and the delay between them.
///
/// `max_attempts` always counts the total number of attempts, including the
/// first one.
///
/// # Examples
///
/// ```
/// use safecall::RetryStrategy;
/// use std::time::Duration;
///
/// // A single attempt
/// let no_retry = RetryStrategy::None;
///
/// // Three attempts, one second apart
/// let fixed = RetryStrategy::Fixed {
///     delay: Duration::from_secs(1),
///     max_attempts: 3,
/// };
///
/// // Five attempts with delays of 100ms, 200ms, 400ms, 800ms
/// let exponential = RetryStrategy::ExponentialBackoff {
///     initial_delay: Duration::from_millis(100),
///     max_delay: Duration::from_secs(30),
///     max_attempts: 5,
///     jitter: true,
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub enum RetryStrategy {
    /// Make exactly one attempt.
    #[default]
    None,

    /// Wait the same delay before every retry.
    Fixed {
        /// The delay between attempts.
        delay: Duration,
        /// The total number of attempts.
        max_attempts: usize,
    },

    /// Retry with exponentially increasing delays.
    ///
    /// The wait after attempt `n` is `initial_delay * 2^(n - 1)`, capped at
    /// `max_delay`. Jitter scales each delay to between 50% and 100%.
    ExponentialBackoff {
        /// The delay after the first attempt.
        initial_delay: Duration,
        /// The maximum delay between attempts.
        max_delay: Duration,
        /// The total number of attempts.
        max_attempts: usize,
        /// Whether to add random jitter to delays.
        jitter: bool,
    },

    /// Delay computed by a function, still bounded by `max_attempts`.
    Custom {
        /// Takes the number of attempts made so far (1-indexed) and returns
        /// the delay before the next one, or `None` to stop early.
        delay_fn: fn(attempt: usize) -> Option<Duration>,
        /// The total number of attempts.
        max_attempts: usize,
    },
}

impl RetryStrategy {
    /// Returns the delay to wait after `attempt` failed, or `None` if no
    /// attempts remain.
    ///
    /// # Arguments
    ///
    /// * `attempt` - The number of attempts made so far (1-indexed)
    pub fn delay_for_attempt(&self, attempt: usize) -> Option<Duration> {
        if attempt >= self.max_attempts() {
            return None;
        }

        match self {
            RetryStrategy::None => None,
            RetryStrategy::Fixed { delay, .. } => Some(*delay),
            RetryStrategy::ExponentialBackoff {
                initial_delay,
                max_delay,
                jitter,
                ..
            } => {
                let multiplier = 2u32.saturating_pow(attempt.saturating_sub(1) as u32);
                let delay = initial_delay.saturating_mul(multiplier).min(*max_delay);

                if *jitter {
                    let jitter_factor = rand::thread_rng().gen_range(0.5..=1.0);
                    Some(delay.mul_f64(jitter_factor))
                } else {
                    Some(delay)
                }
            }
            RetryStrategy::Custom { delay_fn, .. } => delay_fn(attempt),
        }
    }

    /// Returns the total number of attempts this strategy allows.
    pub fn max_attempts(&self) -> usize {
        match self {
            RetryStrategy::None => 1,
            RetryStrategy::Fixed { max_attempts, .. }
            | RetryStrategy::ExponentialBackoff { max_attempts, .. }
            | RetryStrategy::Custom { max_attempts, .. } => *max_attempts,
        }
    }
}

/// Narrows which transient failures are retried.
///
/// The executor only consults the predicate for transient failures
/// (connection failures and timeouts), so a predicate can veto a retry but
/// never force one.
///
/// # Examples
///
/// ```
/// use safecall::{ApiError, RetryPredicate};
///
/// struct FirstAttemptOnly;
///
/// impl RetryPredicate for FirstAttemptOnly {
///     fn should_retry(&self, _error: &ApiError, attempt: usize) -> bool {
///         attempt == 1
///     }
/// }
/// ```
pub trait RetryPredicate: Send + Sync {
    /// Returns `true` if the request should be attempted again.
    ///
    /// # Arguments
    ///
    /// * `error` - The failure of the attempt that just finished
    /// * `attempt` - The number of attempts made so far (1-indexed)
    fn should_retry(&self, error: &ApiError, attempt: usize) -> bool;
}

/// Retry every transient failure. This is the default.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnTransient;

impl RetryPredicate for RetryOnTransient {
    fn should_retry(&self, error: &ApiError, _attempt: usize) -> bool {
        error.is_transient()
    }
}

/// Retry only on timeouts.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnTimeout;

impl RetryPredicate for RetryOnTimeout {
    fn should_retry(&self, error: &ApiError, _attempt: usize) -> bool {
        error.kind() == ErrorKind::Timeout
    }
}

/// Retry only on connection failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnConnectionFailure;

impl RetryPredicate for RetryOnConnectionFailure {
    fn should_retry(&self, error: &ApiError, _attempt: usize) -> bool {
        error.kind() == ErrorKind::ConnectionFailure
    }
}

/// Combine multiple retry predicates with OR logic.
///
/// # Examples
///
/// ```
/// use safecall::retry::{OrPredicate, RetryOnConnectionFailure, RetryOnTimeout};
///
/// let predicate = OrPredicate::new(vec![
///     Box::new(RetryOnTimeout),
///     Box::new(RetryOnConnectionFailure),
/// ]);
/// ```
pub struct OrPredicate {
    predicates: Vec<Box<dyn RetryPredicate>>,
}

impl OrPredicate {
    /// Creates a new `OrPredicate` from a list of predicates.
    pub fn new(predicates: Vec<Box<dyn RetryPredicate>>) -> Self {
        Self { predicates }
    }
}

impl RetryPredicate for OrPredicate {
    fn should_retry(&self, error: &ApiError, attempt: usize) -> bool {
        self.predicates
            .iter()
            .any(|p| p.should_retry(error, attempt))
    }
}

/// Combine multiple retry predicates with AND logic.
pub struct AndPredicate {
    predicates: Vec<Box<dyn RetryPredicate>>,
}

impl AndPredicate {
    /// Creates a new `AndPredicate` from a list of predicates.
    pub fn new(predicates: Vec<Box<dyn RetryPredicate>>) -> Self {
        Self { predicates }
    }
}

impl RetryPredicate for AndPredicate {
    fn should_retry(&self, error: &ApiError, attempt: usize) -> bool {
        self.predicates
            .iter()
            .all(|p| p.should_retry(error, attempt))
    }
}
