//! Pacing and deadlines for the retry driver.

use std::{future::Future, time::Duration};

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Exponential backoff schedule for rounds that end without a decision.
///
/// Waiting a growing, jittered interval between attempts keeps two live
/// proposers from preempting each other's rounds in lockstep indefinitely.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Wait after the first failed round.
    pub initial: Duration,
    /// Ceiling on the pre-jitter interval.
    pub max: Duration,
    /// Growth factor applied per consecutive failure.
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(10),
            max: Duration::from_secs(1),
            multiplier: 2.0,
        }
    }
}

impl BackoffConfig {
    /// Interval to wait after `retries` consecutive failed rounds.
    ///
    /// Grows by `multiplier` per failure until `max`, then scales the result
    /// by a random factor in [0.5, 1.5) so competing proposers drift apart
    /// instead of colliding again on the same schedule.
    #[must_use]
    pub fn duration(&self, retries: u32, rng: &mut impl Rng) -> Duration {
        let base = self.initial.as_secs_f64() * self.multiplier.powi(retries.cast_signed());
        let capped = base.min(self.max.as_secs_f64());
        let jitter = rng.random_range(0.5..1.5);
        Duration::from_secs_f64(capped * jitter)
    }
}

/// Where the retry driver's waits come from.
///
/// The driver sleeps through this seam rather than calling a runtime timer
/// directly, so tests can run the schedule on simulated time.
pub trait Sleep: Clone + Send + 'static {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// [`Sleep`] backed by the tokio timer.
#[derive(Clone, Copy, Default)]
pub struct TokioSleep;

impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Knobs for [`Proposer::propose_until_chosen`], plus the randomness behind
/// the backoff jitter.
///
/// [`Proposer::propose_until_chosen`]: crate::Proposer::propose_until_chosen
pub struct ProposerConfig<S: Sleep, R: Rng = StdRng> {
    /// Schedule of waits between failed rounds.
    pub backoff: BackoffConfig,
    /// Per-phase deadline; `None` lets a phase wait indefinitely.
    pub phase_timeout: Option<Duration>,
    /// Timer the driver sleeps on.
    pub sleep: S,
    /// Jitter source. Seed it to make retry timing reproducible.
    pub rng: R,
}

impl<S: Sleep, R: Rng> ProposerConfig<S, R> {
    /// Assemble a config from parts, with no phase deadline.
    pub fn new(backoff: BackoffConfig, sleep: S, rng: R) -> Self {
        Self {
            backoff,
            phase_timeout: None,
            sleep,
            rng,
        }
    }

    /// Give up on a phase whose responses haven't produced a decision in
    /// time, counting the round as failed.
    #[must_use]
    pub fn with_phase_timeout(mut self, timeout: Duration) -> Self {
        self.phase_timeout = Some(timeout);
        self
    }
}

impl<S: Sleep> ProposerConfig<S, StdRng> {
    /// Config whose jitter, and with it the retry timing, replays from `seed`.
    #[must_use]
    pub fn with_seed(backoff: BackoffConfig, sleep: S, seed: u64) -> Self {
        Self {
            backoff,
            phase_timeout: None,
            sleep,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ProposerConfig<TokioSleep, StdRng> {
    fn default() -> Self {
        Self {
            backoff: BackoffConfig::default(),
            phase_timeout: None,
            sleep: TokioSleep,
            rng: StdRng::from_os_rng(),
        }
    }
}
