//! Reveal Animator for pwgen.
//!
//! Shows a credential by first rendering random noise of the same length and
//! then resolving each position to its final character at an independent
//! random moment within [`MAX_REVEAL_DELAY`].
//!
//! Every position is its own tokio task, so `play` must be called from
//! inside a tokio runtime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tracing::trace;

use super::display::DisplaySurface;

/// Characters used for the masked placeholder.
pub const SCRAMBLE_CHARSET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+-=[]{ }|;:'\",.<>/?";

/// Upper bound (exclusive) of any per-character delay.
pub const MAX_REVEAL_DELAY: Duration = Duration::from_millis(300);

/// What happens when `play` is called while an earlier animation is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Earlier ticks keep firing and may overwrite the newer animation.
    #[default]
    Unguarded,
    /// Ticks belonging to a superseded call are dropped.
    LatestOnly,
}

/// Handle to the ticks scheduled by one `play` call. Dropping it does not
/// cancel anything.
#[derive(Debug)]
pub struct RevealHandle {
    token: u64,
    ticks: Vec<JoinHandle<()>>,
}

impl RevealHandle {
    /// Monotonic id of the `play` call that produced this handle.
    pub fn token(&self) -> u64 {
        self.token
    }

    /// Number of per-character ticks scheduled.
    pub fn tick_count(&self) -> usize {
        self.ticks.len()
    }

    /// Waits until every tick of this animation has fired.
    pub async fn settled(self) {
        for tick in self.ticks {
            let _ = tick.await;
        }
    }
}

/// Per-character randomized reveal onto a [`DisplaySurface`].
pub struct RevealAnimator {
    surface: Arc<dyn DisplaySurface>,
    rng: Mutex<StdRng>,
    policy: OverlapPolicy,
    latest: Arc<AtomicU64>,
}

impl RevealAnimator {
    pub fn new(surface: Arc<dyn DisplaySurface>) -> Self {
        Self::from_rng(surface, StdRng::from_entropy())
    }

    /// Deterministic animator for tests and reproducible demos.
    pub fn with_seed(surface: Arc<dyn DisplaySurface>, seed: u64) -> Self {
        Self::from_rng(surface, StdRng::seed_from_u64(seed))
    }

    fn from_rng(surface: Arc<dyn DisplaySurface>, rng: StdRng) -> Self {
        Self {
            surface,
            rng: Mutex::new(rng),
            policy: OverlapPolicy::default(),
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_policy(mut self, policy: OverlapPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Starts the reveal of `final_text` and returns immediately.
    pub fn play(&self, final_text: &str) -> RevealHandle {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let target: Vec<char> = final_text.chars().collect();

        let (masked, delays) = {
            let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
            let masked = scramble(&mut *rng, target.len());
            let delays: Vec<Duration> = target.iter().map(|_| sample_delay(&mut *rng)).collect();
            (masked, delays)
        };

        self.surface.render(&masked.iter().collect::<String>());
        let buffer = Arc::new(Mutex::new(masked));

        let ticks = target
            .into_iter()
            .zip(delays)
            .enumerate()
            .map(|(index, (ch, delay))| {
                let buffer = buffer.clone();
                let surface = self.surface.clone();
                let latest = self.latest.clone();
                let policy = self.policy;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    if policy == OverlapPolicy::LatestOnly && latest.load(Ordering::SeqCst) != token {
                        trace!(token, index, "dropping superseded reveal tick");
                        return;
                    }
                    let text: String = {
                        let mut buf = buffer.lock().unwrap_or_else(|p| p.into_inner());
                        buf[index] = ch;
                        buf.iter().collect()
                    };
                    surface.render(&text);
                })
            })
            .collect();

        RevealHandle { token, ticks }
    }
}

/// `len` characters drawn independently and uniformly from [`SCRAMBLE_CHARSET`].
pub fn scramble<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<char> {
    let charset = SCRAMBLE_CHARSET.as_bytes();
    (0..len)
        .map(|_| charset.choose(rng).map(|b| *b as char).unwrap_or('*'))
        .collect()
}

/// Uniform delay in `[0, MAX_REVEAL_DELAY)`, microsecond resolution.
pub fn sample_delay<R: Rng + ?Sized>(rng: &mut R) -> Duration {
    let max_micros = MAX_REVEAL_DELAY.as_micros() as u64;
    Duration::from_micros(rng.gen_range(0..max_micros))
}
