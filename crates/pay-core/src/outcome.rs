//! # Outcome Generator
//!
//! Decides whether a charge attempt succeeds. There is no real payment
//! provider behind this service, so the decision is a simulated coin flip.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │         OutcomeGenerator (trait)            │
//! │  ├── charge_succeeded()                     │
//! │  └── name()                                 │
//! └─────────────────────────────────────────────┘
//!                      ▲
//!           ┌──────────┴──────────┐
//!   ┌───────┴───────┐     ┌───────┴────────┐
//!   │   CoinFlip    │     │ SeededCoinFlip │
//!   │ (thread_rng)  │     │ (Mutex<StdRng>)│
//!   └───────────────┘     └────────────────┘
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// Probability that a single charge attempt succeeds
pub const SUCCESS_PROBABILITY: f64 = 0.5;

/// Source of charge outcomes.
///
/// Implementations are shared across concurrently handled requests, so they
/// must be safe to call from any thread.
pub trait OutcomeGenerator: Send + Sync {
    /// Returns `true` if the charge succeeded.
    fn charge_succeeded(&self) -> bool;

    /// Generator name (for logging).
    fn name(&self) -> &'static str;
}

/// Type alias for a shared outcome generator (dynamic dispatch)
pub type BoxedOutcomeGenerator = Arc<dyn OutcomeGenerator>;

/// Production generator.
///
/// Draws from the thread-local generator, which is seeded from the OS once per
/// thread and never reseeded per call. Requests on different worker threads
/// never contend on a lock.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoinFlip;

impl OutcomeGenerator for CoinFlip {
    fn charge_succeeded(&self) -> bool {
        rand::thread_rng().gen_bool(SUCCESS_PROBABILITY)
    }

    fn name(&self) -> &'static str {
        "coin-flip"
    }
}

/// Deterministic generator for reproducible runs.
///
/// All callers share one sequence, serialized through a mutex.
#[derive(Debug)]
pub struct SeededCoinFlip {
    rng: Mutex<StdRng>,
}

impl SeededCoinFlip {
    /// Create a generator whose sequence is fully determined by `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl OutcomeGenerator for SeededCoinFlip {
    fn charge_succeeded(&self) -> bool {
        // Poisoning is ignored: StdRng has no invariant a panic can break.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_bool(SUCCESS_PROBABILITY)
    }

    fn name(&self) -> &'static str {
        "seeded-coin-flip"
    }
}

/// Build the generator for an optional seed
pub fn outcome_generator(seed: Option<u64>) -> BoxedOutcomeGenerator {
    match seed {
        Some(seed) => Arc::new(SeededCoinFlip::new(seed)),
        None => Arc::new(CoinFlip),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_successes(generator: &dyn OutcomeGenerator, n: usize) -> usize {
        (0..n).filter(|_| generator.charge_succeeded()).count()
    }

    #[test]
    fn test_coin_flip_is_unbiased() {
        let successes = count_successes(&CoinFlip, 100);
        let failures = 100 - successes;

        assert!((25..=75).contains(&successes), "successes = {}", successes);
        assert!((25..=75).contains(&failures), "failures = {}", failures);
    }

    #[test]
    fn test_coin_flip_produces_both_outcomes() {
        let successes = count_successes(&CoinFlip, 1_000);
        assert!(successes > 0 && successes < 1_000);
    }

    #[test]
    fn test_seeded_sequences_repeat() {
        let a = SeededCoinFlip::new(42);
        let b = SeededCoinFlip::new(42);

        let seq_a: Vec<bool> = (0..64).map(|_| a.charge_succeeded()).collect();
        let seq_b: Vec<bool> = (0..64).map(|_| b.charge_succeeded()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_seeded_is_unbiased() {
        let successes = count_successes(&SeededCoinFlip::new(7), 100);
        assert!((25..=75).contains(&successes), "successes = {}", successes);
    }

    #[test]
    fn test_seeded_is_shared_across_threads() {
        let generator = Arc::new(SeededCoinFlip::new(1));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || count_successes(generator.as_ref(), 250))
            })
            .collect();

        let successes: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert!((350..=650).contains(&successes), "successes = {}", successes);
    }

    #[test]
    fn test_outcome_generator_selection() {
        assert_eq!(outcome_generator(None).name(), "coin-flip");
        assert_eq!(outcome_generator(Some(3)).name(), "seeded-coin-flip");
    }
}
