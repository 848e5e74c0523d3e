//! Rate Limiter (Token Bucket)
//!
//! Sitemap generation hits the database twice per call; the bucket keeps a
//! burst of callers from turning into a query storm.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Tokens are tracked in thousandths so slow refill rates still accrue
const MILLI: u64 = 1000;

/// Milli-tokens must fit in the upper 32 bits
const MAX_BURST: u32 = (u32::MAX as u64 / MILLI) as u32;

/// Lock-free token bucket
///
/// State is packed into one `AtomicU64`: the upper 32 bits hold milli-tokens,
/// the lower 32 bits the last refill time in ms since creation, modulo 2^32.
pub struct RateLimiter {
    packed: AtomicU64,
    created: Instant,
    burst: u32,
    per_sec: u32,
}

impl RateLimiter {
    /// `burst` - bucket capacity, `per_sec` - tokens added per second
    pub fn new(burst: u32, per_sec: u32) -> Self {
        let burst = burst.clamp(1, MAX_BURST);
        Self {
            packed: AtomicU64::new(pack(burst as u64 * MILLI, 0)),
            created: Instant::now(),
            burst,
            per_sec,
        }
    }

    /// Take one token; false when the caller should be throttled
    pub fn try_acquire(&self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    fn try_acquire_at(&self, now: Instant) -> bool {
        let capacity = self.burst as u64 * MILLI;

        loop {
            let current = self.packed.load(Ordering::Acquire);
            let (milli_tokens, last_ms) = unpack(current);

            let now_ms = self.elapsed_ms(now);
            let delta_ms = now_ms.wrapping_sub(last_ms) as u64;
            // per_sec tokens/s == per_sec milli-tokens/ms
            let refilled = (milli_tokens + delta_ms * self.per_sec as u64).min(capacity);

            let (next, allowed) = if refilled >= MILLI {
                (refilled - MILLI, true)
            } else {
                (refilled, false)
            };

            if self
                .packed
                .compare_exchange(
                    current,
                    pack(next, now_ms),
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                return allowed;
            }
        }
    }

    /// Whole tokens currently available (without refilling)
    pub fn available(&self) -> u32 {
        (unpack(self.packed.load(Ordering::Acquire)).0 / MILLI) as u32
    }

    /// Wraps roughly every 49.7 days; only differences are meaningful
    fn elapsed_ms(&self, now: Instant) -> u32 {
        now.saturating_duration_since(self.created).as_millis() as u32
    }
}

fn pack(milli_tokens: u64, last_ms: u32) -> u64 {
    (milli_tokens << 32) | last_ms as u64
}

fn unpack(packed: u64) -> (u64, u32) {
    (packed >> 32, (packed & 0xFFFF_FFFF) as u32)
}
