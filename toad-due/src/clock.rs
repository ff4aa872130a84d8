use core::sync::atomic::{AtomicU64, Ordering};

use embedded_time::rate::Fraction;
use embedded_time::Instant;

/// A duration, in milliseconds
pub type Millis = embedded_time::duration::Milliseconds<u64>;

/// Supertrait of [`embedded_time::Clock`] pinning the
/// type of "ticks" to u64
pub trait Clock: embedded_time::Clock<T = u64> {}
impl<C: embedded_time::Clock<T = u64>> Clock for C {}

/// A millisecond [`Clock`] that starts at zero and only
/// moves when it is told to.
///
/// Useful for driving a [`DueQueue`](crate::DueQueue) deterministically,
/// e.g. in tests or simulations.
///
/// ```
/// use embedded_time::duration::Milliseconds;
/// use embedded_time::Clock;
/// use toad_due::ManagedClock;
///
/// let clock = ManagedClock::new();
/// assert_eq!(clock.try_now().unwrap().duration_since_epoch().integer(), 0);
///
/// clock.adjust(Milliseconds(2_500));
/// clock.adjust(Milliseconds(2_500));
/// assert_eq!(clock.try_now().unwrap().duration_since_epoch().integer(), 5_000);
/// ```
#[derive(Debug, Default)]
pub struct ManagedClock(AtomicU64);

impl ManagedClock {
  /// Create a new clock, with the current time at the epoch
  pub const fn new() -> Self {
    Self(AtomicU64::new(0))
  }

  /// Move the clock forward by some amount of time
  pub fn adjust(&self, by: Millis) {
    self.0.fetch_add(by.0, Ordering::SeqCst);
  }

  /// Set the current time (milliseconds since the clock's epoch)
  pub fn set(&self, to: Millis) {
    self.0.store(to.0, Ordering::SeqCst);
  }
}

impl embedded_time::Clock for ManagedClock {
  type T = u64;

  // milliseconds
  const SCALING_FACTOR: Fraction = Fraction::new(1, 1_000);

  fn try_now(&self) -> Result<Instant<Self>, embedded_time::clock::Error> {
    Ok(Instant::new(self.0.load(Ordering::SeqCst)))
  }
}
