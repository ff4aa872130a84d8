use embedded_time::Instant;

use crate::{Clock, Due, Millis};

/// Data that becomes due at some [`Instant`]
///
/// Comparing two `Scheduled`s for equality compares only the data,
/// so that an entry may be found in a [`DueQueue`](crate::DueQueue) after its
/// due time has changed. Ordering compares only the due time.
///
/// ```
/// use embedded_time::duration::Milliseconds;
/// use embedded_time::Clock;
/// use toad_due::{DueQueue, ManagedClock, Scheduled};
///
/// let clock = ManagedClock::new();
/// let mut queue: Vec<Scheduled<ManagedClock, &str>> = vec![];
///
/// queue.queue_insert(Scheduled::after(&clock, Milliseconds(200), "b").unwrap());
/// queue.queue_insert(Scheduled::after(&clock, Milliseconds(100), "a").unwrap());
///
/// clock.adjust(Milliseconds(150));
/// let ready = queue.due_prefix(clock.try_now().unwrap());
/// assert_eq!(ready.len(), 1);
/// assert_eq!(ready[0].data(), &"a");
/// ```
pub struct Scheduled<C: Clock, T>(pub T, pub Instant<C>);

impl<C: Clock, T: core::fmt::Debug> core::fmt::Debug for Scheduled<C, T> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let due = Millis::try_from(self.1.duration_since_epoch()).map(|ms| ms.0)
                                                             .ok();

    f.debug_struct("Scheduled")
     .field("data", &self.0)
     .field("due_ms_since_epoch", &due)
     .finish()
  }
}

impl<C: Clock, T: PartialEq> PartialEq for Scheduled<C, T> {
  fn eq(&self, other: &Self) -> bool {
    self.0 == other.0
  }
}

impl<C: Clock, T: Eq> Eq for Scheduled<C, T> {}

impl<C: Clock, T: Clone> Clone for Scheduled<C, T> {
  fn clone(&self) -> Self {
    Self(self.0.clone(), self.1)
  }
}

impl<C: Clock, T: Copy> Copy for Scheduled<C, T> {}

impl<C: Clock, T: Default> Default for Scheduled<C, T> {
  fn default() -> Self {
    Self(T::default(), Instant::new(0))
  }
}

impl<C: Clock, T> Due for Scheduled<C, T> {
  type Time = Instant<C>;

  fn time_due(&self) -> Instant<C> {
    self.1
  }
}

impl<C: Clock, T> Scheduled<C, T> {
  /// Schedule `t` to become due at `due`
  pub fn new(t: T, due: Instant<C>) -> Self {
    Self(t, due)
  }

  /// Schedule `t` to become due `delay` after the current time of `clock`
  ///
  /// # Errors
  /// Fails if the clock fails to yield the current time.
  ///
  /// # Panics
  /// If adding `delay` to the current time would overflow the clock's ticks.
  pub fn after(clock: &C, delay: Millis, t: T) -> Result<Self, embedded_time::clock::Error> {
    clock.try_now().map(|now| Self(t, now + delay))
  }

  /// Borrow the scheduled data
  pub fn data(&self) -> &T {
    &self.0
  }

  /// Mutably borrow the scheduled data
  pub fn data_mut(&mut self) -> &mut T {
    &mut self.0
  }

  /// When this becomes due
  pub fn due(&self) -> Instant<C> {
    self.1
  }

  /// Change when this becomes due.
  ///
  /// If this is in a [`DueQueue`](crate::DueQueue), it must then be
  /// [repositioned](crate::DueQueue::queue_reposition).
  pub fn set_due(&mut self, due: Instant<C>) {
    self.1 = due;
  }

  /// Discard the due time and get the data
  pub fn into_data(self) -> T {
    self.0
  }

  /// Map the scheduled data, keeping the due time
  pub fn map<R>(self, f: impl FnOnce(T) -> R) -> Scheduled<C, R> {
    Scheduled(f(self.0), self.1)
  }
}
