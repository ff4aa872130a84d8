//! This microcrate contains the `DueQueue` trait used by the
//! [`toad`](https://github.com/toad-lib/toad) CoAP runtime / ecosystem
//! to keep track of work that becomes "due" at some point in time
//! (e.g. a retransmission timer firing).
//!
//! A due queue is any [`Array`] of entries that impl [`Due`], kept
//! sorted ascending by [`Due::time_due`]. The queue itself is owned by the
//! caller; this crate only provides the operations that keep it ordered.
//!
//! Deciding _when_ an entry becomes due (fixed delay, exponential backoff, ...)
//! is up to the caller.
//!
//! ```
//! use toad_due::{Due, DueQueue};
//!
//! #[derive(Debug, PartialEq)]
//! struct Retransmit {
//!   id: u16,
//!   due: u64,
//! }
//!
//! impl Due for Retransmit {
//!   type Time = u64;
//!
//!   fn time_due(&self) -> u64 {
//!     self.due
//!   }
//! }
//!
//! let mut queue: Vec<Retransmit> = vec![];
//! queue.queue_insert(Retransmit { id: 1, due: 5 });
//! queue.queue_insert(Retransmit { id: 2, due: 1 });
//! queue.queue_insert(Retransmit { id: 3, due: 3 });
//!
//! let ready = queue.due_prefix(3).iter().map(|r| r.id).collect::<Vec<_>>();
//! assert_eq!(ready, vec![2, 3]);
//! assert_eq!(queue.len(), 3);
//! ```

// docs
#![doc(html_root_url = "https://docs.rs/toad-due/0.1.0")]
#![cfg_attr(any(docsrs, feature = "docs"), feature(doc_cfg))]
// -
// style
#![allow(clippy::unused_unit)]
// -
// deny
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![deny(missing_copy_implementations)]
#![cfg_attr(not(test), deny(unsafe_code))]
// -
// warnings
#![cfg_attr(not(test), warn(unreachable_pub))]
// -
// features
#![cfg_attr(not(feature = "std"), no_std)]

use toad_array::Array;

mod clock;
mod scheduled;

#[doc(inline)]
pub use clock::{Clock, ManagedClock, Millis};
#[doc(inline)]
pub use scheduled::Scheduled;

/// Something that becomes due at a point in time.
///
/// Entries are ordered by their due time and nothing else;
/// two entries due at the same instant are "equally due"
/// regardless of what else they contain.
pub trait Due {
  /// The (monotonic) time domain that due times live in,
  /// e.g. [`embedded_time::Instant`] or a plain tick count.
  type Time: Ord + Copy;

  /// The instant that this entry becomes due
  fn time_due(&self) -> Self::Time;
}

/// An entry could not be found in a [`DueQueue`]
///
/// Removing or repositioning an entry that was never inserted
/// (or was already removed) is a logic error on the caller's part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotFound;

impl core::fmt::Display for NotFound {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "entry not found in queue")
  }
}

#[cfg(feature = "std")]
impl std::error::Error for NotFound {}

/// An [`Array`] of [`Due`] entries kept in ascending order of due time.
///
/// Implemented for every `Array` (e.g. `Vec` and [`tinyvec::ArrayVec`](https://docs.rs/tinyvec/latest))
/// whose items are [`Due`].
///
/// The queue does not own entry identity; [`DueQueue::queue_remove`] and [`DueQueue::queue_reposition`]
/// find entries with `PartialEq`, so `PartialEq` for your entries should
/// express "is the same entry", not "is due at the same time".
pub trait DueQueue<T: Due>: Array<Item = T> {
  /// Insert an entry, keeping the queue sorted by due time.
  ///
  /// Entries due at the same time keep the order they were inserted in;
  /// the new entry is placed after every entry due at or before it.
  fn queue_insert(&mut self, entry: T) {
    let due = entry.time_due();
    let ix = self.partition_point(|e| e.time_due() <= due);
    self.insert_at(ix, entry);
  }

  /// Remove the first entry equal to `entry`, yielding the removed entry.
  ///
  /// # Errors
  /// [`NotFound`] if no entry in the queue is equal to `entry`.
  fn queue_remove(&mut self, entry: &T) -> Result<T, NotFound>
    where T: PartialEq
  {
    let ix = self.iter().position(|e| e == entry).ok_or(NotFound)?;
    Array::remove(self, ix).ok_or(NotFound)
  }

  /// Replace the entry equal to `entry` with `entry`, moving it
  /// to the position its (possibly changed) due time belongs at.
  ///
  /// Always pays for a removal and an insertion, even when the
  /// entry's position would not change.
  ///
  /// Yields the entry that was replaced.
  ///
  /// # Errors
  /// [`NotFound`] if no entry in the queue is equal to `entry`;
  /// the queue is left untouched.
  fn queue_reposition(&mut self, entry: T) -> Result<T, NotFound>
    where T: PartialEq
  {
    let old = self.queue_remove(&entry)?;
    self.queue_insert(entry);
    Ok(old)
  }

  /// Every entry due at or before `now`, from the head of the queue.
  ///
  /// Does not modify the queue.
  fn due_prefix(&self, now: T::Time) -> &[T] {
    let all: &[T] = self;
    let ready = all.partition_point(|e| e.time_due() <= now);
    &all[..ready]
  }

  /// The due time of the entry at the head of the queue
  fn next_due(&self) -> Option<T::Time> {
    self.first().map(Due::time_due)
  }
}

impl<T: Due, A: Array<Item = T>> DueQueue<T> for A {}
