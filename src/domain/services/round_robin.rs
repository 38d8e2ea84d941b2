//! Round-Robin Selector
//!
//! Pure domain logic for rotating through enabled providers.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Round-robin selector with a single shared cursor.
///
/// Each call to [`RoundRobin::next`] atomically reads the cursor and
/// advances it, so concurrent callers observe the same sequence of
/// positions they would if the calls were serialized.
///
/// The cursor is reduced modulo the length of the list passed *at call
/// time*. If the list shrinks or grows between calls (providers toggled
/// while lookups are in flight) the rotation may skip or repeat an entry.
/// That skew is accepted.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the item under the cursor and advance it.
    ///
    /// Returns `None` only for an empty slice; the cursor is left alone
    /// in that case.
    ///
    /// # Example
    /// ```
    /// use ipcheck::RoundRobin;
    ///
    /// let rr = RoundRobin::new();
    /// let items = ["a", "b"];
    /// assert_eq!(rr.next(&items), Some(&"a"));
    /// assert_eq!(rr.next(&items), Some(&"b"));
    /// assert_eq!(rr.next(&items), Some(&"a"));
    /// ```
    pub fn next<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        let len = items.len();
        if len == 0 {
            return None;
        }

        let prev = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| {
                Some((c % len + 1) % len)
            })
            .unwrap_or_else(|c| c);

        items.get(prev % len)
    }

    /// Current cursor position (for diagnostics).
    pub fn position(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }
}
