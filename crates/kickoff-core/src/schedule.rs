use serde::{Deserialize, Serialize};

/// A pending entry in a [`Schedule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheduled<E> {
    /// Simulated seconds left before the entry fires.
    pub remaining: f32,
    pub event: E,
}

/// Delayed transitions driven by simulated time.
///
/// Entries are released by [`Schedule::advance`] once their delay has
/// elapsed, in the order they would have fired (ties keep insertion order).
/// Nothing here touches the wall clock, so a paused host that stops calling
/// `advance` freezes every pending entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule<E> {
    entries: Vec<Scheduled<E>>,
}

impl<E> Default for Schedule<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> Schedule<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` to fire after `delay` simulated seconds.
    pub fn schedule(&mut self, delay: f32, event: E) {
        self.entries.push(Scheduled {
            remaining: delay.max(0.0),
            event,
        });
    }

    /// Advance simulated time and return every entry that became due.
    pub fn advance(&mut self, dt: f32) -> Vec<E> {
        for entry in &mut self.entries {
            entry.remaining -= dt;
        }
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.remaining <= 0.0);
        self.entries = pending;
        // Stable sort keeps insertion order among entries due at the same instant.
        due.sort_by(|a, b| a.remaining.total_cmp(&b.remaining));
        due.into_iter().map(|e| e.event).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
