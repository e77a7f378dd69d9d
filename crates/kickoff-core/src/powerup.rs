use std::fmt::Debug;

use rand::Rng;
use serde::{Serialize, de::DeserializeOwned};

/// Trait for game-specific power-up kind enums.
pub trait PowerUpKind: Debug + Clone + Copy + PartialEq + Serialize + DeserializeOwned + 'static {
    /// Every kind that can be granted.
    const ALL: &'static [Self];

    /// Short display name for notifications.
    fn label(&self) -> &'static str;
}

/// Pick the next kind to grant.
///
/// The first grant is uniform over every kind; afterwards the previous kind
/// is excluded so the same kind is never granted twice in a row.
pub fn choose_next<K: PowerUpKind, R: Rng + ?Sized>(last: Option<K>, rng: &mut R) -> K {
    let candidates: Vec<K> = K::ALL
        .iter()
        .copied()
        .filter(|k| Some(*k) != last)
        .collect();
    match candidates.len() {
        0 => K::ALL[0],
        n => candidates[rng.random_range(0..n)],
    }
}
