//! Level catalog
//!
//! Each level is a group name to spell, plus the accent color its tokens are
//! drawn with.

use rand::Rng;
use serde::Serialize;

/// A single level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Level {
    /// Target word
    pub group: &'static str,
    /// Token palette name, interpreted by the host
    pub color: &'static str,
}

#[rustfmt::skip]
pub const LEVELS: &[Level] = &[
    Level { group: "BOYNEXTDOOR", color: "slate-600" },
    Level { group: "SEVENTEEN", color: "slate-500" },
    Level { group: "NEWJEANS", color: "indigo-400" },
    Level { group: "LESSERAFIM", color: "slate-700" },
    Level { group: "TWICE", color: "slate-400" },
    Level { group: "BTS", color: "slate-800" },
    Level { group: "BLACKPINK", color: "slate-900" },
    Level { group: "STRAYKIDS", color: "slate-600" },
    Level { group: "GIDLE", color: "slate-500" },
    Level { group: "IVE", color: "indigo-500" },
    Level { group: "AESPA", color: "slate-700" },
    Level { group: "TXT", color: "blue-400" },
    Level { group: "ENHYPEN", color: "slate-600" },
    Level { group: "NMIXX", color: "slate-400" },
    Level { group: "ITZY", color: "slate-500" },
    Level { group: "RIIZE", color: "orange-300" },
    Level { group: "TWS", color: "blue-300" },
    Level { group: "BABYMONSTER", color: "red-800" },
];

pub fn level(index: usize) -> Option<&'static Level> {
    LEVELS.get(index)
}

/// Catalog position of a word, if it is a catalog level
pub fn index_of(word: &str) -> Option<usize> {
    LEVELS.iter().position(|l| l.group == word)
}

/// Random index in `0..len` that differs from `current` whenever `len > 1`
///
/// Returns None for an empty list.
pub fn pick_other<R: Rng + ?Sized>(rng: &mut R, len: usize, current: Option<usize>) -> Option<usize> {
    if len == 0 {
        return None;
    }
    loop {
        let index = rng.random_range(0..len);
        if len == 1 || Some(index) != current {
            return Some(index);
        }
    }
}

/// Random catalog level other than `current`
pub fn pick_next_level<R: Rng + ?Sized>(rng: &mut R, current: Option<usize>) -> usize {
    pick_other(rng, LEVELS.len(), current).unwrap_or(0)
}
