//! Story Arc Ordering
//!
//! Canonical chronological order of story arcs, used for the "First Arc"
//! earlier/later hint, plus the chapter-range table used to classify a
//! debut chapter into its arc.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::game::category::TileStatus;

/// Canonical arc labels in story order.
pub const ARC_ORDER: [&str; 33] = [
    // East Blue Saga
    "Romance Dawn",
    "Orange Town",
    "Syrup Village",
    "Baratie",
    "Arlong Park",
    "Loguetown",
    // Arabasta Saga
    "Reverse Mountain",
    "Whisky Peak",
    "Little Garden",
    "Drum Island",
    "Arabasta",
    // Sky Island Saga
    "Jaya",
    "Skypiea",
    // Water 7 Saga
    "Long Ring Long Land",
    "Water 7",
    "Enies Lobby",
    "Post-Enies Lobby",
    // Thriller Bark Saga
    "Thriller Bark",
    // Summit War Saga
    "Sabaody Archipelago",
    "Amazon Lily",
    "Impel Down",
    "Marineford",
    "Post-War",
    // Fish-Man Island Saga
    "Return to Sabaody",
    "Fish-Man Island",
    // Dressrosa Saga
    "Punk Hazard",
    "Dressrosa",
    // Whole Cake Island Saga
    "Zou",
    "Whole Cake Island",
    // Wano Country Saga
    "Levely",
    "Wano Country",
    // Final Saga
    "Egghead",
    "Elbaph",
];

/// Short forms and misspellings, keyed by lowercase spelling.
static ARC_ALIASES: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("alabasta", "Arabasta"),
        ("alabaster", "Arabasta"),
        ("post war", "Post-War"),
        ("postwar", "Post-War"),
        ("post-enies lobby", "Post-Enies Lobby"),
        ("post enies lobby", "Post-Enies Lobby"),
        ("fishman island", "Fish-Man Island"),
        ("fish man island", "Fish-Man Island"),
        ("whole cake", "Whole Cake Island"),
        ("wci", "Whole Cake Island"),
        ("wano", "Wano Country"),
        ("return sabaody", "Return to Sabaody"),
        ("sabaody", "Sabaody Archipelago"),
    ])
});

/// Map an arc label to its position in [`ARC_ORDER`].
///
/// The alias table is consulted first (case-insensitive, trimmed), then a
/// case-insensitive match against the canonical labels. `None` means the
/// label is unrecognized.
pub fn arc_index(label: &str) -> Option<usize> {
    let trimmed = label.trim();
    let lower = trimmed.to_lowercase();
    let needle = match ARC_ALIASES.get(lower.as_str()) {
        Some(canonical) => canonical.to_lowercase(),
        None => lower,
    };

    ARC_ORDER.iter().position(|arc| arc.to_lowercase() == needle)
}

/// Canonical spelling of an arc label, if it resolves.
pub fn canonical_arc(label: &str) -> Option<&'static str> {
    arc_index(label).map(|i| ARC_ORDER[i])
}

/// Check if an arc label resolves to a known arc.
pub fn is_valid_arc(label: &str) -> bool {
    arc_index(label).is_some()
}

/// Compare a guessed arc against the target arc.
///
/// `Higher` means the answer debuted later in the story than the guess,
/// `Lower` means earlier. Missing or unrecognized labels give `Unknown`.
pub fn compare_arcs(guess: Option<&str>, target: Option<&str>) -> TileStatus {
    let (Some(guess), Some(target)) = (guess, target) else {
        return TileStatus::Unknown;
    };
    if guess.is_empty() || target.is_empty() {
        return TileStatus::Unknown;
    }

    match (arc_index(guess), arc_index(target)) {
        (Some(g), Some(t)) if g == t => TileStatus::Correct,
        (Some(g), Some(t)) if g < t => TileStatus::Higher,
        (Some(_), Some(_)) => TileStatus::Lower,
        _ => TileStatus::Unknown,
    }
}

// =============================================================================
// CHAPTER RANGES
// =============================================================================

/// Inclusive chapter range covered by one arc.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArcChapterRange {
    /// Canonical arc label
    pub arc: &'static str,
    /// First chapter (inclusive)
    pub start: u32,
    /// Last chapter (inclusive)
    pub end: u32,
}

const fn range(arc: &'static str, start: u32, end: u32) -> ArcChapterRange {
    ArcChapterRange { arc, start, end }
}

/// Chapter ranges, one per arc, in the same order as [`ARC_ORDER`].
pub const ARC_CHAPTER_RANGES: [ArcChapterRange; 33] = [
    range("Romance Dawn", 1, 7),
    range("Orange Town", 8, 21),
    range("Syrup Village", 22, 41),
    range("Baratie", 42, 68),
    range("Arlong Park", 69, 95),
    range("Loguetown", 96, 100),
    range("Reverse Mountain", 101, 105),
    range("Whisky Peak", 106, 114),
    range("Little Garden", 115, 129),
    range("Drum Island", 130, 154),
    range("Arabasta", 155, 217),
    range("Jaya", 218, 236),
    range("Skypiea", 237, 302),
    range("Long Ring Long Land", 303, 321),
    range("Water 7", 322, 374),
    range("Enies Lobby", 375, 430),
    range("Post-Enies Lobby", 431, 441),
    range("Thriller Bark", 442, 489),
    range("Sabaody Archipelago", 490, 513),
    range("Amazon Lily", 514, 524),
    range("Impel Down", 525, 549),
    range("Marineford", 550, 580),
    range("Post-War", 581, 597),
    range("Return to Sabaody", 598, 602),
    range("Fish-Man Island", 603, 653),
    range("Punk Hazard", 654, 699),
    range("Dressrosa", 700, 801),
    range("Zou", 802, 824),
    range("Whole Cake Island", 825, 902),
    range("Levely", 903, 908),
    range("Wano Country", 909, 1057),
    range("Egghead", 1058, 1125),
    // Ongoing
    range("Elbaph", 1126, 9999),
];

/// Find the arc a chapter belongs to.
pub fn arc_from_chapter(chapter: u32) -> Option<&'static str> {
    ARC_CHAPTER_RANGES
        .iter()
        .find(|r| (r.start..=r.end).contains(&chapter))
        .map(|r| r.arc)
}

/// Problem found in a chapter range table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RangeError {
    /// First range does not start at chapter 1.
    BadStart {
        /// First arc in the table
        arc: &'static str,
        /// Its actual start chapter
        start: u32,
    },
    /// A range ends before it starts.
    Inverted {
        /// Offending arc
        arc: &'static str,
    },
    /// Chapters missing between two consecutive ranges.
    Gap {
        /// Earlier arc
        before: &'static str,
        /// Later arc
        after: &'static str,
    },
    /// Two consecutive ranges share chapters.
    Overlap {
        /// Earlier arc
        before: &'static str,
        /// Later arc
        after: &'static str,
    },
    /// Range table and [`ARC_ORDER`] disagree at this position.
    OrderMismatch {
        /// Index into both tables
        position: usize,
    },
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::BadStart { arc, start } => {
                write!(f, "{arc} starts at chapter {start}, expected 1")
            }
            RangeError::Inverted { arc } => write!(f, "{arc} ends before it starts"),
            RangeError::Gap { before, after } => write!(f, "gap between {before} and {after}"),
            RangeError::Overlap { before, after } => {
                write!(f, "overlap between {before} and {after}")
            }
            RangeError::OrderMismatch { position } => {
                write!(f, "range table disagrees with arc order at position {position}")
            }
        }
    }
}

/// Validate a range table: starts at 1, contiguous, no overlaps.
pub fn validate_ranges(ranges: &[ArcChapterRange]) -> Result<(), Vec<RangeError>> {
    let mut errors = Vec::new();

    if let Some(first) = ranges.first() {
        if first.start != 1 {
            errors.push(RangeError::BadStart { arc: first.arc, start: first.start });
        }
    }

    for r in ranges {
        if r.end < r.start {
            errors.push(RangeError::Inverted { arc: r.arc });
        }
    }

    for pair in ranges.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        // A range ending at u32::MAX leaves no room for a successor.
        let gap = match current.end.checked_add(1) {
            Some(after_end) => next.start > after_end,
            None => false,
        };
        if gap {
            errors.push(RangeError::Gap { before: current.arc, after: next.arc });
        } else if next.start <= current.end {
            errors.push(RangeError::Overlap { before: current.arc, after: next.arc });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the built-in table, including its agreement with [`ARC_ORDER`].
pub fn validate_arc_ranges() -> Result<(), Vec<RangeError>> {
    let mut errors = validate_ranges(&ARC_CHAPTER_RANGES).err().unwrap_or_default();

    for (position, (r, arc)) in ARC_CHAPTER_RANGES.iter().zip(ARC_ORDER.iter()).enumerate() {
        if r.arc != *arc {
            errors.push(RangeError::OrderMismatch { position });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// =============================================================================
// TESTS
// =============================================================================
