//! Philippine island-group classification.
//!
//! Regions are grouped into the three major island groups (Luzon, Visayas,
//! Mindanao) based on their display names. Region names follow the standard
//! numbering convention ("Region VII (Central Visayas)"), with a handful of
//! specially-named regions (NCR, CAR, BARMM) handled before numeral parsing.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Bangsamoro / autonomous-region names. Word boundaries keep the acronyms
/// from matching inside longer words.
static MINDANAO_SPECIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"BANGSAMORO|AUTONOMOUS REGION|\b(?:BARMM|ARMM)\b").expect("Invalid regex")
});

/// National Capital Region / Cordillera names. `\bCAR\b` must not match
/// CARAGA, which is a numbered Mindanao region.
static LUZON_SPECIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"NATIONAL CAPITAL|CORDILLERA|\b(?:NCR|CAR)\b").expect("Invalid regex")
});

/// Trailing Roman numeral after the literal token "REGION".
static REGION_NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"REGION\s+([IVXLCDM]+)").expect("Invalid regex"));

/// One of the three major Philippine island groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IslandGroup {
    Luzon,
    Visayas,
    Mindanao,
}

impl IslandGroup {
    /// Classify a region display name into an island group.
    ///
    /// Returns `None` when the name carries no recognizable region marker,
    /// or its numeral falls outside the numbered range 1-13. Never panics;
    /// malformed numerals degrade to `None`.
    ///
    /// ## Examples
    ///
    /// ```
    /// use piyesa_core::IslandGroup;
    ///
    /// assert_eq!(
    ///     IslandGroup::classify("Region VII (Central Visayas)"),
    ///     Some(IslandGroup::Visayas)
    /// );
    /// assert_eq!(IslandGroup::classify("NCR"), Some(IslandGroup::Luzon));
    /// assert_eq!(IslandGroup::classify("Region XIV"), None);
    /// ```
    #[must_use]
    pub fn classify(region_name: &str) -> Option<Self> {
        let name = region_name.to_uppercase();

        if MINDANAO_SPECIAL.is_match(&name) {
            return Some(Self::Mindanao);
        }
        if LUZON_SPECIAL.is_match(&name) {
            return Some(Self::Luzon);
        }

        let numeral = REGION_NUMERAL.captures(&name)?.get(1)?.as_str().to_owned();
        match roman_to_int(&numeral)? {
            1..=5 => Some(Self::Luzon),
            6..=8 => Some(Self::Visayas),
            9..=13 => Some(Self::Mindanao),
            _ => None,
        }
    }

    /// The canonical display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Luzon => "Luzon",
            Self::Visayas => "Visayas",
            Self::Mindanao => "Mindanao",
        }
    }
}

impl std::fmt::Display for IslandGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for IslandGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "luzon" => Ok(Self::Luzon),
            "visayas" => Ok(Self::Visayas),
            "mindanao" => Ok(Self::Mindanao),
            _ => Err(format!("invalid island group: {s}")),
        }
    }
}

/// Convert a Roman numeral to an integer using the standard subtractive
/// algorithm: scan right-to-left, adding each symbol's value, subtracting
/// instead when a symbol is lower than the one to its right.
///
/// Returns `None` for an empty string or any non-numeral character.
#[must_use]
pub fn roman_to_int(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }

    let mut total: i64 = 0;
    let mut prev: u32 = 0;
    for c in s.chars().rev() {
        let value: u32 = match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        };
        if value < prev {
            total -= i64::from(value);
        } else {
            total += i64::from(value);
            prev = value;
        }
    }

    u32::try_from(total).ok().filter(|v| *v > 0)
}
