//! Ordered lookup tables for the empirical correction factors.
//!
//! A [`BandTable`] maps a measured quantity onto a factor through inclusive upper
//! bounds; a [`KeywordTable`] does the same for free-text descriptors such as a frame
//! material. Both live in the model configuration so calibration never touches code.

use serde::{Deserialize, Serialize};

/// Threshold -> factor table. Bands are `(upper_bound, factor)` in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTable {
    pub bands: Vec<(f64, f64)>,
    /// Factor for values above the last bound (and for NaN)
    pub otherwise: f64,
}

impl BandTable {
    pub fn new(bands: &[(f64, f64)], otherwise: f64) -> Self {
        Self {
            bands: bands.to_vec(),
            otherwise,
        }
    }

    /// Factor of the first band whose upper bound is `>= value`.
    pub fn lookup(&self, value: f64) -> f64 {
        self.bands
            .iter()
            .find(|(upper, _)| value <= *upper)
            .map(|(_, factor)| *factor)
            .unwrap_or(self.otherwise)
    }

    /// Every factor the table can return, `otherwise` last.
    pub fn factors(&self) -> impl Iterator<Item = f64> + '_ {
        self.bands
            .iter()
            .map(|(_, factor)| *factor)
            .chain(std::iter::once(self.otherwise))
    }

    /// True when upper bounds strictly increase.
    pub fn is_ordered(&self) -> bool {
        self.bands.windows(2).all(|pair| pair[0].0 < pair[1].0)
    }
}

/// Keyword -> factor table for descriptive text, first match wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTable {
    pub entries: Vec<(String, f64)>,
    pub otherwise: f64,
}

impl KeywordTable {
    pub fn new(entries: &[(&str, f64)], otherwise: f64) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(keyword, factor)| (keyword.to_string(), *factor))
                .collect(),
            otherwise,
        }
    }

    /// Value of the first keyword contained (case-insensitive) in `text`.
    pub fn lookup(&self, text: &str) -> f64 {
        let text = text.to_lowercase();
        self.entries
            .iter()
            .find(|(keyword, _)| text.contains(&keyword.to_lowercase()))
            .map(|(_, factor)| *factor)
            .unwrap_or(self.otherwise)
    }
}
