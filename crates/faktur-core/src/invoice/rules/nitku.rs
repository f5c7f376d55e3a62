//! Buyer NITKU extraction.
//!
//! The NITKU is not labelled. On the e-Faktur layout it closes the buyer
//! address line as `#` plus 22 digits, directly above the buyer's `NPWP`
//! line, so it is located by adjacency rather than by a single pattern.

use super::FieldExtractor;
use super::patterns::NITKU;

/// NITKU field extractor.
pub struct NitkuExtractor;

impl NitkuExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NitkuExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for NitkuExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let lines: Vec<&str> = text.lines().collect();

        lines
            .windows(2)
            .filter(|pair| pair[1].contains("NPWP"))
            .filter_map(|pair| NITKU.captures(pair[0]))
            .map(|caps| caps[1].to_string())
            .collect()
    }
}

/// Extract the buyer NITKU from invoice text.
pub fn extract_nitku(text: &str) -> Option<String> {
    NitkuExtractor::new().extract(text)
}
