//! Bin registry: labels, colors and hit highlights for the bin row

use serde::{Deserialize, Serialize};

use super::board::BinIndex;
use crate::colors::{Rgb, bin_gradients, palette};
use crate::consts::HIGHLIGHT_TICKS;

/// Labels used when the configured labels do not match the bin count
pub const LABEL_TEMPLATE: [&str; 9] = ["$1", "$5", "$10", "$25", "$50", "$25", "$10", "$5", "$1"];

/// Fit `labels` to exactly `count` entries
///
/// Matching labels are kept as they are. Otherwise the centered slice of
/// `LABEL_TEMPLATE` is used, or the template repeated when more bins are needed.
pub fn fit_labels(labels: &[String], count: usize) -> Vec<String> {
    if labels.len() == count {
        return labels.to_vec();
    }

    if count <= LABEL_TEMPLATE.len() {
        let start = (LABEL_TEMPLATE.len() - count) / 2;
        LABEL_TEMPLATE[start..start + count]
            .iter()
            .map(|s| s.to_string())
            .collect()
    } else {
        LABEL_TEMPLATE
            .iter()
            .cycle()
            .take(count)
            .map(|s| s.to_string())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinRegistry {
    labels: Vec<String>,
    colors: Vec<Rgb>,
    shadow_colors: Vec<Rgb>,
    /// Remaining highlight ticks per bin
    highlight: Vec<u32>,
}

impl BinRegistry {
    pub fn new(rows: u32, labels: &[String]) -> Self {
        let count = rows as usize + 1;
        if labels.len() != count {
            log::warn!(
                "{} labels for {} bins, using template labels",
                labels.len(),
                count
            );
        }
        let (colors, shadow_colors) = bin_gradients(count);
        Self {
            labels: fit_labels(labels, count),
            colors,
            shadow_colors,
            highlight: vec![0; count],
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label(&self, bin: BinIndex) -> &str {
        self.labels.get(bin).map(String::as_str).unwrap_or("")
    }

    /// Gradient color of a bin (popup tint)
    pub fn color(&self, bin: BinIndex) -> Rgb {
        self.colors.get(bin).copied().unwrap_or(palette::WHITE)
    }

    pub fn shadow_color(&self, bin: BinIndex) -> Rgb {
        self.shadow_colors.get(bin).copied().unwrap_or(palette::GRAY)
    }

    /// Start (or restart) the pressed-down highlight for a bin
    pub fn register_hit(&mut self, bin: BinIndex) {
        if let Some(ticks) = self.highlight.get_mut(bin) {
            *ticks = HIGHLIGHT_TICKS;
        }
    }

    pub fn is_highlighted(&self, bin: BinIndex) -> bool {
        self.highlight.get(bin).is_some_and(|&ticks| ticks > 0)
    }

    /// Decay highlights by one tick
    pub fn advance(&mut self) {
        for ticks in &mut self.highlight {
            *ticks = ticks.saturating_sub(1);
        }
    }
}
