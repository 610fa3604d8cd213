//! Configuration options for feature extraction.
//!
//! This module provides [`ExtractionOptions`] and [`ExtractionOptionsBuilder`]
//! for configuring the visual-feature detectors, plus the [`Quirks`] flag set
//! that keeps the extractor bug-compatible with the measurement campaign the
//! detector thresholds were tuned on.
//!
//! ## Example
//!
//! ```rust
//! use articledetect::ExtractionOptions;
//!
//! // Defaults match the original study: threshold 150, cutoff 40, quirks on
//! let options = ExtractionOptions::default();
//!
//! // Builder for custom values
//! let options = ExtractionOptions::builder()
//!     .color_match_threshold(100)
//!     .legacy_quirks(false)
//!     .build();
//! ```

use bitflags::bitflags;

/// Color-proximity threshold used by the detectors (sum of per-channel
/// absolute differences).
pub const DEFAULT_COLOR_THRESHOLD: u32 = 150;

/// Last line index still considered visible without scrolling.
pub const DEFAULT_LINE_CUTOFF: usize = 40;

/// Browser-default font size in pixels; multiplied by the tag em ratios.
pub const DEFAULT_BASE_PX: f64 = 16.0;

bitflags! {
    /// Historical behaviors of the original extractor that the tuned
    /// thresholds depend on. All are enabled by default; clear individual
    /// flags (or all of them via
    /// [`legacy_quirks(false)`](ExtractionOptionsBuilder::legacy_quirks))
    /// to get the corrected behavior.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Quirks: u8 {
        /// Percent font sizes resolve to `value / 100` pixels without
        /// re-applying the inherited size, so `80%` is `0.8` px.
        const PERCENT_FONT_SIZE = 1 << 0;

        /// Word boundaries are "outside `'A'..'z'`", a range that includes
        /// the six punctuation characters between `Z` and `a`.
        const LOOSE_WORD_BOUNDS = 1 << 1;

        /// The day-before-month date check compares with `<=` where `>=`
        /// was intended, so it almost never fires.
        const DAY_BEFORE_MONTH = 1 << 2;
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks::all()
    }
}

/// Configuration for the visual-feature extractor.
///
/// ## Creating Options
///
/// ### Using Default
///
/// ```rust
/// use articledetect::ExtractionOptions;
///
/// let options = ExtractionOptions::default();
/// ```
///
/// ### Using Builder
///
/// ```rust
/// use articledetect::ExtractionOptions;
///
/// let options = ExtractionOptions::builder()
///     .color_match_threshold(200)
///     .visible_line_cutoff(25)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    /// Maximum summed per-channel difference for two colors to count as
    /// "near". Clamped to `[0, 765]` when applied. The black baseline
    /// ignores this and requires an exact match.
    ///
    /// Default: `150`
    pub color_match_threshold: u32,

    /// Highest line index of the tag-to-newline projection that still counts
    /// as visible without scrolling.
    ///
    /// Default: `40`
    pub visible_line_cutoff: usize,

    /// Base font size in pixels used for `em` values and tag defaults.
    ///
    /// Default: `16.0`
    pub base_px: f64,

    /// Which historical behaviors to keep. See [`Quirks`].
    ///
    /// Default: [`Quirks::all`]
    pub quirks: Quirks,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            color_match_threshold: DEFAULT_COLOR_THRESHOLD,
            visible_line_cutoff: DEFAULT_LINE_CUTOFF,
            base_px: DEFAULT_BASE_PX,
            quirks: Quirks::all(),
        }
    }
}

impl ExtractionOptions {
    /// Creates a new builder for ExtractionOptions
    pub fn builder() -> ExtractionOptionsBuilder {
        ExtractionOptionsBuilder::default()
    }

    /// True when the given quirk is enabled.
    pub fn has_quirk(&self, quirk: Quirks) -> bool {
        self.quirks.contains(quirk)
    }
}

/// Builder for [`ExtractionOptions`].
///
/// ## Example
///
/// ```rust
/// use articledetect::ExtractionOptions;
///
/// let options = ExtractionOptions::builder()
///     .color_match_threshold(100)
///     .visible_line_cutoff(40)
///     .legacy_quirks(true)
///     .build();
/// ```
#[derive(Default)]
pub struct ExtractionOptionsBuilder {
    color_match_threshold: Option<u32>,
    visible_line_cutoff: Option<usize>,
    base_px: Option<f64>,
    quirks: Option<Quirks>,
}

impl ExtractionOptionsBuilder {
    /// Set the color-proximity threshold
    pub fn color_match_threshold(mut self, threshold: u32) -> Self {
        self.color_match_threshold = Some(threshold);
        self
    }

    /// Set the visible-without-scroll line cutoff
    pub fn visible_line_cutoff(mut self, cutoff: usize) -> Self {
        self.visible_line_cutoff = Some(cutoff);
        self
    }

    /// Set the base pixel size
    pub fn base_px(mut self, px: f64) -> Self {
        self.base_px = Some(px);
        self
    }

    /// Enable all historical behaviors (`true`, the default) or none
    /// (`false`)
    pub fn legacy_quirks(mut self, legacy: bool) -> Self {
        self.quirks = Some(if legacy { Quirks::all() } else { Quirks::empty() });
        self
    }

    /// Set the quirk flags individually
    pub fn quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = Some(quirks);
        self
    }

    /// Build the ExtractionOptions
    pub fn build(self) -> ExtractionOptions {
        let defaults = ExtractionOptions::default();
        ExtractionOptions {
            color_match_threshold: self
                .color_match_threshold
                .unwrap_or(defaults.color_match_threshold),
            visible_line_cutoff: self
                .visible_line_cutoff
                .unwrap_or(defaults.visible_line_cutoff),
            base_px: self.base_px.unwrap_or(defaults.base_px),
            quirks: self.quirks.unwrap_or(defaults.quirks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_every_quirk() {
        let options = ExtractionOptions::default();
        assert_eq!(options.color_match_threshold, 150);
        assert_eq!(options.visible_line_cutoff, 40);
        assert_eq!(options.base_px, 16.0);
        assert!(options.has_quirk(Quirks::PERCENT_FONT_SIZE));
        assert!(options.has_quirk(Quirks::LOOSE_WORD_BOUNDS));
        assert!(options.has_quirk(Quirks::DAY_BEFORE_MONTH));
    }

    #[test]
    fn builder_overrides_and_falls_back() {
        let options = ExtractionOptions::builder()
            .color_match_threshold(99)
            .legacy_quirks(false)
            .build();
        assert_eq!(options.color_match_threshold, 99);
        assert_eq!(options.visible_line_cutoff, 40);
        assert_eq!(options.quirks, Quirks::empty());
    }

    #[test]
    fn quirks_can_be_cleared_individually() {
        let options = ExtractionOptions::builder()
            .quirks(Quirks::all() - Quirks::DAY_BEFORE_MONTH)
            .build();
        assert!(options.has_quirk(Quirks::PERCENT_FONT_SIZE));
        assert!(!options.has_quirk(Quirks::DAY_BEFORE_MONTH));
    }
}
