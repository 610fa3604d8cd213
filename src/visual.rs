//! The eight page-content detectors.
//!
//! Each detector encodes one row of the tuned rule table: an element type,
//! a font-size window, color baselines, position and visibility
//! requirements, and text predicates. A feature is present when **any**
//! candidate element satisfies every rule of its row. Candidates are the
//! text-bearing tags `p`, `span`, `time`, `div`, `h1`..`h6`.

use kuchikikiki::NodeRef;
use serde::Serialize;

use crate::color::{ColorTable, Rgb};
use crate::dom::{self, Document};
use crate::geometry::GeometryProxy;
use crate::options::ExtractionOptions;
use crate::style::StyleResolver;
use crate::text;

const BLUE: Rgb = Rgb::new(0x00, 0x00, 0xFF);
const GRAY: Rgb = Rgb::new(0x80, 0x80, 0x80);
const BROWN: Rgb = Rgb::new(0xA5, 0x2A, 0x2A);

/// Breadcrumb separators; any one of them marks a category trail.
const CATEGORY_MARKERS: [&str; 3] = ["->", ">", "|"];

const AUTHOR_WORDS: [&str; 2] = ["by", "author"];
const SOURCE_WORDS: [&str; 2] = ["from", "source"];
const RELATED_PHRASES: [&str; 2] = ["related news", "related links"];

/// The eight visual features of one page, in feature-vector order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VisualFeatures {
    pub author: bool,
    pub category: bool,
    pub comment_link: bool,
    pub content: bool,
    pub publication_date: bool,
    pub related_news_links: bool,
    pub source: bool,
    pub title: bool,
}

/// Runs the rule table over one parsed document.
///
/// Style resolution, element order, and the line projection are computed
/// once at construction and shared by all eight detectors.
pub struct VisualFeatureExtractor<'a> {
    candidates: Vec<NodeRef>,
    styles: StyleResolver<'a>,
    geometry: GeometryProxy,
    options: &'a ExtractionOptions,
}

impl<'a> VisualFeatureExtractor<'a> {
    pub fn new(
        document: &Document,
        options: &'a ExtractionOptions,
        colors: &'a ColorTable,
    ) -> VisualFeatureExtractor<'a> {
        VisualFeatureExtractor {
            candidates: document.candidates(),
            styles: StyleResolver::new(document, options, colors),
            geometry: GeometryProxy::new(document, options),
            options,
        }
    }

    /// All eight detectors at once.
    pub fn extract(&self) -> VisualFeatures {
        VisualFeatures {
            author: self.author_exists(),
            category: self.category_exists(),
            comment_link: self.comment_link_exists(),
            content: self.content_exists(),
            publication_date: self.publication_date_exists(),
            related_news_links: self.related_news_links_exist(),
            source: self.source_exists(),
            title: self.title_exists(),
        }
    }

    /// Headline: large, black or blue, early in the page, on screen,
    /// mid-length text, and not itself a link.
    pub fn title_exists(&self) -> bool {
        self.candidates.iter().any(|el| {
            let text = dom::normalized_text(el);
            self.font_size_in(el, 15.0, 45.0)
                && self.color_near_any(el, &[Rgb::BLACK, BLUE])
                && self.geometry.top_half(el)
                && self.geometry.visible_without_scroll(el)
                && text::length_in_range(&text, 8, 50)
                && !text::is_hyperlinked(el)
        })
    }

    /// Dateline: small dark text in a date shape, not a link.
    pub fn publication_date_exists(&self) -> bool {
        self.candidates.iter().any(|el| {
            let text = dom::normalized_text(el);
            self.font_size_in(el, 0.0, 10.0)
                && self.color_near_any(el, &[Rgb::BLACK, BLUE, GRAY])
                && text::length_in_range(&text, 0, 19)
                && text::looks_like_date(&text, self.options.quirks)
                && !text::is_hyperlinked(el)
        })
    }

    /// Byline: small short text containing "by" or "author" as a word.
    pub fn author_exists(&self) -> bool {
        self.candidates.iter().any(|el| {
            let text = dom::normalized_text(el);
            self.font_size_in(el, 0.0, 13.0)
                && text::length_in_range(&text, 3, 25)
                && text::contains_whole_word(&text, &AUTHOR_WORDS, self.options.quirks)
        })
    }

    /// A link whose short text mentions "comment".
    pub fn comment_link_exists(&self) -> bool {
        self.candidates.iter().any(|el| {
            let text = dom::normalized_text(el);
            self.font_size_in(el, 0.0, 12.0)
                && text::length_in_range(&text, 6, 15)
                && text::contains_whole_word(&text, &["comment"], self.options.quirks)
                && text::is_hyperlinked(el)
        })
    }

    /// Attribution line: "from" or "source" in small dark or brown text.
    pub fn source_exists(&self) -> bool {
        self.candidates.iter().any(|el| {
            let text = dom::normalized_text(el);
            self.font_size_in(el, 0.0, 12.0)
                && self.color_near_any(el, &[Rgb::BLACK, GRAY, BROWN])
                && text::contains_whole_word(&text, &SOURCE_WORDS, self.options.quirks)
                && text::length_in_range(&text, 4, 25)
        })
    }

    /// Body copy: a long run of plain black text at reading size, on
    /// screen. The upper length bound only exists to keep the range strict.
    pub fn content_exists(&self) -> bool {
        self.candidates.iter().any(|el| {
            let text = dom::normalized_text(el);
            self.font_size_in(el, 6.0, 12.0)
                && self.color_near_any(el, &[Rgb::BLACK])
                && self.geometry.visible_without_scroll(el)
                && text::length_in_range(&text, 20, 2_000_000_000)
        })
    }

    /// Breadcrumb trail: short early on-screen text with a separator.
    pub fn category_exists(&self) -> bool {
        self.candidates.iter().any(|el| {
            let text = dom::normalized_text(el);
            self.font_size_in(el, 0.0, 12.0)
                && self.geometry.top_half(el)
                && self.geometry.visible_without_scroll(el)
                && text::length_in_range(&text, 8, 30)
                && text::contains_any_substring(&text, &CATEGORY_MARKERS)
        })
    }

    /// "Related news" block: linked text in the lower half of the page.
    pub fn related_news_links_exist(&self) -> bool {
        self.candidates.iter().any(|el| {
            let text = dom::normalized_text(el);
            self.font_size_in(el, 0.0, 12.0)
                && self.color_near_any(el, &[Rgb::BLACK, BLUE])
                && !self.geometry.top_half(el)
                && text::is_hyperlinked(el)
                && text::contains_whole_word(&text, &RELATED_PHRASES, self.options.quirks)
        })
    }

    fn font_size_in(&self, el: &NodeRef, lo: f64, hi: f64) -> bool {
        let size = self.styles.font_size_px(el);
        size >= lo && size <= hi
    }

    fn color_near_any(&self, el: &NodeRef, baselines: &[Rgb]) -> bool {
        let color = self.styles.color(el);
        baselines
            .iter()
            .any(|&baseline| color.near(baseline, self.options.color_match_threshold))
    }
}
