//! The fixed feature schema: eight visual features followed by six link
//! features. Decision trees address features by description string, so the
//! order and the exact wording here are load-bearing; the wording follows
//! the dataset this models, misspellings included.

use serde::Serialize;

use crate::link::LinkFeatures;
use crate::visual::VisualFeatures;

pub const FEATURE_COUNT: usize = 14;
pub const VISUAL_FEATURE_COUNT: usize = 8;

/// One column of the feature matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Feature {
    AuthorExists,
    CategoryExists,
    CommentLinkExists,
    ContentExists,
    PublicationDateExists,
    RelatedNewsLinksExists,
    SourceExists,
    TitleExists,
    LinkNoReservedWord,
    LinkNoTrailingSlash,
    LinkHasDate,
    LinkHasFourSlashes,
    LinkHasIdNumber,
    LinkHasLongerLength,
}

const DESCRIPTIONS: [&str; FEATURE_COUNT] = [
    "Article Author Exists?",
    "Article Category Exists?",
    "Article Comment Link Exists?",
    "Article Content Exists?",
    "Article Publication Date Exists?",
    "Article Related News Link Exists?",
    "Article Source Exists?",
    "Article Title Exists?",
    "Link Does Not Contain Reserve Word?",
    "Link Does Not End With Slash?",
    "Link Has Date?",
    "Link Has Four Slashes?",
    "Link Has ID Number?",
    "Link Has Longer Length?",
];

impl Feature {
    /// Every feature, in matrix order.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::AuthorExists,
        Feature::CategoryExists,
        Feature::CommentLinkExists,
        Feature::ContentExists,
        Feature::PublicationDateExists,
        Feature::RelatedNewsLinksExists,
        Feature::SourceExists,
        Feature::TitleExists,
        Feature::LinkNoReservedWord,
        Feature::LinkNoTrailingSlash,
        Feature::LinkHasDate,
        Feature::LinkHasFourSlashes,
        Feature::LinkHasIdNumber,
        Feature::LinkHasLongerLength,
    ];

    /// The page-content features alone, the leading block of [`Feature::ALL`].
    pub const VISUAL: [Feature; VISUAL_FEATURE_COUNT] = [
        Feature::AuthorExists,
        Feature::CategoryExists,
        Feature::CommentLinkExists,
        Feature::ContentExists,
        Feature::PublicationDateExists,
        Feature::RelatedNewsLinksExists,
        Feature::SourceExists,
        Feature::TitleExists,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn description(self) -> &'static str {
        DESCRIPTIONS[self.index()]
    }

    pub fn from_description(description: &str) -> Option<Feature> {
        DESCRIPTIONS
            .iter()
            .position(|d| *d == description)
            .map(|i| Feature::ALL[i])
    }

    /// Descriptions for the first `count` features, for tree construction.
    pub fn descriptions(count: usize) -> &'static [&'static str] {
        &DESCRIPTIONS[..count]
    }
}

/// One page's fourteen feature booleans, in [`Feature::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureVector {
    values: [bool; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn new(values: [bool; FEATURE_COUNT]) -> FeatureVector {
        FeatureVector { values }
    }

    /// Assembles the vector from the two extractor outputs.
    pub fn from_parts(visual: &VisualFeatures, link: &LinkFeatures) -> FeatureVector {
        FeatureVector::new([
            visual.author,
            visual.category,
            visual.comment_link,
            visual.content,
            visual.publication_date,
            visual.related_news_links,
            visual.source,
            visual.title,
            link.no_reserved_word,
            link.no_trailing_slash,
            link.has_date,
            link.has_four_slashes,
            link.has_id_number,
            link.has_longer_length,
        ])
    }

    pub fn get(&self, feature: Feature) -> bool {
        self.values[feature.index()]
    }

    /// Lookup by description string, the form trees store.
    pub fn by_description(&self, description: &str) -> Option<bool> {
        Feature::from_description(description).map(|f| self.get(f))
    }

    pub fn values(&self) -> &[bool; FEATURE_COUNT] {
        &self.values
    }
}
