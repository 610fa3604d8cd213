//! Parsed-document wrapper used by every detector.
//!
//! Wraps a kuchikikiki DOM and exposes the handful of views the feature
//! extractors need: the candidate element set, the body subtree in document
//! order, the first head stylesheet, attribute access, and a detached clone
//! for the line-projection rewrite. Element handles are plain [`NodeRef`]s;
//! handle equality is node identity.

use html5ever::tendril::TendrilSink;
use html5ever::LocalName;
use kuchikikiki::iter::NodeIterator;
use kuchikikiki::NodeRef;
use std::fs;
use std::path::Path;

use crate::error::{DetectError, Result};

/// Tags whose elements form the candidate set, in the order the detectors
/// scan them. Duplicates across tags are permitted by construction.
pub const CANDIDATE_TAGS: [&str; 10] =
    ["p", "span", "time", "div", "h1", "h2", "h3", "h4", "h5", "h6"];

/// A parsed HTML page.
///
/// Parsing never fails; html5ever recovers from any input and always
/// produces an `html/head/body` skeleton.
pub struct Document {
    root: NodeRef,
}

impl Document {
    /// Parses an HTML string.
    pub fn parse(html: &str) -> Self {
        Document {
            root: kuchikikiki::parse_html().one(html),
        }
    }

    /// Reads and parses an HTML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let html = fs::read_to_string(path)
            .map_err(|e| DetectError::Io(path.display().to_string(), e))?;
        Ok(Self::parse(&html))
    }

    /// The document node.
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// The `<body>` element, if the parse produced one.
    pub fn body(&self) -> Option<NodeRef> {
        first_by_tag(&self.root, "body")
    }

    /// All elements with the given tag, in document order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeRef> {
        self.root
            .inclusive_descendants()
            .elements()
            .filter(|e| e.name.local.as_ref() == tag)
            .map(|e| e.as_node().clone())
            .collect()
    }

    /// The candidate element set: every `p`, `span`, `time`, `div`,
    /// `h1`..`h6` in the whole document, grouped by tag in that order.
    pub fn candidates(&self) -> Vec<NodeRef> {
        let mut out = Vec::new();
        for tag in &CANDIDATE_TAGS {
            out.extend(self.elements_by_tag(tag));
        }
        out
    }

    /// All elements below `<body>` (exclusive), in document order.
    pub fn body_elements(&self) -> Vec<NodeRef> {
        match self.body() {
            Some(body) => body
                .descendants()
                .elements()
                .map(|e| e.as_node().clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Raw text of the first `<style>` element under `<head>`.
    pub fn head_style(&self) -> Option<String> {
        let head = first_by_tag(&self.root, "head")?;
        let style = first_by_tag(&head, "style")?;
        Some(style.text_contents())
    }

    /// A detached copy of the document, for rewrites that must not touch
    /// the original tree. Round-trips through the serializer, so the copy
    /// shares no nodes with `self`.
    pub fn deep_clone(&self) -> Document {
        let mut html = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.root.serialize(&mut html);
        Document::parse(&String::from_utf8_lossy(&html))
    }
}

/// First element with the given tag under `root`, in document order.
fn first_by_tag(root: &NodeRef, tag: &str) -> Option<NodeRef> {
    root.inclusive_descendants()
        .elements()
        .find(|e| e.name.local.as_ref() == tag)
        .map(|e| e.as_node().clone())
}

/// Lowercase tag name of an element node, `None` for non-elements.
pub fn tag_name(node: &NodeRef) -> Option<LocalName> {
    node.as_element().map(|e| e.name.local.clone())
}

/// Value of an attribute on an element node.
pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    let element = node.as_element()?;
    let attributes = element.attributes.borrow();
    attributes.get(name).map(|v| v.to_string())
}

/// Concatenated descendant text with runs of whitespace collapsed to single
/// spaces and the ends trimmed.
pub fn normalized_text(node: &NodeRef) -> String {
    node.text_contents()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// True if any ancestor of `node` is an element with the given tag.
pub fn has_ancestor_tag(node: &NodeRef, tag: &str) -> bool {
    node.ancestors().elements().any(|e| e.name.local.as_ref() == tag)
}

/// True if any descendant of `node` is an element with the given tag.
pub fn has_descendant_tag(node: &NodeRef, tag: &str) -> bool {
    node.descendants().elements().any(|e| e.name.local.as_ref() == tag)
}
