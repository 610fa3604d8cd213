//! Layout stand-ins computed from document order.
//!
//! No real layout engine is involved. Vertical position is approximated by
//! an element's rank among the body's elements, and "visible without
//! scrolling" by projecting the page onto text lines: a detached copy of
//! the document gets a line marker in front of every block-level element,
//! the body text is flattened, and an element counts as visible when its
//! text appears on one of the first lines.

use kuchikikiki::iter::NodeIterator;
use kuchikikiki::NodeRef;

use crate::dom::{self, Document};
use crate::options::ExtractionOptions;

/// Tags that start a new line in the projection.
const LINE_BREAK_TAGS: [&str; 11] =
    ["br", "p", "h1", "h2", "h3", "h4", "h5", "h6", "div", "td", "li"];

/// Marker inserted into the copy; survives whitespace collapsing because it
/// is the two characters `\` `n`, not a newline.
const LINE_MARKER: &str = "\\n";

/// Position estimates for one document, precomputed at construction.
pub struct GeometryProxy {
    body_order: Vec<NodeRef>,
    lines: Vec<String>,
    cutoff: usize,
}

impl GeometryProxy {
    pub fn new(doc: &Document, options: &ExtractionOptions) -> GeometryProxy {
        GeometryProxy {
            body_order: doc.body_elements(),
            lines: marked_lines(doc),
            cutoff: options.visible_line_cutoff,
        }
    }

    /// True when the element sits in the first half of the body's elements.
    /// Elements outside the body are never in the top half.
    pub fn top_half(&self, el: &NodeRef) -> bool {
        match self.body_order.iter().position(|n| n == el) {
            Some(rank) => (rank as f64) / (self.body_order.len() as f64) < 0.5,
            None => false,
        }
    }

    /// True when some line within the cutoff window contains the element's
    /// collapsed text.
    pub fn visible_without_scroll(&self, el: &NodeRef) -> bool {
        let text = dom::normalized_text(el);
        self.lines
            .iter()
            .take(self.cutoff + 1)
            .any(|line| line.contains(&text))
    }
}

/// The line projection: marker insertion on a detached copy, then flatten,
/// then split. The `&gt;` rewrite is kept from the flattening step the
/// thresholds were tuned against; entities are already decoded here.
fn marked_lines(doc: &Document) -> Vec<String> {
    let copy = doc.deep_clone();
    let breaks: Vec<NodeRef> = copy
        .root()
        .inclusive_descendants()
        .elements()
        .filter(|e| LINE_BREAK_TAGS.contains(&e.name.local.as_ref()))
        .map(|e| e.as_node().clone())
        .collect();
    for el in &breaks {
        el.insert_before(NodeRef::new_text(LINE_MARKER));
    }
    let body_text = copy.body().map(|b| b.text_contents()).unwrap_or_default();
    let flattened = body_text.split_whitespace().collect::<Vec<_>>().join(" ");
    flattened
        .replace(LINE_MARKER, "\n")
        .replace("&gt;", ">")
        .split('\n')
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy(html: &str, options: &ExtractionOptions) -> (Document, GeometryProxy) {
        let doc = Document::parse(html);
        let geometry = GeometryProxy::new(&doc, options);
        (doc, geometry)
    }

    #[test]
    fn top_half_is_a_strict_ratio() {
        let options = ExtractionOptions::default();
        let (doc, geometry) =
            proxy("<body><p>a</p><p>b</p><p>c</p><p>d</p></body>", &options);
        let ps = doc.elements_by_tag("p");
        assert!(geometry.top_half(&ps[0]));
        assert!(geometry.top_half(&ps[1]));
        // rank 2 of 4 is exactly 0.5
        assert!(!geometry.top_half(&ps[2]));
        assert!(!geometry.top_half(&ps[3]));
    }

    #[test]
    fn top_half_counts_nested_elements() {
        let options = ExtractionOptions::default();
        let (doc, geometry) = proxy(
            "<body><div><span>early</span></div><p>mid</p><p>late</p><p>tail</p><p>end</p></body>",
            &options,
        );
        // body order: div span p p p p, six elements
        let span = &doc.elements_by_tag("span")[0];
        assert!(geometry.top_half(span));
        let last = doc.elements_by_tag("p").last().cloned().unwrap();
        assert!(!geometry.top_half(&last));
    }

    #[test]
    fn elements_outside_the_body_are_not_top_half() {
        let options = ExtractionOptions::default();
        let (_, geometry) = proxy("<body><p>only</p></body>", &options);
        let other = Document::parse("<body><p>foreign</p></body>");
        let foreign = &other.elements_by_tag("p")[0];
        assert!(!geometry.top_half(foreign));
    }

    #[test]
    fn block_tags_open_new_lines() {
        let options = ExtractionOptions::builder().visible_line_cutoff(2).build();
        let (doc, geometry) = proxy(
            "<body><p>alpha</p><p>beta</p><p>gamma</p><p>delta</p><p>omega</p></body>",
            &options,
        );
        let ps = doc.elements_by_tag("p");
        // lines: "", alpha, beta, gamma, delta, omega; window is 0..=2
        assert!(geometry.visible_without_scroll(&ps[0]));
        assert!(geometry.visible_without_scroll(&ps[1]));
        assert!(!geometry.visible_without_scroll(&ps[2]));
        assert!(!geometry.visible_without_scroll(&ps[4]));
    }

    #[test]
    fn inline_elements_share_their_parents_line() {
        let options = ExtractionOptions::builder().visible_line_cutoff(1).build();
        let (doc, geometry) =
            proxy("<body><p>intro <span>tail</span></p></body>", &options);
        let span = &doc.elements_by_tag("span")[0];
        let p = &doc.elements_by_tag("p")[0];
        assert!(geometry.visible_without_scroll(span));
        assert!(geometry.visible_without_scroll(p));
    }

    #[test]
    fn default_window_reaches_forty_lines() {
        let mut html = String::from("<body>");
        for i in 0..60 {
            html.push_str(&format!("<p>row {i} text</p>"));
        }
        html.push_str("</body>");
        let options = ExtractionOptions::default();
        let (doc, geometry) = proxy(&html, &options);
        let ps = doc.elements_by_tag("p");
        // row k sits on line k + 1
        assert!(geometry.visible_without_scroll(&ps[39]));
        assert!(!geometry.visible_without_scroll(&ps[40]));
        assert!(!geometry.visible_without_scroll(&ps[59]));
    }
}
