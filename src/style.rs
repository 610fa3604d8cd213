//! Style resolution for candidate elements.
//!
//! Font size and text color are resolved through the same three-source
//! chain: the element's inline `style` attribute, then the first `<style>`
//! block in the document head, then per-tag defaults. The first source that
//! mentions the property settles the value; a mention that fails to parse
//! does not fall through to the next source.

use kuchikikiki::NodeRef;

use crate::color::{parse_color_tokens, ColorTable, Rgb};
use crate::dom::{self, Document};
use crate::options::{ExtractionOptions, Quirks};

const FONT_SIZE_PROPERTY: &str = "font-size";
const COLOR_PROPERTY: &str = "color";

/// Multiplying an em value out to pixels against a base font size.
pub fn em_to_px(em: f64, base_px: f64) -> f64 {
    em * base_px
}

/// Resolves font sizes and colors for elements of one document.
pub struct StyleResolver<'a> {
    sheet: Option<String>,
    options: &'a ExtractionOptions,
    colors: &'a ColorTable,
}

impl<'a> StyleResolver<'a> {
    pub fn new(
        doc: &Document,
        options: &'a ExtractionOptions,
        colors: &'a ColorTable,
    ) -> StyleResolver<'a> {
        StyleResolver {
            sheet: doc.head_style(),
            options,
            colors,
        }
    }

    /// The element's font size in pixels. Unparseable declarations yield
    /// `-1.0`, which no size range accepts.
    pub fn font_size_px(&self, el: &NodeRef) -> f64 {
        if let Some(style) = dom::attr(el, "style") {
            if style.contains(FONT_SIZE_PROPERTY) {
                let fragments: Vec<&str> = style.split(FONT_SIZE_PROPERTY).collect();
                return self.font_size_from_fragments(&fragments);
            }
        }
        let tag = match dom::tag_name(el) {
            Some(tag) => tag.as_ref().to_string(),
            None => return 0.0,
        };
        if let Some(sheet) = &self.sheet {
            if let Some(fragment) = stylesheet_fragment(sheet, &tag, FONT_SIZE_PROPERTY) {
                return self.font_size_from_fragments(&[&fragment]);
            }
        }
        self.default_font_size(&tag)
    }

    /// The element's text color, defaulting to black when no source
    /// mentions `color` or the mention cannot be parsed.
    pub fn color(&self, el: &NodeRef) -> Rgb {
        if let Some(style) = dom::attr(el, "style") {
            if style.contains(COLOR_PROPERTY) {
                let fragments: Vec<String> =
                    style.split(COLOR_PROPERTY).map(str::to_string).collect();
                return parse_color_tokens(&fragments, self.colors).unwrap_or(Rgb::BLACK);
            }
        }
        if let (Some(sheet), Some(tag)) = (&self.sheet, dom::tag_name(el)) {
            if let Some(fragment) = stylesheet_fragment(sheet, tag.as_ref(), COLOR_PROPERTY) {
                return parse_color_tokens(&[fragment], self.colors).unwrap_or(Rgb::BLACK);
            }
        }
        Rgb::BLACK
    }

    /// First fragment that names a unit decides the size; none means the
    /// declaration was unreadable.
    fn font_size_from_fragments(&self, fragments: &[&str]) -> f64 {
        fragments
            .iter()
            .find_map(|fragment| parse_css_length(fragment, self.options))
            .unwrap_or(-1.0)
    }

    fn default_font_size(&self, tag: &str) -> f64 {
        let em = match tag {
            "p" | "span" | "div" | "time" | "h4" => 1.0,
            "h1" => 2.0,
            "h2" => 1.5,
            "h3" => 1.17,
            "h5" => 0.83,
            "h6" => 0.67,
            _ => return 0.0,
        };
        em_to_px(em, self.options.base_px)
    }
}

/// The text that follows a `{property}` declaration for `tag` in a
/// stylesheet, or `None` when the sheet makes no such declaration.
///
/// The matching is substring-based on `"{tag} {"` / `"{tag}{"`; a sheet
/// that mentions the property and the tag selector without pairing them in
/// one resolvable declaration yields an empty fragment, which downstream
/// parsing rejects.
fn stylesheet_fragment(sheet: &str, tag: &str, property: &str) -> Option<String> {
    if !sheet.contains(property) || !selector_matches(sheet, tag) {
        return None;
    }
    if !sheet
        .split('}')
        .any(|block| block.contains(tag) && block.contains(property))
    {
        return None;
    }
    let parts: Vec<&str> = sheet.split(property).collect();
    for window in 0..parts.len().saturating_sub(1) {
        if selector_matches(parts[window], tag) {
            return Some(parts[window + 1].to_string());
        }
    }
    Some(String::new())
}

fn selector_matches(text: &str, tag: &str) -> bool {
    text.contains(&format!("{tag} {{")) || text.contains(&format!("{tag}{{"))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LengthUnit {
    Em,
    Percent,
    Px,
}

/// Parses one `: <number><unit>` fragment. The unit is whichever of `em`,
/// `%`, `px` appears first; the number is the leading digit run after the
/// separator character.
fn parse_css_length(fragment: &str, options: &ExtractionOptions) -> Option<f64> {
    let unit = [
        ("em", LengthUnit::Em),
        ("%", LengthUnit::Percent),
        ("px", LengthUnit::Px),
    ]
    .into_iter()
    .filter_map(|(marker, unit)| fragment.find(marker).map(|at| (at, unit)))
    .min_by_key(|(at, _)| *at)
    .map(|(_, unit)| unit)?;

    let mut chars = fragment.chars();
    chars.next();
    let run: String = chars
        .as_str()
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value = match run.parse::<f64>() {
        Ok(v) => v,
        Err(_) => return Some(-1.0),
    };
    Some(match unit {
        LengthUnit::Em => em_to_px(value, options.base_px),
        LengthUnit::Percent if options.has_quirk(Quirks::PERCENT_FONT_SIZE) => value / 100.0,
        LengthUnit::Percent => em_to_px(value / 100.0, options.base_px),
        LengthUnit::Px => value,
    })
}
