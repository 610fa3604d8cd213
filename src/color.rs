//! CSS color values: parsing, the named-color table, and proximity.
//!
//! The extractor only ever sees colors as fragments of a `style` attribute or
//! a head stylesheet that have already been split on the property name, so
//! the parsers here work on those fragments rather than on whole
//! declarations. Anything unrecognized resolves to no color at all; the
//! style resolver turns that into black.

use once_cell::sync::Lazy;
use std::fs;
use std::path::Path;

use crate::error::{DetectError, Result};

/// An sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Parses `#RGB` or `#RRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.strip_prefix('#')?;
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return None,
        };
        if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(&expanded, 16).ok()?;
        Some(Rgb::new(
            ((value >> 16) & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
        ))
    }

    /// Sum of per-channel absolute differences, in `0..=765`.
    pub fn distance(self, other: Rgb) -> u32 {
        let d = |a: u8, b: u8| (i32::from(a) - i32::from(b)).unsigned_abs();
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)
    }

    /// Proximity check against a baseline. A black baseline matches only
    /// exact black; any other baseline matches when the channel distance is
    /// within the threshold (clamped to 765).
    pub fn near(self, baseline: Rgb, threshold: u32) -> bool {
        if baseline == Rgb::BLACK {
            return self == Rgb::BLACK;
        }
        self.distance(baseline) <= threshold.min(765)
    }
}

/// Case-insensitive name-to-color table.
///
/// [`ColorTable::builtin`] carries the standard HTML color names so no data
/// file is needed; [`ColorTable::from_csv_file`] loads a `name,#rrggbb`
/// table to replace it.
#[derive(Debug, Clone)]
pub struct ColorTable {
    entries: Vec<(String, Rgb)>,
}

impl ColorTable {
    /// The standard HTML color names.
    pub fn builtin() -> ColorTable {
        BUILTIN.clone()
    }

    /// Loads a two-column `name,#rrggbb` CSV. Blank lines are skipped.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<ColorTable> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| DetectError::Io(path.display().to_string(), e))?;
        let mut entries = Vec::new();
        for (lineno, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (name, hex) = line.split_once(',').ok_or_else(|| {
                DetectError::ColorTable(format!("line {}: expected name,#rrggbb", lineno + 1))
            })?;
            let rgb = Rgb::from_hex(hex.trim()).ok_or_else(|| {
                DetectError::ColorTable(format!("line {}: bad hex value {:?}", lineno + 1, hex))
            })?;
            entries.push((name.trim().to_ascii_lowercase(), rgb));
        }
        Ok(ColorTable { entries })
    }

    /// Exact, case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<Rgb> {
        let name = name.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, rgb)| *rgb)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extracts a color from fragments of a style declaration that was split on
/// the property name `color`. Fragments ending in `-` are skipped so that
/// the prefix of `background-color` never shadows a later value. Within a
/// fragment the grammars are tried in a fixed priority order; the first
/// fragment that yields a color wins.
pub fn parse_color_tokens(tokens: &[String], table: &ColorTable) -> Option<Rgb> {
    for token in tokens {
        if token.ends_with('-') {
            continue;
        }
        let parsed = if token.contains('#') {
            parse_hex_token(token)
        } else if token.contains("rgba") {
            parse_rgb_function(token, "rgba")
        } else if token.contains("rgb") {
            parse_rgb_function(token, "rgb")
        } else if token.contains("hsla") {
            parse_hsl_function(token, "hsla")
        } else if token.contains("hsl") {
            parse_hsl_function(token, "hsl")
        } else {
            parse_named_token(token, table)
        };
        if parsed.is_some() {
            return parsed;
        }
    }
    None
}

/// `#…` up to the next `;`, `)`, `"`, or `}`.
fn parse_hex_token(token: &str) -> Option<Rgb> {
    let start = token.find('#')?;
    let hex: String = token[start..]
        .chars()
        .take_while(|c| !matches!(c, ';' | ')' | '"' | '}'))
        .collect();
    Rgb::from_hex(hex.trim_end())
}

/// `rgb(r,g,b)` / `rgba(r,g,b,a)`; the alpha component is ignored.
fn parse_rgb_function(token: &str, keyword: &str) -> Option<Rgb> {
    let args = function_args(token, keyword)?;
    let mut channels = args.split(',').map(|part| part.trim().parse::<u32>());
    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;
    if r > 255 || g > 255 || b > 255 {
        return None;
    }
    Some(Rgb::new(r as u8, g as u8, b as u8))
}

/// `hsl(h,s%,l%)` / `hsla(h,s%,l%,a)`; the alpha component is ignored.
fn parse_hsl_function(token: &str, keyword: &str) -> Option<Rgb> {
    let args = function_args(token, keyword)?;
    let mut parts = args.split(',');
    let h = parts.next()?.trim().parse::<f64>().ok()?;
    let s = percent_component(parts.next()?)?;
    let l = percent_component(parts.next()?)?;
    Some(hsl_to_rgb(h, s, l))
}

/// The text between the keyword's `(` and the matching `)`.
fn function_args<'t>(token: &'t str, keyword: &str) -> Option<&'t str> {
    let start = token.find(keyword)? + keyword.len();
    let rest = token[start..].trim_start().strip_prefix('(')?;
    let end = rest.find(')')?;
    Some(&rest[..end])
}

fn percent_component(raw: &str) -> Option<f64> {
    let value = raw.trim().trim_end_matches('%').parse::<f64>().ok()?;
    Some(value / 100.0)
}

/// Standard HSL to RGB conversion; hue in degrees, s and l in `[0,1]`.
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(r1), channel(g1), channel(b1))
}

/// Bare color name: skip the leading separator, read up to `;`, `}`, or
/// `"`, then look the trimmed word up in the table.
fn parse_named_token(token: &str, table: &ColorTable) -> Option<Rgb> {
    let mut chars = token.chars();
    chars.next()?;
    let name: String = chars
        .take_while(|c| !matches!(c, ';' | '}' | '"'))
        .collect();
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    table.get(name)
}

static BUILTIN: Lazy<ColorTable> = Lazy::new(|| {
    let entries = BUILTIN_NAMES
        .iter()
        .map(|&(name, value)| {
            (
                name.to_string(),
                Rgb::new(
                    ((value >> 16) & 0xFF) as u8,
                    ((value >> 8) & 0xFF) as u8,
                    (value & 0xFF) as u8,
                ),
            )
        })
        .collect();
    ColorTable { entries }
});

#[rustfmt::skip]
const BUILTIN_NAMES: [(&str, u32); 148] = [
    ("aliceblue", 0xF0F8FF), ("antiquewhite", 0xFAEBD7), ("aqua", 0x00FFFF),
    ("aquamarine", 0x7FFFD4), ("azure", 0xF0FFFF), ("beige", 0xF5F5DC),
    ("bisque", 0xFFE4C4), ("black", 0x000000), ("blanchedalmond", 0xFFEBCD),
    ("blue", 0x0000FF), ("blueviolet", 0x8A2BE2), ("brown", 0xA52A2A),
    ("burlywood", 0xDEB887), ("cadetblue", 0x5F9EA0), ("chartreuse", 0x7FFF00),
    ("chocolate", 0xD2691E), ("coral", 0xFF7F50), ("cornflowerblue", 0x6495ED),
    ("cornsilk", 0xFFF8DC), ("crimson", 0xDC143C), ("cyan", 0x00FFFF),
    ("darkblue", 0x00008B), ("darkcyan", 0x008B8B), ("darkgoldenrod", 0xB8860B),
    ("darkgray", 0xA9A9A9), ("darkgreen", 0x006400), ("darkgrey", 0xA9A9A9),
    ("darkkhaki", 0xBDB76B), ("darkmagenta", 0x8B008B),
    ("darkolivegreen", 0x556B2F), ("darkorange", 0xFF8C00),
    ("darkorchid", 0x9932CC), ("darkred", 0x8B0000), ("darksalmon", 0xE9967A),
    ("darkseagreen", 0x8FBC8F), ("darkslateblue", 0x483D8B),
    ("darkslategray", 0x2F4F4F), ("darkslategrey", 0x2F4F4F),
    ("darkturquoise", 0x00CED1), ("darkviolet", 0x9400D3),
    ("deeppink", 0xFF1493), ("deepskyblue", 0x00BFFF), ("dimgray", 0x696969),
    ("dimgrey", 0x696969), ("dodgerblue", 0x1E90FF), ("firebrick", 0xB22222),
    ("floralwhite", 0xFFFAF0), ("forestgreen", 0x228B22), ("fuchsia", 0xFF00FF),
    ("gainsboro", 0xDCDCDC), ("ghostwhite", 0xF8F8FF), ("gold", 0xFFD700),
    ("goldenrod", 0xDAA520), ("gray", 0x808080), ("green", 0x008000),
    ("greenyellow", 0xADFF2F), ("grey", 0x808080), ("honeydew", 0xF0FFF0),
    ("hotpink", 0xFF69B4), ("indianred", 0xCD5C5C), ("indigo", 0x4B0082),
    ("ivory", 0xFFFFF0), ("khaki", 0xF0E68C), ("lavender", 0xE6E6FA),
    ("lavenderblush", 0xFFF0F5), ("lawngreen", 0x7CFC00),
    ("lemonchiffon", 0xFFFACD), ("lightblue", 0xADD8E6),
    ("lightcoral", 0xF08080), ("lightcyan", 0xE0FFFF),
    ("lightgoldenrodyellow", 0xFAFAD2), ("lightgray", 0xD3D3D3),
    ("lightgreen", 0x90EE90), ("lightgrey", 0xD3D3D3), ("lightpink", 0xFFB6C1),
    ("lightsalmon", 0xFFA07A), ("lightseagreen", 0x20B2AA),
    ("lightskyblue", 0x87CEFA), ("lightslategray", 0x778899),
    ("lightslategrey", 0x778899), ("lightsteelblue", 0xB0C4DE),
    ("lightyellow", 0xFFFFE0), ("lime", 0x00FF00), ("limegreen", 0x32CD32),
    ("linen", 0xFAF0E6), ("magenta", 0xFF00FF), ("maroon", 0x800000),
    ("mediumaquamarine", 0x66CDAA), ("mediumblue", 0x0000CD),
    ("mediumorchid", 0xBA55D3), ("mediumpurple", 0x9370DB),
    ("mediumseagreen", 0x3CB371), ("mediumslateblue", 0x7B68EE),
    ("mediumspringgreen", 0x00FA9A), ("mediumturquoise", 0x48D1CC),
    ("mediumvioletred", 0xC71585), ("midnightblue", 0x191970),
    ("mintcream", 0xF5FFFA), ("mistyrose", 0xFFE4E1), ("moccasin", 0xFFE4B5),
    ("navajowhite", 0xFFDEAD), ("navy", 0x000080), ("oldlace", 0xFDF5E6),
    ("olive", 0x808000), ("olivedrab", 0x6B8E23), ("orange", 0xFFA500),
    ("orangered", 0xFF4500), ("orchid", 0xDA70D6),
    ("palegoldenrod", 0xEEE8AA), ("palegreen", 0x98FB98),
    ("paleturquoise", 0xAFEEEE), ("palevioletred", 0xDB7093),
    ("papayawhip", 0xFFEFD5), ("peachpuff", 0xFFDAB9), ("peru", 0xCD853F),
    ("pink", 0xFFC0CB), ("plum", 0xDDA0DD), ("powderblue", 0xB0E0E6),
    ("purple", 0x800080), ("rebeccapurple", 0x663399), ("red", 0xFF0000),
    ("rosybrown", 0xBC8F8F), ("royalblue", 0x4169E1),
    ("saddlebrown", 0x8B4513), ("salmon", 0xFA8072), ("sandybrown", 0xF4A460),
    ("seagreen", 0x2E8B57), ("seashell", 0xFFF5EE), ("sienna", 0xA0522D),
    ("silver", 0xC0C0C0), ("skyblue", 0x87CEEB), ("slateblue", 0x6A5ACD),
    ("slategray", 0x708090), ("slategrey", 0x708090), ("snow", 0xFFFAFA),
    ("springgreen", 0x00FF7F), ("steelblue", 0x4682B4), ("tan", 0xD2B48C),
    ("teal", 0x008080), ("thistle", 0xD8BFD8), ("tomato", 0xFF6347),
    ("turquoise", 0x40E0D0), ("violet", 0xEE82EE), ("wheat", 0xF5DEB3),
    ("white", 0xFFFFFF), ("whitesmoke", 0xF5F5F5), ("yellow", 0xFFFF00),
    ("yellowgreen", 0x9ACD32),
];
