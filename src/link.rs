//! URL link features.
//!
//! Six boolean predicates computed from the page URL alone, no fetching.
//! News CMSs leave recognizable residue in their URLs: deep paths, embedded
//! publication dates, numeric story ids, long hyphenated titles. Index and
//! media pages tend to be short, end in a slash, or carry `video`/`photo`
//! path segments.

use serde::Serialize;

/// Substrings that mark a URL as pointing at media rather than an article.
const RESERVED_WORDS: [&str; 2] = ["video", "photo"];

/// URLs at least this long usually carry a story title.
const LONG_URL_LEN: usize = 50;

/// Story ids are large; small numbers in a path are days, pages, sections.
const ID_THRESHOLD: i32 = 1_000_000;

/// The six link features of one URL, in feature-vector order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkFeatures {
    pub no_reserved_word: bool,
    pub no_trailing_slash: bool,
    pub has_date: bool,
    pub has_four_slashes: bool,
    pub has_id_number: bool,
    pub has_longer_length: bool,
}

impl LinkFeatures {
    /// Computes all six predicates for one URL.
    pub fn from_url(url: &str) -> LinkFeatures {
        LinkFeatures {
            no_reserved_word: !RESERVED_WORDS.iter().any(|word| url.contains(word)),
            no_trailing_slash: !url.ends_with('/'),
            has_date: has_embedded_date(url),
            has_four_slashes: url.matches('/').count() >= 4,
            has_id_number: has_id_number(url),
            has_longer_length: url.len() >= LONG_URL_LEN,
        }
    }
}

/// True when three consecutive `/`-separated tokens read `yyyy/m/d`: four
/// digits, then two tokens of one or two digits each.
fn has_embedded_date(url: &str) -> bool {
    let tokens: Vec<&str> = url.split('/').collect();
    tokens.windows(3).any(|window| {
        window[0].len() == 4
            && matches!(window[1].len(), 1 | 2)
            && matches!(window[2].len(), 1 | 2)
            && window.iter().all(|token| all_digits(token))
    })
}

fn all_digits(token: &str) -> bool {
    token.bytes().all(|b| b.is_ascii_digit())
}

/// Looks for a story id in any path token longer than seven characters.
///
/// The id may be the whole token (`/17883242/`), a piece of a hyphenated
/// title (`...-debate-023824069.html`), an `id=` query parameter, or an
/// underscore-separated suffix (`..._us_5ba6acab...`, where any long piece
/// counts).
fn has_id_number(url: &str) -> bool {
    for token in url.split('/') {
        if token.len() <= 7 {
            continue;
        }
        if past_threshold(token) {
            return true;
        }
        for piece in token.split('-') {
            if !piece.starts_with(|c: char| c.is_ascii_digit()) {
                continue;
            }
            let digits = match piece.strip_suffix(".html") {
                Some(stripped) => stripped,
                None if piece.ends_with(|c: char| c.is_ascii_digit()) => piece,
                None => continue,
            };
            if past_threshold(digits) {
                return true;
            }
        }
        if token.contains("?id=") || token.contains("&id=") {
            for piece in token.split("id=") {
                let digits = if piece.ends_with(|c: char| c.is_ascii_digit()) {
                    piece
                } else if let Some(cut) = piece.find('&') {
                    &piece[..cut]
                } else {
                    continue;
                };
                if past_threshold(digits) {
                    return true;
                }
            }
        } else if token.contains('_') && token.split('_').any(|piece| piece.len() > 7) {
            return true;
        }
    }
    false
}

/// Ids beyond `i32` range do not count; overflow reads as "not an id".
fn past_threshold(digits: &str) -> bool {
    digits
        .parse::<i32>()
        .map(|n| n > ID_THRESHOLD)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERGE: &str =
        "theverge.com/2018/9/20/17883242/amazon-alexa-event-2018-news-recap-echo-auto-dot-sub-link-auto-microwave";
    const ABC: &str =
        "abcnews.go.com/GMA/Living/viral-post-volunteer-napping-shelter-cats-brings-funds/story?id=57965675&cid=clicksource_19216223_4_article%20roll_articleroll_hed";
    const YAHOO_DEBATE: &str =
        "yahoo.com/news/cruz-orourke-face-off-testy-texas-senate-debate-023824069.html";
    const HUFFPOST: &str =
        "huffingtonpost.com/entry/tammie-hedges-hurricane-florence-charges-animals_us_5ba6acabe4b0375f8f9d93d6";
    const CBS: &str =
        "cbsnews.com/news/trump-mulls-inviting-saudi-crown-prince-mohammad-bin-salman-to-un-nuclear-meeting/";

    #[test]
    fn four_slashes() {
        assert!(LinkFeatures::from_url(VERGE).has_four_slashes);
        assert!(!LinkFeatures::from_url(CBS).has_four_slashes);
        assert!(LinkFeatures::from_url(ABC).has_four_slashes);
    }

    #[test]
    fn id_number_in_path() {
        assert!(LinkFeatures::from_url(VERGE).has_id_number);
    }

    #[test]
    fn id_number_in_hyphenated_title() {
        assert!(LinkFeatures::from_url(YAHOO_DEBATE).has_id_number);
    }

    #[test]
    fn id_number_as_query_parameter() {
        assert!(LinkFeatures::from_url(ABC).has_id_number);
    }

    #[test]
    fn id_number_after_underscore() {
        assert!(LinkFeatures::from_url(HUFFPOST).has_id_number);
    }

    #[test]
    fn no_id_number_in_section_urls() {
        assert!(!LinkFeatures::from_url("bbc.com/news").has_id_number);
    }

    #[test]
    fn embedded_date() {
        assert!(LinkFeatures::from_url(VERGE).has_date);
        assert!(LinkFeatures::from_url("money.cnn.com/2018/09/20/news/companies/wells-fargo-job-cuts/index.html").has_date);
        assert!(!LinkFeatures::from_url(YAHOO_DEBATE).has_date);
    }

    #[test]
    fn longer_length() {
        assert!(LinkFeatures::from_url(VERGE).has_longer_length);
        assert!(!LinkFeatures::from_url("nytimes.com/section/technology").has_longer_length);
    }

    #[test]
    fn reserved_words() {
        assert!(LinkFeatures::from_url(VERGE).no_reserved_word);
        let video =
            "cnn.com/videos/tech/2015/12/04/exp-cnn-films-steve-jobs-man-in-the-machine-lost-my-wife.cnn";
        assert!(!LinkFeatures::from_url(video).no_reserved_word);
        let photo = "yahoo.com/news/photos-week-9-14-9-220000561.html";
        assert!(!LinkFeatures::from_url(photo).no_reserved_word);
    }

    #[test]
    fn trailing_slash() {
        assert!(LinkFeatures::from_url(VERGE).no_trailing_slash);
        assert!(!LinkFeatures::from_url("yahoo.com/news/science/").no_trailing_slash);
    }

    #[test]
    fn section_pages_fail_most_predicates() {
        let features = LinkFeatures::from_url("bbc.com/news");
        assert!(features.no_reserved_word);
        assert!(features.no_trailing_slash);
        assert!(!features.has_date);
        assert!(!features.has_four_slashes);
        assert!(!features.has_id_number);
        assert!(!features.has_longer_length);
    }
}
