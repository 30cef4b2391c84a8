//! Phrase reconstruction from word-level OCR detections.
//!
//! The provider hands back single words with bounding boxes and no layout
//! information. [`reconstruct`] groups them into phrases using geometry alone,
//! in one greedy pass over the tokens:
//!
//! 1. A locale change always starts a new phrase.
//! 2. A token whose top edge is level with the previous word joins it
//!    (same visual line).
//! 3. A token sitting just under the phrase and horizontally overlapping or
//!    close to its left edge joins it (wrapped onto the next line).
//! 4. A token whose box intersects the phrase box joins it.
//! 5. Anything else closes the open phrase and starts a new one.
//!
//! Only the most recent phrase is ever a merge candidate. Closed phrases are
//! never revisited, so the output depends on the provider's detection order.
//! That order is taken as reading order and is not re-sorted here.

use crate::types::{OcrToken, Phrase};
use tracing::trace;

/// Maximum top-edge offset, in word heights, for two words on the same line.
pub const SAME_LINE_THRESHOLD: f64 = 0.5;

/// Maximum gap, in word heights, between a phrase's bottom edge and a wrapped word.
pub const NEXT_LINE_THRESHOLD: f64 = 0.6;

/// Group tokens into phrases. Never fails; degenerate rectangles yield
/// degenerate phrases.
///
/// # Example
///
/// ```rust
/// use polyvision::geometry::Rect;
/// use polyvision::phrases::reconstruct;
/// use polyvision::types::OcrToken;
///
/// let phrases = reconstruct(vec![
///     OcrToken::new("Hello", "en", Rect::new(0.0, 0.0, 40.0, 10.0)),
///     OcrToken::new("World", "en", Rect::new(42.0, 1.0, 90.0, 11.0)),
///     OcrToken::new("Bonjour", "fr", Rect::new(0.0, 20.0, 60.0, 30.0)),
/// ]);
///
/// assert_eq!(phrases.len(), 2);
/// assert_eq!(phrases[0].text(), "Hello World");
/// assert_eq!(phrases[1].text(), "Bonjour");
/// ```
pub fn reconstruct<I>(tokens: I) -> Vec<Phrase>
where
    I: IntoIterator<Item = OcrToken>,
{
    tokens
        .into_iter()
        .fold(Accumulator::default(), Accumulator::accept)
        .finish()
}

#[derive(Default)]
struct Accumulator {
    closed: Vec<Phrase>,
    open: Option<Phrase>,
}

impl Accumulator {
    fn accept(mut self, token: OcrToken) -> Self {
        match self.open.take() {
            Some(mut phrase) if joins(&phrase, &token) => {
                phrase.push(token);
                self.open = Some(phrase);
            }
            Some(phrase) => {
                trace!(closed_parts = phrase.parts.len(), "closing phrase");
                self.closed.push(phrase);
                self.open = Some(Phrase::from_token(token));
            }
            None => {
                self.open = Some(Phrase::from_token(token));
            }
        }
        self
    }

    fn finish(mut self) -> Vec<Phrase> {
        self.closed.extend(self.open);
        self.closed
    }
}

fn joins(phrase: &Phrase, token: &OcrToken) -> bool {
    if phrase.locale != token.locale {
        return false;
    }

    is_same_line(phrase, token) || is_next_line(phrase, token) || phrase.rect.intersects(&token.rect)
}

fn is_same_line(phrase: &Phrase, token: &OcrToken) -> bool {
    let Some(prev) = phrase.parts.last() else {
        return false;
    };

    let scale = prev.rect.height().min(token.rect.height());
    let offset = (token.rect.y1 - prev.rect.y1).abs() / scale;

    offset < SAME_LINE_THRESHOLD
}

fn is_next_line(phrase: &Phrase, token: &OcrToken) -> bool {
    let Some(first) = phrase.parts.first() else {
        return false;
    };

    let bounds = &phrase.rect;
    let scale = first.rect.height().min(token.rect.height());
    let offset = (token.rect.y1 - bounds.y2).abs() / scale;

    offset < NEXT_LINE_THRESHOLD
        && (token.rect.x2 > bounds.x1 || (bounds.x1 - token.rect.x2) < bounds.width() / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn token(value: &str, locale: &str, x1: f64, y1: f64, x2: f64, y2: f64) -> OcrToken {
        OcrToken::new(value, locale, Rect::new(x1, y1, x2, y2))
    }

    fn texts(phrases: &[Phrase]) -> Vec<String> {
        phrases.iter().map(Phrase::text).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(reconstruct(Vec::new()).is_empty());
    }

    #[test]
    fn test_single_token() {
        let phrases = reconstruct(vec![token("Solo", "en", 0.0, 0.0, 30.0, 10.0)]);
        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].rect, Rect::new(0.0, 0.0, 30.0, 10.0));
    }

    #[test]
    fn test_same_line_then_locale_break() {
        let phrases = reconstruct(vec![
            token("Hello", "en", 0.0, 0.0, 40.0, 10.0),
            token("World", "en", 42.0, 1.0, 90.0, 11.0),
            token("Bonjour", "fr", 0.0, 20.0, 60.0, 30.0),
        ]);

        assert_eq!(texts(&phrases), vec!["Hello World", "Bonjour"]);
        assert_eq!(phrases[0].rect, Rect::new(0.0, 0.0, 90.0, 11.0));
        assert_eq!(phrases[1].locale, "fr");
    }

    #[test]
    fn test_locale_break_overrides_overlap() {
        let phrases = reconstruct(vec![
            token("Sale", "en", 0.0, 0.0, 40.0, 10.0),
            token("Solde", "fr", 0.0, 0.0, 40.0, 10.0),
        ]);
        assert_eq!(phrases.len(), 2);
    }

    #[test]
    fn test_next_line_wrap_joins() {
        let phrases = reconstruct(vec![
            token("Hello", "en", 0.0, 0.0, 40.0, 10.0),
            token("World", "en", 42.0, 1.0, 90.0, 11.0),
            token("again", "en", 0.0, 14.0, 40.0, 24.0),
        ]);
        assert_eq!(texts(&phrases), vec!["Hello World again"]);
        assert_eq!(phrases[0].rect, Rect::new(0.0, 0.0, 90.0, 24.0));
    }

    #[test]
    fn test_next_line_left_of_phrase_within_half_width_joins() {
        // Token ends 10px left of the phrase, phrase is 100px wide.
        let phrases = reconstruct(vec![
            token("indented", "en", 20.0, 0.0, 120.0, 10.0),
            token("wrap", "en", -30.0, 13.0, 10.0, 23.0),
        ]);
        assert_eq!(phrases.len(), 1);
    }

    #[test]
    fn test_next_line_far_left_starts_new_phrase() {
        let phrases = reconstruct(vec![
            token("right", "en", 200.0, 0.0, 240.0, 10.0),
            token("left", "en", 0.0, 13.0, 40.0, 23.0),
        ]);
        assert_eq!(texts(&phrases), vec!["right", "left"]);
    }

    #[test]
    fn test_intersection_fallback_joins() {
        let phrases = reconstruct(vec![
            token("BIG", "en", 0.0, 0.0, 100.0, 40.0),
            token("tiny", "en", 50.0, 25.0, 60.0, 30.0),
        ]);
        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].parts.len(), 2);
    }

    #[test]
    fn test_far_below_starts_new_phrase() {
        let phrases = reconstruct(vec![
            token("Title", "en", 0.0, 0.0, 40.0, 10.0),
            token("Footer", "en", 0.0, 100.0, 40.0, 110.0),
        ]);
        assert_eq!(texts(&phrases), vec!["Title", "Footer"]);
    }

    #[test]
    fn test_closed_phrase_is_never_revisited() {
        let phrases = reconstruct(vec![
            token("A", "en", 0.0, 0.0, 10.0, 10.0),
            token("B", "en", 0.0, 100.0, 10.0, 110.0),
            token("C", "en", 12.0, 0.0, 22.0, 10.0),
        ]);
        assert_eq!(texts(&phrases), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_zero_height_tokens_do_not_panic() {
        let phrases = reconstruct(vec![
            token("a", "en", 0.0, 5.0, 10.0, 5.0),
            token("b", "en", 50.0, 5.0, 60.0, 5.0),
            token("c", "en", 8.0, 5.0, 9.0, 5.0),
        ]);
        let total: usize = phrases.iter().map(|p| p.parts.len()).sum();
        assert_eq!(total, 3);
        assert!(phrases.iter().all(|p| !p.parts.is_empty()));
    }

    #[test]
    fn test_rect_is_union_of_parts() {
        let phrases = reconstruct(vec![
            token("one", "en", 5.0, 2.0, 30.0, 12.0),
            token("two", "en", 32.0, 0.0, 60.0, 11.0),
            token("three", "en", 0.0, 14.0, 45.0, 25.0),
        ]);
        for phrase in &phrases {
            let union = phrase.parts[1..]
                .iter()
                .fold(phrase.parts[0].rect, |acc, part| acc.union(&part.rect));
            assert_eq!(phrase.rect, union);
        }
    }
}
