//! Context window extraction for inputs that overflow the model's token budget.
//!
//! Positions are character (Unicode scalar) offsets, not byte offsets.

use super::pipeline::MASK_TOKEN;

/// Characters kept on each side of the mask before looking for a word boundary.
const CONTEXT_REACH: usize = 190;
/// Width of the window searched for a space at each edge.
const BOUNDARY_PROBE: usize = 20;

/// Computes a half-open character range `[start, end)` of roughly 400 characters
/// around the first `[MASK]` in `text`, snapped to a space on each side when one
/// is found near the edge.
///
/// If a probe window holds no space, its edge falls back to the start of that
/// probe. Text without a mask yields the whole text.
///
/// # Examples
///
/// ```rust
/// use word_prediction_kb_bert::word_prediction::compute_context;
///
/// let text = "[MASK] åt glassen utanför kiosken .";
/// assert_eq!(compute_context(text), (0, 35));
/// ```
pub fn compute_context(text: &str) -> (usize, usize) {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let Some(mask_byte) = text.find(MASK_TOKEN) else {
        return (0, len);
    };
    let mask = text[..mask_byte].chars().count();

    // Lower probe is [mask - 210, mask - 190); it is empty when it would start before the text.
    let lower_offset = mask
        .checked_sub(CONTEXT_REACH + BOUNDARY_PROBE)
        .map(|lo| first_space(&chars, lo, lo + BOUNDARY_PROBE))
        .unwrap_or(0);
    let upper_lo = mask + CONTEXT_REACH;
    let upper_offset = first_space(&chars, upper_lo, upper_lo + BOUNDARY_PROBE);

    let start = (mask + lower_offset).saturating_sub(CONTEXT_REACH + BOUNDARY_PROBE);
    let end = (upper_lo + upper_offset).min(len);
    (start, end)
}

/// Offset of the first space within `chars[lo..hi]` (clamped), or 0 if none.
fn first_space(chars: &[char], lo: usize, hi: usize) -> usize {
    let hi = hi.min(chars.len());
    if lo >= hi {
        return 0;
    }
    chars[lo..hi].iter().position(|&c| c == ' ').unwrap_or(0)
}

/// Borrows the characters `[start, end)` of `text`.
///
/// Offsets past the end are clamped.
pub fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let byte_at = |n: usize| {
        text.char_indices()
            .nth(n)
            .map(|(byte, _)| byte)
            .unwrap_or(text.len())
    };
    let start = byte_at(start);
    let end = byte_at(end).max(start);
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{:02}", i % 100)).collect::<Vec<_>>().join(" ")
    }

    fn assert_window_holds_mask(text: &str) {
        let (start, end) = compute_context(text);
        let len = text.chars().count();
        let mask = text[..text.find(MASK_TOKEN).unwrap()].chars().count();
        assert!(start <= mask, "start {start} after mask {mask}");
        assert!(mask + MASK_TOKEN.len() <= end, "end {end} cuts mask at {mask}");
        assert!(end <= len);
        assert!(slice_chars(text, start, end).contains(MASK_TOKEN));
    }

    #[test]
    fn short_text_is_clamped_to_its_length() {
        assert_eq!(compute_context("[MASK] åt glassen utanför kiosken ."), (0, 35));
    }

    #[test]
    fn mask_in_long_text_snaps_to_spaces() {
        let text = format!("{} [MASK] {}", words(200), words(200));
        let (start, end) = compute_context(&text);
        let chars: Vec<char> = text.chars().collect();

        assert_eq!(chars[start], ' ');
        assert_eq!(chars[end], ' ');
        assert!(end - start <= 400 + BOUNDARY_PROBE);
        assert_window_holds_mask(&text);
    }

    #[test]
    fn window_contains_mask_wherever_it_is() {
        let body = words(300);
        let positions = [0, 5, 150, 189, 190, 200, 209, 210, 211, 600, body.len()];
        for pos in positions {
            let cut = body
                .char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(body.len()))
                .find(|&i| i >= pos)
                .unwrap();
            let text = format!("{}[MASK]{}", &body[..cut], &body[cut..]);
            assert_window_holds_mask(&text);
        }
    }

    #[test]
    fn missing_space_falls_back_to_probe_start() {
        let text = format!("{}[MASK]{}", "a".repeat(300), "b".repeat(300));
        // Lower edge: mask - 210; upper edge: mask + 190.
        assert_eq!(compute_context(&text), (90, 490));
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let text = format!("{} [MASK] {}", "å".repeat(250), "ö".repeat(250));
        let (start, end) = compute_context(&text);
        assert_eq!((start, end), (41, 441));
        assert_window_holds_mask(&text);
    }

    #[test]
    fn text_without_mask_is_returned_whole() {
        assert_eq!(compute_context("inga masker här"), (0, 15));
    }

    #[test]
    fn slice_chars_respects_char_boundaries() {
        assert_eq!(slice_chars("åäö abc", 1, 3), "äö");
        assert_eq!(slice_chars("åäö", 2, 10), "ö");
        assert_eq!(slice_chars("abc", 5, 9), "");
    }
}
