use word_prediction_kb_bert::word_prediction::{compute_context, slice_chars, MASK_TOKEN};

const LONG_MASK_MIDDLE: &str = include_str!("fixtures/long_mask_middle.txt");

#[test]
fn long_fixture_window_bounds() {
    assert!(LONG_MASK_MIDDLE.split(' ').count() > 512);
    assert_eq!(compute_context(LONG_MASK_MIDDLE), (462, 864));
}

#[test]
fn long_fixture_window_holds_mask_and_is_bounded() {
    let (start, end) = compute_context(LONG_MASK_MIDDLE);
    let window = slice_chars(LONG_MASK_MIDDLE, start, end);

    assert!(window.contains(MASK_TOKEN));
    assert_eq!(window.chars().count(), end - start);
    assert!(window.starts_with(' '));
    assert!(window.ends_with("Eftersom"));
    assert!(end - start < LONG_MASK_MIDDLE.chars().count());
}

#[test]
fn short_text_window_is_whole_text() {
    let text = "[MASK] åt glassen utanför kiosken .";
    assert_eq!(compute_context(text), (0, 35));
    assert_eq!(slice_chars(text, 0, 35), text);
}
