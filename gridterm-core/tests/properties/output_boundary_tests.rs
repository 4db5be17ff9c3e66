//! Property tests for splitting PTY output on UTF-8 boundaries

use gridterm_core::pty::utf8_boundary;
use proptest::prelude::*;

proptest! {
    /// Property: The boundary never cuts a character of valid text
    #[test]
    fn prop_boundary_of_truncated_text_is_a_char_boundary(text in "\\PC{0,40}", cut in 0usize..200) {
        let bytes = text.as_bytes();
        let truncated = &bytes[..cut.min(bytes.len())];
        let boundary = utf8_boundary(truncated);
        prop_assert!(boundary <= truncated.len());
        prop_assert!(text.is_char_boundary(boundary));
        // At most one incomplete character is held back.
        prop_assert!(truncated.len() - boundary < 4);
    }

    /// Property: Complete text is never held back
    #[test]
    fn prop_complete_text_passes_whole(text in "\\PC{0,40}") {
        prop_assert_eq!(utf8_boundary(text.as_bytes()), text.len());
    }

    /// Property: Cutting text anywhere and joining the flushed parts gives
    /// back the original
    #[test]
    fn prop_split_chunks_reassemble(text in "\\PC{1,40}", cuts in prop::collection::vec(0usize..200, 0..6)) {
        let bytes = text.as_bytes();
        let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c.min(bytes.len())).collect();
        cuts.sort_unstable();
        cuts.push(bytes.len());

        let mut pending: Vec<u8> = Vec::new();
        let mut flushed = String::new();
        let mut start = 0;
        for end in cuts {
            pending.extend_from_slice(&bytes[start..end]);
            start = end;
            let boundary = utf8_boundary(&pending);
            let rest = pending.split_off(boundary);
            flushed.push_str(std::str::from_utf8(&pending).unwrap());
            pending = rest;
        }
        prop_assert!(pending.is_empty());
        prop_assert_eq!(flushed, text);
    }
}
