//! Windowing behaviour of the fixed-size chunker.

use docqa_rag::{Chunker, FixedSizeChunker, RagConfig, RagError, chunk_text};
use proptest::prelude::*;

#[test]
fn empty_text_yields_no_chunks() {
    assert!(FixedSizeChunker::default().chunk("").is_empty());
}

#[test]
fn zero_chunk_size_is_rejected() {
    assert!(matches!(FixedSizeChunker::new(0, 0), Err(RagError::ConfigError(_))));
    assert!(matches!(chunk_text("abc", 0, 0), Err(RagError::ConfigError(_))));
}

#[test]
fn default_windows_for_fifteen_hundred_characters() {
    let text = "x".repeat(1500);
    let chunks = FixedSizeChunker::from_config(&RagConfig::default()).unwrap().chunk(&text);

    let windows: Vec<(usize, usize)> = chunks.iter().map(|c| (c.start_index, c.end_index)).collect();
    assert_eq!(windows, [(0, 700), (600, 1300), (1200, 1500)]);
    let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["chunk-0", "chunk-1", "chunk-2"]);
    assert_eq!(chunks[2].text.len(), 300);
}

#[test]
fn trimmed_text_keeps_untrimmed_offsets() {
    let chunks = chunk_text("  ab  ", 6, 0).unwrap();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "ab");
    assert_eq!((chunks[0].start_index, chunks[0].end_index), (0, 6));
}

#[test]
fn whitespace_windows_are_dropped_without_renumbering() {
    let chunks = chunk_text("   abc   ", 3, 0).unwrap();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].id, "chunk-1");
    assert_eq!(chunks[0].text, "abc");
    assert_eq!((chunks[0].start_index, chunks[0].end_index), (3, 6));
}

#[test]
fn overlap_not_smaller_than_size_advances_one_character() {
    let chunks = chunk_text("abcdef", 3, 5).unwrap();
    let starts: Vec<usize> = chunks.iter().map(|c| c.start_index).collect();
    assert_eq!(starts, [0, 1, 2, 3, 4, 5]);
    assert_eq!(chunks[5].text, "f");

    let equal = chunk_text("abcd", 2, 2).unwrap();
    assert_eq!(equal.len(), 4);
}

#[test]
fn maximum_chunk_size_windows_clamp_to_text_end() {
    let chunks = chunk_text("abc", usize::MAX, usize::MAX).unwrap();

    let windows: Vec<(&str, usize, usize)> =
        chunks.iter().map(|c| (c.text.as_str(), c.start_index, c.end_index)).collect();
    assert_eq!(windows, [("abc", 0, 3), ("bc", 1, 3), ("c", 2, 3)]);

    let single = chunk_text("abc", usize::MAX, 0).unwrap();
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].end_index, 3);
}

#[test]
fn offsets_count_characters_not_bytes() {
    let text = "héllo wörld";
    let chunks = chunk_text(text, 4, 1).unwrap();

    assert_eq!(chunks[0].text, "héll");
    assert_eq!(chunks[1].text, "lo w");
    assert_eq!((chunks[1].start_index, chunks[1].end_index), (3, 7));
    assert_eq!(chunks.last().unwrap().end_index, text.chars().count());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Windows start at 0, leave no gaps, end at the text length and overlap
    /// by exactly `overlap` characters wherever a window is full length.
    #[test]
    fn windows_cover_text_with_exact_overlap(
        text in "[a-z]{1,400}",
        chunk_size in 1usize..60,
        overlap in 0usize..60,
    ) {
        prop_assume!(overlap < chunk_size);
        let len = text.chars().count();
        let chunks = chunk_text(&text, chunk_size, overlap).unwrap();

        prop_assert!(!chunks.is_empty());
        prop_assert_eq!(chunks[0].start_index, 0);
        prop_assert_eq!(chunks.last().unwrap().end_index, len);

        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(&chunk.id, &format!("chunk-{i}"));
            prop_assert!(chunk.start_index < chunk.end_index);
            prop_assert!(chunk.end_index <= len);
            prop_assert!(chunk.end_index - chunk.start_index <= chunk_size);
            prop_assert_eq!(&chunk.text, &text[chunk.start_index..chunk.end_index]);
        }

        for pair in chunks.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            prop_assert_eq!(next.start_index - prev.start_index, chunk_size - overlap);
            prop_assert!(next.start_index <= prev.end_index);
            if prev.end_index - prev.start_index == chunk_size {
                prop_assert_eq!(prev.end_index - next.start_index, overlap);
            }
        }
    }

    /// No chunk ever carries empty or untrimmed text.
    #[test]
    fn chunks_are_never_blank(
        text in "[a \n\t]{0,300}",
        chunk_size in 1usize..40,
        overlap in 0usize..60,
    ) {
        let chunks = chunk_text(&text, chunk_size, overlap).unwrap();
        for chunk in &chunks {
            prop_assert!(!chunk.text.is_empty());
            prop_assert_eq!(chunk.text.trim(), chunk.text.as_str());
        }
    }
}
