//! Overlapping text chunker.
//!
//! Splits extracted document text into bounded, overlapping segments sized
//! for downstream context windows. Two strategies are provided:
//!
//! 1. [`chunk_text`] — fixed-window: emit `target_size` chars, step the
//!    cursor forward by `target_size - overlap`. Always terminates and
//!    covers the whole input with no gaps.
//! 2. [`chunk_sentences`] — sentence-aware: never splits a sentence across
//!    chunks, seeding each new chunk with whole trailing sentences from the
//!    previous one up to `overlap` chars. Falls back to the fixed-window
//!    strategy when the text has no detectable sentence boundaries.
//!
//! Sizes are measured in chars (Unicode scalar values), so multi-byte text
//! is never split mid-character. `overlap >= target_size` is clamped to
//! `target_size - 1` rather than rejected, which keeps both strategies
//! deterministic and loop-free on any input.

/// Default chunk size in chars.
pub const DEFAULT_TARGET_SIZE: usize = 1500;

/// Default overlap between consecutive chunks, in chars.
pub const DEFAULT_OVERLAP: usize = 200;

/// Chunking parameters shared by both strategies.
#[derive(Debug, Clone, Copy)]
pub struct ChunkParams {
    pub target_size: usize,
    pub overlap: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

impl ChunkParams {
    /// Clamp to a valid combination: `target_size >= 1`, `overlap < target_size`.
    fn clamped(self) -> (usize, usize) {
        let target = self.target_size.max(1);
        let overlap = self.overlap.min(target - 1);
        (target, overlap)
    }
}

/// Split `text` into fixed-size overlapping windows.
///
/// Returns an empty vec for empty input. Otherwise every chunk is a
/// contiguous substring of `text`, emitted left to right; consecutive
/// chunks share exactly `overlap` chars except the final chunk, which is
/// clamped to the remaining length. Dropping `overlap` leading chars from
/// every chunk after the first and concatenating reproduces `text`.
pub fn chunk_text(text: &str, params: ChunkParams) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let (target, overlap) = params.clamped();
    let step = target - overlap;

    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::with_capacity(chars.len().div_ceil(step));
    let mut cursor = 0;
    loop {
        let end = (cursor + target).min(chars.len());
        chunks.push(chars[cursor..end].iter().collect());
        if end == chars.len() {
            break;
        }
        cursor += step;
    }
    chunks
}

/// Split `text` into overlapping chunks without splitting sentences.
///
/// Sentences are delimited by `.`, `?`, or `!` followed by whitespace.
/// Sentences accumulate into a chunk until adding the next one would
/// exceed `target_size`; the chunk is then flushed and the next one is
/// seeded with whole trailing sentences of the flushed chunk, stopping
/// before the seed would exceed `overlap` chars. The seed is trimmed when
/// it would push the next chunk past `target_size`, so chunks only exceed
/// the target when a single sentence is itself longer than `target_size` —
/// that sentence is emitted intact as its own oversized chunk rather than
/// truncated or dropped.
///
/// Text with no detectable sentence boundary (no terminal punctuation
/// followed by whitespace) falls back to [`chunk_text`].
pub fn chunk_sentences(text: &str, params: ChunkParams) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let (target, overlap) = params.clamped();

    let sentences = split_sentences(text);
    if sentences.len() <= 1 {
        return chunk_text(text, params);
    }

    let mut chunks = Vec::new();
    let mut buf: Vec<&str> = Vec::new();
    let mut buf_len = 0usize;

    for sentence in sentences {
        let sentence_len = sentence.chars().count();
        if !buf.is_empty() && buf_len + sentence_len > target {
            chunks.push(buf.concat());

            // Seed the next chunk with whole trailing sentences, newest
            // first, stopping before the seed would exceed the overlap.
            let mut seed: Vec<&str> = Vec::new();
            let mut seed_len = 0usize;
            for &prev in buf.iter().rev() {
                let prev_len = prev.chars().count();
                if seed_len + prev_len > overlap {
                    break;
                }
                seed.push(prev);
                seed_len += prev_len;
            }
            seed.reverse();
            buf = seed;
            buf_len = seed_len;

            // The seed plus the incoming sentence must still fit the
            // target; shed the oldest seed sentences until it does. An
            // oversized sentence sheds the whole seed and stands alone.
            while !buf.is_empty() && buf_len + sentence_len > target {
                buf_len -= buf.remove(0).chars().count();
            }
        }
        buf.push(sentence);
        buf_len += sentence_len;
    }

    if !buf.is_empty() {
        chunks.push(buf.concat());
    }
    chunks
}

/// Split `text` into sentence units at `.`, `?`, `!` followed by
/// whitespace. The whitespace run stays attached to the preceding
/// sentence, so concatenating the units reproduces `text` exactly.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if !matches!(c, '.' | '?' | '!') {
            continue;
        }
        let boundary = matches!(iter.peek(), Some(&(_, next)) if next.is_whitespace());
        if !boundary {
            continue;
        }
        let mut end = i + c.len_utf8();
        while let Some(&(j, w)) = iter.peek() {
            if !w.is_whitespace() {
                break;
            }
            end = j + w.len_utf8();
            iter.next();
        }
        sentences.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(target_size: usize, overlap: usize) -> ChunkParams {
        ChunkParams {
            target_size,
            overlap,
        }
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_text("", ChunkParams::default()).is_empty());
        assert!(chunk_sentences("", ChunkParams::default()).is_empty());
    }

    #[test]
    fn fixed_window_concrete_scenario() {
        // Cursor steps of 3: offsets 0, 3, 6; final chunk clamped.
        let chunks = chunk_text("ABCDEFGHIJ", params(4, 1));
        assert_eq!(chunks, vec!["ABCD", "DEFG", "GHIJ"]);
    }

    #[test]
    fn fixed_window_single_chunk_when_text_fits() {
        let chunks = chunk_text("short", params(1500, 200));
        assert_eq!(chunks, vec!["short"]);
    }

    #[test]
    fn fixed_window_reassembly_reproduces_input() {
        let text: String = (0..2500).map(|i| ((i % 26) as u8 + b'a') as char).collect();
        let overlap = 7;
        let chunks = chunk_text(&text, params(64, overlap));

        let mut rebuilt = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                rebuilt.push_str(chunk);
            } else {
                rebuilt.extend(chunk.chars().skip(overlap));
            }
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn fixed_window_respects_target_size() {
        let text = "x".repeat(4000);
        for chunk in chunk_text(&text, params(100, 20)) {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn overlap_at_least_target_is_clamped_and_terminates() {
        // overlap >= target_size must not loop; clamped to target - 1.
        let chunks = chunk_text("ABCDEF", params(3, 3));
        assert_eq!(chunks, vec!["ABC", "BCD", "CDE", "DEF"]);
        let chunks = chunk_text("ABCDEF", params(3, 10));
        assert_eq!(chunks.first().map(String::as_str), Some("ABC"));
        assert!(chunks.len() <= 6);
    }

    #[test]
    fn fixed_window_is_char_based_not_byte_based() {
        let text = "日本語のテキストです。";
        let chunks = chunk_text(text, params(4, 1));
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 4);
        }
        assert!(chunks.concat().contains("日本語の"));
    }

    #[test]
    fn sentences_are_never_split() {
        let text = "First sentence here. Second sentence here. Third sentence here. \
                    Fourth sentence here. Fifth sentence here.";
        let chunks = chunk_sentences(text, params(50, 25));
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            // Each chunk is a run of whole sentences from the source.
            assert!(text.contains(chunk.trim_end()));
        }
        let joined = chunks.join("");
        assert!(joined.contains("First sentence here."));
        assert!(joined.contains("Fifth sentence here."));
    }

    #[test]
    fn sentence_chunks_share_trailing_sentences_as_overlap() {
        let text = "Aaaa bbbb. Cccc dddd. Eeee ffff. Gggg hhhh.";
        let chunks = chunk_sentences(text, params(24, 12));
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            // The next chunk starts with a whole sentence that ended the
            // previous one.
            let seed = pair[1].split_inclusive(". ").next().unwrap();
            assert!(
                pair[0].contains(seed.trim_end()),
                "no sentence overlap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn sentence_chunks_stay_within_target_without_oversized_sentences() {
        // A large overlap must not let seed + next sentence outgrow the
        // target; the seed gets trimmed instead.
        let text = "Aaaa. Bbbb. Cccc. Dddd.";
        let chunks = chunk_sentences(text, params(10, 9));
        for chunk in &chunks {
            assert!(
                chunk.chars().count() <= 10,
                "chunk {:?} is {} chars, over the 10-char target",
                chunk,
                chunk.chars().count()
            );
        }
        for sentence in ["Aaaa.", "Bbbb.", "Cccc.", "Dddd."] {
            assert!(
                chunks.iter().any(|c| c.contains(sentence)),
                "missing sentence {sentence:?}"
            );
        }

        // Overlap still survives trimming when there is room for it.
        let text = "Aaaa bbbb. Cccc dddd. Eeee ffff. Gggg hhhh.";
        for chunk in chunk_sentences(text, params(24, 12)) {
            assert!(chunk.chars().count() <= 24, "chunk {:?} over target", chunk);
        }
    }

    #[test]
    fn oversized_sentence_is_emitted_intact() {
        let long = format!("{}. ", "word ".repeat(60).trim_end());
        let text = format!("Short one. {long}Tail sentence.");
        let chunks = chunk_sentences(&text, params(40, 10));
        assert!(
            chunks.iter().any(|c| c.chars().count() > 40),
            "oversized sentence should produce an oversized chunk"
        );
        assert!(chunks.concat().contains("Tail sentence."));
    }

    #[test]
    fn text_without_sentence_boundaries_falls_back_to_fixed_window() {
        let text = "abcdefghijklmnopqrstuvwxyz0123456789";
        let chunks = chunk_sentences(text, params(10, 2));
        assert_eq!(chunks, chunk_text(text, params(10, 2)));
        assert!(chunks.len() > 1);
    }

    #[test]
    fn non_empty_input_always_yields_chunks() {
        for text in ["a", "Hi. There.", "no punctuation at all", "...", "。"] {
            assert!(
                !chunk_text(text, ChunkParams::default()).is_empty(),
                "fixed-window dropped {text:?}"
            );
            assert!(
                !chunk_sentences(text, ChunkParams::default()).is_empty(),
                "sentence-aware dropped {text:?}"
            );
        }
    }

    #[test]
    fn sentence_strategy_covers_all_input() {
        let text = "One two three. Four five six. Seven eight nine. Ten eleven twelve.";
        let chunks = chunk_sentences(text, params(30, 10));
        // Every sentence must appear in at least one chunk.
        for sentence in ["One two three.", "Four five six.", "Seven eight nine.", "Ten eleven twelve."] {
            assert!(
                chunks.iter().any(|c| c.contains(sentence)),
                "missing sentence {sentence:?}"
            );
        }
    }

    #[test]
    fn split_sentences_roundtrips_text() {
        let text = "Hello there! How are you? Fine.\nGreat. trailing words";
        let sentences = split_sentences(text);
        assert_eq!(sentences.concat(), text);
        assert_eq!(sentences.len(), 5);
    }
}
