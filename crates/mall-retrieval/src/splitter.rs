//! Recursive character text splitter
//!
//! Splits text into bounded-size chunks with a fixed overlap between
//! neighbors. Splitting prefers paragraph breaks, then line breaks, then
//! word boundaries, and falls back to fixed character windows for text
//! with no separators at all. The output is fully determined by the input
//! text and the configuration.

/// Separator preference order, coarsest first.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Splitter configuration
#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,

    /// Overlap between neighboring chunks in characters
    pub chunk_overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 80,
        }
    }
}

/// Deterministic recursive length-based splitter.
pub struct RecursiveSplitter {
    config: SplitterConfig,
}

impl RecursiveSplitter {
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// Split `text` into chunks of at most `chunk_size` characters.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        if char_len(text) <= self.config.chunk_size {
            return vec![text.to_string()];
        }
        self.split_with_separators(text, &SEPARATORS)
    }

    fn split_with_separators(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let Some((separator, rest)) = separators.split_first() else {
            return self.split_by_chars(text);
        };

        let mut chunks = Vec::new();
        // Fragments keep their trailing separator so merged chunks are
        // contiguous slices of the input.
        let mut pending: Vec<String> = Vec::new();

        for fragment in text.split_inclusive(*separator) {
            if char_len(fragment) > self.config.chunk_size {
                if !pending.is_empty() {
                    chunks.extend(self.merge_fragments(&pending));
                    pending.clear();
                }
                chunks.extend(self.split_with_separators(fragment, rest));
            } else {
                pending.push(fragment.to_string());
            }
        }

        if !pending.is_empty() {
            chunks.extend(self.merge_fragments(&pending));
        }

        chunks
    }

    /// Greedily pack fragments into chunks, retaining a tail of at most
    /// `chunk_overlap` characters between consecutive chunks.
    fn merge_fragments(&self, fragments: &[String]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: Vec<&str> = Vec::new();
        let mut window_len = 0usize;

        for fragment in fragments {
            let fragment_len = char_len(fragment);

            if window_len + fragment_len > self.config.chunk_size && !window.is_empty() {
                chunks.push(window.concat());

                while window_len > self.config.chunk_overlap
                    || (window_len + fragment_len > self.config.chunk_size && window_len > 0)
                {
                    let removed = window.remove(0);
                    window_len -= char_len(removed);
                }
            }

            window.push(fragment);
            window_len += fragment_len;
        }

        if !window.is_empty() {
            chunks.push(window.concat());
        }

        chunks
    }

    /// Last resort for separator-free text: fixed character windows
    /// stepping by `chunk_size - chunk_overlap`.
    fn split_by_chars(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = self
            .config
            .chunk_size
            .saturating_sub(self.config.chunk_overlap)
            .max(1);

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.config.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn splitter(chunk_size: usize, chunk_overlap: usize) -> RecursiveSplitter {
        RecursiveSplitter::new(SplitterConfig {
            chunk_size,
            chunk_overlap,
        })
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = splitter(500, 80).split("Shop A is located on floor 2.");
        assert_eq!(chunks, vec!["Shop A is located on floor 2.".to_string()]);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(splitter(500, 80).split("").is_empty());
    }

    #[test]
    fn test_word_merge_with_overlap() {
        let chunks = splitter(10, 4).split("aa bb cc dd ee ff");
        assert_eq!(chunks, vec!["aa bb cc ", "cc dd ee ", "ee ff"]);
    }

    #[test]
    fn test_separator_free_text_uses_char_windows() {
        let text = "x".repeat(25);
        let chunks = splitter(10, 4).split(&text);
        assert_eq!(chunks.len(), 4);
        assert!(chunks[..3].iter().all(|c| c.chars().count() == 10));
        // windows step by size - overlap = 6
        assert_eq!(chunks[3].chars().count(), 25 - 3 * 6);
    }

    #[test]
    fn test_paragraph_breaks_preferred() {
        let text = format!("{}\n\n{}", "a".repeat(8), "b".repeat(8));
        let chunks = splitter(10, 4).split(&text);
        assert_eq!(chunks, vec!["a".repeat(8) + "\n\n", "b".repeat(8)]);
    }

    proptest! {
        #[test]
        fn prop_split_is_deterministic(text in "[ a-z\n]{0,400}") {
            let s = splitter(50, 10);
            prop_assert_eq!(s.split(&text), s.split(&text));
        }

        #[test]
        fn prop_chunks_respect_size_bound(text in "[ a-zA-Z0-9\n]{0,600}") {
            let s = splitter(50, 10);
            for chunk in s.split(&text) {
                prop_assert!(chunk.chars().count() <= 50);
            }
        }

        #[test]
        fn prop_chunks_are_substrings_of_input(text in "[ a-z\n]{0,400}") {
            let s = splitter(50, 10);
            for chunk in s.split(&text) {
                prop_assert!(text.contains(&chunk));
            }
        }
    }
}
