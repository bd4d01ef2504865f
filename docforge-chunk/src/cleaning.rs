//! Text cleaning pipeline executed before chunking.

/// Trait for text cleaning strategies.
pub trait Cleaner: Send + Sync {
    /// Cleans the input text and returns a normalized version.
    fn clean(&self, text: &str) -> String;

    /// Returns the cleaner name.
    fn name(&self) -> &'static str;
}

/// Default cleaner run before chunking.
///
/// Lightweight normalization only: normalizes line endings, trims trailing
/// whitespace per line, collapses excessive blank lines (max 2), trims outer
/// whitespace. Page delimiter lines (`--- PAGE n ---`) pass through untouched
/// since they are never blank or trailing-whitespace-only.
#[derive(Debug, Clone, Default)]
pub struct BasicCleaner;

impl BasicCleaner {
    fn normalize_line_endings(text: &str) -> String {
        text.replace("\r\n", "\n").replace('\r', "\n")
    }

    fn trim_trailing_whitespace_per_line(text: &str) -> String {
        text.lines().map(str::trim_end).collect::<Vec<_>>().join("\n")
    }

    fn collapse_blank_lines(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut blank_run = 0usize;
        let mut prev_was_newline = false;

        for line in text.lines() {
            let is_blank = line.trim().is_empty();
            if is_blank {
                blank_run += 1;
                if blank_run <= 2 && !out.is_empty() && !prev_was_newline {
                    out.push('\n');
                    prev_was_newline = true;
                }
            } else {
                blank_run = 0;
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(line);
                prev_was_newline = false;
            }
        }

        out
    }
}

impl Cleaner for BasicCleaner {
    fn clean(&self, text: &str) -> String {
        let normalized = Self::normalize_line_endings(text);
        let trimmed = Self::trim_trailing_whitespace_per_line(&normalized);
        let collapsed = Self::collapse_blank_lines(&trimmed);
        collapsed.trim().to_string()
    }

    fn name(&self) -> &'static str {
        "basic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_text() {
        let cleaned = BasicCleaner.clean("a\r\n\r\n\r\n b  \n\n\n\nc");
        assert_eq!(cleaned, "a\n\n b\n\nc");
    }

    #[test]
    fn preserves_page_markers() {
        let cleaned = BasicCleaner.clean("--- PAGE 1 ---\ntext one\n--- PAGE 2 ---\ntext two");
        assert!(cleaned.contains("--- PAGE 1 ---"));
        assert!(cleaned.contains("--- PAGE 2 ---"));
    }
}
