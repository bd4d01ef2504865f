//! Page attribution: mapping byte offsets in cleaned document text back to
//! the 1-based page number they came from, using the `--- PAGE n ---`
//! delimiters `docforge-pdf` writes between pages.

use std::sync::LazyLock;

use regex::Regex;

static PAGE_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^--- PAGE (\d+) ---$").unwrap());

/// One `(byte_offset, page_number)` marker, in ascending offset order.
pub struct PageMap {
    markers: Vec<(usize, u32)>,
}

impl PageMap {
    /// Scans `text` for page delimiters and builds a lookup table.
    ///
    /// Documents with no delimiters (e.g. a single-page fixture in a test)
    /// are treated as page 1 throughout.
    #[must_use]
    pub fn build(text: &str) -> Self {
        let markers = PAGE_MARKER
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let page: u32 = caps.get(1)?.as_str().parse().ok()?;
                Some((whole.start(), page))
            })
            .collect();
        Self { markers }
    }

    /// Page number containing byte offset `at`, defaulting to 1 if `at`
    /// precedes the first marker or no markers exist.
    #[must_use]
    pub fn page_at(&self, at: usize) -> u32 {
        let mut page = 1;
        for &(offset, number) in &self.markers {
            if offset <= at {
                page = number;
            } else {
                break;
            }
        }
        page
    }

    /// Splits `text` into `(page_number, segment_start, segment_text)`
    /// triples, one per page delimiter, stripping the delimiter line itself.
    /// With no delimiters the whole text is returned as a single page-1
    /// segment.
    #[must_use]
    pub fn segments<'a>(&self, text: &'a str) -> Vec<(u32, usize, &'a str)> {
        if self.markers.is_empty() {
            return vec![(1, 0, text)];
        }

        let mut segments = Vec::with_capacity(self.markers.len());
        for (i, &(offset, page)) in self.markers.iter().enumerate() {
            let line_end = text[offset..].find('\n').map_or(text.len(), |nl| offset + nl + 1);
            let seg_end = self.markers.get(i + 1).map_or(text.len(), |&(next, _)| next);
            segments.push((page, line_end, &text[line_end..seg_end]));
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_markers_defaults_to_page_one() {
        let map = PageMap::build("no markers here");
        assert_eq!(map.page_at(0), 1);
        assert_eq!(map.page_at(10), 1);
    }

    #[test]
    fn tracks_page_boundaries() {
        let text = "--- PAGE 1 ---\nfirst\n--- PAGE 2 ---\nsecond";
        let map = PageMap::build(text);
        let first_offset = text.find("first").unwrap();
        let second_offset = text.find("second").unwrap();
        assert_eq!(map.page_at(first_offset), 1);
        assert_eq!(map.page_at(second_offset), 2);
    }

    #[test]
    fn segments_strip_delimiter_lines() {
        let text = "--- PAGE 1 ---\nfirst page text\n--- PAGE 2 ---\nsecond page text";
        let map = PageMap::build(text);
        let segments = map.segments(text);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].0, 1);
        assert!(segments[0].2.contains("first page text"));
        assert!(!segments[0].2.contains("PAGE"));
        assert_eq!(segments[1].0, 2);
        assert!(segments[1].2.contains("second page text"));
    }
}
