use crate::types::{AssemblyError, Result};
use std::fmt;

/// Inclusive page range with 1-based endpoints, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn single(page: u32) -> Self {
        Self {
            start: page,
            end: page,
        }
    }

    pub fn page_count(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn contains(&self, page: u32) -> bool {
        self.start <= page && page <= self.end
    }

    /// Zero-based page indices covered by this range, in order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + use<> {
        (self.start..=self.end).map(|page| (page - 1) as usize)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Parse a comma-separated page range specification such as `"1-3,5,7-9"`.
///
/// Each token is either a lone 1-based page number or a `start-end` pair;
/// surrounding whitespace on a token is ignored. Ranges come back in input
/// order and are deliberately not merged, de-duplicated, or sorted --
/// overlapping ranges are permitted input and callers decide what overlap
/// means for them.
pub fn parse_ranges(spec: &str) -> Result<Vec<PageRange>> {
    spec.split(',').map(|token| parse_token(token.trim())).collect()
}

fn parse_token(token: &str) -> Result<PageRange> {
    let invalid = || AssemblyError::InvalidRange(token.to_string());

    let range = match token.split_once('-') {
        Some((start, end)) => {
            let start: u32 = start.trim().parse().map_err(|_| invalid())?;
            let end: u32 = end.trim().parse().map_err(|_| invalid())?;
            if start > end {
                return Err(invalid());
            }
            PageRange { start, end }
        }
        None => PageRange::single(token.parse().map_err(|_| invalid())?),
    };

    // Page numbers are 1-based; a zero endpoint can never name a page.
    if range.start == 0 {
        return Err(invalid());
    }
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_tokens() {
        let ranges = parse_ranges("1-3,5,7-9").unwrap();
        assert_eq!(
            ranges,
            vec![
                PageRange { start: 1, end: 3 },
                PageRange::single(5),
                PageRange { start: 7, end: 9 },
            ]
        );
    }

    #[test]
    fn ignores_token_whitespace() {
        let ranges = parse_ranges(" 2 , 4 - 6 ").unwrap();
        assert_eq!(
            ranges,
            vec![PageRange::single(2), PageRange { start: 4, end: 6 }]
        );
    }

    #[test]
    fn preserves_order_and_overlap() {
        let ranges = parse_ranges("7-9,1-8").unwrap();
        assert_eq!(
            ranges,
            vec![PageRange { start: 7, end: 9 }, PageRange { start: 1, end: 8 }]
        );
    }

    #[test]
    fn rejects_inverted_pair() {
        assert!(matches!(
            parse_ranges("3-1"),
            Err(AssemblyError::InvalidRange(token)) if token == "3-1"
        ));
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(matches!(
            parse_ranges("a-3"),
            Err(AssemblyError::InvalidRange(_))
        ));
        assert!(matches!(
            parse_ranges("1,,3"),
            Err(AssemblyError::InvalidRange(_))
        ));
    }

    #[test]
    fn rejects_zero_page() {
        assert!(matches!(
            parse_ranges("0-3"),
            Err(AssemblyError::InvalidRange(_))
        ));
    }

    #[test]
    fn display_round_trips() {
        let spec = "1-3,5,7-9";
        let ranges = parse_ranges(spec).unwrap();
        let rendered = ranges
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(",");
        assert_eq!(rendered, spec);
        assert_eq!(parse_ranges(&rendered).unwrap(), ranges);
    }

    #[test]
    fn range_indices_are_zero_based() {
        let range = PageRange { start: 7, end: 9 };
        assert_eq!(range.indices().collect::<Vec<_>>(), vec![6, 7, 8]);
        assert_eq!(range.page_count(), 3);
        assert!(range.contains(8));
        assert!(!range.contains(6));
    }
}
