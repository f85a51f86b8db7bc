//! Raw detector samples and their JSONL recording format.
//!
//! One sample per line: `{"dx": 0.12, "dy": -0.3}` for a detection or
//! `null` when the detector found nothing that tick. Blank lines and lines
//! starting with `#` are ignored.

use crate::direction::Direction;

/// One tick's unsmoothed detector output. `None` means no target was found.
pub type RawSample = Option<Direction>;

/// Errors from parsing a raw-sample stream.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct SampleParseError {
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Parse a JSONL raw-sample stream.
pub fn parse_samples(jsonl: &str) -> Result<Vec<RawSample>, SampleParseError> {
    jsonl
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(idx, line)| {
            serde_json::from_str::<RawSample>(line.trim()).map_err(|source| SampleParseError {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_stream() {
        let input = "# recorded at desk\n{\"dx\":0.1,\"dy\":-0.2}\n\nnull\n{\"dx\":-0.5,\"dy\":0.0}\n";
        let samples = parse_samples(input).unwrap();
        assert_eq!(
            samples,
            vec![
                Some(Direction::new(0.1, -0.2)),
                None,
                Some(Direction::new(-0.5, 0.0)),
            ]
        );
    }

    #[test]
    fn test_parse_reports_line_number() {
        let err = parse_samples("null\n{\"dx\":1}\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let jsonl = "# recorded at desk\n\nnull\n  # indented comment\n{\"dx\":0.25,\"dy\":0.75}\n";
        assert_eq!(
            parse_samples(jsonl).unwrap(),
            vec![None, Some(Direction::new(0.25, 0.75))]
        );
    }
}
