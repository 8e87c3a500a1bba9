//! Helpers shared by the whitespace-delimited row readers.

use crate::constants::COMMENT_PREFIX;
use crate::error::{AthenaError, Result};
use std::path::Path;

/// True for tokens that start a comment line
pub(crate) fn is_comment(token: &str) -> bool {
    token.starts_with(COMMENT_PREFIX)
}

/// Parse every token as f64; `line_num` is 1-based and only used for errors
pub(crate) fn parse_values(path: &Path, line_num: usize, tokens: &[&str]) -> Result<Vec<f64>> {
    tokens
        .iter()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| row_format(path, line_num, format!("invalid number '{}'", token)))
        })
        .collect()
}

pub(crate) fn row_format(path: &Path, line: usize, reason: impl Into<String>) -> AthenaError {
    AthenaError::RowFormat {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values() {
        let path = Path::new("run.hst");
        assert_eq!(
            parse_values(path, 1, &["1.5", "-2e3", "inf"]).unwrap(),
            vec![1.5, -2000.0, f64::INFINITY]
        );

        let err = parse_values(path, 7, &["1.0", "1.0.0"]).unwrap_err();
        match err {
            AthenaError::RowFormat { line, reason, .. } => {
                assert_eq!(line, 7);
                assert_eq!(reason, "invalid number '1.0.0'");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_is_comment() {
        assert!(is_comment("#"));
        assert!(is_comment("#i"));
        assert!(!is_comment("0"));
    }
}
