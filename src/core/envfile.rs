//! Minimal dotenv-style parsing for diffing environment files.

/// Parse KEY=value lines, skipping blanks and comments.
///
/// Surrounding single or double quotes on values are stripped. Pairs come
/// back in file order; consumers that need a keyed view collect them.
pub fn parse(contents: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !key.is_empty() {
                pairs.push((key.to_string(), value.to_string()));
            }
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let pairs = parse("# comment\n\nA=1\nB=2\n");
        assert_eq!(
            pairs,
            vec![
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_strips_quotes() {
        let pairs = parse("A=\"quoted\"\nB='single'\n");
        assert_eq!(pairs[0].1, "quoted");
        assert_eq!(pairs[1].1, "single");
    }

    #[test]
    fn test_parse_keeps_empty_values() {
        let pairs = parse("EMPTY=\nSET=x\n");
        assert_eq!(pairs[0], ("EMPTY".to_string(), String::new()));
    }

    #[test]
    fn test_parse_ignores_lines_without_equals() {
        assert!(parse("not a pair\n").is_empty());
    }
}
