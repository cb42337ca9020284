//! Naming-pattern resolution.
//!
//! A naming pattern is a path template such as `env/.env.[name]`: one
//! `[name]` placeholder plus optional `*` / `**` wildcards. This module is
//! the single source of truth for turning that template into a discovery
//! glob, an anchored name-extracting matcher, and a concrete path for a
//! given name.
//!
//! The pattern is parsed once into tokens and both the glob and the regex
//! are emitted per token, so the `**`-before-`*` ordering hazard of
//! search-and-replace translation cannot arise.

use std::path::Path;

use regex::Regex;

use crate::error::{PatternError, Result};

/// The literal token a concrete environment name substitutes into.
pub const PLACEHOLDER: &str = "[name]";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Verbatim path text.
    Literal(String),
    /// `*`: one segment, no separators.
    Single,
    /// `**`: one or more segments.
    Multi,
    /// `[name]`: the environment name.
    Placeholder,
}

/// A parsed naming pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    tokens: Vec<Token>,
}

impl Pattern {
    /// Parse a naming pattern into tokens.
    ///
    /// Parsing itself never fails; placeholder-count invariants are
    /// enforced where a name must flow through ([`render`](Self::render)
    /// and [`matcher`](Self::matcher)), not at glob time.
    pub fn parse(raw: &str) -> Self {
        // Normalize a leading "./" so rendered and matched paths agree.
        let normalized = raw.strip_prefix("./").unwrap_or(raw);

        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut rest = normalized;

        while !rest.is_empty() {
            if let Some(tail) = rest.strip_prefix(PLACEHOLDER) {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Placeholder);
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("**") {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Multi);
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix('*') {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Single);
                rest = tail;
            } else {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    literal.push(c);
                }
                rest = chars.as_str();
            }
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Self {
            raw: normalized.to_string(),
            tokens,
        }
    }

    /// The normalized pattern text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn placeholder_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| **t == Token::Placeholder)
            .count()
    }

    fn require_single_placeholder(&self) -> Result<()> {
        match self.placeholder_count() {
            0 => Err(PatternError::MissingPlaceholder(self.raw.clone()).into()),
            1 => Ok(()),
            _ => Err(PatternError::DuplicatePlaceholder(self.raw.clone()).into()),
        }
    }

    /// Discovery glob: the placeholder becomes a single-segment wildcard,
    /// everything else passes through untouched.
    ///
    /// A pattern without a placeholder degenerates to a fixed path; that
    /// is still a valid glob, but no name can ever be recovered from it
    /// (the matcher rejects such a pattern).
    pub fn to_glob(&self) -> String {
        let mut glob = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => glob.push_str(text),
                Token::Single => glob.push('*'),
                Token::Multi => glob.push_str("**"),
                Token::Placeholder => glob.push('*'),
            }
        }
        glob
    }

    /// Materialize a concrete path for `name`.
    ///
    /// No validation of `name` happens here; callers validate before
    /// rendering user input.
    pub fn render(&self, name: &str) -> Result<String> {
        self.require_single_placeholder()?;

        let mut path = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => path.push_str(text),
                Token::Single => path.push('*'),
                Token::Multi => path.push_str("**"),
                Token::Placeholder => path.push_str(name),
            }
        }
        Ok(path)
    }

    /// Build the name-extracting matcher, anchored over the pattern
    /// absolute-resolved against `root`.
    ///
    /// The matcher is intentionally stricter than the glob: names are
    /// restricted to alphanumerics and the whole path must match, so
    /// over-matching at discovery time surfaces as an error instead of a
    /// garbage name.
    pub fn matcher(&self, root: &Path) -> Result<Matcher> {
        self.require_single_placeholder()?;

        let mut prefix = root.display().to_string();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }

        let mut expr = String::from("^");
        expr.push_str(&regex::escape(&prefix));
        for token in &self.tokens {
            match token {
                Token::Literal(text) => expr.push_str(&regex::escape(text)),
                // Multi before Single matters in substitution-based
                // translations; here each token maps independently.
                Token::Multi => expr.push_str(".+"),
                Token::Single => expr.push_str("[^ /]+"),
                Token::Placeholder => expr.push_str("(?P<name>[a-zA-Z0-9]+)"),
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(PatternError::BadMatcher)?;
        Ok(Matcher { regex })
    }
}

/// Compiled name extractor for absolute paths.
#[derive(Debug)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    /// Extract the environment name from an absolute path, or `None` when
    /// the path does not conform to the pattern.
    ///
    /// Callers treat `None` for a glob-matched file as a hard error: it
    /// means the naming pattern is malformed, not that the file should be
    /// silently skipped.
    pub fn name_of(&self, path: &Path) -> Option<String> {
        let text = path.to_str()?;
        self.regex
            .captures(text)
            .and_then(|caps| caps.name("name"))
            .map(|m| m.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_glob_replaces_placeholder() {
        let pattern = Pattern::parse("env/.env.[name]");
        assert_eq!(pattern.to_glob(), "env/.env.*");
        assert!(!pattern.to_glob().contains(PLACEHOLDER));
    }

    #[test]
    fn test_glob_preserves_wildcards() {
        let pattern = Pattern::parse("apps/**/env/.env.[name]");
        assert_eq!(pattern.to_glob(), "apps/**/env/.env.*");

        let pattern = Pattern::parse("apps/*/.env.[name]");
        assert_eq!(pattern.to_glob(), "apps/*/.env.*");
    }

    #[test]
    fn test_glob_without_placeholder_is_fixed_path() {
        let pattern = Pattern::parse("env/.env");
        assert_eq!(pattern.to_glob(), "env/.env");
    }

    #[test]
    fn test_render_substitutes_name() {
        let pattern = Pattern::parse("./env/.env.[name]");
        assert_eq!(pattern.render("dev").unwrap(), "env/.env.dev");
    }

    #[test]
    fn test_render_requires_placeholder() {
        let pattern = Pattern::parse("env/.env");
        assert!(pattern.render("dev").is_err());

        let pattern = Pattern::parse("env/[name]/.env.[name]");
        assert!(pattern.render("dev").is_err());
    }

    #[test]
    fn test_matcher_extracts_name() {
        let pattern = Pattern::parse("env/.env.[name]");
        let matcher = pattern.matcher(&PathBuf::from("/repo")).unwrap();

        assert_eq!(
            matcher.name_of(&PathBuf::from("/repo/env/.env.dev")),
            Some("dev".to_string())
        );
        assert_eq!(
            matcher.name_of(&PathBuf::from("/repo/env/.env.prod")),
            Some("prod".to_string())
        );
    }

    #[test]
    fn test_matcher_is_anchored() {
        let pattern = Pattern::parse("env/.env.[name]");
        let matcher = pattern.matcher(&PathBuf::from("/repo")).unwrap();

        // Prefix and suffix garbage must not match.
        assert_eq!(matcher.name_of(&PathBuf::from("/other/env/.env.dev")), None);
        assert_eq!(
            matcher.name_of(&PathBuf::from("/repo/env/.env.dev/extra")),
            None
        );
    }

    #[test]
    fn test_matcher_restricts_names_to_alphanumerics() {
        let pattern = Pattern::parse("env/.env.[name]");
        let matcher = pattern.matcher(&PathBuf::from("/repo")).unwrap();

        assert_eq!(matcher.name_of(&PathBuf::from("/repo/env/.env.foo_bar")), None);
        assert_eq!(matcher.name_of(&PathBuf::from("/repo/env/.env.")), None);
    }

    #[test]
    fn test_matcher_multi_segment_wildcard() {
        let pattern = Pattern::parse("apps/**/.env.[name]");
        let matcher = pattern.matcher(&PathBuf::from("/repo")).unwrap();

        assert_eq!(
            matcher.name_of(&PathBuf::from("/repo/apps/a/b/.env.staging")),
            Some("staging".to_string())
        );
    }

    #[test]
    fn test_matcher_single_segment_wildcard_stops_at_separator() {
        let pattern = Pattern::parse("apps/*/.env.[name]");
        let matcher = pattern.matcher(&PathBuf::from("/repo")).unwrap();

        assert_eq!(
            matcher.name_of(&PathBuf::from("/repo/apps/web/.env.dev")),
            Some("dev".to_string())
        );
        assert_eq!(
            matcher.name_of(&PathBuf::from("/repo/apps/a/b/.env.dev")),
            None
        );
    }

    #[test]
    fn test_matcher_requires_placeholder() {
        let pattern = Pattern::parse("env/.env");
        assert!(pattern.matcher(&PathBuf::from("/repo")).is_err());
    }

    #[test]
    fn test_render_match_round_trip() {
        let root = PathBuf::from("/repo");
        for pattern_text in ["env/.env.[name]", "apps/*/conf/[name].env", "deep/**/x.[name]"] {
            let pattern = Pattern::parse(pattern_text);
            let matcher = pattern.matcher(&root).unwrap();
            for name in ["dev", "prod", "Stage2", "001"] {
                let rendered = if pattern_text.contains('*') {
                    // Wildcards need concrete segments for the round trip.
                    pattern
                        .render(name)
                        .unwrap()
                        .replace("**", "a/b")
                        .replace('*', "web")
                } else {
                    pattern.render(name).unwrap()
                };
                let path = root.join(rendered);
                assert_eq!(matcher.name_of(&path).as_deref(), Some(name));
            }
        }
    }
}
