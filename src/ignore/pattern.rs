//! Ignore-rule line compiler and glob matcher
//!
//! A rule line is compiled into a [`CompiledPattern`]: a negation flag, a
//! directory-only flag, an anchoring flag and a list of path segments. Each
//! segment is either `**` (zero or more whole segments) or a single-segment
//! glob compiled with the `glob` crate. Matching is a pure function of the
//! compiled pattern and a relative path; it never touches the filesystem.

use glob::{MatchOptions, Pattern};
use serde::Serialize;
use tracing::debug;

/// Options used for every single-segment match.
///
/// Segments never contain a separator, so `require_literal_separator` only
/// guards against platform separators sneaking in through file names.
const SEGMENT_MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Type of ignore pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    /// Normal ignore pattern
    Ignore,
    /// Negation pattern (starts with !)
    Include,
}

/// One compiled path segment
#[derive(Debug, Clone)]
enum Segment {
    /// `**`: zero or more whole path segments
    AnyDepth,
    /// Segment containing `*`, `?` or a character class
    Glob(Pattern),
    /// Plain text, or a segment whose wildcard syntax could not be compiled
    Literal(String),
}

impl Segment {
    fn matches(&self, name: &str) -> bool {
        match self {
            Segment::AnyDepth => true,
            Segment::Glob(pattern) => pattern.matches_with(name, SEGMENT_MATCH_OPTIONS),
            Segment::Literal(text) => text == name,
        }
    }
}

/// A compiled pattern from a rule file
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// The original line, trimmed
    pub original: String,
    /// 1-based line number inside the rule file (0 when not read from a file)
    pub line: usize,
    /// Type of pattern (ignore or negation)
    pub pattern_type: PatternType,
    /// Whether the pattern only matches relative to the owning directory
    pub anchored: bool,
    /// Whether this pattern only matches directories
    pub directory_only: bool,
    segments: Vec<Segment>,
}

impl CompiledPattern {
    /// Compile one rule line. Returns `None` for blank lines, comments and
    /// lines that are empty once their markers are stripped.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (pattern_type, body) = match line.strip_prefix('!') {
            Some(rest) => (PatternType::Include, rest),
            None => (PatternType::Ignore, line),
        };

        let (directory_only, body) = strip_trailing_slash(body);

        let (anchored, body) = match body.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, body),
        };

        let mut segments: Vec<Segment> = Vec::new();
        for raw in body.split('/').filter(|s| !s.is_empty()) {
            let segment = compile_segment(raw);
            // a/**/**/b is the same as a/**/b
            if matches!(segment, Segment::AnyDepth) && matches!(segments.last(), Some(Segment::AnyDepth)) {
                continue;
            }
            segments.push(segment);
        }

        if segments.is_empty() {
            return None;
        }

        Some(Self {
            original: line.to_string(),
            line: 0,
            pattern_type,
            anchored,
            directory_only,
            segments,
        })
    }

    /// Attach the rule-file line number this pattern was read from
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Whether this is a re-inclusion (`!`) pattern
    pub fn is_negated(&self) -> bool {
        self.pattern_type == PatternType::Include
    }

    /// Check a `/`-separated path, relative to the owning rule file's
    /// directory, against this pattern.
    pub fn matches(&self, relative_path: &str, is_dir: bool) -> bool {
        let components: Vec<&str> = relative_path.split('/').filter(|s| !s.is_empty()).collect();
        self.matches_components(&components, is_dir)
    }

    /// Same as [`matches`](Self::matches) for a path already split into
    /// components.
    pub fn matches_components<S: AsRef<str>>(&self, components: &[S], is_dir: bool) -> bool {
        if self.directory_only && !is_dir {
            return false;
        }

        if components.is_empty() {
            return false;
        }

        if self.anchored {
            match_segments(&self.segments, components)
        } else {
            // Unanchored patterns behave as if prefixed with `**/`
            (0..components.len()).any(|start| match_segments(&self.segments, &components[start..]))
        }
    }
}

/// Match compiled segments against path components, honouring `**`.
fn match_segments<S: AsRef<str>>(segments: &[Segment], components: &[S]) -> bool {
    match segments.split_first() {
        None => components.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=components.len()).any(|skip| match_segments(rest, &components[skip..]))
        },
        Some((segment, rest)) => match components.split_first() {
            Some((head, tail)) => segment.matches(head.as_ref()) && match_segments(rest, tail),
            None => false,
        },
    }
}

/// Strip one trailing unescaped `/`, reporting whether it was present.
fn strip_trailing_slash(body: &str) -> (bool, &str) {
    if !body.ends_with('/') {
        return (false, body);
    }

    let stem = &body[..body.len() - 1];
    let backslashes = stem.chars().rev().take_while(|c| *c == '\\').count();
    if backslashes % 2 == 1 {
        (false, body)
    } else {
        (true, stem.trim_end_matches('/'))
    }
}

/// Compile one path segment.
///
/// Backslash escapes become literal characters, `[^` is accepted as a synonym
/// of `[!`, and runs of `*` inside a larger segment collapse to one `*`.
/// Syntax the glob crate rejects is matched literally.
fn compile_segment(raw: &str) -> Segment {
    if raw == "**" {
        return Segment::AnyDepth;
    }

    let mut glob_source = String::with_capacity(raw.len() + 4);
    let mut literal = String::with_capacity(raw.len());
    let mut has_wildcards = false;
    let mut in_class = false;
    let mut previous_star = false;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                previous_star = false;
                let escaped = chars.next().unwrap_or('\\');
                literal.push(escaped);
                if in_class {
                    glob_source.push(escaped);
                } else {
                    glob_source.push_str(&Pattern::escape(&escaped.to_string()));
                }
            },
            '*' if !in_class => {
                has_wildcards = true;
                literal.push(c);
                if !previous_star {
                    glob_source.push('*');
                }
                previous_star = true;
            },
            '?' if !in_class => {
                has_wildcards = true;
                previous_star = false;
                literal.push(c);
                glob_source.push('?');
            },
            '[' if !in_class => {
                has_wildcards = true;
                in_class = true;
                previous_star = false;
                literal.push(c);
                glob_source.push('[');
                if chars.peek() == Some(&'^') {
                    chars.next();
                    literal.push('^');
                    glob_source.push('!');
                }
                // A leading `]` is part of the class, not its end
                if chars.peek() == Some(&']') {
                    chars.next();
                    literal.push(']');
                    glob_source.push(']');
                }
            },
            ']' if in_class => {
                in_class = false;
                literal.push(c);
                glob_source.push(']');
            },
            _ => {
                previous_star = false;
                literal.push(c);
                glob_source.push(c);
            },
        }
    }

    if !has_wildcards {
        return Segment::Literal(literal);
    }

    match Pattern::new(&glob_source) {
        Ok(pattern) => Segment::Glob(pattern),
        Err(e) => {
            debug!("Treating segment {:?} as a literal: {}", raw, e);
            Segment::Literal(literal)
        },
    }
}
