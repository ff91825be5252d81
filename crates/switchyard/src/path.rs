//! Path pattern compilation and matching.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, RouterError};
use crate::request::PathParams;

/// Prefix marking a named parameter segment, as in `/notes/:noteId`.
pub const PARAM_SIGIL: char = ':';

static PARAM_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid param name regex"));

/// Splits a path into its non-empty `/`-delimited segments.
pub(crate) fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// A segment in a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A literal segment, compared case-sensitively.
    Literal(String),
    /// A named parameter matching any one non-empty segment.
    Param(String),
}

/// A compiled route pattern.
///
/// Matching is segment-wise and all-or-nothing: the path must have exactly as
/// many segments as the pattern. Empty segments are ignored on both sides, so
/// `/notes/` and `/notes` are the same path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    pattern: String,
    segments: Vec<PathSegment>,
}

impl PathPattern {
    /// Compiles a pattern such as `/notes/:noteId/comments`.
    ///
    /// # Example
    ///
    /// ```
    /// use switchyard::PathPattern;
    ///
    /// let pattern = PathPattern::compile("/posts/:id/comments/:comment_id").unwrap();
    /// let params = pattern.match_path("/posts/123/comments/456").unwrap();
    /// assert_eq!(params.get("id"), Some("123"));
    /// assert_eq!(params.get("comment_id"), Some("456"));
    /// ```
    pub fn compile(pattern: &str) -> Result<Self> {
        if !pattern.starts_with('/') {
            return Err(RouterError::pattern(pattern, "must start with `/`"));
        }

        let mut seen = HashSet::new();
        let mut segments = Vec::new();

        for part in split_segments(pattern) {
            let Some(name) = part.strip_prefix(PARAM_SIGIL) else {
                segments.push(PathSegment::Literal(part.to_string()));
                continue;
            };
            if name.is_empty() {
                return Err(RouterError::pattern(pattern, "parameter segment without a name"));
            }
            if !PARAM_NAME.is_match(name) {
                return Err(RouterError::pattern(
                    pattern,
                    format!("invalid parameter name `{name}`"),
                ));
            }
            if !seen.insert(name) {
                return Err(RouterError::pattern(
                    pattern,
                    format!("duplicate parameter `{name}`"),
                ));
            }
            segments.push(PathSegment::Param(name.to_string()));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
        })
    }

    /// Matches a full path, returning the bound parameters.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        self.match_segments(&split_segments(path))
    }

    pub(crate) fn match_segments(&self, segments: &[&str]) -> Option<PathParams> {
        if segments.len() != self.segments.len() {
            return None;
        }
        self.bind(segments)
    }

    /// Tests whether the pattern is a prefix of `segments`.
    ///
    /// Returns the bound parameters and the number of segments consumed.
    pub(crate) fn match_prefix(&self, segments: &[&str]) -> Option<(PathParams, usize)> {
        let consumed = self.segments.len();
        let head = segments.get(..consumed)?;
        self.bind(head).map(|params| (params, consumed))
    }

    fn bind(&self, segments: &[&str]) -> Option<PathParams> {
        let mut params = PathParams::new();
        for (expected, actual) in self.segments.iter().zip(segments) {
            match expected {
                PathSegment::Literal(lit) if lit == actual => {}
                PathSegment::Literal(_) => return None,
                PathSegment::Param(name) => params.insert(name.as_str(), *actual),
            }
        }
        Some(params)
    }

    /// Concatenates `child` under `self`.
    ///
    /// Fails when a parameter name appears on both sides.
    pub fn join(&self, child: &Self) -> Result<Self> {
        let joined = format!("{}{}", self.normalized().trim_end_matches('/'), child.normalized());
        Self::compile(&joined)
    }

    /// Returns the pattern as a canonical `/a/:b` string.
    pub fn normalized(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        self.segments.iter().fold(String::new(), |mut out, segment| {
            out.push('/');
            match segment {
                PathSegment::Literal(lit) => out.push_str(lit),
                PathSegment::Param(name) => {
                    out.push(PARAM_SIGIL);
                    out.push_str(name);
                }
            }
            out
        })
    }

    /// Like [`normalized`](Self::normalized) but with parameter names
    /// dropped, so `/:a/x` and `/:b/x` share one shape `/:/x`.
    pub fn shape(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        self.segments.iter().fold(String::new(), |mut out, segment| {
            out.push('/');
            match segment {
                PathSegment::Literal(lit) => out.push_str(lit),
                PathSegment::Param(_) => out.push(PARAM_SIGIL),
            }
            out
        })
    }

    /// The pattern as written at registration.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the parameter names in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            PathSegment::Param(name) => Some(name.as_str()),
            PathSegment::Literal(_) => None,
        })
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for the root pattern `/`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
