//! Forwarding-time path transforms.
//!
//! A route carries at most one transform. It runs after the route matched and
//! produces the path to forward plus any headers recording what changed.

use serde::{Deserialize, Serialize};

use crate::routing::template::PathTemplate;

/// Header carrying the prefix removed by a strip transform.
pub const X_FORWARDED_PREFIX: &str = "x-forwarded-prefix";

/// Header carrying the original path replaced by `ReplacePath`.
pub const X_REPLACED_PATH: &str = "x-replaced-path";

/// What to do when an expression sets two different transform kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformPolicy {
    /// The later clause replaces the earlier one (logged).
    #[default]
    Overwrite,
    /// Compilation fails.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    None,
    Strip,
    StripRegex,
    PrefixStrip,
    PrefixStripRegex,
    AddPrefix,
    ReplacePath,
}

impl TransformKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransformKind::None => "None",
            TransformKind::Strip => "PathStrip",
            TransformKind::StripRegex => "PathStripRegex",
            TransformKind::PrefixStrip => "PathPrefixStrip",
            TransformKind::PrefixStripRegex => "PathPrefixStripRegex",
            TransformKind::AddPrefix => "AddPrefix",
            TransformKind::ReplacePath => "ReplacePath",
        }
    }
}

/// The single rewrite attached to a route.
///
/// Strip lists are kept longest first so a short prefix never shadows a
/// longer one.
#[derive(Debug, Clone, Default)]
pub enum PathTransform {
    #[default]
    None,
    Strip(Vec<String>),
    StripRegex(Vec<PathTemplate>),
    PrefixStrip(Vec<String>),
    PrefixStripRegex(Vec<PathTemplate>),
    AddPrefix(String),
    ReplacePath(String),
}

/// Result of applying a transform to a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub path: String,
    pub headers: Vec<(&'static str, String)>,
}

impl Rewrite {
    fn unchanged(path: &str) -> Self {
        Self {
            path: path.to_string(),
            headers: Vec::new(),
        }
    }
}

impl PathTransform {
    pub fn kind(&self) -> TransformKind {
        match self {
            PathTransform::None => TransformKind::None,
            PathTransform::Strip(_) => TransformKind::Strip,
            PathTransform::StripRegex(_) => TransformKind::StripRegex,
            PathTransform::PrefixStrip(_) => TransformKind::PrefixStrip,
            PathTransform::PrefixStripRegex(_) => TransformKind::PrefixStripRegex,
            PathTransform::AddPrefix(_) => TransformKind::AddPrefix,
            PathTransform::ReplacePath(_) => TransformKind::ReplacePath,
        }
    }

    /// Rewrite `path` for forwarding.
    pub fn apply(&self, path: &str) -> Rewrite {
        match self {
            PathTransform::None => Rewrite::unchanged(path),
            // exact strips remove the whole path, and only a value that
            // matched all of it may apply
            PathTransform::Strip(paths) => {
                if paths.iter().any(|p| p == path) {
                    strip(path, path.len())
                } else {
                    Rewrite::unchanged(path)
                }
            }
            PathTransform::StripRegex(templates) => {
                if templates.iter().any(|t| t.matches_path(path)) {
                    strip(path, path.len())
                } else {
                    Rewrite::unchanged(path)
                }
            }
            PathTransform::PrefixStrip(prefixes) => prefixes
                .iter()
                .find(|p| path.starts_with(p.as_str()))
                .map(|p| strip(path, p.len()))
                .unwrap_or_else(|| Rewrite::unchanged(path)),
            PathTransform::PrefixStripRegex(templates) => templates
                .iter()
                .find_map(|t| t.prefix_len(path))
                .map(|len| strip(path, len))
                .unwrap_or_else(|| Rewrite::unchanged(path)),
            PathTransform::AddPrefix(prefix) => Rewrite {
                path: with_leading_slash(&format!("{prefix}{path}")),
                headers: Vec::new(),
            },
            PathTransform::ReplacePath(replacement) => Rewrite {
                path: replacement.clone(),
                headers: vec![(X_REPLACED_PATH, path.to_string())],
            },
        }
    }
}

/// Stable sort, longest value first.
pub(crate) fn longest_first<T>(values: &mut [T], len: impl Fn(&T) -> usize) {
    values.sort_by(|a, b| len(b).cmp(&len(a)));
}

fn strip(path: &str, len: usize) -> Rewrite {
    Rewrite {
        path: with_leading_slash(&path[len..]),
        headers: vec![(X_FORWARDED_PREFIX, path[..len].to_string())],
    }
}

fn with_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
