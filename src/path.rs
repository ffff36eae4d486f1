//! Render path: addressing values inside the data instance
//!
//! The form visitor pushes a segment when it enters a field, relationship or
//! array element and pops it on the way out. At any point the path addresses
//! the value being rendered, and its string form is the key handed to host
//! callbacks.

use serde_json::Value;
use std::fmt;

use crate::error::{FormError, Result};

static NULL: Value = Value::Null;

/// Segment of a render path
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object property access: .fieldName
    Property(String),
    /// Array index access: [0], [1], etc.
    Index(usize),
}

/// Stack of segments addressing a value (e.g. "bond.maturity" or "instrumentId[0]")
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RenderPath {
    segments: Vec<PathSegment>,
}

impl RenderPath {
    /// Create a root path (empty)
    pub fn root() -> Self {
        Self { segments: vec![] }
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Push a property segment
    pub fn enter_property(&mut self, name: &str) {
        self.segments.push(PathSegment::Property(name.to_string()));
    }

    /// Push an array index segment
    pub fn enter_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// Pop the last segment
    pub fn exit(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// JSON-path form: "$.instrumentId[0]"; names that are not plain
    /// identifiers use bracket notation
    pub fn to_json_path(&self) -> String {
        let mut out = String::from("$");
        for segment in &self.segments {
            match segment {
                PathSegment::Property(name) if is_identifier(name) => {
                    out.push('.');
                    out.push_str(name);
                }
                PathSegment::Property(name) => {
                    out.push_str(&format!("[{}]", Value::String(name.clone())));
                }
                PathSegment::Index(idx) => out.push_str(&format!("[{}]", idx)),
            }
        }
        out
    }

    /// Parse a path string (dot form or JSON-path form) into a RenderPath
    pub fn parse(s: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let body = match s.strip_prefix('$') {
            Some(rest) if rest.is_empty() || rest.starts_with('.') || rest.starts_with('[') => rest,
            _ => s,
        };
        let mut chars = body.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Property(std::mem::take(&mut current)));
                    }
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Property(std::mem::take(&mut current)));
                    }
                    // Read until the closing bracket, honouring quoted names
                    let mut inner = String::new();
                    let mut in_quotes = false;
                    while let Some(c) = chars.next() {
                        match c {
                            '"' => {
                                in_quotes = !in_quotes;
                                inner.push(c);
                            }
                            '\\' if in_quotes => {
                                inner.push(c);
                                if let Some(escaped) = chars.next() {
                                    inner.push(escaped);
                                }
                            }
                            ']' if !in_quotes => break,
                            _ => inner.push(c),
                        }
                    }
                    if let Ok(idx) = inner.parse::<usize>() {
                        segments.push(PathSegment::Index(idx));
                    } else if let Ok(Value::String(name)) = serde_json::from_str::<Value>(&inner) {
                        segments.push(PathSegment::Property(name));
                    }
                }
                _ => current.push(ch),
            }
        }

        if !current.is_empty() {
            segments.push(PathSegment::Property(current));
        }

        Self { segments }
    }

    /// Read the value this path addresses.
    ///
    /// A missing object key reads as `null`, and so does anything below a
    /// `null`. Stepping into a scalar, a property step into an array, or an
    /// index out of bounds is an instance/schema mismatch.
    pub fn read<'v>(&self, instance: &'v Value) -> Result<&'v Value> {
        let mut current = instance;
        for segment in &self.segments {
            current = match (segment, current) {
                (_, Value::Null) => return Ok(&NULL),
                (PathSegment::Property(name), Value::Object(map)) => {
                    map.get(name).unwrap_or(&NULL)
                }
                (PathSegment::Index(idx), Value::Array(items)) => {
                    items.get(*idx).ok_or_else(|| self.addressing_error())?
                }
                _ => return Err(self.addressing_error()),
            };
        }
        Ok(current)
    }

    fn addressing_error(&self) -> FormError {
        FormError::Addressing {
            path: self.to_string(),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Dot-notation form: "bond.maturity" or "instrumentId[0]"
impl fmt::Display for RenderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                PathSegment::Property(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Property(name) => write!(f, ".{}", name)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
