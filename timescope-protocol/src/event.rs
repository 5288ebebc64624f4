use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One ingested log record: an opaque mapping from field name to value.
///
/// Events carry no fixed schema. Two fields become load-bearing once
/// [`discover_keys`](crate::discover::discover_keys) has run against a
/// sample: the date field and the message/type field. Field order is
/// preserved from the source document so discovery scans are
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEvent(Map<String, Value>);

impl LogEvent {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wraps a JSON value, rejecting anything that is not an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Direct field access by exact name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Fields in document order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves a dot/bracket path such as `user.roles[0].name` or
    /// `meta["content-type"]`.
    ///
    /// Returns `None` on any missing or mismatched segment (indexing a
    /// non-array, keying a non-object, out-of-bounds index, malformed
    /// path). Never panics.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let segments = parse_path(path)?;
        let mut iter = segments.into_iter();

        let mut current = match iter.next()? {
            PathSegment::Key(key) => self.0.get(&key)?,
            // An event is an object; a leading index can never resolve.
            PathSegment::Index(_) => return None,
        };

        for segment in iter {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(&key)?,
                (PathSegment::Index(idx), Value::Array(items)) => items.get(idx)?,
                _ => return None,
            };
        }

        Some(current)
    }
}

impl Default for LogEvent {
    fn default() -> Self {
        Self::new()
    }
}

/// One step of a parsed accessor path.
#[derive(Debug, Clone, PartialEq)]
enum PathSegment {
    Key(String),
    Index(usize),
}

fn parse_path(path: &str) -> Option<Vec<PathSegment>> {
    let mut segments = Vec::new();
    let mut chars = path.chars().peekable();

    loop {
        match chars.peek() {
            None => break,
            Some('.') => {
                chars.next();
                // A path may not start with, end with, or double a dot.
                if segments.is_empty() || matches!(chars.peek(), None | Some('.') | Some('[')) {
                    return None;
                }
            }
            Some('[') => {
                chars.next();
                match chars.peek() {
                    Some('"') | Some('\'') => {
                        let quote = chars.next()?;
                        let mut key = String::new();
                        loop {
                            match chars.next() {
                                Some(c) if c == quote => break,
                                Some(c) => key.push(c),
                                None => return None,
                            }
                        }
                        if chars.next() != Some(']') {
                            return None;
                        }
                        segments.push(PathSegment::Key(key));
                    }
                    _ => {
                        let mut digits = String::new();
                        while let Some(c) = chars.peek() {
                            if c.is_ascii_digit() {
                                digits.push(*c);
                                chars.next();
                            } else {
                                break;
                            }
                        }
                        if digits.is_empty() || chars.next() != Some(']') {
                            return None;
                        }
                        segments.push(PathSegment::Index(digits.parse().ok()?));
                    }
                }
            }
            Some(_) => {
                let mut key = String::new();
                while let Some(c) = chars.peek() {
                    if *c == '.' || *c == '[' {
                        break;
                    }
                    key.push(*c);
                    chars.next();
                }
                segments.push(PathSegment::Key(key));
            }
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}
