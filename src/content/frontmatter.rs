//! Front-matter parsing
//!
//! Posts start with an optional header block delimited by `---` lines:
//!
//! ```text
//! ---
//! title: "Building a Distributed Cache"
//! date: "2024-01-15"
//! tags: ["Systems", "Rust"]
//! featured: true
//! ---
//! body follows...
//! ```
//!
//! The header dialect is deliberately lenient: malformed lines are skipped,
//! not rejected, and a document without a recognizable header is returned
//! whole as body. One bad line never costs a post its remaining fields.

use indexmap::IndexMap;

/// A loosely-typed front-matter value, inferred at parse time.
///
/// This variant type stays inside the parsing layer; normalization projects
/// it into the strongly-typed [`Post`](super::Post) fields immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Int(i64),
    List(Vec<String>),
}

/// Parsed front-matter header: `key -> value`, in source order.
#[derive(Debug, Clone, Default)]
pub struct Frontmatter {
    fields: IndexMap<String, Value>,
}

impl Frontmatter {
    /// Split raw document text into a header and the remaining body.
    ///
    /// The header is recognized only when the text begins with a line that is
    /// exactly `---` and a second such line closes it. Anything else (no
    /// opening delimiter, no closing delimiter) yields an empty header and
    /// the entire input unchanged as body.
    pub fn parse(content: &str) -> (Self, &str) {
        let Some(after_open) = strip_opening_delimiter(content) else {
            return (Self::default(), content);
        };

        let mut offset = 0;
        for line in after_open.split_inclusive('\n') {
            if is_delimiter(line) {
                let header = &after_open[..offset];
                let body = &after_open[offset + line.len()..];
                return (Self::parse_header(header), body);
            }
            offset += line.len();
        }

        // No closing delimiter: treat as no front-matter
        (Self::default(), content)
    }

    fn parse_header(header: &str) -> Self {
        let mut fields = IndexMap::new();

        for line in header.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(colon) = line.find(':') else {
                continue;
            };
            let key = line[..colon].trim();
            if key.is_empty() {
                continue;
            }
            let value = parse_value(line[colon + 1..].trim());
            fields.insert(key.to_string(), value);
        }

        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String value for `key`, if present and a string.
    pub fn str_value(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn bool_value(&self, key: &str) -> Option<bool> {
        match self.fields.get(key) {
            Some(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn int_value(&self, key: &str) -> Option<i64> {
        match self.fields.get(key) {
            Some(Value::Int(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn list_value(&self, key: &str) -> Option<&[String]> {
        match self.fields.get(key) {
            Some(Value::List(items)) => Some(items),
            _ => None,
        }
    }
}

/// Returns the text after the opening `---` line, or `None` when the content
/// does not start with one.
fn strip_opening_delimiter(content: &str) -> Option<&str> {
    let line_end = content.find('\n')?;
    if content[..line_end].trim_end_matches('\r') == "---" {
        Some(&content[line_end + 1..])
    } else {
        None
    }
}

/// A header-closing line, with or without its trailing newline.
fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']) == "---"
}

/// Infer the type of a raw header value.
///
/// Surrounding quotes are unwrapped first; `[...]` literals become string
/// lists; exact `true`/`false` become booleans and all-digit values become
/// integers. Everything else stays a string.
fn parse_value(raw: &str) -> Value {
    let raw = strip_quotes(raw);

    if raw.len() >= 2 && raw.starts_with('[') && raw.ends_with(']') {
        let items = raw[1..raw.len() - 1]
            .split(',')
            .map(|item| item.trim().trim_matches(['"', '\'']).trim())
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        return Value::List(items);
    }

    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => raw
            .parse::<i64>()
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Str(raw.to_string())),
        _ => Value::Str(raw.to_string()),
    }
}

/// Strip one pair of matching single or double quotes.
fn strip_quotes(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if raw.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[raw.len() - 1] == bytes[0]
    {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}
