use crate::{Error, PlaceholderStyle, Result, Value};

/// Ordered list of named values to bind to the next statement.
///
/// Names are stored without the leading colon. Binding the same name twice
/// keeps both entries, the last one wins when the query is resolved.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Params {
    values: Vec<(String, Value)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn push(&mut self, name: impl AsRef<str>, value: impl Into<Value>) {
        let name = name.as_ref();
        let name = name.strip_prefix(':').unwrap_or(name);
        self.values.push((name.to_owned(), value.into()));
    }
    pub fn clear(&mut self) {
        self.values.clear();
    }
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .rev()
            .find_map(|(k, v)| if k == name { Some(v) } else { None })
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<N: AsRef<str>, V: Into<Value>> FromIterator<(N, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut result = Params::new();
        for (k, v) in iter {
            result.push(k, v);
        }
        result
    }
}

/// SQL with `:name` placeholders rewritten into the positional style of a
/// backend.
///
/// Quoted strings and identifiers, comments, PostgreSQL `::` casts and
/// dollar quoted strings are left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedQuery {
    /// The rewritten SQL.
    pub sql: String,
    /// Parameter names, one per positional parameter.
    pub names: Vec<String>,
}

impl NamedQuery {
    pub fn parse(sql: &str, style: PlaceholderStyle) -> Self {
        let bytes = sql.as_bytes();
        let len = bytes.len();
        let mut out = String::with_capacity(len + 16);
        let mut names: Vec<String> = Vec::new();
        let mut i = 0;
        // Position up to which the input was already copied into `out`.
        let mut copied = 0;
        while i < len {
            let c = bytes[i];
            let next = bytes.get(i + 1).copied();
            match c {
                b'\'' | b'"' | b'`' => {
                    i = skip_quoted(bytes, i, style);
                }
                b'-' if next == Some(b'-') => {
                    i = skip_line(bytes, i);
                }
                b'#' if style == PlaceholderStyle::QuestionMark => {
                    i = skip_line(bytes, i);
                }
                b'/' if next == Some(b'*') => {
                    i = match sql[i + 2..].find("*/") {
                        Some(end) => i + 2 + end + 2,
                        None => len,
                    };
                }
                b'$' if style == PlaceholderStyle::Dollar => {
                    i = skip_dollar_quoted(sql, i);
                }
                b':' if next == Some(b':') => {
                    i += 2;
                }
                b':' if next.is_some_and(is_identifier_start) => {
                    let start = i + 1;
                    let mut end = start;
                    while end < len && is_identifier_char(bytes[end]) {
                        end += 1;
                    }
                    out.push_str(&sql[copied..i]);
                    let name = &sql[start..end];
                    match style {
                        PlaceholderStyle::QuestionMark => {
                            names.push(name.to_owned());
                            out.push('?');
                        }
                        PlaceholderStyle::Dollar => {
                            let position = match names.iter().position(|v| v == name) {
                                Some(position) => position,
                                None => {
                                    names.push(name.to_owned());
                                    names.len() - 1
                                }
                            };
                            out.push('$');
                            out.push_str(&(position + 1).to_string());
                        }
                    }
                    i = end;
                    copied = end;
                }
                _ => {
                    i += 1;
                }
            }
        }
        out.push_str(&sql[copied..]);
        Self { sql: out, names }
    }

    /// Positional values in placeholder order.
    ///
    /// Fails when a placeholder has no bound value or when a bound value is
    /// not used by the query.
    pub fn resolve(&self, params: &Params) -> Result<Vec<Value>> {
        if let Some((unused, _)) = params
            .iter()
            .find(|(name, _)| !self.names.iter().any(|v| v == name))
        {
            return Err(Error::msg(format!(
                "Invalid parameter number: parameter :{} is not defined in the query",
                unused
            )));
        }
        self.names
            .iter()
            .map(|name| {
                params.get(name).cloned().ok_or_else(|| {
                    Error::msg(format!(
                        "Invalid parameter number: parameter :{} was not bound",
                        name
                    ))
                })
            })
            .collect()
    }
}

fn is_identifier_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_identifier_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Index right after the closing quote, doubled quotes are escapes. MySQL
/// strings and PostgreSQL `E'...'` strings also accept backslash escapes.
fn skip_quoted(bytes: &[u8], start: usize, style: PlaceholderStyle) -> usize {
    let quote = bytes[start];
    let backslash = match style {
        PlaceholderStyle::QuestionMark => quote != b'`',
        PlaceholderStyle::Dollar => quote == b'\'' && is_escape_prefix(bytes, start),
    };
    let mut i = start + 1;
    while i < bytes.len() {
        let c = bytes[i];
        if backslash && c == b'\\' {
            i += 2;
            continue;
        }
        if c == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

/// Whether the quote at `start` opens an `E'...'` string.
fn is_escape_prefix(bytes: &[u8], start: usize) -> bool {
    match start.checked_sub(1).map(|i| (i, bytes[i])) {
        Some((i, b'E' | b'e')) => i == 0 || !is_identifier_char(bytes[i - 1]),
        _ => false,
    }
}

fn skip_line(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|c| *c == b'\n')
        .map(|v| start + v + 1)
        .unwrap_or(bytes.len())
}

/// Skip `$tag$ ... $tag$`, anything else starting with `$` is skipped by one.
fn skip_dollar_quoted(sql: &str, start: usize) -> usize {
    let bytes = sql.as_bytes();
    let mut end = start + 1;
    if bytes.get(end).is_some_and(|c| is_identifier_start(*c)) {
        while end < bytes.len() && is_identifier_char(bytes[end]) {
            end += 1;
        }
    }
    if bytes.get(end) != Some(&b'$') {
        return start + 1;
    }
    let tag = &sql[start..=end];
    let body = end + 1;
    match sql[body..].find(tag) {
        Some(close) => body + close + tag.len(),
        None => bytes.len(),
    }
}
