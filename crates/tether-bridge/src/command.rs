//! Textual command format exchanged from the render side to the host.
//!
//! Two equivalent forms are accepted:
//!
//! - **Wire form**: whitespace-separated tokens. The first token is the
//!   command name, every following token is `key=value`, and an optional
//!   trailing `@binary` marks that a byte buffer travels out-of-band.
//!
//!   ```text
//!   readFile seq=R7 path=%2Ftmp%2Fmy%20file @binary
//!   ```
//!
//! - **URI form**: `ipc://name?key=value&key=value`. This is the shape of
//!   every message the bridge delivers to the host listener.
//!
//! Names, keys and values are percent-encoded on output and decoded on
//! input, so any of them may contain spaces, `=`, `&` or newlines.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Trailing token flagging an out-of-band binary payload.
pub const BINARY_MARKER: &str = "@binary";

/// Prefix of the URI form.
pub const URI_SCHEME: &str = "ipc://";

/// Argument key carrying the sequence id.
pub const SEQ_KEY: &str = "seq";

/// Why a raw message could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty message")]
    EmptyMessage,

    #[error("message has no command name")]
    MissingName,

    #[error("malformed argument `{0}`: expected key=value")]
    MalformedArgument(String),

    #[error("argument `{0}` has an empty key")]
    EmptyKey(String),

    #[error("duplicate argument `{0}`")]
    DuplicateArgument(String),

    #[error("invalid percent-encoding in `{0}`")]
    InvalidEncoding(String),

    #[error("unknown marker `{0}`")]
    UnknownMarker(String),

    #[error("unexpected `{0}` after the binary payload marker")]
    TrailingAfterMarker(String),
}

/// A parsed bridge command: a name, its string arguments, and whether a
/// binary payload accompanies it.
///
/// Argument values are kept as raw strings; callers convert them with
/// [`Command::get_as`] or by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    args: BTreeMap<String, String>,
    binary: bool,
}

impl Command {
    /// Create a command with no arguments. Fails if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, ParseError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ParseError::MissingName);
        }
        Ok(Self {
            name,
            args: BTreeMap::new(),
            binary: false,
        })
    }

    /// Add or replace an argument. Fails if `key` is empty.
    pub fn with_arg(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ParseError> {
        let key = key.into();
        let value = value.into();
        if key.is_empty() {
            return Err(ParseError::EmptyKey(format!("={value}")));
        }
        self.args.insert(key, value);
        Ok(self)
    }

    /// Build a command from parts known to be valid: `name` and every key
    /// must be non-empty.
    pub(crate) fn from_trusted<'a>(
        name: &str,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        debug_assert!(!name.is_empty());
        Self {
            name: name.to_string(),
            args: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            binary: false,
        }
    }

    /// Set or clear the binary payload flag.
    pub fn with_binary_payload(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }

    /// Parse either the wire form or the URI form.
    pub fn parse(message: &str) -> Result<Self, ParseError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ParseError::EmptyMessage);
        }

        match message.strip_prefix(URI_SCHEME) {
            Some(rest) => Self::parse_uri(rest),
            None => Self::parse_wire(message),
        }
    }

    fn parse_wire(message: &str) -> Result<Self, ParseError> {
        let mut tokens = message.split_ascii_whitespace();
        let raw_name = tokens.next().ok_or(ParseError::EmptyMessage)?;
        let mut command = Self::from_raw_name(raw_name)?;

        while let Some(token) = tokens.next() {
            if token.starts_with('@') {
                if token != BINARY_MARKER {
                    return Err(ParseError::UnknownMarker(token.to_string()));
                }
                if let Some(extra) = tokens.next() {
                    return Err(ParseError::TrailingAfterMarker(extra.to_string()));
                }
                command.binary = true;
                break;
            }
            command.insert_raw(token)?;
        }

        Ok(command)
    }

    fn parse_uri(rest: &str) -> Result<Self, ParseError> {
        let (raw_name, query) = rest.split_once('?').unwrap_or((rest, ""));
        let mut command = Self::from_raw_name(raw_name.trim_end_matches('/'))?;

        for segment in query.split('&').filter(|s| !s.is_empty()) {
            command.insert_raw(segment)?;
        }

        Ok(command)
    }

    fn from_raw_name(raw: &str) -> Result<Self, ParseError> {
        if raw.is_empty() || raw.starts_with('@') || raw.contains('=') {
            return Err(ParseError::MissingName);
        }
        Self::new(decode(raw)?)
    }

    fn insert_raw(&mut self, token: &str) -> Result<(), ParseError> {
        let (raw_key, raw_value) = token
            .split_once('=')
            .ok_or_else(|| ParseError::MalformedArgument(token.to_string()))?;
        if raw_key.is_empty() {
            return Err(ParseError::EmptyKey(token.to_string()));
        }

        let key = decode(raw_key)?;
        if self.args.contains_key(&key) {
            return Err(ParseError::DuplicateArgument(key));
        }
        let value = decode(raw_value)?;
        self.args.insert(key, value);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.args.get(key).map(String::as_str)
    }

    /// Parse an argument into any `FromStr` type. `None` if the argument is
    /// missing or does not parse.
    pub fn get_as<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// The sequence id carried by this command, if any.
    pub fn seq(&self) -> Option<&str> {
        self.get(SEQ_KEY)
    }

    pub fn args(&self) -> &BTreeMap<String, String> {
        &self.args
    }

    pub fn has_binary_payload(&self) -> bool {
        self.binary
    }

    /// Serialize to the wire form.
    pub fn to_wire(&self) -> String {
        let mut out = urlencoding::encode(&self.name).into_owned();
        for (key, value) in &self.args {
            out.push(' ');
            push_pair(&mut out, key, value);
        }
        if self.binary {
            out.push(' ');
            out.push_str(BINARY_MARKER);
        }
        out
    }

    /// Serialize to the URI form. The binary flag is not representable here
    /// and is dropped.
    pub fn to_uri(&self) -> String {
        let mut out = String::from(URI_SCHEME);
        out.push_str(&urlencoding::encode(&self.name));
        for (i, (key, value)) in self.args.iter().enumerate() {
            out.push(if i == 0 { '?' } else { '&' });
            push_pair(&mut out, key, value);
        }
        out
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn push_pair(out: &mut String, key: &str, value: &str) {
    out.push_str(&urlencoding::encode(key));
    out.push('=');
    out.push_str(&urlencoding::encode(value));
}

fn decode(raw: &str) -> Result<String, ParseError> {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .map_err(|_| ParseError::InvalidEncoding(raw.to_string()))
}
