//! Namespaced identifiers for vehicle types, component types, and models.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// An identifier for a resource consisting of a namespace and a key, written `namespace:key`.
///
/// The namespace may contain the characters `[a-z0-9._]`, and the key may additionally
/// contain `/`. Neither may be empty.
///
/// ```
/// use torque::Identifier;
///
/// let id: Identifier = "torque:drag".parse().unwrap();
/// assert_eq!(id.namespace(), "torque");
/// assert_eq!(id.key(), "drag");
/// assert_eq!(id.to_string(), "torque:drag");
///
/// assert!("Torque:drag".parse::<Identifier>().is_err());
/// assert!("drag".parse::<Identifier>().is_err());
/// ```
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    namespace: Cow<'static, str>,
    key: Cow<'static, str>,
}

/// Error from constructing or parsing an invalid [`Identifier`].
#[derive(Clone, Debug, Eq, PartialEq, displaydoc::Display, thiserror::Error)]
#[non_exhaustive]
pub enum IdentifierError {
    /// invalid identifier namespace {0:?}
    InvalidNamespace(String),
    /// invalid identifier key {0:?}
    InvalidKey(String),
    /// identifier {0:?} is missing the ':' between namespace and key
    MissingSeparator(String),
}

impl Identifier {
    /// Constructs an [`Identifier`], checking that both parts are valid.
    pub fn new(
        namespace: impl Into<String>,
        key: impl Into<String>,
    ) -> Result<Self, IdentifierError> {
        let namespace = namespace.into();
        let key = key.into();
        if !Self::valid_namespace(&namespace) {
            return Err(IdentifierError::InvalidNamespace(namespace));
        }
        if !Self::valid_key(&key) {
            return Err(IdentifierError::InvalidKey(key));
        }
        Ok(Self {
            namespace: Cow::Owned(namespace),
            key: Cow::Owned(key),
        })
    }

    /// Constructs an [`Identifier`] from string literals, for use in constants.
    ///
    /// Panics (at compile time, when used in a `const`) if either part is invalid.
    #[track_caller]
    pub const fn from_static(namespace: &'static str, key: &'static str) -> Self {
        assert!(
            valid_chars(namespace.as_bytes(), false),
            "invalid identifier namespace"
        );
        assert!(valid_chars(key.as_bytes(), true), "invalid identifier key");
        Self {
            namespace: Cow::Borrowed(namespace),
            key: Cow::Borrowed(key),
        }
    }

    /// Returns the namespace part.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the key part.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns whether the string is a valid namespace: nonempty and made of `[a-z0-9._]`.
    pub fn valid_namespace(namespace: &str) -> bool {
        valid_chars(namespace.as_bytes(), false)
    }

    /// Returns whether the string is a valid key: nonempty and made of `[a-z0-9._/]`.
    pub fn valid_key(key: &str) -> bool {
        valid_chars(key.as_bytes(), true)
    }
}

const fn valid_chars(text: &[u8], allow_slash: bool) -> bool {
    if text.is_empty() {
        return false;
    }
    let mut i = 0;
    while i < text.len() {
        let ok = matches!(text[i], b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_')
            || (allow_slash && text[i] == b'/');
        if !ok {
            return false;
        }
        i += 1;
    }
    true
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({self})")
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.key)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((namespace, key)) => Self::new(namespace, key),
            None => Err(IdentifierError::MissingSeparator(s.to_owned())),
        }
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.to_string()
    }
}
