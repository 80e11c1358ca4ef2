//! Value objects for the non-host URI components.
//!
//! Every type in this module is constructed through a validating
//! constructor and immutable afterwards. Constructors either yield a
//! fully valid component or a [`SyntaxError`]; nothing is built halfway.

use crate::encoding::{self, table};
use crate::error::SyntaxError;

/// Decodes text that a table has already validated.
fn decode_validated(s: &str) -> String {
    encoding::decode_str(s).unwrap_or_default()
}

/// A [scheme] component, stored in its canonical lowercase form.
///
/// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.1
///
/// # Examples
///
/// ```
/// use uri_parts::Scheme;
///
/// let scheme = Scheme::parse("HTTPS")?;
/// assert_eq!(scheme.as_str(), "https");
/// # Ok::<_, uri_parts::error::SyntaxError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Scheme {
    inner: String,
}

impl Scheme {
    /// Parses a scheme string.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] when the string is empty, does not
    /// start with a letter, or contains a byte outside the scheme
    /// grammar.
    pub fn parse(s: &str) -> Result<Scheme, SyntaxError> {
        let bytes = s.as_bytes();
        let valid = match bytes.first() {
            Some(&first) => table::ALPHA.allows(first) && table::SCHEME.validate(bytes),
            None => false,
        };
        if !valid {
            return Err(SyntaxError::InvalidComponent {
                component: "scheme",
                input: s.to_owned(),
            });
        }
        Ok(Scheme {
            inner: s.to_ascii_lowercase(),
        })
    }

    /// Returns the canonical lowercase scheme.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns a scheme with the given value, reusing this instance
    /// when the value is unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] when the new value is not a valid scheme.
    pub fn with_value(&self, s: &str) -> Result<Scheme, SyntaxError> {
        if self.inner.eq_ignore_ascii_case(s) {
            Ok(self.clone())
        } else {
            Self::parse(s)
        }
    }
}

/// A [port] subcomponent.
///
/// [port]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.3
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Port(u16);

impl Port {
    /// Creates a port from a number.
    #[must_use]
    pub fn new(port: u16) -> Port {
        Port(port)
    }

    /// Parses a decimal port string.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] when the string is empty, contains a
    /// non-digit, or exceeds 65535.
    pub fn parse(s: &str) -> Result<Port, SyntaxError> {
        let valid = !s.is_empty() && s.bytes().all(|x| x.is_ascii_digit());
        valid
            .then(|| s.parse::<u16>().ok())
            .flatten()
            .map(Port)
            .ok_or_else(|| SyntaxError::InvalidPort {
                input: s.to_owned(),
            })
    }

    /// Returns the port number.
    #[must_use]
    pub fn to_u16(self) -> u16 {
        self.0
    }
}

impl From<u16> for Port {
    fn from(port: u16) -> Self {
        Port(port)
    }
}

/// A [userinfo] subcomponent, split at the first colon into a user
/// and an optional password, both stored decoded.
///
/// The password convention is deprecated by RFC 3986 but still common
/// in the wild, so the split is preserved.
///
/// [userinfo]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.1
///
/// # Examples
///
/// ```
/// use uri_parts::UserInfo;
///
/// let info = UserInfo::from_encoded("user:pa%3Ass")?;
/// assert_eq!(info.user(), "user");
/// assert_eq!(info.password(), Some("pa:ss"));
/// # Ok::<_, uri_parts::error::SyntaxError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserInfo {
    user: String,
    password: Option<String>,
}

impl UserInfo {
    /// Creates a userinfo value from already decoded parts.
    #[must_use]
    pub fn new(user: &str, password: Option<&str>) -> UserInfo {
        UserInfo {
            user: user.to_owned(),
            password: password.map(str::to_owned),
        }
    }

    /// Parses a percent-encoded userinfo string, splitting the user
    /// from the password at the first unencoded colon.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] when the string contains a byte
    /// outside the userinfo grammar or does not decode to UTF-8.
    pub fn from_encoded(s: &str) -> Result<UserInfo, SyntaxError> {
        if !table::USERINFO.validate(s.as_bytes()) {
            return Err(SyntaxError::InvalidComponent {
                component: "userinfo",
                input: s.to_owned(),
            });
        }
        let (user, password) = match s.split_once(':') {
            Some((user, password)) => (user, Some(password)),
            None => (s, None),
        };
        Ok(UserInfo {
            user: encoding::decode_str(user)?,
            password: password.map(encoding::decode_str).transpose()?,
        })
    }

    /// Returns the decoded user.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the decoded password, if one was given.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Returns the encoded serialized form.
    ///
    /// The user keeps its colons encoded so the split point survives
    /// a round trip; the password may contain unencoded colons.
    #[must_use]
    pub fn value(&self) -> String {
        let mut out = encoding::encode(&self.user, table::USER);
        if let Some(password) = &self.password {
            out.push(':');
            encoding::encode_to(password, table::USERINFO, &mut out);
        }
        out
    }
}

/// A [path] component, stored in its encoded form.
///
/// [path]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.3
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    inner: String,
}

impl Path {
    /// Parses a percent-encoded path string.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] when the string contains a byte
    /// outside the path grammar or does not decode to UTF-8.
    pub fn from_encoded(s: &str) -> Result<Path, SyntaxError> {
        if !table::PATH.validate(s.as_bytes()) {
            return Err(SyntaxError::InvalidComponent {
                component: "path",
                input: s.to_owned(),
            });
        }
        // Rejecting non-UTF-8 octets here keeps decoding infallible.
        encoding::decode_str(s)?;
        Ok(Path {
            inner: s.to_owned(),
        })
    }

    /// Returns the encoded path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the decoded path.
    #[must_use]
    pub fn decoded(&self) -> String {
        decode_validated(&self.inner)
    }

    /// Returns `true` if the path is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if the path starts with a slash.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/')
    }

    /// Returns the decoded segments of the path.
    ///
    /// A leading slash does not produce an empty first segment; the
    /// empty path has no segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_parts::Path;
    ///
    /// let path = Path::from_encoded("/a/b%2Fc/")?;
    /// assert_eq!(path.segments(), ["a", "b/c", ""]);
    /// assert!(Path::default().segments().is_empty());
    /// # Ok::<_, uri_parts::error::SyntaxError>(())
    /// ```
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        let rest = self.inner.strip_prefix('/').unwrap_or(&self.inner);
        if rest.is_empty() && !self.is_absolute() {
            return Vec::new();
        }
        rest.split('/').map(decode_validated).collect()
    }

    /// Returns a path with the given encoded value, reusing this
    /// instance when the value is unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] when the new value is not a valid path.
    pub fn with_value(&self, s: &str) -> Result<Path, SyntaxError> {
        if self.inner == s {
            Ok(self.clone())
        } else {
            Self::from_encoded(s)
        }
    }
}

macro_rules! trailing_component {
    ($(#[$doc:meta])* $name:ident, $label:literal, $table:expr) => {
        $(#[$doc])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name {
            decoded: String,
        }

        impl $name {
            /// Creates a component from already decoded text.
            #[must_use]
            pub fn new(decoded: &str) -> $name {
                $name {
                    decoded: decoded.to_owned(),
                }
            }

            /// Parses a percent-encoded string.
            ///
            /// # Errors
            ///
            /// Returns a [`SyntaxError`] when the string contains a
            /// byte outside the component's grammar or does not decode
            /// to UTF-8.
            pub fn from_encoded(s: &str) -> Result<$name, SyntaxError> {
                if !$table.validate(s.as_bytes()) {
                    return Err(SyntaxError::InvalidComponent {
                        component: $label,
                        input: s.to_owned(),
                    });
                }
                Ok($name {
                    decoded: encoding::decode_str(s)?,
                })
            }

            /// Returns the decoded text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.decoded
            }

            /// Returns the encoded serialized form.
            #[must_use]
            pub fn value(&self) -> String {
                encoding::encode(&self.decoded, $table)
            }

            /// Returns a component with the given decoded text,
            /// reusing this instance when the text is unchanged.
            #[must_use]
            pub fn with_value(&self, decoded: &str) -> $name {
                if self.decoded == decoded {
                    self.clone()
                } else {
                    Self::new(decoded)
                }
            }
        }
    };
}

trailing_component! {
    /// A [query] component, stored decoded.
    ///
    /// [query]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.4
    Query, "query", table::QUERY
}

trailing_component! {
    /// A [fragment] component, stored decoded.
    ///
    /// [fragment]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.5
    Fragment, "fragment", table::FRAGMENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme() {
        assert_eq!(Scheme::parse("HTTP").unwrap().as_str(), "http");
        assert_eq!(Scheme::parse("coap+ws").unwrap().as_str(), "coap+ws");
        assert!(Scheme::parse("").is_err());
        assert!(Scheme::parse("1http").is_err());
        assert!(Scheme::parse("ht tp").is_err());

        let scheme = Scheme::parse("https").unwrap();
        assert_eq!(scheme.with_value("HTTPS").unwrap(), scheme);
    }

    #[test]
    fn port() {
        assert_eq!(Port::parse("8080").unwrap().to_u16(), 8080);
        assert_eq!(Port::parse("0").unwrap(), Port::new(0));
        assert!(Port::parse("").is_err());
        assert!(Port::parse("65536").is_err());
        assert!(Port::parse("-1").is_err());
        assert!(Port::parse("80a").is_err());
    }

    #[test]
    fn userinfo_split() {
        let info = UserInfo::from_encoded("user").unwrap();
        assert_eq!(info.user(), "user");
        assert_eq!(info.password(), None);
        assert_eq!(info.value(), "user");

        // only the first colon splits
        let info = UserInfo::from_encoded("user:a:b").unwrap();
        assert_eq!(info.user(), "user");
        assert_eq!(info.password(), Some("a:b"));
        assert_eq!(info.value(), "user:a:b");

        // a colon in the user stays encoded on the way out
        let info = UserInfo::new("us:er", None);
        assert_eq!(info.value(), "us%3Aer");

        assert!(UserInfo::from_encoded("user@host").is_err());
    }

    #[test]
    fn path_segments() {
        let path = Path::from_encoded("/a/b/c").unwrap();
        assert!(path.is_absolute());
        assert_eq!(path.segments(), ["a", "b", "c"]);

        let path = Path::from_encoded("a/%E4%B8%AD").unwrap();
        assert!(!path.is_absolute());
        assert_eq!(path.decoded(), "a/中");
        assert_eq!(path.segments(), ["a", "中"]);

        assert_eq!(Path::from_encoded("/").unwrap().segments(), [""]);
        assert!(Path::default().segments().is_empty());

        assert!(Path::from_encoded("/a?b").is_err());
        assert!(Path::from_encoded("/%ZZ").is_err());
    }

    #[test]
    fn query_and_fragment() {
        let query = Query::from_encoded("a=1&b=%E6%B5%8B").unwrap();
        assert_eq!(query.as_str(), "a=1&b=测");
        assert_eq!(query.value(), "a=1&b=%E6%B5%8B");

        let fragment = Fragment::new("sec tion");
        assert_eq!(fragment.value(), "sec%20tion");

        assert!(Query::from_encoded("a=#").is_err());
        assert!(Fragment::from_encoded("%8").is_err());
    }
}
