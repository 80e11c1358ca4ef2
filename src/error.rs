//! Error types.

use core::fmt;
use thiserror::Error;

/// An error occurred when validating a component's grammar.
///
/// A value object is either fully valid or not constructed at all:
/// none of these errors leaves a partially built component behind.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// A component does not match its RFC 3986 grammar.
    #[error("invalid {component}: {input:?}")]
    InvalidComponent {
        /// The name of the component being constructed.
        component: &'static str,
        /// The rejected input.
        input: String,
    },
    /// A percent-encoded octet is either non-hexadecimal or incomplete.
    #[error("invalid percent-encoded octet at index {index} in {input:?}")]
    InvalidOctet {
        /// The rejected input.
        input: String,
        /// The index of the percent character introducing the octet.
        index: usize,
    },
    /// Decoded bytes are not valid UTF-8.
    #[error("{input:?} does not decode to valid UTF-8")]
    InvalidUtf8 {
        /// The rejected input.
        input: String,
    },
    /// A port is not a decimal integer within `0..=65535`.
    #[error("invalid port: {input:?} is not an integer in 0..=65535")]
    InvalidPort {
        /// The rejected input.
        input: String,
    },
}

/// An error occurred when classifying a host string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MalformedHostError {
    /// A bracketed literal is neither a valid IPv6 address
    /// nor a valid IPvFuture address.
    #[error("{0:?} is not a valid IP literal")]
    InvalidIpLiteral(String),
    /// A zone identifier is empty, non-ASCII, not properly
    /// percent-encoded, or contains a generic delimiter.
    #[error("the zone identifier of {0:?} is malformed")]
    InvalidZoneIdentifier(String),
    /// A zone identifier is attached to an address outside `fe80::/10`.
    #[error("{0:?} carries a zone identifier but is not a link-local IPv6 address")]
    NonLinkLocalZone(String),
    /// A registered name contains a character forbidden in any host.
    #[error("{0:?} contains a forbidden host character")]
    ForbiddenCharacter(String),
    /// IDNA conversion of an internationalized domain name failed.
    ///
    /// The message enumerates every matched reason.
    #[error("{host:?} is not a valid internationalized domain name: {reasons}")]
    Idna {
        /// The rejected host string.
        host: String,
        /// Every matched conversion failure reason.
        reasons: IdnaReasons,
    },
    /// The IDNA ASCII form still contains a literal percent sign,
    /// which would make re-parsing ambiguous.
    #[error("{0:?} still contains a percent sign after IDNA conversion")]
    ResidualPercent(String),
}

/// No usable big-integer arithmetic backend is available.
///
/// Raised only when constructing a normalizer, never mid-computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("no usable arithmetic backend on this platform")]
pub struct MissingBackendError(pub(crate) ());

/// A set of IDNA conversion failure reasons.
///
/// Reasons are accumulated during conversion and rendered in a fixed,
/// stable order regardless of the order in which they were detected.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct IdnaReasons(u16);

impl IdnaReasons {
    /// A non-final domain label (or the whole domain name) is empty.
    pub const EMPTY_LABEL: Self = Self(1 << 0);
    /// A domain label is longer than 63 bytes in its ASCII form.
    pub const LABEL_TOO_LONG: Self = Self(1 << 1);
    /// The domain name is longer than 255 bytes in its storage form.
    pub const DOMAIN_TOO_LONG: Self = Self(1 << 2);
    /// A label starts with a hyphen-minus character.
    pub const LEADING_HYPHEN: Self = Self(1 << 3);
    /// A label ends with a hyphen-minus character.
    pub const TRAILING_HYPHEN: Self = Self(1 << 4);
    /// A label contains hyphen-minus characters in both the third
    /// and fourth positions.
    pub const HYPHEN_3_4: Self = Self(1 << 5);
    /// A label starts with a combining mark.
    pub const LEADING_COMBINING_MARK: Self = Self(1 << 6);
    /// A label or domain name contains disallowed characters.
    pub const DISALLOWED_CHARACTER: Self = Self(1 << 7);
    /// A label starts with `xn--` but does not contain valid Punycode.
    pub const INVALID_PUNYCODE: Self = Self(1 << 8);
    /// A label contains a dot.
    pub const LABEL_HAS_DOT: Self = Self(1 << 9);
    /// A label has an invalid form for an ACE label.
    pub const INVALID_ACE_LABEL: Self = Self(1 << 10);
    /// A label does not meet the IDNA BiDi requirements.
    pub const BIDI: Self = Self(1 << 11);
    /// A label does not meet the IDNA CONTEXTJ requirements.
    pub const CONTEXTJ: Self = Self(1 << 12);

    /// Returns `true` if no reason is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every reason in `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub(crate) fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl core::ops::BitOr for IdnaReasons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for IdnaReasons {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

// The rendering order is fixed: it must not depend on detection order.
static REASON_MESSAGES: &[(IdnaReasons, &str)] = &[
    (
        IdnaReasons::EMPTY_LABEL,
        "a non-final domain name label (or the whole domain name) is empty",
    ),
    (
        IdnaReasons::LABEL_TOO_LONG,
        "a domain name label is longer than 63 bytes",
    ),
    (
        IdnaReasons::DOMAIN_TOO_LONG,
        "the domain name is longer than 255 bytes in its storage form",
    ),
    (
        IdnaReasons::LEADING_HYPHEN,
        "a label starts with a hyphen-minus character",
    ),
    (
        IdnaReasons::TRAILING_HYPHEN,
        "a label ends with a hyphen-minus character",
    ),
    (
        IdnaReasons::HYPHEN_3_4,
        "a label contains hyphen-minus characters in the third and fourth positions",
    ),
    (
        IdnaReasons::LEADING_COMBINING_MARK,
        "a label starts with a combining mark",
    ),
    (
        IdnaReasons::DISALLOWED_CHARACTER,
        "a label or domain name contains disallowed characters",
    ),
    (
        IdnaReasons::INVALID_PUNYCODE,
        "a label starts with \"xn--\" but does not contain valid Punycode",
    ),
    (IdnaReasons::LABEL_HAS_DOT, "a label contains a dot"),
    (
        IdnaReasons::INVALID_ACE_LABEL,
        "a label has an invalid form for an ACE label",
    ),
    (
        IdnaReasons::BIDI,
        "a label does not meet the IDNA BiDi requirements",
    ),
    (
        IdnaReasons::CONTEXTJ,
        "a label does not meet the IDNA CONTEXTJ requirements",
    ),
];

impl fmt::Display for IdnaReasons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for &(reason, msg) in REASON_MESSAGES {
            if self.contains(reason) {
                if !first {
                    f.write_str(", ")?;
                }
                f.write_str(msg)?;
                first = false;
            }
        }
        if first {
            f.write_str("conversion failed")?;
        }
        Ok(())
    }
}

impl fmt::Debug for IdnaReasons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdnaReasons({:#b})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_render_in_fixed_order() {
        let reasons = IdnaReasons::DISALLOWED_CHARACTER | IdnaReasons::EMPTY_LABEL;
        assert_eq!(
            reasons.to_string(),
            "a non-final domain name label (or the whole domain name) is empty, \
             a label or domain name contains disallowed characters"
        );

        assert!(reasons.contains(IdnaReasons::EMPTY_LABEL));
        assert!(!reasons.contains(IdnaReasons::BIDI));
        assert!(IdnaReasons::default().is_empty());
    }
}
