//! The host subcomponent and its classifier.

use std::borrow::Cow;
use std::net::{Ipv4Addr, Ipv6Addr};

use idna::uts46::{AsciiDenyList, DnsLength, Hyphens, Uts46};

use crate::encoding::{self, table};
use crate::error::{IdnaReasons, MalformedHostError};

/// A parsed [host] subcomponent of an authority.
///
/// A `Host` is produced by one total classification pass over the raw
/// string and is immutable afterwards; every "modification" returns a
/// new instance.
///
/// [host]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.2
///
/// # Examples
///
/// ```
/// use uri_parts::{Host, HostKind};
///
/// let host = Host::parse("www.Example.com")?;
/// assert_eq!(host.kind(), HostKind::RegName);
/// assert_eq!(host.value().as_deref(), Some("www.example.com"));
///
/// let host = Host::parse("[2001:db8::7]")?;
/// assert_eq!(host.kind(), HostKind::Ipv6);
/// assert_eq!(host.ip().as_deref(), Some("2001:db8::7"));
/// # Ok::<_, uri_parts::error::MalformedHostError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Host {
    repr: HostRepr,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum HostRepr {
    None,
    /// Fully percent-decoded, IDNA-converted, lowercase ASCII.
    RegName(String),
    Ipv4(Ipv4Addr),
    /// The text between the brackets, zone identifier included.
    Ipv6(String),
    /// The version token and the address, without the brackets
    /// and the leading "v".
    IpvFuture { version: String, addr: String },
}

/// The discriminant of a parsed [`Host`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostKind {
    /// The empty host of an empty authority.
    None,
    /// A registered name.
    RegName,
    /// An IPv4 address.
    Ipv4,
    /// An IPv6 address.
    Ipv6,
    /// An IP address of future version.
    IpvFuture,
}

impl Host {
    /// Classifies a raw host string.
    ///
    /// The input must not carry a userinfo or port subcomponent; see
    /// [`from_authority`](Self::from_authority) for full authority strings.
    ///
    /// # Errors
    ///
    /// Returns a [`MalformedHostError`] naming the offending input when
    /// the string is neither a valid IP literal nor a valid (possibly
    /// internationalized) registered name.
    pub fn parse(host: &str) -> Result<Host, MalformedHostError> {
        classify(host).map(|repr| Host { repr })
    }

    /// Extracts and classifies the host of an authority string.
    ///
    /// The userinfo subcomponent (up to the last `@`) and a trailing
    /// `:port` (digits only, possibly empty) are stripped first.
    ///
    /// # Errors
    ///
    /// Returns a [`MalformedHostError`] when the remaining host fails
    /// classification.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_parts::Host;
    ///
    /// let host = Host::from_authority("user@example.com:8080")?;
    /// assert_eq!(host.value().as_deref(), Some("example.com"));
    ///
    /// let host = Host::from_authority("[::1]:80")?;
    /// assert_eq!(host.to_string(), "[::1]");
    /// # Ok::<_, uri_parts::error::MalformedHostError>(())
    /// ```
    pub fn from_authority(authority: &str) -> Result<Host, MalformedHostError> {
        let rest = match authority.rsplit_once('@') {
            Some((_, rest)) => rest,
            None => authority,
        };
        let host = if rest.starts_with('[') {
            match rest.find(']') {
                Some(end) => {
                    let (host, tail) = rest.split_at(end + 1);
                    match tail.strip_prefix(':') {
                        Some(port) if port.bytes().all(|x| x.is_ascii_digit()) => host,
                        None if tail.is_empty() => host,
                        _ => return Err(MalformedHostError::InvalidIpLiteral(rest.to_owned())),
                    }
                }
                None => return Err(MalformedHostError::InvalidIpLiteral(rest.to_owned())),
            }
        } else {
            match rest.rsplit_once(':') {
                Some((host, port)) if port.bytes().all(|x| x.is_ascii_digit()) => host,
                _ => rest,
            }
        };
        Self::parse(host)
    }

    /// Returns the discriminant of this host.
    #[must_use]
    pub fn kind(&self) -> HostKind {
        match self.repr {
            HostRepr::None => HostKind::None,
            HostRepr::RegName(_) => HostKind::RegName,
            HostRepr::Ipv4(_) => HostKind::Ipv4,
            HostRepr::Ipv6(_) => HostKind::Ipv6,
            HostRepr::IpvFuture { .. } => HostKind::IpvFuture,
        }
    }

    /// Returns the canonical serialized form, brackets included.
    ///
    /// Returns `None` for the empty host of an empty authority, which
    /// serializes to the empty string.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        match &self.repr {
            HostRepr::None => None,
            _ => Some(self.to_string()),
        }
    }

    /// Returns `true` if this host is an IP address of any version.
    #[must_use]
    pub fn is_ip(&self) -> bool {
        matches!(
            self.repr,
            HostRepr::Ipv4(_) | HostRepr::Ipv6(_) | HostRepr::IpvFuture { .. }
        )
    }

    /// Returns `true` if this host is an IPv4 address.
    #[must_use]
    pub fn is_ipv4(&self) -> bool {
        matches!(self.repr, HostRepr::Ipv4(_))
    }

    /// Returns `true` if this host is an IPv6 address.
    #[must_use]
    pub fn is_ipv6(&self) -> bool {
        matches!(self.repr, HostRepr::Ipv6(_))
    }

    /// Returns `true` if this host is an IP address of future version.
    #[must_use]
    pub fn is_ip_future(&self) -> bool {
        matches!(self.repr, HostRepr::IpvFuture { .. })
    }

    /// Returns `true` if this host is a registered name.
    #[must_use]
    pub fn is_registered_name(&self) -> bool {
        matches!(self.repr, HostRepr::RegName(_))
    }

    /// Returns `true` if this host is the empty host.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.repr, HostRepr::None)
    }

    /// Returns the registered name, if this host is one.
    #[must_use]
    pub fn registered_name(&self) -> Option<&str> {
        match &self.repr {
            HostRepr::RegName(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the IP address text without brackets.
    ///
    /// For an IPvFuture address the version prefix is stripped; for an
    /// IPv6 address a zone identifier is kept.
    #[must_use]
    pub fn ip(&self) -> Option<String> {
        match &self.repr {
            HostRepr::Ipv4(addr) => Some(addr.to_string()),
            HostRepr::Ipv6(text) => Some(text.clone()),
            HostRepr::IpvFuture { addr, .. } => Some(addr.clone()),
            _ => None,
        }
    }

    /// Returns the IP version tag: `"4"`, `"6"`, or the IPvFuture
    /// version token.
    #[must_use]
    pub fn ip_version(&self) -> Option<&str> {
        match &self.repr {
            HostRepr::Ipv4(_) => Some("4"),
            HostRepr::Ipv6(_) => Some("6"),
            HostRepr::IpvFuture { version, .. } => Some(version),
            _ => None,
        }
    }

    /// Returns `true` if this host is an IPv6 address carrying an
    /// RFC 6874 zone identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_parts::Host;
    ///
    /// assert!(Host::parse("[fe80::1%251]")?.has_zone_identifier());
    /// assert!(!Host::parse("[fe80::1]")?.has_zone_identifier());
    /// # Ok::<_, uri_parts::error::MalformedHostError>(())
    /// ```
    #[must_use]
    pub fn has_zone_identifier(&self) -> bool {
        match &self.repr {
            HostRepr::Ipv6(text) => text.contains('%'),
            _ => false,
        }
    }

    /// Returns a host equal to this one but with any zone identifier
    /// removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_parts::Host;
    ///
    /// let host = Host::parse("[fe80::1%251]")?;
    /// assert_eq!(host.without_zone_identifier().to_string(), "[fe80::1]");
    /// # Ok::<_, uri_parts::error::MalformedHostError>(())
    /// ```
    #[must_use]
    pub fn without_zone_identifier(&self) -> Host {
        match &self.repr {
            HostRepr::Ipv6(text) => match text.split_once('%') {
                Some((addr, _)) => Host {
                    repr: HostRepr::Ipv6(addr.to_owned()),
                },
                None => self.clone(),
            },
            _ => self.clone(),
        }
    }

    pub(crate) fn fmt_into(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.repr {
            HostRepr::None => Ok(()),
            HostRepr::RegName(name) => f.write_str(name),
            HostRepr::Ipv4(addr) => write!(f, "{addr}"),
            HostRepr::Ipv6(text) => write!(f, "[{text}]"),
            HostRepr::IpvFuture { version, addr } => write!(f, "[v{version}.{addr}]"),
        }
    }
}

impl Default for Host {
    /// Creates the empty host.
    fn default() -> Self {
        Host {
            repr: HostRepr::None,
        }
    }
}

impl From<Ipv4Addr> for Host {
    fn from(addr: Ipv4Addr) -> Self {
        Host {
            repr: HostRepr::Ipv4(addr),
        }
    }
}

fn classify(host: &str) -> Result<HostRepr, MalformedHostError> {
    if host.is_empty() {
        return Ok(HostRepr::None);
    }
    if let Some(addr) = parse_dotted_quad(host.as_bytes()) {
        return Ok(HostRepr::Ipv4(addr));
    }
    if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        return classify_ip_literal(inner, host);
    }
    classify_reg_name(host)
}

fn classify_ip_literal(inner: &str, original: &str) -> Result<HostRepr, MalformedHostError> {
    if let Some((addr, zone)) = inner.split_once('%') {
        let addr = parse_ipv6(addr.as_bytes())
            .ok_or_else(|| MalformedHostError::InvalidIpLiteral(original.to_owned()))?;

        // The zone text starts right after the address, so the
        // percent sign that introduced it is part of the encoding.
        let decoded = encoding::decode(&format!("%{zone}"))
            .map_err(|_| MalformedHostError::InvalidZoneIdentifier(original.to_owned()))?;
        if decoded
            .iter()
            .any(|&x| !x.is_ascii() || table::GEN_DELIMS.allows(x))
        {
            return Err(MalformedHostError::InvalidZoneIdentifier(
                original.to_owned(),
            ));
        }

        // RFC 6874: only link-local addresses carry a zone.
        // The first 10 bits must equal 1111111010.
        if addr.segments()[0] & 0xffc0 != 0xfe80 {
            return Err(MalformedHostError::NonLinkLocalZone(original.to_owned()));
        }

        return Ok(HostRepr::Ipv6(inner.to_owned()));
    }

    if parse_ipv6(inner.as_bytes()).is_some() {
        return Ok(HostRepr::Ipv6(inner.to_owned()));
    }
    classify_ipv_future(inner, original)
}

fn classify_ipv_future(inner: &str, original: &str) -> Result<HostRepr, MalformedHostError> {
    let err = || MalformedHostError::InvalidIpLiteral(original.to_owned());

    let rest = match inner
        .strip_prefix('v')
        .or_else(|| inner.strip_prefix('V'))
    {
        Some(rest) => rest,
        None => return Err(err()),
    };
    let (version, addr) = rest.split_once('.').ok_or_else(err)?;

    if version.is_empty() || !table::HEXDIG.validate(version.as_bytes()) {
        return Err(err());
    }
    if addr.is_empty() || !table::IPV_FUTURE.validate(addr.as_bytes()) {
        return Err(err());
    }
    // Versions 4 and 6 have dedicated literal forms.
    if version == "4" || version == "6" {
        return Err(err());
    }

    Ok(HostRepr::IpvFuture {
        version: version.to_owned(),
        addr: addr.to_owned(),
    })
}

fn classify_reg_name(host: &str) -> Result<HostRepr, MalformedHostError> {
    let decoded = encoding::decode(host)
        .map_err(|_| MalformedHostError::ForbiddenCharacter(host.to_owned()))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| MalformedHostError::ForbiddenCharacter(host.to_owned()))?;

    // The ASCII fast path: the decoded form matches the reg-name
    // grammar directly, no IDN processing needed.
    if decoded.is_ascii() && table::REG_NAME.validate(decoded.as_bytes()) {
        return Ok(HostRepr::RegName(decoded.to_ascii_lowercase()));
    }

    if decoded
        .bytes()
        .any(|x| x == b' ' || table::GEN_DELIMS.allows(x))
    {
        return Err(MalformedHostError::ForbiddenCharacter(host.to_owned()));
    }

    let ascii = idna_to_ascii(&decoded).map_err(|_| MalformedHostError::Idna {
        host: host.to_owned(),
        reasons: idna_reasons(&decoded),
    })?;

    // A surviving percent sign would decode differently on re-parse.
    if ascii.contains('%') {
        return Err(MalformedHostError::ResidualPercent(host.to_owned()));
    }
    Ok(HostRepr::RegName(ascii))
}

/// Strict UTS #46 ToASCII: STD3 character rules, hyphen placement
/// checks, and DNS length limits all enforced.
fn idna_to_ascii(domain: &str) -> Result<String, idna::Errors> {
    Uts46::new()
        .to_ascii(
            domain.as_bytes(),
            AsciiDenyList::STD3,
            Hyphens::Check,
            DnsLength::Verify,
        )
        .map(Cow::into_owned)
}

/// Converts a single label leniently, for measuring its ASCII length
/// even when the label would fail the strict checks.
fn measure_label(label: &str) -> Option<usize> {
    Uts46::new()
        .to_ascii(
            label.as_bytes(),
            AsciiDenyList::EMPTY,
            Hyphens::Allow,
            DnsLength::Ignore,
        )
        .map(|ascii| ascii.len())
        .ok()
}

/// Derives the set of reasons a failed IDNA conversion matched.
///
/// The conversion itself reports a bare failure, so each reason is
/// re-checked structurally here; when none matches, the failure is
/// attributed to a disallowed character.
fn idna_reasons(domain: &str) -> IdnaReasons {
    let mut reasons = IdnaReasons::default();

    let labels: Vec<&str> = domain.split('.').collect();
    let mut storage_len = 0usize;

    for (i, label) in labels.iter().enumerate() {
        if label.is_empty() {
            // A single trailing empty label is the root label.
            if i + 1 != labels.len() {
                reasons.insert(IdnaReasons::EMPTY_LABEL);
            }
            continue;
        }
        if label.starts_with('-') {
            reasons.insert(IdnaReasons::LEADING_HYPHEN);
        }
        if label.ends_with('-') {
            reasons.insert(IdnaReasons::TRAILING_HYPHEN);
        }

        let bytes = label.as_bytes();
        let is_ace = bytes.len() >= 4 && bytes[..4].eq_ignore_ascii_case(b"xn--");
        if !is_ace && bytes.len() >= 4 && bytes[2] == b'-' && bytes[3] == b'-' {
            reasons.insert(IdnaReasons::HYPHEN_3_4);
        }

        // Measure the label in its ASCII form where obtainable.
        let ascii_len = if label.is_ascii() {
            bytes.len()
        } else {
            measure_label(label).unwrap_or(bytes.len())
        };
        if ascii_len > 63 {
            reasons.insert(IdnaReasons::LABEL_TOO_LONG);
        }
        storage_len += ascii_len + 1;

        if is_ace && measure_label(label).is_none() {
            reasons.insert(IdnaReasons::INVALID_PUNYCODE);
            reasons.insert(IdnaReasons::INVALID_ACE_LABEL);
        }
    }

    if storage_len > 255 {
        reasons.insert(IdnaReasons::DOMAIN_TOO_LONG);
    }
    if reasons.is_empty() {
        reasons.insert(IdnaReasons::DISALLOWED_CHARACTER);
    }
    reasons
}

/// Parses a strict dotted-decimal IPv4 address: four base-10 octets,
/// no leading zeros.
pub(crate) fn parse_dotted_quad(bytes: &[u8]) -> Option<Ipv4Addr> {
    let mut reader = Reader::new(bytes);
    let addr = reader.read_v4()?;
    (!reader.has_remaining()).then(|| Ipv4Addr::from(addr))
}

/// Parses an IPv6 address, IPv4-mapped tails included.
pub(crate) fn parse_ipv6(bytes: &[u8]) -> Option<Ipv6Addr> {
    let mut reader = Reader::new(bytes);
    let segs = reader.read_v6()?;
    (!reader.has_remaining()).then(|| Ipv6Addr::from(segs))
}

enum Seg {
    // *1":" 1*4HEXDIG
    Normal(u16, bool),
    // "::"
    Ellipsis,
    // *1":" 1*4HEXDIG "."
    MaybeV4(bool),
    // ":"
    SingleColon,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn has_remaining(&self) -> bool {
        self.pos < self.len()
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.bytes.get(self.pos + i).copied()
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
        debug_assert!(self.pos <= self.len());
    }

    fn read_str(&mut self, s: &str) -> bool {
        if self.bytes[self.pos..].starts_with(s.as_bytes()) {
            self.skip(s.len());
            true
        } else {
            false
        }
    }

    fn read_v6(&mut self) -> Option<[u16; 8]> {
        let mut segs = [0; 8];
        let mut ellipsis_i = 8;

        let mut i = 0;
        while i < 8 {
            match self.read_v6_segment() {
                Some(Seg::Normal(seg, colon)) => {
                    if colon == (i == 0 || i == ellipsis_i) {
                        // Leading colon, triple colons, or no colon.
                        return None;
                    }
                    segs[i] = seg;
                    i += 1;
                }
                Some(Seg::Ellipsis) => {
                    if ellipsis_i != 8 {
                        // Multiple ellipses.
                        return None;
                    }
                    ellipsis_i = i;
                }
                Some(Seg::MaybeV4(colon)) => {
                    if i > 6 || colon == (i == ellipsis_i) {
                        // Not enough space, triple colons, or no colon.
                        return None;
                    }
                    let octets = self.read_v4()?.to_be_bytes();
                    segs[i] = u16::from_be_bytes([octets[0], octets[1]]);
                    segs[i + 1] = u16::from_be_bytes([octets[2], octets[3]]);
                    i += 2;
                    break;
                }
                Some(Seg::SingleColon) => return None,
                None => break,
            }
        }

        if ellipsis_i == 8 {
            // No ellipsis.
            if i != 8 {
                // Too short.
                return None;
            }
        } else if i == 8 {
            // Eliding nothing.
            return None;
        } else {
            // Shift the segments after the ellipsis to the right.
            for j in (ellipsis_i..i).rev() {
                segs[8 - (i - j)] = segs[j];
                segs[j] = 0;
            }
        }

        Some(segs)
    }

    fn read_v6_segment(&mut self) -> Option<Seg> {
        let colon = self.read_str(":");
        if !self.has_remaining() {
            return colon.then_some(Seg::SingleColon);
        }

        let first = self.peek(0)?;
        let mut x = match crate::encoding::OCTET_TABLE_LO[first as usize] {
            v if v < 128 => u16::from(v),
            _ => {
                return colon.then(|| {
                    if first == b':' {
                        self.skip(1);
                        Seg::Ellipsis
                    } else {
                        Seg::SingleColon
                    }
                });
            }
        };
        let mut i = 1;

        while i < 4 {
            let Some(b) = self.peek(i) else {
                self.skip(i);
                return Some(Seg::Normal(x, colon));
            };
            match crate::encoding::OCTET_TABLE_LO[b as usize] {
                v if v < 128 => {
                    x = (x << 4) | u16::from(v);
                    i += 1;
                }
                _ if b == b'.' => return Some(Seg::MaybeV4(colon)),
                _ => break,
            }
        }
        self.skip(i);
        Some(Seg::Normal(x, colon))
    }

    fn read_v4(&mut self) -> Option<u32> {
        let mut addr = self.read_v4_octet()? << 24;
        for i in (0..3).rev() {
            if !self.read_str(".") {
                return None;
            }
            addr |= self.read_v4_octet()? << (i * 8);
        }
        Some(addr)
    }

    fn read_v4_octet(&mut self) -> Option<u32> {
        let mut res = self.peek_digit(0)?;
        if res == 0 {
            self.skip(1);
            return Some(0);
        }

        for i in 1..3 {
            let Some(x) = self.peek_digit(i) else {
                self.skip(i);
                return Some(res);
            };
            res = res * 10 + x;
        }
        self.skip(3);

        u8::try_from(res).is_ok().then_some(res)
    }

    fn peek_digit(&self, i: usize) -> Option<u32> {
        self.peek(i).and_then(|x| (x as char).to_digit(10))
    }
}
