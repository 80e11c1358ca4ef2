//! WHATWG-style normalization of dot-decimal IPv4 host notations.

use core::cmp::Ordering;
use std::net::Ipv4Addr;

use crate::calc::{BigIntCalculator, Calculator, NativeCalculator};
use crate::error::MissingBackendError;
use crate::host::Host;

/// A converter from the generalized [WHATWG IPv4 notation] to canonical
/// dotted-decimal form.
///
/// The notation admits one to four dot-separated labels, each written in
/// decimal, octal (leading `0`) or hexadecimal (leading `0x`), with the
/// final label covering every address octet not claimed by an earlier
/// label. A normalizer never fails: a string outside the notation simply
/// does not normalize.
///
/// The arithmetic backend is chosen at construction and fixed for the
/// lifetime of the normalizer.
///
/// [WHATWG IPv4 notation]: https://url.spec.whatwg.org/#concept-ipv4-parser
///
/// # Examples
///
/// ```
/// use uri_parts::Ipv4Normalizer;
///
/// let normalizer = Ipv4Normalizer::from_native();
/// assert_eq!(normalizer.normalize("0x7f.0.0.1").as_deref(), Some("127.0.0.1"));
/// assert_eq!(normalizer.normalize("example.com"), None);
/// ```
#[derive(Clone, Debug)]
pub struct Ipv4Normalizer<C: Calculator = NativeCalculator> {
    calc: C,
}

impl Ipv4Normalizer<NativeCalculator> {
    /// Creates a normalizer backed by native fixed-width arithmetic.
    #[must_use]
    pub fn from_native() -> Self {
        Self::new(NativeCalculator::new())
    }

    /// Creates a normalizer with the backend the environment provides,
    /// probing the native one first.
    ///
    /// # Errors
    ///
    /// Returns [`MissingBackendError`] when no backend passes its probe.
    pub fn from_environment() -> Result<Self, MissingBackendError> {
        NativeCalculator::probe().map(Self::new)
    }
}

impl Ipv4Normalizer<BigIntCalculator> {
    /// Creates a normalizer backed by arbitrary-precision arithmetic.
    #[must_use]
    pub fn from_arbitrary_precision() -> Self {
        Self::new(BigIntCalculator::new())
    }
}

impl Default for Ipv4Normalizer<NativeCalculator> {
    fn default() -> Self {
        Self::from_native()
    }
}

impl<C: Calculator> Ipv4Normalizer<C> {
    /// Creates a normalizer over an explicitly chosen backend.
    pub fn new(calc: C) -> Self {
        Ipv4Normalizer { calc }
    }

    /// Normalizes a host string written in the generalized IPv4
    /// notation to canonical dotted-decimal form.
    ///
    /// Returns `None` when the string is not in the notation, when any
    /// label overflows its bound, or when the reassembled value exceeds
    /// `2^32 - 1`. Canonical dotted-decimal input normalizes to itself.
    #[must_use]
    pub fn normalize(&self, host: &str) -> Option<String> {
        // One trailing dot is tolerated and dropped.
        let host = host.strip_suffix('.').unwrap_or(host);
        if host.is_empty() {
            return None;
        }

        let mut values = Vec::with_capacity(4);
        for label in host.split('.') {
            if values.len() == 4 {
                return None;
            }
            let (digits, radix) = label_digits(label)?;
            let digits = digits.trim_start_matches('0');
            let value = self.calc.base_convert(digits, radix)?;
            if self.calc.compare(&value, self.calc.max_ipv4()) == Ordering::Greater {
                return None;
            }
            values.push(value);
        }

        let n = values.len();
        let last = values.pop()?;

        // The last label spans the remaining octets; its bound keeps
        // the whole address below 2^32 once the others are in place.
        let bound = self.calc.pow(256, 6 - n as u32);
        if self.calc.compare(&last, &bound) == Ordering::Greater {
            return None;
        }

        let octet_bound = self.calc.pow(256, 1);
        for value in &values {
            if self.calc.compare(value, &octet_bound) != Ordering::Less {
                return None;
            }
        }

        let mut total = last;
        for (i, value) in values.iter().enumerate() {
            let scaled = self.calc.multiply(value, &self.calc.pow(256, 3 - i as u32));
            total = self.calc.add(&total, &scaled);
        }

        let mut octets = [0u8; 4];
        for slot in octets.iter_mut().rev() {
            *slot = self.calc.to_u8(&self.calc.rem(&total, &octet_bound));
            total = self.calc.div(&total, &octet_bound);
        }

        Some(format!(
            "{}.{}.{}.{}",
            octets[0], octets[1], octets[2], octets[3]
        ))
    }

    /// Rewrites a registered-name host that is an IPv4 notation in
    /// disguise into a proper IPv4 host.
    ///
    /// Any other host, registered names outside the notation included,
    /// is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_parts::{Host, Ipv4Normalizer};
    ///
    /// let normalizer = Ipv4Normalizer::from_native();
    /// let host = Host::parse("0x7f.0.0.1")?;
    /// assert!(host.is_registered_name());
    ///
    /// let host = normalizer.normalize_host(&host);
    /// assert!(host.is_ipv4());
    /// assert_eq!(host.to_string(), "127.0.0.1");
    /// # Ok::<_, uri_parts::error::MalformedHostError>(())
    /// ```
    #[must_use]
    pub fn normalize_host(&self, host: &Host) -> Host {
        if let Some(name) = host.registered_name() {
            if let Some(decimal) = self.normalize(name) {
                if let Ok(addr) = decimal.parse::<Ipv4Addr>() {
                    return Host::from(addr);
                }
            }
        }
        host.clone()
    }
}

/// Splits a label into its digits and radix: `0x`/`0X` selects
/// hexadecimal, a remaining leading `0` selects octal, anything else
/// must be plain decimal.
fn label_digits(label: &str) -> Option<(&str, u32)> {
    if let Some(rest) = label.strip_prefix("0x").or_else(|| label.strip_prefix("0X")) {
        rest.bytes()
            .all(|x| x.is_ascii_hexdigit())
            .then_some((rest, 16))
    } else if let Some(rest) = label.strip_prefix('0') {
        rest.bytes()
            .all(|x| (b'0'..=b'7').contains(&x))
            .then_some((rest, 8))
    } else if !label.is_empty() && label.bytes().all(|x| x.is_ascii_digit()) {
        Some((label, 10))
    } else {
        None
    }
}
