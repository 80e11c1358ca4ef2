#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Value objects for the components of IETF [RFC 3986] URIs.
//!
//! This crate takes apart the pieces a URI is made of and gives each
//! one a validating, immutable type:
//!
//! - [`Host`] classifies a host string into a registered name, an IPv4
//!   or IPv6 address, or an IPvFuture literal, with IDNA conversion of
//!   internationalized registered names and RFC 6874 zone identifier
//!   support.
//! - [`Ipv4Normalizer`] rewrites hosts written in the generalized
//!   [WHATWG IPv4 notation] (hexadecimal, octal and shorthand forms)
//!   into canonical dotted-decimal form, over a pluggable arithmetic
//!   backend.
//! - [`Scheme`], [`UserInfo`], [`Port`], [`Path`], [`Query`] and
//!   [`Fragment`] validate their respective grammars and handle
//!   percent-encoding.
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
//! [WHATWG IPv4 notation]: https://url.spec.whatwg.org/#concept-ipv4-parser
//!
//! # Examples
//!
//! ```
//! use uri_parts::{Host, HostKind, Ipv4Normalizer};
//!
//! let host = Host::parse("0x7F.0.0.1")?;
//! assert_eq!(host.kind(), HostKind::RegName);
//!
//! let host = Ipv4Normalizer::from_native().normalize_host(&host);
//! assert_eq!(host.kind(), HostKind::Ipv4);
//! assert_eq!(host.to_string(), "127.0.0.1");
//! # Ok::<_, uri_parts::error::MalformedHostError>(())
//! ```
//!
//! # Feature flags
//!
//! - `serde`: Enables `serde` serialization and deserialization for
//!   every component type, through its canonical string form.

pub mod encoding;
pub mod error;

mod calc;
mod component;
mod fmt;
mod host;
mod ipv4;

#[cfg(feature = "serde")]
mod serde;

pub use calc::{BigIntCalculator, Calculator, NativeCalculator};
pub use component::{Fragment, Path, Port, Query, Scheme, UserInfo};
pub use host::{Host, HostKind};
pub use ipv4::Ipv4Normalizer;
