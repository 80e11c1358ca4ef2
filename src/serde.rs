//! Serialization and deserialization implementations using `serde`.
//!
//! Every component serializes as its canonical string form and
//! deserializes through its validating constructor, so an invalid
//! value can never be smuggled in through deserialization. [`Port`]
//! serializes as a number.

use core::fmt::{Formatter, Result as FmtResult};

use serde::{
    de::{Error as SerdeError, Unexpected, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::component::{Fragment, Path, Port, Query, Scheme, UserInfo};
use crate::host::Host;

macro_rules! string_form {
    ($name:ident, $visitor:ident, $expecting:literal, |$v:ident| $parse:expr) => {
        struct $visitor;

        impl<'de> Visitor<'de> for $visitor {
            type Value = $name;

            fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
                f.write_str($expecting)
            }

            fn visit_str<E>(self, $v: &str) -> Result<Self::Value, E>
            where
                E: SerdeError,
            {
                $parse.map_err(|_| SerdeError::invalid_value(Unexpected::Str($v), &self))
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_str($visitor)
            }
        }
    };
}

string_form!(Host, HostVisitor, "a valid host string", |v| Host::parse(v));
string_form!(Scheme, SchemeVisitor, "a valid URI scheme", |v| {
    Scheme::parse(v)
});
string_form!(
    UserInfo,
    UserInfoVisitor,
    "a percent-encoded userinfo string",
    |v| UserInfo::from_encoded(v)
);
string_form!(Path, PathVisitor, "a percent-encoded URI path", |v| {
    Path::from_encoded(v)
});
string_form!(Query, QueryVisitor, "a percent-encoded URI query", |v| {
    Query::from_encoded(v)
});
string_form!(
    Fragment,
    FragmentVisitor,
    "a percent-encoded URI fragment",
    |v| Fragment::from_encoded(v)
);

struct PortVisitor;

impl<'de> Visitor<'de> for PortVisitor {
    type Value = Port;

    fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("a port number in 0..=65535")
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: SerdeError,
    {
        u16::try_from(v)
            .map(Port::new)
            .map_err(|_| SerdeError::invalid_value(Unexpected::Unsigned(v), &self))
    }
}

impl Serialize for Port {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(self.to_u16())
    }
}

impl<'de> Deserialize<'de> for Port {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_u16(PortVisitor)
    }
}
