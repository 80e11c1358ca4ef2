use core::fmt;
use core::str::FromStr;

use crate::component::{Fragment, Path, Port, Query, Scheme, UserInfo};
use crate::error::{MalformedHostError, SyntaxError};
use crate::host::Host;

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_into(f)
    }
}

impl FromStr for Host {
    type Err = MalformedHostError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Host::parse(s)
    }
}

impl fmt::Display for Scheme {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl FromStr for Scheme {
    type Err = SyntaxError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scheme::parse(s)
    }
}

impl fmt::Display for Port {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_u16(), f)
    }
}

impl FromStr for Port {
    type Err = SyntaxError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Port::parse(s)
    }
}

impl fmt::Display for UserInfo {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value(), f)
    }
}

impl FromStr for UserInfo {
    type Err = SyntaxError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserInfo::from_encoded(s)
    }
}

impl fmt::Display for Path {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl FromStr for Path {
    type Err = SyntaxError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::from_encoded(s)
    }
}

impl fmt::Display for Query {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value(), f)
    }
}

impl FromStr for Query {
    type Err = SyntaxError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Query::from_encoded(s)
    }
}

impl fmt::Display for Fragment {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value(), f)
    }
}

impl FromStr for Fragment {
    type Err = SyntaxError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fragment::from_encoded(s)
    }
}
