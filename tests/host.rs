use uri_parts::error::{IdnaReasons, MalformedHostError};
use uri_parts::{Host, HostKind};

#[test]
fn classify_kinds() {
    assert_eq!(Host::parse("").unwrap().kind(), HostKind::None);
    assert_eq!(Host::parse("example.com").unwrap().kind(), HostKind::RegName);
    assert_eq!(Host::parse("127.0.0.1").unwrap().kind(), HostKind::Ipv4);
    assert_eq!(Host::parse("[::1]").unwrap().kind(), HostKind::Ipv6);
    assert_eq!(Host::parse("[v1.ZZ.ZZ]").unwrap().kind(), HostKind::IpvFuture);
}

#[test]
fn empty_host() {
    let host = Host::parse("").unwrap();
    assert!(host.is_empty());
    assert_eq!(host.value(), None);
    assert_eq!(host.to_string(), "");
    assert_eq!(host, Host::default());
}

#[test]
fn registered_names() {
    let host = Host::parse("WWW.ExAmPlE.com").unwrap();
    assert!(host.is_registered_name());
    assert!(!host.is_ip());
    assert_eq!(host.value().as_deref(), Some("www.example.com"));
    assert_eq!(host.ip(), None);
    assert_eq!(host.ip_version(), None);

    // sub-delims are fine in a reg-name
    assert!(Host::parse("a!$&'()*+,;=b").is_ok());
    // percent-encoded octets decode before matching
    assert_eq!(
        Host::parse("%65%78ample.com").unwrap().value().as_deref(),
        Some("example.com")
    );

    assert!(matches!(
        Host::parse("exa mple.com"),
        Err(MalformedHostError::ForbiddenCharacter(_))
    ));
    assert!(Host::parse("a/b").is_err());
    assert!(Host::parse("a?b").is_err());
    assert!(Host::parse("a#b").is_err());
    assert!(Host::parse("a@b").is_err());
}

#[test]
fn idn_conversion() {
    let host = Host::parse("bücher.example").unwrap();
    assert_eq!(host.value().as_deref(), Some("xn--bcher-kva.example"));

    let host = Host::parse("日本語.example").unwrap();
    assert_eq!(host.value().as_deref(), Some("xn--wgv71a119e.example"));

    // the decoded form may be non-ASCII too
    let host = Host::parse("b%C3%BCcher.example").unwrap();
    assert_eq!(host.value().as_deref(), Some("xn--bcher-kva.example"));

    match Host::parse("-ü-.example") {
        Err(MalformedHostError::Idna { reasons, .. }) => {
            assert!(reasons.contains(IdnaReasons::LEADING_HYPHEN));
            assert!(reasons.contains(IdnaReasons::TRAILING_HYPHEN));
        }
        other => panic!("expected an IDNA error, got {other:?}"),
    }
}

#[test]
fn strict_ipv4() {
    let host = Host::parse("192.168.0.1").unwrap();
    assert!(host.is_ipv4());
    assert!(host.is_ip());
    assert_eq!(host.ip().as_deref(), Some("192.168.0.1"));
    assert_eq!(host.ip_version(), Some("4"));
    assert_eq!(host.value().as_deref(), Some("192.168.0.1"));

    // these are not dotted-quads, they fall through to reg-name
    assert_eq!(Host::parse("0x7f.0.0.1").unwrap().kind(), HostKind::RegName);
    assert_eq!(Host::parse("192.168.0.01").unwrap().kind(), HostKind::RegName);
    assert_eq!(Host::parse("192.168.1").unwrap().kind(), HostKind::RegName);
    assert_eq!(Host::parse("256.0.0.1").unwrap().kind(), HostKind::RegName);
}

#[test]
fn ipv6_literals() {
    let host = Host::parse("[2001:db8::7]").unwrap();
    assert!(host.is_ipv6());
    assert_eq!(host.ip().as_deref(), Some("2001:db8::7"));
    assert_eq!(host.ip_version(), Some("6"));
    assert_eq!(host.value().as_deref(), Some("[2001:db8::7]"));
    assert!(!host.has_zone_identifier());

    // IPv4-mapped tail
    assert!(Host::parse("[::ffff:192.0.2.33]").unwrap().is_ipv6());

    assert!(matches!(
        Host::parse("[::fffff]"),
        Err(MalformedHostError::InvalidIpLiteral(_))
    ));
    assert!(Host::parse("[1:2:3]").is_err());
    // unbracketed IPv6 text is not a valid host
    assert!(Host::parse("2001:db8::7").is_err());
}

#[test]
fn zone_identifiers() {
    let host = Host::parse("[fe80::1%251]").unwrap();
    assert!(host.has_zone_identifier());
    assert_eq!(host.value().as_deref(), Some("[fe80::1%251]"));
    assert_eq!(host.ip().as_deref(), Some("fe80::1%251"));

    let bare = host.without_zone_identifier();
    assert!(!bare.has_zone_identifier());
    assert_eq!(bare.to_string(), "[fe80::1]");

    // stripping a zone that is not there changes nothing
    assert_eq!(bare.without_zone_identifier(), bare);

    // a zone on a non-link-local address
    assert!(matches!(
        Host::parse("[2001:db8::7%25en1]"),
        Err(MalformedHostError::NonLinkLocalZone(_))
    ));
    // a zone containing a gen-delim once decoded
    assert!(matches!(
        Host::parse("[fe80::1%25a%2Fb]"),
        Err(MalformedHostError::InvalidZoneIdentifier(_))
    ));
    // an empty zone
    assert!(Host::parse("[fe80::1%]").is_err());
}

#[test]
fn ipv_future() {
    let host = Host::parse("[v1.ZZ.ZZ]").unwrap();
    assert!(host.is_ip_future());
    assert!(host.is_ip());
    assert!(!host.is_ipv4());
    assert!(!host.is_ipv6());
    assert_eq!(host.ip_version(), Some("1"));
    assert_eq!(host.ip().as_deref(), Some("ZZ.ZZ"));
    assert_eq!(host.value().as_deref(), Some("[v1.ZZ.ZZ]"));

    assert!(Host::parse("[vF.addr:port]").unwrap().is_ip_future());

    // versions 4 and 6 are reserved for the literal forms
    assert!(Host::parse("[v4.1.2.3.4]").is_err());
    assert!(Host::parse("[v6.::1]").is_err());
    // missing version or address
    assert!(Host::parse("[v.abc]").is_err());
    assert!(Host::parse("[v1.]").is_err());
    assert!(Host::parse("[vg.abc]").is_err());
}

#[test]
fn classification_is_idempotent() {
    for input in [
        "",
        "example.com",
        "WWW.Example.COM",
        "bücher.example",
        "127.0.0.1",
        "[::1]",
        "[2001:db8::7]",
        "[fe80::1%25eth0]",
        "[v1.ZZ.ZZ]",
    ] {
        let host = Host::parse(input).unwrap();
        let again = Host::parse(&host.to_string()).unwrap();
        assert_eq!(host, again, "{input}");
    }
}

#[test]
fn from_authority() {
    let host = Host::from_authority("user:pass@example.com:8080").unwrap();
    assert_eq!(host.value().as_deref(), Some("example.com"));

    let host = Host::from_authority("[fe80::1%251]:443").unwrap();
    assert!(host.has_zone_identifier());

    assert_eq!(
        Host::from_authority("example.com:").unwrap().value().as_deref(),
        Some("example.com")
    );
    assert_eq!(Host::from_authority("u@").unwrap().kind(), HostKind::None);

    assert!(Host::from_authority("[::1]x").is_err());
    assert!(Host::from_authority("[::1").is_err());
}

#[test]
fn error_messages_name_the_input() {
    let err = Host::parse("exa mple").unwrap_err();
    assert!(err.to_string().contains("exa mple"));

    let err = Host::parse("[not-an-ip]").unwrap_err();
    assert!(err.to_string().contains("[not-an-ip]"));

    let err = Host::parse("-ü.example").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("starts with a hyphen-minus"), "{msg}");
}
