use uri_parts::error::SyntaxError;
use uri_parts::{Fragment, Path, Port, Query, Scheme, UserInfo};

#[test]
fn scheme_is_lowercased() {
    for (input, expected) in [
        ("http", "http"),
        ("HTTP", "http"),
        ("CoAP+WS", "coap+ws"),
        ("a1+-.", "a1+-."),
    ] {
        assert_eq!(Scheme::parse(input).unwrap().as_str(), expected, "{input}");
    }

    assert!(Scheme::parse("").is_err());
    assert!(Scheme::parse("3dp").is_err());
    assert!(Scheme::parse("http:").is_err());
    assert!(Scheme::parse("ht%74p").is_err());
}

#[test]
fn port_bounds() {
    assert_eq!(Port::parse("0").unwrap().to_u16(), 0);
    assert_eq!(Port::parse("65535").unwrap().to_u16(), 65535);
    assert_eq!(Port::from(443u16), Port::new(443));
    assert_eq!(Port::new(8080).to_string(), "8080");

    for input in ["", "65536", "99999999999999999999", "8a", " 80", "+80"] {
        assert!(
            matches!(Port::parse(input), Err(SyntaxError::InvalidPort { .. })),
            "{input}"
        );
    }
}

#[test]
fn userinfo_round_trip() {
    let info = UserInfo::from_encoded("alice:s%26cret").unwrap();
    assert_eq!(info.user(), "alice");
    assert_eq!(info.password(), Some("s&cret"));
    assert_eq!(info.value(), "alice:s&cret");

    // an empty password is still a password
    let info = UserInfo::from_encoded("alice:").unwrap();
    assert_eq!(info.password(), Some(""));
    assert_eq!(info.value(), "alice:");

    // building from decoded parts encodes on the way out
    let info = UserInfo::new("a:b", Some("p@ss"));
    assert_eq!(info.value(), "a%3Ab:p%40ss");
    let back = UserInfo::from_encoded(&info.value()).unwrap();
    assert_eq!(back, info);

    assert!(UserInfo::from_encoded("a/b").is_err());
    assert!(UserInfo::from_encoded("a%GGb").is_err());
}

#[test]
fn path_properties() {
    let path = Path::from_encoded("/over/there").unwrap();
    assert!(path.is_absolute());
    assert!(!path.is_empty());
    assert_eq!(path.as_str(), "/over/there");
    assert_eq!(path.segments(), ["over", "there"]);

    let path = Path::from_encoded("rel/a%20b").unwrap();
    assert!(!path.is_absolute());
    assert_eq!(path.decoded(), "rel/a b");

    let empty = Path::default();
    assert!(empty.is_empty());
    assert!(empty.segments().is_empty());

    // unchanged values reuse the instance
    let same = path.with_value("rel/a%20b").unwrap();
    assert_eq!(same, path);

    assert!(Path::from_encoded("/a#b").is_err());
    assert!(Path::from_encoded("/%E0%A4%A").is_err());
}

#[test]
fn query_and_fragment_encoding() {
    let query = Query::from_encoded("key=%E6%B5%8B&x=1").unwrap();
    assert_eq!(query.as_str(), "key=测&x=1");
    assert_eq!(query.value(), "key=%E6%B5%8B&x=1");

    let query = Query::new("a b");
    assert_eq!(query.value(), "a%20b");
    assert_eq!(Query::from_encoded(&query.value()).unwrap(), query);

    let fragment = Fragment::from_encoded("s2.1").unwrap();
    assert_eq!(fragment.as_str(), "s2.1");

    assert!(Query::from_encoded("a=#b").is_err());
    assert!(Fragment::from_encoded("%").is_err());
}

#[test]
fn validation_errors_carry_the_input() {
    let err = Scheme::parse("1ab").unwrap_err();
    assert_eq!(err.to_string(), r#"invalid scheme: "1ab""#);

    let err = Port::parse("70000").unwrap_err();
    assert!(err.to_string().contains("70000"));

    let err = Query::from_encoded("%zz").unwrap_err();
    assert!(err.to_string().contains("%zz"));
}
