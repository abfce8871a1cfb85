use serde_json::json;
use xid_core::application::{get_auth_message, set_auth_signature};
use xid_core::domain::{Credentials, Protocol};
use xid_core::foundation::util::base64;
use xid_core::foundation::XidError;

#[test]
fn get_auth_message_builds_an_unsigned_credential() {
    let data = json!({"expiry": 1234, "extra": {"foo": "bar", "abc": "def"}});
    let result = get_auth_message("app", &data, "domob").expect("getauthmessage");

    assert_eq!(result.authmessage, "Xid login\ndomob\nat: app\nexpires: 1234\nextra:\nabc=def\nfoo=bar\n");

    let mut parsed = Credentials::new("domob", "app");
    parsed.from_password(&result.password).expect("parse password");
    assert_eq!(parsed.expiry(), Some(1234));
    assert_eq!(parsed.extras().get("foo").map(String::as_str), Some("bar"));
    assert_eq!(parsed.raw_signature(), None);
}

#[test]
fn get_auth_message_with_empty_data() {
    let result = get_auth_message("app", &json!({}), "domob").expect("getauthmessage");
    assert_eq!(result.authmessage, "Xid login\ndomob\nat: app\nexpires: never\nextra:\n");
}

#[test]
fn get_auth_message_applies_the_protocol_tag() {
    let result = get_auth_message("app", &json!({"protocol": "delegation-contract"}), "domob").expect("getauthmessage");
    let mut parsed = Credentials::new("domob", "app");
    parsed.from_password(&result.password).expect("parse password");
    assert_eq!(parsed.protocol(), Protocol::DelegationContract);

    let result = get_auth_message("app", &json!({"protocol": "xid-gsp"}), "domob").expect("getauthmessage");
    parsed.from_password(&result.password).expect("parse password");
    assert_eq!(parsed.claim().protocol, Some(Protocol::XidGsp));
}

#[test]
fn get_auth_message_rejects_unknown_data_fields() {
    let err = get_auth_message("app", &json!({"unknown": 1}), "domob").expect_err("unknown field");
    assert!(matches!(err, XidError::InvalidArgument(_)));
}

#[test]
fn get_auth_message_rejects_wrong_types() {
    for data in [
        json!({"expiry": "soon"}),
        json!({"expiry": -5}),
        json!({"expiry": 1.5}),
        json!({"extra": [1, 2]}),
        json!({"extra": {"key": 42}}),
        json!({"protocol": 7}),
        json!({"protocol": "bogus"}),
        json!([1, 2, 3]),
    ] {
        let err = get_auth_message("app", &data, "domob").expect_err("bad data");
        assert!(matches!(err, XidError::InvalidArgument(_)), "data {}", data);
    }
}

#[test]
fn get_auth_message_ignores_null_values() {
    let result = get_auth_message("app", &json!({"expiry": null, "extra": null, "protocol": null}), "domob").expect("null fields");
    let mut parsed = Credentials::new("domob", "app");
    parsed.from_password(&result.password).expect("parse password");
    assert_eq!(parsed.expiry(), None);
    assert!(parsed.extras().is_empty());
}

#[test]
fn get_auth_message_rejects_invalid_format() {
    let err = get_auth_message("bad app!", &json!({}), "domob").expect_err("invalid application");
    assert!(matches!(err, XidError::AuthInvalidData));

    let err = get_auth_message("app", &json!({"extra": {"bad key": "v"}}), "domob").expect_err("invalid extra");
    assert!(matches!(err, XidError::AuthInvalidData));
}

#[test]
fn set_auth_signature_roundtrip() {
    let unsigned = get_auth_message("app", &json!({"expiry": 1234}), "domob").expect("getauthmessage");
    let signature = base64::encode(b"raw signature bytes");

    let signed = set_auth_signature(&unsigned.password, &signature).expect("setauthsignature");

    let mut parsed = Credentials::new("domob", "app");
    parsed.from_password(&signed).expect("parse password");
    assert_eq!(parsed.raw_signature(), Some(b"raw signature bytes".as_slice()));
    assert_eq!(parsed.expiry(), Some(1234));
}

#[test]
fn set_auth_signature_rejects_a_bad_password() {
    let err = set_auth_signature("definitely not a password", &base64::encode(b"sgn")).expect_err("bad password");
    assert!(matches!(err, XidError::MalformedCredential));
}

#[test]
fn set_auth_signature_rejects_invalid_claim_data() {
    use xid_core::domain::AuthClaim;

    let mut claim = AuthClaim::default();
    claim.extra.insert("bad key".to_string(), "v".to_string());
    let password = base64::encode(&claim.encode());

    let err = set_auth_signature(&password, &base64::encode(b"sgn")).expect_err("invalid data");
    assert!(matches!(err, XidError::AuthInvalidData));
}

#[test]
fn set_auth_signature_rejects_non_base64_signatures() {
    let unsigned = get_auth_message("app", &json!({}), "domob").expect("getauthmessage");
    let err = set_auth_signature(&unsigned.password, "*** not base64 ***").expect_err("bad signature");
    assert!(matches!(err, XidError::AuthInvalidSignature));
}
