//! Tests for metadata field derivation and operation recording.

use rstest::rstest;

use super::{MessageMetadata, Operation, OperationKind, OperationValue};

#[rstest]
#[case("Via: SIP/2.0/UDP 10.0.0.1:5060;branch=z9hG4bK776;rport", "z9hG4bK776")]
#[case("Via: SIP/2.0/TCP host;branch=z9hG4bKabc", "z9hG4bKabc")]
#[case("Via: <branch=cluster>", "cluster")]
#[case("Via: SIP/2.0/UDP x", "SIP/2.0/UDP x")]
fn transaction_id_prefers_branch(#[case] via: &str, #[case] expected: &str) {
    let mut metadata = MessageMetadata::default();
    metadata.set_transaction_id(via);
    assert_eq!(metadata.transaction_id(), Some(expected));
}

#[test]
fn empty_via_leaves_transaction_id_unset() {
    let mut metadata = MessageMetadata::default();
    metadata.set_transaction_id("Via:   ");
    assert_eq!(metadata.transaction_id(), None);
}

#[test]
fn ep_operation_inserts_before_closing_bracket() {
    let mut metadata = MessageMetadata::default();
    let header = "Record-Route: <sip:proxy.example.com;lr>";
    metadata.add_ep_operation(100, header, "proxy.example.com", "host");

    let expected_pos = 100 + header.find('>').expect("bracket present");
    assert_eq!(
        metadata.operations(),
        &[Operation::insert(expected_pos, ";ep=")]
    );
}

#[rstest]
#[case::already_tagged("Contact: <sip:proxy.example.com;ep=abc>")]
#[case::no_bracket("Contact: sip:proxy.example.com")]
#[case::foreign_domain("Contact: <sip:other.example.com;lr>")]
fn ep_operation_skipped(#[case] header: &str) {
    let mut metadata = MessageMetadata::default();
    metadata.add_ep_operation(0, header, "proxy.example.com", "host");
    assert!(metadata.operations().is_empty());
}

#[test]
fn ep_operation_matches_on_configured_param() {
    let mut metadata = MessageMetadata::default();
    let header = "Path: <sip:10.0.0.9;lr;x-suri=sip:pcsf.example.com:5060>";
    metadata.add_ep_operation(0, header, "pcsf.example.com", "x-suri");
    assert_eq!(metadata.operations().len(), 1);
    assert_eq!(metadata.operations()[0].kind(), OperationKind::Insert);
}

#[test]
fn opaque_operation_appends_at_line_end() {
    let mut metadata = MessageMetadata::default();
    let header = "WWW-Authenticate: Digest realm=\"example.com\",nonce=\"n\"";
    metadata.add_opaque_operation(40, header);
    assert_eq!(
        metadata.operations(),
        &[Operation::insert(40 + header.len(), ",opaque=")]
    );

    let mut tagged = MessageMetadata::default();
    tagged.add_opaque_operation(0, "WWW-Authenticate: Digest realm=\"r\",opaque=\"x\"");
    assert!(tagged.operations().is_empty());
}

#[test]
fn instip_deletion_spans_parameter_and_suri_scheme() {
    let mut metadata = MessageMetadata::default();
    let header = "Contact: <sip:a@1.2.3.4;inst-ip=10.0.0.1;x-suri=sip:s.example.com>";
    metadata.delete_instip_operation(10, header);

    let inst_pos = header.find(";inst-ip=").expect("inst-ip present");
    let suri_pos = header.find("x-suri=sip:").expect("x-suri present");
    assert_eq!(
        metadata.operations(),
        &[
            Operation::delete(10 + inst_pos, ";inst-ip=10.0.0.1".len()),
            Operation::delete(10 + suri_pos + "x-suri=".len(), 4),
        ]
    );
}

#[test]
fn instip_deletion_runs_to_line_end_without_terminator() {
    let mut metadata = MessageMetadata::default();
    let header = "Path: sip:a;inst-ip=10.0.0.1";
    metadata.delete_instip_operation(0, header);
    assert_eq!(
        metadata.operations()[0].value(),
        &OperationValue::Delete(";inst-ip=10.0.0.1".len())
    );
}

#[test]
fn headers_without_instip_record_nothing() {
    let mut metadata = MessageMetadata::default();
    metadata.delete_instip_operation(0, "Contact: <sip:a@b;x-suri=sip:c>");
    assert!(metadata.operations().is_empty());
}

#[test]
fn params_reset_clears_previous_source() {
    let mut metadata = MessageMetadata::default();
    metadata.add_param("ep", "one");
    metadata.reset_params();
    metadata.add_param("x-suri", "two");
    assert_eq!(metadata.param("ep"), None);
    assert_eq!(metadata.param("x-suri"), Some("two"));
    assert_eq!(metadata.params().len(), 1);
}

#[test]
fn cookie_map_is_last_write_wins() {
    let mut metadata = MessageMetadata::default();
    metadata.set_p_cookie_ip_map("S1F1", "10.0.0.1");
    metadata.set_p_cookie_ip_map("S1F2", "10.0.0.2");
    assert_eq!(metadata.p_cookie_ip_map(), Some(("S1F2", "10.0.0.2")));
}
