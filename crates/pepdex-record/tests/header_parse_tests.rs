use pepdex_record::{parse_record, split_document, ProposalType, RecordError, Status};

const PEP_487: &str = "Number: 487\nTitle: X\nStatus: Draft\nType: Standards Track\nCreated: 27-Feb-2015\n\nbody...";

#[test]
fn parses_the_reference_example() {
    let r = parse_record(PEP_487, "pep-0487").expect("parse");
    assert_eq!(r.number(), 487);
    assert_eq!(r.status, Status::Draft);
    assert_eq!(r.proposal_type, ProposalType::StandardsTrack);
    assert_eq!(r.created.to_string(), "27-Feb-2015");
}

#[test]
fn omitting_created_names_created() {
    let text = PEP_487.replace("Created: 27-Feb-2015\n", "");
    let err = parse_record(&text, "pep-0487").expect_err("should fail");
    assert_eq!(err, RecordError::missing("pep-0487", "created"));
    assert_eq!(
        err.to_string(),
        "pep-0487: missing required field `created`"
    );
}

#[test]
fn bogus_status_names_status_and_document() {
    let text = PEP_487.replace("Status: Draft", "Status: Bogus");
    let err = parse_record(&text, "pep-0487").expect_err("should fail");
    match err {
        RecordError::MalformedField {
            document,
            field,
            reason,
        } => {
            assert_eq!(document, "pep-0487");
            assert_eq!(field, "status");
            assert!(reason.contains("Bogus"), "reason={reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn fields_after_the_blank_line_are_body() {
    let text = "PEP: 5\nTitle: X\nStatus: Draft\nType: Process\n\nCreated: 01-Jan-2020\n";
    let err = parse_record(text, "pep-0005").expect_err("created is in the body");
    assert_eq!(err.field(), "created");
}

#[test]
fn a_realistic_header_parses_in_full() {
    let text = r#"PEP: 3147
Title: PYC Repository Directories
Author: Barry Warsaw <barry@python.org>
Status: Final
Type: Standards Track
Content-Type: text/x-rst
Created: 16-Dec-2009
Python-Version: 3.2
Post-History: 30-Jan-2010, 25-Feb-2010, 03-Mar-2010, 12-Apr-2010
Resolution: https://mail.python.org/pipermail/python-dev/2010-April/099414.html


Abstract
========

This PEP describes an extension to Python's import mechanism.
"#;
    let r = parse_record(text, "pep-3147").expect("parse");
    assert_eq!(r.number(), 3147);
    assert_eq!(r.author, vec!["Barry Warsaw <barry@python.org>".to_string()]);
    assert_eq!(r.python_version.as_deref(), Some("3.2"));
    assert_eq!(r.post_history.len(), 4);
    assert_eq!(r.content_type.as_deref(), Some("text/x-rst"));
    assert!(r.resolution.is_some());

    let (_, body) = split_document(text);
    assert!(body.contains("Abstract\n========"));
}

#[test]
fn records_serialize_with_display_names() {
    let r = parse_record(PEP_487, "pep-0487").expect("parse");
    let json = serde_json::to_value(&r).expect("json");
    assert_eq!(json["number"], 487);
    assert_eq!(json["status"], "Draft");
    assert_eq!(json["type"], "Standards Track");
    assert_eq!(json["created"], "27-Feb-2015");

    let back: pepdex_record::ProposalRecord = serde_json::from_value(json).expect("decode");
    assert_eq!(back, r);
}
