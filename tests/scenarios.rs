//! End-to-end scenarios exercising the framer, rewriter, and record parser
//! together rather than one module in isolation.

use gdbmi_parser::record::{AsyncKind, Record, StreamKind};
use gdbmi_parser::{LineFramer, Native};

#[test]
fn console_stream_with_escaped_newline() {
    let mut framer = LineFramer::new();
    let record = framer.parse(b"~\"Hello\\n\"\n").unwrap().unwrap();
    match record {
        Record::Stream(s) => {
            assert_eq!(s.kind, StreamKind::Console);
            assert_eq!(s.value, "Hello\n");
        }
        other => panic!("expected Stream, got {:?}", other),
    }
}

#[test]
fn result_record_with_token_projects_to_native() {
    let mut framer = LineFramer::new();
    let record = framer
        .parse(b"42^done,foo=\"bar\",baz=\"qux\"\n")
        .unwrap()
        .unwrap();
    match &record {
        Record::Result(r) => {
            assert_eq!(r.token, Some(42));
            assert_eq!(r.class, "done");
        }
        other => panic!("expected Result, got {:?}", other),
    }
    match record.as_native() {
        Native::Result(json) => {
            assert_eq!(json["class"], "done");
            assert_eq!(json["type"], "Result");
            assert_eq!(json["token"], 42);
            assert_eq!(json["foo"], "bar");
            assert_eq!(json["baz"], "qux");
        }
        other => panic!("expected Result, got {:?}", other),
    }
}

#[test]
fn async_record_with_nested_breakpoint_tuple() {
    let mut framer = LineFramer::new();
    let record = framer
        .parse(b"*stopped,reason=\"breakpoint-hit\",bkpt={number=\"1\",file=\"x.c\"}\n")
        .unwrap()
        .unwrap();
    match record {
        Record::Async(a) => {
            assert_eq!(a.kind, AsyncKind::Exec);
            assert_eq!(a.class, "stopped");
            let bkpt = a.results.iter().find(|r| r.name == "bkpt").unwrap();
            match &bkpt.value {
                gdbmi_parser::Value::Tuple(fields) => {
                    assert!(fields.iter().any(|f| f.name == "number"));
                    assert!(fields.iter().any(|f| f.name == "file"));
                }
                other => panic!("expected Tuple, got {:?}", other),
            }
        }
        other => panic!("expected Async, got {:?}", other),
    }
}

#[test]
fn termination_prompt() {
    let mut framer = LineFramer::new();
    let record = framer.parse(b"(gdb) \n").unwrap().unwrap();
    assert_eq!(record, Record::Termination);
    match record.as_native() {
        Native::Termination(sentinel) => assert_eq!(sentinel, "(gdb)"),
        other => panic!("expected Termination, got {:?}", other),
    }
}

#[test]
fn breakpoint_table_bug_workaround_produces_a_list_of_tuples() {
    let mut framer = LineFramer::new();
    let record = framer
        .parse(b"^done,BreakpointTable={nr_rows=\"2\",body=[bkpt={number=\"1\"},bkpt={number=\"2\"}]}\n")
        .unwrap()
        .unwrap();
    match record {
        Record::Result(r) => {
            let table = r.results.iter().find(|f| f.name == "BreakpointTable").unwrap();
            match &table.value {
                gdbmi_parser::Value::Tuple(fields) => {
                    let body = fields.iter().find(|f| f.name == "body").unwrap();
                    match &body.value {
                        gdbmi_parser::Value::List(gdbmi_parser::ListItems::Values(values)) => {
                            assert_eq!(values.len(), 2);
                            for v in values {
                                assert!(matches!(v, gdbmi_parser::Value::Tuple(_)));
                            }
                        }
                        other => panic!("expected a list of bare tuples, got {:?}", other),
                    }
                }
                other => panic!("expected Tuple, got {:?}", other),
            }
        }
        other => panic!("expected Result, got {:?}", other),
    }
}

#[test]
fn chunked_feed_splits_on_stopped_and_done() {
    let mut framer = LineFramer::new();
    assert_eq!(framer.parse(b"*stop").unwrap(), None);
    let record = framer.parse(b"ped\n").unwrap().expect("record after second chunk");
    assert!(matches!(record, Record::Async(_)));
}

#[test]
fn one_chunk_with_two_lines_drains_on_a_later_noop_call() {
    let mut framer = LineFramer::new();
    let first = framer
        .parse(b"*stopped\n^done\n")
        .unwrap()
        .expect("first record on first call");
    assert!(matches!(first, Record::Async(_)));
    assert!(framer.more_to_parse());

    let second = framer.parse(b"").unwrap().expect("second record on drain call");
    assert!(matches!(second, Record::Result(_)));
    assert!(!framer.more_to_parse());
}

#[test]
fn carriage_return_newline_terminator_end_to_end() {
    let mut framer = LineFramer::with_terminator("\r\n");
    let record = framer
        .parse(b"^done,addr=\"0x00\"\r\n")
        .unwrap()
        .expect("record");
    assert!(matches!(record, Record::Result(_)));
}

#[test]
fn a_bad_line_does_not_poison_subsequent_parsing() {
    let mut framer = LineFramer::new();
    let err = framer.parse(b"target program output leaking through\n").unwrap_err();
    assert_eq!(err.kind, gdbmi_parser::ParsingErrorKind::InvalidRecordStart);

    let record = framer.parse(b"^done\n").unwrap().expect("record");
    assert!(matches!(record, Record::Result(_)));
}
