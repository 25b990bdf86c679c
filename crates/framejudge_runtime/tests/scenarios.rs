//! End-to-end behaviour of a harness written the way the generator writes Rust harnesses, read back through the
//! frame split.

use framejudge_core::framing::split_frames;
use framejudge_core::payload::{Payload, decode};
use framejudge_runtime::{ChannelSet, ContextHarness, EvaluationResult, ExceptionStatement, MemorySink, Outcome, raise};
use proptest::prelude::*;
use serde_json::json;

const TOKEN: &str = "EjgkIhoLXq";

fn segments(sink: &MemorySink) -> Vec<String> {
    split_frames(&sink.contents(), TOKEN).into_iter().map(str::to_string).collect()
}

fn compute() -> i64 {
    raise("RuntimeError", "compute failed")
}

fn divide(a: i64, b: i64) -> i64 {
    a / std::hint::black_box(b)
}

#[test]
fn scenario_a_single_expression_value() {
    let (channels, sinks) = ChannelSet::in_memory();
    let mut harness = ContextHarness::new(TOKEN, channels).unwrap();
    harness.finish_before().unwrap();
    harness
        .execute_testcase(|| Outcome::value(1 + 1), ExceptionStatement::Builtin)
        .unwrap();
    harness.enter_after().unwrap();
    harness.close().unwrap();

    let values = segments(&sinks[0]);
    let exceptions = segments(&sinks[1]);
    assert_eq!(values.len(), 3);
    assert_eq!(values[1], "", "main slot stays empty without a main invocation");
    assert_eq!(decode(&values[2]).unwrap(), Some(Payload::value(json!(2))));
    assert_eq!(exceptions, vec!["", "", ""]);
}

#[test]
fn scenario_b_division_by_zero() {
    let (channels, sinks) = ChannelSet::in_memory();
    let mut harness = ContextHarness::new(TOKEN, channels).unwrap();
    harness.finish_before().unwrap();
    let caught = harness
        .execute_testcase(|| Outcome::value(divide(1, 0)), ExceptionStatement::Builtin)
        .unwrap();
    harness.close().unwrap();

    assert!(caught.is_some());
    let values = segments(&sinks[0]);
    let exceptions = segments(&sinks[1]);
    assert_eq!(values[2], "");
    match decode(&exceptions[2]).unwrap() {
        Some(Payload::Exception { type_name, .. }) => assert_eq!(type_name, "ZeroDivisionError"),
        other => panic!("expected a division exception, got {other:?}"),
    }
}

#[test]
fn scenario_c_main_then_testcase() {
    let (channels, sinks) = ChannelSet::in_memory();
    let mut harness = ContextHarness::new(TOKEN, channels).unwrap();
    let mut received = Vec::new();
    harness.finish_before().unwrap();
    harness
        .execute_main(|| received.extend(["a", "b"]), ExceptionStatement::Builtin)
        .unwrap();
    harness
        .execute_testcase(|| Outcome::value("done"), ExceptionStatement::Builtin)
        .unwrap();
    harness.close().unwrap();

    assert_eq!(received, vec!["a", "b"]);
    let values = segments(&sinks[0]);
    assert_eq!(values.len(), 3);
    assert_eq!(values[1], "", "main writes no value record");
    assert_eq!(decode(&values[2]).unwrap(), Some(Payload::value(json!("done"))));
    for sink in &sinks {
        assert_eq!(sink.contents().matches("--EjgkIhoLXq-- SEP").count(), 2);
    }
}

#[test]
fn scenario_d_failed_assignment_keeps_default() {
    let (channels, sinks) = ChannelSet::in_memory();
    let mut harness = ContextHarness::new(TOKEN, channels).unwrap();
    harness.finish_before().unwrap();

    let mut x: i64 = 0;
    harness
        .execute_testcase(
            || {
                x = compute();
                Outcome::Nothing
            },
            ExceptionStatement::Builtin,
        )
        .unwrap();
    harness
        .execute_testcase(|| Outcome::value(x + 5), ExceptionStatement::Builtin)
        .unwrap();
    harness.close().unwrap();

    assert_eq!(x, 0);
    let values = segments(&sinks[0]);
    let exceptions = segments(&sinks[1]);
    assert_eq!(values.len(), 4);
    assert_eq!(values[2], "");
    assert_eq!(
        decode(&exceptions[2]).unwrap(),
        Some(Payload::exception("RuntimeError", "compute failed"))
    );
    assert_eq!(decode(&values[3]).unwrap(), Some(Payload::value(json!(5))));
    assert_eq!(exceptions[3], "");
}

#[test]
fn specific_value_is_an_evaluation_result() {
    let (channels, sinks) = ChannelSet::in_memory();
    let mut harness = ContextHarness::new(TOKEN, channels).unwrap();
    harness.finish_before().unwrap();
    let oracle = |value: i64| EvaluationResult::new(value == 3).with_actual(value.to_string());
    harness
        .execute_testcase(
            || Outcome::evaluated(oracle(3)),
            ExceptionStatement::specific(|error| EvaluationResult::new(error.is_some())),
        )
        .unwrap();
    harness.close().unwrap();

    let values = segments(&sinks[0]);
    let exceptions = segments(&sinks[1]);
    assert!(decode(&values[2]).unwrap().unwrap().is_evaluated());
    assert_eq!(
        decode(&exceptions[2]).unwrap(),
        Some(Payload::Evaluated(EvaluationResult::new(false)))
    );
}

#[test]
fn stdout_written_by_before_code_stays_in_first_segment() {
    use std::io::Write;

    let stdout = MemorySink::new();
    let channels = ChannelSet::from_writers(MemorySink::new(), MemorySink::new(), stdout.clone(), MemorySink::new());
    let mut harness = ContextHarness::new(TOKEN, channels).unwrap();
    stdout.clone().write_all(b"setup").unwrap();
    harness.finish_before().unwrap();
    harness
        .execute_testcase(
            || {
                stdout.clone().write_all(b"hello").unwrap();
                Outcome::Nothing
            },
            ExceptionStatement::Builtin,
        )
        .unwrap();
    harness.close().unwrap();

    assert_eq!(segments(&stdout), vec!["setup", "", "hello"]);
}

proptest! {
    #[test]
    fn every_unit_gets_one_segment(panics in prop::collection::vec(any::<bool>(), 0..12)) {
        let (channels, sinks) = ChannelSet::in_memory();
        let mut harness = ContextHarness::new(TOKEN, channels).unwrap();
        harness.finish_before().unwrap();
        for (i, &fails) in panics.iter().enumerate() {
            harness
                .execute_testcase(
                    move || {
                        if fails {
                            raise("ValueError", "boom");
                        }
                        Outcome::value(i)
                    },
                    ExceptionStatement::Builtin,
                )
                .unwrap();
        }
        harness.close().unwrap();

        let values = segments(&sinks[0]);
        let exceptions = segments(&sinks[1]);
        prop_assert_eq!(values.len(), panics.len() + 2);
        prop_assert_eq!(exceptions.len(), panics.len() + 2);
        for (i, &fails) in panics.iter().enumerate() {
            let value = decode(&values[i + 2]).unwrap();
            let exception = decode(&exceptions[i + 2]).unwrap();
            prop_assert_eq!(value.is_none(), fails);
            prop_assert_eq!(exception.is_some(), fails);
        }
    }
}
