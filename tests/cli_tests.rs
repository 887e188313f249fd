mod common;

use common::TestContext;
use regex::Regex;
use slapseg::types::{Orientation, SlapKind};
use std::collections::BTreeSet;
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_slapseg");

fn run(ctx: &TestContext, args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .arg("--images")
        .arg(&ctx.images)
        .arg("--output")
        .arg(&ctx.output)
        .output()
        .expect("Failed to execute binary")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn two_inch_context(count: usize) -> TestContext {
    let mut ctx = TestContext::new();
    for i in 0..count {
        ctx.add_image(&format!("slap{}.raw", i), SlapKind::TwoInch, Orientation::Right);
    }
    ctx.write_manifest();
    ctx
}

fn parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[test]
fn test_no_operation_prints_usage() {
    let ctx = TestContext::new();
    let out = run(&ctx, &[]);
    assert_eq!(out.status.code(), Some(0));
    assert!(stderr(&out).contains("Usage"));
}

#[test]
fn test_multiple_operations_rejected() {
    let ctx = TestContext::new();
    let out = run(&ctx, &["-i", "-s"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Usage"));
}

#[test]
fn test_unknown_option_rejected() {
    let ctx = TestContext::new();
    let out = run(&ctx, &["-z"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_too_many_processes_rejected() {
    let ctx = two_inch_context(2);
    let out = run(&ctx, &["-s", "-f", "100000"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("refusing"), "{}", stderr(&out));
    assert!(ctx.logs("segments-").is_empty());
}

#[test]
fn test_unparsable_seed_rejected() {
    let ctx = two_inch_context(2);
    let out = run(&ctx, &["-s", "-r", "abc"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_identify() {
    let ctx = TestContext::new();
    let out = run(&ctx, &["-i"]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));

    let text = stdout(&out);
    assert!(text.contains("LibraryIdentifier = nullimpl"));
    assert!(text.contains("MarketingIdentifier = Slap Segmentation Stub Implementation"));
    assert!(text.contains("Version = 0x0001"));
}

#[test]
fn test_supported_kinds() {
    let ctx = TestContext::new();
    let out = run(&ctx, &["-k"]);
    assert_eq!(out.status.code(), Some(0));

    let text = stdout(&out);
    for line in [
        "TwoInch = true",
        "ThreeInch = true",
        "UpperPalm = true",
        "FullPalm = true",
        "DetermineOrientation = false",
    ] {
        assert!(text.contains(line), "missing '{}' in {}", line, text);
    }
}

#[test]
fn test_unknown_engine_fails() {
    let ctx = TestContext::new();
    let out = run(&ctx, &["-i", "--engine", "nonexistent"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Unknown engine"));
}

#[test]
fn test_missing_manifest_fails() {
    let ctx = TestContext::new();
    let out = run(&ctx, &["-s"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_segment_single_process() {
    let mut ctx = TestContext::new();
    ctx.add_image("r.raw", SlapKind::TwoInch, Orientation::Right)
        .add_image("t.raw", SlapKind::ThreeInch, Orientation::Thumbs)
        .add_image("p.raw", SlapKind::FullPalm, Orientation::Left);
    ctx.write_manifest();

    let out = run(&ctx, &["-s", "-r", "3"]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));

    let logs = ctx.logs("segments-");
    assert_eq!(logs.len(), 3);
    let pattern = Regex::new(r"^segments-(2|3|8)-\d+\.log$").unwrap();
    for log in &logs {
        assert!(pattern.is_match(&common::file_name(log)));
    }
    // 4 fingers + 2 thumbs + 4 fingers and a palm
    assert_eq!(ctx.log_lines("segments-").len(), 11);
}

#[test]
fn test_segment_across_workers() {
    if parallelism() < 2 {
        return;
    }
    let ctx = two_inch_context(6);

    let out = run(&ctx, &["-s", "-f", "2", "-r", "42"]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));

    let logs = ctx.logs("segments-2-");
    assert_eq!(logs.len(), 2);

    let lines = ctx.log_lines("segments-2-");
    assert_eq!(lines.len(), 6 * 4);
    let seen: BTreeSet<String> = lines
        .iter()
        .map(|l| l.split(',').next().unwrap().to_string())
        .collect();
    let expected: BTreeSet<String> = (0..6).map(|i| format!("slap{}.raw", i)).collect();
    assert_eq!(seen, expected);

    // Each worker got half the images.
    for log in logs {
        let contents = std::fs::read_to_string(log).unwrap();
        assert_eq!(contents.lines().count(), 1 + 3 * 4);
    }
}

#[test]
fn test_workers_log_at_debug_level() {
    if parallelism() < 2 {
        return;
    }
    let ctx = two_inch_context(4);

    let out = run(&ctx, &["-s", "-f", "2", "-r", "5", "--debug"]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));

    let received = Regex::new(r"Worker \d+ received 2 two_inch images").unwrap();
    assert_eq!(received.find_iter(&stderr(&out)).count(), 2);
}

#[test]
fn test_orientation_skipped_for_null_engine() {
    let ctx = two_inch_context(2);
    let out = run(&ctx, &["-d"]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    assert!(ctx.logs("orientation-").is_empty());
}
