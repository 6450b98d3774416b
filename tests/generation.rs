//! End-to-end generation against the real filesystem, with POSIX tools
//! standing in for solutions.

mod common;

use common::{read, run_problem, tc_args, tc_file, Broken, Echo};
use std::fs;
use tcforge::cli::Args;
use tcforge::GenerationReport;

#[test]
fn cat_solution_writes_outputs_and_combines() {
    let root = tempfile::tempdir().expect("tempdir");
    let args = Args {
        solution: Some("cat".to_string()),
        ..tc_args(&root)
    };

    let outcome = run_problem::<Echo>(&args).expect("run echo");
    assert!(outcome.successful, "transcript:\n{}", outcome.transcript);

    assert_eq!(read(tc_file(&root, "echo_1.in")), "1 2\n");
    assert_eq!(read(tc_file(&root, "echo_1.out")), "1 2\n");
    let parts: String = (1..=3)
        .map(|n| read(tc_file(&root, &format!("echo_{n}.in"))))
        .collect();
    assert_eq!(read(tc_file(&root, "echo.in")), parts);
    assert_eq!(read(tc_file(&root, "echo.out")), "1 2\n3 4\n5 6\n");
    assert!(outcome
        .transcript
        .contains("[ OFFICIAL TEST CASES ]\n  echo_1: OK\n  echo_2: OK\n  echo_3: OK\n"));
    assert!(outcome
        .transcript
        .ends_with("Generation finished. All test cases OK.\n"));
}

#[test]
fn failing_solution_fails_every_case_without_stopping() {
    let root = tempfile::tempdir().expect("tempdir");
    let args = Args {
        solution: Some("false".to_string()),
        ..tc_args(&root)
    };

    let outcome = run_problem::<Echo>(&args).expect("run echo");
    assert!(!outcome.successful);
    assert_eq!(outcome.transcript.matches(": FAILED").count(), 3);
    assert!(outcome
        .transcript
        .contains("* Solution `false` exited with exit status: 1"));
    assert!(tc_file(&root, "echo_3.in").exists());
    assert!(!tc_file(&root, "echo.in").exists());
}

#[test]
fn invalid_specification_generates_nothing() {
    let root = tempfile::tempdir().expect("tempdir");
    let outcome = run_problem::<Broken>(&tc_args(&root)).expect("run broken");
    assert!(!outcome.successful);
    assert!(outcome
        .transcript
        .contains("The type of variable 'bogus' is not supported for a line segment"));
    assert!(!root.path().join("tc").exists());
}

#[test]
fn report_and_config_file_are_honored() {
    let root = tempfile::tempdir().expect("tempdir");
    let config_path = root.path().join("tcforge.json");
    fs::write(
        &config_path,
        r#"{ "schema_version": 1, "slug": "from-file", "seed": 11, "solution": "cat" }"#,
    )
    .expect("write config");
    let report_path = root.path().join("report.json");
    let args = Args {
        config: Some(config_path),
        report: Some(report_path.clone()),
        slug: Some("cli".to_string()),
        ..tc_args(&root)
    };

    let outcome = run_problem::<Echo>(&args).expect("run echo");
    assert!(outcome.successful);
    assert!(tc_file(&root, "cli_2.out").exists());

    let report: GenerationReport =
        serde_json::from_str(&read(&report_path)).expect("parse report");
    assert_eq!(report.schema_version, 1);
    assert_eq!(report.slug, "cli");
    assert_eq!(report.seed, 11);
    assert_eq!((report.case_count, report.pass_count, report.fail_count), (3, 3, 0));
    let combination = report.groups[0].combination.as_ref().expect("combination");
    assert_eq!(combination.base_id, "cli");
    assert!(combination.successful);
}

#[test]
fn bad_config_file_is_an_error() {
    let root = tempfile::tempdir().expect("tempdir");
    let config_path = root.path().join("tcforge.json");
    fs::write(&config_path, r#"{ "schema_version": 3 }"#).expect("write config");
    let args = Args {
        config: Some(config_path),
        ..tc_args(&root)
    };
    let err = run_problem::<Echo>(&args).err().expect("config error");
    assert_eq!(err.to_string(), "unsupported generator config schema_version 3");
}

#[test]
fn regeneration_keeps_unrelated_files() {
    let root = tempfile::tempdir().expect("tempdir");
    let args = tc_args(&root);
    run_problem::<Echo>(&args).expect("first run");
    fs::write(tc_file(&root, "notes.txt"), "keep me").expect("write notes");
    run_problem::<Echo>(&args).expect("second run");
    assert_eq!(read(tc_file(&root, "notes.txt")), "keep me");
    assert_eq!(read(tc_file(&root, "echo.in")), "1 2\n3 4\n5 6\n");
}

#[test]
fn rerun_without_solution_drops_earlier_outputs() {
    let root = tempfile::tempdir().expect("tempdir");
    let with_cat = Args {
        solution: Some("cat".to_string()),
        ..tc_args(&root)
    };
    run_problem::<Echo>(&with_cat).expect("run with solution");
    assert!(tc_file(&root, "echo_1.out").exists());
    assert!(tc_file(&root, "echo.out").exists());

    let outcome = run_problem::<Echo>(&tc_args(&root)).expect("run without solution");
    assert!(outcome.successful, "transcript:\n{}", outcome.transcript);
    for n in 1..=3 {
        assert!(!tc_file(&root, &format!("echo_{n}.out")).exists());
    }
    assert!(!tc_file(&root, "echo.out").exists());
    assert_eq!(read(tc_file(&root, "echo.in")), "1 2\n3 4\n5 6\n");
}
