//! Integration tests for the reservation commands.
//!
//! Dates are in 2099 so every check-in lies in the future.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_book_prints_reference() {
    let env = TestEnv::new();
    env.init_seeded(2);

    let reference = env.book("standard", "2099-12-25", "2099-12-27", &[]);
    assert!(reference.starts_with("BK"), "unexpected reference {reference}");

    let listed = env.list_json(&[]);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["booking_ref"], reference.as_str());
    assert_eq!(listed[0]["total_price"], "240.00");
    assert_eq!(listed[0]["status"], "pending");
    assert!(listed[0]["unit"].is_null());
}

#[test]
fn test_paid_booking_confirms_and_binds_unit() {
    let env = TestEnv::new();
    env.init_seeded(2);

    let reference = env.book(
        "standard",
        "2099-12-25",
        "2099-12-27",
        &["--payment", "paid"],
    );

    env.command()
        .args(["show", &reference])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status:       confirmed"))
        .stdout(predicate::str::contains("Unit:         S001"));
}

#[test]
fn test_pay_then_complete() {
    let env = TestEnv::new();
    env.init_seeded(1);
    let reference = env.book("standard", "2099-12-25", "2099-12-27", &[]);

    env.command()
        .args(["status", &reference, "confirmed"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("payment"));

    env.command()
        .args(["pay", &reference])
        .assert()
        .success()
        .stdout(predicate::str::contains("status confirmed, payment paid, unit S001"));

    env.command()
        .args(["status", &reference, "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("status completed"));
}

#[test]
fn test_inventory_runs_out() {
    let env = TestEnv::new();
    env.init_seeded(2);

    env.book("standard", "2099-12-25", "2099-12-27", &["--payment", "paid"]);
    env.book("standard", "2099-12-25", "2099-12-27", &[]);

    env.command()
        .args([
            "book",
            "--category",
            "standard",
            "--check-in",
            "2099-12-26",
            "--check-out",
            "2099-12-28",
            "--name",
            "Late Guest",
            "--email",
            "late@example.com",
            "--phone",
            "555-0199",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no 'standard' inventory"));

    // Back-to-back with the existing stays.
    env.book("standard", "2099-12-27", "2099-12-29", &[]);
}

#[test]
fn test_availability_report() {
    let env = TestEnv::new();
    env.init_seeded(3);
    env.book("standard", "2099-06-10", "2099-06-12", &[]);

    env.command()
        .args([
            "availability",
            "--category",
            "standard",
            "--check-in",
            "2099-06-11",
            "--check-out",
            "2099-06-13",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 of 3 unit(s) available at 120.00"));

    let output = env
        .command()
        .args([
            "availability",
            "--category",
            "suite",
            "--check-in",
            "2099-06-11",
            "--check-out",
            "2099-06-13",
            "--guests",
            "4",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["available"], true);
    assert_eq!(report["total_count"], 1);
    assert_eq!(report["nightly_price"], "280.50");
}

#[test]
fn test_capacity_exceeded_is_business_error() {
    let env = TestEnv::new();
    env.init_seeded(1);

    env.command()
        .args([
            "availability",
            "--category",
            "standard",
            "--check-in",
            "2099-06-11",
            "--check-out",
            "2099-06-13",
            "--guests",
            "3",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("at most 2 guest(s)"));
}

#[test]
fn test_cancel_releases_unit() {
    let env = TestEnv::new();
    env.init_seeded(1);
    let first = env.book("standard", "2099-03-01", "2099-03-04", &["--payment", "paid"]);

    env.command()
        .args(["cancel", &first])
        .assert()
        .success()
        .stdout(predicate::str::contains("status cancelled"))
        .stdout(predicate::str::contains("unit -"));

    let second = env.book("standard", "2099-03-02", "2099-03-03", &["--payment", "paid"]);
    env.command()
        .args(["show", &second])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unit:         S001"));
}

#[test]
fn test_assign_and_unbind() {
    let env = TestEnv::new();
    env.init_seeded(2);
    let reference = env.book("standard", "2099-04-01", "2099-04-03", &[]);

    env.command()
        .args(["assign", &reference, "--unit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unit S002"));

    // Same unit again changes nothing.
    env.command()
        .args(["assign", &reference, "--unit", "2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("nothing to do"));

    // A different unit needs an unbind first.
    env.command()
        .args(["assign", &reference, "--unit", "1"])
        .assert()
        .code(1);

    env.command()
        .args(["unbind", &reference])
        .assert()
        .success()
        .stdout(predicate::str::contains("unit -"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let env = TestEnv::new();
    env.init_seeded(1);

    env.command()
        .args([
            "book",
            "--category",
            "standard",
            "--check-in",
            "2099-05-01",
            "--check-out",
            "2099-05-03",
            "--name",
            "Dry Guest",
            "--email",
            "dry@example.com",
            "--phone",
            "555-0100",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Dry run"));

    assert_eq!(env.list_json(&[]).as_array().unwrap().len(), 0);
}

#[test]
fn test_list_filters_and_formats() {
    let env = TestEnv::new();
    env.init_seeded(3);
    env.book("standard", "2099-07-01", "2099-07-03", &[]);
    env.book("standard", "2099-07-10", "2099-07-12", &["--payment", "paid"]);
    env.book("suite", "2099-07-01", "2099-07-02", &["--guests", "3"]);

    let confirmed = env.list_json(&["--status", "confirmed"]);
    assert_eq!(confirmed.as_array().unwrap().len(), 1);

    let suites = env.list_json(&["--category", "suite"]);
    assert_eq!(suites[0]["guest_count"], 3);

    let window = env.list_json(&["--from", "2099-07-05", "--to", "2099-07-31"]);
    assert_eq!(window.as_array().unwrap().len(), 1);

    env.command()
        .args(["list", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "id,reference,guest,category,check_in,check_out,guests,total,status,payment,unit\n",
        ));

    env.command()
        .args(["list", "--format", "table", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("REFERENCE"))
        .stdout(predicate::str::contains("suite"));
}

#[test]
fn test_output_format_from_environment() {
    let env = TestEnv::new();
    env.init_seeded(1);
    env.book("standard", "2099-08-01", "2099-08-03", &[]);

    env.command()
        .env("BERTH_OUTPUT_FORMAT", "tsv")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id\treference\t"));
}

#[test]
fn test_supplied_price_and_add_ons() {
    let env = TestEnv::new();
    env.init_seeded(1);
    let reference = env.book(
        "standard",
        "2099-09-01",
        "2099-09-03",
        &[
            "--price",
            "199.99",
            "--add-on",
            "kayak:Kayak tour:45",
            "--requests",
            "Late arrival",
        ],
    );

    let output = env
        .command()
        .args(["show", &reference, "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["total_price"], "199.99");
    assert_eq!(shown["add_ons"][0]["id"], "kayak");
    assert_eq!(shown["add_ons"][0]["price"], "45.00");
    assert_eq!(shown["special_requests"], "Late arrival");
}
