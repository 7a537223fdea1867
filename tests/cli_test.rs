use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

#[test]
fn test_cli_late_payment_flow() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, id, code, due_date, rent, deposit, owner, payout").unwrap();
    writeln!(
        file,
        "register, prop-1, AB12CD, 2025-01-10, 1500, 5000, owner-1, owner@bank"
    )
    .unwrap();
    writeln!(file, "link, tenant-1, AB12CD").unwrap();
    writeln!(file, "estimate, tenant-1").unwrap();
    writeln!(file, "pay, tenant-1").unwrap();

    let mut cmd = Command::new(cargo_bin!("rentledger"));
    cmd.arg(file.path()).arg("--as-of").arg("2025-01-13");

    // Linked at 2025-01-13 the ledger backdates to 2024-12-14, so the
    // payment is 3 days past the 2025-01-10 due date: fine 400.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("estimate,tenant-1,400,3,4"))
        .stdout(predicate::str::contains(
            "tenant,property,deposit,last_payment,fines,payments",
        ))
        .stdout(predicate::str::contains("tenant-1,prop-1,4600,2025-01-13,1,1"));
}

#[test]
fn test_cli_on_time_payment() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, id, code, due_date, rent, deposit, owner, payout").unwrap();
    writeln!(
        file,
        "register, prop-1, AB12CD, 2025-01-10, 1500, 5000, owner-1, owner@bank"
    )
    .unwrap();
    writeln!(file, "link, tenant-1, AB12CD").unwrap();
    writeln!(file, "pay, tenant-1").unwrap();

    let mut cmd = Command::new(cargo_bin!("rentledger"));
    cmd.arg(file.path()).arg("--as-of").arg("2025-01-10");

    // Paying on the due date itself never accrues a fine.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("tenant-1,prop-1,5000,2025-01-10,0,1"));
}

#[test]
fn test_cli_invalid_code_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, id, code, due_date, rent, deposit, owner, payout").unwrap();
    writeln!(file, "link, tenant-1, NOPE").unwrap();

    let mut cmd = Command::new(cargo_bin!("rentledger"));
    cmd.arg(file.path()).arg("--as-of").arg("2025-01-10");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error processing operation"))
        .stderr(predicate::str::contains("invalid property code: NOPE"));
}

#[test]
fn test_cli_unlink_clears_ledger() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, id, code, due_date, rent, deposit, owner, payout").unwrap();
    writeln!(
        file,
        "register, prop-1, AB12CD, 2025-01-10, 1500, 5000, owner-1, owner@bank"
    )
    .unwrap();
    writeln!(file, "link, tenant-1, AB12CD").unwrap();
    writeln!(file, "unlink, tenant-1").unwrap();

    let mut cmd = Command::new(cargo_bin!("rentledger"));
    cmd.arg(file.path()).arg("--as-of").arg("2025-01-10");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("tenant-1").not());
}
