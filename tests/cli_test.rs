use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_restores_saved_settings() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("elevate-payments"));
    cmd.arg("settings")
        .arg("tests/fixtures/combined.json")
        .arg("--template-id")
        .arg("T1");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""mode":"COMBINED""#))
        .stdout(predicate::str::contains(r#""selectedGateway":"G3""#))
        .stdout(predicate::str::contains(r#""achEnabled":false"#))
        .stdout(predicate::str::contains("settingsChanged").not());

    Ok(())
}

#[test]
fn test_cli_selection_publishes_encrypted_key() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("elevate-payments"));
    cmd.arg("settings")
        .arg("tests/fixtures/combined.json")
        .arg("--template-id")
        .arg("T2")
        .arg("--gateway")
        .arg("G1");

    cmd.assert().success().stdout(predicate::str::contains(
        r#"{"event":"settingsChanged","payload":{"uniqueKey":"1G","isACHEnabled":false,"isCreditCardEnabled":true}}"#,
    ));

    Ok(())
}

#[test]
fn test_cli_default_template_flag() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("elevate-payments"));
    cmd.arg("settings")
        .arg("tests/fixtures/combined.json")
        .arg("--template-id")
        .arg("T0");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""defaultTemplate":true"#));

    Ok(())
}

#[test]
fn test_cli_payment_method_mode() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("elevate-payments"));
    cmd.arg("settings")
        .arg("tests/fixtures/payment_method.json")
        .arg("--template-id")
        .arg("T1")
        .arg("--ach")
        .arg("false");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""mode":"PAYMENT_METHOD""#))
        .stdout(predicate::str::contains(
            r#"{"event":"settingsChanged","payload":{"uniqueKey":null,"isACHEnabled":false,"isCreditCardEnabled":false}}"#,
        ));

    Ok(())
}

#[test]
fn test_cli_management_mode() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("elevate-payments"));
    cmd.arg("settings")
        .arg("tests/fixtures/combined.json")
        .arg("--management")
        .arg("--gateway")
        .arg("G3");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"event":"selectedGatewayChanged","payload":"G2"}"#,
        ))
        .stdout(predicate::str::contains(
            r#"{"event":"selectedGatewayChanged","payload":"G3"}"#,
        ))
        .stdout(predicate::str::contains(r#""mode":"GATEWAY_MANAGEMENT""#));

    Ok(())
}

#[test]
fn test_cli_unknown_gateway_fails() {
    let mut cmd = Command::new(cargo_bin!("elevate-payments"));
    cmd.arg("settings")
        .arg("tests/fixtures/combined.json")
        .arg("--gateway")
        .arg("G9");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("G9"));
}

#[test]
fn test_cli_reports_catalog_timeout() {
    let mut cmd = Command::new(cargo_bin!("elevate-payments"));
    cmd.arg("settings").arg("tests/fixtures/timeout.json");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("timed out"));
}

#[test]
fn test_cli_options() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("elevate-payments"));
    cmd.arg("options").arg("tests/fixtures/combined.json");

    cmd.assert().success().stdout(predicate::str::contains(
        "label,value\nDefault Gateway,\nAuthorize.net,G1\nBraintree,G2\nWorldpay,G3\n",
    ));

    Ok(())
}

#[test]
fn test_cli_options_with_labels() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("elevate-payments"));
    cmd.arg("--labels")
        .arg("tests/fixtures/labels.json")
        .arg("options")
        .arg("tests/fixtures/combined.json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Org Default Gateway,\n"));

    Ok(())
}

#[test]
fn test_cli_management_options() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("elevate-payments"));
    cmd.arg("options")
        .arg("tests/fixtures/combined.json")
        .arg("--management");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("label,value\nAuthorize.net,G1\n"))
        .stdout(predicate::str::contains("Default Gateway").not());

    Ok(())
}

#[test]
fn test_cli_batch() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("elevate-payments"));
    cmd.arg("batch")
        .arg("tests/fixtures/batch.json")
        .arg("tests/fixtures/gifts.csv");

    cmd.assert()
        .success()
        // The first add fails once and lands in a fresh batch.
        .stdout(predicate::str::contains(
            r#"{"elevateBatchId":"batch-2","elevateId":"auth-1"}"#,
        ))
        .stdout(predicate::str::contains(
            r#"{"elevateBatchId":"batch-2","elevateId":"auth-3"}"#,
        ))
        .stderr(predicate::str::contains("Error reading gift"));

    Ok(())
}
