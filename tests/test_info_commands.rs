use assert_cmd::Command;
use predicates::prelude::predicate;

#[test]
fn test_encodings() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("lexbibd")?;
    cmd.arg("encodings").arg("--logging-level").arg("off");
    cmd.assert()
        .success()
        .stdout("none\nmylex\nand\nand-cse\nor\nor-cse\nror\nalpha\nalpha-m\nharvey\n");
    Ok(())
}

#[test]
fn test_authors() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("lexbibd")?;
    cmd.arg("authors").arg("--logging-level").arg("off");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("lexbibd "));
    Ok(())
}

#[test]
fn test_no_command() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("lexbibd")?;
    cmd.assert().failure();
    Ok(())
}
