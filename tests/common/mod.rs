use std::process::Command as ProcCommand;

use serde_json::Value;
use tempfile::TempDir;

pub const SITE_URL: &str = "https://example.com/";

pub fn base_cmd(data_dir: &TempDir) -> ProcCommand {
    let mut command = ProcCommand::new(env!("CARGO_BIN_EXE_letmehelp"));

    command
        .env("DOTENV_PATH", data_dir.path().join("missing.env"))
        .env_remove("LETMEHELP_LOG_FILE")
        .env_remove("LETMEHELP_ADMIN_TOKEN")
        .env_remove("LETMEHELP_DATA_DIR")
        .env_remove("LETMEHELP_SITE_URL")
        .arg("--data-dir")
        .arg(data_dir.path())
        .arg("--site-url")
        .arg(SITE_URL);

    command
}

/// Run a one-shot command and decode its JSON stdout.
pub fn run(data_dir: &TempDir, args: &[&str]) -> (bool, Value) {
    let output = base_cmd(data_dir)
        .args(args)
        .output()
        .expect("run letmehelp");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json = serde_json::from_str(&stdout).unwrap_or_else(|err| {
        panic!(
            "stdout is not JSON ({err}): {stdout}\nstderr: {}",
            String::from_utf8_lossy(&output.stderr)
        )
    });
    (output.status.success(), json)
}

#[allow(dead_code)]
pub fn run_ok(data_dir: &TempDir, args: &[&str]) -> Value {
    let (ok, json) = run(data_dir, args);
    assert!(ok, "{args:?} failed: {json}");
    json
}
