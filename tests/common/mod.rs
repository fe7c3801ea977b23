//! Harness that runs the compiled `sentence-embed` binary.

use std::io::Write;
use std::process::{Command, Stdio};

const EMBED_VARS: &[&str] = &[
    "EMBED_MODEL_ID",
    "EMBED_REVISION",
    "EMBED_MODEL_DIR",
    "EMBED_MAX_SEQ_LEN",
    "EMBED_BATCH_SIZE",
    "EMBED_NORMALIZE",
    "EMBED_DEVICE",
    "EMBED_STUB",
    "EMBED_PORT",
    "EMBED_BIND_ADDR",
];

#[derive(Debug)]
pub struct CliRun {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CliRun {
    /// Parses stdout as exactly one JSON document.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(self.stdout.trim()).unwrap_or_else(|e| {
            panic!(
                "stdout is not a single JSON record ({e}): {:?}\nstderr: {}",
                self.stdout, self.stderr
            )
        })
    }
}

/// Runs the binary with a clean `EMBED_*` environment plus `env`.
pub fn run_cli(args: &[&str], stdin: Option<&str>, env: &[(&str, &str)]) -> CliRun {
    let mut command = Command::new(env!("CARGO_BIN_EXE_sentence-embed"));
    command
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for var in EMBED_VARS {
        command.env_remove(var);
    }
    command.env("RUST_LOG", "debug");
    for (key, value) in env {
        command.env(key, value);
    }

    let mut child = command.spawn().expect("failed to spawn sentence-embed");
    {
        let mut pipe = child.stdin.take().expect("stdin is piped");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("failed to write stdin");
        }
    }

    let output = child.wait_with_output().expect("failed to wait for sentence-embed");
    CliRun {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// Runs the binary against the deterministic stub embedder.
pub fn run_stub(args: &[&str], stdin: Option<&str>) -> CliRun {
    run_cli(args, stdin, &[("EMBED_STUB", "1")])
}
