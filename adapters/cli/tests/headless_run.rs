use std::process::Command;

fn run(args: &[&str]) -> serde_json::Value {
    let output = Command::new(env!("CARGO_BIN_EXE_tetris-defence"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch tetris-defence");
    assert!(output.status.success(), "tetris-defence exited with {}", output.status);
    serde_json::from_slice(&output.stdout).expect("stdout holds a json report")
}

#[test]
fn json_report_describes_the_run() {
    let report = run(&["--seed", "7", "--waves", "1", "--max-turns", "40", "--json"]);

    assert_eq!(report["seed"], 7);
    let summary = &report["summary"];
    assert!(summary["turns_made"].as_u64().expect("turn count") <= 40);
    assert!(summary["outcome"].is_string());
    assert!(report["sounds_played"].as_u64().expect("sound count") > 0);
}

#[test]
fn identical_seeds_produce_identical_reports() {
    let args = ["--seed", "11", "--waves", "2", "--max-turns", "25", "--json"];
    assert_eq!(run(&args), run(&args));
}

#[test]
fn missing_config_file_fails() {
    let status = Command::new(env!("CARGO_BIN_EXE_tetris-defence"))
        .args(["--config", "no/such/session.toml"])
        .env("RUST_LOG", "off")
        .status()
        .expect("failed to launch tetris-defence");
    assert!(!status.success());
}
