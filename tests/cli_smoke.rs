use std::path::PathBuf;

fn exe() -> PathBuf {
    if let Some(path) = std::env::var_os("CARGO_BIN_EXE_passloom") {
        return PathBuf::from(path);
    }
    // Absolute so tests that set current_dir still find the binary.
    let mut p = std::env::current_dir().unwrap().join("target").join("debug");
    p.push(if cfg!(windows) {
        "passloom.exe"
    } else {
        "passloom"
    });
    p
}

#[test]
fn missing_required_args_is_a_usage_error() {
    let output = std::process::Command::new(exe()).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--ext"), "{stderr}");
}

#[test]
fn out_of_range_crf_is_rejected() {
    let output = std::process::Command::new(exe())
        .args([
            "--ext",
            "png",
            "--start-index",
            "1",
            "--last-index",
            "2",
            "--crf",
            "99",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn empty_directory_fails_on_the_missing_base_pass() {
    let dir = PathBuf::from("target").join("passloom-tests").join("cli_empty");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let output = std::process::Command::new(exe())
        .current_dir(&dir)
        .args(["--ext", "png", "--start-index", "1", "--last-index", "2"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unlit"), "{stderr}");
    assert!(!dir.join("output_composite.mp4").exists());
}

#[test]
fn reversed_frame_range_is_rejected() {
    let dir = PathBuf::from("target")
        .join("passloom-tests")
        .join("cli_reversed");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let output = std::process::Command::new(exe())
        .current_dir(&dir)
        .args(["--ext", "png", "--start-index", "9", "--last-index", "2"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("frame range"), "{stderr}");
}

#[test]
fn version_flag_prints_and_exits_cleanly() {
    let output = std::process::Command::new(exe())
        .arg("--version")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("passloom"), "{stdout}");
}
