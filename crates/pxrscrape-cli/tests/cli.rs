use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("pxrscrape-build")
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn pxrscrape(args: &[&std::ffi::OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pxrscrape"))
        .args(args)
        .env_remove("PXRSCRAPE_LOG")
        .output()
        .expect("failed to run pxrscrape")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_missing_path_prints_usage() {
    let output = pxrscrape(&[]);

    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.starts_with("USAGE:"));
    assert!(text.contains("pxrTargets.cmake"));
}

#[test]
fn test_generates_block() {
    let input = fixture("pxrTargets.cmake");
    let output = pxrscrape(&[input.as_os_str()]);

    assert!(output.status.success());
    let expected = std::fs::read_to_string(fixture("auto_info.py")).unwrap();
    assert_eq!(stdout(&output), expected);
}

#[test]
fn test_verbose_dumps_json_first() {
    let input = fixture("pxrTargets.cmake");
    let output = pxrscrape(&[input.as_os_str(), "-v".as_ref()]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("{\n  \"arch\": {"));
    assert!(!text.contains("usdviewq"));
    let expected = std::fs::read_to_string(fixture("auto_info.py")).unwrap();
    assert!(text.ends_with(&expected));
}

#[test]
fn test_directory_input_and_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let cmake_dir = dir.path().join("lib").join("cmake");
    std::fs::create_dir_all(&cmake_dir).unwrap();
    std::fs::copy(fixture("pxrTargets.cmake"), cmake_dir.join("pxrTargets.cmake")).unwrap();
    let out_file = dir.path().join("auto_info.py");

    let output = pxrscrape(&[
        dir.path().as_os_str(),
        "--output".as_ref(),
        out_file.as_os_str(),
    ]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert_eq!(
        std::fs::read_to_string(&out_file).unwrap(),
        std::fs::read_to_string(fixture("auto_info.py")).unwrap()
    );
}

#[test]
fn test_compare_with_recipe() {
    let input = fixture("pxrTargets.cmake");
    let recipe = fixture("conanfile.py");
    let output = pxrscrape(&[input.as_os_str(), "--compare".as_ref(), recipe.as_os_str()]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("_auto_info is up to date"));

    let dir = tempfile::tempdir().unwrap();
    let stale = dir.path().join("conanfile.py");
    let text = std::fs::read_to_string(&recipe).unwrap();
    std::fs::write(&stale, text.replace("'usd_gf'", "'usd_gf_old'")).unwrap();

    let output = pxrscrape(&[input.as_os_str(), "--compare".as_ref(), stale.as_os_str()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unknown_target_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pxrTargets.cmake");
    std::fs::write(
        &input,
        "add_library(arch SHARED IMPORTED)\n  INTERFACE_LINK_LIBRARIES \"dl\"\nadd_library(hdNew SHARED IMPORTED)\n  INTERFACE_LINK_LIBRARIES \"arch\"\n",
    )
    .unwrap();

    let output = pxrscrape(&[input.as_os_str()]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("usd_hdNew"));
}

#[test]
fn test_config_overrides_allow_list() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pxrTargets.cmake");
    std::fs::write(
        &input,
        "add_library(hdNew SHARED IMPORTED)\n  INTERFACE_LINK_LIBRARIES \"hd\"\n",
    )
    .unwrap();
    let config = dir.path().join("pxrscrape.toml");
    std::fs::write(&config, "[library]\nknown = [\"usd_hdNew\"]\n").unwrap();

    let output = pxrscrape(&[input.as_os_str(), "--config".as_ref(), config.as_os_str()]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("components[\"hdNew\"].libs = ['usd_hdNew']"));
}
