use std::{fs, path::PathBuf, process::Command};

use tempfile::tempdir;

use srcmlcpp::SrcmlcppError;
use srcmlcpp_cli::{Args, OutputFormat, run};

fn srcml_is_installed() -> bool {
    Command::new("srcml").arg("--version").output().is_ok_and(|output| output.status.success())
}

/// Collects all .h files from a directory
fn collect_header_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("h"))
            .collect()
    } else {
        Vec::new()
    };
    files.sort();
    files
}

fn args(input: &str, output: Option<String>, format: OutputFormat, config: Option<String>) -> Args {
    Args {
        input: input.to_string(),
        output,
        format,
        config,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_missing_input_is_an_io_error() {
    let result = run(&args("does/not/exist.h", None, OutputFormat::Overview, None));
    assert!(matches!(result, Err(SrcmlcppError::Io(_))));
}

#[test]
fn e2e_missing_srcml_executable() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[srcml]\nexecutable = \"srcml-executable-that-does-not-exist\"\n")
        .expect("Failed to write config");
    let input_path = temp_dir.path().join("a.h");
    fs::write(&input_path, "int a;\n").expect("Failed to write input");

    let result = run(&args(
        &input_path.to_string_lossy(),
        None,
        OutputFormat::Overview,
        Some(config_path.to_string_lossy().to_string()),
    ));
    assert!(
        matches!(result, Err(SrcmlcppError::Parse { .. })),
        "Expected a srcML failure, got {result:?}"
    );
}

#[test]
fn e2e_smoke_test_demos() {
    if !srcml_is_installed() {
        eprintln!("srcml is not installed, skipping");
        return;
    }

    let temp_dir = tempdir().expect("Failed to create temp directory");

    // Demos are at workspace root, relative to workspace not the crate
    let demos_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("Crate should be in the workspace")
        .join("demos");
    let headers = collect_header_files(demos_path);
    assert!(!headers.is_empty(), "No headers found in demos/");

    let mut failed = Vec::new();
    for header in &headers {
        for format in [OutputFormat::Xml, OutputFormat::Overview, OutputFormat::Code, OutputFormat::Roundtrip] {
            let output_path = temp_dir.path().join(format!(
                "{}.{format:?}.txt",
                header.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default()
            ));
            let result = run(&args(
                &header.to_string_lossy(),
                Some(output_path.to_string_lossy().to_string()),
                format,
                None,
            ));
            match result {
                Ok(()) => {
                    let output = fs::read_to_string(&output_path).expect("Failed to read output");
                    assert!(!output.trim().is_empty(), "Empty output for {header:?} {format:?}");
                }
                Err(err) => failed.push(format!("{header:?} {format:?}: {err}")),
            }
        }
    }

    assert!(failed.is_empty(), "Failed demos:\n{}", failed.join("\n"));
}
