//! A [`SrcmlService`] running the `srcml` executable.
//!
//! Each conversion writes its input into a temporary directory, runs
//! `srcml` on it and reads the output back. The directory is removed when
//! the conversion returns, on success as well as on failure.

use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

use log::{debug, trace};

use srcmlcpp_core::{XmlNode, xml};
use srcmlcpp_parser::{SrcmlError, SrcmlService};

use crate::config::SrcmlConfig;

/// Runs `srcml` for every conversion.
#[derive(Debug, Clone)]
pub struct SrcmlExecutable {
    executable: String,
    encoding: String,
}

impl SrcmlExecutable {
    /// Create a service running `config.executable()` with the given
    /// source and XML encoding.
    pub fn new(config: &SrcmlConfig, encoding: impl Into<String>) -> Self {
        Self {
            executable: config.executable().to_string(),
            encoding: encoding.into(),
        }
    }

    fn run(&self, input: &Path, output: &Path, emit_positions: bool) -> Result<(), SrcmlError> {
        let mut command = Command::new(&self.executable);
        command.arg("-l").arg("C++").arg(input);
        if emit_positions {
            command.arg("--position");
        }
        command
            .arg("--xml-encoding")
            .arg(&self.encoding)
            .arg("--src-encoding")
            .arg(&self.encoding)
            .arg("-o")
            .arg(output);
        debug!(command:? = command; "Running srcML");

        let Output { status, stderr, .. } = command.output()?;
        if !status.success() {
            return Err(SrcmlError::Process {
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl SrcmlService for SrcmlExecutable {
    fn source_to_xml(&self, code: &str, emit_positions: bool) -> Result<XmlNode, SrcmlError> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("input.h");
        let output = dir.path().join("output.xml");
        fs::write(&input, code)?;
        self.run(&input, &output, emit_positions)?;

        let content = fs::read_to_string(&output)?;
        trace!(xml = content.as_str(); "srcML output");
        let mut unit = xml::parse_document(&content)?;
        // The temporary file name is meaningless for callers.
        unit.remove_attribute("filename");
        Ok(unit)
    }

    fn xml_to_source(&self, node: &XmlNode) -> Result<String, SrcmlError> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("input.xml");
        let output = dir.path().join("output.h");
        fs::write(&input, xml::to_xml_string(node)?)?;
        self.run(&input, &output, false)?;
        Ok(fs::read_to_string(&output)?)
    }
}
