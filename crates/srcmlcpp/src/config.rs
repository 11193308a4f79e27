//! Configuration types for srcmlcpp.
//!
//! This module provides the configuration structures that control how C++
//! code is converted and parsed. All types implement [`serde::Deserialize`]
//! for loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining srcML and parsing settings.
//! - [`SrcmlConfig`] - Controls how the `srcml` executable is invoked.
//! - [`SrcmlcppOptions`] - Controls parsing, comments and warnings.
//!
//! # Example
//!
//! ```
//! # use srcmlcpp::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.srcml().executable(), "srcml");
//! assert!(config.options().preserve_empty_lines);
//! ```

use serde::Deserialize;

pub use srcmlcpp_parser::SrcmlcppOptions;

/// Top-level configuration combining srcML and parsing settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// srcML executable section.
    #[serde(default)]
    srcml: SrcmlConfig,

    /// Parsing options section.
    #[serde(default)]
    options: SrcmlcppOptions,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified sections.
    ///
    /// # Arguments
    ///
    /// * `srcml` - How to run the `srcml` executable.
    /// * `options` - Parsing options.
    pub fn new(srcml: SrcmlConfig, options: SrcmlcppOptions) -> Self {
        Self { srcml, options }
    }

    /// Returns the srcML configuration.
    pub fn srcml(&self) -> &SrcmlConfig {
        &self.srcml
    }

    /// Returns the parsing options.
    pub fn options(&self) -> &SrcmlcppOptions {
        &self.options
    }

    /// Returns the parsing options, for adjustments after loading.
    pub fn options_mut(&mut self) -> &mut SrcmlcppOptions {
        &mut self.options
    }
}

/// How the `srcml` executable is invoked.
#[derive(Debug, Clone, Deserialize)]
pub struct SrcmlConfig {
    /// Path or name of the executable, looked up in `PATH` when relative.
    #[serde(default = "default_executable")]
    executable: String,
}

fn default_executable() -> String {
    "srcml".to_string()
}

impl Default for SrcmlConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
        }
    }
}

impl SrcmlConfig {
    /// Creates a new [`SrcmlConfig`] running `executable`.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Returns the executable name or path.
    pub fn executable(&self) -> &str {
        &self.executable
    }
}
