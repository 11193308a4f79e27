//! Collector for accumulating the warnings of one parse.
//!
//! Warnings silenced by the options (`flag_quiet`, `ignored_warnings`,
//! `ignored_warning_parts`) are dropped here; the others are kept on the unit.

use log::debug;

use crate::{
    error::{Diagnostic, WarningType},
    options::SrcmlcppOptions,
};

#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    quiet: bool,
    ignored_warnings: Vec<WarningType>,
    ignored_warning_parts: Vec<String>,
}

impl DiagnosticCollector {
    /// Create a collector applying the silencing options.
    pub fn new(options: &SrcmlcppOptions) -> Self {
        Self {
            diagnostics: Vec::new(),
            quiet: options.flag_quiet,
            ignored_warnings: options.ignored_warnings.clone(),
            ignored_warning_parts: options.ignored_warning_parts.clone(),
        }
    }

    /// Whether a warning with this category and message would be dropped.
    pub fn is_silenced(&self, warning_type: WarningType, message: &str) -> bool {
        self.quiet
            || self.ignored_warnings.contains(&warning_type)
            || self
                .ignored_warning_parts
                .iter()
                .any(|part| message.contains(part.as_str()))
    }

    /// Emit a diagnostic to this collector.
    ///
    /// Returns `false` if the diagnostic was silenced.
    pub fn emit(&mut self, diagnostic: Diagnostic) -> bool {
        if diagnostic.severity().is_warning()
            && self.is_silenced(diagnostic.warning_type(), diagnostic.message())
        {
            debug!(warning_type:? = diagnostic.warning_type(); "Warning silenced");
            return false;
        }
        debug!(warning_type:? = diagnostic.warning_type(); "{}", diagnostic.message());
        self.diagnostics.push(diagnostic);
        true
    }

    /// Move the collected diagnostics into `target`.
    pub fn drain_into(&mut self, target: &mut Vec<Diagnostic>) {
        target.append(&mut self.diagnostics);
    }
}
