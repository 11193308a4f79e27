//! Options controlling how C++ code is turned into an AST.
//!
//! [`SrcmlcppOptions`] implements [`serde::Deserialize`] with defaults for
//! every field, so it can be loaded from a partial TOML table.
//!
//! # Example
//!
//! ```
//! # use srcmlcpp_parser::options::SrcmlcppOptions;
//! let options: SrcmlcppOptions = SrcmlcppOptions {
//!     functions_api_prefixes: "MY_API|OTHER_API".to_string(),
//!     ..SrcmlcppOptions::default()
//! };
//! assert_eq!(options.functions_api_prefixes_list(), vec!["MY_API", "OTHER_API"]);
//! ```

use std::{collections::HashMap, fmt, rc::Rc};

use regex::Regex;
use serde::Deserialize;

use crate::error::WarningType;

/// Hook applied to the C++ code before it is sent to srcML.
pub type CodePreprocessFn = Rc<dyn Fn(&str) -> String>;

/// Default regex of the preprocessor names whose regions are kept when
/// filtering preprocessor regions (header guards and `__cplusplus`).
pub const DEFAULT_ACCEPTABLE_REGEX: &str = "__cplusplus|_h_$|_h$|_H$|_H_$|hpp$|HPP$|hxx$|HXX$";

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SrcmlcppOptions {
    /// Prefixes that denote exported functions (e.g. `MY_API`, defined as
    /// `__declspec(dllexport)` on windows). Several prefixes are separated
    /// by `|`. They are moved into the return type specifiers.
    pub functions_api_prefixes: String,

    /// Values of macros or constexpr used as numbers or sizes, for example
    /// `{ "SPACE_DIMENSIONS" = 3 }`.
    pub named_number_macros: HashMap<String, i64>,

    /// Exclude the regions guarded by `#ifdef SOME_OPTION` / `#endif`.
    pub header_filter_preprocessor_regions: bool,

    /// Names of preprocessor tests whose regions are kept when filtering
    /// (header guards, `__cplusplus`). Alternatives are separated by `|`.
    pub header_filter_acceptable_regex: String,

    /// Encoding of the C++ files.
    pub encoding: String,

    /// Keep empty lines as `CppEmptyLine` elements.
    pub preserve_empty_lines: bool,

    /// Ask srcML to emit `pos:start` / `pos:end` attributes (recommended).
    pub dump_positions: bool,

    /// Indentation used when rendering code.
    pub indent_cpp_str: String,

    /// Discard every warning.
    pub flag_quiet: bool,

    /// Warning categories that are discarded.
    pub ignored_warnings: Vec<WarningType>,

    /// Warnings whose message contains one of these parts are discarded.
    pub ignored_warning_parts: Vec<String>,

    /// Work around srcML parsing `void f(V v = {1, 2});` as a variable.
    pub fix_brace_init_default_value: bool,

    /// Custom preprocessing of the code before parsing.
    #[serde(skip)]
    pub code_preprocess_function: Option<CodePreprocessFn>,
}

impl Default for SrcmlcppOptions {
    fn default() -> Self {
        Self {
            functions_api_prefixes: String::new(),
            named_number_macros: HashMap::new(),
            header_filter_preprocessor_regions: false,
            header_filter_acceptable_regex: DEFAULT_ACCEPTABLE_REGEX.to_string(),
            encoding: "utf-8".to_string(),
            preserve_empty_lines: true,
            dump_positions: true,
            indent_cpp_str: "    ".to_string(),
            flag_quiet: false,
            ignored_warnings: Vec::new(),
            ignored_warning_parts: Vec::new(),
            fix_brace_init_default_value: true,
            code_preprocess_function: None,
        }
    }
}

impl fmt::Debug for SrcmlcppOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SrcmlcppOptions")
            .field("functions_api_prefixes", &self.functions_api_prefixes)
            .field("named_number_macros", &self.named_number_macros)
            .field(
                "header_filter_preprocessor_regions",
                &self.header_filter_preprocessor_regions,
            )
            .field(
                "header_filter_acceptable_regex",
                &self.header_filter_acceptable_regex,
            )
            .field("encoding", &self.encoding)
            .field("preserve_empty_lines", &self.preserve_empty_lines)
            .field("dump_positions", &self.dump_positions)
            .field("indent_cpp_str", &self.indent_cpp_str)
            .field("flag_quiet", &self.flag_quiet)
            .field("ignored_warnings", &self.ignored_warnings)
            .field("ignored_warning_parts", &self.ignored_warning_parts)
            .field(
                "fix_brace_init_default_value",
                &self.fix_brace_init_default_value,
            )
            .field(
                "code_preprocess_function",
                &self.code_preprocess_function.as_ref().map(|_| "<fn>"),
            )
            .finish()
    }
}

impl SrcmlcppOptions {
    /// The API prefixes, split on `|`.
    pub fn functions_api_prefixes_list(&self) -> Vec<&str> {
        split_by_pipe(&self.functions_api_prefixes)
    }

    /// Compile [`header_filter_acceptable_regex`](Self::header_filter_acceptable_regex).
    pub fn acceptable_regex(&self) -> Result<Regex, regex::Error> {
        Regex::new(&self.header_filter_acceptable_regex)
    }

    /// Parse an integer, falling back to [`named_number_macros`](Self::named_number_macros).
    pub fn int_from_str_or_named_number_macros(&self, value: &str) -> Option<i64> {
        value
            .trim()
            .parse()
            .ok()
            .or_else(|| self.named_number_macros.get(value.trim()).copied())
    }

    /// Apply [`code_preprocess_function`](Self::code_preprocess_function), if any.
    pub fn preprocess_code(&self, code: &str) -> String {
        match &self.code_preprocess_function {
            Some(preprocess) => preprocess(code),
            None => code.to_string(),
        }
    }
}

fn split_by_pipe(s: &str) -> Vec<&str> {
    s.split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}
