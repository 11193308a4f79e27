//! srcmlcpp - Parse C++ headers into a typed, navigable AST through srcML.
//!
//! C++ code is converted to srcML by the `srcml` executable, then parsed
//! into a [`CppUnit`]: an arena of typed elements with their comments,
//! scopes and source positions. Elements that srcmlcpp does not understand
//! are kept verbatim and reported as diagnostics on the unit.

pub mod config;

mod error;
mod srcml_exe;

pub use srcmlcpp_core::{Position, Span, XmlNode, xml};
pub use srcmlcpp_parser::{
    ast, comments, error as diagnostics, scope, template, CppNode, CppUnit, NodeId, SrcmlError, SrcmlService,
    SrcmlcppOptions,
};

pub use error::SrcmlcppError;
pub use srcml_exe::SrcmlExecutable;

use std::{fs, path::Path};

use log::{debug, info};

use srcmlcpp_parser::{
    ast::{CppAccessType, CppType},
    comments::{CppElementComments, mark_empty_lines, remove_empty_line_markers},
};

use config::AppConfig;

/// Builder for converting and parsing C++ code.
///
/// Holds the parsing options and the [`SrcmlService`] doing the conversions
/// to and from srcML.
///
/// # Examples
///
/// ```rust,no_run
/// use srcmlcpp::{UnitBuilder, config::AppConfig};
///
/// let builder = UnitBuilder::new(AppConfig::default());
///
/// let unit = builder
///     .code_to_cpp_unit("struct Foo { int a; };", None)
///     .expect("Failed to parse");
/// println!("{}", unit.hierarchy_overview(unit.root()));
///
/// // Or use default config
/// let builder = UnitBuilder::default();
/// ```
pub struct UnitBuilder {
    options: SrcmlcppOptions,
    service: Box<dyn SrcmlService>,
}

impl Default for UnitBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl UnitBuilder {
    /// Create a builder running the `srcml` executable described by `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including srcML and parsing settings
    pub fn new(config: AppConfig) -> Self {
        let options = config.options().clone();
        let service = SrcmlExecutable::new(config.srcml(), options.encoding.clone());
        Self::with_service(options, service)
    }

    /// Create a builder with a custom srcML service.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use srcmlcpp::{SrcmlcppOptions, SrcmlExecutable, UnitBuilder, config::SrcmlConfig};
    ///
    /// let service = SrcmlExecutable::new(&SrcmlConfig::new("/opt/srcml/bin/srcml"), "utf-8");
    /// let builder = UnitBuilder::with_service(SrcmlcppOptions::default(), service);
    /// ```
    pub fn with_service(options: SrcmlcppOptions, service: impl SrcmlService + 'static) -> Self {
        Self {
            options,
            service: Box::new(service),
        }
    }

    /// Returns the parsing options.
    pub fn options(&self) -> &SrcmlcppOptions {
        &self.options
    }

    /// Returns the srcML service.
    pub fn service(&self) -> &dyn SrcmlService {
        self.service.as_ref()
    }

    /// Convert C++ code to a srcML `<unit>`, as the parser would see it.
    ///
    /// The code goes through `code_preprocess_function`, and its empty
    /// lines are marked when `preserve_empty_lines` is set.
    ///
    /// # Errors
    ///
    /// Returns `SrcmlcppError::Srcml` when the conversion fails.
    pub fn code_to_srcml(&self, code: &str) -> Result<XmlNode, SrcmlcppError> {
        let mut code = self.options.preprocess_code(code);
        if self.options.preserve_empty_lines {
            code = mark_empty_lines(&code);
        }
        Ok(self.service.source_to_xml(&code, self.options.dump_positions)?)
    }

    /// Convert a srcML element back to C++ code.
    ///
    /// The empty line markers are removed when `preserve_empty_lines` is set.
    ///
    /// # Errors
    ///
    /// Returns `SrcmlcppError::Srcml` when the conversion fails.
    pub fn srcml_to_code(&self, element: &XmlNode) -> Result<String, SrcmlcppError> {
        let code = self.service.xml_to_source(element)?;
        if self.options.preserve_empty_lines {
            Ok(remove_empty_line_markers(&code))
        } else {
            Ok(code)
        }
    }

    /// Parse C++ code into a unit.
    ///
    /// # Arguments
    ///
    /// * `code` - C++ source code
    /// * `filename` - Name used in diagnostics, if the code comes from a file
    ///
    /// # Errors
    ///
    /// Returns `SrcmlcppError` when srcML fails or the unit cannot be built.
    /// Problems with single elements are reported in
    /// [`CppUnit::diagnostics`] instead.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use srcmlcpp::UnitBuilder;
    ///
    /// let builder = UnitBuilder::default();
    /// let unit = builder.code_to_cpp_unit("int add(int a, int b);", Some("math.h"))
    ///     .expect("Failed to parse");
    /// for diagnostic in unit.diagnostics() {
    ///     eprintln!("{diagnostic}");
    /// }
    /// ```
    pub fn code_to_cpp_unit(&self, code: &str, filename: Option<&str>) -> Result<CppUnit, SrcmlcppError> {
        info!(file = filename.unwrap_or("<code>"); "Parsing C++ code");
        srcmlcpp_parser::code_to_unit(code, filename, self.options.clone(), self.service())
            .map_err(|err| SrcmlcppError::new_parse_error(err, filename))
    }

    /// Read and parse a C++ file.
    ///
    /// # Errors
    ///
    /// Returns `SrcmlcppError::Io` when the file cannot be read, and the
    /// errors of [`code_to_cpp_unit`](Self::code_to_cpp_unit).
    pub fn file_to_cpp_unit(&self, path: impl AsRef<Path>) -> Result<CppUnit, SrcmlcppError> {
        let path = path.as_ref();
        let code = fs::read_to_string(path)?;
        let filename = path.to_string_lossy();
        self.code_to_cpp_unit(&code, Some(&filename))
    }

    /// Parse `code` and find its first top-level element accepted by `is_kind`.
    fn code_first_child(
        &self,
        code: &str,
        kind: &'static str,
        is_kind: fn(&CppNode) -> bool,
    ) -> Result<(CppUnit, NodeId), SrcmlcppError> {
        let unit = self.code_to_cpp_unit(code, None)?;
        let found = unit
            .block_children(unit.root())
            .iter()
            .copied()
            .find(|id| is_kind(unit.node(*id)));
        match found {
            Some(id) => Ok((unit, id)),
            None => Err(SrcmlcppError::NotFound {
                kind,
                code: code.to_string(),
            }),
        }
    }

    /// The first top-level function declaration, or function definition.
    ///
    /// The element is returned with the unit owning it.
    ///
    /// # Errors
    ///
    /// Returns `SrcmlcppError::NotFound` when the code has no function.
    pub fn code_first_function_decl(&self, code: &str) -> Result<(CppUnit, NodeId), SrcmlcppError> {
        self.code_first_child(code, "CppFunctionDecl", |node| {
            matches!(node, CppNode::FunctionDecl(_) | CppNode::Function(_))
        })
    }

    /// The first top-level struct or class.
    pub fn code_first_struct(&self, code: &str) -> Result<(CppUnit, NodeId), SrcmlcppError> {
        self.code_first_child(code, "CppStruct", CppNode::is_struct)
    }

    /// The first top-level enum.
    pub fn code_first_enum(&self, code: &str) -> Result<(CppUnit, NodeId), SrcmlcppError> {
        self.code_first_child(code, "CppEnum", |node| matches!(node, CppNode::Enum(_)))
    }

    /// The first top-level declaration statement.
    pub fn code_first_decl_statement(&self, code: &str) -> Result<(CppUnit, NodeId), SrcmlcppError> {
        self.code_first_child(code, "CppDeclStatement", |node| {
            matches!(node, CppNode::DeclStatement(_))
        })
    }

    /// The first declaration of the first top-level declaration statement:
    /// `a` in `int a = 1, b;`.
    pub fn code_first_decl(&self, code: &str) -> Result<(CppUnit, NodeId), SrcmlcppError> {
        let (unit, decl_statement) = self.code_first_decl_statement(code)?;
        match unit.decl_statement_decls(decl_statement).first().copied() {
            Some(decl) => Ok((unit, decl)),
            None => Err(SrcmlcppError::NotFound {
                kind: "CppDecl",
                code: code.to_string(),
            }),
        }
    }

    /// Parse a type, such as `const std::vector<int> &`.
    ///
    /// # Errors
    ///
    /// Returns `SrcmlcppError::NotFound` when the code is not a type.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use srcmlcpp::UnitBuilder;
    ///
    /// let builder = UnitBuilder::default();
    /// let cpp_type = builder.code_to_cpp_type("const std::string &").expect("Failed to parse");
    /// assert!(cpp_type.is_const());
    /// ```
    pub fn code_to_cpp_type(&self, code: &str) -> Result<CppType, SrcmlcppError> {
        let code_with_variable = format!("{code} dummy;");
        let (unit, decl) = self.code_first_decl(&code_with_variable)?;
        unit.decl_type(decl)
            .cloned()
            .ok_or_else(|| SrcmlcppError::NotFound {
                kind: "CppType",
                code: code.to_string(),
            })
    }

    /// The type argument of a template type with a single argument:
    /// `int` for `std::vector<int>`.
    ///
    /// Returns `None` for types that are not templates, for templates with
    /// several arguments such as `std::map<int, double>`, and when the
    /// argument cannot be parsed.
    pub fn template_instantiated_unique_type(&self, cpp_type: &CppType) -> Option<CppType> {
        let arguments = cpp_type.template_arguments_code()?;
        if has_top_level_comma(&arguments) {
            return None;
        }
        match self.code_to_cpp_type(&arguments) {
            Ok(argument) => Some(argument),
            Err(err) => {
                debug!(arguments = arguments.as_str(), err:% = err; "Template argument is not a type");
                None
            }
        }
    }

    /// Parse a method declaration and add it to a struct, in the last
    /// section with the given access (created if needed).
    ///
    /// # Arguments
    ///
    /// * `unit` - Unit owning the struct
    /// * `struct_id` - A struct or class of `unit`
    /// * `code` - Declaration of the method, such as `void Foo(int a);`
    /// * `access_type` - Access of the section receiving the method
    /// * `comments` - Comments of the new method; those in `code` otherwise
    ///
    /// # Errors
    ///
    /// Returns `SrcmlcppError::NotFound` when `code` holds no function or
    /// `struct_id` is not a struct.
    pub fn add_method(
        &self,
        unit: &mut CppUnit,
        struct_id: NodeId,
        code: &str,
        access_type: CppAccessType,
        comments: Option<CppElementComments>,
    ) -> Result<NodeId, SrcmlcppError> {
        if !unit.node(struct_id).is_struct() {
            return Err(SrcmlcppError::NotFound {
                kind: "CppStruct",
                code: unit.str_code(struct_id),
            });
        }
        let (method_unit, function) = self.code_first_function_decl(code)?;
        let method = unit.import_subtree(&method_unit, function);
        if let Some(comments) = comments {
            *unit.comments_mut(method) = comments;
        }
        unit.add_method(struct_id, method, access_type)
            .ok_or_else(|| SrcmlcppError::NotFound {
                kind: "CppStruct",
                code: unit.str_code(struct_id),
            })
    }
}

/// Whether `code` has a comma outside of any `<>`, `()`, `[]` or `{}`.
fn has_top_level_comma(code: &str) -> bool {
    let mut depth = 0usize;
    for c in code.chars() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}
