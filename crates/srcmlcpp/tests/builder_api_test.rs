//! Integration tests for the UnitBuilder API
//!
//! srcML is replaced by canned conversions, so that these tests do not
//! need the `srcml` executable.

use std::{collections::HashMap, fs};

use srcmlcpp::{
    CppNode, SrcmlError, SrcmlService, SrcmlcppError, SrcmlcppOptions, UnitBuilder, XmlNode,
    ast::{CppAccessType, CppType},
    comments::{CppElementComments, EMPTY_LINE_COMMENT},
    config::AppConfig,
    xml::parse_document,
};

const FUNCTION_DECL: &str = r#"<function_decl><type><name>int</name></type> <name>add</name><parameter_list>(<parameter><decl><type><name>int</name></type> <name>a</name></decl></parameter>, <parameter><decl><type><name>int</name></type> <name>b</name></decl></parameter>)</parameter_list>;</function_decl>"#;

const EMPTY_STRUCT: &str = r#"<struct>struct <name>Foo</name> <block>{<public type="default">
</public>}</block>;</struct>"#;

fn unit_xml(body: &str) -> String {
    format!(
        r#"<unit xmlns="http://www.srcML.org/srcML/src" xmlns:cpp="http://www.srcML.org/srcML/cpp" revision="1.0.0" language="C++">{body}</unit>"#
    )
}

#[derive(Default)]
struct FakeSrcml {
    conversions: HashMap<String, String>,
}

impl FakeSrcml {
    fn with(mut self, code: &str, body: &str) -> Self {
        self.conversions.insert(code.to_string(), body.to_string());
        self
    }
}

impl SrcmlService for FakeSrcml {
    fn source_to_xml(&self, code: &str, _emit_positions: bool) -> Result<XmlNode, SrcmlError> {
        let body = self
            .conversions
            .get(code)
            .ok_or_else(|| SrcmlError::Unavailable(code.to_string()))?;
        Ok(parse_document(&unit_xml(body))?)
    }

    fn xml_to_source(&self, node: &XmlNode) -> Result<String, SrcmlError> {
        Ok(node.verbatim())
    }
}

fn builder(service: FakeSrcml) -> UnitBuilder {
    UnitBuilder::with_service(SrcmlcppOptions::default(), service)
}

#[test]
fn test_builder_api_exists() {
    let _builder = UnitBuilder::default();
    let _builder = UnitBuilder::new(AppConfig::default());
}

#[test]
fn test_code_first_function_decl() {
    let code = "int add(int a, int b);";
    let builder = builder(FakeSrcml::default().with(code, FUNCTION_DECL));

    let (unit, add) = builder.code_first_function_decl(code).expect("Failed to parse");
    assert!(matches!(unit.node(add), CppNode::FunctionDecl(_)));
    assert_eq!(unit.str_code(add), "int add(int a, int b);");
}

#[test]
fn test_code_first_child_not_found() {
    let code = "int add(int a, int b);";
    let builder = builder(FakeSrcml::default().with(code, FUNCTION_DECL));

    let result = builder.code_first_struct(code);
    assert!(
        matches!(result, Err(SrcmlcppError::NotFound { kind: "CppStruct", .. })),
        "Expected NotFound, got {:?}",
        result.map(|(_, id)| id)
    );
}

#[test]
fn test_missing_conversion_is_an_error() {
    let builder = builder(FakeSrcml::default());
    let result = builder.code_to_cpp_unit("int a;", Some("a.h"));
    match result {
        Err(SrcmlcppError::Parse { filename, .. }) => assert_eq!(filename.as_deref(), Some("a.h")),
        other => panic!("Expected a parse error, got {:?}", other.map(|unit| unit.len())),
    }
}

#[test]
fn test_code_to_cpp_type() {
    let builder = builder(FakeSrcml::default().with(
        "const std::string & dummy;",
        r#"<decl_stmt><decl><type><specifier>const</specifier> <name><name>std</name><operator>::</operator><name>string</name></name> <modifier>&amp;</modifier></type> <name>dummy</name></decl>;</decl_stmt>"#,
    ));

    let cpp_type = builder.code_to_cpp_type("const std::string &").expect("Failed to parse type");
    assert!(cpp_type.is_const());
    assert!(cpp_type.is_reference());
    assert_eq!(cpp_type.str_code(), "const std::string &");
}

#[test]
fn test_template_instantiated_unique_type() {
    let builder = builder(FakeSrcml::default().with(
        "int dummy;",
        r#"<decl_stmt><decl><type><name>int</name></type> <name>dummy</name></decl>;</decl_stmt>"#,
    ));

    let vector = CppType::from_typenames(&["std::vector<int>"]);
    let argument = builder
        .template_instantiated_unique_type(&vector)
        .expect("Expected a template argument");
    assert_eq!(argument.str_code(), "int");

    let map = CppType::from_typenames(&["std::map<int, double>"]);
    assert_eq!(builder.template_instantiated_unique_type(&map), None);

    let plain = CppType::from_typenames(&["int"]);
    assert_eq!(builder.template_instantiated_unique_type(&plain), None);
}

#[test]
fn test_add_method() {
    let struct_code = "struct Foo {\n};";
    let method_code = "int add(int a, int b);";
    let builder = builder(
        FakeSrcml::default()
            .with(struct_code, EMPTY_STRUCT)
            .with(method_code, FUNCTION_DECL),
    );

    let (mut unit, foo) = builder.code_first_struct(struct_code).expect("Failed to parse struct");
    assert!(unit.get_methods(foo).is_empty());

    let comments = CppElementComments {
        comment_on_previous_lines: "Adds two numbers".to_string(),
        ..Default::default()
    };
    let method = builder
        .add_method(&mut unit, foo, method_code, CppAccessType::Public, Some(comments))
        .expect("Failed to add method");

    assert_eq!(unit.get_methods(foo), vec![method]);
    assert_eq!(unit.parent_struct_if_method(method), Some(foo));
    assert_eq!(unit.comments(method).comment_on_previous_lines, "Adds two numbers");
    assert_eq!(unit.str_code(method), "int add(int a, int b);");

    // No private section yet: one is created
    let private_method = builder
        .add_method(&mut unit, foo, method_code, CppAccessType::Private, None)
        .expect("Failed to add method");
    assert_eq!(unit.get_access_blocks(foo, Some(CppAccessType::Private)).len(), 1);
    assert_eq!(unit.get_methods(foo), vec![method, private_method]);
}

#[test]
fn test_empty_lines_are_marked_and_removed() {
    let marked = format!("int a;\n{EMPTY_LINE_COMMENT}\nint b;");
    let builder = builder(FakeSrcml::default().with(&marked, "int a;\n<comment type=\"line\">// _SRCML_EMPTY_LINE_</comment>\nint b;"));

    let xml = builder.code_to_srcml("int a;\n\nint b;").expect("Failed to convert");
    assert_eq!(xml.verbatim(), marked);

    let code = builder.srcml_to_code(&xml).expect("Failed to convert back");
    assert_eq!(code, "int a;\nint b;");
}

#[test]
fn test_file_to_cpp_unit() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("math.h");
    fs::write(&path, "int add(int a, int b);").expect("Failed to write header");

    let builder = builder(FakeSrcml::default().with("int add(int a, int b);", FUNCTION_DECL));
    let unit = builder.file_to_cpp_unit(&path).expect("Failed to parse file");
    assert_eq!(unit.filename(), Some(path.to_string_lossy().as_ref()));
    assert_eq!(unit.all_functions_recursive(unit.root()).len(), 1);
}
