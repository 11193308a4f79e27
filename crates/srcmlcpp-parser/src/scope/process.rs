//! Identifier rewriting inside C++ code snippets.
//!
//! Type and value code (`std::vector<N::Foo>`, `N::Foo::Create()`) is split
//! into scoped identifiers (`N::Foo::Create`) and verbatim text. String
//! literals and `//` comments are kept verbatim.

use winnow::{
    Parser as _,
    combinator::{alt, opt, repeat},
    error::{ContextError, ErrMode},
    token::{any, take_till, take_while},
};

type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// A piece of C++ code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CodeToken<'s> {
    /// A possibly scoped identifier: `Foo`, `N::Foo`, `::Foo`.
    Identifier(&'s str),
    /// Anything else, reproduced as is.
    Verbatim(&'s str),
}

fn string_literal<'s>(input: &mut &'s str) -> IResult<&'s str> {
    ('"', take_till(0.., '"'), opt('"')).take().parse_next(input)
}

fn line_comment<'s>(input: &mut &'s str) -> IResult<&'s str> {
    ("//", take_till(0.., '\n'), opt('\n')).take().parse_next(input)
}

fn scoped_identifier<'s>(input: &mut &'s str) -> IResult<&'s str> {
    repeat::<_, _, (), _, _>(
        1..,
        alt((
            take_while(1.., |c: char| c.is_alphanumeric() || c == '_'),
            "::",
        )),
    )
    .take()
    .parse_next(input)
}

fn code_token<'s>(input: &mut &'s str) -> IResult<CodeToken<'s>> {
    alt((
        string_literal.map(CodeToken::Verbatim),
        line_comment.map(CodeToken::Verbatim),
        scoped_identifier.map(CodeToken::Identifier),
        any.take().map(CodeToken::Verbatim),
    ))
    .parse_next(input)
}

/// Split `code` into tokens. Concatenating the tokens gives back `code`.
pub(crate) fn tokenize(code: &str) -> Vec<CodeToken<'_>> {
    let mut input = code;
    let tokens: IResult<Vec<CodeToken<'_>>> = repeat(0.., code_token).parse_next(&mut input);
    match tokens {
        Ok(mut tokens) => {
            if !input.is_empty() {
                tokens.push(CodeToken::Verbatim(input));
            }
            tokens
        }
        Err(_) => vec![CodeToken::Verbatim(code)],
    }
}

fn rewrite_identifiers(code: &str, mut rewrite: impl FnMut(&str) -> String) -> String {
    let mut result = String::with_capacity(code.len());
    for token in tokenize(code) {
        match token {
            CodeToken::Identifier(identifier) => result.push_str(&rewrite(identifier)),
            CodeToken::Verbatim(text) => result.push_str(text),
        }
    }
    result
}

/// Qualify the identifiers of `code`.
///
/// `scope_prefixes` lists the prefixes of the current scope from the
/// innermost to the global one (`["A::B::", "A::", ""]`). An identifier is
/// replaced by the first `prefix + identifier` accepted by `is_known`.
/// Identifiers starting with `::` are already fully qualified.
pub fn qualify_code(code: &str, scope_prefixes: &[String], is_known: impl Fn(&str) -> bool) -> String {
    rewrite_identifiers(code, |identifier| {
        if identifier.starts_with("::") {
            return identifier.to_string();
        }
        scope_prefixes
            .iter()
            .map(|prefix| format!("{prefix}{identifier}"))
            .find(|candidate| is_known(candidate))
            .unwrap_or_else(|| identifier.to_string())
    })
}

/// Remove from `scoped_identifier` the scope levels implied by
/// `current_scope_prefix` (e.g. `N0::N1::N3::`).
///
/// ```
/// # use srcmlcpp_parser::scope::make_terse_scoped_identifier;
/// assert_eq!(make_terse_scoped_identifier("N0::N1::N2::S", "N0::N1::N3::"), "N2::S");
/// assert_eq!(make_terse_scoped_identifier("N3::E3", "N1::N3::"), "E3");
/// ```
pub fn make_terse_scoped_identifier(scoped_identifier: &str, current_scope_prefix: &str) -> String {
    let first_part = scoped_identifier.split("::").next().unwrap_or_default();
    let mut scope_parts: Vec<&str> = current_scope_prefix.split("::").collect();
    if let Some(idx) = scope_parts.iter().position(|part| *part == first_part) {
        scope_parts.drain(..idx);
    }

    let n = scope_parts.len();
    // Longest enclosing scope first: "N0::N1::N3::", "N0::N1::", "N0::".
    for i in 0..n {
        let extract = format!("{}::", scope_parts[..n - i].join("::"));
        if let Some(rest) = scoped_identifier.strip_prefix(extract.as_str()) {
            return rest.to_string();
        }
    }
    // Then the trailing parts: "N1::N3::", "N3::".
    for i in 0..n {
        let extract = format!("{}::", scope_parts[i..].join("::"));
        if let Some(rest) = scoped_identifier.strip_prefix(extract.as_str()) {
            return rest.to_string();
        }
    }
    scoped_identifier.to_string()
}

/// Apply [`make_terse_scoped_identifier`] to every identifier of `code`.
pub fn make_terse_code(code: &str, current_scope_prefix: &str) -> String {
    rewrite_identifiers(code, |identifier| {
        make_terse_scoped_identifier(identifier, current_scope_prefix)
    })
}

#[cfg(test)]
mod tests {
    use proptest::{prelude::*, test_runner::TestCaseError};

    use super::*;

    fn identifiers(code: &str) -> Vec<&str> {
        tokenize(code)
            .into_iter()
            .filter_map(|token| match token {
                CodeToken::Identifier(identifier) => Some(identifier),
                CodeToken::Verbatim(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_tokenize_identifiers() {
        assert_eq!(
            identifiers("std::vector<Main::Foo> = Main::Foo::Create(::x, 10)"),
            vec!["std::vector", "Main::Foo", "Main::Foo::Create", "::x", "10"]
        );
    }

    #[test]
    fn test_tokenize_skips_strings_and_comments() {
        assert_eq!(identifiers(r#"f("Foo::Bar baz") // Foo comment"#), vec!["f"]);
        assert_eq!(identifiers("a // b\nc"), vec!["a", "c"]);
        assert_eq!(identifiers(r#""// not a comment" d"#), vec!["d"]);
    }

    #[test]
    fn test_qualify_code_innermost_scope_wins() {
        let known = ["N::S", "N::M::S", "S"];
        let prefixes = vec!["N::M::".to_string(), "N::".to_string(), String::new()];
        let qualified = qualify_code("S s = S()", &prefixes, |c| known.contains(&c));
        assert_eq!(qualified, "N::M::S s = N::M::S()");
    }

    #[test]
    fn test_make_terse_scoped_identifier() {
        let cases = [
            ("N0::N1::N2::S2::s2", "N0::N1::N3::", "N2::S2::s2"),
            ("N0::N1::N3::S3", "N0::N1::N3::", "S3"),
            ("N3::E3", "N1::N3::", "E3"),
            ("N1::N2::S1", "N1::N2::S2::", "S1"),
            ("Other::Foo", "N1::", "Other::Foo"),
            ("::Foo", "", "Foo"),
            ("Foo", "", "Foo"),
        ];
        for (identifier, scope, expected) in cases {
            assert_eq!(
                make_terse_scoped_identifier(identifier, scope),
                expected,
                "{identifier} in {scope}"
            );
        }
    }

    #[test]
    fn test_make_terse_code() {
        assert_eq!(
            make_terse_code("N1::N2::S1 _s11 = N1::N2::S2::s1", "N1::N3::"),
            "N2::S1 _s11 = N2::S2::s1"
        );
        assert_eq!(make_terse_code(r#"f("N1::x")"#, "N1::"), r#"f("N1::x")"#);
    }

    // ===================
    // Property checks
    // ===================

    fn code_strategy() -> impl Strategy<Value = String> {
        proptest::string::string_regex(r#"[a-zA-Z0-9_:<>(), "/\n*&=]{0,40}"#)
            .unwrap_or_else(|e| panic!("invalid regex: {e}"))
    }

    fn check_tokens_concatenate_to_input(code: &str) -> Result<(), TestCaseError> {
        let rebuilt: String = tokenize(code)
            .into_iter()
            .map(|token| match token {
                CodeToken::Identifier(s) | CodeToken::Verbatim(s) => s,
            })
            .collect();
        prop_assert_eq!(rebuilt, code);
        Ok(())
    }

    fn check_qualify_without_identifiers_is_identity(code: &str) -> Result<(), TestCaseError> {
        let prefixes = vec!["A::".to_string(), String::new()];
        prop_assert_eq!(qualify_code(code, &prefixes, |_| false), code);
        Ok(())
    }

    fn check_terse_in_global_scope_only_strips_root(code: &str) -> Result<(), TestCaseError> {
        let terse = make_terse_code(code, "");
        prop_assert!(terse.len() <= code.len());
        Ok(())
    }

    proptest! {
        #[test]
        fn tokens_concatenate_to_input(code in code_strategy()) {
            check_tokens_concatenate_to_input(&code)?;
        }

        #[test]
        fn qualify_without_identifiers_is_identity(code in code_strategy()) {
            check_qualify_without_identifiers_is_identity(&code)?;
        }

        #[test]
        fn terse_in_global_scope_never_grows(code in code_strategy()) {
            check_terse_in_global_scope_only_strips_root(&code)?;
        }
    }
}
