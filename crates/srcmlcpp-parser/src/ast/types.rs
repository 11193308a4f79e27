//! C++ types as seen by srcML.

use regex::Regex;

use crate::template::CppTemplateSpecialization;

/// Specifiers that do not change a function return type.
const RETURN_TYPE_IGNORED_SPECIFIERS: [&str; 4] = ["inline", "virtual", "extern", "static"];

/// Modifiers accepted in a `<type>` element.
pub const AUTHORIZED_MODIFIERS: [&str; 4] = ["*", "&", "&&", "..."];

/// A full C++ type.
///
/// `typenames` may be composed (`["unsigned", "int"]`), inferred
/// (`["auto"]`) or hold a whole template type (`["std::map<int, Foo>"]`).
/// `specifiers` holds `const`, `inline`, `static`... and the API prefixes
/// found in return types. `modifiers` holds `*`, `&`, `&&` and `...`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppType {
    pub typenames: Vec<String>,
    pub specifiers: Vec<String>,
    pub modifiers: Vec<String>,
}

fn join_non_empty<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl CppType {
    pub fn from_typenames(typenames: &[&str]) -> Self {
        Self {
            typenames: typenames.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    /// The type as C++ code.
    ///
    /// A second `const` (as in `const char * const`) is moved after the
    /// modifiers.
    pub fn str_code(&self) -> String {
        let nb_const = self.specifiers.iter().filter(|s| *s == "const").count();
        let mut specifiers: Vec<&str> = self.specifiers.iter().map(String::as_str).collect();
        if nb_const >= 2 {
            if let Some(last) = specifiers.iter().rposition(|s| *s == "const") {
                specifiers.remove(last);
            }
        }
        let mut code = join_non_empty([
            join_non_empty(specifiers).as_str(),
            self.name_without_modifier_specifier().as_str(),
            join_non_empty(self.modifiers.iter().map(String::as_str)).as_str(),
        ]);
        if nb_const >= 2 {
            code.push_str(" const");
        }
        code
    }

    /// The type when used as a return type.
    ///
    /// Drops `inline`, `virtual`, `extern` and `static`, and the leading
    /// `auto` of arrow return types. Leading API prefixes are removed when
    /// `api_prefixes` is not empty.
    pub fn str_return_type(&self, api_prefixes: &[&str]) -> String {
        let specifiers = join_non_empty(
            self.specifiers
                .iter()
                .map(String::as_str)
                .filter(|s| !RETURN_TYPE_IGNORED_SPECIFIERS.contains(s)),
        );
        let name = if self.typenames.len() > 1 && self.typenames[0] == "auto" {
            self.typenames[1..].join(" ")
        } else {
            self.typenames.join(" ")
        };
        let modifiers = join_non_empty(self.modifiers.iter().map(String::as_str));
        let mut return_type = join_non_empty([specifiers.as_str(), name.as_str(), modifiers.as_str()]);
        for prefix in api_prefixes {
            if let Some(rest) = return_type.strip_prefix(prefix) {
                return_type = rest.trim_start().to_string();
            }
        }
        return_type
    }

    pub fn name_without_modifier_specifier(&self) -> String {
        self.typenames.join(" ")
    }

    pub fn is_const(&self) -> bool {
        self.has_specifier("const") || self.has_specifier("constexpr")
    }

    pub fn is_reference(&self) -> bool {
        self.has_modifier("&")
    }

    pub fn is_static(&self) -> bool {
        self.has_specifier("static")
    }

    pub fn is_raw_pointer(&self) -> bool {
        self.has_modifier("*")
    }

    pub fn is_void(&self) -> bool {
        self.typenames == ["void"] && self.specifiers.is_empty() && self.modifiers.is_empty()
    }

    pub fn is_inferred_type(&self) -> bool {
        self.typenames == ["auto"]
    }

    pub fn is_template(&self) -> bool {
        let joined = self.typenames.join(" ");
        joined.contains('<') && joined.contains('>')
    }

    /// `std::vector` for `std::vector<int>`.
    pub fn template_name(&self) -> Option<String> {
        if !self.is_template() {
            return None;
        }
        let joined = self.typenames.join(" ");
        joined.find('<').map(|pos| joined[..pos].to_string())
    }

    /// `int` for `std::vector<int>`, `std::pair<A, B>` for
    /// `std::vector<std::pair<A, B>>`.
    pub fn template_arguments_code(&self) -> Option<String> {
        if !self.is_template() {
            return None;
        }
        let joined = self.typenames.join(" ");
        let start = joined.find('<')?;
        let end = joined.rfind('>')?;
        (start < end).then(|| joined[start + 1..end].to_string())
    }

    pub fn has_specifier(&self, specifier: &str) -> bool {
        self.specifiers.iter().any(|s| s == specifier)
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    pub fn count_modifier(&self, modifier: &str) -> usize {
        self.modifiers.iter().filter(|m| *m == modifier).count()
    }

    /// Replace the template parameters named in `specs`.
    ///
    /// A typename equal to a parameter name is replaced as a whole; other
    /// typenames have the parameter replaced as a word (`vector<T>`).
    /// Returns `None` when the type does not use any of the parameters.
    ///
    /// # Panics
    ///
    /// Panics if a specialization type has more than one typename.
    pub fn with_specialized_template(&self, specs: &CppTemplateSpecialization) -> Option<CppType> {
        let mut new_type = self.clone();
        let mut was_changed = false;
        for spec in &specs.specializations {
            assert!(
                spec.cpp_type.typenames.len() == 1,
                "template specialization types must have exactly one typename, got {:?}",
                spec.cpp_type.typenames
            );
            let spec_code = spec.cpp_type.str_code();
            let word = if spec.template_name.is_empty() {
                None
            } else {
                Regex::new(&format!(r"\b{}\b", regex::escape(&spec.template_name))).ok()
            };
            for typename in new_type.typenames.iter_mut() {
                if *typename == spec.template_name {
                    *typename = spec_code.clone();
                    was_changed = true;
                } else if let Some(re) = &word {
                    if re.is_match(typename) {
                        *typename = re.replace_all(typename, regex::NoExpand(&spec_code)).into_owned();
                        was_changed = true;
                    }
                }
            }
        }
        was_changed.then_some(new_type)
    }
}

impl std::fmt::Display for CppType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.str_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::CppTemplateSpecializationPart;

    fn ty(specifiers: &[&str], typenames: &[&str], modifiers: &[&str]) -> CppType {
        CppType {
            typenames: typenames.iter().map(|s| s.to_string()).collect(),
            specifiers: specifiers.iter().map(|s| s.to_string()).collect(),
            modifiers: modifiers.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_str_code() {
        assert_eq!(ty(&["const"], &["char"], &["*"]).str_code(), "const char *");
        assert_eq!(ty(&["const", "const"], &["char"], &["*"]).str_code(), "const char * const");
        assert_eq!(ty(&[], &["unsigned", "int"], &[]).str_code(), "unsigned int");
        assert_eq!(ty(&[], &[], &["..."]).str_code(), "...");
    }

    #[test]
    fn test_str_return_type() {
        let t = ty(&["MY_API", "inline", "static"], &["int"], &["*"]);
        assert_eq!(t.str_return_type(&["MY_API"]), "int *");
        assert_eq!(t.str_return_type(&[]), "MY_API int *");
        assert_eq!(ty(&[], &["auto", "int"], &[]).str_return_type(&[]), "int");
        assert_eq!(ty(&[], &["auto"], &[]).str_return_type(&[]), "auto");
    }

    #[test]
    fn test_predicates() {
        assert!(ty(&[], &["void"], &[]).is_void());
        assert!(!ty(&[], &["void"], &["*"]).is_void());
        assert!(ty(&["constexpr"], &["int"], &[]).is_const());
        assert!(ty(&[], &["int"], &["&"]).is_reference());
        assert!(ty(&[], &["int"], &["*"]).is_raw_pointer());
        assert!(ty(&[], &["auto"], &[]).is_inferred_type());

        let vector = ty(&[], &["std::vector<std::pair<int, float>>"], &[]);
        assert!(vector.is_template());
        assert_eq!(vector.template_name().as_deref(), Some("std::vector"));
        assert_eq!(vector.template_arguments_code().as_deref(), Some("std::pair<int, float>"));
        assert_eq!(ty(&[], &["int"], &[]).template_name(), None);
    }

    #[test]
    fn test_with_specialized_template() {
        let specs = CppTemplateSpecialization {
            specializations: vec![CppTemplateSpecializationPart {
                template_name: "T".to_string(),
                cpp_type: ty(&["const"], &["int"], &[]),
            }],
        };
        let direct = ty(&[], &["T"], &["*"]).with_specialized_template(&specs);
        assert_eq!(direct.map(|t| t.str_code()).as_deref(), Some("const int *"));

        let nested = ty(&[], &["std::vector<T>"], &[]).with_specialized_template(&specs);
        assert_eq!(nested.map(|t| t.str_code()).as_deref(), Some("std::vector<const int>"));

        assert_eq!(ty(&[], &["Tint"], &[]).with_specialized_template(&specs), None);
    }

    #[test]
    fn test_with_specialized_template_several_parameters() {
        let specs = CppTemplateSpecialization {
            specializations: vec![
                CppTemplateSpecializationPart {
                    template_name: "K".to_string(),
                    cpp_type: ty(&[], &["int"], &[]),
                },
                CppTemplateSpecializationPart {
                    template_name: "V".to_string(),
                    cpp_type: ty(&[], &["double"], &[]),
                },
            ],
        };
        let map = ty(&["const"], &["std::map<K, V>"], &["&"]).with_specialized_template(&specs);
        assert_eq!(map.map(|t| t.str_code()).as_deref(), Some("const std::map<int, double> &"));

        let value = ty(&[], &["V"], &[]).with_specialized_template(&specs);
        assert_eq!(value.map(|t| t.str_code()).as_deref(), Some("double"));

        assert_eq!(ty(&[], &["Key", "Value"], &[]).with_specialized_template(&specs), None);
    }
}
