//! Removal of the code inside preprocessor regions.
//!
//! Bindings are generated for the code that is always compiled. Regions
//! guarded by `#ifdef SOME_OPTION` are dropped, while the body of a header
//! inclusion guard (`#ifndef MY_HEADER_H`) is kept: a region is kept when
//! every name tested by the enclosing directives matches the acceptable
//! regex.

use std::rc::Rc;

use log::{debug, trace};
use regex::Regex;

use srcmlcpp_core::XmlNode;

/// Tags of the preprocessor directives handled by the filter.
const DIRECTIVE_TAGS: [&str; 6] = ["if", "ifdef", "ifndef", "else", "elif", "endif"];

/// Whether `node` is a preprocessor conditional (`#if`, `#ifdef`, ..., `#endif`).
pub(crate) fn is_conditional_directive(node: &XmlNode) -> bool {
    node.name().starts_with("cpp:") && DIRECTIVE_TAGS.contains(&node.tag())
}

/// Return a copy of `unit` without the children located in excluded
/// preprocessor regions.
///
/// Only the direct children of `unit` are filtered. The conditional
/// directives are removed as well, together with a comment placed on the
/// same line as the last directive (`#endif // SOME_OPTION`). `unit` is left
/// untouched; the kept children are shared with it.
pub fn filter_preprocessor_regions(unit: &XmlNode, acceptable: &Regex) -> XmlNode {
    let mut state = RegionState::new(acceptable);
    let mut kept = Vec::with_capacity(unit.children().len());
    let mut removed = 0usize;

    for child in unit.children() {
        state.process(child);
        if state.shall_ignore() || is_conditional_directive(child) {
            trace!(tag = child.tag(); "Filtered out by preprocessor regions");
            removed += 1;
        } else {
            kept.push(Rc::clone(child));
        }
    }

    debug!(removed = removed, kept = kept.len(); "Filtered preprocessor regions");
    let mut filtered = unit.clone();
    filtered.set_children(kept);
    filtered
}

/// Scanner state over the children of a unit.
struct RegionState<'a> {
    acceptable: &'a Regex,
    /// Names tested by the currently open `#if*` directives.
    tested_names: Vec<String>,
    /// End line of the last directive.
    last_directive_line: Option<u32>,
    /// The last child was an `#endif` closing an excluded region.
    closed_excluded_region: bool,
    last_element: Option<Rc<XmlNode>>,
}

impl<'a> RegionState<'a> {
    fn new(acceptable: &'a Regex) -> Self {
        Self {
            acceptable,
            tested_names: Vec::new(),
            last_directive_line: None,
            closed_excluded_region: false,
            last_element: None,
        }
    }

    fn process(&mut self, element: &Rc<XmlNode>) {
        self.last_element = Some(Rc::clone(element));

        let Some(end) = element.end() else {
            return;
        };
        let line = end.line();
        let is_directive = is_conditional_directive(element);

        self.closed_excluded_region = false;
        if !is_directive {
            return;
        }
        match element.tag() {
            "if" | "ifdef" | "ifndef" => {
                self.last_directive_line = Some(line);
                self.tested_names.push(tested_name(element));
            }
            "endif" => {
                if self.has_excluded_name() {
                    self.closed_excluded_region = true;
                }
                self.last_directive_line = Some(line);
                // `extern "C"` blocks may interleave with the directives, so
                // an `#endif` can come without its opening `#if`.
                self.tested_names.pop();
            }
            _ => self.last_directive_line = Some(line),
        }
        trace!(line = line, open = self.tested_names.len(); "Preprocessor directive");
    }

    fn has_excluded_name(&self) -> bool {
        self.tested_names
            .iter()
            .any(|name| !self.acceptable.is_match(name))
    }

    fn shall_ignore(&self) -> bool {
        if self.closed_excluded_region {
            return true;
        }
        let trails_directive = self.last_element.as_ref().is_some_and(|last| {
            last.tag() == "comment"
                && self.last_directive_line.is_some()
                && last.start().map(|p| p.line()) == self.last_directive_line
        });
        trails_directive || self.has_excluded_name()
    }
}

/// Text of the `<name>` child of a directive, empty for expressions such as
/// `#if defined(A) && B`.
fn tested_name(directive: &XmlNode) -> String {
    directive
        .child_with_tag("name")
        .and_then(|name| name.text())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(node: XmlNode, line: u32) -> XmlNode {
        node.with_attribute("pos:start", format!("{line}:1"))
            .with_attribute("pos:end", format!("{line}:40"))
            .with_tail("\n")
    }

    fn directive(kind: &str, name: Option<&str>, line: u32) -> XmlNode {
        let mut node = XmlNode::new(format!("cpp:{kind}"))
            .with_text("#")
            .with_child(XmlNode::new("cpp:directive").with_text(kind));
        if let Some(name) = name {
            node = node.with_child(XmlNode::new("name").with_text(name));
        }
        at(node, line)
    }

    fn comment(text: &str, line: u32) -> XmlNode {
        at(
            XmlNode::new("comment")
                .with_attribute("type", "line")
                .with_text(text),
            line,
        )
    }

    fn function(name: &str, line: u32) -> XmlNode {
        at(
            XmlNode::new("function").with_child(XmlNode::new("name").with_text(name)),
            line,
        )
    }

    /// The example header, one directive or declaration per line.
    fn example_header() -> XmlNode {
        XmlNode::new("unit")
            .with_child(directive("ifndef", Some("MY_HEADER_H"), 1))
            .with_child(comment("// This ifndef should be removed", 1))
            .with_child(comment("// We are in the main header", 2))
            .with_child(function("Foo", 4))
            .with_child(comment("// This function should be included", 4))
            .with_child(directive("ifdef", Some("SOME_OPTION"), 6))
            .with_child(comment("// Arcane options", 7))
            .with_child(function("Foo2", 8))
            .with_child(comment("// ignored", 8))
            .with_child(directive("else", None, 9))
            .with_child(function("Foo3", 10))
            .with_child(directive("endif", None, 11))
            .with_child(comment("// #ifdef SOME_OPTION", 11))
            .with_child(directive("ifndef", Some("WIN32"), 13))
            .with_child(comment("// More arcane options", 14))
            .with_child(function("Foo4", 15))
            .with_child(directive("endif", None, 16))
            .with_child(directive("ifdef", Some("SOME_OPTION_ACCEPTED"), 18))
            .with_child(comment("// Accepted zone", 19))
            .with_child(function("FooAccepted", 20))
            .with_child(directive("endif", None, 21))
            .with_child(directive("endif", None, 23))
            .with_child(comment("// #ifndef MY_HEADER_H", 23))
    }

    fn kept_code(unit: &XmlNode) -> Vec<String> {
        unit.children().iter().map(|c| c.verbatim()).collect()
    }

    #[test]
    fn test_filter_example_header() {
        let regex = Regex::new("_H$|ACCEPTED$").unwrap();
        let filtered = filter_preprocessor_regions(&example_header(), &regex);
        assert_eq!(
            kept_code(&filtered),
            vec![
                "// We are in the main header",
                "Foo",
                "// This function should be included",
                "// Accepted zone",
                "FooAccepted",
            ]
        );
    }

    #[test]
    fn test_without_accepted_suffix() {
        let regex = Regex::new("_H$").unwrap();
        let filtered = filter_preprocessor_regions(&example_header(), &regex);
        assert_eq!(
            kept_code(&filtered),
            vec![
                "// We are in the main header",
                "Foo",
                "// This function should be included",
            ]
        );
    }

    #[test]
    fn test_input_is_untouched() {
        let unit = example_header();
        let regex = Regex::new("_H$").unwrap();
        let _ = filter_preprocessor_regions(&unit, &regex);
        assert_eq!(unit.children().len(), 23);
    }

    #[test]
    fn test_unbalanced_endif() {
        let unit = XmlNode::new("unit")
            .with_child(directive("endif", None, 1))
            .with_child(function("Foo", 2));
        let regex = Regex::new("_H$").unwrap();
        let filtered = filter_preprocessor_regions(&unit, &regex);
        assert_eq!(kept_code(&filtered), vec!["Foo"]);
    }

    #[test]
    fn test_ifdef_name_matching_regex_is_kept() {
        let unit = XmlNode::new("unit")
            .with_child(directive("ifdef", Some("__cplusplus"), 1))
            .with_child(function("Foo", 2))
            .with_child(directive("endif", None, 3))
            .with_child(directive("ifdef", Some("SOME_OPTION"), 4))
            .with_child(function("Bar", 5))
            .with_child(directive("endif", None, 6));
        let regex = Regex::new("_H$|^__cplusplus$").unwrap();
        let filtered = filter_preprocessor_regions(&unit, &regex);
        assert_eq!(kept_code(&filtered), vec!["Foo"]);
    }

    #[test]
    fn test_if_expression_is_excluded() {
        let unit = XmlNode::new("unit")
            .with_child(directive("if", None, 1))
            .with_child(function("Foo", 2))
            .with_child(directive("endif", None, 3))
            .with_child(function("Bar", 4));
        let regex = Regex::new("_H$").unwrap();
        let filtered = filter_preprocessor_regions(&unit, &regex);
        assert_eq!(kept_code(&filtered), vec!["Bar"]);
    }
}
