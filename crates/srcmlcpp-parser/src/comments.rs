//! Comment grouping and attribution.
//!
//! srcML emits every `//` line as its own `<comment>` element. Before the
//! children of a block are parsed, consecutive line comments are merged into
//! one comment, and each comment is attributed either as the top comment of
//! the next element, as the end-of-line comment of the previous element, or
//! kept as a standalone comment.
//!
//! Empty lines do not survive the conversion to srcML, so they are rewritten
//! to a marker comment beforehand (see [`mark_empty_lines`]).

use std::rc::Rc;

use log::trace;
use regex::Regex;

use srcmlcpp_core::XmlNode;

use crate::{preprocessor::filter_preprocessor_regions, wrapper::SrcmlWrapper};

/// Joins the lines of merged comments, until the comment markers are removed.
pub const COMMENT_NEW_LINE_TOKEN: &str = "_SRCML_LINEFEED_";
/// Content of the comments standing for an empty line.
pub const EMPTY_LINE_COMMENT_CONTENT: &str = "_SRCML_EMPTY_LINE_";
/// Replacement of the empty lines.
pub const EMPTY_LINE_COMMENT: &str = "// _SRCML_EMPTY_LINE_";

/// Replace every blank line of `code` with [`EMPTY_LINE_COMMENT`].
pub fn mark_empty_lines(code: &str) -> String {
    code.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                EMPTY_LINE_COMMENT
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove the lines that [`mark_empty_lines`] introduced.
pub fn remove_empty_line_markers(code: &str) -> String {
    code.split('\n')
        .filter(|line| line.trim() != EMPTY_LINE_COMMENT)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The comments attached to an element.
///
/// ```cpp
/// // A comment on the previous lines
/// void Foo(); // An end-of-line comment
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppElementComments {
    /// Comment on the lines above the element, without comment markers.
    pub comment_on_previous_lines: String,
    /// Comment at the end of the element's line, without comment markers.
    pub comment_end_of_line: String,
    /// `comment_on_previous_lines` was written as `/* */`.
    pub is_c_style_comment: bool,
}

impl CppElementComments {
    /// Build comments from plain text.
    ///
    /// With `format_comments`, `//` markers are added to every line of the
    /// top comment, and the end-of-line comment is put on one line.
    pub fn from_comments(
        comment_on_previous_lines: &str,
        comment_end_of_line: &str,
        format_comments: bool,
    ) -> Self {
        let mut top = comment_on_previous_lines.to_string();
        let mut eol = comment_end_of_line.to_string();
        if format_comments {
            if !top.is_empty() {
                top = format!("// {}", top.split('\n').collect::<Vec<_>>().join("\n// "));
                if !top.ends_with('\n') {
                    top.push('\n');
                }
            }
            if !eol.is_empty() {
                eol = format!(" // {}", eol.replace('\n', " | "));
            }
        }
        let is_c_style_comment = top.starts_with("/*");
        Self {
            comment_on_previous_lines: top,
            comment_end_of_line: eol,
            is_c_style_comment,
        }
    }

    /// The top comment as C++ code.
    pub fn top_comment_code(&self, add_eol: bool, preserve_c_style_comment: bool) -> String {
        if preserve_c_style_comment && self.is_c_style_comment {
            return format!("/*{}*/", self.comment_on_previous_lines);
        }

        let mut top_comment = self
            .comment_on_previous_lines
            .lines()
            .map(|line| {
                if line.trim().starts_with("//") {
                    line.to_string()
                } else {
                    format!("//{line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        if add_eol {
            if !top_comment.is_empty() && !top_comment.ends_with('\n') {
                top_comment.push('\n');
            }
        } else {
            while top_comment.ends_with('\n') {
                top_comment.pop();
            }
        }
        top_comment
    }

    /// The end-of-line comment as C++ code (with a leading space).
    pub fn eol_comment_code(&self) -> String {
        if self.comment_end_of_line.is_empty() {
            String::new()
        } else if self.comment_end_of_line.trim().starts_with("//") {
            self.comment_end_of_line.clone()
        } else {
            format!(" //{}", self.comment_end_of_line)
        }
    }

    pub fn add_eol_comment(&mut self, comment: &str) {
        if self.comment_end_of_line.is_empty() {
            self.comment_end_of_line = comment.to_string();
        } else {
            self.comment_end_of_line.push_str(" - ");
            self.comment_end_of_line.push_str(comment);
        }
    }

    pub fn add_comment_on_previous_lines(&mut self, comment: &str) {
        if self.comment_on_previous_lines.is_empty() {
            self.comment_on_previous_lines = comment.to_string();
        } else {
            self.comment_on_previous_lines.push('\n');
            self.comment_on_previous_lines.push_str(comment);
        }
    }

    /// Top and end-of-line comments, separated by an empty line.
    pub fn full_comment(&self) -> String {
        self.joined("\n\n")
    }

    /// Top and end-of-line comments, separated by a line break.
    pub fn comments_as_str(&self) -> String {
        self.joined("\n")
    }

    fn joined(&self, separator: &str) -> String {
        if !self.comment_on_previous_lines.is_empty() && !self.comment_end_of_line.is_empty() {
            format!(
                "{}{separator}{}",
                self.comment_on_previous_lines, self.comment_end_of_line
            )
        } else {
            format!("{}{}", self.comment_on_previous_lines, self.comment_end_of_line)
        }
    }
}

/// A child element together with the comments attributed to it.
#[derive(Debug, Clone)]
pub struct ElementAndComments {
    pub element: SrcmlWrapper,
    pub comments: CppElementComments,
}

/// The children of `element`, with their comments attributed.
///
/// When `acceptable_regions` is given, the children inside excluded
/// preprocessor regions are removed first. Comments used as top or
/// end-of-line comments are not returned as separate children.
pub fn children_with_comments(
    element: &SrcmlWrapper,
    acceptable_regions: Option<&Regex>,
) -> Vec<ElementAndComments> {
    let filtered;
    let source: &XmlNode = match acceptable_regions {
        Some(regex) => {
            filtered = filter_preprocessor_regions(element.xml(), regex);
            &filtered
        }
        None => element.xml(),
    };

    let mut grouped = group_consecutive_comments(source);
    let mut c_style = vec![false; grouped.len()];
    for (node, is_c_style) in grouped.iter_mut().zip(c_style.iter_mut()) {
        if node.tag() != "comment" {
            continue;
        }
        if let Some(text) = node.text() {
            *is_c_style = text.starts_with("/*");
            let cleaned = remove_comment_markers(text);
            node.set_text(Some(cleaned));
        }
    }

    let children: Vec<SrcmlWrapper> = grouped
        .into_iter()
        .map(|node| element.sibling(&Rc::new(node)))
        .collect();

    let mut result = Vec::with_capacity(children.len());
    for (i, child) in children.iter().enumerate() {
        let mut comments = CppElementComments::default();

        if i > 0 && is_comment_on_previous_line(&children, i - 1) {
            if let Some(text) = children[i - 1].text() {
                comments.comment_on_previous_lines = text.to_string();
                comments.is_c_style_comment = c_style[i - 1];
            }
        }
        let mut shall_append = !is_comment_on_previous_line(&children, i);

        if is_comment_end_of_line(&children, i + 1) {
            if let Some(text) = children[i + 1].text() {
                comments.comment_end_of_line = text.to_string();
            }
        }
        if is_comment_end_of_line(&children, i) {
            shall_append = false;
        }

        if shall_append {
            if comments.comment_on_previous_lines.contains('\n') {
                comments.comment_on_previous_lines = comments
                    .comment_on_previous_lines
                    .replace(EMPTY_LINE_COMMENT, "");
            }
            result.push(ElementAndComments {
                element: child.clone(),
                comments,
            });
        } else {
            trace!(tag = child.tag(); "Comment attached to a sibling");
        }
    }
    result
}

/// Merge the line comments written on consecutive lines.
fn group_consecutive_comments(unit: &XmlNode) -> Vec<XmlNode> {
    let mut grouped: Vec<XmlNode> = Vec::with_capacity(unit.children().len());

    for child in unit.children() {
        if shall_concat(&grouped, child) {
            if let Some(previous) = grouped.last_mut() {
                let text = child.text().unwrap_or_default();
                let appended = text.strip_prefix("//").unwrap_or(text);
                let merged = format!(
                    "{}{COMMENT_NEW_LINE_TOKEN}{appended}",
                    previous.text().unwrap_or_default()
                );
                previous.set_text(Some(merged));
                if let Some(end) = child.end() {
                    previous.set_attribute("pos:end", end.to_string());
                }
                continue;
            }
        }
        grouped.push(XmlNode::clone(child));
    }
    grouped
}

fn shall_concat(grouped: &[XmlNode], child: &XmlNode) -> bool {
    let Some(previous) = grouped.last() else {
        return false;
    };
    let (Some(child_start), Some(previous_end)) = (child.start(), previous.end()) else {
        return false;
    };
    if previous.tag() != "comment"
        || child.tag() != "comment"
        || child_start.line() != previous_end.line() + 1
    {
        return false;
    }

    // The previous comment is the end-of-line comment of another statement.
    if grouped.len() >= 2 {
        let previous_previous = &grouped[grouped.len() - 2];
        if previous_previous.tag() != "comment"
            && previous_previous.end().map(|p| p.line()) == Some(previous_end.line())
        {
            return false;
        }
    }

    // Only `//` comments are merged.
    let is_c_style = |node: &XmlNode| node.text().is_some_and(|t| t.starts_with("/*"));
    if is_c_style(previous) || is_c_style(child) {
        return false;
    }

    let is_empty_line =
        |node: &XmlNode| node.text().is_some_and(|t| t.contains(EMPTY_LINE_COMMENT_CONTENT));
    !is_empty_line(previous) && !is_empty_line(child)
}

/// Remove the `//` or `/* */` markers of a (possibly merged) comment.
pub(crate) fn remove_comment_markers(comment: &str) -> String {
    let comment = comment.replace(COMMENT_NEW_LINE_TOKEN, "\n");
    if comment.starts_with("/*") && comment.ends_with("*/") && comment.len() >= 4 {
        return comment[2..comment.len() - 2].to_string();
    }
    comment
        .split('\n')
        .map(|line| {
            let trimmed = line.trim_start();
            match trimmed.strip_prefix("//") {
                Some(rest) => rest,
                None => line,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_empty_line_marker(element: &SrcmlWrapper) -> bool {
    element
        .text()
        .is_some_and(|t| t.contains(EMPTY_LINE_COMMENT_CONTENT))
}

/// Whether `children[idx]` is the end-of-line comment of `children[idx - 1]`.
fn is_comment_end_of_line(children: &[SrcmlWrapper], idx: usize) -> bool {
    if idx == 0 || idx >= children.len() {
        return false;
    }
    let element = &children[idx];
    let previous = &children[idx - 1];
    if element.tag() != "comment" || previous.tag() == "comment" || is_empty_line_marker(element) {
        return false;
    }
    match (element.start(), previous.start(), previous.end()) {
        (Some(start), Some(_), Some(previous_end)) => start.line() == previous_end.line(),
        _ => false,
    }
}

/// Whether `children[idx]` is a comment on top of `children[idx + 1]`.
fn is_comment_on_previous_line(children: &[SrcmlWrapper], idx: usize) -> bool {
    if idx + 1 >= children.len() || is_comment_end_of_line(children, idx) {
        return false;
    }
    if is_group_comment(children, idx) {
        return false;
    }

    let element = &children[idx];
    let next = &children[idx + 1];
    if element.tag() != "comment" || next.tag() == "comment" || is_empty_line_marker(element) {
        return false;
    }

    let consecutive = match (element.start(), element.end(), next.start()) {
        (Some(_), Some(end), Some(next_start)) => end.line() + 1 == next_start.line(),
        _ => false,
    };
    if !consecutive {
        return false;
    }
    if idx + 2 == children.len() {
        return true;
    }

    // A comment followed by an element with its own end-of-line comment
    // stays standalone, unless that end-of-line comment is a return value
    // policy annotation.
    let next_next = &children[idx + 2];
    let next_next_text = next_next.text().unwrap_or_default();
    let next_has_eol_comment = next_next.tag() == "comment"
        && matches!(
            (next_next.start(), next.end()),
            (Some(start), Some(end)) if start.line() == end.line()
        )
        && !next_next_text.contains("rv_policy::")
        && !next_next_text.contains("return_value_policy::");
    !next_has_eol_comment
}

/// A comment on top of several elements of the same kind on consecutive
/// lines documents the group, not the first element.
///
/// ```cpp
/// // A comment about
/// // several functions
/// MY_API void Foo();
/// MY_API void Foo2();
/// ```
fn is_group_comment(children: &[SrcmlWrapper], idx: usize) -> bool {
    if idx + 2 >= children.len() {
        return false;
    }
    let n0 = &children[idx];
    let n1 = &children[idx + 1];
    let n2 = &children[idx + 2];
    if n0.tag() != "comment" || n1.tag() != n2.tag() {
        return false;
    }
    match (n0.end(), n1.start(), n1.end(), n2.start()) {
        (Some(n0_end), Some(n1_start), Some(n1_end), Some(n2_start)) => {
            n0_end.line() + 1 == n1_start.line() && n1_end.line() + 1 == n2_start.line()
        }
        _ => false,
    }
}
