//! Structs, classes, access sections, namespaces and enums.

use crate::{
    ast::{
        CppAccessType, CppBlock, CppEnum, CppNamespace, CppNode, CppPublicProtectedPrivate, CppStruct, CppSuper,
        CppSuperList, NodeId,
    },
    comments::{CppElementComments, ElementAndComments, remove_comment_markers},
    error::ErrorCode,
    parse::{Parser, Step, types::parse_name},
    wrapper::SrcmlWrapper,
};

/// A comment between the name and the block of a struct, enum or namespace
/// is an end-of-line comment:
///
/// ```cpp
/// struct Foo // This is Foo
/// {
/// };
/// ```
fn add_comment_before_block(comments: &mut CppElementComments, comment: &SrcmlWrapper) {
    if let Some(text) = comment.text() {
        comments.add_eol_comment(&remove_comment_markers(text));
    }
}

impl Parser<'_> {
    pub(super) fn parse_struct_or_class(&mut self, child: &ElementAndComments) -> Step<NodeId> {
        let element = &child.element;
        if !element.has_xml_name() {
            return Err(element
                .unsupported(ErrorCode::E103, "struct or class without name")
                .into());
        }
        let mut comments = child.comments.clone();
        let mut cpp_struct = CppStruct::default();
        let mut block = None;

        for part in element.children() {
            match part.tag() {
                "name" => cpp_struct.class_name = parse_name(&part),
                "super_list" => cpp_struct.super_list = Some(self.parse_super_list(&part)?),
                "block" => {
                    self.class_names.push(cpp_struct.class_name.clone());
                    let parsed = self.parse_block(&part);
                    self.class_names.pop();
                    block = Some(parsed?);
                }
                "template" => cpp_struct.template = Some(self.parse_template(&part)?),
                "comment" => add_comment_before_block(&mut comments, &part),
                "decl" => {
                    return Err(part
                        .malformed("Skipped struct because it misses a ';' at the end")
                        .into());
                }
                "specifier" => {
                    let text = part.text().ok_or_else(|| part.malformed("empty specifier"))?;
                    cpp_struct.specifier = text.to_string();
                }
                // export macro, as in `struct MY_API Foo`
                "macro" => {
                    cpp_struct.macro_name = part
                        .extract_name_from_xml()
                        .ok_or_else(|| part.malformed("macro without name"))?;
                }
                _ => return Err(element.unhandled_tag(&part).into()),
            }
        }

        cpp_struct.block = match block {
            Some(block) => block,
            None => self.push(element, CppElementComments::default(), CppNode::Block(CppBlock::default())),
        };
        let node = if element.tag() == "class" {
            CppNode::Class(cpp_struct)
        } else {
            CppNode::Struct(cpp_struct)
        };
        Ok(self.push(element, comments, node))
    }

    /// `: public A, private B`
    fn parse_super_list(&mut self, element: &SrcmlWrapper) -> Step<NodeId> {
        let mut supers = Vec::new();
        for child in element.children() {
            if child.tag() != "super" {
                return Err(element.unhandled_tag(&child).into());
            }
            let mut cpp_super = CppSuper::default();
            for part in child.children() {
                match part.tag() {
                    "specifier" => {
                        let text = part.text().ok_or_else(|| part.malformed("empty specifier"))?;
                        cpp_super.specifier = text.to_string();
                    }
                    "name" => cpp_super.superclass_name = parse_name(&part),
                    _ => return Err(child.unhandled_tag(&part).into()),
                }
            }
            supers.push(self.push(&child, CppElementComments::default(), CppNode::Super(cpp_super)));
        }
        let node = CppNode::SuperList(CppSuperList { supers });
        Ok(self.push(element, CppElementComments::default(), node))
    }

    /// A `public:`, `protected:` or `private:` section.
    ///
    /// srcML wraps the members declared before any access specifier into a
    /// section of type `default`.
    pub(super) fn parse_public_protected_private(&mut self, child: &ElementAndComments) -> Step<NodeId> {
        let element = &child.element;
        let access_type = CppAccessType::from_name(element.tag())
            .ok_or_else(|| element.malformed("unknown access type"))?;
        let node = CppNode::PublicProtectedPrivate(CppPublicProtectedPrivate {
            access_type,
            is_default_access: element.attribute("type") == Some("default"),
            children: Vec::new(),
        });
        let id = self.push(element, child.comments.clone(), node);
        self.fill_block(element, id)?;
        Ok(id)
    }

    pub(super) fn parse_namespace(&mut self, child: &ElementAndComments) -> Step<NodeId> {
        let element = &child.element;
        let mut comments = child.comments.clone();
        let mut ns_name = String::new();
        let mut block = None;
        for part in element.children() {
            match part.tag() {
                "name" => ns_name = parse_name(&part),
                "block" => block = Some(self.parse_block(&part)?),
                "comment" => add_comment_before_block(&mut comments, &part),
                _ => return Err(element.unhandled_tag(&part).into()),
            }
        }
        let block = block.ok_or_else(|| element.malformed("namespace without block"))?;
        Ok(self.push(element, comments, CppNode::Namespace(CppNamespace { ns_name, block })))
    }

    /// `enum E { ... }` or `enum class E : int { ... }`
    pub(super) fn parse_enum(&mut self, child: &ElementAndComments) -> Step<NodeId> {
        let element = &child.element;
        let mut comments = child.comments.clone();
        let mut enum_name = String::new();
        let mut enum_data_type = String::new();
        let mut block = None;
        for part in element.children() {
            match part.tag() {
                "name" => enum_name = parse_name(&part),
                "block" => block = Some(self.parse_block(&part)?),
                "comment" => add_comment_before_block(&mut comments, &part),
                "type" => {
                    let names = part.children_with_tag("name");
                    if let [name] = names.as_slice() {
                        if let Some(text) = name.text() {
                            enum_data_type = text.to_string();
                        }
                    }
                }
                _ => return Err(element.unhandled_tag(&part).into()),
            }
        }
        let block = block.ok_or_else(|| element.malformed("enum without block"))?;
        let node = CppNode::Enum(CppEnum {
            enum_type: element.attribute("type").unwrap_or_default().to_string(),
            enum_name,
            block,
            enum_data_type,
        });
        Ok(self.push(element, comments, node))
    }
}
