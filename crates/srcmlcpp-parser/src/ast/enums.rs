//! Enums and the values of their members.

use crate::{
    ast::{CppNode, CppUnit, NodeId},
    error::WarningType,
};

/// `enum E { a, b = 3 };` or `enum class E : uint8_t { ... };`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CppEnum {
    /// `class` or empty.
    pub enum_type: String,
    pub enum_name: String,
    pub block: NodeId,
    /// The underlying type, as `uint8_t`, usually empty.
    pub enum_data_type: String,
}

impl CppEnum {
    pub fn is_enum_class(&self) -> bool {
        self.enum_type == "class"
    }
}

impl CppUnit {
    /// The value declarations of an enum.
    pub fn get_enum_decls(&self, id: NodeId) -> Vec<NodeId> {
        let Some(cpp_enum) = self.node(id).as_enum() else {
            return Vec::new();
        };
        self.block_children(cpp_enum.block)
            .iter()
            .copied()
            .filter(|c| matches!(self.node(*c), CppNode::Decl(_)))
            .collect()
    }

    /// The children of an enum block, where every value declaration is
    /// replaced by a copy holding its value.
    ///
    /// The first value defaults to 0 and the next ones to the previous
    /// value plus one. Explicit values are kept as written (they may be
    /// expressions such as `A | B`), except named number macros, which are
    /// replaced by their number. When a previous value is not a number, the
    /// next one cannot be computed: it is left empty and a warning is
    /// emitted.
    pub fn get_children_with_filled_decl_values(&mut self, id: NodeId) -> Vec<NodeId> {
        let Some(block) = self.node(id).as_enum().map(|e| e.block) else {
            return Vec::new();
        };
        let children = self.block_children(block).to_vec();
        let mut result = Vec::with_capacity(children.len());
        let mut last_value: Option<String> = None;
        for child in children {
            let Some(initial_value) = self.decl(child).map(|d| d.initial_value_code.clone()) else {
                result.push(child);
                continue;
            };
            let value = if !initial_value.is_empty() {
                match self.options().named_number_macros.get(&initial_value) {
                    Some(number) => number.to_string(),
                    None => initial_value,
                }
            } else {
                match &last_value {
                    None => "0".to_string(),
                    Some(previous) => match previous
                        .trim()
                        .parse::<i64>()
                        .ok()
                        .and_then(|previous| previous.checked_add(1))
                    {
                        Some(next) => next.to_string(),
                        None => {
                            self.emit_warning(
                                child,
                                WarningType::EnumUnparsableValue,
                                "Cannot parse the value of this enum element.\n\
                                 Hint: maybe add an entry to SrcmlcppOptions.named_number_macros",
                            );
                            String::new()
                        }
                    },
                }
            };
            let filled = self.deep_clone(child);
            if let Some(decl) = self.node_mut(filled).as_decl_mut() {
                decl.initial_value_code = value.clone();
            }
            last_value = Some(value);
            result.push(filled);
        }
        result
    }
}
