//! Type tag definitions for the FrameCode type system.
//!
//! There is no implicit conversion between types: every operation either
//! requires a specific tag or requires its operands to share one.

/// Identifies the type of an assignable value.
///
/// "No type" (a declared-but-unbound variable) is deliberately not a tag;
/// it is the absence of one. See [`crate::Value::type_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Signed 64-bit integer.
    Int,
    /// Boolean.
    Bool,
    /// Unicode string.
    Str,
}

/// All type tags, in definition order.
pub const ALL_TYPE_TAGS: [TypeTag; 3] = [TypeTag::Int, TypeTag::Bool, TypeTag::Str];

impl TypeTag {
    /// Returns the source-level name for this type tag.
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Bool => "bool",
            TypeTag::Str => "string",
        }
    }

    /// Parses a source-level type name.
    pub fn from_name(name: &str) -> Option<TypeTag> {
        match name {
            "int" => Some(TypeTag::Int),
            "bool" => Some(TypeTag::Bool),
            "string" => Some(TypeTag::Str),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_roundtrip() {
        for &tag in &ALL_TYPE_TAGS {
            assert_eq!(TypeTag::from_name(tag.name()), Some(tag));
        }
    }

    #[test]
    fn unknown_names_rejected() {
        assert_eq!(TypeTag::from_name("float"), None);
        assert_eq!(TypeTag::from_name("INT"), None);
        assert_eq!(TypeTag::from_name(""), None);
    }
}
