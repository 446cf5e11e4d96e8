//! The light type-inference lattice used for informational type
//! propagation (§4.5.3). This is deliberately coarse: it exists to flag
//! obvious mismatches, not to perform real type checking.

/// A coarse inferred or declared type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Number,
    Decimal,
    String,
    Boolean,
    List,
    Function,
    Struct,
    Null,
    /// Anything not resolvable at this shallow level (e.g. a function
    /// call's result, or a forward reference).
    Unknown,
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TypeTag::Number => "number",
            TypeTag::Decimal => "decimal",
            TypeTag::String => "string",
            TypeTag::Boolean => "boolean",
            TypeTag::List => "list",
            TypeTag::Function => "function",
            TypeTag::Struct => "struct",
            TypeTag::Null => "null",
            TypeTag::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

impl TypeTag {
    /// Maps a data-type keyword (`number|decimal|string|boolean|list`) to
    /// its declared-type tag.
    pub fn from_data_type_keyword(kind: crate::token::TokenKind) -> Option<TypeTag> {
        use crate::token::TokenKind::*;
        Some(match kind {
            KwNumber => TypeTag::Number,
            KwDecimal => TypeTag::Decimal,
            KwString => TypeTag::String,
            KwBoolean => TypeTag::Boolean,
            KwList => TypeTag::List,
            _ => return None,
        })
    }

    /// Whether assigning a value inferred as `self` to a declared type of
    /// `declared` should be flagged as a `TYPE` diagnostic. `number ->
    /// decimal` widening and anything `-> unknown` are exempt per §4.5.3.
    pub fn is_mismatch(inferred: TypeTag, declared: TypeTag) -> bool {
        if inferred == declared {
            return false;
        }
        if inferred == TypeTag::Unknown || declared == TypeTag::Unknown {
            return false;
        }
        if inferred == TypeTag::Number && declared == TypeTag::Decimal {
            return false;
        }
        true
    }

    /// Result type of a binary `+` where at least one operand is `string`.
    pub fn additive_result(left: TypeTag, right: TypeTag) -> TypeTag {
        if left == TypeTag::String || right == TypeTag::String {
            TypeTag::String
        } else if left == TypeTag::Decimal || right == TypeTag::Decimal {
            TypeTag::Decimal
        } else {
            TypeTag::Number
        }
    }

    /// Result type of `-`, `*`, `%`, `^`: arithmetic with any `decimal`
    /// operand yields `decimal`.
    pub fn arithmetic_result(left: TypeTag, right: TypeTag) -> TypeTag {
        if left == TypeTag::Decimal || right == TypeTag::Decimal {
            TypeTag::Decimal
        } else {
            TypeTag::Number
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_to_decimal_is_not_a_mismatch() {
        assert!(!TypeTag::is_mismatch(TypeTag::Number, TypeTag::Decimal));
    }

    #[test]
    fn unknown_is_never_a_mismatch() {
        assert!(!TypeTag::is_mismatch(TypeTag::Unknown, TypeTag::String));
        assert!(!TypeTag::is_mismatch(TypeTag::Boolean, TypeTag::Unknown));
    }

    #[test]
    fn string_vs_number_is_a_mismatch() {
        assert!(TypeTag::is_mismatch(TypeTag::String, TypeTag::Number));
    }

    #[test]
    fn additive_prefers_string_over_decimal_over_number() {
        assert_eq!(
            TypeTag::additive_result(TypeTag::String, TypeTag::Number),
            TypeTag::String
        );
        assert_eq!(
            TypeTag::additive_result(TypeTag::Decimal, TypeTag::Number),
            TypeTag::Decimal
        );
        assert_eq!(
            TypeTag::additive_result(TypeTag::Number, TypeTag::Number),
            TypeTag::Number
        );
    }
}
