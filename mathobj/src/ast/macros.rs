//! Macros used throughout the term model.

/// Implements `FromStr` and `Display` for an enum whose variants map one-to-one to string tags.
///
/// Parsing an unknown tag fails with `()`, leaving it to the caller to build a proper error.
macro_rules! impl_str_conversion_traits {
    ($enum_name:ident { $($variant:ident: $str:literal),* $(,)? }) => {
        impl std::str::FromStr for $enum_name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($str => Ok($enum_name::$variant),)*
                    _ => Err(()),
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                let s = match self {
                    $($enum_name::$variant => $str,)*
                };
                write!(f, "{}", s)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{NodeKind, NumberDomain};
    use std::str::FromStr;

    #[test]
    fn test_node_kind_tags() {
        let cases = [
            ("QUANT_∀", NodeKind::ForAll),
            ("QUANT_∃!", NodeKind::ExistsUnique),
            ("PROP_≤", NodeKind::LessEq),
            ("SET_INTENSION", NodeKind::SetIntension),
            ("not provided", NodeKind::NotProvided),
        ];
        for (tag, kind) in cases {
            assert_eq!(NodeKind::from_str(tag), Ok(kind));
            assert_eq!(kind.to_string(), tag);
        }
        assert!(NodeKind::from_str("PROP_XOR").is_err());
    }

    #[test]
    fn test_number_domain_tags() {
        assert_eq!(NumberDomain::from_str("ℚ"), Ok(NumberDomain::Rationals));
        assert_eq!(NumberDomain::Naturals.to_string(), "ℕ");
        assert!(NumberDomain::from_str("ℂ").is_err());
    }
}
