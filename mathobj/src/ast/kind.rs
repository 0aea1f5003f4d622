//! The closed vocabulary of node kinds, and the chain of number domains.

/// The kind of a node in a term tree.
///
/// Each kind is identified by the tag the front-end uses for it in the record stream, e.g.
/// `QUANT_∀` or `PROP_BELONGS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Binders
    /// The universal quantifier.
    ForAll,

    /// The existential quantifier.
    Exists,

    /// The unique existential quantifier.
    ExistsUnique,

    /// A lambda abstraction.
    Lambda,

    /// A set defined by a property, e.g. `{x ∈ X | P(x)}`.
    SetIntension,

    // Leaves and structure
    /// A named local variable, either global to the proof state or bound.
    LocalConstant,

    /// A named constant, such as `ℝ` or `injective`.
    Constant,

    /// An application of a function to one or more arguments.
    Application,

    /// A placeholder standing for a definition parameter inside a pattern.
    Metavar,

    /// A numeric literal. The literal itself is stored in the `value` attribute.
    Number,

    // Propositions
    /// The `∧` connective.
    And,

    /// The `∨` connective.
    Or,

    /// The `⇒` connective.
    Implies,

    /// The `⇔` connective.
    Iff,

    /// The `¬` connective.
    Not,

    /// The contradiction.
    False,

    /// The trivially true proposition.
    True,

    /// An existential presented as a dependent pair.
    PropExists,

    /// The `=` relation.
    Equal,

    /// The `≠` relation.
    NotEqual,

    /// The `<` relation.
    Less,

    /// The `>` relation.
    Greater,

    /// The `≤` relation.
    LessEq,

    /// The `≥` relation.
    GreaterEq,

    /// The `∈` relation.
    Belongs,

    /// The `∉` relation.
    NotBelongs,

    /// The `⊂` relation.
    Included,

    // Types
    /// The type of propositions.
    Prop,

    /// The type of types.
    Type,

    /// The type of subsets of a given type.
    Set,

    /// The type of sequences, with children `[index type, target type]`.
    Sequence,

    /// The type of indexed families of sets, with children `[index type, set type]`.
    SetFamily,

    /// The type of functions, with children `[domain, codomain]`.
    Function,

    /// A cartesian product of types.
    Product,

    // Set operations
    SetInter,
    SetUnion,
    SetInterFamily,
    SetUnionFamily,
    SetDifference,
    SetComplement,
    SetEmpty,
    SetUniverse,
    SetImage,
    SetInverse,
    SetProduct,

    // Arithmetic
    Sum,
    Difference,
    Mult,
    Div,
    Minus,
    Power,

    /// The absence of a type. Only the session's `NO_TYPE` sentinel carries this kind.
    NotProvided,
}

impl_str_conversion_traits!(NodeKind {
    ForAll: "QUANT_∀",
    Exists: "QUANT_∃",
    ExistsUnique: "QUANT_∃!",
    Lambda: "LAMBDA",
    SetIntension: "SET_INTENSION",

    LocalConstant: "LOCAL_CONSTANT",
    Constant: "CONSTANT",
    Application: "APPLICATION",
    Metavar: "METAVAR",
    Number: "NUMBER",

    And: "PROP_AND",
    Or: "PROP_OR",
    Implies: "PROP_IMPLIES",
    Iff: "PROP_IFF",
    Not: "PROP_NOT",
    False: "PROP_FALSE",
    True: "PROP_TRUE",
    PropExists: "PROP_∃",
    Equal: "PROP_EQUAL",
    NotEqual: "PROP_EQUAL_NOT",
    Less: "PROP_<",
    Greater: "PROP_>",
    LessEq: "PROP_≤",
    GreaterEq: "PROP_≥",
    Belongs: "PROP_BELONGS",
    NotBelongs: "PROP_NOT_BELONGS",
    Included: "PROP_INCLUDED",

    Prop: "PROP",
    Type: "TYPE",
    Set: "SET",
    Sequence: "SEQUENCE",
    SetFamily: "SET_FAMILY",
    Function: "FUNCTION",
    Product: "PRODUCT",

    SetInter: "SET_INTER",
    SetUnion: "SET_UNION",
    SetInterFamily: "SET_INTER+",
    SetUnionFamily: "SET_UNION+",
    SetDifference: "SET_DIFF",
    SetComplement: "SET_COMPLEMENT",
    SetEmpty: "SET_EMPTY",
    SetUniverse: "SET_UNIVERSE",
    SetImage: "SET_IMAGE",
    SetInverse: "SET_INVERSE",
    SetProduct: "SET_PRODUCT",

    Sum: "SUM",
    Difference: "DIFFERENCE",
    Mult: "MULT",
    Div: "DIV",
    Minus: "MINUS",
    Power: "POWER",

    NotProvided: "not provided",
});

impl NodeKind {
    /// Returns `true` if nodes of this kind introduce a bound variable when they have the
    /// `[bound var type, bound var, body]` shape. Local constants are included, since sequence
    /// and set family variables are given that shape during construction.
    pub fn may_bind(self) -> bool {
        matches!(
            self,
            NodeKind::ForAll
                | NodeKind::Exists
                | NodeKind::ExistsUnique
                | NodeKind::SetIntension
                | NodeKind::Lambda
                | NodeKind::LocalConstant
        )
    }

    /// Returns `true` for the kinds that a well-formed record must give exactly three children.
    pub fn is_binder(self) -> bool {
        self != NodeKind::LocalConstant && self.may_bind()
    }

    /// The number of children a record of this kind must have, if that number is fixed.
    pub fn arity(self) -> Option<usize> {
        use NodeKind::*;
        match self {
            ForAll | Exists | ExistsUnique | Lambda | SetIntension => Some(3),
            And | Or | Implies | Iff | Equal | NotEqual | Less | Greater | LessEq | GreaterEq
            | Belongs | NotBelongs | Included => Some(2),
            Not => Some(1),
            _ => None,
        }
    }

    pub fn is_inequality(self) -> bool {
        use NodeKind::*;
        matches!(self, Less | Greater | LessEq | GreaterEq | NotEqual)
    }

    /// Returns `true` if the tag of this kind starts with `SET`.
    pub fn is_set_like(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Set | SetFamily
                | SetIntension
                | SetInter
                | SetUnion
                | SetInterFamily
                | SetUnionFamily
                | SetDifference
                | SetComplement
                | SetEmpty
                | SetUniverse
                | SetImage
                | SetInverse
                | SetProduct
        )
    }

    /// For a negated relation, the kind of the relation itself.
    pub fn without_negation(self) -> Option<NodeKind> {
        match self {
            NodeKind::NotBelongs => Some(NodeKind::Belongs),
            NodeKind::NotEqual => Some(NodeKind::Equal),
            _ => None,
        }
    }
}

/// One of the four number domains, ordered along the chain `ℕ ⊂ ℤ ⊂ ℚ ⊂ ℝ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumberDomain {
    Naturals,
    Integers,
    Rationals,
    Reals,
}

impl_str_conversion_traits!(NumberDomain {
    Naturals: "ℕ",
    Integers: "ℤ",
    Rationals: "ℚ",
    Reals: "ℝ",
});
