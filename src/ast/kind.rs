//! Node kinds and their payloads.

use super::operator::OperId;
use super::sname::SName;
use super::AstId;
use bitflags::bitflags;

/// The kind tag of a node. Exactly one per node; sets of kinds are only
/// ever used as filters via [`KindSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Placeholder,
    Builtin,
    Capture,
    ClassStructUnion,
    Concept,
    Name,
    Typedef,
    Variadic,
    Array,
    Cast,
    Enum,
    Pointer,
    PointerToMember,
    Reference,
    RvalueReference,
    StructuredBinding,
    Constructor,
    Destructor,
    AppleBlock,
    Function,
    Lambda,
    Operator,
    UserDefConversion,
    UserDefLiteral,
}

bitflags! {
    /// A set of [`Kind`]s for matching.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KindSet: u32 {
        const PLACEHOLDER         = 1 << 0;
        const BUILTIN             = 1 << 1;
        const CAPTURE             = 1 << 2;
        const CLASS_STRUCT_UNION  = 1 << 3;
        const CONCEPT             = 1 << 4;
        const NAME                = 1 << 5;
        const TYPEDEF             = 1 << 6;
        const VARIADIC            = 1 << 7;
        const ARRAY               = 1 << 8;
        const CAST                = 1 << 9;
        const ENUM                = 1 << 10;
        const POINTER             = 1 << 11;
        const POINTER_TO_MEMBER   = 1 << 12;
        const REFERENCE           = 1 << 13;
        const RVALUE_REFERENCE    = 1 << 14;
        const STRUCTURED_BINDING  = 1 << 15;
        const CONSTRUCTOR         = 1 << 16;
        const DESTRUCTOR          = 1 << 17;
        const APPLE_BLOCK         = 1 << 18;
        const FUNCTION            = 1 << 19;
        const LAMBDA              = 1 << 20;
        const OPERATOR            = 1 << 21;
        const USER_DEF_CONVERSION = 1 << 22;
        const USER_DEF_LITERAL    = 1 << 23;

        const ANY_POINTER = Self::POINTER.bits() | Self::POINTER_TO_MEMBER.bits();
        const ANY_REFERENCE = Self::REFERENCE.bits()
            | Self::RVALUE_REFERENCE.bits();
        /// Nodes printed as a prefix (`*`, `&`, `&&`, `C::*`).
        const POINTER_LIKE = Self::ANY_POINTER.bits()
            | Self::ANY_REFERENCE.bits();
        const FUNCTION_LIKE = Self::APPLE_BLOCK.bits()
            | Self::CONSTRUCTOR.bits() | Self::DESTRUCTOR.bits()
            | Self::FUNCTION.bits() | Self::LAMBDA.bits()
            | Self::OPERATOR.bits() | Self::USER_DEF_CONVERSION.bits()
            | Self::USER_DEF_LITERAL.bits();
        /// Function-likes that have a return type.
        const FUNCTION_LIKE_RET = Self::APPLE_BLOCK.bits()
            | Self::FUNCTION.bits() | Self::LAMBDA.bits()
            | Self::OPERATOR.bits() | Self::USER_DEF_CONVERSION.bits()
            | Self::USER_DEF_LITERAL.bits();
        /// Kinds that own a single child in the declarator chain.
        const PARENT = Self::ARRAY.bits() | Self::CAST.bits()
            | Self::POINTER_LIKE.bits() | Self::FUNCTION_LIKE_RET.bits();
        /// Leaves that carry the base type of a declaration.
        const TYPE_LEAF = Self::BUILTIN.bits() | Self::CLASS_STRUCT_UNION.bits()
            | Self::CONCEPT.bits() | Self::ENUM.bits() | Self::TYPEDEF.bits()
            | Self::NAME.bits() | Self::STRUCTURED_BINDING.bits()
            | Self::VARIADIC.bits();
        /// Kinds that may be stored in objects (everything but functions).
        const OBJECT = Self::BUILTIN.bits() | Self::CLASS_STRUCT_UNION.bits()
            | Self::CONCEPT.bits() | Self::ENUM.bits() | Self::TYPEDEF.bits()
            | Self::ARRAY.bits() | Self::POINTER_LIKE.bits()
            | Self::STRUCTURED_BINDING.bits() | Self::LAMBDA.bits();
    }
}

impl Kind {
    pub fn set(self) -> KindSet {
        match self {
            Kind::Placeholder => KindSet::PLACEHOLDER,
            Kind::Builtin => KindSet::BUILTIN,
            Kind::Capture => KindSet::CAPTURE,
            Kind::ClassStructUnion => KindSet::CLASS_STRUCT_UNION,
            Kind::Concept => KindSet::CONCEPT,
            Kind::Name => KindSet::NAME,
            Kind::Typedef => KindSet::TYPEDEF,
            Kind::Variadic => KindSet::VARIADIC,
            Kind::Array => KindSet::ARRAY,
            Kind::Cast => KindSet::CAST,
            Kind::Enum => KindSet::ENUM,
            Kind::Pointer => KindSet::POINTER,
            Kind::PointerToMember => KindSet::POINTER_TO_MEMBER,
            Kind::Reference => KindSet::REFERENCE,
            Kind::RvalueReference => KindSet::RVALUE_REFERENCE,
            Kind::StructuredBinding => KindSet::STRUCTURED_BINDING,
            Kind::Constructor => KindSet::CONSTRUCTOR,
            Kind::Destructor => KindSet::DESTRUCTOR,
            Kind::AppleBlock => KindSet::APPLE_BLOCK,
            Kind::Function => KindSet::FUNCTION,
            Kind::Lambda => KindSet::LAMBDA,
            Kind::Operator => KindSet::OPERATOR,
            Kind::UserDefConversion => KindSet::USER_DEF_CONVERSION,
            Kind::UserDefLiteral => KindSet::USER_DEF_LITERAL,
        }
    }

    pub fn is(self, set: KindSet) -> bool {
        set.contains(self.set())
    }

    /// Pseudo-English name, as used in diagnostics and English output.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Placeholder => "placeholder",
            Kind::Builtin => "built-in type",
            Kind::Capture => "capture",
            Kind::ClassStructUnion => "class, struct, or union",
            Kind::Concept => "concept",
            Kind::Name => "name",
            Kind::Typedef => "type",
            Kind::Variadic => "variadic",
            Kind::Array => "array",
            Kind::Cast => "cast",
            Kind::Enum => "enum",
            Kind::Pointer => "pointer",
            Kind::PointerToMember => "pointer to member",
            Kind::Reference => "reference",
            Kind::RvalueReference => "rvalue reference",
            Kind::StructuredBinding => "structured binding",
            Kind::Constructor => "constructor",
            Kind::Destructor => "destructor",
            Kind::AppleBlock => "block",
            Kind::Function => "function",
            Kind::Lambda => "lambda",
            Kind::Operator => "operator",
            Kind::UserDefConversion => "user-defined conversion operator",
            Kind::UserDefLiteral => "user-defined literal",
        }
    }
}

/// The size of an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArraySize {
    /// `[]`
    Unspecified,
    Int(u64),
    /// Variable-length array sized by a named object: `[n]`.
    Named(String),
    /// Variable-length array of unspecified size: `[*]`.
    VlaStar,
}

/// How a lambda captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// `=`
    DefaultCopy,
    /// `&`
    DefaultReference,
    /// `x`
    Copy,
    /// `&x`
    Reference,
    This,
    StarThis,
}

/// The flavor of a cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    C,
    Const,
    Dynamic,
    Reinterpret,
    Static,
}

impl CastKind {
    pub fn c_keyword(self) -> Option<&'static str> {
        match self {
            CastKind::C => None,
            CastKind::Const => Some("const_cast"),
            CastKind::Dynamic => Some("dynamic_cast"),
            CastKind::Reinterpret => Some("reinterpret_cast"),
            CastKind::Static => Some("static_cast"),
        }
    }

    pub fn english(self) -> Option<&'static str> {
        match self {
            CastKind::C => None,
            CastKind::Const => Some("const"),
            CastKind::Dynamic => Some("dynamic"),
            CastKind::Reinterpret => Some("reinterpret"),
            CastKind::Static => Some("static"),
        }
    }
}

/// Whether a function or operator was declared as a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FuncMember {
    #[default]
    Unspecified,
    Member,
    NonMember,
}

/// A node's kind together with its kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum AstKind {
    Placeholder,
    Builtin {
        bit_width: u32,
    },
    Capture {
        capture: CaptureKind,
    },
    ClassStructUnion {
        csu_name: SName,
    },
    Concept {
        concept_name: SName,
    },
    /// A K&R C untyped parameter.
    Name,
    Typedef {
        /// Root of the typedef's own type, copied into this arena.
        for_ast: AstId,
        bit_width: u32,
    },
    Variadic,
    Array {
        size: ArraySize,
        of: AstId,
    },
    Cast {
        cast: CastKind,
        to: AstId,
    },
    Enum {
        enum_name: SName,
        /// Fixed underlying type, if any (not part of the declarator chain).
        of: Option<AstId>,
        bit_width: u32,
    },
    Pointer {
        to: AstId,
    },
    PointerToMember {
        class_name: SName,
        to: AstId,
    },
    Reference {
        to: AstId,
    },
    RvalueReference {
        to: AstId,
    },
    StructuredBinding {
        names: Vec<SName>,
    },
    Constructor {
        params: Vec<AstId>,
    },
    Destructor,
    AppleBlock {
        params: Vec<AstId>,
        ret: AstId,
    },
    Function {
        params: Vec<AstId>,
        ret: AstId,
        member: FuncMember,
    },
    Lambda {
        captures: Vec<AstId>,
        params: Vec<AstId>,
        ret: Option<AstId>,
    },
    Operator {
        oper: OperId,
        params: Vec<AstId>,
        ret: AstId,
        member: FuncMember,
    },
    UserDefConversion {
        to: AstId,
    },
    UserDefLiteral {
        params: Vec<AstId>,
        ret: AstId,
    },
}

impl AstKind {
    pub fn kind(&self) -> Kind {
        match self {
            AstKind::Placeholder => Kind::Placeholder,
            AstKind::Builtin { .. } => Kind::Builtin,
            AstKind::Capture { .. } => Kind::Capture,
            AstKind::ClassStructUnion { .. } => Kind::ClassStructUnion,
            AstKind::Concept { .. } => Kind::Concept,
            AstKind::Name => Kind::Name,
            AstKind::Typedef { .. } => Kind::Typedef,
            AstKind::Variadic => Kind::Variadic,
            AstKind::Array { .. } => Kind::Array,
            AstKind::Cast { .. } => Kind::Cast,
            AstKind::Enum { .. } => Kind::Enum,
            AstKind::Pointer { .. } => Kind::Pointer,
            AstKind::PointerToMember { .. } => Kind::PointerToMember,
            AstKind::Reference { .. } => Kind::Reference,
            AstKind::RvalueReference { .. } => Kind::RvalueReference,
            AstKind::StructuredBinding { .. } => Kind::StructuredBinding,
            AstKind::Constructor { .. } => Kind::Constructor,
            AstKind::Destructor => Kind::Destructor,
            AstKind::AppleBlock { .. } => Kind::AppleBlock,
            AstKind::Function { .. } => Kind::Function,
            AstKind::Lambda { .. } => Kind::Lambda,
            AstKind::Operator { .. } => Kind::Operator,
            AstKind::UserDefConversion { .. } => Kind::UserDefConversion,
            AstKind::UserDefLiteral { .. } => Kind::UserDefLiteral,
        }
    }

    /// The single child in the declarator chain: the array element, the
    /// pointee, the return type, or the cast/conversion target.
    pub fn child(&self) -> Option<AstId> {
        match self {
            AstKind::Array { of: c, .. }
            | AstKind::Cast { to: c, .. }
            | AstKind::Pointer { to: c }
            | AstKind::PointerToMember { to: c, .. }
            | AstKind::Reference { to: c }
            | AstKind::RvalueReference { to: c }
            | AstKind::AppleBlock { ret: c, .. }
            | AstKind::Function { ret: c, .. }
            | AstKind::Operator { ret: c, .. }
            | AstKind::UserDefConversion { to: c }
            | AstKind::UserDefLiteral { ret: c, .. } => Some(*c),
            AstKind::Lambda { ret, .. } => *ret,
            _ => None,
        }
    }

    pub fn child_mut(&mut self) -> Option<&mut AstId> {
        match self {
            AstKind::Array { of: c, .. }
            | AstKind::Cast { to: c, .. }
            | AstKind::Pointer { to: c }
            | AstKind::PointerToMember { to: c, .. }
            | AstKind::Reference { to: c }
            | AstKind::RvalueReference { to: c }
            | AstKind::AppleBlock { ret: c, .. }
            | AstKind::Function { ret: c, .. }
            | AstKind::Operator { ret: c, .. }
            | AstKind::UserDefConversion { to: c }
            | AstKind::UserDefLiteral { ret: c, .. } => Some(c),
            AstKind::Lambda { ret, .. } => ret.as_mut(),
            _ => None,
        }
    }

    /// Parameters of a function-like kind; empty for everything else.
    pub fn params(&self) -> &[AstId] {
        match self {
            AstKind::Constructor { params }
            | AstKind::AppleBlock { params, .. }
            | AstKind::Function { params, .. }
            | AstKind::Lambda { params, .. }
            | AstKind::Operator { params, .. }
            | AstKind::UserDefLiteral { params, .. } => params,
            _ => &[],
        }
    }

    pub fn params_mut(&mut self) -> Option<&mut Vec<AstId>> {
        match self {
            AstKind::Constructor { params }
            | AstKind::AppleBlock { params, .. }
            | AstKind::Function { params, .. }
            | AstKind::Lambda { params, .. }
            | AstKind::Operator { params, .. }
            | AstKind::UserDefLiteral { params, .. } => Some(params),
            _ => None,
        }
    }

    pub fn bit_width(&self) -> u32 {
        match self {
            AstKind::Builtin { bit_width }
            | AstKind::Typedef { bit_width, .. }
            | AstKind::Enum { bit_width, .. } => *bit_width,
            _ => 0,
        }
    }

    pub fn set_bit_width(&mut self, width: u32) -> bool {
        match self {
            AstKind::Builtin { bit_width }
            | AstKind::Typedef { bit_width, .. }
            | AstKind::Enum { bit_width, .. } => {
                *bit_width = width;
                true
            }
            _ => false,
        }
    }

    pub fn member(&self) -> FuncMember {
        match self {
            AstKind::Function { member, .. } | AstKind::Operator { member, .. } => *member,
            _ => FuncMember::Unspecified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_sets() {
        assert!(Kind::Pointer.is(KindSet::POINTER_LIKE));
        assert!(Kind::RvalueReference.is(KindSet::ANY_REFERENCE));
        assert!(!Kind::Array.is(KindSet::FUNCTION_LIKE));
        assert!(Kind::Constructor.is(KindSet::FUNCTION_LIKE));
        assert!(!Kind::Constructor.is(KindSet::PARENT));
        assert!(Kind::Typedef.is(KindSet::TYPE_LEAF));
    }

    #[test]
    fn test_child_access() {
        let mut k = AstKind::Pointer { to: AstId(3) };
        assert_eq!(k.child(), Some(AstId(3)));
        if let Some(c) = k.child_mut() {
            *c = AstId(7);
        }
        assert_eq!(k, AstKind::Pointer { to: AstId(7) });
        assert_eq!(AstKind::Lambda { captures: vec![], params: vec![], ret: None }.child(), None);
        assert!(AstKind::Placeholder.params().is_empty());
    }
}
