//! Declaration AST
//!
//! Nodes live in an [`Ast`] arena and refer to each other by [`AstId`].
//! Every node owns at most one chain child (see [`AstKind::child`]) plus any
//! parameter roots; the `parent` field is a back-reference used only when
//! splicing.
//!
//! Declarations are built incrementally (see [`build`]): parent kinds are
//! always allocated with a fresh placeholder child, so a chain under
//! construction has exactly one placeholder at its innermost slot until the
//! base type is patched in.

pub mod build;
pub mod kind;
pub mod operator;
pub mod sname;
pub mod visit;

pub use kind::{ArraySize, AstKind, CaptureKind, CastKind, FuncMember, Kind, KindSet};
pub use operator::OperId;
pub use sname::{SGlob, SName};

use crate::types::CType;
use std::ops::{Index, IndexMut};

/// Source location of a token or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub end_column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            end_column: column,
        }
    }

    /// The range from the start of `self` to the end of `end`.
    pub fn to(self, end: SourceLocation) -> Self {
        Self {
            line: self.line,
            column: self.column,
            end_column: end.end_column.max(end.column),
        }
    }
}

/// Index of a node in its [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AstId(pub(crate) usize);

impl AstId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: AstKind,
    pub ty: CType,
    pub sname: SName,
    pub loc: SourceLocation,
    /// Parenthesis nesting level at which the node was parsed.
    pub depth: u32,
    pub parent: Option<AstId>,
}

/// Arena holding every node of one or more declarations.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<AstNode>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocates a node. The chain child named by `kind`, if any, is adopted.
    pub fn alloc(&mut self, kind: AstKind, depth: u32, loc: SourceLocation) -> AstId {
        let id = AstId(self.nodes.len());
        let child = kind.child();
        self.nodes.push(AstNode {
            kind,
            ty: CType::NONE,
            sname: SName::new(),
            loc,
            depth,
            parent: None,
        });
        if let Some(child) = child {
            self.nodes[child.0].parent = Some(id);
        }
        id
    }

    pub fn new_placeholder(&mut self, depth: u32, loc: SourceLocation) -> AstId {
        self.alloc(AstKind::Placeholder, depth, loc)
    }

    /// Allocates a parent kind whose child slot holds a fresh placeholder.
    pub fn new_parent(
        &mut self,
        make: impl FnOnce(AstId) -> AstKind,
        depth: u32,
        loc: SourceLocation,
    ) -> AstId {
        let placeholder = self.new_placeholder(depth, loc);
        self.alloc(make(placeholder), depth, loc)
    }

    pub fn new_builtin(&mut self, ty: CType, loc: SourceLocation) -> AstId {
        let id = self.alloc(AstKind::Builtin { bit_width: 0 }, 0, loc);
        self[id].ty = ty;
        id
    }

    pub fn new_pointer(&mut self, depth: u32, loc: SourceLocation) -> AstId {
        self.new_parent(|to| AstKind::Pointer { to }, depth, loc)
    }

    pub fn new_array(&mut self, size: ArraySize, depth: u32, loc: SourceLocation) -> AstId {
        self.new_parent(|of| AstKind::Array { size, of }, depth, loc)
    }

    pub fn new_function(
        &mut self,
        params: Vec<AstId>,
        member: FuncMember,
        depth: u32,
        loc: SourceLocation,
    ) -> AstId {
        self.new_parent(
            |ret| AstKind::Function {
                params,
                ret,
                member,
            },
            depth,
            loc,
        )
    }

    pub fn kind(&self, id: AstId) -> Kind {
        self[id].kind.kind()
    }

    pub fn is_kind(&self, id: AstId, kinds: KindSet) -> bool {
        self.kind(id).is(kinds)
    }

    pub fn child(&self, id: AstId) -> Option<AstId> {
        self[id].kind.child()
    }

    pub fn params(&self, id: AstId) -> &[AstId] {
        self[id].kind.params()
    }

    pub fn ids(&self) -> impl Iterator<Item = AstId> {
        (0..self.nodes.len()).map(AstId)
    }
}

impl Index<AstId> for Ast {
    type Output = AstNode;

    fn index(&self, id: AstId) -> &AstNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<AstId> for Ast {
    fn index_mut(&mut self, id: AstId) -> &mut AstNode {
        &mut self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Base;

    #[test]
    fn test_parent_kinds_start_with_placeholder() {
        let mut ast = Ast::new();
        let p = ast.new_pointer(0, SourceLocation::default());
        let to = ast.child(p).unwrap();
        assert_eq!(ast.kind(to), Kind::Placeholder);
        assert_eq!(ast[to].parent, Some(p));
        assert_eq!(ast[p].parent, None);
    }

    #[test]
    fn test_builtin() {
        let mut ast = Ast::new();
        let b = ast.new_builtin(CType::from_base(Base::INT), SourceLocation::new(1, 5));
        assert_eq!(ast.kind(b), Kind::Builtin);
        assert_eq!(ast[b].ty.base, Base::INT);
        assert_eq!(ast[b].loc.column, 5);
        assert!(ast.child(b).is_none());
    }
}
