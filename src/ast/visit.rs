//! Traversal, lookup and copying.

use super::{Ast, AstId, AstKind, Kind, KindSet, SName};
use crate::types::{Base, CType};

/// Direction of a chain traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitDir {
    /// From a node towards its leaf, following the chain child.
    Down,
    /// From a node towards its root, following `parent`.
    Up,
}

impl Ast {
    /// Visits `start` and then every node in `dir` until `f` returns true,
    /// returning that node.
    pub fn visit(
        &self,
        start: AstId,
        dir: VisitDir,
        mut f: impl FnMut(&Ast, AstId) -> bool,
    ) -> Option<AstId> {
        let mut id = start;
        loop {
            if f(self, id) {
                return Some(id);
            }
            let next = match dir {
                VisitDir::Down => self.child(id),
                VisitDir::Up => self[id].parent,
            };
            id = next?;
        }
    }

    pub fn find_kind(&self, start: AstId, dir: VisitDir, kinds: KindSet) -> Option<AstId> {
        self.visit(start, dir, |ast, id| ast.is_kind(id, kinds))
    }

    /// The first non-empty name in `dir`.
    pub fn find_name(&self, start: AstId, dir: VisitDir) -> Option<&SName> {
        let id = self.visit(start, dir, |ast, id| !ast[id].sname.is_empty())?;
        Some(&self[id].sname)
    }

    pub fn root(&self, id: AstId) -> AstId {
        let mut id = id;
        while let Some(parent) = self[id].parent {
            id = parent;
        }
        id
    }

    pub fn leaf(&self, id: AstId) -> AstId {
        let mut id = id;
        while let Some(child) = self.child(id) {
            id = child;
        }
        id
    }

    /// Follows typedefs to the type they name.
    pub fn untypedef(&self, id: AstId) -> AstId {
        let mut id = id;
        while let AstKind::Typedef { for_ast, .. } = self[id].kind {
            id = for_ast;
        }
        id
    }

    /// The pointee of a (possibly typedef'd) pointer.
    pub fn unpointer(&self, id: AstId) -> Option<AstId> {
        let id = self.untypedef(id);
        match self[id].kind {
            AstKind::Pointer { to } => Some(self.untypedef(to)),
            _ => None,
        }
    }

    /// Strips every level of reference, collapsing `& &&` and friends.
    pub fn unreference(&self, id: AstId) -> AstId {
        let mut id = self.untypedef(id);
        while let AstKind::Reference { to } | AstKind::RvalueReference { to } = self[id].kind {
            id = self.untypedef(to);
        }
        id
    }

    /// Whether `id` (through typedefs) is a built-in type with exactly the
    /// given base bits.
    pub fn is_builtin(&self, id: AstId, base: Base) -> bool {
        let id = self.untypedef(id);
        self.kind(id) == Kind::Builtin && self[id].ty.base == base
    }

    /// The accumulated qualifiers of `id` and the typedefs it goes through.
    pub fn qualified_type(&self, id: AstId) -> CType {
        let mut ty = self[id].ty;
        let mut id = id;
        while let AstKind::Typedef { for_ast, .. } = self[id].kind {
            id = for_ast;
            ty.qual |= self[id].ty.qual;
        }
        ty
    }

    /// Deep-copies the tree rooted at `id` within this arena. Typedef targets
    /// are shared, not copied.
    pub fn dup(&mut self, id: AstId) -> AstId {
        let node = self[id].clone();
        let mut kind = node.kind.clone();
        if let Some(params) = kind.params_mut() {
            let copies: Vec<AstId> = params.clone().into_iter().map(|p| self.dup(p)).collect();
            *params = copies;
        }
        if let AstKind::Lambda { captures, .. } = &mut kind {
            let copies: Vec<AstId> = captures.clone().into_iter().map(|c| self.dup(c)).collect();
            *captures = copies;
        }
        if let AstKind::Enum { of: Some(of), .. } = &mut kind {
            *of = self.dup(*of);
        }
        if let Some(child) = kind.child_mut() {
            *child = self.dup(*child);
        }
        let new = self.alloc(kind, node.depth, node.loc);
        self[new].ty = node.ty;
        self[new].sname = node.sname;
        new
    }

    /// Deep-copies the tree rooted at `id` of `src` into this arena,
    /// including typedef targets.
    pub fn copy_from(&mut self, src: &Ast, id: AstId) -> AstId {
        let node = &src[id];
        let mut kind = node.kind.clone();
        if let Some(params) = kind.params_mut() {
            *params = params.iter().map(|p| self.copy_from(src, *p)).collect();
        }
        match &mut kind {
            AstKind::Lambda { captures, .. } => {
                *captures = captures.iter().map(|c| self.copy_from(src, *c)).collect();
            }
            AstKind::Enum { of: Some(of), .. } => *of = self.copy_from(src, *of),
            AstKind::Typedef { for_ast, .. } => *for_ast = self.copy_from(src, *for_ast),
            _ => {}
        }
        if let Some(child) = kind.child_mut() {
            *child = self.copy_from(src, *child);
        }
        let new = self.alloc(kind, node.depth, node.loc);
        self[new].ty = node.ty;
        self[new].sname = node.sname.clone();
        new
    }

    /// Structural equality of two trees, possibly in different arenas.
    /// Declarator names (of the root and of parameters) are ignored; names
    /// that are part of a type (`struct S`, typedef names) are not.
    pub fn equal(a: &Ast, ai: AstId, b: &Ast, bi: AstId) -> bool {
        let (na, nb) = (&a[ai], &b[bi]);
        if !na.ty.equiv(&nb.ty) {
            return false;
        }
        let same_list = |xs: &[AstId], ys: &[AstId]| {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| Ast::equal(a, *x, b, *y))
        };
        let payload_equal = match (&na.kind, &nb.kind) {
            (AstKind::Builtin { bit_width: x }, AstKind::Builtin { bit_width: y }) => x == y,
            (
                AstKind::ClassStructUnion { csu_name: x },
                AstKind::ClassStructUnion { csu_name: y },
            ) => x == y,
            (AstKind::Concept { concept_name: x }, AstKind::Concept { concept_name: y }) => x == y,
            (
                AstKind::Typedef {
                    for_ast: x,
                    bit_width: wx,
                },
                AstKind::Typedef {
                    for_ast: y,
                    bit_width: wy,
                },
            ) => wx == wy && a[*x].sname == b[*y].sname,
            (
                AstKind::Enum {
                    enum_name: x,
                    of: ox,
                    bit_width: wx,
                },
                AstKind::Enum {
                    enum_name: y,
                    of: oy,
                    bit_width: wy,
                },
            ) => {
                x == y
                    && wx == wy
                    && match (ox, oy) {
                        (Some(ox), Some(oy)) => Ast::equal(a, *ox, b, *oy),
                        (None, None) => true,
                        _ => false,
                    }
            }
            (AstKind::Array { size: x, .. }, AstKind::Array { size: y, .. }) => x == y,
            (AstKind::Cast { cast: x, .. }, AstKind::Cast { cast: y, .. }) => x == y,
            (
                AstKind::PointerToMember { class_name: x, .. },
                AstKind::PointerToMember { class_name: y, .. },
            ) => x == y,
            (AstKind::StructuredBinding { names: x }, AstKind::StructuredBinding { names: y }) => {
                x == y
            }
            (AstKind::Capture { capture: x }, AstKind::Capture { capture: y }) => {
                x == y && na.sname == nb.sname
            }
            (AstKind::Operator { oper: x, .. }, AstKind::Operator { oper: y, .. }) => x == y,
            (
                AstKind::Lambda { captures: x, .. },
                AstKind::Lambda { captures: y, .. },
            ) => same_list(x, y),
            (x, y) => x.kind() == y.kind(),
        };
        if !payload_equal || !same_list(na.kind.params(), nb.kind.params()) {
            return false;
        }
        match (na.kind.child(), nb.kind.child()) {
            (Some(x), Some(y)) => Ast::equal(a, x, b, y),
            (None, None) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SourceLocation;
    use crate::types::Qual;

    fn loc() -> SourceLocation {
        SourceLocation::default()
    }

    /// pointer to pointer to int
    fn ptr_ptr_int(ast: &mut Ast) -> AstId {
        let outer = ast.new_pointer(0, loc());
        let inner = ast.new_pointer(0, loc());
        let int = ast.new_builtin(CType::from_base(Base::INT), loc());
        ast.set_parent(int, inner);
        ast.set_parent(inner, outer);
        outer
    }

    #[test]
    fn test_visit_and_find() {
        let mut ast = Ast::new();
        let root = ptr_ptr_int(&mut ast);
        let leaf = ast.leaf(root);
        assert_eq!(ast.kind(leaf), Kind::Builtin);
        assert_eq!(ast.root(leaf), root);
        assert_eq!(ast.find_kind(root, VisitDir::Down, KindSet::BUILTIN), Some(leaf));
        assert_eq!(ast.find_kind(leaf, VisitDir::Up, KindSet::POINTER), ast[leaf].parent);
        assert!(ast.find_kind(root, VisitDir::Down, KindSet::ARRAY).is_none());
    }

    #[test]
    fn test_find_name() {
        let mut ast = Ast::new();
        let root = ptr_ptr_int(&mut ast);
        assert!(ast.find_name(root, VisitDir::Down).is_none());
        ast[root].sname = SName::local("pp");
        let leaf = ast.leaf(root);
        assert_eq!(ast.find_name(leaf, VisitDir::Up).map(|s| s.full_name()), Some("pp".into()));
    }

    #[test]
    fn test_unreference_collapses() {
        let mut ast = Ast::new();
        let r1 = ast.new_parent(|to| AstKind::Reference { to }, 0, loc());
        let r2 = ast.new_parent(|to| AstKind::RvalueReference { to }, 0, loc());
        let int = ast.new_builtin(CType::from_base(Base::INT), loc());
        ast.set_parent(int, r2);
        ast.set_parent(r2, r1);
        assert_eq!(ast.unreference(r1), int);
    }

    #[test]
    fn test_dup_and_equal() {
        let mut ast = Ast::new();
        let root = ptr_ptr_int(&mut ast);
        ast[root].sname = SName::local("p");
        let copy = ast.dup(root);
        assert_ne!(copy, root);
        assert!(Ast::equal(&ast, root, &ast, copy));
        assert_eq!(ast.root(ast.leaf(copy)), copy);

        let leaf = ast.leaf(copy);
        ast[leaf].ty.qual = Qual::CONST;
        assert!(!Ast::equal(&ast, root, &ast, copy));
    }

    #[test]
    fn test_copy_between_arenas() {
        let mut src = Ast::new();
        let root = ptr_ptr_int(&mut src);
        let mut dst = Ast::new();
        dst.new_placeholder(0, loc());
        let copy = dst.copy_from(&src, root);
        assert!(Ast::equal(&src, root, &dst, copy));
        assert_eq!(dst.unpointer(copy).map(|id| dst.kind(id)), Some(Kind::Pointer));
    }
}
