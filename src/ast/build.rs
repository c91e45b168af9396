//! Construction and splicing
//!
//! The grammars never link nodes directly. They allocate nodes and hand them
//! to the operations here, which decide where in a partially built chain a
//! node belongs and return the chain's (possibly new) root:
//!
//! - [`Ast::append_array`]: grafts an array below whatever an array suffix
//!   binds tighter than, so `x[3][5]` is "array 3 of array 5" and `(*p)[3]`
//!   is "pointer to array 3".
//! - [`Ast::append_function`]: same for a parameter list, also moving storage
//!   bits from the return type to the function.
//! - [`Ast::patch_placeholder`]: fills a chain's placeholder with a type (or
//!   with another chain).

use super::visit::VisitDir;
use super::{Ast, AstId, Kind, KindSet, SName};
use crate::types::CType;
use tracing::trace;

/// Moves the storage-class bits and attributes of a return type to the
/// function returning it. Returns the new `(ret, func)` types; the storage
/// ends up in exactly one of them.
pub fn steal_storage(ret: CType, func: CType) -> (CType, CType) {
    let mut ret = ret;
    let stolen = ret.take_storage();
    (ret, func | stolen)
}

impl Ast {
    /// Makes `child` the chain child of `parent`, replacing whatever was
    /// there. A no-op for kinds without a chain child.
    pub fn set_parent(&mut self, child: AstId, parent: AstId) {
        debug_assert!(child != parent);
        match self[parent].kind.child_mut() {
            Some(slot) => *slot = child,
            None => return,
        }
        self[child].parent = Some(parent);
    }

    /// Grafts `array` into the chain rooted at `ast` and returns the new
    /// root. `array` must still have its placeholder element.
    ///
    /// The array descends through arrays (a later `[N]` is an inner
    /// dimension), through pointers and references parsed at a deeper
    /// parenthesis level than the array (`(*p)[3]`), and through the return
    /// type of functions. It replaces a placeholder, or otherwise becomes the
    /// parent of the node it stopped at.
    pub fn append_array(&mut self, ast: AstId, array: AstId) -> AstId {
        debug_assert_eq!(self.kind(array), Kind::Array);
        debug_assert!(self
            .child(array)
            .is_some_and(|of| self.kind(of) == Kind::Placeholder));

        let descend = match self.kind(ast) {
            Kind::Array => true,
            k if k.is(KindSet::POINTER_LIKE) => self[ast].depth > self[array].depth,
            k if k.is(KindSet::FUNCTION_LIKE_RET) => self.child(ast).is_some(),
            _ => false,
        };

        if descend {
            if let Some(child) = self.child(ast) {
                let new_child = self.append_array(child, array);
                self.set_parent(new_child, ast);
            }
            return ast;
        }

        let parent = self[ast].parent;
        if self.kind(ast) != Kind::Placeholder {
            // the array becomes the parent of what it stopped at
            self.set_parent(ast, array);
        }
        if parent.is_none() {
            self.move_name(ast, array);
        }
        self[array].parent = parent;
        trace!(?ast, ?array, "append_array");
        array
    }

    /// Grafts the function-like `func` returning `ret` into the chain rooted
    /// at `ast` and returns the new root.
    ///
    /// The function goes into the chain's innermost placeholder slot,
    /// descending one level at a time through arrays, through pointers and
    /// references parsed at a deeper parenthesis level than the function, and
    /// through the return types of other functions. If no placeholder is
    /// reached the function is placed above the node it stopped at. The
    /// storage class of the return type then moves to the function (`static
    /// int f()` declares a static function, not a function returning a
    /// static int).
    pub fn append_function(&mut self, ast: AstId, ret: AstId, func: AstId) -> AstId {
        debug_assert!(self.is_kind(func, KindSet::FUNCTION_LIKE));

        let descend = match self.kind(ast) {
            Kind::Array => true,
            k if k.is(KindSet::POINTER_LIKE) => self[ast].depth > self[func].depth,
            k if k.is(KindSet::FUNCTION_LIKE_RET) => ast != func && self.child(ast).is_some(),
            _ => false,
        };

        if descend {
            if let Some(child) = self.child(ast) {
                let new_child = self.append_function(child, ret, func);
                self.set_parent(new_child, ast);
            }
            return ast;
        }

        let parent = self[ast].parent;
        if parent.is_none() {
            self.move_name(ast, func);
        }
        let mut ret = ret;
        if self.kind(ast) != Kind::Placeholder && self.kind(ret) == Kind::Placeholder {
            ret = ast;
        }
        if ret != func {
            self.set_parent(ret, func);
        }
        self[func].parent = parent;

        let from = self
            .find_kind(ret, VisitDir::Down, KindSet::TYPE_LEAF)
            .unwrap_or(ret);
        let (ret_ty, func_ty) = steal_storage(self[from].ty, self[func].ty);
        self[from].ty = ret_ty;
        self[func].ty = func_ty;
        trace!(?ast, ?ret, ?func, "append_function");
        func
    }

    /// Replaces the placeholder in the declarator chain `decl` with the type
    /// `ty` and returns the new root.
    ///
    /// If `decl` is nothing but a (possibly named) placeholder, the type
    /// itself becomes the root and takes its name. Otherwise the type is
    /// spliced in and the storage class of its leaf moves to the root of
    /// `decl`. If `decl` has no placeholder left (a trailing return type, a
    /// constructor), only the storage class moves.
    pub fn patch_placeholder(&mut self, ty: AstId, decl: AstId) -> AstId {
        let ty = self.root(ty);
        let Some(placeholder) = self.find_kind(decl, VisitDir::Down, KindSet::PLACEHOLDER) else {
            let taken = self.take_storage(ty);
            self[decl].ty = self[decl].ty | taken;
            return decl;
        };

        if placeholder == decl {
            self.move_name(decl, ty);
            return ty;
        }

        if let Some(parent) = self[placeholder].parent {
            self.set_parent(ty, parent);
        }
        let taken = self.take_storage(ty);
        self[decl].ty = self[decl].ty | taken;
        trace!(?ty, ?decl, "patch_placeholder");
        decl
    }

    /// Detaches and returns the first name found going down from `id`.
    pub fn take_name(&mut self, id: AstId) -> SName {
        match self.visit(id, VisitDir::Down, |ast, id| !ast[id].sname.is_empty()) {
            Some(named) => std::mem::take(&mut self[named].sname),
            None => SName::new(),
        }
    }

    /// Removes and returns the storage bits of the type leaf below `id`.
    pub fn take_storage(&mut self, id: AstId) -> CType {
        match self.find_kind(id, VisitDir::Down, KindSet::TYPE_LEAF) {
            Some(leaf) => self[leaf].ty.take_storage(),
            None => CType::NONE,
        }
    }

    /// Gives `from`'s name to `to` unless `to` already has one.
    fn move_name(&mut self, from: AstId, to: AstId) {
        if self[to].sname.is_empty() && !self[from].sname.is_empty() {
            self[to].sname = std::mem::take(&mut self[from].sname);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArraySize, FuncMember, SourceLocation};
    use crate::types::{Base, Storage};

    fn loc() -> SourceLocation {
        SourceLocation::default()
    }

    fn named_placeholder(ast: &mut Ast, name: &str) -> AstId {
        let ph = ast.new_placeholder(0, loc());
        ast[ph].sname = SName::local(name);
        ph
    }

    #[test]
    fn test_steal_storage_moves_once() {
        let ret = CType::from_base(Base::INT) | CType::from_storage(Storage::STATIC);
        let func = CType::NONE;
        let (ret, func) = steal_storage(ret, func);
        assert_eq!(ret, CType::from_base(Base::INT));
        assert_eq!(func.storage, Storage::STATIC);
    }

    #[test]
    fn test_array_of_array() {
        let mut ast = Ast::new();
        let x = named_placeholder(&mut ast, "x");
        let a3 = ast.new_array(ArraySize::Int(3), 0, loc());
        let root = ast.append_array(x, a3);
        assert_eq!(root, a3);
        assert_eq!(ast[a3].sname.full_name(), "x");

        let a5 = ast.new_array(ArraySize::Int(5), 0, loc());
        let root = ast.append_array(root, a5);
        assert_eq!(root, a3);
        assert_eq!(ast.child(a3), Some(a5));
        assert_eq!(ast.kind(ast.child(a5).unwrap()), Kind::Placeholder);
    }

    #[test]
    fn test_array_through_deeper_pointer() {
        // (*p)[3]
        let mut ast = Ast::new();
        let p = ast.new_pointer(1, loc());
        ast[p].sname = SName::local("p");
        let a = ast.new_array(ArraySize::Int(3), 0, loc());
        let root = ast.append_array(p, a);
        assert_eq!(root, p);
        assert_eq!(ast.child(p), Some(a));
        assert_eq!(ast[a].parent, Some(p));
    }

    #[test]
    fn test_array_above_same_depth_pointer() {
        let mut ast = Ast::new();
        let p = ast.new_pointer(0, loc());
        ast[p].sname = SName::local("q");
        let a = ast.new_array(ArraySize::Int(2), 0, loc());
        let root = ast.append_array(p, a);
        assert_eq!(root, a);
        assert_eq!(ast.child(a), Some(p));
        assert_eq!(ast[a].sname.full_name(), "q");
        assert!(ast[p].sname.is_empty());
    }

    #[test]
    fn test_function_into_pointer() {
        // (*x)(int) returning char
        let mut ast = Ast::new();
        let p = ast.new_pointer(1, loc());
        ast[p].sname = SName::local("x");
        let f = ast.new_function(vec![], FuncMember::Unspecified, 0, loc());
        let ret = ast.child(f).unwrap();
        let root = ast.append_function(p, ret, f);
        assert_eq!(root, p);
        assert_eq!(ast.child(p), Some(f));

        let char_ty = ast.new_builtin(CType::from_base(Base::CHAR), loc());
        let root = ast.patch_placeholder(char_ty, root);
        assert_eq!(root, p);
        assert_eq!(ast.leaf(p), char_ty);
        assert_eq!(ast[char_ty].parent, Some(f));
    }

    #[test]
    fn test_function_steals_storage_from_return() {
        let mut ast = Ast::new();
        let chain = named_placeholder(&mut ast, "f");
        let f = ast.new_function(vec![], FuncMember::Unspecified, 0, loc());
        let ret = ast.new_builtin(
            CType::from_base(Base::INT) | CType::from_storage(Storage::STATIC),
            loc(),
        );
        let root = ast.append_function(chain, ret, f);
        assert_eq!(root, f);
        assert_eq!(ast[f].sname.full_name(), "f");
        assert_eq!(ast[f].ty.storage, Storage::STATIC);
        assert!(ast[ret].ty.storage.is_empty());
        assert_eq!(ast.child(f), Some(ret));
    }

    #[test]
    fn test_patch_named_placeholder() {
        let mut ast = Ast::new();
        let x = named_placeholder(&mut ast, "x");
        let int = ast.new_builtin(
            CType::from_base(Base::INT) | CType::from_storage(Storage::STATIC),
            loc(),
        );
        let root = ast.patch_placeholder(int, x);
        assert_eq!(root, int);
        assert_eq!(ast[int].sname.full_name(), "x");
        assert_eq!(ast[int].ty.storage, Storage::STATIC);
    }

    #[test]
    fn test_patch_moves_storage_to_root() {
        // static int *p
        let mut ast = Ast::new();
        let p = ast.new_pointer(0, loc());
        ast[p].sname = SName::local("p");
        let int = ast.new_builtin(
            CType::from_base(Base::INT) | CType::from_storage(Storage::STATIC),
            loc(),
        );
        let root = ast.patch_placeholder(int, p);
        assert_eq!(root, p);
        assert_eq!(ast[p].ty.storage, Storage::STATIC);
        assert!(ast[int].ty.storage.is_empty());
        assert_eq!(ast.child(p), Some(int));
    }

    #[test]
    fn test_take_name() {
        let mut ast = Ast::new();
        let x = named_placeholder(&mut ast, "x");
        assert_eq!(ast.take_name(x).full_name(), "x");
        assert!(ast[x].sname.is_empty());
        assert!(ast.take_name(x).is_empty());
    }
}
