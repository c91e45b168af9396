//! C/C++ declaration printer.
//!
//! A declarator is printed inside-out: starting from the declared name, each
//! node from the root down wraps what has been printed so far (`*` in front,
//! `[N]` or a parameter list behind), parenthesizing where a suffix would
//! otherwise bind tighter than a prefix. The type leaf finally contributes
//! the specifiers that go in front of everything.

use super::ELLIPSIS;
use crate::ast::{ArraySize, Ast, AstId, AstKind, CaptureKind, KindSet, OperId, SName};
use crate::lang::Lang;
use crate::types::names::{self, func_trailer_c, qual_c};
use crate::types::{Base, CType, Qual, Storage};

#[derive(Debug, Clone, Copy)]
pub struct GibberishPrinter<'a> {
    ast: &'a Ast,
    lang: Lang,
    east_const: bool,
}

impl<'a> GibberishPrinter<'a> {
    pub fn new(ast: &'a Ast, lang: Lang) -> Self {
        Self {
            ast,
            lang,
            east_const: false,
        }
    }

    /// Prints qualifiers after the type they qualify: `int const`.
    pub fn east_const(mut self, east_const: bool) -> Self {
        self.east_const = east_const;
        self
    }

    /// A complete declaration of the root's name: `int (*p)[3]`.
    pub fn declaration(&self, root: AstId) -> String {
        match &self.ast[root].kind {
            AstKind::Cast { .. } => self.cast(root),
            _ => self.declarator(root, &self.declared_name(root)),
        }
    }

    /// The declaration with the name left out: `int (*)[3]`.
    pub fn type_name(&self, root: AstId) -> String {
        self.declarator(root, "")
    }

    /// `typedef int *P`
    pub fn typedef(&self, root: AstId) -> String {
        format!("typedef {}", self.declaration(root))
    }

    /// `using P = int*`
    pub fn using(&self, root: AstId) -> String {
        format!(
            "using {} = {}",
            self.ast[root].sname.full_name(),
            self.type_name(root)
        )
    }

    /// `(int*)x` or `static_cast<int*>(x)`.
    pub fn cast(&self, root: AstId) -> String {
        let node = &self.ast[root];
        let AstKind::Cast { cast, to } = &node.kind else {
            return self.declaration(root);
        };
        let name = node.sname.full_name();
        let to = self.type_name(*to);
        match cast.c_keyword() {
            None => format!("({to}){name}"),
            Some(keyword) => format!("{keyword}<{to}>({name})"),
        }
    }

    /// The name as it appears in the declarator. Operators and destructors
    /// store only their scope and class name respectively.
    fn declared_name(&self, id: AstId) -> String {
        let node = &self.ast[id];
        let sname = &node.sname;
        match &node.kind {
            AstKind::Operator { oper, .. } => {
                format!("{}{}", scope_prefix(sname, true), operator_name(*oper))
            }
            AstKind::UserDefLiteral { .. } => format!(
                "{}operator\"\" {}",
                scope_prefix(sname, false),
                sname.local_name()
            ),
            AstKind::Destructor => {
                format!("{}~{}", scope_prefix(sname, false), sname.local_name())
            }
            AstKind::StructuredBinding { names } => binding_list(names),
            _ => {
                let leaf = self.ast.leaf(id);
                match &self.ast[leaf].kind {
                    AstKind::StructuredBinding { names } if sname.is_empty() => {
                        binding_list(names)
                    }
                    _ => sname.full_name(),
                }
            }
        }
    }

    fn declarator(&self, root: AstId, name: &str) -> String {
        let mut out = name.to_string();
        let mut id = root;
        let mut after_prefix = false;
        loop {
            let node = &self.ast[id];
            match &node.kind {
                AstKind::Pointer { .. } => out = self.prefix("*", node.ty.qual, out),
                AstKind::PointerToMember { class_name, .. } => {
                    out = self.prefix(&format!("{class_name}::*"), node.ty.qual, out)
                }
                AstKind::Reference { .. } => out = self.prefix("&", node.ty.qual, out),
                AstKind::RvalueReference { .. } => out = self.prefix("&&", node.ty.qual, out),
                AstKind::Array { size, .. } => {
                    if after_prefix {
                        out = format!("({out})");
                    }
                    out.push_str(&array_suffix(node.ty.qual, size));
                }
                AstKind::Function { params, .. }
                | AstKind::Operator { params, .. }
                | AstKind::UserDefLiteral { params, .. } => {
                    if after_prefix {
                        out = format!("({out})");
                    }
                    out.push_str(&self.params(params));
                    out.push_str(&func_trailer_c(&node.ty));
                }
                AstKind::AppleBlock { params, .. } => {
                    out = self.prefix("^", node.ty.qual, out);
                    out = format!("({out}){}", self.params(params));
                    out.push_str(&func_trailer_c(&CType {
                        qual: Qual::empty(),
                        ..node.ty
                    }));
                }
                AstKind::Constructor { params } => {
                    out.push_str(&self.params(params));
                    out.push_str(&func_trailer_c(&node.ty));
                    return join(self.specifiers(node.ty), out);
                }
                AstKind::Destructor => {
                    out.push_str("()");
                    out.push_str(&func_trailer_c(&node.ty));
                    return join(self.specifiers(node.ty), out);
                }
                AstKind::UserDefConversion { to } => {
                    let decl = format!(
                        "{}operator {}(){}",
                        scope_prefix(&node.sname, true),
                        self.type_name(*to),
                        func_trailer_c(&node.ty)
                    );
                    return join(self.specifiers(node.ty), decl);
                }
                AstKind::Lambda { .. } => return self.lambda(id),
                AstKind::Cast { .. } => return self.cast(id),
                _ => return self.finish(root, id, out, name.is_empty()),
            }
            after_prefix = node.kind.kind().is(KindSet::POINTER_LIKE);
            match self.ast.child(id) {
                Some(child) => id = child,
                None => return out,
            }
        }
    }

    /// Puts the type leaf's specifiers (and the root's storage class) in
    /// front of the declarator.
    fn finish(&self, root: AstId, leaf: AstId, decl: String, is_abstract: bool) -> String {
        let node = &self.ast[leaf];
        let root_ty = self.ast[root].ty;
        let storage = CType {
            storage: node.ty.storage | root_ty.storage,
            attr: node.ty.attr | root_ty.attr,
            ..CType::NONE
        };
        let qual = node.ty.qual;

        let ty = match &node.kind {
            AstKind::Builtin { .. } => CType {
                base: node.ty.base,
                qual,
                ..storage
            }
            .c_name(self.lang, self.east_const),
            AstKind::ClassStructUnion { csu_name } => {
                let csu = names::base_c(node.ty.base & Base::CLASS_STRUCT_UNION, self.lang);
                let word = format!("{} {csu_name}", csu.join(" "));
                join(self.specifiers(storage), self.qualified(qual, &word))
            }
            AstKind::Enum { enum_name, of, .. } => {
                let enum_bits = node.ty.base & (Base::ENUM | Base::CLASS_STRUCT_UNION);
                let mut word = names::base_c(enum_bits, self.lang).join(" ");
                word.push(' ');
                word.push_str(&enum_name.full_name());
                if let Some(of) = of {
                    word.push_str(" : ");
                    word.push_str(&self.type_name(*of));
                }
                join(self.specifiers(storage), self.qualified(qual, &word))
            }
            AstKind::Typedef { for_ast, .. } => {
                let word = self.ast[*for_ast].sname.full_name();
                join(self.specifiers(storage), self.qualified(qual, &word))
            }
            AstKind::Concept { concept_name } => {
                let word = format!("{concept_name} auto");
                join(self.specifiers(storage), self.qualified(qual, &word))
            }
            AstKind::StructuredBinding { .. } => {
                join(self.specifiers(storage), self.qualified(qual, "auto"))
            }
            AstKind::Variadic => "...".to_string(),
            AstKind::Placeholder => ELLIPSIS.to_string(),
            // a K&R parameter: the name is the whole declaration
            _ => String::new(),
        };

        let mut out = if ty.is_empty() {
            decl
        } else if decl.is_empty() {
            ty
        } else if is_abstract && decl.starts_with(['*', '&']) {
            format!("{ty}{decl}")
        } else {
            format!("{ty} {decl}")
        };
        let width = node.kind.bit_width();
        if width > 0 {
            out.push_str(&format!(" : {width}"));
        }
        out
    }

    fn lambda(&self, id: AstId) -> String {
        let node = &self.ast[id];
        let AstKind::Lambda {
            captures,
            params,
            ret,
        } = &node.kind
        else {
            return String::new();
        };
        let captures: Vec<String> = captures.iter().map(|c| self.capture(*c)).collect();
        let mut out = format!("[{}]{}", captures.join(", "), self.params(params));
        for word in names::storage_c(node.ty.storage - Storage::FUNC_TRAILER, self.lang) {
            out.push(' ');
            out.push_str(word);
        }
        out.push_str(&func_trailer_c(&node.ty));
        if let Some(ret) = ret {
            out.push_str(" -> ");
            out.push_str(&self.type_name(*ret));
        }
        out
    }

    fn capture(&self, id: AstId) -> String {
        let node = &self.ast[id];
        let AstKind::Capture { capture } = node.kind else {
            return String::new();
        };
        match capture {
            CaptureKind::DefaultCopy => "=".to_string(),
            CaptureKind::DefaultReference => "&".to_string(),
            CaptureKind::Copy => node.sname.full_name(),
            CaptureKind::Reference => format!("&{}", node.sname),
            CaptureKind::This => "this".to_string(),
            CaptureKind::StarThis => "*this".to_string(),
        }
    }

    fn params(&self, params: &[AstId]) -> String {
        let params: Vec<String> = params.iter().map(|p| self.declaration(*p)).collect();
        format!("({})", params.join(", "))
    }

    /// `*`, `&` or `C::*` with the pointer's own qualifiers.
    fn prefix(&self, op: &str, qual: Qual, decl: String) -> String {
        let quals = qual_c(qual).join(" ");
        match (quals.is_empty(), decl.is_empty()) {
            (true, _) => format!("{op}{decl}"),
            (false, true) => format!("{op}{quals}"),
            (false, false) => format!("{op}{quals} {decl}"),
        }
    }

    /// Attributes and storage class only.
    fn specifiers(&self, ty: CType) -> String {
        CType {
            storage: ty.storage,
            attr: ty.attr,
            ..CType::NONE
        }
        .c_name(self.lang, false)
    }

    fn qualified(&self, qual: Qual, word: &str) -> String {
        let quals = qual_c(qual).join(" ");
        if quals.is_empty() {
            word.to_string()
        } else if self.east_const {
            format!("{word} {quals}")
        } else {
            format!("{quals} {word}")
        }
    }
}

/// `A::B::` for a name whose every component is a scope (`all_scope`), or
/// for the enclosing scopes of its local name otherwise.
fn scope_prefix(sname: &SName, all_scope: bool) -> String {
    let scope = if all_scope {
        sname.full_name()
    } else {
        sname.scope_name()
    };
    if scope.is_empty() {
        scope
    } else {
        format!("{scope}::")
    }
}

fn operator_name(oper: OperId) -> String {
    if oper.is_word() {
        format!("operator {}", oper.token())
    } else {
        format!("operator{}", oper.token())
    }
}

fn binding_list(names: &[SName]) -> String {
    let names: Vec<String> = names.iter().map(SName::full_name).collect();
    format!("[{}]", names.join(", "))
}

fn array_suffix(qual: Qual, size: &ArraySize) -> String {
    let mut words: Vec<String> = Vec::new();
    if qual.contains(Qual::NON_EMPTY) {
        words.push("static".to_string());
    }
    words.extend(qual_c(qual).into_iter().map(String::from));
    match size {
        ArraySize::Unspecified => {}
        ArraySize::Int(n) => words.push(n.to_string()),
        ArraySize::Named(n) => words.push(n.clone()),
        ArraySize::VlaStar => words.push("*".to_string()),
    }
    format!("[{}]", words.join(" "))
}

fn join(prefix: String, rest: String) -> String {
    match (prefix.is_empty(), rest.is_empty()) {
        (true, _) => rest,
        (false, true) => prefix,
        (false, false) => format!("{prefix} {rest}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CastKind, FuncMember, SourceLocation};

    fn loc() -> SourceLocation {
        SourceLocation::default()
    }

    fn int(ast: &mut Ast) -> AstId {
        ast.new_builtin(CType::from_base(Base::INT), loc())
    }

    #[test]
    fn test_pointer_to_array() {
        let mut ast = Ast::new();
        let p = ast.new_pointer(1, loc());
        ast[p].sname = SName::local("p");
        let a = ast.new_array(ArraySize::Int(3), 0, loc());
        let root = ast.append_array(p, a);
        let i = int(&mut ast);
        let root = ast.patch_placeholder(i, root);
        let printer = GibberishPrinter::new(&ast, Lang::C_23);
        assert_eq!(printer.declaration(root), "int (*p)[3]");
        assert_eq!(printer.type_name(root), "int (*)[3]");
    }

    #[test]
    fn test_array_of_const_pointer() {
        let mut ast = Ast::new();
        let a = ast.new_array(ArraySize::Int(4), 0, loc());
        ast[a].sname = SName::local("a");
        let p = ast.new_pointer(0, loc());
        ast[p].ty.qual = Qual::CONST;
        let c = ast.new_builtin(CType::from_base(Base::CHAR) | CType::from_qual(Qual::CONST), loc());
        ast.set_parent(c, p);
        ast.set_parent(p, a);
        let printer = GibberishPrinter::new(&ast, Lang::C_23);
        assert_eq!(printer.declaration(a), "const char *const a[4]");
        assert_eq!(printer.east_const(true).declaration(a), "char const *const a[4]");
    }

    #[test]
    fn test_pointer_to_function() {
        let mut ast = Ast::new();
        let p = ast.new_pointer(1, loc());
        ast[p].sname = SName::local("x");
        let param = int(&mut ast);
        let f = ast.new_function(vec![param], FuncMember::Unspecified, 0, loc());
        let ret = ast.child(f).unwrap();
        let root = ast.append_function(p, ret, f);
        let c = ast.new_builtin(CType::from_base(Base::CHAR), loc());
        let root = ast.patch_placeholder(c, root);
        let printer = GibberishPrinter::new(&ast, Lang::C_23);
        assert_eq!(printer.declaration(root), "char (*x)(int)");
    }

    #[test]
    fn test_static_storage_prints_first() {
        let mut ast = Ast::new();
        let p = ast.new_pointer(0, loc());
        ast[p].sname = SName::local("p");
        let i = ast.new_builtin(
            CType::from_base(Base::INT) | CType::from_storage(Storage::STATIC),
            loc(),
        );
        let root = ast.patch_placeholder(i, p);
        let printer = GibberishPrinter::new(&ast, Lang::C_23);
        assert_eq!(printer.declaration(root), "static int *p");

        ast[p].ty.storage = Storage::empty();
        let printer = GibberishPrinter::new(&ast, Lang::C_23);
        assert_eq!(printer.using(root), "using p = int*");
    }

    #[test]
    fn test_operator_and_cast() {
        let mut ast = Ast::new();
        let op = ast.new_parent(
            |ret| AstKind::Operator {
                oper: OperId::PlusEq,
                params: vec![],
                ret,
                member: FuncMember::Member,
            },
            0,
            loc(),
        );
        ast[op].sname = SName::local("S");
        let r = ast.new_parent(|to| AstKind::Reference { to }, 0, loc());
        let s = ast.alloc(
            AstKind::ClassStructUnion {
                csu_name: SName::local("S"),
            },
            0,
            loc(),
        );
        ast[s].ty = CType::from_base(Base::STRUCT);
        ast.set_parent(s, r);
        ast.set_parent(r, op);
        let printer = GibberishPrinter::new(&ast, Lang::CPP_17);
        assert_eq!(printer.declaration(op), "struct S &S::operator+=()");

        let cast = ast.new_parent(
            |to| AstKind::Cast {
                cast: CastKind::Static,
                to,
            },
            0,
            loc(),
        );
        ast[cast].sname = SName::local("x");
        let p = ast.new_pointer(0, loc());
        let i = int(&mut ast);
        ast.set_parent(i, p);
        ast.set_parent(p, cast);
        let printer = GibberishPrinter::new(&ast, Lang::CPP_17);
        assert_eq!(printer.declaration(cast), "static_cast<int*>(x)");
    }

    #[test]
    fn test_placeholder() {
        let mut ast = Ast::new();
        let p = ast.new_pointer(0, loc());
        ast[p].sname = SName::local("p");
        let printer = GibberishPrinter::new(&ast, Lang::C_23);
        assert_eq!(printer.declaration(p), "… *p");
    }
}
