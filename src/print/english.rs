//! Pseudo-English printer: `declare p as pointer to array 3 of int`.

use super::ELLIPSIS;
use crate::ast::{ArraySize, Ast, AstId, AstKind, CaptureKind, FuncMember, Kind, SName};
use crate::types::names::base_english;
use crate::types::{Base, Storage};

#[derive(Debug, Clone, Copy)]
pub struct EnglishPrinter<'a> {
    ast: &'a Ast,
}

impl<'a> EnglishPrinter<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self { ast }
    }

    /// `declare NAME as TYPE`, or the lambda form `declare lambda ...`.
    pub fn declaration(&self, root: AstId) -> String {
        let node = &self.ast[root];
        match &node.kind {
            AstKind::Cast { .. } => self.cast(root),
            AstKind::Lambda { .. } => format!("declare {}", self.english(root)),
            _ => match self.declared_name(root) {
                name if name.is_empty() => self.english(root),
                name => format!("declare {name} as {}", self.english(root)),
            },
        }
    }

    /// `define NAME as TYPE`; a `typedef` storage class on the root is not
    /// repeated.
    pub fn definition(&self, root: AstId) -> String {
        format!(
            "define {} as {}",
            self.ast[root].sname.english(),
            self.english_without(root, Storage::TYPEDEF)
        )
    }

    /// `[static ]cast NAME into TYPE`
    pub fn cast(&self, root: AstId) -> String {
        let node = &self.ast[root];
        let AstKind::Cast { cast, to } = &node.kind else {
            return self.declaration(root);
        };
        let mut out = String::new();
        if let Some(word) = cast.english() {
            out.push_str(word);
            out.push(' ');
        }
        out.push_str("cast ");
        if !node.sname.is_empty() {
            out.push_str(&node.sname.english());
            out.push(' ');
        }
        out.push_str("into ");
        out.push_str(&self.english(*to));
        out
    }

    /// The English for the type rooted at `id`.
    pub fn english(&self, id: AstId) -> String {
        self.english_without(id, Storage::empty())
    }

    fn declared_name(&self, id: AstId) -> String {
        let node = &self.ast[id];
        let sname = &node.sname;
        match &node.kind {
            AstKind::Operator { oper, .. } => scoped_english(oper.token(), sname),
            AstKind::UserDefConversion { .. } => scoped_english("operator", sname),
            AstKind::StructuredBinding { names } => binding_list(names),
            _ => {
                let leaf = self.ast.leaf(id);
                match &self.ast[leaf].kind {
                    AstKind::StructuredBinding { names } if sname.is_empty() => {
                        binding_list(names)
                    }
                    _ => sname.english(),
                }
            }
        }
    }

    fn english_without(&self, id: AstId, strip: Storage) -> String {
        let node = &self.ast[id];
        let mut ty = node.ty;
        ty.storage -= strip;
        let spec = ty.english_specifiers();
        let mut words: Vec<String> = Vec::new();
        if !spec.is_empty() && node.kind.kind() != Kind::Builtin {
            words.push(spec);
        }

        match &node.kind {
            AstKind::Placeholder => words.push(ELLIPSIS.to_string()),
            AstKind::Builtin { .. } => words.push(ty.english_builtin()),
            AstKind::ClassStructUnion { csu_name } => words.push(format!(
                "{} {}",
                base_english(ty.base & Base::CLASS_STRUCT_UNION),
                csu_name
            )),
            AstKind::Enum { enum_name, of, .. } => {
                let bits = ty.base & (Base::ENUM | Base::CLASS_STRUCT_UNION);
                words.push(format!("{} {}", base_english(bits), enum_name));
                if let Some(of) = of {
                    words.push(format!("of type {}", self.english(*of)));
                }
            }
            AstKind::Typedef { for_ast, .. } => words.push(self.ast[*for_ast].sname.full_name()),
            AstKind::Concept { concept_name } => words.push(format!("concept {concept_name}")),
            AstKind::Name => words.push(node.sname.full_name()),
            AstKind::Variadic => words.push("variadic".to_string()),
            AstKind::StructuredBinding { .. } => words.push("structured binding".to_string()),
            AstKind::Capture { .. } => words.push(self.capture(id)),
            AstKind::Array { size, of } => {
                words.push(array_english(size));
                words.push(self.english(*of));
            }
            AstKind::Cast { to, .. } => words.push(self.english(*to)),
            AstKind::Pointer { to } => {
                words.push("pointer to".to_string());
                words.push(self.english(*to));
            }
            AstKind::PointerToMember { class_name, to } => {
                words.push(format!("pointer to member of class {class_name}"));
                words.push(self.english(*to));
            }
            AstKind::Reference { to } => {
                words.push("reference to".to_string());
                words.push(self.english(*to));
            }
            AstKind::RvalueReference { to } => {
                words.push("rvalue reference to".to_string());
                words.push(self.english(*to));
            }
            AstKind::Constructor { params } => {
                words.push("constructor".to_string());
                words.extend(self.params(params));
            }
            AstKind::Destructor => words.push("destructor".to_string()),
            AstKind::AppleBlock { params, ret } => {
                words.push("block".to_string());
                words.extend(self.params(params));
                words.push(self.returning(*ret));
            }
            AstKind::Function {
                params,
                ret,
                member,
            } => {
                words.extend(member_english(*member));
                words.push("function".to_string());
                words.extend(self.params(params));
                words.push(self.returning(*ret));
            }
            AstKind::Operator {
                params,
                ret,
                member,
                ..
            } => {
                words.extend(member_english(*member));
                words.push("operator".to_string());
                words.extend(self.params(params));
                words.push(self.returning(*ret));
            }
            AstKind::UserDefConversion { to } => {
                words.push("user-defined conversion operator".to_string());
                words.push(self.returning(*to));
            }
            AstKind::UserDefLiteral { params, ret } => {
                words.push("user-defined literal".to_string());
                words.extend(self.params(params));
                words.push(self.returning(*ret));
            }
            AstKind::Lambda {
                captures,
                params,
                ret,
            } => {
                words.push("lambda".to_string());
                if !captures.is_empty() {
                    let caps: Vec<String> = captures.iter().map(|c| self.capture(*c)).collect();
                    words.push(format!("capturing [{}]", caps.join(", ")));
                }
                words.extend(self.params(params));
                if let Some(ret) = ret {
                    words.push(self.returning(*ret));
                }
            }
        }

        let width = node.kind.bit_width();
        if width > 0 {
            words.push(format!("width {width} bits"));
        }
        words.join(" ")
    }

    fn returning(&self, ret: AstId) -> String {
        format!("returning {}", self.english(ret))
    }

    /// `(x as int, pointer to char)`, or nothing for an empty list.
    fn params(&self, params: &[AstId]) -> Option<String> {
        if params.is_empty() {
            return None;
        }
        let params: Vec<String> = params.iter().map(|p| self.param(*p)).collect();
        Some(format!("({})", params.join(", ")))
    }

    fn param(&self, id: AstId) -> String {
        let node = &self.ast[id];
        match node.kind {
            AstKind::Name => node.sname.full_name(),
            _ if node.sname.is_empty() => self.english(id),
            _ => format!("{} as {}", node.sname.english(), self.english(id)),
        }
    }

    fn capture(&self, id: AstId) -> String {
        let node = &self.ast[id];
        let AstKind::Capture { capture } = node.kind else {
            return String::new();
        };
        match capture {
            CaptureKind::DefaultCopy => "copy by default".to_string(),
            CaptureKind::DefaultReference => "reference by default".to_string(),
            CaptureKind::Copy => node.sname.full_name(),
            CaptureKind::Reference => format!("reference to {}", node.sname),
            CaptureKind::This => "this".to_string(),
            CaptureKind::StarThis => "*this".to_string(),
        }
    }
}

fn array_english(size: &ArraySize) -> String {
    match size {
        ArraySize::Unspecified => "array of".to_string(),
        ArraySize::Int(n) => format!("array {n} of"),
        ArraySize::Named(n) => format!("variable length array {n} of"),
        ArraySize::VlaStar => "variable length array of".to_string(),
    }
}

fn member_english(member: FuncMember) -> Option<String> {
    match member {
        FuncMember::Unspecified => None,
        FuncMember::Member => Some("member".to_string()),
        FuncMember::NonMember => Some("non-member".to_string()),
    }
}

/// `NAME of class S of namespace N` for a name whose components are all
/// scopes.
fn scoped_english(name: &str, scope: &SName) -> String {
    let mut sname = scope.clone();
    sname.push(name);
    sname.english()
}

fn binding_list(names: &[SName]) -> String {
    let names: Vec<String> = names.iter().map(SName::full_name).collect();
    format!("[{}]", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{OperId, SourceLocation};
    use crate::types::{CType, Qual};

    fn loc() -> SourceLocation {
        SourceLocation::default()
    }

    #[test]
    fn test_pointer_to_array() {
        let mut ast = Ast::new();
        let p = ast.new_pointer(1, loc());
        ast[p].sname = SName::local("p");
        let a = ast.new_array(ArraySize::Int(3), 0, loc());
        let root = ast.append_array(p, a);
        let i = ast.new_builtin(CType::from_base(Base::INT), loc());
        let root = ast.patch_placeholder(i, root);
        assert_eq!(
            EnglishPrinter::new(&ast).declaration(root),
            "declare p as pointer to array 3 of int"
        );
    }

    #[test]
    fn test_function_with_params() {
        let mut ast = Ast::new();
        let x = ast.new_builtin(CType::from_base(Base::INT), loc());
        ast[x].sname = SName::local("x");
        let cp = ast.new_pointer(0, loc());
        let c = ast.new_builtin(CType::from_base(Base::CHAR) | CType::from_qual(Qual::CONST), loc());
        ast.set_parent(c, cp);
        let f = ast.new_function(vec![x, cp], FuncMember::Unspecified, 0, loc());
        ast[f].sname = SName::local("f");
        ast[f].ty.storage = Storage::STATIC;
        let ret = ast.new_builtin(CType::from_base(Base::VOID), loc());
        ast.set_parent(ret, f);
        assert_eq!(
            EnglishPrinter::new(&ast).declaration(f),
            "declare f as static function (x as int, pointer to const char) returning void"
        );
    }

    #[test]
    fn test_definition_drops_typedef() {
        let mut ast = Ast::new();
        let p = ast.new_pointer(0, loc());
        ast[p].sname = SName::local("P");
        ast[p].ty.storage = Storage::TYPEDEF;
        let i = ast.new_builtin(CType::from_base(Base::INT), loc());
        ast.set_parent(i, p);
        let printer = EnglishPrinter::new(&ast);
        assert_eq!(printer.definition(p), "define P as pointer to int");
        assert_eq!(printer.declaration(p), "declare P as type pointer to int");
    }

    #[test]
    fn test_bit_field_and_operator() {
        let mut ast = Ast::new();
        let u = ast.new_builtin(CType::from_base(Base::UNSIGNED), loc());
        ast[u].sname = SName::local("flags");
        ast[u].kind.set_bit_width(3);
        assert_eq!(
            EnglishPrinter::new(&ast).declaration(u),
            "declare flags as unsigned int width 3 bits"
        );

        let op = ast.new_parent(
            |ret| AstKind::Operator {
                oper: OperId::Call,
                params: vec![],
                ret,
                member: FuncMember::Member,
            },
            0,
            loc(),
        );
        let mut scope = SName::local("S");
        scope.set_local_type(CType::from_base(Base::CLASS));
        ast[op].sname = scope;
        let b = ast.new_builtin(CType::from_base(Base::BOOL), loc());
        ast.set_parent(b, op);
        assert_eq!(
            EnglishPrinter::new(&ast).declaration(op),
            "declare () of class S as member operator returning bool"
        );
    }
}
