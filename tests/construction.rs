// Building declaration trees by hand and by parsing

use cdecl::ast::visit::VisitDir;
use cdecl::ast::{ArraySize, Ast, AstId, FuncMember, Kind, KindSet, SName, SourceLocation};
use cdecl::lang::Lang;
use cdecl::parser::Parser;
use cdecl::typedefs::TypedefTable;
use cdecl::types::{Base, CType, Storage};

fn loc() -> SourceLocation {
    SourceLocation::default()
}

fn parse(source: &str) -> (Ast, AstId) {
    let table = TypedefTable::new();
    let mut parser = Parser::new(source, Lang::C_23, &table).expect("lex failed");
    let roots = parser.parse_gibberish_decls().expect("parse failed");
    (parser.into_ast(), roots[0])
}

#[test]
fn test_hand_built_matches_parsed() {
    // int (*p)[3]
    let mut ast = Ast::new();
    let p = ast.new_pointer(1, loc());
    ast[p].sname = SName::local("p");
    let a = ast.new_array(ArraySize::Int(3), 0, loc());
    let root = ast.append_array(p, a);
    let int = ast.new_builtin(CType::from_base(Base::INT), loc());
    let root = ast.patch_placeholder(int, root);

    assert_eq!(ast.kind(root), Kind::Pointer);
    assert_eq!(ast[root].sname.full_name(), "p");

    // root names are not compared
    let (parsed, parsed_root) = parse("int (*q)[3]");
    assert!(Ast::equal(&ast, root, &parsed, parsed_root));
    let (other, other_root) = parse("int *q[3]");
    assert!(!Ast::equal(&ast, root, &other, other_root));
}

#[test]
fn test_function_returning_pointer_to_function() {
    // char (*f(int))(double)
    let mut ast = Ast::new();
    let p = ast.new_pointer(1, loc());
    ast[p].sname = SName::local("f");
    let int = ast.new_builtin(CType::from_base(Base::INT), loc());
    let f = ast.new_function(vec![int], FuncMember::Unspecified, 1, loc());
    let f_ret = ast.child(f).unwrap();
    let root = ast.append_function(p, f_ret, f);
    assert_eq!(root, f);
    assert_eq!(ast[f].sname.full_name(), "f");

    let double = ast.new_builtin(CType::from_base(Base::DOUBLE), loc());
    let g = ast.new_function(vec![double], FuncMember::Unspecified, 0, loc());
    let g_ret = ast.child(g).unwrap();
    let root = ast.append_function(root, g_ret, g);
    let c = ast.new_builtin(CType::from_base(Base::CHAR), loc());
    let root = ast.patch_placeholder(c, root);
    assert_eq!(ast.child(root), Some(p));
    assert_eq!(ast.child(p), Some(g));

    let (parsed, parsed_root) = parse("char (*f(int))(double)");
    assert_eq!(parsed.kind(parsed_root), Kind::Function);
    assert_eq!(ast.kind(root), Kind::Function);
    assert!(Ast::equal(&ast, root, &parsed, parsed_root));
}

#[test]
fn test_storage_moves_to_root() {
    let mut ast = Ast::new();
    let p = ast.new_pointer(0, loc());
    ast[p].sname = SName::local("p");
    let int = ast.new_builtin(
        CType::from_base(Base::INT) | CType::from_storage(Storage::STATIC),
        loc(),
    );
    let root = ast.patch_placeholder(int, p);
    assert_eq!(root, p);
    assert_eq!(ast[root].ty.storage, Storage::STATIC);
    assert!(ast[int].ty.storage.is_empty());
    assert_eq!(ast.leaf(root), int);
}

#[test]
fn test_named_placeholder_becomes_type() {
    let mut ast = Ast::new();
    let placeholder = ast.new_placeholder(0, loc());
    ast[placeholder].sname = SName::local("x");
    let int = ast.new_builtin(CType::from_base(Base::INT), loc());
    let root = ast.patch_placeholder(int, placeholder);
    assert_eq!(root, int);
    assert_eq!(ast[root].sname.full_name(), "x");
}

#[test]
fn test_dup_is_independent() {
    let (mut ast, root) = parse("const char *names[4]");
    let copy = ast.dup(root);
    assert_ne!(copy, root);
    assert!(Ast::equal(&ast, root, &ast, copy));

    let leaf = ast.leaf(copy);
    ast[leaf].ty.base = Base::INT;
    assert!(!Ast::equal(&ast, root, &ast, copy));
    assert_eq!(ast[ast.leaf(root)].ty.base, Base::CHAR);
}

#[test]
fn test_find_kind() {
    let (ast, root) = parse("int *(*a[2])(void)");
    assert_eq!(ast.kind(root), Kind::Array);
    let func = ast
        .find_kind(root, VisitDir::Down, KindSet::FUNCTION_LIKE)
        .expect("no function in chain");
    assert_eq!(ast.kind(func), Kind::Function);
    assert_eq!(ast.root(func), root);
    let leaf = ast.leaf(root);
    assert_eq!(
        ast.find_kind(leaf, VisitDir::Up, KindSet::FUNCTION_LIKE),
        Some(func)
    );
}
