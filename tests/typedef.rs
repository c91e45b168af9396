// Typedef registration and listing

use cdecl::lang::Lang;
use cdecl::session::Session;
use cdecl::typedefs::TypedefFilter;

fn run(session: &mut Session, line: &str) -> String {
    match session.execute(line) {
        Ok(output) => output.text,
        Err(e) => panic!("{line:?} failed: {e}"),
    }
}

#[test]
fn test_define_in_english() {
    let mut s = Session::new().unwrap();
    assert_eq!(run(&mut s, "define P as pointer to int"), "");
    assert_eq!(run(&mut s, "declare x as array 2 of P"), "P x[2];");
    assert_eq!(run(&mut s, "show P as english"), "define P as pointer to int");
}

#[test]
fn test_typedef_then_explain() {
    let mut s = Session::new().unwrap();
    run(&mut s, "typedef char (*Handler)(int)");
    assert_eq!(run(&mut s, "explain Handler h"), "declare h as Handler");

    let mut s = Session::new().unwrap();
    assert_eq!(
        run(&mut s, "explain typedef char (*Handler)(int)"),
        "define Handler as pointer to function (int) returning char"
    );
}

#[test]
fn test_using_in_cpp() {
    let mut s = Session::new().unwrap();
    run(&mut s, "set c++17");
    run(&mut s, "using IP = int*");
    assert_eq!(run(&mut s, "show IP"), "using IP = int*;");
    assert_eq!(run(&mut s, "show IP as typedef"), "typedef int *IP;");

    run(&mut s, "set nousing");
    assert_eq!(run(&mut s, "show IP"), "typedef int *IP;");
}

#[test]
fn test_show_user_only_by_default() {
    let mut s = Session::new().unwrap();
    assert_eq!(run(&mut s, "show"), "");
    run(&mut s, "typedef int Count");
    assert_eq!(run(&mut s, "show"), "typedef int Count;");
    let predefined = run(&mut s, "show predefined");
    assert!(predefined.lines().any(|l| l == "typedef unsigned long size_t;"));
    assert!(!predefined.contains("Count"));
}

#[test]
fn test_redefinition() {
    let mut s = Session::new().unwrap();
    run(&mut s, "typedef int Count");
    run(&mut s, "typedef int Count");
    let err = s.execute("typedef long Count").unwrap_err();
    assert_eq!(err.to_string(), "\"Count\": type redefinition");
    let err = s.execute("typedef int size_t").unwrap_err();
    assert_eq!(err.to_string(), "\"size_t\": type redefinition");
}

#[test]
fn test_predefined_visibility() {
    let s = Session::new().unwrap();
    let table = s.typedefs();
    assert!(table.find("int32_t", Lang::C_99).is_some());
    assert!(table.find("int32_t", Lang::C_89).is_none());
    assert!(table.find("std::string", Lang::CPP_11).is_some());
    assert!(table.find("std::string", Lang::C_23).is_none());
    assert!(table.matching(None, TypedefFilter::User, Lang::C_23).is_empty());
}
