// End-to-end translation through a session

use cdecl::errors::CdeclError;
use cdecl::lang::Lang;
use cdecl::session::Session;

fn session(lang: Lang) -> Session {
    let mut session = Session::new().expect("predefined typedefs failed to load");
    session.options.lang = lang;
    session
}

fn run(session: &mut Session, line: &str) -> String {
    match session.execute(line) {
        Ok(output) => output.text,
        Err(e) => panic!("{line:?} failed: {e}"),
    }
}

#[test]
fn test_explain_c_declarations() {
    let mut s = session(Lang::C_23);
    assert_eq!(
        run(&mut s, "explain int (*p)[3]"),
        "declare p as pointer to array 3 of int"
    );
    assert_eq!(
        run(&mut s, "explain char (*x)(int);"),
        "declare x as pointer to function (int) returning char"
    );
    // "explain" is implied when the line starts with a declaration
    assert_eq!(
        run(&mut s, "int *const *p"),
        "declare p as pointer to const pointer to int"
    );
}

#[test]
fn test_explain_multiple_declarators() {
    let mut s = session(Lang::C_23);
    assert_eq!(
        run(&mut s, "explain unsigned long x, *y"),
        "declare x as unsigned long int\ndeclare y as pointer to unsigned long int"
    );
}

#[test]
fn test_implicit_int_is_spelled_out() {
    let mut s = session(Lang::C_89);
    for (c, english) in [
        ("*p", "declare p as pointer to int"),
        ("f()", "declare f as function returning int"),
        ("unsigned x", "declare x as unsigned int"),
        ("static x", "declare x as static int"),
    ] {
        assert_eq!(run(&mut s, &format!("explain {c}")), english);
        let back = run(&mut s, english);
        assert_eq!(run(&mut s, &format!("explain {back}")), english);
    }
}

#[test]
fn test_declare_c_declarations() {
    let mut s = session(Lang::C_23);
    assert_eq!(
        run(&mut s, "declare p as pointer to array 3 of int"),
        "int (*p)[3];"
    );
    assert_eq!(
        run(&mut s, "declare x as pointer to function (int) returning char"),
        "char (*x)(int);"
    );
    assert_eq!(
        run(&mut s, "declare p as const pointer to volatile int"),
        "volatile int *const p;"
    );
    assert_eq!(
        run(&mut s, "declare flags as unsigned int width 3 bits"),
        "unsigned int flags : 3;"
    );
}

#[test]
fn test_declare_uses_predefined_typedefs() {
    let mut s = session(Lang::C_23);
    assert_eq!(
        run(&mut s, "declare a as array of pointer to size_t"),
        "size_t *a[];"
    );
    assert_eq!(
        run(&mut s, "explain size_t *a[]"),
        "declare a as array of pointer to size_t"
    );
}

#[test]
fn test_casts() {
    let mut s = session(Lang::C_23);
    assert_eq!(run(&mut s, "cast x into pointer to int"), "(int*)x");
    assert_eq!(run(&mut s, "explain (int*)x"), "cast x into pointer to int");

    let mut s = session(Lang::CPP_17);
    assert_eq!(
        run(&mut s, "explain static_cast<const int&>(s)"),
        "static cast s into reference to const int"
    );
}

#[test]
fn test_cpp_declarations() {
    let mut s = session(Lang::CPP_20);
    assert_eq!(
        run(&mut s, "explain auto& [a, b]"),
        "declare [a, b] as reference to structured binding"
    );
    assert_eq!(
        run(&mut s, "explain [=, &x](int y) mutable -> bool"),
        "declare mutable lambda capturing [copy by default, reference to x] (y as int) returning bool"
    );
}

#[test]
fn test_options_change_output() {
    let mut s = session(Lang::C_23);
    run(&mut s, "set east-const nosemicolon");
    assert_eq!(
        run(&mut s, "declare p as pointer to const char"),
        "char const *p"
    );
}

#[test]
fn test_lang_changes_keywords() {
    let mut s = session(Lang::C_17);
    assert_eq!(
        run(&mut s, "declare t as thread local int"),
        "_Thread_local int t;"
    );
}

#[test]
fn test_syntax_error_has_location() {
    let mut s = session(Lang::C_23);
    let err = s.execute("declare x as int ]").unwrap_err();
    assert!(matches!(err, CdeclError::Parse(_)));
    assert_eq!(err.location().map(|l| l.column), Some(18));
}

#[test]
fn test_unknown_type() {
    let mut s = session(Lang::C_23);
    let err = s.execute("declare x as foo").unwrap_err();
    assert_eq!(err.to_string(), "column 14: \"foo\": unknown type");
}

#[test]
fn test_misspellings_get_suggestions() {
    let mut s = session(Lang::C_23);
    assert_eq!(
        s.execute("declar x as int").unwrap_err().to_string(),
        "column 1: \"declar\": unknown command; did you mean \"declare\"?"
    );
    assert_eq!(
        s.execute("declare x as sizet").unwrap_err().to_string(),
        "column 14: \"sizet\": unknown type; did you mean \"size_t\"?"
    );
    assert_eq!(
        s.execute("set eastconst2").unwrap_err().to_string(),
        "\"eastconst2\": unknown set option; did you mean \"east-const\"?"
    );
    // Keywords and type names are never taken for misspelled commands.
    let err = s.execute("int x y").unwrap_err().to_string();
    assert!(!err.contains("did you mean"), "{err}");
}

#[test]
fn test_debug_dump() {
    let mut s = session(Lang::C_23);
    run(&mut s, "set debug");
    let text = run(&mut s, "explain int *p");
    let (english, json) = text.split_once('\n').unwrap();
    assert_eq!(english, "declare p as pointer to int");
    let value: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(value[0]["kind"], "pointer");
    assert_eq!(value[0]["child"]["type"], "int");
}
