// Semantic checks applied to parsed declarations

use cdecl::check::Severity;
use cdecl::errors::CdeclError;
use cdecl::lang::Lang;
use cdecl::session::Session;

fn session(lang: Lang) -> Session {
    let mut session = Session::new().expect("predefined typedefs failed to load");
    session.options.lang = lang;
    session
}

fn semantic_error(lang: Lang, line: &str) -> cdecl::check::Diagnostic {
    match session(lang).execute(line) {
        Err(CdeclError::Semantic(d)) => d,
        other => panic!("{line:?}: expected a semantic error, got {other:?}"),
    }
}

#[test]
fn test_array_of_void_suggests_pointer() {
    let d = semantic_error(Lang::C_23, "declare a as array 3 of void");
    assert_eq!(d.severity, Severity::Error);
    assert_eq!(d.message, "array of void");
    assert_eq!(d.hint.as_deref(), Some("array of pointer to void"));
    let column = d.loc.column;
    assert!(column > 0);
    assert_eq!(
        CdeclError::Semantic(d).to_string(),
        format!("column {column}: array of void; did you mean array of pointer to void?")
    );
}

#[test]
fn test_function_returning_array() {
    let d = semantic_error(Lang::C_23, "declare f as function returning array 3 of int");
    assert!(d.message.ends_with("returning array"), "{}", d.message);
}

#[test]
fn test_zero_sized_array() {
    let d = semantic_error(Lang::C_23, "explain int a[0]");
    assert_eq!(d.message, "array size must be greater than 0");
}

#[test]
fn test_main_must_return_int() {
    let d = semantic_error(Lang::C_23, "declare main as function returning char");
    assert_eq!(d.message, "main() must return int");
}

#[test]
fn test_variable_length_arrays_by_language() {
    for line in ["explain void f(int n, int v[n])", "explain void f(int v[*])"] {
        let d = semantic_error(Lang::C_89, line);
        assert!(
            d.message.starts_with("variable length arrays not supported"),
            "{line}: {}",
            d.message
        );
        assert!(session(Lang::C_99).execute(line).is_ok(), "{line}");
    }
}

#[test]
fn test_named_size_outside_parameters_is_not_variable_length() {
    assert!(session(Lang::C_89).execute("explain int v[n]").is_ok());
}

#[test]
fn test_reference_to_void() {
    let d = semantic_error(Lang::CPP_17, "declare r as reference to void");
    assert_eq!(d.message, "reference to \"void\" is illegal");
}

#[test]
fn test_references_need_cpp() {
    assert!(session(Lang::CPP_11).execute("explain int &r").is_ok());
    assert!(session(Lang::C_23).execute("explain int &r").is_err());
}

#[test]
fn test_legal_declarations_have_no_warnings() {
    let mut s = session(Lang::C_23);
    for line in [
        "explain int (*p)[3]",
        "explain const char *const names[]",
        "explain void (*signal(int, void (*)(int)))(int)",
        "declare x as pointer to function (int) returning char",
    ] {
        let output = s.execute(line).unwrap_or_else(|e| panic!("{line:?}: {e}"));
        assert!(output.warnings.is_empty(), "{line:?}: {:?}", output.warnings);
    }
}

#[test]
fn test_nothing_registered_after_check_failure() {
    let mut s = session(Lang::C_23);
    assert!(s.execute("typedef void V[3]").is_err());
    assert!(s.typedefs().find("V", Lang::C_23).is_none());
}
