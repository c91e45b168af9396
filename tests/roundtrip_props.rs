use cdecl::ast::SourceLocation;
use cdecl::lang::Lang;
use cdecl::session::Session;
use cdecl::types::{Base, CType, Qual};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Pointer,
    ConstPointer,
    Array(u8),
    Function,
}

impl Layer {
    fn english(self) -> String {
        match self {
            Layer::Pointer => "pointer to ".to_string(),
            Layer::ConstPointer => "const pointer to ".to_string(),
            Layer::Array(n) => format!("array {n} of "),
            Layer::Function => "function (int) returning ".to_string(),
        }
    }
}

fn layer() -> impl Strategy<Value = Layer> {
    prop_oneof![
        Just(Layer::Pointer),
        Just(Layer::ConstPointer),
        (1u8..20).prop_map(Layer::Array),
        Just(Layer::Function),
    ]
}

fn base() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("int"),
        Just("char"),
        Just("const char"),
        Just("unsigned long int"),
        Just("double"),
    ]
}

/// Functions can not return arrays or functions, and arrays can not hold
/// functions.
fn legal(layers: &[Layer]) -> bool {
    layers.windows(2).all(|w| {
        !matches!(
            (w[0], w[1]),
            (Layer::Function, Layer::Array(_) | Layer::Function) | (Layer::Array(_), Layer::Function)
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]
    #[test]
    fn english_survives_a_trip_through_c(
        layers in prop::collection::vec(layer(), 0..5),
        base in base(),
    ) {
        prop_assume!(legal(&layers));
        let english: String = layers.iter().map(|l| l.english()).collect::<String>() + base;

        let mut session = Session::new().unwrap();
        let c = session.execute(&format!("declare x as {english}")).unwrap().text;
        let back = session.execute(&format!("explain {c}")).unwrap().text;
        prop_assert_eq!(back, format!("declare x as {english}"), "via {:?}", c);
    }

    #[test]
    fn repeated_qualifiers_are_harmless(bits in 0u32..8) {
        let qual = Qual::from_bits_truncate(bits) & (Qual::CONST | Qual::VOLATILE | Qual::RESTRICT);
        let mut once = CType::from_base(Base::INT);
        once.add(CType::from_qual(qual), SourceLocation::default()).unwrap();
        let mut twice = once;
        twice.add(CType::from_qual(qual), SourceLocation::default()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn repeated_base_is_rejected_unchanged(
        flag in prop_oneof![Just(Base::INT), Just(Base::CHAR), Just(Base::SIGNED), Just(Base::DOUBLE)],
    ) {
        let mut ty = CType::from_base(flag);
        let before = ty;
        prop_assert!(ty.add(CType::from_base(flag), SourceLocation::default()).is_err());
        prop_assert_eq!(ty, before);
    }
}

#[test]
fn long_long_long_is_rejected() {
    let mut ty = CType::from_base(Base::LONG);
    ty.add(CType::from_base(Base::LONG), SourceLocation::default()).unwrap();
    assert!(ty.base.contains(Base::LONG_LONG));
    let err = ty.add(CType::from_base(Base::LONG), SourceLocation::default());
    assert!(err.is_err());
    let mut s = Session::new().unwrap();
    s.options.lang = Lang::C_99;
    assert_eq!(
        s.execute("explain long long x").unwrap().text,
        "declare x as long long int"
    );
}
