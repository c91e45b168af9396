//! Overloadable C++ operators.

use crate::lang::Lang;

/// Parameter count meaning "any number".
pub const PARAMS_UNLIMITED: usize = usize::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperId {
    New,
    NewArray,
    Delete,
    DeleteArray,
    CoAwait,
    Call,
    Subscript,
    Arrow,
    ArrowStar,
    Comma,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Amp,
    Pipe,
    Tilde,
    Bang,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    EqEq,
    NotEq,
    Spaceship,
    AndAnd,
    OrOr,
    Shl,
    Shr,
    PlusPlus,
    MinusMinus,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    CaretEq,
    AmpEq,
    PipeEq,
    ShlEq,
    ShrEq,
}

/// How an operator may be declared and how many parameters it takes.
#[derive(Debug, Clone, Copy)]
pub struct OperInfo {
    pub id: OperId,
    pub token: &'static str,
    /// Parameter range when declared as a member.
    pub member: (usize, usize),
    /// Parameter range when declared as a non-member; `None` if it must be
    /// a member.
    pub non_member: Option<(usize, usize)>,
    pub legal: Lang,
}

const U: usize = PARAMS_UNLIMITED;
const ALL_CPP: Lang = Lang::CPP_ANY;
const CPP20: Lang = Lang::cpp_min(Lang::CPP_20);

const fn binary(id: OperId, token: &'static str) -> OperInfo {
    OperInfo {
        id,
        token,
        member: (1, 1),
        non_member: Some((2, 2)),
        legal: ALL_CPP,
    }
}

const fn unary_or_binary(id: OperId, token: &'static str) -> OperInfo {
    OperInfo {
        id,
        token,
        member: (0, 1),
        non_member: Some((1, 2)),
        legal: ALL_CPP,
    }
}

const fn unary(id: OperId, token: &'static str) -> OperInfo {
    OperInfo {
        id,
        token,
        member: (0, 0),
        non_member: Some((1, 1)),
        legal: ALL_CPP,
    }
}

const fn member_only(id: OperId, token: &'static str, params: (usize, usize)) -> OperInfo {
    OperInfo {
        id,
        token,
        member: params,
        non_member: None,
        legal: ALL_CPP,
    }
}

const fn allocation(id: OperId, token: &'static str) -> OperInfo {
    OperInfo {
        id,
        token,
        member: (1, U),
        non_member: Some((1, U)),
        legal: ALL_CPP,
    }
}

pub const OPERATORS: &[OperInfo] = &[
    allocation(OperId::New, "new"),
    allocation(OperId::NewArray, "new[]"),
    allocation(OperId::Delete, "delete"),
    allocation(OperId::DeleteArray, "delete[]"),
    OperInfo {
        legal: CPP20,
        ..unary(OperId::CoAwait, "co_await")
    },
    member_only(OperId::Call, "()", (0, U)),
    member_only(OperId::Subscript, "[]", (1, 1)),
    member_only(OperId::Arrow, "->", (0, 0)),
    binary(OperId::ArrowStar, "->*"),
    binary(OperId::Comma, ","),
    member_only(OperId::Assign, "=", (1, 1)),
    unary_or_binary(OperId::Plus, "+"),
    unary_or_binary(OperId::Minus, "-"),
    unary_or_binary(OperId::Star, "*"),
    binary(OperId::Slash, "/"),
    binary(OperId::Percent, "%"),
    binary(OperId::Caret, "^"),
    unary_or_binary(OperId::Amp, "&"),
    binary(OperId::Pipe, "|"),
    unary(OperId::Tilde, "~"),
    unary(OperId::Bang, "!"),
    binary(OperId::Less, "<"),
    binary(OperId::Greater, ">"),
    binary(OperId::LessEq, "<="),
    binary(OperId::GreaterEq, ">="),
    binary(OperId::EqEq, "=="),
    binary(OperId::NotEq, "!="),
    OperInfo {
        legal: CPP20,
        ..binary(OperId::Spaceship, "<=>")
    },
    binary(OperId::AndAnd, "&&"),
    binary(OperId::OrOr, "||"),
    binary(OperId::Shl, "<<"),
    binary(OperId::Shr, ">>"),
    unary_or_binary(OperId::PlusPlus, "++"),
    unary_or_binary(OperId::MinusMinus, "--"),
    binary(OperId::PlusEq, "+="),
    binary(OperId::MinusEq, "-="),
    binary(OperId::StarEq, "*="),
    binary(OperId::SlashEq, "/="),
    binary(OperId::PercentEq, "%="),
    binary(OperId::CaretEq, "^="),
    binary(OperId::AmpEq, "&="),
    binary(OperId::PipeEq, "|="),
    binary(OperId::ShlEq, "<<="),
    binary(OperId::ShrEq, ">>="),
];

impl OperId {
    pub fn info(self) -> &'static OperInfo {
        // every OperId has exactly one entry
        OPERATORS
            .iter()
            .find(|o| o.id == self)
            .unwrap_or(&OPERATORS[0])
    }

    pub fn token(self) -> &'static str {
        self.info().token
    }

    pub fn from_token(token: &str) -> Option<OperId> {
        OPERATORS.iter().find(|o| o.token == token).map(|o| o.id)
    }

    /// Whether the operator name is a word (`new`, `delete`, `co_await`) and
    /// so needs a space after `operator`.
    pub fn is_word(self) -> bool {
        self.token()
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_complete() {
        for op in OPERATORS {
            assert_eq!(op.id.info().token, op.token);
            assert_eq!(OperId::from_token(op.token), Some(op.id));
        }
    }

    #[test]
    fn test_arity() {
        assert_eq!(OperId::EqEq.info().non_member, Some((2, 2)));
        assert!(OperId::Assign.info().non_member.is_none());
        assert!(OperId::New.is_word());
        assert!(!OperId::Call.is_word());
    }
}
