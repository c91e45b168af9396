//! Pseudo-English grammar
//!
//! `declare NAME[, NAME]... as ENGLISH`, `define NAME as ENGLISH` and
//! `[KIND] cast [NAME] into ENGLISH`. English reads outside-in, so every kind
//! phrase (`pointer to`, `array 3 of`, `function returning`) allocates its
//! node with a placeholder child and the phrase that follows is patched into
//! it.

use super::lexer::Token;
use super::parse::{ParseError, Parser};
use crate::ast::{
    ArraySize, AstId, AstKind, CaptureKind, CastKind, FuncMember, Kind, OperId, SName,
    SourceLocation,
};
use crate::keywords::{c_keyword, english_canonical, C_KEYWORDS};
use crate::lang::Lang;
use crate::suggest;
use crate::typedefs::TypedefFilter;
use crate::types::bits::{ATTR_INFO, BASE_INFO, QUAL_INFO, STORAGE_INFO};
use crate::types::{Base, CType, Qual, Storage};
use tracing::trace;

/// A type bit with its pseudo-English spelling, which may be several words.
struct EnglishBit {
    words: &'static str,
    ty: CType,
    legal: Lang,
}

fn english_bits() -> impl Iterator<Item = EnglishBit> {
    let bases = BASE_INFO
        .iter()
        .filter(|i| !i.flag.intersects(Base::ANY_SCOPE | Base::TYPEDEF))
        .map(|i| EnglishBit {
            words: i.english,
            ty: CType::from_base(i.flag),
            legal: i.legal,
        });
    let storage = STORAGE_INFO.iter().map(|i| EnglishBit {
        words: i.english,
        ty: CType::from_storage(i.flag),
        legal: i.legal,
    });
    let quals = QUAL_INFO.iter().map(|i| EnglishBit {
        words: i.english,
        ty: CType::from_qual(i.flag),
        legal: i.legal,
    });
    let attrs = ATTR_INFO.iter().map(|i| EnglishBit {
        words: i.english,
        ty: CType::from_attr(i.flag),
        legal: i.legal,
    });
    bases.chain(storage).chain(quals).chain(attrs)
}

/// What follows `declare`.
#[derive(Debug, Clone)]
enum DeclName {
    Plain(SName),
    Oper(OperId, SName),
    Binding(Vec<SName>),
}

impl<'t> Parser<'t> {
    /// `NAME[, NAME]... as ENGLISH [width N bits]`, or a lambda. The
    /// `declare` keyword has already been consumed.
    pub fn parse_english_declare(&mut self) -> Result<Vec<AstId>, ParseError> {
        if let Some(lambda) = self.parse_english_lambda()? {
            return Ok(vec![lambda]);
        }

        let mut names = Vec::new();
        loop {
            names.push(self.parse_english_decl_name()?);
            let loc = self.current_location();
            if !self.match_token(&Token::Comma(loc)) {
                break;
            }
        }
        self.expect_english("as")?;

        let oper = names.iter().find_map(|n| match n {
            DeclName::Oper(oper, _) => Some(*oper),
            _ => None,
        });
        if let Some(DeclName::Binding(binding)) = names.first() {
            if names.len() > 1 {
                return Err(self.error("a structured binding must be declared alone"));
            }
            self.binding = Some(binding.clone());
        }
        let loc = self.current_location();
        let root = self.parse_english_type(oper)?;
        if let Some(binding) = self.binding.take() {
            return Err(ParseError::new(
                format!(
                    "\"[{}]\" must be declared as a structured binding",
                    binding.iter().map(SName::full_name).collect::<Vec<_>>().join(", ")
                ),
                loc,
            ));
        }
        self.parse_english_width(root)?;

        let mut roots = Vec::with_capacity(names.len());
        for (i, name) in names.into_iter().enumerate() {
            let id = if i == 0 { root } else { self.ast.dup(root) };
            self.name_english_root(id, name, loc)?;
            roots.push(id);
        }
        Ok(roots)
    }

    /// `NAME as ENGLISH`, declaring a type. The `define` keyword has already
    /// been consumed.
    pub fn parse_english_define(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        let name = self.parse_english_scoped_name()?;
        self.expect_english("as")?;
        let root = self.parse_english_type(None)?;
        self.ast[root]
            .ty
            .add(CType::from_storage(Storage::TYPEDEF), loc)?;
        self.ast[root].sname = name;
        Ok(root)
    }

    /// `[const|dynamic|reinterpret|static] cast [NAME] into ENGLISH`
    pub fn parse_english_cast(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        let cast = match self.english_at(0).as_deref() {
            Some("const") => CastKind::Const,
            Some("dynamic") => CastKind::Dynamic,
            Some("reinterpret") => CastKind::Reinterpret,
            Some("static") => CastKind::Static,
            _ => CastKind::C,
        };
        if cast != CastKind::C {
            self.advance();
        }
        self.expect_english("cast")?;
        let name = if self.check_english("into") || self.check_english("to") {
            SName::new()
        } else {
            self.parse_english_scoped_name()?
        };
        if !self.match_english("into") {
            self.expect_english("to")?;
        }
        let to = self.parse_english_type(None)?;
        let id = self.ast.alloc(AstKind::Cast { cast, to }, 0, loc);
        self.ast[id].sname = name;
        Ok(id)
    }

    // ===== Names =====

    fn parse_english_decl_name(&mut self) -> Result<DeclName, ParseError> {
        let loc = self.current_location();
        let token = self.peek_token();
        let oper_text = match &token {
            Token::LBracket(_) if matches!(self.peek_ahead(1), Some(Token::RBracket(_))) => {
                self.advance();
                self.advance();
                Some("[]".to_string())
            }
            Token::LBracket(_) => return self.parse_english_binding(),
            Token::LParen(_) => {
                self.advance();
                self.expect_rparen("after \"(\" of \"()\"")?;
                Some("()".to_string())
            }
            Token::Ident(word, _)
                if (word == "new" || word == "delete")
                    && matches!(self.peek_ahead(1), Some(Token::LBracket(_))) =>
            {
                let word = word.clone();
                self.advance();
                self.advance();
                self.expect_rbracket("after \"[\"")?;
                Some(format!("{word}[]"))
            }
            Token::Ident(..) | Token::ColonColon(_) => None,
            _ => match token.punct() {
                Some(punct) => {
                    self.advance();
                    Some(punct.to_string())
                }
                None => return Err(self.error(format!("expected name, found {token}"))),
            },
        };

        match oper_text {
            Some(text) => {
                let oper = OperId::from_token(&text).ok_or_else(|| {
                    ParseError::new(format!("\"{text}\": not an overloadable operator"), loc)
                })?;
                let scope = self.parse_english_scopes(SName::new())?;
                Ok(DeclName::Oper(oper, scope))
            }
            None => Ok(DeclName::Plain(self.parse_english_scoped_name()?)),
        }
    }

    /// `x`, `C::x` or `x of class C of namespace N`.
    fn parse_english_scoped_name(&mut self) -> Result<SName, ParseError> {
        let name = self.parse_scoped_name()?;
        self.parse_english_scopes(name)
    }

    /// Prefixes `name` with any `of KIND NAME` scopes that follow, innermost
    /// first.
    fn parse_english_scopes(&mut self, name: SName) -> Result<SName, ParseError> {
        let mut scopes = Vec::new();
        while self.check_english("of") {
            let base = match self.english_at(1).as_deref() {
                Some("class") => Base::CLASS,
                Some("struct") => Base::STRUCT,
                Some("union") => Base::UNION,
                Some("namespace") => Base::NAMESPACE,
                Some("enum") => Base::ENUM,
                Some("scope") => Base::SCOPE,
                _ => break,
            };
            self.advance();
            self.advance();
            scopes.push((base, self.expect_identifier()?));
        }
        let mut sname = SName::new();
        for (base, scope) in scopes.into_iter().rev() {
            sname.push(&scope);
            sname.set_local_type(CType::from_base(base));
        }
        sname.append(name);
        Ok(sname)
    }

    /// `[a, b]`
    fn parse_english_binding(&mut self) -> Result<DeclName, ParseError> {
        let loc = self.current_location();
        self.advance();
        let mut names = Vec::new();
        loop {
            names.push(SName::local(&self.expect_identifier()?));
            if !self.match_token(&Token::Comma(loc)) {
                break;
            }
        }
        self.expect_rbracket("after structured binding names")?;
        Ok(DeclName::Binding(names))
    }

    /// Gives the declared name to `root`. Operators and conversion operators
    /// keep only the scope; the operator itself is part of the node.
    fn name_english_root(
        &mut self,
        root: AstId,
        name: DeclName,
        loc: SourceLocation,
    ) -> Result<(), ParseError> {
        let kind = self.ast.kind(root);
        match name {
            DeclName::Binding(_) => {}
            DeclName::Oper(id, scope) => {
                let AstKind::Operator { oper, .. } = &mut self.ast[root].kind else {
                    return Err(ParseError::new(
                        format!("\"{}\" can only name an operator", id.token()),
                        loc,
                    ));
                };
                *oper = id;
                self.ast[root].sname = scope;
            }
            DeclName::Plain(sname) if kind == Kind::Operator => {
                let id = OperId::from_token(sname.local_name()).ok_or_else(|| {
                    ParseError::new(
                        format!("\"{}\": not an overloadable operator", sname.local_name()),
                        loc,
                    )
                })?;
                if let AstKind::Operator { oper, .. } = &mut self.ast[root].kind {
                    *oper = id;
                }
                self.ast[root].sname = sname.scope_sname();
            }
            DeclName::Plain(sname) if kind == Kind::UserDefConversion => {
                if sname.local_name() != "operator" {
                    return Err(ParseError::new(
                        format!(
                            "\"{}\": user-defined conversion operators must be named \"operator\"",
                            sname
                        ),
                        loc,
                    ));
                }
                self.ast[root].sname = sname.scope_sname();
            }
            DeclName::Plain(sname) => self.ast[root].sname = sname,
        }
        Ok(())
    }

    // ===== Types =====

    /// One pseudo-English type: specifiers followed by a kind phrase or a
    /// base type. `oper` is the operator being declared, if any.
    pub(crate) fn parse_english_type(&mut self, oper: Option<OperId>) -> Result<AstId, ParseError> {
        let start = self.current_location();
        let ty = self.parse_english_specifiers()?;
        let loc = self.current_location();
        let word = self.english_at(0);
        trace!(?word, "english kind");

        let node = match word.as_deref() {
            Some("pointer") => {
                self.advance();
                self.expect_english("to")?;
                if self.match_english("member") {
                    self.expect_english("of")?;
                    match self.english_at(0).as_deref() {
                        Some("class" | "struct" | "union") => {
                            self.advance();
                        }
                        _ => {
                            return Err(self.error(format!(
                                "expected \"class\", found {}",
                                self.peek()
                            )))
                        }
                    }
                    let class_name = self.parse_scoped_name()?;
                    self.ast
                        .new_parent(|to| AstKind::PointerToMember { class_name, to }, 0, loc)
                } else {
                    self.ast.new_pointer(0, loc)
                }
            }
            Some("reference") => {
                self.advance();
                self.expect_english("to")?;
                self.ast.new_parent(|to| AstKind::Reference { to }, 0, loc)
            }
            Some("rvalue") => {
                self.advance();
                self.expect_english("reference")?;
                self.expect_english("to")?;
                self.ast
                    .new_parent(|to| AstKind::RvalueReference { to }, 0, loc)
            }
            Some("array") | Some("variable") => self.parse_english_array()?,
            Some("member") | Some("non-member") | Some("function") | Some("operator") => {
                self.parse_english_function(oper)?
            }
            Some("block") => {
                self.advance();
                let params = self.parse_english_opt_params()?;
                self.expect_english("returning")?;
                self.ast
                    .new_parent(|ret| AstKind::AppleBlock { params, ret }, 0, loc)
            }
            Some("constructor") => {
                self.advance();
                let params = self.parse_english_opt_params()?;
                return self.finish_english_leaf(AstKind::Constructor { params }, ty, loc);
            }
            Some("destructor") => {
                self.advance();
                return self.finish_english_leaf(AstKind::Destructor, ty, loc);
            }
            Some("user-defined") => {
                self.advance();
                if self.match_english("conversion") {
                    self.match_english("operator");
                    self.expect_english("returning")?;
                    self.ast
                        .new_parent(|to| AstKind::UserDefConversion { to }, 0, loc)
                } else {
                    self.expect_english("literal")?;
                    let params = self.parse_english_opt_params()?;
                    self.expect_english("returning")?;
                    self.ast
                        .new_parent(|ret| AstKind::UserDefLiteral { params, ret }, 0, loc)
                }
            }
            Some("structured") => {
                self.advance();
                self.expect_english("binding")?;
                let Some(names) = self.binding.take() else {
                    return Err(ParseError::new(
                        "a structured binding needs names in brackets",
                        loc,
                    ));
                };
                return self.finish_english_leaf(AstKind::StructuredBinding { names }, ty, loc);
            }
            Some("lambda") => {
                return Err(self.error("a lambda can only be declared, not used as a type"))
            }
            Some("struct") | Some("union") | Some("class") => {
                let base = match word.as_deref() {
                    Some("struct") => Base::STRUCT,
                    Some("union") => Base::UNION,
                    _ => Base::CLASS,
                };
                self.advance();
                let mut csu_name = self.parse_scoped_name()?;
                csu_name.set_local_type(CType::from_base(base));
                let id = self
                    .ast
                    .alloc(AstKind::ClassStructUnion { csu_name }, 0, loc);
                self.ast[id].ty = CType::from_base(base);
                self.ast[id].ty.add(ty, start)?;
                return Ok(id);
            }
            Some("enum") => {
                let id = self.parse_english_enum()?;
                self.ast[id].ty.add(ty, start)?;
                return Ok(id);
            }
            Some("concept") => {
                self.advance();
                let concept_name = self.parse_scoped_name()?;
                return self.finish_english_leaf(AstKind::Concept { concept_name }, ty, loc);
            }
            Some("variadic") => {
                self.advance();
                return self.finish_english_leaf(AstKind::Variadic, ty, loc);
            }
            _ if !ty.base.is_empty() => return Ok(self.ast.new_builtin(ty, start)),
            _ => return self.parse_english_typedef_name(ty, start),
        };

        self.ast[node].ty.add(ty, start)?;
        let child = self.parse_english_type(None)?;
        Ok(self.ast.patch_placeholder(child, node))
    }

    fn finish_english_leaf(
        &mut self,
        kind: AstKind,
        ty: CType,
        loc: SourceLocation,
    ) -> Result<AstId, ParseError> {
        let id = self.ast.alloc(kind, 0, loc);
        self.ast[id].ty.add(ty, loc)?;
        Ok(id)
    }

    /// Attributes, storage classes, qualifiers and base type words, in any
    /// order.
    fn parse_english_specifiers(&mut self) -> Result<CType, ParseError> {
        let mut ty = CType::NONE;
        while let Some((bits, words)) = self.english_specifier() {
            let loc = self.current_location();
            for _ in 0..words {
                self.advance();
            }
            ty.add(bits, loc)?;
        }
        Ok(ty)
    }

    /// The type bits spelled by the next word or words, and how many words
    /// that is. The longest spelling wins; between equally long ones, the one
    /// legal in the current language.
    fn english_specifier(&self) -> Option<(CType, usize)> {
        let word_at = |n: usize| {
            self.peek_ahead(n)
                .and_then(Token::ident)
                .map(str::to_ascii_lowercase)
        };
        let first = word_at(0)?;
        let canonical = english_canonical(&first);

        let mut best: Option<(CType, usize, bool)> = None;
        for bit in english_bits() {
            let words: Vec<&str> = bit.words.split(' ').collect();
            let matched = words.iter().enumerate().all(|(i, w)| {
                if i == 0 {
                    first == *w || canonical == *w
                } else {
                    word_at(i).as_deref() == Some(*w)
                }
            });
            if !matched {
                continue;
            }
            let n = words.len();
            // "reference to" starts a kind phrase
            if bit.ty.qual.intersects(Qual::REF_QUALIFIERS) && word_at(n).as_deref() == Some("to")
            {
                continue;
            }
            let legal = bit.legal.contains(self.lang);
            let better = match best {
                None => true,
                Some((_, best_n, best_legal)) => n > best_n || (n == best_n && legal && !best_legal),
            };
            if better {
                best = Some((bit.ty, n, legal));
            }
        }
        if let Some((ty, n, _)) = best {
            return Some((ty, n));
        }

        let kw = c_keyword(&canonical, self.lang)?;
        if kw.ty.is_none() || kw.ty.base.intersects(Base::ANY_SCOPE) {
            return None;
        }
        Some((kw.ty, 1))
    }

    /// Known type names close to `unknown`: typedefs and type keywords.
    fn type_hint(&self, unknown: &str) -> Option<String> {
        let typedefs: Vec<String> = self
            .typedefs
            .matching(None, TypedefFilter::All, self.lang)
            .into_iter()
            .map(|t| t.name().full_name())
            .collect();
        let keywords = C_KEYWORDS.iter().filter(|k| {
            k.langs.contains(self.lang)
                && !k.ty.base.is_empty()
                && !k.ty.base.intersects(Base::ANY_SCOPE)
        });
        suggest::hint(
            unknown,
            typedefs
                .iter()
                .map(String::as_str)
                .chain(keywords.map(|k| k.literal)),
        )
    }

    fn parse_english_typedef_name(
        &mut self,
        ty: CType,
        loc: SourceLocation,
    ) -> Result<AstId, ParseError> {
        if !matches!(self.peek(), Token::Ident(..) | Token::ColonColon(_)) {
            return Err(self.error(format!("expected type, found {}", self.peek())));
        }
        let name = self.parse_scoped_name()?;
        let Some(typedef) = self.typedefs.find(&name.full_name(), self.lang) else {
            return Err(ParseError::new(format!("\"{name}\": unknown type"), loc)
                .with_hint(self.type_hint(&name.full_name())));
        };
        let for_ast = self.ast.copy_from(&typedef.ast, typedef.root);
        let id = self.ast.alloc(
            AstKind::Typedef {
                for_ast,
                bit_width: 0,
            },
            0,
            loc,
        );
        self.ast[id].ty.add(ty, loc)?;
        Ok(id)
    }

    /// `array [N|NAME] of` or `variable [length] array [NAME] of`.
    fn parse_english_array(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        let variable = self.match_english("variable");
        if variable {
            self.match_english("length");
        }
        self.expect_english("array")?;
        let size = match self.peek_token() {
            Token::Number(n, _) => {
                self.advance();
                ArraySize::Int(n)
            }
            Token::Ident(name, _) if english_canonical(&name) != "of" => {
                self.advance();
                ArraySize::Named(name)
            }
            _ if variable => ArraySize::VlaStar,
            _ => ArraySize::Unspecified,
        };
        self.expect_english("of")?;
        Ok(self.ast.new_array(size, 0, loc))
    }

    /// `[member|non-member] function|operator [(PARAMS)] returning`
    fn parse_english_function(&mut self, oper: Option<OperId>) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        let member = if self.match_english("member") {
            FuncMember::Member
        } else if self.match_english("non-member") {
            FuncMember::NonMember
        } else {
            FuncMember::Unspecified
        };
        let is_operator = self.check_english("operator");
        if !is_operator {
            self.expect_english("function")?;
        } else {
            self.advance();
        }
        let params = self.parse_english_opt_params()?;
        self.expect_english("returning")?;

        if !is_operator {
            return Ok(self.ast.new_function(params, member, 0, loc));
        }
        let Some(oper) = oper else {
            return Err(ParseError::new(
                "an operator must be declared with an operator name",
                loc,
            ));
        };
        Ok(self.ast.new_parent(
            |ret| AstKind::Operator {
                oper,
                params,
                ret,
                member,
            },
            0,
            loc,
        ))
    }

    /// `enum [class|struct] NAME [of type ENGLISH]`
    fn parse_english_enum(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        self.advance();
        let mut base = Base::ENUM;
        if self.match_english("class") {
            base |= Base::CLASS;
        } else if self.match_english("struct") {
            base |= Base::STRUCT;
        }
        let mut enum_name = self.parse_scoped_name()?;
        enum_name.set_local_type(CType::from_base(Base::ENUM));
        let of = if self.check_english("of") && self.english_at(1).as_deref() == Some("type") {
            self.advance();
            self.advance();
            let saved = self.save_state();
            let of = self.parse_english_type(None)?;
            self.restore_state(saved);
            Some(of)
        } else {
            None
        };
        let id = self.ast.alloc(
            AstKind::Enum {
                enum_name,
                of,
                bit_width: 0,
            },
            0,
            loc,
        );
        self.ast[id].ty = CType::from_base(base);
        Ok(id)
    }

    /// `width N [bits]`
    fn parse_english_width(&mut self, root: AstId) -> Result<(), ParseError> {
        let loc = self.current_location();
        if !self.match_english("width") {
            return Ok(());
        }
        let Token::Number(n, _) = self.peek_token() else {
            return Err(self.error(format!("expected bit-field width, found {}", self.peek())));
        };
        self.advance();
        self.match_english("bits");
        let width = u32::try_from(n).map_err(|_| ParseError::new("bit-field width is too large", loc))?;
        if !self.ast[root].kind.set_bit_width(width) {
            return Err(ParseError::new(
                format!("{} can not be a bit-field", self.ast.kind(root).name()),
                loc,
            ));
        }
        Ok(())
    }

    // ===== Parameters =====

    fn parse_english_opt_params(&mut self) -> Result<Vec<AstId>, ParseError> {
        if self.check(&Token::LParen(self.current_location())) {
            self.parse_english_params()
        } else {
            Ok(Vec::new())
        }
    }

    /// `(NAME as ENGLISH, ENGLISH, NAME, variadic)`
    fn parse_english_params(&mut self) -> Result<Vec<AstId>, ParseError> {
        let loc = self.current_location();
        self.expect_lparen("to start parameter list")?;
        let saved = self.save_state();
        let mut params = Vec::new();
        if !self.check(&Token::RParen(loc)) {
            loop {
                params.push(self.parse_english_param()?);
                if !self.match_token(&Token::Comma(loc)) {
                    break;
                }
            }
        }
        self.expect_rparen("to end parameter list")?;
        self.restore_state(saved);
        Ok(params)
    }

    fn parse_english_param(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        if self.match_token(&Token::Ellipsis(loc)) {
            return Ok(self.ast.alloc(AstKind::Variadic, 0, loc));
        }
        if let Some(name) = self.peek().ident().map(str::to_string) {
            if self.peek_ahead(1).is_some_and(|t| t.is_word("as")) {
                self.advance();
                self.advance();
                let root = self.parse_english_type(None)?;
                self.ast[root].sname = SName::local(&name);
                return Ok(root);
            }
            let alone = matches!(
                self.peek_ahead(1),
                Some(Token::Comma(_) | Token::RParen(_))
            );
            if alone
                && !self.is_type_word(&name)
                && self.english_specifier().is_none()
                && english_canonical(&name) != "variadic"
            {
                self.advance();
                let id = self.ast.alloc(AstKind::Name, 0, loc);
                self.ast[id].sname = SName::local(&name);
                return Ok(id);
            }
        }
        self.parse_english_type(None)
    }

    // ===== Lambdas =====

    /// `[specifiers] lambda [capturing [CAPTURES]] [(PARAMS)] [returning
    /// ENGLISH]`, or `None` (with nothing consumed) if this is not a lambda.
    fn parse_english_lambda(&mut self) -> Result<Option<AstId>, ParseError> {
        let start = self.position;
        let loc = self.current_location();
        let ty = self.parse_english_specifiers()?;
        if !self.match_english("lambda") {
            self.position = start;
            return Ok(None);
        }

        let mut captures = Vec::new();
        if self.match_english("capturing") {
            self.expect_token(
                &Token::LBracket(loc),
                "expected '[' after \"capturing\"",
            )?;
            loop {
                captures.push(self.parse_english_capture()?);
                if !self.match_token(&Token::Comma(loc)) {
                    break;
                }
            }
            self.expect_rbracket("after lambda captures")?;
        }
        let params = self.parse_english_opt_params()?;
        let ret = if self.match_english("returning") {
            let saved = self.save_state();
            let ret = self.parse_english_type(None)?;
            self.restore_state(saved);
            Some(ret)
        } else {
            None
        };

        let id = self.ast.alloc(
            AstKind::Lambda {
                captures,
                params,
                ret,
            },
            0,
            loc,
        );
        self.ast[id].ty = ty;
        Ok(Some(id))
    }

    /// `copy by default`, `reference by default`, `reference to x`, `x`,
    /// `this` or `*this`.
    fn parse_english_capture(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        let (capture, name) = if self.match_token(&Token::Star(loc)) {
            self.expect_word("this")?;
            (CaptureKind::StarThis, None)
        } else if self.check_english("copy") && self.english_at(1).as_deref() == Some("by") {
            self.advance();
            self.advance();
            self.expect_english("default")?;
            (CaptureKind::DefaultCopy, None)
        } else if self.check_english("reference") {
            self.advance();
            if self.match_english("by") {
                self.expect_english("default")?;
                (CaptureKind::DefaultReference, None)
            } else {
                self.expect_english("to")?;
                (CaptureKind::Reference, Some(self.expect_identifier()?))
            }
        } else if self.match_word("this") {
            (CaptureKind::This, None)
        } else {
            (CaptureKind::Copy, Some(self.expect_identifier()?))
        };
        let id = self.ast.alloc(AstKind::Capture { capture }, 0, loc);
        if let Some(name) = name {
            self.ast[id].sname = SName::local(&name);
        }
        Ok(id)
    }

    // ===== English words =====

    /// The canonical spelling of the word `n` tokens ahead.
    pub(crate) fn english_at(&self, n: usize) -> Option<String> {
        self.peek_ahead(n)
            .and_then(Token::ident)
            .map(english_canonical)
    }

    pub(crate) fn check_english(&self, word: &str) -> bool {
        self.english_at(0).as_deref() == Some(word)
    }

    pub(crate) fn match_english(&mut self, word: &str) -> bool {
        if self.check_english(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_english(&mut self, word: &str) -> Result<(), ParseError> {
        if self.match_english(word) {
            Ok(())
        } else {
            Err(self.error(format!("expected \"{}\", found {}", word, self.peek())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::{EnglishPrinter, GibberishPrinter};
    use crate::typedefs::TypedefTable;

    fn declare(source: &str, lang: Lang) -> String {
        let table = TypedefTable::with_predefined().unwrap();
        let mut parser = Parser::new(source, lang, &table).unwrap();
        let roots = parser.parse_english_declare().unwrap();
        parser.expect_end().unwrap();
        let ast = parser.into_ast();
        let printer = GibberishPrinter::new(&ast, lang);
        roots
            .iter()
            .map(|r| printer.declaration(*r))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn declare_err(source: &str, lang: Lang) -> String {
        let table = TypedefTable::new();
        let mut parser = Parser::new(source, lang, &table).unwrap();
        parser.parse_english_declare().unwrap_err().message
    }

    #[test]
    fn test_pointer_to_array() {
        assert_eq!(
            declare("p as pointer to array 3 of int", Lang::C_23),
            "int (*p)[3]"
        );
    }

    #[test]
    fn test_function_pointer() {
        assert_eq!(
            declare("x as pointer to function (int) returning char", Lang::C_23),
            "char (*x)(int)"
        );
        assert_eq!(
            declare(
                "f as func (s as ptr to constant character, variadic) returns integer",
                Lang::C_23
            ),
            "int f(const char *s, ...)"
        );
    }

    #[test]
    fn test_specifiers_and_multiple_names() {
        assert_eq!(
            declare("x, y as static unsigned long long", Lang::C_23),
            "static unsigned long long x, static unsigned long long y"
        );
        assert_eq!(
            declare("p as const pointer to volatile int", Lang::C_23),
            "volatile int *const p"
        );
        assert_eq!(
            declare("t as thread local int", Lang::C_17),
            "_Thread_local int t"
        );
    }

    #[test]
    fn test_typedef_names_and_arrays() {
        assert_eq!(
            declare("a as array of pointer to size_t", Lang::C_23),
            "size_t *a[]"
        );
        assert_eq!(
            declare("v as variable length array n of int", Lang::C_23),
            "int v[n]"
        );
        assert_eq!(declare_err("x as foo", Lang::C_23), "\"foo\": unknown type");
    }

    #[test]
    fn test_bit_field() {
        assert_eq!(
            declare("flags as unsigned int width 3 bits", Lang::C_23),
            "unsigned int flags : 3"
        );
    }

    #[test]
    fn test_cpp_members() {
        assert_eq!(
            declare(
                "== of class S as const member operator (int) returning bool",
                Lang::CPP_17
            ),
            "bool S::operator==(int) const"
        );
        assert_eq!(
            declare("S of class S as constructor (int)", Lang::CPP_17),
            "S::S(int)"
        );
        assert_eq!(
            declare("r as rvalue reference to int", Lang::CPP_17),
            "int &&r"
        );
        assert_eq!(
            declare("p as pointer to member of class C int", Lang::CPP_17),
            "int C::*p"
        );
        assert_eq!(
            declare_err("+ as int", Lang::CPP_17),
            "\"+\" can only name an operator"
        );
    }

    #[test]
    fn test_structured_binding() {
        assert_eq!(
            declare("[a, b] as reference to structured binding", Lang::CPP_17),
            "auto &[a, b]"
        );
        assert_eq!(
            declare_err("[a, b] as int", Lang::CPP_17),
            "\"[a, b]\" must be declared as a structured binding"
        );
    }

    #[test]
    fn test_lambda() {
        let table = TypedefTable::new();
        let source = "mutable lambda capturing [copy by default, reference to x] (y as int) returning bool";
        let mut parser = Parser::new(source, Lang::CPP_17, &table).unwrap();
        let roots = parser.parse_english_declare().unwrap();
        let ast = parser.into_ast();
        assert_eq!(
            GibberishPrinter::new(&ast, Lang::CPP_17).declaration(roots[0]),
            "[=, &x](int y) mutable -> bool"
        );
        assert_eq!(
            EnglishPrinter::new(&ast).declaration(roots[0]),
            "declare mutable lambda capturing [copy by default, reference to x] (y as int) returning bool"
        );
    }

    #[test]
    fn test_define_and_cast() {
        let table = TypedefTable::new();
        let mut parser = Parser::new("P as pointer to int", Lang::C_23, &table).unwrap();
        let root = parser.parse_english_define().unwrap();
        let ast = parser.into_ast();
        assert!(ast[root].ty.storage.contains(Storage::TYPEDEF));
        assert_eq!(
            GibberishPrinter::new(&ast, Lang::C_23).declaration(root),
            "typedef int *P"
        );

        let mut parser =
            Parser::new("static cast x into pointer to int", Lang::CPP_17, &table).unwrap();
        let root = parser.parse_english_cast().unwrap();
        let ast = parser.into_ast();
        assert_eq!(
            GibberishPrinter::new(&ast, Lang::CPP_17).declaration(root),
            "static_cast<int*>(x)"
        );

        let mut parser = Parser::new("cast p to pointer to char", Lang::C_23, &table).unwrap();
        let root = parser.parse_english_cast().unwrap();
        let ast = parser.into_ast();
        assert_eq!(
            GibberishPrinter::new(&ast, Lang::C_23).declaration(root),
            "(char*)p"
        );
    }

    #[test]
    fn test_scoped_names() {
        let table = TypedefTable::new();
        let mut parser =
            Parser::new("x of class C of namespace N as int", Lang::CPP_17, &table).unwrap();
        let roots = parser.parse_english_declare().unwrap();
        let ast = parser.into_ast();
        let sname = &ast[roots[0]].sname;
        assert_eq!(sname.full_name(), "N::C::x");
        assert_eq!(sname.scope_type().base, Base::CLASS);
        assert_eq!(
            EnglishPrinter::new(&ast).declaration(roots[0]),
            "declare x of class C of namespace N as int"
        );
    }
}
