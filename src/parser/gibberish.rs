//! C/C++ declaration grammar
//!
//! A declaration is parsed as its specifiers (which become the type leaf) and
//! then one declarator per comma-separated name. Declarators are built from
//! the outside in: prefix operators (`*`, `&`, `^`, `C::*`) patch themselves
//! into the placeholder of whatever they apply to, and suffixes (`[N]`,
//! parameter lists) are grafted with the splicing operations of
//! [`crate::ast::build`], which use the parenthesis depth of each node to
//! decide what binds tighter.

use super::lexer::Token;
use super::parse::{ParseError, Parser};
use crate::ast::visit::VisitDir;
use crate::ast::{
    ArraySize, AstId, AstKind, CaptureKind, CastKind, FuncMember, Kind, KindSet, OperId, SName,
    SourceLocation,
};
use crate::keywords::c_keyword;
use crate::types::{Attr, Base, CType, Qual, Storage};
use tracing::trace;

impl<'t> Parser<'t> {
    /// Parses `specifiers declarator[, declarator]...` and returns the root of
    /// each declarator. A C++ lambda is returned as a single root.
    pub fn parse_gibberish_decls(&mut self) -> Result<Vec<AstId>, ParseError> {
        if self.at_lambda() {
            return Ok(vec![self.parse_lambda()?]);
        }
        let template = self.parse_specifiers()?;
        let mut roots = Vec::new();
        loop {
            let loc = self.current_location();
            self.implicit_type = self.ast.kind(template) == Kind::Builtin
                && self.ast[template].ty.base.is_empty();
            self.top_level = true;
            let leaf = self.ast.dup(template);
            let decl = self.parse_declarator()?;
            let root = self.finish_declarator(leaf, decl)?;
            self.parse_bit_width(root)?;
            trace!(?root, kind = ?self.ast.kind(root), "declarator");
            roots.push(root);
            if !self.match_token(&Token::Comma(loc)) {
                break;
            }
        }
        self.implicit_type = false;
        self.top_level = false;
        Ok(roots)
    }

    /// A type without a name, as in a cast or a trailing return type:
    /// `int (*)[3]`.
    pub fn parse_type_name(&mut self) -> Result<AstId, ParseError> {
        let saved = self.save_state();
        let leaf = self.parse_specifiers()?;
        let decl = self.parse_declarator()?;
        let root = self.finish_declarator(leaf, decl)?;
        self.restore_state(saved);
        if !self.ast[root].sname.is_empty() {
            return Err(ParseError::new(
                format!("\"{}\": type names can not be named", self.ast[root].sname),
                self.ast[root].loc,
            ));
        }
        Ok(root)
    }

    /// `(T)x`
    pub fn parse_c_cast(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        self.expect_lparen("to start cast")?;
        let to = self.parse_type_name()?;
        self.expect_rparen("after cast type")?;
        let name = if matches!(self.peek(), Token::Ident(..)) {
            self.parse_scoped_name()?
        } else {
            SName::new()
        };
        Ok(self.new_cast(CastKind::C, to, name, loc))
    }

    /// `static_cast<T>(x)` and the other named casts.
    pub fn parse_named_cast(&mut self, cast: CastKind) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        self.advance();
        self.expect_token(&Token::Lt(loc), "expected '<' after cast keyword")?;
        let to = self.parse_type_name()?;
        self.expect_token(&Token::Gt(loc), "expected '>' after cast type")?;
        self.expect_lparen("before cast operand")?;
        let name = self.parse_scoped_name()?;
        self.expect_rparen("after cast operand")?;
        Ok(self.new_cast(cast, to, name, loc))
    }

    fn new_cast(
        &mut self,
        cast: CastKind,
        to: AstId,
        name: SName,
        loc: SourceLocation,
    ) -> AstId {
        let id = self.ast.alloc(AstKind::Cast { cast, to }, 0, loc);
        self.ast[id].sname = name;
        id
    }

    // ===== Specifiers =====

    /// Parses attributes, storage classes, qualifiers and the type itself,
    /// returning the type leaf with all of them merged in.
    pub(crate) fn parse_specifiers(&mut self) -> Result<AstId, ParseError> {
        let start = self.current_location();
        let mut ty = CType::NONE;
        let mut leaf: Option<AstId> = None;

        loop {
            let loc = self.current_location();
            if self.at_attribute() {
                let attr = self.parse_attributes()?;
                ty.add(CType::from_attr(attr), loc)?;
                continue;
            }
            let Some(word) = self.peek().ident().map(str::to_string) else {
                break;
            };
            if word == "_Noreturn" {
                self.advance();
                ty.add(CType::from_attr(Attr::NORETURN), loc)?;
                continue;
            }
            if let Some(kw) = c_keyword(&word, self.lang) {
                match word.as_str() {
                    "struct" | "union" | "class" if leaf.is_none() => {
                        leaf = Some(self.parse_class_struct_union(kw.ty.base)?);
                    }
                    "enum" if leaf.is_none() => leaf = Some(self.parse_enum()?),
                    _ if kw.ty.is_none() => break,
                    // exception specifications follow the parameter list
                    _ if kw.ty.storage.intersects(Storage::NOEXCEPT | Storage::THROW) => break,
                    _ if leaf.is_some() && !kw.ty.base.is_empty() => {
                        return Err(self.error(format!(
                            "\"{word}\" can not be combined with a named type"
                        )));
                    }
                    _ => {
                        self.advance();
                        ty.add(kw.ty, loc)?;
                    }
                }
                continue;
            }
            if leaf.is_some() || !ty.base.is_empty() {
                break;
            }
            match self.parse_named_type()? {
                Some(named) => leaf = Some(named),
                None => break,
            }
        }

        Ok(match leaf {
            Some(leaf) => {
                self.ast[leaf].ty.add(ty, start)?;
                leaf
            }
            None => self.ast.new_builtin(ty, start),
        })
    }

    /// A typedef name (`size_t`, `std::string`) or a constrained `auto`
    /// (`std::integral auto`). Leaves the position untouched on `None`.
    fn parse_named_type(&mut self) -> Result<Option<AstId>, ParseError> {
        let start = self.position;
        let loc = self.current_location();
        let name = self.parse_scoped_name()?;

        if self.lang.is_cpp() && self.check_word("auto") {
            self.advance();
            let id = self.ast.alloc(AstKind::Concept { concept_name: name }, 0, loc);
            return Ok(Some(id));
        }
        if let Some(typedef) = self.typedefs.find(&name.full_name(), self.lang) {
            let for_ast = self.ast.copy_from(&typedef.ast, typedef.root);
            let id = self.ast.alloc(
                AstKind::Typedef {
                    for_ast,
                    bit_width: 0,
                },
                0,
                loc,
            );
            return Ok(Some(id));
        }
        self.position = start;
        Ok(None)
    }

    fn parse_class_struct_union(&mut self, base: Base) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        self.advance();
        let mut csu_name = self.parse_scoped_name()?;
        csu_name.set_local_type(CType::from_base(base));
        let id = self
            .ast
            .alloc(AstKind::ClassStructUnion { csu_name }, 0, loc);
        self.ast[id].ty = CType::from_base(base);
        Ok(id)
    }

    /// `enum [class|struct] E [: type]`
    fn parse_enum(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        self.advance();
        let mut base = Base::ENUM;
        if self.lang.is_cpp() {
            if self.match_word("class") {
                base |= Base::CLASS;
            } else if self.match_word("struct") {
                base |= Base::STRUCT;
            }
        }
        let mut enum_name = self.parse_scoped_name()?;
        enum_name.set_local_type(CType::from_base(Base::ENUM));

        let of = if self.check(&Token::Colon(loc))
            && matches!(self.peek_ahead(1), Some(Token::Ident(..)))
        {
            self.advance();
            let saved = self.save_state();
            let of = self.parse_specifiers()?;
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

    pub(crate) fn at_attribute(&self) -> bool {
        self.check(&Token::LBracket(self.current_location()))
            && matches!(self.peek_ahead(1), Some(Token::LBracket(_)))
    }

    /// `[[nodiscard, deprecated("why")]]`
    fn parse_attributes(&mut self) -> Result<Attr, ParseError> {
        self.advance();
        self.advance();
        let mut attr = Attr::empty();
        loop {
            let loc = self.current_location();
            let name = self.expect_identifier()?;
            attr |= match name.as_str() {
                "carries_dependency" => Attr::CARRIES_DEPENDENCY,
                "deprecated" => Attr::DEPRECATED,
                "maybe_unused" => Attr::MAYBE_UNUSED,
                "nodiscard" => Attr::NODISCARD,
                "noreturn" => Attr::NORETURN,
                "no_unique_address" => Attr::NO_UNIQUE_ADDRESS,
                _ => {
                    return Err(ParseError::new(
                        format!("\"{name}\": unknown attribute"),
                        loc,
                    ))
                }
            };
            if self.match_token(&Token::LParen(loc)) {
                // the argument (a message) does not change the type
                while !self.check(&Token::RParen(loc)) && !self.is_at_end() {
                    self.advance();
                }
                self.expect_rparen("after attribute argument")?;
            }
            if !self.match_token(&Token::Comma(loc)) {
                break;
            }
        }
        self.expect_rbracket("to end attribute list")?;
        self.expect_rbracket("to end attribute list")?;
        Ok(attr)
    }

    /// Whether `word` can start a type.
    pub(crate) fn is_type_word(&self, word: &str) -> bool {
        match c_keyword(word, self.lang) {
            Some(kw) => !kw.ty.is_none(),
            None => word == "_Noreturn" || self.typedefs.find(word, self.lang).is_some(),
        }
    }

    /// `A::B::c`, stopping before `::~` and `::operator`.
    pub(crate) fn parse_scoped_name(&mut self) -> Result<SName, ParseError> {
        let loc = self.current_location();
        self.match_token(&Token::ColonColon(loc));
        let mut sname = SName::new();
        sname.push(&self.expect_identifier()?);
        while self.check(&Token::ColonColon(loc)) {
            match self.peek_ahead(1) {
                Some(Token::Ident(word, _)) if word != "operator" => {
                    self.advance();
                    sname.push(&self.expect_identifier()?);
                }
                _ => break,
            }
        }
        Ok(sname)
    }

    // ===== Declarators =====

    pub(crate) fn parse_declarator(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        let depth = self.depth;
        let node = match self.peek_token() {
            Token::Star(_) => {
                self.advance();
                self.ast.new_pointer(depth, loc)
            }
            Token::Amp(_) => {
                self.advance();
                self.ast
                    .new_parent(|to| AstKind::Reference { to }, depth, loc)
            }
            Token::AndAnd(_) => {
                self.advance();
                self.ast
                    .new_parent(|to| AstKind::RvalueReference { to }, depth, loc)
            }
            Token::Caret(_) => {
                self.advance();
                let block = self.ast.new_parent(
                    |ret| AstKind::AppleBlock {
                        params: Vec::new(),
                        ret,
                    },
                    depth,
                    loc,
                );
                self.blocks.push(block);
                block
            }
            Token::Ident(..) | Token::ColonColon(_) if self.at_member_pointer() => {
                let class_name = self.parse_scoped_name()?;
                self.advance(); // ::
                self.advance(); // *
                self.ast.new_parent(
                    |to| AstKind::PointerToMember { class_name, to },
                    depth,
                    loc,
                )
            }
            _ => return self.parse_direct_declarator(),
        };
        let qual = self.parse_qualifiers();
        self.ast[node].ty.qual |= qual;
        let inner = self.parse_declarator()?;
        Ok(self.ast.patch_placeholder(node, inner))
    }

    /// `C::*` or `A::C::*`
    fn at_member_pointer(&self) -> bool {
        let mut i = usize::from(self.check(&Token::ColonColon(self.current_location())));
        loop {
            match (self.peek_ahead(i), self.peek_ahead(i + 1)) {
                (Some(Token::Ident(..)), Some(Token::ColonColon(_))) => i += 2,
                _ => break,
            }
            if matches!(self.peek_ahead(i), Some(Token::Star(_))) {
                return true;
            }
        }
        false
    }

    /// Qualifiers following `*` or inside `[]`.
    fn parse_qualifiers(&mut self) -> Qual {
        let mut qual = Qual::empty();
        while let Some(kw) = self.peek().ident().and_then(|w| c_keyword(w, self.lang)) {
            if kw.ty.qual.is_empty() {
                break;
            }
            qual |= kw.ty.qual;
            self.advance();
        }
        qual
    }

    fn parse_direct_declarator(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        let decl = match self.peek_token() {
            Token::LParen(_) if self.at_nested_declarator() => {
                self.advance();
                self.depth += 1;
                let inner = self.parse_declarator()?;
                self.expect_rparen("after declarator")?;
                self.depth -= 1;
                inner
            }
            Token::LBracket(_) if self.top_level && self.lang.is_cpp() && !self.at_attribute() => {
                self.parse_binding_names()?;
                self.ast.new_placeholder(self.depth, loc)
            }
            Token::Tilde(_) => {
                self.advance();
                let name = self.expect_identifier()?;
                self.new_destructor(SName::local(&name), loc)
            }
            Token::Ident(ref word, _) if word == "operator" => self.parse_operator(SName::new())?,
            Token::Ident(..) | Token::ColonColon(_) => self.parse_declarator_name()?,
            _ => self.ast.new_placeholder(self.depth, loc),
        };
        let decl = self.parse_declarator_suffixes(decl)?;
        if self.pending.take().is_some() {
            return Err(self.error(format!("expected parameter list, found {}", self.peek())));
        }
        Ok(decl)
    }

    /// Whether a `(` starts a parenthesized declarator rather than a
    /// parameter list.
    fn at_nested_declarator(&self) -> bool {
        match self.peek_ahead(1) {
            Some(
                Token::Star(_)
                | Token::Amp(_)
                | Token::AndAnd(_)
                | Token::Caret(_)
                | Token::Tilde(_)
                | Token::ColonColon(_)
                | Token::LParen(_),
            ) => true,
            Some(Token::Ident(word, _)) => !self.is_type_word(word),
            _ => false,
        }
    }

    /// `[a, b]` of a structured binding.
    fn parse_binding_names(&mut self) -> Result<(), ParseError> {
        let loc = self.current_location();
        self.advance();
        let mut names = Vec::new();
        if !self.check(&Token::RBracket(loc)) {
            loop {
                names.push(SName::local(&self.expect_identifier()?));
                if !self.match_token(&Token::Comma(loc)) {
                    break;
                }
            }
        }
        self.expect_rbracket("after structured binding names")?;
        self.binding = Some(names);
        Ok(())
    }

    /// A declared name, which in C++ may turn out to be a constructor,
    /// destructor or operator: `x`, `S::S`, `S::~S`, `S::operator=`.
    fn parse_declarator_name(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        let mut sname = self.parse_scoped_name()?;

        if self.match_token(&Token::ColonColon(loc)) {
            sname.set_local_type(CType::from_base(Base::CLASS));
            if self.match_token(&Token::Tilde(loc)) {
                let name = self.expect_identifier()?;
                sname.push(&name);
                return Ok(self.new_destructor(sname, loc));
            }
            if self.check_word("operator") {
                return self.parse_operator(sname);
            }
            return Err(self.error(format!("expected name after '::', found {}", self.peek())));
        }

        if self.lang.is_cpp() && self.check(&Token::LParen(loc)) {
            let unscoped_ctor = self.implicit_type && self.depth == 0 && sname.count() == 1;
            if sname.is_ctor() || unscoped_ctor {
                sname.set_scope_type(CType::from_base(Base::CLASS));
                let id = self
                    .ast
                    .alloc(AstKind::Constructor { params: Vec::new() }, self.depth, loc);
                self.ast[id].sname = sname;
                self.pending = Some(id);
                return Ok(id);
            }
        }

        let id = self.ast.new_placeholder(self.depth, loc);
        self.ast[id].sname = sname;
        Ok(id)
    }

    fn new_destructor(&mut self, sname: SName, loc: SourceLocation) -> AstId {
        let id = self.ast.alloc(AstKind::Destructor, self.depth, loc);
        self.ast[id].sname = sname;
        self.pending = Some(id);
        id
    }

    /// `operator` followed by an operator token, `""` suffix or a type.
    fn parse_operator(&mut self, scope: SName) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        self.advance();
        let token = self.peek_token();
        let text = match &token {
            Token::Ident(word, _) if word == "new" || word == "delete" => {
                let word = word.clone();
                self.advance();
                if self.check(&Token::LBracket(loc))
                    && matches!(self.peek_ahead(1), Some(Token::RBracket(_)))
                {
                    self.advance();
                    self.advance();
                    format!("{word}[]")
                } else {
                    word
                }
            }
            Token::Ident(word, _) if word == "co_await" => {
                self.advance();
                word.clone()
            }
            Token::LParen(_) => {
                self.advance();
                self.expect_rparen("after \"operator(\"")?;
                "()".to_string()
            }
            Token::LBracket(_) => {
                self.advance();
                self.expect_rbracket("after \"operator[\"")?;
                "[]".to_string()
            }
            Token::StringLiteral(s, _) if s.is_empty() => {
                self.advance();
                let suffix = self.expect_identifier()?;
                let mut sname = scope;
                sname.push(&suffix);
                let id = self.ast.new_parent(
                    |ret| AstKind::UserDefLiteral {
                        params: Vec::new(),
                        ret,
                    },
                    self.depth,
                    loc,
                );
                self.ast[id].sname = sname;
                self.pending = Some(id);
                return Ok(id);
            }
            Token::Ident(..) => {
                let saved = self.save_state();
                let to = self.parse_conversion_type()?;
                self.restore_state(saved);
                let id = self
                    .ast
                    .alloc(AstKind::UserDefConversion { to }, self.depth, loc);
                self.ast[id].sname = scope;
                self.pending = Some(id);
                return Ok(id);
            }
            _ => match token.punct() {
                Some(punct) => {
                    self.advance();
                    punct.to_string()
                }
                None => {
                    return Err(self.error(format!(
                        "expected operator after \"operator\", found {token}"
                    )))
                }
            },
        };

        let oper = OperId::from_token(&text).ok_or_else(|| {
            ParseError::new(format!("\"operator{text}\": not an overloadable operator"), loc)
        })?;
        let id = self.ast.new_parent(
            |ret| AstKind::Operator {
                oper,
                params: Vec::new(),
                ret,
                member: FuncMember::Unspecified,
            },
            self.depth,
            loc,
        );
        self.ast[id].sname = scope;
        self.pending = Some(id);
        Ok(id)
    }

    /// The type of `operator const char*()`: specifiers followed only by
    /// pointer and reference operators.
    fn parse_conversion_type(&mut self) -> Result<AstId, ParseError> {
        let mut root = self.parse_specifiers()?;
        loop {
            let loc = self.current_location();
            let node = match self.peek_token() {
                Token::Star(_) => self.ast.new_pointer(0, loc),
                Token::Amp(_) => self.ast.new_parent(|to| AstKind::Reference { to }, 0, loc),
                Token::AndAnd(_) => self
                    .ast
                    .new_parent(|to| AstKind::RvalueReference { to }, 0, loc),
                _ => return Ok(root),
            };
            self.advance();
            let qual = self.parse_qualifiers();
            self.ast[node].ty.qual |= qual;
            self.ast.set_parent(root, node);
            root = node;
        }
    }

    fn parse_declarator_suffixes(&mut self, decl: AstId) -> Result<AstId, ParseError> {
        let mut decl = decl;
        loop {
            let loc = self.current_location();
            if self.check(&Token::LBracket(loc)) && !self.at_attribute() {
                let array = self.parse_array_suffix()?;
                decl = self.ast.append_array(decl, array);
            } else if self.check(&Token::LParen(loc)) {
                decl = self.parse_function_suffix(decl)?;
            } else {
                return Ok(decl);
            }
        }
    }

    /// `[static const 3]`, `[n]`, `[*]`, `[]`
    fn parse_array_suffix(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        self.advance();
        let mut qual = Qual::empty();
        loop {
            if self.match_word("static") {
                qual |= Qual::NON_EMPTY;
                continue;
            }
            let more = self.parse_qualifiers();
            if more.is_empty() {
                break;
            }
            qual |= more;
        }
        let size = match self.peek_token() {
            Token::Number(n, _) => {
                self.advance();
                ArraySize::Int(n)
            }
            Token::Ident(name, _) => {
                self.advance();
                ArraySize::Named(name)
            }
            Token::Star(_) => {
                self.advance();
                ArraySize::VlaStar
            }
            _ => ArraySize::Unspecified,
        };
        self.expect_rbracket("after array size")?;
        let array = self.ast.new_array(size, self.depth, loc);
        self.ast[array].ty.qual = qual;
        Ok(array)
    }

    fn parse_function_suffix(&mut self, decl: AstId) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        let params = self.parse_params()?;
        let (trailer, trailing_ret) = self.parse_func_trailer()?;

        let pending = self.pending.take();
        let block = self
            .blocks
            .last()
            .copied()
            .filter(|b| self.ast[*b].depth == self.depth + 1);

        let (root, func) = if let Some(func) = pending {
            self.fill_params(func, params, loc)?;
            (decl, func)
        } else if let Some(block) = block {
            self.blocks.pop();
            self.fill_params(block, params, loc)?;
            (decl, block)
        } else {
            let func = self
                .ast
                .new_function(params, FuncMember::Unspecified, self.depth, loc);
            let ret = self.ast.child(func).unwrap_or(func);
            (self.ast.append_function(decl, ret, func), func)
        };

        self.ast[func].ty.add(trailer, loc)?;
        if let Some(ret) = trailing_ret {
            if self.ast.child(func).is_none() {
                return Err(ParseError::new(
                    format!("{} can not have a return type", self.ast.kind(func).name()),
                    self.ast[ret].loc,
                ));
            }
            self.ast.set_parent(ret, func);
        }
        Ok(root)
    }

    fn fill_params(
        &mut self,
        func: AstId,
        params: Vec<AstId>,
        loc: SourceLocation,
    ) -> Result<(), ParseError> {
        match self.ast[func].kind.params_mut() {
            Some(slot) => *slot = params,
            None if params.is_empty() => {}
            None => {
                return Err(ParseError::new(
                    format!("{}s can not have parameters", self.ast.kind(func).name()),
                    loc,
                ))
            }
        }
        Ok(())
    }

    pub(crate) fn parse_params(&mut self) -> Result<Vec<AstId>, ParseError> {
        let loc = self.current_location();
        self.expect_lparen("to start parameter list")?;
        let saved = self.save_state();
        let mut params = Vec::new();
        if !self.check(&Token::RParen(loc)) {
            loop {
                params.push(self.parse_param()?);
                if !self.match_token(&Token::Comma(loc)) {
                    break;
                }
            }
        }
        self.expect_rparen("to end parameter list")?;
        self.restore_state(saved);
        Ok(params)
    }

    fn parse_param(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        if self.match_token(&Token::Ellipsis(loc)) {
            return Ok(self.ast.alloc(AstKind::Variadic, 0, loc));
        }
        if let Some(name) = self.peek().ident().map(str::to_string) {
            let alone = matches!(
                self.peek_ahead(1),
                Some(Token::Comma(_) | Token::RParen(_))
            );
            if alone && !self.is_type_word(&name) {
                self.advance();
                let id = self.ast.alloc(AstKind::Name, 0, loc);
                self.ast[id].sname = SName::local(&name);
                return Ok(id);
            }
        }
        let leaf = self.parse_specifiers()?;
        self.implicit_type = false;
        self.depth = 0;
        let decl = self.parse_declarator()?;
        self.finish_declarator(leaf, decl)
    }

    /// What may follow a parameter list: cv- and ref-qualifiers, exception
    /// specifications, `override`/`final`, `= 0|default|delete` and a
    /// trailing return type.
    fn parse_func_trailer(&mut self) -> Result<(CType, Option<AstId>), ParseError> {
        let mut ty = CType::NONE;
        let mut ret = None;
        loop {
            let loc = self.current_location();
            let add = match self.peek_token() {
                Token::Amp(_) => CType::from_qual(Qual::REFERENCE),
                Token::AndAnd(_) => CType::from_qual(Qual::RVALUE_REFERENCE),
                Token::Arrow(_) if self.lang.is_cpp() => {
                    self.advance();
                    ret = Some(self.parse_type_name()?);
                    continue;
                }
                Token::Eq(_) => {
                    let storage = match self.peek_ahead(1) {
                        Some(Token::Number(0, _)) => Storage::PURE_VIRTUAL,
                        Some(t) if t.is_word("default") => Storage::DEFAULT,
                        Some(t) if t.is_word("delete") => Storage::DELETE,
                        _ => break,
                    };
                    self.advance();
                    CType::from_storage(storage)
                }
                Token::Ident(word, _) => match word.as_str() {
                    "noexcept" if self.lang.is_cpp() => {
                        self.advance();
                        let mut noexcept = true;
                        if self.match_token(&Token::LParen(loc)) {
                            noexcept = !self.match_word("false");
                            if noexcept {
                                self.match_word("true");
                            }
                            self.expect_rparen("after noexcept argument")?;
                        }
                        if noexcept {
                            ty.add(CType::from_storage(Storage::NOEXCEPT), loc)?;
                        }
                        continue;
                    }
                    "throw" if self.lang.is_cpp() => {
                        self.advance();
                        self.expect_lparen("after \"throw\"")?;
                        while !self.check(&Token::RParen(loc)) && !self.is_at_end() {
                            self.advance();
                        }
                        self.expect_rparen("after \"throw(\"")?;
                        ty.add(CType::from_storage(Storage::THROW), loc)?;
                        continue;
                    }
                    "override" if self.lang.is_cpp() => CType::from_storage(Storage::OVERRIDE),
                    "final" if self.lang.is_cpp() => CType::from_storage(Storage::FINAL),
                    _ => match c_keyword(&word, self.lang) {
                        Some(kw) if !kw.ty.qual.is_empty() => CType::from_qual(kw.ty.qual),
                        _ => break,
                    },
                },
                _ => break,
            };
            self.advance();
            ty.add(add, loc)?;
        }
        Ok((ty, ret))
    }

    /// Patches the type leaf into the declarator and returns the root of the
    /// whole declaration.
    pub(crate) fn finish_declarator(&mut self, leaf: AstId, decl: AstId) -> Result<AstId, ParseError> {
        let leaf = match self.binding.take() {
            Some(names) => self.new_structured_binding(leaf, names)?,
            None => leaf,
        };
        let has_placeholder = self
            .ast
            .find_kind(decl, VisitDir::Down, KindSet::PLACEHOLDER)
            .is_some();
        if !has_placeholder {
            let no_type = self.ast.kind(leaf) == Kind::Builtin;
            let base = self.ast[leaf].ty.base;
            let kind = self.ast.kind(decl);
            if kind.is(KindSet::CONSTRUCTOR | KindSet::DESTRUCTOR | KindSet::USER_DEF_CONVERSION) {
                if !no_type || !base.is_empty() || !self.ast[leaf].ty.qual.is_empty() {
                    return Err(ParseError::new(
                        format!("{}s can not have a return type", kind.name()),
                        self.ast[leaf].loc,
                    ));
                }
            } else if !no_type || base != Base::AUTO {
                return Err(ParseError::new(
                    "function with trailing return type must only specify \"auto\"",
                    self.ast[leaf].loc,
                ));
            }
        }
        Ok(self.ast.patch_placeholder(leaf, decl))
    }

    fn new_structured_binding(&mut self, leaf: AstId, names: Vec<SName>) -> Result<AstId, ParseError> {
        let node = &self.ast[leaf];
        if node.kind.kind() != Kind::Builtin || node.ty.base != Base::AUTO {
            return Err(ParseError::new(
                "structured binding must be declared \"auto\"",
                node.loc,
            ));
        }
        let ty = CType {
            base: Base::empty(),
            ..node.ty
        };
        let loc = node.loc;
        let id = self
            .ast
            .alloc(AstKind::StructuredBinding { names }, 0, loc);
        self.ast[id].ty = ty;
        Ok(id)
    }

    fn parse_bit_width(&mut self, root: AstId) -> Result<(), ParseError> {
        let loc = self.current_location();
        if !self.match_token(&Token::Colon(loc)) {
            return Ok(());
        }
        let width = match self.peek_token() {
            Token::Number(n, _) => {
                self.advance();
                u32::try_from(n).map_err(|_| ParseError::new("bit-field width is too large", loc))?
            }
            other => return Err(self.error(format!("expected bit-field width, found {other}"))),
        };
        let kind = self.ast.kind(root);
        if !self.ast[root].kind.set_bit_width(width) {
            return Err(ParseError::new(
                format!("{} can not be a bit-field", kind.name()),
                loc,
            ));
        }
        Ok(())
    }

    // ===== Lambdas =====

    pub(crate) fn at_lambda(&self) -> bool {
        self.lang.is_cpp()
            && self.check(&Token::LBracket(self.current_location()))
            && !self.at_attribute()
    }

    /// `[captures](params) specifiers trailer -> ret`
    pub(crate) fn parse_lambda(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        self.advance();
        let mut captures = Vec::new();
        if !self.check(&Token::RBracket(loc)) {
            loop {
                captures.push(self.parse_capture()?);
                if !self.match_token(&Token::Comma(loc)) {
                    break;
                }
            }
        }
        self.expect_rbracket("after lambda captures")?;

        let params = if self.check(&Token::LParen(loc)) {
            self.parse_params()?
        } else {
            Vec::new()
        };

        let mut ty = CType::NONE;
        while let Some(kw) = self.peek().ident().and_then(|w| c_keyword(w, self.lang)) {
            let spec = kw.ty.storage
                & (Storage::MUTABLE | Storage::CONSTEXPR | Storage::CONSTEVAL | Storage::STATIC);
            if spec.is_empty() {
                break;
            }
            let at = self.current_location();
            self.advance();
            ty.add(CType::from_storage(spec), at)?;
        }
        let (trailer, ret) = self.parse_func_trailer()?;
        ty.add(trailer, loc)?;

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
        Ok(id)
    }

    fn parse_capture(&mut self) -> Result<AstId, ParseError> {
        let loc = self.current_location();
        let (capture, name) = match self.peek_token() {
            Token::Eq(_) => {
                self.advance();
                (CaptureKind::DefaultCopy, None)
            }
            Token::Amp(_) => {
                self.advance();
                match self.peek().ident().map(str::to_string) {
                    Some(name) => {
                        self.advance();
                        (CaptureKind::Reference, Some(name))
                    }
                    None => (CaptureKind::DefaultReference, None),
                }
            }
            Token::Star(_) => {
                self.advance();
                self.expect_word("this")?;
                (CaptureKind::StarThis, None)
            }
            Token::Ident(word, _) if word == "this" => {
                self.advance();
                (CaptureKind::This, None)
            }
            Token::Ident(word, _) => {
                self.advance();
                (CaptureKind::Copy, Some(word))
            }
            other => return Err(self.error(format!("expected capture, found {other}"))),
        };
        let id = self.ast.alloc(AstKind::Capture { capture }, 0, loc);
        if let Some(name) = name {
            self.ast[id].sname = SName::local(&name);
        }
        Ok(id)
    }
}
