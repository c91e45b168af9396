//! Semantic checker
//!
//! A completed declaration is checked in three passes over its chain:
//!
//! 1. structural rules per node kind (`array of void`, `function returning
//!    array`, operator arity, ...),
//! 2. the type bits of every node against the current language,
//! 3. warnings (deprecated and reserved constructs).
//!
//! Each of the first two passes stops at the first error. Warnings are only
//! collected once both error passes succeed and never fail a check.
//! Function-like nodes check their parameters as declarations of their own.

pub mod diagnostics;

pub use diagnostics::{Diagnostic, Severity};

use crate::ast::visit::VisitDir;
use crate::ast::{
    ArraySize, Ast, AstId, AstKind, CaptureKind, CastKind, FuncMember, Kind, KindSet, OperId,
};
use crate::ast::operator::{OperInfo, PARAMS_UNLIMITED};
use crate::keywords;
use crate::lang::Lang;
use crate::types::names;
use crate::types::{Attr, Base, CType, Qual, Storage};
use tracing::debug;

const LANG_AUTO_PARAMS: Lang = Lang::cpp_min(Lang::CPP_20);
const LANG_AUTO_POINTERS: Lang = Lang::cpp_min(Lang::CPP_11);
const LANG_AUTO_RETURN: Lang = Lang::cpp_min(Lang::CPP_14);
const LANG_AUTO_MULTI_DECL: Lang = Lang::cpp_min(Lang::CPP_11);
const LANG_CAPTURE_STAR_THIS: Lang = Lang::cpp_min(Lang::CPP_17);
const LANG_CONCEPTS: Lang = Lang::cpp_min(Lang::CPP_20);
const LANG_CONSTEXPR_VOID: Lang = Lang::cpp_min(Lang::CPP_14);
const LANG_CSU_RETURN: Lang = Lang::C_KNR.complement();
const LANG_DEFAULT_RELOPS: Lang = Lang::cpp_min(Lang::CPP_20);
const LANG_ENUM_BITFIELDS: Lang = Lang::CPP_ANY;
const LANG_EXPLICIT_CONV: Lang = Lang::cpp_min(Lang::CPP_11);
const LANG_FIXED_ENUM: Lang = Lang::cpp_min(Lang::CPP_11).union(Lang::C_23);
const LANG_IMPLICIT_INT: Lang = Lang::c_max(Lang::C_95);
const LANG_INLINE_VARS: Lang = Lang::cpp_min(Lang::CPP_17);
const LANG_KNR_DEFS: Lang = Lang::c_max(Lang::C_17);
const LANG_LAMBDAS: Lang = Lang::cpp_min(Lang::CPP_11);
const LANG_PROTOTYPES: Lang = Lang::C_KNR.complement();
const LANG_QUALIFIED_ARRAYS: Lang = Lang::c_min(Lang::C_99);
const LANG_REF_QUALIFIED: Lang = Lang::cpp_min(Lang::CPP_11);
const LANG_RVALUE_REFERENCES: Lang = Lang::cpp_min(Lang::CPP_11);
const LANG_STATIC_CALL_OPER: Lang = Lang::cpp_min(Lang::CPP_23);
const LANG_STRUCTURED_BINDINGS: Lang = Lang::cpp_min(Lang::CPP_17);
const LANG_TENTATIVE_DEFS: Lang = Lang::C_ANY;
const LANG_THROW: Lang = Lang::cpp_max(Lang::CPP_17);
const LANG_USER_DEF_LITERALS: Lang = Lang::cpp_min(Lang::CPP_11);
const LANG_VARIADIC_ONLY: Lang = Lang::C_23.union(Lang::CPP_ANY);
const LANG_VLA: Lang = Lang::c_min(Lang::C_99);

/// Storage legal for functions in C.
const FUNC_C: Storage = Storage::EXTERN
    .union(Storage::STATIC)
    .union(Storage::INLINE)
    .union(Storage::TYPEDEF);

/// Storage legal for some function-like in C++.
const FUNC_LIKE_CPP: Storage = FUNC_C
    .union(Storage::FRIEND)
    .union(Storage::EXPLICIT)
    .union(Storage::VIRTUAL)
    .union(Storage::PURE_VIRTUAL)
    .union(Storage::OVERRIDE)
    .union(Storage::FINAL)
    .union(Storage::CONSTEXPR)
    .union(Storage::CONSTEVAL)
    .union(Storage::NOEXCEPT)
    .union(Storage::THROW)
    .union(Storage::DEFAULT)
    .union(Storage::DELETE);

const EXCEPTION_SPECS: Storage = Storage::NOEXCEPT.union(Storage::THROW);

const CTOR_DECL: Storage = Storage::EXPLICIT
    .union(Storage::FRIEND)
    .union(Storage::INLINE)
    .union(Storage::CONSTEXPR)
    .union(Storage::CONSTEVAL)
    .union(EXCEPTION_SPECS)
    .union(Storage::DEFAULT)
    .union(Storage::DELETE);
const CTOR_DEF: Storage = Storage::INLINE
    .union(Storage::CONSTEXPR)
    .union(Storage::CONSTEVAL)
    .union(EXCEPTION_SPECS)
    .union(Storage::DEFAULT)
    .union(Storage::DELETE);
const DTOR_DECL: Storage = Storage::FRIEND
    .union(Storage::INLINE)
    .union(Storage::VIRTUAL)
    .union(Storage::PURE_VIRTUAL)
    .union(Storage::OVERRIDE)
    .union(Storage::FINAL)
    .union(Storage::CONSTEXPR)
    .union(EXCEPTION_SPECS)
    .union(Storage::DEFAULT)
    .union(Storage::DELETE);
const DTOR_DEF: Storage = Storage::INLINE
    .union(Storage::CONSTEXPR)
    .union(EXCEPTION_SPECS)
    .union(Storage::DEFAULT)
    .union(Storage::DELETE);

const LAMBDA_OK: Storage = Storage::MUTABLE
    .union(Storage::CONSTEXPR)
    .union(Storage::CONSTEVAL)
    .union(Storage::STATIC)
    .union(EXCEPTION_SPECS);

const USER_DEF_CONV_OK: Storage = Storage::EXPLICIT
    .union(Storage::FRIEND)
    .union(Storage::INLINE)
    .union(Storage::CONSTEXPR)
    .union(Storage::CONSTEVAL)
    .union(Storage::VIRTUAL)
    .union(Storage::PURE_VIRTUAL)
    .union(Storage::OVERRIDE)
    .union(Storage::FINAL)
    .union(EXCEPTION_SPECS)
    .union(Storage::DELETE);

const NEW_DELETE_OK: Storage = Storage::STATIC
    .union(Storage::EXTERN)
    .union(Storage::INLINE)
    .union(Storage::FRIEND)
    .union(EXCEPTION_SPECS)
    .union(Storage::DELETE);

const PARAM_OK: Storage = Storage::REGISTER;

const FUNC_ATTRS: Attr = Attr::CARRIES_DEPENDENCY
    .union(Attr::DEPRECATED)
    .union(Attr::MAYBE_UNUSED)
    .union(Attr::NODISCARD)
    .union(Attr::NORETURN);
const OBJECT_ATTRS: Attr = Attr::CARRIES_DEPENDENCY
    .union(Attr::DEPRECATED)
    .union(Attr::MAYBE_UNUSED)
    .union(Attr::NO_UNIQUE_ADDRESS);

type CheckResult = Result<(), Diagnostic>;

/// Where in a declaration the node being checked sits.
#[derive(Debug, Clone, Copy, Default)]
struct Ctx {
    /// The function whose parameter is being checked.
    func: Option<AstId>,
    /// Whether a typedef being checked is pointed to.
    pointee: bool,
}

/// Checks completed declarations against one language.
pub struct Checker<'a> {
    ast: &'a Ast,
    lang: Lang,
    warn_names: bool,
    warnings: Vec<Diagnostic>,
    error: Option<Diagnostic>,
}

impl<'a> Checker<'a> {
    pub fn new(ast: &'a Ast, lang: Lang) -> Self {
        Self {
            ast,
            lang,
            warn_names: true,
            warnings: Vec::new(),
            error: None,
        }
    }

    /// Whether to warn about names that are keywords elsewhere or reserved.
    /// Off for predefined types.
    pub fn warn_names(mut self, warn: bool) -> Self {
        self.warn_names = warn;
        self
    }

    /// Checks the declaration rooted at `root` top-down. Returns false if an
    /// error was found; see [`Checker::error`].
    pub fn check(&mut self, root: AstId) -> bool {
        self.check_dir(root, VisitDir::Down)
    }

    /// Like [`Checker::check`] but visits the chain in `dir`: `Down` from the
    /// root to the leaf, `Up` from the leaf to the root.
    pub fn check_dir(&mut self, root: AstId, dir: VisitDir) -> bool {
        debug!(?root, ?dir, lang = %self.lang, "check");
        if let Err(d) = self.errors(root, dir, Ctx::default()) {
            debug!(error = %d, "check failed");
            self.error = Some(d);
            return false;
        }
        let mut warnings = Vec::new();
        self.collect_warnings(root, &mut warnings);
        self.warnings.extend(warnings);
        true
    }

    /// Checks several declarators that share one declaration (`int x, *y`).
    pub fn check_list(&mut self, roots: &[AstId]) -> bool {
        if let Err(d) = self.check_list_names(roots) {
            self.error = Some(d);
            return false;
        }
        roots.iter().all(|root| self.check(*root))
    }

    pub fn error(&self) -> Option<&Diagnostic> {
        self.error.as_ref()
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// The warnings on success, or the error.
    pub fn into_result(self) -> Result<Vec<Diagnostic>, Diagnostic> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.warnings),
        }
    }

    fn check_list_names(&self, roots: &[AstId]) -> CheckResult {
        let Some(first) = roots.first() else {
            return Ok(());
        };
        let leaf = self.ast.leaf(*first);
        if roots.len() > 1
            && self.ast.kind(leaf) == Kind::Builtin
            && self.ast[leaf].ty.base == Base::AUTO
            && !LANG_AUTO_MULTI_DECL.contains(self.lang)
        {
            return Err(Diagnostic::error(
                format!(
                    "\"auto\" with multiple declarators is not supported{}",
                    self.lang.which(LANG_AUTO_MULTI_DECL)
                ),
                self.ast[*first].loc,
            ));
        }
        for (i, root) in roots.iter().enumerate() {
            let sname = &self.ast[*root].sname;
            if sname.is_empty() {
                continue;
            }
            for prev in &roots[..i] {
                if self.ast[*prev].sname != *sname {
                    continue;
                }
                if !LANG_TENTATIVE_DEFS.contains(self.lang) {
                    return Err(Diagnostic::error(
                        format!("\"{sname}\": redefinition"),
                        self.ast[*root].loc,
                    ));
                }
                if !Ast::equal(self.ast, *root, self.ast, *prev) {
                    return Err(Diagnostic::error(
                        format!("\"{sname}\": redefinition with different type"),
                        self.ast[*root].loc,
                    ));
                }
            }
        }
        Ok(())
    }

    // ===== Passes =====

    fn errors(&self, root: AstId, dir: VisitDir, ctx: Ctx) -> CheckResult {
        self.walk(root, dir, ctx, Self::visit_error)?;
        self.walk(root, dir, ctx, Self::visit_type)
    }

    fn walk(
        &self,
        root: AstId,
        dir: VisitDir,
        ctx: Ctx,
        pass: fn(&Self, AstId, Ctx) -> CheckResult,
    ) -> CheckResult {
        let start = match dir {
            VisitDir::Down => root,
            VisitDir::Up => self.ast.leaf(root),
        };
        let mut failure = None;
        self.ast.visit(start, dir, |_, id| match pass(self, id, ctx) {
            Ok(()) => id == root && dir == VisitDir::Up,
            Err(d) => {
                failure = Some(d);
                true
            }
        });
        failure.map_or(Ok(()), Err)
    }

    fn visit_error(&self, id: AstId, ctx: Ctx) -> CheckResult {
        match self.ast.kind(id) {
            Kind::Placeholder => unreachable!("placeholder reached the checker"),
            Kind::Array => self.check_array(id, ctx)?,
            Kind::Builtin => self.check_builtin(id, ctx)?,
            Kind::Capture | Kind::ClassStructUnion | Kind::Name | Kind::Variadic => {}
            Kind::Cast => self.check_cast(id)?,
            Kind::Concept => self.require(id, LANG_CONCEPTS)?,
            Kind::Enum => self.check_enum(id)?,
            Kind::Operator => {
                self.require(id, Lang::CPP_ANY)?;
                self.check_oper(id)?;
                self.check_ret_type(id)?;
                self.check_func(id)?;
                self.check_params(id)?;
                self.check_func_storage(id)?;
            }
            Kind::AppleBlock | Kind::Function => {
                self.check_ret_type(id)?;
                self.check_func(id)?;
                self.check_params(id)?;
                self.check_func_storage(id)?;
            }
            Kind::Constructor => {
                self.require(id, Lang::CPP_ANY)?;
                self.check_func(id)?;
                self.check_params(id)?;
                self.check_ctor_dtor(id)?;
                self.check_func_storage(id)?;
            }
            Kind::Destructor => {
                self.require(id, Lang::CPP_ANY)?;
                self.check_ctor_dtor(id)?;
                self.check_func_storage(id)?;
            }
            Kind::Lambda => {
                self.require(id, LANG_LAMBDAS)?;
                self.check_lambda(id)?;
                self.check_params(id)?;
                self.check_ret_type(id)?;
            }
            Kind::PointerToMember => {
                self.require(id, Lang::CPP_ANY)?;
                self.check_pointer(id)?;
            }
            Kind::Pointer => self.check_pointer(id)?,
            Kind::RvalueReference => {
                self.require(id, LANG_RVALUE_REFERENCES)?;
                self.check_reference(id)?;
            }
            Kind::Reference => {
                self.require(id, Lang::CPP_ANY)?;
                self.check_reference(id)?;
            }
            Kind::StructuredBinding => self.check_structured_binding(id)?,
            Kind::Typedef => self.check_typedef(id, ctx)?,
            Kind::UserDefConversion => self.check_user_def_conv(id)?,
            Kind::UserDefLiteral => {
                self.require(id, LANG_USER_DEF_LITERALS)?;
                self.check_ret_type(id)?;
                self.check_func(id)?;
                self.check_params(id)?;
                self.check_user_def_lit_params(id)?;
                self.check_func_storage(id)?;
            }
        }

        let node = &self.ast[id];
        if node.ty.storage.contains(Storage::CONSTEVAL)
            && !self.ast.is_kind(id, KindSet::FUNCTION_LIKE)
        {
            return Err(Diagnostic::error(
                "only functions can be consteval",
                node.loc,
            ));
        }
        Ok(())
    }

    fn visit_type(&self, id: AstId, _ctx: Ctx) -> CheckResult {
        let node = &self.ast[id];
        let ty = node.ty;
        let illegal = ty.check();
        if illegal.contains(self.lang) {
            let legal = Lang::ANY - illegal;
            let one_family = !legal.is_empty()
                && (Lang::C_ANY.contains(legal) || Lang::CPP_ANY.contains(legal));
            let which = if legal.is_empty() {
                String::new()
            } else {
                self.lang.which(legal)
            };
            let message = if one_family && !legal.intersects(self.lang.family()) {
                format!("{} is illegal{which}", self.type_name(&ty))
            } else {
                format!(
                    "{} is illegal for {}{which}",
                    self.type_name(&ty),
                    self.kind_name(id)
                )
            };
            return Err(Diagnostic::error(message, node.loc));
        }

        if self.ast.is_kind(id, KindSet::FUNCTION_LIKE) {
            if ty.storage.contains(Storage::CONSTEXPR) && !LANG_CONSTEXPR_VOID.contains(self.lang) {
                if let Some(ret) = self.ast.child(id) {
                    if self.is_void(ret) {
                        return Err(Diagnostic::error(
                            format!(
                                "\"constexpr void\" is illegal{}",
                                self.lang.which(LANG_CONSTEXPR_VOID)
                            ),
                            node.loc,
                        ));
                    }
                }
            }
        } else {
            if node.kind.kind() != Kind::Array && ty.qual.contains(Qual::NON_EMPTY) {
                return Err(Diagnostic::error(
                    format!("{} can not be non-empty", self.kind_name(id)),
                    node.loc,
                ));
            }
            let not_object = ty.storage & (Storage::FUNC_ONLY - Storage::CONSTEVAL);
            if !not_object.is_empty() {
                return Err(self.kind_not(id, &self.storage_name(not_object)));
            }
            if ty.storage.contains(Storage::CONSTEXPR) && self.lang.is_c() {
                let bad = ty.qual & (Qual::ATOMIC | Qual::RESTRICT | Qual::VOLATILE);
                if !bad.is_empty() {
                    return Err(Diagnostic::error(
                        format!("\"constexpr {}\" is illegal in C", names::qual_c(bad).join(" ")),
                        node.loc,
                    ));
                }
            }
            let mut ok_attrs = OBJECT_ATTRS;
            if self.ast.is_kind(id, KindSet::CLASS_STRUCT_UNION | KindSet::ENUM) {
                ok_attrs |= Attr::NODISCARD;
            }
            let not_object_attrs = ty.attr - ok_attrs;
            if !not_object_attrs.is_empty() {
                return Err(self.kind_not(
                    id,
                    &format!("\"{}\"", names::attr_c(not_object_attrs, self.lang)),
                ));
            }
        }

        if self.ast.qualified_type(id).qual.contains(Qual::RESTRICT) {
            let raw = self.ast.untypedef(id);
            match self.ast.kind(raw) {
                Kind::Array => {}
                k if k.is(KindSet::FUNCTION_LIKE | KindSet::ANY_REFERENCE) => {}
                Kind::Pointer => {
                    if let Some(to) = self.ast.unpointer(raw) {
                        if !self.ast.is_kind(to, KindSet::OBJECT) {
                            return Err(Diagnostic::error(
                                format!(
                                    "pointer to {} can not be \"restrict\"",
                                    self.kind_name(to)
                                ),
                                node.loc,
                            ));
                        }
                    }
                }
                _ => return Err(self.kind_not(raw, "\"restrict\"")),
            }
        }
        Ok(())
    }

    fn collect_warnings(&self, root: AstId, out: &mut Vec<Diagnostic>) {
        self.ast.visit(root, VisitDir::Down, |_, id| {
            self.visit_warning(id, out);
            false
        });
    }

    fn visit_warning(&self, id: AstId, out: &mut Vec<Diagnostic>) {
        let node = &self.ast[id];
        let kind = node.kind.kind();
        let deprecated_since_cpp11 = Lang::cpp_min(Lang::CPP_11).contains(self.lang);
        let deprecated_since_cpp20 = Lang::cpp_min(Lang::CPP_20).contains(self.lang);

        if kind.is(KindSet::OBJECT - KindSet::LAMBDA - KindSet::STRUCTURED_BINDING)
            && node.ty.storage.contains(Storage::REGISTER)
            && deprecated_since_cpp11
        {
            out.push(Diagnostic::warning(
                format!(
                    "\"register\" is deprecated{}",
                    self.lang.which(Lang::cpp_max(Lang::CPP_03))
                ),
                node.loc,
            ));
        }

        if kind == Kind::UserDefLiteral && !node.sname.local_name().starts_with('_') {
            out.push(Diagnostic::warning(
                "user-defined literals not starting with '_' are reserved",
                node.loc,
            ));
        }

        if kind.is(KindSet::FUNCTION_LIKE_RET) {
            if let Some(ret) = self.ast.child(id) {
                let ret_ty = self.ast.qualified_type(ret);
                if ret_ty.qual.contains(Qual::VOLATILE) && deprecated_since_cpp20 {
                    out.push(Diagnostic::warning(
                        format!(
                            "\"volatile\" return types are deprecated{}",
                            self.lang.which(Lang::cpp_max(Lang::CPP_17))
                        ),
                        self.ast[ret].loc,
                    ));
                }
                if node.ty.attr.contains(Attr::NODISCARD) && self.is_void(ret) {
                    out.push(Diagnostic::warning(
                        format!("[[nodiscard]] {}s can not return void", kind.name()),
                        self.ast[ret].loc,
                    ));
                }
            }
        }

        if kind.is(KindSet::FUNCTION_LIKE) {
            for param in self.ast.params(id) {
                self.collect_warnings(*param, out);
                if self.ast[*param].ty.qual.contains(Qual::VOLATILE) && deprecated_since_cpp20 {
                    out.push(Diagnostic::warning(
                        format!(
                            "\"volatile\" parameter types are deprecated{}",
                            self.lang.which(Lang::cpp_max(Lang::CPP_17))
                        ),
                        self.ast[*param].loc,
                    ));
                }
            }
            if node.ty.storage.contains(Storage::THROW) && deprecated_since_cpp11 {
                out.push(
                    Diagnostic::warning(
                        format!(
                            "\"throw\" is deprecated{}",
                            self.lang.which(Lang::cpp_max(Lang::CPP_03))
                        ),
                        node.loc,
                    )
                    .with_hint("\"noexcept\""),
                );
            }
        }

        if kind == Kind::Name && LANG_PROTOTYPES.contains(self.lang) {
            out.push(Diagnostic::warning(
                "missing type specifier; int assumed",
                node.loc,
            ));
        }

        if self.warn_names {
            self.warn_names_of(id, out);
        }
    }

    fn warn_names_of(&self, id: AstId, out: &mut Vec<Diagnostic>) {
        let node = &self.ast[id];
        let mut names: Vec<&str> = node.sname.scopes().iter().map(|s| s.name.as_str()).collect();
        match &node.kind {
            AstKind::ClassStructUnion { csu_name: n }
            | AstKind::Enum { enum_name: n, .. }
            | AstKind::PointerToMember { class_name: n, .. } => {
                names.extend(n.scopes().iter().map(|s| s.name.as_str()));
            }
            _ => {}
        }
        for name in names {
            let langs = keywords::keyword_langs(name);
            if let Some(oldest) = langs.oldest() {
                out.push(Diagnostic::warning(
                    format!("\"{name}\" is a keyword in {}", oldest.name()),
                    node.loc,
                ));
                continue;
            }
            let reserved = reserved_langs(name);
            if !reserved.is_empty() {
                let suffix = if reserved == Lang::CPP_ANY { " in C++" } else { "" };
                out.push(Diagnostic::warning(
                    format!("\"{name}\" is a reserved identifier{suffix}"),
                    node.loc,
                ));
            }
        }
    }

    // ===== Kind rules =====

    fn check_array(&self, id: AstId, ctx: Ctx) -> CheckResult {
        let node = &self.ast[id];
        let AstKind::Array { size, of } = &node.kind else {
            return Ok(());
        };

        if node.ty.qual.contains(Qual::ATOMIC) {
            return Err(self.kind_not(id, "\"_Atomic\""));
        }
        if node.ty.storage.contains(Storage::REGISTER) && ctx.func.is_none() {
            return Err(self.kind_not(id, "\"register\""));
        }

        match size {
            ArraySize::Unspecified => {
                if node.ty.qual.contains(Qual::NON_EMPTY) {
                    return Err(Diagnostic::error(
                        "\"non-empty\" requires an array size",
                        node.loc,
                    ));
                }
            }
            ArraySize::Int(0) => {
                return Err(Diagnostic::error(
                    "array size must be greater than 0",
                    node.loc,
                ));
            }
            ArraySize::Int(_) => {}
            ArraySize::Named(name) => {
                let size_param = ctx.func.and_then(|func| {
                    self.ast
                        .params(func)
                        .iter()
                        .copied()
                        .find(|p| self.ast[*p].sname.full_name() == *name)
                });
                if let Some(param) = size_param {
                    if !self.is_integral(param) {
                        return Err(Diagnostic::error(
                            format!(
                                "size of array has non-integral type {}",
                                self.type_name(&self.ast[param].ty)
                            ),
                            node.loc,
                        ));
                    }
                    self.require_vla(id)?;
                }
            }
            ArraySize::VlaStar => self.require_vla(id)?,
        }

        let array_quals = node.ty.qual & (Qual::CVR | Qual::NON_EMPTY);
        if !array_quals.is_empty() && !LANG_QUALIFIED_ARRAYS.contains(self.lang) {
            return Err(Diagnostic::error(
                format!(
                    "{} arrays not supported{}",
                    qual_name_all(array_quals),
                    self.lang.which(LANG_QUALIFIED_ARRAYS)
                ),
                node.loc,
            ));
        }

        let raw_of = self.ast.untypedef(*of);
        match &self.ast[raw_of].kind {
            AstKind::Array {
                size: ArraySize::Unspecified,
                ..
            } => Err(Diagnostic::error(
                "array dimension required",
                self.ast[*of].loc,
            )),
            AstKind::Builtin { .. } if self.ast[raw_of].ty.base == Base::VOID => {
                Err(Diagnostic::error("array of void", node.loc).with_hint("array of pointer to void"))
            }
            AstKind::AppleBlock { .. } | AstKind::Function { .. } => Err(self
                .kind_of_kind(id, raw_of)
                .with_hint("array of pointer to function")),
            AstKind::Reference { .. } | AstKind::RvalueReference { .. } => {
                let hint = format!("{} to array", self.kind_name(raw_of));
                Err(self.kind_of_kind(id, raw_of).with_hint(hint))
            }
            _ => Ok(()),
        }
    }

    fn check_builtin(&self, id: AstId, ctx: Ctx) -> CheckResult {
        let node = &self.ast[id];
        let ty = node.ty;
        let parent_kind = node.parent.map(|p| self.ast.kind(p));

        if ty.base.is_empty()
            && !LANG_IMPLICIT_INT.contains(self.lang)
            && parent_kind != Some(Kind::UserDefConversion)
        {
            return Err(Diagnostic::error(
                format!(
                    "implicit \"int\" is illegal{}",
                    self.lang.which(LANG_IMPLICIT_INT)
                ),
                node.loc,
            ));
        }

        if ty.storage.contains(Storage::INLINE) && !LANG_INLINE_VARS.contains(self.lang) {
            return Err(Diagnostic::error(
                format!(
                    "inline variables not supported{}",
                    self.lang.which(LANG_INLINE_VARS)
                ),
                node.loc,
            ));
        }

        if node.kind.bit_width() > 0 {
            self.check_bit_field(id)?;
        }

        if ty.base == Base::VOID {
            self.check_void_object(id, ctx)?;
        }
        Ok(())
    }

    fn check_bit_field(&self, id: AstId) -> CheckResult {
        let node = &self.ast[id];
        if node.sname.count() > 1 {
            return Err(Diagnostic::error(
                "scoped names can not have bit-field widths",
                node.loc,
            ));
        }
        if node.ty.attr.contains(Attr::NO_UNIQUE_ADDRESS) {
            return Err(Diagnostic::error(
                format!(
                    "[[no_unique_address]] {}s can not have bit-field widths",
                    self.kind_name(id)
                ),
                node.loc,
            ));
        }
        if !node.ty.storage.is_empty() {
            return Err(Diagnostic::error(
                format!(
                    "{} can not have bit-field widths",
                    self.storage_name(node.ty.storage)
                ),
                node.loc,
            ));
        }
        if !self.is_integral(id) {
            return Err(Diagnostic::error(
                format!(
                    "invalid type {} for bit-field",
                    self.type_name(&node.ty)
                ),
                node.loc,
            ));
        }
        Ok(())
    }

    /// `void` is only legal as something pointed to, returned, cast to, or
    /// named by a typedef.
    fn check_void_object(&self, id: AstId, ctx: Ctx) -> CheckResult {
        let node = &self.ast[id];
        let storage = node.ty.storage;
        if node.parent.is_none()
            && !storage.contains(Storage::TYPEDEF)
            && !(self.lang.is_c() && storage.contains(Storage::EXTERN))
            && !ctx.pointee
        {
            return Err(Diagnostic::error("variable of void", node.loc).with_hint("pointer to void"));
        }
        Ok(())
    }

    fn check_cast(&self, id: AstId) -> CheckResult {
        let node = &self.ast[id];
        let AstKind::Cast { cast, to } = &node.kind else {
            return Ok(());
        };
        let (cast, to) = (*cast, *to);

        if let Some(keyword) = cast.c_keyword() {
            if !self.lang.is_cpp() {
                return Err(Diagnostic::error(
                    format!("{keyword} not supported{}", self.lang.which(Lang::CPP_ANY)),
                    node.loc,
                ));
            }
        }

        if let Some(with_storage) =
            self.ast.visit(to, VisitDir::Down, |ast, n| !ast[n].ty.storage.is_empty())
        {
            return Err(Diagnostic::error(
                format!(
                    "can not cast into {}",
                    self.storage_name(self.ast[with_storage].ty.storage)
                ),
                self.ast[to].loc,
            ));
        }

        let leaf = self.ast.leaf(id);
        if self.ast[leaf].ty.base.contains(Base::AUTO) {
            return Err(Diagnostic::error(
                format!("can not cast into {}", self.type_name(&self.ast[leaf].ty)),
                self.ast[leaf].loc,
            ));
        }

        let raw_to = self.ast.untypedef(to);
        match self.ast.kind(raw_to) {
            Kind::Array if !node.sname.is_empty() => {
                return Err(Diagnostic::error(
                    "arithmetic or pointer type expected",
                    node.loc,
                ));
            }
            Kind::Function => {
                return Err(Diagnostic::error(
                    format!("can not cast into {}", self.kind_name(raw_to)),
                    self.ast[to].loc,
                )
                .with_hint("cast into pointer to function"));
            }
            _ => {}
        }

        match cast {
            CastKind::Const => {
                if !self.ast.is_kind(raw_to, KindSet::POINTER_LIKE) {
                    let refs = if LANG_RVALUE_REFERENCES.contains(self.lang) {
                        "reference, or rvalue reference"
                    } else {
                        "or reference"
                    };
                    return Err(Diagnostic::error(
                        format!("const_cast must be to a pointer, pointer-to-member, {refs}"),
                        self.ast[to].loc,
                    ));
                }
            }
            CastKind::Dynamic => {
                if !self.is_ptr_to(raw_to, KindSet::CLASS_STRUCT_UNION)
                    && !self.is_ref_to(raw_to, KindSet::CLASS_STRUCT_UNION)
                {
                    return Err(Diagnostic::error(
                        "dynamic_cast must be to a pointer or reference to a class, struct, or union",
                        self.ast[to].loc,
                    ));
                }
            }
            CastKind::Reinterpret => {
                if self.is_void(to) {
                    return Err(Diagnostic::error(
                        "reinterpret_cast can not be to void",
                        self.ast[to].loc,
                    ));
                }
            }
            CastKind::C | CastKind::Static => {}
        }
        Ok(())
    }

    fn check_enum(&self, id: AstId) -> CheckResult {
        let node = &self.ast[id];
        let AstKind::Enum { of, bit_width, .. } = &node.kind else {
            return Ok(());
        };
        if *bit_width > 0 && !LANG_ENUM_BITFIELDS.contains(self.lang) {
            return Err(Diagnostic::error(
                format!(
                    "enum bit-fields not supported{}",
                    self.lang.which(LANG_ENUM_BITFIELDS)
                ),
                node.loc,
            ));
        }
        if let Some(of) = of {
            if !LANG_FIXED_ENUM.contains(self.lang) {
                return Err(Diagnostic::error(
                    format!(
                        "enum with underlying type not supported{}",
                        self.lang.which(LANG_FIXED_ENUM)
                    ),
                    self.ast[*of].loc,
                ));
            }
            let raw = self.ast.untypedef(*of);
            if self.ast.kind(raw) != Kind::Builtin || !self.is_integral(raw) {
                return Err(Diagnostic::error(
                    "enum underlying type must be integral",
                    self.ast[*of].loc,
                ));
            }
        }
        Ok(())
    }

    /// Rules common to all function-likes.
    fn check_func(&self, id: AstId) -> CheckResult {
        let node = &self.ast[id];
        let ty = node.ty;
        let kind = node.kind.kind();

        if kind == Kind::Function && node.sname.full_name() == "main" {
            let hosted = self.lang.is_c()
                || (node.kind.member() != FuncMember::Member
                    && (ty.storage - (Storage::EXTERN | EXCEPTION_SPECS)).is_empty());
            if hosted {
                self.check_main(id)?;
            }
        }

        let func_quals = ty.qual & (Qual::CVR | Qual::REF_QUALIFIERS);
        if self.lang.is_c() {
            if !func_quals.is_empty() {
                return Err(self.kind_not(id, &qual_name_all(func_quals)));
            }
            return Ok(());
        }

        if ty.storage.contains(Storage::CONSTINIT) {
            return Err(self.kind_not(id, "\"constinit\""));
        }

        let linkage = ty.storage & (Storage::EXTERN | Storage::STATIC);
        if ty.qual.intersects(Qual::REF_QUALIFIERS) {
            if !LANG_REF_QUALIFIED.contains(self.lang) {
                return Err(Diagnostic::error(
                    format!(
                        "reference qualified {}s not supported{}",
                        kind.name(),
                        self.lang.which(LANG_REF_QUALIFIED)
                    ),
                    node.loc,
                ));
            }
            if !linkage.is_empty() {
                return Err(Diagnostic::error(
                    format!(
                        "reference qualified {}s can not be {}",
                        kind.name(),
                        self.storage_name(linkage)
                    ),
                    node.loc,
                ));
            }
        }

        let member_only = ty.storage & Storage::MEMBER_ONLY;
        if !member_only.is_empty() && !linkage.is_empty() {
            return Err(Diagnostic::error(
                format!(
                    "{} {}s can not be {}",
                    self.storage_name(linkage),
                    kind.name(),
                    self.storage_name(member_only)
                ),
                node.loc,
            ));
        }

        match self.func_member(id) {
            FuncMember::Member => {
                let mut bad = ty.storage & Storage::EXTERN;
                if let AstKind::Operator { oper, .. } = &node.kind {
                    if !is_new_delete(*oper) {
                        bad |= ty.storage & Storage::STATIC;
                    }
                }
                if !bad.is_empty() {
                    return Err(Diagnostic::error(
                        format!("member {}s can not be {}", kind.name(), self.storage_name(bad)),
                        node.loc,
                    ));
                }
            }
            FuncMember::NonMember => {
                if !member_only.is_empty() {
                    return Err(Diagnostic::error(
                        format!(
                            "non-member {}s can not be {}",
                            kind.name(),
                            self.storage_name(member_only)
                        ),
                        node.loc,
                    ));
                }
                if !func_quals.is_empty() {
                    return Err(Diagnostic::error(
                        format!(
                            "non-member {}s can not be {}",
                            kind.name(),
                            qual_name_all(func_quals)
                        ),
                        node.loc,
                    ));
                }
            }
            FuncMember::Unspecified => {}
        }

        if ty.storage.intersects(Storage::DEFAULT | Storage::DELETE) && !self.is_special(id) {
            let and_relops = if ty.storage.contains(Storage::DEFAULT)
                && LANG_DEFAULT_RELOPS.contains(self.lang)
            {
                " and relational operators"
            } else {
                ""
            };
            let which = if ty.storage.contains(Storage::DEFAULT) {
                "= default"
            } else {
                "= delete"
            };
            return Err(Diagnostic::error(
                format!("\"{which}\" can be used only for special member functions{and_relops}"),
                node.loc,
            ));
        }

        let not_func_attrs = ty.attr - FUNC_ATTRS;
        if !not_func_attrs.is_empty() {
            return Err(self.kind_not(
                id,
                &format!("\"{}\"", names::attr_c(not_func_attrs, self.lang)),
            ));
        }

        if ty.storage.contains(Storage::VIRTUAL) {
            // operator names carry only their scope
            let scoped = match kind {
                Kind::Operator | Kind::UserDefConversion => !node.sname.is_empty(),
                _ => node.sname.count() > 1,
            };
            if scoped {
                return Err(Diagnostic::error(
                    format!(
                        "\"{}\": virtual can not be used in file-scoped {}s",
                        node.sname,
                        kind.name()
                    ),
                    node.loc,
                ));
            }
        } else if ty.storage.contains(Storage::PURE_VIRTUAL) {
            return Err(Diagnostic::error(
                format!("non-virtual {} can not be pure", kind.name()),
                node.loc,
            ));
        }
        Ok(())
    }

    fn check_main(&self, id: AstId) -> CheckResult {
        let node = &self.ast[id];
        let bad = node.ty.storage
            & (Storage::INLINE | Storage::STATIC | Storage::CONSTEXPR | Storage::CONSTEVAL);
        if !bad.is_empty() {
            return Err(Diagnostic::error(
                format!("main() can not be {}", self.storage_name(bad)),
                node.loc,
            ));
        }
        if let Some(ret) = self.ast.child(id) {
            if !self.is_int(ret) {
                return Err(Diagnostic::error("main() must return int", self.ast[ret].loc));
            }
        }
        let params = self.ast.params(id);
        match params.len() {
            0 => {}
            1 => {
                if !self.is_void(params[0]) && self.ast.kind(params[0]) != Kind::Name {
                    return Err(Diagnostic::error(
                        "main() must have 0, 2, or 3 parameters",
                        self.ast[params[0]].loc,
                    ));
                }
            }
            2 | 3 => {
                if !self.is_int(params[0]) && self.ast.kind(params[0]) != Kind::Name {
                    return Err(Diagnostic::error(
                        "main()'s first parameter must be int",
                        self.ast[params[0]].loc,
                    ));
                }
                for param in &params[1..] {
                    if !self.is_char_ptr_ptr(*param) && self.ast.kind(*param) != Kind::Name {
                        return Err(Diagnostic::error(
                            "main()'s parameters must be \"char *argv[]\" or \"char **argv\"",
                            self.ast[*param].loc,
                        ));
                    }
                }
            }
            _ => {
                return Err(Diagnostic::error(
                    "main() must have 0, 2, or 3 parameters",
                    node.loc,
                ));
            }
        }
        Ok(())
    }

    /// Storage classes a function-like may have at all in this language.
    fn check_func_storage(&self, id: AstId) -> CheckResult {
        let node = &self.ast[id];
        let ok = if self.lang.is_c() { FUNC_C } else { FUNC_LIKE_CPP };
        let not_func = node.ty.storage - ok;
        if !not_func.is_empty() {
            return Err(self.kind_not(id, &self.storage_name(not_func)));
        }
        if node.ty.storage.contains(Storage::THROW) && !LANG_THROW.contains(self.lang) {
            return Err(Diagnostic::error(
                format!("\"throw\" not supported{}", self.lang.which(LANG_THROW)),
                node.loc,
            )
            .with_hint("\"noexcept\""));
        }
        Ok(())
    }

    fn check_params(&self, id: AstId) -> CheckResult {
        let params = self.ast.params(id);
        if !LANG_PROTOTYPES.contains(self.lang) {
            return self.check_params_knr(id);
        }

        let mut void_param: Option<AstId> = None;
        let mut variadic: Option<AstId> = None;
        for (i, param) in params.iter().copied().enumerate() {
            let node = &self.ast[param];
            if i > 0 {
                if let Some(void_param) = void_param {
                    return Err(only_void(&self.ast[void_param]));
                }
            }
            if node.sname.count() > 1 {
                return Err(Diagnostic::error(
                    "parameter names can not be scoped",
                    node.loc,
                ));
            }

            let raw = self.ast.untypedef(param);
            if self.ast.kind(raw) != Kind::Array {
                let bad = node.ty.storage - PARAM_OK;
                if !bad.is_empty() {
                    return Err(Diagnostic::error(
                        format!(
                            "{} parameters can not be {}",
                            self.kind_name(id),
                            self.storage_name(bad)
                        ),
                        node.loc,
                    ));
                }
            }

            match &self.ast[raw].kind {
                AstKind::Builtin { bit_width } => {
                    let base = self.ast[raw].ty.base;
                    if base.contains(Base::AUTO) && !LANG_AUTO_PARAMS.contains(self.lang) {
                        return Err(Diagnostic::error(
                            format!(
                                "parameters can not be \"auto\"{}",
                                self.lang.which(LANG_AUTO_PARAMS)
                            ),
                            node.loc,
                        ));
                    }
                    if base == Base::VOID {
                        if !node.sname.is_empty() {
                            return Err(Diagnostic::error(
                                "void as parameter can not have a name",
                                node.loc,
                            ));
                        }
                        let quals = self.ast.qualified_type(param).qual & Qual::CV;
                        if !quals.is_empty() {
                            return Err(Diagnostic::error(
                                format!("void as parameter can not be {}", qual_name_all(quals)),
                                node.loc,
                            ));
                        }
                        if i > 0 {
                            return Err(only_void(node));
                        }
                        void_param = Some(param);
                        continue;
                    }
                    if *bit_width > 0 {
                        return Err(Diagnostic::error(
                            "parameters can not have bit-field widths",
                            node.loc,
                        ));
                    }
                }
                AstKind::Name => {
                    if !LANG_KNR_DEFS.contains(self.lang) {
                        return Err(Diagnostic::error(
                            format!(
                                "type specifier required{}",
                                self.lang.which(LANG_KNR_DEFS)
                            ),
                            node.loc,
                        ));
                    }
                }
                AstKind::Variadic => {
                    if let AstKind::Operator { oper, .. } = &self.ast[id].kind {
                        if *oper != OperId::Call {
                            return Err(Diagnostic::error(
                                format!(
                                    "operator {} can not have a variadic parameter",
                                    oper.token()
                                ),
                                node.loc,
                            ));
                        }
                    }
                    if i + 1 != params.len() {
                        return Err(Diagnostic::error(
                            "variadic specifier must be last",
                            node.loc,
                        ));
                    }
                    variadic = Some(param);
                    continue;
                }
                _ => {}
            }

            let ctx = Ctx {
                func: Some(id),
                pointee: false,
            };
            self.errors(param, VisitDir::Down, ctx)?;
        }

        if let Some(variadic) = variadic {
            if params.len() == 1 && !LANG_VARIADIC_ONLY.contains(self.lang) {
                return Err(Diagnostic::error(
                    format!(
                        "variadic specifier can not be only parameter{}",
                        self.lang.which(LANG_VARIADIC_ONLY)
                    ),
                    self.ast[variadic].loc,
                ));
            }
        }
        self.check_params_redef(id)
    }

    fn check_params_knr(&self, id: AstId) -> CheckResult {
        for param in self.ast.params(id) {
            let node = &self.ast[*param];
            match node.kind.kind() {
                Kind::Name => {}
                Kind::Variadic => {
                    return Err(Diagnostic::error(
                        format!(
                            "ellipsis not supported{}",
                            self.lang.which(LANG_PROTOTYPES)
                        ),
                        node.loc,
                    ));
                }
                _ => {
                    return Err(Diagnostic::error(
                        format!(
                            "function prototypes not supported{}",
                            self.lang.which(LANG_PROTOTYPES)
                        ),
                        node.loc,
                    ));
                }
            }
        }
        self.check_params_redef(id)
    }

    fn check_params_redef(&self, id: AstId) -> CheckResult {
        let params = self.ast.params(id);
        for (i, param) in params.iter().enumerate() {
            let sname = &self.ast[*param].sname;
            if sname.is_empty() {
                continue;
            }
            if params[..i].iter().any(|prev| self.ast[*prev].sname == *sname) {
                return Err(Diagnostic::error(
                    format!("\"{sname}\": redefinition of parameter"),
                    self.ast[*param].loc,
                ));
            }
        }
        Ok(())
    }

    fn check_lambda(&self, id: AstId) -> CheckResult {
        let node = &self.ast[id];
        let bad = node.ty.storage - LAMBDA_OK;
        if !bad.is_empty() {
            return Err(self.kind_not(id, &self.storage_name(bad)));
        }
        let AstKind::Lambda { captures, .. } = &node.kind else {
            return Ok(());
        };

        let mut default_capture: Option<CaptureKind> = None;
        for (i, capture) in captures.iter().enumerate() {
            let cap = &self.ast[*capture];
            let AstKind::Capture { capture: kind } = cap.kind else {
                continue;
            };
            match kind {
                CaptureKind::DefaultCopy | CaptureKind::DefaultReference => {
                    if default_capture.is_some() {
                        return Err(Diagnostic::error(
                            "default capture previously specified",
                            cap.loc,
                        ));
                    }
                    if i > 0 {
                        return Err(Diagnostic::error(
                            "default capture must be specified first",
                            cap.loc,
                        ));
                    }
                    default_capture = Some(kind);
                }
                CaptureKind::Reference => {
                    if default_capture == Some(CaptureKind::DefaultReference) {
                        return Err(Diagnostic::error(
                            "default capture is already by reference",
                            cap.loc,
                        ));
                    }
                }
                CaptureKind::StarThis => {
                    if !LANG_CAPTURE_STAR_THIS.contains(self.lang) {
                        return Err(Diagnostic::error(
                            format!(
                                "capturing \"*this\" not supported{}",
                                self.lang.which(LANG_CAPTURE_STAR_THIS)
                            ),
                            cap.loc,
                        ));
                    }
                }
                CaptureKind::Copy | CaptureKind::This => {}
            }
        }

        for (i, capture) in captures.iter().enumerate() {
            let cap = &self.ast[*capture];
            for prev in &captures[..i] {
                let prev = &self.ast[*prev];
                if is_capture_this(&cap.kind) && is_capture_this(&prev.kind) {
                    return Err(Diagnostic::error("\"this\" previously captured", cap.loc));
                }
                if !prev.sname.is_empty() && prev.sname == cap.sname {
                    return Err(Diagnostic::error(
                        format!("\"{}\" previously captured", cap.sname),
                        cap.loc,
                    ));
                }
            }
        }
        Ok(())
    }

    fn check_oper(&self, id: AstId) -> CheckResult {
        let node = &self.ast[id];
        let AstKind::Operator { oper, ret, member, .. } = &node.kind else {
            return Ok(());
        };
        let (oper, ret) = (*oper, *ret);
        let info = oper.info();

        if !info.legal.contains(self.lang) {
            return Err(Diagnostic::error(
                format!(
                    "overloading operator \"{}\" not supported{}",
                    info.token,
                    self.lang.which(info.legal)
                ),
                node.loc,
            ));
        }

        if *member == FuncMember::NonMember && info.non_member.is_none() {
            return Err(Diagnostic::error(
                format!("operator {} can only be a member", info.token),
                node.loc,
            ));
        }

        if info.non_member.is_none() && node.ty.storage.contains(Storage::STATIC) {
            let static_ok = oper == OperId::Call && LANG_STATIC_CALL_OPER.contains(self.lang);
            if !static_ok {
                let which = if oper == OperId::Call {
                    self.lang.which(LANG_STATIC_CALL_OPER)
                } else {
                    String::new()
                };
                return Err(Diagnostic::error(
                    format!("operator {} must be non-static{which}", info.token),
                    node.loc,
                ));
            }
        }

        if is_new_delete(oper) {
            let bad = node.ty.storage - NEW_DELETE_OK;
            if !bad.is_empty() {
                return Err(Diagnostic::error(
                    format!("operator {} can not be {}", info.token, self.storage_name(bad)),
                    node.loc,
                ));
            }
        }

        let ret_loc = self.ast[ret].loc;
        match oper {
            OperId::Arrow => {
                if !self.is_ptr_to(ret, KindSet::CLASS_STRUCT_UNION) {
                    return Err(Diagnostic::error(
                        format!(
                            "operator {} must return a pointer to struct, union, or class",
                            info.token
                        ),
                        ret_loc,
                    ));
                }
            }
            OperId::Delete | OperId::DeleteArray => {
                if !self.is_void(ret) {
                    return Err(Diagnostic::error(
                        format!("operator {} must return void", info.token),
                        ret_loc,
                    ));
                }
            }
            OperId::New | OperId::NewArray => {
                let to_void = self.ast.unpointer(ret).is_some_and(|to| self.is_void(to));
                if !to_void {
                    return Err(Diagnostic::error(
                        format!("operator {} must return a pointer to void", info.token),
                        ret_loc,
                    ));
                }
            }
            _ => {}
        }

        self.check_oper_params(id, info)
    }

    fn check_oper_params(&self, id: AstId, info: &OperInfo) -> CheckResult {
        let node = &self.ast[id];
        let member = self.func_member(id);
        let prefix = match member {
            FuncMember::Member => "member ",
            FuncMember::NonMember => "non-member ",
            FuncMember::Unspecified => "",
        };
        let (min, max) = match (member, info.non_member) {
            (FuncMember::Member, _) | (_, None) => info.member,
            (FuncMember::NonMember, Some(nm)) => nm,
            (FuncMember::Unspecified, Some(nm)) => {
                (info.member.0.min(nm.0), info.member.1.max(nm.1))
            }
        };

        let params = self.ast.params(id);
        let n = params.len();
        if n < min || n > max {
            let message = if min == max {
                format!(
                    "{prefix}operator {} must have exactly {min} parameter{}",
                    info.token,
                    plural_s(min)
                )
            } else if n < min {
                format!(
                    "{prefix}operator {} must have at least {min} parameter{}",
                    info.token,
                    plural_s(min)
                )
            } else {
                format!(
                    "{prefix}operator {} can have at most {max} parameter{}",
                    info.token,
                    plural_s(max)
                )
            };
            return Err(Diagnostic::error(message, node.loc));
        }

        let ecsu = KindSet::CLASS_STRUCT_UNION | KindSet::ENUM;
        let ecsu_params = params
            .iter()
            .filter(|p| self.ast.is_kind(self.ast.unreference(**p), ecsu))
            .count();

        match member {
            FuncMember::NonMember => {
                if !is_new_delete(info.id) && ecsu_params == 0 {
                    return Err(Diagnostic::error(
                        "at least 1 parameter of a non-member operator must be an enum, \
                         class, struct, or union; or a reference or rvalue reference thereto",
                        node.loc,
                    ));
                }
            }
            FuncMember::Member => {
                if node.ty.storage.contains(Storage::FRIEND) && node.sname.is_empty() {
                    return Err(Diagnostic::error(
                        "member operators can not be friend",
                        node.loc,
                    ));
                }
            }
            FuncMember::Unspecified => {}
        }

        match info.id {
            OperId::PlusPlus | OperId::MinusMinus => {
                let dummy = match (member, n) {
                    (FuncMember::Member, 1) => params.first(),
                    (FuncMember::NonMember | FuncMember::Unspecified, 2) => params.get(1),
                    _ => None,
                };
                if let Some(dummy) = dummy {
                    if !self.is_builtin_int(*dummy) {
                        return Err(Diagnostic::error(
                            format!(
                                "parameter of postfix {prefix}operator {} must be int",
                                info.token
                            ),
                            self.ast[*dummy].loc,
                        ));
                    }
                }
            }
            OperId::New | OperId::NewArray => {
                if let Some(first) = params.first() {
                    if !self.is_size_t(*first) {
                        return Err(Diagnostic::error(
                            format!(
                                "invalid parameter type for operator {}; must be std::size_t (or equivalent)",
                                info.token
                            ),
                            self.ast[*first].loc,
                        ));
                    }
                }
            }
            OperId::Delete | OperId::DeleteArray => {
                if let Some(first) = params.first() {
                    let to_void = self.ast.unpointer(*first).is_some_and(|to| self.is_void(to));
                    if !to_void {
                        return Err(Diagnostic::error(
                            format!(
                                "invalid parameter type for operator {}; must be a pointer to void",
                                info.token
                            ),
                            self.ast[*first].loc,
                        ));
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn check_ctor_dtor(&self, id: AstId) -> CheckResult {
        let node = &self.ast[id];
        let kind = node.kind.kind();
        let is_definition = node.sname.count() > 1;

        if is_definition && !node.sname.is_ctor() {
            let scope = node.sname.scope_sname();
            return Err(Diagnostic::error(
                format!(
                    "\"{}\", \"{}\": {} and {} names don't match",
                    scope.local_name(),
                    node.sname.local_name(),
                    crate::ast::sname::scope_kind_english(node.sname.scope_type()),
                    kind.name()
                ),
                node.loc,
            ));
        }

        let ok = match (kind, is_definition) {
            (Kind::Constructor, false) => CTOR_DECL,
            (Kind::Constructor, true) => CTOR_DEF,
            (_, false) => DTOR_DECL,
            (_, true) => DTOR_DEF,
        };
        let bad = node.ty.storage - ok;
        if !bad.is_empty() {
            let what = if is_definition { " definitions" } else { "s" };
            return Err(Diagnostic::error(
                format!("{}{what} can not be {}", kind.name(), self.storage_name(bad)),
                node.loc,
            ));
        }
        Ok(())
    }

    fn check_pointer(&self, id: AstId) -> CheckResult {
        let node = &self.ast[id];
        let Some(to) = self.ast.child(id) else {
            return Ok(());
        };
        let raw_to = self.ast.untypedef(to);

        match &self.ast[raw_to].kind {
            AstKind::Reference { .. } | AstKind::RvalueReference { .. } => {
                let err = self.kind_to_kind(id, raw_to);
                return Err(if raw_to == to {
                    err.with_hint(format!("{} to pointer", self.kind_name(raw_to)))
                } else {
                    err
                });
            }
            AstKind::Builtin { .. }
                if self.ast[raw_to].ty.base.contains(Base::AUTO)
                    && !LANG_AUTO_POINTERS.contains(self.lang) =>
            {
                return Err(Diagnostic::error(
                    format!(
                        "\"auto\" with pointer declarator not supported{}",
                        self.lang.which(LANG_AUTO_POINTERS)
                    ),
                    node.loc,
                ));
            }
            _ => {}
        }

        if self.ast[to].ty.storage.contains(Storage::REGISTER) {
            return Err(Diagnostic::error(
                format!("{} to \"register\" is illegal", self.kind_name(id)),
                node.loc,
            ));
        }
        Ok(())
    }

    fn check_reference(&self, id: AstId) -> CheckResult {
        let node = &self.ast[id];
        let quals = node.ty.qual & Qual::CV;
        if !quals.is_empty() {
            let names = qual_name_all(quals);
            let hint = format!("{} to {}", self.kind_name(id), names.trim_matches('"'));
            return Err(self.kind_not(id, &names).with_hint(hint));
        }
        let Some(to) = self.ast.child(id) else {
            return Ok(());
        };
        if self.is_void(to) {
            return Err(Diagnostic::error(
                format!("{} to \"void\" is illegal", self.kind_name(id)),
                node.loc,
            )
            .with_hint("pointer to void"));
        }
        if self.ast.is_kind(to, KindSet::ANY_REFERENCE) {
            return Err(self.kind_to_kind(id, to));
        }
        Ok(())
    }

    fn check_ret_type(&self, id: AstId) -> CheckResult {
        let node = &self.ast[id];
        let Some(ret) = self.ast.child(id) else {
            return Ok(());
        };
        let kind_name = self.kind_name(id);
        let raw = self.ast.untypedef(ret);
        let ret_loc = self.ast[ret].loc;

        match self.ast.kind(raw) {
            Kind::Array => {
                return Err(Diagnostic::error(format!("{kind_name} returning array"), ret_loc)
                    .with_hint(format!("{kind_name} returning pointer")));
            }
            Kind::Builtin => {
                if self.ast[raw].ty.base.contains(Base::AUTO)
                    && !LANG_AUTO_RETURN.contains(self.lang)
                {
                    return Err(Diagnostic::error(
                        format!(
                            "{kind_name} returning \"auto\" not supported{}",
                            self.lang.which(LANG_AUTO_RETURN)
                        ),
                        ret_loc,
                    ));
                }
            }
            Kind::ClassStructUnion => {
                if !LANG_CSU_RETURN.contains(self.lang) {
                    return Err(Diagnostic::error(
                        format!(
                            "{kind_name} returning {} not supported{}",
                            self.kind_name(raw),
                            self.lang.which(LANG_CSU_RETURN)
                        ),
                        ret_loc,
                    ));
                }
            }
            Kind::Function | Kind::Operator | Kind::UserDefLiteral | Kind::AppleBlock => {
                return Err(Diagnostic::error(
                    format!("{kind_name} returning {} is illegal", self.kind_name(raw)),
                    ret_loc,
                )
                .with_hint(format!("{kind_name} returning pointer to function")));
            }
            _ => {}
        }

        if node.ty.storage.contains(Storage::EXPLICIT) {
            let ok = node.kind.kind() == Kind::UserDefConversion
                && LANG_EXPLICIT_CONV.contains(self.lang);
            if !ok {
                let which = if node.kind.kind() == Kind::UserDefConversion {
                    self.lang.which(LANG_EXPLICIT_CONV)
                } else {
                    String::new()
                };
                return Err(Diagnostic::error(
                    format!("{kind_name} can not be \"explicit\"{which}"),
                    node.loc,
                ));
            }
        }
        Ok(())
    }

    fn check_structured_binding(&self, id: AstId) -> CheckResult {
        self.require(id, LANG_STRUCTURED_BINDINGS)?;
        let node = &self.ast[id];
        let bad = node.ty.storage - (Storage::STATIC | Storage::THREAD_LOCAL);
        if !bad.is_empty() {
            return Err(self.kind_not(id, &self.storage_name(bad)));
        }
        if let AstKind::StructuredBinding { names } = &node.kind {
            if names.is_empty() {
                return Err(Diagnostic::error(
                    "structured binding requires at least one name",
                    node.loc,
                ));
            }
            for (i, name) in names.iter().enumerate() {
                if names[..i].contains(name) {
                    return Err(Diagnostic::error(
                        format!("\"{name}\": redefinition"),
                        node.loc,
                    ));
                }
            }
        }
        Ok(())
    }

    fn check_typedef(&self, id: AstId, ctx: Ctx) -> CheckResult {
        let raw = self.ast.untypedef(id);
        if self.ast.kind(raw) == Kind::Builtin && self.ast[raw].ty.base == Base::VOID {
            let pointee = ctx.pointee
                || self.ast[id]
                    .parent
                    .is_some_and(|p| self.ast.is_kind(p, KindSet::ANY_POINTER));
            self.check_void_object(id, Ctx { pointee, ..ctx })?;
        }
        if self.ast[id].kind.bit_width() > 0 && !self.is_integral(id) {
            return Err(Diagnostic::error(
                format!(
                    "invalid type {} for bit-field",
                    self.type_name(&self.ast[raw].ty)
                ),
                self.ast[id].loc,
            ));
        }
        Ok(())
    }

    fn check_user_def_conv(&self, id: AstId) -> CheckResult {
        self.require(id, Lang::CPP_ANY)?;
        let node = &self.ast[id];
        let bad = node.ty.storage - USER_DEF_CONV_OK;
        if !bad.is_empty() {
            return Err(self.kind_not(id, &self.storage_name(bad)));
        }
        if node.ty.storage.contains(Storage::FRIEND) && node.sname.is_empty() {
            return Err(Diagnostic::error(
                "friend user-defined conversion operator must use qualified name",
                node.loc,
            ));
        }
        if let Some(to) = self.ast.child(id) {
            if self.ast.kind(self.ast.untypedef(to)) == Kind::Array {
                return Err(Diagnostic::error(
                    "user-defined conversion operator can not convert to an array",
                    self.ast[to].loc,
                )
                .with_hint("pointer to array"));
            }
        }
        self.check_ret_type(id)?;
        self.check_func(id)?;
        self.check_func_storage(id)
    }

    fn check_user_def_lit_params(&self, id: AstId) -> CheckResult {
        let node = &self.ast[id];
        let params = self.ast.params(id);
        match params {
            [] => Err(Diagnostic::error(
                "user-defined literal must have at least 1 parameter",
                node.loc,
            )),
            [param] => {
                let raw = self.ast.untypedef(*param);
                let base = CType::normalize_base(self.ast[raw].ty.base);
                let ok_bases = [
                    Base::CHAR,
                    Base::CHAR8_T,
                    Base::CHAR16_T,
                    Base::CHAR32_T,
                    Base::WCHAR_T,
                    Base::UNSIGNED | Base::LONG_LONG,
                    Base::LONG | Base::DOUBLE,
                ];
                let builtin_ok = self.ast.kind(raw) == Kind::Builtin && ok_bases.contains(&base);
                if builtin_ok || self.is_ptr_to_const_char(*param, Base::CHAR) {
                    return Ok(());
                }
                let char8 = if Lang::C_23.union(Lang::cpp_min(Lang::CPP_20)).contains(self.lang) {
                    "char8_t, "
                } else {
                    ""
                };
                Err(Diagnostic::error(
                    format!(
                        "invalid parameter type for user-defined literal; must be one of: \
                         unsigned long long, long double, char, const char*, {char8}\
                         char16_t, char32_t, or wchar_t"
                    ),
                    self.ast[*param].loc,
                ))
            }
            [first, second] => {
                let chars = Base::CHAR
                    | Base::CHAR8_T
                    | Base::CHAR16_T
                    | Base::CHAR32_T
                    | Base::WCHAR_T;
                if !self.is_ptr_to_const_char(*first, chars) {
                    return Err(Diagnostic::error(
                        "invalid parameter type for user-defined literal; must be one of: \
                         const (char|char8_t|char16_t|char32_t|wchar_t)*",
                        self.ast[*first].loc,
                    ));
                }
                if !self.is_size_t(*second) {
                    return Err(Diagnostic::error(
                        "invalid parameter type for user-defined literal; \
                         must be std::size_t (or equivalent)",
                        self.ast[*second].loc,
                    ));
                }
                Ok(())
            }
            [_, _, third, ..] => Err(Diagnostic::error(
                "user-defined literal may have at most 2 parameters",
                self.ast[*third].loc,
            )),
        }
    }

    // ===== Helpers =====

    fn require(&self, id: AstId, legal: Lang) -> CheckResult {
        if legal.contains(self.lang) {
            return Ok(());
        }
        Err(Diagnostic::error(
            format!(
                "{} not supported{}",
                self.kind_name(id),
                self.lang.which(legal)
            ),
            self.ast[id].loc,
        ))
    }

    fn require_vla(&self, id: AstId) -> CheckResult {
        if LANG_VLA.contains(self.lang) {
            return Ok(());
        }
        Err(Diagnostic::error(
            format!(
                "variable length arrays not supported{}",
                self.lang.which(LANG_VLA)
            ),
            self.ast[id].loc,
        ))
    }

    fn kind_name(&self, id: AstId) -> &'static str {
        self.ast.kind(id).name()
    }

    /// `KIND can not be WHAT`
    fn kind_not(&self, id: AstId, what: &str) -> Diagnostic {
        Diagnostic::error(
            format!("{} can not be {what}", self.kind_name(id)),
            self.ast[id].loc,
        )
    }

    /// `KIND of KIND is illegal`
    fn kind_of_kind(&self, id: AstId, of: AstId) -> Diagnostic {
        Diagnostic::error(
            format!("{} of {} is illegal", self.kind_name(id), self.kind_name(of)),
            self.ast[id].loc,
        )
    }

    /// `KIND to KIND is illegal`
    fn kind_to_kind(&self, id: AstId, to: AstId) -> Diagnostic {
        Diagnostic::error(
            format!("{} to {} is illegal", self.kind_name(id), self.kind_name(to)),
            self.ast[id].loc,
        )
    }

    fn storage_name(&self, storage: Storage) -> String {
        format!("\"{}\"", names::storage_c(storage, self.lang).join(" "))
    }

    fn type_name(&self, ty: &CType) -> String {
        let mut words: Vec<String> = Vec::new();
        let attrs = names::attr_c(ty.attr, self.lang);
        if !attrs.is_empty() {
            words.push(attrs);
        }
        words.extend(names::storage_c(ty.storage, self.lang).into_iter().map(String::from));
        words.extend(names::qual_c(ty.qual).into_iter().map(String::from));
        words.extend(names::base_c(ty.base, self.lang).into_iter().map(String::from));
        format!("\"{}\"", words.join(" "))
    }

    fn is_void(&self, id: AstId) -> bool {
        self.ast.is_builtin(id, Base::VOID)
    }

    fn is_int(&self, id: AstId) -> bool {
        let raw = self.ast.untypedef(id);
        self.ast.kind(raw) == Kind::Builtin && {
            let base = self.ast[raw].ty.base;
            base.is_empty() || CType::normalize_base(base) == Base::INT
        }
    }

    fn is_builtin_int(&self, id: AstId) -> bool {
        let raw = self.ast.untypedef(id);
        self.ast.kind(raw) == Kind::Builtin
            && CType::normalize_base(self.ast[raw].ty.base) == Base::INT
    }

    fn is_integral(&self, id: AstId) -> bool {
        let raw = self.ast.untypedef(id);
        match self.ast.kind(raw) {
            Kind::Enum => true,
            Kind::Builtin => {
                let base = self.ast[raw].ty.base;
                base.intersects(Base::INTEGRAL)
                    && !base.intersects(Base::FLOAT | Base::DOUBLE | Base::COMPLEX | Base::IMAGINARY)
            }
            _ => false,
        }
    }

    fn is_size_t(&self, id: AstId) -> bool {
        let mut node = id;
        while let AstKind::Typedef { for_ast, .. } = self.ast[node].kind {
            if self.ast[for_ast].sname.local_name() == "size_t" {
                return true;
            }
            node = for_ast;
        }
        self.ast.kind(node) == Kind::Builtin
            && CType::normalize_base(self.ast[node].ty.base) == Base::UNSIGNED | Base::LONG
    }

    fn is_ptr_to(&self, id: AstId, kinds: KindSet) -> bool {
        self.ast
            .unpointer(id)
            .is_some_and(|to| self.ast.is_kind(to, kinds))
    }

    fn is_ref_to(&self, id: AstId, kinds: KindSet) -> bool {
        let raw = self.ast.untypedef(id);
        self.ast.is_kind(raw, KindSet::ANY_REFERENCE)
            && self.ast.is_kind(self.ast.unreference(raw), kinds)
    }

    fn is_ptr_to_const_char(&self, id: AstId, chars: Base) -> bool {
        self.ast.unpointer(id).is_some_and(|to| {
            let ty = self.ast.qualified_type(to);
            self.ast.kind(to) == Kind::Builtin
                && ty.qual.contains(Qual::CONST)
                && chars.contains(ty.base - Base::SIGNEDNESS)
                && !(ty.base - Base::SIGNEDNESS).is_empty()
        })
    }

    /// `char**` or `char*[]`, as in `argv`.
    fn is_char_ptr_ptr(&self, id: AstId) -> bool {
        let raw = self.ast.untypedef(id);
        let inner = match &self.ast[raw].kind {
            AstKind::Pointer { to } | AstKind::Array { of: to, .. } => self.ast.untypedef(*to),
            _ => return false,
        };
        self.ast
            .unpointer(inner)
            .is_some_and(|c| self.ast.kind(c) == Kind::Builtin && self.ast[c].ty.base == Base::CHAR)
    }

    /// Whether a function-like is, or is declared as, a member. Operators
    /// with no explicit choice are judged by their parameter count.
    fn func_member(&self, id: AstId) -> FuncMember {
        let node = &self.ast[id];
        let member = node.kind.member();
        if member != FuncMember::Unspecified {
            return member;
        }
        if node.ty.storage.intersects(Storage::MEMBER_ONLY)
            || node.ty.qual.intersects(Qual::CV | Qual::REF_QUALIFIERS)
        {
            return FuncMember::Member;
        }
        let AstKind::Operator { oper, params, .. } = &node.kind else {
            return FuncMember::Unspecified;
        };
        let info = oper.info();
        let Some(non_member) = info.non_member else {
            return FuncMember::Member;
        };
        let n = params.len();
        if info.member.1 != PARAMS_UNLIMITED && n > info.member.1 {
            FuncMember::NonMember
        } else if n < non_member.0 {
            FuncMember::Member
        } else {
            FuncMember::Unspecified
        }
    }

    /// Whether `= default` / `= delete` may be applied.
    fn is_special(&self, id: AstId) -> bool {
        let node = &self.ast[id];
        let is_default = node.ty.storage.contains(Storage::DEFAULT);
        match &node.kind {
            AstKind::Constructor { params } => match params.as_slice() {
                [] => true,
                [param] => self.is_ref_to(*param, KindSet::CLASS_STRUCT_UNION) || !is_default,
                _ => !is_default,
            },
            AstKind::Destructor => true,
            AstKind::Function { .. } | AstKind::UserDefConversion { .. } => !is_default,
            AstKind::Operator { oper, ret, params, .. } => match oper {
                OperId::Assign => {
                    !is_default
                        || (params.len() == 1
                            && self.is_ref_to(*ret, KindSet::CLASS_STRUCT_UNION)
                            && self.is_ref_to(params[0], KindSet::CLASS_STRUCT_UNION))
                }
                OperId::EqEq
                | OperId::NotEq
                | OperId::Less
                | OperId::LessEq
                | OperId::Greater
                | OperId::GreaterEq
                | OperId::Spaceship => {
                    !is_default || LANG_DEFAULT_RELOPS.contains(self.lang)
                }
                _ => !is_default,
            },
            _ => !is_default,
        }
    }
}

/// Checks one declaration: the warnings on success, or the first error.
pub fn check(ast: &Ast, root: AstId, lang: Lang) -> Result<Vec<Diagnostic>, Diagnostic> {
    let mut checker = Checker::new(ast, lang);
    checker.check(root);
    checker.into_result()
}

fn only_void(node: &crate::ast::AstNode) -> Diagnostic {
    Diagnostic::error("\"void\" must be only parameter if specified", node.loc)
}

fn is_capture_this(kind: &AstKind) -> bool {
    matches!(
        kind,
        AstKind::Capture {
            capture: CaptureKind::This | CaptureKind::StarThis
        }
    )
}

fn is_new_delete(oper: OperId) -> bool {
    matches!(
        oper,
        OperId::New | OperId::NewArray | OperId::Delete | OperId::DeleteArray
    )
}

fn plural_s(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Quoted qualifier names, including array `static`.
fn qual_name_all(qual: Qual) -> String {
    let mut words = names::qual_c(qual);
    if qual.contains(Qual::REFERENCE) {
        words.push("&");
    }
    if qual.contains(Qual::RVALUE_REFERENCE) {
        words.push("&&");
    }
    if qual.contains(Qual::NON_EMPTY) {
        words.push("static");
    }
    format!("\"{}\"", words.join(" "))
}

/// Languages in which `name` is reserved for the implementation.
fn reserved_langs(name: &str) -> Lang {
    let mut chars = name.chars();
    if chars.next() == Some('_') && chars.next().is_some_and(|c| c == '_' || c.is_ascii_uppercase()) {
        return Lang::ANY;
    }
    if name.contains("__") {
        return Lang::CPP_ANY;
    }
    Lang::empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{SName, SourceLocation};

    fn loc() -> SourceLocation {
        SourceLocation::default()
    }

    fn builtin(ast: &mut Ast, base: Base) -> AstId {
        ast.new_builtin(CType::from_base(base), loc())
    }

    /// `declare NAME as array 3 of ELEMENT`
    fn array_of(ast: &mut Ast, element: AstId) -> AstId {
        let array = ast.new_array(ArraySize::Int(3), 0, loc());
        ast.set_parent(element, array);
        ast[array].sname = SName::local("a");
        array
    }

    #[test]
    fn test_array_of_void() {
        let mut ast = Ast::new();
        let void = builtin(&mut ast, Base::VOID);
        let array = array_of(&mut ast, void);
        let err = check(&ast, array, Lang::C_17).unwrap_err();
        assert_eq!(err.message, "array of void");
        assert_eq!(err.hint.as_deref(), Some("array of pointer to void"));
    }

    #[test]
    fn test_array_of_pointer_to_void() {
        let mut ast = Ast::new();
        let void = builtin(&mut ast, Base::VOID);
        let ptr = ast.new_pointer(0, loc());
        ast.set_parent(void, ptr);
        let array = array_of(&mut ast, ptr);
        assert!(check(&ast, array, Lang::C_17).unwrap().is_empty());
    }

    #[test]
    fn test_variable_of_void() {
        let mut ast = Ast::new();
        let void = builtin(&mut ast, Base::VOID);
        ast[void].sname = SName::local("v");
        let err = check(&ast, void, Lang::CPP_17).unwrap_err();
        assert_eq!(err.hint.as_deref(), Some("pointer to void"));

        ast[void].ty.storage = Storage::EXTERN;
        assert!(check(&ast, void, Lang::C_99).is_ok());
        assert!(check(&ast, void, Lang::CPP_17).is_err());
    }

    #[test]
    fn test_register_function() {
        let mut ast = Ast::new();
        let f = ast.new_function(vec![], FuncMember::Unspecified, 0, loc());
        let ret = ast.child(f).unwrap();
        ast[ret].kind = AstKind::Builtin { bit_width: 0 };
        ast[ret].ty = CType::from_base(Base::INT);
        ast[f].ty.storage = Storage::REGISTER;
        for lang in crate::lang::ALL_LANGS {
            let mut checker = Checker::new(&ast, lang);
            assert!(!checker.check(f), "register function passed in {lang}");
        }
    }

    #[test]
    fn test_reference_to_void() {
        let mut ast = Ast::new();
        let void = builtin(&mut ast, Base::VOID);
        let r = ast.new_parent(|to| AstKind::Reference { to }, 0, loc());
        ast.set_parent(void, r);
        let err = check(&ast, r, Lang::CPP_11).unwrap_err();
        assert_eq!(err.message, "reference to \"void\" is illegal");
    }

    #[test]
    fn test_register_reference_by_language() {
        let mut ast = Ast::new();
        let int = builtin(&mut ast, Base::INT);
        let r = ast.new_parent(|to| AstKind::Reference { to }, 0, loc());
        ast.set_parent(int, r);
        ast[r].ty.storage = Storage::REGISTER;
        ast[r].sname = SName::local("r");

        assert!(check(&ast, r, Lang::CPP_03).unwrap().is_empty());
        let warnings = check(&ast, r, Lang::CPP_11).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.starts_with("\"register\" is deprecated"));
        assert!(check(&ast, r, Lang::CPP_17).is_err());
    }

    #[test]
    fn test_user_def_literal_reserved_warning() {
        let mut ast = Ast::new();
        let placeholder = ast.new_placeholder(0, loc());
        let udl = ast.alloc(
            AstKind::UserDefLiteral {
                params: vec![],
                ret: placeholder,
            },
            0,
            loc(),
        );
        let ret = builtin(&mut ast, Base::INT);
        ast.set_parent(ret, udl);
        let param = ast.new_builtin(CType::from_base(Base::UNSIGNED | Base::LONG_LONG), loc());
        if let Some(params) = ast[udl].kind.params_mut() {
            params.push(param);
        }
        ast[udl].sname = SName::local("km");
        let warnings = check(&ast, udl, Lang::CPP_11).unwrap();
        assert_eq!(
            warnings[0].message,
            "user-defined literals not starting with '_' are reserved"
        );

        ast[udl].sname = SName::local("_km");
        assert!(check(&ast, udl, Lang::CPP_11).unwrap().is_empty());
    }

    #[test]
    fn test_volatile_param_deprecated() {
        let mut ast = Ast::new();
        let param = ast.new_builtin(
            CType::from_base(Base::INT) | CType::from_qual(Qual::VOLATILE),
            loc(),
        );
        let f = ast.new_function(vec![param], FuncMember::Unspecified, 0, loc());
        let ret = builtin(&mut ast, Base::VOID);
        ast.set_parent(ret, f);
        assert!(check(&ast, f, Lang::CPP_17).unwrap().is_empty());
        let warnings = check(&ast, f, Lang::CPP_20).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("deprecated since C++20"));
    }

    #[test]
    fn test_up_and_down_agree() {
        let mut ast = Ast::new();
        let void = builtin(&mut ast, Base::VOID);
        let array = array_of(&mut ast, void);
        let mut down = Checker::new(&ast, Lang::C_17);
        let mut up = Checker::new(&ast, Lang::C_17);
        assert!(!down.check_dir(array, VisitDir::Down));
        assert!(!up.check_dir(array, VisitDir::Up));
        assert_eq!(down.error(), up.error());
    }

    #[test]
    fn test_reserved_names() {
        assert_eq!(reserved_langs("_Foo"), Lang::ANY);
        assert_eq!(reserved_langs("a__b"), Lang::CPP_ANY);
        assert!(reserved_langs("_foo").is_empty());
    }
}
