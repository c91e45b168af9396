//! Scoped names (`A::B::c`) and the globs that match them.

use crate::types::{Base, CType};
use std::fmt;

/// One component of a scoped name with its own type, e.g. the `class` of
/// `C` in `C::f`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Scope {
    pub name: String,
    pub ty: CType,
}

/// An ordered list of name components, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SName {
    scopes: Vec<Scope>,
}

impl SName {
    pub fn new() -> Self {
        Self::default()
    }

    /// A name with a single component.
    pub fn local(name: &str) -> Self {
        let mut sname = SName::new();
        sname.push(name);
        sname
    }

    /// Splits `A::B::c` into components; scopes get the generic `scope` type.
    pub fn parse(scoped: &str) -> Self {
        let mut sname = SName::new();
        for part in scoped.split("::").filter(|p| !p.is_empty()) {
            sname.push(part);
        }
        sname
    }

    pub fn push(&mut self, name: &str) {
        if let Some(last) = self.scopes.last_mut() {
            if last.ty.base.is_empty() {
                last.ty = CType::from_base(Base::SCOPE);
            }
        }
        self.scopes.push(Scope {
            name: name.to_string(),
            ty: CType::NONE,
        });
    }

    /// Appends all components of `other`.
    pub fn append(&mut self, other: SName) {
        for scope in other.scopes {
            self.push(&scope.name);
            if let Some(last) = self.scopes.last_mut() {
                last.ty = scope.ty;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn count(&self) -> usize {
        self.scopes.len()
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn local_name(&self) -> &str {
        self.scopes.last().map(|s| s.name.as_str()).unwrap_or("")
    }

    /// Everything but the local name: `A::B` for `A::B::c`.
    pub fn scope_name(&self) -> String {
        let n = self.scopes.len().saturating_sub(1);
        self.scopes[..n]
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join("::")
    }

    pub fn full_name(&self) -> String {
        self.scopes
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join("::")
    }

    pub fn local_type(&self) -> CType {
        self.scopes.last().map(|s| s.ty).unwrap_or_default()
    }

    pub fn set_local_type(&mut self, ty: CType) {
        if let Some(last) = self.scopes.last_mut() {
            last.ty = ty;
        }
    }

    /// Type of the innermost enclosing scope, if there is one.
    pub fn scope_type(&self) -> CType {
        let n = self.scopes.len();
        if n < 2 {
            return CType::NONE;
        }
        self.scopes[n - 2].ty
    }

    pub fn set_scope_type(&mut self, ty: CType) {
        let n = self.scopes.len();
        if n >= 2 {
            self.scopes[n - 2].ty = ty;
        }
    }

    /// The enclosing scopes as a name of their own (`A::B` of `A::B::c`).
    pub fn scope_sname(&self) -> SName {
        let n = self.scopes.len().saturating_sub(1);
        SName {
            scopes: self.scopes[..n].to_vec(),
        }
    }

    /// Whether this names a constructor: `S::S`.
    pub fn is_ctor(&self) -> bool {
        let n = self.scopes.len();
        n >= 2 && self.scopes[n - 1].name == self.scopes[n - 2].name
    }

    /// Pseudo-English form: `c of class B of namespace A`.
    pub fn english(&self) -> String {
        let mut out = self.local_name().to_string();
        let n = self.scopes.len().saturating_sub(1);
        for scope in self.scopes[..n].iter().rev() {
            out.push_str(" of ");
            out.push_str(&scope_kind_english(scope.ty));
            out.push(' ');
            out.push_str(&scope.name);
        }
        out
    }
}

/// English word for the kind of a scope.
pub fn scope_kind_english(ty: CType) -> String {
    let base = ty.base & Base::ANY_SCOPE;
    if base.is_empty() {
        "scope".to_string()
    } else {
        crate::types::names::base_english(base)
    }
}

impl fmt::Display for SName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// A glob over scoped names: `*` matches within one component and a leading
/// `**::` matches any number of enclosing scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SGlob {
    any_scope: bool,
    components: Vec<String>,
}

impl SGlob {
    pub fn parse(glob: &str) -> Self {
        let (any_scope, rest) = match glob.strip_prefix("**::") {
            Some(rest) => (true, rest),
            None => (false, glob),
        };
        SGlob {
            any_scope,
            components: rest.split("::").map(str::to_string).collect(),
        }
    }

    pub fn matches(&self, sname: &SName) -> bool {
        let scopes = sname.scopes();
        let n = self.components.len();
        if scopes.len() < n || (!self.any_scope && scopes.len() != n) {
            return false;
        }
        let tail = &scopes[scopes.len() - n..];
        self.components
            .iter()
            .zip(tail)
            .all(|(pattern, scope)| wildcard_match(pattern, &scope.name))
    }
}

/// Matches `text` against `pattern` where `*` matches any run of characters.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while ti < t.len() {
        if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if pi < p.len() && p[pi] == t[ti] {
            pi += 1;
            ti += 1;
        } else if let Some((sp, st)) = star {
            pi = sp + 1;
            ti = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|c| *c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components() {
        let s = SName::parse("A::B::c");
        assert_eq!(s.count(), 3);
        assert_eq!(s.local_name(), "c");
        assert_eq!(s.scope_name(), "A::B");
        assert_eq!(s.full_name(), "A::B::c");
        assert_eq!(s.scope_type().base, Base::SCOPE);
        assert!(s.local_type().is_none());
    }

    #[test]
    fn test_english() {
        let mut s = SName::parse("N::C::x");
        s.set_scope_type(CType::from_base(Base::CLASS));
        assert_eq!(s.english(), "x of class C of scope N");
    }

    #[test]
    fn test_ctor() {
        assert!(SName::parse("S::S").is_ctor());
        assert!(!SName::parse("S::T").is_ctor());
        assert!(!SName::local("S").is_ctor());
    }

    #[test]
    fn test_glob() {
        assert!(SGlob::parse("size_*").matches(&SName::local("size_t")));
        assert!(!SGlob::parse("size_*").matches(&SName::parse("std::size_t")));
        assert!(SGlob::parse("std::*").matches(&SName::parse("std::string")));
        assert!(SGlob::parse("**::size_t").matches(&SName::parse("std::size_t")));
        assert!(SGlob::parse("**::size_t").matches(&SName::local("size_t")));
        assert!(SGlob::parse("*int*_t").matches(&SName::local("uint32_t")));
        assert!(!SGlob::parse("int").matches(&SName::local("int8_t")));
    }
}
