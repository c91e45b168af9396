//! JSON dump of declaration trees, printed after each command when the
//! `debug` option is set.

use crate::ast::{ArraySize, Ast, AstId, AstKind, FuncMember};
use serde::Serialize;

/// A serializable copy of one node and everything below it.
#[derive(Debug, Clone, Serialize)]
pub struct NodeDump {
    pub id: usize,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub ty: String,
    pub depth: u32,
    /// `line:column` of the node in the command line.
    pub loc: String,
    /// Kind-specific payload: array size, bit width, operator, cast, and so on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub captures: Vec<NodeDump>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<NodeDump>,
    /// Type of a typedef, or fixed type of an enum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlying: Option<Box<NodeDump>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<NodeDump>>,
}

pub fn dump(ast: &Ast, id: AstId) -> NodeDump {
    let node = &ast[id];
    let name = (!node.sname.is_empty()).then(|| node.sname.full_name());

    let mut captures = Vec::new();
    let mut underlying = None;
    let detail = match &node.kind {
        AstKind::Builtin { bit_width } => width(*bit_width),
        AstKind::Capture { capture } => Some(format!("{capture:?}")),
        AstKind::ClassStructUnion { csu_name } => Some(csu_name.full_name()),
        AstKind::Concept { concept_name } => Some(concept_name.full_name()),
        AstKind::Typedef { for_ast, bit_width } => {
            underlying = Some(Box::new(dump(ast, *for_ast)));
            width(*bit_width)
        }
        AstKind::Array { size, .. } => Some(match size {
            ArraySize::Unspecified => "[]".to_string(),
            ArraySize::Int(n) => format!("[{n}]"),
            ArraySize::Named(name) => format!("[{name}]"),
            ArraySize::VlaStar => "[*]".to_string(),
        }),
        AstKind::Cast { cast, .. } => Some(cast.c_keyword().unwrap_or("C cast").to_string()),
        AstKind::Enum {
            enum_name,
            of,
            bit_width,
        } => {
            underlying = of.map(|of| Box::new(dump(ast, of)));
            Some(match width(*bit_width) {
                Some(w) => format!("{} {w}", enum_name.full_name()),
                None => enum_name.full_name(),
            })
        }
        AstKind::PointerToMember { class_name, .. } => Some(class_name.full_name()),
        AstKind::StructuredBinding { names } => Some(
            names
                .iter()
                .map(|n| n.full_name())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        AstKind::Function { member, .. } => member_detail(*member),
        AstKind::Lambda { captures: list, .. } => {
            captures = list.iter().map(|&c| dump(ast, c)).collect();
            None
        }
        AstKind::Operator { oper, member, .. } => Some(match member_detail(*member) {
            Some(m) => format!("operator{} {m}", oper.token()),
            None => format!("operator{}", oper.token()),
        }),
        _ => None,
    };

    NodeDump {
        id: id.index(),
        kind: node.kind.kind().name(),
        name,
        ty: node.ty.english_name(),
        depth: node.depth,
        loc: format!("{}:{}", node.loc.line, node.loc.column),
        detail,
        captures,
        params: ast.params(id).iter().map(|&p| dump(ast, p)).collect(),
        underlying,
        child: ast.child(id).map(|c| Box::new(dump(ast, c))),
    }
}

fn width(bits: u32) -> Option<String> {
    (bits > 0).then(|| format!("width {bits} bits"))
}

fn member_detail(member: FuncMember) -> Option<String> {
    match member {
        FuncMember::Unspecified => None,
        FuncMember::Member => Some("member".to_string()),
        FuncMember::NonMember => Some("non-member".to_string()),
    }
}

/// Pretty-printed JSON array of the trees rooted at `roots`.
pub fn to_json(ast: &Ast, roots: &[AstId]) -> Result<String, serde_json::Error> {
    let dumps: Vec<NodeDump> = roots.iter().map(|&r| dump(ast, r)).collect();
    serde_json::to_string_pretty(&dumps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Lang;
    use crate::parser::Parser;
    use crate::typedefs::TypedefTable;

    fn parsed(source: &str) -> (Ast, Vec<AstId>) {
        let table = TypedefTable::new();
        let mut parser = Parser::new(source, Lang::C_23, &table).unwrap();
        let roots = parser.parse_gibberish_decls().unwrap();
        (parser.into_ast(), roots)
    }

    #[test]
    fn test_dump_pointer_to_array() {
        let (ast, roots) = parsed("int (*p)[3]");
        let node = dump(&ast, roots[0]);
        assert_eq!(node.kind, "pointer");
        assert_eq!(node.name.as_deref(), Some("p"));
        let array = node.child.as_deref().unwrap();
        assert_eq!(array.kind, "array");
        assert_eq!(array.detail.as_deref(), Some("[3]"));
        let int = array.child.as_deref().unwrap();
        assert_eq!(int.ty, "int");
        assert!(int.child.is_none());
    }

    #[test]
    fn test_to_json() {
        let (ast, roots) = parsed("char *f(int x)");
        let json = to_json(&ast, &roots).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["kind"], "function");
        assert_eq!(value[0]["name"], "f");
        assert_eq!(value[0]["params"][0]["name"], "x");
        assert_eq!(value[0]["child"]["kind"], "pointer");
    }
}
