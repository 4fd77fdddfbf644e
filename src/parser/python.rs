use tree_sitter::{Node, Parser};

use super::ParseError;
use super::model::{ClassInfo, FunctionInfo, ImportInfo, ImportKind};

/// Declaration tree extracted from one Python source file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Structure {
    pub classes: Vec<ClassInfo>,
    pub functions: Vec<FunctionInfo>,
    pub imports: Vec<ImportInfo>,
}

/// Parses Python source and walks the syntax tree into a declaration tree.
///
/// Malformed input fails with [`ParseError::Syntax`]; the caller records it
/// on the file's `error` field and still chunks the raw content.
///
/// Scope policy for class bodies: only function declarations that are
/// direct children of a class body (decorators unwrapped) become methods.
/// Nested classes and functions hidden inside control-flow blocks within a
/// class body are not captured through this path.
pub fn extract_structure(source: &str) -> Result<Structure, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ParseError::Syntax(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::Syntax("parser produced no tree".to_string()))?;

    let root = tree.root_node();
    if root.has_error() {
        let line = find_error_node(root)
            .map(|n| n.start_position().row + 1)
            .unwrap_or(1);
        return Err(ParseError::Syntax(format!("invalid syntax at line {line}")));
    }

    let mut out = Structure::default();
    visit_children(root, source.as_bytes(), &mut out);
    Ok(out)
}

/// Locate the first ERROR or missing node for a useful error position.
fn find_error_node(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_error_node(child) {
            return Some(found);
        }
    }
    Some(node)
}

fn visit_children(node: Node, source: &[u8], out: &mut Structure) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, source, out);
    }
}

/// Enclosing-class resolution is a pure function of traversal position:
/// class bodies are never descended into here, so any function reached by
/// this walk is module-owned by construction.
fn visit(node: Node, source: &[u8], out: &mut Structure) {
    match node.kind() {
        "class_definition" => {
            if let Some(class) = read_class(node, source) {
                out.classes.push(class);
            }
        }
        "function_definition" => {
            if let Some(func) = read_function(node, source) {
                out.functions.push(func);
            }
            // Declarations nested in a function body still land in the
            // module-level lists.
            visit_children(node, source, out);
        }
        "decorated_definition" => {
            if let Some(inner) = node.child_by_field_name("definition") {
                visit(inner, source, out);
            }
        }
        "import_statement" => read_plain_import(node, source, &mut out.imports),
        "import_from_statement" => read_from_import(node, source, &mut out.imports),
        _ => visit_children(node, source, out),
    }
}

fn read_class(node: Node, source: &[u8]) -> Option<ClassInfo> {
    let name = node
        .child_by_field_name("name")?
        .utf8_text(source)
        .ok()?
        .to_string();

    let mut bases = Vec::new();
    if let Some(superclasses) = node.child_by_field_name("superclasses") {
        let mut cursor = superclasses.walk();
        for base in superclasses.named_children(&mut cursor) {
            // Only bases expressible as a simple name; complex base
            // expressions (attributes, calls, keyword arguments) are
            // silently omitted.
            if base.kind() == "identifier" {
                if let Ok(text) = base.utf8_text(source) {
                    bases.push(text.to_string());
                }
            }
        }
    }

    let methods = node
        .child_by_field_name("body")
        .map(|body| collect_methods(body, source))
        .unwrap_or_default();

    Some(ClassInfo {
        name,
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
        bases,
        methods,
    })
}

/// One-level scan of a class body: direct function declarations become
/// methods of the currently open class. Nested classes and control-flow
/// blocks are deliberately not traversed.
fn collect_methods(body: Node, source: &[u8]) -> Vec<FunctionInfo> {
    let mut methods = Vec::new();
    let mut cursor = body.walk();
    for stmt in body.children(&mut cursor) {
        let def = match stmt.kind() {
            "function_definition" => Some(stmt),
            "decorated_definition" => stmt
                .child_by_field_name("definition")
                .filter(|d| d.kind() == "function_definition"),
            _ => None,
        };
        if let Some(def) = def {
            if let Some(func) = read_function(def, source) {
                methods.push(func);
            }
        }
    }
    methods
}

fn read_function(node: Node, source: &[u8]) -> Option<FunctionInfo> {
    let name = node
        .child_by_field_name("name")?
        .utf8_text(source)
        .ok()?
        .to_string();

    let parameters = node
        .child_by_field_name("parameters")
        .map(|params| read_parameters(params, source))
        .unwrap_or_default();

    Some(FunctionInfo {
        name,
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
        parameters,
    })
}

/// Parameters are recorded by bare name only: type annotations, default
/// values, and variadic markers are stripped. Bare `*` and `/` separators
/// carry no name and yield nothing.
fn read_parameters(node: Node, source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = node.walk();
    for param in node.named_children(&mut cursor) {
        match param.kind() {
            "identifier" => {
                if let Ok(text) = param.utf8_text(source) {
                    names.push(text.to_string());
                }
            }
            "typed_parameter"
            | "default_parameter"
            | "typed_default_parameter"
            | "list_splat_pattern"
            | "dictionary_splat_pattern" => {
                if let Some(name) = parameter_name(param, source) {
                    names.push(name);
                }
            }
            _ => {}
        }
    }
    names
}

fn parameter_name(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() == "identifier" {
        return node.utf8_text(source).ok().map(str::to_string);
    }
    if let Some(name) = node.child_by_field_name("name") {
        if name.kind() == "identifier" {
            return name.utf8_text(source).ok().map(str::to_string);
        }
    }
    // The name is the first identifier in declaration order, possibly one
    // level down (e.g. a splat inside a typed parameter).
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "type" {
            continue;
        }
        if let Some(name) = parameter_name(child, source) {
            return Some(name);
        }
    }
    None
}

/// `import a, b as c` — one entry per imported module name.
fn read_plain_import(node: Node, source: &[u8], out: &mut Vec<ImportInfo>) {
    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        match name.kind() {
            "dotted_name" => {
                if let Ok(text) = name.utf8_text(source) {
                    out.push(ImportInfo {
                        kind: ImportKind::Plain,
                        module: None,
                        name: text.to_string(),
                        alias: None,
                    });
                }
            }
            "aliased_import" => {
                if let Some(import) = read_aliased(name, source, ImportKind::Plain, None) {
                    out.push(import);
                }
            }
            _ => {}
        }
    }
}

/// `from pkg.mod import a, b as c` — one entry per imported name, all
/// carrying the dotted source module.
fn read_from_import(node: Node, source: &[u8], out: &mut Vec<ImportInfo>) {
    let module = node
        .child_by_field_name("module_name")
        .and_then(|m| m.utf8_text(source).ok())
        .unwrap_or("")
        .to_string();

    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        match name.kind() {
            "dotted_name" => {
                if let Ok(text) = name.utf8_text(source) {
                    out.push(ImportInfo {
                        kind: ImportKind::From,
                        module: Some(module.clone()),
                        name: text.to_string(),
                        alias: None,
                    });
                }
            }
            "aliased_import" => {
                if let Some(import) =
                    read_aliased(name, source, ImportKind::From, Some(module.clone()))
                {
                    out.push(import);
                }
            }
            _ => {}
        }
    }

    // `from pkg import *`
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "wildcard_import" {
            out.push(ImportInfo {
                kind: ImportKind::From,
                module: Some(module.clone()),
                name: "*".to_string(),
                alias: None,
            });
        }
    }
}

fn read_aliased(
    node: Node,
    source: &[u8],
    kind: ImportKind,
    module: Option<String>,
) -> Option<ImportInfo> {
    let name = node
        .child_by_field_name("name")?
        .utf8_text(source)
        .ok()?
        .to_string();
    let alias = node
        .child_by_field_name("alias")
        .and_then(|a| a.utf8_text(source).ok())
        .map(str::to_string);
    Some(ImportInfo {
        kind,
        module,
        name,
        alias,
    })
}
