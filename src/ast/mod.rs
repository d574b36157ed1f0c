//! Tree-sitter-backed call-site extraction, generalized across every linked grammar.
//!
//! One explicit-stack DFS walks the whole tree once; for every node whose kind
//! matches a [`LanguageSpec`]'s `call_kinds`, the callee and argument text are
//! pulled out and the nearest enclosing function is found by walking parents.
//! This mirrors the Dart provider's traversal, generalized so adding a
//! language means adding a `LanguageSpec`, not a new walk.

pub mod languages;

use crate::errors::{Error, Result};
use crate::model::CallSite;
use languages::LanguageSpec;
use tree_sitter::{Node, Parser, Tree};

fn parse(source: &str, spec: &LanguageSpec) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&spec.grammar())
        .map_err(|_| Error::TreeSitterLanguage(spec.name))?;
    parser.parse(source, None).ok_or(Error::TreeSitterParse(spec.name))
}

/// Parse `source` with `spec`'s grammar and return every call site found.
pub fn extract_call_sites(source: &str, spec: &LanguageSpec) -> Result<Vec<CallSite>> {
    let tree = parse(source, spec)?;
    let root = tree.root_node();
    let bytes = source.as_bytes();

    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let mut walker = node.walk();
        let children: Vec<_> = node.children(&mut walker).collect();
        for child in children.into_iter().rev() {
            stack.push(child);
        }

        if spec.call_kinds.contains(&node.kind()) {
            if let Some(callee) = callee_text(node, bytes, spec) {
                let args = argument_texts(node, bytes, spec);
                let start = node.start_position();
                let snippet = first_line(node.utf8_text(bytes).unwrap_or_default(), 240);
                out.push(CallSite {
                    callee,
                    args,
                    line: start.row + 1,
                    column: start.column + 1,
                    snippet,
                    function_context: enclosing_function_name(node, bytes, spec),
                });
            }
        }
    }
    Ok(out)
}

/// The callee text for a call node. Most grammars expose a `function` field
/// whose text already includes any dotted/scoped prefix (`crypto.createHash`,
/// `aes.NewCipher`, `Sha256::digest`); Java's `method_invocation` has no such
/// field and is assembled from its `object` and `name` fields instead.
fn callee_text(node: Node, source: &[u8], spec: &LanguageSpec) -> Option<String> {
    if node.kind() == "method_invocation" {
        let name = node.child_by_field_name("name")?.utf8_text(source).ok()?;
        return match node.child_by_field_name("object") {
            Some(obj) => {
                let obj_text = obj.utf8_text(source).ok()?;
                Some(format!("{obj_text}.{name}"))
            }
            None => Some(name.to_string()),
        };
    }
    let _ = spec;
    node.child_by_field_name("function")?
        .utf8_text(source)
        .ok()
        .map(str::to_string)
}

/// Positional argument text, with string-literal quoting stripped so a rule's
/// `arg_indexes` can read e.g. `"sha256"` as `sha256`.
fn argument_texts(node: Node, source: &[u8], spec: &LanguageSpec) -> Vec<String> {
    let Some(args_node) = node.child_by_field_name("arguments") else {
        return Vec::new();
    };
    let mut walker = args_node.walk();
    args_node
        .named_children(&mut walker)
        .map(|arg| argument_text(arg, source, spec))
        .collect()
}

fn argument_text(node: Node, source: &[u8], spec: &LanguageSpec) -> String {
    let raw = node.utf8_text(source).unwrap_or_default();
    if spec.string_kinds.contains(&node.kind()) {
        unquote(raw)
    } else {
        raw.to_string()
    }
}

fn unquote(raw: &str) -> String {
    let trimmed = raw.trim();
    for quote in ['"', '\'', '`'] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].to_string();
        }
    }
    trimmed.to_string()
}

/// Walks parents from `node` until a node kind in `spec.function_kinds` is
/// found, then reads its name (by field first, falling back to the first
/// identifier child — the same fallback the Dart extractor uses).
fn enclosing_function_name(node: Node, source: &[u8], spec: &LanguageSpec) -> Option<String> {
    let mut current = node.parent();
    while let Some(n) = current {
        if spec.function_kinds.contains(&n.kind()) {
            return function_name(n, source);
        }
        current = n.parent();
    }
    None
}

fn function_name(node: Node, source: &[u8]) -> Option<String> {
    if let Some(name_node) = node.child_by_field_name("name") {
        if let Ok(text) = name_node.utf8_text(source) {
            return Some(text.to_string());
        }
    }
    let mut walker = node.walk();
    for child in node.children(&mut walker) {
        if matches!(child.kind(), "identifier" | "field_identifier" | "type_identifier") {
            if let Ok(text) = child.utf8_text(source) {
                return Some(text.to_string());
            }
        }
    }
    None
}

fn first_line(s: &str, max_chars: usize) -> String {
    let mut out = String::new();
    for ch in s.chars() {
        if ch == '\n' {
            break;
        }
        out.push(ch);
        if out.len() >= max_chars {
            break;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use languages::{GO, JAVA, JAVASCRIPT, PYTHON};

    #[test]
    fn javascript_call_site_and_string_argument() {
        let source = "function encrypt(key) {\n  return crypto.createCipheriv('aes-256-gcm', key, iv);\n}\n";
        let sites = extract_call_sites(source, &JAVASCRIPT).unwrap();
        let call = sites
            .iter()
            .find(|c| c.callee == "crypto.createCipheriv")
            .expect("call site found");
        assert_eq!(call.args[0], "aes-256-gcm");
        assert_eq!(call.function_context.as_deref(), Some("encrypt"));
    }

    #[test]
    fn python_call_site_keyword_and_positional_args() {
        let source = "def make():\n    return hashlib.new('sha256')\n";
        let sites = extract_call_sites(source, &PYTHON).unwrap();
        let call = sites.iter().find(|c| c.callee == "hashlib.new").unwrap();
        assert_eq!(call.args[0], "sha256");
        assert_eq!(call.function_context.as_deref(), Some("make"));
    }

    #[test]
    fn go_call_site_selector_expression_callee() {
        let source = "package main\nfunc main() {\n  aes.NewCipher(key)\n}\n";
        let sites = extract_call_sites(source, &GO).unwrap();
        assert!(sites.iter().any(|c| c.callee == "aes.NewCipher"));
    }

    #[test]
    fn java_method_invocation_callee_with_object() {
        let source = "class X {\n  void hash() {\n    MessageDigest.getInstance(\"SHA-256\");\n  }\n}\n";
        let sites = extract_call_sites(source, &JAVA).unwrap();
        let call = sites
            .iter()
            .find(|c| c.callee == "MessageDigest.getInstance")
            .unwrap();
        assert_eq!(call.args[0], "SHA-256");
        assert_eq!(call.function_context.as_deref(), Some("hash"));
    }
}
