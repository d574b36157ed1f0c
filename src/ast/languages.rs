//! Per-language tree-sitter wiring: which grammar to load, which node kinds are
//! call sites, and which node kinds bound the "enclosing function" search.

use tree_sitter::Language;

/// One entry per grammar linked into the binary. The extractor in [`super`] is
/// generic over this; adding a language means adding a variant here, not a new
/// traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageId {
    JavaScript,
    TypeScript,
    Tsx,
    Python,
    Go,
    Rust,
    Java,
    C,
    Cpp,
}

pub struct LanguageSpec {
    pub id: LanguageId,
    pub name: &'static str,
    pub rule_language: &'static str,
    pub call_kinds: &'static [&'static str],
    pub function_kinds: &'static [&'static str],
    pub string_kinds: &'static [&'static str],
}

impl LanguageSpec {
    pub fn grammar(&self) -> Language {
        match self.id {
            LanguageId::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            LanguageId::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            LanguageId::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            LanguageId::Python => tree_sitter_python::LANGUAGE.into(),
            LanguageId::Go => tree_sitter_go::LANGUAGE.into(),
            LanguageId::Rust => tree_sitter_rust::LANGUAGE.into(),
            LanguageId::Java => tree_sitter_java::LANGUAGE.into(),
            LanguageId::C => tree_sitter_c::LANGUAGE.into(),
            LanguageId::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        }
    }
}

pub const JAVASCRIPT: LanguageSpec = LanguageSpec {
    id: LanguageId::JavaScript,
    name: "javascript",
    rule_language: "node",
    call_kinds: &["call_expression"],
    function_kinds: &[
        "function_declaration",
        "function_expression",
        "arrow_function",
        "method_definition",
    ],
    string_kinds: &["string", "template_string"],
};

pub const TYPESCRIPT: LanguageSpec = LanguageSpec {
    id: LanguageId::TypeScript,
    name: "typescript",
    rule_language: "node",
    call_kinds: &["call_expression"],
    function_kinds: &[
        "function_declaration",
        "function_expression",
        "arrow_function",
        "method_definition",
        "method_signature",
    ],
    string_kinds: &["string", "template_string"],
};

pub const TSX: LanguageSpec = LanguageSpec {
    id: LanguageId::Tsx,
    name: "tsx",
    rule_language: "node",
    call_kinds: &["call_expression"],
    function_kinds: &[
        "function_declaration",
        "function_expression",
        "arrow_function",
        "method_definition",
    ],
    string_kinds: &["string", "template_string"],
};

pub const PYTHON: LanguageSpec = LanguageSpec {
    id: LanguageId::Python,
    name: "python",
    rule_language: "python",
    call_kinds: &["call"],
    function_kinds: &["function_definition"],
    string_kinds: &["string"],
};

pub const GO: LanguageSpec = LanguageSpec {
    id: LanguageId::Go,
    name: "go",
    rule_language: "go",
    call_kinds: &["call_expression"],
    function_kinds: &["function_declaration", "method_declaration", "func_literal"],
    string_kinds: &["interpreted_string_literal", "raw_string_literal"],
};

pub const RUST: LanguageSpec = LanguageSpec {
    id: LanguageId::Rust,
    name: "rust",
    rule_language: "rust",
    call_kinds: &["call_expression"],
    function_kinds: &["function_item", "closure_expression"],
    string_kinds: &["string_literal", "raw_string_literal"],
};

pub const JAVA: LanguageSpec = LanguageSpec {
    id: LanguageId::Java,
    name: "java",
    rule_language: "java",
    call_kinds: &["method_invocation"],
    function_kinds: &["method_declaration", "constructor_declaration"],
    string_kinds: &["string_literal"],
};

pub const C: LanguageSpec = LanguageSpec {
    id: LanguageId::C,
    name: "c",
    rule_language: "c",
    call_kinds: &["call_expression"],
    function_kinds: &["function_definition"],
    string_kinds: &["string_literal"],
};

pub const CPP: LanguageSpec = LanguageSpec {
    id: LanguageId::Cpp,
    name: "cpp",
    rule_language: "cpp",
    call_kinds: &["call_expression"],
    function_kinds: &["function_definition"],
    string_kinds: &["string_literal"],
};
