//! Tree-sitter parsing of Python modules.
//!
//! Tree-sitter never refuses input: unparseable regions come back as ERROR or
//! MISSING nodes inside an otherwise complete tree. The grammar also accepts
//! the Python 2 `print` and `exec` statements, which Python 3 rejects.
//! [`PythonModule`] locates the earliest of those so inspection can reject a
//! script the interpreter would also reject.

use tree_sitter::{Node, Point};

use crate::error::InspectError;

/// Longest snippet of offending source carried by a [`SyntaxProblem`].
const SNIPPET_CHARS: usize = 50;

/// Parsed source of one Python module.
#[derive(Debug)]
pub struct PythonModule {
    tree: tree_sitter::Tree,
    source: String,
}

impl PythonModule {
    /// The text that was parsed.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The `module` node at the root of the tree.
    #[must_use]
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Earliest syntax problem in document order.
    #[must_use]
    pub fn first_problem(&self) -> Option<SyntaxProblem> {
        earliest_problem(self.tree.root_node())
            .map(|node| SyntaxProblem::describe(node, &self.source))
    }
}

/// Where a module stops being valid Python.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxProblem {
    /// One-based line.
    pub line: u32,
    /// One-based column, counted in bytes.
    pub column: u32,
    /// `invalid syntax`, `missing <token>` for an expected token that never
    /// appeared, or `missing parentheses in call to '<name>'` for a Python 2
    /// statement.
    pub message: String,
    /// Offending source, shortened with `...` past the snippet limit.
    pub context: String,
}

impl SyntaxProblem {
    fn describe(node: Node<'_>, source: &str) -> Self {
        let (line, column) = one_based(node.start_position());
        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else if let Some(keyword) = legacy_keyword(node) {
            format!("missing parentheses in call to '{keyword}'")
        } else {
            String::from("invalid syntax")
        };
        let context = source
            .get(node.byte_range())
            .map(shorten)
            .unwrap_or_default();
        Self {
            line,
            column,
            message,
            context,
        }
    }
}

fn one_based(point: Point) -> (u32, u32) {
    let convert = |zero_based: usize| {
        u32::try_from(zero_based).map_or(u32::MAX, |value| value.saturating_add(1))
    };
    (convert(point.row), convert(point.column))
}

fn shorten(text: &str) -> String {
    if text.chars().nth(SNIPPET_CHARS).is_none() {
        return text.to_owned();
    }
    let mut snippet: String = text.chars().take(SNIPPET_CHARS - 3).collect();
    snippet.push_str("...");
    snippet
}

/// Tree-sitter parser loaded with the Python grammar.
pub struct PythonParser {
    inner: tree_sitter::Parser,
}

impl PythonParser {
    /// Loads the bundled grammar.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::ParserInit`] when the grammar ABI does not
    /// match the linked Tree-sitter runtime.
    pub fn new() -> Result<Self, InspectError> {
        let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&language)
            .map_err(|err| InspectError::parser_init(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Builds a tree for `source`. Nothing is evaluated.
    ///
    /// A tree is returned even for invalid source; consult
    /// [`PythonModule::first_problem`].
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::ParserInit`] if Tree-sitter produces no tree,
    /// which happens only when no language is set.
    pub fn parse(&mut self, source: &str) -> Result<PythonModule, InspectError> {
        let Some(tree) = self.inner.parse(source, None) else {
            return Err(InspectError::parser_init("parser produced no tree"));
        };
        Ok(PythonModule {
            tree,
            source: source.to_owned(),
        })
    }
}

/// Keyword of a Python 2 statement the grammar still parses.
fn legacy_keyword(node: Node<'_>) -> Option<&'static str> {
    match node.kind() {
        "print_statement" => Some("print"),
        "exec_statement" => Some("exec"),
        _ => None,
    }
}

fn earliest_problem(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() || legacy_keyword(node).is_some() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(earliest_problem)
}
