//! Static variable and function extraction.
//!
//! The extractor walks the statements at the outermost scope of a parsed
//! module and records:
//!
//! - a [`VariableDescriptor`] for each assignment of the form `name = value`
//!   (a single bare-name target, no annotation, no chaining);
//! - the name of each function definition, including `async` and decorated
//!   definitions.
//!
//! Conditionals, loops, class bodies, tuple or attribute targets and every
//! other construct are skipped. Later assignments to the same name replace
//! earlier descriptors, so the inventory reflects source order.

mod values;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Serialize;
use tracing::debug;
use tree_sitter::Node;

use crate::error::InspectError;
use crate::literal::{LiteralValue, TypeTag};
use crate::parser::PythonParser;
use crate::script::ScriptPath;

use self::values::ValueReader;

const EXTRACT_TARGET: &str = "proctor_inspect::extractor";

/// Description of a top-level variable binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDescriptor {
    #[serde(skip)]
    name: String,
    #[serde(rename = "type")]
    type_tag: TypeTag,
    initial_value: Option<LiteralValue>,
}

impl VariableDescriptor {
    /// Creates a descriptor, deriving the type tag from the value.
    #[must_use]
    pub fn new(name: impl Into<String>, initial_value: Option<LiteralValue>) -> Self {
        Self {
            name: name.into(),
            type_tag: TypeTag::of(initial_value.as_ref()),
            initial_value,
        }
    }

    /// Returns the bound name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the inferred type tag.
    #[must_use]
    pub const fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    /// Returns the recovered literal value, if any.
    #[must_use]
    pub const fn initial_value(&self) -> Option<&LiteralValue> {
        self.initial_value.as_ref()
    }
}

/// Everything the extractor found at the top level of a script.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScriptInventory {
    variables: BTreeMap<String, VariableDescriptor>,
    functions: BTreeSet<String>,
}

impl ScriptInventory {
    /// Returns the variable descriptors keyed by name.
    #[must_use]
    pub const fn variables(&self) -> &BTreeMap<String, VariableDescriptor> {
        &self.variables
    }

    /// Returns the set of top-level function names.
    #[must_use]
    pub const fn functions(&self) -> &BTreeSet<String> {
        &self.functions
    }

    /// Looks up a variable by name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&VariableDescriptor> {
        self.variables.get(name)
    }

    /// Returns whether a top-level function with this name exists.
    #[must_use]
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains(name)
    }

    fn record_variable(&mut self, descriptor: VariableDescriptor) {
        drop(self.variables.insert(descriptor.name().to_owned(), descriptor));
    }

    fn record_function(&mut self, name: &str) {
        drop(self.functions.insert(name.to_owned()));
    }
}

/// Reads and inspects the script at `path` without executing it.
///
/// # Errors
///
/// Returns [`InspectError::InvalidInputKind`] if the path does not end in
/// `.py` (checked before the file is opened), [`InspectError::Read`] if it
/// cannot be read, and [`InspectError::SyntaxError`] if it does not parse.
pub fn inspect_script(path: impl AsRef<Path>) -> Result<ScriptInventory, InspectError> {
    let script = ScriptPath::new(path.as_ref())?;
    let source = script.read_source()?;
    debug!(
        target: EXTRACT_TARGET,
        script = %script,
        source_bytes = source.len(),
        "inspecting script"
    );
    inspect_source(&source)
}

/// Inspects Python source text without executing it.
///
/// # Errors
///
/// Returns [`InspectError::SyntaxError`] describing the first problem if the
/// source does not parse, or [`InspectError::ParserInit`] if the grammar
/// cannot be loaded.
pub fn inspect_source(source: &str) -> Result<ScriptInventory, InspectError> {
    let mut parser = PythonParser::new()?;
    let parsed = parser.parse(source)?;
    if let Some(problem) = parsed.first_problem() {
        debug!(
            target: EXTRACT_TARGET,
            line = problem.line,
            column = problem.column,
            "source rejected by parser"
        );
        return Err(problem.into());
    }

    let mut collector = TopLevelCollector::new(parsed.source());
    let root = parsed.root_node();
    let mut cursor = root.walk();
    for statement in root.named_children(&mut cursor) {
        collector.visit(statement);
    }

    let inventory = collector.finish();
    debug!(
        target: EXTRACT_TARGET,
        variables = inventory.variables.len(),
        functions = inventory.functions.len(),
        "inspection complete"
    );
    Ok(inventory)
}

struct TopLevelCollector<'src> {
    source: &'src str,
    inventory: ScriptInventory,
}

impl<'src> TopLevelCollector<'src> {
    const fn new(source: &'src str) -> Self {
        Self {
            source,
            inventory: ScriptInventory {
                variables: BTreeMap::new(),
                functions: BTreeSet::new(),
            },
        }
    }

    fn finish(self) -> ScriptInventory {
        self.inventory
    }

    fn visit(&mut self, statement: Node<'_>) {
        match statement.kind() {
            "expression_statement" => self.visit_expression_statement(statement),
            "function_definition" => self.visit_function(statement),
            "decorated_definition" => {
                if let Some(definition) = statement
                    .child_by_field_name("definition")
                    .filter(|node| node.kind() == "function_definition")
                {
                    self.visit_function(definition);
                }
            }
            _ => {}
        }
    }

    fn visit_expression_statement(&mut self, statement: Node<'_>) {
        let mut cursor = statement.walk();
        let mut children = statement
            .named_children(&mut cursor)
            .filter(|child| !child.is_extra());
        let (Some(assignment), None) = (children.next(), children.next()) else {
            return;
        };
        if assignment.kind() != "assignment" || assignment.child_by_field_name("type").is_some() {
            return;
        }
        let Some(target) = assignment
            .child_by_field_name("left")
            .filter(|node| node.kind() == "identifier")
        else {
            return;
        };
        let Some(value) = assignment
            .child_by_field_name("right")
            .filter(|node| node.kind() != "assignment")
        else {
            return;
        };
        let Some(name) = self.text(target) else {
            return;
        };

        let initial_value = ValueReader::new(self.source).read(value);
        self.inventory.record_variable(VariableDescriptor::new(name, initial_value));
    }

    fn visit_function(&mut self, definition: Node<'_>) {
        if let Some(name) = definition
            .child_by_field_name("name")
            .and_then(|node| self.text(node))
        {
            self.inventory.record_function(name);
        }
    }

    fn text(&self, node: Node<'_>) -> Option<&'src str> {
        self.source.get(node.byte_range())
    }
}

#[cfg(test)]
mod tests;
