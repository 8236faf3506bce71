//! Non-executing inspection of learner-submitted Python scripts.
//!
//! This crate answers two questions about a submission without ever running
//! it:
//!
//! - **What does the script declare?** [`inspect_script`] parses the source
//!   with Tree-sitter and reports top-level variable bindings (with a
//!   best-effort literal value and type tag) and top-level function names.
//! - **Does the source match a policy?** [`ContentPolicy`] and
//!   [`scan_script`] search the raw text for a regular expression, for gates
//!   such as "must call `input`" or "must not import `os`".
//!
//! Only parsing and tree traversal take place. No statement of the submitted
//! script is evaluated, imported, or compiled to bytecode, so inspection is
//! safe to perform before the script has been placed under a demoted
//! identity.
//!
//! # Example
//!
//! ```
//! use proctor_inspect::{LiteralValue, TypeTag, inspect_source};
//!
//! let inventory = inspect_source("greeting = 'hello'\ndef main():\n    pass\n")?;
//!
//! let greeting = inventory.variable("greeting").expect("greeting is bound");
//! assert_eq!(greeting.type_tag(), TypeTag::Str);
//! assert_eq!(
//!     greeting.initial_value(),
//!     Some(&LiteralValue::Str("hello".into()))
//! );
//! assert!(inventory.has_function("main"));
//! # Ok::<(), proctor_inspect::InspectError>(())
//! ```

mod error;
mod extractor;
mod literal;
mod parser;
mod policy;
mod script;

pub use error::InspectError;
pub use extractor::{ScriptInventory, VariableDescriptor, inspect_script, inspect_source};
pub use literal::{LiteralValue, TypeTag};
pub use parser::{PythonModule, PythonParser, SyntaxProblem};
pub use policy::{ContentPolicy, scan_script};
pub use script::{InvalidScriptPath, SCRIPT_EXTENSION, ScriptPath};

#[cfg(test)]
mod tests;
