//! Unit tests for top-level extraction.

use rstest::rstest;

use super::*;

fn inspect(source: &str) -> ScriptInventory {
    inspect_source(source).expect("source should parse")
}

fn value_of(inventory: &ScriptInventory, name: &str) -> Option<LiteralValue> {
    inventory
        .variable(name)
        .unwrap_or_else(|| panic!("variable {name} should be recorded"))
        .initial_value()
        .cloned()
}

fn str_value(text: &str) -> LiteralValue {
    LiteralValue::Str(text.to_owned())
}

// ---------------------------------------------------------------------------
// Core properties
// ---------------------------------------------------------------------------

#[test]
fn literal_assignments_are_described() {
    let inventory = inspect("x = 1\ny = \"a\"\nz = [1, 2]\n");

    assert_eq!(inventory.variables().len(), 3);
    assert!(inventory.functions().is_empty());

    let x = inventory.variable("x").expect("x");
    assert_eq!(x.type_tag(), TypeTag::Int);
    assert_eq!(x.initial_value(), Some(&LiteralValue::Int(1)));

    let y = inventory.variable("y").expect("y");
    assert_eq!(y.type_tag(), TypeTag::Str);
    assert_eq!(y.initial_value(), Some(&str_value("a")));

    let z = inventory.variable("z").expect("z");
    assert_eq!(z.type_tag(), TypeTag::List);
    assert_eq!(
        z.initial_value(),
        Some(&LiteralValue::List(vec![
            LiteralValue::Int(1),
            LiteralValue::Int(2)
        ]))
    );
}

#[test]
fn function_definitions_are_collected() {
    let inventory = inspect("def f():\n    pass\n");

    assert!(inventory.variables().is_empty());
    assert_eq!(
        inventory.functions().iter().collect::<Vec<_>>(),
        vec!["f"]
    );
}

#[rstest]
#[case("x = 1; x = 2\n")]
#[case("x = 1\nx = 2\n")]
#[case("x = 'first'\nx = 2\n")]
fn last_assignment_wins(#[case] source: &str) {
    let inventory = inspect(source);
    assert_eq!(inventory.variables().len(), 1);
    let x = inventory.variable("x").expect("x");
    assert_eq!(x.type_tag(), TypeTag::Int);
    assert_eq!(x.initial_value(), Some(&LiteralValue::Int(2)));
}

#[rstest]
#[case("def broken(")]
#[case("x = [1, 2\n")]
#[case("x = = 1\n")]
#[case("x = 1\nclass :\n")]
#[case("print \"hello\"\n")]
#[case("exec \"x = 1\"\n")]
#[case("name = input()\nprint name\n")]
fn unparseable_source_is_a_syntax_error(#[case] source: &str) {
    let err = inspect_source(source).expect_err("should not parse");
    assert!(err.is_syntax_error(), "expected syntax error, got {err:?}");
}

#[test]
fn syntax_error_reports_position() {
    let err = inspect_source("a = 1\nb = (2\n").expect_err("should not parse");
    let InspectError::SyntaxError { line, column, .. } = err else {
        panic!("expected syntax error, got {err:?}");
    };
    assert!(line >= 2, "line {line} should point at the open paren or later");
    assert!(column >= 1);
}

// ---------------------------------------------------------------------------
// Value recovery
// ---------------------------------------------------------------------------

#[rstest]
#[case("v = 3.25", TypeTag::Float, Some(LiteralValue::Float(3.25)))]
#[case("v = -7", TypeTag::Int, Some(LiteralValue::Int(-7)))]
#[case("v = -0.5", TypeTag::Float, Some(LiteralValue::Float(-0.5)))]
#[case("v = +4", TypeTag::Int, Some(LiteralValue::Int(4)))]
#[case("v = True", TypeTag::Int, Some(LiteralValue::Bool(true)))]
#[case("v = False", TypeTag::Int, Some(LiteralValue::Bool(false)))]
#[case("v = None", TypeTag::Unknown, Some(LiteralValue::None))]
#[case("v = (5)", TypeTag::Int, Some(LiteralValue::Int(5)))]
#[case("v = 'a' 'b'", TypeTag::Str, Some(str_value("ab")))]
#[case("v = '''multi\nline'''", TypeTag::Str, Some(str_value("multi\nline")))]
#[case("v = input()", TypeTag::Unknown, None)]
#[case("v = 1 + 2", TypeTag::Unknown, None)]
#[case("v = f'{1}'", TypeTag::Unknown, None)]
#[case("v = b'raw'", TypeTag::Unknown, None)]
#[case("v = (1, 2)", TypeTag::Unknown, None)]
#[case("v = 1, 2", TypeTag::Unknown, None)]
#[case("v = [i for i in range(3)]", TypeTag::Unknown, None)]
#[case("v = -x", TypeTag::Unknown, None)]
#[case("v = undefined_name", TypeTag::Str, Some(str_value("undefined_name")))]
#[case("v = lambda: 1", TypeTag::Unknown, None)]
fn right_hand_sides(
    #[case] source: &str,
    #[case] expected_tag: TypeTag,
    #[case] expected_value: Option<LiteralValue>,
) {
    let inventory = inspect(source);
    let v = inventory.variable("v").expect("v recorded");
    assert_eq!(v.type_tag(), expected_tag, "tag for {source}");
    assert_eq!(v.initial_value(), expected_value.as_ref(), "value for {source}");
}

#[test]
fn list_elements_that_are_not_literals_become_none() {
    let inventory = inspect("items = [1, len('x'), 'two', [3]]\n");
    assert_eq!(
        value_of(&inventory, "items"),
        Some(LiteralValue::List(vec![
            LiteralValue::Int(1),
            LiteralValue::None,
            str_value("two"),
            LiteralValue::List(vec![LiteralValue::Int(3)]),
        ]))
    );
}

#[test]
fn list_with_comments_ignores_comments() {
    let inventory = inspect("items = [\n    1,  # first\n    2,\n]\n");
    assert_eq!(
        value_of(&inventory, "items"),
        Some(LiteralValue::List(vec![
            LiteralValue::Int(1),
            LiteralValue::Int(2)
        ]))
    );
}

#[test]
fn splatted_collections_are_unknown() {
    let inventory = inspect("a = [*other]\nb = {**other}\n");
    assert_eq!(inventory.variable("a").map(VariableDescriptor::type_tag), Some(TypeTag::Unknown));
    assert_eq!(inventory.variable("b").map(VariableDescriptor::type_tag), Some(TypeTag::Unknown));
}

#[test]
fn dict_literals_are_described() {
    let inventory = inspect("config = {'name': 'bob', 'age': 3, 1: [True]}\n");
    let config = inventory.variable("config").expect("config");
    assert_eq!(config.type_tag(), TypeTag::Dict);

    let value = config.initial_value().expect("dict value");
    assert_eq!(value.get("name"), Some(&str_value("bob")));
    assert_eq!(value.get("age"), Some(&LiteralValue::Int(3)));
    assert_eq!(
        value,
        &LiteralValue::Dict(vec![
            (str_value("name"), str_value("bob")),
            (str_value("age"), LiteralValue::Int(3)),
            (
                LiteralValue::Int(1),
                LiteralValue::List(vec![LiteralValue::Bool(true)])
            ),
        ])
    );
}

#[test]
fn empty_collections_are_typed() {
    let inventory = inspect("a = []\nb = {}\n");
    assert_eq!(value_of(&inventory, "a"), Some(LiteralValue::List(vec![])));
    assert_eq!(value_of(&inventory, "b"), Some(LiteralValue::Dict(vec![])));
}

#[test]
fn bare_names_are_reported_by_name() {
    let inventory = inspect("a = 5\nb = a\nc = [a, b]\nd = {'k': a}\n");
    let b = inventory.variable("b").expect("b");
    assert_eq!(b.type_tag(), TypeTag::Str);
    assert_eq!(b.initial_value(), Some(&str_value("a")));
    assert_eq!(
        value_of(&inventory, "c"),
        Some(LiteralValue::List(vec![str_value("a"), str_value("b")]))
    );
    assert_eq!(
        value_of(&inventory, "d"),
        Some(LiteralValue::Dict(vec![(str_value("k"), str_value("a"))]))
    );
}

#[rstest]
#[case("b = a\na = 1\n", "a")]
#[case("reader = input\n", "input")]
#[case("import os\nmodule = os\n", "os")]
fn unbound_names_are_reported_by_name(#[case] source: &str, #[case] name: &str) {
    let inventory = inspect(source);
    let variable = inventory
        .variables()
        .values()
        .find(|descriptor| descriptor.initial_value() == Some(&str_value(name)))
        .unwrap_or_else(|| panic!("no variable holds {name:?}: {inventory:?}"));
    assert_eq!(variable.type_tag(), TypeTag::Str);
}

// ---------------------------------------------------------------------------
// Scope and statement filtering
// ---------------------------------------------------------------------------

#[test]
fn nested_bindings_are_ignored() {
    let source = "\
if True:
    inside_if = 1
for i in range(3):
    inside_loop = 2
class Thing:
    attribute = 3
    def method(self):
        pass
def outer():
    local = 4
    def inner():
        pass
";
    let inventory = inspect(source);
    assert!(
        inventory.variables().is_empty(),
        "unexpected variables: {:?}",
        inventory.variables()
    );
    assert_eq!(
        inventory.functions().iter().collect::<Vec<_>>(),
        vec!["outer"]
    );
}

#[rstest]
#[case("a, b = 1, 2")]
#[case("a = b = 1")]
#[case("obj.attr = 1")]
#[case("items[0] = 1")]
#[case("total: int = 5")]
#[case("total: int")]
#[case("count += 1")]
#[case("[a, b] = [1, 2]")]
fn non_simple_assignments_are_ignored(#[case] source: &str) {
    let inventory = inspect(source);
    assert!(
        inventory.variables().is_empty(),
        "{source} should not record a variable: {:?}",
        inventory.variables()
    );
}

#[test]
fn decorated_and_async_functions_are_collected() {
    let source = "\
import functools

@functools.cache
def cached():
    return 1

async def fetch():
    return 2

@decorator
class NotAFunction:
    pass
";
    let inventory = inspect(source);
    assert!(inventory.has_function("cached"));
    assert!(inventory.has_function("fetch"));
    assert!(!inventory.has_function("NotAFunction"));
    assert_eq!(inventory.functions().len(), 2);
}

#[test]
fn duplicate_function_definitions_appear_once() {
    let inventory = inspect("def f():\n    pass\ndef f():\n    return 1\n");
    assert_eq!(inventory.functions().len(), 1);
    assert!(inventory.has_function("f"));
}

#[test]
fn main_guard_bodies_are_not_collected() {
    let source = "\
def main():
    print(input().upper())

if __name__ == '__main__':
    result = main()
";
    let inventory = inspect(source);
    assert!(inventory.variables().is_empty());
    assert!(inventory.has_function("main"));
}

#[test]
fn empty_source_has_empty_inventory() {
    assert_eq!(inspect(""), ScriptInventory::default());
}

#[test]
fn inventory_serialises_for_the_harness() {
    let inventory = inspect("name = 'ada'\nflag = None\ndef greet():\n    pass\n");
    let json = serde_json::to_value(&inventory).expect("serialise");
    assert_eq!(
        json,
        serde_json::json!({
            "variables": {
                "flag": {"type": "Unknown", "initial_value": null},
                "name": {"type": "Str", "initial_value": "ada"},
            },
            "functions": ["greet"],
        })
    );
}
