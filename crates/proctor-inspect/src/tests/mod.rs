//! Crate-level integration and BDD tests.

use crate::{ContentPolicy, inspect_source};


#[test]
fn policy_and_inventory_agree_on_source() {
    let source = "prompt = 'name? '\ndef main():\n    print(input(prompt))\n";
    let inventory = inspect_source(source).expect("inspect");
    let policy = ContentPolicy::new(r"input\(").expect("compile");

    assert!(policy.matches(source));
    assert!(inventory.has_function("main"));
    assert_eq!(inventory.variables().len(), 1);
}
