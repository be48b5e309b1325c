//! Property-based tests for import editing.
//!
//! - Idempotence: a second ensure of the same binding changes nothing
//!   and the binding is visible once added
//! - Inverse: removing a freshly ensured named import restores the file

use esedit_core::InMemoryTree;
use esedit_imports::{ImportKind, ImportsEditor};
use proptest::prelude::*;

const PATH: &str = "src/main.js";

fn arb_ident() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[a-z][A-Za-z0-9]{0,6}").unwrap()
}

fn arb_module() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"(\./|@scope/)?[a-z]{1,6}(\.js)?").unwrap()
}

fn arb_kind() -> impl Strategy<Value = ImportKind> {
    prop_oneof![
        Just(ImportKind::Named),
        Just(ImportKind::Default),
        Just(ImportKind::Namespace),
        Just(ImportKind::Full),
    ]
}

fn arb_source() -> impl Strategy<Value = String> {
    prop::collection::vec((arb_ident(), arb_module()), 0..4).prop_map(|imports| {
        let mut src = String::from("// entry point\n");
        for (name, module) in imports {
            src.push_str(&format!("import {{ {name} }} from '{module}';\n"));
        }
        src.push_str("\nmain();\n");
        src
    })
}

proptest! {
    #[test]
    fn ensure_is_idempotent(
        src in arb_source(),
        name in arb_ident(),
        module in arb_module(),
        kind in arb_kind(),
    ) {
        let tree = InMemoryTree::with_files([(PATH, src.as_str())]);
        let mut editor = ImportsEditor::open(&tree, PATH).unwrap();

        let added = editor.ensure(&name, &module, kind);
        let once = editor.content();
        let changed = editor.ensure(&name, &module, kind);

        prop_assert!(!changed);
        prop_assert_eq!(editor.content(), once);
        if added {
            prop_assert!(editor.has(&name, &module, kind));
        }
    }

    #[test]
    fn removing_a_new_named_import_restores_the_file(
        src in arb_source(),
        name in arb_ident(),
        module in arb_module(),
    ) {
        let tree = InMemoryTree::with_files([(PATH, src.as_str())]);
        let mut editor = ImportsEditor::open(&tree, PATH).unwrap();
        prop_assume!(editor.find(&module).is_none());

        prop_assert!(editor.ensure(&name, &module, ImportKind::Named));
        prop_assert!(editor.remove(&name, &module, ImportKind::Named));
        prop_assert_eq!(editor.content(), src);
    }
}
