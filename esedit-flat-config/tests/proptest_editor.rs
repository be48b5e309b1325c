//! Property-based tests for flat config editing.
//!
//! - Idempotence: ensuring a rule twice leaves the same rules as ensuring it once
//! - Order independence: upserts match entries by pattern set, not pattern order
//! - Locality: adding a rule leaves opaque sibling values byte-for-byte intact

use esedit_core::InMemoryTree;
use esedit_flat_config::{FlatConfigEditor, Mapping, PropertyValue};
use proptest::prelude::*;

const PATH: &str = "eslint.config.mjs";

fn arb_rule_name() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[a-z][a-z-]{0,8}(/[a-z-]{1,8})?").unwrap()
}

fn arb_rule_value() -> impl Strategy<Value = PropertyValue> {
    prop_oneof![
        Just(PropertyValue::from("error")),
        Just(PropertyValue::from("off")),
        (0i32..3).prop_map(PropertyValue::from),
        (1i32..200).prop_map(|max| {
            let mut options = Mapping::new();
            options.insert("max", max);
            PropertyValue::Sequence(vec!["warn".into(), options.into()])
        }),
        Just(PropertyValue::Opaque("sharedOptions()".to_string())),
    ]
}

fn arb_patterns() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::string::string_regex(r"(src|test|lib)/\*\*/\*\.(js|ts)").unwrap(),
        1..4,
    )
    .prop_map(|mut patterns| {
        patterns.sort();
        patterns.dedup();
        patterns
    })
}

fn arb_config() -> impl Strategy<Value = String> {
    prop::collection::vec((arb_rule_name(), arb_rule_value()), 0..4).prop_map(|rules| {
        let body: Vec<String> = rules
            .iter()
            .map(|(name, value)| format!("      '{}': {},\n", name, esedit_value::encode(value)))
            .collect();
        format!(
            "import js from '@eslint/js';\n\nexport default [\n  js.configs.recommended,\n  {{\n    files: ['src/**/*.js'],\n    rules: {{\n{}    }},\n  }},\n];\n",
            body.concat()
        )
    })
}

proptest! {
    #[test]
    fn ensure_rule_is_idempotent(
        src in arb_config(),
        patterns in arb_patterns(),
        name in arb_rule_name(),
        value in arb_rule_value(),
    ) {
        let once_tree = InMemoryTree::with_files([(PATH, src.as_str())]);
        let mut once = FlatConfigEditor::open(&once_tree, PATH).unwrap();
        once.ensure_rule(&patterns, &name, value.clone());

        let twice_tree = InMemoryTree::with_files([(PATH, src.as_str())]);
        let mut twice = FlatConfigEditor::open(&twice_tree, PATH).unwrap();
        twice.ensure_rule(&patterns, &name, value.clone());
        let changed = twice.ensure_rule(&patterns, &name, value.clone());

        prop_assert!(!changed);
        prop_assert_eq!(once.rules(&patterns), twice.rules(&patterns));
        prop_assert_eq!(once.content(), twice.content());
        prop_assert_eq!(twice.get_rule(&patterns, &name), Some(value));
    }

    #[test]
    fn upsert_ignores_pattern_order(
        patterns in arb_patterns(),
        first in arb_rule_value(),
        second in arb_rule_value(),
    ) {
        let tree = InMemoryTree::with_files([(PATH, "export default [];\n")]);
        let mut editor = FlatConfigEditor::open(&tree, PATH).unwrap();

        let mut reversed = patterns.clone();
        reversed.reverse();
        for (files, value) in [(&patterns, first), (&reversed, second.clone())] {
            let mut config = Mapping::new();
            config.insert("files", PropertyValue::strings(files.iter().cloned()));
            config.insert("rules", [("x", value)].into_iter().collect::<Mapping>());
            editor.upsert(&config);
        }

        prop_assert_eq!(editor.configs().len(), 1);
        prop_assert_eq!(editor.get_rule(&reversed, "x"), Some(second));
        let files = editor.configs()[0].files();
        prop_assert_eq!(files, Some(patterns));
    }

    #[test]
    fn unrelated_rule_edits_keep_opaque_text(
        name in arb_rule_name(),
        value in arb_rule_value(),
    ) {
        let opaque = "makeRule({ strict: true, level: LEVELS[2] })";
        let src = format!(
            "export default [\n  {{\n    files: ['src/**/*.js'],\n    rules: {{\n      'custom/rule': {opaque},\n    }},\n  }},\n];\n"
        );
        let tree = InMemoryTree::with_files([(PATH, src.as_str())]);
        let mut editor = FlatConfigEditor::open(&tree, PATH).unwrap();
        prop_assume!(name != "custom/rule");

        editor.add_rule(&["src/**/*.js"], &name, value);

        prop_assert_eq!(
            editor.get_rule(&["src/**/*.js"], "custom/rule"),
            Some(PropertyValue::Opaque(opaque.to_string()))
        );
        let expected = format!("      'custom/rule': {opaque},\n");
        prop_assert!(editor.content().contains(&expected));
    }
}
