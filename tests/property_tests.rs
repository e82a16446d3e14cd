//! Property tests for tree selection

mod common;

use common::{sorted, TestTree};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn file_names() -> impl Strategy<Value = BTreeSet<String>> {
    // Directory components carry no extension, so a name never serves as
    // both a file and a directory.
    prop::collection::btree_set("[a-c]{1,2}(/[a-c]{1,2}){0,2}\\.(txt|log)", 1..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_without_rule_files_everything_is_selected(files in file_names()) {
        let tree = TestTree::new().unwrap();
        for file in &files {
            tree.file(file);
        }

        let expected: Vec<String> = files.iter().cloned().collect();
        prop_assert_eq!(sorted(tree.select()), expected);
    }

    #[test]
    fn prop_selection_is_idempotent(files in file_names(), rules in prop::collection::vec("!?[a-c*]{1,2}(\\.log)?/?", 0..5)) {
        let tree = TestTree::new().unwrap();
        for file in &files {
            tree.file(file);
        }
        let lines: Vec<&str> = rules.iter().map(String::as_str).collect();
        tree.rules("", &lines);

        prop_assert_eq!(tree.select(), tree.select());
    }

    #[test]
    fn prop_extension_rule_removes_exactly_matching_files(files in file_names()) {
        let tree = TestTree::new().unwrap();
        for file in &files {
            tree.file(file);
        }
        tree.rules("", &["*.log"]);

        let mut expected: Vec<String> = files
            .iter()
            .filter(|f| !f.ends_with(".log"))
            .cloned()
            .collect();
        expected.push(".7zignore".to_string());

        prop_assert_eq!(sorted(tree.select()), sorted(expected));
    }

    #[test]
    fn prop_selected_paths_exist_under_root(files in file_names(), rules in prop::collection::vec("!?[a-c*]{1,2}(\\.txt)?", 0..4)) {
        let tree = TestTree::new().unwrap();
        for file in &files {
            tree.file(file);
        }
        let lines: Vec<&str> = rules.iter().map(String::as_str).collect();
        tree.rules("", &lines);

        for path in tree.select() {
            prop_assert!(tree.path().join(&path).is_file(), "{} is not a file", path);
        }
    }
}
