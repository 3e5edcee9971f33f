// tests/pattern_properties.rs

use proptest::prelude::*;

use filemirror::watch::filter::{is_dot_file, MappingRules};
use filemirror::watch::patterns::{matches, shell_glob_match};

proptest! {
    // Without a `/` the structural matcher degenerates to a plain glob.
    #[test]
    fn single_segment_patterns_are_plain_globs(
        pattern in "[a-c*.?]{1,6}",
        path in "[a-c./]{0,12}",
    ) {
        prop_assert_eq!(matches(&pattern, &path), shell_glob_match(&pattern, &path));
    }

    #[test]
    fn dot_files_are_never_synced(
        dirs in proptest::collection::vec("[a-z]{1,5}", 0..4),
        name in "[a-z]{0,6}(\\.[a-z]{1,3})?",
        include in prop_oneof![
            Just(String::new()),
            Just("**/*.*".to_string()),
            Just("*".to_string()),
            Just("**/*".to_string()),
        ],
    ) {
        let mut path = dirs.join("/");
        if !path.is_empty() {
            path.push('/');
        }
        path.push('.');
        path.push_str(&name);

        prop_assert!(is_dot_file(&path));
        let rules = MappingRules::new(&include, "", &[]).unwrap();
        prop_assert!(!rules.should_sync(&path));
    }
}
