//! Property-based tests for the sanitizer's escape classification.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::sanitize::{is_escaping_path, sanitize_project_source};
    use proptest::prelude::*;

    proptest! {
        /// Property: is_escaping_path is deterministic
        #[test]
        fn is_escaping_is_deterministic(path in ".*") {
            prop_assert_eq!(is_escaping_path(&path), is_escaping_path(&path));
        }

        /// Property: paths starting with a plain name component never escape
        #[test]
        fn plain_relative_paths_never_escape(
            first in "[a-zA-Z0-9_][a-zA-Z0-9_.-]*",
            rest in "(/[a-zA-Z0-9_.-]+){0,4}",
        ) {
            let path = format!("{}{}", first, rest);
            prop_assert!(
                !is_escaping_path(&path),
                "'{}' should not be classified as escaping",
                path
            );
        }

        /// Property: any path prefixed with a parent-directory hop escapes
        #[test]
        fn parent_hop_always_escapes(tail in "[a-zA-Z0-9_./\\\\-]*") {
            let p1 = format!("..{}", tail);
            prop_assert!(is_escaping_path(&p1));
            let p2 = format!("../{}", tail);
            prop_assert!(is_escaping_path(&p2));
            let p3 = format!("..\\{}", tail);
            prop_assert!(is_escaping_path(&p3));
        }

        /// Property: explicit current-directory prefixes escape, both
        /// separator flavors
        #[test]
        fn current_dir_prefix_escapes(tail in "[a-zA-Z0-9_.-]+") {
            let p1 = format!("./{}", tail);
            prop_assert!(is_escaping_path(&p1));
            let p2 = format!(".\\{}", tail);
            prop_assert!(is_escaping_path(&p2));
        }

        /// Property: a descriptor whose references are all plain relative
        /// paths round-trips unchanged
        #[test]
        fn clean_descriptor_roundtrips_unchanged(
            name in "[A-Za-z][A-Za-z0-9]{0,12}",
        ) {
            let descriptor = format!(
                "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <ItemGroup>\n    <ProjectReference Include=\"{0}/{0}.csproj\" />\n  </ItemGroup>\n</Project>\n",
                name
            );
            prop_assert_eq!(sanitize_project_source(&descriptor).unwrap(), None);
        }

        /// Property: a descriptor with one escaping reference always gets
        /// rewritten, and the rewrite still names no escaping reference
        #[test]
        fn escaping_reference_is_always_removed(
            name in "[A-Za-z][A-Za-z0-9]{0,12}",
        ) {
            let descriptor = format!(
                "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <ItemGroup>\n    <ProjectReference Include=\"../{0}/{0}.csproj\" />\n  </ItemGroup>\n</Project>\n",
                name
            );
            let rewritten = sanitize_project_source(&descriptor).unwrap();
            prop_assert!(rewritten.is_some());
            prop_assert!(!rewritten.unwrap().contains("ProjectReference"));
        }
    }
}
