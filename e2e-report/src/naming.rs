// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derives canonical test identities from the suite hierarchy.
//!
//! The two outermost levels of the hierarchy (the implicit root and the
//! environment) and the file level are structural. They are stripped from the
//! qualified name, while describe blocks below them are kept outermost first.

use crate::suite::{Suite, TestCase};

/// A suite only includes its parent's name if it has at least this many
/// ancestors, i.e. if its parent is itself below the file level.
const NAMED_ANCESTRY: usize = 4;

/// Returns the qualified name of a test: its suite name followed by its
/// title, or the bare title if the test has no parent suite.
pub fn full_test_name(test: &TestCase) -> String {
    match test.parent() {
        Some(parent) => format!("{} {}", full_suite_name(parent), test.title),
        None => test.title.clone(),
    }
}

/// Returns the space-separated titles of `suite` and those of its ancestors
/// that sit below the file level, outermost first.
pub fn full_suite_name(suite: Suite<'_>) -> String {
    let mut titles = vec![suite.title()];
    let mut current = suite;
    while current.depth() >= NAMED_ANCESTRY {
        let Some(parent) = current.parent() else {
            break;
        };
        titles.push(parent.title());
        current = parent;
    }

    titles.reverse();
    titles.join(" ")
}

/// Returns the title of the environment suite, the second level from the
/// root, that `suite` belongs to.
///
/// If `suite` is the root or the environment level itself, its own title is
/// returned.
pub fn environment(suite: Suite<'_>) -> &str {
    let mut current = suite;
    while let Some(parent) = current.parent() {
        if parent.parent().is_none() {
            break;
        }
        current = parent;
    }
    current.title()
}

/// Returns the environment of a test, or an empty string if it has no parent
/// suite.
pub fn test_environment(test: &TestCase) -> &str {
    test.parent().map_or("", environment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::SuitePath;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn test_at(titles: &[&str], title: &str) -> TestCase {
        let path = SuitePath::new(titles.iter().copied()).expect("path is shallow");
        TestCase::new("id", title, path)
    }

    #[test]
    fn product_master_page() {
        let test = test_at(
            &["", "Desktop Chrome", "app.spec", "Product master page"],
            "should display title",
        );
        assert_eq!(
            full_test_name(&test),
            "Product master page should display title"
        );
        assert_eq!(test_environment(&test), "Desktop Chrome");
    }

    #[test_case(&[], "orphan" ; "no parent")]
    #[test_case(&[""], " orphan" ; "root only")]
    #[test_case(&["", "Desktop Chrome"], "Desktop Chrome orphan" ; "environment level")]
    #[test_case(&["", "Desktop Chrome", "app.spec"], "app.spec orphan" ; "file level")]
    #[test_case(
        &["", "Desktop Chrome", "app.spec", "outer"],
        "outer orphan" ;
        "one describe"
    )]
    #[test_case(
        &["", "Desktop Chrome", "app.spec", "outer", "middle", "inner"],
        "outer middle inner orphan" ;
        "nested describes"
    )]
    fn full_test_name_by_depth(titles: &[&str], expected: &str) {
        assert_eq!(full_test_name(&test_at(titles, "orphan")), expected);
    }

    #[test_case(&[], "" ; "no parent")]
    #[test_case(&[""], "" ; "root only")]
    #[test_case(&["", "Mobile Safari"], "Mobile Safari" ; "environment level")]
    #[test_case(&["", "Mobile Safari", "app.spec"], "Mobile Safari" ; "file level")]
    #[test_case(
        &["", "Mobile Safari", "app.spec", "outer", "middle", "inner"],
        "Mobile Safari" ;
        "nested describes"
    )]
    fn environment_by_depth(titles: &[&str], expected: &str) {
        assert_eq!(test_environment(&test_at(titles, "t")), expected);
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let mut titles = vec!["", "Desktop Firefox", "deep.spec"];
        titles.extend(std::iter::repeat_n("d", crate::suite::MAX_SUITE_DEPTH - 3));
        let test = test_at(&titles, "leaf");

        let name = full_test_name(&test);
        assert!(name.starts_with("d d "));
        assert!(name.ends_with(" leaf"));
        assert_eq!(name.split(' ').count(), crate::suite::MAX_SUITE_DEPTH - 3 + 1);
        assert_eq!(test_environment(&test), "Desktop Firefox");
    }
}
