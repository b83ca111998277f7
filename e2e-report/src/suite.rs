// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The test and suite hierarchy reported by the test engine.
//!
//! The engine organizes tests in a tree of suites:
//!
//! ```text
//! root ("")
//! └── environment ("Desktop Chrome")
//!     └── file ("app.spec.ts")
//!         └── describe block ("Product master page")
//!             └── test ("should display title")
//! ```
//!
//! A test only ever needs its own ancestor chain, so a chain is stored as a
//! [`SuitePath`]: the titles of all ancestor suites, root first. A [`Suite`]
//! is a borrowed view of one node on that chain. Walking to a parent shortens
//! the view by one title, so chains are finite and acyclic by construction.

use crate::errors::SuitePathTooDeep;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The maximum number of ancestor suites accepted from external input.
pub const MAX_SUITE_DEPTH: usize = 256;

/// The titles of a test's ancestor suites, ordered from the root down to the
/// test's immediate parent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SuitePath {
    titles: Vec<String>,
}

impl SuitePath {
    /// Creates a new suite path from titles ordered root first.
    ///
    /// Returns an error if the path is deeper than [`MAX_SUITE_DEPTH`].
    pub fn new<I, S>(titles: I) -> Result<Self, SuitePathTooDeep>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let titles: Vec<String> = titles.into_iter().map(Into::into).collect();
        if titles.len() > MAX_SUITE_DEPTH {
            return Err(SuitePathTooDeep::new(titles.len(), MAX_SUITE_DEPTH));
        }
        Ok(Self { titles })
    }

    /// Returns true if the path has no suites, i.e. the test has no parent.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Returns the number of suites on the path.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Returns the innermost suite on the path, if any.
    pub fn leaf(&self) -> Option<Suite<'_>> {
        Suite::from_titles(&self.titles)
    }

    /// Returns the titles on the path, root first.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }
}

impl TryFrom<Vec<String>> for SuitePath {
    type Error = SuitePathTooDeep;

    fn try_from(titles: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(titles)
    }
}

impl From<SuitePath> for Vec<String> {
    fn from(path: SuitePath) -> Self {
        path.titles
    }
}

/// A borrowed view of a single suite and its ancestors.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Suite<'a> {
    // Invariant: never empty. The last element is this suite's title.
    titles: &'a [String],
}

impl<'a> Suite<'a> {
    fn from_titles(titles: &'a [String]) -> Option<Self> {
        (!titles.is_empty()).then_some(Self { titles })
    }

    /// The title of this suite.
    pub fn title(&self) -> &'a str {
        self.titles.last().map_or("", String::as_str)
    }

    /// The enclosing suite, or `None` for the root.
    pub fn parent(&self) -> Option<Suite<'a>> {
        Self::from_titles(&self.titles[..self.titles.len() - 1])
    }

    /// The number of suites above this one. The root has depth 0.
    pub fn depth(&self) -> usize {
        self.titles.len() - 1
    }

    /// Iterates over this suite followed by each of its ancestors, innermost
    /// first.
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors { next: Some(*self) }
    }
}

impl fmt::Debug for Suite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("title", &self.title())
            .field("depth", &self.depth())
            .finish()
    }
}

/// Iterator returned by [`Suite::ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    next: Option<Suite<'a>>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = Suite<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

/// An annotation attached to a test, e.g. `{ type: "Requirement", description: "R-001" }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// The kind of annotation.
    #[serde(rename = "type")]
    pub kind: String,

    /// Free-form text attached to the annotation. Engines may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Annotation {
    /// The annotation kind that maps to a requirement tag.
    pub const REQUIREMENT: &'static str = "Requirement";

    /// Creates a new annotation.
    pub fn new(kind: impl Into<String>, description: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            description,
        }
    }

    /// Returns true if this annotation links the test to a requirement.
    pub fn is_requirement(&self) -> bool {
        self.kind == Self::REQUIREMENT
    }
}

/// A single test as seen by the reporter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Identifier assigned by the engine, stable across runs.
    pub id: String,

    /// The test's own title.
    pub title: String,

    /// Annotations attached to the test, in declaration order.
    #[serde(default)]
    pub annotations: Vec<Annotation>,

    /// The ancestor suites of this test. Empty if the test has no parent.
    #[serde(default)]
    pub suite_path: SuitePath,
}

impl TestCase {
    /// Creates a new test case with no annotations.
    pub fn new(id: impl Into<String>, title: impl Into<String>, suite_path: SuitePath) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            annotations: Vec::new(),
            suite_path,
        }
    }

    /// Adds an annotation to this test case.
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// The suite directly containing this test, if any.
    pub fn parent(&self) -> Option<Suite<'_>> {
        self.suite_path.leaf()
    }
}
