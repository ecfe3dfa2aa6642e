//! Test cases and test suites
//!
//! Both are plain values built by ordinary function calls. A suite owns its
//! cases; the runner only borrows suites.

use crate::check::Checker;
use std::fmt;

/// Executable body of a test case
pub type TestBody = Box<dyn Fn(&mut Checker<'_>)>;

/// A named unit of test logic
pub struct TestCase {
    name: String,
    body: TestBody,
}

impl TestCase {
    pub fn new(name: impl Into<String>, body: impl Fn(&mut Checker<'_>) + 'static) -> Self {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the body to completion
    pub fn run(&self, checker: &mut Checker<'_>) {
        (self.body)(checker)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A named, ordered collection of test cases
#[derive(Debug)]
pub struct TestSuite {
    name: String,
    cases: Vec<TestCase>,
}

impl TestSuite {
    /// Create an empty suite
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// Append a case; cases run in the order they were added
    pub fn with_case(mut self, case: TestCase) -> Self {
        self.cases.push(case);
        self
    }

    pub fn with_cases(mut self, cases: impl IntoIterator<Item = TestCase>) -> Self {
        self.cases.extend(cases);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Look up a case by name
    pub fn case(&self, name: &str) -> Option<&TestCase> {
        self.cases.iter().find(|c| c.name == name)
    }
}

/// Build a [`TestCase`] named after a function: `test_case!(add_positives)`.
/// An explicit name may be given first: `test_case!("AddPositives", add_positives)`.
#[macro_export]
macro_rules! test_case {
    ($body:ident) => {
        $crate::registry::TestCase::new(stringify!($body), $body)
    };
    ($name:expr, $body:expr $(,)?) => {
        $crate::registry::TestCase::new($name, $body)
    };
}

/// Build a [`TestSuite`] from a name and its cases, in order
#[macro_export]
macro_rules! test_suite {
    ($name:expr $(, $case:expr)* $(,)?) => {
        $crate::registry::TestSuite::new($name)$(.with_case($case))*
    };
}
