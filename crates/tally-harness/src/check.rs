//! Equality checks
//!
//! A test body receives a [`Checker`] and calls one of its three comparisons,
//! normally through the [`check_equal!`](crate::check_equal),
//! [`check_equal_unsigned!`](crate::check_equal_unsigned) and
//! [`check_equal_strings!`](crate::check_equal_strings) macros which fill in
//! the call-site [`Location`].
//!
//! A failed check is recorded and execution carries on with the next
//! statement. Nothing here panics.

use crate::recorder::{FailureRecorder, FailureReport, ReportValue};
use std::fmt::Display;

/// Where a check was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub function: &'static str,
    pub file: &'static str,
    pub line: u32,
}

impl Location {
    pub const fn new(function: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            function,
            file,
            line,
        }
    }
}

/// Handle through which a running test case performs its checks
pub struct Checker<'r> {
    recorder: &'r mut FailureRecorder,
    failures: u64,
}

impl<'r> Checker<'r> {
    pub fn new(recorder: &'r mut FailureRecorder) -> Self {
        Self {
            recorder,
            failures: 0,
        }
    }

    /// Compare two signed integers. Returns `true` when they are equal.
    pub fn equal_signed(&mut self, expected: i64, actual: i64, location: Location) -> bool {
        self.compare(expected == actual, location, || {
            (ReportValue::Signed(expected), ReportValue::Signed(actual))
        })
    }

    /// Compare two unsigned integers. Returns `true` when they are equal.
    pub fn equal_unsigned(&mut self, expected: u64, actual: u64, location: Location) -> bool {
        self.compare(expected == actual, location, || {
            (ReportValue::Unsigned(expected), ReportValue::Unsigned(actual))
        })
    }

    /// Compare two integers of any type as signed 64-bit values.
    ///
    /// Both sides are converted without loss. A value that does not fit an
    /// `i64` is compared by its decimal value and reported as is, so an
    /// out-of-range input never wraps into a false match.
    pub fn equal_signed_from<E, A>(&mut self, expected: E, actual: A, location: Location) -> bool
    where
        E: Copy + Display,
        A: Copy + Display,
        i64: TryFrom<E> + TryFrom<A>,
    {
        match (i64::try_from(expected), i64::try_from(actual)) {
            (Ok(expected), Ok(actual)) => self.equal_signed(expected, actual, location),
            _ => self.compare_out_of_range(expected, actual, location),
        }
    }

    /// Compare two integers of any type as unsigned 64-bit values.
    ///
    /// Negative and oversized values are compared by their decimal value
    /// instead of wrapping.
    pub fn equal_unsigned_from<E, A>(&mut self, expected: E, actual: A, location: Location) -> bool
    where
        E: Copy + Display,
        A: Copy + Display,
        u64: TryFrom<E> + TryFrom<A>,
    {
        match (u64::try_from(expected), u64::try_from(actual)) {
            (Ok(expected), Ok(actual)) => self.equal_unsigned(expected, actual, location),
            _ => self.compare_out_of_range(expected, actual, location),
        }
    }

    /// Compare two strings byte for byte (case-sensitive).
    /// Returns `true` when they are identical.
    pub fn equal_strings(
        &mut self,
        expected: impl AsRef<str>,
        actual: impl AsRef<str>,
        location: Location,
    ) -> bool {
        let (expected, actual) = (expected.as_ref(), actual.as_ref());
        self.compare(expected.as_bytes() == actual.as_bytes(), location, || {
            (
                ReportValue::Text(expected.to_string()),
                ReportValue::Text(actual.to_string()),
            )
        })
    }

    /// Failures recorded through this checker
    pub fn failures(&self) -> u64 {
        self.failures
    }

    fn compare_out_of_range(
        &mut self,
        expected: impl Display,
        actual: impl Display,
        location: Location,
    ) -> bool {
        let (expected, actual) = (expected.to_string(), actual.to_string());
        self.compare(expected == actual, location, || {
            (ReportValue::OutOfRange(expected), ReportValue::OutOfRange(actual))
        })
    }

    fn compare(
        &mut self,
        equal: bool,
        location: Location,
        values: impl FnOnce() -> (ReportValue, ReportValue),
    ) -> bool {
        if equal {
            tracing::trace!(function = location.function, line = location.line, "check passed");
            return true;
        }

        let (expected, actual) = values();
        self.failures += 1;
        self.recorder.record_failure(&FailureReport {
            function: location.function.to_string(),
            file: location.file.to_string(),
            line: location.line,
            expected,
            actual,
        });
        false
    }
}

/// Reduce a `type_name` path to the bare name of the enclosing function.
#[doc(hidden)]
pub fn short_function_name(path: &'static str) -> &'static str {
    let mut path = path.strip_suffix("::__tally_here").unwrap_or(path);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    path.rsplit("::").next().unwrap_or(path)
}

/// Name of the function this macro is expanded in
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __tally_here() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::check::short_function_name(type_name_of(__tally_here))
    }};
}

/// [`Location`] of the macro call site
#[macro_export]
macro_rules! location {
    () => {
        $crate::check::Location::new($crate::function_name!(), file!(), line!())
    };
}

/// Check two integers for equality as signed values
///
/// Accepts any integer type; floats do not compile.
#[macro_export]
macro_rules! check_equal {
    ($checker:expr, $expected:expr, $actual:expr $(,)?) => {
        $checker.equal_signed_from($expected, $actual, $crate::location!())
    };
}

/// Check two integers for equality as unsigned values
#[macro_export]
macro_rules! check_equal_unsigned {
    ($checker:expr, $expected:expr, $actual:expr $(,)?) => {
        $checker.equal_unsigned_from($expected, $actual, $crate::location!())
    };
}

/// Check two strings for byte-wise equality
#[macro_export]
macro_rules! check_equal_strings {
    ($checker:expr, $expected:expr, $actual:expr $(,)?) => {
        $checker.equal_strings($expected, $actual, $crate::location!())
    };
}
