//! Bundled sample suites
//!
//! `Calculator` and `Dummy` exercise every kind of check. Four of their checks
//! fail on purpose, so a full run exits with status 4.

use tally_harness::{
    check_equal, check_equal_strings, check_equal_unsigned, test_case, test_suite, Checker,
    TestSuite,
};

fn add_positives(check: &mut Checker) {
    check_equal!(check, -4, 1 - 5);
    check_equal!(check, 4, 5 + 3);
    check_equal_unsigned!(check, 4, 7 + 23);
}

fn add_negatives(check: &mut Checker) {
    check_equal!(check, -4, 5 - 2);
}

fn compare_texts(check: &mut Checker) {
    check_equal_strings!(check, "Text 1", "Other text");
}

/// All bundled suites, in run order
pub fn suites() -> Vec<TestSuite> {
    vec![
        test_suite!(
            "Calculator",
            test_case!("AddPositives", add_positives),
            test_case!("AddNegatives", add_negatives),
        ),
        test_suite!("Dummy", test_case!("CompareTexts", compare_texts)),
    ]
}

/// Keep only the named suites, preserving the requested order.
///
/// An empty selection keeps everything. Unknown names are returned as the error.
pub fn select(suites: Vec<TestSuite>, names: &[String]) -> Result<Vec<TestSuite>, Vec<String>> {
    if names.is_empty() {
        return Ok(suites);
    }

    let unknown: Vec<String> = names
        .iter()
        .filter(|name| !suites.iter().any(|s| s.name() == name.as_str()))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(unknown);
    }

    let mut pool: Vec<Option<TestSuite>> = suites.into_iter().map(Some).collect();
    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        let slot = pool
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|s| s.name() == name.as_str()));
        if let Some(suite) = slot.and_then(Option::take) {
            selected.push(suite);
        }
    }
    Ok(selected)
}
