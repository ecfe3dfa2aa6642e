//! List command - show the bundled suites and their cases

use crate::samples;
use anyhow::Result;
use colored::*;
use std::io::{self, Write};
use tally_harness::TestSuite;

/// Print bundled suites to stdout
pub fn run(json: bool) -> Result<()> {
    let suites = samples::suites();
    let mut out = io::stdout().lock();
    if json {
        writeln!(out, "{}", to_json(&suites))?;
    } else {
        write_text(&mut out, &suites)?;
    }
    Ok(())
}

fn write_text(out: &mut impl Write, suites: &[TestSuite]) -> io::Result<()> {
    for suite in suites {
        writeln!(
            out,
            "{} ({} case{})",
            suite.name().bold(),
            suite.len(),
            if suite.len() == 1 { "" } else { "s" }
        )?;
        for case in suite.cases() {
            writeln!(out, "    {}", case.name())?;
        }
    }
    Ok(())
}

fn to_json(suites: &[TestSuite]) -> serde_json::Value {
    let suites: Vec<_> = suites
        .iter()
        .map(|suite| {
            let cases: Vec<_> = suite.cases().iter().map(|c| c.name()).collect();
            serde_json::json!({ "name": suite.name(), "cases": cases })
        })
        .collect();
    serde_json::json!({ "suites": suites })
}
