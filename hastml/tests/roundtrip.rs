//! Round-trip tests using datatest-stable.
//!
//! `tests/roundtrip-cases/*.html` are parsed with html5ever, serialized,
//! parsed again and serialized again. Both serializations must be identical.
//!
//! `tests/omission-cases/*.html` have the format:
//! ```
//! <input HTML>
//! ===
//! <expected HTML with optional tags omitted>
//! ```

mod common;

use hastml::Options;
use std::path::Path;

fn run_roundtrip_test(path: &Path) -> datatest_stable::Result<()> {
    facet_testhelpers::setup();

    let content = std::fs::read_to_string(path)?;
    let config = Options::default().build().map_err(|e| format!("{e:?}"))?;

    let first = config.render(&common::parse(&content));
    let second = config.render(&common::parse(&first));

    if first != second {
        return Err(format!(
            "Serialization is not stable!\nInput: {content}\nFirst: {first}\nSecond: {second}"
        )
        .into());
    }

    Ok(())
}

fn run_omission_test(path: &Path) -> datatest_stable::Result<()> {
    facet_testhelpers::setup();

    let content = std::fs::read_to_string(path)?;
    let parts: Vec<&str> = content.split("\n===\n").collect();

    if parts.len() != 2 {
        return Err(format!(
            "Test file must have exactly one '===' separator, found {} parts",
            parts.len()
        )
        .into());
    }

    let input = parts[0].trim();
    let expected = parts[1].trim();

    let config = Options::default()
        .omit_optional_tags()
        .build()
        .map_err(|e| format!("{e:?}"))?;
    let result = config.render(&common::parse(input));

    if result != expected {
        return Err(format!(
            "Omission failed!\nInput: {input}\nResult: {result}\nExpected: {expected}"
        )
        .into());
    }

    // Whatever was left out, the parser has to put back.
    let full = Options::default().build().map_err(|e| format!("{e:?}"))?;
    let restored = full.render(&common::parse(&result));
    let original = full.render(&common::parse(input));
    if restored != original {
        return Err(format!(
            "Omitted tags were not restored!\nRestored: {restored}\nOriginal: {original}"
        )
        .into());
    }

    Ok(())
}

datatest_stable::harness! {
    { test = run_roundtrip_test, root = "tests/roundtrip-cases", pattern = r".*\.html$" },
    { test = run_omission_test, root = "tests/omission-cases", pattern = r".*\.html$" },
}
