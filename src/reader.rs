//! Parses a generated data file back into a [`LimitsDocument`].
//!
//! Only the layout produced by [`crate::render`] is accepted: one key per
//! line, `//` comments and blank lines ignored, anything after the closing
//! `};` of the constant ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::error::{LimitsError, Result};
use crate::model::{LimitsDocument, StateEntry};

static CONST_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^const\s+[A-Za-z_$][\w$]*\s*=\s*\{$").unwrap());
static NUMBER_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(year|baseline):\s*(-?\d+),?$").unwrap());
static STATES_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^states:\s*\{$").unwrap());
static KEY_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^'((?:[^'\\]|\\.)*)':\s*\{$").unwrap());
static COUNTIES_EMPTY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^counties:\s*\{\s*\},?$").unwrap());
static COUNTIES_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^counties:\s*\{$").unwrap());
static COUNTY_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^'((?:[^'\\]|\\.)*)':\s*(-?\d+),?$").unwrap());
static CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\},?$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Object,
    States,
    State,
    Counties,
    Done,
}

struct OpenState {
    name: String,
    baseline: Option<i64>,
    counties: BTreeMap<String, i64>,
}

/// Undo [`crate::render::escape_js`].
pub fn unescape_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn malformed(line: usize, reason: impl Into<String>) -> LimitsError {
    LimitsError::MalformedOutput {
        line,
        reason: reason.into(),
    }
}

fn parse_int(line: usize, s: &str) -> Result<i64> {
    s.parse()
        .map_err(|_| malformed(line, format!("integer out of range: {}", s)))
}

/// Parse rendered text.
pub fn parse_document(text: &str) -> Result<LimitsDocument> {
    let mut section = Section::Preamble;
    let mut year: Option<i64> = None;
    let mut baseline: Option<i64> = None;
    let mut states: BTreeMap<String, StateEntry> = BTreeMap::new();
    let mut current: Option<OpenState> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if section == Section::Done {
            break;
        }
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        match section {
            Section::Preamble => {
                if !CONST_OPEN.is_match(line) {
                    return Err(malformed(line_no, "expected constant declaration"));
                }
                section = Section::Object;
            }
            Section::Object => {
                if let Some(caps) = NUMBER_FIELD.captures(line) {
                    let value = parse_int(line_no, &caps[2])?;
                    match &caps[1] {
                        "year" => year = Some(value),
                        _ => baseline = Some(value),
                    }
                } else if STATES_OPEN.is_match(line) {
                    section = Section::States;
                } else if line == "};" {
                    section = Section::Done;
                } else {
                    return Err(malformed(line_no, format!("unexpected `{}`", line)));
                }
            }
            Section::States => {
                if let Some(caps) = KEY_OPEN.captures(line) {
                    current = Some(OpenState {
                        name: unescape_js(&caps[1]),
                        baseline: None,
                        counties: BTreeMap::new(),
                    });
                    section = Section::State;
                } else if CLOSE.is_match(line) {
                    section = Section::Object;
                } else {
                    return Err(malformed(line_no, format!("expected state, got `{}`", line)));
                }
            }
            Section::State => {
                let state = current
                    .as_mut()
                    .ok_or_else(|| malformed(line_no, "no open state"))?;
                if let Some(caps) = NUMBER_FIELD.captures(line) {
                    if &caps[1] != "baseline" {
                        return Err(malformed(line_no, "unexpected field in state"));
                    }
                    state.baseline = Some(parse_int(line_no, &caps[2])?);
                } else if COUNTIES_EMPTY.is_match(line) {
                    // nothing to collect
                } else if COUNTIES_OPEN.is_match(line) {
                    section = Section::Counties;
                } else if CLOSE.is_match(line) {
                    let state = current
                        .take()
                        .ok_or_else(|| malformed(line_no, "no open state"))?;
                    let state_baseline = state
                        .baseline
                        .ok_or_else(|| malformed(line_no, format!("{} has no baseline", state.name)))?;
                    states.insert(
                        state.name,
                        StateEntry {
                            baseline: state_baseline,
                            counties: state.counties,
                        },
                    );
                    section = Section::States;
                } else {
                    return Err(malformed(line_no, format!("unexpected `{}`", line)));
                }
            }
            Section::Counties => {
                if let Some(caps) = COUNTY_ENTRY.captures(line) {
                    let limit = parse_int(line_no, &caps[2])?;
                    if let Some(state) = current.as_mut() {
                        state.counties.insert(unescape_js(&caps[1]), limit);
                    }
                } else if CLOSE.is_match(line) {
                    section = Section::State;
                } else {
                    return Err(malformed(line_no, format!("expected county, got `{}`", line)));
                }
            }
            Section::Done => unreachable!(),
        }
    }

    let last_line = text.lines().count();
    if section != Section::Done {
        return Err(malformed(last_line, "unterminated document"));
    }
    let year = year.ok_or_else(|| malformed(last_line, "missing year"))?;
    let year = i32::try_from(year).map_err(|_| malformed(last_line, "year out of range"))?;
    let baseline = baseline.ok_or_else(|| malformed(last_line, "missing baseline"))?;

    Ok(LimitsDocument {
        year,
        baseline,
        states,
    })
}
