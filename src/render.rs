//! Renders a [`LimitsDocument`] as a JavaScript source file.
//!
//! The file assigns the document to a constant and then exports it only when
//! `module.exports` exists, so it loads both as a plain `<script>` global and
//! as a CommonJS module.

use chrono::NaiveDate;

use crate::model::LimitsDocument;

/// Values that only reach the comment lines and the constant name.
#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    pub constant_name: &'a str,
    pub source_name: &'a str,
    pub generated: NaiveDate,
}

/// Escape for a single-quoted JS string literal.
pub fn escape_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(c),
        }
    }
    out
}

/// Full file text. States and counties are sorted by their escaped keys.
pub fn render_document(doc: &LimitsDocument, opts: &RenderOptions<'_>) -> String {
    let mut out = String::new();
    let mut line = |text: &str| {
        out.push_str(text);
        out.push('\n');
    };

    line(&format!("// FHFA Conforming Loan Limits Data - {}", doc.year));
    line(&format!("// Generated from: {}", opts.source_name));
    line(&format!("// Last updated: {}", opts.generated.format("%B %Y")));
    line("");
    line(&format!("const {} = {{", opts.constant_name));
    line(&format!("    year: {},", doc.year));
    line("    ");
    line(&format!(
        "    // Baseline conforming loan limit for {} (single-family home)",
        doc.year
    ));
    line(&format!("    baseline: {},", doc.baseline));
    line("    ");
    line("    // State-by-state data");
    line("    // Only counties with limits different from baseline are listed");
    line("    states: {");

    let mut states: Vec<(String, _)> = doc
        .states
        .iter()
        .map(|(name, entry)| (escape_js(name), entry))
        .collect();
    states.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, entry) in states {
        line(&format!("        '{}': {{", name));
        line(&format!("            baseline: {},", entry.baseline));
        if entry.counties.is_empty() {
            line("            counties: {}");
        } else {
            let mut counties: Vec<(String, i64)> = entry
                .counties
                .iter()
                .map(|(county, limit)| (escape_js(county), *limit))
                .collect();
            counties.sort();

            line("            counties: {");
            for (county, limit) in counties {
                line(&format!("                '{}': {},", county, limit));
            }
            line("            }");
        }
        line("        },");
    }

    line("    }");
    line("};");
    line("");
    line("// Export for module use");
    line("if (typeof module !== 'undefined' && module.exports) {");
    line(&format!("    module.exports = {};", opts.constant_name));
    line("}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StateEntry;
    use std::collections::BTreeMap;

    fn opts() -> RenderOptions<'static> {
        RenderOptions {
            constant_name: "LoanLimitsData",
            source_name: "limits.xlsx",
            generated: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        }
    }

    fn doc() -> LimitsDocument {
        let mut states = BTreeMap::new();
        states.insert(
            "Alabama".to_string(),
            StateEntry {
                baseline: 832750,
                counties: BTreeMap::new(),
            },
        );
        states.insert(
            "Iowa".to_string(),
            StateEntry {
                baseline: 832750,
                counties: BTreeMap::from([("O'Brien".to_string(), 900000)]),
            },
        );
        LimitsDocument {
            year: 2026,
            baseline: 832750,
            states,
        }
    }

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(escape_js("O'Brien"), "O\\'Brien");
        assert_eq!(escape_js("a\\b"), "a\\\\b");
        assert_eq!(escape_js("Kings"), "Kings");
    }

    #[test]
    fn renders_expected_layout() {
        let text = render_document(&doc(), &opts());
        let expected = "\
// FHFA Conforming Loan Limits Data - 2026
// Generated from: limits.xlsx
// Last updated: December 2025

const LoanLimitsData = {
    year: 2026,
    
    // Baseline conforming loan limit for 2026 (single-family home)
    baseline: 832750,
    
    // State-by-state data
    // Only counties with limits different from baseline are listed
    states: {
        'Alabama': {
            baseline: 832750,
            counties: {}
        },
        'Iowa': {
            baseline: 832750,
            counties: {
                'O\\'Brien': 900000,
            }
        },
    }
};

// Export for module use
if (typeof module !== 'undefined' && module.exports) {
    module.exports = LoanLimitsData;
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn keys_sort_by_escaped_text() {
        let mut d = doc();
        d.states.insert(
            "ZZ".to_string(),
            StateEntry {
                baseline: 832750,
                counties: BTreeMap::new(),
            },
        );
        d.states.insert(
            "AA".to_string(),
            StateEntry {
                baseline: 832750,
                counties: BTreeMap::new(),
            },
        );
        if let Some(iowa) = d.states.get_mut("Iowa") {
            iowa.counties.insert("OBrien".to_string(), 950000);
        }

        let text = render_document(&d, &opts());
        let pos = |needle: &str| text.find(needle).unwrap();
        assert!(pos("'AA': {") < pos("'Alabama': {"));
        assert!(pos("'Alabama': {") < pos("'Iowa': {"));
        assert!(pos("'Iowa': {") < pos("'ZZ': {"));
        // backslash sorts after upper-case letters
        assert!(pos("'OBrien': 950000") < pos("'O\\'Brien': 900000"));
    }

    #[test]
    fn deterministic_for_fixed_date() {
        assert_eq!(
            render_document(&doc(), &opts()),
            render_document(&doc(), &opts())
        );
    }
}
