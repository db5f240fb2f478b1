// src/config.rs

use std::path::PathBuf;

/// Fixed run configuration. The generator takes no flags; `Default` holds the
/// paths and constants used for the published data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Regulator spreadsheet (`.xlsx`, or a `.csv` export with the same layout).
    pub input_path: PathBuf,
    /// Generated JavaScript data file, overwritten on every run.
    pub output_path: PathBuf,
    /// Limit year written into the document.
    pub year: i32,
    /// Name of the JS constant the document is assigned to.
    pub constant_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("fullcountyloanlimitlist2026_hera-based_final_flat.xlsx"),
            output_path: PathBuf::from("js/loan-limits-data.js"),
            year: 2026,
            constant_name: "LoanLimitsData".to_string(),
        }
    }
}

impl Config {
    /// File name of the input, as shown in the generated header comment.
    pub fn input_file_name(&self) -> String {
        self.input_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.input_path.display().to_string())
    }
}
