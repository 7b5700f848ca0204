//! Output formatting for CLI results

use colored::Colorize;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::models::{DrugDisplay, DrugSummary, HistoryAttributes, HistoryDisplay};

pub mod formatters;
pub mod json;
pub mod table;

use formatters::join_or_none;

/// Message shown when a search has no hits
pub const NO_DRUGS_FOUND: &str = "No drugs found matching your search";

/// Trait for types that can be formatted for output
pub trait Formattable {
    /// Format the data according to the specified format
    fn format(&self, format: OutputFormat) -> Result<String>;
}

/// Format and print data to stdout
pub fn print<T: Formattable>(data: &T, format: OutputFormat) -> Result<()> {
    let output = data.format(format)?;
    println!("{}", output);
    Ok(())
}

/// Search hits for one query
pub struct SearchResults<'a> {
    pub query: &'a str,
    pub drugs: &'a [DrugSummary],
}

impl Formattable for SearchResults<'_> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(json::format_json_list(self.drugs)?),
            OutputFormat::Table => {
                let rows: Vec<DrugDisplay> = self.drugs.iter().map(DrugDisplay::from).collect();
                Ok(table::format_table(&rows, NO_DRUGS_FOUND))
            }
            OutputFormat::Pretty => {
                if self.drugs.is_empty() {
                    return Ok(NO_DRUGS_FOUND.to_string());
                }
                let mut out = format!(
                    "{} result(s) for {}\n",
                    self.drugs.len(),
                    self.query.bold()
                );
                for drug in self.drugs {
                    out.push('\n');
                    out.push_str(&pretty_drug(drug));
                }
                Ok(out.trim_end().to_string())
            }
        }
    }
}

impl Formattable for DrugSummary {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(json::format_json(self)?),
            OutputFormat::Table => Ok(table::format_table(&[DrugDisplay::from(self)], "")),
            OutputFormat::Pretty => Ok(pretty_drug(self).trim_end().to_string()),
        }
    }
}

fn pretty_drug(drug: &DrugSummary) -> String {
    format!(
        "{} {}\n  Ingredients: {}\n  Dose forms:  {}\n",
        drug.name.bold(),
        format!("(RXCUI {})", drug.rxcui).dimmed(),
        join_or_none(&drug.base_names),
        join_or_none(&drug.dose_form_group_names),
    )
}

/// History attributes for one RXCUI
#[derive(Serialize)]
pub struct HistoryView<'a> {
    pub rxcui: &'a str,
    #[serde(flatten)]
    pub history: &'a HistoryAttributes,
}

impl Formattable for HistoryView<'_> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(json::format_json(self)?),
            OutputFormat::Table => Ok(table::format_table(
                &HistoryDisplay::rows(self.history),
                "No history attributes available",
            )),
            OutputFormat::Pretty if self.history.is_empty() => Ok(format!(
                "{}\n  No history attributes available",
                format!("RXCUI {}", self.rxcui).bold()
            )),
            OutputFormat::Pretty => Ok(format!(
                "{}\n  Ingredients: {}\n  Dose forms:  {}",
                format!("RXCUI {}", self.rxcui).bold(),
                join_or_none(&self.history.base_names),
                join_or_none(&self.history.dose_form_group_names),
            )),
        }
    }
}

/// Result of validating an RXCUI
#[derive(Serialize)]
pub struct ValidationView<'a> {
    pub rxcui: &'a str,
    pub valid: bool,
}

impl Formattable for ValidationView<'_> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(json::format_json(self)?),
            _ if self.valid => Ok(format!("{} RXCUI {} is active", "✓".green(), self.rxcui)),
            _ => Ok(format!(
                "{} RXCUI {} is invalid. The drug does not exist or is not active.",
                "✗".red(),
                self.rxcui
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<DrugSummary> {
        vec![DrugSummary {
            rxcui: "123456".to_string(),
            name: "Test Drug 10 MG Oral Tablet".to_string(),
            base_names: vec!["Test Ingredient".to_string()],
            dose_form_group_names: vec!["Oral Tablet".to_string()],
        }]
    }

    #[test]
    fn test_search_results_empty_message() {
        let view = SearchResults {
            query: "zzz",
            drugs: &[],
        };
        assert_eq!(view.format(OutputFormat::Table).unwrap(), NO_DRUGS_FOUND);
        assert_eq!(view.format(OutputFormat::Pretty).unwrap(), NO_DRUGS_FOUND);
    }

    #[test]
    fn test_search_results_json() {
        let drugs = sample();
        let view = SearchResults {
            query: "aspirin",
            drugs: &drugs,
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&view.format(OutputFormat::Json).unwrap()).unwrap();

        assert_eq!(parsed["data"][0]["rxcui"], "123456");
        assert_eq!(parsed["data"][0]["base_names"][0], "Test Ingredient");
    }

    #[test]
    fn test_search_results_pretty_lists_names() {
        let drugs = sample();
        let view = SearchResults {
            query: "aspirin",
            drugs: &drugs,
        };
        let out = view.format(OutputFormat::Pretty).unwrap();

        assert!(out.contains("Test Drug 10 MG Oral Tablet"));
        assert!(out.contains("Oral Tablet"));
    }

    #[test]
    fn test_history_view_json_is_flat() {
        let history = HistoryAttributes {
            base_names: vec!["Zinc".to_string()],
            dose_form_group_names: vec![],
        };
        let view = HistoryView {
            rxcui: "1",
            history: &history,
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&view.format(OutputFormat::Json).unwrap()).unwrap();

        assert_eq!(parsed["data"]["rxcui"], "1");
        assert_eq!(parsed["data"]["base_names"][0], "Zinc");
    }

    #[test]
    fn test_validation_view_messages() {
        let ok = ValidationView {
            rxcui: "1",
            valid: true,
        };
        let bad = ValidationView {
            rxcui: "2",
            valid: false,
        };
        assert!(ok.format(OutputFormat::Pretty).unwrap().contains("active"));
        assert!(bad.format(OutputFormat::Table).unwrap().contains("invalid"));
    }
}
