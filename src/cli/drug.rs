//! Drug lookup commands

use std::process::ExitCode;

use crate::cli::{CommandContext, GlobalOptions};
use crate::error::{Error, Result};
use crate::output::{self, HistoryView, SearchResults, ValidationView};

/// Search branded drugs by name
pub async fn search(opts: &GlobalOptions, drug_name: &str) -> Result<ExitCode> {
    let ctx = CommandContext::new(opts)?;
    let drugs = ctx.lookup.search_drugs(drug_name).await;

    output::print(
        &SearchResults {
            query: drug_name,
            drugs: &drugs,
        },
        ctx.format,
    )?;
    Ok(ExitCode::SUCCESS)
}

/// Show details for one RXCUI
pub async fn details(opts: &GlobalOptions, rxcui: &str) -> Result<ExitCode> {
    let ctx = CommandContext::new(opts)?;
    let drug = ctx
        .lookup
        .drug_details(rxcui)
        .await
        .ok_or_else(|| Error::Other(format!("Unable to retrieve drug details for RXCUI {}", rxcui)))?;

    output::print(&drug, ctx.format)?;
    Ok(ExitCode::SUCCESS)
}

/// Validate an RXCUI; exits non-zero when it is not active
pub async fn validate(opts: &GlobalOptions, rxcui: &str) -> Result<ExitCode> {
    let ctx = CommandContext::new(opts)?;
    let valid = ctx.lookup.validate_rxcui(rxcui).await;

    output::print(&ValidationView { rxcui, valid }, ctx.format)?;
    Ok(if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Show ingredient and dose form history for one RXCUI
pub async fn history(opts: &GlobalOptions, rxcui: &str) -> Result<ExitCode> {
    let ctx = CommandContext::new(opts)?;
    let history = ctx.lookup.rxcui_history_status(rxcui).await;

    output::print(
        &HistoryView {
            rxcui,
            history: &history,
        },
        ctx.format,
    )?;
    Ok(ExitCode::SUCCESS)
}
