// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use crate::triage::{CompletionParser, RegexCompletionParser, TriageResult};

/// Arguments for parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// File holding the completion text (reads stdin when omitted)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

pub async fn parse_completion(args: ParseArgs) -> Result<()> {
    let completion = match &args.file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read stdin")?;
            buffer
        }
    };

    let result = TriageResult::from_outcome(RegexCompletionParser::new().parse(&completion));
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
