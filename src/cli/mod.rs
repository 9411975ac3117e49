// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod knowledge;
pub mod parse;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Symptom triage CLI
#[derive(Parser, Debug)]
#[command(name = "triage-cli")]
#[command(version)]
#[command(about = "Operator tools for the symptom triage service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Insert knowledge-base entries into MongoDB
    Seed(knowledge::SeedArgs),

    /// Search the knowledge index for a symptom query
    Search(knowledge::SearchArgs),

    /// Parse a model completion into a triage result
    Parse(parse::ParseArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Seed(args) => knowledge::seed(args).await,
        Commands::Search(args) => knowledge::search(args).await,
        Commands::Parse(args) => parse::parse_completion(args).await,
    }
}
