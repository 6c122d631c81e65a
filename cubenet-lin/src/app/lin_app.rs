use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::reader;
use cubenet_core::error::ValidationError;
use cubenet_core::network::{MergeError, NetworkModel};
use cubenet_core::validate::{self, ModelType};

/// Command line tool for parsing, merging, validating and diffing Cube
/// transit line files
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct LinApp {
    #[command(subcommand)]
    pub op: LinOperation,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum LinOperation {
    /// merge the given files into one network and run all validations
    Validate {
        /// line files, routed by suffix (.lin/.link/.pnr/.zac/.access/.xfer/.node/.pts)
        files: Vec<PathBuf>,
        /// travel model whose connectivity rules apply (champ, tm1, tm2)
        #[arg(long, default_value = "champ")]
        model_type: ModelType,
        /// replace same-named lines in place instead of moving them to the end
        #[arg(long)]
        replace: bool,
    },
    /// compare two networks and print per-route changes as JSON
    Diff {
        /// files of the base network
        #[arg(long, num_args = 1.., required = true)]
        base: Vec<PathBuf>,
        /// files of the build network
        #[arg(long, num_args = 1.., required = true)]
        build: Vec<PathBuf>,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failure writing report: {source}")]
    Report {
        #[from]
        source: serde_json::Error,
    },
}

impl LinOperation {
    pub fn run(self) -> Result<(), AppError> {
        match self {
            LinOperation::Validate {
                files,
                model_type,
                replace,
            } => {
                let model = build_model(&files, replace)?;
                validate::validate(&model, model_type)?;
                validate::validate_for_write(&model)?;
                println!(
                    "{} file(s) merged into a {} dialect network with {} line(s); no violations",
                    files.len(),
                    model.dialect,
                    model.line_count()
                );
                Ok(())
            }
            LinOperation::Diff { base, build } => {
                let base = build_model(&base, true)?;
                let build = build_model(&build, true)?;
                let comparisons = cubenet_core::diff::diff(&base, &build);
                println!("{}", serde_json::to_string_pretty(&comparisons)?);
                Ok(())
            }
        }
    }
}

fn build_model(files: &[PathBuf], insert_or_replace: bool) -> Result<NetworkModel, AppError> {
    let mut model = NetworkModel::new();
    for path in files {
        let fragment = reader::read_fragment(path)?;
        model.merge(fragment, &path.display().to_string(), insert_or_replace)?;
    }
    Ok(model)
}
