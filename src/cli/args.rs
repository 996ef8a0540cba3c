use crate::core::engine::SplitterConfig;
use crate::core::grouping::MissingMerchantPolicy;
use crate::types::FileKind;
use clap::Parser;
use std::path::PathBuf;

/// Split settlement extract files per merchant and validate trailer totals
#[derive(Parser, Debug)]
#[command(name = "settlement-splitter")]
#[command(about = "Split settlement extract files per merchant and validate trailer totals", long_about = None)]
pub struct CliArgs {
    /// Input settlement file to process
    #[arg(value_name = "INPUT", help = "Path to the settlement file")]
    pub input: PathBuf,

    /// Explicit file kind, overriding file-name inference
    #[arg(
        long = "kind",
        value_name = "KIND",
        help = "File kind (eevc, eevd or eefi); inferred from the file name when omitted"
    )]
    pub kind: Option<FileKind>,

    /// Root directory of the per-batch output tree
    #[arg(long = "output-root", value_name = "DIR", default_value = "output")]
    pub output_root: PathBuf,

    /// Archive directory for consistently processed source files
    #[arg(long = "archive-dir", value_name = "DIR", default_value = "processados")]
    pub archive_dir: PathBuf,

    /// Directory where divergent source files land for manual review
    #[arg(long = "error-dir", value_name = "DIR", default_value = "erro")]
    pub error_dir: PathBuf,

    /// Path of the append-only operations log
    #[arg(long = "log-file", value_name = "PATH", default_value = "logs/operacoes.csv")]
    pub log_file: PathBuf,

    /// Explicit batch identifier, overriding file-name derivation
    #[arg(
        long = "batch-id",
        value_name = "ID",
        help = "Batch identifier; derived from the file name when omitted"
    )]
    pub batch_id: Option<String>,

    /// Rewrite an existing batch instead of failing on collision
    #[arg(long = "overwrite")]
    pub overwrite: bool,

    /// Bucket detail lines with an empty merchant field under NSA_000
    /// instead of failing the run
    #[arg(long = "fallback-merchant")]
    pub fallback_merchant: bool,
}

impl CliArgs {
    /// Build the engine configuration from the parsed arguments
    pub fn to_config(&self) -> SplitterConfig {
        SplitterConfig {
            output_root: self.output_root.clone(),
            archive_dir: self.archive_dir.clone(),
            error_dir: self.error_dir.clone(),
            log_path: self.log_file.clone(),
            overwrite: self.overwrite,
            missing_merchant: if self.fallback_merchant {
                MissingMerchantPolicy::Fallback
            } else {
                MissingMerchantPolicy::Reject
            },
        }
    }
}
