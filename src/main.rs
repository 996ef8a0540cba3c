//! Settlement Splitter CLI
//!
//! Command-line interface for splitting settlement extract files per
//! merchant and validating their trailer totals.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- EEVC_051025.TXT
//! cargo run -- --kind eefi --output-root /srv/splitter/output EEFI_041025.TXT
//! cargo run -- --batch-id EEVC_051025_R2 --overwrite EEVC_051025.TXT
//! ```
//!
//! The program processes exactly one file per invocation (the daily
//! scheduler or upload handler drives it once per received file), prints a
//! one-line outcome summary to stdout and reports the verdict through the
//! exit code.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: set to `debug`, `info` or `warn` to control diagnostic
//!   logging verbosity
//!
//! # Exit Codes
//!
//! - 0: run completed with verdict OK
//! - 1: fatal error (unknown kind, malformed file, I/O failure, collision)
//! - 2: run completed with verdict DIVERGENT (outputs written, source file
//!   routed to the error directory)

use settlement_splitter::cli;
use settlement_splitter::SplitterEngine;
use settlement_splitter::types::BatchId;
use std::process;

fn main() {
    env_logger::init();

    let args = cli::parse_args();
    let config = args.to_config();

    if let Err(e) = config.ensure_dirs() {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    let engine = SplitterEngine::new(config);
    let batch_id = args.batch_id.as_deref().map(BatchId::new);

    match engine.process_with(&args.input, args.kind, batch_id) {
        Ok(outcome) => {
            println!("{}", outcome.summary());
            process::exit(if outcome.verdict.is_ok() { 0 } else { 2 });
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
