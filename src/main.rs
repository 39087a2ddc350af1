//! signtool-batch - sign Windows artifacts with a PFX certificate via signtool.
//!
//! Exit codes: 0 all files signed, 1 error, 2 batch finished with failures,
//! 3 manual SDK installation required.

use signtool_batch::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  hint: {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
