// src/main.rs

use clever_deploy::{cli, logging, report, run};
use tracing::error;

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("clever-deploy: {err:?}");
    }

    if let Err(err) = run(args).await {
        let message = err.to_string();
        error!(error = %message, "deployment failed");
        if let Err(e) = report::set_failed(&message) {
            eprintln!("clever-deploy: failed to report failure: {e}");
        }
        std::process::exit(1);
    }
}
