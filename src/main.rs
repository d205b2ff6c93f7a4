//! USL Planner - Main CLI Application
//!
//! Fits the Universal Scalability Law to load-test measurements and reports
//! the system's contention, coherency and throughput ceiling.

use clap::Parser;
use std::process;
use usl_planner::{
    app::App,
    cli::Cli,
    config::parser::load_config,
    error::{AppError, ErrorReporter, Result},
    build_info, PKG_NAME, VERSION,
};

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(AppError::internal("panic").exit_code());
    }));

    let cli = Cli::parse();
    let use_color = cli.use_colors();
    let verbose = cli.verbose;

    match run_application(cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            ErrorReporter::new(use_color, verbose).report_error(&e);
            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
fn run_application(cli: Cli) -> Result<String> {
    if cli.should_show_topic_help() {
        return Ok(cli.display_help());
    }

    if cli.debug {
        eprintln!("{} v{}", PKG_NAME, VERSION);
        eprintln!(
            "Built {} from {} for {}",
            build_info::BUILD_TIME,
            build_info::GIT_COMMIT,
            build_info::TARGET_TRIPLE
        );
        eprintln!("Debug mode enabled");
        eprint!("{}", cli.get_config_summary());
    }

    let config = load_config(cli)?;
    App::new(config).run()
}
