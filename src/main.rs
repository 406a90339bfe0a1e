use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use timetable_scan::report::to_json_line;
use timetable_scan::{
    analyze, ComplianceChecker, ErrorReport, ScanConfig, ScanError, StaticRecognizer,
    TransformationPipeline,
};

#[derive(Parser)]
#[command(name = "timetable-scan")]
#[command(about = "Recognize a timetable image and check it against the NEP subject rule")]
#[command(version)]
struct Cli {
    /// Path to the timetable image
    #[arg(allow_hyphen_values = true)]
    image_path: Option<PathBuf>,

    #[arg(hide = true, allow_hyphen_values = true)]
    rest: Vec<String>,

    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn emit<T: Serialize>(value: &T) -> bool {
    match to_json_line(value) {
        Ok(line) => {
            println!("{line}");
            true
        }
        Err(err) => {
            error!(%err, "cannot serialize report");
            false
        }
    }
}

fn run(cli: &Cli) -> Result<timetable_scan::AnalysisReport, ScanError> {
    let path = cli.image_path.as_deref().ok_or(ScanError::MissingArgument)?;
    if !cli.rest.is_empty() {
        info!(ignored = ?cli.rest, "extra arguments ignored");
    }
    let config = ScanConfig::default();
    let pipeline = TransformationPipeline::from_config(&config);
    let checker = ComplianceChecker::new(config.max_subjects_per_day);
    analyze(path, &pipeline, &StaticRecognizer, &checker)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(report) => {
            info!(
                slots = report.recognized_timetable.len(),
                is_nep_friendly = report.is_nep_friendly,
                issues = report.issues.len(),
                "analysis finished"
            );
            if emit(&report) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            info!(%err, "analysis failed");
            emit(&ErrorReport::from(&err));
            ExitCode::FAILURE
        }
    }
}
