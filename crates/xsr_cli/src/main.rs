//! `xsr` command line entry point.
//!
//! # Responsibility
//! - Turn XSR report files into project JSON on stdout.
//! - Print progress figures for a stored project document.
//!
//! # Invariants
//! - Results go to stdout, diagnostics to stderr.
//! - File logging starts only when `--log-dir` is given.

use chrono::Utc;
use clap::{Parser, Subcommand};
use log::info;
use serde_json::json;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use xsr_core::{
    man_days, parse_fasteners, parse_report, project_progress, recent_completions,
    user_completions, FastenerReport, Project, TaskTemplate,
};

/// Steel fabrication report tooling.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value_t = xsr_core::default_log_level().to_string())]
    log_level: String,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse an assembly report into a new project
    Parse {
        /// Assembly report text file
        report: PathBuf,

        /// Fastener report text file
        #[arg(long)]
        fasteners: Option<PathBuf>,

        /// Project name; defaults to the report file stem
        #[arg(long)]
        name: Option<String>,

        /// Comma-separated task names seeded on every instance
        #[arg(long, value_delimiter = ',')]
        tasks: Vec<String>,
    },
    /// Print completion figures for a project JSON document
    Progress {
        /// Project JSON file
        project: PathBuf,

        /// Users listed even with no completions ("First Last")
        #[arg(long, value_delimiter = ',')]
        users: Vec<String>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(dir) = &args.log_dir {
        if let Err(err) = xsr_core::init_logging(&args.log_level, &dir.to_string_lossy()) {
            eprintln!("xsr: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(args.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("xsr: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<String, Box<dyn Error>> {
    match command {
        Command::Parse {
            report,
            fasteners,
            name,
            tasks,
        } => {
            let template = if tasks.is_empty() {
                TaskTemplate::fabrication_default()
            } else {
                TaskTemplate::new(&tasks)?
            };
            let parsed = parse_report(&read_text(&report)?, &template);
            let fasteners = match &fasteners {
                Some(path) => parse_fasteners(&read_text(path)?),
                None => FastenerReport::default(),
            };
            let name = name.unwrap_or_else(|| file_stem(&report));
            let project = Project::new(name, parsed, fasteners, Utc::now())?;
            info!(
                "event=cli_parse module=cli status=ok parts={} assemblies={}",
                project.parts.len(),
                project.assemblies.len()
            );
            Ok(serde_json::to_string_pretty(&project)?)
        }
        Command::Progress { project, users } => {
            let project: Project = serde_json::from_str(&read_text(&project)?)?;
            let progress = project_progress(&project);
            let report = json!({
                "projectName": project.project_name,
                "progress": progress,
                "users": user_completions(&project, &users),
                "recent": recent_completions(&project),
                "manDays": project
                    .process_time
                    .as_ref()
                    .map(|process_time| man_days(process_time, Utc::now())),
            });
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

fn read_text(path: &Path) -> Result<String, Box<dyn Error>> {
    std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read `{}`: {err}", path.display()).into())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
