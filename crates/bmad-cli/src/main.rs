mod cmd;
mod output;
mod prompter;
mod root;
mod templates;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bmad-minimal",
    about = "Install and update the bmad-minimal engineering and planning templates",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace directory (default: current directory)
    #[arg(long, global = true, env = "BMAD_ROOT")]
    root: Option<PathBuf>,

    /// Template package root containing core/, docs/ and templates/
    /// (default: the templates built into this binary)
    #[arg(long, global = true, env = "BMAD_TEMPLATES")]
    templates: Option<PathBuf>,

    /// Answer every question with its default
    #[arg(long, short = 'y', global = true, env = "BMAD_NON_INTERACTIVE")]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install bmad-minimal into the workspace
    Install {
        /// Project name
        #[arg(long, short = 'p')]
        project: Option<String>,
        /// Base directory for bmad-minimal files
        #[arg(long, short = 'd')]
        dir: Option<String>,
    },

    /// Refresh installed templates, keeping config.json
    Update {
        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Copy the base directory aside first and restore it on failure
        #[arg(long)]
        backup: bool,
    },

    /// Bundle agent dependencies and regenerate the cheat sheet
    Build {
        /// Output directory (default: the template root)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Output as JSON
        #[arg(long, short = 'j')]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let mut prompter = prompter::for_mode(cli.yes);
    let templates = cli.templates.as_deref();

    let result = match cli.command {
        Commands::Install { project, dir } => cmd::install::run(
            &root,
            templates,
            prompter.as_mut(),
            cmd::install::InstallOptions { project, dir },
        ),
        Commands::Update { force, backup } => cmd::update::run(
            &root,
            templates,
            prompter.as_mut(),
            cmd::update::UpdateOptions { force, backup },
        ),
        Commands::Build { out, json } => cmd::build::run(templates, out.as_deref(), json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
