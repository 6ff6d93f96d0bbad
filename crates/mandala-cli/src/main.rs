mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::complete::CompleteSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mandala",
    about = "14-step mandala goal planner — one plan record per owner and year",
    version,
    propagate_version = true
)]
struct Cli {
    /// Plan root (default: auto-detect from .mandala/ or .git/)
    #[arg(long, global = true, env = "MANDALA_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the plan store in the current project
    Init,

    /// Create the plan record for an owner and year (idempotent)
    Create {
        owner: String,
        year: i32,
        /// Consent to marketing use of the plan content
        #[arg(long)]
        consent: bool,
    },

    /// Show one plan record, or all years for an owner
    Show { owner: String, year: Option<i32> },

    /// Evaluate whether a step is reachable right now
    Access {
        owner: String,
        year: i32,
        step: u32,
        /// Account role (standard or reviewer)
        #[arg(long)]
        role: Option<String>,
    },

    /// Complete a wizard step
    Complete {
        #[command(subcommand)]
        subcommand: CompleteSubcommand,
    },

    /// Free-edit the chart after the guided steps
    Edit {
        owner: String,
        year: i32,
        /// Replace the center goal
        #[arg(long)]
        center_goal: Option<String>,
        /// Replace all eight sub-goals (repeat eight times)
        #[arg(long = "sub-goal")]
        sub_goals: Vec<String>,
        /// Sub-goal index whose action plans are replaced (with --plan)
        #[arg(long)]
        plan_index: Option<u8>,
        /// Replacement action-plan entry (repeat eight times)
        #[arg(long = "plan")]
        plans: Vec<String>,
    },

    /// Generate the AI summary report and complete step 14
    Report {
        owner: String,
        year: i32,
        #[arg(long)]
        role: Option<String>,
    },

    /// Export the chart as CSV
    Export {
        owner: String,
        year: i32,
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Launch the HTTP API server
    Ui {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "0")]
        port: u16,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Ui { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root_path = cli.root.as_deref();
    let root = root::resolve_root(root_path);

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Create {
            owner,
            year,
            consent,
        } => cmd::plan::create(&root, &owner, year, consent, cli.json),
        Commands::Show { owner, year } => cmd::plan::show(&root, &owner, year, cli.json),
        Commands::Access {
            owner,
            year,
            step,
            role,
        } => cmd::access::run(&root, &owner, year, step, role.as_deref(), cli.json),
        Commands::Complete { subcommand } => cmd::complete::run(&root, subcommand, cli.json),
        Commands::Edit {
            owner,
            year,
            center_goal,
            sub_goals,
            plan_index,
            plans,
        } => cmd::edit::run(
            &root,
            &owner,
            year,
            center_goal,
            sub_goals,
            plan_index,
            plans,
            cli.json,
        ),
        Commands::Report { owner, year, role } => {
            cmd::report::run(&root, &owner, year, role.as_deref(), cli.json)
        }
        Commands::Export { owner, year, out } => {
            cmd::export::run(&root, &owner, year, out.as_deref())
        }
        Commands::Ui { port, no_open } => cmd::ui::run(&root, port, no_open),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
