use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::config::GroupingConfig;
use crate::data::import::{import_csv_pair, import_workbook, inspect_workbook, Roster};
use crate::data::validate::validate_inputs;
use crate::grouping::export::{render_table, write_csv};
use crate::grouping::assign;
use crate::logging::init_logging;
use crate::server;

#[derive(Debug, Parser)]
#[command(
    name = "paygroups",
    version,
    about = "Split employees into leader groups under a salary limit"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assign employees from a workbook or CSV files to groups
    Assign(AssignArgs),
    /// Serve the grouping form and JSON API
    Serve(ServeArgs),
    /// Print the sheets and first rows of a workbook
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct AssignArgs {
    /// Workbook with `Employees` (Name, Salary) and `Leaders` (LeaderName) sheets
    #[arg(long, conflicts_with_all = ["employees", "leaders"])]
    pub workbook: Option<PathBuf>,

    /// CSV file with Name and Salary columns
    #[arg(long, requires = "leaders")]
    pub employees: Option<PathBuf>,

    /// CSV file with a LeaderName column
    #[arg(long, requires = "employees")]
    pub leaders: Option<PathBuf>,

    /// Salary limit per group (overrides config)
    #[arg(long)]
    pub limit: Option<u64>,

    /// Required number of leaders (overrides config)
    #[arg(long)]
    pub leader_count: Option<usize>,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Also write `Leader,Employee,Salary` rows to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind, e.g. 127.0.0.1:3000 (overrides config)
    #[arg(long)]
    pub bind: Option<String>,

    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    pub path: PathBuf,

    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub fn run_with_args(args: &[String]) -> i32 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let code = err.exit_code();
            let _ = err.print();
            return code;
        }
    };

    init_logging(cli.verbose);

    let outcome = match cli.command {
        Command::Assign(args) => handle_assign(&args),
        Command::Serve(args) => handle_serve(&args),
        Command::Inspect(args) => handle_inspect(&args),
    };

    match outcome {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err:#}");
            1
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<GroupingConfig> {
    GroupingConfig::load(path).context("failed to load configuration")
}

fn handle_assign(args: &AssignArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(limit) = args.limit {
        config.limit = limit;
    }
    if let Some(leader_count) = args.leader_count {
        config.leader_count = leader_count;
    }
    // File and environment values are only checked once flags have had their say.
    config.validate()?;

    let roster = load_roster(args)?;
    validate_inputs(&roster.employees, &roster.leaders, config.leader_count)?;
    let result = assign(&roster.employees, &roster.leaders, config.limit)?;
    info!(
        groups = result.groups.len(),
        unassigned = result.unassigned.len(),
        "grouping complete"
    );

    match args.format {
        OutputFormat::Table => print!("{}", render_table(&result)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&result).context("failed to serialize grouping result")?
        ),
    }

    if let Some(path) = &args.csv {
        let file = File::create(path)
            .with_context(|| format!("failed to create '{}'", path.display()))?;
        write_csv(&result, BufWriter::new(file))
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        info!(path = %path.display(), "csv written");
    }

    Ok(())
}

fn load_roster(args: &AssignArgs) -> Result<Roster> {
    match (&args.workbook, &args.employees, &args.leaders) {
        (Some(workbook), _, _) => Ok(import_workbook(workbook)?),
        (None, Some(employees), Some(leaders)) => Ok(import_csv_pair(employees, leaders)?),
        _ => bail!("provide --workbook or both --employees and --leaders"),
    }
}

fn handle_serve(args: &ServeArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = &args.bind {
        config.bind_addr = bind.clone();
    }
    config.validate()?;
    server::run_server(&config).with_context(|| format!("server error on {}", config.bind_addr))
}

fn handle_inspect(args: &InspectArgs) -> Result<()> {
    let previews = inspect_workbook(&args.path, args.rows)?;
    println!("Sheets ({}):", previews.len());
    for sheet in previews {
        println!(
            "\n{} ({} rows x {} cols)",
            sheet.name, sheet.height, sheet.width
        );
        for (index, row) in sheet.rows.iter().enumerate() {
            println!("  {}: {}", index + 1, row.join(" | "));
        }
    }
    Ok(())
}
