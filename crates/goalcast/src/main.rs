use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args as ClapArgs, Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use goalcast::{OutputFormat, PlanFile, init_logging, render_assumptions, render_response};
use goalcast_core::validation::validate_overrides;
use goalcast_core::{
    AssumptionOverrides, AssumptionsStore, Clock, NullCache, ProjectionService, SystemClock,
    UserId,
};

#[derive(Parser, Debug)]
#[command(name = "goalcast")]
#[command(about = "Monte Carlo projections for household savings goals")]
struct Args {
    /// Path to the data directory (default: ~/.goalcast/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Plan file (default: <data-dir>/plan.yaml)
    #[arg(short, long, global = true)]
    plan: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project the stored plan
    ///
    /// Each invocation loads the plan afresh, so there is no earlier result
    /// to reuse and every run recomputes.
    Run {
        #[arg(short, long)]
        user: String,
    },
    /// Project with temporary assumption overrides; nothing is stored
    Scenario {
        #[arg(short, long)]
        user: String,

        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Show the stored assumptions, creating defaults if absent
    Assumptions {
        #[arg(short, long)]
        user: String,
    },
}

#[derive(ClapArgs, Debug)]
struct OverrideArgs {
    #[arg(long)]
    age: Option<u8>,

    /// Annual income growth, percent
    #[arg(long)]
    income_growth: Option<f64>,

    /// Expected investment return, percent
    #[arg(long)]
    investment_return: Option<f64>,

    /// Inflation rate, percent
    #[arg(long)]
    inflation: Option<f64>,

    #[arg(long)]
    monthly_investment: Option<u64>,

    /// Number of trials (100, 500 or 1000)
    #[arg(long)]
    trials: Option<u32>,
}

impl From<OverrideArgs> for AssumptionOverrides {
    fn from(args: OverrideArgs) -> Self {
        AssumptionOverrides {
            age: args.age,
            annual_income_growth: args.income_growth,
            investment_return: args.investment_return,
            inflation_rate: args.inflation,
            monthly_investment: args.monthly_investment,
            simulation_trials: args.trials,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".goalcast")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level, args.log_file.as_deref())?;

    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);
    let plan_path = args.plan.unwrap_or_else(|| data_dir.join("plan.yaml"));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let workspace = PlanFile::load(&plan_path)
        .and_then(|plan| plan.into_workspace(clock.clone()))
        .wrap_err_with(|| format!("Failed to load plan {}", plan_path.display()))?;

    let service = ProjectionService::new(
        workspace.assumptions.clone(),
        workspace.goals.clone(),
        workspace.engine.clone(),
    )
    .with_clock(clock)
    .with_cache(Arc::new(NullCache));

    let output = match args.command {
        Command::Run { user } => {
            let response = service
                .run_simulation(&UserId::new(user), false)
                .wrap_err("Failed to run simulation")?;
            render_response(&response, args.format)?
        }
        Command::Scenario { user, overrides } => {
            let overrides = AssumptionOverrides::from(overrides);
            validate_overrides(&overrides).map_err(|e| eyre!(e))?;
            let response = service
                .run_scenario(&UserId::new(user), &overrides)
                .wrap_err("Failed to run scenario")?;
            render_response(&response, args.format)?
        }
        Command::Assumptions { user } => {
            let user = UserId::new(user);
            let assumptions = match workspace.assumptions.get_assumptions(&user)? {
                Some(row) => row,
                None => workspace.assumptions.create_default_assumptions(&user)?,
            };
            render_assumptions(&assumptions, args.format)?
        }
    };

    println!("{output}");
    Ok(())
}
