use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use gainrange::core::log::init_logging;
use gainrange::core::{FlowTiming, FormFields};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Timing {
    Start,
    Mid,
    End,
    None,
}

impl From<Timing> for FlowTiming {
    fn from(timing: Timing) -> FlowTiming {
        match timing {
            Timing::Start => FlowTiming::Start,
            Timing::Mid => FlowTiming::Mid,
            Timing::End => FlowTiming::End,
            Timing::None => FlowTiming::None,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum YesNo {
    Yes,
    No,
}

/// The calculator fields. Amounts accept `$`, commas and spaces.
#[derive(Args)]
struct FieldArgs {
    /// First day of the period (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    start_date: String,

    /// Last day of the period (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    end_date: String,

    /// Balance at the start of the period
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    begin_balance: String,

    /// Balance at the end of the period
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    end_balance: String,

    /// Net deposits (positive) or withdrawals (negative) during the period
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    net_flow: String,

    /// When the net flow happened
    #[arg(long, value_enum, default_value_t = Timing::Mid)]
    timing: Timing,

    /// Show the annualized (CAGR) rate
    #[arg(long, value_enum, default_value_t = YesNo::Yes)]
    annualize: YesNo,
}

impl From<FieldArgs> for FormFields {
    fn from(args: FieldArgs) -> FormFields {
        FormFields {
            start_date: args.start_date,
            end_date: args.end_date,
            begin_balance: args.begin_balance,
            end_balance: args.end_balance,
            net_flow: args.net_flow,
            flow_timing: args.timing.into(),
            annualize: matches!(args.annualize, YesNo::Yes),
        }
    }
}

impl From<Commands> for gainrange::AppCommand {
    fn from(cmd: Commands) -> gainrange::AppCommand {
        match cmd {
            Commands::Calc { fields, json } => gainrange::AppCommand::Calc {
                fields: fields.into(),
                json,
            },
            Commands::Save { fields } => gainrange::AppCommand::Save {
                fields: fields.into(),
            },
            Commands::Load { fields } => gainrange::AppCommand::Load {
                fields: fields.into(),
            },
            Commands::Clear { purge } => gainrange::AppCommand::Clear { purge },
            Commands::Interactive => gainrange::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Calculate gains for the given fields
    Calc {
        #[command(flatten)]
        fields: FieldArgs,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save the given fields on this device
    Save {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Restore saved fields, falling back to the given ones
    Load {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Reset all fields to their defaults
    Clear {
        /// Also delete the saved values
        #[arg(long)]
        purge: bool,
    },
    /// Edit fields line by line and recalculate after every change
    Interactive,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => gainrange::cli::setup::setup_at_path(path),
            None => gainrange::cli::setup::setup(),
        },
        Some(cmd) => gainrange::run_command(cmd.into(), cli.config_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
