//! `annuity` - annuity schedules from the command line.
//!
//! # Commands
//!
//! - `annuity schedule` - print the payment schedule, optionally with a prepayment
//! - `annuity payment` - print the fixed monthly payment

mod output;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use annuity_schedule::{
    CalculationRequest, CalculatorConfig, LoanTerms, LogLevel, PrepaymentEvent,
    PrepaymentStrategy, ScheduleGenerator, ScheduleSummary, compute_payment,
};

use output::OutputFormat;

/// Annuity loan schedules with a single partial prepayment
#[derive(Parser)]
#[command(name = "annuity", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the maximum number of generated periods
    #[arg(long, global = true)]
    max_periods: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the payment schedule
    Schedule(ScheduleArgs),
    /// Calculate the fixed monthly payment
    Payment(LoanArgs),
}

#[derive(Args, Debug)]
struct LoanArgs {
    /// Loan amount
    #[arg(short, long, default_value_t = dec!(2_000_000))]
    principal: Decimal,

    /// Nominal annual rate in percent
    #[arg(short, long, default_value_t = dec!(14.0))]
    rate: Decimal,

    /// Term in months
    #[arg(short, long, default_value_t = 36)]
    term: u32,
}

impl LoanArgs {
    fn terms(&self) -> LoanTerms {
        LoanTerms {
            principal: self.principal,
            annual_rate_percent: self.rate,
            term_periods: self.term,
        }
    }
}

#[derive(Args, Debug)]
struct ScheduleArgs {
    #[command(flatten)]
    loan: LoanArgs,

    /// Month of the prepayment (0 for none)
    #[arg(long, default_value_t = 0)]
    prepay_period: u32,

    /// Prepayment amount
    #[arg(long, default_value_t = Decimal::ZERO)]
    prepay_amount: Decimal,

    /// What the prepayment reduces
    #[arg(long, value_enum, default_value_t = StrategyArg::ReduceTerm)]
    strategy: StrategyArg,

    /// Read the whole request from a JSON file instead of flags
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    ReduceTerm,
    ReducePayment,
}

impl From<StrategyArg> for PrepaymentStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::ReduceTerm => PrepaymentStrategy::ReduceTerm,
            StrategyArg::ReducePayment => PrepaymentStrategy::ReducePayment,
        }
    }
}

impl ScheduleArgs {
    fn request(&self) -> Result<CalculationRequest> {
        if let Some(path) = &self.input {
            return read_request(path);
        }

        let prepayment = (self.prepay_period > 0).then(|| PrepaymentEvent {
            trigger_period: self.prepay_period,
            amount: self.prepay_amount,
            strategy: self.strategy.into(),
        });

        Ok(CalculationRequest {
            terms: self.loan.terms(),
            prepayment,
        })
    }
}

fn read_request(path: &Path) -> Result<CalculationRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid request in {}", path.display()))
}

fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_schedule(args: &ScheduleArgs, config: &CalculatorConfig) -> Result<()> {
    let request = args.request()?;

    if let Some(event) = &request.prepayment {
        if event.trigger_period > request.terms.term_periods {
            warn!(
                trigger_period = event.trigger_period,
                term_periods = request.terms.term_periods,
                "prepayment period is beyond the loan term and will be ignored"
            );
        }
    }

    let generator = ScheduleGenerator::new(config.limits());
    let schedule = generator.generate(&request.terms, request.prepayment.as_ref())?;
    let summary = ScheduleSummary::from_schedule(&schedule);

    info!(
        periods = summary.period_count,
        total_paid = %summary.total_paid,
        total_interest = %summary.total_interest,
        "schedule generated"
    );

    output::write_report(&args.output, &summary, &schedule)
}

fn run_payment(args: &LoanArgs) -> Result<()> {
    let payment = compute_payment(args.principal, args.rate, args.term)?;
    println!("{}", output::format_money(payment));
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = CalculatorConfig::load(cli.config.as_deref())?;
    if let Some(max_periods) = cli.max_periods {
        config.max_periods = max_periods;
        config.validate()?;
    }
    if cli.verbose {
        config.log_level = LogLevel::Debug;
    }

    init_tracing(config.log_level);
    debug!(?config, "configuration loaded");

    match &cli.command {
        Commands::Schedule(args) => run_schedule(args, &config),
        Commands::Payment(args) => run_payment(args),
    }
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
