use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use relo_core::calculations::{ComparisonEngine, ComparisonRequest, CostConfig};
use relo_core::models::{FilingStatus, HouseholdType, HousingType};
use relo_data::{DataSources, ReferenceDataProvider};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Relocation comparison between a current position and an offer.
///
/// Loads the reference tables, analyzes the origin and destination
/// cities, and prints the full comparison as JSON.
#[derive(Debug, Parser)]
#[command(name = "relo-compare")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the jurisdiction tax table (JSON).
    #[arg(long)]
    tax_table: PathBuf,

    /// Path to the city cost table (CSV).
    #[arg(long)]
    cities: PathBuf,

    /// Path to the market metrics file (JSON), if available.
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Current city, as a slug or free-form name (e.g. `austin-tx`).
    #[arg(long)]
    origin: String,

    /// Offer city.
    #[arg(long)]
    destination: String,

    /// Current annual gross salary.
    #[arg(long)]
    current_salary: Decimal,

    /// Offered annual gross salary.
    #[arg(long)]
    offer_salary: Decimal,

    /// Household type: `single` or `family`.
    #[arg(long, default_value = "single")]
    household: String,

    /// Housing situation: `rent`, `own`, or `parents`.
    #[arg(long, default_value = "rent")]
    housing: String,

    /// File taxes jointly regardless of household type.
    #[arg(long, default_value_t = false)]
    married: bool,

    /// Retirement contribution rate override, as a fraction of salary.
    #[arg(long)]
    retirement_rate: Option<Decimal>,

    /// Monthly health insurance override.
    #[arg(long)]
    insurance: Option<Decimal>,

    /// Annual pre-tax deductions such as HSA contributions.
    #[arg(long, default_value = "0")]
    pretax_deductions: Decimal,

    /// Recurring monthly debt payments (loans, childcare).
    #[arg(long, default_value = "0")]
    monthly_debt: Decimal,

    /// Monthly side income expected after the move.
    #[arg(long, default_value = "0")]
    side_income: Decimal,

    /// Extra monthly spending leaks expected after the move.
    #[arg(long, default_value = "0")]
    extra_leaks: Decimal,

    /// The offer is fully remote.
    #[arg(long, default_value_t = false)]
    remote: bool,

    /// No car will be kept after the move.
    #[arg(long, default_value_t = false)]
    no_car: bool,

    /// One-time signing bonus on the offer.
    #[arg(long, default_value = "0")]
    signing_bonus: Decimal,

    /// Expected annual equity value on the offer.
    #[arg(long, default_value = "0")]
    equity: Decimal,

    /// Confidence multiplier applied to the equity value.
    #[arg(long, default_value = "1")]
    equity_multiplier: Decimal,

    /// Annual RSU vesting value on the offer.
    #[arg(long, default_value = "0")]
    rsu: Decimal,

    /// One-way commute in minutes at the destination.
    #[arg(long, default_value = "0")]
    commute_minutes: Decimal,

    /// The offer includes a premium benefits package.
    #[arg(long, default_value_t = false)]
    premium_benefits: bool,
}

fn parse_household(value: &str) -> Result<HouseholdType> {
    match value.to_ascii_lowercase().as_str() {
        "single" => Ok(HouseholdType::Single),
        "family" => Ok(HouseholdType::Family),
        other => bail!("Unknown household type: {other} (expected single or family)"),
    }
}

fn parse_housing(value: &str) -> Result<HousingType> {
    match value.to_ascii_lowercase().as_str() {
        "rent" => Ok(HousingType::Rent),
        "own" => Ok(HousingType::Own),
        "parents" => Ok(HousingType::Parents),
        other => bail!("Unknown housing type: {other} (expected rent, own, or parents)"),
    }
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let household = parse_household(&cli.household)?;
    let housing = parse_housing(&cli.housing)?;

    let provider = ReferenceDataProvider::load(DataSources {
        tax_table: cli.tax_table,
        cities: cli.cities,
        metrics: cli.metrics,
    })
    .context("Failed to load reference data")?;
    let snapshot = provider.snapshot();

    let origin = snapshot
        .city(&cli.origin)
        .with_context(|| format!("Unknown origin city: {}", cli.origin))?;
    let destination = snapshot
        .city(&cli.destination)
        .with_context(|| format!("Unknown destination city: {}", cli.destination))?;

    debug!("comparing {} to {}", origin.slug, destination.slug);

    let request = ComparisonRequest {
        filing_status: cli.married.then_some(FilingStatus::Married),
        retirement_rate: cli.retirement_rate,
        monthly_insurance: cli.insurance,
        annual_pretax_deductions: cli.pretax_deductions,
        monthly_debt: cli.monthly_debt,
        monthly_side_income: cli.side_income,
        extra_monthly_leaks: cli.extra_leaks,
        is_remote: cli.remote,
        owns_car: !cli.no_car,
        signing_bonus: cli.signing_bonus,
        equity_annual: cli.equity,
        equity_multiplier: cli.equity_multiplier,
        rsu_annual: cli.rsu,
        commute_minutes: cli.commute_minutes,
        premium_benefits: cli.premium_benefits,
        ..ComparisonRequest::new(cli.current_salary, cli.offer_salary, household, housing)
    };

    let engine = ComparisonEngine::new(
        &snapshot.tax,
        snapshot.metrics.as_ref(),
        CostConfig::default(),
    );
    let result = engine
        .compare(origin, destination, &request)
        .context("Comparison failed")?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
