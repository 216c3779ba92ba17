use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use owner_timeline::{
    load_sales_csv, logging, EngineConfig, OwnerInput, OwnershipEngine, OwnershipReport,
    TokenOrder,
};

#[derive(Parser)]
#[command(name = "owner-timeline", version, about = "Resolve scraped owner strings into an ownership timeline")]
struct Cli {
    /// Engine configuration (JSON); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Source name whose overrides apply (see `sources` in the config)
    #[arg(long, global = true)]
    source: Option<String>,

    /// Token order for person names without a comma
    #[arg(long, global = true, value_enum)]
    token_order: Option<OrderArg>,

    /// Write JSON here instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long, global = true)]
    pretty: bool,

    /// Print the SHA-256 of the compact output to stderr
    #[arg(long, global = true)]
    fingerprint: bool,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve one property from an input JSON object
    Resolve {
        /// `{"raw_owner_lines": [...], "sales_records": [...]}`
        input: PathBuf,

        /// Output key becomes `property_<id>`
        #[arg(long)]
        property_id: String,

        /// Extra sales rows from a `date,grantor,grantee` CSV
        #[arg(long)]
        sales_csv: Option<PathBuf>,
    },

    /// Resolve many properties from `{"<id>": <input>, ...}`
    Batch {
        input: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    FirstLast,
    LastFirst,
}

impl From<OrderArg> for TokenOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::FirstLast => TokenOrder::FirstLast,
            OrderArg::LastFirst => TokenOrder::LastFirst,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let engine = build_engine(&cli)?;

    let report = match &cli.command {
        Command::Resolve {
            input,
            property_id,
            sales_csv,
        } => run_resolve(&engine, input, property_id, sales_csv.as_deref())?,
        Command::Batch { input } => run_batch(&engine, input)?,
    };

    write_report(&cli, &report)?;

    let summary = report.summary();
    eprintln!("✓ {} properties - {}", report.len(), summary.summary());
    if cli.fingerprint {
        eprintln!("🔐 {}", report.fingerprint()?);
    }

    Ok(())
}

fn build_engine(cli: &Cli) -> Result<OwnershipEngine> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    if let Some(source) = &cli.source {
        config = config.for_source(source);
    }
    if let Some(order) = cli.token_order {
        config = config.with_token_order(order.into());
    }

    OwnershipEngine::new(config).context("Failed to build ownership engine")
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
}

fn run_resolve(
    engine: &OwnershipEngine,
    input_path: &Path,
    property_id: &str,
    sales_csv: Option<&Path>,
) -> Result<OwnershipReport> {
    let value = read_json(input_path)?;
    let mut input = OwnerInput::from_value(&value)?;

    if let Some(csv_path) = sales_csv {
        let sales = load_sales_csv(csv_path)?;
        tracing::info!(rows = sales.len(), "loaded sales CSV");
        input.sales_records.extend(sales);
    }

    let ownership = engine.resolve(&input);
    Ok(OwnershipReport::single(property_id, ownership)?)
}

fn run_batch(engine: &OwnershipEngine, input_path: &Path) -> Result<OwnershipReport> {
    let value = read_json(input_path)?;
    let Value::Object(properties) = value else {
        bail!("Batch input must be an object of property id → input");
    };

    // Sorted so logs and failures come out in a stable order
    let properties: BTreeMap<String, Value> = properties.into_iter().collect();

    let mut report = OwnershipReport::new();
    for (property_id, property_input) in &properties {
        let ownership = engine
            .resolve_value(property_input)
            .with_context(|| format!("Property {}: bad input", property_id))?;
        report.insert(property_id, ownership)?;
    }

    Ok(report)
}

fn write_report(cli: &Cli, report: &OwnershipReport) -> Result<()> {
    let json = if cli.pretty {
        report.to_json_pretty()?
    } else {
        report.to_json()?
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write output: {:?}", path))?;
            eprintln!("💾 Wrote {:?}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}
