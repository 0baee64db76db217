//! `tmtime`: ISO 8601 durations, flexible dates and Allen relations from the command line.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tm_temporal::{
    distance, length, relative_position, FlexibleDateParser, Instant, ParseOptions, Period,
    PeriodDuration, TemporalPrimitive,
};

#[derive(Parser)]
#[command(name = "tmtime")]
#[command(version, about = "Temporal computations: durations, flexible dates, Allen relations", long_about = None)]
struct Cli {
    /// IANA timezone for dates written without a UTC offset
    #[arg(long, global = true, default_value = "UTC")]
    timezone: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an ISO 8601 duration (e.g. P1Y2MT30M)
    Duration {
        text: String,
    },
    /// Express a millisecond count as an ISO 8601 duration
    Millis {
        millis: u64,
    },
    /// Parse a human-entered date (23/11/2050, 2050-11, 23 novembre 2050, ...)
    Date {
        text: String,
    },
    /// Allen relation and distance between two operands.
    /// An operand is a date (instant) or `start..end` (period)
    Relate {
        a: String,
        b: String,
    },
    /// Length of a `start..end` period
    Length {
        period: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = ParseOptions::with_timezone_name(&cli.timezone)?;
    let parser = FlexibleDateParser::new(options);
    tracing::debug!(timezone = %cli.timezone, "parser configured");

    match cli.command {
        Commands::Duration { text } => {
            let duration = PeriodDuration::parse(&text)?;
            let output = json!({
                "canonical": duration.to_string(),
                "millis": duration.to_millis(),
                "components": duration,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Millis { millis } => {
            println!("{}", PeriodDuration::from_millis(millis));
        }
        Commands::Date { text } => {
            let dt = parser.parse(&text)?;
            println!("{}", dt.to_rfc3339());
        }
        Commands::Relate { a, b } => {
            let a = parse_operand(&parser, &a)?;
            let b = parse_operand(&parser, &b)?;
            let Some(relation) = relative_position(&a, &b) else {
                bail!("operands are not comparable");
            };
            let gap = distance(&a, &b).context("operands are not comparable")?;
            let output = json!({
                "relation": relation,
                "distance": gap.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Length { period } => {
            let operand = parse_operand(&parser, &period)?;
            if !matches!(operand, TemporalPrimitive::Period(_)) {
                bail!("expected a period written as start..end, got '{period}'");
            }
            let len = length(&operand).context("period has no length")?;
            println!("{len}");
        }
    }

    Ok(())
}

/// `start..end` is a period; anything else is an instant.
fn parse_operand(parser: &FlexibleDateParser, text: &str) -> Result<TemporalPrimitive> {
    match text.split_once("..") {
        Some((start, end)) => {
            let start = parser
                .parse(start)
                .with_context(|| format!("period start '{start}'"))?;
            let end = parser
                .parse(end)
                .with_context(|| format!("period end '{end}'"))?;
            Ok(Period::between(start, end)?.into())
        }
        None => {
            let date = parser
                .parse(text)
                .with_context(|| format!("instant '{text}'"))?;
            Ok(Instant::at(date).into())
        }
    }
}
