use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;

use share_schedule::config::ScheduleConfig;
use share_schedule::events::EventExporter;
use share_schedule::models::{SeasonCalendar, WeekKind, YearSchedule};
use share_schedule::scheduler::{FairnessReport, RebalanceReport, Rebalancer, YearBuilder};
use share_schedule::validation::validate_schedule;

use crate::cli::{CheckArgs, EventsArgs, GenerateArgs, HorizonArgs, ShowArgs, StatsArgs};

/// Loads the configuration file, or the built-in tables.
pub fn load_config(path: Option<&Path>) -> Result<ScheduleConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            ScheduleConfig::from_path(path)
                .with_context(|| format!("failed to load config: {}", path.display()))
        }
        None => Ok(ScheduleConfig::default()),
    }
}

/// Built horizon and, unless skipped, its rebalancing report.
struct Horizon {
    years: Vec<YearSchedule>,
    report: Option<RebalanceReport>,
}

impl Horizon {
    fn build(config: &ScheduleConfig, args: &HorizonArgs) -> Result<Self> {
        if args.years == 0 {
            bail!("--years must be at least 1");
        }
        let mut years = YearBuilder::new(config)
            .build_range(args.from, args.years)
            .context("failed to build schedule")?;
        let report = if args.no_rebalance {
            None
        } else {
            Some(Rebalancer::new(config).rebalance(&mut years))
        };
        Ok(Self { years, report })
    }

    /// `year` as it stands after rebalancing the requested range, or built on
    /// its own when rebalancing is skipped.
    fn select_year(config: &ScheduleConfig, args: &HorizonArgs, year: i32) -> Result<YearSchedule> {
        if args.no_rebalance {
            return YearBuilder::new(config)
                .build(year)
                .with_context(|| format!("failed to build {year}"));
        }
        let last = args.from + args.years as i32 - 1;
        if year < args.from || year > last {
            bail!(
                "year {year} is outside the rebalanced horizon {}..={last}; \
                 pass --from or --no-rebalance",
                args.from
            );
        }
        let horizon = Self::build(config, args)?;
        horizon
            .years
            .into_iter()
            .find(|y| y.year == year)
            .with_context(|| format!("year {year} missing from horizon"))
    }
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn write_json<T: Serialize>(value: &T, path: Option<&PathBuf>) -> Result<()> {
    let mut out = open_output(path)?;
    serde_json::to_writer_pretty(&mut out, value).context("failed to serialize output")?;
    writeln!(out)?;
    out.flush()?;
    if let Some(path) = path {
        info!(path = %path.display(), "wrote output");
    }
    Ok(())
}

/// Print one year grouped by season block.
pub fn show(config: &ScheduleConfig, args: ShowArgs) -> Result<()> {
    let schedule = Horizon::select_year(config, &args.horizon, args.year)?;
    let blocks = SeasonCalendar::new(&config.season).blocks(args.year)?;
    let exporter = EventExporter::new(config);

    println!("Schedule for {}", args.year);
    let mut weeks = schedule.calendar();
    for span in blocks {
        println!();
        println!("{}", span.block.label());
        for week in weeks.by_ref().take(span.weeks) {
            let holiday = week
                .holiday
                .map(|h| format!("  ({h})"))
                .unwrap_or_default();
            println!(
                "  {} to {}  {:<5} {}{}",
                week.start,
                week.end,
                week.kind.as_str(),
                exporter.summary(&week.occupant),
                holiday
            );
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct GenerateOutput<'a> {
    version: &'a str,
    years: &'a [YearSchedule],
    #[serde(skip_serializing_if = "Option::is_none")]
    rebalance: Option<&'a RebalanceReport>,
}

/// Build a horizon of years and write it as JSON.
pub fn generate(config: &ScheduleConfig, args: GenerateArgs) -> Result<()> {
    let horizon = Horizon::build(config, &args.horizon)?;
    let output = GenerateOutput {
        version: &config.version,
        years: &horizon.years,
        rebalance: horizon.report.as_ref(),
    };
    write_json(&output, args.output.as_ref())
}

/// Print per-owner fairness figures for a horizon.
pub fn stats(config: &ScheduleConfig, args: StatsArgs) -> Result<()> {
    let horizon = Horizon::build(config, &args.horizon)?;
    let fairness = FairnessReport::calculate(config, &horizon.years);

    println!(
        "{} years from {}",
        fairness.horizon,
        fairness.first_year.unwrap_or(args.horizon.from)
    );
    println!();
    println!(
        "{:<20} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:>8} {:>9}",
        "owner", "share", "weeks", "cold", "cool", "warm", "hot", "holidays", "deviation"
    );
    for owner in &fairness.owners {
        let kind = |k: WeekKind| owner.kinds.get(&k).copied().unwrap_or(0);
        println!(
            "{:<20} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:>8} {:>9.2}",
            owner.display_name,
            owner.share.to_string(),
            owner.weeks,
            kind(WeekKind::Cold),
            kind(WeekKind::Cool),
            kind(WeekKind::Warm),
            kind(WeekKind::Hot),
            owner.holiday_total(),
            owner.deviation as f64 / 100.0
        );
    }
    println!();
    println!("objective: {:.2}", fairness.objective as f64 / 100.0);
    if let Some(report) = &horizon.report {
        println!(
            "rebalanced: {} swaps in {} passes, {:.2} -> {:.2}{}",
            report.swaps.len(),
            report.passes,
            report.objective_before as f64 / 100.0,
            report.objective_after as f64 / 100.0,
            if report.converged { "" } else { " (pass ceiling hit)" }
        );
    }
    Ok(())
}

/// Write one year's calendar events as JSON.
pub fn events(config: &ScheduleConfig, args: EventsArgs) -> Result<()> {
    let schedule = Horizon::select_year(config, &args.horizon, args.year)?;
    let events = EventExporter::new(config)
        .with_format(args.format)
        .year(&schedule);
    write_json(&events, args.output.as_ref())
}

/// Build and validate a range of years.
pub fn check(config: &ScheduleConfig, args: CheckArgs) -> Result<()> {
    let range = &args.horizon;
    let builder = YearBuilder::new(config);
    let mut years = Vec::with_capacity(range.years);
    let mut failures = 0;

    for year in range.from..range.from + range.years as i32 {
        match builder.build(year) {
            Ok(schedule) => years.push(schedule),
            Err(e) => {
                failures += 1;
                eprintln!("{e}");
            }
        }
    }
    if failures > 0 {
        bail!("{failures} of {} years failed to build", range.years);
    }

    if !range.no_rebalance {
        let report = Rebalancer::new(config).rebalance(&mut years);
        if let Err(errors) = validate_schedule(&years, config) {
            for e in &errors {
                eprintln!("{e}");
            }
            bail!("{} invariant violations after rebalancing", errors.len());
        }
        if !report.converged {
            eprintln!("warning: rebalancing stopped at the pass ceiling");
        }
    }

    println!("{} years ok", years.len());
    Ok(())
}
