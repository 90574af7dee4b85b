//! shopodds CLI - Command-line interface for the shop cost model
//!
//! This binary is a thin harness over the engine and advisor: it parses
//! arguments, optionally loads a constants table from JSON, and prints plain
//! text. Logs go to stderr; results go to stdout.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use shopodds_advisor::{advise, level_table, probability_curves, reference_table, Decision, Situation};
use shopodds_engine::expectation::expected_draws;
use shopodds_engine::{
    expected_currency, simulate, upgrade_cost, AcquisitionState, GameConstants, Level,
    PoolDepletion, SimConfig, Tier,
};
use tracing::{debug, Level as LogLevel};

/// Parsed command line.
#[derive(Debug, Default)]
struct Options {
    command: Option<String>,
    positional: Vec<String>,
    constants: Option<PathBuf>,
    seed: Option<u64>,
    trials: Option<u32>,
    max_currency: Option<u32>,
    step: Option<u32>,
    on_hit: bool,
    xp: Option<i64>,
    gold: Option<u32>,
    verbosity: u8,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut opts = Options::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let mut value = |name: &str| {
                iter.next()
                    .cloned()
                    .with_context(|| format!("{} needs a value", name))
            };
            match arg.as_str() {
                "--constants" => opts.constants = Some(PathBuf::from(value("--constants")?)),
                "--seed" => opts.seed = Some(parse_num(&value("--seed")?, "--seed")?),
                "--trials" => opts.trials = Some(parse_num(&value("--trials")?, "--trials")?),
                "--max" => opts.max_currency = Some(parse_num(&value("--max")?, "--max")?),
                "--step" => opts.step = Some(parse_num(&value("--step")?, "--step")?),
                "--xp" => opts.xp = Some(parse_num(&value("--xp")?, "--xp")?),
                "--gold" => opts.gold = Some(parse_num(&value("--gold")?, "--gold")?),
                "--on-hit" => opts.on_hit = true,
                "-v" => opts.verbosity = opts.verbosity.max(1),
                "-vv" => opts.verbosity = 2,
                flag if flag.starts_with("--") => bail!("unknown flag {}", flag),
                _ if opts.command.is_none() => opts.command = Some(arg.clone()),
                _ => opts.positional.push(arg.clone()),
            }
        }
        Ok(opts)
    }

    fn sim_config(&self) -> SimConfig {
        let defaults = SimConfig::default();
        SimConfig {
            max_currency: self.max_currency.unwrap_or(defaults.max_currency),
            currency_step: self.step.unwrap_or(defaults.currency_step),
            trials_per_point: self.trials.unwrap_or(defaults.trials_per_point),
            seed: self.seed,
            depletion: if self.on_hit {
                PoolDepletion::OnHit
            } else {
                PoolDepletion::EveryDraw
            },
        }
    }
}

fn parse_num<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("{} must be a non-negative integer, got {:?}", what, raw))
}

/// `<level> <tier> <owned> <outside> <outside_other> [target]`
struct Spot {
    level: Level,
    tier: Tier,
    state: AcquisitionState,
}

impl Spot {
    fn parse(positional: &[String]) -> Result<Self> {
        if positional.len() < 5 {
            bail!("expected <level> <tier> <owned> <outside> <outside_other> [target]");
        }
        let level = Level::new(parse_num(&positional[0], "level")?)?;
        let tier = Tier::new(parse_num(&positional[1], "tier")?)?;
        let owned = parse_num(&positional[2], "owned")?;
        let outside = parse_num(&positional[3], "outside")?;
        let outside_other = parse_num(&positional[4], "outside_other")?;
        let mut state = AcquisitionState::three_star(owned, outside, outside_other);
        if let Some(raw) = positional.get(5) {
            state = state.with_target(parse_num(raw, "target")?);
        }
        Ok(Spot { level, tier, state })
    }
}

fn init_logging(verbosity: u8) -> Result<()> {
    let max_level = match verbosity {
        0 => LogLevel::WARN,
        1 => LogLevel::DEBUG,
        _ => LogLevel::TRACE,
    };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

fn load_constants(path: Option<&PathBuf>) -> Result<GameConstants> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading constants from {}", path.display()))?;
            let constants: GameConstants = serde_json::from_str(&raw)
                .with_context(|| format!("parsing constants from {}", path.display()))?;
            debug!(path = %path.display(), "loaded custom constants");
            Ok(constants)
        }
        None => Ok(GameConstants::standard().clone()),
    }
}

fn print_usage() {
    println!("shopodds CLI v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage:");
    println!("  shopodds table");
    println!("  shopodds expect   <level> <tier> <owned> <outside> <outside_other> [target]");
    println!("  shopodds simulate <level> <tier> <owned> <outside> <outside_other> [target]");
    println!("  shopodds advise   <level> <tier> <owned> <outside> <outside_other>");
    println!("  shopodds upgrade  <xp_remaining>");
    println!();
    println!("Options:");
    println!("  --constants <file.json>  Use a custom constants table");
    println!("  --max <currency>         Largest currency on the curve (default 100)");
    println!("  --step <currency>        Curve spacing (default 2)");
    println!("  --trials <n>             Trials per point (default 1000)");
    println!("  --seed <n>               Fixed random seed");
    println!("  --on-hit                 Only hits shrink the pool (closed-form model)");
    println!("  --xp <n>                 Experience still needed (advise)");
    println!("  --gold <n>               Gold on hand (advise)");
    println!("  -v, -vv                  Debug / trace logging on stderr");
    println!();
    println!("Examples:");
    println!("  shopodds expect 8 4 7 0 42        # three-star cost, 7 owned");
    println!("  shopodds simulate 8 4 7 0 42 9 --max 300 --seed 1");
    println!("  shopodds advise 7 3 4 1 10 --gold 60");
}

fn print_table(constants: &GameConstants) {
    print!("{:>4} {:>6}", "tier", "total");
    for level in Level::all() {
        print!(" {:>5}", format!("Lv{}", level));
    }
    println!();
    for row in reference_table(constants) {
        print!("{:>4} {:>6}", row.tier, row.total_copies);
        for pct in &row.drop_percent {
            print!(" {:>4.0}%", pct);
        }
        println!();
    }
    println!();
    println!("{:>5} {:>6} {:>6}", "level", "xp", "gold");
    for row in level_table(constants) {
        println!("{:>5} {:>6} {:>6}", row.level, row.xp_to_next, row.upgrade_cost);
    }
}

fn run(opts: &Options) -> Result<()> {
    let constants = load_constants(opts.constants.as_ref())?;

    match opts.command.as_deref() {
        Some("table") => print_table(&constants),
        Some("expect") => {
            let spot = Spot::parse(&opts.positional)?;
            let cost = expected_currency(&constants, spot.level, spot.tier, &spot.state);
            let draws = expected_draws(&constants, spot.level, spot.tier, &spot.state);
            println!("Target: {} copies", spot.state.target_copies);
            match draws {
                Some(draws) => println!("Expected draws: {:.2}", draws),
                None => println!("Expected draws: unreachable"),
            }
            println!("Expected gold: {}", cost);
        }
        Some("simulate") => {
            let spot = Spot::parse(&opts.positional)?;
            let config = opts.sim_config();
            let curve = simulate(&constants, spot.level, spot.tier, &spot.state, &config)?;
            println!("{:>6} {:>8}", "gold", "percent");
            for point in curve.iter() {
                println!("{:>6} {:>7.1}%", point.currency, point.probability_percent);
            }
            match curve.crossing(50.0) {
                Some(gold) => println!("50% reached at {} gold", gold),
                None => println!("50% not reached within {} gold", config.max_currency),
            }
        }
        Some("advise") => {
            let spot = Spot::parse(&opts.positional)?;
            let mut situation = Situation::at_level_start(
                &constants,
                spot.level,
                spot.tier,
                spot.state.owned,
                spot.state.outside,
                spot.state.outside_other,
                opts.gold.unwrap_or(0),
            );
            if let Some(xp) = opts.xp {
                situation.xp_remaining = xp;
            }
            let advice = advise(&constants, &situation);
            println!("2★ now:          {}", advice.two_star);
            println!("3★ now:          {}", advice.three_star);
            println!("3★ next level:   {}", advice.next_level_three_star);
            println!("Upgrade cost:    {}", advice.upgrade_cost);
            println!("Total if level:  {}", advice.total_if_upgrade);
            let decision = match advice.decision {
                Decision::StayAndRoll => "stay and roll",
                Decision::LevelUp => "level up",
            };
            println!("Decision:        {}", decision);
            println!(
                "Gold {} enough:  {}",
                situation.gold,
                if advice.affordable { "yes" } else { "no" }
            );

            let curves = probability_curves(&constants, &situation, &opts.sim_config())?;
            let fmt_crossing = |gold: Option<u32>| match gold {
                Some(gold) => gold.to_string(),
                None => "-".to_string(),
            };
            println!("50% for 3★ at:   {}", fmt_crossing(curves.three_star.crossing(50.0)));
            println!("50% for 2★ at:   {}", fmt_crossing(curves.two_star.crossing(50.0)));
        }
        Some("upgrade") => {
            let raw = opts
                .positional
                .first()
                .context("expected <xp_remaining>")?;
            let xp: i64 = raw
                .parse()
                .with_context(|| format!("xp_remaining must be an integer, got {:?}", raw))?;
            println!("Upgrade cost: {}", upgrade_cost(xp));
        }
        Some(other) => bail!("unknown command {:?}", other),
        None => print_usage(),
    }

    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let opts = match Options::parse(&args) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(err) = init_logging(opts.verbosity) {
        eprintln!("Error: {:#}", err);
    }

    if let Err(err) = run(&opts) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_command_flags_and_positionals() {
        let opts = Options::parse(&args(&[
            "simulate", "8", "4", "7", "0", "42", "--seed", "5", "--on-hit", "--max", "300",
        ]))
        .unwrap();
        assert_eq!(opts.command.as_deref(), Some("simulate"));
        assert_eq!(opts.positional, args(&["8", "4", "7", "0", "42"]));
        let config = opts.sim_config();
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.max_currency, 300);
        assert_eq!(config.currency_step, 2);
        assert_eq!(config.depletion, PoolDepletion::OnHit);
    }

    #[test]
    fn test_parse_rejects_unknown_and_missing_values() {
        assert!(Options::parse(&args(&["table", "--bogus"])).is_err());
        assert!(Options::parse(&args(&["simulate", "--seed"])).is_err());
        assert!(Options::parse(&args(&["simulate", "--seed", "abc"])).is_err());
    }

    #[test]
    fn test_spot_validates_level_and_tier() {
        let spot = Spot::parse(&args(&["1", "1", "0", "0", "0", "3"])).unwrap();
        assert_eq!(spot.state.target_copies, 3);
        assert!(Spot::parse(&args(&["11", "1", "0", "0", "0"])).is_err());
        assert!(Spot::parse(&args(&["5", "6", "0", "0", "0"])).is_err());
        assert!(Spot::parse(&args(&["5", "2", "-1", "0", "0"])).is_err());
        assert!(Spot::parse(&args(&["5", "2", "0"])).is_err());
    }

    #[test]
    fn test_default_constants_are_standard() {
        let constants = load_constants(None).unwrap();
        assert_eq!(&constants, GameConstants::standard());
    }
}
