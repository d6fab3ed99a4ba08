use std::fmt::Write as _;
use std::path::PathBuf;

use crate::combat::{
    derive_battle_stats, entropy_seed, export_events_csv, simulate_battle_with_config, Rng, Side,
};
use crate::config::AppConfig;
use crate::data::{load_roster, write_battle_log, RosterFile};
use crate::parallel::{run_battles_parallel, WorkerPool};
use crate::server;

const USAGE: &str = "usage: skirmish <serve|simulate|sweep|validate>";
const DEFAULT_SWEEP_ITERATIONS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Simulate,
    Sweep,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("simulate") => Some(Command::Simulate),
        Some("sweep") => Some(Command::Sweep),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return 1;
        }
    };

    let invocation = Invocation::parse(&args[2..]);
    match command {
        Command::Serve => handle_serve(config),
        Command::Simulate => handle_simulate(&invocation, config),
        Command::Sweep => handle_sweep(&invocation, config),
        Command::Validate => handle_validate(&invocation),
    }
}

/// Positional arguments plus the flags any subcommand may take.
#[derive(Debug, Default)]
struct Invocation {
    positional: Vec<String>,
    csv: bool,
    log_dir: Option<PathBuf>,
    workers: Option<String>,
}

impl Invocation {
    fn parse(args: &[String]) -> Self {
        let mut invocation = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--csv" => invocation.csv = true,
                "--log-dir" => invocation.log_dir = iter.next().map(PathBuf::from),
                "--workers" => invocation.workers = iter.next().cloned(),
                _ => invocation.positional.push(arg.clone()),
            }
        }
        invocation
    }

    fn arg(&self, index: usize) -> Option<&String> {
        self.positional.get(index)
    }
}

fn handle_serve(config: AppConfig) -> i32 {
    match server::run_server(config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn load_roster_arg(invocation: &Invocation, usage: &str) -> Result<RosterFile, i32> {
    let Some(path) = invocation.arg(0) else {
        eprintln!("{usage}");
        return Err(2);
    };
    load_roster(path).map_err(|err| {
        eprintln!("roster error: {err}");
        1
    })
}

fn handle_simulate(invocation: &Invocation, config: AppConfig) -> i32 {
    let roster = match load_roster_arg(
        invocation,
        "usage: skirmish simulate <roster> [seed] [--csv] [--log-dir DIR]",
    ) {
        Ok(roster) => roster,
        Err(code) => return code,
    };
    let seed = invocation
        .arg(1)
        .map(|raw| parse_u64_arg(Some(raw), "seed", 0))
        .unwrap_or_else(entropy_seed);

    let mut rng = Rng::new(seed);
    let outcome = match simulate_battle_with_config(
        &roster.player,
        &roster.enemy,
        &mut rng,
        &config.battle_config(),
    ) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("battle failed: {err}");
            return 1;
        }
    };
    tracing::info!(seed, result = %outcome.result, rounds = outcome.rounds, "battle resolved");

    if let Some(dir) = invocation.log_dir.as_deref().or(config.log_dir.as_deref()) {
        match write_battle_log(dir, &outcome) {
            Ok(path) => eprintln!("battle log written to {}", path.display()),
            Err(err) => {
                eprintln!("log sink error: {err}");
                return 1;
            }
        }
    }

    if invocation.csv {
        match export_events_csv(&outcome.events) {
            Ok(csv) => print!("{csv}"),
            Err(err) => {
                eprintln!("failed to export battle events: {err}");
                return 1;
            }
        }
    } else {
        let payload = serde_json::json!({
            "log": outcome.log,
            "result": outcome.result,
            "rounds": outcome.rounds,
            "seed": seed,
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(payload) => println!("{payload}"),
            Err(err) => {
                eprintln!("failed to serialize battle outcome: {err}");
                return 1;
            }
        }
    }

    0
}

fn handle_sweep(invocation: &Invocation, config: AppConfig) -> i32 {
    let roster = match load_roster_arg(
        invocation,
        "usage: skirmish sweep <roster> [iterations] [seed] [--workers N]",
    ) {
        Ok(roster) => roster,
        Err(code) => return code,
    };
    let iterations = parse_u32_arg(invocation.arg(1), "iterations", DEFAULT_SWEEP_ITERATIONS);
    let seed = invocation
        .arg(2)
        .map(|raw| parse_u64_arg(Some(raw), "seed", 0))
        .unwrap_or_else(entropy_seed);
    let pool = WorkerPool::with_workers(parse_u32_arg(invocation.workers.as_ref(), "workers", 0) as usize);

    let battle_config = config.battle_config();
    let summary = pool.install(|| {
        run_battles_parallel(
            &roster.player,
            &roster.enemy,
            iterations as usize,
            seed,
            &battle_config,
        )
    });

    match summary {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(payload) => {
                println!("{payload}");
                0
            }
            Err(err) => {
                eprintln!("failed to serialize sweep summary: {err}");
                1
            }
        },
        Err(err) => {
            eprintln!("sweep failed: {err}");
            1
        }
    }
}

fn handle_validate(invocation: &Invocation) -> i32 {
    let roster = match load_roster_arg(invocation, "usage: skirmish validate <roster>") {
        Ok(roster) => roster,
        Err(code) => return code,
    };

    let mut issues = Vec::new();
    for (side, party) in [(Side::Player, &roster.player), (Side::Enemy, &roster.enemy)] {
        if party.is_empty() {
            issues.push(format!("{side} party is empty"));
        }
        for definition in party {
            if let Err(err) = definition.validate() {
                issues.push(err.to_string());
            }
        }
    }

    if !issues.is_empty() {
        eprintln!("validation failed: {} issue(s)", issues.len());
        for issue in issues {
            eprintln!("- {issue}");
        }
        return 1;
    }

    let path = invocation.arg(0).map(String::as_str).unwrap_or_default();
    println!("validation passed: {path}");
    for (side, party) in [(Side::Player, &roster.player), (Side::Enemy, &roster.enemy)] {
        let mut line = format!("{side}:");
        for definition in party {
            let combatant = derive_battle_stats(definition, side);
            let stats = &combatant.battle_stats;
            let _ = write!(
                &mut line,
                " {} ({} {} L{}, hp {}, spd {})",
                combatant.name,
                definition.rarity.as_str(),
                definition.class.as_str(),
                definition.level,
                stats.max_hp,
                stats.spd
            );
        }
        println!("{line}");
    }
    0
}

fn parse_u32_arg(raw: Option<&String>, name: &str, default: u32) -> u32 {
    raw.and_then(|value| value.parse::<u32>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

fn parse_u64_arg(raw: Option<&String>, name: &str, default: u64) -> u64 {
    raw.and_then(|value| value.parse::<u64>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}
