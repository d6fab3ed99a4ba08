use rayon::prelude::*;
use serde::Serialize;

use crate::combat::{Battle, BattleConfig, CharacterDefinition, CombatError, Rng, Verdict};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleSummary {
    pub iterations: usize,
    pub victories: usize,
    pub defeats: usize,
    pub win_rate: f64,
    pub avg_rounds: f64,
    pub seed: u64,
}

/// Replay the same rosters `iterations` times, battle `i` seeded with
/// `seed + i`, and aggregate the verdicts.
pub fn run_battles(
    player: &[CharacterDefinition],
    enemy: &[CharacterDefinition],
    iterations: usize,
    seed: u64,
    config: &BattleConfig,
) -> Result<BattleSummary, CombatError> {
    run_battles_with_parallelism(player, enemy, iterations, seed, config, false)
}

/// Like [run_battles] but distributes iterations across all CPU cores via Rayon.
/// Per-iteration seeding keeps the summary identical to the sequential run.
pub fn run_battles_parallel(
    player: &[CharacterDefinition],
    enemy: &[CharacterDefinition],
    iterations: usize,
    seed: u64,
    config: &BattleConfig,
) -> Result<BattleSummary, CombatError> {
    run_battles_with_parallelism(player, enemy, iterations, seed, config, true)
}

fn run_battles_with_parallelism(
    player: &[CharacterDefinition],
    enemy: &[CharacterDefinition],
    iterations: usize,
    seed: u64,
    config: &BattleConfig,
    parallel: bool,
) -> Result<BattleSummary, CombatError> {
    // Derive once; every iteration starts from a clone of the fresh battle.
    let template = Battle::new(player, enemy)?;

    let run_one = |iteration: usize| -> Result<(Verdict, u32), CombatError> {
        let mut rng = Rng::new(seed.wrapping_add(iteration as u64));
        let outcome = template.clone().run(&mut rng, config)?;
        Ok((outcome.result, outcome.rounds))
    };

    let results: Vec<(Verdict, u32)> = if parallel {
        (0..iterations).into_par_iter().map(run_one).collect::<Result<_, _>>()?
    } else {
        (0..iterations).map(run_one).collect::<Result<_, _>>()?
    };

    let victories = results.iter().filter(|(v, _)| *v == Verdict::Victory).count();
    let defeats = results.iter().filter(|(v, _)| *v == Verdict::Defeat).count();
    let total_rounds: u64 = results.iter().map(|(_, rounds)| u64::from(*rounds)).sum();

    let (win_rate, avg_rounds) = if iterations == 0 {
        (0.0, 0.0)
    } else {
        (
            victories as f64 / iterations as f64,
            total_rounds as f64 / iterations as f64,
        )
    };

    Ok(BattleSummary {
        iterations,
        victories,
        defeats,
        win_rate,
        avg_rounds,
        seed,
    })
}
