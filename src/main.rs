//! Genops CLI - Run population simulations from JSON configuration.

use std::path::PathBuf;
use std::time::Instant;

use genops::{
    compute::{FitnessTournament, Population, similarity},
    schema::{Genome, SimulationConfig},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [ticks]", args[0]);
        eprintln!();
        eprintln!("Run a genome population simulation from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to simulation configuration file");
        eprintln!("  ticks        Number of ticks (default: value in config)");
        eprintln!();
        eprintln!("Example configuration is printed with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let config = SimulationConfig::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });
    let ticks = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.ticks);

    println!("Genops Simulation");
    println!("=================");
    println!("Gene pool: {} genes", config.gene_pool.len());
    println!("Target length: {}", config.target.len());
    println!(
        "Population: min {} / tournament {} / {} ops per tick",
        config.population.min_population_size,
        config.population.tournament_size,
        config.population.operations_per_tick
    );
    println!("Ticks: {}", ticks);
    println!();

    let target: Genome = config.target.clone();
    let tournament = FitnessTournament::new(move |genome: &Genome| similarity(genome, &target));

    let mut population = Population::new(config.population.clone(), &config.gene_pool, tournament)
        .unwrap_or_else(|e| {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        });

    println!("Running simulation...");
    let start = Instant::now();

    let report_every = (ticks / 10).max(1);
    let history = population
        .run_with_callback(ticks, |tick, stats| {
            if (tick + 1) % report_every == 0 {
                let elapsed = start.elapsed().as_secs_f32();
                println!(
                    "  Tick {}/{}: size={}, created={}, deleted={}, mutated={}, crossed={}, similarity={:.3}, {:.1} ticks/s",
                    tick + 1,
                    ticks,
                    stats.population_size,
                    stats.created,
                    stats.deleted,
                    stats.mutated,
                    stats.crossed,
                    stats.similarity,
                    (tick + 1) as f32 / elapsed
                );
            }
        })
        .unwrap_or_else(|e| {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(1);
        });

    let elapsed = start.elapsed();
    let best = population.iter().max_by(|a, b| {
        similarity(a, &config.target).total_cmp(&similarity(b, &config.target))
    });

    println!();
    println!("Final state:");
    println!("  Population: {}", population.len());
    println!("  Created: {}", history.created.iter().sum::<usize>());
    println!("  Deleted: {}", history.deleted.iter().sum::<usize>());
    println!("  Mutated: {}", history.mutated.iter().sum::<usize>());
    println!("  Crossed: {}", history.crossed.iter().sum::<usize>());
    if let Some(best) = best {
        println!(
            "  Best match: {:.4} ({} genes)",
            similarity(best, &config.target),
            best.len()
        );
    }
    println!(
        "Time: {:.2}s ({:.1} ticks/s)",
        elapsed.as_secs_f32(),
        ticks as f32 / elapsed.as_secs_f32()
    );
}

fn print_example_config() {
    let config = SimulationConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
