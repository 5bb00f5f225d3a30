//! RCPSP genetic algorithm CLI - Optimize a project instance from JSON.

use std::path::Path;
use std::process;
use std::str::FromStr;

use rcpsp_ga::{
    ga::{GaConfig, GaRunner, GenerationStats},
    project::{generate, load_instance, Project},
    schedule::{decode, Ssgs},
};

const DEFAULT_SEED: u64 = 0;
const DEFAULT_GENERATIONS: usize = 250;
const DEMO_JOBS: usize = 30;
const DEMO_RESOURCES: usize = 4;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        usage(&args[0])
    }

    let seed: u64 = parse_optional(args.get(2), DEFAULT_SEED).unwrap_or_else(|| {
        eprintln!("Invalid seed: {}", args[2]);
        eprintln!();
        usage(&args[0])
    });
    let generations: usize =
        parse_optional(args.get(3), DEFAULT_GENERATIONS).unwrap_or_else(|| {
            eprintln!("Invalid generation count: {}", args[3]);
            eprintln!();
            usage(&args[0])
        });

    let (name, project) = if args[1] == "--demo" {
        let project = generate(DEMO_JOBS, DEMO_RESOURCES, seed).unwrap_or_else(|e| {
            eprintln!("Error generating demo instance: {}", e);
            process::exit(1);
        });
        ("demo".to_string(), project)
    } else {
        let path = Path::new(&args[1]);
        let project = load_instance(path).unwrap_or_else(|e| {
            eprintln!("Error loading instance: {}", e);
            process::exit(1);
        });
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| args[1].clone());
        (name, project)
    };

    let config = GaConfig::default()
        .with_max_generations(generations)
        .with_seed(seed);

    print_header(&name, &project, &config);

    let decoder = Ssgs::new(&project);
    let result = GaRunner::run_with_observer(&decoder, &config, None, print_generation)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    if !result.best.is_feasible() {
        eprintln!("No feasible schedule found within horizon {}", project.horizon());
        process::exit(1);
    }

    // Re-decode the winner and verify it independently.
    match decode(&project, result.best.genes()) {
        Ok(schedule) => {
            let violations = schedule.violations(&project);
            if !violations.is_empty() {
                eprintln!("Best schedule violates constraints: {:?}", violations);
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Best chromosome no longer decodes: {}", e);
            process::exit(1);
        }
    }

    println!();
    println!(
        "{}: {} jobs, best makespan {} (critical path {}), {} generations, {:.2}s",
        name,
        project.job_count(),
        result.best_makespan,
        project.critical_path_length(),
        result.generations,
        result.elapsed.as_secs_f32()
    );
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <instance.json> [seed] [generations]", program);
    eprintln!();
    eprintln!("Minimize the makespan of an RCPSP instance with a genetic algorithm.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  instance.json  Path to the project instance file");
    eprintln!("  seed           Random seed (default: {})", DEFAULT_SEED);
    eprintln!(
        "  generations    Number of generations (default: {})",
        DEFAULT_GENERATIONS
    );
    eprintln!();
    eprintln!(
        "Pass --demo instead of a file to solve a generated {}-job instance.",
        DEMO_JOBS
    );
    process::exit(1);
}

/// `default` when the argument is absent, `None` when it does not parse.
fn parse_optional<T: FromStr>(arg: Option<&String>, default: T) -> Option<T> {
    match arg {
        Some(s) => s.parse().ok(),
        None => Some(default),
    }
}

fn print_header(name: &str, project: &Project, config: &GaConfig) {
    println!("RCPSP Genetic Algorithm");
    println!("=======================");
    println!("Instance: {}", name);
    println!(
        "Jobs: {}, resources: {}, horizon: {}",
        project.job_count(),
        project.resource_count(),
        project.horizon()
    );
    println!(
        "Population: {}, generations: {}",
        config.population_for(project.job_count()),
        config.max_generations
    );
    println!();
}

fn print_generation(stats: &GenerationStats) {
    println!(
        "generation {:06}, makespan (worst, average, best): {} {:.2} {}",
        stats.generation, stats.worst, stats.average, stats.best
    );
}
