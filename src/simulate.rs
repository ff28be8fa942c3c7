// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate rustcommon_logger;

use clap::{App, Arg, ArgMatches};
use rand::SeedableRng;
use rustcommon_logger::{LevelFilter, LogBuilder, MultiLogBuilder, Stdout};
use thousands::Separable;

use std::process;

use war_lengths::sim::*;
use war_lengths::*;

fn main() {
    let matches = App::new("war-sim")
        .version(VERSION)
        .about("Simulate games of War and record their lengths")
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("TOML config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Increase verbosity by one level. Can be used more than once")
                .multiple(true),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("INT")
                .help("Seed for reproducible runs")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("duration")
                .long("duration")
                .value_name("SECONDS")
                .help("Minimum time to spend simulating each setup")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("games")
                .long("games")
                .value_name("INT")
                .help("Play exactly this many games per setup instead")
                .takes_value(true)
                .conflicts_with("duration"),
        )
        .arg(
            Arg::with_name("small-games")
                .long("small-games")
                .value_name("INT")
                .help("Games per cell of the small deck table")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("skip-small")
                .long("skip-small")
                .help("Do not build the small deck table"),
        )
        .arg(
            Arg::with_name("output-dir")
                .long("output-dir")
                .value_name("DIR")
                .help("Directory for standard_war.json and honorable_war.json")
                .takes_value(true),
        )
        .get_matches();

    let config = configure(&matches).unwrap_or_else(|e| {
        eprintln!("ERROR: {}", e);
        process::exit(1);
    });

    // initialize logging
    let log = LogBuilder::new()
        .output(Box::new(Stdout::new()))
        .log_queue_depth(1024)
        .single_message_size(4096)
        .build()
        .expect("failed to initialize log");

    let mut log = MultiLogBuilder::new()
        .level_filter(LevelFilter::from(config.logging()))
        .default(log)
        .build()
        .start();

    info!("war-sim {} initializing...", VERSION);
    config.print_simulation();

    let code = match run(&config, &mut || {
        let _ = log.flush();
    }) {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            1
        }
    };

    let _ = log.flush();
    process::exit(code);
}

fn configure(matches: &ArgMatches) -> Result<Config, String> {
    let mut config = Config::load(matches.value_of("config")).map_err(|e| e.to_string())?;

    match matches.occurrences_of("verbose") {
        0 => {}
        1 => config.general_mut().set_logging(Level::Debug),
        _ => config.general_mut().set_logging(Level::Trace),
    }

    let simulation = config.simulation_mut();

    if let Some(seed) = parse_arg(matches, "seed")? {
        simulation.set_seed(Some(seed));
    }
    if let Some(duration) = parse_arg(matches, "duration")? {
        simulation.set_duration(duration);
        simulation.set_games(None);
    }
    if let Some(games) = parse_arg(matches, "games")? {
        simulation.set_games(Some(games));
    }
    if let Some(small_games) = parse_arg(matches, "small-games")? {
        simulation.set_small_games(small_games);
    }
    if matches.is_present("skip-small") {
        simulation.set_small_table(false);
    }
    if let Some(dir) = matches.value_of("output-dir") {
        simulation.set_output_dir(Some(dir.to_string()));
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// a helper function to parse an argument by name from `ArgMatches`
fn parse_arg<T: std::str::FromStr>(matches: &ArgMatches, key: &str) -> Result<Option<T>, String> {
    match matches.value_of(key) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| format!("could not parse {}: {}", key, value)),
        None => Ok(None),
    }
}

fn run(config: &Config, flush: &mut dyn FnMut()) -> Result<(), String> {
    let simulation = config.simulation();

    let seed = simulation.seed().unwrap_or_else(rand::random);
    info!("seed: {}", seed);
    let mut rng = SimRng::seed_from_u64(seed);

    let budget = match simulation.games() {
        Some(games) => Budget::Games(games),
        None => Budget::Duration(simulation.duration()),
    };

    let output_dir = simulation.output_dir();
    if !output_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("failed to create {}: {}", output_dir.display(), e))?;
    }

    for setup in catalogue() {
        let outcome = simulate(&setup, budget, &mut rng);
        outcome.print();

        if let Some(file) = setup.output_file() {
            let path = output_dir.join(file);
            outcome.write_turns(&path).map_err(|e| e.to_string())?;
            info!(
                "  wrote {} game lengths to {}",
                outcome.games().separate_with_commas(),
                path.display()
            );
        }

        flush();
    }

    if simulation.small_table() {
        info!("-----");
        info!("Small games:");
        info!("  Each player has a deck of n unique cards, and k cards are laid face-down in a war");
        info!(
            "  games per cell: {}",
            simulation.small_games().separate_with_commas()
        );
        flush();

        let table = small_games_table(simulation.small_games(), &mut rng);
        println!("{}", table);
    }

    Ok(())
}
