// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate rustcommon_logger;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use rustcommon_logger::{LevelFilter, LogBuilder, MultiLogBuilder, Stdout};

use std::path::Path;

use war_lengths::*;

const DEFAULT_INPUT: &str = "data.json";
const DEFAULT_PLOT_OUTPUT: &str = "game_lengths.png";
const DEFAULT_COMPARE_OUTPUT: &str = "war_comparison.png";

fn chart_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name("output")
            .long("output")
            .short("o")
            .value_name("FILE")
            .help("Chart to write, .png or .svg")
            .takes_value(true),
        Arg::with_name("density")
            .long("density")
            .help("Normalise bars so their total area is one"),
        Arg::with_name("title")
            .long("title")
            .value_name("TEXT")
            .help("Chart title")
            .takes_value(true),
        Arg::with_name("x-label")
            .long("x-label")
            .value_name("TEXT")
            .help("X-axis label")
            .takes_value(true),
        Arg::with_name("y-label")
            .long("y-label")
            .value_name("TEXT")
            .help("Y-axis label")
            .takes_value(true),
        Arg::with_name("no-grid")
            .long("no-grid")
            .help("Do not draw horizontal gridlines"),
        Arg::with_name("x-max")
            .long("x-max")
            .value_name("TURNS")
            .help("Upper limit of the visible x-axis")
            .takes_value(true),
    ]
}

fn main() {
    let matches = App::new("war-lengths")
        .version(VERSION)
        .about("Histograms of game lengths from War simulations")
        .setting(AppSettings::SubcommandRequiredElseHelp)
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
        .subcommand(
            SubCommand::with_name("plot")
                .about("Histogram of a single set of game lengths")
                .arg(
                    Arg::with_name("input")
                        .long("input")
                        .short("i")
                        .value_name("FILE")
                        .help("JSON array of game lengths")
                        .default_value(DEFAULT_INPUT),
                )
                .arg(
                    Arg::with_name("label")
                        .long("label")
                        .value_name("TEXT")
                        .help("Legend entry for the data")
                        .takes_value(true),
                )
                .args(&chart_args()),
        )
        .subcommand(
            SubCommand::with_name("compare")
                .about("Overlay standard and honorable war game lengths")
                .arg(
                    Arg::with_name("standard")
                        .long("standard")
                        .value_name("FILE")
                        .help("JSON array of standard war game lengths")
                        .default_value(sim::STANDARD_WAR_FILE),
                )
                .arg(
                    Arg::with_name("honorable")
                        .long("honorable")
                        .value_name("FILE")
                        .help("JSON array of honorable war game lengths")
                        .default_value(sim::HONORABLE_WAR_FILE),
                )
                .args(&chart_args()),
        )
        .get_matches();

    let mut config = Config::load(matches.value_of("config")).unwrap_or_else(|e| {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    });

    match matches.occurrences_of("verbose") {
        0 => {}
        1 => config.general_mut().set_logging(Level::Debug),
        _ => config.general_mut().set_logging(Level::Trace),
    }

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

    info!("war-lengths {} initializing...", VERSION);

    let result = match matches.subcommand() {
        ("plot", Some(sub)) => plot(&mut config, sub),
        ("compare", Some(sub)) => compare(&mut config, sub),
        _ => Err("no subcommand given".to_string()),
    };

    let code = match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            1
        }
    };

    let _ = log.flush();
    std::process::exit(code);
}

/// apply the chart overrides given on the command line
fn apply_chart_args(config: &mut Config, matches: &ArgMatches) -> Result<(), String> {
    let chart = config.chart_mut();

    if matches.is_present("density") {
        chart.set_density(true);
    }
    if matches.is_present("no-grid") {
        chart.set_grid(false);
    }
    if let Some(title) = matches.value_of("title") {
        chart.set_title(title.to_string());
    }
    if let Some(label) = matches.value_of("x-label") {
        chart.set_x_label(label.to_string());
    }
    if let Some(label) = matches.value_of("y-label") {
        chart.set_y_label(Some(label.to_string()));
    }
    if let Some(x_max) = matches.value_of("x-max") {
        let x_max = x_max
            .parse()
            .map_err(|_| format!("could not parse x-max: {}", x_max))?;
        chart.set_x_max(Some(x_max));
    }

    config.validate().map_err(|e| e.to_string())?;
    config.print_chart();
    Ok(())
}

fn build_plot<'a>(config: &Config) -> Result<HistogramPlot<'a>, String> {
    let chart = config.chart();

    let mut plot = HistogramPlot::new();
    plot.caption(chart.title())
        .x_desc(chart.x_label())
        .y_desc(chart.y_label())
        .size(chart.size())
        .grid(chart.grid())
        .density(chart.density())
        .bins(chart.bins().map_err(|e| e.to_string())?);

    if let Some(x_max) = chart.x_max() {
        let bins = chart.bins().map_err(|e| e.to_string())?;
        plot.x_range(bins.first()..x_max);
    }

    Ok(plot)
}

fn report(lengths: &GameLengths) {
    match lengths.summary() {
        Some(summary) => info!(
            "{}: {} games, mean turns: {:.2} +/- {:.2} (min: {} max: {})",
            lengths.path().display(),
            summary.count,
            summary.mean,
            summary.stddev,
            summary.min,
            summary.max,
        ),
        None => warn!("{}: no games", lengths.path().display()),
    }
}

fn render(plot: &HistogramPlot, output: &Path, datasets: &[GameLengths]) -> Result<(), String> {
    let histograms = plot.render(output).map_err(|e| e.to_string())?;

    for (lengths, histogram) in datasets.iter().zip(histograms.iter()) {
        if histogram.outside() > 0 {
            warn!(
                "{}: {} game lengths outside of {}..={} are not shown",
                lengths.path().display(),
                histogram.outside(),
                histogram.bins().first(),
                histogram.bins().last(),
            );
        }
    }

    info!("wrote {}", output.display());
    Ok(())
}

fn plot(config: &mut Config, matches: &ArgMatches) -> Result<(), String> {
    apply_chart_args(config, matches)?;

    let input = matches.value_of("input").unwrap_or(DEFAULT_INPUT);
    let output = Path::new(matches.value_of("output").unwrap_or(DEFAULT_PLOT_OUTPUT));

    let lengths = GameLengths::load(input).map_err(|e| e.to_string())?;
    report(&lengths);

    let mut plot = build_plot(config)?;
    plot.series(matches.value_of("label").unwrap_or(""), lengths.values());

    render(&plot, output, std::slice::from_ref(&lengths))
}

fn compare(config: &mut Config, matches: &ArgMatches) -> Result<(), String> {
    apply_chart_args(config, matches)?;

    let standard = matches
        .value_of("standard")
        .unwrap_or(sim::STANDARD_WAR_FILE);
    let honorable = matches
        .value_of("honorable")
        .unwrap_or(sim::HONORABLE_WAR_FILE);
    let output = Path::new(
        matches
            .value_of("output")
            .unwrap_or(DEFAULT_COMPARE_OUTPUT),
    );

    let datasets = load_all(&[standard, honorable]).map_err(|errors| {
        for e in &errors {
            error!("{}", e);
        }
        format!("{} of 2 datasets failed to load", errors.len())
    })?;

    for lengths in &datasets {
        report(lengths);
    }

    let mut plot = build_plot(config)?;
    plot.series("Standard War", datasets[0].values())
        .series("Honorable War", datasets[1].values());

    render(&plot, output, &datasets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_matches(args: &[&str]) -> ArgMatches<'static> {
        App::new("war-lengths")
            .args(&chart_args())
            .get_matches_from(args)
    }

    #[test]
    fn chart_args_override_config() {
        let mut config = Config::load(None).unwrap();
        let matches = chart_matches(&[
            "war-lengths",
            "--density",
            "--no-grid",
            "--title",
            "Lengths",
            "--x-max",
            "300",
        ]);
        apply_chart_args(&mut config, &matches).unwrap();

        let chart = config.chart();
        assert!(chart.density());
        assert!(!chart.grid());
        assert_eq!(chart.title(), "Lengths");
        assert_eq!(chart.x_max(), Some(300.0));
        assert_eq!(chart.y_label(), "Density");
    }

    #[test]
    fn bad_x_max_is_rejected() {
        let mut config = Config::load(None).unwrap();
        let matches = chart_matches(&["war-lengths", "--x-max", "lots"]);
        assert!(apply_chart_args(&mut config, &matches).is_err());

        let matches = chart_matches(&["war-lengths", "--x-max", "0"]);
        assert!(apply_chart_args(&mut config, &matches).is_err());
    }

    #[test]
    fn build_plot_limits_x_axis() {
        let mut config = Config::load(None).unwrap();
        config.chart_mut().set_x_max(Some(300.0));

        let plot = build_plot(&config).unwrap();
        assert_eq!(plot.visible_range(), 0.0..300.0);

        let plot = build_plot(&Config::load(None).unwrap()).unwrap();
        assert_eq!(plot.visible_range(), 0.0..999.0);
    }

    #[test]
    fn render_compare_chart() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("war_comparison.svg");

        let datasets = vec![
            GameLengths::from_values("standard_war.json", vec![3.0, 5.0, 5.0]).unwrap(),
            GameLengths::from_values("honorable_war.json", vec![4.0, 2000.0]).unwrap(),
        ];

        let mut config = Config::load(None).unwrap();
        config.chart_mut().set_density(true);
        config.chart_mut().set_x_max(Some(50.0));

        let mut plot = build_plot(&config).unwrap();
        plot.series("Standard War", datasets[0].values())
            .series("Honorable War", datasets[1].values());

        render(&plot, &output, &datasets).unwrap();
        assert!(std::fs::metadata(&output).unwrap().len() > 0);
    }
}
