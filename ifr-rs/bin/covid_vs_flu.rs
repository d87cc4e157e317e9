//! Compare published COVID-19 IFR estimates with seasonal influenza.
//!
//! Usage: covid_vs_flu [CONFIG] [OUTPUT]
//!
//! Writes the chart series of every model and both consensus curves as CSV
//! to OUTPUT (default "covid_vs_flu.csv"), then prints the fold ratios
//! between the consensus curves at the comparison ages.
use ifr::{literature, prelude::*, report};
use log::*;
use std::{env, fs, process};

fn run() -> Result<(), InputError> {
    let path = env::args().nth(1);
    let output = env::args().nth(2).unwrap_or_else(|| "covid_vs_flu.csv".into());
    let cfg = Config::load(path.as_deref())?;
    cfg.init_logger();

    let mut covid = literature::covid_models();
    covid.extend(cfg.models().iter().cloned());
    let flu = literature::flu_models(cfg.flu_symptomatic_fraction());
    let covid_comb = ModelCombiner::new(&covid);
    let flu_comb = ModelCombiner::new(&flu);
    let ages = cfg.comparison_ages().clone();

    let mut data = report::series_csv(&covid)?;
    let flu_series = report::series_csv(&flu)?;
    data.extend(flu_series.lines().skip(1).map(|l| format!("{}\n", l)));
    for (name, comb) in [("COVID-19 mean", &covid_comb), ("Influenza mean", &flu_comb)].iter() {
        let curve = comb.curve(ages.iter().copied())?;
        let csv = report::curve_csv(name, &curve)?;
        data.extend(csv.lines().skip(1).map(|l| format!("{}\n", l)));
    }
    fs::write(&output, data)?;
    info!("chart series written to {}", output);

    let folds = FoldComparison::compute(ages.iter().copied(), &flu_comb, &covid_comb)?;
    print!("{}", report::render_folds(&folds, "flu", "covid"));
    println!();
    let curve = covid_comb.curve(ages.iter().copied())?;
    print!("{}", report::render_curve_bars(&curve, 40));
    return Ok(());
}

fn main() {
    if let Err(e) = run() {
        eprintln!("covid_vs_flu: {}", e);
        process::exit(1);
    }
}
