//! Derive an age-stratified IFR from a serosurvey and project it on a target
//! population.
//!
//! Usage: calc_ifr [CONFIG]
//!
//! Without a `[survey]` table in the configuration, the Spanish ENE-COVID
//! survey is used and projected on the USA.
use ifr::{config::SurveyConfig, prelude::*, report};
use std::{env, process};

fn run() -> Result<(), InputError> {
    let path = env::args().nth(1);
    let cfg = Config::load(path.as_deref())?;
    cfg.init_logger();

    let survey = cfg.survey().clone().unwrap_or_else(SurveyConfig::ene_covid);
    let inputs = survey.inputs()?;
    let derived = cfg.deriver().derive(&survey.name, &inputs, &survey.pyramid)?;
    print!("{}", derived.render());
    println!();
    print!("{}", report::render_model_bars(derived.model(), survey.maxage, 40));

    if let Some(target) = &survey.target {
        let ifr = derived.project(&cfg.aggregator(), target)?;
        println!(
            "IFR on target country assuming disease prevalence equal among ages: {:6.3}%",
            ifr
        );
    }
    return Ok(());
}

fn main() {
    if let Err(e) = run() {
        eprintln!("calc_ifr: {}", e);
        process::exit(1);
    }
}
