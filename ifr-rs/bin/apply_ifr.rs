//! Apply published age-stratified IFR estimates to every region of the UN
//! population tables and print their overall IFR.
//!
//! Usage: apply_ifr [CONFIG]
use ifr::{io::WppReader, literature, prelude::*, report};
use log::*;
use std::{env, process};

fn run() -> Result<(), InputError> {
    let path = env::args().nth(1);
    let cfg = Config::load(path.as_deref())?;
    cfg.init_logger();

    let mut models = vec![
        literature::ene_covid(),
        literature::us_cdc(),
        literature::verity(),
        literature::levin(),
    ];
    models.extend(
        literature::flu_models(cfg.flu_symptomatic_fraction())
            .into_iter()
            .take(1),
    );
    models.extend(cfg.models().iter().cloned());

    let regions = WppReader::new(cfg.reference_year(), cfg.maxage()).read_path(cfg.pyramid_file())?;
    info!("{} regions, {} models", regions.len(), models.len());
    let table = RateTable::compute(&cfg.aggregator(), &regions, &models)?;
    print!("{}", report::render_rate_table(&table, cfg.sort_by_model()));
    return Ok(());
}

fn main() {
    if let Err(e) = run() {
        eprintln!("apply_ifr: {}", e);
        process::exit(1);
    }
}
