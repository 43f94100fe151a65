use std::path::Path;

use anyhow::Result;
use clap::ArgMatches;

use primerspec_core::config::FileConfig;
use primerspec_core::errors::ConfigError;
use primerspec_core::models::region::{ProductSizeRange, RegionPlan, TargetRegion};

fn int_pair(matches: &ArgMatches, id: &str) -> Option<(i64, i64)> {
    let values: Vec<i64> = matches.get_many::<i64>(id)?.copied().collect();
    Some((values[0], values[1]))
}

pub fn run_regions(matches: &ArgMatches) -> Result<()> {
    let file = match matches.get_one::<String>("config") {
        Some(path) => FileConfig::load(Path::new(path))?,
        None => FileConfig::default(),
    };
    let region = &file.region;

    let (begin, end) = int_pair(matches, "pos")
        .or_else(|| Some((region.target_begin?, region.target_end?)))
        .ok_or(ConfigError::MissingTargetRegion)?;
    let (min, max) = int_pair(matches, "size")
        .or_else(|| Some((region.product_size_min?, region.product_size_max?)))
        .ok_or(ConfigError::MissingSizeRange)?;

    let plan = RegionPlan::solve(
        TargetRegion::new(begin, end)?,
        ProductSizeRange::new(min, max)?,
    )?;

    println!("TARGET_POSITION={},{}", plan.target.begin, plan.target.end);
    println!("PRODUCT_SIZE_RANGE={}-{}", plan.size.min, plan.size.max);
    println!("SEQUENCE_INCLUDED_REGION={}", plan.window);
    println!("SEQUENCE_PRIMER_PAIR_OK_REGION_LIST={}", plan.pair_ok);
    Ok(())
}
