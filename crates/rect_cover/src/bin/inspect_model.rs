use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use rect_cover::{
    CoverModel, GoodLpBackend, load_grid,
    optimize::{ModelStats, rectangle_catalog},
    partition,
};

#[derive(Parser)]
#[command(author, version, about = "Build the covering model per tile and print its size", long_about = None)]
struct Args {
    /// Grid file
    grid: PathBuf,

    /// Number of tile columns
    #[arg(short = 'x', long = "num-x", default_value_t = 1)]
    num_x: usize,

    /// Number of tile rows
    #[arg(short = 'y', long = "num-y", default_value_t = 1)]
    num_y: usize,

    /// Override min_special from the grid header
    #[arg(long = "min-special")]
    min_special: Option<usize>,

    /// Override max_area from the grid header
    #[arg(long = "max-area")]
    max_area: Option<usize>,

    /// Print every constraint to stdout
    #[arg(short = 'd', long = "dump")]
    dump: bool,
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    let args = Args::parse();

    let loaded = load_grid(&args.grid)
        .with_context(|| format!("failed to load grid from {}", args.grid.display()))?;
    let mut params = loaded.params;
    if let Some(min_special) = args.min_special {
        params.min_special = min_special;
    }
    if let Some(max_area) = args.max_area {
        params.max_area = max_area;
        params.max_side = max_area;
    }
    params.validate()?;

    info!(
        "catalog: {} shapes (max_area={}, max_side={})",
        rectangle_catalog(&params).len(),
        params.max_area,
        params.max_side
    );

    let tiles = partition(&loaded.grid, args.num_x, args.num_y)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut total = ModelStats::default();

    writeln!(
        out,
        "{:>5} {:>9} {:>7} {:>10} {:>8} {:>8} {:>10} {:>11}",
        "tile", "size", "cells", "placements", "invalid", "aux", "variables", "constraints"
    )?;
    for tile in &tiles {
        let model = CoverModel::build(&tile.grid, &params, GoodLpBackend::new());
        let stats = model.stats();
        writeln!(
            out,
            "{:>5} {:>9} {:>7} {:>10} {:>8} {:>8} {:>10} {:>11}",
            tile.spec.index,
            format!("{}x{}", tile.spec.width, tile.spec.height),
            stats.cell_vars,
            stats.placement_vars,
            stats.invalid_placements,
            stats.aux_vars,
            stats.variables(),
            stats.constraints
        )?;
        if args.dump {
            writeln!(out, "# tile {}", tile.spec.index)?;
            model.dump_constraints(&mut out)?;
        }

        total.cell_vars += stats.cell_vars;
        total.placement_vars += stats.placement_vars;
        total.invalid_placements += stats.invalid_placements;
        total.aux_vars += stats.aux_vars;
        total.constraints += stats.constraints;
    }
    writeln!(
        out,
        "{:>5} {:>9} {:>7} {:>10} {:>8} {:>8} {:>10} {:>11}",
        "all",
        format!("{}x{}", loaded.grid.width(), loaded.grid.height()),
        total.cell_vars,
        total.placement_vars,
        total.invalid_placements,
        total.aux_vars,
        total.variables(),
        total.constraints
    )?;
    out.flush()?;

    Ok(())
}
