use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use std::time::Instant;

use rect_cover::{
    Config, RunReport, constants::DEFAULT_CONFIG_PATH, load_grid, optimize::solve_tiles,
    save_solved_grid,
};

#[derive(Parser)]
#[command(author, version, about = "Cover a grid with rectangles by partitioned MILP", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Grid file (overrides [input] grid_path)
    #[arg(short = 'g', long = "grid")]
    grid: Option<PathBuf>,

    /// Number of tile columns
    #[arg(short = 'x', long = "num-x")]
    num_x: Option<usize>,

    /// Number of tile rows
    #[arg(short = 'y', long = "num-y")]
    num_y: Option<usize>,

    /// Output directory for report and solved grid
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Save JSON report and solved grid regardless of config
    #[arg(short = 's', long = "save")]
    save: bool,
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    let args = Args::parse();

    // 設定の読み込み
    let mut config = if args.config.exists() {
        Config::load_from_file(&args.config)?
    } else {
        warn!(
            "Config file not found: {}, using default settings",
            args.config.display()
        );
        Config::default()
    };

    // コマンドライン引数で上書き
    if let Some(num_x) = args.num_x {
        config.partition.num_x = num_x;
    }
    if let Some(num_y) = args.num_y {
        config.partition.num_y = num_y;
    }
    if let Some(dir) = &args.output {
        config.output.dir = dir.display().to_string();
    }
    if args.save {
        config.output.save_report = true;
        config.output.save_grid = true;
    }
    config.validate()?;

    let grid_path = args
        .grid
        .or_else(|| config.input.grid_path.as_ref().map(PathBuf::from))
        .context("no grid file given (use --grid or [input] grid_path)")?;

    // グリッドの読み込み
    let loaded = load_grid(&grid_path)
        .with_context(|| format!("failed to load grid from {}", grid_path.display()))?;
    let params = config.resolve_params(loaded.params)?;
    let counts = loaded.grid.counts();
    info!(
        "Grid {}x{}: {} special, {} plain, {} absent",
        loaded.grid.width(),
        loaded.grid.height(),
        counts.special,
        counts.plain,
        counts.absent
    );
    info!("Coverable cells: {}", counts.coverable());
    info!(
        "min_special={}, max_area={}, max_side={}",
        params.min_special, params.max_area, params.max_side
    );

    // 求解
    let start = Instant::now();
    let summary = solve_tiles(&loaded.grid, &params, &config.partition, &config.solver)?;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    println!("{}", summary.merged);
    println!("Total score: {}", summary.total_score);
    println!("Total score w/ absent cells: {}", summary.total_with_absent());
    if summary.failed_tiles() > 0 {
        warn!(
            "{} of {} tiles were not solved",
            summary.failed_tiles(),
            summary.tiles.len()
        );
    }
    info!("Solved in {} ms", elapsed_ms);

    // 結果の保存
    if config.output.save_report {
        let report = RunReport::new(&loaded.grid, &params, &config.partition, &summary, elapsed_ms);
        report.save_json(&config.output.dir)?;
    }
    if config.output.save_grid {
        save_solved_grid(&summary.merged, &params, &config.output.dir)?;
    }

    Ok(())
}
