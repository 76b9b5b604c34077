use clap::Parser;
use gridpath::config::{load_config, load_config_from};
use gridpath::pathfinding::{Cell, GridBounds, GridFootprint, PathService};
use gridpath::{GridError, GridResult};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::path::PathBuf;

mod pathgrid {
    pub mod cli_utils;
}

use pathgrid::cli_utils::*;

#[derive(Parser, Clone)]
#[command(name = "pathgrid")]
#[command(about = "Find a shortest 4-connected path across an obstacle grid")]
struct Args {
    /// Grid size in cells (format: WIDTHxHEIGHT), ignored when --map is given
    #[arg(long, default_value = "16x16")]
    size: String,

    /// ASCII map file: '#' is a wall, 'S'/'E' mark start and end, first line is the top row
    #[arg(long)]
    map: Option<PathBuf>,

    /// Start cell (format: X,Y)
    #[arg(long)]
    from: Option<String>,

    /// Target cell (format: X,Y), defaults to the top-right corner
    #[arg(long)]
    to: Option<String>,

    /// Extra wall cells (format: "X,Y;X,Y")
    #[arg(long)]
    walls: Option<String>,

    /// Fraction of cells turned into random walls (0.0-1.0)
    #[arg(long, default_value = "0.0")]
    density: f64,

    /// Random seed for reproducible walls
    #[arg(long)]
    seed: Option<u64>,

    /// TOML config file, defaults to the user config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print only the path, without the grid drawing
    #[arg(long)]
    quiet: bool,
}

struct Scenario {
    bounds: GridBounds,
    walls: Vec<Cell>,
    start: Cell,
    end: Cell,
}

fn build_scenario(args: &Args) -> GridResult<Scenario> {
    let (bounds, mut walls, map_start, map_end) = match &args.map {
        Some(path) => {
            let layout = parse_map(&std::fs::read_to_string(path)?)?;
            (layout.bounds, layout.walls, layout.start, layout.end)
        }
        None => {
            let (width, height) = parse_size(&args.size)?;
            (GridBounds::from_size(width, height), Vec::new(), None, None)
        }
    };

    let start = match &args.from {
        Some(from) => parse_cell(from)?,
        None => map_start.unwrap_or(bounds.min),
    };
    let end = match &args.to {
        Some(to) => parse_cell(to)?,
        None => map_end.unwrap_or(bounds.max - Cell::new(1, 1)),
    };

    if let Some(extra) = &args.walls {
        walls.extend(parse_cell_list(extra)?);
    }

    let density = validate_density(args.density);
    if density > 0.0 {
        let seed = args.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg64::seed_from_u64(seed);
        walls.extend(random_walls(bounds, density, &[start, end], &mut rng));
        println!("Random walls: density {density}, seed {seed}");
    }

    Ok(Scenario {
        bounds,
        walls,
        start,
        end,
    })
}

fn main() -> GridResult<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };

    let scenario = build_scenario(&args)?;
    config.bounds = Some(scenario.bounds);

    let mut service = PathService::from_config(config)?;
    let footprints: Vec<GridFootprint> = scenario
        .walls
        .iter()
        .map(|cell| GridFootprint::single(*cell))
        .collect();
    let stats = service.refresh(&footprints)?;

    let path = service.find_path(scenario.start, scenario.end)?;
    let search = service.last_search_stats();

    if !args.quiet {
        let grid = service
            .grid()
            .ok_or_else(|| GridError::configuration("grid not initialized"))?;
        print!("{}", render_grid(grid, scenario.start, scenario.end, &path));
        println!(
            "\n{} walls in a {}x{} grid, {} nodes expanded",
            stats.obstacle_cells - stats.out_of_bounds_cells,
            scenario.bounds.width(),
            scenario.bounds.height(),
            search.expanded
        );
    }

    if path.is_empty() {
        println!("No path from {} to {}", scenario.start, scenario.end);
    } else {
        let steps: Vec<String> = path.iter().map(ToString::to_string).collect();
        println!(
            "Path from {} to {} ({} steps): {}",
            scenario.start,
            scenario.end,
            path.len(),
            steps.join(" ")
        );
    }

    Ok(())
}
