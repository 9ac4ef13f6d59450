use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use gridpath::{
    find_path,
    input::{grid_from_image, parse_json, parse_text},
    output::{render_overlay, write_json, write_path},
    Heuristic, Point, Problem, DEFAULT_MAX_COST,
};
use log::info;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    /// A* guided by the Manhattan distance
    Astar,
    /// Uninformed search
    Dijkstra,
}

impl From<Algorithm> for Heuristic {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Astar => Heuristic::Estimate,
            Algorithm::Dijkstra => Heuristic::Zero,
        }
    }
}

/// Find the cheapest path through a weighted grid (0 = wall)
#[derive(Parser, Debug)]
#[command(name = "gridpath", version)]
struct Cli {
    /// Problem file, reads stdin when missing or `-`
    input: Option<PathBuf>,

    /// Format of the problem file
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Build the grid from an image instead (dark pixels are walls)
    #[arg(long, conflicts_with = "input")]
    image: Option<PathBuf>,

    /// Start point as `row,col`, overrides the one from the problem file
    #[arg(long)]
    start: Option<Point>,

    /// End point as `row,col`, overrides the one from the problem file
    #[arg(long)]
    end: Option<Point>,

    /// How to print the path
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    output: Format,

    #[arg(short, long, value_enum, default_value_t = Algorithm::Astar)]
    algorithm: Algorithm,

    /// Largest accepted cell value
    #[arg(long, default_value_t = DEFAULT_MAX_COST)]
    max_cost: usize,

    /// Draw the grid and the path on stderr
    #[arg(long)]
    draw: bool,
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn load_problem(cli: &Cli) -> anyhow::Result<Problem> {
    if let Some(path) = &cli.image {
        let img = image::open(path)
            .with_context(|| format!("failed to open image {}", path.display()))?;
        let grid = grid_from_image(&img)?;
        let start = cli
            .start
            .ok_or_else(|| anyhow!("--start is required with --image"))?;
        let end = cli
            .end
            .ok_or_else(|| anyhow!("--end is required with --image"))?;
        return Ok(Problem { grid, start, end });
    }

    let input = read_input(cli.input.as_deref())?;
    let mut problem = match cli.format {
        Format::Text => parse_text(&input, cli.max_cost)?,
        Format::Json => parse_json(&input, cli.max_cost)?,
    };

    if let Some(start) = cli.start {
        problem.start = start;
    }
    if let Some(end) = cli.end {
        problem.end = end;
    }
    Ok(problem)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let problem = load_problem(&cli)?;
    info!(
        "loaded {}x{} grid, {} -> {}",
        problem.grid.rows(),
        problem.grid.columns(),
        problem.start,
        problem.end
    );

    let result = find_path(
        &problem.grid,
        problem.start,
        problem.end,
        cli.algorithm.into(),
    )?;
    info!(
        "path of {} cells with cost {}",
        result.path.len(),
        result.total_cost
    );

    if cli.draw {
        eprint!("{}", render_overlay(&problem.grid, &result.path));
    }

    let mut out = io::stdout().lock();
    match cli.output {
        Format::Text => write_path(&mut out, &result.path)?,
        Format::Json => write_json(&mut out, &result.into())?,
    }

    Ok(())
}
