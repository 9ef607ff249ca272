use anyhow::{Context, Result};
use clap::Parser;
use cli::{AppOptions, SelectCommand};
use log::{debug, error, info};
use meshpick_core::Point3f;
use meshpick_visualization::{GridPointSelector, LandmarkSelector, Plotter, SelectorConfig};
use std::path::Path;
use std::process::ExitCode;

mod cli;
mod io;

fn main() -> ExitCode {
    // arg parsing
    let args = AppOptions::parse();

    // logger
    simple_logger::init_with_level(args.log_level).ok();

    // run
    let result = run(args);
    if let Err(e) = result {
        error!("{e}");
        debug!("{e:?}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(args: AppOptions) -> Result<()> {
    let config = match &args.config {
        Some(path) => SelectorConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => SelectorConfig::default(),
    };
    let plotter = Plotter::new(config.window.clone());

    match args.command {
        SelectCommand::Grid { mesh, dim, output } => {
            let mesh = io::load_mesh(mesh.as_deref())?;
            let mut grid_config = config.grid;
            if let Some(dim) = dim {
                grid_config.dim = dim;
            }
            let selector = GridPointSelector::with_config(&mesh, plotter, &grid_config)?.start()?;
            report(selector.selection(), output.as_deref())
        }
        SelectCommand::Landmarks { mesh, output } => {
            let mesh = io::load_mesh(mesh.as_deref())?;
            let selector = LandmarkSelector::with_config(&mesh, plotter, &config.landmarks)?.start()?;
            report(selector.selection(), output.as_deref())
        }
    }
}

fn report(points: &[Point3f], output: Option<&Path>) -> Result<()> {
    info!("selected {} points", points.len());
    for (i, point) in points.iter().enumerate() {
        info!("  {}: {} {} {}", i, point.x, point.y, point.z);
    }
    if let Some(path) = output {
        io::save_points(points, path)?;
    }
    Ok(())
}
