use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Interactively select points on a triangle mesh.
///
/// Opens a window showing the mesh. Selected points are logged when the
/// window is closed and can be written to a text file, one `x y z` line per
/// point.
#[derive(Debug, Parser)]
#[command(version, verbatim_doc_comment)]
pub struct AppOptions {
    /// Verbosity of the command line output.
    #[clap(long, default_value = "info")]
    pub log_level: log::Level,

    /// TOML file with window, key binding and style settings.
    #[clap(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: SelectCommand,
}

#[derive(Debug, Subcommand)]
pub enum SelectCommand {
    /// Pick vertices of a uniform lattice laid over the mesh.
    Grid {
        /// OBJ file to load. A unit cube is used if omitted.
        mesh: Option<PathBuf>,

        /// Lattice points per axis. Overrides the configuration file.
        #[clap(long)]
        dim: Option<usize>,

        /// Write the selected points to this file.
        #[clap(long)]
        output: Option<PathBuf>,
    },

    /// Pick mesh vertices or points on the mesh surface.
    Landmarks {
        /// OBJ file to load. A unit cube is used if omitted.
        mesh: Option<PathBuf>,

        /// Write the selected points to this file.
        #[clap(long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grid() {
        let args = AppOptions::parse_from(["meshpick", "--log-level", "debug", "grid", "bunny.obj", "--dim", "6"]);
        assert_eq!(args.log_level, log::Level::Debug);
        match args.command {
            SelectCommand::Grid { mesh, dim, output } => {
                assert_eq!(mesh, Some(PathBuf::from("bunny.obj")));
                assert_eq!(dim, Some(6));
                assert!(output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_landmarks_defaults() {
        let args = AppOptions::parse_from(["meshpick", "landmarks", "--output", "points.txt"]);
        assert_eq!(args.log_level, log::Level::Info);
        assert!(args.config.is_none());
        assert!(matches!(
            args.command,
            SelectCommand::Landmarks { mesh: None, output: Some(_) }
        ));
    }
}
