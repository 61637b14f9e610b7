//! CLI logic for the procflow layout tool.
//!
//! Reads a process diagram, lays it out and writes the resulting node
//! positions as a TOML layout file.

pub mod diagram;
pub mod error;
pub mod error_adapter;
pub mod output;

mod args;
mod config;

pub use args::Args;
pub use config::{AppConfig, ConfigError};
pub use error::CliError;
pub use output::LayoutFile;

use std::fs;

use log::info;

use procflow::{LayoutAlgorithm, stepper::LoggingStepper};

use diagram::DiagramFile;

/// Run the procflow CLI application
///
/// This function lays out the diagram in the input file and writes the final
/// node positions to the output file. Returns whether layout moved any node.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed diagrams
/// - Layout errors
/// - Output serialization errors
pub fn run(args: &Args) -> Result<bool, CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let mut layout_config = app_config.into_layout();
    if args.tighten {
        layout_config = layout_config.with_tighten(true);
    }

    let source = fs::read_to_string(&args.input)?;
    let diagram = DiagramFile::parse(&source)?;
    let mut graph = diagram.into_graph(&layout_config)?;

    let mut algorithm =
        LayoutAlgorithm::new(layout_config.clone()).with_stepper(LoggingStepper);
    let changed = algorithm.layout(&mut graph)?;
    graph.write_back();

    let targets = graph.into_targets();
    let layout = LayoutFile::from_nodes(changed, &targets, &layout_config);
    fs::write(&args.output, layout.to_toml()?)?;

    info!(output_file = args.output, changed; "Layout written");

    Ok(changed)
}
