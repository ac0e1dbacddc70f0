mod document;
mod error;
mod geometry;
mod path_data;
mod postprocessor;
mod preview;
mod settings;
mod toolpath_generation;
mod types;

pub use document::{Document, ViewBox};
pub use error::{LoadError, ParseError};
pub use geometry::*;
pub use path_data::{parse_path_data, CLOSE_SNAP_TOLERANCE};
pub use postprocessor::generate_reaming_gcode;
pub use preview::{PreviewRegistry, PREVIEW_EXTENT, PREVIEW_MARGIN};
pub use settings::ReamerSettings;
pub use toolpath_generation::*;
pub use types::*;

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
