use std::process::ExitCode;

use clap::Parser;
use tessel::{format::Sidecar, ser::WriteOptions, Generator, MaterialRef, PlaneGenerator};

mod cli;
use cli::*;

pub fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_filter, cli.log_format);

    let generator = PlaneGenerator::new(cli.segments, cli.size, cli.uv_size).with_material(
        MaterialRef {
            diffuse_map: cli.diffuse,
            normal_map: cli.normal,
            specular_map: cli.specular,
        },
    );
    let options = WriteOptions {
        layout: cli.layout.into(),
        sidecar: if cli.no_sidecar {
            Sidecar::Disabled
        } else {
            Sidecar::BestEffort
        },
    };

    match generator.export(&cli.output, &options) {
        Ok(data) => {
            tracing::info!(
                path = ?cli.output,
                vertices = data.vertex_count(),
                indices = data.index_count(),
                "wrote plane"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(path = ?cli.output, "{e}");
            ExitCode::FAILURE
        }
    }
}
