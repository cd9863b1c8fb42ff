use std::{path::PathBuf, str::FromStr};

use clap::ValueHint;
use nalgebra::Vector2;
use tessel::format::ByteLayout;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Byte order and size-field width of the written file.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum Layout {
    /// Little-endian with 64-bit sizes; readable anywhere
    Portable,
    /// This machine's endianness and pointer width
    HostNative,
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Portable => f.write_str("portable"),
            Layout::HostNative => f.write_str("host-native"),
        }
    }
}

impl From<Layout> for ByteLayout {
    fn from(value: Layout) -> Self {
        match value {
            Layout::Portable => ByteLayout::Portable,
            Layout::HostNative => ByteLayout::HostNative,
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,lattice=info,tessel=info,plane=info",
        env = "PLANE_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
    /// Number of subdivisions along X and Z
    #[arg(long, default_value = "1,1", value_parser = parse_vec2::<i32>, value_name = "X,Z")]
    pub segments: Vector2<i32>,
    /// Width and depth of the plane
    #[arg(long, default_value = "1,1", value_parser = parse_vec2::<f32>, value_name = "W,D")]
    pub size: Vector2<f32>,
    /// Texture coordinate scale across the plane
    #[arg(long, default_value = "1,1", value_parser = parse_vec2::<f32>, value_name = "U,V")]
    pub uv_size: Vector2<f32>,
    /// Diffuse texture path recorded in the material sidecar
    #[arg(long, default_value = "", value_hint = ValueHint::FilePath)]
    pub diffuse: String,
    /// Normal map path recorded in the material sidecar
    #[arg(long, default_value = "", value_hint = ValueHint::FilePath)]
    pub normal: String,
    /// Specular map path recorded in the material sidecar
    #[arg(long, default_value = "", value_hint = ValueHint::FilePath)]
    pub specular: String,
    /// Byte layout of the output file
    #[arg(long, default_value_t = Layout::Portable)]
    pub layout: Layout,
    /// Don't write a material sidecar
    #[arg(long)]
    pub no_sidecar: bool,
    /// File to write
    #[arg(value_hint = ValueHint::FilePath)]
    pub output: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum Vec2Error<E: std::error::Error + 'static> {
    #[error("expected two comma-separated values, found {0}")]
    Count(usize),
    #[error(transparent)]
    Parse(E),
}

fn parse_vec2<R: FromStr>(
    s: &str,
) -> Result<Vector2<R>, Box<dyn std::error::Error + Send + Sync + 'static>>
where
    <R as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let parts: Vec<&str> = s.trim().split(',').map(str::trim).collect();
    let [x, y] = parts[..] else {
        return Err(Vec2Error::<R::Err>::Count(parts.len()).into());
    };
    let x = R::from_str(x).map_err(Vec2Error::Parse)?;
    let y = R::from_str(y).map_err(Vec2Error::Parse)?;
    Ok(nalgebra::vector![x, y])
}

/// Set up pretty log output
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::OffsetTime::new(
            time::UtcOffset::current_local_offset().unwrap_or_else(|e| {
                tracing::warn!("couldn't get local time offset: {:?}", e);
                time::UtcOffset::UTC
            }),
            time::macros::format_description!("[hour]:[minute]:[second]"),
        ))
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use nalgebra::vector;

    use super::{parse_vec2, Cli, Layout};

    #[test]
    fn vec2() {
        assert_eq!(parse_vec2::<i32>(" 4, 2 ").unwrap(), vector![4, 2]);
        assert_eq!(parse_vec2::<f32>("0.5,3").unwrap(), vector![0.5, 3.0]);
        assert!(parse_vec2::<i32>("1").is_err());
        assert!(parse_vec2::<i32>("1,2,3").is_err());
        assert!(parse_vec2::<i32>("a,2").is_err());
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["plane", "out.mesh"]).unwrap();
        assert_eq!(cli.segments, vector![1, 1]);
        assert_eq!(cli.size, vector![1.0, 1.0]);
        assert_eq!(cli.layout, Layout::Portable);
        assert!(!cli.no_sidecar);
        assert!(cli.diffuse.is_empty());
    }

    #[test]
    fn flags() {
        let cli = Cli::try_parse_from([
            "plane",
            "--segments",
            "8,4",
            "--size",
            "10,5",
            "--layout",
            "host-native",
            "--diffuse",
            "grass.png",
            "--no-sidecar",
            "out.mesh",
        ])
        .unwrap();
        assert_eq!(cli.segments, vector![8, 4]);
        assert_eq!(cli.size, vector![10.0, 5.0]);
        assert_eq!(cli.layout, Layout::HostNative);
        assert_eq!(cli.diffuse, "grass.png");
        assert!(cli.no_sidecar);
    }
}
