use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use qrpix_core::{Ecl, Mode, Version, Zoom};
use qrpix_encode::{OutputFormat, Payload, Request, Sink};

#[derive(Parser)]
#[command(name = "qrpix")]
#[command(version)]
#[command(about = "Generate QR code images from the command line", long_about = None)]
struct Cli {
    #[arg(help = "Text to encode; read from --input or stdin if unspecified")]
    text: Option<String>,
    #[arg(short, long, conflicts_with = "text", help = "Input file whose bytes are encoded")]
    input: Option<PathBuf>,
    #[arg(
        short,
        long,
        help = "Output file or stdout if unspecified",
        long_help = "Output file or stdout if unspecified. Unless --format is given, the output format \
        is determined based on the extension of the file, or is text for stdout. \
        Supported formats are:\n\
        * text: txt\n\
        * images: png, bmp, gif, jpeg, tiff, pnm, ..."
    )]
    output: Option<PathBuf>,
    #[arg(short, long, help = "Output format, overriding the output extension")]
    format: Option<OutputFormat>,
    #[arg(short, long, default_value_t = Ecl::M, help = "Error correction level: L, M, Q or H")]
    ecl: Ecl,
    #[arg(short, long, default_value_t = Mode::Bytes, help = "Encoding mode: numeric, alphanumeric or bytes")]
    mode: Mode,
    #[arg(
        short,
        long = "symbol-version",
        default_value_t = 0,
        help = "Symbol version in 1..=40, or 0 to pick the smallest that fits"
    )]
    symbol_version: u8,
    #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..), help = "Pixels per module")]
    zoom: u32,
    #[arg(short, long, help = "Character set used to encode TEXT (UTF-8 if unspecified)")]
    charset: Option<String>,
}

impl Cli {
    fn payload(&mut self) -> Result<Payload> {
        if let Some(text) = self.text.take() {
            return Ok(Payload::Text(text));
        }
        let mut bytes = Vec::new();
        match &self.input {
            Some(path) => {
                std::fs::File::open(path)
                    .and_then(|mut f| f.read_to_end(&mut bytes))
                    .with_context(|| format!("cannot read '{}'", path.display()))?;
            }
            None => {
                std::io::stdin()
                    .read_to_end(&mut bytes)
                    .context("cannot read stdin")?;
            }
        }
        Ok(Payload::Bytes(bytes))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut cli = Cli::parse();
    let version = Version::from_selector(cli.symbol_version)?;
    let zoom = Zoom::try_from(cli.zoom)?;
    let payload = cli.payload()?;

    let mut request = Request::new(payload)
        .with_ecl(cli.ecl)
        .with_mode(cli.mode)
        .with_version(version)
        .with_zoom(zoom);
    if let Some(charset) = cli.charset {
        request = request.with_charset(charset);
    }

    match &cli.output {
        Some(path) => request
            .write(Sink::Path(path), cli.format)
            .with_context(|| format!("cannot write QR code to '{}'", path.display()))?,
        None => {
            let format = cli.format.unwrap_or(OutputFormat::Text);
            let mut stdout = std::io::stdout().lock();
            request
                .write(Sink::from(&mut stdout), Some(format))
                .context("cannot write QR code to stdout")?
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use std::ffi::OsStr;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["qrpix", "hello"]);
        assert_eq!(cli.text.as_deref(), Some("hello"));
        assert_eq!(cli.ecl, Ecl::M);
        assert_eq!(cli.mode, Mode::Bytes);
        assert_eq!(cli.symbol_version, 0);
        assert_eq!(cli.zoom, 4);
        assert!(cli.format.is_none());
    }

    #[test]
    fn test_symbol_options() {
        let cli = Cli::parse_from([
            "qrpix", "-e", "h", "-m", "A", "-s", "7", "-z", "2", "-f", "png", "-o", "qr.out", "QRPIX",
        ]);
        assert_eq!(cli.ecl, Ecl::H);
        assert_eq!(cli.mode, Mode::Alnum);
        assert_eq!(Version::from_selector(cli.symbol_version), Ok(Some(Version::V07)));
        assert_eq!(cli.format, Some(OutputFormat::PNG));
    }

    #[test]
    fn test_text_payload() {
        let mut cli = Cli::parse_from(["qrpix", "héllo"]);
        assert_eq!(cli.payload().unwrap(), Payload::Text("héllo".into()));
    }

    #[test]
    fn test_input_file_payload() {
        let path = std::env::temp_dir().join(format!("qrpix-cli-{}-input.bin", std::process::id()));
        let content = b"\x00\xffraw\ninput".to_vec();
        std::fs::write(&path, &content).unwrap();
        let mut cli = Cli::parse_from([OsStr::new("qrpix"), OsStr::new("-i"), path.as_os_str()]);
        let payload = cli.payload();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(payload.unwrap(), Payload::Bytes(content));
    }

    #[test]
    fn test_missing_input_file() {
        let path = std::env::temp_dir().join(format!("qrpix-cli-{}-missing.bin", std::process::id()));
        let mut cli = Cli::parse_from([OsStr::new("qrpix"), OsStr::new("-i"), path.as_os_str()]);
        let err = cli.payload().unwrap_err();
        assert!(err.to_string().starts_with("cannot read"));
    }

    #[test]
    fn test_input_conflicts_with_text() {
        assert!(Cli::try_parse_from(["qrpix", "-i", "data.bin", "text"]).is_err());
    }

    #[test]
    fn test_zero_zoom_rejected() {
        assert!(Cli::try_parse_from(["qrpix", "-z", "0", "x"]).is_err());
    }
}
