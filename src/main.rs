use std::{
    fs::File,
    io::{self, Read, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

use psd2_qwac::{Certificate, Extractor, GeneralNameEntry, IssuerCommonName, Psd2Extension, pem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum IssuerCn {
    Organization,
    CommonName,
}

impl From<IssuerCn> for IssuerCommonName {
    fn from(value: IssuerCn) -> Self {
        match value {
            IssuerCn::Organization => IssuerCommonName::Organization,
            IssuerCn::CommonName => IssuerCommonName::CommonName,
        }
    }
}

/// Extract PSD2 identity fields from a QWAC certificate
#[derive(Debug, Parser)]
#[command(name = "psd2-qwac", version, about)]
struct Cli {
    /// Certificate file: PEM, bare base64 or %0A-escaped base64. Standard input if omitted
    input: Option<PathBuf>,

    /// Source of certIssuerCommonName
    #[arg(long, value_enum, default_value_t = IssuerCn::Organization)]
    issuer_cn: IssuerCn,

    /// Print every SubjectAltName attribute instead of the extracted fields
    #[arg(long)]
    dump_san: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG takes precedence over -v
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn san_lines(input: &str) -> Result<Vec<String>> {
    let cert = Certificate::from_pem(pem::normalize(input).as_bytes())?;
    let psd2 = Psd2Extension::from_extensions(cert.extensions())?;

    let mut lines = Vec::new();
    for name in psd2.names() {
        match name {
            GeneralNameEntry::Structured(attributes) => {
                lines.extend(attributes.iter().map(|a| format!("{}:\"{}\"", a.oid, a.value_string())));
            }
            GeneralNameEntry::Unsupported(_) => {
                if let Some(type_id) = name.type_id() {
                    lines.push(format!("otherName:\"{type_id}\""));
                }
            }
        }
    }

    Ok(lines)
}

// Output is only written once extraction succeeded
fn run<R: Read, W: Write>(cli: &Cli, mut input: R, out: &mut W) -> Result<()> {
    let mut text = String::new();
    input
        .read_to_string(&mut text)
        .context("failed to read certificate input")?;
    debug!(len = text.len(), dump_san = cli.dump_san, "read certificate input");

    let output = if cli.dump_san {
        san_lines(&text)
            .context("failed to decode SubjectAltName")?
            .into_iter()
            .map(|line| line + "\n")
            .collect::<String>()
    } else {
        Extractor::new()
            .issuer_common_name(cli.issuer_cn.into())
            .extract(&text)
            .context("failed to extract certificate fields")?
            .to_key_value_string()
    };

    out.write_all(output.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut stdout = io::stdout().lock();

    match &cli.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            run(&cli, file, &mut stdout)
        }
        None => run(&cli, io::stdin().lock(), &mut stdout),
    }
}
