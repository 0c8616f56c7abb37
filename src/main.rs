use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use data_encoding::BASE64;
use thiserror::Error;
use wbxml::fmt::{format_escaped, format_hex};
use wbxml::{
    CodePageDictionary, Element, Encoder, EncoderConfig, EncodingError, EncodingReport, PublicId,
    UnknownNamespacePolicy, WbxmlVersion,
};

#[derive(Parser)]
#[command(
    name = "wbxml",
    version,
    about = "Encode XML documents into WBXML with the Exchange ActiveSync code pages"
)]
struct Cli {
    /// Input file (stdin when omitted or -)
    input: Option<PathBuf>,

    /// Input format
    #[arg(long, value_enum, default_value_t = InputFormat::Xml)]
    from: InputFormat,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Hex)]
    output: OutputFormat,

    /// Intern text and attribute values in the string table
    #[arg(long)]
    string_table: bool,

    /// Fail on namespaces without a code page instead of writing LITERAL names
    #[arg(long)]
    reject_unknown_namespaces: bool,

    /// Drop whitespace-only text between elements
    #[arg(long)]
    ignore_whitespace: bool,

    /// Numeric public identifier written in the header
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    public_id: Option<u32>,

    /// WBXML version written in the header (1.1, 1.2 or 1.3)
    #[arg(long, value_name = "VERSION", default_value = "1.3")]
    wbxml_version: WbxmlVersion,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// XML text
    Xml,
    /// JSON element tree
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Space separated hex bytes
    Hex,
    /// Standard base64
    Base64,
    /// Byte-string notation
    Escaped,
    /// Raw bytes
    Raw,
    /// JSON report
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON element tree: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl Cli {
    fn config(&self) -> EncoderConfig {
        EncoderConfig {
            version: self.wbxml_version,
            public_id: self.public_id.map_or(PublicId::Unknown, PublicId::Known),
            unknown_namespaces: if self.reject_unknown_namespaces {
                UnknownNamespacePolicy::Reject
            } else {
                UnknownNamespacePolicy::Literal
            },
            string_table: self.string_table,
            ignore_whitespace: self.ignore_whitespace,
            ..EncoderConfig::default()
        }
    }

    fn read_input(&self) -> Result<String, CliError> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => Ok(fs::read_to_string(path)?),
            _ => {
                let mut input = String::new();
                io::stdin().read_to_string(&mut input)?;
                Ok(input)
            }
        }
    }
}

fn run(cli: &Cli) -> Result<EncodingReport, CliError> {
    let input = cli.read_input()?;
    let config = cli.config();
    let dictionary = CodePageDictionary::try_activesync().map_err(EncodingError::from)?;

    let encoder = match cli.from {
        InputFormat::Xml => Encoder::from_xml(&input, dictionary, config.clone())?,
        InputFormat::Json => {
            let document: Element = serde_json::from_str(&input)?;
            Encoder::new(document, dictionary, config.clone())?
        }
    };

    Ok(EncodingReport::new(&config, encoder.encode()?))
}

fn write_output(format: OutputFormat, report: EncodingReport) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Hex => writeln!(stdout, "{}", format_hex(report.bytes())),
        OutputFormat::Base64 => writeln!(stdout, "{}", BASE64.encode(report.bytes())),
        OutputFormat::Escaped => writeln!(stdout, "{}", format_escaped(report.bytes())),
        OutputFormat::Raw => stdout.write_all(report.bytes()),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "success",
                "data": report,
            });
            writeln!(stdout, "{}", serde_json::to_string_pretty(&output)?)
        }
    }?;
    stdout.flush()
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = run(&cli).map_err(|e| e.to_string()).and_then(|report| {
        write_output(cli.output, report).map_err(|e| format!("failed to write output: {e}"))
    });

    if let Err(message) = result {
        if cli.output == OutputFormat::Json {
            let output = serde_json::json!({
                "status": "error",
                "error": message,
            });
            println!("{}", output);
        } else {
            eprintln!("Error: {}", message);
        }
        process::exit(1);
    }
}
