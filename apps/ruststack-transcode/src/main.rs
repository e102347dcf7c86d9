//! RustStack Transcode - convert between model values and AWS wire formats.
//!
//! Reads a document from stdin and writes the result to stdout:
//!
//! - `encrypt`: a KMS `EncryptRequest` as JSON (PascalCase keys, base64
//!   `Plaintext`) becomes the `awsJson1_1` wire request;
//! - `signing-certificate`, `upload-signing-certificate`,
//!   `list-signing-certificates`: an IAM XML document becomes JSON.
//!
//! # Usage
//!
//! ```text
//! echo '{"KeyId":"alias/app","Plaintext":"aGk="}' | ruststack-transcode encrypt
//! ruststack-transcode list-signing-certificates < response.xml
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LOG_LEVEL` | `warn` | Log level filter |
//! | `LOG_FORMAT` | `text` | `text` or `json` |
//! | `KMS_ENDPOINT` | `https://kms.us-east-1.amazonaws.com` | URI of the printed KMS request |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod config;

use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use ruststack_iam_xml::{
    LIST_SIGNING_CERTIFICATES_RESULT, SIGNING_CERTIFICATE, StaxUnmarshaller,
    UPLOAD_SIGNING_CERTIFICATE_RESULT, from_xml, from_xml_element,
};
use ruststack_kms_json::{ENCRYPT_REQUEST_MARSHALLER, Marshaller};
use ruststack_kms_model::EncryptRequest;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, TranscodeConfig};

#[derive(Parser)]
#[command(
    name = "ruststack-transcode",
    about = "Transcode KMS JSON requests and IAM XML responses",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Marshall an EncryptRequest (JSON on stdin) into a KMS wire request
    Encrypt,

    /// Unmarshall a SigningCertificate document from stdin
    SigningCertificate {
        /// Read from the first element with this name instead of the root
        #[arg(long, value_name = "ELEMENT")]
        element: Option<String>,
    },

    /// Unmarshall an UploadSigningCertificate response from stdin
    UploadSigningCertificate,

    /// Unmarshall a ListSigningCertificates response from stdin
    ListSigningCertificates,
}

/// Printable form of a marshalled request.
#[derive(Debug, Serialize)]
struct PrintedRequest {
    service: &'static str,
    method: String,
    uri: String,
    headers: serde_json::Map<String, serde_json::Value>,
    body: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TranscodeConfig::from_env();
    init_tracing(&config)?;

    let input = read_stdin()?;
    let output = match cli.command {
        Command::Encrypt => encrypt(&config, &input)?,
        Command::SigningCertificate { element } => match element {
            Some(name) => unmarshall_element(&SIGNING_CERTIFICATE, &input, &name)?,
            None => {
                let cert = from_xml(&SIGNING_CERTIFICATE, &input)
                    .context("failed to unmarshall SigningCertificate document")?;
                to_json(&cert)?
            }
        },
        Command::UploadSigningCertificate => unmarshall_element(
            &UPLOAD_SIGNING_CERTIFICATE_RESULT,
            &input,
            "UploadSigningCertificateResult",
        )?,
        Command::ListSigningCertificates => unmarshall_element(
            &LIST_SIGNING_CERTIFICATES_RESULT,
            &input,
            "ListSigningCertificatesResult",
        )?,
    };

    println!("{output}");
    Ok(())
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise the configured log level. Output goes to
/// stderr so that stdout carries only the transcoded document.
fn init_tracing(config: &TranscodeConfig) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(&config.log_level)
            .with_context(|| format!("invalid log level filter: {}", config.log_level))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }

    Ok(())
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .context("failed to read stdin")?;
    Ok(input)
}

fn encrypt(config: &TranscodeConfig, input: &[u8]) -> Result<String> {
    let request: EncryptRequest =
        serde_json::from_slice(input).context("invalid EncryptRequest JSON")?;
    let wire = ENCRYPT_REQUEST_MARSHALLER
        .marshall(Some(&request))
        .context("failed to marshall EncryptRequest")?;
    let service = wire.service_name;
    info!(service, operation = %wire.operation, bytes = wire.content_length(), "marshalled request");

    let http_request = wire
        .into_http_request(&config.kms_endpoint)
        .with_context(|| format!("invalid KMS endpoint: {}", config.kms_endpoint))?;

    let headers = http_request
        .headers()
        .iter()
        .map(|(name, value)| {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            (name.as_str().to_owned(), serde_json::Value::String(value))
        })
        .collect();
    let printed = PrintedRequest {
        service,
        method: http_request.method().to_string(),
        uri: http_request.uri().to_string(),
        headers,
        body: String::from_utf8_lossy(http_request.body()).into_owned(),
    };
    to_json(&printed)
}

fn unmarshall_element<U>(unmarshaller: &U, input: &[u8], element: &str) -> Result<String>
where
    U: StaxUnmarshaller,
    U::Output: Serialize,
{
    let value = from_xml_element(unmarshaller, input, element)
        .with_context(|| format!("failed to unmarshall <{element}>"))?;
    info!(element, "unmarshalled response");
    to_json(&value)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output")
}
