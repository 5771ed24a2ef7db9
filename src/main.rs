use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use payfast::domain::amount::DEFAULT_TOLERANCE;
use payfast::domain::payment::PaymentRequest;
use payfast::domain::signature::{canonicalize, sign};
use payfast::interfaces::form::itn_request::{FormItnRequest, parse_form};
use payfast::{PayFastClient, PayFastConfig};
use rust_decimal::Decimal;
use serde_json::json;
use std::fs;
use std::io::{self, Read};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(author, version, about = "Sign payments and verify ITNs for a PayFast merchant", long_about = None)]
struct Cli {
    #[command(flatten)]
    merchant: MerchantArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct MerchantArgs {
    #[arg(long, env = "PAYFAST_MERCHANT_ID", global = true)]
    merchant_id: Option<String>,

    #[arg(long, env = "PAYFAST_MERCHANT_KEY", global = true)]
    merchant_key: Option<String>,

    /// Shared secret configured on the merchant account
    #[arg(long, env = "PAYFAST_PASSPHRASE", global = true, hide_env_values = true)]
    passphrase: Option<String>,

    /// Use the live gateway instead of the sandbox
    #[arg(long, env = "PAYFAST_PRODUCTION", global = true)]
    production: bool,

    /// Skip the advisory source address check
    #[arg(long, env = "PAYFAST_NO_VALIDATE_IP", global = true)]
    no_validate_ip: bool,

    /// Addresses ITNs are expected from (comma separated)
    #[arg(long, env = "PAYFAST_VALID_IPS", global = true, value_delimiter = ',')]
    valid_ips: Vec<IpAddr>,
}

impl MerchantArgs {
    fn config(&self) -> payfast::Result<PayFastConfig> {
        let mut builder = PayFastConfig::builder(
            self.merchant_id.clone().unwrap_or_default(),
            self.merchant_key.clone().unwrap_or_default(),
        )
        .sandbox(!self.production)
        .validate_ip(!self.no_validate_ip);
        if let Some(passphrase) = &self.passphrase {
            builder = builder.passphrase(passphrase.as_str());
        }
        if !self.valid_ips.is_empty() {
            builder = builder.valid_ips(self.valid_ips.iter().copied());
        }
        builder.build()
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the signature of a form-encoded field set
    Sign {
        /// Form-encoded input file, stdin when omitted
        input: Option<PathBuf>,

        /// Print the canonical string instead of the signature
        #[arg(long)]
        canonical: bool,
    },
    /// Print a signed, auto-submitting checkout page
    Checkout(CheckoutArgs),
    /// Verify a form-encoded ITN body and print the verdict as JSON
    Verify {
        /// Form-encoded ITN body, stdin when omitted
        input: Option<PathBuf>,

        /// Address the notification was received from
        #[arg(long)]
        source_ip: Option<IpAddr>,

        /// Order total the gross amount must match
        #[arg(long)]
        expected_amount: Option<Decimal>,

        /// Allowed difference between the gross and expected amounts
        #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: Decimal,
    },
}

#[derive(Args)]
struct CheckoutArgs {
    #[arg(long)]
    amount: Decimal,

    #[arg(long)]
    item_name: String,

    #[arg(long)]
    item_description: Option<String>,

    #[arg(long)]
    m_payment_id: Option<String>,

    #[arg(long)]
    return_url: Option<Url>,

    #[arg(long)]
    cancel_url: Option<Url>,

    #[arg(long)]
    notify_url: Option<Url>,

    #[arg(long)]
    name_first: Option<String>,

    #[arg(long)]
    name_last: Option<String>,

    #[arg(long)]
    email_address: Option<String>,

    /// Print the signed fields as JSON instead of HTML
    #[arg(long)]
    json: bool,
}

impl CheckoutArgs {
    fn to_request(&self) -> payfast::Result<PaymentRequest> {
        let mut request = PaymentRequest::new(self.amount, self.item_name.as_str())?;
        request.item_description = self.item_description.clone();
        request.m_payment_id = self.m_payment_id.clone();
        request.return_url = self.return_url.clone();
        request.cancel_url = self.cancel_url.clone();
        request.notify_url = self.notify_url.clone();
        request.name_first = self.name_first.clone();
        request.name_last = self.name_last.clone();
        request.email_address = self.email_address.clone();
        Ok(request)
    }
}

fn read_input(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => fs::read(path),
        _ => {
            let mut body = Vec::new();
            io::stdin().lock().read_to_end(&mut body)?;
            Ok(body)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Sign { input, canonical } => {
            let body = read_input(input.as_deref()).into_diagnostic()?;
            let fields = parse_form(&body)?;
            let passphrase = cli.merchant.passphrase.as_deref();
            if canonical {
                println!("{}", canonicalize(&fields, passphrase));
            } else {
                println!("{}", sign(&fields, passphrase));
            }
        }
        Command::Checkout(args) => {
            let client = PayFastClient::new(cli.merchant.config()?);
            let request = args.to_request()?;
            if args.json {
                let payment = client.create_payment(&request)?;
                println!("{}", serde_json::to_string_pretty(&payment).into_diagnostic()?);
            } else {
                print!("{}", client.generate_payment_form(&request)?);
            }
        }
        Command::Verify {
            input,
            source_ip,
            expected_amount,
            tolerance,
        } => {
            let client = PayFastClient::new(cli.merchant.config()?);
            let body = read_input(input.as_deref()).into_diagnostic()?;
            let request = FormItnRequest::new(body, source_ip);

            // Rejections still exit 0; the verdict carries the reason.
            let verdict = match client.verify_itn(&request).await {
                Ok(itn) => {
                    let amount_ok = expected_amount
                        .map(|expected| client.validate_payment_amount(&itn, expected, tolerance));
                    json!({
                        "valid": true,
                        "successful": client.is_payment_successful(&itn),
                        "amount_ok": amount_ok,
                        "notification": itn,
                    })
                }
                Err(e) => json!({
                    "valid": false,
                    "reason": e.reason(),
                    "rejection": e.to_http_rejection(),
                }),
            };
            println!("{}", serde_json::to_string_pretty(&verdict).into_diagnostic()?);
        }
    }

    Ok(())
}
