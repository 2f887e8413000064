use std::path::PathBuf;

use anyhow::{bail, Context};
use gf_auth::{FileCertificateProvider, LauncherConfig, SessionClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: gflauncher [--config <path>] [--raw] <username> <password> [account_id]";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    raw: bool,
    username: String,
    password: String,
    account_id: Option<String>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut parsed = Args::default();
        let mut positional = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().context("--config expects a path")?;
                    parsed.config = Some(PathBuf::from(path));
                }
                "--raw" => parsed.raw = true,
                "-h" | "--help" => bail!(USAGE),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        parsed.username = positional.next().context(USAGE)?;
        parsed.password = positional.next().context(USAGE)?;
        parsed.account_id = positional.next();

        Ok(parsed)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse(std::env::args().skip(1))?;

    let config_path = match args.config {
        Some(path) => path,
        None => LauncherConfig::default_path()?,
    };
    let config = if config_path.exists() {
        LauncherConfig::load(&config_path).await?
    } else {
        info!("No config at {}, using defaults", config_path.display());
        LauncherConfig::default()
    };

    let certificate_path = config
        .certificate_path
        .clone()
        .context("certificate_path must be set in the launcher config")?;
    let provider = FileCertificateProvider::new(certificate_path);

    let mut client = SessionClient::with_certificate_provider(config, &provider)
        .await
        .context("Failed to set up launcher client")?;

    client
        .authenticate(&args.username, &args.password)
        .await
        .context("Authentication failed")?;

    let accounts = client.list_accounts().await.context("Failed to list accounts")?;
    for account in &accounts {
        println!("{}\t{}", account.id, account.display_name);
    }

    let account_id = match args.account_id.or_else(|| accounts.first().map(|a| a.id.clone())) {
        Some(id) => id,
        None => bail!("No game accounts on this platform account"),
    };

    let code = client
        .fetch_code(&account_id, args.raw)
        .await
        .context("Failed to fetch game code")?;
    println!("{}", code);

    Ok(())
}
