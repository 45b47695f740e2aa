use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vrcf_installer::config::InstallerConfig;
use vrcf_installer::di::ServiceContainer;
use vrcf_installer::dispatch::MainThreadExecutor;
use vrcf_installer::host::HeadlessHost;
use vrcf_installer::package::PackageInstaller;
use vrcf_installer::{format_error_with_help, InstallerError, InstallerResult, SupportLinks};

/// Run the VRCFury self-update against a project directory, without the editor
#[derive(Parser)]
#[command(name = "vrcf-installer")]
#[command(version)]
struct Cli {
    /// Project root (the directory containing Assets/ and Packages/)
    #[arg(short, long, default_value = ".")]
    project: PathBuf,

    /// YAML file with installer config overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the package download URL
    #[arg(long)]
    url: Option<String>,

    /// Override the pause (in seconds) after removing an old install
    #[arg(long)]
    restart_delay: Option<u64>,
}

fn load_config(cli: &Cli) -> InstallerResult<InstallerConfig> {
    let mut config = match &cli.config {
        Some(path) => InstallerConfig::from_yaml_file(path)?,
        None => InstallerConfig::default(),
    };
    if let Some(url) = &cli.url {
        config.download_url = url.clone();
    }
    if let Some(delay) = cli.restart_delay {
        config.restart_delay_secs = delay;
    }
    Ok(config)
}

fn project_root(cli: &Cli) -> InstallerResult<PathBuf> {
    std::fs::canonicalize(&cli.project).map_err(|e| {
        InstallerError::Config(format!(
            "Project directory {} is not accessible: {}",
            cli.project.display(),
            e
        ))
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let setup = load_config(&cli).and_then(|config| Ok((config, project_root(&cli)?)));
    let (config, root) = match setup {
        Ok(setup) => setup,
        Err(e) => {
            eprintln!("\n{}", format_error_with_help(&e, &SupportLinks::default()));
            return ExitCode::FAILURE;
        }
    };

    let host = Arc::new(HeadlessHost::new(root));
    let services = ServiceContainer::new(host, config);
    let (main_thread, executor) = MainThreadExecutor::new();

    // This thread plays the host's main thread until the run lets go of it
    let run = PackageInstaller::new(services, main_thread).launch();
    executor.run().await;

    match run.await {
        Ok(outcome) if outcome.is_failure() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Installer task aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
