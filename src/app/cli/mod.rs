//! CLI Adapter.

mod prompts;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::app::api::{self, InstallOutcome};
use crate::domain::installation::{
    DEFAULT_AUTH_PACKAGE, DEFAULT_AUTH_URL, DEFAULT_EMAIL_URL, DEFAULT_SITE_NAME,
    default_target_dir, validate_package_name, validate_site_name,
};
use crate::domain::{AppError, BACKUP_DIR, BackendUrls, BundleType, InstallRequest, InstallType};

#[derive(Parser)]
#[command(name = "create-conjoon")]
#[command(version)]
#[command(about = "Create or update conjoon installations", long_about = None)]
struct Cli {
    /// Name of the site
    name: Option<String>,
    /// Directory the site is created in [default: current directory]
    root_dir: Option<PathBuf>,
    /// Install into this directory instead of <ROOT_DIR>/<NAME>
    #[arg(long)]
    target_dir: Option<PathBuf>,
    /// Installation type (quick, custom)
    #[arg(long)]
    install_type: Option<InstallType>,
    /// Where to get conjoon from (release, npm)
    #[arg(long)]
    bundle: Option<BundleType>,
    /// Version to install
    #[arg(long)]
    release_version: Option<String>,
    /// Base URL of the auth service (custom installations)
    #[arg(long)]
    auth_url: Option<String>,
    /// Base URL of the email service (custom installations)
    #[arg(long)]
    email_url: Option<String>,
    /// Package authenticating users (custom installations)
    #[arg(long)]
    auth_package: Option<String>,
    /// Update an existing installation, keeping its configuration
    #[arg(long)]
    overwrite: bool,
    /// Installer configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print diagnostic output
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the CLI.
pub fn run() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // help and version print to stdout
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };
    init_tracing(cli.verbose);

    if let Err(e) = run_install(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let mut env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    if verbose && let Ok(directive) = "create_conjoon=debug".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();
}

/// Answer from a prompt, or `Cancelled` when the user backed out.
fn answered<T>(answer: Option<T>) -> Result<T, AppError> {
    answer.ok_or_else(|| AppError::Cancelled("Installation cancelled".to_string()))
}

fn run_install(cli: Cli) -> Result<(), AppError> {
    let config = api::load_config(cli.config.as_deref())?;
    let interactive = std::io::stdin().is_terminal();

    let site_name = match cli.name {
        Some(name) => {
            validate_site_name(&name)?;
            name.trim().to_string()
        }
        None if interactive => answered(prompts::site_name()?)?,
        None => DEFAULT_SITE_NAME.to_string(),
    };

    let target_dir = match cli.target_dir {
        Some(dir) => dir,
        None => {
            let root = match cli.root_dir {
                Some(root) => root,
                None => std::env::current_dir()?,
            };
            let default = default_target_dir(&root, &site_name);
            if interactive { answered(prompts::target_dir(&default)?)? } else { default }
        }
    };

    let overwrite = cli.overwrite || (interactive && confirm_existing(&target_dir)?);

    let install_type = match cli.install_type {
        Some(kind) => kind,
        None if interactive => answered(prompts::install_type()?)?,
        None => InstallType::Quick,
    };

    let bundle = match cli.bundle {
        Some(bundle) => bundle,
        None if interactive => answered(prompts::bundle()?)?,
        None => BundleType::Release,
    };

    let version = match cli.release_version {
        Some(version) => version.trim().trim_start_matches('v').to_string(),
        None if install_type == InstallType::Custom && interactive => {
            let versions = api::available_versions(&config)?;
            answered(prompts::version(&versions)?)?
        }
        None => api::latest_version(&config)?,
    };

    let (urls, auth_package) = match install_type {
        InstallType::Quick => (None, DEFAULT_AUTH_PACKAGE.to_string()),
        InstallType::Custom => {
            let auth = choose_url(cli.auth_url, "auth", DEFAULT_AUTH_URL, interactive)?;
            let email = choose_url(cli.email_url, "email", DEFAULT_EMAIL_URL, interactive)?;
            let auth_package = match cli.auth_package {
                Some(package) => {
                    validate_package_name(&package)?;
                    package
                }
                None if interactive => answered(prompts::auth_package(DEFAULT_AUTH_PACKAGE)?)?,
                None => DEFAULT_AUTH_PACKAGE.to_string(),
            };
            (Some(BackendUrls::new(&auth, &email)?), auth_package)
        }
    };

    let request = InstallRequest {
        site_name,
        target_dir,
        version,
        install_type,
        bundle,
        urls,
        auth_package,
        overwrite,
    };

    println!(
        "Installing conjoon {} ({}, {}) into {}",
        request.version,
        request.install_type,
        request.bundle,
        request.target_dir.display()
    );
    let outcome = api::install(&request, config)?;
    print_outcome(&request, &outcome);
    Ok(())
}

/// Ask before touching an existing target. Declining is a cancellation.
fn confirm_existing(target: &Path) -> Result<bool, AppError> {
    if !target.exists() {
        return Ok(false);
    }
    match prompts::confirm_overwrite(target)? {
        Some(true) => Ok(true),
        _ => Err(AppError::TargetExists(target.display().to_string())),
    }
}

fn choose_url(
    given: Option<String>,
    label: &str,
    default: &str,
    interactive: bool,
) -> Result<String, AppError> {
    match given {
        Some(url) => Ok(url),
        None if interactive => answered(prompts::service_url(label, default)?),
        None => Ok(default.to_string()),
    }
}

fn print_outcome(request: &InstallRequest, outcome: &InstallOutcome) {
    if outcome.updated {
        println!("✅ Updated {} to conjoon {}", outcome.target.display(), outcome.version);
    } else {
        println!("✅ Created {} with conjoon {}", outcome.target.display(), outcome.version);
    }

    if !outcome.backups.is_empty() {
        println!(
            "  Backed up {} configuration file(s) to {}",
            outcome.backups.len(),
            outcome.target.join(BACKUP_DIR).display()
        );
    }

    if !outcome.warnings.is_empty() {
        println!("⚠️  Installation warnings:");
        for warning in &outcome.warnings {
            println!("  • {}", warning);
        }
    }

    if outcome.has_misses() {
        println!("⚠️  Values of your previous configuration without a place in the new one:");
        for merge in outcome.merges.iter().filter(|merge| !merge.misses.is_empty()) {
            println!("  {} ({}):", merge.path.display(), merge.kind.label());
            for miss in &merge.misses {
                println!("{}", miss);
            }
        }
    }

    match request.bundle {
        BundleType::Npm => {
            println!();
            println!("Inside that directory, you can run:");
            println!("  npm start        starts the development server");
            println!("  npm run build    bundles the installation for production");
            println!();
            println!("Get started with:");
            println!("  cd {}", outcome.target.display());
            println!("  npm run stage");
        }
        BundleType::Release => {
            println!();
            println!("Serve {} with a web server of your choice.", outcome.target.display());
        }
    }
    println!("Documentation: https://conjoon.org");
}
