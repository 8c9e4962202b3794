use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use chassis_core::utils::paths;
use chassis_core::{ConfigLoader, FactoryResolver, Kernel, ShutdownPolicy};

/// Chassis: a minimal service runtime
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Directory holding `<namespace>.config.<ext>` files
    /// (defaults to the CONFIG_DIR convention under the application root)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Directory default service locations are derived from
    #[arg(long)]
    services_dir: Option<PathBuf>,

    /// Report stop failures instead of terminating the process
    #[arg(long)]
    report_stop_failures: bool,
}

/// Register service constructors here as the application grows; every
/// service named in `kernel.services` must have a factory under its name.
fn build_resolver() -> FactoryResolver {
    FactoryResolver::new()
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args = CliArgs::parse();

    let config_dir = args.config_dir.unwrap_or_else(paths::config_path);
    let policy = if args.report_stop_failures {
        ShutdownPolicy::Report
    } else {
        ShutdownPolicy::Exit
    };

    let mut kernel = Kernel::new(ConfigLoader::new(config_dir), Box::new(build_resolver()))
        .with_shutdown_policy(policy);
    if let Some(dir) = args.services_dir {
        kernel = kernel.with_services_root(dir);
    }

    if let Err(err) = kernel.initialize().await {
        log::error!("Startup aborted: {err}");
        return ExitCode::FAILURE;
    }
    if let Err(err) = kernel.load_services().await {
        log::error!("Startup aborted: {err}");
        return ExitCode::FAILURE;
    }
    if !kernel.start_services().await {
        log::error!("Service startup failed; started services were rolled back");
        return ExitCode::FAILURE;
    }

    log::info!("All services running; waiting for ctrl-c");
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("Could not listen for shutdown signal: {err}");
    }

    if kernel.stop_services().await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
