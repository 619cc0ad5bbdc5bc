mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::{debug, error, info, LevelFilter};

use plugdeps_core::kernel::constants::{ACTION_ACTIVATE, ACTION_DEACTIVATE, APP_NAME, APP_VERSION};
use plugdeps_core::plugin_system::{DependencyManager, PluginRegistry, PluginSystemError};
use plugdeps_core::storage::{load_registry, save_registry};
use plugdeps_core::Result;

/// Plugdeps: dependency resolution for host-managed plugins
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// State file holding installed plugins and activation state (.json, .yaml, .toml)
    #[arg(short, long)]
    state: PathBuf,

    /// Show what would change without writing the state file
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List installed plugins
    List,
    /// Show the resolved dependencies of a plugin
    Deps {
        /// Plugin identifier
        id: String,
    },
    /// Show the capabilities a plugin provides
    Provided {
        /// Plugin identifier
        id: String,
    },
    /// Show the plugins providing a capability
    Providers {
        /// Plugin identifier or virtual capability
        capability: String,
    },
    /// Show unmet requirements, for one plugin or all of them
    Notices {
        /// Plugin display name
        name: Option<String>,
    },
    /// Show whether a plugin can be activated
    Status {
        /// Plugin identifier
        id: String,
    },
    /// Deactivate plugins along with everything depending on them
    Deactivate {
        /// Plugin identifiers
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Activate plugins, deactivating conflicting providers first
    Activate {
        /// Plugin identifiers
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();
    if let Err(e) = builder.try_init() {
        eprintln!("Failed to initialize logger: {}", e);
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);
    debug!("{} {}: {:?}", APP_NAME, APP_VERSION, args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let mut registry = load_registry(&args.state)?;
    let manager = DependencyManager::init(&registry)?;
    let graph = manager.graph();

    match &args.command {
        Commands::List => print!("{}", cli::render_list(&registry)),
        Commands::Deps { id } => {
            let deps = manager.get_dependencies(id)?;
            print!("{}", cli::render_items(deps, "No dependencies."));
        }
        Commands::Provided { id } => {
            let provided = manager.get_provided(id)?;
            print!("{}", cli::render_items(provided, "Nothing provided."));
        }
        Commands::Providers { capability } => {
            let providers = manager.get_providers(capability);
            print!("{}", cli::render_providers(graph, capability, &providers));
        }
        Commands::Notices { name: Some(name) } => {
            let notices = manager.get_requirement_notices(name)?;
            print!("{}", cli::render_notices(name, notices));
        }
        Commands::Notices { name: None } => {
            let all = manager.get_all_requirement_notices();
            if all.is_empty() {
                println!("All plugin requirements are met.");
            }
            for (name, notices) in all {
                print!("{}", cli::render_notices(name, notices));
            }
        }
        Commands::Status { id } => {
            let status = manager.activation_status(&registry, id)?;
            print!("{}", cli::render_status(graph, &status));
        }
        Commands::Deactivate { ids } => {
            ensure_installed(&registry, ids)?;
            let report = manager.handle_action(&mut registry, ACTION_DEACTIVATE, ids)?;
            for id in ids {
                registry.deactivate_plugin(id);
            }
            println!("Deactivated: {}", ids.join(", "));
            print!("{}", cli::render_report(graph, &report));
            persist(args, &registry)?;
        }
        Commands::Activate { ids } => {
            ensure_installed(&registry, ids)?;
            for id in ids {
                let status = manager.activation_status(&registry, id)?;
                let allowed = if registry.network {
                    status.can_network_activate
                } else {
                    status.can_activate
                };
                if !allowed {
                    return Err(PluginSystemError::ActivationBlocked {
                        plugin_id: id.clone(),
                    }
                    .into());
                }
            }

            let report = manager.handle_action(&mut registry, ACTION_ACTIVATE, ids)?;
            for id in ids {
                if registry.network {
                    registry.activate_plugin_for_network(id)?;
                } else {
                    registry.activate_plugin(id)?;
                }
            }
            println!("Activated: {}", ids.join(", "));
            print!("{}", cli::render_report(graph, &report));
            persist(args, &registry)?;
        }
    }

    Ok(())
}

fn ensure_installed(registry: &PluginRegistry, ids: &[String]) -> Result<()> {
    match ids.iter().find(|id| !registry.has_plugin(id)) {
        Some(id) => Err(PluginSystemError::not_found(id.as_str()).into()),
        None => Ok(()),
    }
}

fn persist(args: &CliArgs, registry: &PluginRegistry) -> Result<()> {
    if args.dry_run {
        println!("Dry run: {} left unchanged.", args.state.display());
        return Ok(());
    }
    save_registry(&args.state, registry)?;
    info!("Wrote state to {}", args.state.display());
    Ok(())
}
