use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use stubsmith::bootstrap;

mod commands;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Scaffolding helpers for PHP application projects", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Project directory (defaults to the nearest parent with composer.json)
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    /// Stub directory, overrides STUBSMITH_STUBS_DIR and the project config
    #[arg(long, global = true)]
    stubs: Option<PathBuf>,

    /// Never attach child processes to the terminal
    #[arg(long, global = true)]
    no_tty: bool,

    /// Show diagnostic logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a service provider in config/app.php after an existing one
    Provider {
        /// Existing provider class name (e.g. AppServiceProvider)
        after: String,

        /// Provider class name to add
        name: String,

        /// Namespace of the existing provider
        #[arg(long, default_value = bootstrap::DEFAULT_PROVIDER_NAMESPACE)]
        after_namespace: String,

        /// Namespace of the new provider
        #[arg(long, default_value = bootstrap::DEFAULT_PROVIDER_NAMESPACE)]
        namespace: String,
    },

    /// Register middleware in a group of app/Http/Kernel.php after an existing entry
    Middleware {
        /// Existing middleware entry (e.g. \Illuminate\Routing\Middleware\SubstituteBindings::class)
        after: String,

        /// Middleware entry to add
        name: String,

        /// Middleware group
        #[arg(long, default_value = bootstrap::DEFAULT_MIDDLEWARE_GROUP)]
        group: String,
    },

    /// Copy a stub into the project
    Stub {
        /// Stub name without the .stub extension
        name: String,

        /// Destination path, relative to the project root
        destination: PathBuf,

        /// Placeholder replacement, applied in order (repeatable)
        #[arg(long = "set", value_name = "SEARCH=REPLACE")]
        replace: Vec<String>,
    },

    /// Copy a directory from the stub directory into the project
    StubsDir {
        /// Directory inside the stub directory
        dir: String,

        /// Destination directory, relative to the project root
        destination: PathBuf,
    },

    /// Replace every occurrence of a string in a project file
    Replace {
        search: String,
        replace: String,
        file: PathBuf,
    },

    /// Create a directory (and parents) with mode 0755
    Mkdir { dir: PathBuf },

    /// Manage node packages
    Node {
        #[command(subcommand)]
        command: NodeCommands,
    },

    /// Manage composer packages
    Composer {
        #[command(subcommand)]
        command: ComposerCommands,
    },

    /// Print the fully qualified class name of a model
    Model { name: String },

    /// Print the PHP executable that would be used
    Php,
}

#[derive(Subcommand)]
enum NodeCommands {
    /// Add or update packages in package.json (name@constraint)
    Add {
        #[arg(required = true)]
        packages: Vec<String>,

        /// Write to dependencies instead of devDependencies
        #[arg(long)]
        prod: bool,
    },

    /// Remove packages from package.json
    Remove {
        #[arg(required = true)]
        packages: Vec<String>,

        /// Remove from dependencies instead of devDependencies
        #[arg(long)]
        prod: bool,
    },

    /// Install packages and build assets with the project's package manager
    Install,

    /// Delete node_modules and lockfiles
    Flush,
}

#[derive(Subcommand)]
enum ComposerCommands {
    /// Run composer require
    Require {
        #[arg(required = true)]
        packages: Vec<String>,

        /// Require as development dependencies
        #[arg(long)]
        dev: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let global = cli.global;
    let ctx = || commands::Context::load(global.path.as_deref(), global.stubs.clone(), global.no_tty);

    match cli.command {
        Commands::Provider {
            after,
            name,
            after_namespace,
            namespace,
        } => {
            commands::register::provider(&ctx()?, &after, &name, &after_namespace, &namespace)?;
        }
        Commands::Middleware { after, name, group } => {
            commands::register::middleware(&ctx()?, &after, &name, &group)?;
        }
        Commands::Stub {
            name,
            destination,
            replace,
        } => {
            commands::stub::copy(&ctx()?, &name, &destination, &replace)?;
        }
        Commands::StubsDir { dir, destination } => {
            commands::stub::copy_dir(&ctx()?, &dir, &destination)?;
        }
        Commands::Replace {
            search,
            replace,
            file,
        } => {
            commands::stub::replace(&ctx()?, &search, &replace, &file)?;
        }
        Commands::Mkdir { dir } => {
            commands::stub::mkdir(&ctx()?, &dir)?;
        }
        Commands::Node { command } => match command {
            NodeCommands::Add { packages, prod } => {
                commands::node::add(&ctx()?, &packages, !prod)?;
            }
            NodeCommands::Remove { packages, prod } => {
                commands::node::remove(&ctx()?, &packages, !prod)?;
            }
            NodeCommands::Install => {
                commands::node::install(&ctx()?)?;
            }
            NodeCommands::Flush => {
                commands::node::flush(&ctx()?)?;
            }
        },
        Commands::Composer { command } => match command {
            ComposerCommands::Require { packages, dev } => {
                commands::composer::require(&ctx()?, &packages, dev)?;
            }
        },
        Commands::Model { name } => {
            commands::model::qualify(&ctx()?, &name)?;
        }
        Commands::Php => {
            commands::model::php();
        }
    }

    Ok(())
}
