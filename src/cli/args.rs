use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(
    name = "workshop-manager",
    about = "Install and manage PHP School workshops",
    long_about = "Installs, updates and removes PHP School workshops from the remote catalog, \
                  and links each one as a command on your PATH",
    version,
    next_line_help = false,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install a workshop from the catalog
    Install {
        /// Workshop code, e.g. learnyouphp
        code: String,

        /// Install a branch instead of the latest release
        #[arg(long, value_name = "BRANCH")]
        branch: Option<String>,

        /// Download the branch from this GitHub repository (a fork)
        #[arg(long, value_name = "URL", requires = "branch")]
        repo: Option<String>,
    },

    /// Remove an installed workshop
    #[command(visible_alias = "remove")]
    Uninstall {
        /// Workshop code
        code: String,
    },

    /// Update an installed workshop to its latest release
    Update {
        /// Workshop code
        code: String,
    },

    /// Search the catalog by code or name
    Search {
        /// Search term (typos are tolerated)
        term: String,
    },

    /// List installed workshops
    #[command(visible_alias = "list")]
    Installed {
        /// Look up the latest release of each workshop
        #[arg(long)]
        check_updates: bool,
    },

    /// Link an installed workshop's command into the bin directory
    Link {
        /// Workshop code
        code: String,
    },

    /// Remove an installed workshop's command link
    Unlink {
        /// Workshop code
        code: String,
    },

    /// Check that the environment can install and run workshops
    Verify,

    /// Show effective settings
    Settings,

    /// Generate shell completions
    #[command(hide = true)]
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}
