use clap::Subcommand;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Initialize the portal (create database and admin credential)
    Init {
        /// Data directory for the database and config file
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Admin username
        #[arg(long)]
        username: Option<String>,

        /// Admin password (generated when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Show portal status information
    Info {
        /// Data directory for the database and config file
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete expired aptitude tests and weekly quizzes
    Sweep {
        /// Data directory for the database and config file
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },
}
