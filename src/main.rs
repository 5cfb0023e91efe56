use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{info, error};
use std::process;

use profile_registration::config;

mod cli;

/// Profile Registration - register users with a profile photo into local storage
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Sets the configuration file
    #[clap(short, long, value_name = "FILE", default_value = "config.toml")]
    config: String,

    /// Turn debugging information on
    #[clap(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user; missing fields are prompted for
    Register {
        /// First name
        #[clap(long)]
        firstname: Option<String>,

        /// Last name
        #[clap(long)]
        lastname: Option<String>,

        /// Company
        #[clap(long)]
        company: Option<String>,

        /// Email address
        #[clap(short, long)]
        email: Option<String>,

        /// Password
        #[clap(short, long)]
        password: Option<String>,

        /// Profile photo file
        #[clap(long, value_name = "PATH")]
        photo: String,
    },

    /// List all registered users
    List {},

    /// Rate a password's strength
    Strength {
        /// Password to rate
        password: String,
    },

    /// Check whether an email is already registered
    CheckEmail {
        /// Email address
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Verbosity picks the default level; RUST_LOG still wins
    let default_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Starting Profile Registration");

    match config::load_config(&cli.config) {
        Ok(_) => {
            info!("Configuration loaded successfully");
        }
        Err(err) => {
            error!("Failed to load configuration: {:#}", err);
            process::exit(1);
        }
    }

    let result = match cli.command {
        Commands::Register { firstname, lastname, company, email, password, photo } => {
            let args = cli::user::RegisterArgs {
                firstname,
                lastname,
                company,
                email,
                password,
                photo,
            };
            cli::user::register(args).await.map(|registered| !registered)
        }
        Commands::List {} => cli::user::list_users().map(|_| false),
        Commands::Strength { password } => cli::user::show_strength(&password).map(|_| false),
        Commands::CheckEmail { email } => cli::user::check_email(&email),
    };

    // Exit 2 when the registration did not go through or the email is taken
    match result {
        Ok(false) => {}
        Ok(true) => process::exit(2),
        Err(err) => {
            error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            process::exit(1);
        }
    }
}
