//! pf - A versioned, age-encrypted password store.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pf::cli::output;
use pf::cli::{execute, Cli};
use pf::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("PF_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("pf=debug")
        } else {
            EnvFilter::new("pf=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::MissingStore) => Some("pass --store <dir> or set PF_STORE"),
            Error::Config(ConfigError::NotAStore(_)) => Some("run: pf init --store <dir>"),
            Error::Cipher(pf::error::CipherError::NoIdentities) => {
                Some("pass --identity <file> or set PF_IDENTITY")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
