//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PipesHub control plane CLI
#[derive(Parser, Debug)]
#[command(name = "pipeshub-control")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML); environment variables override it
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the documentation server
    Serve {
        /// Port to listen on (defaults to PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List documentation modules
    Modules,

    /// List classified endpoints
    Endpoints {
        /// Only endpoints of this module
        #[arg(short, long)]
        module: Option<String>,

        /// Fetch the Python service document before listing
        #[arg(long)]
        with_python: bool,
    },

    /// Write the merged OpenAPI document
    Merge {
        /// Output file (.json or .yaml)
        #[arg(short, long)]
        output: PathBuf,

        /// Fetch the Python service document before merging
        #[arg(long)]
        with_python: bool,
    },

    /// Validate a credential file
    CheckCredential {
        /// Kind of credential
        #[arg(value_enum)]
        kind: CredentialKind,

        /// File to check
        file: PathBuf,
    },

    /// Apply configuration values to a connector and save them
    Configure {
        /// Connector name, e.g. "SharePoint Online"
        #[arg(long)]
        connector: String,

        /// JSON file with `auth`, `sync` and `filters` values
        #[arg(long = "values")]
        values: PathBuf,

        /// Configure for a business account
        #[arg(long)]
        business: bool,

        /// Service-account JSON file to upload
        #[arg(long)]
        service_account: Option<PathBuf>,

        /// PEM certificate file to upload
        #[arg(long)]
        certificate: Option<PathBuf>,

        /// PKCS#8 private key file to upload
        #[arg(long)]
        private_key: Option<PathBuf>,
    },
}

/// Credential file kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CredentialKind {
    /// Google service-account key (JSON)
    ServiceAccount,
    /// PEM certificate
    Certificate,
    /// PKCS#8 private key (PEM)
    PrivateKey,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}
