//! Command line arguments and environment configuration.

use clap::{Args, Parser, Subcommand};
use registry_core::{AddressRecord, PersonRecord};
use std::path::PathBuf;

pub const DEFAULT_DB_FILE: &str = "person_registry.sqlite3";

/// Person registry command line.
#[derive(Parser, Debug)]
#[command(name = "person-registry")]
#[command(about = "Register people by tax code with shared, deduplicated addresses")]
#[command(version)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, env = "REGISTRY_DB", value_name = "PATH", default_value = DEFAULT_DB_FILE)]
    pub db: PathBuf,

    /// Use a throwaway in-memory database instead of `--db`
    #[arg(long)]
    pub in_memory: bool,

    /// trace|debug|info|warn|error (defaults by build mode); ignored unless
    /// `--log-dir` is set, since there is no console logger
    #[arg(long, env = "REGISTRY_LOG_LEVEL", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files; no file logging when unset
    #[arg(long, env = "REGISTRY_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new person
    Create {
        #[arg(long)]
        tax_code: String,
        #[command(flatten)]
        person: PersonArgs,
    },
    /// Register a new person from a JSON document (`-` reads stdin)
    CreateJson {
        #[arg(value_name = "FILE")]
        source: String,
    },
    /// Show one person
    Get { tax_code: String },
    /// List every person
    List,
    /// Find people whose name or surname contains QUERY
    Search {
        #[arg(allow_hyphen_values = true)]
        query: String,
    },
    /// Replace name, surname and address of a person
    Update {
        tax_code: String,
        #[command(flatten)]
        person: PersonArgs,
    },
    /// Remove a person; unknown tax codes are ignored
    Delete { tax_code: String },
}

#[derive(Args, Debug, Clone)]
pub struct PersonArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub surname: String,
    #[command(flatten)]
    pub address: AddressArgs,
}

#[derive(Args, Debug, Clone)]
pub struct AddressArgs {
    #[arg(long)]
    pub street: String,
    #[arg(long)]
    pub street_no: String,
    #[arg(long)]
    pub city: String,
    /// Two-letter code, any case
    #[arg(long)]
    pub province: String,
    #[arg(long)]
    pub country: String,
}

impl PersonArgs {
    /// Builds the transfer record the validation layer expects.
    pub fn to_record(&self, tax_code: &str) -> PersonRecord {
        PersonRecord {
            tax_code: tax_code.to_string(),
            name: self.name.clone(),
            surname: self.surname.clone(),
            address: Some(AddressRecord {
                street: self.address.street.clone(),
                street_no: self.address.street_no.clone(),
                city: self.address.city.clone(),
                province: self.address.province.clone(),
                country: self.address.country.clone(),
            }),
        }
    }
}
