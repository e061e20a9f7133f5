//! Configuration shared by coinwash server and monitor.

use ::std::{fs::File, io::BufReader};

use ::clap::Parser;
use ::serde::{de::DeserializeOwned, Deserialize};
use ::serde_json::from_reader;

use crate::error::{CoinwashError, Result};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
/// Command line arguments for coinwash services.
pub struct Args {
    /// path to the config file
    #[arg(long)]
    pub config_path: String,
}

impl Args {
    /// helper function for exporting the `clap::Parser::parse` function
    pub fn parse_args() -> Self {
        Args::parse()
    }
}

/// Credentials for signing in the database as root user.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Where the machine table lives.
/// `uri` is passed to SurrealDB as is, so `mem://` runs an in-process store
/// and `ws://host:port` connects to a running SurrealDB.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub credentials: Option<Credentials>,
    pub uri: String,
}

/// Load a json config file into `C`.
pub fn load_config<C: DeserializeOwned>(path: &str) -> Result<C> {
    let file = File::open(path).map_err(CoinwashError::fail_to_load_config)?;
    let reader = BufReader::new(file);
    from_reader(reader).map_err(CoinwashError::fail_to_load_config)
}
