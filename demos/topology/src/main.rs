//! Topology Example
//!
//! Loads the local and global database configs and prints, for every
//! namespace, where each logical database lives.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package nsdb-topology -- --dir /var/run/redis/sonic-db
//! cargo run --package nsdb-topology -- --namespace asic0 --unix-socket
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use nsdb::config::logging::LoggingBuilder;
use nsdb::prelude::*;
use tracing::{Level, info};

#[derive(Parser)]
#[command(name = "nsdb-topology")]
#[command(about = "Print the database topology of every namespace", long_about = None)]
struct Cli {
    /// Directory holding database_config.json and database_global.json.
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Only load and print this namespace.
    #[arg(short, long)]
    namespace: Option<String>,

    /// Show unix socket paths instead of host:port.
    #[arg(long)]
    unix_socket: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingBuilder::new()
        .with_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let store = match &cli.dir {
        Some(dir) => Arc::new(ConfigStore::new(ConfigPaths::in_dir(dir))),
        None => ConfigStore::shared(),
    };

    let global = store.paths().global.clone();
    store.load_global_from(&global, cli.namespace.as_deref())?;

    let namespaces = match &cli.namespace {
        Some(ns) => vec![ns.clone()],
        None => store.namespace_names()?,
    };
    info!(count = namespaces.len(), "Namespaces resolved");

    for ns in &namespaces {
        print_namespace(&store, ns, cli.unix_socket)?;
    }
    Ok(())
}

fn print_namespace(store: &ConfigStore, namespace: &str, unix_socket: bool) -> Result<()> {
    let label = if namespace.is_empty() { "<default>" } else { namespace };
    println!("[{label}]");

    for db in store.database_names(namespace)? {
        let spec = store.database(&db, namespace)?;
        let instance = store.instance(&db, namespace)?;
        let endpoint = if unix_socket {
            instance.unix_socket_path
        } else {
            format!("{}:{}", instance.hostname, instance.port)
        };
        println!(
            "  {:<20} id={:<3} sep={:<2} {} ({})",
            db, spec.id, spec.separator, endpoint, spec.instance
        );
    }
    Ok(())
}
