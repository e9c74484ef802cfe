use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// AVALON: API test scenario workbench server
#[derive(Parser)]
#[command(name = "avalon", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Port to bind (defaults to AVALON_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Inspect or edit projects in a snapshot file
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects in the snapshot
    List {
        #[arg(long, env = "AVALON_DATA_FILE")]
        data_file: PathBuf,
    },
    /// Delete a project by its external name
    Delete {
        #[arg(long, env = "AVALON_DATA_FILE")]
        data_file: PathBuf,
        /// External project name
        project_id: String,
    },
}
