use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::files::{BaseDirectory, FileMode};

/// Command line front end for the appfs file layer
#[derive(Parser, Debug)]
#[command(name = "appfs")]
#[command(about = "Inspect and manipulate files relative to application base directories")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct AppfsCli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (YAML, or JSON with a .json extension)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the resources directory
    #[arg(long, global = true)]
    pub resources_dir: Option<PathBuf>,

    /// Override the application data directory
    #[arg(long, global = true)]
    pub app_data_dir: Option<PathBuf>,

    /// Override the temp directory
    #[arg(long, global = true)]
    pub temp_dir: Option<PathBuf>,

    /// Resolve every path inside this base directory (resources, appdata, temp)
    #[arg(long, global = true)]
    pub base: Option<BaseDirectory>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Every path argument is a list of segments joined by the resolver;
/// `appdata://name` and `app://name` tokens are accepted.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report whether a path exists and what it is
    Exists { path: Vec<String> },

    /// Show all metadata for a path
    Stat { path: Vec<String> },

    /// Print file contents
    Read { path: Vec<String> },

    /// Replace file contents with --text, --from, or stdin
    Write {
        path: Vec<String>,
        /// Text to write
        #[arg(short, long, conflicts_with = "from")]
        text: Option<String>,
        /// Copy contents from another file
        #[arg(long)]
        from: Option<String>,
    },

    /// Append to a file, creating it if needed
    Append {
        path: Vec<String>,
        #[arg(short, long, conflicts_with = "from")]
        text: Option<String>,
        #[arg(long)]
        from: Option<String>,
    },

    /// Create a directory and its missing ancestors
    Mkdir { path: Vec<String> },

    /// Create an empty file
    Touch { path: Vec<String> },

    /// Delete a file
    Rm { path: Vec<String> },

    /// Delete a directory
    Rmdir {
        path: Vec<String>,
        #[arg(short, long)]
        recursive: bool,
    },

    /// Copy a file or directory
    Cp { source: String, destination: String },

    /// Move a file or directory
    Mv { source: String, destination: String },

    /// List direct children of a directory
    Ls { path: Vec<String> },

    /// Free space on the volume holding a path
    Df { path: Vec<String> },

    /// Print the absolute form of a path
    Resolve { path: Vec<String> },

    /// Print file contents through a read stream, chunk by chunk
    Cat {
        path: Vec<String>,
        /// Read buffer size in bytes
        #[arg(long, default_value = "8192")]
        chunk_size: usize,
    },

    /// Open a stream in a mode (read, write, append or 0, 1, 2). Read mode
    /// prints the file; writable modes send --text or stdin through it.
    Stream {
        path: Vec<String>,
        #[arg(short, long, default_value = "read")]
        mode: FileMode,
        #[arg(short, long)]
        text: Option<String>,
    },
}
