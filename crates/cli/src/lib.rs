mod cat;
mod extract;
mod list;
mod logging;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "jarscope",
    version,
    about = "Inspect resources across directories and jar archives",
    long_about = "Jarscope resolves and enumerates resources over an ordered search path of \
                  directory trees and zip/jar archives, the way a classpath does: the first \
                  entry holding a name wins, and folder listings merge every entry."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the resources under a logical folder
    #[command(
        long_about = "Merges the folder's entries from every search path entry, drops compiled \
                      .class files, and reports each name once, in first-encountered order."
    )]
    List {
        /// Search path entry (directory or archive), highest priority first
        #[arg(short = 'p', long = "path", required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
        /// Logical folder to enumerate; empty lists the whole namespace
        #[arg(value_name = "FOLDER", default_value = "")]
        folder: String,
        /// Keep only names this regular expression matches in full
        #[arg(long, value_name = "REGEX")]
        matching: Option<String>,
        /// Print the names as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Print a resource to stdout
    #[command(
        long_about = "Resolves the name against the search path and writes the first match's \
                      bytes to stdout. With --encoding the bytes are decoded first and printed \
                      as text."
    )]
    Cat {
        /// Search path entry (directory or archive), highest priority first
        #[arg(short = 'p', long = "path", required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
        /// Logical name of the resource
        #[arg(value_name = "NAME")]
        name: String,
        /// Decode with this encoding label instead of copying raw bytes
        #[arg(long, value_name = "ENCODING")]
        encoding: Option<String>,
    },
    /// Copy a resource into a temporary file and print its path
    #[command(
        long_about = "Resolves the name and materializes the bytes into a fresh temporary \
                      file. The file is not cleaned up; deleting it is up to the caller."
    )]
    Extract {
        /// Search path entry (directory or archive), highest priority first
        #[arg(short = 'p', long = "path", required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
        /// Logical name of the resource
        #[arg(value_name = "NAME")]
        name: String,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logging::init_logging();

    match cli.command {
        Commands::List {
            paths,
            folder,
            matching,
            json,
        } => list::run(paths, &folder, matching.as_deref(), json),
        Commands::Cat {
            paths,
            name,
            encoding,
        } => cat::run(paths, &name, encoding.as_deref()),
        Commands::Extract { paths, name } => extract::run(paths, &name),
    }
}
