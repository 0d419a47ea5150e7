use std::path::PathBuf;

use jarscope_core::{Resources, SearchPath};
use regex::Regex;
use tracing::debug;

pub fn run(
    paths: Vec<PathBuf>,
    folder: &str,
    matching: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let resources = Resources::new(SearchPath::detect(paths)?);
    debug!("Listing folder: {:?}", folder);

    let names = match matching {
        Some(pattern) => {
            // The engine treats a malformed pattern as programmer error;
            // user input gets a clean message instead.
            Regex::new(pattern)?;
            resources.list_matching(folder, pattern)?
        }
        None => resources.list(folder)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for name in &names {
            println!("{name}");
        }
    }

    Ok(())
}
