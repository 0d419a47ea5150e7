use std::path::PathBuf;

use jarscope_core::{Resources, SearchPath};
use tracing::debug;

pub fn run(paths: Vec<PathBuf>, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    if name.is_empty() {
        return Err("resource name must not be empty".into());
    }
    let resources = Resources::new(SearchPath::detect(paths)?);

    let path = resources.extract(name)?;
    debug!("Extracted resource: {}", name);
    println!("{}", path.display());

    Ok(())
}
