use std::io::Write;
use std::path::PathBuf;

use jarscope_core::{Resources, SearchPath};

pub fn run(
    paths: Vec<PathBuf>,
    name: &str,
    encoding: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if name.is_empty() {
        return Err("resource name must not be empty".into());
    }
    let resources = Resources::new(SearchPath::detect(paths)?);

    match encoding {
        Some(label) => {
            let text = resources.read_to_string(name, label)?;
            print!("{text}");
        }
        None => {
            let bytes = resources.read(name)?;
            std::io::stdout().write_all(&bytes)?;
        }
    }

    Ok(())
}
