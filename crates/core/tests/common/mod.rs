use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Lays out files under `root`, creating parent directories as needed.
/// Names use forward slashes.
#[allow(dead_code)]
pub fn write_tree(root: &Path, files: &[(&str, &[u8])]) {
    for (name, bytes) in files {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, bytes).unwrap();
    }
}

/// Writes a jar at `path` with the given entries, in order. An entry name
/// ending in `/` becomes a directory marker.
#[allow(dead_code)]
pub fn write_jar(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    for (name, bytes) in entries {
        if name.ends_with('/') {
            zip.add_directory(name.trim_end_matches('/'), options)
                .unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(bytes).unwrap();
        }
    }

    zip.finish().unwrap();
}
