use crate::error::Result;
use crate::features::FeatureCollection;
use std::io::Write;
use std::path::Path;

/// Replace `path` with `data` in one rename. The bytes are staged in a hidden
/// `.geopipe-*` file beside the target and flushed to disk first.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut staged = tempfile::Builder::new()
        .prefix(".geopipe-")
        .tempfile_in(dir)?;
    staged.write_all(data)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Export a collection as pretty GeoJSON with a trailing newline.
pub fn write_collection(path: &Path, collection: &FeatureCollection) -> Result<()> {
    let mut json = collection.to_json_pretty()?;
    json.push('\n');
    atomic_write(path, json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Feature, Geometry};
    use tempfile::TempDir;

    #[test]
    fn replaces_existing_file_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/state.geojson");
        atomic_write(&path, b"first").unwrap();
        atomic_write(&path, b"second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");

        let names: Vec<_> = std::fs::read_dir(dir.path().join("out"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["state.geojson"]);
    }

    #[test]
    fn exported_collection_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("final.geojson");
        let fc = FeatureCollection::new(vec![Feature::new(Geometry::point(1.0, 2.0))])
            .named("track");
        write_collection(&path, &fc).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with("}\n"));
        assert_eq!(FeatureCollection::from_json(&raw).unwrap(), fc);
    }
}
