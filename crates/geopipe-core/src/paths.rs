use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "geopipe.yaml";

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_lives_at_root() {
        assert_eq!(
            config_path(Path::new("/proj")),
            PathBuf::from("/proj/geopipe.yaml")
        );
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let base = Path::new("/scripts");
        assert_eq!(
            resolve_relative(base, Path::new("run.geojson")),
            PathBuf::from("/scripts/run.geojson")
        );
        assert_eq!(
            resolve_relative(base, Path::new("/data/run.geojson")),
            PathBuf::from("/data/run.geojson")
        );
    }
}
