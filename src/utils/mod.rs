//! Path helpers

use std::path::Path;

/// Get relative path from base to target
pub fn relative_path(from: &Path, to: &Path) -> Option<String> {
    pathdiff::diff_paths(to, from).map(|p| path_to_module_id(&p))
}

/// Display a path relative to `base` when it lives under it
pub fn display_path(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(_) => relative_path(base, path).unwrap_or_else(|| path_to_module_id(path)),
        Err(_) => path_to_module_id(path),
    }
}

/// Convert a file path to a module ID with forward slashes
pub fn path_to_module_id(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_to_module_id() {
        assert_eq!(path_to_module_id(Path::new(r"src\Page\Home.elm")), "src/Page/Home.elm");
        assert_eq!(path_to_module_id(Path::new("/app/index.js")), "/app/index.js");
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/app"), Path::new("/app/dist/bundle.js")),
            Some("dist/bundle.js".to_string())
        );
        assert_eq!(
            relative_path(Path::new("/app/src"), Path::new("/app/index.js")),
            Some("../index.js".to_string())
        );
    }

    #[test]
    fn test_display_path() {
        assert_eq!(display_path(Path::new("/app/src/Main.elm"), Path::new("/app")), "src/Main.elm");
        assert_eq!(display_path(Path::new("/other/x.js"), Path::new("/app")), "/other/x.js");
    }
}
