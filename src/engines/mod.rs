//! OCR engine implementations and executable discovery.

pub mod tesseract;

use std::path::PathBuf;

/// Environment variable that pins the Tesseract executable, overriding
/// platform discovery.
pub const TESSERACT_CMD_VAR: &str = "TESSERACT_CMD";

/// Default install location checked on Windows.
#[cfg(windows)]
const WINDOWS_INSTALL_PATH: &str = r"C:\Program Files\Tesseract-OCR\tesseract.exe";

/// Locate the Tesseract executable.
///
/// Order: explicit override (config flag or `TESSERACT_CMD`), then the
/// well-known install directory on Windows, then a `which` lookup
/// elsewhere. Resolution happens once at startup; the result is handed
/// to the engine constructor.
pub fn locate_tesseract(override_path: Option<&str>) -> Option<PathBuf> {
    if let Some(cmd) = override_path {
        let path = PathBuf::from(cmd);
        if path.is_file() {
            return Some(path);
        }
        tracing::warn!("Configured Tesseract path {:?} does not exist", path);
        return None;
    }

    platform_lookup()
}

#[cfg(windows)]
fn platform_lookup() -> Option<PathBuf> {
    let path = PathBuf::from(WINDOWS_INSTALL_PATH);
    path.is_file().then_some(path)
}

#[cfg(not(windows))]
fn platform_lookup() -> Option<PathBuf> {
    use std::process::Command;

    let output = Command::new("which").arg("tesseract").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!path.is_empty()).then(|| PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_override_must_exist() {
        assert!(locate_tesseract(Some("/nonexistent/path/tesseract")).is_none());
    }

    #[test]
    fn test_override_accepts_existing_file() {
        // Any file works for the existence check; the binary is only
        // executed at recognition time
        let file = tempfile::NamedTempFile::new().unwrap();
        let found = locate_tesseract(Some(file.path().to_str().unwrap()));
        assert_eq!(found.as_deref(), Some(file.path()));
    }
}
