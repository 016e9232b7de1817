//! Image-extension classification.
//!
//! Classification is by extension only — no content sniffing. The binder
//! decodes every file anyway, so a mislabelled file fails loudly at bind
//! time rather than silently changing which directories qualify.

use std::path::Path;

/// Extensions accepted as page images, matched case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Whether `path` has a supported image extension.
pub fn is_supported_image(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Strict check: `paths` is non-empty and every entry is an existing
/// regular file with a supported image extension.
///
/// Used on flat candidate lists (e.g. shell-expanded `*.jpg` arguments) to
/// decide whether the whole argument list is "just images". Any directory
/// or unsupported file among the inputs makes this false.
pub fn all_image_files(paths: &[impl AsRef<Path>]) -> bool {
    !paths.is_empty()
        && paths
            .iter()
            .all(|p| p.as_ref().is_file() && is_supported_image(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(is_supported_image("page1.jpg"));
        assert!(is_supported_image("page1.JPEG"));
        assert!(is_supported_image("/a/b/Page 3.PNG"));
        assert!(!is_supported_image("page1.gif"));
        assert!(!is_supported_image("page1.jpg.txt"));
        assert!(!is_supported_image("noextension"));
        assert!(!is_supported_image(""));
    }

    #[test]
    fn all_image_files_rejects_empty_input() {
        assert!(!all_image_files(&Vec::<&str>::new()));
    }

    #[test]
    fn all_image_files_requires_existing_regular_files() {
        let tmp = TempDir::new().unwrap();
        let img = tmp.path().join("a.jpg");
        fs::write(&img, b"x").unwrap();
        let sub = tmp.path().join("sub.png");
        fs::create_dir(&sub).unwrap();

        assert!(all_image_files(&[img.clone()]));
        // A directory, even with an image-like name, fails the strict check.
        assert!(!all_image_files(&[img.clone(), sub]));
        // A path that does not exist fails too.
        assert!(!all_image_files(&[img, tmp.path().join("missing.jpg")]));
    }
}
