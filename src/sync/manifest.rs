//! Assets manifest scanning.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "gif"];

/// Folder key of the scan root itself.
pub const ROOT_FOLDER: &str = "root";

pub fn is_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Map every folder under `root` holding images to its sorted image names.
/// Folder keys are `/`-joined relative paths. A missing root yields an empty map.
pub fn scan_assets(root: &Path) -> io::Result<BTreeMap<String, Vec<String>>> {
    let mut manifest = BTreeMap::new();
    if root.is_dir() {
        scan_dir(root, &mut Vec::new(), &mut manifest)?;
    }
    Ok(manifest)
}

fn scan_dir(
    dir: &Path,
    rel: &mut Vec<String>,
    manifest: &mut BTreeMap<String, Vec<String>>,
) -> io::Result<()> {
    let mut images = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            rel.push(name);
            scan_dir(&entry.path(), rel, manifest)?;
            rel.pop();
        } else if file_type.is_file() && is_image(&name) {
            images.push(name);
        }
    }

    if !images.is_empty() {
        images.sort();
        let key = if rel.is_empty() {
            ROOT_FOLDER.to_string()
        } else {
            rel.join("/")
        };
        manifest.insert(key, images);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image() {
        assert!(is_image("hero.JPG"));
        assert!(is_image("logo.webp"));
        assert!(!is_image("notes.txt"));
        assert!(!is_image("png"));
    }

    #[test]
    fn test_scan_assets() {
        let root = std::env::temp_dir().join(format!("site-data-assets-{}", std::process::id()));
        fs::create_dir_all(root.join("home-page/logos")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("favicon.png"), b"").unwrap();
        fs::write(root.join("home-page/logos/b.png"), b"").unwrap();
        fs::write(root.join("home-page/logos/a.gif"), b"").unwrap();
        fs::write(root.join("home-page/logos/readme.md"), b"").unwrap();

        let manifest = scan_assets(&root).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest["root"], vec!["favicon.png"]);
        assert_eq!(manifest["home-page/logos"], vec!["a.gif", "b.png"]);

        assert!(scan_assets(&root.join("missing")).unwrap().is_empty());

        // Cleanup
        fs::remove_dir_all(&root).unwrap_or_default();
    }
}
