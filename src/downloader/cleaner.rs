// ArtifactCleaner - removes well-known files left by earlier runs

use std::fs;
use std::io;
use std::path::Path;

use super::errors::CleanupWarning;

/// How a single artifact is deleted
pub type Remover = fn(&Path) -> io::Result<()>;

pub fn remove_file(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

/// Delete every path that is a regular file.
///
/// Missing paths and directories are skipped. Deletion failures come back
/// as warnings and are logged; they never abort the caller. Running this
/// twice on the same paths is a no-op the second time.
pub fn clean<P: AsRef<Path>>(paths: &[P]) -> Vec<CleanupWarning> {
    clean_with(paths, remove_file)
}

/// `clean` with a custom delete step
pub fn clean_with<P, F>(paths: &[P], remove: F) -> Vec<CleanupWarning>
where
    P: AsRef<Path>,
    F: Fn(&Path) -> io::Result<()>,
{
    let mut warnings = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if !is_regular_file(path) {
            continue;
        }

        tracing::info!("Deleting remnant: {}", path.display());
        match remove(path) {
            Ok(()) => {}
            // lost a race with someone else deleting it; same end state
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                let warning = CleanupWarning {
                    path: path.to_path_buf(),
                    source,
                };
                tracing::warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    warnings
}

fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_removes_existing_files() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("video.mp4");
        let b = dir.path().join("audio.mp3");
        fs::write(&a, b"v").unwrap();
        fs::write(&b, b"a").unwrap();

        let warnings = clean(&[&a, &b]);

        assert!(warnings.is_empty());
        assert!(!a.exists());
        assert!(!b.exists());
    }

    #[test]
    fn test_missing_paths_are_not_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("output.mp4");

        assert!(clean(&[&missing]).is_empty());
    }

    #[test]
    fn test_directories_are_skipped() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("output.mp4");
        fs::create_dir(&sub).unwrap();

        let warnings = clean(&[&sub]);

        assert!(warnings.is_empty());
        assert!(sub.is_dir());
    }

    #[test]
    fn test_clean_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            dir.path().join("video.mp4"),
            dir.path().join("audio.mp3"),
            dir.path().join("output.mp4"),
        ];
        fs::write(&paths[0], b"v").unwrap();
        fs::write(&paths[2], b"o").unwrap();

        assert!(clean(&paths).is_empty());
        assert!(clean(&paths).is_empty());
        assert!(paths.iter().all(|p| !p.exists()));
    }

    #[test]
    fn test_leaves_unlisted_files_alone() {
        let dir = TempDir::new().unwrap();
        let listed = dir.path().join("video.mp4");
        let other = dir.path().join("keep.txt");
        fs::write(&listed, b"v").unwrap();
        fs::write(&other, b"k").unwrap();

        clean(&[&listed]);

        assert!(other.exists());
    }

    #[test]
    fn test_failed_deletes_become_warnings() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            dir.path().join("video.mp4"),
            dir.path().join("audio.mp3"),
            dir.path().join("output.mp4"),
        ];
        for path in &paths {
            fs::write(path, b"x").unwrap();
        }

        let attempted = std::cell::RefCell::new(Vec::new());
        let warnings = clean_with(&paths, |path| {
            attempted.borrow_mut().push(path.to_path_buf());
            if path.ends_with("output.mp4") {
                fs::remove_file(path)
            } else {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
            }
        });

        assert_eq!(*attempted.borrow(), paths);
        let failed: Vec<_> = warnings.iter().map(|w| w.path.clone()).collect();
        assert_eq!(failed, vec![paths[0].clone(), paths[1].clone()]);
        assert!(warnings[0].to_string().contains("read-only"));
        assert!(paths[0].exists());
        assert!(!paths[2].exists());
    }

    #[test]
    fn test_not_found_from_remover_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("video.mp4");
        fs::write(&path, b"v").unwrap();

        let warnings = clean_with(&[&path], |_| Err(io::ErrorKind::NotFound.into()));

        assert!(warnings.is_empty());
    }
}
