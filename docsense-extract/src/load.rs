//! Reading upload candidates from disk.

use std::path::{Path, PathBuf};

use docsense_rag::{DeclaredType, FileDescriptor};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::LoadError;

/// Read one file into a [`FileDescriptor`], detecting its type from the extension.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read.
pub async fn load_file(path: impl AsRef<Path>) -> Result<FileDescriptor, LoadError> {
    let path = path.as_ref();
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| LoadError::NoFileName(path.to_path_buf()))?;

    let content = tokio::fs::read(path)
        .await
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;

    debug!(path = %path.display(), bytes = content.len(), "loaded file");
    Ok(FileDescriptor::new(filename, content))
}

/// Read every path in order into one batch.
///
/// # Errors
///
/// Fails on the first file that cannot be read.
pub async fn load_batch<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<FileDescriptor>, LoadError> {
    let mut batch = Vec::with_capacity(paths.len());
    for path in paths {
        batch.push(load_file(path).await?);
    }
    Ok(batch)
}

/// Expand a list of files and directories into the files to upload.
///
/// Files are kept as given, whatever their type. Directories are walked
/// recursively in file-name order and contribute only files with a known
/// [`DeclaredType`].
///
/// # Errors
///
/// Returns [`LoadError::Walk`] if a directory cannot be traversed.
pub fn collect_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.is_dir() {
            files.push(path.to_path_buf());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let known = entry
                .file_name()
                .to_str()
                .is_some_and(|name| DeclaredType::from_filename(name) != DeclaredType::Unknown);
            if known {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn load_file_detects_type_from_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Field Notes.TXT");
        fs::write(&path, "Backsight to the control point").unwrap();

        let file = load_file(&path).await.unwrap();
        assert_eq!(file.filename, "Field Notes.TXT");
        assert_eq!(file.declared_type, DeclaredType::Txt);
        assert_eq!(file.content, b"Backsight to the control point");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_file(dir.path().join("absent.pdf")).await.unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[tokio::test]
    async fn load_batch_preserves_order() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("b.txt");
        let a = dir.path().join("a.docx");
        fs::write(&b, "b").unwrap();
        fs::write(&a, "a").unwrap();

        let batch = load_batch(&[&b, &a]).await.unwrap();
        let names: Vec<&str> = batch.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["b.txt", "a.docx"]);
        assert_eq!(batch[1].declared_type, DeclaredType::Docx);
    }

    #[test]
    fn collect_files_walks_directories_for_known_types() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.pdf"), "a").unwrap();
        fs::write(dir.path().join("image.png"), "png").unwrap();
        fs::write(nested.join("c.docx"), "c").unwrap();

        let files = collect_files(&[dir.path()]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.txt", "c.docx"]);
    }

    #[test]
    fn explicit_files_are_kept_regardless_of_type() {
        let files = collect_files(&["slides.pptx"]).unwrap();
        assert_eq!(files, vec![PathBuf::from("slides.pptx")]);
    }
}
