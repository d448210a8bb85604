//! Archive extraction and executable staging.

use crate::error::{Result, SetupError};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extract a gzipped tarball into `dest_dir`, creating it first.
pub fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    debug!(
        "Extracting {} to {}",
        archive_path.display(),
        dest_dir.display()
    );

    std::fs::create_dir_all(dest_dir).map_err(|e| SetupError::io_with_path(e, dest_dir))?;

    let file = File::open(archive_path).map_err(|e| SetupError::io_with_path(e, archive_path))?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let mut archive = tar::Archive::new(decoder);

    archive.unpack(dest_dir).map_err(|e| SetupError::Io {
        message: format!("Failed to extract tarball: {e}"),
        path: Some(dest_dir.to_path_buf()),
        source: Some(e),
    })?;

    Ok(())
}

/// Rename a downloaded file within its containing directory.
///
/// Used on Windows, where the release asset is the executable itself rather
/// than an archive.
pub fn rename_in_place(file: &Path, new_name: &str) -> Result<PathBuf> {
    let dir = file.parent().ok_or_else(|| SetupError::Io {
        message: format!("Downloaded file {} has no containing directory", file.display()),
        path: Some(file.to_path_buf()),
        source: None,
    })?;

    let renamed = dir.join(new_name);
    std::fs::rename(file, &renamed).map_err(|e| SetupError::io_with_path(e, file))?;

    Ok(renamed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    fn write_tar_gz(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_extracts_tarball_contents() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("surreal-v2.3.3.linux-amd64.tgz");
        write_tar_gz(&archive, &[("surreal", b"binary-bytes")]);

        let dest = temp.path().join("extracted");
        extract_tar_gz(&archive, &dest).unwrap();

        let contents = std::fs::read(dest.join("surreal")).unwrap();
        assert_eq!(contents, b"binary-bytes");
    }

    #[test]
    fn test_missing_archive_reports_its_path() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("missing.tgz");

        let err = extract_tar_gz(&archive, &temp.path().join("out")).unwrap_err();
        assert!(err.to_string().contains("missing.tgz"));
    }

    #[test]
    fn test_renames_within_containing_directory() {
        let temp = TempDir::new().unwrap();
        let downloaded = temp.path().join("surreal-v2.3.3.windows-amd64.exe");
        std::fs::write(&downloaded, b"exe-bytes").unwrap();

        let renamed = rename_in_place(&downloaded, "surreal.exe").unwrap();

        assert_eq!(renamed, temp.path().join("surreal.exe"));
        assert!(renamed.is_file());
        assert!(!downloaded.exists());
    }
}
