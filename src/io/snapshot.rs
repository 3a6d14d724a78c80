//! Raw binary snapshots of scalar fields.
//!
//! Each file holds `nx * ny` native-endian `f64` values, x outer and y inner,
//! with no header. Readers must know the grid shape out of band.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::compute::{MacroscopicFields, ScalarField};

/// Snapshot write failure.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Error saving to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Number of decimal digits in `n` (at least one).
pub fn index_digits(n: u64) -> usize {
    n.max(1).ilog10() as usize + 1
}

/// Writes `<name><index>.bin` files into a directory.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    dir: PathBuf,
    digits: usize,
}

impl SnapshotWriter {
    /// Writer whose indices are padded to the width of `total_steps`.
    pub fn new<P: AsRef<Path>>(dir: P, total_steps: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            digits: index_digits(total_steps),
        }
    }

    /// File name for snapshot `index` of `name`, e.g. `rho0050.bin`.
    pub fn filename(&self, name: &str, index: u64) -> String {
        format!("{}{:0width$}.bin", name, index, width = self.digits)
    }

    /// Full path for snapshot `index` of `name`.
    pub fn path(&self, name: &str, index: u64) -> PathBuf {
        self.dir.join(self.filename(name, index))
    }

    /// Write one field, returning the path written.
    pub fn write(
        &self,
        name: &str,
        field: &ScalarField,
        index: u64,
    ) -> Result<PathBuf, SnapshotError> {
        let path = self.path(name, index);
        match write_raw(&path, field.as_slice()) {
            Ok(()) => {
                log::debug!("wrote {} ({} values)", path.display(), field.as_slice().len());
                Ok(path)
            }
            Err(source) => Err(SnapshotError::Io { path, source }),
        }
    }

    /// Write `rho`, `ux` and `uy`, one result per field.
    pub fn write_fields(
        &self,
        fields: &MacroscopicFields,
        index: u64,
    ) -> Vec<Result<PathBuf, SnapshotError>> {
        fields
            .named()
            .into_iter()
            .map(|(name, field)| self.write(name, field, index))
            .collect()
    }
}

fn write_raw(path: &Path, values: &[f64]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(bytemuck::cast_slice(values))?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

/// Read a snapshot back into a flat vector.
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> io::Result<Vec<f64>> {
    let bytes = std::fs::read(path)?;
    if bytes.len() % std::mem::size_of::<f64>() != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("snapshot length {} is not a multiple of 8", bytes.len()),
        ));
    }
    Ok(bytemuck::pod_collect_to_vec::<u8, f64>(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Grid;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_index_digits() {
        assert_eq!(index_digits(0), 1);
        assert_eq!(index_digits(1), 1);
        assert_eq!(index_digits(9), 1);
        assert_eq!(index_digits(10), 2);
        assert_eq!(index_digits(200), 3);
        assert_eq!(index_digits(1000), 4);
        assert_eq!(index_digits(u64::MAX), 20);
    }

    #[test]
    fn test_filename_padding() {
        let writer = SnapshotWriter::new(".", 200);
        assert_eq!(writer.filename("rho", 0), "rho000.bin");
        assert_eq!(writer.filename("ux", 50), "ux050.bin");
        assert_eq!(writer.filename("uy", 200), "uy200.bin");
    }

    #[test]
    fn test_write_layout_and_size() {
        let dir = tempdir().unwrap();
        let grid = Grid::new(3, 2);
        let mut field = ScalarField::zeros(grid);
        for x in 0..grid.nx {
            for y in 0..grid.ny {
                field[(x, y)] = (10 * x + y) as f64;
            }
        }

        let writer = SnapshotWriter::new(dir.path(), 1000);
        let path = writer.write("rho", &field, 7).unwrap();
        assert_eq!(path, dir.path().join("rho0007.bin"));

        let metadata = fs::metadata(&path).unwrap();
        assert_eq!(metadata.len(), (grid.len() * 8) as u64);

        let values = read_snapshot(&path).unwrap();
        assert_eq!(values, vec![0.0, 1.0, 10.0, 11.0, 20.0, 21.0]);
    }

    #[test]
    fn test_write_fields() {
        let dir = tempdir().unwrap();
        let fields = MacroscopicFields::zeros(Grid::new(4, 4));
        let writer = SnapshotWriter::new(dir.path(), 50);

        let results = writer.write_fields(&fields, 50);
        assert_eq!(results.len(), 3);
        for (result, name) in results.into_iter().zip(["rho50.bin", "ux50.bin", "uy50.bin"]) {
            assert_eq!(result.unwrap(), dir.path().join(name));
        }
    }

    #[test]
    fn test_missing_directory_is_reported() {
        let dir = tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path().join("missing"), 10);
        let field = ScalarField::zeros(Grid::new(2, 2));

        let err = writer.write("rho", &field, 1).unwrap_err();
        let SnapshotError::Io { path, .. } = &err;
        assert!(path.ends_with("rho01.bin"));
        assert!(err.to_string().starts_with("Error saving to"));
    }

    #[test]
    fn test_read_native_endian_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ux1.bin");
        let mut bytes = Vec::new();
        for v in [1.5f64, -0.25, 1e-300] {
            bytes.extend_from_slice(&v.to_ne_bytes());
        }
        fs::write(&path, &bytes).unwrap();

        assert_eq!(read_snapshot(&path).unwrap(), vec![1.5, -0.25, 1e-300]);
    }

    #[test]
    fn test_truncated_snapshot_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.bin");
        fs::write(&path, [0u8; 12]).unwrap();
        assert_eq!(
            read_snapshot(&path).unwrap_err().kind(),
            io::ErrorKind::InvalidData
        );
    }
}
