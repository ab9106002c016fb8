use crate::file::mrc::error::FileError;
use std::path::PathBuf;
use tokio::{
    fs::File,
    io::{AsyncWriteExt, BufWriter},
};
use tracing::debug;

/// Name of the `sequence`-th file in a rotating set: `<base>.%08d.mrc`.
pub fn file_name(base: &str, sequence: u64) -> PathBuf {
    PathBuf::from(format!("{base}.{sequence:08}.mrc"))
}

/// A numbered sequence of `.mrc` files holding at most `quota` records each.
///
/// The record count starts at the quota, so the first write opens
/// `<base>.00000000.mrc`. Each later file is opened only once the current
/// one is full and another record arrives, so no empty trailing file is
/// ever created.
///
/// Rotation happens only when the count equals the quota. A quota of zero
/// or below therefore opens one file and keeps writing to it.
pub struct RotatingFiles {
    base: String,
    quota: i64,
    /// Sequence number the next opened file will get.
    sequence: u64,
    /// Records written to the current file.
    count: i64,
    current: Option<BufWriter<File>>,
    closed: bool,
}

impl RotatingFiles {
    pub fn new(base: impl Into<String>, quota: i64) -> Self {
        RotatingFiles {
            base: base.into(),
            quota,
            sequence: 0,
            count: quota,
            current: None,
            closed: false,
        }
    }

    /// Number of files opened so far.
    pub fn files_opened(&self) -> u64 {
        self.sequence
    }

    pub fn needs_rotation(&self) -> bool {
        self.count == self.quota
    }

    /// Appends one record, opening the next file first when the current one
    /// has reached its quota.
    pub async fn write_record(&mut self, bytes: &[u8]) -> Result<(), FileError> {
        if self.closed {
            return Err(FileError::Closed);
        }
        if self.needs_rotation() {
            self.rotate().await?;
        }

        let file = self.current.as_mut().ok_or(FileError::Closed)?;
        file.write_all(bytes).await?;
        self.count += 1;
        Ok(())
    }

    /// Flushes and closes the current file. Further writes fail.
    pub async fn close(&mut self) -> Result<(), FileError> {
        self.closed = true;
        if let Some(mut file) = self.current.take() {
            file.shutdown().await?;
        }
        Ok(())
    }

    async fn rotate(&mut self) -> Result<(), FileError> {
        if let Some(mut previous) = self.current.take() {
            previous.shutdown().await?;
        }

        let path = file_name(&self.base, self.sequence);
        let file = File::create(&path).await.map_err(|source| FileError::Create {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Opened output file {}", path.display());

        self.current = Some(BufWriter::new(file));
        self.sequence += 1;
        self.count = 0;
        Ok(())
    }
}
