use crate::error::SinkError;
use connectors::file::mrc::writer::RotatingFiles;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter, Stdout};

/// Destination for the exported byte stream.
///
/// Records are appended back to back with no separator; each body already
/// ends in its own record terminator.
pub enum OutputSink<W = Stdout> {
    /// A single always-open stream, normally standard output.
    Console(BufWriter<W>),
    /// Numbered `.mrc` files rotated at a fixed record count.
    Rotating(RotatingFiles),
}

impl OutputSink<Stdout> {
    /// Rotating files when a base name is given, standard output otherwise.
    pub fn for_base(base: Option<&str>, file_size: i64) -> Self {
        match base {
            Some(base) => OutputSink::Rotating(RotatingFiles::new(base, file_size)),
            None => OutputSink::console(tokio::io::stdout()),
        }
    }
}

impl<W> OutputSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn console(writer: W) -> Self {
        OutputSink::Console(BufWriter::new(writer))
    }

    pub fn is_rotating(&self) -> bool {
        matches!(self, OutputSink::Rotating(_))
    }

    pub async fn write_record(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        match self {
            OutputSink::Console(out) => out.write_all(bytes).await.map_err(SinkError::Console),
            OutputSink::Rotating(files) => Ok(files.write_record(bytes).await?),
        }
    }

    /// Flushes buffered output. Standard output stays open; the current
    /// rotating file is closed.
    pub async fn close(&mut self) -> Result<(), SinkError> {
        match self {
            OutputSink::Console(out) => out.flush().await.map_err(SinkError::Console),
            OutputSink::Rotating(files) => Ok(files.close().await?),
        }
    }

    /// Returns the console writer. Call [`OutputSink::close`] first, anything
    /// still buffered is discarded.
    pub fn into_console(self) -> Option<W> {
        match self {
            OutputSink::Console(out) => Some(out.into_inner()),
            OutputSink::Rotating(_) => None,
        }
    }
}
