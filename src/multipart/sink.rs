use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::headers::PartHeaders;
use crate::value::FileHandle;

/// Storage for uploaded file parts, owned by the caller.
///
/// The parser opens one sink per file part, writes the body into it as the
/// bytes arrive, and then hands it back exactly once: to
/// [`close_sink`](SinkFactory::close_sink) when the part completed, or to
/// [`discard_sink`](SinkFactory::discard_sink) when the parse was aborted.
///
/// Uploads closed during a parse that later fails are released again through
/// [`remove`](SinkFactory::remove), since no tree refers to them.
pub trait SinkFactory {
    type Sink: Write;

    fn open_sink(&mut self, part: &PartHeaders) -> io::Result<Self::Sink>;

    /// Flush and store a completed sink, returning the handle the parameter
    /// tree will carry.
    fn close_sink(&mut self, sink: Self::Sink) -> io::Result<FileHandle>;

    /// Release a sink whose part never completed.
    fn discard_sink(&mut self, sink: Self::Sink) {
        drop(sink);
    }

    /// Release a stored upload whose parse failed after it was closed.
    fn remove(&mut self, _handle: FileHandle) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps every upload in memory. Handy for tests and small bodies.
#[derive(Debug, Default)]
pub struct MemorySinks {
    files: Vec<Option<Vec<u8>>>,
}

impl MemorySinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: FileHandle) -> Option<&[u8]> {
        usize::try_from(handle.0)
            .ok()
            .and_then(|index| self.files.get(index))
            .and_then(Option::as_deref)
    }

    /// Number of completed uploads held.
    pub fn len(&self) -> usize {
        self.files.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SinkFactory for MemorySinks {
    type Sink = Vec<u8>;

    fn open_sink(&mut self, _part: &PartHeaders) -> io::Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn close_sink(&mut self, sink: Vec<u8>) -> io::Result<FileHandle> {
        let handle = FileHandle(self.files.len() as u64);
        self.files.push(Some(sink));
        Ok(handle)
    }

    fn remove(&mut self, handle: FileHandle) -> io::Result<()> {
        let slot = usize::try_from(handle.0)
            .ok()
            .and_then(|index| self.files.get_mut(index));
        if let Some(slot) = slot {
            *slot = None;
        }
        Ok(())
    }
}

/// Streams each upload into its own file inside a directory.
///
/// Files are created as temporary files and only kept once their part
/// completes; a discarded sink removes its file, and so does a kept upload
/// from a parse that failed later.
#[derive(Debug)]
pub struct TempFileSinks {
    dir: PathBuf,
    files: Vec<Option<PathBuf>>,
}

impl TempFileSinks {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        TempFileSinks {
            dir: dir.into(),
            files: Vec::new(),
        }
    }

    /// Use the system temporary directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, handle: FileHandle) -> Option<&Path> {
        usize::try_from(handle.0)
            .ok()
            .and_then(|index| self.files.get(index))
            .and_then(Option::as_deref)
    }

    /// Paths of all kept uploads, in completion order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().flatten().map(PathBuf::as_path)
    }
}

impl SinkFactory for TempFileSinks {
    type Sink = BufWriter<NamedTempFile>;

    fn open_sink(&mut self, part: &PartHeaders) -> io::Result<Self::Sink> {
        log::trace!("opening temp file for field {:?} in {}", part.name, self.dir.display());
        let file = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(&self.dir)?;
        Ok(BufWriter::new(file))
    }

    fn close_sink(&mut self, sink: Self::Sink) -> io::Result<FileHandle> {
        let file = sink.into_inner().map_err(|e| e.into_error())?;
        let (_, path) = file.keep().map_err(|e| e.error)?;
        let handle = FileHandle(self.files.len() as u64);
        log::debug!("stored upload {} at {}", handle.0, path.display());
        self.files.push(Some(path));
        Ok(handle)
    }

    fn remove(&mut self, handle: FileHandle) -> io::Result<()> {
        let slot = usize::try_from(handle.0)
            .ok()
            .and_then(|index| self.files.get_mut(index));
        if let Some(path) = slot.and_then(Option::take) {
            log::debug!("removing upload {} at {}", handle.0, path.display());
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
