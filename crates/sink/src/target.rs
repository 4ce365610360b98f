// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output destinations a sink can write to.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

/// An open log file and the path it currently lives at.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    file: File,
}

impl LogFile {
    /// Open `path` for append, creating it if missing.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the file on disk. The handle stays open and keeps appending.
    pub(crate) fn rename(&mut self, to: &Path) -> io::Result<PathBuf> {
        std::fs::rename(&self.path, to)?;
        Ok(std::mem::replace(&mut self.path, to.to_path_buf()))
    }
}

/// In-memory capture buffer. Clones share the same bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl MemoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).to_string()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.bytes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Kind of a [`Target`], for inspection without borrowing the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Stdout,
    Memory,
}

/// A writable destination owned by a sink.
///
/// Every variant can be closed; closing a file flushes and syncs it.
#[derive(Debug)]
pub enum Target {
    File(LogFile),
    Stdout(io::Stdout),
    Memory(MemoryBuffer),
}

impl Target {
    pub fn open_file(path: &Path) -> io::Result<Self> {
        LogFile::open(path).map(Target::File)
    }

    pub fn stdout() -> Self {
        Target::Stdout(io::stdout())
    }

    pub fn memory(buffer: MemoryBuffer) -> Self {
        Target::Memory(buffer)
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Target::File(_) => TargetKind::File,
            Target::Stdout(_) => TargetKind::Stdout,
            Target::Memory(_) => TargetKind::Memory,
        }
    }

    /// Path on disk, for file targets.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Target::File(file) => Some(file.path()),
            Target::Stdout(_) | Target::Memory(_) => None,
        }
    }

    /// Write the whole buffer or fail.
    pub(crate) fn write_record(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Target::File(file) => file.file.write_all(buf),
            // Lock once so a record is never interleaved with other stdout writers
            Target::Stdout(stdout) => stdout.lock().write_all(buf),
            Target::Memory(memory) => {
                memory.bytes.lock().extend_from_slice(buf);
                Ok(())
            }
        }
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        match self {
            Target::File(file) => file.file.flush(),
            Target::Stdout(stdout) => stdout.flush(),
            Target::Memory(_) => Ok(()),
        }
    }

    pub(crate) fn file_mut(&mut self) -> Option<&mut LogFile> {
        match self {
            Target::File(file) => Some(file),
            Target::Stdout(_) | Target::Memory(_) => None,
        }
    }

    /// Flush and release the handle.
    pub fn close(mut self) -> io::Result<()> {
        self.flush()?;
        if let Target::File(file) = &self {
            file.file.sync_all()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
