//! Scratch capture buffer
//!
//! Backed by an anonymous temporary file so a child process can write its
//! standard output straight into it. The file is unlinked at creation and
//! released when the buffer is dropped.

use crate::error::{CompareError, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::process::Stdio;

#[derive(Debug)]
pub struct CaptureBuffer {
    file: File,
}

impl CaptureBuffer {
    /// Allocate a buffer in `scratch_dir`, or the system temp directory
    pub fn allocate(scratch_dir: Option<&Path>) -> Result<Self> {
        let file = match scratch_dir {
            Some(dir) => tempfile::tempfile_in(dir),
            None => tempfile::tempfile(),
        }
        .map_err(|source| CompareError::ResourceAllocation {
            location: location(scratch_dir),
            source,
        })?;
        Ok(Self { file })
    }

    /// Stdio handle that appends child output to this buffer
    pub fn stdio(&self) -> Result<Stdio> {
        let handle = self
            .file
            .try_clone()
            .map_err(|source| CompareError::ResourceAllocation {
                location: "capture buffer handle".to_string(),
                source,
            })?;
        Ok(Stdio::from(handle))
    }

    /// Append bytes directly, for in-process summarizers
    pub fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.file.write_all(bytes)
    }

    /// Everything captured so far
    pub fn contents(&mut self) -> std::io::Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::new();
        self.file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

fn location(scratch_dir: Option<&Path>) -> String {
    match scratch_dir {
        Some(dir) => dir.display().to_string(),
        None => std::env::temp_dir().display().to_string(),
    }
}
