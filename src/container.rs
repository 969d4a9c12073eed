//! Compound file traversal
//!
//! A `.msg` file is an OLE compound file. The decoder only needs its streams,
//! in traversal order, each with the chain of storages above it.

use crate::error::{DecodeError, Result};
use cfb::CompoundFile;
use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// One stream of the container, fully read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEntry {
    /// Stream name, e.g. `__substg1.0_0037001F`
    pub name: String,

    /// Storages from the root down to the stream's parent
    pub path: Vec<String>,

    /// Stream contents
    pub data: Vec<u8>,
}

impl StreamEntry {
    pub fn new(name: impl Into<String>, path: Vec<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            path,
            data: data.into(),
        }
    }

    /// Stream placed directly under the root storage
    pub fn root(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::new(name, Vec::new(), data)
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.data.len()
    }
}

/// Iterator over the streams of a compound file.
///
/// Stream paths are collected when the file is opened; contents are read
/// lazily, one stream per call to `next`.
pub struct CfbEntries<F> {
    file: CompoundFile<F>,
    pending: std::vec::IntoIter<PathBuf>,
}

impl CfbEntries<File> {
    /// Open a compound file on disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(file)
    }
}

impl<F: Read + Seek> CfbEntries<F> {
    /// Read the directory of a compound file
    pub fn new(inner: F) -> Result<Self> {
        let file = CompoundFile::open(inner).map_err(container_error)?;
        let streams: Vec<PathBuf> = file
            .walk()
            .filter(cfb::Entry::is_stream)
            .map(|entry| entry.path().to_path_buf())
            .collect();
        debug!("Compound file holds {} streams", streams.len());

        Ok(Self {
            file,
            pending: streams.into_iter(),
        })
    }

    fn read_entry(&mut self, path: &Path) -> Result<StreamEntry> {
        let mut stream = self.file.open_stream(path)?;
        let mut data = Vec::with_capacity(usize::try_from(stream.len()).unwrap_or(0));
        stream.read_to_end(&mut data)?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let storages = path
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .filter_map(|component| match component {
                        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(StreamEntry::new(name, storages, data))
    }
}

impl<F: Read + Seek> Iterator for CfbEntries<F> {
    type Item = Result<StreamEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.pending.next()?;
        Some(self.read_entry(&path))
    }
}

fn container_error(err: io::Error) -> DecodeError {
    if err.kind() == io::ErrorKind::InvalidData {
        DecodeError::Container(err.to_string())
    } else {
        DecodeError::Io(err)
    }
}
