//! Standard I/O endpoints: files, stdin, stdout and stderr.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use super::{InputProvider, OutputTarget};

/// Input provider for the process stdin, identified as "-".
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinInput;

impl StdinInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputProvider for StdinInput {
    fn id(&self) -> &str {
        "-"
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(io::stdin()))
    }
}

/// Input provider reading a file from its start on every `open`.
#[derive(Debug, Clone)]
pub struct FileInput {
    id: String,
    path: PathBuf,
}

impl FileInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            id: path.to_string_lossy().into_owned(),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InputProvider for FileInput {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(File::open(&self.path)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

/// Output target for one of the process console streams.
///
/// Overwrite and append are the same thing for a stream.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleOutput {
    stream: ConsoleStream,
}

impl ConsoleOutput {
    pub fn stdout() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: ConsoleStream::Stderr,
        }
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }

    fn open(&self) -> Box<dyn Write + Send> {
        match self.stream {
            ConsoleStream::Stdout => Box::new(io::stdout()),
            ConsoleStream::Stderr => Box::new(io::stderr()),
        }
    }
}

impl OutputTarget for ConsoleOutput {
    fn id(&self) -> &str {
        match self.stream {
            ConsoleStream::Stdout => "-",
            ConsoleStream::Stderr => "stderr",
        }
    }

    fn open_overwrite(&self) -> io::Result<Box<dyn Write + Send>> {
        Ok(self.open())
    }

    fn open_append(&self) -> io::Result<Box<dyn Write + Send>> {
        Ok(self.open())
    }
}

/// Output target writing to a file, created on first open.
#[derive(Debug, Clone)]
pub struct FileOutput {
    id: String,
    path: PathBuf,
}

impl FileOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            id: path.to_string_lossy().into_owned(),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_with(&self, append: bool) -> io::Result<Box<dyn Write + Send>> {
        let mut opts = OpenOptions::new();
        opts.create(true);
        if append {
            opts.append(true);
        } else {
            opts.write(true).truncate(true);
        }
        Ok(Box::new(opts.open(&self.path)?))
    }
}

impl OutputTarget for FileOutput {
    fn id(&self) -> &str {
        &self.id
    }

    fn open_overwrite(&self) -> io::Result<Box<dyn Write + Send>> {
        self.open_with(false)
    }

    fn open_append(&self) -> io::Result<Box<dyn Write + Send>> {
        self.open_with(true)
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}
