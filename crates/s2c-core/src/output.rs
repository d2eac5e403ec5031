use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::OutputError;
use crate::render::RenderedCase;

/// Destination for rendered cases.
pub trait CaseSink {
    fn accept(&mut self, case: &RenderedCase) -> Result<(), OutputError>;
}

/// Collects cases in memory.
impl CaseSink for Vec<RenderedCase> {
    fn accept(&mut self, case: &RenderedCase) -> Result<(), OutputError> {
        self.push(case.clone());
        Ok(())
    }
}

/// Writes every case to one text stream, each followed by a blank line.
pub struct StreamSink<W: Write> {
    writer: W,
}

impl<W: Write> StreamSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CaseSink for StreamSink<W> {
    fn accept(&mut self, case: &RenderedCase) -> Result<(), OutputError> {
        writeln!(self.writer, "{}", case.content).map_err(OutputError::Stream)?;
        self.writer.flush().map_err(OutputError::Stream)
    }
}

/// Writes one `<name>.yaml` file per URL path under a base directory.
pub struct DirectorySink {
    base: PathBuf,
    written: HashSet<PathBuf>,
}

impl DirectorySink {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            written: HashSet::new(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Files written so far, in no particular order.
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.written.iter().map(PathBuf::as_path)
    }

    pub fn path_for(&self, url_path: &str) -> PathBuf {
        self.base.join(format!("{}.yaml", case_file_stem(url_path)))
    }
}

impl CaseSink for DirectorySink {
    fn accept(&mut self, case: &RenderedCase) -> Result<(), OutputError> {
        let path = self.path_for(&case.url_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        if self.written.contains(&path) {
            log::warn!(
                "{} {} overwrites {}, written earlier in this run",
                case.method,
                case.url_path,
                path.display()
            );
        }
        fs::write(&path, &case.content).map_err(|source| OutputError::WriteFile {
            path: path.clone(),
            source,
        })?;
        log::info!("wrote {}", path.display());
        self.written.insert(path);
        Ok(())
    }
}

/// File name (without extension) for a URL path: `/` becomes `-` and leading
/// dashes are dropped, so `/pets/{id}` maps to `pets-{id}`. The root path maps to
/// `root`.
pub fn case_file_stem(url_path: &str) -> String {
    let stem = url_path.replace('/', "-");
    let stem = stem.trim_start_matches('-');
    if stem.is_empty() {
        "root".to_string()
    } else {
        stem.to_string()
    }
}
