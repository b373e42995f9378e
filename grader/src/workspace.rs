//! Scratch directory shared with the evaluator.

use std::fs;
use std::path::{Path, PathBuf};

use plgrade_compiler::Query;
use plgrade_core::Test;
use plgrade_evaluator::{DATABASE_FILE, KNOWLEDGE_FILE, PRE_FILE};
use tempfile::{Builder, TempDir};
use tracing::debug;

use crate::{GradeError, GradeResult};

/// Directory holding the files consulted by the start goal.
///
/// A temporary directory is removed when the workspace is dropped; a
/// configured directory only has its scratch files removed.
#[derive(Debug)]
pub struct Scratch {
    dir: PathBuf,
    _temp: Option<TempDir>,
}

impl Scratch {
    /// Use `configured` if given, otherwise a fresh temporary directory.
    pub fn create(configured: Option<&Path>) -> GradeResult<Self> {
        match configured {
            Some(dir) => {
                fs::create_dir_all(dir).map_err(GradeError::io(dir))?;
                Ok(Self {
                    dir: dir.to_path_buf(),
                    _temp: None,
                })
            }
            None => {
                let base = std::env::temp_dir();
                let temp = Builder::new()
                    .prefix("plgrade-")
                    .tempdir()
                    .map_err(GradeError::io(&base))?;
                Ok(Self {
                    dir: temp.path().to_path_buf(),
                    _temp: Some(temp),
                })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn write_knowledge(&self, knowledge: &str) -> GradeResult<()> {
        self.write(KNOWLEDGE_FILE, knowledge)
    }

    /// Write the exercise's pre-knowledge and database.
    pub fn write_exercise(&self, test: &Test) -> GradeResult<()> {
        self.write(PRE_FILE, &test.pre)?;
        self.write(DATABASE_FILE, &test.database)
    }

    /// Write `query` to the scratch file `file`.
    pub fn write_query(&self, file: &str, query: &Query) -> GradeResult<()> {
        self.write(file, &query.render())
    }

    /// Remove every `.temp` file.
    pub fn clean(&self) -> GradeResult<()> {
        for entry in fs::read_dir(&self.dir).map_err(GradeError::io(&self.dir))? {
            let path = entry.map_err(GradeError::io(&self.dir))?.path();
            if path.is_file() && path.extension().is_some_and(|e| e == "temp") {
                fs::remove_file(&path).map_err(GradeError::io(&path))?;
            }
        }
        Ok(())
    }

    fn write(&self, file: &str, contents: &str) -> GradeResult<()> {
        let path = self.dir.join(file);
        debug!("Writing {} ({} bytes)", path.display(), contents.len());
        fs::write(&path, contents).map_err(GradeError::io(&path))
    }
}
