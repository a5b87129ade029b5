//! Where prediction replies come from.
//!
//! A `PredictionSource` answers a product query with the service's reply
//! shape. Two sources exist: a saved reply on disk (or stdin) and the
//! in-process `LocalPredictor`.

pub mod catalog;
pub mod engine;
pub mod scoring;

pub use catalog::{Catalog, ProductRecord};
pub use engine::{LocalPredictor, PRODUCT_NOT_FOUND};

use std::io::Read;
use std::path::{Path, PathBuf};
use subst_common::{PredictionReply, ProductId, Result};

/// Anything that can answer a substitute query.
pub trait PredictionSource {
    fn fetch(&self, product: &ProductId) -> Result<PredictionReply>;
}

/// A reply captured earlier, read from a file or stdin.
#[derive(Debug, Clone)]
pub enum ReplyFile {
    Stdin,
    Path(PathBuf),
}

impl ReplyFile {
    /// `-` means stdin.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            ReplyFile::Stdin
        } else {
            ReplyFile::Path(PathBuf::from(arg))
        }
    }

    pub fn path(path: impl AsRef<Path>) -> Self {
        ReplyFile::Path(path.as_ref().to_path_buf())
    }

    /// Read and decode the reply.
    pub fn read(&self) -> Result<PredictionReply> {
        let content = match self {
            ReplyFile::Stdin => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
            ReplyFile::Path(path) => std::fs::read_to_string(path)?,
        };
        Ok(serde_json::from_str(&content)?)
    }
}

impl PredictionSource for ReplyFile {
    /// The saved reply answers whatever was asked when it was captured.
    fn fetch(&self, _product: &ProductId) -> Result<PredictionReply> {
        self.read()
    }
}
