//! The top-level factory: one configured set of saveframes per dictionary
//! version, plus a file handle that owns the blocks they read and write.
//!
//! # Examples
//!
//! ```
//! use nmrstar::software::SoftwareEntry;
//! use nmrstar::{open_dictionary, DictVersion};
//!
//! let mut dict = open_dictionary(DictVersion::V2_1).unwrap();
//! let mut blocks = Vec::new();
//! let relax = SoftwareEntry {
//!     name: Some("relax".into()),
//!     ..SoftwareEntry::default()
//! };
//! assert_eq!(dict.software.add(&mut blocks, &relax).unwrap(), 1);
//!
//! let decoded: Vec<_> = dict.software.each(&blocks).collect::<Result<_, _>>().unwrap();
//! assert_eq!(decoded, vec![relax]);
//! ```

use crate::auto_relaxation::{self, AutoRelaxEntry};
use crate::citations::{self, CitationEntry};
use crate::csa::{self, CsaEntry};
use crate::entity::{self, EntityEntry};
use crate::error::Result;
use crate::method::{self, MethodEntry};
use crate::model_free::{self, ModelFreeEntry};
use crate::relaxation::Relaxation;
use crate::saveframe::Saveframe;
use crate::software::{self, SoftwareEntry};
use crate::star::{StarFile, StarText};
use crate::table::Block;
use crate::tensor::{self, TensorEntry};
use crate::version::DictVersion;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default data block title.
pub const DEFAULT_TITLE: &str = "nmrstar";

/// Configuration threaded into [`open_dictionary_with`] and [`NmrStarFile::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Dictionary version every saveframe is resolved against.
    pub version: DictVersion,
    /// Title written as `data_<title>`.
    pub title: String,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        DictionaryConfig {
            version: DictVersion::default(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl DictionaryConfig {
    /// Default configuration for a given version.
    #[must_use]
    pub fn new(version: DictVersion) -> Self {
        DictionaryConfig {
            version,
            ..DictionaryConfig::default()
        }
    }
}

/// Every saveframe family, resolved for one dictionary version.
///
/// Families the version does not define (tensors and automatic relaxation
/// in 2.1) are still present; their `add` and `each` report
/// [`StarError::VersionMismatch`](crate::StarError::VersionMismatch).
#[derive(Debug)]
pub struct Dictionary {
    version: DictVersion,
    /// Literature citations.
    pub citations: Saveframe<CitationEntry>,
    /// Molecular entities.
    pub entity: Saveframe<EntityEntry>,
    /// Software packages.
    pub software: Saveframe<SoftwareEntry>,
    /// Analysis methods.
    pub method: Saveframe<MethodEntry>,
    /// R1, R2 and NOE data.
    pub relaxation: Relaxation,
    /// Relaxation data in the auto-relaxation layout.
    pub auto_relaxation: Saveframe<AutoRelaxEntry>,
    /// Chemical shift anisotropy.
    pub csa: Saveframe<CsaEntry>,
    /// Model-free order parameters.
    pub model_free: Saveframe<ModelFreeEntry>,
    /// Diffusion and other tensors.
    pub tensor: Saveframe<TensorEntry>,
}

impl Dictionary {
    /// The dictionary version every family was resolved against.
    #[must_use]
    pub fn version(&self) -> DictVersion {
        self.version
    }
}

/// Resolve every family for `version` with default configuration.
///
/// # Errors
///
/// Returns [`StarError::Dictionary`](crate::StarError::Dictionary) if a
/// naming table is inconsistent with its family.
pub fn open_dictionary(version: DictVersion) -> Result<Dictionary> {
    open_dictionary_with(&DictionaryConfig::new(version))
}

/// Resolve every family for the configured version.
///
/// # Errors
///
/// Returns [`StarError::Dictionary`](crate::StarError::Dictionary) if a
/// naming table is inconsistent with its family.
pub fn open_dictionary_with(config: &DictionaryConfig) -> Result<Dictionary> {
    let version = config.version;
    let dictionary = Dictionary {
        version,
        citations: Saveframe::new(citations::definition(), version)?,
        entity: Saveframe::new(entity::definition(), version)?,
        software: Saveframe::new(software::definition(), version)?,
        method: Saveframe::new(method::definition(), version)?,
        relaxation: Relaxation::new(version)?,
        auto_relaxation: Saveframe::new(auto_relaxation::definition(), version)?,
        csa: Saveframe::new(csa::definition(), version)?,
        model_free: Saveframe::new(model_free::definition(), version)?,
        tensor: Saveframe::new(tensor::definition(), version)?,
    };
    tracing::debug!(%version, "opened NMR-STAR dictionary");
    Ok(dictionary)
}

/// An NMR-STAR file on disk and the blocks read from or destined for it.
///
/// Opening never touches the file; [`NmrStarFile::read`] loads it and
/// [`NmrStarFile::write`] replaces it.
#[derive(Debug)]
pub struct NmrStarFile<F: StarFile = StarText> {
    path: PathBuf,
    file: F,
    /// Save frames in file order.
    pub blocks: Vec<Block>,
}

impl NmrStarFile<StarText> {
    /// A STAR text file at `path` titled from `config`.
    pub fn new(path: impl Into<PathBuf>, config: &DictionaryConfig) -> Self {
        NmrStarFile::with_format(path, StarText::new(config.title.clone()))
    }

    /// The data block title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.file.title
    }
}

impl<F: StarFile> NmrStarFile<F> {
    /// A file at `path` read and written through `file`.
    pub fn with_format(path: impl Into<PathBuf>, file: F) -> Self {
        NmrStarFile {
            path: path.into(),
            file,
            blocks: Vec::new(),
        }
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory blocks with the file's save frames.
    ///
    /// # Errors
    ///
    /// Returns an I/O or parse error. The blocks are left unchanged on error.
    pub fn read(&mut self) -> Result<&[Block]> {
        self.blocks = self.file.read(&self.path)?;
        Ok(&self.blocks)
    }

    /// Write the in-memory blocks, replacing the file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error.
    pub fn write(&self) -> Result<()> {
        self.file.write(&self.path, &self.blocks)
    }
}
