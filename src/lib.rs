#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # nmrstar: NMR-STAR Rust Crate
//!
//! Read and write NMR-STAR saveframes across the v2.1 and v3.1 dictionaries.
//!
//! ## Quick Start
//!
//! ```
//! use nmrstar::relaxation::{RelaxEntry, RelaxKind};
//! use nmrstar::{open_dictionary, DictVersion};
//!
//! # fn main() -> nmrstar::Result<()> {
//! let mut dict = open_dictionary(DictVersion::V3_1)?;
//! let mut blocks = Vec::new();
//!
//! let entry = RelaxEntry {
//!     frq: Some(600.0),
//!     entity_ids: vec![Some(1)],
//!     res_nums: vec![Some(2)],
//!     res_names: vec![Some("GLY".into())],
//!     atom_names: vec![Some("N".into())],
//!     data: vec![Some(1.5)],
//!     errors: vec![Some(0.1)],
//!     ..RelaxEntry::default()
//! };
//! dict.relaxation.add(&mut blocks, RelaxKind::R1, &entry)?;
//!
//! let text = nmrstar::star::render("demo", &blocks);
//! assert!(text.contains("_T1.Val"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`dictionary`]: `open_dictionary`, every family for one version, and `NmrStarFile`
//! - [`saveframe`]: the mapping engine: `Saveframe::add` and `Saveframe::each`
//! - [`category`]: one tag category: entry fields to a table and back
//! - [`field`]: field descriptors and accessor bindings
//! - [`naming`]: per-version wire tag tables
//! - [`codec`]: value codec and the `?` sentinel
//! - [`star`]: STAR text reader and writer
//! - [`error`]: Error types and result type
//!
//! ## Record Families
//!
//! - [`citations`], [`entity`], [`software`], [`method`]
//! - [`relaxation`] (R1, R2, NOE) and [`auto_relaxation`]
//! - [`csa`], [`model_free`], [`tensor`]

pub mod auto_relaxation;
pub mod category;
pub mod citations;
pub mod codec;
pub mod csa;
pub mod dictionary;
pub mod entity;
pub mod error;
pub mod field;
pub mod macros;
pub mod method;
pub mod model_free;
pub mod naming;
pub mod relaxation;
pub mod saveframe;
pub mod software;
/// STAR text reading and writing (`StarReader`, `StarWriter`, `StarFile`).
pub mod star;
pub mod table;
pub mod tensor;
pub mod value;
pub mod version;

pub use category::{CategorySpec, TagCategory};
pub use dictionary::{open_dictionary, open_dictionary_with, Dictionary, DictionaryConfig, NmrStarFile};
pub use error::{Result, StarError};
pub use field::{Accessor, FieldDescriptor, FieldSpec, Source};
pub use relaxation::{RelaxEntry, RelaxKind, Relaxation};
pub use saveframe::{Saveframe, SaveframeDef};
pub use star::{StarFile, StarReader, StarText, StarWriter};
pub use table::{Block, Table};
pub use value::{Bind, Bound, Format, Value};
pub use version::DictVersion;
