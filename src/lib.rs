//! A library for packing PNG images into ICO files.
//!
//! PNG data is never decoded: each file's signature and IHDR chunk are
//! inspected to fill in its ICO directory entry, and the file itself is
//! stored verbatim.

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod assembler;
mod candidate;
mod container;
pub mod endian;
mod packer;
mod pngheader;

pub use crate::assembler::{IcoAssembler, Refusal};
pub use crate::candidate::{is_candidate_name, Candidates, ImageCandidate};
pub use crate::container::{
    DirectoryEntry, IcoContainer, ENTRY_SIZE, HEADER_SIZE, MAX_IMAGES,
};
pub use crate::packer::{
    pack_candidates, pack_directory, PackError, PackSummary, Result,
};
pub use crate::pngheader::{PngColorType, PngHeader, PNG_MIN_LEN};
