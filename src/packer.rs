use crate::assembler::IcoAssembler;
use crate::candidate::{Candidates, ImageCandidate};
use crate::container::IcoContainer;
use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

//===========================================================================//

/// A failure that ends a whole packing run.  Problems with individual files
/// are never reported this way; those files are just skipped.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PackError {
    /// The input directory is missing or can't be listed.
    #[error("can't read input directory {}: {source}", path.display())]
    InputPath {
        /// The input directory.
        path: PathBuf,
        /// What went wrong.
        source: io::Error,
    },
    /// The input path exists but isn't a directory.
    #[error("input path {} is not a directory", path.display())]
    NotADirectory {
        /// The input path.
        path: PathBuf,
    },
    /// The output file couldn't be created or fully written.
    #[error("can't write ICO file {}: {source}", path.display())]
    Write {
        /// The output path.
        path: PathBuf,
        /// What went wrong.
        source: io::Error,
    },
}

/// The result of a packing run.
pub type Result<T> = std::result::Result<T, PackError>;

//===========================================================================//

/// What a packing run produced.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PackSummary {
    /// The number of images in the written file.
    pub num_images: usize,
    /// The size of the written file, in bytes.
    pub total_size: u64,
}

//===========================================================================//

/// Assembles candidates, in order, until they run out or the directory is
/// full.  Returns `None` if none of them were accepted.
pub fn pack_candidates<I>(candidates: I) -> Option<IcoContainer>
where
    I: IntoIterator<Item = ImageCandidate>,
{
    let mut assembler = IcoAssembler::new();
    for candidate in candidates {
        assembler.offer(&candidate);
        if assembler.is_full() {
            warn!("ICO directory is full, ignoring any remaining files");
            break;
        }
    }
    assembler.finalize()
}

/// Packs every acceptable PNG file in `input_dir` into an ICO file at
/// `output`.  Returns `Ok(None)` without creating the output file if no
/// image was accepted.
pub fn pack_directory(
    input_dir: &Path,
    output: &Path,
) -> Result<Option<PackSummary>> {
    let input_error = |source: io::Error| PackError::InputPath {
        path: input_dir.to_path_buf(),
        source,
    };
    let metadata = fs::symlink_metadata(input_dir).map_err(input_error)?;
    if !metadata.is_dir() {
        return Err(PackError::NotADirectory { path: input_dir.to_path_buf() });
    }
    let candidates = Candidates::open(input_dir).map_err(input_error)?;
    let container = match pack_candidates(candidates) {
        Some(container) => container,
        None => {
            info!("no PNG files accepted from {}", input_dir.display());
            return Ok(None);
        }
    };
    container.write_to_path(output).map_err(|source| PackError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    Ok(Some(PackSummary {
        num_images: container.len(),
        total_size: container.total_size(),
    }))
}

//===========================================================================//


//===========================================================================//
