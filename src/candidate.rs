use crate::pngheader::{PngColorType, PngHeader};
use log::{debug, warn};
use std::fs::{self, DirEntry, ReadDir};
use std::io;
use std::path::{Path, PathBuf};

//===========================================================================//

// The (case-sensitive) suffix a file name needs to be considered.
const PNG_SUFFIX: &str = ".png";

//===========================================================================//

// The entry size field is 32 bits wide, so larger files can't be packed.
fn check_image_size(size: u64) -> io::Result<()> {
    if size > u64::from(u32::MAX) {
        invalid_data!(
            "Image too large (was {} bytes, but max is {})",
            size,
            u32::MAX
        );
    }
    Ok(())
}

/// Returns true if a directory entry with this name should be inspected:
/// the name ends in `.png` and isn't hidden.  A name consisting of only the
/// suffix (".png") is hidden.
pub fn is_candidate_name(name: &str) -> bool {
    !name.starts_with('.') && name.ends_with(PNG_SUFFIX)
}

//===========================================================================//

/// A PNG file that passed header inspection, held in memory until it is
/// handed to the assembler.
#[derive(Clone, Debug)]
pub struct ImageCandidate {
    file_name: String,
    header: PngHeader,
    data: Vec<u8>,
}

impl ImageCandidate {
    /// Inspects the contents of a PNG file and wraps them as a candidate.
    /// `file_name` is only used for diagnostics.  Returns an error if the
    /// data would be rejected by `PngHeader::inspect`, or if it is too large
    /// for the 32-bit size field of an ICO directory entry.
    pub fn from_bytes(
        file_name: impl Into<String>,
        data: Vec<u8>,
    ) -> io::Result<ImageCandidate> {
        check_image_size(data.len() as u64)?;
        let header = PngHeader::inspect(&data)?;
        Ok(ImageCandidate { file_name: file_name.into(), header, data })
    }

    /// Reads a whole file into memory and inspects it.
    pub fn load(path: &Path) -> io::Result<ImageCandidate> {
        check_image_size(fs::symlink_metadata(path)?.len())?;
        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => path.to_string_lossy().into_owned(),
        };
        ImageCandidate::from_bytes(file_name, fs::read(path)?)
    }

    /// Returns the name of the file this image came from.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the inspected PNG header.
    pub fn header(&self) -> &PngHeader {
        &self.header
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.header.width()
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.header.height()
    }

    /// Returns the number of bits per pixel.
    pub fn pixel_depth(&self) -> u16 {
        self.header.pixel_depth()
    }

    /// Returns the PNG color type.
    pub fn color_type(&self) -> PngColorType {
        self.header.color_type()
    }

    /// Returns the raw PNG file contents.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the size of the PNG file, in bytes.
    pub fn len(&self) -> u32 {
        // Checked against u32::MAX on construction.
        self.data.len() as u32
    }

    /// Returns true if the PNG file is empty, which an inspected file never
    /// is.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

//===========================================================================//

/// Iterates over the acceptable PNG files in a directory, in whatever order
/// the directory listing yields them.  Entries that are filtered out or that
/// fail to load are skipped with a diagnostic; the iterator itself never
/// fails.
pub struct Candidates {
    dir: PathBuf,
    entries: ReadDir,
}

impl Candidates {
    /// Starts listing `dir`.  Returns an error if it can't be listed.
    pub fn open(dir: &Path) -> io::Result<Candidates> {
        let entries = fs::read_dir(dir)?;
        Ok(Candidates { dir: dir.to_path_buf(), entries })
    }
}

fn load_entry(entry: &DirEntry) -> Option<ImageCandidate> {
    let name = entry.file_name();
    let name = name.to_string_lossy();
    if !is_candidate_name(&name) {
        debug!("ignoring {}", name);
        return None;
    }
    // Symlinks aren't followed, so only plain files count.
    match entry.file_type() {
        Ok(file_type) if file_type.is_file() => {}
        Ok(_) => {
            debug!("ignoring {}, not a regular file", name);
            return None;
        }
        Err(error) => {
            warn!("skipped {}: {}", name, error);
            return None;
        }
    }
    match ImageCandidate::load(&entry.path()) {
        Ok(candidate) => Some(candidate),
        Err(error) => {
            warn!("skipped {}: {}", name, error);
            None
        }
    }
}

impl Iterator for Candidates {
    type Item = ImageCandidate;

    fn next(&mut self) -> Option<ImageCandidate> {
        for entry in self.entries.by_ref() {
            match entry {
                Ok(entry) => {
                    if let Some(candidate) = load_entry(&entry) {
                        return Some(candidate);
                    }
                }
                Err(error) => {
                    warn!("error listing {}: {}", self.dir.display(), error);
                }
            }
        }
        None
    }
}

//===========================================================================//


//===========================================================================//
