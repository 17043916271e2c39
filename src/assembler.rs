use crate::candidate::ImageCandidate;
use crate::container::{
    directory_size, DirectoryEntry, IcoContainer, MAX_IMAGES,
};
use log::{info, warn};
use thiserror::Error;

//===========================================================================//

// Starting capacities; both buffers grow on demand.
const INITIAL_ENTRIES: usize = 10;
const INITIAL_PAYLOAD: usize = 1 << 20;

//===========================================================================//

/// Why `IcoAssembler::accept` turned a candidate away.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum Refusal {
    /// The directory already holds `MAX_IMAGES` entries.
    #[error("the ICO directory is full ({} images)", MAX_IMAGES)]
    Full,
    /// The image would end past the reach of a 32-bit offset.
    #[error("the ICO file would grow past 4 GiB")]
    OffsetOverflow,
    /// The payload buffer couldn't grow to hold the image.
    #[error("out of memory for image data")]
    OutOfMemory,
}

//===========================================================================//

// Checks whether one more image of `image_len` bytes can follow
// `payload_len` bytes of payload in a directory of `num_entries` images.
// The last image has the largest offset, so checking it against the
// directory size at the new count covers every earlier image as well.
fn check_room(
    num_entries: usize,
    payload_len: u64,
    image_len: u32,
) -> Result<(), Refusal> {
    if num_entries >= MAX_IMAGES {
        return Err(Refusal::Full);
    }
    let end = directory_size(num_entries + 1)
        + payload_len
        + u64::from(image_len);
    if end > u64::from(u32::MAX) {
        return Err(Refusal::OffsetOverflow);
    }
    Ok(())
}

//===========================================================================//

/// Accumulates accepted images into a directory and a payload blob.
///
/// While images are being accepted, each entry's offset is relative to the
/// start of the payload.  The final image count fixes the size of the
/// directory, so absolute offsets are only patched in by `finalize`.
pub struct IcoAssembler {
    entries: Vec<DirectoryEntry>,
    payload: Vec<u8>,
}

impl IcoAssembler {
    /// Creates an empty assembler.
    pub fn new() -> IcoAssembler {
        IcoAssembler {
            entries: Vec::with_capacity(INITIAL_ENTRIES),
            payload: Vec::with_capacity(INITIAL_PAYLOAD),
        }
    }

    /// Returns the number of images accepted so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no image has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true once no more images can be accepted.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_IMAGES
    }

    /// Returns the number of payload bytes accumulated so far.
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Appends an entry for `candidate` along with its data.  On refusal
    /// neither the directory nor the payload is changed.
    pub fn accept(
        &mut self,
        candidate: &ImageCandidate,
    ) -> Result<(), Refusal> {
        let offset = self.payload.len() as u64;
        check_room(self.entries.len(), offset, candidate.len())?;
        if self.payload.try_reserve(candidate.data().len()).is_err()
            || self.entries.try_reserve(1).is_err()
        {
            return Err(Refusal::OutOfMemory);
        }
        self.entries.push(DirectoryEntry::new(
            candidate.width(),
            candidate.height(),
            candidate.pixel_depth(),
            candidate.len(),
            offset as u32,
        ));
        self.payload.extend_from_slice(candidate.data());
        info!(
            "added {}, {}x{}, {}bit",
            candidate.file_name(),
            candidate.width(),
            candidate.height(),
            candidate.pixel_depth()
        );
        Ok(())
    }

    /// Like `accept`, but logs a refusal instead of returning it.  Returns
    /// true if the image was added.
    pub fn offer(&mut self, candidate: &ImageCandidate) -> bool {
        match self.accept(candidate) {
            Ok(()) => true,
            Err(refusal) => {
                warn!("skipped {}: {}", candidate.file_name(), refusal);
                false
            }
        }
    }

    /// Turns the accumulated images into a container, rewriting each
    /// payload-relative offset into an offset from the start of the file.
    /// Returns `None` if no image was accepted.
    pub fn finalize(self) -> Option<IcoContainer> {
        if self.entries.is_empty() {
            return None;
        }
        let IcoAssembler { mut entries, payload } = self;
        // `accept` keeps every final offset within u32.
        let dir_size = directory_size(entries.len()) as u32;
        for entry in entries.iter_mut() {
            let offset = dir_size + entry.offset();
            entry.set_offset(offset);
        }
        Some(IcoContainer::from_parts(entries, payload))
    }
}

impl Default for IcoAssembler {
    fn default() -> IcoAssembler {
        IcoAssembler::new()
    }
}

//===========================================================================//


//===========================================================================//
