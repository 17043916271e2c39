use crate::endian::IcoOrder;
use byteorder::{ReadBytesExt, WriteBytesExt};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

//===========================================================================//

/// The size of the ICONDIR header, in bytes.
pub const HEADER_SIZE: u32 = 6;

/// The size of one ICONDIRENTRY record, in bytes.
pub const ENTRY_SIZE: u32 = 16;

/// The most images a single ICO file can hold.
pub const MAX_IMAGES: usize = u16::MAX as usize;

// Values of the ICONDIR file-type field.
const ICON_FILE_TYPE: u16 = 1;
const CURSOR_FILE_TYPE: u16 = 2;

// Icons always use a single color plane.
const ICON_PLANES: u16 = 1;

/// Returns the size of the header plus `num_entries` directory entries.
pub(crate) fn directory_size(num_entries: usize) -> u64 {
    u64::from(HEADER_SIZE) + u64::from(ENTRY_SIZE) * num_entries as u64
}

//===========================================================================//

/// One ICONDIRENTRY: the metadata of a single packed PNG image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct DirectoryEntry {
    width: u32,
    height: u32,
    num_colors: u8,
    planes: u16,
    pixel_depth: u16,
    size: u32,
    offset: u32,
}

impl DirectoryEntry {
    pub(crate) fn new(
        width: u32,
        height: u32,
        pixel_depth: u16,
        size: u32,
        offset: u32,
    ) -> DirectoryEntry {
        DirectoryEntry {
            width,
            height,
            num_colors: 0,
            planes: ICON_PLANES,
            pixel_depth,
            size,
            offset,
        }
    }

    pub(crate) fn set_offset(&mut self, offset: u32) {
        self.offset = offset;
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the width as stored on disk, where zero means 256.
    pub fn width_byte(&self) -> u8 {
        size_byte(self.width)
    }

    /// Returns the height as stored on disk, where zero means 256.
    pub fn height_byte(&self) -> u8 {
        size_byte(self.height)
    }

    /// Returns the palette size field, which is always zero for PNG data.
    pub fn num_colors(&self) -> u8 {
        self.num_colors
    }

    /// Returns the color planes field.  In a cursor this field holds the
    /// hotspot's x coordinate instead.
    pub fn planes(&self) -> u16 {
        self.planes
    }

    /// Returns the bits-per-pixel field.  In a cursor this field holds the
    /// hotspot's y coordinate instead.
    pub fn pixel_depth(&self) -> u16 {
        self.pixel_depth
    }

    /// Returns the size of the image data, in bytes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the offset of the image data from the start of the file.
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

// A width/height byte of zero indicates a size of 256.
fn size_byte(size: u32) -> u8 {
    if size > 255 {
        0
    } else {
        size as u8
    }
}

//===========================================================================//

/// A finalized ICO file: the directory, with absolute offsets, plus the
/// concatenated image data in directory order.  Only icons are supported;
/// the file-type field is always written as 1.
#[derive(Clone, Debug)]
pub struct IcoContainer {
    entries: Vec<DirectoryEntry>,
    payload: Vec<u8>,
}

impl IcoContainer {
    pub(crate) fn from_parts(
        entries: Vec<DirectoryEntry>,
        payload: Vec<u8>,
    ) -> IcoContainer {
        IcoContainer { entries, payload }
    }

    /// Returns the directory entries, in file order.
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Returns the concatenated image data that follows the directory.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the number of images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no images.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the size of the header plus the directory entries, in bytes.
    pub fn directory_size(&self) -> u64 {
        directory_size(self.entries.len())
    }

    /// Returns the size of the whole file, in bytes.
    pub fn total_size(&self) -> u64 {
        self.directory_size() + self.payload.len() as u64
    }

    /// Returns the encoded data of the image at `index`, sliced out of the
    /// payload using its entry's offset and size.
    pub fn image_data(&self, index: usize) -> Option<&[u8]> {
        let entry = self.entries.get(index)?;
        let start =
            u64::from(entry.offset).checked_sub(self.directory_size())?;
        let start = usize::try_from(start).ok()?;
        let end = start.checked_add(entry.size as usize)?;
        self.payload.get(start..end)
    }

    /// Reads an ICO file into memory.  The image data is kept as-is and not
    /// inspected.  CUR files are refused, since their planes and depth
    /// fields hold a cursor hotspot instead.
    pub fn read<R: Read>(mut reader: R) -> io::Result<IcoContainer> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let mut directory = bytes.as_slice();
        let reserved = directory.read_u16::<IcoOrder>()?;
        if reserved != 0 {
            invalid_data!(
                "Invalid reserved field value in ICONDIR \
                 (was {}, but must be 0)",
                reserved
            );
        }
        match directory.read_u16::<IcoOrder>()? {
            ICON_FILE_TYPE => {}
            CURSOR_FILE_TYPE => invalid_data!("CUR files are not supported"),
            file_type => invalid_data!("Invalid file type ({})", file_type),
        }
        let num_entries = directory.read_u16::<IcoOrder>()? as usize;
        let dir_size = directory_size(num_entries);
        let mut entries = Vec::<DirectoryEntry>::with_capacity(num_entries);
        for _ in 0..num_entries {
            let width_byte = directory.read_u8()?;
            let height_byte = directory.read_u8()?;
            let num_colors = directory.read_u8()?;
            let reserved = directory.read_u8()?;
            if reserved != 0 {
                invalid_data!(
                    "Invalid reserved field value in ICONDIRENTRY \
                     (was {}, but must be 0)",
                    reserved
                );
            }
            let planes = directory.read_u16::<IcoOrder>()?;
            let pixel_depth = directory.read_u16::<IcoOrder>()?;
            let size = directory.read_u32::<IcoOrder>()?;
            let offset = directory.read_u32::<IcoOrder>()?;
            let end = u64::from(offset) + u64::from(size);
            if u64::from(offset) < dir_size || end > bytes.len() as u64 {
                invalid_data!(
                    "Image data out of bounds (offset {}, size {}, \
                     but file has {} bytes)",
                    offset,
                    size,
                    bytes.len()
                );
            }
            entries.push(DirectoryEntry {
                width: if width_byte == 0 { 256 } else { width_byte as u32 },
                height: if height_byte == 0 {
                    256
                } else {
                    height_byte as u32
                },
                num_colors,
                planes,
                pixel_depth,
                size,
                offset,
            });
        }
        // The directory was fully read above, so this can't be out of range.
        let payload = bytes.split_off(dir_size as usize);
        Ok(IcoContainer { entries, payload })
    }

    /// Writes the header, the directory entries and the payload, in that
    /// order.  All directory fields are little-endian.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        if self.entries.len() > MAX_IMAGES {
            invalid_input!(
                "Too many entries in IcoContainer (was {}, but max is {})",
                self.entries.len(),
                MAX_IMAGES
            );
        }
        writer.write_u16::<IcoOrder>(0)?; // reserved
        writer.write_u16::<IcoOrder>(ICON_FILE_TYPE)?;
        writer.write_u16::<IcoOrder>(self.entries.len() as u16)?;
        for entry in self.entries.iter() {
            writer.write_u8(entry.width_byte())?;
            writer.write_u8(entry.height_byte())?;
            writer.write_u8(entry.num_colors)?;
            writer.write_u8(0)?; // reserved
            writer.write_u16::<IcoOrder>(entry.planes)?;
            writer.write_u16::<IcoOrder>(entry.pixel_depth)?;
            writer.write_u32::<IcoOrder>(entry.size)?;
            writer.write_u32::<IcoOrder>(entry.offset)?;
        }
        writer.write_all(&self.payload)?;
        Ok(())
    }

    /// Creates (or truncates) the file at `path` and writes the container to
    /// it.  No lock is taken on the file, so concurrent writers to the same
    /// path are not excluded.  A partially written file is left behind on
    /// error.
    pub fn write_to_path(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(&mut writer)?;
        writer.flush()
    }
}

//===========================================================================//


//===========================================================================//
