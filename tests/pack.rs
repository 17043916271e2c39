extern crate icopack;
extern crate png;
extern crate tempfile;

use icopack::{IcoContainer, PackError};
use std::fs;
use std::path::Path;

//===========================================================================//

fn encode_png(
    width: u32,
    height: u32,
    color: png::ColorType,
    bits: u8,
) -> Vec<u8> {
    let samples = match color {
        png::ColorType::Grayscale | png::ColorType::Indexed => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
    };
    let row_len = (width as usize * samples * bits as usize + 7) / 8;
    let pixels = vec![0x5a; row_len * height as usize];
    let mut output = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut output, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::from_u8(bits).unwrap());
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&pixels).unwrap();
    }
    output
}

fn rgba_png(width: u32, height: u32) -> Vec<u8> {
    encode_png(width, height, png::ColorType::Rgba, 8)
}

fn read_container(path: &Path) -> IcoContainer {
    IcoContainer::read(fs::File::open(path).unwrap()).unwrap()
}

// Returns the image data of every entry, sorted, since directory listing
// order isn't fixed.
fn sorted_images(container: &IcoContainer) -> Vec<Vec<u8>> {
    let mut images: Vec<Vec<u8>> = (0..container.len())
        .map(|index| container.image_data(index).unwrap().to_vec())
        .collect();
    images.sort();
    images
}

//===========================================================================//

#[test]
fn pack_ignores_other_files() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let a_png = rgba_png(64, 64);
    fs::write(input.path().join("a.png"), &a_png).unwrap();
    fs::write(input.path().join("notes.txt"), b"not an image").unwrap();
    fs::write(input.path().join("b.PNG"), rgba_png(32, 32)).unwrap();
    fs::write(input.path().join(".hidden.png"), rgba_png(16, 16)).unwrap();
    fs::create_dir(input.path().join("folder.png")).unwrap();

    let out_path = output.path().join("out.ico");
    let summary = icopack::pack_directory(input.path(), &out_path)
        .unwrap()
        .unwrap();
    assert_eq!(summary.num_images, 1);
    assert_eq!(summary.total_size, 6 + 16 + a_png.len() as u64);

    let bytes = fs::read(&out_path).unwrap();
    assert_eq!(bytes.len() as u64, summary.total_size);
    assert_eq!(&bytes[..6], b"\x00\x00\x01\x00\x01\x00");
    assert_eq!(&bytes[6..14], b"\x40\x40\x00\x00\x01\x00\x20\x00");
    assert_eq!(&bytes[14..18], &(a_png.len() as u32).to_le_bytes());
    assert_eq!(&bytes[18..22], b"\x16\x00\x00\x00");
    assert_eq!(&bytes[22..], a_png.as_slice());
}

#[test]
fn pack_empty_directory_writes_nothing() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let out_path = output.path().join("out.ico");
    let result = icopack::pack_directory(input.path(), &out_path).unwrap();
    assert_eq!(result, None);
    assert!(!out_path.exists());
}

#[test]
fn pack_directory_of_rejects_writes_nothing() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("short.png"), b"\x89PNG\r\n\x1a\n").unwrap();
    fs::write(input.path().join("huge.png"), rgba_png(300, 16)).unwrap();
    let out_path = output.path().join("out.ico");
    let result = icopack::pack_directory(input.path(), &out_path).unwrap();
    assert_eq!(result, None);
    assert!(!out_path.exists());
}

#[test]
fn pack_skips_bad_ihdr_length() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let mut broken = rgba_png(32, 32);
    broken[11] = 14;
    fs::write(input.path().join("broken.png"), &broken).unwrap();
    let good_one = rgba_png(16, 16);
    let good_two = encode_png(48, 48, png::ColorType::Rgb, 8);
    fs::write(input.path().join("one.png"), &good_one).unwrap();
    fs::write(input.path().join("two.png"), &good_two).unwrap();

    let out_path = output.path().join("out.ico");
    let summary = icopack::pack_directory(input.path(), &out_path)
        .unwrap()
        .unwrap();
    assert_eq!(summary.num_images, 2);
    let container = read_container(&out_path);
    let mut expected = vec![good_one, good_two];
    expected.sort();
    assert_eq!(sorted_images(&container), expected);
}

#[test]
fn pack_pixel_depths() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let cases: &[(&str, png::ColorType, u8)] = &[
        ("gray1.png", png::ColorType::Grayscale, 1),
        ("gray16.png", png::ColorType::Grayscale, 16),
        ("rgb8.png", png::ColorType::Rgb, 8),
        ("graya8.png", png::ColorType::GrayscaleAlpha, 8),
        ("rgba8.png", png::ColorType::Rgba, 8),
        ("rgb16.png", png::ColorType::Rgb, 16),
        ("rgba16.png", png::ColorType::Rgba, 16),
    ];
    for (index, &(name, color, bits)) in cases.iter().enumerate() {
        // Each image gets a distinct width so its entry can be found again.
        let png = encode_png(10 + index as u32, 8, color, bits);
        fs::write(input.path().join(name), png).unwrap();
    }

    let out_path = output.path().join("out.ico");
    icopack::pack_directory(input.path(), &out_path).unwrap().unwrap();
    let container = read_container(&out_path);
    let mut depths: Vec<(u32, u16)> = container
        .entries()
        .iter()
        .map(|entry| (entry.width(), entry.pixel_depth()))
        .collect();
    depths.sort();
    // 48-bit RGB and 64-bit RGBA are left out.
    assert_eq!(depths, vec![(10, 1), (11, 16), (12, 24), (13, 16), (14, 32)]);
}

#[test]
fn pack_size_limits() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("max.png"), rgba_png(256, 1)).unwrap();
    fs::write(input.path().join("almost.png"), rgba_png(255, 2)).unwrap();
    fs::write(input.path().join("wide.png"), rgba_png(257, 3)).unwrap();
    fs::write(input.path().join("tall.png"), rgba_png(4, 257)).unwrap();

    let out_path = output.path().join("out.ico");
    icopack::pack_directory(input.path(), &out_path).unwrap().unwrap();
    let container = read_container(&out_path);
    let mut sizes: Vec<(u8, u8, u32)> = container
        .entries()
        .iter()
        .map(|entry| (entry.height_byte(), entry.width_byte(), entry.width()))
        .collect();
    sizes.sort();
    assert_eq!(sizes, vec![(1, 0, 256), (2, 255, 255)]);
}

#[test]
fn packed_offsets_follow_directory() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let mut originals = Vec::new();
    for size in [16, 24, 32, 48, 64, 128].iter() {
        let png = rgba_png(*size, *size);
        fs::write(input.path().join(format!("icon{}.png", size)), &png)
            .unwrap();
        originals.push(png);
    }

    let out_path = output.path().join("out.ico");
    let summary = icopack::pack_directory(input.path(), &out_path)
        .unwrap()
        .unwrap();
    assert_eq!(summary.num_images, originals.len());
    let bytes = fs::read(&out_path).unwrap();
    let container = read_container(&out_path);
    assert_eq!(&bytes[4..6], &(originals.len() as u16).to_le_bytes());

    let mut expected_offset = 6 + 16 * originals.len() as u32;
    for entry in container.entries() {
        assert_eq!(entry.offset(), expected_offset);
        assert_eq!(entry.planes(), 1);
        assert_eq!(entry.num_colors(), 0);
        let start = entry.offset() as usize;
        let end = start + entry.size() as usize;
        let image = &bytes[start..end];
        assert_eq!(image.len(), entry.size() as usize);
        assert!(originals.iter().any(|png| png.as_slice() == image));
        expected_offset += entry.size();
    }
    assert_eq!(expected_offset as usize, bytes.len());
    originals.sort();
    assert_eq!(sorted_images(&container), originals);
}

#[test]
fn packing_twice_is_identical() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    for size in [16, 32, 48].iter() {
        fs::write(
            input.path().join(format!("{}.png", size)),
            rgba_png(*size, *size),
        )
        .unwrap();
    }
    let first = output.path().join("first.ico");
    let second = output.path().join("second.ico");
    icopack::pack_directory(input.path(), &first).unwrap().unwrap();
    icopack::pack_directory(input.path(), &second).unwrap().unwrap();
    assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
}

#[test]
fn pack_truncates_existing_output() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let png = rgba_png(8, 8);
    fs::write(input.path().join("small.png"), &png).unwrap();
    let out_path = output.path().join("out.ico");
    fs::write(&out_path, vec![0xffu8; 100_000]).unwrap();
    let summary = icopack::pack_directory(input.path(), &out_path)
        .unwrap()
        .unwrap();
    assert_eq!(fs::metadata(&out_path).unwrap().len(), summary.total_size);
}

//===========================================================================//

#[test]
fn input_must_be_a_directory() {
    let input = tempfile::tempdir().unwrap();
    let file_path = input.path().join("a.png");
    fs::write(&file_path, rgba_png(16, 16)).unwrap();
    let out_path = input.path().join("out.ico");
    let result = icopack::pack_directory(&file_path, &out_path);
    assert!(matches!(result, Err(PackError::NotADirectory { .. })));
    assert!(!out_path.exists());
}

#[test]
fn missing_input_directory() {
    let input = tempfile::tempdir().unwrap();
    let missing = input.path().join("missing");
    let out_path = input.path().join("out.ico");
    let result = icopack::pack_directory(&missing, &out_path);
    assert!(matches!(result, Err(PackError::InputPath { .. })));
    assert!(!out_path.exists());
}

#[test]
fn unwritable_output_is_fatal() {
    let input = tempfile::tempdir().unwrap();
    fs::write(input.path().join("a.png"), rgba_png(16, 16)).unwrap();
    let out_path = input.path().join("no-such-dir").join("out.ico");
    let result = icopack::pack_directory(input.path(), &out_path);
    assert!(matches!(result, Err(PackError::Write { .. })));
}

//===========================================================================//
