//! Synthetic image bytes for tests. Kept free of crate imports so the
//! integration tests can include it by path.
#![allow(dead_code)]

pub const DATE_TIME: u16 = 0x0132;
pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
pub const DATE_TIME_DIGITIZED: u16 = 0x9004;

const EXIF_IFD_POINTER: u16 = 0x8769;
const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;

/// Little-endian TIFF block. `DateTime` goes into IFD0, every other tag into
/// the Exif sub-IFD.
pub fn tiff_with_dates(tags: &[(u16, &str)]) -> Vec<u8> {
    let mut ifd0: Vec<(u16, &str)> = tags.iter().filter(|(t, _)| *t == DATE_TIME).copied().collect();
    let mut exif: Vec<(u16, &str)> = tags.iter().filter(|(t, _)| *t != DATE_TIME).copied().collect();
    ifd0.sort_by_key(|(t, _)| *t);
    exif.sort_by_key(|(t, _)| *t);

    let ifd0_offset = 8usize;
    let ifd0_count = ifd0.len() + usize::from(!exif.is_empty());
    let exif_offset = ifd0_offset + 2 + 12 * ifd0_count + 4;
    let exif_size = if exif.is_empty() { 0 } else { 2 + 12 * exif.len() + 4 };
    let data_offset = exif_offset + exif_size;

    let mut out = Vec::new();
    let mut data: Vec<u8> = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&(ifd0_offset as u32).to_le_bytes());

    let mut ascii_entry = |out: &mut Vec<u8>, tag: u16, value: &str| {
        let mut bytes = value.as_bytes().to_vec();
        bytes.push(0);
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&TYPE_ASCII.to_le_bytes());
        out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        if bytes.len() <= 4 {
            bytes.resize(4, 0);
            out.extend_from_slice(&bytes);
        } else {
            out.extend_from_slice(&((data_offset + data.len()) as u32).to_le_bytes());
            data.extend_from_slice(&bytes);
            if data.len() % 2 == 1 {
                data.push(0);
            }
        }
    };

    out.extend_from_slice(&(ifd0_count as u16).to_le_bytes());
    for (tag, value) in &ifd0 {
        ascii_entry(&mut out, *tag, value);
    }
    if !exif.is_empty() {
        out.extend_from_slice(&EXIF_IFD_POINTER.to_le_bytes());
        out.extend_from_slice(&TYPE_LONG.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&(exif_offset as u32).to_le_bytes());
    }
    out.extend_from_slice(&0u32.to_le_bytes());

    if !exif.is_empty() {
        out.extend_from_slice(&(exif.len() as u16).to_le_bytes());
        for (tag, value) in &exif {
            ascii_entry(&mut out, *tag, value);
        }
        out.extend_from_slice(&0u32.to_le_bytes());
    }

    out.extend_from_slice(&data);
    // Streaming parsers read ahead in fixed-size chunks.
    out.resize(out.len() + TIFF_PADDING, 0);
    out
}

const TIFF_PADDING: usize = 1024;
const SCAN_LEN: usize = 4096;

/// 1x1 greyscale baseline JPEG with an APP1 Exif segment in front of the
/// frame.
pub fn jpeg_with_dates(tags: &[(u16, &str)]) -> Vec<u8> {
    let tiff = tiff_with_dates(tags);
    let mut out = vec![0xFF, 0xD8];

    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);

    // DQT: table 0, all ones.
    out.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x43, 0x00]);
    out.extend_from_slice(&[1u8; 64]);

    // SOF0: 8-bit, 1x1, one component sampled 1x1 on table 0.
    out.extend_from_slice(&[
        0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00,
    ]);

    // SOS: one component, full spectral range.
    out.extend_from_slice(&[
        0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00,
    ]);
    out.resize(out.len() + SCAN_LEN, 0);

    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// PNG signature followed by an IEND chunk; carries no metadata.
pub fn bare_png() -> Vec<u8> {
    let mut out = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(b"IEND");
    out.extend_from_slice(&[0xAE, 0x42, 0x60, 0x82]);
    out
}
