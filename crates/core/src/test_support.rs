//! Synthetic JPEG fixtures: SOI followed by an APP1/Exif segment holding a tiny
//! little-endian TIFF block.

use std::fs;
use std::path::Path;

const EXIF_IFD_POINTER: u16 = 0x8769;
const DATE_TIME_ORIGINAL: u16 = 0x9003;
const DATE_TIME: u16 = 0x0132;
const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;

/// `date` uses the EXIF layout `YYYY:MM:DD HH:MM:SS`.
pub fn jpeg_with_date_original(date: &str) -> Vec<u8> {
    assert_eq!(date.len(), 19, "EXIF dates are 19 characters");
    let mut tiff = tiff_header();
    // IFD0 at 8 holds only the Exif IFD pointer; the Exif IFD follows at 26.
    tiff.extend_from_slice(&1u16.to_le_bytes());
    ifd_entry(&mut tiff, EXIF_IFD_POINTER, TYPE_LONG, 1, 26);
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff.extend_from_slice(&1u16.to_le_bytes());
    ifd_entry(&mut tiff, DATE_TIME_ORIGINAL, TYPE_ASCII, 20, 44);
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff.extend_from_slice(date.as_bytes());
    tiff.push(0);
    wrap_in_jpeg(&tiff)
}

/// Valid EXIF block that carries `DateTime` but no `DateTimeOriginal`.
pub fn jpeg_without_date_original() -> Vec<u8> {
    let mut tiff = tiff_header();
    tiff.extend_from_slice(&1u16.to_le_bytes());
    ifd_entry(&mut tiff, DATE_TIME, TYPE_ASCII, 20, 26);
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff.extend_from_slice(b"2011:06:01 07:07:07");
    tiff.push(0);
    wrap_in_jpeg(&tiff)
}

/// Dated JPEG whose Exif segment starts after `padding_segments` full-size APPn segments.
pub fn jpeg_with_padding_before_exif(date: &str, padding_segments: usize) -> Vec<u8> {
    let plain = jpeg_with_date_original(date);
    let padding = vec![0u8; u16::MAX as usize - 2];
    let mut out = vec![0xFF, 0xD8];
    for n in 0..padding_segments {
        out.extend_from_slice(&[0xFF, 0xE2 + n as u8]);
        out.extend_from_slice(&u16::MAX.to_be_bytes());
        out.extend_from_slice(&padding);
    }
    out.extend_from_slice(&plain[2..]);
    out
}

pub fn write_jpeg(path: &Path, date: Option<&str>) {
    let body = match date {
        Some(date) => jpeg_with_date_original(date),
        None => jpeg_without_date_original(),
    };
    fs::write(path, body).expect("write jpeg fixture");
}

fn tiff_header() -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());
    tiff
}

fn ifd_entry(out: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&value.to_le_bytes());
}

fn wrap_in_jpeg(tiff: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    out.extend_from_slice(&[0xFF, 0xE1]);
    let len = (2 + 6 + tiff.len()) as u16;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}
