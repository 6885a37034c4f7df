use carve_core::error::CarveError;
use carve_core::image::ImageBuffer;

#[test]
fn find_respects_window_bounds() {
    let image = ImageBuffer::new(b"..NMIS....NMIS..".to_vec());

    assert_eq!(image.find(b"NMIS", 0, image.len()), Some(2));
    // Window starting past the first hit finds the second.
    assert_eq!(image.find(b"NMIS", 3, image.len()), Some(10));
    // Window ending before the pattern completes finds nothing.
    assert_eq!(image.find(b"NMIS", 0, 5), None);
    // Out-of-buffer bounds are clamped, not an error.
    assert_eq!(image.find(b"NMIS", 0, 10_000), Some(2));
    assert_eq!(image.find(b"NMIS", 10_000, 20_000), None);
}

#[test]
fn find_empty_pattern_never_matches() {
    let image = ImageBuffer::new(vec![1, 2, 3]);
    assert_eq!(image.find(b"", 0, 3), None);
}

#[test]
fn find_nth_is_deterministic() {
    let image = ImageBuffer::new(b"NMIS..NMIS..NMIS".to_vec());

    assert_eq!(image.find_nth(b"NMIS", 0), Some(0));
    assert_eq!(image.find_nth(b"NMIS", 1), Some(6));
    assert_eq!(image.find_nth(b"NMIS", 2), Some(12));
    assert_eq!(image.find_nth(b"NMIS", 3), None);
}

#[test]
fn slice_checks_bounds() {
    let image = ImageBuffer::new(vec![0xAA; 8]);

    assert_eq!(image.slice(2, 6).expect("in range"), &[0xAA; 4][..]);
    assert_eq!(image.slice(8, 8).expect("empty tail"), &[] as &[u8]);

    let err = image.slice(4, 9).unwrap_err();
    assert!(matches!(err, CarveError::OutOfRange { start: 4, end: 9, len: 8 }));

    let err = image.slice(6, 4).unwrap_err();
    assert!(matches!(err, CarveError::OutOfRange { start: 6, end: 4, .. }));
}

#[test]
fn scalar_reads_use_expected_endianness() {
    let image = ImageBuffer::new(vec![0x30, 0x82, 0x00, 0x05, 0x0A, 0x00, 0x00, 0x00]);

    assert_eq!(image.read_u16_be(2).expect("u16"), 0x0005);
    assert_eq!(image.read_u32_le(4).expect("u32"), 10);
    assert!(image.read_u16_be(7).is_err());
    assert!(image.read_u32_le(5).is_err());
}
