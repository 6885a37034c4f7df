use carve_core::decompose::decompose;
use carve_core::image::ImageBuffer;

fn synthetic_dump() -> Vec<u8> {
    let mut image = vec![0u8; 0x9000];
    image[..4].copy_from_slice(b"NMIS");
    image[0x100..0x104].copy_from_slice(&[0x30, 0x82, 0x00, 0x05]);
    image[0x4000..0x4004].copy_from_slice(b"NMIS");
    image[0x6000..0x6004].copy_from_slice(b"NMID");
    image[0x7000..0x7009].copy_from_slice(b"index.htm");
    image[0x7020..0x7024].copy_from_slice(&10u32.to_le_bytes());
    image
}

#[test]
fn descriptor_follows_the_grammar() {
    let image = ImageBuffer::new(synthetic_dump());
    let decomposition = decompose(&image, None).expect("decompose");
    let descriptor = decomposition.layout_descriptor();

    let lines: Vec<&str> = descriptor.lines().collect();
    assert_eq!(lines[0], "[flash]");
    assert_eq!(lines[1], "size is 0x9000");
    assert_eq!(lines[2], "");

    // One region line per region, ascending offset order.
    let region_lines: Vec<&str> =
        lines.iter().copied().filter(|l| l.starts_with("region at ")).collect();
    assert_eq!(
        region_lines,
        vec![
            "region at 0x000000 is [boot firmware]",
            "region at 0x000100 is [tls certificate]",
            "region at 0x001000 is [control sector]",
            "region at 0x002000 is [backup sector]",
            "region at 0x003000 is [pll table]",
            "region at 0x003400 is [gain table]",
            "region at 0x004000 is [downloader firmware]",
            "region at 0x006000 is [wifi firmware]",
            "region at 0x007000 is [index.htm]",
        ]
    );

    // Firmware sections carry schema, prefix, and file.
    assert!(descriptor.contains(
        "[wifi firmware]\ntype is firmware\nschema is 2\nprefix is NMID\nfile is firmware/wifi_firmware.bin\n"
    ));
    assert!(descriptor.contains("[boot firmware]\ntype is firmware\nschema is 1\nprefix is NMIS\n"));

    // Other kinds list only their type.
    assert!(descriptor.contains("[tls certificate]\ntype is tls certificate\n"));
    assert!(descriptor.contains("[control sector]\ntype is fixed\n"));
    assert!(descriptor.contains("[index.htm]\ntype is http file\n"));
}
