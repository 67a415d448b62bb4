//! EXIF decoder integration tests.
//!
//! Tests verify:
//! - Tag lookup in both byte orders, inline and out-of-line values
//! - Sub-IFD traversal (EXIF, GPS, Interoperability) and IFD1
//! - First-match semantics and cycle detection
//! - Errors for corrupt entries and headers

use imgindex::format::exif::IfdKind;
use imgindex::{ExifError, ExifSegment, ExifTag, Value};

use super::test_utils::{xp_bytes, ByteOrderType, ExifBuilder, IfdBuilder};

fn both_orders() -> [ByteOrderType; 2] {
    [ByteOrderType::LittleEndian, ByteOrderType::BigEndian]
}

fn camera_exif(order: ByteOrderType) -> Vec<u8> {
    ExifBuilder::new(order)
        .ifd0(
            IfdBuilder::new()
                .ascii(0x010F, "Canon")
                .ascii(0x0110, "EOS R6")
                .short(0x0112, &[6])
                .rational(0x011A, &[(300, 1)])
                .bytes(0x9C9B, 1, &xp_bytes("Harbour")),
        )
        .exif(
            IfdBuilder::new()
                .rational(0x829A, &[(1, 250)])
                .rational(0x829D, &[(28, 10)])
                .short(0x8827, &[400])
                .ascii(0x9003, "2023:07:14 06:12:00")
                .srational(0x9204, &[(-1, 3)])
                .bytes(0x9000, 7, b"0232")
                .short(0x9209, &[0x10]),
        )
        .gps(
            IfdBuilder::new()
                .bytes(0x0000, 1, &[2, 3, 0, 0])
                .ascii(0x0001, "N")
                .rational(0x0002, &[(48, 1), (51, 1), (2952, 100)])
                .ascii(0x0003, "W")
                .rational(0x0004, &[(2, 1), (17, 1), (4020, 100)]),
        )
        .interop(IfdBuilder::new().ascii(0x0001, "R98"))
        .thumbnail(
            IfdBuilder::new()
                .short(0x0103, &[6])
                .long(0x0201, &[4096])
                .long(0x0202, &[1234])
                .short(0x0112, &[1]),
        )
        .build()
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[test]
fn test_ifd0_lookup_both_orders() {
    for order in both_orders() {
        let block = camera_exif(order);
        let exif = ExifSegment::new(&block);

        assert_eq!(exif.marker().unwrap(), 0xFFE1);
        assert_eq!(exif.length().unwrap() as usize, block.len() - 2);

        assert_eq!(
            exif.read_tag_value(ExifTag::Orientation.as_u16()).unwrap(),
            Value::Short(6),
            "{:?}",
            order
        );
        assert_eq!(
            exif.read_tag_value(ExifTag::Make.as_u16()).unwrap(),
            Value::Text("Canon".into())
        );
        assert_eq!(
            exif.read_tag_value(ExifTag::XResolution.as_u16()).unwrap(),
            Value::Rational(300.0)
        );
    }
}

#[test]
fn test_exif_sub_ifd_lookup() {
    for order in both_orders() {
        let block = camera_exif(order);
        let exif = ExifSegment::new(&block);

        assert_eq!(
            exif.read_tag_value(ExifTag::ExposureTime.as_u16()).unwrap(),
            Value::Rational(1.0 / 250.0)
        );
        assert_eq!(
            exif.read_tag_value(ExifTag::PhotographicSensitivity.as_u16())
                .unwrap(),
            Value::Short(400)
        );
        assert_eq!(
            exif.read_tag_value(ExifTag::ExposureBiasValue.as_u16()).unwrap(),
            Value::SRational(-1.0 / 3.0)
        );
        assert_eq!(
            exif.read_tag_value(ExifTag::ExifVersion.as_u16()).unwrap(),
            Value::Sequence(b"0232".iter().map(|&b| Value::Byte(b)).collect())
        );
    }
}

#[test]
fn test_gps_sub_ifd_lookup() {
    for order in both_orders() {
        let block = camera_exif(order);
        let exif = ExifSegment::new(&block);

        assert_eq!(
            exif.read_tag_value(ExifTag::GPSLatitude.as_u16()).unwrap(),
            Value::Sequence(vec![
                Value::Rational(48.0),
                Value::Rational(51.0),
                Value::Rational(29.52),
            ])
        );
        assert_eq!(
            exif.read_tag_value(ExifTag::GPSLongitudeRef.as_u16()).unwrap(),
            Value::Text("W".into())
        );
    }
}

#[test]
fn test_interop_lookup() {
    let block = camera_exif(ByteOrderType::LittleEndian);
    let exif = ExifSegment::new(&block);

    // 0x0001 is InteroperabilityIndex in the Interop IFD and GPSLatitudeRef
    // in the GPS IFD. GPS is visited before the EXIF branch.
    assert_eq!(exif.read_tag_value(0x0001).unwrap(), Value::Text("N".into()));
}

#[test]
fn test_thumbnail_ifd_is_searched_last() {
    let block = camera_exif(ByteOrderType::BigEndian);
    let exif = ExifSegment::new(&block);

    // IFD1-only tag
    assert_eq!(exif.read_tag_value(0x0201).unwrap(), Value::Long(4096));

    // Present in IFD0 and IFD1: IFD0 wins
    assert_eq!(exif.read_tag_value(0x0112).unwrap(), Value::Short(6));
}

#[test]
fn test_pointer_tag_value() {
    let block = camera_exif(ByteOrderType::LittleEndian);
    let exif = ExifSegment::new(&block);

    let pointer = exif
        .read_tag_value(ExifTag::ExifIFDPointer.as_u16())
        .unwrap()
        .as_u32()
        .unwrap();
    assert!(pointer > 8);
}

#[test]
fn test_missing_tag() {
    let block = camera_exif(ByteOrderType::LittleEndian);
    let exif = ExifSegment::new(&block);

    assert_eq!(
        exif.read_tag_value(ExifTag::LensModel.as_u16()),
        Err(ExifError::NotFound(0xA434))
    );
}

#[test]
fn test_gps_reachable_only_through_pointer() {
    for order in both_orders() {
        let mut block = ExifBuilder::new(order)
            .ifd0(IfdBuilder::new().short(0x0112, &[1]))
            .gps(IfdBuilder::new().ascii(0x0001, "N"))
            .build();

        assert_eq!(
            ExifSegment::new(&block).read_tag_value(0x0001).unwrap(),
            Value::Text("N".into())
        );

        // The GPS pointer is IFD0's second entry; retag it so the GPS IFD
        // stays in the block but is no longer linked.
        let pointer = 18 + 2 + 12;
        assert_eq!(block[pointer..pointer + 2], order.u16(0x8825));
        block[pointer..pointer + 2].copy_from_slice(&order.u16(0xC4A5));

        assert_eq!(
            ExifSegment::new(&block).read_tag_value(0x0001),
            Err(ExifError::NotFound(0x0001))
        );
    }
}

#[test]
fn test_broken_thumbnail_link_still_not_found() {
    for order in both_orders() {
        let mut block = ExifBuilder::new(order)
            .ifd0(IfdBuilder::new().short(0x0112, &[6]).ascii(0x010F, "Nikon"))
            .build();

        // IFD0 next link, after two entries
        let next_link = 18 + 2 + 2 * 12;
        block[next_link..next_link + 4].copy_from_slice(&order.u32(0x00FF_FF00));

        let exif = ExifSegment::new(&block);
        assert_eq!(
            exif.read_tag_value(ExifTag::XPTitle.as_u16()),
            Err(ExifError::NotFound(0x9C9B))
        );
        assert_eq!(exif.read_tag_value(0x0112).unwrap(), Value::Short(6));
    }
}

#[test]
fn test_xp_title_bytes() {
    let block = camera_exif(ByteOrderType::LittleEndian);
    let exif = ExifSegment::new(&block);

    let value = exif.read_tag_value(ExifTag::XPTitle.as_u16()).unwrap();
    assert_eq!(
        imgindex::format::exif::decode_xp_text(&value).as_deref(),
        Some("Harbour")
    );
}

// =============================================================================
// Enumeration Tests
// =============================================================================

#[test]
fn test_tags_traversal_order() {
    let block = camera_exif(ByteOrderType::LittleEndian);
    let fields = ExifSegment::new(&block).tags().unwrap();

    let mut kinds: Vec<IfdKind> = fields.iter().map(|f| f.ifd).collect();
    kinds.dedup();
    assert_eq!(
        kinds,
        vec![
            IfdKind::Primary,
            IfdKind::Gps,
            IfdKind::Exif,
            IfdKind::Interop,
            IfdKind::Thumbnail,
        ]
    );

    assert!(fields.iter().all(|f| f.value.is_ok()));
    let orientation = fields
        .iter()
        .find(|f| f.tag() == Some(ExifTag::Orientation))
        .unwrap();
    assert_eq!(orientation.ifd, IfdKind::Primary);
}

#[test]
fn test_tags_keeps_undecodable_entries() {
    let block = ExifBuilder::new(ByteOrderType::LittleEndian)
        .ifd0(IfdBuilder::new().short(0x0112, &[1]).raw(0x0131, 13, 1, 0))
        .build();
    let fields = ExifSegment::new(&block).tags().unwrap();

    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].value, Ok(Value::Short(1)));
    assert_eq!(fields[1].value, Err(ExifError::UnsupportedType(13)));
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_cyclic_exif_pointer() {
    // EXIF pointer back to IFD0
    let block = ExifBuilder::new(ByteOrderType::LittleEndian)
        .ifd0(IfdBuilder::new().short(0x0112, &[1]).raw(0x8769, 4, 1, 8))
        .build();
    let exif = ExifSegment::new(&block);

    assert_eq!(exif.read_tag_value(0x0112).unwrap(), Value::Short(1));
    assert_eq!(
        exif.read_tag_value(0x9999),
        Err(ExifError::CyclicReference(18))
    );
}

#[test]
fn test_sub_ifd_out_of_range() {
    let block = ExifBuilder::new(ByteOrderType::BigEndian)
        .ifd0(IfdBuilder::new().raw(0x8825, 4, 1, 0x0001_0000))
        .build();
    let result = ExifSegment::new(&block).read_tag_value(0x0002);
    assert!(matches!(result, Err(ExifError::OffsetOutOfRange(_))));
}

#[test]
fn test_value_offset_out_of_range() {
    let block = ExifBuilder::new(ByteOrderType::LittleEndian)
        .ifd0(IfdBuilder::new().raw(0x010F, 2, 64, 0x7FFF))
        .build();
    let result = ExifSegment::new(&block).read_tag_value(0x010F);
    assert!(matches!(result, Err(ExifError::OffsetOutOfRange(_))));
}

#[test]
fn test_unsupported_type() {
    let block = ExifBuilder::new(ByteOrderType::BigEndian)
        .ifd0(IfdBuilder::new().raw(0x0131, 0, 1, 0))
        .build();
    assert_eq!(
        ExifSegment::new(&block).read_tag_value(0x0131),
        Err(ExifError::UnsupportedType(0))
    );
}

#[test]
fn test_truncated_block() {
    let block = camera_exif(ByteOrderType::LittleEndian);
    let truncated = &block[..block.len() / 3];

    // The header still parses; somewhere in the graph a read runs off the end.
    let result = ExifSegment::new(truncated).read_tag_value(0x0201);
    assert!(matches!(result, Err(ExifError::OffsetOutOfRange(_))));
}

#[test]
fn test_bad_signature() {
    let mut block = camera_exif(ByteOrderType::LittleEndian);
    block[12] = 43;
    let result = ExifSegment::new(&block).read_tag_value(0x0112);
    assert!(matches!(result, Err(ExifError::MalformedHeader { .. })));
}
