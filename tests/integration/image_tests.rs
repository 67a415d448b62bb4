//! Image facade and BasicInfo integration tests.
//!
//! Tests verify:
//! - Segments are found in encoder-produced JPEG files
//! - Namespace dispatch for EXIF, IPTC, XMP and SOF0
//! - BasicInfo source priority and GPS conversion
//! - Malformed namespaces are skipped without failing the image

use bytes::Bytes;

use imgindex::format::sof::{SOF_IMAGE_HEIGHT, SOF_IMAGE_WIDTH};
use imgindex::meta::MetaReader;
use imgindex::{BasicInfo, Image, IptcTag, JpegError, MetaError, Namespace, Value, XmpTag};

use super::test_utils::{
    create_iptc_segment, create_jpeg_with_segments, create_test_jpeg, create_xmp_segment,
    is_valid_jpeg, sample_xmp_packet, xp_bytes, ByteOrderType, ExifBuilder, IfdBuilder,
};

fn exif_segment() -> Vec<u8> {
    ExifBuilder::new(ByteOrderType::BigEndian)
        .ifd0(
            IfdBuilder::new()
                .ascii(0x010E, "Fishing boats")
                .ascii(0x010F, "FUJIFILM")
                .ascii(0x0110, "X-T4")
                .short(0x0112, &[8])
                .ascii(0x0132, "2023:07:14 07:00:00")
                .bytes(0x9C9B, 1, &xp_bytes("XP title"))
                .bytes(0x9C9E, 1, &xp_bytes("xp; tags")),
        )
        .exif(
            IfdBuilder::new()
                .rational(0x829A, &[(1, 500)])
                .rational(0x829D, &[(56, 10)])
                .short(0x8827, &[200])
                .ascii(0x9003, "2023:07:14 06:12:00")
                .short(0x9209, &[0x19])
                .rational(0x920A, &[(230, 10)])
                .long(0xA002, &[6240])
                .long(0xA003, &[4160]),
        )
        .gps(
            IfdBuilder::new()
                .ascii(0x0001, "S")
                .rational(0x0002, &[(33, 1), (51, 1), (36, 1)])
                .ascii(0x0003, "E")
                .rational(0x0004, &[(151, 1), (12, 1), (36, 1)])
                .bytes(0x0005, 1, &[1])
                .rational(0x0006, &[(5, 1)]),
        )
        .build()
}

fn full_jpeg() -> Vec<u8> {
    create_jpeg_with_segments(
        64,
        48,
        &[
            exif_segment(),
            create_xmp_segment(&sample_xmp_packet()),
            create_iptc_segment(&[
                (2, 0, "\u{0}\u{4}"),
                (2, 5, "Morning catch"),
                (2, 25, "fishing"),
                (2, 25, "harbour"),
                (2, 120, "Boats returning at sunrise"),
            ]),
        ],
    )
}

// =============================================================================
// Container Tests
// =============================================================================

#[test]
fn test_encoder_jpeg_frame_header() {
    let data = create_test_jpeg(64, 48);
    assert!(is_valid_jpeg(&data));

    let image = Image::from_bytes(Bytes::from(data)).unwrap();
    assert!(image.has(Namespace::Sof0));
    assert!(!image.has(Namespace::Exif));
    assert_eq!(
        image.read_tag_value(Namespace::Sof0, SOF_IMAGE_WIDTH).unwrap(),
        Value::Short(64)
    );
    assert_eq!(
        image.read_tag_value(Namespace::Sof0, SOF_IMAGE_HEIGHT).unwrap(),
        Value::Short(48)
    );
}

#[test]
fn test_all_namespaces_present() {
    let image = Image::from_bytes(Bytes::from(full_jpeg())).unwrap();
    for ns in Namespace::ALL {
        assert!(image.has(ns), "missing {}", ns);
    }
}

#[test]
fn test_not_jpeg() {
    let err = Image::from_bytes(Bytes::from_static(b"\x89PNG\r\n\x1a\n")).unwrap_err();
    assert_eq!(err, JpegError::NotJpeg);
}

// =============================================================================
// Namespace Dispatch Tests
// =============================================================================

#[test]
fn test_iptc_dispatch() {
    let image = Image::from_bytes(Bytes::from(full_jpeg())).unwrap();

    assert_eq!(
        image
            .read_tag_value(Namespace::Iptc, IptcTag::RecordVersion.as_u16())
            .unwrap(),
        Value::Short(4)
    );
    assert_eq!(
        image
            .read_tag_value(Namespace::Iptc, IptcTag::Keywords.as_u16())
            .unwrap(),
        Value::Sequence(vec![
            Value::Text("fishing".into()),
            Value::Text("harbour".into()),
        ])
    );
    assert!(image
        .read_tag_value(Namespace::Iptc, IptcTag::City.as_u16())
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_xmp_dispatch() {
    let image = Image::from_bytes(Bytes::from(full_jpeg())).unwrap();

    assert_eq!(
        image
            .read_tag_value(Namespace::Xmp, XmpTag::Title.as_u16())
            .unwrap(),
        Value::Text("Harbour at dawn".into())
    );
    assert_eq!(
        image
            .read_tag_value(Namespace::Xmp, XmpTag::Rating.as_u16())
            .unwrap(),
        Value::SLong(4)
    );
    assert_eq!(
        image
            .read_tag_value(Namespace::Xmp, XmpTag::Subject.as_u16())
            .unwrap(),
        Value::Sequence(vec![
            Value::Text("harbour".into()),
            Value::Text("boats & nets".into()),
        ])
    );
}

#[test]
fn test_exif_dispatch() {
    let image = Image::from_bytes(Bytes::from(full_jpeg())).unwrap();
    assert_eq!(
        image.read_tag_value(Namespace::Exif, 0x0112).unwrap(),
        Value::Short(8)
    );
    assert_eq!(
        image.exif().unwrap().read_tag_value(0xA002).unwrap(),
        Value::Long(6240)
    );
}

// =============================================================================
// BasicInfo Tests
// =============================================================================

#[test]
fn test_basic_info_prefers_iptc_then_xmp() {
    let image = Image::from_bytes(Bytes::from(full_jpeg())).unwrap();
    let info = BasicInfo::from_image(&image);

    // Frame header beats EXIF PixelXDimension
    assert_eq!(info.width, Some(64));
    assert_eq!(info.height, Some(48));

    // IPTC caption is the title; ObjectName only fills in without one
    assert_eq!(info.title.as_deref(), Some("Boats returning at sunrise"));
    assert_eq!(info.description.as_deref(), Some("Boats returning at sunrise"));
    assert_eq!(info.keywords, vec!["fishing", "harbour"]);

    assert_eq!(info.date_time.as_deref(), Some("2023:07:14 06:12:00"));
    assert_eq!(info.orientation, Some(8));
    assert_eq!(info.make.as_deref(), Some("FUJIFILM"));
    assert_eq!(info.model.as_deref(), Some("X-T4"));
    assert_eq!(info.exposure_time, Some(0.002));
    assert_eq!(info.f_number, Some(5.6));
    assert_eq!(info.iso, Some(200));
    assert_eq!(info.focal_length, Some(23.0));
    assert!(info.flash.as_deref().unwrap().starts_with("Flash fired"));
}

#[test]
fn test_basic_info_falls_back_to_exif() {
    let data = create_jpeg_with_segments(16, 16, &[exif_segment()]);
    let image = Image::from_bytes(Bytes::from(data)).unwrap();
    let info = BasicInfo::from_image(&image);

    assert_eq!(info.title.as_deref(), Some("XP title"));
    assert_eq!(info.description.as_deref(), Some("Fishing boats"));
    assert_eq!(info.keywords, vec!["xp", "tags"]);
}

#[test]
fn test_basic_info_xmp_only() {
    let data = create_jpeg_with_segments(16, 16, &[create_xmp_segment(&sample_xmp_packet())]);
    let image = Image::from_bytes(Bytes::from(data)).unwrap();
    let info = BasicInfo::from_image(&image);

    assert_eq!(info.title.as_deref(), Some("Harbour at dawn"));
    assert_eq!(info.keywords, vec!["harbour", "boats & nets"]);
    assert_eq!(info.make, None);
}

#[test]
fn test_basic_info_gps() {
    let image = Image::from_bytes(Bytes::from(full_jpeg())).unwrap();
    let gps = BasicInfo::from_image(&image).gps.unwrap();

    assert!((gps.latitude - -33.86).abs() < 1e-9);
    assert!((gps.longitude - 151.21).abs() < 1e-9);
    assert_eq!(gps.altitude, Some(-5.0));
}

#[test]
fn test_malformed_namespace_is_skipped() {
    let mut exif = exif_segment();
    // Corrupt the byte order marker
    exif[10] = b'X';
    let data = create_jpeg_with_segments(
        20,
        10,
        &[exif, create_iptc_segment(&[(2, 5, "Still titled")])],
    );
    let image = Image::from_bytes(Bytes::from(data)).unwrap();

    let mut reader = MetaReader::new(&image, "corrupt.jpg");
    let info = BasicInfo::collect(&mut reader);

    assert_eq!(info.width, Some(20));
    assert_eq!(info.title.as_deref(), Some("Still titled"));
    assert_eq!(info.make, None);
    assert_eq!(reader.malformed(), vec![Namespace::Exif]);

    assert!(matches!(
        image.read_tag_value(Namespace::Exif, 0x010F),
        Err(MetaError::Exif(_))
    ));
}

#[test]
fn test_broken_thumbnail_link_keeps_exif_fields() {
    let mut exif = ExifBuilder::new(ByteOrderType::LittleEndian)
        .ifd0(
            IfdBuilder::new()
                .short(0x0112, &[6])
                .ascii(0x010F, "Nikon"),
        )
        .build();
    // IFD0 next link points far outside the segment
    let next_link = 18 + 2 + 2 * 12;
    exif[next_link..next_link + 4].copy_from_slice(&[0x00, 0xFF, 0xFF, 0x00]);

    let data = create_jpeg_with_segments(16, 16, &[exif]);
    let image = Image::from_bytes(Bytes::from(data)).unwrap();

    let mut reader = MetaReader::new(&image, "thumbless.jpg");
    let info = BasicInfo::collect(&mut reader);

    assert_eq!(info.orientation, Some(6));
    assert_eq!(info.make.as_deref(), Some("Nikon"));
    assert_eq!(info.title, None);
    assert!(reader.malformed().is_empty());
}
