//! Human-readable names for enumerated EXIF values.

use crate::format::Value;

use super::tags::ExifTag;

/// Describe an enumerated value, e.g. `MeteringMode = 5` is `"Pattern"`.
///
/// Returns `None` for tags without an enumeration or for codes outside it.
pub fn describe(tag: ExifTag, value: &Value) -> Option<String> {
    if tag == ExifTag::ComponentsConfiguration {
        return describe_components(value);
    }

    let code = match value {
        Value::Sequence(items) if items.len() == 1 => items[0].as_u32()?,
        other => other.as_u32()?,
    };
    describe_code(tag, code).map(str::to_string)
}

/// Name for one enumerated code.
pub fn describe_code(tag: ExifTag, code: u32) -> Option<&'static str> {
    let name = match (tag, code) {
        (ExifTag::ExposureProgram, 0) => "Not defined",
        (ExifTag::ExposureProgram, 1) => "Manual",
        (ExifTag::ExposureProgram, 2) => "Normal program",
        (ExifTag::ExposureProgram, 3) => "Aperture priority",
        (ExifTag::ExposureProgram, 4) => "Shutter priority",
        (ExifTag::ExposureProgram, 5) => "Creative program",
        (ExifTag::ExposureProgram, 6) => "Action program",
        (ExifTag::ExposureProgram, 7) => "Portrait mode",
        (ExifTag::ExposureProgram, 8) => "Landscape mode",

        (ExifTag::MeteringMode, 0) => "Unknown",
        (ExifTag::MeteringMode, 1) => "Average",
        (ExifTag::MeteringMode, 2) => "CenterWeightedAverage",
        (ExifTag::MeteringMode, 3) => "Spot",
        (ExifTag::MeteringMode, 4) => "MultiSpot",
        (ExifTag::MeteringMode, 5) => "Pattern",
        (ExifTag::MeteringMode, 6) => "Partial",
        (ExifTag::MeteringMode, 255) => "Other",

        (ExifTag::LightSource, 0) => "Unknown",
        (ExifTag::LightSource, 1) => "Daylight",
        (ExifTag::LightSource, 2) => "Fluorescent",
        (ExifTag::LightSource, 3) => "Tungsten (incandescent light)",
        (ExifTag::LightSource, 4) => "Flash",
        (ExifTag::LightSource, 9) => "Fine weather",
        (ExifTag::LightSource, 10) => "Cloudy weather",
        (ExifTag::LightSource, 11) => "Shade",
        (ExifTag::LightSource, 12) => "Daylight fluorescent (D 5700 - 7100K)",
        (ExifTag::LightSource, 13) => "Day white fluorescent (N 4600 - 5400K)",
        (ExifTag::LightSource, 14) => "Cool white fluorescent (W 3900 - 4500K)",
        (ExifTag::LightSource, 15) => "White fluorescent (WW 3200 - 3700K)",
        (ExifTag::LightSource, 17) => "Standard light A",
        (ExifTag::LightSource, 18) => "Standard light B",
        (ExifTag::LightSource, 19) => "Standard light C",
        (ExifTag::LightSource, 20) => "D55",
        (ExifTag::LightSource, 21) => "D65",
        (ExifTag::LightSource, 22) => "D75",
        (ExifTag::LightSource, 23) => "D50",
        (ExifTag::LightSource, 24) => "ISO studio tungsten",
        (ExifTag::LightSource, 255) => "Other",

        (ExifTag::Flash, 0x00) => "Flash did not fire",
        (ExifTag::Flash, 0x01) => "Flash fired",
        (ExifTag::Flash, 0x05) => "Strobe return light not detected",
        (ExifTag::Flash, 0x07) => "Strobe return light detected",
        (ExifTag::Flash, 0x09) => "Flash fired, compulsory flash mode",
        (ExifTag::Flash, 0x0D) => "Flash fired, compulsory flash mode, return light not detected",
        (ExifTag::Flash, 0x0F) => "Flash fired, compulsory flash mode, return light detected",
        (ExifTag::Flash, 0x10) => "Flash did not fire, compulsory flash mode",
        (ExifTag::Flash, 0x18) => "Flash did not fire, auto mode",
        (ExifTag::Flash, 0x19) => "Flash fired, auto mode",
        (ExifTag::Flash, 0x1D) => "Flash fired, auto mode, return light not detected",
        (ExifTag::Flash, 0x1F) => "Flash fired, auto mode, return light detected",
        (ExifTag::Flash, 0x20) => "No flash function",
        (ExifTag::Flash, 0x41) => "Flash fired, red-eye reduction mode",
        (ExifTag::Flash, 0x45) => {
            "Flash fired, red-eye reduction mode, return light not detected"
        }
        (ExifTag::Flash, 0x47) => "Flash fired, red-eye reduction mode, return light detected",
        (ExifTag::Flash, 0x49) => "Flash fired, compulsory flash mode, red-eye reduction mode",
        (ExifTag::Flash, 0x4D) => {
            "Flash fired, compulsory flash mode, red-eye reduction mode, return light not detected"
        }
        (ExifTag::Flash, 0x4F) => {
            "Flash fired, compulsory flash mode, red-eye reduction mode, return light detected"
        }
        (ExifTag::Flash, 0x59) => "Flash fired, auto mode, red-eye reduction mode",
        (ExifTag::Flash, 0x5D) => {
            "Flash fired, auto mode, return light not detected, red-eye reduction mode"
        }
        (ExifTag::Flash, 0x5F) => {
            "Flash fired, auto mode, return light detected, red-eye reduction mode"
        }

        (ExifTag::SensingMethod, 1) => "Not defined",
        (ExifTag::SensingMethod, 2) => "One-chip color area sensor",
        (ExifTag::SensingMethod, 3) => "Two-chip color area sensor",
        (ExifTag::SensingMethod, 4) => "Three-chip color area sensor",
        (ExifTag::SensingMethod, 5) => "Color sequential area sensor",
        (ExifTag::SensingMethod, 7) => "Trilinear sensor",
        (ExifTag::SensingMethod, 8) => "Color sequential linear sensor",

        (ExifTag::SceneCaptureType, 0) => "Standard",
        (ExifTag::SceneCaptureType, 1) => "Landscape",
        (ExifTag::SceneCaptureType, 2) => "Portrait",
        (ExifTag::SceneCaptureType, 3) => "Night scene",

        (ExifTag::SceneType, 1) => "Directly photographed",

        (ExifTag::CustomRendered, 0) => "Normal process",
        (ExifTag::CustomRendered, 1) => "Custom process",

        (ExifTag::WhiteBalance, 0) => "Auto white balance",
        (ExifTag::WhiteBalance, 1) => "Manual white balance",

        (ExifTag::GainControl, 0) => "None",
        (ExifTag::GainControl, 1) => "Low gain up",
        (ExifTag::GainControl, 2) => "High gain up",
        (ExifTag::GainControl, 3) => "Low gain down",
        (ExifTag::GainControl, 4) => "High gain down",

        (ExifTag::Contrast, 0) | (ExifTag::Sharpness, 0) | (ExifTag::Saturation, 0) => "Normal",
        (ExifTag::Contrast, 1) | (ExifTag::Sharpness, 1) => "Soft",
        (ExifTag::Contrast, 2) | (ExifTag::Sharpness, 2) => "Hard",
        (ExifTag::Saturation, 1) => "Low saturation",
        (ExifTag::Saturation, 2) => "High saturation",

        (ExifTag::SubjectDistanceRange, 0) => "Unknown",
        (ExifTag::SubjectDistanceRange, 1) => "Macro",
        (ExifTag::SubjectDistanceRange, 2) => "Close view",
        (ExifTag::SubjectDistanceRange, 3) => "Distant view",

        (ExifTag::FileSource, 3) => "DSC",

        _ => return None,
    };
    Some(name)
}

/// ComponentsConfiguration is four bytes, one channel code each (0 = unused).
fn describe_components(value: &Value) -> Option<String> {
    let bytes = value.as_bytes()?;
    let mut out = String::new();
    for code in bytes {
        let channel = match code {
            0 => "",
            1 => "Y",
            2 => "Cb",
            3 => "Cr",
            4 => "R",
            5 => "G",
            6 => "B",
            _ => return None,
        };
        out.push_str(channel);
    }
    Some(out)
}
