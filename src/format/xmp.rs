//! XMP property lookup for JPEG APP1 segments.
//!
//! An XMP segment is an APP1 block whose payload starts with
//! `http://ns.adobe.com/xap/1.0/\0`, followed by an RDF/XML packet.
//! Properties are addressed through the closed [`XmpTag`] table and located
//! by scanning the packet text: a property may appear as an attribute of
//! `rdf:Description` or as an element, and list-valued properties hold their
//! items in an `rdf:Bag`, `rdf:Seq` or `rdf:Alt` container.

use crate::error::XmpError;
use crate::format::jpeg::{SEGMENT_HEADER_SIZE, XMP_SIGNATURE};
use crate::format::Value;

// =============================================================================
// Tags
// =============================================================================

/// Shape of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmpKind {
    /// Simple text
    Text,
    /// Language alternative: the first item is used
    Alt,
    /// Unordered or ordered list
    List,
    /// Integer text
    Integer,
}

macro_rules! xmp_tags {
    ($($variant:ident = $id:literal, $name:literal, $kind:ident;)*) => {
        /// XMP properties with stable numeric ids.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum XmpTag {
            $($variant = $id,)*
        }

        impl XmpTag {
            pub const ALL: &'static [XmpTag] = &[$(XmpTag::$variant,)*];

            pub fn from_u16(value: u16) -> Option<Self> {
                match value {
                    $($id => Some(XmpTag::$variant),)*
                    _ => None,
                }
            }

            /// Qualified property name, e.g. `dc:title`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(XmpTag::$variant => $name,)*
                }
            }

            pub const fn kind(self) -> XmpKind {
                match self {
                    $(XmpTag::$variant => XmpKind::$kind,)*
                }
            }
        }
    };
}

xmp_tags! {
    Title = 0x0001, "dc:title", Alt;
    Description = 0x0002, "dc:description", Alt;
    Subject = 0x0003, "dc:subject", List;
    Creator = 0x0004, "dc:creator", List;
    Rights = 0x0005, "dc:rights", Alt;
    CreateDate = 0x0006, "xmp:CreateDate", Text;
    ModifyDate = 0x0007, "xmp:ModifyDate", Text;
    Rating = 0x0008, "xmp:Rating", Integer;
    CreatorTool = 0x0009, "xmp:CreatorTool", Text;
    Headline = 0x000A, "photoshop:Headline", Text;
    City = 0x000B, "photoshop:City", Text;
    Country = 0x000C, "photoshop:Country", Text;
    DateCreated = 0x000D, "photoshop:DateCreated", Text;
    Label = 0x000E, "xmp:Label", Text;
}

impl XmpTag {
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

// =============================================================================
// XmpSegment
// =============================================================================

/// A borrowed XMP APP1 block, starting with the `FF E1` marker.
#[derive(Debug, Clone, Copy)]
pub struct XmpSegment<'a> {
    block: &'a [u8],
}

impl<'a> XmpSegment<'a> {
    pub fn new(block: &'a [u8]) -> Self {
        Self { block }
    }

    /// The RDF/XML packet text.
    pub fn packet(&self) -> Result<&'a str, XmpError> {
        let payload = self
            .block
            .get(SEGMENT_HEADER_SIZE..)
            .ok_or_else(|| malformed("segment too short"))?;
        let packet = payload
            .strip_prefix(XMP_SIGNATURE)
            .ok_or_else(|| malformed("missing XMP identifier"))?;
        std::str::from_utf8(packet).map_err(|e| malformed(format!("packet is not UTF-8: {}", e)))
    }

    /// Read one property by tag id.
    ///
    /// # Errors
    /// - `UnknownTag` if the id is not in the [`XmpTag`] table
    /// - `Malformed` if the segment is not an XMP packet
    /// - `NotFound` if the packet lacks the property
    pub fn read_tag_value(&self, tag: u16) -> Result<Value, XmpError> {
        let tag = XmpTag::from_u16(tag).ok_or(XmpError::UnknownTag(tag))?;
        self.read(tag)
    }

    /// Read one property.
    pub fn read(&self, tag: XmpTag) -> Result<Value, XmpError> {
        let packet = self.packet()?;
        let name = tag.name();

        if let Some(raw) = find_attribute(packet, name) {
            return Ok(simple_value(tag, unescape(raw)));
        }

        let inner = find_element(packet, name).ok_or(XmpError::NotFound(name))?;
        let items = list_items(inner);

        match (tag.kind(), items) {
            (XmpKind::List, Some(items)) => Ok(Value::Sequence(
                items.into_iter().map(|s| Value::Text(unescape(s))).collect(),
            )),
            (_, Some(items)) => items
                .first()
                .map(|first| simple_value(tag, unescape(first)))
                .ok_or(XmpError::NotFound(name)),
            (_, None) => Ok(simple_value(tag, unescape(inner.trim()))),
        }
    }
}

fn malformed(reason: impl Into<String>) -> XmpError {
    XmpError::Malformed {
        reason: reason.into(),
    }
}

fn simple_value(tag: XmpTag, text: String) -> Value {
    if tag.kind() == XmpKind::Integer {
        if let Ok(n) = text.trim().parse::<i32>() {
            return Value::SLong(n);
        }
    }
    Value::Text(text)
}

// =============================================================================
// Packet scanning
// =============================================================================

/// Value of a `name="..."` attribute.
fn find_attribute<'p>(packet: &'p str, name: &str) -> Option<&'p str> {
    let mut search = 0;
    while let Some(found) = packet[search..].find(name) {
        let start = search + found;
        let after = start + name.len();
        search = after;

        let preceded_by_space = packet[..start]
            .chars()
            .next_back()
            .map(char::is_whitespace)
            .unwrap_or(false);
        if !preceded_by_space {
            continue;
        }

        let rest = packet[after..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let quote = match rest.chars().next() {
            Some(q @ ('"' | '\'')) => q,
            _ => continue,
        };
        let body = &rest[1..];
        if let Some(end) = body.find(quote) {
            return Some(&body[..end]);
        }
    }
    None
}

/// Content between `<name ...>` and `</name>`.
fn find_element<'p>(packet: &'p str, name: &str) -> Option<&'p str> {
    element_span(packet, name).map(|(content, _)| content)
}

/// Content of the first `name` element and the position just past it.
fn element_span<'p>(packet: &'p str, name: &str) -> Option<(&'p str, usize)> {
    let open = format!("<{}", name);
    let close = format!("</{}>", name);

    let mut search = 0;
    while let Some(found) = packet[search..].find(&open) {
        let start = search + found + open.len();
        search = start;

        match packet[start..].chars().next() {
            Some('>' | '/') => {}
            Some(c) if c.is_whitespace() => {}
            _ => continue,
        }

        let tag_end = start + packet[start..].find('>')?;
        if packet[..tag_end].ends_with('/') {
            // <name/> is an empty element
            return Some(("", tag_end + 1));
        }
        let content_start = tag_end + 1;
        let content_end = content_start + packet[content_start..].find(&close)?;
        return Some((
            &packet[content_start..content_end],
            content_end + close.len(),
        ));
    }
    None
}

/// Items of an `rdf:Bag`, `rdf:Seq` or `rdf:Alt` container, if `content`
/// holds one.
fn list_items(content: &str) -> Option<Vec<&str>> {
    let is_container = ["<rdf:Bag", "<rdf:Seq", "<rdf:Alt"]
        .iter()
        .any(|c| content.contains(c));
    if !is_container {
        return None;
    }

    let mut items = Vec::new();
    let mut rest = content;
    while let Some((inner, end)) = element_span(rest, "rdf:li") {
        items.push(inner.trim());
        rest = &rest[end..];
    }
    Some(items)
}

/// Replace the predefined XML entities and numeric character references.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp..];
        let Some(semi) = after.find(';') else {
            out.push_str(after);
            return out;
        };

        let entity = &after[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .map(|hex| u32::from_str_radix(hex, 16))
                .or_else(|| entity.strip_prefix('#').map(|dec| dec.parse::<u32>()))
                .and_then(Result::ok)
                .and_then(char::from_u32),
        };

        match decoded {
            Some(c) => out.push(c),
            None => out.push_str(&after[..=semi]),
        }
        rest = &after[semi + 1..];
    }

    out.push_str(rest);
    out
}

// =============================================================================
// Tests
// =============================================================================
