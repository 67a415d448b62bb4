//! IFD graph traversal.
//!
//! An APP1 block holds a small graph of directories: IFD0 points to the
//! EXIF and GPS sub-IFDs, the EXIF sub-IFD points to the Interoperability
//! sub-IFD, and IFD0's next link leads to IFD1 (the thumbnail).
//!
//! The walk is depth-first with an explicit stack. Sub-IFD pointers are
//! pushed in the order they are met and popped last-in first-out; IFD1 is
//! visited only after every other reachable directory. Each directory is
//! visited at most once: a pointer back to an already scheduled directory
//! fails with [`ExifError::CyclicReference`]. A broken IFD1 link only ends
//! the walk, so lookups of absent tags still report `NotFound`.

use std::collections::HashSet;
use std::ops::ControlFlow;

use crate::error::ExifError;
use crate::format::Value;
use crate::io::ByteCursor;

use super::parser::{tiff_position, Ifd, IfdEntry, IfdKind, TiffHeader};
use super::values::ValueDecoder;

/// Walks the IFD graph of one APP1 block.
#[derive(Debug, Clone, Copy)]
pub struct IfdGraphWalker<'a> {
    cursor: ByteCursor<'a>,
    header: TiffHeader,
}

impl<'a> IfdGraphWalker<'a> {
    pub fn new(cursor: ByteCursor<'a>, header: TiffHeader) -> Self {
        Self { cursor, header }
    }

    /// Visit every entry of every reachable IFD.
    ///
    /// `visit` may stop the walk early by returning `ControlFlow::Break`;
    /// the break value is returned. Structural errors (unreadable IFDs,
    /// cycles) abort the walk.
    pub fn walk<T, F>(&self, mut visit: F) -> Result<Option<T>, ExifError>
    where
        F: FnMut(&Ifd<'a>, &IfdEntry) -> ControlFlow<T>,
    {
        let order = self.cursor.order();
        let ifd0_position = self.header.ifd0_position()?;

        let mut stack = vec![(ifd0_position, IfdKind::Primary)];
        let mut seen = HashSet::from([ifd0_position]);
        let mut primary: Option<Ifd<'a>> = None;

        loop {
            let ifd = match stack.pop() {
                Some((position, kind)) => Ifd::parse(self.cursor, position, kind)?,
                None => match primary.take().and_then(|ifd0| self.thumbnail(&ifd0, &mut seen)) {
                    Some(ifd1) => ifd1,
                    None => break,
                },
            };
            let kind = ifd.kind();

            for entry in ifd.entries() {
                let entry = entry?;

                if let ControlFlow::Break(found) = visit(&ifd, &entry) {
                    return Ok(Some(found));
                }

                if let Some(child) = kind.child(entry.tag_id) {
                    let child_position = tiff_position(entry.value_as_offset(order))?;
                    if !seen.insert(child_position) {
                        return Err(ExifError::CyclicReference(child_position));
                    }
                    stack.push((child_position, child));
                }
            }

            if kind == IfdKind::Primary {
                primary = Some(ifd);
            }
        }

        Ok(None)
    }

    /// IFD1, read from IFD0's next link once the rest of the graph is
    /// exhausted.
    ///
    /// The next link is not part of the pointer graph. A link that cannot
    /// be read, points outside the block or back to a visited directory ends
    /// the walk instead of failing it.
    fn thumbnail(&self, ifd0: &Ifd<'a>, seen: &mut HashSet<usize>) -> Option<Ifd<'a>> {
        let next = ifd0.next_ifd_offset().ok().filter(|&next| next != 0)?;
        let position = tiff_position(next).ok()?;
        if !seen.insert(position) {
            return None;
        }
        Ifd::parse(self.cursor, position, IfdKind::Thumbnail).ok()
    }

    /// First entry with `tag_id` in traversal order, with its owning IFD.
    pub fn find_entry(&self, tag_id: u16) -> Result<Option<(Ifd<'a>, IfdEntry)>, ExifError> {
        self.walk(|ifd, entry| {
            if entry.tag_id == tag_id {
                ControlFlow::Break((*ifd, *entry))
            } else {
                ControlFlow::Continue(())
            }
        })
    }

    /// Decode the value of the first entry with `tag_id`.
    ///
    /// # Errors
    /// `NotFound` if no reachable IFD holds the tag, or the first error met
    /// while walking or decoding.
    pub fn find_tag_value(&self, tag_id: u16) -> Result<Value, ExifError> {
        let (ifd, entry) = self
            .find_entry(tag_id)?
            .ok_or(ExifError::NotFound(tag_id))?;

        ValueDecoder::new(self.cursor, ifd.position()).decode(&entry)
    }
}
