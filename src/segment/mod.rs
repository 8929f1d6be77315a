//! Loaded segments of a module
//!
//! A [`Module`] owns nothing: the loader allocates the memory of every
//! segment and lends it to the relocation pass as a mutable slice. All writes
//! go through [`Segment`], which checks that the whole field lies inside the
//! slice before touching it.
use crate::{Result, error::out_of_range};
use alloc::{format, string::String, vec::Vec};
use byteorder::ByteOrder;
use core::fmt::Debug;

/// The loaded image of one section.
pub struct Segment<'mem> {
    section: usize,
    addr: u32,
    memory: &'mem mut [u8],
}

impl<'mem> Segment<'mem> {
    /// Creates a segment for section `section`, loaded at target address `addr`.
    ///
    /// The length of `memory` is the segment size.
    #[inline]
    pub fn new(section: usize, addr: u32, memory: &'mem mut [u8]) -> Self {
        Self {
            section,
            addr,
            memory,
        }
    }

    /// Returns the index of the section this segment was built from.
    #[inline]
    pub fn section(&self) -> usize {
        self.section
    }

    /// Returns the load address on the target.
    #[inline]
    pub fn addr(&self) -> u32 {
        self.addr
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.memory.len()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.memory
    }

    /// Returns `true` if `offset` addresses a byte inside the segment.
    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        (offset as usize) < self.memory.len()
    }

    fn range(&self, offset: u32, len: usize) -> Result<core::ops::Range<usize>> {
        let start = offset as usize;
        match start.checked_add(len) {
            Some(end) if end <= self.memory.len() => Ok(start..end),
            _ => Err(out_of_range(format!(
                "{len} byte field at offset {offset:#x} crosses the end of section {} ({:#x} bytes)",
                self.section,
                self.memory.len()
            ))),
        }
    }

    /// Reads a 32-bit word at `offset`.
    pub fn read_u32<E: ByteOrder>(&self, offset: u32) -> Result<u32> {
        let range = self.range(offset, 4)?;
        Ok(E::read_u32(&self.memory[range]))
    }

    /// Reads a 16-bit halfword at `offset`.
    pub fn read_u16<E: ByteOrder>(&self, offset: u32) -> Result<u16> {
        let range = self.range(offset, 2)?;
        Ok(E::read_u16(&self.memory[range]))
    }

    /// Writes a 16-bit halfword at `offset`.
    pub fn write_u16<E: ByteOrder>(&mut self, offset: u32, val: u16) -> Result<()> {
        let range = self.range(offset, 2)?;
        #[cfg(feature = "log")]
        log::trace!(
            "[section {}] write {:#06x} at {:#x}",
            self.section,
            val,
            self.addr.wrapping_add(offset)
        );
        E::write_u16(&mut self.memory[range], val);
        Ok(())
    }

    /// Writes a 32-bit word at `offset`.
    pub fn write_u32<E: ByteOrder>(&mut self, offset: u32, val: u32) -> Result<()> {
        let range = self.range(offset, 4)?;
        #[cfg(feature = "log")]
        log::trace!(
            "[section {}] write {:#010x} at {:#x}",
            self.section,
            val,
            self.addr.wrapping_add(offset)
        );
        E::write_u32(&mut self.memory[range], val);
        Ok(())
    }
}

impl Debug for Segment<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Segment")
            .field("section", &self.section)
            .field("addr", &format_args!("{:#x}", self.addr))
            .field("size", &self.memory.len())
            .finish()
    }
}

/// A module being loaded: a name and the segments the loader built for it.
pub struct Module<'mem> {
    pub(crate) name: String,
    pub(crate) segments: Vec<Segment<'mem>>,
}

impl<'mem> Module<'mem> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            segments: Vec::new(),
        }
    }

    /// Appends a segment. Lookup by section index keeps insertion order.
    pub fn push(&mut self, segment: Segment<'mem>) {
        self.segments.push(segment);
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn segments(&self) -> &[Segment<'mem>] {
        &self.segments
    }

    /// Returns the first segment built from section `section`.
    pub fn segment(&self, section: usize) -> Option<&Segment<'mem>> {
        self.segments.iter().find(|seg| seg.section == section)
    }

    /// Returns the first segment built from section `section`, mutably.
    pub fn segment_mut(&mut self, section: usize) -> Option<&mut Segment<'mem>> {
        self.segments.iter_mut().find(|seg| seg.section == section)
    }
}

impl Debug for Module<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("segments", &self.segments)
            .finish()
    }
}
