// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte sinks and sources.
//!
//! The codec writes to a [`ByteSink`] and reads from a [`ByteSource`]: plain
//! `Write`/`Read` streams that also report their absolute position and can
//! reposition. Padding is computed from positions, so a forward-only adapter
//! that merely counts bytes is enough for dense, aligned and named maps.
//!
//! | Type | Seek | Use |
//! |------|------|-----|
//! | `io::Cursor<Vec<u8>>` / `io::Cursor<&[u8]>` | yes | in-memory buffers |
//! | [`SeekSink`] / [`SeekSource`] | yes | files and other `Seek` streams |
//! | [`StreamSink`] / [`StreamSource`] | forward only | pipes, sockets, compressors |
//! | [`ScratchSink`] | yes, above its base | staging a container before emitting it |

use std::io::{self, Read, Seek, SeekFrom, Write};

const ZEROS: [u8; 16] = [0u8; 16];

/// Writable byte stream with position tracking.
pub trait ByteSink: Write {
    /// Absolute position of the next byte written.
    fn position(&self) -> u64;

    /// Reposition for overwriting. Forward-only sinks fail with
    /// `io::ErrorKind::Unsupported`.
    fn seek_to(&mut self, pos: u64) -> io::Result<()>;

    /// True when `seek_to` can move backwards.
    fn is_seekable(&self) -> bool {
        true
    }
}

/// Readable byte stream with position tracking.
pub trait ByteSource: Read {
    /// Absolute position of the next byte read.
    fn position(&self) -> u64;

    /// Reposition. Forward-only sources skip ahead by discarding and fail with
    /// `io::ErrorKind::Unsupported` when asked to go back.
    fn seek_to(&mut self, pos: u64) -> io::Result<()>;

    fn is_seekable(&self) -> bool {
        true
    }
}

/// Round `pos` up to the next multiple of `align` (a power of two).
pub fn align_up(pos: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    let mask = align - 1;
    (pos + mask) & !mask
}

/// Zero-pad the sink to the next multiple of `align`, measured from `origin`.
pub fn pad_from(sink: &mut dyn ByteSink, origin: u64, align: u64) -> io::Result<()> {
    let relative = sink.position() - origin;
    let padding = (align_up(relative, align) - relative) as usize;
    write_zeros(sink, padding)
}

/// Zero-pad the sink to the next absolute multiple of `align`.
pub fn pad_to(sink: &mut dyn ByteSink, align: u64) -> io::Result<()> {
    pad_from(sink, 0, align)
}

/// Skip the source to the next absolute multiple of `align` without looking at
/// the padding bytes.
pub fn skip_to(source: &mut dyn ByteSource, align: u64) -> io::Result<()> {
    let pos = source.position();
    let target = align_up(pos, align);
    if target != pos {
        source.seek_to(target)?;
    }
    Ok(())
}

pub(crate) fn write_zeros(sink: &mut dyn ByteSink, mut count: usize) -> io::Result<()> {
    while count > 0 {
        let chunk = count.min(ZEROS.len());
        sink.write_all(&ZEROS[..chunk])?;
        count -= chunk;
    }
    Ok(())
}

fn forward_only(what: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        format!("{} cannot seek backwards", what),
    )
}

impl ByteSink for io::Cursor<Vec<u8>> {
    fn position(&self) -> u64 {
        io::Cursor::position(self)
    }

    fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.set_position(pos);
        Ok(())
    }
}

impl ByteSink for io::Cursor<&mut Vec<u8>> {
    fn position(&self) -> u64 {
        io::Cursor::position(self)
    }

    fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.set_position(pos);
        Ok(())
    }
}

/// Fixed-capacity buffer; writing past the end fails with `StreamNotWritable`.
impl ByteSink for io::Cursor<&mut [u8]> {
    fn position(&self) -> u64 {
        io::Cursor::position(self)
    }

    fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.set_position(pos);
        Ok(())
    }
}

/// Seeking past the end of the buffer fails with `UnexpectedEof`, as it would
/// on a stream.
impl<T: AsRef<[u8]>> ByteSource for io::Cursor<T> {
    fn position(&self) -> u64 {
        io::Cursor::position(self)
    }

    fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        if pos > self.get_ref().as_ref().len() as u64 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "seek past end of buffer",
            ));
        }
        self.set_position(pos);
        Ok(())
    }
}

/// Sink over any `Write + Seek` stream (files, `BufWriter<File>`).
#[derive(Debug)]
pub struct SeekSink<W: Write + Seek> {
    inner: W,
    pos: u64,
}

impl<W: Write + Seek> SeekSink<W> {
    /// Positions are reported relative to the stream start.
    pub fn new(mut inner: W) -> io::Result<Self> {
        let pos = inner.stream_position()?;
        Ok(Self { inner, pos })
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write + Seek> Write for SeekSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.pos += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write + Seek> ByteSink for SeekSink<W> {
    fn position(&self) -> u64 {
        self.pos
    }

    fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.pos = self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }
}

/// Source over any `Read + Seek` stream (files, `BufReader<File>`).
#[derive(Debug)]
pub struct SeekSource<R: Read + Seek> {
    inner: R,
    pos: u64,
}

impl<R: Read + Seek> SeekSource<R> {
    pub fn new(mut inner: R) -> io::Result<Self> {
        let pos = inner.stream_position()?;
        Ok(Self { inner, pos })
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> Read for SeekSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.pos += read as u64;
        Ok(read)
    }
}

impl<R: Read + Seek> ByteSource for SeekSource<R> {
    fn position(&self) -> u64 {
        self.pos
    }

    fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.pos = self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }
}

/// Forward-only sink: counts bytes, never repositions.
#[derive(Debug)]
pub struct StreamSink<W: Write> {
    inner: W,
    pos: u64,
}

impl<W: Write> StreamSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, pos: 0 }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for StreamSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.pos += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> ByteSink for StreamSink<W> {
    fn position(&self) -> u64 {
        self.pos
    }

    fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        if pos == self.pos {
            Ok(())
        } else {
            Err(forward_only("stream sink"))
        }
    }

    fn is_seekable(&self) -> bool {
        false
    }
}

/// Forward-only source: skips ahead by discarding bytes.
#[derive(Debug)]
pub struct StreamSource<R: Read> {
    inner: R,
    pos: u64,
}

impl<R: Read> StreamSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for StreamSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.pos += read as u64;
        Ok(read)
    }
}

impl<R: Read> ByteSource for StreamSource<R> {
    fn position(&self) -> u64 {
        self.pos
    }

    fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        if pos < self.pos {
            return Err(forward_only("stream source"));
        }
        let gap = pos - self.pos;
        let skipped = io::copy(&mut (&mut self.inner).take(gap), &mut io::sink())?;
        self.pos += skipped;
        if skipped < gap {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream ended while skipping",
            ));
        }
        Ok(())
    }

    fn is_seekable(&self) -> bool {
        false
    }
}

/// In-memory sink whose positions start at `base`.
///
/// Used to stage a container that will later be copied into a forward-only
/// sink at absolute position `base`: padding computed here matches what the
/// final stream would have produced.
#[derive(Debug, Default)]
pub struct ScratchSink {
    base: u64,
    buffer: io::Cursor<Vec<u8>>,
}

impl ScratchSink {
    pub fn new() -> Self {
        Self::at(0)
    }

    pub fn at(base: u64) -> Self {
        Self {
            base,
            buffer: io::Cursor::new(Vec::new()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.get_ref()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.into_inner()
    }
}

impl Write for ScratchSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ByteSink for ScratchSink {
    fn position(&self) -> u64 {
        self.base + self.buffer.position()
    }

    fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        if pos < self.base {
            return Err(forward_only("scratch sink"));
        }
        self.buffer.set_position(pos - self.base);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 8), 0);
        assert_eq!(align_up(1, 8), 8);
        assert_eq!(align_up(8, 8), 8);
        assert_eq!(align_up(17, 16), 32);
        assert_eq!(align_up(5, 4), 8);
    }

    #[test]
    fn test_pad_writes_zeros() {
        let mut sink = io::Cursor::new(Vec::new());
        sink.write_all(&[0xFF; 3]).expect("Write should succeed");
        pad_to(&mut sink, 8).expect("Pad should succeed");
        assert_eq!(sink.get_ref().as_slice(), &[0xFF, 0xFF, 0xFF, 0, 0, 0, 0, 0]);

        pad_to(&mut sink, 8).expect("Pad should succeed");
        assert_eq!(sink.get_ref().len(), 8);
    }

    #[test]
    fn test_pad_from_origin() {
        let mut sink = io::Cursor::new(vec![0xEE; 5]);
        ByteSink::seek_to(&mut sink, 5).expect("Seek should succeed");
        sink.write_all(&[1]).expect("Write should succeed");
        pad_from(&mut sink, 5, 16).expect("Pad should succeed");
        assert_eq!(ByteSink::position(&sink), 21);
    }

    #[test]
    fn test_skip_to_ignores_padding_content() {
        let bytes = [7u8, 0xAA, 0xBB, 0xCC, 9];
        let mut source = io::Cursor::new(&bytes[..]);
        let mut one = [0u8; 1];
        source.read_exact(&mut one).expect("Read should succeed");
        skip_to(&mut source, 4).expect("Skip should succeed");
        source.read_exact(&mut one).expect("Read should succeed");
        assert_eq!(one[0], 9);

        let mut short = io::Cursor::new(&bytes[..2]);
        short.read_exact(&mut one).expect("Read should succeed");
        let err = skip_to(&mut short, 4).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_stream_sink_counts_and_refuses_seek() {
        let mut sink = StreamSink::new(Vec::new());
        sink.write_all(&[1, 2, 3]).expect("Write should succeed");
        assert_eq!(sink.position(), 3);
        assert!(!sink.is_seekable());
        assert!(sink.seek_to(3).is_ok());
        let err = sink.seek_to(0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
        assert_eq!(sink.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn test_stream_source_skips_forward_only() {
        let data: &[u8] = &[1, 2, 3, 4, 5, 6];
        let mut source = StreamSource::new(data);
        source.seek_to(4).expect("Forward skip should succeed");
        let mut buf = [0u8; 1];
        source.read_exact(&mut buf).expect("Read should succeed");
        assert_eq!(buf[0], 5);
        assert_eq!(source.position(), 5);
        assert_eq!(
            source.seek_to(1).unwrap_err().kind(),
            io::ErrorKind::Unsupported
        );
        assert_eq!(
            source.seek_to(64).unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn test_scratch_sink_positions_offset_by_base() {
        let mut scratch = ScratchSink::at(100);
        scratch.write_all(&[1, 2, 3, 4]).expect("Write should succeed");
        assert_eq!(scratch.position(), 104);
        scratch.seek_to(101).expect("Seek should succeed");
        scratch.write_all(&[9]).expect("Write should succeed");
        assert!(scratch.seek_to(99).is_err());
        assert_eq!(scratch.as_bytes(), &[1, 9, 3, 4]);
    }

    #[test]
    fn test_fixed_buffer_reports_write_zero() {
        let mut storage = [0u8; 2];
        let mut sink = io::Cursor::new(&mut storage[..]);
        let err = sink.write_all(&[1, 2, 3]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn test_seek_wrappers_track_position() {
        let mut sink = SeekSink::new(io::Cursor::new(Vec::new())).expect("Sink should open");
        sink.write_all(&[1, 2, 3, 4]).expect("Write should succeed");
        sink.seek_to(1).expect("Seek should succeed");
        sink.write_all(&[8]).expect("Write should succeed");
        assert_eq!(sink.position(), 2);
        let bytes = sink.into_inner().into_inner();
        assert_eq!(bytes, vec![1, 8, 3, 4]);

        let mut source = SeekSource::new(io::Cursor::new(bytes)).expect("Source should open");
        source.seek_to(2).expect("Seek should succeed");
        let mut buf = [0u8; 2];
        source.read_exact(&mut buf).expect("Read should succeed");
        assert_eq!(buf, [3, 4]);
        assert_eq!(source.position(), 4);
    }
}
