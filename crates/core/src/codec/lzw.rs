//! Streaming LZW decoder (PDF variant).
//!
//! Codes are 9-12 bits wide, MSB first. Code 256 clears the
//! dictionary, code 257 ends the stream, and the EarlyChange
//! convention moves the code-width growth boundary one dictionary
//! slot earlier (the PDF default). The dictionary is an arena of
//! (prefix code, trailing byte) pairs: a code's byte sequence is its
//! backward prefix chain, resolved with an explicit stack so
//! adversarial chain depth cannot overflow the call stack.

use smallvec::SmallVec;

use crate::codec::bits::{BitReader, BitSource};
use crate::error::{DeltaError, Result};

/// Reserved code: discard and rebuild the dictionary.
const CLEAR_CODE: u16 = 256;
/// Reserved code: no further codes follow.
const EOD_CODE: u16 = 257;
/// First dictionary slot handed out after a reset.
const FIRST_FREE: u16 = 258;
/// Dictionary capacity.
const TABLE_SIZE: usize = 4096;

const MIN_CODE_LEN: u8 = 9;
const MAX_CODE_LEN: u8 = 12;

/// Sentinel prefix for single-byte root entries (codes 0-255).
const NO_PREFIX: u16 = u16::MAX;

/// Each fill() batch targets `BATCH_CAPACITY - BATCH_MARGIN` bytes;
/// the margin absorbs the last sequence of a batch, whose length is
/// not bounded by a small constant.
const BATCH_CAPACITY: usize = 4096;
const BATCH_MARGIN: usize = 512;

/// Scratch stack for prefix-chain resolution. Chains longer than the
/// inline capacity spill to the heap; depth is bounded by the table
/// capacity either way.
type Scratch = SmallVec<[u8; 64]>;

/// Fixed-capacity dictionary mapping a code to a byte sequence.
///
/// Codes 0-255 are permanent single-byte roots, 256/257 are reserved
/// and never allocated, 258 and up are learned entries. Every learned
/// entry's prefix is a previously assigned code, so prefix chains are
/// strictly decreasing and therefore acyclic.
struct CodeTable {
    prefixes: Box<[u16; TABLE_SIZE]>,
    suffixes: Box<[u8; TABLE_SIZE]>,
    next_free: u16,
}

impl CodeTable {
    fn new() -> Self {
        let mut table = Self {
            prefixes: Box::new([NO_PREFIX; TABLE_SIZE]),
            suffixes: Box::new([0; TABLE_SIZE]),
            next_free: FIRST_FREE,
        };
        table.reset();
        table
    }

    /// Discard all learned entries and recreate the 256 roots.
    fn reset(&mut self) {
        for code in 0..256 {
            self.prefixes[code] = NO_PREFIX;
            self.suffixes[code] = code as u8;
        }
        self.next_free = FIRST_FREE;
    }

    /// True if `code` currently names a resolvable entry.
    ///
    /// The reserved codes 256/257 are filtered by the engine before
    /// this is consulted.
    fn contains(&self, code: u16) -> bool {
        code < self.next_free
    }

    /// Append `code`'s byte sequence to `out`, returning its first
    /// byte. The chain is stored backward, so trailing bytes are
    /// collected on `scratch` and replayed in reverse.
    fn resolve(&self, code: u16, scratch: &mut Scratch, out: &mut Vec<u8>) -> Result<u8> {
        if !self.contains(code) {
            return Err(DeltaError::CorruptLzwStream {
                code,
                next_free: self.next_free,
            });
        }
        scratch.clear();
        let mut cur = code;
        loop {
            scratch.push(self.suffixes[cur as usize]);
            match self.prefixes[cur as usize] {
                NO_PREFIX => break,
                prefix => cur = prefix,
            }
        }
        // The chain always holds at least the root byte.
        let first = scratch[scratch.len() - 1];
        out.extend(scratch.iter().rev());
        Ok(first)
    }

    /// Assign the next free slot to `(prefix, suffix)`.
    fn define(&mut self, prefix: u16, suffix: u8) -> Result<u16> {
        let slot = self.next_free as usize;
        if slot >= TABLE_SIZE {
            return Err(DeltaError::LzwTableExhausted);
        }
        self.prefixes[slot] = prefix;
        self.suffixes[slot] = suffix;
        self.next_free += 1;
        Ok(slot as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    Decoding,
    Done,
    Failed,
}

/// Pull-based LZW decoder bound to a single input stream.
///
/// One instance decodes exactly one stream; after `Done` (or a fatal
/// error) no further bytes are produced and a fresh instance is
/// required for the next stream.
pub struct LzwDecoder<S: BitSource> {
    source: S,
    table: CodeTable,
    code_len: u8,
    prev_code: Option<u16>,
    /// EarlyChange offset, 0 or 1. Fixed at construction.
    early: u16,
    state: DecoderState,
    scratch: Scratch,
    batch_capacity: usize,
}

impl<S: BitSource> LzwDecoder<S> {
    /// Create a decoder reading codes from `source`.
    ///
    /// `early_change` selects the growth boundary: `true` (the PDF
    /// default) grows the code width one dictionary slot early.
    pub fn new(source: S, early_change: bool) -> Self {
        Self::with_batch_capacity(source, early_change, BATCH_CAPACITY)
    }

    /// Like [`new`](Self::new) with an explicit output batch capacity.
    ///
    /// Smaller capacities trade throughput for earlier hand-off; no
    /// decoded byte is ever dropped, a batch just grows past the
    /// capacity when a single sequence demands it.
    pub fn with_batch_capacity(source: S, early_change: bool, batch_capacity: usize) -> Self {
        Self {
            source,
            table: CodeTable::new(),
            code_len: MIN_CODE_LEN,
            prev_code: None,
            early: u16::from(early_change),
            state: DecoderState::Decoding,
            scratch: Scratch::new(),
            batch_capacity: batch_capacity.max(1),
        }
    }

    /// True once the stream ended cleanly (end-of-data code or source
    /// exhaustion).
    pub fn is_done(&self) -> bool {
        self.state == DecoderState::Done
    }

    /// Decode the next batch of bytes.
    ///
    /// Returns the bytes produced this call; an empty batch together
    /// with [`is_done`](Self::is_done) signals clean end-of-stream.
    /// Errors are fatal: the decoder moves to a failed state and
    /// rejects further fills.
    pub fn fill(&mut self) -> Result<Vec<u8>> {
        match self.state {
            DecoderState::Failed => {
                return Err(DeltaError::DecodeError(
                    "LZW decoder is in a failed state".to_string(),
                ));
            }
            DecoderState::Done => return Ok(Vec::new()),
            DecoderState::Decoding => {}
        }
        let mut out = Vec::with_capacity(self.batch_capacity);
        let target = self.batch_capacity.saturating_sub(BATCH_MARGIN).max(1);
        while out.len() < target {
            match self.step(&mut out) {
                Ok(true) => {}
                Ok(false) => {
                    self.state = DecoderState::Done;
                    break;
                }
                Err(e) => {
                    self.state = DecoderState::Failed;
                    return Err(e);
                }
            }
        }
        Ok(out)
    }

    /// Run every remaining batch and collect the output.
    pub fn decode_to_end(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        loop {
            let batch = self.fill()?;
            if batch.is_empty() {
                break;
            }
            out.extend_from_slice(&batch);
        }
        Ok(out)
    }

    /// Release the underlying bit source. The decoder produces no
    /// further bytes afterwards.
    pub fn close(&mut self) {
        self.source.close();
        if self.state == DecoderState::Decoding {
            self.state = DecoderState::Done;
        }
    }

    /// Decode one code. Returns false when the stream is finished
    /// (end-of-data code, or the source ran out of full codes).
    fn step(&mut self, out: &mut Vec<u8>) -> Result<bool> {
        let Some(code) = self.source.read_bits(self.code_len)? else {
            return Ok(false);
        };

        if code == CLEAR_CODE {
            self.table.reset();
            self.code_len = MIN_CODE_LEN;
            self.prev_code = None;
            return Ok(true);
        }
        if code == EOD_CODE {
            return Ok(false);
        }

        let Some(prev) = self.prev_code else {
            // First code of a segment is always a bare literal; no
            // entry is learned from it.
            if code > 255 {
                return Err(DeltaError::CorruptLzwStream {
                    code,
                    next_free: self.table.next_free,
                });
            }
            out.push(code as u8);
            self.prev_code = Some(code);
            return Ok(true);
        };

        let first = if self.table.contains(code) {
            self.table.resolve(code, &mut self.scratch, out)?
        } else if code == self.table.next_free {
            // KwKwK: the code is referenced in the same step that
            // defines it. Its sequence is the previous sequence plus
            // that sequence's own first byte.
            let first = self.table.resolve(prev, &mut self.scratch, out)?;
            out.push(first);
            first
        } else {
            return Err(DeltaError::CorruptLzwStream {
                code,
                next_free: self.table.next_free,
            });
        };

        self.table.define(prev, first)?;
        self.prev_code = Some(code);
        if self.code_len < MAX_CODE_LEN && self.table.next_free == (1 << self.code_len) - self.early
        {
            self.code_len += 1;
        }
        Ok(true)
    }
}

/// Decode LZW-encoded data (PDF variant: MSB first, EarlyChange=1).
pub fn lzwdecode(data: &[u8]) -> Result<Vec<u8>> {
    lzwdecode_with_earlychange(data, 1)
}

/// Decode LZW-encoded data with an explicit EarlyChange setting.
///
/// EarlyChange=1 is the PDF default; 0 uses TIFF size switching.
/// Corrupt input is reported as an error, not truncated silently.
pub fn lzwdecode_with_earlychange(data: &[u8], early_change: i32) -> Result<Vec<u8>> {
    let mut decoder = LzwDecoder::new(BitReader::new(data), early_change != 0);
    decoder.decode_to_end()
}
