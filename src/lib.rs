//! # lzpipe
//!
//! Lossless compression built from an LZSS dictionary coder followed by a
//! canonical Huffman coder.  Large inputs are cut into chunks that are
//! compressed on a bounded pool of worker threads, the output is always
//! assembled in input order.
//!
//! * `lzss_huff` - the complete codec, use this for files
//! * `lzss`, `lz77` - dictionary coders on their own
//! * `huffman` - canonical Huffman coder on its own
//! * `parallel` - the chunk pipeline
//! * `matchers` - longest match search strategies

pub mod tools;
pub mod huffman;
pub mod matchers;
pub mod lz77;
pub mod lzss;
pub mod parallel;
pub mod lzss_huff;

use num_traits::{PrimInt,Unsigned};
use std::hash::Hash;
use std::fmt::Debug;

type DYNERR = Box<dyn std::error::Error>;

/// Codec Errors
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("file format mismatch")]
    FileFormatMismatch,
    #[error("unexpected end of data")]
    UnexpectedEnd,
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("match points outside of the dictionary")]
    BadMatch,
    #[error("code does not lead to a symbol")]
    BadCode,
    #[error("Huffman code is too long")]
    CodeTooLong,
    #[error("worker thread failed")]
    WorkerFailed,
    #[error(transparent)]
    Io(#[from] std::io::Error)
}

/// Unit of data handled by the coders.
/// Bytes are the usual case, wider symbols use a sparse Huffman header.
pub trait Symbol: PrimInt + Unsigned + tools::bit_stream::Word + Hash + Debug + Send + Sync + 'static {
    /// number of distinct values
    const ALPHABET_SIZE: usize;
    /// whether the Huffman header lists a length for every possible value
    const DENSE_HEADER: bool;
    fn index(self) -> usize;
    fn from_index(index: usize) -> Self;
}

impl Symbol for u8 {
    const ALPHABET_SIZE: usize = 256;
    const DENSE_HEADER: bool = true;
    fn index(self) -> usize {
        self as usize
    }
    fn from_index(index: usize) -> Self {
        index as u8
    }
}

impl Symbol for u16 {
    const ALPHABET_SIZE: usize = 65536;
    const DENSE_HEADER: bool = false;
    fn index(self) -> usize {
        self as usize
    }
    fn from_index(index: usize) -> Self {
        index as u16
    }
}

/// Options controlling the complete codec
#[derive(Clone,Debug)]
pub struct Options {
    /// parameters of the dictionary coder
    pub lzss: lzss::Options,
    /// strategy used to search the dictionary
    pub matcher: matchers::MatcherKind,
    /// maximum number of chunks being worked on at once
    pub threads: usize,
    /// number of input bytes per chunk when compressing
    pub chunk_size: usize,
    /// starting position in the input file
    pub in_offset: u64,
    /// starting position in the output file
    pub out_offset: u64
}

pub const STD_OPTIONS: Options = Options {
    lzss: lzss::STD_OPTIONS,
    matcher: matchers::MatcherKind::BoyerMoore,
    threads: 8,
    chunk_size: 64000,
    in_offset: 0,
    out_offset: 0
};

impl Options {
    pub fn verify(&self) -> Result<(),Error> {
        if self.threads == 0 {
            return Err(Error::InvalidOptions("thread count must be positive".to_string()));
        }
        if self.chunk_size == 0 {
            return Err(Error::InvalidOptions("chunk size must be positive".to_string()));
        }
        self.lzss.verify()
    }
}
