//! Multi-threaded compression of independent chunks
//!
//! Compression cuts the input into chunks of a fixed size and turns each chunk
//! into one LZSS stream wrapped in one Huffman block.  The blocks are simply
//! concatenated.  Expansion finds the block boundaries by reading each
//! Huffman header, so no other framing is needed.

pub mod buffers;
pub mod counter;
pub mod splitter;

pub use buffers::{BufferPool,PooledBuffer};
pub use counter::ThreadSafeCounter;
pub use splitter::{Splitter,Stage};

use crate::matchers::MatcherKind;
use crate::{huffman,lzss,Error};

pub struct LzssEncodeStage {
    pub opt: lzss::Options,
    pub matcher: MatcherKind
}

impl Stage<u8> for LzssEncodeStage {
    fn run(&self,input: &[u8],output: &mut Vec<u8>) -> Result<(),Error> {
        lzss::encode_into_with(input,&self.opt,self.matcher,output)?;
        Ok(())
    }
}

pub struct LzssDecodeStage {
    pub opt: lzss::Options
}

impl Stage<u8> for LzssDecodeStage {
    fn run(&self,input: &[u8],output: &mut Vec<u8>) -> Result<(),Error> {
        lzss::decode_into(input,&self.opt,output)?;
        Ok(())
    }
}

pub struct HuffmanEncodeStage;

impl Stage<u8> for HuffmanEncodeStage {
    fn run(&self,input: &[u8],output: &mut Vec<u8>) -> Result<(),Error> {
        huffman::encode_into(input,output)?;
        Ok(())
    }
}

pub struct HuffmanDecodeStage;

impl Stage<u8> for HuffmanDecodeStage {
    fn run(&self,input: &[u8],output: &mut Vec<u8>) -> Result<(),Error> {
        huffman::decode_into(input,output)?;
        Ok(())
    }
    /// each chunk is exactly one Huffman block
    fn next_chunk_len(&self,rest: &[u8],_chunk_size: usize) -> Result<usize,Error> {
        huffman::block_len::<u8>(rest)
    }
}

/// Compress `input` chunk by chunk, appending to `output`.  Returns the number of chunks.
pub fn encode_in_parallel(input: &[u8],output: &mut Vec<u8>,opt: &crate::Options) -> Result<usize,Error> {
    opt.verify()?;
    let splitter = Splitter::new(
        LzssEncodeStage { opt: opt.lzss.clone(), matcher: opt.matcher },
        HuffmanEncodeStage
    );
    let chunks = splitter.run(input,output,opt.threads,opt.chunk_size)?;
    log::debug!("compressed {} chunks on up to {} threads",chunks,opt.threads);
    Ok(chunks)
}

/// Expand a concatenation of compressed chunks, appending to `output`.  Returns the number of chunks.
pub fn decode_in_parallel(input: &[u8],output: &mut Vec<u8>,opt: &crate::Options) -> Result<usize,Error> {
    opt.verify()?;
    let splitter = Splitter::new(
        HuffmanDecodeStage,
        LzssDecodeStage { opt: opt.lzss.clone() }
    );
    let chunks = splitter.run(input,output,opt.threads,opt.chunk_size)?;
    log::debug!("expanded {} chunks on up to {} threads",chunks,opt.threads);
    Ok(chunks)
}

#[cfg(test)]
fn sample(len: usize) -> Vec<u8> {
    let words = ["alpha ","beta ","gamma ","delta\n","epsilon ","zeta, "];
    let mut ans = Vec::new();
    let mut i: usize = 0;
    while ans.len() < len {
        ans.extend_from_slice(words[(i*i + i/3) % words.len()].as_bytes());
        i += 1;
    }
    ans.truncate(len);
    ans
}

#[test]
fn same_as_sequential() {
    let input = sample(10000);
    let mut opt = crate::STD_OPTIONS.clone();
    opt.chunk_size = 1000;
    let mut sequential = Vec::new();
    for chunk in input.chunks(opt.chunk_size) {
        let lz = lzss::encode(chunk,&opt.lzss,opt.matcher).unwrap();
        huffman::encode_into(&lz,&mut sequential).unwrap();
    }
    for threads in [1,3,8] {
        opt.threads = threads;
        let mut parallel = Vec::new();
        assert_eq!(encode_in_parallel(&input,&mut parallel,&opt).unwrap(),10);
        assert_eq!(parallel,sequential);
        let mut expanded = Vec::new();
        assert_eq!(decode_in_parallel(&parallel,&mut expanded,&opt).unwrap(),10);
        assert_eq!(expanded,input);
    }
}

#[test]
fn naive_matcher_pipeline() {
    let input = sample(3001);
    let mut opt = crate::STD_OPTIONS.clone();
    opt.matcher = MatcherKind::Naive;
    opt.chunk_size = 500;
    opt.threads = 4;
    let mut compressed = Vec::new();
    assert_eq!(encode_in_parallel(&input,&mut compressed,&opt).unwrap(),7);
    let mut expanded = Vec::new();
    decode_in_parallel(&compressed,&mut expanded,&opt).unwrap();
    assert_eq!(expanded,input);
}

#[test]
fn truncated_stream() {
    let input = sample(2000);
    let mut compressed = Vec::new();
    encode_in_parallel(&input,&mut compressed,&crate::STD_OPTIONS).unwrap();
    compressed.pop();
    let mut expanded = Vec::new();
    assert!(decode_in_parallel(&compressed,&mut expanded,&crate::STD_OPTIONS).is_err());
}
