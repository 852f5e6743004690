//! LZSS Compression
//!
//! Each token starts with a flag bit.  A set flag is followed by one raw symbol.
//! A clear flag is followed by the backward distance and the match length less
//! the minimum match length.  Matches shorter than the minimum are sent as
//! literals, so the length field never wastes a code on them.
//!
//! The stream layout is the same as for LZ77: token bits, padding, and a
//! little endian u64 token count.

use std::io::Write;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use crate::tools::bit_stream::{BitReader,BitWriter};
use crate::tools::ring_buffer::RingBuffer;
use crate::tools::window::Window;
use crate::matchers::{Matcher,MatcherKind,NaiveMatcher,BoyerMooreMatcher};
use crate::lz77::{max_size,verify_widths,write_footer,split_footer};
use crate::{Error,Symbol};

#[derive(FromPrimitive,Clone,Copy,Debug,PartialEq,Eq)]
enum TokenFlag {
    Match = 0,
    Literal = 1
}

impl TokenFlag {
    fn bit(self) -> bool {
        self as u8 == 1
    }
}

/// shortest match worth a reference, given the field widths
pub const fn minimum_match_length(position_bits: u32,length_bits: u32) -> usize {
    ((position_bits + length_bits) / 9 + 1) as usize
}

/// Options controlling compression
#[derive(Clone,Debug)]
pub struct Options {
    /// width of the backward distance field
    pub position_bits: u32,
    /// width of the length field
    pub length_bits: u32,
    /// matches shorter than this are sent as literals
    pub minimum_match_length: usize,
    /// number of symbols kept in the dictionary
    pub max_dictionary_size: usize,
    /// number of symbols searched for at once
    pub max_lookahead_buffer_size: usize
}

pub const STD_OPTIONS: Options = Options::with_bits(12,4);

impl Options {
    /// Largest dictionary and lookahead buffer the widths allow.
    pub const fn with_bits(position_bits: u32,length_bits: u32) -> Self {
        let minimum_match_length = minimum_match_length(position_bits,length_bits);
        Self {
            position_bits,
            length_bits,
            minimum_match_length,
            max_dictionary_size: max_size(position_bits),
            max_lookahead_buffer_size: max_size(length_bits) + minimum_match_length
        }
    }
    pub fn verify(&self) -> Result<(),Error> {
        verify_widths(self.position_bits,self.length_bits,self.max_dictionary_size)?;
        if self.minimum_match_length == 0 {
            return Err(Error::InvalidOptions("minimum match length must be positive".to_string()));
        }
        if self.max_lookahead_buffer_size == 0 || self.max_lookahead_buffer_size > max_size(self.length_bits) + self.minimum_match_length {
            return Err(Error::InvalidOptions(format!("lookahead buffer size {} does not fit {} bits",
                self.max_lookahead_buffer_size,self.length_bits)));
        }
        Ok(())
    }
}

/// Write tokens for the whole input, returns the number of tokens.
pub fn encode_tokens<T,M,W>(input: &[T],opt: &Options,matcher: &mut M,writer: &mut BitWriter<W>) -> Result<u64,Error>
where T: Symbol, M: Matcher<T>, W: Write {
    opt.verify()?;
    let mut window = Window::new(input,opt.max_dictionary_size,opt.max_lookahead_buffer_size);
    let mut count = 0;
    while !window.is_empty() {
        window.fill_lookahead_buffer();
        let curr = matcher.find_match(window.dictionary(),window.lookahead());
        if curr.length < opt.minimum_match_length {
            let sym = window.lookahead()[0];
            log::trace!("literal: {:?}",sym);
            writer.write_bit(TokenFlag::Literal.bit())?;
            writer.write(sym)?;
            window.slide(1);
        } else {
            log::trace!("match: {} {}",curr.position,curr.length);
            writer.write_bit(TokenFlag::Match.bit())?;
            writer.write_bits(curr.position as u64,opt.position_bits)?;
            writer.write_bits((curr.length - opt.minimum_match_length) as u64,opt.length_bits)?;
            window.slide(curr.length);
        }
        count += 1;
    }
    Ok(count)
}

/// Read `times` tokens, or until the data runs out if `times` is `None`.
/// Returns the number of tokens read.
pub fn decode_tokens<T,I>(reader: &mut BitReader<I>,opt: &Options,times: Option<u64>,output: &mut Vec<T>) -> Result<u64,Error>
where T: Symbol, I: Iterator<Item=u8> {
    opt.verify()?;
    let mut dictionary = RingBuffer::create(T::zero(),opt.max_dictionary_size);
    let mut count = 0;
    while times.map_or(reader.has_more(),|t| count < t) {
        let flag = TokenFlag::from_u8(reader.read_bit()? as u8).ok_or(Error::FileFormatMismatch)?;
        match flag {
            TokenFlag::Literal => {
                let sym: T = reader.read()?;
                output.push(sym);
                dictionary.push(sym);
            },
            TokenFlag::Match => {
                let position = reader.read_bits(opt.position_bits)? as usize;
                let length = reader.read_bits(opt.length_bits)? as usize + opt.minimum_match_length;
                if position == 0 || position > dictionary.len() {
                    log::error!("token {} refers back {} with only {} symbols available",count,position,dictionary.len());
                    return Err(Error::BadMatch);
                }
                for _i in 0..length {
                    let sym = dictionary.behind(position);
                    output.push(sym);
                    dictionary.push(sym);
                }
            }
        }
        count += 1;
    }
    Ok(count)
}

/// Encode with a specific matcher and append the stream to `output`.
pub fn encode_into<T: Symbol,M: Matcher<T>>(input: &[T],opt: &Options,matcher: &mut M,output: &mut Vec<u8>) -> Result<u64,Error> {
    let start = output.len();
    let mut writer = BitWriter::new(&mut *output);
    let count = encode_tokens(input,opt,matcher,&mut writer)?;
    writer.flush()?;
    drop(writer);
    write_footer(count,output)?;
    log::debug!("LZSS wrote {} tokens for {} symbols in {} bytes",count,input.len(),output.len()-start);
    Ok(count)
}

/// Same as `encode_into` with the matcher chosen at runtime.
pub fn encode_into_with<T: Symbol>(input: &[T],opt: &Options,matcher: MatcherKind,output: &mut Vec<u8>) -> Result<u64,Error> {
    match matcher {
        MatcherKind::Naive => encode_into(input,opt,&mut NaiveMatcher::new(),output),
        MatcherKind::BoyerMoore => encode_into(input,opt,&mut BoyerMooreMatcher::new(),output)
    }
}

/// Decode one stream including its token count, appending to `output`.
pub fn decode_into<T: Symbol>(input: &[u8],opt: &Options,output: &mut Vec<T>) -> Result<u64,Error> {
    let (tokens,times) = split_footer(input)?;
    let mut reader = BitReader::new(tokens.iter().copied());
    decode_tokens(&mut reader,opt,Some(times),output)
}

pub fn encode<T: Symbol>(input: &[T],opt: &Options,matcher: MatcherKind) -> Result<Vec<u8>,Error> {
    let mut ans = Vec::new();
    encode_into_with(input,opt,matcher,&mut ans)?;
    Ok(ans)
}

pub fn decode<T: Symbol>(input: &[u8],opt: &Options) -> Result<Vec<T>,Error> {
    let mut ans = Vec::new();
    decode_into(input,opt,&mut ans)?;
    Ok(ans)
}

#[cfg(test)]
const SMALL_OPTIONS: Options = Options {
    position_bits: 8,
    length_bits: 4,
    minimum_match_length: 3,
    max_dictionary_size: 6,
    max_lookahead_buffer_size: 4
};

#[cfg(test)]
fn reference_bits() -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    let mut writer = BitWriter::new(&mut out);
    for tok in ["a","a","c","34","b","33","a","a","a","c"] {
        if tok.len() == 1 {
            writer.write_bit(true).unwrap();
            writer.write(tok.as_bytes()[0]).unwrap();
        } else {
            let digits = tok.as_bytes();
            writer.write_bit(false).unwrap();
            writer.write_bits((digits[0] - b'0') as u64,8).unwrap();
            writer.write_bits((digits[1] - b'0') as u64 - 3,4).unwrap();
        }
    }
    drop(writer);
    out
}

#[cfg(test)]
fn encode_small<M: Matcher<u8>>(mut matcher: M) -> (u64,Vec<u8>) {
    let mut out: Vec<u8> = Vec::new();
    let mut writer = BitWriter::new(&mut out);
    let count = encode_tokens("aacaacabcabaaac".as_bytes(),&SMALL_OPTIONS,&mut matcher,&mut writer).expect("encoding failed");
    drop(writer);
    (count,out)
}

#[test]
fn reference_tokens() {
    let expected = reference_bits();
    for (count,out) in [encode_small(NaiveMatcher::new()),encode_small(BoyerMooreMatcher::new())] {
        assert_eq!(count,10);
        assert_eq!(out,expected);
    }
    let mut reader = BitReader::new(expected.iter().copied());
    let mut out: Vec<u8> = Vec::new();
    decode_tokens(&mut reader,&SMALL_OPTIONS,Some(10),&mut out).expect("decoding failed");
    assert_eq!(out,"aacaacabcabaaac".as_bytes());
}

#[test]
fn defaults() {
    assert_eq!(STD_OPTIONS.minimum_match_length,2);
    assert_eq!(STD_OPTIONS.max_dictionary_size,4095);
    assert_eq!(STD_OPTIONS.max_lookahead_buffer_size,17);
    assert_eq!(minimum_match_length(8,4),2);
    assert_eq!(minimum_match_length(16,8),3);
}

#[test]
fn invertibility() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    for kind in [MatcherKind::Naive,MatcherKind::BoyerMoore] {
        let compressed = encode(test_data,&STD_OPTIONS,kind).expect("compression failed");
        let expanded: Vec<u8> = decode(&compressed,&STD_OPTIONS).expect("expansion failed");
        assert_eq!(test_data.to_vec(),expanded);
    }
    let run = vec![7u8;1000];
    let compressed = encode(&run,&STD_OPTIONS,MatcherKind::BoyerMoore).expect("compression failed");
    assert!(compressed.len() < 200);
    assert_eq!(decode::<u8>(&compressed,&STD_OPTIONS).unwrap(),run);
}

#[test]
fn wide_symbols() {
    let test_data: Vec<u16> = (0..3000).map(|i| (i % 37) as u16 * 1000 + (i % 5) as u16).collect();
    let compressed = encode(&test_data,&STD_OPTIONS,MatcherKind::BoyerMoore).expect("compression failed");
    let expanded: Vec<u16> = decode(&compressed,&STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data,expanded);
}

#[test]
fn bad_match() {
    let mut out: Vec<u8> = Vec::new();
    let mut writer = BitWriter::new(&mut out);
    writer.write_bit(false).unwrap();
    writer.write_bits(1,12).unwrap();
    writer.write_bits(0,4).unwrap();
    drop(writer);
    write_footer(1,&mut out).unwrap();
    assert!(matches!(decode::<u8>(&out,&STD_OPTIONS),Err(Error::BadMatch)));
}
