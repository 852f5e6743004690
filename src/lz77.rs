//! LZ77 Compression
//!
//! Every token is a triple: backward distance, match length, and the symbol
//! that follows the match.  Distance and length use configurable bit widths,
//! the symbol is written at its full width.
//!
//! A stream is the token bits, padded to a byte boundary, followed by a
//! little endian u64 giving the number of tokens.  The count is needed because
//! the padding could otherwise be mistaken for another token.

use std::io::Write;
use crate::tools::bit_stream::{BitReader,BitWriter};
use crate::tools::ring_buffer::RingBuffer;
use crate::tools::window::Window;
use crate::matchers::{Matcher,MatcherKind,NaiveMatcher,BoyerMooreMatcher};
use crate::{Error,Symbol};

/// largest value that fits in `bits` bits
pub const fn max_size(bits: u32) -> usize {
    (1 << bits) - 1
}

pub const MAX_POSITION_BITS: u32 = 24;
pub const MAX_LENGTH_BITS: u32 = 16;

/// Options controlling compression
#[derive(Clone,Debug)]
pub struct Options {
    /// width of the backward distance field
    pub position_bits: u32,
    /// width of the match length field
    pub length_bits: u32,
    /// number of symbols kept in the dictionary
    pub max_dictionary_size: usize,
    /// number of symbols searched for at once
    pub max_lookahead_buffer_size: usize
}

pub const STD_OPTIONS: Options = Options::with_bits(12,4);

impl Options {
    /// Largest dictionary and lookahead buffer the widths allow.
    pub const fn with_bits(position_bits: u32,length_bits: u32) -> Self {
        Self {
            position_bits,
            length_bits,
            max_dictionary_size: max_size(position_bits),
            max_lookahead_buffer_size: max_size(length_bits)
        }
    }
    pub fn verify(&self) -> Result<(),Error> {
        verify_widths(self.position_bits,self.length_bits,self.max_dictionary_size)?;
        if self.max_lookahead_buffer_size == 0 || self.max_lookahead_buffer_size > max_size(self.length_bits) {
            return Err(Error::InvalidOptions(format!("lookahead buffer size {} does not fit {} bits",
                self.max_lookahead_buffer_size,self.length_bits)));
        }
        Ok(())
    }
}

pub(crate) fn verify_widths(position_bits: u32,length_bits: u32,max_dictionary_size: usize) -> Result<(),Error> {
    if position_bits == 0 || position_bits > MAX_POSITION_BITS {
        return Err(Error::InvalidOptions(format!("position bits must be 1 to {}",MAX_POSITION_BITS)));
    }
    if length_bits == 0 || length_bits > MAX_LENGTH_BITS {
        return Err(Error::InvalidOptions(format!("length bits must be 1 to {}",MAX_LENGTH_BITS)));
    }
    if max_dictionary_size == 0 || max_dictionary_size > max_size(position_bits) {
        return Err(Error::InvalidOptions(format!("dictionary size {} does not fit {} bits",
            max_dictionary_size,position_bits)));
    }
    Ok(())
}

/// Append the token count after the token stream.
pub(crate) fn write_footer(count: u64,output: &mut Vec<u8>) -> Result<(),Error> {
    let mut writer = BitWriter::new(output);
    writer.write(count)
}

/// Separate the token stream from the token count that ends it.
pub(crate) fn split_footer(input: &[u8]) -> Result<(&[u8],u64),Error> {
    if input.len() < 8 {
        log::error!("stream of {} bytes is too short for a token count",input.len());
        return Err(Error::UnexpectedEnd);
    }
    let (tokens,footer) = input.split_at(input.len()-8);
    let mut reader = BitReader::new(footer.iter().copied());
    Ok((tokens,reader.read()?))
}

/// Write tokens for the whole input, returns the number of tokens.
pub fn encode_tokens<T,M,W>(input: &[T],opt: &Options,matcher: &mut M,writer: &mut BitWriter<W>) -> Result<u64,Error>
where T: Symbol, M: Matcher<T>, W: Write {
    opt.verify()?;
    let mut window = Window::new(input,opt.max_dictionary_size,opt.max_lookahead_buffer_size);
    let mut count = 0;
    while !window.is_empty() {
        window.fill_lookahead_buffer();
        let mut curr = matcher.find_match(window.dictionary(),window.lookahead());
        if curr.length == window.lookahead().len() {
            // there has to be a symbol after the match
            if window.has_more_symbols() {
                window.load_one_more();
            } else {
                curr.length -= 1;
            }
        }
        if curr.length == 0 {
            curr.position = 0;
        }
        let next = window.lookahead()[curr.length];
        log::trace!("token: {} {} {:?}",curr.position,curr.length,next);
        writer.write_bits(curr.position as u64,opt.position_bits)?;
        writer.write_bits(curr.length as u64,opt.length_bits)?;
        writer.write(next)?;
        window.slide(curr.length + 1);
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
        let position = reader.read_bits(opt.position_bits)? as usize;
        let length = reader.read_bits(opt.length_bits)? as usize;
        let next: T = reader.read()?;
        if length > 0 && (position == 0 || position > dictionary.len()) {
            log::error!("token {} refers back {} with only {} symbols available",count,position,dictionary.len());
            return Err(Error::BadMatch);
        }
        for _i in 0..length {
            let sym = dictionary.behind(position);
            output.push(sym);
            dictionary.push(sym);
        }
        output.push(next);
        dictionary.push(next);
        count += 1;
    }
    Ok(count)
}

/// Encode with a specific matcher and append the stream to `output`.
pub fn encode_into<T: Symbol,M: Matcher<T>>(input: &[T],opt: &Options,matcher: &mut M,output: &mut Vec<u8>) -> Result<u64,Error> {
    let mut writer = BitWriter::new(&mut *output);
    let count = encode_tokens(input,opt,matcher,&mut writer)?;
    writer.flush()?;
    drop(writer);
    write_footer(count,output)?;
    log::debug!("LZ77 wrote {} tokens for {} symbols",count,input.len());
    Ok(count)
}

/// Decode one stream including its token count, appending to `output`.
pub fn decode_into<T: Symbol>(input: &[u8],opt: &Options,output: &mut Vec<T>) -> Result<u64,Error> {
    let (tokens,times) = split_footer(input)?;
    let mut reader = BitReader::new(tokens.iter().copied());
    decode_tokens(&mut reader,opt,Some(times),output)
}

pub fn encode<T: Symbol>(input: &[T],opt: &Options,matcher: MatcherKind) -> Result<Vec<u8>,Error> {
    let mut ans = Vec::new();
    match matcher {
        MatcherKind::Naive => encode_into(input,opt,&mut NaiveMatcher::new(),&mut ans)?,
        MatcherKind::BoyerMoore => encode_into(input,opt,&mut BoyerMooreMatcher::new(),&mut ans)?
    };
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
    length_bits: 8,
    max_dictionary_size: 6,
    max_lookahead_buffer_size: 4
};

#[cfg(test)]
fn tokens(s: &str) -> Vec<u8> {
    // digits are raw numbers, anything else is a symbol
    s.bytes().map(|b| match b.is_ascii_digit() {
        true => b - b'0',
        false => b
    }).collect()
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
    for (count,out) in [encode_small(NaiveMatcher::new()),encode_small(BoyerMooreMatcher::new())] {
        assert_eq!(count,5);
        assert_eq!(out,tokens("00a11c34b33a12c"));
    }
}

#[test]
fn reference_decode() {
    let data = tokens("00a11c34b33a12c");
    let mut reader = BitReader::new(data.iter().copied());
    let mut out: Vec<u8> = Vec::new();
    let count = decode_tokens(&mut reader,&Options::with_bits(8,8),None,&mut out).expect("decoding failed");
    assert_eq!(count,5);
    assert_eq!(out,"aacaacabcabaaac".as_bytes());
}

#[test]
fn invertibility() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    for kind in [MatcherKind::Naive,MatcherKind::BoyerMoore] {
        let compressed = encode(test_data,&STD_OPTIONS,kind).expect("compression failed");
        let expanded: Vec<u8> = decode(&compressed,&STD_OPTIONS).expect("expansion failed");
        assert_eq!(test_data.to_vec(),expanded);
    }
    let compressed = encode::<u8>(&[],&STD_OPTIONS,MatcherKind::BoyerMoore).expect("compression failed");
    assert_eq!(compressed,vec![0;8]);
    assert!(decode::<u8>(&compressed,&STD_OPTIONS).unwrap().is_empty());
}

#[test]
fn bad_streams() {
    // distance 3 with nothing decoded yet
    let data = tokens("32a");
    let mut reader = BitReader::new(data.iter().copied());
    let mut out: Vec<u8> = Vec::new();
    assert!(matches!(decode_tokens(&mut reader,&Options::with_bits(8,8),None,&mut out),Err(Error::BadMatch)));
    assert!(matches!(decode::<u8>(&[1,2,3],&STD_OPTIONS),Err(Error::UnexpectedEnd)));
    let mut opt = STD_OPTIONS.clone();
    opt.max_lookahead_buffer_size = 16;
    assert!(matches!(encode::<u8>(&[1],&opt,MatcherKind::Naive),Err(Error::InvalidOptions(_))));
}
