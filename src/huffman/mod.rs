//! Canonical Huffman coding
//!
//! A block is laid out as
//! * code length table, see `header`
//! * u64 number of payload bits, little endian
//! * payload, padded with zeros to a byte boundary
//!
//! The bit count lets a reader find the end of a block, so blocks can be
//! concatenated without any other framing.

mod tree;
mod canonical;
pub mod header;
mod encoder;
mod decoder;

pub use tree::{HuffmanData,HuffmanTree};
pub use canonical::{CanonicalHuffmanTree,canonical_codes,MAX_CODE_LENGTH};
pub use encoder::HuffmanEncoder;
pub use decoder::HuffmanDecoder;

use crate::tools::bit_stream::{BitReader,BitWriter};
use crate::{Error,Symbol};

/// Encode `input` as one block appended to `output`, returns the symbol count.
pub fn encode_into<T: Symbol>(input: &[T],output: &mut Vec<u8>) -> Result<usize,Error> {
    let tree = HuffmanTree::from_symbols(input.iter().copied());
    let mut encoder = HuffmanEncoder::from_tree(&tree);
    encoder.make_canonical()?;
    let bits = encoder.encoded_bits(&tree);
    let mut writer = BitWriter::new(output);
    header::write_lengths(&encoder.lengths(),&mut writer)?;
    writer.write(bits)?;
    let count = encoder.encode(input.iter().copied(),&mut writer)?;
    writer.flush()?;
    log::debug!("Huffman encoded {} symbols into {} bits",count,bits);
    Ok(count)
}

/// Decode one block from the start of `input`, appending symbols to `output`.
/// Returns the symbol count.
pub fn decode_into<T: Symbol>(input: &[u8],output: &mut Vec<T>) -> Result<usize,Error> {
    let mut reader = BitReader::new(input.iter().copied());
    let lengths: Vec<(T,u32)> = header::read_lengths(&mut reader)?;
    let tree = CanonicalHuffmanTree::from_lengths(&lengths)?;
    let bits: u64 = reader.read()?;
    let count = HuffmanDecoder::new(&tree).decode(&mut reader,bits,output)?;
    log::debug!("Huffman decoded {} symbols from {} bits",count,bits);
    Ok(count)
}

pub fn encode<T: Symbol>(input: &[T]) -> Result<Vec<u8>,Error> {
    let mut ans = Vec::new();
    encode_into(input,&mut ans)?;
    Ok(ans)
}

pub fn decode<T: Symbol>(input: &[u8]) -> Result<Vec<T>,Error> {
    let mut ans = Vec::new();
    decode_into(input,&mut ans)?;
    Ok(ans)
}

/// Total size in bytes of the block at the start of `input`.
pub fn block_len<T: Symbol>(input: &[u8]) -> Result<usize,Error> {
    let header = header::header_len::<T>(input)?;
    if input.len() < header + 8 {
        return Err(Error::UnexpectedEnd);
    }
    let mut reader = BitReader::new(input[header..].iter().copied());
    let bits: u64 = reader.read()?;
    let payload = (bits as usize + 7) / 8;
    let ans = header + 8 + payload;
    if ans > input.len() {
        log::error!("Huffman block needs {} bytes, only {} remain",ans,input.len());
        return Err(Error::UnexpectedEnd);
    }
    Ok(ans)
}

#[test]
fn invertibility() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let compressed = encode(test_data).expect("compression failed");
    let expanded: Vec<u8> = decode(&compressed).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);
    assert_eq!(block_len::<u8>(&compressed).unwrap(),compressed.len());
}

#[test]
fn degenerate_inputs() {
    let compressed = encode::<u8>(&[]).expect("compression failed");
    assert_eq!(compressed.len(),256+8);
    assert!(decode::<u8>(&compressed).unwrap().is_empty());

    let compressed = encode("aaaaaaaaa".as_bytes()).expect("compression failed");
    // 9 one bit codes
    assert_eq!(compressed.len(),256+8+2);
    assert_eq!(&compressed[256..264],&[9,0,0,0,0,0,0,0]);
    assert_eq!(decode::<u8>(&compressed).unwrap(),"aaaaaaaaa".as_bytes());
}

#[test]
fn wide_symbols() {
    let test_data: Vec<u16> = (0..2000).map(|i| ((i*i) % 977) as u16 + 300).collect();
    let compressed = encode(&test_data).expect("compression failed");
    let expanded: Vec<u16> = decode(&compressed).expect("expansion failed");
    assert_eq!(test_data,expanded);
    assert_eq!(block_len::<u16>(&compressed).unwrap(),compressed.len());
}

#[test]
fn concatenated_blocks() {
    let mut stream = encode("first block".as_bytes()).unwrap();
    let first = stream.len();
    encode_into("second".as_bytes(),&mut stream).unwrap();
    assert_eq!(block_len::<u8>(&stream).unwrap(),first);
    let mut out = Vec::new();
    decode_into::<u8>(&stream[first..],&mut out).unwrap();
    decode_into::<u8>(&stream[..first],&mut out).unwrap();
    assert_eq!(out,"secondfirst block".as_bytes());
    assert!(matches!(block_len::<u8>(&stream[..first-1]),Err(Error::UnexpectedEnd)));
}
