//! LZSS Compression with Canonical Huffman Encoding
//!
//! The input is cut into chunks which are compressed independently and in
//! parallel.  Each chunk goes through LZSS, and the LZSS stream (including its
//! token count) is then Huffman coded as a single block with a static code
//! table.  The output is the concatenation of the blocks in input order.
//!
//! * This transforms buffers, files are read into memory first
//! * Block sizes and counts are little endian
//! * Empty input gives empty output

use std::io::{Cursor,Read,Write,Seek,SeekFrom};
use crate::parallel::{encode_in_parallel,decode_in_parallel};
use crate::{huffman,lzss,Error,Options,DYNERR};

/// Compress one chunk into one block.
pub fn compress_block(ibuf: &[u8],opt: &Options) -> Result<Vec<u8>,Error> {
    let lz = lzss::encode(ibuf,&opt.lzss,opt.matcher)?;
    huffman::encode(&lz)
}

/// Expand the block at the start of `ibuf`.
pub fn expand_block(ibuf: &[u8],opt: &Options) -> Result<Vec<u8>,Error> {
    let lz: Vec<u8> = huffman::decode(ibuf)?;
    lzss::decode(&lz,&opt.lzss)
}

/// Main compression function.
/// `expanded_in` is an object with `Read` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `compressed_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.
pub fn compress<R,W>(expanded_in: &mut R,compressed_out: &mut W,opt: &Options) -> Result<(u64,u64),DYNERR>
where R: Read + Seek, W: Write + Seek {
    let ibuf = read_from(expanded_in,opt.in_offset)?;
    let mut obuf = Vec::new();
    encode_in_parallel(&ibuf,&mut obuf,opt)?;
    compressed_out.seek(SeekFrom::Start(opt.out_offset))?;
    compressed_out.write_all(&obuf)?;
    compressed_out.flush()?;
    Ok((ibuf.len() as u64,obuf.len() as u64))
}

/// Main decompression function.
/// `compressed_in` is an object with `Read` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `expanded_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.
pub fn expand<R,W>(compressed_in: &mut R,expanded_out: &mut W,opt: &Options) -> Result<(u64,u64),DYNERR>
where R: Read + Seek, W: Write + Seek {
    let ibuf = read_from(compressed_in,opt.in_offset)?;
    let mut obuf = Vec::new();
    decode_in_parallel(&ibuf,&mut obuf,opt)?;
    expanded_out.seek(SeekFrom::Start(opt.out_offset))?;
    expanded_out.write_all(&obuf)?;
    expanded_out.flush()?;
    Ok((ibuf.len() as u64,obuf.len() as u64))
}

fn read_from<R: Read + Seek>(src: &mut R,offset: u64) -> Result<Vec<u8>,DYNERR> {
    let length = src.seek(SeekFrom::End(0))?;
    if offset > length {
        log::error!("offset {} is beyond the end of the input ({})",offset,length);
        return Err(Box::new(Error::FileFormatMismatch));
    }
    src.seek(SeekFrom::Start(offset))?;
    let mut ans = Vec::with_capacity((length - offset) as usize);
    src.read_to_end(&mut ans)?;
    Ok(ans)
}

/// Convenience function, calls `compress` with a slice returning a Vec
pub fn compress_slice(slice: &[u8],opt: &Options) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    compress(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

/// Convenience function, calls `expand` with a slice returning a Vec
pub fn expand_slice(slice: &[u8],opt: &Options) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    expand(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

#[test]
fn invertibility() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let compressed = compress_slice(test_data,&crate::STD_OPTIONS).expect("compression failed");
    assert_eq!(compressed,compress_block(test_data,&crate::STD_OPTIONS).unwrap());
    let expanded = expand_slice(&compressed,&crate::STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);
    assert_eq!(expand_block(&compressed,&crate::STD_OPTIONS).unwrap(),expanded);
}

#[test]
fn many_chunks() {
    let test_data: Vec<u8> = (0..50000u32).map(|i| ((i / 7) % 13) as u8 + b'a').collect();
    let mut opt = crate::STD_OPTIONS.clone();
    opt.chunk_size = 4096;
    opt.threads = 4;
    let compressed = compress_slice(&test_data,&opt).expect("compression failed");
    assert!(compressed.len() < test_data.len());
    let expanded = expand_slice(&compressed,&opt).expect("expansion failed");
    assert_eq!(test_data,expanded);
}

#[test]
fn empty_and_offsets() {
    assert!(compress_slice(&[],&crate::STD_OPTIONS).unwrap().is_empty());
    assert!(expand_slice(&[],&crate::STD_OPTIONS).unwrap().is_empty());
    let mut opt = crate::STD_OPTIONS.clone();
    opt.in_offset = 4;
    let compressed = compress_slice("skipabcabcabc".as_bytes(),&opt).unwrap();
    opt.in_offset = 0;
    assert_eq!(expand_slice(&compressed,&opt).unwrap(),"abcabcabc".as_bytes());
    opt.in_offset = 100;
    assert!(compress_slice("short".as_bytes(),&opt).is_err());
}
