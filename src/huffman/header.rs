//! Code length table that precedes each Huffman block
//!
//! * dense (bytes): one length byte for each of the 256 symbols, 0 if unused
//! * sparse (wider symbols): u64 count, then (symbol, length byte) pairs

use std::io::Write;
use crate::tools::bit_stream::{BitReader,BitWriter};
use crate::{Error,Symbol};

/// Write the lengths, which must already be in canonical order.
pub fn write_lengths<T: Symbol,W: Write>(lengths: &[(T,u32)],writer: &mut BitWriter<W>) -> Result<(),Error> {
    if T::DENSE_HEADER {
        let mut table = vec![0u8;T::ALPHABET_SIZE];
        for (sym,len) in lengths {
            table[sym.index()] = *len as u8;
        }
        for len in table {
            writer.write(len)?;
        }
    } else {
        writer.write(lengths.len() as u64)?;
        for (sym,len) in lengths {
            writer.write(*sym)?;
            writer.write(*len as u8)?;
        }
    }
    Ok(())
}

/// Read the lengths back, symbols without a code are left out.
pub fn read_lengths<T: Symbol,I: Iterator<Item=u8>>(reader: &mut BitReader<I>) -> Result<Vec<(T,u32)>,Error> {
    let mut ans = Vec::new();
    if T::DENSE_HEADER {
        for i in 0..T::ALPHABET_SIZE {
            let len: u8 = reader.read()?;
            if len > 0 {
                ans.push((T::from_index(i),len as u32));
            }
        }
    } else {
        let count: u64 = reader.read()?;
        for _i in 0..count {
            let sym: T = reader.read()?;
            let len: u8 = reader.read()?;
            ans.push((sym,len as u32));
        }
    }
    Ok(ans)
}

/// Size of the header at the start of `block` in bytes.
pub fn header_len<T: Symbol>(block: &[u8]) -> Result<usize,Error> {
    if T::DENSE_HEADER {
        return Ok(T::ALPHABET_SIZE);
    }
    let mut reader = BitReader::new(block.iter().copied());
    let count: u64 = reader.read()?;
    Ok(8 + count as usize * (<T as crate::tools::bit_stream::Word>::BYTES + 1))
}

#[test]
fn dense_table() {
    let mut out: Vec<u8> = Vec::new();
    let mut writer = BitWriter::new(&mut out);
    write_lengths(&[(b'B',1),(b'A',2)],&mut writer).expect("write failed");
    drop(writer);
    assert_eq!(out.len(),256);
    assert_eq!(out[b'A' as usize],2);
    assert_eq!(out[b'B' as usize],1);
    assert_eq!(header_len::<u8>(&out).unwrap(),256);
    let mut reader = BitReader::new(out.iter().copied());
    let lengths: Vec<(u8,u32)> = read_lengths(&mut reader).expect("read failed");
    assert_eq!(lengths,vec![(b'A',2),(b'B',1)]);
}

#[test]
fn sparse_table() {
    let mut out: Vec<u8> = Vec::new();
    let mut writer = BitWriter::new(&mut out);
    write_lengths(&[(0x1234u16,1),(0x0005,2)],&mut writer).expect("write failed");
    drop(writer);
    assert_eq!(out,hex::decode("0200000000000000341201050002").unwrap());
    assert_eq!(header_len::<u16>(&out).unwrap(),14);
    let mut reader = BitReader::new(out.iter().copied());
    let lengths: Vec<(u16,u32)> = read_lengths(&mut reader).expect("read failed");
    assert_eq!(lengths,vec![(0x1234,1),(5,2)]);
}
