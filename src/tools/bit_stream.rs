//! Bit level reading and writing
//!
//! Bits are packed MSB first.  Values written at the full width of their type
//! are split into little endian bytes, each byte again MSB first.  When the
//! stream happens to be byte aligned those bytes are moved directly.

use bit_vec::BitVec;
use std::io::Write;
use crate::Error;

/// Unsigned integers that can be moved through a bit stream at full width.
pub trait Word: Copy {
    /// size of the type in bytes
    const BYTES: usize;
    fn to_bits(self) -> u64;
    fn from_bits(bits: u64) -> Self;
}

macro_rules! impl_word {
    ($($t:ty),*) => {
        $(impl Word for $t {
            const BYTES: usize = std::mem::size_of::<$t>();
            fn to_bits(self) -> u64 {
                self as u64
            }
            fn from_bits(bits: u64) -> Self {
                bits as $t
            }
        })*
    };
}

impl_word!(u8,u16,u32,u64);

/// Packs bits into bytes and forwards complete bytes to a sink.
pub struct BitWriter<W: Write> {
    sink: W,
    buffer: u8,
    /// bits still free in `buffer`, 8 means nothing is pending
    count: u8
}

impl <W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            buffer: 0,
            count: 8
        }
    }
    /// true if no bits are waiting to be written
    pub fn is_empty(&self) -> bool {
        self.count == 8
    }
    pub fn write_bit(&mut self,bit: bool) -> Result<(),Error> {
        self.buffer = (self.buffer << 1) | bit as u8;
        self.count -= 1;
        if self.count == 0 {
            self.sink.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.count = 8;
        }
        Ok(())
    }
    /// Write the `bits` least significant bits of `value`, most significant first.
    pub fn write_bits(&mut self,value: u64,bits: u32) -> Result<(),Error> {
        debug_assert!(bits <= 64);
        for i in (0..bits).rev() {
            self.write_bit((value >> i) & 1 == 1)?;
        }
        Ok(())
    }
    /// Write a value using the full width of its type.
    pub fn write<V: Word>(&mut self,value: V) -> Result<(),Error> {
        let bytes = value.to_bits().to_le_bytes();
        if self.is_empty() {
            self.sink.write_all(&bytes[0..V::BYTES])?;
            return Ok(());
        }
        for byte in &bytes[0..V::BYTES] {
            self.write_bits(*byte as u64,8)?;
        }
        Ok(())
    }
    /// Write a code that is already expanded into bits.
    pub fn write_bitset(&mut self,bits: &BitVec) -> Result<(),Error> {
        for bit in bits.iter() {
            self.write_bit(bit)?;
        }
        Ok(())
    }
    /// Push out any pending bits, padding the last byte with zeros.
    pub fn flush(&mut self) -> Result<(),Error> {
        if !self.is_empty() {
            self.buffer <<= self.count;
            self.sink.write_all(&[self.buffer])?;
            self.buffer = 0;
            self.count = 8;
        }
        Ok(())
    }
}

impl <W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            log::error!("bits lost while dropping writer: {}",e);
        }
    }
}

/// Unpacks bits from a source of bytes.
pub struct BitReader<I: Iterator<Item=u8>> {
    source: std::iter::Peekable<I>,
    buffer: u8,
    /// bits still unread in `buffer`
    count: u8,
    consumed: usize
}

impl <I: Iterator<Item=u8>> BitReader<I> {
    pub fn new<S: IntoIterator<IntoIter=I>>(source: S) -> Self {
        Self {
            source: source.into_iter().peekable(),
            buffer: 0,
            count: 0,
            consumed: 0
        }
    }
    /// true if no bits are buffered (the source may still have more)
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
    /// true while there is anything left to read, buffered or not
    pub fn has_more(&mut self) -> bool {
        self.count > 0 || self.source.peek().is_some()
    }
    /// number of bytes pulled from the source so far
    pub fn bytes_read(&self) -> usize {
        self.consumed
    }
    fn next_byte(&mut self) -> Result<u8,Error> {
        match self.source.next() {
            Some(byte) => {
                self.consumed += 1;
                Ok(byte)
            },
            None => Err(Error::UnexpectedEnd)
        }
    }
    pub fn read_bit(&mut self) -> Result<bool,Error> {
        if self.count == 0 {
            self.buffer = self.next_byte()?;
            self.count = 8;
        }
        self.count -= 1;
        Ok((self.buffer >> self.count) & 1 == 1)
    }
    /// Read `bits` bits into the least significant end of the result.
    pub fn read_bits(&mut self,bits: u32) -> Result<u64,Error> {
        debug_assert!(bits <= 64);
        let mut ans: u64 = 0;
        for _i in 0..bits {
            ans = (ans << 1) | self.read_bit()? as u64;
        }
        Ok(ans)
    }
    /// Read a value using the full width of its type.
    pub fn read<V: Word>(&mut self) -> Result<V,Error> {
        let mut ans: u64 = 0;
        for i in 0..V::BYTES {
            let byte = match self.is_empty() {
                true => self.next_byte()? as u64,
                false => self.read_bits(8)?
            };
            ans |= byte << (8*i);
        }
        Ok(V::from_bits(ans))
    }
}

#[test]
fn single_bit_lands_on_the_left() {
    for i in 1..8 {
        let mut out: Vec<u8> = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        writer.write_bits(1,i).expect("write failed");
        writer.flush().expect("flush failed");
        drop(writer);
        assert_eq!(out,vec![128 >> (i-1)]);
    }
}

#[test]
fn variable_widths_read_back() {
    let mut out: Vec<u8> = Vec::new();
    let mut writer = BitWriter::new(&mut out);
    for val in 0..=8 {
        writer.write_bits(val,val as u32).expect("write failed");
    }
    drop(writer);
    let mut reader = BitReader::new(out.iter().copied());
    for val in 0..=8 {
        assert_eq!(reader.read_bits(val as u32).expect("read failed"),val);
    }
}

#[test]
fn full_width_is_little_endian() {
    let mut out: Vec<u8> = Vec::new();
    let mut writer = BitWriter::new(&mut out);
    writer.write(0x0102u16).expect("write failed");
    writer.write_bit(true).expect("write failed");
    writer.write(0x0304u16).expect("write failed");
    drop(writer);
    assert_eq!(out,hex::decode("0201820180").unwrap());
    let mut reader = BitReader::new(out.iter().copied());
    assert_eq!(reader.read::<u16>().unwrap(),0x0102);
    assert!(reader.read_bit().unwrap());
    assert_eq!(reader.read::<u16>().unwrap(),0x0304);
}

#[test]
fn reader_exhaustion() {
    let data = [0xa5u8];
    let mut reader = BitReader::new(data.iter().copied());
    assert!(reader.has_more());
    assert!(reader.is_empty());
    assert_eq!(reader.read_bits(4).unwrap(),0xa);
    assert!(!reader.is_empty());
    assert_eq!(reader.read_bits(4).unwrap(),0x5);
    assert!(!reader.has_more());
    assert_eq!(reader.bytes_read(),1);
    assert!(matches!(reader.read_bit(),Err(Error::UnexpectedEnd)));
}
