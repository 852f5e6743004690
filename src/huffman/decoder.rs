//! Huffman decoder, walks the canonical tree bit by bit

use crate::tools::bit_stream::BitReader;
use crate::tools::node_pool::Side;
use crate::huffman::CanonicalHuffmanTree;
use crate::{Error,Symbol};

pub struct HuffmanDecoder<'a,T: Symbol> {
    tree: &'a CanonicalHuffmanTree<T>
}

impl <'a,T: Symbol> HuffmanDecoder<'a,T> {
    pub fn new(tree: &'a CanonicalHuffmanTree<T>) -> Self {
        Self {
            tree
        }
    }
    /// Consume exactly `bits` bits, pushing a symbol each time a leaf is reached.
    /// Returns the number of symbols decoded.
    pub fn decode<I: Iterator<Item=u8>>(&self,reader: &mut BitReader<I>,bits: u64,output: &mut Vec<T>) -> Result<usize,Error> {
        let nodes = self.tree.nodes();
        let root = self.tree.root();
        let mut curs = root;
        let mut count = 0;
        for _i in 0..bits {
            let side = Side::from_bit(reader.read_bit()?);
            curs = match nodes.down(curs,side) {
                Some(child) => child,
                None => {
                    log::error!("Huffman code leads nowhere after {} symbols",count);
                    return Err(Error::BadCode);
                }
            };
            if nodes.is_leaf(curs) {
                output.push(nodes.data(curs).symbol);
                count += 1;
                curs = root;
            }
        }
        if curs != root {
            log::error!("Huffman stream ends inside a code");
            return Err(Error::BadCode);
        }
        Ok(count)
    }
}

#[test]
fn walk_codes() {
    let tree = CanonicalHuffmanTree::from_lengths(&[(b'B',1),(b'A',2),(b'C',3),(b'D',3)]).unwrap();
    let decoder = HuffmanDecoder::new(&tree);
    // B A C D B = 0 10 110 111 0, padded
    let data = [0b01011011u8,0b10000000];
    let mut out = Vec::new();
    let mut reader = BitReader::new(data.iter().copied());
    assert_eq!(decoder.decode(&mut reader,10,&mut out).unwrap(),5);
    assert_eq!(out,"BACDB".as_bytes());
}

#[test]
fn truncated_code() {
    let tree = CanonicalHuffmanTree::from_lengths(&[(b'B',1),(b'A',2),(b'C',3),(b'D',3)]).unwrap();
    let decoder = HuffmanDecoder::new(&tree);
    let data = [0b11000000u8];
    let mut out = Vec::new();
    let mut reader = BitReader::new(data.iter().copied());
    assert!(matches!(decoder.decode(&mut reader,2,&mut out),Err(Error::BadCode)));
    let mut reader = BitReader::new(data.iter().copied());
    assert!(matches!(decoder.decode(&mut reader,9,&mut out),Err(Error::UnexpectedEnd)));
}
