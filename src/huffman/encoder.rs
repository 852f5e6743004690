//! Huffman encoder, maps symbols to codes

use bit_vec::BitVec;
use std::collections::HashMap;
use std::io::Write;
use crate::tools::bit_stream::BitWriter;
use crate::tools::node_pool::Side;
use crate::huffman::HuffmanTree;
use crate::huffman::canonical::{canonical_codes,code_to_bits};
use crate::{Error,Symbol};

pub struct HuffmanEncoder<T: Symbol> {
    codebook: HashMap<T,BitVec>
}

impl <T: Symbol> HuffmanEncoder<T> {
    /// Collect the codes by walking the tree, left is 0 and right is 1.
    /// A tree with a single symbol gives that symbol the code `0`.
    pub fn from_tree(tree: &HuffmanTree<T>) -> Self {
        let mut codebook = HashMap::new();
        let nodes = tree.nodes();
        if let Some(root) = tree.root() {
            let mut stack = vec![(root,BitVec::new())];
            while let Some((curs,code)) = stack.pop() {
                if nodes.is_leaf(curs) {
                    let code = match code.is_empty() {
                        true => BitVec::from_elem(1,false),
                        false => code
                    };
                    codebook.insert(nodes.data(curs).symbol,code);
                    continue;
                }
                for (side,bit) in [(Side::Right,true),(Side::Left,false)] {
                    if let Some(child) = nodes.down(curs,side) {
                        let mut child_code = code.clone();
                        child_code.push(bit);
                        stack.push((child,child_code));
                    }
                }
            }
        }
        Self {
            codebook
        }
    }
    pub fn from_codebook(codebook: HashMap<T,BitVec>) -> Self {
        Self {
            codebook
        }
    }
    /// Replace the codes with canonical codes of the same lengths.
    pub fn make_canonical(&mut self) -> Result<(),Error> {
        let codes = canonical_codes(&self.lengths())?;
        self.codebook.clear();
        for (sym,code,len) in codes {
            self.codebook.insert(sym,code_to_bits(code,len));
        }
        Ok(())
    }
    /// Code lengths in canonical order.
    pub fn lengths(&self) -> Vec<(T,u32)> {
        let mut ans: Vec<(T,u32)> = self.codebook.iter().map(|(sym,code)| (*sym,code.len() as u32)).collect();
        ans.sort_by_key(|(sym,len)| (*len,*sym));
        ans
    }
    pub fn code(&self,symbol: T) -> Option<&BitVec> {
        self.codebook.get(&symbol)
    }
    pub fn codebook(&self) -> &HashMap<T,BitVec> {
        &self.codebook
    }
    /// Number of payload bits needed to encode the symbols counted by the tree.
    pub fn encoded_bits(&self,tree: &HuffmanTree<T>) -> u64 {
        tree.frequencies().iter().map(|(sym,freq)| {
            match self.codebook.get(sym) {
                Some(code) => code.len() as u64 * freq,
                None => 0
            }
        }).sum()
    }
    /// Write the code of each symbol, returns the number of symbols.
    pub fn encode<I: IntoIterator<Item=T>,W: Write>(&self,symbols: I,writer: &mut BitWriter<W>) -> Result<usize,Error> {
        let mut count = 0;
        for sym in symbols {
            match self.codebook.get(&sym) {
                Some(code) => writer.write_bitset(code)?,
                None => {
                    log::error!("no code for symbol {:?}",sym);
                    return Err(Error::BadCode);
                }
            }
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
fn bits(s: &str) -> BitVec {
    s.chars().map(|c| c == '1').collect()
}

#[test]
fn canonical_codebook() {
    let mut codebook = HashMap::new();
    codebook.insert(b'D',bits("100"));
    codebook.insert(b'B',bits("0"));
    codebook.insert(b'A',bits("11"));
    codebook.insert(b'C',bits("101"));
    let mut encoder = HuffmanEncoder::from_codebook(codebook);
    encoder.make_canonical().expect("canonical failed");
    assert_eq!(encoder.code(b'B'),Some(&bits("0")));
    assert_eq!(encoder.code(b'A'),Some(&bits("10")));
    assert_eq!(encoder.code(b'C'),Some(&bits("110")));
    assert_eq!(encoder.code(b'D'),Some(&bits("111")));
}

#[test]
fn classic_code_lengths() {
    let text = "this is an example of a huffman tree";
    let tree = HuffmanTree::from_symbols(text.bytes());
    let encoder = HuffmanEncoder::from_tree(&tree);
    assert_eq!(encoder.codebook().len(),16);
    assert_eq!(encoder.code(b' ').unwrap().len(),3);
    assert_eq!(encoder.code(b'x').unwrap().len(),5);
    // complete prefix code
    let kraft: f64 = encoder.lengths().iter().map(|(_,len)| 0.5f64.powi(*len as i32)).sum();
    assert_eq!(kraft,1.0);
    assert_eq!(encoder.encoded_bits(&tree),135);
}

#[test]
fn single_symbol_gets_a_bit() {
    let tree = HuffmanTree::from_symbols("aaaa".bytes());
    let encoder = HuffmanEncoder::from_tree(&tree);
    assert_eq!(encoder.code(b'a'),Some(&bits("0")));
    assert_eq!(encoder.encoded_bits(&tree),4);
}

#[test]
fn unknown_symbol() {
    let tree = HuffmanTree::from_symbols("ab".bytes());
    let encoder = HuffmanEncoder::from_tree(&tree);
    let mut out: Vec<u8> = Vec::new();
    let mut writer = BitWriter::new(&mut out);
    assert!(matches!(encoder.encode("abc".bytes(),&mut writer),Err(Error::BadCode)));
}
