//! Canonical Huffman codes
//!
//! Codes are assigned in order of (length, symbol).  The first code is all
//! zeros, each following code is the previous one plus one, shifted left when
//! the length grows.  Only the lengths need to be transmitted.

use bit_vec::BitVec;
use crate::tools::node_pool::{Tree,Side};
use crate::huffman::HuffmanData;
use crate::{Error,Symbol};

/// Longest code that fits in the integer used to count codes up.
pub const MAX_CODE_LENGTH: u32 = 64;

/// Sort (symbol, length) pairs into canonical order and assign codes.
/// Zero lengths are dropped.  Returns (symbol, code, length) with the code in
/// the low bits.
pub fn canonical_codes<T: Symbol>(lengths: &[(T,u32)]) -> Result<Vec<(T,u64,u32)>,Error> {
    let mut sorted: Vec<(T,u32)> = lengths.iter().filter(|(_,len)| *len > 0).copied().collect();
    sorted.sort_by_key(|(sym,len)| (*len,*sym));
    let mut ans = Vec::with_capacity(sorted.len());
    let mut code: u64 = 0;
    let mut current_length = 0;
    for (sym,len) in sorted {
        if len > MAX_CODE_LENGTH {
            log::error!("code length {} exceeds {}",len,MAX_CODE_LENGTH);
            return Err(Error::CodeTooLong);
        }
        code = code.checked_shl(len - current_length).unwrap_or(0);
        ans.push((sym,code,len));
        code = code.wrapping_add(1);
        current_length = len;
    }
    Ok(ans)
}

/// expand the `len` low bits of `code` into a bit vector, MSB first
pub fn code_to_bits(code: u64,len: u32) -> BitVec {
    let mut ans = BitVec::with_capacity(len as usize);
    for i in (0..len).rev() {
        ans.push((code >> i) & 1 == 1);
    }
    ans
}

/// Decoding tree rebuilt from code lengths
pub struct CanonicalHuffmanTree<T: Symbol> {
    nodes: Tree<HuffmanData<T>>,
    root: usize,
    symbols: usize
}

impl <T: Symbol> CanonicalHuffmanTree<T> {
    /// Walk each canonical code from the root, creating nodes as needed,
    /// and hang the symbol on the node where the code ends.
    pub fn from_lengths(lengths: &[(T,u32)]) -> Result<Self,Error> {
        let codes = canonical_codes(lengths)?;
        let mut nodes = Tree::with_capacity(2*codes.len()+1);
        let root = nodes.spawn(HuffmanData::with_length(T::zero(),0));
        for (sym,code,len) in codes.iter() {
            let mut curs = root;
            for depth in 1..=*len {
                let bit = (code >> (len - depth)) & 1 == 1;
                curs = nodes.down_or_spawn(curs,Side::from_bit(bit),|| HuffmanData::with_length(T::zero(),depth));
            }
            *nodes.data_mut(curs) = HuffmanData::with_length(*sym,*len);
        }
        Ok(Self {
            nodes,
            root,
            symbols: codes.len()
        })
    }
    pub fn root(&self) -> usize {
        self.root
    }
    pub fn nodes(&self) -> &Tree<HuffmanData<T>> {
        &self.nodes
    }
    /// number of symbols that have a code
    pub fn symbols(&self) -> usize {
        self.symbols
    }
}

#[test]
fn canonical_order() {
    let lengths = vec![(b'D',3),(b'B',1),(b'A',2),(b'C',3),(b'E',0)];
    let codes = canonical_codes(&lengths).expect("canonical codes failed");
    assert_eq!(codes,vec![(b'B',0b0,1),(b'A',0b10,2),(b'C',0b110,3),(b'D',0b111,3)]);
    assert!(code_to_bits(0b110,3).eq_vec(&[true,true,false]));
    assert!(code_to_bits(0b01,2).eq_vec(&[false,true]));
}

#[test]
fn tree_from_lengths() {
    let lengths = vec![(b'D',3),(b'B',1),(b'A',2),(b'C',3)];
    let tree = CanonicalHuffmanTree::from_lengths(&lengths).expect("tree failed");
    let nodes = tree.nodes();
    assert_eq!(tree.symbols(),4);
    let b = nodes.down(tree.root(),Side::Left).unwrap();
    assert!(nodes.is_leaf(b));
    assert_eq!(nodes.data(b).symbol,b'B');
    let one = nodes.down(tree.root(),Side::Right).unwrap();
    let a = nodes.down(one,Side::Left).unwrap();
    assert_eq!(nodes.data(a).symbol,b'A');
    assert_eq!(nodes.data(a).length(),2);
    let d = nodes.down(nodes.down(one,Side::Right).unwrap(),Side::Right).unwrap();
    assert_eq!(nodes.data(d).symbol,b'D');
}

#[test]
fn overlong_code() {
    let lengths = vec![(1u16,65)];
    assert!(matches!(canonical_codes(&lengths),Err(Error::CodeTooLong)));
}
