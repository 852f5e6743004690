//! Huffman tree built from symbol frequencies

use std::cmp::Reverse;
use std::collections::{BinaryHeap,HashMap};
use crate::tools::node_pool::Tree;
use crate::Symbol;

/// Payload of a Huffman tree node.
/// The stored value is a weight while a tree is built from frequencies,
/// and a code length once the tree is rebuilt from canonical codes.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct HuffmanData<T> {
    pub symbol: T,
    value: u64
}

impl <T: Symbol> HuffmanData<T> {
    pub fn with_weight(symbol: T,weight: u64) -> Self {
        Self {
            symbol,
            value: weight
        }
    }
    pub fn with_length(symbol: T,length: u32) -> Self {
        Self {
            symbol,
            value: length as u64
        }
    }
    pub fn weight(&self) -> u64 {
        self.value
    }
    pub fn length(&self) -> u32 {
        self.value as u32
    }
}

pub struct HuffmanTree<T: Symbol> {
    nodes: Tree<HuffmanData<T>>,
    root: Option<usize>,
    frequencies: HashMap<T,u64>
}

impl <T: Symbol> HuffmanTree<T> {
    /// Count the symbols and merge the two lightest nodes until one is left.
    /// Equal weights are ordered by the smallest symbol under each node, so the
    /// same input always gives the same tree.
    pub fn from_symbols<I: IntoIterator<Item=T>>(symbols: I) -> Self {
        let mut frequencies: HashMap<T,u64> = HashMap::new();
        for sym in symbols {
            *frequencies.entry(sym).or_insert(0) += 1;
        }
        let mut nodes = Tree::with_capacity(2*frequencies.len());
        let mut queue = BinaryHeap::new();
        for (sym,freq) in frequencies.iter() {
            let leaf = nodes.spawn(HuffmanData::with_weight(*sym,*freq));
            queue.push(Reverse((*freq,*sym,leaf)));
        }
        while queue.len() > 1 {
            if let (Some(Reverse((w1,s1,left))),Some(Reverse((w2,s2,right)))) = (queue.pop(),queue.pop()) {
                let parent = nodes.join(HuffmanData::with_weight(T::zero(),w1+w2),left,right);
                queue.push(Reverse((w1+w2,std::cmp::min(s1,s2),parent)));
            }
        }
        let root = queue.pop().map(|Reverse((_,_,idx))| idx);
        log::debug!("Huffman tree has {} symbols in {} nodes",frequencies.len(),nodes.len());
        Self {
            nodes,
            root,
            frequencies
        }
    }
    pub fn root(&self) -> Option<usize> {
        self.root
    }
    pub fn nodes(&self) -> &Tree<HuffmanData<T>> {
        &self.nodes
    }
    /// how many times the symbol occurred, 0 if it never did
    pub fn frequency(&self,symbol: T) -> u64 {
        match self.frequencies.get(&symbol) {
            Some(freq) => *freq,
            None => 0
        }
    }
    pub fn frequencies(&self) -> &HashMap<T,u64> {
        &self.frequencies
    }
}

#[test]
fn weights_add_up() {
    let tree = HuffmanTree::from_symbols("abracadabra".bytes());
    assert_eq!(tree.frequency(b'a'),5);
    assert_eq!(tree.frequency(b'r'),2);
    assert_eq!(tree.frequency(b'z'),0);
    let root = tree.root().unwrap();
    assert_eq!(tree.nodes().data(root).weight(),11);
    assert_eq!(tree.nodes().len(),9);
}

#[test]
fn empty_and_single() {
    let tree: HuffmanTree<u8> = HuffmanTree::from_symbols(Vec::new());
    assert_eq!(tree.root(),None);
    let tree = HuffmanTree::from_symbols("zzz".bytes());
    let root = tree.root().unwrap();
    assert!(tree.nodes().is_leaf(root));
    assert_eq!(tree.nodes().data(root).symbol,b'z');
}
