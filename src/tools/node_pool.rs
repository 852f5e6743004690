//! Binary tree stored in a pool of nodes
//!
//! Nodes refer to each other by index into the pool, there are no parent
//! links.  A node is a leaf when neither branch is attached.

#[derive(Clone,Copy,PartialEq,Eq,Debug)]
pub enum Side {
    Left,
    Right
}

impl Side {
    /// left is the 0 branch, right is the 1 branch
    pub fn from_bit(bit: bool) -> Self {
        match bit {
            false => Side::Left,
            true => Side::Right
        }
    }
}

struct Node<D> {
    data: D,
    down: [Option<usize>;2]
}

pub struct Tree<D> {
    pool: Vec<Node<D>>
}

impl <D> Tree<D> {
    pub fn new() -> Self {
        Self {
            pool: Vec::new()
        }
    }
    pub fn with_capacity(n: usize) -> Self {
        Self {
            pool: Vec::with_capacity(n)
        }
    }
    pub fn len(&self) -> usize {
        self.pool.len()
    }
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
    /// Put a detached node in the pool and return its index.
    pub fn spawn(&mut self,data: D) -> usize {
        self.pool.push(Node {
            data,
            down: [None,None]
        });
        self.pool.len() - 1
    }
    /// Create a parent for two existing nodes.
    pub fn join(&mut self,data: D,left: usize,right: usize) -> usize {
        let parent = self.spawn(data);
        self.pool[parent].down = [Some(left),Some(right)];
        parent
    }
    pub fn down(&self,curs: usize,side: Side) -> Option<usize> {
        self.pool[curs].down[side as usize]
    }
    /// Go down on `side`, creating the node if it is missing.
    pub fn down_or_spawn<F: FnOnce() -> D>(&mut self,curs: usize,side: Side,make: F) -> usize {
        match self.down(curs,side) {
            Some(child) => child,
            None => {
                let child = self.spawn(make());
                self.pool[curs].down[side as usize] = Some(child);
                child
            }
        }
    }
    pub fn is_leaf(&self,curs: usize) -> bool {
        self.pool[curs].down == [None,None]
    }
    pub fn data(&self,curs: usize) -> &D {
        &self.pool[curs].data
    }
    pub fn data_mut(&mut self,curs: usize) -> &mut D {
        &mut self.pool[curs].data
    }
}

impl <D> Default for Tree<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn join_and_walk() {
    let mut tree: Tree<char> = Tree::new();
    let a = tree.spawn('a');
    let b = tree.spawn('b');
    let root = tree.join('*',a,b);
    assert_eq!(tree.len(),3);
    assert!(!tree.is_leaf(root));
    assert_eq!(tree.down(root,Side::Left),Some(a));
    assert_eq!(*tree.data(tree.down(root,Side::Right).unwrap()),'b');
    assert!(tree.is_leaf(a));
    assert_eq!(tree.down(a,Side::Left),None);
}

#[test]
fn lazy_branches() {
    let mut tree: Tree<u8> = Tree::new();
    let root = tree.spawn(0);
    let l = tree.down_or_spawn(root,Side::from_bit(false),|| 1);
    let again = tree.down_or_spawn(root,Side::Left,|| 2);
    assert_eq!(l,again);
    assert_eq!(*tree.data(l),1);
    *tree.data_mut(l) = 5;
    assert_eq!(*tree.data(again),5);
    assert_eq!(tree.down(root,Side::Right),None);
}
