//! Ring buffer holding the recent history of an LZ type decoder
use num_traits::PrimInt;

pub struct RingBuffer<T: PrimInt> {
    buf: Vec<T>,
    pos: usize,
    n: usize,
    /// how many slots hold real history
    filled: usize
}

impl <T: PrimInt> RingBuffer<T> {
    /// Create a buffer of `n` slots, `n` must be positive.
    pub fn create(fill: T,n: usize) -> Self {
        Self {
            buf: vec![fill;n],
            pos: 0,
            n,
            filled: 0
        }
    }
    /// number of values that have been pushed, up to the capacity
    pub fn len(&self) -> usize {
        self.filled
    }
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }
    pub fn capacity(&self) -> usize {
        self.n
    }
    /// get value at cursor + offset
    pub fn get(&self,offset: i64) -> T {
        self.buf[(self.pos as i64 + offset).rem_euclid(self.n as i64) as usize]
    }
    /// set value at cursor + offset
    pub fn set(&mut self,offset: i64,val: T) {
        self.buf[(self.pos as i64 + offset).rem_euclid(self.n as i64) as usize] = val;
    }
    /// advance cursor by 1
    pub fn advance(&mut self) {
        self.pos = (self.pos + 1) % self.n;
    }
    /// store a value at the cursor and advance, the oldest value falls off
    pub fn push(&mut self,val: T) {
        self.set(0,val);
        self.advance();
        self.filled = usize::min(self.filled + 1,self.n);
    }
    /// value that was pushed `distance` pushes ago, 1 is the most recent
    pub fn behind(&self,distance: usize) -> T {
        self.get(-(distance as i64))
    }
}

#[test]
fn offset() {
    let mut ring: RingBuffer<u8> = RingBuffer::create(0,4);
    for i in 1..=5 {
        ring.push(i);
    }
    // slots hold 5 2 3 4, cursor on the 2
    assert_eq!(ring.get(0),2);
    assert_eq!(ring.get(4),2);
    assert_eq!(ring.get(3),5);
    assert_eq!(ring.get(-4),2);
}

#[test]
fn history() {
    let mut ring: RingBuffer<u16> = RingBuffer::create(0,3);
    assert!(ring.is_empty());
    ring.push(10);
    ring.push(20);
    assert_eq!(ring.len(),2);
    assert_eq!(ring.behind(1),20);
    assert_eq!(ring.behind(2),10);
    ring.push(30);
    ring.push(40);
    assert_eq!(ring.len(),3);
    assert_eq!(ring.capacity(),3);
    assert_eq!(ring.behind(1),40);
    assert_eq!(ring.behind(3),20);
}
