//! Sliding window for LZ type encoders
//!
//! The dictionary and the lookahead buffer are adjacent ranges of the input,
//! so a match may run from the dictionary straight into the lookahead.

pub struct Window<'a,T> {
    data: &'a [T],
    dictionary_begin: usize,
    lookahead_begin: usize,
    lookahead_end: usize,
    max_dictionary_size: usize,
    max_lookahead_buffer_size: usize
}

impl <'a,T: Copy> Window<'a,T> {
    pub fn new(data: &'a [T],max_dictionary_size: usize,max_lookahead_buffer_size: usize) -> Self {
        Self {
            data,
            dictionary_begin: 0,
            lookahead_begin: 0,
            lookahead_end: 0,
            max_dictionary_size,
            max_lookahead_buffer_size
        }
    }
    pub fn dictionary(&self) -> &'a [T] {
        &self.data[self.dictionary_begin..self.lookahead_begin]
    }
    pub fn lookahead(&self) -> &'a [T] {
        &self.data[self.lookahead_begin..self.lookahead_end]
    }
    /// true if input remains beyond the lookahead buffer
    pub fn has_more_symbols(&self) -> bool {
        self.lookahead_end < self.data.len()
    }
    /// true once every symbol has passed through the lookahead buffer
    pub fn is_empty(&self) -> bool {
        self.lookahead_begin >= self.data.len()
    }
    /// Top up the lookahead buffer to its maximum size, or to the end of input.
    pub fn fill_lookahead_buffer(&mut self) {
        let target = self.lookahead_begin + self.max_lookahead_buffer_size;
        self.lookahead_end = usize::max(self.lookahead_end,usize::min(target,self.data.len()));
    }
    /// Grow the lookahead buffer by one symbol beyond its maximum.
    pub fn load_one_more(&mut self) {
        if self.has_more_symbols() {
            self.lookahead_end += 1;
        }
    }
    /// Move `count` symbols from the lookahead buffer into the dictionary,
    /// dropping the oldest dictionary entries.
    pub fn slide(&mut self,count: usize) {
        self.lookahead_begin = usize::min(self.lookahead_begin + count,self.data.len());
        self.lookahead_end = usize::max(self.lookahead_end,self.lookahead_begin);
        if self.lookahead_begin - self.dictionary_begin > self.max_dictionary_size {
            self.dictionary_begin = self.lookahead_begin - self.max_dictionary_size;
        }
    }
}

#[test]
fn slide_and_fill() {
    let input = "aacaacabcabaaac".as_bytes();
    let mut window = Window::new(input,6,4);
    assert!(window.dictionary().is_empty());
    window.fill_lookahead_buffer();
    assert_eq!(window.lookahead(),"aaca".as_bytes());
    window.slide(3);
    window.fill_lookahead_buffer();
    assert_eq!(window.dictionary(),"aac".as_bytes());
    assert_eq!(window.lookahead(),"aaca".as_bytes());
    window.load_one_more();
    assert_eq!(window.lookahead(),"aacab".as_bytes());
    window.slide(5);
    window.fill_lookahead_buffer();
    assert_eq!(window.dictionary(),"caacab".as_bytes());
    assert_eq!(window.lookahead(),"caba".as_bytes());
}

#[test]
fn end_of_input() {
    let input = [1u8,2,3];
    let mut window = Window::new(&input,2,8);
    window.fill_lookahead_buffer();
    assert_eq!(window.lookahead(),&[1,2,3]);
    assert!(!window.has_more_symbols());
    window.load_one_more();
    assert_eq!(window.lookahead().len(),3);
    window.slide(3);
    assert!(window.is_empty());
    assert_eq!(window.dictionary(),&[2,3]);
}
