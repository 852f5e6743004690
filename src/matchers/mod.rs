//! Longest match search
//!
//! A matcher looks for the longest prefix of the lookahead buffer that also
//! starts somewhere in the dictionary.  The match may continue past the end of
//! the dictionary into the lookahead buffer itself, which is how long runs get
//! encoded with a short distance.

pub mod naive;
pub mod boyer_moore;

pub use naive::NaiveMatcher;
pub use boyer_moore::BoyerMooreMatcher;

/// Result of a dictionary search
#[derive(Clone,Copy,Debug,Default,PartialEq,Eq)]
pub struct Match {
    /// distance back from the end of the dictionary, 1 is the last symbol, 0 means no match
    pub position: usize,
    /// number of symbols matched
    pub length: usize
}

impl Match {
    pub fn new(position: usize,length: usize) -> Self {
        Self {
            position,
            length
        }
    }
    /// If the match reaches the end of the dictionary, keep extending it by
    /// re-reading the matched region as if it repeated forever.
    pub fn check_repetition<T: PartialEq>(&mut self,dictionary: &[T],lookahead: &[T]) {
        if self.length == 0 || self.position != self.length || self.position > dictionary.len() {
            return;
        }
        let region = &dictionary[dictionary.len()-self.position..];
        while self.length < lookahead.len() && lookahead[self.length] == region[self.length % self.position] {
            self.length += 1;
        }
    }
}

/// Strategy for finding the longest match of the lookahead buffer.
/// Ties go to the match found first in the strategy's own scan order.
pub trait Matcher<T> {
    fn find_match(&mut self,dictionary: &[T],lookahead: &[T]) -> Match;
}

/// Selects a matcher at runtime
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum MatcherKind {
    Naive,
    BoyerMoore
}

#[test]
fn repetition() {
    let mut m = Match::new(2,2);
    m.check_repetition("abcd".as_bytes(),"cdcdcdcdc".as_bytes());
    assert_eq!(m,Match::new(2,9));
    let mut m = Match::new(3,2);
    m.check_repetition("abcab".as_bytes(),"abab".as_bytes());
    assert_eq!(m,Match::new(3,2));
}
