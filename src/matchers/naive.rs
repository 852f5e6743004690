//! Brute force matcher, tries every starting point in the dictionary

use super::{Match,Matcher};

#[derive(Clone,Copy,Debug,Default)]
pub struct NaiveMatcher;

impl NaiveMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl <T: PartialEq> Matcher<T> for NaiveMatcher {
    fn find_match(&mut self,dictionary: &[T],lookahead: &[T]) -> Match {
        let n = dictionary.len();
        let mut best = Match::default();
        for start in 0..n {
            let mut length = 0;
            while length < lookahead.len() && start + length < n && dictionary[start+length] == lookahead[length] {
                length += 1;
            }
            let mut candidate = Match::new(n - start,length);
            candidate.check_repetition(dictionary,lookahead);
            if candidate.length > best.length {
                best = candidate;
                if best.length == lookahead.len() {
                    break;
                }
            }
        }
        best
    }
}

#[cfg(test)]
fn check(dictionary: &str,lookahead: &str,expected: (usize,usize)) {
    let found = NaiveMatcher::new().find_match(dictionary.as_bytes(),lookahead.as_bytes());
    assert_eq!((found.position,found.length),expected,"dictionary {}, lookahead {}",dictionary,lookahead);
}

#[test]
fn text_matches() {
    check("ABC ABCDAB ABCDABCDABDE","ABCDABD",(8,7));
    check("GCATCGCAGAGAGTATACAGTACG","GCAGAGAG",(19,8));
    check("GCATGACATATGAGAGACGCTACG","GAGAGACG",(13,8));
}

#[test]
fn short_windows() {
    check("","aaca",(0,0));
    check("a","acaa",(1,1));
    check("aac","aaca",(3,4));
    check("caacab","caba",(3,3));
    check("abcaba","aac",(1,2));
    check("xyz","abc",(0,0));
}

#[test]
fn runs_into_lookahead() {
    check("abcd","cdcdcdcdc",(2,9));
    check("a","aaaaaaaa",(1,8));
}
