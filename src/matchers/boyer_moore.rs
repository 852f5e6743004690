//! Boyer-Moore matcher
//!
//! The lookahead buffer is reversed and used as the pattern, the dictionary is
//! read from its end toward its beginning.  Comparing the reversed pattern from
//! its last element is then the same as comparing the lookahead forward from a
//! dictionary position, so the usual bad character and good suffix shifts apply.
//! Text to the right of the dictionary is the lookahead itself, so runs that
//! overlap their own source are found in the same pass.
//!
//! Full matches can never be skipped.  Partial matches at skipped alignments can
//! be, so the result may be shorter than the brute force answer.

use super::{Match,Matcher};
use crate::Symbol;

const ABSENT: usize = usize::MAX;

pub struct BoyerMooreMatcher<T: Symbol> {
    /// distance from the last occurrence of a symbol to the end of the pattern
    bad_character: Vec<usize>,
    suffixes: Vec<usize>,
    good_suffix: Vec<usize>,
    _symbol: std::marker::PhantomData<T>
}

impl <T: Symbol> BoyerMooreMatcher<T> {
    pub fn new() -> Self {
        Self {
            bad_character: vec![ABSENT;T::ALPHABET_SIZE],
            suffixes: Vec::new(),
            good_suffix: Vec::new(),
            _symbol: std::marker::PhantomData
        }
    }
    fn prepare_bad_character(&mut self,lookahead: &[T]) {
        let m = lookahead.len();
        // reversed pattern element i is lookahead[m-1-i]
        for i in 0..m-1 {
            self.bad_character[lookahead[m-1-i].index()] = m - 1 - i;
        }
    }
    fn clear_bad_character(&mut self,lookahead: &[T]) {
        for sym in lookahead {
            self.bad_character[sym.index()] = ABSENT;
        }
    }
    fn prepare_suffixes(&mut self,lookahead: &[T]) {
        let m = lookahead.len();
        let pat = |i: usize| lookahead[m-1-i];
        self.suffixes.clear();
        self.suffixes.resize(m,0);
        self.suffixes[m-1] = m;
        let mut g = m as isize - 1;
        let mut f = m - 1;
        for i in (0..m-1).rev() {
            let ii = i as isize;
            if ii > g && (self.suffixes[i+m-1-f] as isize) < ii - g {
                self.suffixes[i] = self.suffixes[i+m-1-f];
            } else {
                if ii < g {
                    g = ii;
                }
                f = i;
                while g >= 0 && pat(g as usize) == pat(g as usize + m - 1 - f) {
                    g -= 1;
                }
                self.suffixes[i] = (f as isize - g) as usize;
            }
        }
    }
    fn prepare_good_suffix(&mut self,m: usize) {
        self.good_suffix.clear();
        self.good_suffix.resize(m,m);
        let mut j = 0;
        for i in (0..m).rev() {
            if self.suffixes[i] == i + 1 {
                while j < m - 1 - i {
                    if self.good_suffix[j] == m {
                        self.good_suffix[j] = m - 1 - i;
                    }
                    j += 1;
                }
            }
        }
        for i in 0..m-1 {
            self.good_suffix[m-1-self.suffixes[i]] = m - 1 - i;
        }
    }
    fn bad_character_shift(&self,sym: T,m: usize) -> usize {
        match self.bad_character[sym.index()] {
            ABSENT => m,
            d => d
        }
    }
}

impl <T: Symbol> Default for BoyerMooreMatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl <T: Symbol> Matcher<T> for BoyerMooreMatcher<T> {
    fn find_match(&mut self,dictionary: &[T],lookahead: &[T]) -> Match {
        let n = dictionary.len() as isize;
        let m = lookahead.len();
        if n == 0 || m == 0 {
            return Match::default();
        }
        self.prepare_bad_character(lookahead);
        self.prepare_suffixes(lookahead);
        self.prepare_good_suffix(m);
        let mi = m as isize;
        let pat = |i: isize| lookahead[m-1-i as usize];
        // k counts back from the last dictionary symbol, negative k runs into the lookahead
        let text = |k: isize| match k >= 0 {
            true => dictionary[(n-1-k) as usize],
            false => lookahead[(-k-1) as usize]
        };
        let mut best = Match::default();
        let mut j = 1 - mi;
        while j <= n - mi {
            let mut i = mi - 1;
            while i >= 0 && pat(i) == text(i+j) {
                i -= 1;
            }
            if i < 0 {
                best = Match::new((mi + j) as usize,m);
                break;
            }
            let length = (mi - 1 - i) as usize;
            if length > best.length {
                best = Match::new((mi + j) as usize,length);
            }
            let bc = self.bad_character_shift(text(i+j),m) as isize - mi + 1 + i;
            j += isize::max(self.good_suffix[i as usize] as isize,bc);
        }
        self.clear_bad_character(lookahead);
        log::trace!("boyer-moore match {:?}",best);
        best
    }
}

#[cfg(test)]
fn check(dictionary: &str,lookahead: &str,expected: (usize,usize)) {
    let mut matcher: BoyerMooreMatcher<u8> = BoyerMooreMatcher::new();
    let found = matcher.find_match(dictionary.as_bytes(),lookahead.as_bytes());
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

#[test]
fn tables_are_reusable() {
    let mut matcher: BoyerMooreMatcher<u8> = BoyerMooreMatcher::new();
    let first = matcher.find_match("caacab".as_bytes(),"caba".as_bytes());
    let second = matcher.find_match("caacab".as_bytes(),"caba".as_bytes());
    assert_eq!(first,second);
    let wide: Vec<u16> = vec![1000,2000,3000,1000,2000];
    let mut matcher: BoyerMooreMatcher<u16> = BoyerMooreMatcher::new();
    assert_eq!(matcher.find_match(&wide,&[1000,2000,4000]),Match::new(2,2));
}
