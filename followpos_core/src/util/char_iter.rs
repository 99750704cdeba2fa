use std::iter::FusedIterator;

/// Creates an iterator from `from` to `to` with inclusive ends.
/// Only ASCII ranges are supported, the call panics if the range is reversed or leaves ASCII
/// (callers validate user supplied ranges before getting here).
pub fn char_range_inclusive(from: char, to: char) -> CharRange {
    assert!(from <= to, "Invalid range!");
    assert!(to.is_ascii(), "Non ASCII range!");
    CharRange { from: from as u8, to: to as u8, done: false }
}

pub struct CharRange {
    from: u8,
    to: u8,
    // `to` can be 127 so the bounds alone can't signal exhaustion without overflowing
    done: bool,
}

impl Iterator for CharRange {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None
        }
        let x = self.from;
        if self.from == self.to {
            self.done = true;
        } else {
            self.from += 1;
        }
        Some(char::from(x))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let x = self.len();
        (x, Some(x))
    }
}

impl ExactSizeIterator for CharRange {
    fn len(&self) -> usize {
        if self.done {
            0
        } else {
            (self.to - self.from) as usize + 1
        }
    }
}

impl FusedIterator for CharRange {}

impl DoubleEndedIterator for CharRange {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.done {
            return None
        }
        let x = self.to;
        if self.from == self.to {
            self.done = true;
        } else {
            self.to -= 1;
        }
        Some(char::from(x))
    }
}
