use std::fmt::{Display, Formatter};
use std::fmt;
use std::str::FromStr;

use crate::error::ConstructionError;
use crate::syntax::END_MARKER;
use crate::util::char_range_inclusive;

/// An ordered set of input characters, one leaf will be created for each of them.
/// The order is the insertion order (it decides the leaf positions), duplicates are dropped.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CharClass {
    chars: Vec<char>,
}

impl CharClass {
    pub fn new() -> Self {
        CharClass { chars: vec![] }
    }

    pub fn from_ranges(ranges: &[(char, char)]) -> Result<Self, ConstructionError> {
        ranges.iter().try_fold(CharClass::new(), |class, &(from, to)| class.with_range(from, to))
    }

    pub fn with_range(mut self, from: char, to: char) -> Result<Self, ConstructionError> {
        check_symbol(from)?;
        check_symbol(to)?;
        if from > to {
            return Err(ConstructionError::InvalidArgument(format!("reversed range {:?}-{:?}", from, to)));
        }
        for ch in char_range_inclusive(from, to) {
            self.push_checked(ch)?;
        }
        Ok(self)
    }

    pub fn with_chars(mut self, chars: &str) -> Result<Self, ConstructionError> {
        for ch in chars.chars() {
            self.push_checked(ch)?;
        }
        Ok(self)
    }

    /// Characters allowed at the start of a Java identifier: `A-Za-z_`
    pub fn identifier_start() -> Self {
        let mut class = CharClass::new();
        class.extend(char_range_inclusive('A', 'Z'));
        class.extend(char_range_inclusive('a', 'z'));
        class.extend("_".chars());
        class
    }

    /// Characters allowed after the first one in a Java identifier: `A-Za-z_0-9`
    pub fn identifier_part() -> Self {
        let mut class = CharClass::identifier_start();
        class.extend(char_range_inclusive('0', '9'));
        class
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    fn push_checked(&mut self, ch: char) -> Result<(), ConstructionError> {
        check_symbol(ch)?;
        if !self.chars.contains(&ch) {
            self.chars.push(ch);
        }
        Ok(())
    }

    // Only for characters known to be valid
    fn extend(&mut self, chars: impl Iterator<Item = char>) {
        for ch in chars {
            if !self.chars.contains(&ch) {
                self.chars.push(ch);
            }
        }
    }
}

/// A symbol can be used as input only if it's ASCII and it isn't the end marker.
pub(crate) fn check_symbol(ch: char) -> Result<(), ConstructionError> {
    if ch == END_MARKER {
        Err(ConstructionError::InvalidArgument(format!("the end marker {:?} can't be used as input", ch)))
    } else if !ch.is_ascii() {
        Err(ConstructionError::InvalidArgument(format!("non ASCII symbol {:?}", ch)))
    } else {
        Ok(())
    }
}

impl FromStr for CharClass {
    type Err = ConstructionError;

    /// Parses descriptions like `A-Za-z_`: `x-y` is an inclusive range, everything else
    /// (including a leading or trailing `-`) is a literal character.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.is_empty() {
            return Err(ConstructionError::InvalidArgument("empty character class".to_string()));
        }

        let mut class = CharClass::new();
        let mut index = 0;
        while index < chars.len() {
            let ch = chars[index];
            if index + 2 < chars.len() && chars[index + 1] == '-' {
                class = class.with_range(ch, chars[index + 2])?;
                index += 3;
            } else {
                class.push_checked(ch)?;
                index += 1;
            }
        }
        Ok(class)
    }
}

impl Display for CharClass {
    /// Writes the class back in the range notation, merging runs of consecutive characters.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut index = 0;
        while index < self.chars.len() {
            let start = self.chars[index];
            let mut end = index;
            while end + 1 < self.chars.len() && self.chars[end + 1] as u32 == self.chars[end] as u32 + 1 {
                end += 1;
            }
            if end - index >= 2 {
                write!(f, "{}-{}", start, self.chars[end])?;
            } else {
                for ch in &self.chars[index..=end] {
                    write!(f, "{}", ch)?;
                }
            }
            index = end + 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ConstructionError;
    use crate::syntax::CharClass;

    #[test]
    fn test_identifier_classes() {
        let start = CharClass::identifier_start();
        assert_eq!(start.len(), 53);
        assert_eq!(start.chars()[0], 'A');
        assert_eq!(start.chars()[26], 'a');
        assert_eq!(start.chars()[52], '_');

        let part = CharClass::identifier_part();
        assert_eq!(part.len(), 63);
        assert_eq!(part.chars()[53], '0');
        assert!(!part.contains('#'));
    }

    #[test]
    fn test_parse() {
        let class: CharClass = "A-Za-z_".parse().unwrap();
        assert_eq!(class, CharClass::identifier_start());
        let class: CharClass = "A-Za-z_0-9".parse().unwrap();
        assert_eq!(class, CharClass::identifier_part());

        let class: CharClass = "-ab-".parse().unwrap();
        assert_eq!(class.chars(), &['-', 'a', 'b']);
        let class: CharClass = "aab".parse().unwrap();
        assert_eq!(class.chars(), &['a', 'b']);
    }

    #[test]
    fn test_display() {
        assert_eq!(CharClass::identifier_part().to_string(), "A-Za-z_0-9");
        let class: CharClass = "abx".parse().unwrap();
        assert_eq!(class.to_string(), "abx");
    }

    #[test]
    fn test_errors() {
        assert!(matches!("".parse::<CharClass>(), Err(ConstructionError::InvalidArgument(_))));
        assert!(matches!("z-a".parse::<CharClass>(), Err(ConstructionError::InvalidArgument(_))));
        assert!(matches!("a#".parse::<CharClass>(), Err(ConstructionError::InvalidArgument(_))));
        assert!(matches!("ä".parse::<CharClass>(), Err(ConstructionError::InvalidArgument(_))));
        assert!(matches!(CharClass::from_ranges(&[('a', 'c'), ('!', '$')]), Err(ConstructionError::InvalidArgument(_))));
    }
}
