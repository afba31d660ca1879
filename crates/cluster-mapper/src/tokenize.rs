/// Splits text into word tokens.
pub trait Tokenizer {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Whitespace,
    Alphabetic,
    Numeric,
    Other,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_whitespace() {
            CharClass::Whitespace
        } else if c.is_alphabetic() {
            CharClass::Alphabetic
        } else if c.is_numeric() {
            CharClass::Numeric
        } else {
            CharClass::Other
        }
    }
}

/// Character-class tokenizer.
///
/// A token ends where the class changes (letters, digits, everything else)
/// or at whitespace. Runs of the same punctuation character stay together
/// (`--`), different ones are split (`'s` gives `'` and `s`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTokenizer;

impl Tokenizer for SimpleTokenizer {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut tokens = Vec::new();
        let mut start: Option<usize> = None;
        let mut prev: Option<(CharClass, char)> = None;

        for (idx, c) in text.char_indices() {
            let class = CharClass::of(c);
            let boundary = match prev {
                Some((prev_class, prev_char)) => {
                    class != prev_class || (class == CharClass::Other && c != prev_char)
                }
                None => true,
            };
            if boundary {
                if let Some(s) = start.take() {
                    tokens.push(&text[s..idx]);
                }
                if class != CharClass::Whitespace {
                    start = Some(idx);
                }
            }
            prev = Some((class, c));
        }
        if let Some(s) = start {
            tokens.push(&text[s..]);
        }
        tokens
    }
}
