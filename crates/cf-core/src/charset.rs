//! Character sets that candidates are drawn from.
//!
//! A charset is an ordered list of ASCII bytes. Duplicates are kept, so a
//! custom charset like `"aab"` draws `a` twice as often as `b`.

use crate::error::CoreError;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "+-*/=<>!&|^%~?:;,.(){}[]'\"\\";
const WHITESPACE: &str = " \t\n";

/// Which character classes to include.
///
/// `custom` overrides every class flag when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharsetOptions {
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub whitespace: bool,
    pub custom: Option<String>,
}

impl Default for CharsetOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
            whitespace: false,
            custom: None,
        }
    }
}

/// A validated, non-empty ASCII character set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    bytes: Vec<u8>,
}

impl Default for Charset {
    /// Letters, digits and symbols, without whitespace.
    fn default() -> Self {
        let mut bytes = Vec::new();
        for class in [LOWERCASE, UPPERCASE, DIGITS, SYMBOLS] {
            bytes.extend_from_slice(class.as_bytes());
        }
        Self { bytes }
    }
}

impl Charset {
    /// Build a charset from class flags or a custom string.
    pub fn from_options(options: &CharsetOptions) -> Result<Self, CoreError> {
        if let Some(ref custom) = options.custom {
            // An empty custom string falls through to the empty check below,
            // it does not re-enable the default classes.
            return Self::from_chars(custom);
        }

        let mut chars = String::new();
        if options.lowercase {
            chars.push_str(LOWERCASE);
        }
        if options.uppercase {
            chars.push_str(UPPERCASE);
        }
        if options.digits {
            chars.push_str(DIGITS);
        }
        if options.symbols {
            chars.push_str(SYMBOLS);
        }
        if options.whitespace {
            chars.push_str(WHITESPACE);
        }

        Self::from_chars(&chars)
    }

    /// Build a charset from an explicit string of characters.
    pub fn from_chars(chars: &str) -> Result<Self, CoreError> {
        if let Some(c) = chars.chars().find(|c| !c.is_ascii()) {
            return Err(CoreError::NonAsciiCharset(c));
        }
        if chars.is_empty() {
            return Err(CoreError::EmptyCharset);
        }

        Ok(Self {
            bytes: chars.as_bytes().to_vec(),
        })
    }

    /// Number of entries (duplicates included).
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; construction rejects empty charsets.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn contains(&self, byte: u8) -> bool {
        self.bytes.contains(&byte)
    }

    /// The first `max` characters, with `...` appended when truncated.
    pub fn preview(&self, max: usize) -> String {
        let shown = &self.bytes[..self.bytes.len().min(max)];
        // ASCII-only, so this never loses data.
        let mut preview = String::from_utf8_lossy(shown).into_owned();
        if self.bytes.len() > max {
            preview.push_str("...");
        }
        preview
    }
}
