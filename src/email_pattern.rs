use std::fmt;
use std::sync::OnceLock;

// One address character: anything but `@` and the whitespace browsers
// match with `\s`. U+FEFF counts as whitespace there, U+0085 does not.
macro_rules! address_char {
    () => {
        r"[^@\x{9}-\x{D} \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]"
    };
}

/// Anchored address shape accepted by the email rule: a local part, `@`,
/// a domain, `.`, and a final label, none of which contain whitespace or
/// `@`. This is `^[^\s@]+@[^\s@]+\.[^\s@]+$` with `\s` spelled out,
/// since the regex engine's `\s` follows Unicode `White_Space` instead.
pub const EMAIL_PATTERN: &str = concat!(
    "^",
    address_char!(),
    "+@",
    address_char!(),
    r"+\.",
    address_char!(),
    "+$"
);

#[derive(Debug, Clone)]
pub(crate) struct Regex {
    backend: fancy_regex::Regex,
}

impl Regex {
    pub(crate) fn new(pattern: &str) -> Result<Self, PatternError> {
        let backend = fancy_regex::Regex::new(pattern).map_err(PatternError::from)?;
        Ok(Self { backend })
    }

    pub(crate) fn is_match(&self, input: &str) -> Result<bool, PatternError> {
        self.backend.is_match(input).map_err(PatternError::from)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    message: String,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PatternError {}

impl From<fancy_regex::Error> for PatternError {
    fn from(value: fancy_regex::Error) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

fn email_regex() -> Result<&'static Regex, PatternError> {
    static EMAIL_REGEX: OnceLock<Result<Regex, PatternError>> = OnceLock::new();
    EMAIL_REGEX
        .get_or_init(|| Regex::new(EMAIL_PATTERN))
        .as_ref()
        .map_err(Clone::clone)
}

/// Returns whether `value` matches [`EMAIL_PATTERN`] in full.
///
/// Emptiness is not this function's concern: an empty string does not
/// match, and callers that treat empty fields as exempt must check for
/// that first.
pub fn is_valid_email(value: &str) -> Result<bool, PatternError> {
    email_regex()?.is_match(value)
}
