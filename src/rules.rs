//! Validation rules applied to a form on submission.
//!
//! The rules only look at values and a handful of attribute facts, so the
//! same code serves the in-memory [`Page`](crate::Page) and the browser
//! binding. Field identity is left generic: the runtime keys fields by node
//! id, the browser by element handle.

use std::fmt;

use crate::email_pattern::{PatternError, is_valid_email};

pub const PASSWORD_FIELD_NAME: &str = "password";
pub const CONFIRMATION_FIELD_NAME: &str = "confirm_password";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    MissingRequired,
    MalformedEmail,
    PasswordMismatch,
}

impl Violation {
    /// Text placed in the error annotation.
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingRequired => "This field is required.",
            Self::MalformedEmail => "Please enter a valid email address.",
            Self::PasswordMismatch => "Passwords do not match.",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingRequired => "missing_required",
            Self::MalformedEmail => "malformed_email",
            Self::PasswordMismatch => "password_mismatch",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Blank means empty after stripping whitespace the way browsers trim:
/// BOM included, NEL excluded.
pub(crate) fn is_blank(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch == '\u{FEFF}' || (ch.is_whitespace() && ch != '\u{85}'))
}

pub fn check_presence(value: &str) -> Option<Violation> {
    is_blank(value).then_some(Violation::MissingRequired)
}

/// Empty values are exempt; emptiness belongs to the presence rule.
pub fn check_email(value: &str) -> Result<Option<Violation>, PatternError> {
    if value.is_empty() {
        return Ok(None);
    }
    Ok((!is_valid_email(value)?).then_some(Violation::MalformedEmail))
}

/// Exact comparison: case and surrounding whitespace both count.
pub fn check_confirmation(password: &str, confirmation: &str) -> Option<Violation> {
    (password != confirmation).then_some(Violation::PasswordMismatch)
}

/// What the rules need to know about one control of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFacts<K> {
    pub key: K,
    pub is_input: bool,
    pub required: bool,
    pub email: bool,
    pub name: Option<String>,
    pub value: String,
}

/// Per-field verdicts of one submission.
///
/// A field appears once, in the order a rule first looked at it. Its
/// verdict is the first violation any rule recorded for it, or `None` if
/// every rule that checked it passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormReport<K> {
    entries: Vec<(K, Option<Violation>)>,
}

impl<K> Default for FormReport<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> FormReport<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, field: K, outcome: Option<Violation>) {
        if let Some((_, verdict)) = self.entries.iter_mut().find(|(key, _)| *key == field) {
            if verdict.is_none() {
                *verdict = outcome;
            }
            return;
        }
        self.entries.push((field, outcome));
    }

    pub fn is_valid(&self) -> bool {
        self.entries.iter().all(|(_, verdict)| verdict.is_none())
    }

    pub fn verdict(&self, field: &K) -> Option<Option<Violation>> {
        self.entries
            .iter()
            .find(|(key, _)| key == field)
            .map(|(_, verdict)| *verdict)
    }

    pub fn violations(&self) -> impl Iterator<Item = (&K, Violation)> {
        self.entries
            .iter()
            .filter_map(|(key, verdict)| verdict.map(|violation| (key, violation)))
    }

    pub fn passed(&self) -> impl Iterator<Item = &K> {
        self.entries
            .iter()
            .filter(|(_, verdict)| verdict.is_none())
            .map(|(key, _)| key)
    }

    pub fn entries(&self) -> &[(K, Option<Violation>)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Runs the presence, email, and confirmation rules over a form's fields,
/// given in document order. Every rule runs even after a failure.
pub fn evaluate_form<K: Clone + PartialEq>(
    fields: &[FieldFacts<K>],
) -> Result<FormReport<K>, PatternError> {
    let mut report = FormReport::new();

    for field in fields.iter().filter(|field| field.required) {
        report.record(field.key.clone(), check_presence(&field.value));
    }

    // An empty email field is exempt here, so a required one that failed
    // presence above keeps its mark instead of being cleared.
    for field in fields.iter().filter(|field| field.is_input && field.email) {
        report.record(field.key.clone(), check_email(&field.value)?);
    }

    let first_named = |name: &str| {
        fields
            .iter()
            .find(|field| field.is_input && field.name.as_deref() == Some(name))
    };
    if let (Some(password), Some(confirmation)) = (
        first_named(PASSWORD_FIELD_NAME),
        first_named(CONFIRMATION_FIELD_NAME),
    ) {
        report.record(
            confirmation.key.clone(),
            check_confirmation(&password.value, &confirmation.value),
        );
    }

    Ok(report)
}
