use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
    Includes { key: String, value: String },
}

impl SelectorAttrCondition {
    pub(crate) fn matches(&self, attrs: &HashMap<String, String>) -> bool {
        match self {
            Self::Exists { key } => attrs.contains_key(key),
            Self::Eq { key, value } => attrs.get(key) == Some(value),
            Self::StartsWith { key, value } => attrs
                .get(key)
                .is_some_and(|attr| !value.is_empty() && attr.starts_with(value.as_str())),
            Self::EndsWith { key, value } => attrs
                .get(key)
                .is_some_and(|attr| !value.is_empty() && attr.ends_with(value.as_str())),
            Self::Contains { key, value } => attrs
                .get(key)
                .is_some_and(|attr| !value.is_empty() && attr.contains(value.as_str())),
            Self::Includes { key, value } => attrs
                .get(key)
                .is_some_and(|attr| attr.split_whitespace().any(|token| token == value)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
}

impl SelectorStep {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && !self.universal
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    // Relation to previous (left) selector part.
    pub(crate) combinator: Option<SelectorCombinator>,
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    split_selector_groups(selector)?
        .iter()
        .map(|group| parse_selector_chain(group))
        .collect()
}

pub(crate) fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let mut steps = Vec::new();
    let mut pending_combinator: Option<SelectorCombinator> = None;

    for token in tokenize_selector(selector)? {
        if token == ">" {
            if pending_combinator.is_some() || steps.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            pending_combinator = Some(SelectorCombinator::Child);
            continue;
        }

        let step = parse_selector_step(&token)?;
        let combinator = if steps.is_empty() {
            None
        } else {
            Some(
                pending_combinator
                    .take()
                    .unwrap_or(SelectorCombinator::Descendant),
            )
        };
        steps.push(SelectorPart { step, combinator });
    }

    if steps.is_empty() || pending_combinator.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    Ok(steps)
}

/// Tracks whether a character sits inside `[...]` or a quoted string, where
/// separators lose their meaning.
#[derive(Debug, Default)]
struct NestingState {
    bracket_depth: usize,
    quote: Option<char>,
}

impl NestingState {
    fn feed(&mut self, ch: char, selector: &str) -> Result<()> {
        if let Some(quote) = self.quote {
            if ch == quote {
                self.quote = None;
            }
            return Ok(());
        }
        match ch {
            '"' | '\'' if self.bracket_depth > 0 => self.quote = Some(ch),
            '[' => self.bracket_depth += 1,
            ']' => {
                self.bracket_depth = self
                    .bracket_depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::UnsupportedSelector(selector.into()))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn is_top_level(&self) -> bool {
        self.bracket_depth == 0 && self.quote.is_none()
    }

    fn finish(&self, selector: &str) -> Result<()> {
        if self.is_top_level() {
            Ok(())
        } else {
            Err(Error::UnsupportedSelector(selector.into()))
        }
    }
}

pub(crate) fn split_selector_groups(selector: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut nesting = NestingState::default();

    for ch in selector.chars() {
        if ch == ',' && nesting.is_top_level() {
            let trimmed = current.trim();
            if trimmed.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            groups.push(trimmed.to_string());
            current.clear();
            continue;
        }
        nesting.feed(ch, selector)?;
        current.push(ch);
    }
    nesting.finish(selector)?;

    let trimmed = current.trim();
    if trimmed.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

pub(crate) fn tokenize_selector(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut nesting = NestingState::default();

    for ch in selector.chars() {
        if nesting.is_top_level() && (ch == '>' || ch.is_ascii_whitespace()) {
            if !current.trim().is_empty() {
                tokens.push(current.trim().to_string());
            }
            current.clear();
            if ch == '>' {
                tokens.push(ch.to_string());
            }
            continue;
        }
        nesting.feed(ch, selector)?;
        current.push(ch);
    }
    nesting.finish(selector)?;

    if !current.trim().is_empty() {
        tokens.push(current.trim().to_string());
    }
    Ok(tokens)
}

pub(crate) fn parse_selector_step(part: &str) -> Result<SelectorStep> {
    let part = part.trim();
    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if step.universal || step.tag.is_some() || i != 0 {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                step.universal = true;
                i += 1;
            }
            b'#' => {
                let Some((id, next)) = parse_selector_ident(part, i + 1) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                if step.id.replace(id).is_some() {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                i = next;
            }
            b'.' => {
                let Some((class_name, next)) = parse_selector_ident(part, i + 1) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (attr, next) = parse_selector_attr_condition(part, i)?;
                step.attrs.push(attr);
                i = next;
            }
            _ => {
                if i != 0 {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                let Some((tag, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    if step.is_empty() {
        return Err(Error::UnsupportedSelector(part.into()));
    }
    Ok(step)
}

pub(crate) fn parse_selector_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    if start >= bytes.len() || !is_selector_ident_char(bytes[start]) {
        return None;
    }
    let mut end = start + 1;
    while end < bytes.len() && is_selector_ident_char(bytes[end]) {
        end += 1;
    }
    Some((src.get(start..end)?.to_string(), end))
}

pub(crate) fn is_selector_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn is_selector_attr_name_char(b: u8) -> bool {
    is_selector_ident_char(b) || b == b':'
}

fn skip_ascii_ws(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

pub(crate) fn parse_selector_attr_condition(
    src: &str,
    open_bracket: usize,
) -> Result<(SelectorAttrCondition, usize)> {
    let unsupported = || Error::UnsupportedSelector(src.into());
    let bytes = src.as_bytes();

    let key_start = skip_ascii_ws(bytes, open_bracket + 1);
    let mut i = key_start;
    while i < bytes.len() && is_selector_attr_name_char(bytes[i]) {
        i += 1;
    }
    if key_start == i {
        return Err(unsupported());
    }
    let key = src
        .get(key_start..i)
        .ok_or_else(unsupported)?
        .to_ascii_lowercase();

    i = skip_ascii_ws(bytes, i);
    match bytes.get(i) {
        Some(b']') => return Ok((SelectorAttrCondition::Exists { key }, i + 1)),
        None => return Err(unsupported()),
        Some(_) => {}
    }

    let (op, after_op) = match (bytes.get(i), bytes.get(i + 1)) {
        (Some(b'='), _) => (b'=', i + 1),
        (Some(op @ (b'^' | b'$' | b'*' | b'~')), Some(b'=')) => (*op, i + 2),
        _ => return Err(unsupported()),
    };

    let value_start = skip_ascii_ws(bytes, after_op);
    let (value, after_value) = parse_selector_attr_value(src, value_start)?;

    let close = skip_ascii_ws(bytes, after_value);
    if bytes.get(close) != Some(&b']') {
        return Err(unsupported());
    }

    let cond = match op {
        b'=' => SelectorAttrCondition::Eq { key, value },
        b'^' => SelectorAttrCondition::StartsWith { key, value },
        b'$' => SelectorAttrCondition::EndsWith { key, value },
        b'*' => SelectorAttrCondition::Contains { key, value },
        _ => SelectorAttrCondition::Includes { key, value },
    };
    Ok((cond, close + 1))
}

pub(crate) fn parse_selector_attr_value(src: &str, start: usize) -> Result<(String, usize)> {
    let bytes = src.as_bytes();
    let Some(&first) = bytes.get(start) else {
        return Err(Error::UnsupportedSelector(src.into()));
    };

    if first == b'"' || first == b'\'' {
        let mut i = start + 1;
        while i < bytes.len() {
            if bytes[i] == b'\\' {
                i = (i + 2).min(bytes.len());
                continue;
            }
            if bytes[i] == first {
                let raw = src
                    .get(start + 1..i)
                    .ok_or_else(|| Error::UnsupportedSelector(src.into()))?;
                return Ok((unescape_selector_value(raw), i + 1));
            }
            i += 1;
        }
        return Err(Error::UnsupportedSelector(src.into()));
    }

    let mut i = start;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b']' {
        i += 1;
    }
    let raw = src
        .get(start..i)
        .ok_or_else(|| Error::UnsupportedSelector(src.into()))?;
    Ok((unescape_selector_value(raw), i))
}

fn unescape_selector_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
            continue;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compound_step_with_attributes() -> Result<()> {
        let chain = parse_selector_chain(r#"input.form-control[type="email"][required]"#)?;
        assert_eq!(chain.len(), 1);
        let step = &chain[0].step;
        assert_eq!(step.tag.as_deref(), Some("input"));
        assert_eq!(step.classes, vec!["form-control".to_string()]);
        assert_eq!(
            step.attrs,
            vec![
                SelectorAttrCondition::Eq {
                    key: "type".into(),
                    value: "email".into()
                },
                SelectorAttrCondition::Exists {
                    key: "required".into()
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn quoted_values_keep_spaces_and_commas() -> Result<()> {
        let groups = parse_selector_groups(r#"button[onclick*="return confirm(1, 2)"], a.btn"#)?;
        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[0][0].step.attrs,
            vec![SelectorAttrCondition::Contains {
                key: "onclick".into(),
                value: "return confirm(1, 2)".into()
            }]
        );
        assert_eq!(groups[1][0].step.tag.as_deref(), Some("a"));
        Ok(())
    }

    #[test]
    fn combinators_are_recorded() -> Result<()> {
        let chain = parse_selector_chain("form#signup > div .alert")?;
        let combinators = chain.iter().map(|part| part.combinator).collect::<Vec<_>>();
        assert_eq!(
            combinators,
            vec![
                None,
                Some(SelectorCombinator::Child),
                Some(SelectorCombinator::Descendant)
            ]
        );
        Ok(())
    }

    #[test]
    fn rejects_unsupported_forms() {
        for selector in ["", "a,", "> a", "a >", "[", "a[b=", "a:hover", "a + b", "div*"] {
            assert!(
                matches!(
                    parse_selector_groups(selector),
                    Err(Error::UnsupportedSelector(_))
                ),
                "{selector:?} should be rejected"
            );
        }
    }

    #[test]
    fn empty_substring_conditions_never_match() {
        let mut attrs = HashMap::new();
        attrs.insert("onclick".to_string(), "confirm()".to_string());
        let cond = SelectorAttrCondition::Contains {
            key: "onclick".into(),
            value: String::new(),
        };
        assert!(!cond.matches(&attrs));
    }
}
