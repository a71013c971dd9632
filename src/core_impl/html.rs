use super::*;

/// Elements whose content is taken verbatim up to the matching end tag.
const RAW_TEXT_TAGS: &[&str] = &["script", "style", "textarea", "title"];

pub(crate) fn parse_html(html: &str) -> Result<Dom> {
    let mut dom = Dom::new();
    let mut stack = vec![dom.root];
    let mut cursor = Cursor::new(html);

    while !cursor.at_end() {
        if cursor.starts_with(b"<!--") {
            let end = cursor
                .find(cursor.pos + 4, b"-->")
                .ok_or_else(|| Error::HtmlParse("unclosed HTML comment".into()))?;
            cursor.pos = end + 3;
            continue;
        }

        if cursor.starts_with(b"</") {
            let tag = cursor.end_tag()?;
            close_open_element(&dom, &mut stack, &tag);
            continue;
        }

        if cursor.starts_with(b"<!") {
            cursor.declaration()?;
            continue;
        }

        if cursor.peek() == Some(b'<') && cursor.peek_at(1).is_some_and(|b| b.is_ascii_alphabetic())
        {
            let start = cursor.start_tag()?;
            close_implied_end_tags(&dom, &mut stack, &start.tag);
            let parent = current_parent(&stack)?;
            let node = dom.create_element(parent, start.tag.clone(), start.attrs);

            if RAW_TEXT_TAGS.contains(&start.tag.as_str()) && !start.self_closing {
                let close = cursor
                    .find_end_tag(&start.tag)
                    .ok_or_else(|| Error::HtmlParse(format!("unclosed <{}>", start.tag)))?;
                let body = cursor.slice(cursor.pos, close)?;
                if !body.is_empty() {
                    // script and style stay raw, the rest decode references
                    let text = if matches!(start.tag.as_str(), "script" | "style") {
                        body.to_string()
                    } else {
                        decode_character_references(body)
                    };
                    let text = if start.tag == "textarea" {
                        strip_leading_newline(&text).to_string()
                    } else {
                        text
                    };
                    if !text.is_empty() {
                        dom.create_text(node, text);
                    }
                }
                cursor.pos = close;
                cursor.end_tag()?;
                continue;
            }

            if !start.self_closing && !is_void_tag(&start.tag) {
                stack.push(node);
            }
            continue;
        }

        let text_start = cursor.pos;
        // a lone '<' that does not open markup is text
        cursor.pos += 1;
        while let Some(b) = cursor.peek() {
            if b == b'<' {
                break;
            }
            cursor.pos += 1;
        }
        let text = cursor.slice(text_start, cursor.pos)?;
        let decoded = decode_character_references(text);
        if !decoded.is_empty() {
            let parent = current_parent(&stack)?;
            dom.create_text(parent, decoded);
        }
    }

    dom.initialize_form_control_values()?;
    Ok(dom)
}

fn current_parent(stack: &[NodeId]) -> Result<NodeId> {
    stack
        .last()
        .copied()
        .ok_or_else(|| Error::HtmlParse("missing parent element".into()))
}

/// Pops up to and including the nearest open element named `tag`. Stray end
/// tags with no open counterpart are ignored.
fn close_open_element(dom: &Dom, stack: &mut Vec<NodeId>, tag: &str) {
    let Some(index) = (1..stack.len())
        .rev()
        .find(|index| dom.is_tag(stack[*index], tag))
    else {
        return;
    };
    stack.truncate(index);
}

/// Closes `p`, `li`, and `option` elements whose end tags markup may omit.
fn close_implied_end_tags(dom: &Dom, stack: &mut Vec<NodeId>, tag: &str) {
    let implied: &[&str] = match tag {
        "option" | "optgroup" => &["option"],
        "li" => &["li"],
        "p" | "div" | "form" | "ul" | "ol" | "table" | "h1" | "h2" | "h3" | "h4" | "h5"
        | "h6" | "section" | "fieldset" => &["p"],
        _ => return,
    };
    let Some(&top) = stack.last() else {
        return;
    };
    if stack.len() > 1 && implied.iter().any(|name| dom.is_tag(top, name)) {
        stack.pop();
    }
}

fn strip_leading_newline(text: &str) -> &str {
    text.strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .unwrap_or(text)
}

pub(super) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

fn decode_character_references(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }

    fn decode_numeric(value: &str) -> Option<char> {
        let codepoint = match value.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => value.parse::<u32>().ok()?,
        };
        char::from_u32(codepoint)
    }

    fn decode_named(value: &str) -> Option<char> {
        Some(match value {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => '\u{00A0}',
            "copy" => '©',
            "hellip" => '…',
            "ndash" => '–',
            "mdash" => '—',
            "times" => '×',
            _ => return None,
        })
    }

    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after.find(';').and_then(|semi| {
            let token = &after[..semi];
            if token.is_empty() || !token.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '#')
            {
                return None;
            }
            let ch = match token.strip_prefix('#') {
                Some(numeric) => decode_numeric(numeric),
                None => decode_named(token),
            }?;
            Some((ch, semi + 1))
        });
        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

struct StartTag {
    tag: String,
    attrs: HashMap<String, String>,
    self_closing: bool,
}

struct Cursor<'a> {
    html: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(html: &'a str) -> Self {
        Self {
            html,
            bytes: html.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn starts_with(&self, needle: &[u8]) -> bool {
        self.bytes
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(needle))
    }

    fn find(&self, from: usize, needle: &[u8]) -> Option<usize> {
        self.bytes
            .get(from..)?
            .windows(needle.len())
            .position(|window| window == needle)
            .map(|offset| from + offset)
    }

    fn slice(&self, start: usize, end: usize) -> Result<&'a str> {
        self.html
            .get(start..end)
            .ok_or_else(|| Error::HtmlParse("invalid utf-8 boundary".into()))
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn take_while(&mut self, accept: impl Fn(u8) -> bool) -> Result<&'a str> {
        let start = self.pos;
        while self.peek().is_some_and(&accept) {
            self.pos += 1;
        }
        self.slice(start, self.pos)
    }

    fn at_self_close(&self) -> bool {
        self.peek() == Some(b'/') && self.peek_at(1) == Some(b'>')
    }

    fn start_tag(&mut self) -> Result<StartTag> {
        self.pos += 1;
        let tag = self.take_while(is_tag_char)?.to_ascii_lowercase();
        if tag.is_empty() {
            return Err(Error::HtmlParse("empty tag name".into()));
        }

        let mut attrs = HashMap::new();
        loop {
            self.skip_ws();
            let Some(b) = self.peek() else {
                return Err(Error::HtmlParse(format!("unclosed start tag <{tag}>")));
            };
            if b == b'>' {
                self.pos += 1;
                return Ok(StartTag {
                    tag,
                    attrs,
                    self_closing: false,
                });
            }
            if self.at_self_close() {
                self.pos += 2;
                return Ok(StartTag {
                    tag,
                    attrs,
                    self_closing: true,
                });
            }
            if !is_attr_name_char(b) {
                // skip junk such as a stray quote or lone slash
                self.pos += 1;
                continue;
            }

            let name = self.take_while(is_attr_name_char)?.to_ascii_lowercase();
            self.skip_ws();
            let value = if self.peek() == Some(b'=') {
                self.pos += 1;
                self.skip_ws();
                self.attr_value()?
            } else {
                "true".to_string()
            };
            // first occurrence of a duplicated attribute wins
            attrs.entry(name).or_insert(value);
        }
    }

    fn attr_value(&mut self) -> Result<String> {
        match self.peek() {
            None => Err(Error::HtmlParse("missing attribute value".into())),
            Some(quote @ (b'"' | b'\'')) => {
                self.pos += 1;
                let start = self.pos;
                let end = self
                    .bytes
                    .get(start..)
                    .and_then(|rest| rest.iter().position(|b| *b == quote))
                    .map(|offset| start + offset)
                    .ok_or_else(|| Error::HtmlParse("unclosed quoted attribute value".into()))?;
                let raw = self.slice(start, end)?;
                self.pos = end + 1;
                Ok(decode_character_references(raw))
            }
            Some(_) => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|b| !b.is_ascii_whitespace() && b != b'>')
                    && !self.at_self_close()
                {
                    self.pos += 1;
                }
                Ok(decode_character_references(self.slice(start, self.pos)?))
            }
        }
    }

    fn end_tag(&mut self) -> Result<String> {
        self.pos += 2;
        self.skip_ws();
        let tag = self.take_while(is_tag_char)?.to_ascii_lowercase();
        let close = self
            .find(self.pos, b">")
            .ok_or_else(|| Error::HtmlParse("unclosed end tag".into()))?;
        self.pos = close + 1;
        Ok(tag)
    }

    fn declaration(&mut self) -> Result<()> {
        let close = self
            .find(self.pos + 2, b">")
            .ok_or_else(|| Error::HtmlParse("unclosed declaration tag".into()))?;
        self.pos = close + 1;
        Ok(())
    }

    /// Position of the `</tag` that ends a raw text element.
    fn find_end_tag(&self, tag: &str) -> Option<usize> {
        let tag = tag.as_bytes();
        let mut from = self.pos;
        loop {
            let at = self.find(from, b"</")?;
            let name_start = at + 2;
            let name_end = name_start + tag.len();
            let name_matches = self
                .bytes
                .get(name_start..name_end)
                .is_some_and(|name| name.eq_ignore_ascii_case(tag));
            let boundary = self
                .bytes
                .get(name_end)
                .is_none_or(|b| !b.is_ascii_alphanumeric());
            if name_matches && boundary {
                return Some(at);
            }
            from = at + 2;
        }
    }
}

fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn is_attr_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}
