//! Best-effort literal recovery from right-hand-side expressions.
//!
//! Only literal syntax is interpreted. A bare name is reported as its own
//! text, so `b = a` records the string `"a"`; names are never looked up.
//! A sign applied directly to a numeric literal is folded into the number,
//! so `-7` is the integer `-7`. Anything that would require evaluation
//! yields `None`.

use tree_sitter::Node;

use crate::literal::LiteralValue;

pub(super) struct ValueReader<'a> {
    source: &'a str,
}

impl<'a> ValueReader<'a> {
    pub(super) const fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub(super) fn read(&self, node: Node<'_>) -> Option<LiteralValue> {
        match node.kind() {
            "integer" => self.text(node).and_then(parse_integer),
            "float" => self.text(node).and_then(parse_float),
            "string" => self.text(node).and_then(parse_string),
            "concatenated_string" => self.read_concatenated(node),
            "true" => Some(LiteralValue::Bool(true)),
            "false" => Some(LiteralValue::Bool(false)),
            "none" => Some(LiteralValue::None),
            "unary_operator" => self.read_signed(node),
            "parenthesized_expression" => {
                let mut inner = significant_children(node);
                match (inner.next(), inner.next()) {
                    (Some(expression), None) => self.read(expression),
                    _ => None,
                }
            }
            "list" => self.read_list(node),
            "dictionary" => self.read_dictionary(node),
            "identifier" => self.text(node).map(|name| LiteralValue::Str(name.to_owned())),
            _ => None,
        }
    }

    fn read_concatenated(&self, node: Node<'_>) -> Option<LiteralValue> {
        let mut joined = String::new();
        for part in significant_children(node) {
            let LiteralValue::Str(text) = self.read(part)? else {
                return None;
            };
            joined.push_str(&text);
        }
        Some(LiteralValue::Str(joined))
    }

    fn read_signed(&self, node: Node<'_>) -> Option<LiteralValue> {
        let operator = node
            .child_by_field_name("operator")
            .and_then(|op| self.text(op))?;
        let argument = node.child_by_field_name("argument")?;
        let text = self.text(argument)?;
        match (operator, argument.kind()) {
            ("+", "integer" | "float") => self.read(argument),
            ("-", "integer") => parse_integer_with_sign(text, true),
            ("-", "float") => parse_float(&format!("-{text}")),
            _ => None,
        }
    }

    fn read_list(&self, node: Node<'_>) -> Option<LiteralValue> {
        let mut items = Vec::new();
        for element in significant_children(node) {
            if element.kind() == "list_splat" {
                return None;
            }
            items.push(self.read(element).unwrap_or(LiteralValue::None));
        }
        Some(LiteralValue::List(items))
    }

    fn read_dictionary(&self, node: Node<'_>) -> Option<LiteralValue> {
        let mut entries = Vec::new();
        for entry in significant_children(node) {
            if entry.kind() != "pair" {
                return None;
            }
            let key = entry
                .child_by_field_name("key")
                .and_then(|key| self.read(key))
                .unwrap_or(LiteralValue::None);
            let value = entry
                .child_by_field_name("value")
                .and_then(|value| self.read(value))
                .unwrap_or(LiteralValue::None);
            entries.push((key, value));
        }
        Some(LiteralValue::dict_from_entries(entries))
    }

    fn text(&self, node: Node<'_>) -> Option<&'a str> {
        self.source.get(node.byte_range())
    }
}

/// Named children of `node`, without comments.
fn significant_children(node: Node<'_>) -> impl Iterator<Item = Node<'_>> {
    let mut cursor = node.walk();
    let children: Vec<_> = node
        .named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect();
    children.into_iter()
}

fn strip_underscores(text: &str) -> String {
    text.chars().filter(|ch| *ch != '_').collect()
}

fn parse_integer(text: &str) -> Option<LiteralValue> {
    parse_integer_with_sign(text, false)
}

fn parse_integer_with_sign(text: &str, negative: bool) -> Option<LiteralValue> {
    let cleaned = strip_underscores(text);
    if cleaned.ends_with(['j', 'J']) {
        return None;
    }
    let (digits, radix) = split_radix(&cleaned);
    let magnitude = i128::from_str_radix(digits, radix).ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).ok().map(LiteralValue::Int)
}

fn split_radix(text: &str) -> (&str, u32) {
    for (prefixes, radix) in [(["0x", "0X"], 16), (["0o", "0O"], 8), (["0b", "0B"], 2)] {
        for prefix in prefixes {
            if let Some(digits) = text.strip_prefix(prefix) {
                return (digits, radix);
            }
        }
    }
    (text, 10)
}

fn parse_float(text: &str) -> Option<LiteralValue> {
    let cleaned = strip_underscores(text);
    if cleaned.ends_with(['j', 'J']) {
        return None;
    }
    cleaned.parse::<f64>().ok().map(LiteralValue::Float)
}

/// Decodes a single string literal token, including its prefix and quotes.
///
/// Byte strings, f-strings and t-strings are not plain text constants and
/// yield `None`.
fn parse_string(token: &str) -> Option<LiteralValue> {
    let quote_at = token.find(['\'', '"'])?;
    let (prefix, quoted) = token.split_at(quote_at);
    let prefix = prefix.to_ascii_lowercase();
    if prefix.contains(['b', 'f', 't']) {
        return None;
    }

    let body = strip_quotes(quoted)?;
    let text = if prefix.contains('r') {
        body.to_owned()
    } else {
        decode_escapes(body)?
    };
    Some(LiteralValue::Str(text))
}

fn strip_quotes(quoted: &str) -> Option<&str> {
    for delimiter in ["\"\"\"", "'''", "\"", "'"] {
        if let Some(inner) = quoted
            .strip_prefix(delimiter)
            .and_then(|rest| rest.strip_suffix(delimiter))
        {
            return Some(inner);
        }
    }
    None
}

fn decode_escapes(body: &str) -> Option<String> {
    let mut decoded = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            decoded.push(ch);
            continue;
        }
        let Some(escape) = chars.next() else {
            decoded.push('\\');
            break;
        };
        match escape {
            '\n' => {}
            '\r' => {
                drop(chars.next_if_eq(&'\n'));
            }
            '\\' => decoded.push('\\'),
            '\'' => decoded.push('\''),
            '"' => decoded.push('"'),
            'a' => decoded.push('\u{07}'),
            'b' => decoded.push('\u{08}'),
            'f' => decoded.push('\u{0c}'),
            'n' => decoded.push('\n'),
            'r' => decoded.push('\r'),
            't' => decoded.push('\t'),
            'v' => decoded.push('\u{0b}'),
            '0'..='7' => {
                let mut digits = String::from(escape);
                while digits.len() < 3 {
                    match chars.next_if(|next| ('0'..='7').contains(next)) {
                        Some(next) => digits.push(next),
                        None => break,
                    }
                }
                decoded.push(code_point(&digits, 8)?);
            }
            'x' => decoded.push(take_hex(&mut chars, 2)?),
            'u' => decoded.push(take_hex(&mut chars, 4)?),
            'U' => decoded.push(take_hex(&mut chars, 8)?),
            // Named escapes need the Unicode name table.
            'N' => return None,
            other => {
                decoded.push('\\');
                decoded.push(other);
            }
        }
    }
    Some(decoded)
}

fn take_hex(chars: &mut impl Iterator<Item = char>, width: usize) -> Option<char> {
    let digits: String = chars.take(width).collect();
    if digits.chars().count() != width {
        return None;
    }
    code_point(&digits, 16)
}

fn code_point(digits: &str, radix: u32) -> Option<char> {
    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(char::from_u32)
}
