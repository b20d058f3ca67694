//! Restricted markup for assistant chat replies.
//!
//! Only `**bold**`, `*italic*`, `- ` / `* ` bullet lines, numbered lines and
//! line breaks are recognised. Everything else, including anything that
//! looks like HTML, stays literal text.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Paragraph,
    Bullet,
    /// `1. step`; the whole line, number included, renders bold.
    Numbered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub spans: Vec<Span>,
}

pub fn parse(text: &str) -> Vec<Line> {
    text.lines().map(parse_line).collect()
}

fn parse_line(raw: &str) -> Line {
    let trimmed = raw.trim_start();

    if let Some(rest) = bullet_body(trimmed) {
        return Line {
            kind: LineKind::Bullet,
            spans: inline(rest, false),
        };
    }

    if is_numbered(trimmed) {
        return Line {
            kind: LineKind::Numbered,
            spans: inline(trimmed, true),
        };
    }

    Line {
        kind: LineKind::Paragraph,
        spans: inline(raw, false),
    }
}

fn bullet_body(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('-').or_else(|| line.strip_prefix('*'))?;
    let body = rest.trim_start();
    // `**bold**` at line start is not a bullet.
    (rest.starts_with(char::is_whitespace) && !body.is_empty()).then_some(body)
}

fn is_numbered(line: &str) -> bool {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return false;
    }
    let rest = &line[digits..];
    rest.strip_prefix('.')
        .is_some_and(|after| after.starts_with(char::is_whitespace) && !after.trim().is_empty())
}

fn inline(text: &str, bold: bool) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("**") {
            match after.find("**") {
                Some(end) => {
                    flush(&mut spans, &mut plain, bold, false);
                    spans.extend(italics(&after[..end], true));
                    rest = &after[end + 2..];
                }
                None => {
                    plain.push_str("**");
                    rest = after;
                }
            }
            continue;
        }
        if let Some(after) = rest.strip_prefix('*') {
            if let Some(end) = after.find('*').filter(|end| *end > 0) {
                flush(&mut spans, &mut plain, bold, false);
                push(&mut spans, &after[..end], bold, true);
                rest = &after[end + 1..];
                continue;
            }
        }

        plain.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    flush(&mut spans, &mut plain, bold, false);
    spans
}

/// Italic runs inside an already bold segment.
fn italics(text: &str, bold: bool) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('*') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('*') else {
            break;
        };
        push(&mut spans, &rest[..start], bold, false);
        push(&mut spans, &after[..end], bold, true);
        rest = &after[end + 1..];
    }
    push(&mut spans, rest, bold, false);
    spans
}

fn flush(spans: &mut Vec<Span>, plain: &mut String, bold: bool, italic: bool) {
    push(spans, plain.as_str(), bold, italic);
    plain.clear();
}

fn push(spans: &mut Vec<Span>, text: &str, bold: bool, italic: bool) {
    if text.is_empty() {
        return;
    }
    spans.push(Span {
        text: text.to_string(),
        bold,
        italic,
    });
}
