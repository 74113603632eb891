//! Per-row highlighting scan.

use core_text::{HighlightResult, TokenKind};

use crate::languages::{SyntaxDefinition, SyntaxFlags};

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\0' || ",.()+-/*=~%<>[];{}:&|!".contains(c)
}

fn starts_with(chars: &[char], at: usize, pat: &str) -> bool {
    let mut i = at;
    for p in pat.chars() {
        if chars.get(i) != Some(&p) {
            return false;
        }
        i += 1;
    }
    true
}

/// Tag every char of `render`. `prev_open_comment` is the open multi-line
/// comment state of the previous row.
pub fn highlight_line(
    def: &SyntaxDefinition,
    render: &str,
    prev_open_comment: bool,
) -> HighlightResult {
    let chars: Vec<char> = render.chars().collect();
    let mut tags = vec![TokenKind::Normal; chars.len()];
    let mut prev_sep = true;
    let mut in_string: Option<char> = None;
    let mut in_comment = prev_open_comment && def.multi_line_comment.is_some();

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let prev_tag = if i > 0 { tags[i - 1] } else { TokenKind::Normal };

        if in_string.is_none()
            && !in_comment
            && let Some(marker) = def.single_line_comment
            && starts_with(&chars, i, marker)
        {
            tags[i..].fill(TokenKind::Comment);
            break;
        }

        if in_string.is_none()
            && let Some((start, end)) = def.multi_line_comment
        {
            if in_comment {
                if starts_with(&chars, i, end) {
                    let n = end.chars().count();
                    tags[i..i + n].fill(TokenKind::MultiLineComment);
                    i += n;
                    in_comment = false;
                    prev_sep = true;
                } else {
                    tags[i] = TokenKind::MultiLineComment;
                    i += 1;
                }
                continue;
            }
            if starts_with(&chars, i, start) {
                let n = start.chars().count();
                tags[i..i + n].fill(TokenKind::MultiLineComment);
                i += n;
                in_comment = true;
                continue;
            }
        }

        if def.flags.contains(SyntaxFlags::STRINGS) {
            if let Some(quote) = in_string {
                tags[i] = TokenKind::String;
                if c == '\\' && i + 1 < chars.len() {
                    tags[i + 1] = TokenKind::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            }
            if c == '"' || c == '\'' {
                in_string = Some(c);
                tags[i] = TokenKind::String;
                i += 1;
                continue;
            }
        }

        if def.flags.contains(SyntaxFlags::NUMBERS)
            && ((c.is_ascii_digit() && (prev_sep || prev_tag == TokenKind::Number))
                || (c == '.' && prev_tag == TokenKind::Number))
        {
            tags[i] = TokenKind::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep
            && let Some((len, kind)) = match_keyword(def, &chars, i)
        {
            tags[i..i + len].fill(kind);
            i += len;
            prev_sep = false;
            continue;
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    HighlightResult {
        tags,
        open_comment: in_comment,
    }
}

fn match_keyword(def: &SyntaxDefinition, chars: &[char], at: usize) -> Option<(usize, TokenKind)> {
    let classes = [
        (def.keywords, TokenKind::Keyword),
        (def.types, TokenKind::Type),
    ];
    for (words, kind) in classes {
        for word in words {
            let len = word.chars().count();
            if starts_with(chars, at, word) && chars.get(at + len).is_none_or(|c| is_separator(*c)) {
                return Some((len, kind));
            }
        }
    }
    None
}
