//! Whitespace/keyword normalization shared by the parser and the
//! non-table kind differ (spec.md §4.3, §4.4).

/// Collapses runs of ASCII whitespace to a single space and trims the ends.
/// Used both for comparing non-table DDL text (§4.4) and for normalizing
/// type strings before column equality (§3).
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !last_was_space && !out.is_empty() {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Whitespace-normalized equality for the non-table kind differ (§4.4) and
/// for the opaque-table fallback (§7).
#[must_use]
pub fn ddl_equal_normalized(left: &str, right: &str) -> bool {
    collapse_whitespace(left) == collapse_whitespace(right)
}

const RESERVED_KEYWORDS: &[&str] = &[
    "not", "null", "default", "generated", "always", "as", "stored", "virtual", "auto_increment",
    "on", "update", "unique", "primary", "key", "comment", "check", "unsigned", "zerofill",
    "signed", "character", "set", "collate", "using", "btree", "hash", "constraint", "foreign",
    "references", "fulltext", "engine", "charset", "current_timestamp",
];

/// Lowercases reserved keywords (matched as whole words, case-insensitively)
/// while leaving everything else — identifiers, string literals, enum
/// members — untouched (§4.3 normalization rule).
#[must_use]
pub fn lowercase_keywords(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    let bytes = text.as_bytes();
    let mut in_single_quote = false;
    let mut in_backtick = false;
    let mut word_start: Option<usize> = None;

    let flush_word = |out: &mut String, text: &str, start: usize, end: usize| {
        let word = &text[start..end];
        if RESERVED_KEYWORDS.contains(&word.to_ascii_lowercase().as_str()) {
            out.push_str(&word.to_ascii_lowercase());
        } else {
            out.push_str(word);
        }
    };

    while let Some((idx, ch)) = chars.next() {
        if in_single_quote {
            out.push(ch);
            if ch == '\'' && bytes.get(idx + 1) != Some(&b'\'') {
                in_single_quote = false;
            }
            continue;
        }
        if in_backtick {
            out.push(ch);
            if ch == '`' {
                in_backtick = false;
            }
            continue;
        }
        if ch == '\'' {
            if let Some(start) = word_start.take() {
                flush_word(&mut out, text, start, idx);
            }
            in_single_quote = true;
            out.push(ch);
            continue;
        }
        if ch == '`' {
            if let Some(start) = word_start.take() {
                flush_word(&mut out, text, start, idx);
            }
            in_backtick = true;
            out.push(ch);
            continue;
        }
        if ch.is_ascii_alphabetic() || ch == '_' {
            if word_start.is_none() {
                word_start = Some(idx);
            }
        } else {
            if let Some(start) = word_start.take() {
                flush_word(&mut out, text, start, idx);
            }
            out.push(ch);
        }
    }
    if let Some(start) = word_start {
        flush_word(&mut out, text, start, text.len());
    }
    out
}

/// Applies both normalization steps in the order §4.3 specifies:
/// collapse whitespace, then lowercase reserved keywords.
#[must_use]
pub fn normalize_ddl(text: &str) -> String {
    lowercase_keywords(&collapse_whitespace(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_internal_whitespace() {
        assert_eq!(collapse_whitespace("  a   b\t\nc  "), "a b c");
    }

    #[test]
    fn lowercases_keywords_not_identifiers_or_literals() {
        let input = "`MyCol` INT NOT NULL DEFAULT 'NotNull' COMMENT 'KEY'";
        let normalized = lowercase_keywords(input);
        assert_eq!(
            normalized,
            "`MyCol` INT not null default 'NotNull' comment 'KEY'"
        );
    }

    #[test]
    fn ddl_equal_normalized_ignores_whitespace_only_changes() {
        assert!(ddl_equal_normalized(
            "CREATE VIEW v AS SELECT 1",
            "CREATE VIEW v AS   SELECT    1"
        ));
        assert!(!ddl_equal_normalized(
            "CREATE VIEW v AS SELECT 1",
            "CREATE VIEW v AS SELECT 2"
        ));
    }
}
