//! Query text cleanup and placeholder dialect rewriting.
//!
//! Legacy templates carry two placeholder conventions: `@name` parameters
//! headed for the new query executor, which expects an `_sql` suffix, and
//! the older `?name?` markers, sometimes parenthesized. The `@` pass runs
//! first and each pass runs exactly once, so a placeholder produced by the
//! `?` pass is never suffixed as well.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn at_params() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@(\w+)").unwrap())
}

fn question_params() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\(\s*)?\?(\w+)\?(\s*\))?").unwrap())
}

fn newline_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\s*)(\n+)(\s*)").unwrap())
}

/// Normalize raw query text and adapt its placeholder syntax.
///
/// Cleanup: trims, replaces non-breaking spaces, strips carriage returns
/// and tabs, repairs the stray `ś` control byte, collapses whitespace runs
/// spanning newlines (more than two newlines become one blank line), and
/// ends multi-line text with exactly one trailing newline.
pub fn rewrite_query(raw: &str) -> String {
    let text = raw
        .trim()
        .replace('\u{a0}', " ")
        .replace('\r', "")
        .replace('\t', "")
        .replace('\u{9c}', "ś");

    let text = at_params().replace_all(&text, "@${1}_sql");
    let text = question_params().replace_all(&text, "@$2");
    let text = newline_runs().replace_all(&text, |caps: &Captures| {
        let newlines = caps[0].matches('\n').count();
        if newlines > 2 {
            "\n\n".to_string()
        } else {
            "\n".repeat(newlines)
        }
    });

    let mut result = text.trim().to_string();
    if result.contains('\n') && !result.ends_with('\n') {
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_both_placeholder_conventions() {
        let rewritten = rewrite_query("SELECT * FROM t WHERE x=@foo AND y=?bar?");
        assert_eq!(rewritten, "SELECT * FROM t WHERE x=@foo_sql AND y=@bar");
        assert!(!rewritten.contains('?'));
    }

    #[test]
    fn question_placeholders_lose_their_parentheses() {
        assert_eq!(
            rewrite_query("WHERE login IN (?login?)"),
            "WHERE login IN @login"
        );
        assert_eq!(
            rewrite_query("WHERE login IN ( ?login? )"),
            "WHERE login IN @login"
        );
    }

    #[test]
    fn question_output_is_not_suffixed_by_the_at_pass() {
        // `?bar?` becomes `@bar`, not `@bar_sql`.
        assert_eq!(rewrite_query("?bar?"), "@bar");
    }

    #[test]
    fn long_newline_runs_collapse_to_one_blank_line() {
        assert_eq!(
            rewrite_query("SELECT 1\n\n\n\nFROM t"),
            "SELECT 1\n\nFROM t\n"
        );
    }

    #[test]
    fn short_newline_runs_are_preserved() {
        assert_eq!(rewrite_query("SELECT 1\nFROM t"), "SELECT 1\nFROM t\n");
        assert_eq!(
            rewrite_query("SELECT 1\n\nFROM t"),
            "SELECT 1\n\nFROM t\n"
        );
    }

    #[test]
    fn horizontal_whitespace_around_newlines_is_dropped() {
        assert_eq!(
            rewrite_query("SELECT 1   \n   FROM t"),
            "SELECT 1\nFROM t\n"
        );
    }

    #[test]
    fn control_artifacts_are_cleaned() {
        assert_eq!(
            rewrite_query("SELECT\u{a0}imi\u{9c}\t FROM\rt"),
            "SELECT imiś FROMt"
        );
    }

    #[test]
    fn single_line_text_gets_no_trailing_newline() {
        assert_eq!(rewrite_query("  SELECT 1  "), "SELECT 1");
    }

    #[test]
    fn multi_line_text_ends_with_one_newline() {
        let rewritten = rewrite_query("SELECT 1\nFROM t\n\n");
        assert!(rewritten.ends_with("FROM t\n"));
        assert!(!rewritten.ends_with("\n\n"));
    }
}
