//! LaTeX cleanup helpers shared by choice and answer extraction.
//!
//! The scanners here are index-based over the byte sequence, never
//! recursive: solutions can nest braces arbitrarily deep.

use regex::Regex;
use std::sync::LazyLock;

static RE_FBOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\fbox").expect("valid fbox regex"));
static RE_FRAMEBOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\framebox(\[.*?\])?").expect("valid framebox regex"));
static RE_BOXED_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\boxed +\{").expect("valid boxed space regex"));
static RE_SPACING_MACRO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(?:qquad|quad)\b").expect("valid spacing regex"));
static RE_WS_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static RE_LEFTRIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(?:left|right)\b\s*").expect("valid leftright regex"));
static RE_AESTHETIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:displaystyle|textstyle|limits|strut|mathstrut|allowbreak)\b\s*")
        .expect("valid aesthetic regex")
});
static RE_SIZING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:big|Big|bigg|Bigg)[lrm]?\b").expect("valid sizing regex")
});
static RE_THIN_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[,;!]").expect("valid thin space regex"));

/// Byte offset of the `}` matching an already-open brace, scanning `text`
/// with depth 1 at entry. Returns `None` for unbalanced input.
#[must_use]
pub fn find_closing_brace(text: &str) -> Option<usize> {
    let mut depth: u32 = 1;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Rewrite the wiki's boxed-answer variants (`\fbox`, `\framebox[...]`) to
/// a single `\boxed{...}` form, and tighten `\boxed {` spacing.
#[must_use]
pub fn standardize_boxed_command(text: &str) -> String {
    let text = RE_FBOX.replace_all(text, r"\boxed");
    let text = RE_FRAMEBOX.replace_all(&text, r"\boxed");
    RE_BOXED_SPACE.replace_all(&text, r"\boxed{").into_owned()
}

/// Drop spacing macros (`\quad`, `\qquad`, thin spaces) and collapse
/// whitespace runs to a single space.
#[must_use]
pub fn clean_latex_whitespace(text: &str) -> String {
    let text = RE_SPACING_MACRO.replace_all(text, " ");
    let text = RE_THIN_SPACE.replace_all(&text, " ");
    RE_WS_RUN.replace_all(&text, " ").trim().to_string()
}

/// Drop `\left` / `\right` sizing prefixes, keeping their delimiters.
#[must_use]
pub fn clean_latex_leftright(text: &str) -> String {
    RE_LEFTRIGHT.replace_all(text, "").into_owned()
}

/// Drop purely aesthetic commands (`\displaystyle`, `\big...`, struts).
#[must_use]
pub fn clean_aesthetic_latex_cmds(text: &str) -> String {
    let text = RE_AESTHETIC.replace_all(text, "");
    RE_SIZING.replace_all(&text, "").into_owned()
}

/// Full cleanup applied to choice values and boxed answers.
#[must_use]
pub fn clean_choice(text: &str) -> String {
    let text = clean_latex_whitespace(text);
    let text = clean_latex_leftright(&text);
    clean_aesthetic_latex_cmds(&text)
}

/// Replace every `\boxed{...}` with its content. Unbalanced boxes are left
/// in place.
#[must_use]
pub fn remove_boxes_keep_content(text: &str) -> String {
    const PREFIX: &str = "\\boxed{";
    let mut out = text.to_string();
    while let Some(start) = out.find(PREFIX) {
        let inner_start = start + PREFIX.len();
        let Some(close) = find_closing_brace(&out[inner_start..]) else {
            break;
        };
        let content = out[inner_start..inner_start + close].to_string();
        out.replace_range(start..inner_start + close + 1, &content);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_closing_brace_simple() {
        assert_eq!(find_closing_brace("17}"), Some(2));
        assert_eq!(find_closing_brace("}"), Some(0));
    }

    #[test]
    fn test_find_closing_brace_nested() {
        // \frac{1}{2}} -> the final brace closes the implicit opener
        assert_eq!(find_closing_brace(r"\frac{1}{2}}"), Some(11));
        assert_eq!(find_closing_brace("{{}}}"), Some(4));
    }

    #[test]
    fn test_find_closing_brace_unbalanced() {
        assert_eq!(find_closing_brace(r"\frac{1}{2}"), None);
        assert_eq!(find_closing_brace(""), None);
        assert_eq!(find_closing_brace("{{{"), None);
    }

    #[test]
    fn test_standardize_boxed_command() {
        assert_eq!(standardize_boxed_command(r"\fbox{17}"), r"\boxed{17}");
        assert_eq!(standardize_boxed_command(r"\framebox[1.5cm]{17}"), r"\boxed{17}");
        assert_eq!(standardize_boxed_command(r"\boxed  {17}"), r"\boxed{17}");
    }

    #[test]
    fn test_clean_latex_whitespace_drops_spacing_macros() {
        assert_eq!(clean_latex_whitespace("5\\qquad rest"), "5 rest");
        assert_eq!(clean_latex_whitespace("  a \n b  "), "a b");
        // \quadx is not a spacing macro
        assert_eq!(clean_latex_whitespace(r"\quadx"), r"\quadx");
    }

    #[test]
    fn test_clean_latex_leftright_keeps_arrows() {
        assert_eq!(clean_latex_leftright(r"\left(\frac12\right)"), r"(\frac12)");
        assert_eq!(clean_latex_leftright(r"a\rightarrow b"), r"a\rightarrow b");
    }

    #[test]
    fn test_remove_boxes_keep_content() {
        assert_eq!(remove_boxes_keep_content(r"\boxed{17}"), "17");
        assert_eq!(
            remove_boxes_keep_content(r"x = \boxed{\frac{1}{2}}"),
            r"x = \frac{1}{2}"
        );
        // unbalanced input is left untouched
        assert_eq!(remove_boxes_keep_content(r"\boxed{17"), r"\boxed{17");
    }
}
