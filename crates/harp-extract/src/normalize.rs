//! Markup normalizer: rewrites one raw wiki page into a flat, tagged text
//! blob with `# Problem` / `# Solution ...` heading lines.
//!
//! The passes are ordered and composable; later passes assume earlier ones
//! ran. The whole stage is a pure best-effort rewrite: it never fails, and
//! structural problems surface later in segmentation.

use log::warn;
use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::latex::{find_closing_brace, standardize_boxed_command};

// -- Block-structure rewrites --
static RE_TOC_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<div [^>]*?"toc"[^>]?>"#).expect("valid toc regex"));
static RE_HR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*<hr />\s*").expect("valid hr regex"));
static RE_EMPTY_P: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<p class="mw-empty-elt">\s*</p>"#).expect("valid empty p regex")
});
static RE_FLOAT_DIV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:<div class="(?:center|float(?:right|left|none))">)+(.+?)(?:</div>)+"#)
        .expect("valid float div regex")
});
static RE_CENTER_DIV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:<div style="text-align:center;?">)+(.+?)(?:</div>)+"#)
        .expect("valid center div regex")
});

// -- List rewrites --
static RE_OL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<ol[^>]*?>(.+?)</ol>").expect("valid ol regex"));
static RE_LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<li>(.*?)</li>|<p>(.*?)</p>").expect("valid list item regex")
});
static RE_UL_DL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)[du]l[^>]*?>").expect("valid ul/dl regex"));
static RE_LI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<li>(.+?)</li>").expect("valid li regex"));
static RE_DD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<dd>(.+?)</dd>").expect("valid dd regex"));
static RE_DT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<dt>(.+?)</dt>").expect("valid dt regex"));
static RE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"::marker\s*").expect("valid marker regex"));
static RE_STRAY_P_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?p>").expect("valid stray p regex"));

// -- Paragraph collapsing --
static RE_NESTED_P_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>\s*<p>").expect("valid nested p regex"));
static RE_NESTED_P_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</p>\s*</p>").expect("valid nested close regex"));
static RE_ADJACENT_P_NL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</p>\n+<p>").expect("valid adjacent p regex"));
static RE_ADJACENT_P_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</p>\s+<p>").expect("valid adjacent ws regex"));

// -- Inline rewrites --
static RE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a .*?href=".+?>(.+?)</a>"#).expect("valid link regex"));
static RE_IMG_ALT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img[^>]*alt="([^"]*)"[^>]*>"#).expect("valid img regex"));
static RE_IMG_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\A.*\.(?:png|jpeg|jpg|gif)\z").expect("valid filename regex")
});

// -- Section harvesting --
static RE_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)>([^<]*Problem ?#?\d*|Solution[^<]*)<[^\n]*\n<p>(.*?)</p>")
        .expect("valid section regex")
});

// -- Per-section cleanup --
static RE_ASY_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[asy\](.*?)\[/asy\]").expect("valid asy regex"));
static RE_ASY_STAR_CREDIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*[^*]*by[^*]*\*/").expect("valid asy credit regex"));
static RE_ASY_STAR_USER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*[^*]*[Aa]zjps[^*]*\*/").expect("valid asy user regex"));
static RE_TILDE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^~.*").expect("valid tilde line regex"));
static RE_TRAILING_SIG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\s[~-][A-Za-z][-_\w]*$").expect("valid trailing sig regex"));
static RE_ALT_SOLN_PROMPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<i>Alternate solutions.*?</i>").expect("valid alt soln regex")
});
static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+").expect("valid email regex"));
static RE_EMPTY_DISPLAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\[\\\]").expect("valid empty display regex"));
static RE_MATHJAX_DISPLAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[mathjax display=true\](.*?)\[/mathjax\]").expect("valid mathjax regex")
});
static RE_MATHJAX_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[mathjax\](.*?)\[/mathjax\]").expect("valid mathjax inline regex")
});
static RE_AUTHOR_ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\(<i>[^<>]+?</i>\)\s*").expect("valid author regex"));
static RE_AUTHOR_PLAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A\([a-zA-Z]+ [a-zA-Z]+\)\s*").expect("valid author plain regex")
});
static RE_MULTI_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("valid newline regex"));

/// Asymptote `//` credit comments. The HTML does not preserve the newlines
/// Asymptote comments rely on, so known credit lines are scrubbed by
/// pattern instead.
static ASY_CREDIT_COMMENTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    const COMMON: &str =
        r"//\s*(?:[Cc]redit|[Mm]ade|[Dd]iagram|[Cc]reated|[Cc]hanges made) (?:by|to) \w+( and \w+)?";
    let literals = [
        "// pog diagram ",
        "// Credits given to Themathguyd\u{200e} and Kante314 ",
        "// Asymptote by Technodoggo; August 16, 2024 ",
        "//Made by Afly. I used some resources. //Took me 10 min to get everything right. ",
        "// TheMathGuyd ",
        "// Diagram by TheMathGuyd. I can compress this later ",
        "// Diagram by TheMathGuyd. Found cubic, so graph is perfect. ",
        "// Diagram by TheMathGuyd. I even put the lined texture :) ",
        "//Restored original diagram. Alter it if you would like, but it was made by TheMathGuyd, I even put the lined texture :) ",
        "// Thank you Kante314 for inspiring thicker arrows. They do look much better ",
        "//(Diagram Creds-DivideBy0)",
    ];
    let mut patterns: Vec<String> = literals.iter().map(|l| regex::escape(l)).collect();
    patterns.push(format!(r"{COMMON} give me 1 billion dollars for this\.?\s*"));
    patterns.push(format!(r"{COMMON} for the asymptote\.?\s*"));
    patterns.push(format!(r"{COMMON} for the diagram\.?\s*"));
    patterns.push(format!(r"{COMMON}(?:,| and) edited by \w+\.?\s*"));
    patterns.push(format!(r"{COMMON}\.?\s*"));
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid asy credit pattern"))
        .collect()
});

/// Which kind of section a heading introduces; drives the per-section
/// cleanup differences (author prefixes vs boxed-answer placement).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionRole {
    Problem,
    Solution,
}

/// Normalize one raw wiki page into the tagged text blob consumed by the
/// segmenter. Pure and infallible: anything unrecognized passes through
/// and is dealt with downstream.
#[must_use]
pub fn normalize_page(raw: &str) -> String {
    let html = strip_toc_block(raw);
    let html = RE_HR.replace_all(&html, "");
    let html = RE_EMPTY_P.replace_all(&html, "");
    // <center> behaves exactly like a paragraph wrapper here
    let html = html.replace("center>", "p>");
    let html = RE_FLOAT_DIV.replace_all(&html, "<p>$1</p>");
    let html = RE_CENTER_DIV.replace_all(&html, "<p>$1</p>");

    let html = RE_OL.replace_all(&html, |caps: &Captures<'_>| convert_ordered_list(&caps[1]));
    let html = RE_UL_DL.replace_all(&html, "<${1}p>");
    let html = RE_LI.replace_all(&html, "* $1\n");
    let html = RE_DD.replace_all(&html, "$1\n");
    let html = RE_DT.replace_all(&html, "$1\n");
    let html = RE_MARKER.replace_all(&html, "");

    // Collapse nested then adjacent paragraph wrappers
    let html = RE_NESTED_P_OPEN.replace_all(&html, "<p>");
    let html = RE_NESTED_P_CLOSE.replace_all(&html, "</p>");
    let html = html.replace("</p><p>", "");
    let html = RE_ADJACENT_P_NL.replace_all(&html, "\n");
    let html = RE_ADJACENT_P_WS.replace_all(&html, " ");

    let html = html.replace("<br />", "\n");
    let html = RE_LINK.replace_all(&html, "$1");

    let mut blocks = Vec::new();
    for caps in RE_SECTION.captures_iter(&html) {
        let heading = caps[1].trim();
        let (label, role) = if heading.starts_with("Problem") {
            // Heading suffixes like "Problem 12" carry no information here;
            // the page key already identifies the problem.
            ("Problem".to_string(), SectionRole::Problem)
        } else {
            (heading.to_string(), SectionRole::Solution)
        };
        let body = clean_section(&caps[2], role);
        blocks.push(format!("# {label}\n{body}"));
    }
    blocks.join("\n")
}

/// Remove the table-of-contents navigation block by tag-depth counting.
/// Nesting is unbounded, so this is a character scan, not a regex.
fn strip_toc_block(html: &str) -> String {
    let Some(open) = RE_TOC_OPEN.find(html) else {
        return html.to_string();
    };
    let start = open.end();
    let bytes = html.as_bytes();
    let mut depth: u32 = 1;
    let mut i = start;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            if html[i..].starts_with("<div") {
                depth += 1;
            } else if html[i..].starts_with("</div>") {
                depth -= 1;
                if depth == 0 {
                    return format!("{}{}", html[..start].trim(), html[i + 6..].trim());
                }
            }
        }
        i += 1;
    }
    warn!("unterminated toc block; leaving page unchanged");
    html.to_string()
}

/// Rewrite `<ol>` content into `N. `-prefixed lines, numbering items
/// sequentially from 1. Interleaved paragraphs become unnumbered lines.
fn convert_ordered_list(inner: &str) -> String {
    let mut lines = Vec::new();
    let mut item_no = 0usize;
    for caps in RE_LIST_ITEM.captures_iter(inner) {
        if let Some(item) = caps.get(1) {
            item_no += 1;
            let elem = strip_item_markup(item.as_str());
            lines.push(format!("{item_no}. {elem}"));
        } else if let Some(para) = caps.get(2) {
            lines.push(strip_item_markup(para.as_str()));
        }
    }
    format!("<p>{}</p>", lines.join("\n"))
}

fn strip_item_markup(item: &str) -> String {
    let item = RE_MARKER.replace_all(item.trim(), "");
    RE_STRAY_P_TAG.replace_all(&item, "").into_owned()
}

/// Recover image alt text. LaTeX alt text is the source markup and is kept;
/// file names and captions are dropped.
fn replace_img_alt_text(text: &str) -> String {
    RE_IMG_ALT
        .replace_all(text, |caps: &Captures<'_>| recover_alt_text(&caps[1]))
        .into_owned()
}

fn recover_alt_text(alt: &str) -> String {
    if RE_IMG_FILENAME.is_match(alt) {
        warn!("dropping image alt text that looks like a file name: {alt}");
        return String::new();
    }

    let looks_like_latex = (alt.starts_with('$') && alt.ends_with('$'))
        || (alt.starts_with("\\[") && alt.ends_with("\\]"))
        || (alt.starts_with("\\(") && alt.ends_with("\\)"))
        || alt.starts_with("\\begin{")
        || (alt.starts_with("[asy]") && alt.ends_with("[/asy]"));
    if looks_like_latex {
        let interior = &alt[1..alt.len() - 1];
        if interior.contains('$') && !alt.starts_with("[asy]") {
            // A raw $ inside math alt text would terminate the expression
            // early once re-wrapped.
            warn!("escaping embedded $ in latex alt text: {alt}");
            let first = &alt[..1];
            let last = &alt[alt.len() - 1..];
            return format!("{first}{}{last}", interior.replace('$', "\\textdollar"));
        }
        return alt.to_string();
    }

    warn!("dropping image alt text that doesn't look like latex: {alt}");
    String::new()
}

fn clean_asymptote(asy: &str) -> String {
    let asy = RE_ASY_STAR_CREDIT.replace_all(asy, "");
    let mut asy = RE_ASY_STAR_USER.replace_all(&asy, "").into_owned();
    for pattern in ASY_CREDIT_COMMENTS.iter() {
        asy = pattern.replace_all(&asy, "").into_owned();
    }
    asy
}

fn unescape_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", "\u{00a0}")
        .replace("&#160;", "\u{00a0}")
        .replace("&ndash;", "\u{2013}")
        .replace("&mdash;", "\u{2014}")
        .replace("&amp;", "&")
}

/// Fixed Unicode-to-ASCII/LaTeX substitutions seen in wiki content.
fn replace_unicode_chars(text: &str) -> String {
    const TABLE: [(char, &str); 11] = [
        ('\u{00a0}', " "),  // non-breaking space
        ('\u{200b}', ""),   // zero-width space
        ('\u{2018}', "'"),
        ('\u{2019}', "'"),
        ('\u{201c}', "'"),
        ('\u{201d}', "'"),
        ('\u{ff0c}', ", "), // full-width comma
        ('\u{2013}', "-"),
        ('\u{2014}', "--"),
        ('\u{301c}', "~"),
        ('\u{00a9}', "(C)"),
    ];
    let mut out = text.to_string();
    for (from, to) in TABLE {
        if out.contains(from) {
            out = out.replace(from, to);
        }
    }
    out
}

fn clean_section(body: &str, role: SectionRole) -> String {
    let text = replace_img_alt_text(body);
    let text = RE_ASY_BLOCK.replace_all(&text, |caps: &Captures<'_>| {
        format!("[asy]{}[/asy]", clean_asymptote(&caps[1]))
    });
    // Usernames tend to appear on newlines starting with '~', or dangling
    // at line ends
    let text = RE_TILDE_LINE.replace_all(&text, "");
    let text = RE_TRAILING_SIG.replace_all(&text, "");
    let text = RE_ALT_SOLN_PROMPT.replace_all(&text, "");
    let text = standardize_boxed_command(&text);
    let text = unescape_entities(&text);
    let text = replace_unicode_chars(&text);
    let text = RE_EMAIL.replace_all(&text, "");
    let text = RE_EMPTY_DISPLAY.replace_all(&text, "");
    let text = RE_MATHJAX_DISPLAY.replace_all(&text, r"\[${1}\]");
    let mut text = RE_MATHJAX_INLINE
        .replace_all(&text, "$$${1}$$")
        .into_owned();

    match role {
        SectionRole::Problem => {
            // Some olympiad problems start with the proposer's name
            text = RE_AUTHOR_ITALIC.replace(&text, "").into_owned();
            text = RE_AUTHOR_PLAIN.replace(&text, "").into_owned();
        }
        SectionRole::Solution => {
            text = move_leading_boxed_to_end(&text);
        }
    }

    RE_MULTI_NEWLINE.replace_all(&text, "\n").into_owned()
}

/// Some solutions open with the bare boxed answer. Move it behind the
/// explanation so answer extraction still finds the last boxed value.
fn move_leading_boxed_to_end(text: &str) -> String {
    const PREFIX: &str = "$\\boxed{";
    if !text.starts_with(PREFIX) || text.matches("\\boxed{").count() != 1 {
        return text.to_string();
    }
    let Some(close) = find_closing_brace(&text[PREFIX.len()..]) else {
        return text.to_string();
    };
    // past the closing brace and the trailing '$'
    let end = PREFIX.len() + close + 2;
    if end > text.len() || text[end..].trim().is_empty() {
        return text.to_string();
    }
    warn!("moving leading boxed value to end of solution");
    format!("{}\n{}", text[end..].trim(), &text[..end])
}
