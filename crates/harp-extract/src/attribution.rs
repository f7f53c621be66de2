//! Attribution filter: strips credit, signature, and link lines from
//! section bodies.
//!
//! Two passes. First, any line matching the manual block-list (after
//! trimming, case-insensitively) is dropped. Second, both ends of the
//! section are trimmed repeatedly until a fixed point: signatures stack
//! (credit line, blank line, another credit line), so a single pass is not
//! enough.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Signature prefix + attributed name, e.g. "Solution by foo_bar and baz",
/// "- Edited by somebody.", "(Credit: Someone)".
static RE_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    const PREFIX: &str = r"(?:By|Solution(?: Edited| Written)?|Edited|(?:Minor )?(?:clarity |LaTeX |)Edits?(?: made)?|(?:Second )?Editor|Proposed|Credit|(?:Original )?Diagram|Written|Latex)(?: (?:By|To))?:?";
    const USER: &str = r"[a-zA-Z][-_\w]*(?: [a-zA-Z][-_\w]*)?";
    Regex::new(&format!(
        r"(?i)^(?:-\s*)?\(?{PREFIX} ?{USER}(?:,? and {USER})?\.?\)?:?\s*$"
    ))
    .expect("valid signature regex")
});

/// A line opening with one to three tilde/dash characters and a name.
static RE_TILDE_SIGNATURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-~]{1,3} ?[A-Za-z]").expect("valid tilde sig regex"));

static RE_VVSSS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\s*vvsss\s*(?:</b>)?\s*\z").expect("valid vvsss regex"));
static RE_MATH1331: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A<i>Credit(?: to|:) Math1331Math</i>\z").expect("valid credit regex")
});
static RE_MATH_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    // e.g. "Solution by $\underline{\textbf{Invoker}}$"
    Regex::new(r"\ASolution by \$.+?\$\.?\z").expect("valid math signature regex")
});

/// A self-link left behind when solutions were copy-pasted from the
/// all-problems page. It carries no href, so the link-stripping pass in
/// the normalizer leaves it alone.
const SELF_LINK: &str = r#"<a class="mw-selflink selflink">Solution</a>"#;

/// Whole lines removed wherever they appear, matched case-insensitively
/// after trimming. Collected manually while auditing extraction output.
pub static MANUAL_LINE_FILTERS: &[&str] = &[
    "If there are any mistakes, feel free to edit so that it is correct.",
    "The problems on this page are copyrighted by the Mathematical Association of America's American Mathematics Competitions.",
    "<i>Credit for this solution goes to Ravi Boppana.</i>",
    "\"Credit: Skupp3\"",
    "Solasky (talk) 12:29, 27 May 2023 (EDT)",
    "Support Me",
    "pi_is_3.141",
    "-Credit to Adamz for diagram-",
    "This is not hard to derive using a basic knowledge of linear transformations. You can refer here for more information: https://en.wikipedia.org/wiki/Orthogonal_matrix",
    "-$\\LaTeX$ by Kevinliu08",
    "<b>-Solution by thecmd999</b>",
    "(The original author made a mistake in their solution. Corrected and further explained by dbnl.)",
    "_Diagram by 1-1 is 3_",
    "JINZHENQIAN",
    "Note: The diagram was not given during the actual contest.",
    "* Isogonal conjugate",
    "(Note: If you try to do this, first look through all the problems! -Guy)",
    "Edit from EthanSpoon, Doing this with only even numbers will make it faster.",
    "You'll see.",
    "02496",
    "<i>For more detailed explanations, see related problem (AIME I 2007, 10).</i>",
    "Fixed the link",
    "Solution edited by armang32324 and integralarefun",
    "(Note: This Solution is a lot faster if you rule out $(Y, Z) = (1, 7)$ due to degeneracy.)",
    "By J Steinhardt, from AoPS Community",
    "Problems 8,9 and 10 use the data found in the accompanying paragraph and table:",
    "Problems 8, 9 and 10 use the data found in the accompanying paragraph and figures",
    "(NOTE: Variation of other solutions)",
    "(JK lol)",
    "Problems 14, 15 and 16 involve Mrs. Reed's English assignment. ",
    "A Novel Assignment ",
    "For more information, see also  prime factorizations of a factorial.",
    "Solution by e_power_pi_times_i/edited by srisainandan6",
    "- (OmicronGamma)",
    "MegaBoy6679 :D 23:31, 26 December 2022 (EST)",
    "Sorry for the sloppy explanation. It's been two years since I've tried to give a solution to a problem, and this is the first time I've really used \\LaTeX. But I think this solution takes a different approach than the one above.",
    "--Lightest 15:31, 7 May 2012 (EDT)",
    "$\\phantom{solution and diagram by bobjoe123}$",
    "(Solution by unknown, latex/asy modified majorly by samrocksnature)",
    "courtesy v_enhance, minor clarification by integralarefun",
    "Amkan2022",
    "----MiracleMaths",
    "(Lokman G\u{00d6}K\u{00c7}E)",
    "The following solution is due to Gabriel Dospinescu and v_Enhance (also known as Evan Chen).",
    "Note: the original problem did not specify $n>1$, so $n=1$ was a solution, but this was fixed in the Wiki problem text so that the answer would make sense. -- @adihaya (talk) 15:23, 19 February 2016 (EST)",
    "This solution was brought to you by Leonard_my_dude.",
    "- [mathMagicOPS]",
    "Non-trig solution by e_power_pi_times_i",
    "This solution was brought to you by LEONARD_MY_DUDE",
    "by: CHECKMATE2021 (edited by CHECKMATE2021)",
    "Quality Control by fasterthanlight",
    "Credit to Michael Andrejkovics for providing the GeoGebra widget used to make these diagrams!",
    "This solution is brought to you by a1b2",
    "Solution by stephcurry added to the wiki by Thedoge edited by Rapurt9 and phoenixfire",
    "vvsss</b>   (Reconstruction)",
    "If you were stuck on this problem, refer to AOPS arithmetic lessons.",
    "(helped by qkddud)",
    "If you got stuck on this problem, refer to AOPS Number Theory. You're smart.",
    "If you got stuck on this problem, refer to AOPS Probability and Combinations",
    "Note: Please do not learn Barycentric Coordinates for the AMC 8.",
    "Jonathan Xu (pi_is_delicious_69420)",
    "<b>Contributors</b>",
    "(projecteulerlover)",
    "$\\textbf{Note: This is the same problem as 2018 USAJMO Problem 5.}$",
    "(Monday G. Fern)",
    "(sujaykazi)",
    "EarthSaver 15:13, 11 June 2021 (EDT)",
    "-very small latex edit from countmath1 :)",
    "Minor rephrasing for correctness and clarity ~ Technodoggo",
    "minor edit (the inclusion of not) by AlcBoy1729",
    "Note from ~milquetoast: I found this solution incredibly unspecific and difficult to understand, especially in defining C,  because of the wording. I think what this solution is trying to say is the same as the first video solution down below.",
    "Note from ~<B+: I also believe this solution is worded inefficiently and is not very comprehensible. I hope that someone can make this solution a little bit more understandably good as I'm not very good at explaining things so I cannot. :)",
    "<b>Contributors:</b>",
    "<b>- Emathmaster</b>",
    "- Diagram by Brendanb4321 extended by Duoquinquagintillion",
    "<b>SpecialBeing2017</b>",
    "This solution is directly based of @CantonMathGuy's solution.",
    "Thanks to MRENTHUSIASM for the inspiration!",
    "EarthSaver 15:12, 11 June 2021 (EDT)",
    "$\\textbf{- Emathmaster}$",
    "To see a diagram of $S(r)$, view TheBeautyofMath's explanation video (Video Solution 1).",
    "$\\LaTeX$ and formatting adjustments and intermediate steps for clarification by Technodoggo.",
    "This solution was brought to you by ~Leonard_my_dude~",
    "<i>~pog</i> ~MathFun1000 (Minor Edits)",
    "Edits and Diagram by ~KingRavi and",
    "cr. djmathman",
    "(NOTE: THE FOLLOWING DIAGRAM WAS NOT SHOWN DURING THE ACTUAL EXAM, BUT IS NOW HERE TO GUIDE STUDENTS IN PICTURING THE PROBLEM)",
    "(Note: you could also \"cheese\" this problem by brute force/listing out all of the letters horizontally in a single line and looking at the repeating pattern. Refer to solution 4)",
    "Solution by ILoveMath31415926535 and clarification edits by apex304",
    "(~edits by KMSONI)",
    "(Minor formatting by Technodoggo)",
    "(Clarity & formatting edits by Technodoggo)",
    "<font size=\"2\">Solution by Quantum-Phantom</font>",
    "This problem is the same as problem 7.64 in the Art of Problem Solving textbook Precalculus chapter 7 that asks to prove $\\tan{nx} = \\frac{\\binom{n}{1}\\tan{x} - \\binom{n}{3}\\tan^{3}{x} + \\binom{n}{5}\\tan^{5}{x} - \\binom{n}{7}\\tan^{7}{x} + \\dots}{1 - \\binom{n}{2}\\tan^{2}{x} + \\binom{n}{4}\\tan^{4}{x}  - \\binom{n}{6}\\tan^{6}{x} + \\dots}$",
    "A very similar solution offered by ~darrenn.cp and ~DarkPheonix has been combined with Solution 1.",
    "Minor corrections by",
    "Note from ~milquetoast: Alternatively, you can let $x$ be the square root of the larger number, but if you do that, keep in mind that $x=1$ must be rejected, since $(x-1)$ cannot be $0$.",
    // Incomplete olympiad solution placeholders
    "[WIP]",
    "Coming soon.",
    "No Solution Here Yet!",
    "<i>This problem needs a solution. If you have a solution for it, please help us out by <span class=\"plainlinks\">adding it</span>.</i>",
];

/// Read-only set of blocked lines, built once and passed explicitly into
/// the filter.
#[derive(Debug, Clone)]
pub struct LineFilterSet {
    blocked: HashSet<String>,
}

impl LineFilterSet {
    /// Build from an explicit list of lines.
    #[must_use]
    pub fn from_lines<'a, I: IntoIterator<Item = &'a str>>(lines: I) -> Self {
        Self {
            blocked: lines
                .into_iter()
                .map(|l| l.trim().to_lowercase())
                .collect(),
        }
    }

    fn is_blocked(&self, line: &str) -> bool {
        self.blocked.contains(&line.trim().to_lowercase())
    }
}

impl Default for LineFilterSet {
    fn default() -> Self {
        Self::from_lines(MANUAL_LINE_FILTERS.iter().copied())
    }
}

static DEFAULT_FILTERS: Lazy<LineFilterSet> = Lazy::new(LineFilterSet::default);

/// The default, process-wide filter set.
#[must_use]
pub fn default_filters() -> &'static LineFilterSet {
    &DEFAULT_FILTERS
}

/// Strip attribution lines from one section body. Idempotent: filtering
/// already-filtered text changes nothing.
#[must_use]
pub fn filter_attribution(text: &str, filters: &LineFilterSet) -> String {
    let mut lines: Vec<&str> = text
        .split('\n')
        .filter(|line| {
            if filters.is_blocked(line) {
                warn!("removing manually blocked line: {line}");
                false
            } else {
                true
            }
        })
        .collect();

    loop {
        let Some(&last) = lines.last() else { break };
        if last.is_empty() {
            lines.pop();
            continue;
        }
        if let Some(&first) = lines.first() {
            if first.is_empty() {
                lines.remove(0);
                continue;
            }
        }

        // Trailing link lines; users link their profiles and video solutions
        if last.contains("http") {
            warn!("removing trailing line with link: {last}");
            lines.pop();
            continue;
        }
        if last == SELF_LINK {
            warn!("removing solution self-link");
            lines.pop();
            continue;
        }
        if RE_TILDE_SIGNATURE.is_match(last)
            || RE_SIGNATURE.is_match(last)
            || RE_VVSSS.is_match(last)
            || RE_MATH1331.is_match(last)
            || RE_MATH_SIGNATURE.is_match(last)
        {
            warn!("removing trailing signature line: {last}");
            lines.pop();
            continue;
        }

        // Sometimes users sign at the start of a solution instead,
        // occasionally below a leading diagram
        let first = lines[0];
        if RE_SIGNATURE.is_match(first) {
            warn!("removing leading signature line: {first}");
            lines.remove(0);
            continue;
        }
        if first.starts_with("[asy]") && lines.len() > 1 && RE_SIGNATURE.is_match(lines[1]) {
            warn!("removing signature line after diagram: {}", lines[1]);
            lines.remove(1);
            continue;
        }

        break;
    }

    lines.join("\n")
}
