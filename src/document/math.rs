//! LaTeX-to-Unicode approximation for the preview pane.
//!
//! A terminal cannot typeset math, so `$…$` and `$$…$$` bodies are turned
//! into readable plain text: greek letters and operators become their
//! Unicode glyphs, `^`/`_` become super/subscripts where a glyph exists,
//! `\frac{a}{b}` becomes `a/b` and `\sqrt{x}` becomes `√x`.
//!
//! The bracket delimiters `\[…\]` (display) and `\(…\)` (inline) are
//! accepted too; [`normalize_delimiters`] rewrites them into the dollar
//! forms before the markdown parser runs.

use std::borrow::Cow;

/// Convert a LaTeX math body to Unicode text.
pub fn to_unicode(latex: &str) -> String {
    let mut converter = Converter {
        chars: latex.chars().collect(),
        pos: 0,
    };
    let out = converter.sequence(None);
    collapse_spaces(out.trim())
}

/// Rewrite `\[…\]` as `$$…$$` and `\(…\)` as `$…$`.
///
/// Fenced code blocks and code spans are copied untouched. A pair whose
/// body is empty, contains `$`, or crosses a blank line is left as written.
pub fn normalize_delimiters(source: &str) -> Cow<'_, str> {
    if !source.contains("\\[") && !source.contains("\\(") {
        return Cow::Borrowed(source);
    }
    let mut out = String::with_capacity(source.len());
    let mut prose = String::new();
    let mut fence: Option<(char, usize)> = None;
    for line in source.split_inclusive('\n') {
        let marker = fence_marker(line.trim_start());
        match (fence, marker) {
            (None, Some(open)) => {
                out.push_str(&rewrite_prose(&prose));
                prose.clear();
                fence = Some(open);
                out.push_str(line);
            }
            (Some(open), Some(close)) if close.0 == open.0 && close.1 >= open.1 => {
                fence = None;
                out.push_str(line);
            }
            (Some(_), _) => out.push_str(line),
            (None, None) => prose.push_str(line),
        }
    }
    out.push_str(&rewrite_prose(&prose));
    Cow::Owned(out)
}

/// Fence character and run length when `line` opens or closes a code fence.
fn fence_marker(line: &str) -> Option<(char, usize)> {
    let ch = line.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = line.chars().take_while(|c| *c == ch).count();
    (len >= 3).then_some((ch, len))
}

fn rewrite_prose(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(['\\', '`']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if rest.starts_with('`') {
            let ticks = tick_run(rest);
            let end = closing_ticks(&rest[ticks..], ticks).map_or(ticks, |e| ticks + e);
            out.push_str(&rest[..end]);
            rest = &rest[end..];
            continue;
        }

        let (close, delimiter) = if rest.starts_with("\\[") {
            ("\\]", "$$")
        } else if rest.starts_with("\\(") {
            ("\\)", "$")
        } else {
            // Keep escapes such as `\\(` or `\$` in one piece.
            let len = rest[1..].chars().next().map_or(1, |c| 1 + c.len_utf8());
            out.push_str(&rest[..len]);
            rest = &rest[len..];
            continue;
        };
        match math_body(&rest[2..], close) {
            Some(body) => {
                out.push_str(delimiter);
                out.push_str(body.replace('\n', " ").trim());
                out.push_str(delimiter);
                rest = &rest[2 + body.len() + close.len()..];
            }
            None => {
                out.push_str(&rest[..2]);
                rest = &rest[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn tick_run(text: &str) -> usize {
    text.len() - text.trim_start_matches('`').len()
}

/// Offset just past the next backtick run of exactly `n` ticks.
fn closing_ticks(text: &str, n: usize) -> Option<usize> {
    let mut from = 0;
    while let Some(pos) = text[from..].find('`') {
        let start = from + pos;
        let len = tick_run(&text[start..]);
        if len == n {
            return Some(start + n);
        }
        from = start + len;
    }
    None
}

fn math_body<'a>(text: &'a str, close: &str) -> Option<&'a str> {
    let body = &text[..text.find(close)?];
    let lines: Vec<&str> = body.split('\n').collect();
    let crosses_blank_line =
        lines.len() > 2 && lines[1..lines.len() - 1].iter().any(|l| l.trim().is_empty());
    (!body.trim().is_empty() && !body.contains('$') && !crosses_blank_line).then_some(body)
}

struct Converter {
    chars: Vec<char>,
    pos: usize,
}

impl Converter {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Convert atoms until `end` (consumed) or end of input.
    fn sequence(&mut self, end: Option<char>) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if Some(ch) == end {
                self.pos += 1;
                break;
            }
            self.atom(&mut out);
        }
        out
    }

    /// A braced group or a single atom, as used for command arguments.
    fn argument(&mut self) -> String {
        self.skip_spaces();
        if self.peek() == Some('{') {
            self.pos += 1;
            return self.sequence(Some('}'));
        }
        let mut out = String::new();
        self.atom(&mut out);
        out
    }

    fn atom(&mut self, out: &mut String) {
        let Some(ch) = self.bump() else {
            return;
        };
        match ch {
            '\\' => self.command(out),
            '^' => {
                let arg = self.argument();
                out.push_str(&render_script_text(&arg, true));
            }
            '_' => {
                let arg = self.argument();
                out.push_str(&render_script_text(&arg, false));
            }
            '{' => {
                let group = self.sequence(Some('}'));
                out.push_str(&group);
            }
            '}' => {}
            _ => out.push(ch),
        }
    }

    fn command(&mut self, out: &mut String) {
        let Some(first) = self.bump() else {
            return;
        };
        if !first.is_ascii_alphabetic() {
            match first {
                ',' | ';' | ':' | ' ' => out.push(' '),
                '\\' => out.push_str("; "),
                '!' => {}
                other => out.push(other),
            }
            return;
        }

        let mut name = String::from(first);
        while let Some(ch) = self.peek().filter(char::is_ascii_alphabetic) {
            name.push(ch);
            self.pos += 1;
        }

        match name.as_str() {
            "frac" | "dfrac" | "tfrac" => {
                let numerator = self.argument();
                let denominator = self.argument();
                out.push_str(&fraction(&numerator, &denominator));
            }
            "sqrt" => {
                self.skip_spaces();
                let index = if self.peek() == Some('[') {
                    self.pos += 1;
                    Some(self.sequence(Some(']')))
                } else {
                    None
                };
                let radicand = self.argument();
                if let Some(index) = index {
                    out.push_str(&render_script_text(&index, true));
                }
                out.push('√');
                out.push_str(&wrap_if_compound(&radicand));
            }
            "text" | "mathrm" | "mathbf" | "mathit" | "operatorname" | "mathbb" => {
                let arg = self.argument();
                out.push_str(&arg);
            }
            "left" | "right" | "displaystyle" | "limits" => {}
            "quad" | "qquad" => out.push_str("  "),
            _ => match symbol(&name) {
                Some(glyph) => out.push_str(glyph),
                None => out.push_str(&name),
            },
        }
    }
}

fn symbol(name: &str) -> Option<&'static str> {
    let glyph = match name {
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" | "varepsilon" => "ε",
        "zeta" => "ζ",
        "eta" => "η",
        "theta" => "θ",
        "kappa" => "κ",
        "lambda" => "λ",
        "mu" => "μ",
        "nu" => "ν",
        "xi" => "ξ",
        "pi" => "π",
        "rho" => "ρ",
        "sigma" => "σ",
        "tau" => "τ",
        "phi" | "varphi" => "φ",
        "chi" => "χ",
        "psi" => "ψ",
        "omega" => "ω",
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Theta" => "Θ",
        "Lambda" => "Λ",
        "Pi" => "Π",
        "Sigma" => "Σ",
        "Phi" => "Φ",
        "Psi" => "Ψ",
        "Omega" => "Ω",
        "int" => "∫",
        "iint" => "∬",
        "oint" => "∮",
        "sum" => "∑",
        "prod" => "∏",
        "infty" => "∞",
        "partial" => "∂",
        "nabla" => "∇",
        "pm" => "±",
        "mp" => "∓",
        "cdot" => "·",
        "times" => "×",
        "div" => "÷",
        "leq" | "le" => "≤",
        "geq" | "ge" => "≥",
        "neq" | "ne" => "≠",
        "approx" => "≈",
        "equiv" => "≡",
        "propto" => "∝",
        "to" | "rightarrow" => "→",
        "leftarrow" => "←",
        "Rightarrow" | "implies" => "⇒",
        "Leftrightarrow" | "iff" => "⇔",
        "in" => "∈",
        "notin" => "∉",
        "subset" => "⊂",
        "cup" => "∪",
        "cap" => "∩",
        "forall" => "∀",
        "exists" => "∃",
        "ldots" | "dots" => "…",
        "cdots" => "⋯",
        "lim" => "lim",
        "sin" => "sin",
        "cos" => "cos",
        "tan" => "tan",
        "log" => "log",
        "ln" => "ln",
        "exp" => "exp",
        _ => return None,
    };
    Some(glyph)
}

fn fraction(numerator: &str, denominator: &str) -> String {
    format!(
        "{}/{}",
        wrap_if_compound(numerator),
        wrap_if_compound(denominator)
    )
}

fn wrap_if_compound(text: &str) -> String {
    let text = text.trim();
    if !text.is_empty() && text.chars().all(char::is_alphanumeric) {
        text.to_string()
    } else {
        format!("({text})")
    }
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_space = false;
    for ch in text.chars() {
        if ch == ' ' {
            if !last_space {
                out.push(ch);
            }
            last_space = true;
        } else {
            out.push(ch);
            last_space = false;
        }
    }
    out
}

/// Render text as Unicode super/subscript, falling back to `^(…)`/`_(…)`
/// when any character has no glyph.
pub(crate) fn render_script_text(text: &str, superscript: bool) -> String {
    let text = text.trim();
    let mut mapped = String::new();
    for ch in text.chars() {
        let mapped_char = if superscript {
            superscript_char(ch)
        } else {
            subscript_char(ch)
        };
        let Some(mapped_char) = mapped_char else {
            let marker = if superscript { '^' } else { '_' };
            return if text.chars().count() == 1 {
                format!("{marker}{text}")
            } else {
                format!("{marker}({text})")
            };
        };
        mapped.push(mapped_char);
    }
    mapped
}

const fn superscript_char(ch: char) -> Option<char> {
    let mapped = match ch {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        'a' => 'ᵃ',
        'b' => 'ᵇ',
        'c' => 'ᶜ',
        'd' => 'ᵈ',
        'e' => 'ᵉ',
        'f' => 'ᶠ',
        'g' => 'ᵍ',
        'h' => 'ʰ',
        'i' => 'ⁱ',
        'j' => 'ʲ',
        'k' => 'ᵏ',
        'l' => 'ˡ',
        'm' => 'ᵐ',
        'n' => 'ⁿ',
        'o' => 'ᵒ',
        'p' => 'ᵖ',
        'r' => 'ʳ',
        's' => 'ˢ',
        't' => 'ᵗ',
        'u' => 'ᵘ',
        'v' => 'ᵛ',
        'w' => 'ʷ',
        'x' => 'ˣ',
        'y' => 'ʸ',
        'z' => 'ᶻ',
        '+' => '⁺',
        '-' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        _ => return None,
    };
    Some(mapped)
}

const fn subscript_char(ch: char) -> Option<char> {
    let mapped = match ch {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        'a' => 'ₐ',
        'e' => 'ₑ',
        'h' => 'ₕ',
        'i' => 'ᵢ',
        'j' => 'ⱼ',
        'k' => 'ₖ',
        'l' => 'ₗ',
        'm' => 'ₘ',
        'n' => 'ₙ',
        'o' => 'ₒ',
        'p' => 'ₚ',
        'r' => 'ᵣ',
        's' => 'ₛ',
        't' => 'ₜ',
        'u' => 'ᵤ',
        'v' => 'ᵥ',
        'x' => 'ₓ',
        '+' => '₊',
        '-' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_becomes_superscript() {
        assert_eq!(to_unicode("E = mc^2"), "E = mc²");
    }

    #[test]
    fn test_integral_with_bounds() {
        assert_eq!(
            to_unicode(r"\int_{a}^{b} f(x)dx = F(b) - F(a)"),
            "∫ₐᵇ f(x)dx = F(b) - F(a)"
        );
    }

    #[test]
    fn test_quadratic_formula() {
        assert_eq!(
            to_unicode(r"x = \frac{-b \pm \sqrt{b^2-4ac}}{2a}"),
            "x = (-b ± √(b²-4ac))/2a"
        );
    }

    #[test]
    fn test_simple_fraction_has_no_parentheses() {
        assert_eq!(to_unicode(r"\frac{1}{2}"), "1/2");
    }

    #[test]
    fn test_greek_and_operators() {
        assert_eq!(to_unicode(r"\alpha \cdot \beta \neq \pi"), "α · β ≠ π");
    }

    #[test]
    fn test_unmappable_script_falls_back() {
        assert_eq!(to_unicode("x_{q}"), "x_q");
        assert_eq!(to_unicode("x^{QR}"), "x^(QR)");
    }

    #[test]
    fn test_unknown_command_keeps_name() {
        assert_eq!(to_unicode(r"\foo x"), "foo x");
    }

    #[test]
    fn test_nth_root() {
        assert_eq!(to_unicode(r"\sqrt[3]{x}"), "³√x");
    }

    #[test]
    fn test_bracket_delimiters_become_dollars() {
        assert_eq!(normalize_delimiters(r"\[ x^2 \]"), "$$x^2$$");
        assert_eq!(
            normalize_delimiters(r"값은 \( a_1 \)입니다"),
            "값은 $a_1$입니다"
        );
        assert_eq!(
            normalize_delimiters("\\[\n\\sum_{i=1}^{n} i\n\\]\n"),
            "$$\\sum_{i=1}^{n} i$$\n"
        );
    }

    #[test]
    fn test_dollar_only_source_is_borrowed() {
        assert!(matches!(normalize_delimiters("$x$ 와 [링크]"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_code_is_left_alone() {
        let fenced = "```\n\\(x\\)\n```\n";
        assert_eq!(normalize_delimiters(fenced), fenced);
        let span = r"코드 `\(x\)` 와 \(y\)";
        assert_eq!(normalize_delimiters(span), r"코드 `\(x\)` 와 $y$");
    }

    #[test]
    fn test_unusable_pairs_are_kept() {
        assert_eq!(normalize_delimiters(r"\( \)"), r"\( \)");
        assert_eq!(normalize_delimiters(r"\(a$b\)"), r"\(a$b\)");
        assert_eq!(normalize_delimiters("\\[a\n\nb\\]"), "\\[a\n\nb\\]");
        assert_eq!(normalize_delimiters(r"\\(x\)"), r"\\(x\)");
        assert_eq!(normalize_delimiters(r"열기만 \( 있음"), r"열기만 \( 있음");
    }

    #[test]
    fn test_unbalanced_input_does_not_panic() {
        let _ = to_unicode(r"\frac{a");
        let _ = to_unicode("x^");
        let _ = to_unicode("}{");
        let _ = to_unicode("\\");
    }
}
