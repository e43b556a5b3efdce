//! String helpers for literal insertion into pattern-driven substitutions.

/// Double every `$` so the text survives a `regex` replacement verbatim.
///
/// `regex` treats `$name` / `${n}` in replacement strings as capture
/// references; `$$` is its escape for a literal dollar sign. Every piece of
/// user content re-inserted through [`regex::Regex::replacen`] goes through
/// this first.
pub fn escape_for_substitution(s: &str) -> String {
    s.replace('$', "$$")
}

/// Backslash-escape every regular-expression metacharacter in `s`.
pub fn escape_for_pattern(s: &str) -> String {
    regex::escape(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn substitution_doubles_dollars() {
        assert_eq!(escape_for_substitution("$5 and $$"), "$$5 and $$$$");
        assert_eq!(escape_for_substitution("no dollars"), "no dollars");
    }

    #[test]
    fn escaped_replacement_is_literal() {
        let re = Regex::new("X").unwrap();
        let original = "$5 and $$ and ${name} and $0";
        let out = re.replacen("[X]", 1, escape_for_substitution(original).as_str());
        assert_eq!(out, format!("[{original}]"));
    }

    #[test]
    fn pattern_escape_matches_literally() {
        let needle = "a.b*c?(d)[e]{f}^g$h|i\\j+";
        let re = Regex::new(&escape_for_pattern(needle)).unwrap();
        assert!(re.is_match(&format!("prefix {needle} suffix")));
        assert!(!re.is_match("aXb*c?(d)[e]{f}^g$h|i\\j+"));
    }
}
