//! "Did you mean" suggestions for misspelled commands, options and names.

use strsim::damerau_levenshtein;

/// An edit distance is worth suggesting when it is at most this fraction of
/// the suggestion's length.
const SIMILAR_ENOUGH: f64 = 0.37;

/// The entries of `known` closest to `unknown`, sorted. Every entry tied for
/// the closest distance is returned. An exact match, or a closest entry that
/// is too different, yields nothing.
pub fn similar<'a>(unknown: &str, known: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut scored: Vec<(usize, &str)> = known
        .into_iter()
        .map(|k| (damerau_levenshtein(unknown, k), k))
        .collect();
    scored.sort_unstable();
    scored.dedup();

    let Some(&(best, closest)) = scored.first() else {
        return Vec::new();
    };
    if best == 0 || !similar_enough(best, closest.chars().count()) {
        return Vec::new();
    }
    scored
        .into_iter()
        .take_while(|(d, _)| *d == best)
        .map(|(_, k)| k)
        .collect()
}

fn similar_enough(distance: usize, len: usize) -> bool {
    distance as f64 <= (len as f64 * SIMILAR_ENOUGH + 0.5).floor()
}

/// The closest entries of `known` as a quoted list: `"a"`, `"a" or "b"`, or
/// `"a", "b", or "c"`.
pub fn hint<'a>(unknown: &str, known: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let quoted: Vec<String> = similar(unknown, known)
        .into_iter()
        .map(|w| format!("\"{w}\""))
        .collect();
    match quoted.as_slice() {
        [] => None,
        [one] => Some(one.clone()),
        [a, b] => Some(format!("{a} or {b}")),
        [rest @ .., last] => Some(format!("{}, or {last}", rest.join(", "))),
    }
}

/// `"; did you mean HINT?"`, or nothing without a hint.
pub fn did_you_mean(hint: Option<&str>) -> String {
    hint.map(|h| format!("; did you mean {h}?"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_option() {
        let known = ["east-const", "noeast-const", "semicolon", "nosemicolon"];
        assert_eq!(similar("eastconst2", known), vec!["east-const"]);
        assert_eq!(hint("semicolin", known).as_deref(), Some("\"semicolon\""));
    }

    #[test]
    fn test_exact_or_distant_gives_nothing() {
        assert!(similar("show", ["show", "set"]).is_empty());
        assert!(similar("frobnicate", ["debug", "using"]).is_empty());
        assert!(similar("x", std::iter::empty()).is_empty());
    }

    #[test]
    fn test_ties_are_listed() {
        assert_eq!(
            hint("sit", ["sun", "set", "sat"]).as_deref(),
            Some("\"sat\" or \"set\"")
        );
        assert_eq!(
            hint("cast", ["east", "cats", "case"]).as_deref(),
            Some("\"case\", \"cats\", or \"east\"")
        );
    }

    #[test]
    fn test_did_you_mean() {
        assert_eq!(did_you_mean(Some("\"q\"")), "; did you mean \"q\"?");
        assert_eq!(did_you_mean(None), "");
    }
}
