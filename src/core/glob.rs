//! Wildcard matching for autocomplete vocabularies.
//!
//! `*` matches any run of chars (including none), `?` matches exactly one char,
//! everything else matches itself. Matching is case-sensitive and anchored at
//! both ends.

pub fn glob_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let mut t = 0usize;
    let mut p = 0usize;
    // Last `*` seen in the pattern and the text position it was tried at.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some('?') => {
                t += 1;
                p += 1;
            }
            Some(ch) if *ch == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star, tried)) => {
                    p = star + 1;
                    t = tried + 1;
                    backtrack = Some((star, tried + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|ch| *ch == '*')
}
