use itertools::Itertools;

/// Joins phrases the way they are read aloud: `A`, `A and B`, `A, B, and C`.
pub fn join_natural<S: AsRef<str>>(items: &[S]) -> String {
    let items: Vec<&str> = items.iter().map(|s| s.as_ref()).collect();
    match items.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] => format!("{}, and {}", init.iter().join(", "), last),
    }
}
