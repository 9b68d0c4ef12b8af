//! Growing-prefix decomposition of a sort sequence.

/// Return every non-empty prefix of `sequence`, shortest first.
///
/// `expand(&[a, b, c])` is `[[a], [a, b], [a, b, c]]`; an empty input yields no prefixes.
/// Each prefix becomes one conjunctive term of a keyset predicate: equal on every key but
/// the last, strictly past the cursor on the last.
pub fn expand<T>(sequence: &[T]) -> Vec<&[T]> {
   (1..=sequence.len()).map(|end| &sequence[..end]).collect()
}
