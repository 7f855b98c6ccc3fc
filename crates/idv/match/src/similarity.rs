//! Normalized string similarity.
//!
//! Ratcliff/Obershelp sequence ratio: twice the number of matching
//! characters over the total length, where matches are found by
//! recursively splitting around the longest common contiguous block.
//! Comparison is case-insensitive. The score is in [0, 1]; it is not a
//! metric distance.

/// Similarity ratio between two strings in [0, 1].
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    // Canonical operand order keeps the ratio symmetric.
    let (a, b) = if a <= b { (a, b) } else { (b, a) };

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2.0 * matching_chars(&a, &b) as f64) / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (ai, bi, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..ai], &b[..bi]) + matching_chars(&a[ai + len..], &b[bi + len..])
}

/// Longest common contiguous block as `(start_a, start_b, length)`;
/// ties resolve to the earliest position in `a`, then in `b`.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        let mut curr = vec![0usize; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let len = prev[j] + 1;
                curr[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        prev = curr;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(similarity("John Smith", "John Smith"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn comparison_is_case_insensitive() {
        assert_eq!(similarity("JOHN SMITH", "john smith"), 1.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn single_character_typo_lands_in_the_partial_band() {
        // "John Smith" vs "Jon Smith": 9 matching chars over 19 total.
        let sim = similarity("John Smith", "Jon Smith");
        assert!((sim - 18.0 / 19.0).abs() < 1e-9);
        assert!((0.75..0.95).contains(&sim));
    }

    #[test]
    fn unrelated_names_fall_below_the_mismatch_threshold() {
        assert!(similarity("John Smith", "Jane Doe") < 0.75);
    }

    proptest! {
        #[test]
        fn reflexive(s in ".*") {
            prop_assert_eq!(similarity(&s, &s), 1.0);
        }

        #[test]
        fn symmetric(a in ".*", b in ".*") {
            prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
        }

        #[test]
        fn bounded(a in ".*", b in ".*") {
            let sim = similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&sim));
        }
    }
}
