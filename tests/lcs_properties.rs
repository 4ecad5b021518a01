use lcs_growth::lcs::{is_subsequence, lcs, lcs_length, LcsTable};
use proptest::prelude::*;

fn full_lcs_len(s: &[u8], t: &[u8]) -> usize {
    let n = s.len();
    let m = t.len();
    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            let up = dp[i - 1][j];
            let left = dp[i][j - 1];
            let diag = dp[i - 1][j - 1] + usize::from(s[i - 1] == t[j - 1]);
            dp[i][j] = up.max(left).max(diag);
        }
    }
    dp[n][m]
}

/// Exhaustive maximum over all subsequences of `s` (only for tiny inputs).
fn brute_force_len(s: &[u8], t: &[u8]) -> usize {
    let n = s.len();
    (0u32..(1 << n))
        .filter_map(|mask| {
            let sub: Vec<u8> = (0..n).filter(|i| mask & (1 << i) != 0).map(|i| s[i]).collect();
            is_subsequence(&sub, t).then_some(sub.len())
        })
        .max()
        .unwrap_or(0)
}

proptest! {
    #[test]
    fn result_is_common_subsequence(a in "[a-d]{0,24}", b in "[a-d]{0,24}") {
        let r = lcs(&a, &b);
        prop_assert!(is_subsequence(r.as_bytes(), a.as_bytes()));
        prop_assert!(is_subsequence(r.as_bytes(), b.as_bytes()));
    }

    #[test]
    fn length_is_symmetric(a in "[a-z]{0,30}", b in "[a-z]{0,30}") {
        prop_assert_eq!(lcs(&a, &b).len(), lcs(&b, &a).len());
    }

    #[test]
    fn length_bounded_by_shorter_input(a in "[a-c]{0,20}", b in "[a-c]{0,20}") {
        prop_assert!(lcs(&a, &b).len() <= a.len().min(b.len()));
    }

    #[test]
    fn table_matches_reference_and_rolling_rows(a in "[ACGT]{0,16}", b in "[ACGT]{0,16}") {
        let s = a.as_bytes();
        let t = b.as_bytes();
        let expected = full_lcs_len(s, t);
        prop_assert_eq!(LcsTable::build(s, t).length(), expected);
        prop_assert_eq!(lcs_length(s, t), expected);
        prop_assert_eq!(lcs(&a, &b).len(), expected);
    }

    #[test]
    fn matches_brute_force_on_tiny_inputs(a in "[ab]{0,8}", b in "[ab]{0,8}") {
        prop_assert_eq!(lcs(&a, &b).len(), brute_force_len(a.as_bytes(), b.as_bytes()));
    }

    #[test]
    fn empty_side_gives_empty_result(a in "[a-z]{0,40}") {
        prop_assert_eq!(lcs(&a, ""), "");
        prop_assert_eq!(lcs("", &a), "");
    }

    #[test]
    fn self_lcs_is_identity(a in "[a-z]{0,40}") {
        prop_assert_eq!(lcs(&a, &a), a);
    }
}
