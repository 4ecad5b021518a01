//! Longest Common Subsequence (LCS) via the classic full-table DP.
//!
//! The table `dp[i][j]` holds the LCS length of `x[0..i]` and `y[0..j]` for
//! `i` in `0..=x.len()` and `j` in `0..=y.len()`:
//!
//! - `dp[0][*] = dp[*][0] = 0`
//! - `dp[i][j] = dp[i-1][j-1] + 1` when `x[i-1] == y[j-1]`
//! - `dp[i][j] = max(dp[i-1][j], dp[i][j-1])` otherwise
//!
//! One maximal subsequence is then recovered by walking back from
//! `dp[n][m]`. Time and space are both O(n·m); this quadratic cost is what
//! the growth driver measures.
//!
//! ```
//! use lcs_growth::lcs::{lcs, lcs_length};
//!
//! assert_eq!(lcs("abcde", "ace"), "ace");
//! assert_eq!(lcs_length(b"ACCG", b"ACGC"), 3);
//! ```

use crate::error::{ProbeError, Result};

/// Bytes needed by the table for inputs of `n` and `m` elements.
///
/// `None` if the size does not fit in `usize`.
pub fn table_bytes(n: usize, m: usize) -> Option<usize> {
    n.checked_add(1)?
        .checked_mul(m.checked_add(1)?)?
        .checked_mul(std::mem::size_of::<u32>())
}

/// Filled DP table for a pair of sequences.
///
/// Cells are stored row-major in a single allocation of
/// `(x.len() + 1) * (y.len() + 1)` entries.
#[derive(Clone, Debug)]
pub struct LcsTable {
    rows: usize,
    cols: usize,
    cells: Vec<u32>,
}

impl LcsTable {
    /// Fill the table for `x` (rows) against `y` (columns).
    ///
    /// # Panics
    /// Panics if the table cannot be allocated; see [`try_build`](Self::try_build).
    pub fn build<T: PartialEq>(x: &[T], y: &[T]) -> Self {
        match Self::try_build(x, y) {
            Ok(table) => table,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fill the table, reporting an oversized or unallocatable table as
    /// [`ProbeError::TableTooLarge`] instead of aborting.
    pub fn try_build<T: PartialEq>(x: &[T], y: &[T]) -> Result<Self> {
        let span = tracing::trace_span!("lcs_table", rows = x.len(), cols = y.len());
        let _enter = span.enter();

        let rows = x.len().saturating_add(1);
        let cols = y.len().saturating_add(1);
        let too_large = || ProbeError::TableTooLarge { rows, cols };

        let len = rows.checked_mul(cols).ok_or_else(too_large)?;
        let mut cells: Vec<u32> = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| too_large())?;
        cells.resize(len, 0);

        for i in 1..rows {
            let (prev, curr) = cells[(i - 1) * cols..(i + 1) * cols].split_at_mut(cols);
            for j in 1..cols {
                curr[j] = if x[i - 1] == y[j - 1] {
                    prev[j - 1] + 1
                } else {
                    prev[j].max(curr[j - 1])
                };
            }
        }

        Ok(Self { rows, cols, cells })
    }

    /// Number of rows, `x.len() + 1`.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns, `y.len() + 1`.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// LCS length of `x[0..i]` and `y[0..j]`.
    ///
    /// # Panics
    /// Panics if `i >= rows()` or `j >= cols()`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> u32 {
        assert!(i < self.rows && j < self.cols, "cell ({i}, {j}) out of range");
        self.cells[i * self.cols + j]
    }

    /// LCS length of the full inputs, `dp[n][m]`.
    #[inline]
    pub fn length(&self) -> usize {
        self.cells.last().copied().unwrap_or(0) as usize
    }

    /// Recover one maximal common subsequence.
    ///
    /// `x` and `y` must be the sequences the table was built from. On a
    /// mismatch the walk moves toward the larger neighbour and prefers
    /// decrementing `i` when both neighbours are equal.
    pub fn backtrack<T: PartialEq + Clone>(&self, x: &[T], y: &[T]) -> Vec<T> {
        debug_assert_eq!(x.len() + 1, self.rows);
        debug_assert_eq!(y.len() + 1, self.cols);

        let mut i = x.len();
        let mut j = y.len();
        let mut rev = Vec::with_capacity(self.length());

        while i > 0 && j > 0 {
            if x[i - 1] == y[j - 1] {
                rev.push(x[i - 1].clone());
                i -= 1;
                j -= 1;
            } else if self.get(i - 1, j) >= self.get(i, j - 1) {
                i -= 1;
            } else {
                j -= 1;
            }
        }

        rev.reverse();
        rev
    }
}

/// Compute one longest common subsequence of two element slices.
pub fn lcs_of<T: PartialEq + Clone>(x: &[T], y: &[T]) -> Vec<T> {
    LcsTable::build(x, y).backtrack(x, y)
}

/// Compute one longest common subsequence of two strings, character-wise.
pub fn lcs(x: &str, y: &str) -> String {
    let xs: Vec<char> = x.chars().collect();
    let ys: Vec<char> = y.chars().collect();
    lcs_of(&xs, &ys).into_iter().collect()
}

/// LCS length only, using two rolling rows of `y.len() + 1` cells.
///
/// Independent of [`LcsTable`]; handy as a cross-check.
pub fn lcs_length<T: PartialEq>(x: &[T], y: &[T]) -> usize {
    let m = y.len();
    let mut prev = vec![0u32; m + 1];
    let mut curr = vec![0u32; m + 1];

    for cx in x {
        for j in 1..=m {
            let up = prev[j];
            let left = curr[j - 1];
            let diag = prev[j - 1] + u32::from(*cx == y[j - 1]);
            curr[j] = up.max(left).max(diag);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m] as usize
}

/// True if `needle` appears in `haystack` in order, not necessarily contiguously.
pub fn is_subsequence<T: PartialEq>(needle: &[T], haystack: &[T]) -> bool {
    let mut it = haystack.iter();
    needle.iter().all(|n| it.any(|h| h == n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textbook_pairs() {
        assert_eq!(lcs("abcde", "ace"), "ace");
        assert_eq!(lcs("abc", "abc"), "abc");
        assert_eq!(lcs("abc", "def"), "");
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(lcs("", "xyz"), "");
        assert_eq!(lcs("xyz", ""), "");
        assert_eq!(lcs("", ""), "");
        let t = LcsTable::build::<u8>(b"", b"");
        assert_eq!((t.rows(), t.cols(), t.length()), (1, 1, 0));
    }

    #[test]
    fn table_cells_match_recurrence() {
        let x = b"ABCBDAB";
        let y = b"BDCABA";
        let t = LcsTable::build(x, y);
        assert_eq!(t.length(), 4);
        for j in 0..t.cols() {
            assert_eq!(t.get(0, j), 0);
        }
        for i in 0..t.rows() {
            assert_eq!(t.get(i, 0), 0);
        }
        // Row 1 ("A") picks up the A at column 4.
        assert_eq!(t.get(1, 3), 0);
        assert_eq!(t.get(1, 4), 1);
    }

    #[test]
    fn tie_break_prefers_moving_up() {
        // Both "a" and "b" are maximal; dropping the last row first keeps y's tail.
        assert_eq!(lcs("ab", "ba"), "a");
        assert_eq!(lcs("ba", "ab"), "b");
    }

    #[test]
    fn length_cross_check() {
        let x = b"ACCGGTCGAGTGCGCGGAAGCCGGCCGAA";
        let y = b"GTCGTTCGGAATGCCGTTGCTCTGTAAA";
        let seq = lcs_of(x, y);
        assert_eq!(seq.len(), 20);
        assert_eq!(lcs_length(x, y), 20);
        assert!(is_subsequence(&seq, x));
        assert!(is_subsequence(&seq, y));
    }

    #[test]
    fn multibyte_characters() {
        assert_eq!(lcs("naïve", "native"), "nave");
    }

    #[test]
    fn subsequence_basics() {
        assert!(is_subsequence(b"", b"abc"));
        assert!(is_subsequence(b"ac", b"abc"));
        assert!(!is_subsequence(b"ca", b"abc"));
        assert!(!is_subsequence(b"abcd", b"abc"));
    }

    #[test]
    fn table_bytes_counts_border_cells() {
        assert_eq!(table_bytes(0, 0), Some(4));
        assert_eq!(table_bytes(10, 10), Some(121 * 4));
        assert_eq!(table_bytes(40_960, 40_960), Some(40_961 * 40_961 * 4));
        assert_eq!(table_bytes(usize::MAX, 0), None);
        assert_eq!(table_bytes(usize::MAX / 2, 8), None);
    }

    #[test]
    fn oversized_table_is_an_error() {
        // The cell count overflows usize; only the lengths matter, never the contents.
        let x = vec![(); usize::MAX / 2];
        let y = vec![(); 3];
        match LcsTable::try_build(&x, &y) {
            Err(ProbeError::TableTooLarge { rows, cols }) => {
                assert_eq!((rows, cols), (usize::MAX / 2 + 1, 4));
            }
            other => panic!("expected TableTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn unallocatable_table_is_an_error() {
        let x = vec![(); 1 << 31];
        let y = vec![(); 1 << 31];
        assert!(matches!(
            LcsTable::try_build(&x, &y),
            Err(ProbeError::TableTooLarge { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn get_out_of_range_panics() {
        LcsTable::build(b"ab", b"c").get(3, 0);
    }
}
