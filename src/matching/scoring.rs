use serde::{Deserialize, Serialize};

/// Safely convert usize to f64 for ratio calculations
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Costs of the edit operations that transform a query into a candidate.
///
/// Deleting characters of the query is expensive on purpose: a partial copy usually
/// misses characters of the callsign, it rarely contains characters that are not
/// there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditCosts {
    /// Cost of inserting a candidate character
    pub insert: u32,
    /// Cost of deleting a query character
    pub delete: u32,
    /// Cost of replacing a query character with a different candidate character
    pub substitute: u32,
}

impl Default for EditCosts {
    fn default() -> Self {
        Self {
            insert: 1,
            delete: 100,
            substitute: 2,
        }
    }
}

/// A single step of an edit script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Match,
    Insert,
    Delete,
    Substitute,
}

/// Cost matrix of transforming `source` into `target`.
///
/// `matrix[i][j]` is the cheapest way to turn the first `i` source characters into
/// the first `j` target characters; the distance is `matrix[source.len()][target.len()]`.
#[must_use]
pub fn cost_matrix(source: &[u8], target: &[u8], costs: &EditCosts) -> Vec<Vec<u32>> {
    let mut matrix = vec![vec![0u32; target.len() + 1]; source.len() + 1];

    for (i, row) in matrix.iter_mut().enumerate().skip(1) {
        row[0] = matrix_cost(i, costs.delete);
    }
    for (j, cell) in matrix[0].iter_mut().enumerate().skip(1) {
        *cell = matrix_cost(j, costs.insert);
    }

    for i in 1..=source.len() {
        for j in 1..=target.len() {
            let diagonal = if source[i - 1] == target[j - 1] {
                matrix[i - 1][j - 1]
            } else {
                matrix[i - 1][j - 1].saturating_add(costs.substitute)
            };
            let deletion = matrix[i - 1][j].saturating_add(costs.delete);
            let insertion = matrix[i][j - 1].saturating_add(costs.insert);
            matrix[i][j] = diagonal.min(deletion).min(insertion);
        }
    }

    matrix
}

fn matrix_cost(count: usize, cost: u32) -> u32 {
    u32::try_from(count).map_or(u32::MAX, |c| c.saturating_mul(cost))
}

/// The distance in a matrix built by [`cost_matrix`]
#[must_use]
pub fn distance(matrix: &[Vec<u32>]) -> u32 {
    matrix
        .last()
        .and_then(|row| row.last())
        .copied()
        .unwrap_or_default()
}

/// Walk back from the bottom-right cell of the matrix and record the operations.
///
/// When several operations lead to the same cost, the walk prefers Delete, then
/// Insert, then Substitute, then Match. The script is returned in source order.
#[must_use]
pub fn edit_script(
    matrix: &[Vec<u32>],
    source: &[u8],
    target: &[u8],
    costs: &EditCosts,
) -> Vec<EditOp> {
    let mut script = Vec::with_capacity(source.len().max(target.len()));
    let (mut i, mut j) = (source.len(), target.len());

    while i > 0 || j > 0 {
        let current = matrix[i][j];
        if i > 0 && matrix[i - 1][j].saturating_add(costs.delete) == current {
            script.push(EditOp::Delete);
            i -= 1;
        } else if j > 0 && matrix[i][j - 1].saturating_add(costs.insert) == current {
            script.push(EditOp::Insert);
            j -= 1;
        } else if i > 0
            && j > 0
            && source[i - 1] != target[j - 1]
            && matrix[i - 1][j - 1].saturating_add(costs.substitute) == current
        {
            script.push(EditOp::Substitute);
            i -= 1;
            j -= 1;
        } else if i > 0
            && j > 0
            && source[i - 1] == target[j - 1]
            && matrix[i - 1][j - 1] == current
        {
            script.push(EditOp::Match);
            i -= 1;
            j -= 1;
        } else {
            // Only reachable with a matrix that was not built from these inputs
            break;
        }
    }

    script.reverse();
    script
}

/// Ratio of the combined length that is not covered by edit costs.
///
/// Returns 1.0 for two empty strings and is clamped to `[0, 1]`, since a single
/// deletion may cost more than both strings are long.
#[must_use]
pub fn accuracy(source_len: usize, target_len: usize, distance: u32) -> f64 {
    let total = source_len + target_len;
    if total == 0 {
        return 1.0;
    }
    let total = count_to_f64(total);
    ((total - f64::from(distance)) / total).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script_for(source: &str, target: &str, costs: &EditCosts) -> (u32, Vec<EditOp>) {
        let matrix = cost_matrix(source.as_bytes(), target.as_bytes(), costs);
        let script = edit_script(&matrix, source.as_bytes(), target.as_bytes(), costs);
        (distance(&matrix), script)
    }

    #[test]
    fn test_identical() {
        let (distance, script) = script_for("DL1ABC", "DL1ABC", &EditCosts::default());
        assert_eq!(distance, 0);
        assert!(script.iter().all(|op| *op == EditOp::Match));
        assert_eq!(script.len(), 6);
    }

    #[test]
    fn test_insertions_are_cheap() {
        let (distance, script) = script_for("D1AB", "DL1ABC", &EditCosts::default());
        assert_eq!(distance, 2);
        assert_eq!(
            script,
            vec![
                EditOp::Match,
                EditOp::Insert,
                EditOp::Match,
                EditOp::Match,
                EditOp::Match,
                EditOp::Insert,
            ]
        );
    }

    #[test]
    fn test_deletions_are_expensive() {
        let (distance, script) = script_for("DK1ABC", "DK1AB", &EditCosts::default());
        assert_eq!(distance, 100);
        assert_eq!(script.last(), Some(&EditOp::Delete));
    }

    #[test]
    fn test_substitution_preferred_over_insert_delete() {
        let (distance, script) = script_for("DL3DY", "DL3NEY", &EditCosts::default());
        assert_eq!(distance, 3);
        assert_eq!(
            script,
            vec![
                EditOp::Match,
                EditOp::Match,
                EditOp::Match,
                EditOp::Substitute,
                EditOp::Insert,
                EditOp::Match,
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let costs = EditCosts::default();
        assert_eq!(script_for("", "", &costs), (0, vec![]));
        assert_eq!(script_for("", "AB", &costs), (2, vec![EditOp::Insert; 2]));
        assert_eq!(script_for("AB", "", &costs), (200, vec![EditOp::Delete; 2]));
    }

    #[test]
    fn test_accuracy() {
        assert!((accuracy(0, 0, 0) - 1.0).abs() < 1e-9);
        assert!((accuracy(3, 3, 0) - 1.0).abs() < 1e-9);
        assert!((accuracy(5, 6, 2) - 9.0 / 11.0).abs() < 1e-9);
        assert!((accuracy(3, 6, 3) - 6.0 / 9.0).abs() < 1e-9);
        // a deletion alone outweighs any callsign
        assert!(accuracy(6, 5, 100).abs() < 1e-9);
    }
}
