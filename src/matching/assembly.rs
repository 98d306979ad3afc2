use serde::Serialize;

use crate::matching::false_friends::is_false_friend;
use crate::matching::scoring::EditOp;

/// Operation of a part of a [`MatchingAssembly`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// The characters are the same in query and candidate
    Nop,
    /// The characters are missing in the query
    Insert,
    /// The characters are not in the candidate
    Delete,
    /// The query has different characters at this position
    Substitute,
    /// A single character that was probably mis-copied (see [`is_false_friend`])
    FalseFriend,
}

/// A run of characters sharing the same operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Part {
    pub op: Operation,
    /// Candidate characters, or the removed query characters for [`Operation::Delete`]
    pub value: String,
}

impl Part {
    pub fn new(op: Operation, value: impl Into<String>) -> Self {
        Self {
            op,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Describes how a query aligns to a candidate.
///
/// Rendering the assembly yields the candidate, so a UI can show which characters
/// of a near-match were copied correctly and which ones are missing or wrong.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchingAssembly(Vec<Part>);

impl MatchingAssembly {
    /// Build the assembly from an edit script that transforms `source` into `target`.
    ///
    /// Consecutive operations of the same kind are collapsed into one part. Adjacent
    /// insertions and deletions become substitutions, and a single substituted
    /// character that is a false friend of the query character becomes a
    /// [`Operation::FalseFriend`].
    #[must_use]
    pub fn from_script(source: &[u8], target: &[u8], script: &[EditOp]) -> Self {
        let mut source = source.iter().copied();
        let mut target = target.iter().copied();
        let mut runs: Vec<Run> = Vec::new();

        for op in script {
            let run = match op {
                EditOp::Match => match (source.next(), target.next()) {
                    (Some(s), Some(t)) => Run::pair(Operation::Nop, s, t),
                    _ => break,
                },
                EditOp::Substitute => match (source.next(), target.next()) {
                    (Some(s), Some(t)) => Run::pair(Operation::Substitute, s, t),
                    _ => break,
                },
                EditOp::Insert => match target.next() {
                    Some(t) => Run::insert(t),
                    None => break,
                },
                EditOp::Delete => match source.next() {
                    Some(s) => Run::delete(s),
                    None => break,
                },
            };
            push_run(&mut runs, run);
        }

        let parts = merge_insert_delete(runs)
            .into_iter()
            .map(Run::into_part)
            .collect();
        Self(parts)
    }

    /// Assemble the given parts as they are
    #[must_use]
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self(parts)
    }

    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the longest run of matching characters
    #[must_use]
    pub fn longest_part(&self) -> usize {
        self.0
            .iter()
            .filter(|part| part.op == Operation::Nop)
            .map(Part::len)
            .max()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn contains_false_friend(&self) -> bool {
        self.0.iter().any(|part| part.op == Operation::FalseFriend)
    }
}

impl std::fmt::Display for MatchingAssembly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for part in self.0.iter().filter(|p| p.op != Operation::Delete) {
            write!(f, "{}", part.value)?;
        }
        Ok(())
    }
}

/// A collapsed run of operations, with the characters of both sides
#[derive(Debug)]
struct Run {
    op: Operation,
    source: Vec<u8>,
    target: Vec<u8>,
}

impl Run {
    fn pair(op: Operation, source: u8, target: u8) -> Self {
        Self {
            op,
            source: vec![source],
            target: vec![target],
        }
    }

    fn insert(target: u8) -> Self {
        Self {
            op: Operation::Insert,
            source: Vec::new(),
            target: vec![target],
        }
    }

    fn delete(source: u8) -> Self {
        Self {
            op: Operation::Delete,
            source: vec![source],
            target: Vec::new(),
        }
    }

    fn into_part(self) -> Part {
        let op = match self.op {
            Operation::Substitute
                if self.source.len() == 1
                    && self.target.len() == 1
                    && is_false_friend(self.source[0], self.target[0]) =>
            {
                Operation::FalseFriend
            }
            op => op,
        };
        let value = if op == Operation::Delete {
            self.source
        } else {
            self.target
        };
        Part::new(op, value.into_iter().map(char::from).collect::<String>())
    }
}

fn push_run(runs: &mut Vec<Run>, run: Run) {
    match runs.last_mut() {
        Some(last) if last.op == run.op => {
            last.source.extend(run.source);
            last.target.extend(run.target);
        }
        _ => runs.push(run),
    }
}

/// Replace each adjacent Insert/Delete pair with a substitution of the common length,
/// followed by whatever is left of the longer run
fn merge_insert_delete(runs: Vec<Run>) -> Vec<Run> {
    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());

    for run in runs {
        let pairs_up = matches!(
            (merged.last().map(|r| r.op), run.op),
            (Some(Operation::Insert), Operation::Delete) | (Some(Operation::Delete), Operation::Insert)
        );
        if !pairs_up {
            push_run(&mut merged, run);
            continue;
        }
        let Some(previous) = merged.pop() else {
            continue;
        };

        let (inserted, deleted) = if run.op == Operation::Insert {
            (run.target, previous.source)
        } else {
            (previous.target, run.source)
        };
        let common = inserted.len().min(deleted.len());

        push_run(
            &mut merged,
            Run {
                op: Operation::Substitute,
                source: deleted[..common].to_vec(),
                target: inserted[..common].to_vec(),
            },
        );
        if inserted.len() > common {
            push_run(
                &mut merged,
                Run {
                    op: Operation::Insert,
                    source: Vec::new(),
                    target: inserted[common..].to_vec(),
                },
            );
        } else if deleted.len() > common {
            push_run(
                &mut merged,
                Run {
                    op: Operation::Delete,
                    source: deleted[common..].to_vec(),
                    target: Vec::new(),
                },
            );
        }
    }

    merged
}
