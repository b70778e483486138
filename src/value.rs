//! The tagged value shapes stored in the keyspace, and the sorted-set
//! structure used by `Value::SortedSet`.

use std::collections::{HashMap, VecDeque};

use bytes::Bytes;
use ordered_float::NotNan;
use skiplist::OrderedSkipList;

/// One of the four shapes a keyspace entry can hold.
#[derive(Debug, Clone)]
pub enum Value {
    String(Bytes),
    Hash(HashMap<Bytes, Bytes>),
    List(VecDeque<Bytes>),
    SortedSet(SortedSet),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Hash(_) => "hash",
            Value::List(_) => "list",
            Value::SortedSet(_) => "zset",
        }
    }
}

type Score = NotNan<f64>;

/// `(score, member)` ordered by score ascending, ties broken by member
/// byte-lexicographic order — the ordering `ZRANGE` walks.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    score: Score,
    member: Bytes,
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.score.cmp(&other.score) {
            std::cmp::Ordering::Equal => self.member.cmp(&other.member),
            ord => ord,
        }
    }
}

/// A bijection between members and scores, plus an ordered index over
/// `(score, member)` pairs kept in sync with it on every mutation.
#[derive(Debug, Default)]
pub struct SortedSet {
    by_member: HashMap<Bytes, Score>,
    ordered: OrderedSkipList<Entry>,
}

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `member` at `score`, returning `true` if the member is new
    /// (i.e. it did not exist, or existed at a different score). A
    /// reinsertion at the same score returns `false` and leaves the ordered
    /// index untouched.
    pub fn insert_or_assign(&mut self, score: f64, member: Bytes) -> bool {
        let score = NotNan::new(score).expect("caller validates scores before calling insert");
        match self.by_member.get(&member).copied() {
            Some(existing) if existing == score => false,
            Some(existing) => {
                self.ordered.remove(&Entry {
                    score: existing,
                    member: member.clone(),
                });
                self.ordered.insert(Entry {
                    score,
                    member: member.clone(),
                });
                self.by_member.insert(member, score);
                false
            }
            None => {
                self.ordered.insert(Entry {
                    score,
                    member: member.clone(),
                });
                self.by_member.insert(member, score);
                true
            }
        }
    }

    pub fn score_of(&self, member: &[u8]) -> Option<f64> {
        self.by_member.get(member).map(|s| s.into_inner())
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Iterates `(member, score)` pairs in ascending `(score, member)` order.
    pub fn iter(&self) -> impl Iterator<Item = (&Bytes, f64)> {
        self.ordered.iter().map(|e| (&e.member, e.score.into_inner()))
    }

    /// `(member, score)` pairs for the inclusive index range `[start, stop]`.
    pub fn range(&self, start: usize, stop_inclusive: usize) -> Vec<(Bytes, f64)> {
        self.ordered
            .index_range(start..stop_inclusive + 1)
            .map(|e| (e.member.clone(), e.score.into_inner()))
            .collect()
    }
}

impl Clone for SortedSet {
    fn clone(&self) -> Self {
        let mut copy = SortedSet::new();
        for (member, score) in self.iter() {
            copy.insert_or_assign(score, member.clone());
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(s: &str) -> Bytes {
        Bytes::copy_from_slice(s.as_bytes())
    }

    #[test]
    fn insert_new_member_returns_true() {
        let mut z = SortedSet::new();
        assert!(z.insert_or_assign(1.0, b("one")));
        assert_eq!(z.len(), 1);
    }

    #[test]
    fn reinsert_same_score_returns_false() {
        let mut z = SortedSet::new();
        assert!(z.insert_or_assign(1.0, b("one")));
        assert!(!z.insert_or_assign(1.0, b("one")));
        assert_eq!(z.len(), 1);
    }

    #[test]
    fn rescoring_existing_member_does_not_count_as_new() {
        let mut z = SortedSet::new();
        assert!(z.insert_or_assign(1.0, b("one")));
        assert!(!z.insert_or_assign(2.0, b("one")));
        assert_eq!(z.score_of(b"one"), Some(2.0));
        assert_eq!(z.len(), 1);
    }

    #[test]
    fn iteration_order_is_score_then_member() {
        let mut z = SortedSet::new();
        z.insert_or_assign(2.0, b("member3"));
        z.insert_or_assign(2.0, b("member2"));
        z.insert_or_assign(1.0, b("member1"));
        let order: Vec<Bytes> = z.iter().map(|(m, _)| m.clone()).collect();
        assert_eq!(order, vec![b("member1"), b("member2"), b("member3")]);
    }

    #[test]
    fn range_is_inclusive() {
        let mut z = SortedSet::new();
        for i in 0..4 {
            z.insert_or_assign(i as f64, b(&format!("m{i}")));
        }
        let r = z.range(1, 2);
        assert_eq!(r.len(), 2);
        assert_eq!(r[0].0, b("m1"));
        assert_eq!(r[1].0, b("m2"));
    }
}
