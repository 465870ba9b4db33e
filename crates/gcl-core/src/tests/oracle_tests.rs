//! Randomized cross-checks of every generator and operator against a
//! brute-force model over small corpora.

use crate::gcl::Gcl;
use crate::generator::{Generator, GeneratorExt, IntervalGenerator};
use crate::index::MemoryIndex;
use crate::primitives::ListGenerator;
use crate::query::Argument;
use crate::types::{Interval, Position, NEG_INF, POS_INF};
use std::sync::Arc;

const VOCABULARY: &[&str] = &["a", "b", "c", "d"];

#[derive(Debug, Clone)]
enum Tree {
    Term(&'static str),
    Phrase(Vec<&'static str>),
    Length(usize),
    List(Vec<Interval>),
    And(Box<Tree>, Box<Tree>),
    Or(Box<Tree>, Box<Tree>),
    BoundedBy(Box<Tree>, Box<Tree>),
    Containing(Box<Tree>, Box<Tree>),
    ContainedIn(Box<Tree>, Box<Tree>),
    Start(Box<Tree>),
    End(Box<Tree>),
}

fn random_corpus(rng: &mut fastrand::Rng) -> Vec<&'static str> {
    let len = rng.usize(0..24);
    (0..len)
        .map(|_| VOCABULARY[rng.usize(..VOCABULARY.len())])
        .collect()
}

/// Keep only the intervals that contain no other interval of the set.
fn minimal(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort();
    intervals.dedup();
    intervals
        .iter()
        .copied()
        .filter(|i| !intervals.iter().any(|j| j != i && i.contains(j)))
        .collect()
}

fn random_list(rng: &mut fastrand::Rng, corpus_len: usize) -> Vec<Interval> {
    if corpus_len == 0 {
        return Vec::new();
    }
    // Entries may nest; the generator keeps only the innermost ones.
    (0..rng.usize(0..6))
        .map(|_| {
            let start = rng.usize(..corpus_len);
            let end = rng.usize(start..corpus_len.min(start + 5));
            Interval::new(start as Position, end as Position)
        })
        .collect()
}

fn random_leaf(rng: &mut fastrand::Rng, corpus_len: usize) -> Tree {
    match rng.u8(0..5) {
        0 => Tree::Term(VOCABULARY[rng.usize(..VOCABULARY.len())]),
        1 => Tree::Term("z"),
        2 => Tree::Phrase(vec![
            VOCABULARY[rng.usize(..VOCABULARY.len())],
            VOCABULARY[rng.usize(..VOCABULARY.len())],
        ]),
        3 => Tree::Length(rng.usize(1..5)),
        _ => Tree::List(random_list(rng, corpus_len)),
    }
}

fn random_tree(rng: &mut fastrand::Rng, depth: usize, corpus_len: usize) -> Tree {
    if depth == 0 || rng.u8(0..4) == 0 {
        return random_leaf(rng, corpus_len);
    }
    let op = rng.u8(0..7);
    let mut child = || Box::new(random_tree(rng, depth - 1, corpus_len));
    match op {
        0 => Tree::And(child(), child()),
        1 => Tree::Or(child(), child()),
        2 => Tree::BoundedBy(child(), child()),
        3 => Tree::Containing(child(), child()),
        4 => Tree::ContainedIn(child(), child()),
        5 => Tree::Start(child()),
        _ => Tree::End(child()),
    }
}

impl Tree {
    /// Build the generator tree through the facade.
    fn build(&self, gcl: &Gcl) -> Generator {
        match self {
            Tree::Term(t) => gcl.term(*t),
            Tree::Phrase(tokens) => gcl.phrase(tokens.iter().copied()).unwrap(),
            Tree::Length(n) => gcl.length(*n).unwrap(),
            Tree::List(list) => Arc::new(ListGenerator::new(list.iter().copied()).unwrap()),
            Tree::And(a, b) => gcl.and(a.build(gcl), b.build(gcl)),
            Tree::Or(a, b) => gcl.or(a.build(gcl), b.build(gcl)),
            Tree::BoundedBy(a, b) => gcl.bounded_by(a.build(gcl), b.build(gcl)),
            Tree::Containing(a, b) => gcl.containing(a.build(gcl), b.build(gcl)),
            Tree::ContainedIn(a, b) => gcl.contained_in(a.build(gcl), b.build(gcl)),
            Tree::Start(a) => gcl.start(a.build(gcl)),
            Tree::End(a) => gcl.end(a.build(gcl)),
        }
    }

    /// Render as query text; literal lists become generator arguments.
    fn to_query(&self, gcl: &Gcl, args: &mut Vec<Argument>) -> String {
        let binary = |a: &Tree, op: &str, b: &Tree, args: &mut Vec<Argument>| {
            let left = a.to_query(gcl, args);
            let right = b.to_query(gcl, args);
            format!("({} {} {})", left, op, right)
        };
        match self {
            Tree::Term(t) => format!("'{}'", t),
            Tree::Phrase(tokens) => tokens
                .iter()
                .map(|t| format!("\"{}\"", t))
                .collect::<Vec<_>>()
                .join(", "),
            Tree::Length(n) => format!("[{}]", n),
            Tree::List(_) => {
                args.push(Argument::Generator(self.build(gcl)));
                format!("%{}", args.len())
            }
            Tree::And(a, b) => binary(a, "^", b, args),
            Tree::Or(a, b) => binary(a, "+", b, args),
            Tree::BoundedBy(a, b) => binary(a, "..", b, args),
            Tree::Containing(a, b) => binary(a, ">", b, args),
            Tree::ContainedIn(a, b) => binary(a, "<", b, args),
            Tree::Start(a) => format!("_{{{}}}", a.to_query(gcl, args)),
            Tree::End(a) => format!("{{{}}}_", a.to_query(gcl, args)),
        }
    }

    /// Evaluate by brute force over the materialized corpus.
    fn eval(&self, corpus: &[&str]) -> Vec<Interval> {
        let n = corpus.len();
        match self {
            Tree::Term(t) => Tree::Phrase(vec![*t]).eval(corpus),
            Tree::Phrase(tokens) => {
                let width = tokens.len();
                (0..n.saturating_sub(width - 1))
                    .filter(|&i| corpus[i..i + width] == tokens[..])
                    .map(|i| Interval::new(i as Position, (i + width - 1) as Position))
                    .collect()
            }
            Tree::Length(width) => (0..(n + 1).saturating_sub(*width))
                .map(|i| Interval::new(i as Position, (i + width - 1) as Position))
                .collect(),
            Tree::List(list) => minimal(list.clone()),
            Tree::And(a, b) => {
                let (a, b) = (a.eval(corpus), b.eval(corpus));
                let spans = a
                    .iter()
                    .flat_map(|x| {
                        b.iter().map(move |y| {
                            Interval::new(x.start.min(y.start), x.end.max(y.end))
                        })
                    })
                    .collect();
                minimal(spans)
            }
            Tree::Or(a, b) => {
                let mut all = a.eval(corpus);
                all.extend(b.eval(corpus));
                minimal(all)
            }
            Tree::BoundedBy(a, b) => {
                let (a, b) = (a.eval(corpus), b.eval(corpus));
                let spans = a
                    .iter()
                    .flat_map(|x| {
                        b.iter()
                            .filter(move |y| x.end < y.start)
                            .map(move |y| Interval::new(x.start, y.end))
                    })
                    .collect();
                minimal(spans)
            }
            Tree::Containing(a, b) => {
                let b = b.eval(corpus);
                a.eval(corpus)
                    .into_iter()
                    .filter(|x| b.iter().any(|y| x.contains(y)))
                    .collect()
            }
            Tree::ContainedIn(a, b) => {
                let b = b.eval(corpus);
                a.eval(corpus)
                    .into_iter()
                    .filter(|x| b.iter().any(|y| y.contains(x)))
                    .collect()
            }
            Tree::Start(a) => minimal(
                a.eval(corpus)
                    .iter()
                    .map(|x| Interval::point(x.start))
                    .collect(),
            ),
            Tree::End(a) => minimal(
                a.eval(corpus)
                    .iter()
                    .map(|x| Interval::point(x.end))
                    .collect(),
            ),
        }
    }
}

fn forward(g: &dyn IntervalGenerator) -> Vec<Interval> {
    g.intervals().map(|r| r.unwrap()).collect()
}

fn backward(g: &dyn IntervalGenerator) -> Vec<Interval> {
    g.intervals_rev().map(|r| r.unwrap()).collect()
}

/// The four probes answered by scanning a sorted list with no nesting.
fn expected_probes(list: &[Interval], k: Position) -> [Interval; 4] {
    [
        list.iter()
            .copied()
            .find(|i| i.start >= k)
            .unwrap_or(Interval::POS_INF),
        list.iter()
            .copied()
            .find(|i| i.end >= k)
            .unwrap_or(Interval::POS_INF),
        list.iter()
            .rev()
            .copied()
            .find(|i| i.end <= k)
            .unwrap_or(Interval::NEG_INF),
        list.iter()
            .rev()
            .copied()
            .find(|i| i.start <= k)
            .unwrap_or(Interval::NEG_INF),
    ]
}

fn actual_probes(g: &dyn IntervalGenerator, k: Position) -> [Interval; 4] {
    [
        g.first_starting_at_or_after(k).unwrap(),
        g.first_ending_at_or_after(k).unwrap(),
        g.last_ending_at_or_before(k).unwrap(),
        g.last_starting_at_or_before(k).unwrap(),
    ]
}

fn check_tree(tree: &Tree, corpus: &[&str], gcl: &Gcl) {
    let expected = tree.eval(corpus);
    let generator = tree.build(gcl);

    assert_eq!(forward(generator.as_ref()), expected, "forward {:?} over {:?}", tree, corpus);

    let mut reversed = expected.clone();
    reversed.reverse();
    assert_eq!(backward(generator.as_ref()), reversed, "backward {:?} over {:?}", tree, corpus);

    let n = corpus.len() as Position;
    let probes = (-2..=n + 2).chain([NEG_INF, POS_INF]);
    for k in probes {
        assert_eq!(
            actual_probes(generator.as_ref(), k),
            expected_probes(&expected, k),
            "probes at k={} for {:?} over {:?}",
            k,
            tree,
            corpus
        );
    }
}

fn gcl_for(corpus: &[&str]) -> Gcl {
    Gcl::new(Arc::new(MemoryIndex::from_tokens(corpus.iter().copied())))
}

#[test]
fn test_primitives_match_oracle() {
    let mut rng = fastrand::Rng::with_seed(0x6c1);
    for _ in 0..200 {
        let corpus = random_corpus(&mut rng);
        let gcl = gcl_for(&corpus);
        let tree = random_leaf(&mut rng, corpus.len());
        check_tree(&tree, &corpus, &gcl);
    }
}

#[test]
fn test_single_operators_match_oracle() {
    let mut rng = fastrand::Rng::with_seed(297135646);
    for _ in 0..400 {
        let corpus = random_corpus(&mut rng);
        let gcl = gcl_for(&corpus);
        let tree = random_tree(&mut rng, 1, corpus.len());
        check_tree(&tree, &corpus, &gcl);
    }
}

#[test]
fn test_nested_trees_match_oracle() {
    let mut rng = fastrand::Rng::with_seed(42);
    for _ in 0..300 {
        let corpus = random_corpus(&mut rng);
        let gcl = gcl_for(&corpus);
        let tree = random_tree(&mut rng, 3, corpus.len());
        check_tree(&tree, &corpus, &gcl);
    }
}

#[test]
fn test_compiled_text_matches_facade() {
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..200 {
        let corpus = random_corpus(&mut rng);
        let gcl = gcl_for(&corpus);
        let tree = random_tree(&mut rng, 3, corpus.len());

        let mut args = Vec::new();
        let text = tree.to_query(&gcl, &mut args);
        let compiled = gcl.compile(&text, &args).unwrap();

        assert_eq!(
            forward(compiled.as_ref()),
            forward(tree.build(&gcl).as_ref()),
            "query {} over {:?}",
            text,
            corpus
        );
    }
}
