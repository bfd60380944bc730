// Copyright (C) 2020-2024 Andy Kurnia.

use super::{alphabet, dawg, error};

struct MyHasher(u64);

impl std::hash::Hasher for MyHasher {
    fn finish(&self) -> u64 {
        self.0
    }
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (std::num::Wrapping(self.0) * std::num::Wrapping(3467)).0 ^ (!b as u64);
        }
    }
}

impl Default for MyHasher {
    fn default() -> MyHasher {
        MyHasher(0)
    }
}

type MyHasherDefault = std::hash::BuildHasherDefault<MyHasher>;

// Node under construction. Arena indexes are assigned once and never reused.
#[derive(Default)]
struct State {
    accepts: bool,
    arcs: Vec<(u8, u32)>, // (tile, state), in tile order.
}

// Structural identity. Children are already canonical when this is computed.
#[derive(Clone, Eq, Hash, PartialEq)]
struct Signature {
    accepts: bool,
    arcs: Box<[(u8, u32)]>,
}

// An edge on the path of the last inserted word whose child is not yet minimized.
struct Unchecked {
    parent: u32,
    tile: u8,
    child: u32,
}

struct StateMaker<'a> {
    states: &'a mut Vec<State>,
    states_finder: &'a mut std::collections::HashMap<Signature, u32, MyHasherDefault>,
    unchecked: &'a mut Vec<Unchecked>,
}

impl StateMaker<'_> {
    // Children are popped before parents, so every arc of the popped child
    // already points to a canonical state.
    fn minimize(&mut self, down_to: usize) {
        while self.unchecked.len() > down_to {
            let Some(Unchecked {
                parent,
                tile,
                child,
            }) = self.unchecked.pop()
            else {
                break;
            };
            let child_state = &self.states[child as usize];
            let signature = Signature {
                accepts: child_state.accepts,
                arcs: child_state.arcs[..].into(),
            };
            use std::collections::hash_map::Entry::{Occupied, Vacant};
            match self.states_finder.entry(signature) {
                Occupied(entry) => {
                    // the edge being minimized is always the parent's latest arc.
                    if let Some(arc) = self.states[parent as usize].arcs.last_mut() {
                        debug_assert_eq!(arc.0, tile);
                        arc.1 = *entry.get();
                    }
                    // the duplicate stays in the arena, unreachable.
                    self.states[child as usize].arcs = Vec::new();
                }
                Vacant(entry) => {
                    entry.insert(child);
                }
            }
        }
    }

    fn make_dawg(&mut self, sorted_machine_words: &[Box<[u8]>]) {
        let mut prev_word: &[u8] = &[];
        for this_word in sorted_machine_words {
            let prefix_len = prev_word
                .iter()
                .zip(this_word.iter())
                .take_while(|(a, b)| a == b)
                .count();
            self.minimize(prefix_len);
            let mut p = self.unchecked.last().map_or(0, |edge| edge.child);
            for &tile in &this_word[prefix_len..] {
                let q = self.states.len() as u32;
                self.states.push(State::default());
                self.states[p as usize].arcs.push((tile, q));
                self.unchecked.push(Unchecked {
                    parent: p,
                    tile,
                    child: q,
                });
                p = q;
            }
            self.states[p as usize].accepts = true;
            prev_word = &this_word[..];
        }
        self.minimize(0);
    }
}

// Renumbers the states reachable from the root breadth-first and packs their
// arcs contiguously.
fn freeze(states: &[State]) -> error::Returns<dawg::Dawg> {
    let mut destination = vec![u32::MAX; states.len()];
    let mut order = vec![0u32];
    destination[0] = 0;
    let mut i = 0;
    while i < order.len() {
        for &(_, q) in &states[order[i] as usize].arcs {
            if destination[q as usize] == u32::MAX {
                destination[q as usize] = order.len() as u32;
                order.push(q);
            }
        }
        i += 1;
    }
    let num_edges = order
        .iter()
        .map(|&p| states[p as usize].arcs.len())
        .sum::<usize>();
    if order.len() > dawg::MAX_INDEX || num_edges > dawg::MAX_INDEX {
        // the format can only address 0x1000000 of each
        return_error!(format!(
            "this format cannot have {} nodes and {} edges",
            order.len(),
            num_edges
        ));
    }
    let mut nodes = Vec::with_capacity(order.len());
    let mut edges = Vec::with_capacity(num_edges);
    for &p in &order {
        let state = &states[p as usize];
        if state.arcs.len() > 0x7f {
            return_error!(format!("a node cannot have {} edges", state.arcs.len()));
        }
        nodes.push(dawg::Node::new(
            edges.len() as u32,
            state.arcs.len() as u8,
            state.accepts,
        ));
        for &(tile, q) in &state.arcs {
            edges.push(dawg::Edge::new(tile, destination[q as usize]));
        }
    }
    Ok(dawg::Dawg::from_parts(
        nodes.into_boxed_slice(),
        edges.into_boxed_slice(),
    ))
}

// Words must be sorted and deduplicated. This is not checked; unsorted input
// produces a graph that is not minimal and may accept the wrong words.
pub fn build(sorted_machine_words: &[Box<[u8]>]) -> error::Returns<dawg::Dawg> {
    let mut states = vec![State::default()]; // the root
    let mut state_maker = StateMaker {
        states: &mut states,
        states_finder: &mut std::collections::HashMap::default(),
        unchecked: &mut Vec::new(),
    };
    state_maker.make_dawg(sorted_machine_words);
    let num_canonical = state_maker.states_finder.len();
    let ret = freeze(&states)?;
    tracing::debug!(
        words = sorted_machine_words.len(),
        created = states.len(),
        canonical = num_canonical,
        nodes = ret.num_nodes(),
        edges = ret.num_edges(),
        "built dawg"
    );
    Ok(ret)
}

// Converts in the given order, so the words must already be sorted in
// alphabet order.
pub fn build_from_words<S: AsRef<str>>(
    alphabet_reader: &alphabet::AlphabetReader,
    words: &[S],
) -> error::Returns<dawg::Dawg> {
    let machine_words = words
        .iter()
        .map(|word| alphabet_reader.read_word(word.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    build(&machine_words)
}

// Converts, sorts and deduplicates. Blank lines are skipped.
pub fn read_machine_words(
    alphabet_reader: &alphabet::AlphabetReader,
    giant_string: &str,
) -> error::Returns<Box<[Box<[u8]>]>> {
    let mut machine_words = Vec::<Box<[u8]>>::new();
    let mut v = Vec::new();
    for s in giant_string.lines() {
        let s = s.trim();
        if s.is_empty() {
            continue;
        }
        alphabet_reader.set_word(s, &mut v)?;
        machine_words.push(v[..].into());
    }
    machine_words.sort_unstable();
    machine_words.dedup();
    Ok(machine_words.into_boxed_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english_reader() -> alphabet::AlphabetReader {
        alphabet::AlphabetReader::new(&alphabet::make_english_alphabet())
    }

    #[test]
    fn test_shared_suffixes() {
        let reader = english_reader();
        let dawg = build_from_words(&reader, &["AT", "ATE", "BAT", "BATE"]).unwrap();
        // root, A, T*, E*, B. B-A shares the A-T*-E* chain.
        assert_eq!(dawg.num_nodes(), 5);
        assert_eq!(dawg.count_words(), 4);
        for word in ["AT", "ATE", "BAT", "BATE"] {
            assert!(dawg.accepts_word(&reader.read_word(word).unwrap()), "{word}");
        }
        for word in ["A", "B", "BA", "T", "TE", "ATT", "BATES"] {
            assert!(!dawg.accepts_word(&reader.read_word(word).unwrap()), "{word}");
        }
        let a = dawg.seek(dawg.root(), 1).unwrap();
        let ba = dawg.walk(&reader.read_word("BA").unwrap()).unwrap();
        assert_eq!(a, ba);
    }

    #[test]
    fn test_empty_word_list() {
        let dawg = build(&[]).unwrap();
        assert_eq!(dawg.num_nodes(), 1);
        assert_eq!(dawg.count_words(), 0);
        assert!(!dawg.accepts_word(&[]));
    }

    #[test]
    fn test_read_machine_words_sorts_and_dedups() {
        let reader = english_reader();
        let words = read_machine_words(&reader, "cat\r\nAT\n\nCAT\nat\n").unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(&words[0][..], &[1, 20]);
        assert!(read_machine_words(&reader, "C4T\n").is_err());
    }

    #[test]
    fn test_for_each_word_in_machine_order() {
        let reader = english_reader();
        let input = ["CARE", "CARED", "CARES", "CAT", "CATS", "DOG", "DOGS"];
        let dawg = build_from_words(&reader, &input).unwrap();
        let mut out = Vec::new();
        dawg.for_each_word(|word| out.push(word.to_vec()));
        let expected = input
            .iter()
            .map(|word| reader.read_word(word).unwrap().to_vec())
            .collect::<Vec<_>>();
        assert_eq!(out, expected);
        // -S* and -D* endings collapse; CARE and CAT subtrees differ.
        let round_trip = dawg::Dawg::from_bytes_alloc(&dawg.to_bytes()).unwrap();
        assert_eq!(round_trip.num_nodes(), dawg.num_nodes());
    }
}
