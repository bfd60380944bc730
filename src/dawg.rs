// Copyright (C) 2020-2024 Andy Kurnia.

use super::error;

// bits 0-23 = first edge
// bits 24-30 = number of edges
// bit 31 = is_terminal
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Node(u32);

impl Node {
    #[inline(always)]
    pub(crate) fn new(first_edge: u32, num_edges: u8, accepts: bool) -> Node {
        Node(first_edge | (num_edges as u32) << 24 | if accepts { 0x80000000 } else { 0 })
    }

    #[inline(always)]
    pub fn accepts(&self) -> bool {
        self.0 & 0x80000000 != 0
    }

    #[inline(always)]
    pub fn first_edge(&self) -> u32 {
        self.0 & 0xffffff
    }

    #[inline(always)]
    pub fn num_edges(&self) -> u8 {
        ((self.0 >> 24) & 0x7f) as u8
    }
}

// bits 0-23 = target node
// bits 24-31 = tile
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Edge(u32);

impl Edge {
    #[inline(always)]
    pub(crate) fn new(tile: u8, target: u32) -> Edge {
        Edge(target | (tile as u32) << 24)
    }

    #[inline(always)]
    pub fn tile(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline(always)]
    pub fn target(&self) -> u32 {
        self.0 & 0xffffff
    }
}

pub const MAX_INDEX: usize = 0x1000000;

// Minimized word graph. Node 0 is the root. Edges of a node are contiguous and
// sorted by tile. A node reachable from several parents is stored once.
pub struct Dawg {
    nodes: Box<[Node]>,
    edges: Box<[Edge]>,
}

pub static EMPTY_DAWG_BYTES: &[u8] = b"\x01\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00";

impl Dawg {
    pub(crate) fn from_parts(nodes: Box<[Node]>, edges: Box<[Edge]>) -> Dawg {
        Dawg { nodes, edges }
    }

    #[inline(always)]
    pub fn root(&self) -> u32 {
        0
    }

    #[inline(always)]
    pub fn accepts(&self, p: u32) -> bool {
        self.nodes[p as usize].accepts()
    }

    #[inline(always)]
    pub fn edges(&self, p: u32) -> &[Edge] {
        let node = self.nodes[p as usize];
        let start = node.first_edge() as usize;
        &self.edges[start..start + node.num_edges() as usize]
    }

    #[inline(always)]
    pub fn seek(&self, p: u32, tile: u8) -> Option<u32> {
        let edges = self.edges(p);
        edges
            .binary_search_by(|edge| edge.tile().cmp(&tile))
            .ok()
            .map(|i| edges[i].target())
    }

    // None if the walk falls off the graph.
    pub fn walk(&self, word: &[u8]) -> Option<u32> {
        let mut p = self.root();
        for &tile in word {
            p = self.seek(p, tile)?;
        }
        Some(p)
    }

    #[inline(always)]
    pub fn accepts_word(&self, word: &[u8]) -> bool {
        self.walk(word).is_some_and(|p| self.accepts(p))
    }

    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    // every edge tile must be a letter of the alphabet (1 until alphabet_len).
    pub fn check_alphabet(&self, alphabet_len: u8) -> error::Returns<()> {
        if let Some(edge) = self
            .edges
            .iter()
            .find(|edge| edge.tile() == 0 || edge.tile() >= alphabet_len)
        {
            return_error!(format!(
                "dawg has tile {} but the alphabet only has {} tiles",
                edge.tile(),
                alphabet_len
            ));
        }
        Ok(())
    }

    pub fn count_words(&self) -> u64 {
        fn count_at(dawg: &Dawg, word_counts: &mut [u64], p: u32) -> u64 {
            if word_counts[p as usize] == !0 {
                let mut count = dawg.accepts(p) as u64;
                for edge in dawg.edges(p) {
                    count += count_at(dawg, word_counts, edge.target());
                }
                word_counts[p as usize] = count;
            }
            word_counts[p as usize]
        }
        count_at(self, &mut vec![!0u64; self.nodes.len()], self.root())
    }

    // in machine order.
    pub fn for_each_word<F: FnMut(&[u8])>(&self, mut out: F) {
        fn iter_from<F: FnMut(&[u8])>(dawg: &Dawg, word: &mut Vec<u8>, p: u32, out: &mut F) {
            if dawg.accepts(p) {
                out(word);
            }
            for edge in dawg.edges(p) {
                word.push(edge.tile());
                iter_from(dawg, word, edge.target(), out);
                word.pop();
            }
        }
        iter_from(self, &mut Vec::new(), self.root(), &mut out);
    }

    // encoding: little endian of
    // u32 number of nodes, u32 number of edges, nodes, edges
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut ret = Vec::with_capacity(8 + 4 * (self.nodes.len() + self.edges.len()));
        ret.extend_from_slice(&(self.nodes.len() as u32).to_le_bytes());
        ret.extend_from_slice(&(self.edges.len() as u32).to_le_bytes());
        for node in self.nodes.iter() {
            ret.extend_from_slice(&node.0.to_le_bytes());
        }
        for edge in self.edges.iter() {
            ret.extend_from_slice(&edge.0.to_le_bytes());
        }
        ret
    }

    pub fn from_bytes_alloc(buf: &[u8]) -> error::Returns<Dawg> {
        fn read_u32(buf: &[u8], r: usize) -> u32 {
            buf[r] as u32
                | (buf[r + 1] as u32) << 8
                | (buf[r + 2] as u32) << 16
                | (buf[r + 3] as u32) << 24
        }
        if buf.len() < 8 {
            return_error!(format!("dawg needs at least 8 bytes, got {}", buf.len()));
        }
        let num_nodes = read_u32(buf, 0) as usize;
        let num_edges = read_u32(buf, 4) as usize;
        if num_nodes == 0 || num_nodes > MAX_INDEX || num_edges > MAX_INDEX {
            return_error!(format!("invalid dawg with {num_nodes} nodes and {num_edges} edges"));
        }
        if buf.len() != 8 + 4 * (num_nodes + num_edges) {
            return_error!(format!(
                "dawg with {} nodes and {} edges cannot have {} bytes",
                num_nodes,
                num_edges,
                buf.len()
            ));
        }
        let mut r = 8;
        let mut nodes = Vec::with_capacity(num_nodes);
        for _ in 0..num_nodes {
            let node = Node(read_u32(buf, r));
            if node.first_edge() as usize + node.num_edges() as usize > num_edges {
                return_error!(format!("node {} has edges out of range", nodes.len()));
            }
            nodes.push(node);
            r += 4;
        }
        let mut edges = Vec::with_capacity(num_edges);
        for _ in 0..num_edges {
            let edge = Edge(read_u32(buf, r));
            if edge.target() as usize >= num_nodes {
                return_error!(format!("edge {} points out of range", edges.len()));
            }
            edges.push(edge);
            r += 4;
        }
        let dawg = Dawg::from_parts(nodes.into_boxed_slice(), edges.into_boxed_slice());
        for p in 0..num_nodes as u32 {
            if !dawg.edges(p).windows(2).all(|w| w[0].tile() < w[1].tile()) {
                return_error!(format!("edges of node {p} are not sorted"));
            }
        }
        // Kahn's algorithm. the graph is acyclic iff every node gets removed.
        let mut in_degrees = vec![0u32; num_nodes];
        for edge in dawg.edges.iter() {
            in_degrees[edge.target() as usize] += 1;
        }
        let mut ready = (0..num_nodes as u32)
            .filter(|&p| in_degrees[p as usize] == 0)
            .collect::<Vec<_>>();
        let mut num_removed = 0;
        while let Some(p) = ready.pop() {
            num_removed += 1;
            for edge in dawg.edges(p) {
                let q = edge.target() as usize;
                in_degrees[q] -= 1;
                if in_degrees[q] == 0 {
                    ready.push(q as u32);
                }
            }
        }
        if num_removed != num_nodes {
            return_error!("dawg has a cycle".into());
        }
        Ok(dawg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // root -A-> 1 -T-> 2*
    fn at_dawg() -> Dawg {
        Dawg::from_parts(
            Box::new([Node::new(0, 1, false), Node::new(1, 1, false), Node::new(2, 0, true)]),
            Box::new([Edge::new(1, 1), Edge::new(20, 2)]),
        )
    }

    #[test]
    fn test_packing() {
        let node = Node::new(0x123456, 33, true);
        assert_eq!(node.first_edge(), 0x123456);
        assert_eq!(node.num_edges(), 33);
        assert!(node.accepts());
        let edge = Edge::new(32, 0xabcdef);
        assert_eq!(edge.tile(), 32);
        assert_eq!(edge.target(), 0xabcdef);
    }

    #[test]
    fn test_seek_and_accepts_word() {
        let dawg = at_dawg();
        assert_eq!(dawg.seek(0, 1), Some(1));
        assert_eq!(dawg.seek(0, 20), None);
        assert!(dawg.accepts_word(&[1, 20]));
        assert!(!dawg.accepts_word(&[1]));
        assert!(!dawg.accepts_word(&[1, 20, 5]));
        assert!(!dawg.accepts_word(&[]));
        assert_eq!(dawg.count_words(), 1);
    }

    #[test]
    fn test_bytes_round_trip() {
        let dawg = at_dawg();
        let bytes = dawg.to_bytes();
        let loaded = Dawg::from_bytes_alloc(&bytes).unwrap();
        assert_eq!(loaded.to_bytes(), bytes);
        assert!(loaded.accepts_word(&[1, 20]));

        let empty = Dawg::from_bytes_alloc(EMPTY_DAWG_BYTES).unwrap();
        assert_eq!(empty.num_nodes(), 1);
        assert_eq!(empty.count_words(), 0);
    }

    #[test]
    fn test_malformed_bytes() {
        let bytes = at_dawg().to_bytes();
        assert!(Dawg::from_bytes_alloc(&bytes[..7]).is_err());
        assert!(Dawg::from_bytes_alloc(&bytes[..bytes.len() - 1]).is_err());
        let mut bad_target = bytes.clone();
        let last = bad_target.len() - 4;
        bad_target[last] = 9; // edge to node 9
        assert!(Dawg::from_bytes_alloc(&bad_target).is_err());
        assert!(Dawg::from_bytes_alloc(&[0u8; 8]).is_err());

        let self_loop = Dawg::from_parts(
            Box::new([Node::new(0, 1, true)]),
            Box::new([Edge::new(1, 0)]),
        );
        assert!(Dawg::from_bytes_alloc(&self_loop.to_bytes()).is_err());
        // root -A-> 1 -B-> 2 -C-> 1
        let long_cycle = Dawg::from_parts(
            Box::new([Node::new(0, 1, false), Node::new(1, 1, true), Node::new(2, 1, false)]),
            Box::new([Edge::new(1, 1), Edge::new(2, 2), Edge::new(3, 1)]),
        );
        assert!(Dawg::from_bytes_alloc(&long_cycle.to_bytes()).is_err());
    }

    #[test]
    fn test_backward_edges_are_not_cycles() {
        // words A and BA: the shared accepting node is numbered before B's node.
        let dawg = Dawg::from_parts(
            Box::new([Node::new(0, 2, false), Node::new(2, 0, true), Node::new(2, 1, false)]),
            Box::new([Edge::new(1, 1), Edge::new(2, 2), Edge::new(1, 1)]),
        );
        let loaded = Dawg::from_bytes_alloc(&dawg.to_bytes()).unwrap();
        assert!(loaded.accepts_word(&[1]));
        assert!(loaded.accepts_word(&[2, 1]));
        assert_eq!(loaded.count_words(), 2);
    }

    #[test]
    fn test_check_alphabet() {
        let dawg = at_dawg();
        assert!(dawg.check_alphabet(21).is_ok());
        assert!(dawg.check_alphabet(20).is_err());
        let blank_edge = Dawg::from_parts(
            Box::new([Node::new(0, 1, false), Node::new(1, 0, true)]),
            Box::new([Edge::new(0, 1)]),
        );
        assert!(blank_edge.check_alphabet(27).is_err());
    }
}
