use crate::query::Query;
use crate::word::{ALPHABET_SIZE, WORD_LENGTH, Word};
use std::collections::HashMap;

/// The two word sets the index stores on a single shared trie.
/// `Possible` is always a subset of `Allowed`, but they are tracked
/// as independent multiset memberships on the same nodes so the
/// structure never needs to be built twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordSet {
    Allowed,
    Possible,
}

impl WordSet {
    fn index(self) -> usize {
        match self {
            WordSet::Allowed => 0,
            WordSet::Possible => 1,
        }
    }
}

const TAGS: usize = 2;

/// One trie node per distinct five-character prefix (including the
/// root). Every statistic here is computed once at insertion and
/// never mutated afterward; each reflects only the *suffix* of every
/// word passing through this node, i.e. positions `>= depth(node)`.
/// That asymmetry is intentional: the trie walk decrements a scratch
/// copy of `Query.minCount` for letters already committed along the
/// current path, so the remaining requirement it checks against these
/// suffix-only stats is always the true remaining requirement.
#[derive(Debug)]
struct Node {
    children: [Option<Box<Node>>; ALPHABET_SIZE],
    count: [u32; TAGS],
    terminal: [bool; TAGS],
    letter_cnt_at_pos: [[[u16; ALPHABET_SIZE]; WORD_LENGTH]; TAGS],
    words_containing_letter: [[u16; ALPHABET_SIZE]; TAGS],
    /// `letter_occurs_at_least[tag][letter][k-1]` = words whose suffix
    /// contains `letter` at least `k` times, for `k` in `1..=5`.
    letter_occurs_at_least: [[[u16; WORD_LENGTH]; ALPHABET_SIZE]; TAGS],
}

impl Node {
    fn new() -> Self {
        Node {
            children: Default::default(),
            count: [0; TAGS],
            terminal: [false; TAGS],
            letter_cnt_at_pos: [[[0; ALPHABET_SIZE]; WORD_LENGTH]; TAGS],
            words_containing_letter: [[0; ALPHABET_SIZE]; TAGS],
            letter_occurs_at_least: [[[0; WORD_LENGTH]; ALPHABET_SIZE]; TAGS],
        }
    }
}

/// A dual-tagged prefix index over the five-letter word universe,
/// augmented with per-subtree letter statistics that let the
/// counting/partitioning walk prune whole branches in O(1).
pub struct PrefixIndex {
    root: Box<Node>,
}

impl Default for PrefixIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixIndex {
    pub fn new() -> Self {
        PrefixIndex {
            root: Box::new(Node::new()),
        }
    }

    pub fn build(allowed: &[Word], possible: &[Word]) -> Self {
        let mut index = Self::new();
        for &word in allowed {
            index.insert(word, WordSet::Allowed);
        }
        for &word in possible {
            index.insert(word, WordSet::Possible);
        }
        index
    }

    /// Descends five levels, updating `count`, `letterCntAtPos`,
    /// `wordsContainingLetter`, and `letterOccursAtLeast` at every
    /// traversed node for the remaining suffix of `word`.
    pub fn insert(&mut self, word: Word, tag: WordSet) {
        let letters = word.letters();
        let tag_idx = tag.index();

        let mut node = self.root.as_mut();
        for depth in 0..=WORD_LENGTH {
            node.count[tag_idx] += 1;
            apply_suffix_stats(node, tag_idx, &letters, depth);

            if depth == WORD_LENGTH {
                node.terminal[tag_idx] = true;
                break;
            }

            let idx = letters[depth] as usize;
            node = node.children[idx].get_or_insert_with(|| Box::new(Node::new()));
        }
    }

    /// Simple prefix lookup: the number of inserted words (of either
    /// tag, combined) beginning with the literal prefix `letters`.
    /// Used only for membership checks; fails to 0 on a missing child.
    pub fn prefix_len(&self, letters: &[u8]) -> u32 {
        let mut node = self.root.as_ref();
        for &l in letters {
            match &node.children[l as usize] {
                Some(child) => node = child,
                None => return 0,
            }
        }
        node.count[0].max(node.count[1])
    }

    pub fn contains(&self, word: Word, tag: WordSet) -> bool {
        let mut node = self.root.as_ref();
        for &l in &word.letters() {
            match &node.children[l as usize] {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.terminal[tag.index()]
    }

    /// Counts `tag`-words matching `query` via the unified walk (§4.4).
    pub fn count(&self, query: &Query, tag: WordSet) -> u32 {
        let mut scratch = Scratch::new(query);
        count_walk(&self.root, tag.index(), query, &mut scratch, 0)
    }

    /// Returns the collected list of `tag`-words matching `query`.
    /// Intended for small candidate sets (e.g. printing possibilities
    /// once the remaining count is small) — not the hot path.
    pub fn words_matching(&self, query: &Query, tag: WordSet) -> Vec<Word> {
        let mut scratch = Scratch::new(query);
        let mut out = Vec::new();
        let mut path = [0u8; WORD_LENGTH];
        collect_walk(
            &self.root,
            tag.index(),
            query,
            &mut scratch,
            0,
            &mut path,
            &mut out,
        );
        out
    }

    /// Partitions `tag`-words matching `query` by the feedback pattern
    /// `guess` would produce against each, returning a histogram keyed
    /// by the pattern's base-3 code (`0..243`).
    pub fn partition(&self, guess: Word, query: &Query, tag: WordSet) -> HashMap<usize, u32> {
        let mut scratch = Scratch::new(query);
        let mut histogram = HashMap::new();
        let mut path = [0u8; WORD_LENGTH];
        partition_walk(
            &self.root,
            tag.index(),
            query,
            &mut scratch,
            0,
            &mut path,
            guess,
            &mut histogram,
        );
        histogram
    }

    /// 1-indexed in-order selection among `tag`-words, used to sample a
    /// uniformly random target: descend, at each level pick the first
    /// child whose cumulative subtree count covers `n`, decrementing `n`
    /// on the terminal.
    pub fn nth_word(&self, mut n: u32, tag: WordSet) -> Option<Word> {
        let tag_idx = tag.index();
        if n == 0 || n > self.root.count[tag_idx] {
            return None;
        }

        let mut path = [0u8; WORD_LENGTH];
        let mut node = self.root.as_ref();
        for depth in 0..WORD_LENGTH {
            if node.terminal[tag_idx] && n == 0 {
                break;
            }
            let mut found = false;
            for letter in 0..ALPHABET_SIZE {
                let Some(child) = &node.children[letter] else {
                    continue;
                };
                let child_count = child.count[tag_idx];
                if child_count == 0 {
                    continue;
                }
                if n <= child_count {
                    path[depth] = letter as u8;
                    node = child;
                    found = true;
                    break;
                }
                n -= child_count;
            }
            if !found {
                return None;
            }
        }

        Some(word_from_bytes(&path))
    }
}

fn word_from_bytes(letters: &[u8; WORD_LENGTH]) -> Word {
    let text: String = letters.iter().map(|&l| (b'a' + l) as char).collect();
    Word::parse(&text).expect("trie only ever stores valid words")
}

fn apply_suffix_stats(node: &mut Node, tag_idx: usize, letters: &[u8; WORD_LENGTH], depth: usize) {
    // Only the suffix starting at `depth` belongs to this node's subtree.
    let mut suffix_counts = [0u8; ALPHABET_SIZE];
    for &l in &letters[depth..] {
        suffix_counts[l as usize] += 1;
    }

    for pos in depth..WORD_LENGTH {
        node.letter_cnt_at_pos[tag_idx][pos][letters[pos] as usize] += 1;
    }

    for letter in 0..ALPHABET_SIZE {
        let occurrences = suffix_counts[letter];
        if occurrences == 0 {
            continue;
        }
        node.words_containing_letter[tag_idx][letter] += 1;
        for k in 1..=occurrences {
            node.letter_occurs_at_least[tag_idx][letter][(k - 1) as usize] += 1;
        }
    }
}

/// Mutable backtracking scratch carried through the recursive walk:
/// the remaining required multiplicity per letter (decremented as the
/// path commits occurrences, restored on return) and the running sum
/// of those remaining requirements.
struct Scratch {
    remaining_min_count: [u8; ALPHABET_SIZE],
    remaining_required_total: u32,
}

impl Scratch {
    fn new(query: &Query) -> Self {
        let remaining_min_count = query.min_counts();
        let remaining_required_total = remaining_min_count.iter().map(|&k| k as u32).sum();
        Scratch {
            remaining_min_count,
            remaining_required_total,
        }
    }

    /// Commits one occurrence of `letter` along the path, returning
    /// whether this consumed part of the remaining requirement (so the
    /// caller knows whether to undo it on backtrack).
    fn commit(&mut self, letter: usize) -> bool {
        if self.remaining_min_count[letter] > 0 {
            self.remaining_min_count[letter] -= 1;
            self.remaining_required_total -= 1;
            true
        } else {
            false
        }
    }

    fn uncommit(&mut self, letter: usize) {
        self.remaining_min_count[letter] += 1;
        self.remaining_required_total += 1;
    }
}

/// The node-level bounds of §4.4: O(1) tests, applied once per node
/// before iterating children, that prove a whole subtree contributes
/// nothing further without visiting a single child.
fn node_is_dead(node: &Node, tag_idx: usize, query: &Query, scratch: &Scratch, depth: usize) -> bool {
    let count = node.count[tag_idx];
    if count == 0 {
        return true;
    }

    for pos in depth..WORD_LENGTH {
        if let Some(fixed) = query.fixed(pos) {
            if node.letter_cnt_at_pos[tag_idx][pos][fixed as usize] == 0 {
                return true;
            }
        }
        for letter in 0..ALPHABET_SIZE {
            if query.is_forbidden_at(letter as u8, pos)
                && node.letter_cnt_at_pos[tag_idx][pos][letter] == count
            {
                return true;
            }
        }
    }

    for letter in 0..ALPHABET_SIZE {
        let remaining = scratch.remaining_min_count[letter];
        if remaining > 0 && node.letter_occurs_at_least[tag_idx][letter][(remaining - 1) as usize] == 0
        {
            return true;
        }
        if query.is_banned(letter as u8)
            && remaining == 0
            && node.words_containing_letter[tag_idx][letter] == count
        {
            return true;
        }
    }

    false
}

/// The verify-at-letter test of §4.4: applied before descending into
/// `child` for candidate letter `c` at depth `d`.
fn letter_is_admissible(
    query: &Query,
    scratch: &Scratch,
    depth: usize,
    letter: usize,
) -> bool {
    if let Some(fixed) = query.fixed(depth) {
        if fixed as usize != letter {
            return false;
        }
    }
    if query.is_forbidden_at(letter as u8, depth) {
        return false;
    }
    if query.is_banned(letter as u8) && scratch.remaining_min_count[letter] == 0 {
        return false;
    }

    let remaining_positions = (WORD_LENGTH - depth) as u32;
    if scratch.remaining_required_total > remaining_positions
        && scratch.remaining_min_count[letter] == 0
    {
        return false;
    }

    true
}

fn count_walk(node: &Node, tag_idx: usize, query: &Query, scratch: &mut Scratch, depth: usize) -> u32 {
    if node_is_dead(node, tag_idx, query, scratch, depth) {
        return 0;
    }
    if depth == WORD_LENGTH {
        return if node.terminal[tag_idx] { 1 } else { 0 };
    }

    let mut total = 0;
    for letter in 0..ALPHABET_SIZE {
        let Some(child) = &node.children[letter] else {
            continue;
        };
        if !letter_is_admissible(query, scratch, depth, letter) {
            continue;
        }
        let consumed = scratch.commit(letter);
        total += count_walk(child, tag_idx, query, scratch, depth + 1);
        if consumed {
            scratch.uncommit(letter);
        }
    }
    total
}

fn collect_walk(
    node: &Node,
    tag_idx: usize,
    query: &Query,
    scratch: &mut Scratch,
    depth: usize,
    path: &mut [u8; WORD_LENGTH],
    out: &mut Vec<Word>,
) {
    if node_is_dead(node, tag_idx, query, scratch, depth) {
        return;
    }
    if depth == WORD_LENGTH {
        if node.terminal[tag_idx] {
            out.push(word_from_bytes(path));
        }
        return;
    }

    for letter in 0..ALPHABET_SIZE {
        let Some(child) = &node.children[letter] else {
            continue;
        };
        if !letter_is_admissible(query, scratch, depth, letter) {
            continue;
        }
        path[depth] = letter as u8;
        let consumed = scratch.commit(letter);
        collect_walk(child, tag_idx, query, scratch, depth + 1, path, out);
        if consumed {
            scratch.uncommit(letter);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn partition_walk(
    node: &Node,
    tag_idx: usize,
    query: &Query,
    scratch: &mut Scratch,
    depth: usize,
    path: &mut [u8; WORD_LENGTH],
    guess: Word,
    histogram: &mut HashMap<usize, u32>,
) {
    if node_is_dead(node, tag_idx, query, scratch, depth) {
        return;
    }
    if depth == WORD_LENGTH {
        if node.terminal[tag_idx] {
            let candidate = word_from_bytes(path);
            let pattern = crate::feedback::pattern_of(guess, candidate);
            *histogram.entry(pattern.code()).or_insert(0) += 1;
        }
        return;
    }

    for letter in 0..ALPHABET_SIZE {
        let Some(child) = &node.children[letter] else {
            continue;
        };
        if !letter_is_admissible(query, scratch, depth, letter) {
            continue;
        }
        path[depth] = letter as u8;
        let consumed = scratch.commit(letter);
        partition_walk(child, tag_idx, query, scratch, depth + 1, path, guess, histogram);
        if consumed {
            scratch.uncommit(letter);
        }
    }
}
