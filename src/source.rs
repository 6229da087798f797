//! Rewindable character sources consumed by the matcher.
//!
//! End of stream is represented as `None`, and is itself a readable item: the
//! lexer's end-of-input rule matches by "reading" it, so the bookkeeping here
//! records `None` reads just like characters.

use std::collections::VecDeque;
use std::iter::Fuse;

/// An input source with `getc()` / `ungetc()` equivalents.
pub struct PushbackSource<I: Iterator<Item = char>> {
    iter: Fuse<I>,
    put_back: Vec<Option<char>>,
}

impl<I: Iterator<Item = char>> PushbackSource<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(input: T) -> Self {
        Self {
            iter: input.into_iter().fuse(),
            put_back: Vec::new(),
        }
    }

    /// The next item from the stream, or `None` at (and forever after) the
    /// end of input.
    pub fn get(&mut self) -> Option<char> {
        match self.put_back.pop() {
            Some(item) => item,
            None => self.iter.next(),
        }
    }

    /// Put an item back onto the stream. Items are returned in LIFO order,
    /// so pushing back the last items read restores the original sequence.
    pub fn put_back(&mut self, item: Option<char>) {
        self.put_back.push(item);
    }
}

/// An input source that remembers what it has given up.
///
/// Every `get` result is recorded until it is either pushed back onto the
/// underlying stream by [`rewind`](RewindSource::rewind) or permanently
/// released by [`forget`](RewindSource::forget). `forget` is the commit
/// operation: forgotten items can never be re-read.
pub struct RewindSource<I: Iterator<Item = char>> {
    source: PushbackSource<I>,
    read: VecDeque<Option<char>>,
}

impl<I: Iterator<Item = char>> RewindSource<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(input: T) -> Self {
        Self {
            source: PushbackSource::new(input),
            read: VecDeque::new(),
        }
    }

    /// The next item, recorded so it can later be rewound or forgotten.
    pub fn get(&mut self) -> Option<char> {
        let item = self.source.get();
        self.read.push_back(item);
        item
    }

    /// Put every read-but-not-forgotten item back in line to be read. The
    /// oldest unforgotten item will be the next one returned by `get`.
    pub fn rewind(&mut self) {
        while let Some(item) = self.read.pop_back() {
            self.source.put_back(item);
        }
    }

    /// Forget the `n` least recently read items, forever, returning the
    /// characters among them in read order.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` unforgotten items have been read; forgetting
    /// input that was never read is a contract violation by the caller.
    pub fn forget(&mut self, n: usize) -> String {
        assert!(
            n <= self.read.len(),
            "cannot forget {} items; only {} have been read",
            n,
            self.read.len()
        );
        self.read.drain(..n).flatten().collect()
    }

    /// How many read items have not yet been forgotten.
    pub fn pending(&self) -> usize {
        self.read.len()
    }
}
