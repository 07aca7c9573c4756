#![cfg_attr(not(feature = "std"), no_std)]

//! A Poly1305 one-time message authenticator (Bernstein's construction),
//! with a reference arithmetic engine and CPU-gated vector back-ends
//! selected at runtime and verified against known-answer tests before use.
//!
//! ```
//! let key = poly1305::Key::from_bytes([7u8; 32]);
//! let tag = poly1305::auth(&key, b"a message, authenticated once");
//! assert!(tag == poly1305::auth(&key, b"a message, authenticated once"));
//! ```
//!
//! A [`Key`] is single-use: authenticating two distinct messages under the
//! same key completely breaks security. This crate does not and cannot
//! enforce that; it's a contract the caller upholds.

#[cfg(feature = "std")]
extern crate core;

#[macro_use]
extern crate arrayref;
extern crate arrayvec;
extern crate constant_time_eq;
extern crate lazy_static;

mod backend;

use backend::Implementation;
use core::cmp;
use core::fmt;

pub use self_test::{detect, power_on_self_test};

pub const KEYBYTES: usize = 32;
pub const TAGBYTES: usize = 16;

/// The reference back-end's native block size. The streaming context's
/// staging buffer is sized for the widest back-end this crate ships
/// (`avx2`, 64 bytes); see `backend::mod.rs`.
const MAX_BLOCKBYTES: usize = 64;

/// A 32-byte single-use authentication key. The first 16 bytes supply the
/// polynomial evaluation point `r`; the last 16 supply the additive blinder
/// `s`. Clamping `r` happens inside the back-end at `init_ext` time, not
/// here — `Key` just carries the raw bytes.
#[derive(Clone)]
pub struct Key([u8; KEYBYTES]);

impl Key {
    pub fn from_bytes(bytes: [u8; KEYBYTES]) -> Self {
        Key(bytes)
    }

    /// Panics if `bytes` is not exactly `KEYBYTES` (32) long.
    pub fn from_slice(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len(), KEYBYTES, "Poly1305 keys are exactly 32 bytes");
        Key(*array_ref!(bytes, 0, KEYBYTES))
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Never print key material.
        write!(f, "Key([***OMITTED***])")
    }
}

/// A finalized 16-byte Poly1305 tag.
///
/// `Tag` supports constant-time equality checks, since it's almost always
/// used to verify a MAC.
#[derive(Clone, Copy)]
pub struct Tag([u8; TAGBYTES]);

impl Tag {
    pub fn as_bytes(&self) -> [u8; TAGBYTES] {
        self.0
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Tag) -> bool {
        constant_time_eq::constant_time_eq(&self.0, &other.0)
    }
}

impl Eq for Tag {}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag(")?;
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

/// The streaming context: adapts a byte-granular `update` API onto the
/// selected back-end's block-granular `blocks`/`finish_ext`. Owns a small
/// staging buffer for bytes that don't yet form a whole native block, and
/// dispatches bulk regions straight to the back-end without copying.
///
/// Unlike the C original this crate is grounded on, `finish` takes `self`
/// by value: the type system enforces "the context is dead after finish"
/// (spec §3's context lifecycle) instead of leaving it as caller-observed
/// undefined behavior. See `DESIGN.md`.
pub struct State {
    engine: backend::Engine,
    implementation: Implementation,
    buf: [u8; MAX_BLOCKBYTES],
    leftover: usize,
    block_size: usize,
}

impl State {
    fn from_parts(key: &[u8; KEYBYTES], implementation: Implementation, bytes_hint: u64) -> Self {
        let engine = implementation.init_ext(key, bytes_hint);
        State {
            engine,
            implementation,
            buf: [0; MAX_BLOCKBYTES],
            leftover: 0,
            block_size: implementation.block_size(),
        }
    }

    /// Bind to the currently selected best back-end (triggers detection and
    /// the self-test walk on first use).
    pub fn new(key: &Key) -> Self {
        Self::from_parts(&key.0, self_test::current(), 0)
    }

    /// As `new`, but with an optional total-length hint (0 means unknown).
    /// The hint never changes the resulting tag.
    pub fn with_bytes_hint(key: &Key, bytes_hint: u64) -> Self {
        Self::from_parts(&key.0, self_test::current(), bytes_hint)
    }

    /// Bind to a specific back-end rather than the globally selected one.
    /// Used only by the self-test suite, to exercise a candidate back-end
    /// before it's promoted.
    pub(crate) fn with_implementation(key: &[u8; KEYBYTES], implementation: Implementation) -> Self {
        Self::from_parts(key, implementation, 0)
    }

    /// Append `m` to the stream. May be called any number of times with any
    /// chunking; the resulting tag does not depend on how the message was
    /// split across calls.
    pub fn update(&mut self, mut m: &[u8]) {
        // Drain the staging buffer first. If there's more input waiting
        // after it fills (so we know we won't need to finalize a partial
        // block), absorb it.
        if self.leftover > 0 {
            let want = cmp::min(self.block_size - self.leftover, m.len());
            self.buf[self.leftover..self.leftover + want].copy_from_slice(&m[..want]);
            self.leftover += want;
            m = &m[want..];
            if self.leftover < self.block_size {
                return;
            }
            let block_size = self.block_size;
            self.implementation
                .blocks(&mut self.engine, &self.buf[..block_size], block_size);
            self.leftover = 0;
        }

        // Bulk region: dispatched straight to the back-end, no copy.
        if m.len() >= self.block_size {
            let take = m.len() & !(self.block_size - 1);
            self.implementation.blocks(&mut self.engine, &m[..take], take);
            m = &m[take..];
        }

        // Buffer whatever's left for a later call, or for finish.
        if !m.is_empty() {
            // `leftover` is always 0 here: the branch above either returned
            // early with a nonempty buffer, or drained it to exactly
            // `block_size` and reset it to 0. See spec §4.2's note on this
            // same defensive-vs-redundant question in the original; here
            // it's just an invariant.
            debug_assert_eq!(0, self.leftover);
            self.buf[self.leftover..self.leftover + m.len()].copy_from_slice(m);
            self.leftover += m.len();
        }
    }

    /// Finish the stream and return the tag. Consumes the context: there's
    /// no way to call `update` or `finish` again afterward.
    pub fn finish(mut self) -> Tag {
        let mut mac = [0u8; TAGBYTES];
        let leftover = self.leftover;
        self.implementation
            .finish_ext(&mut self.engine, &self.buf, leftover, &mut mac);
        Tag(mac)
    }
}

/// One-shot equivalent of `State::new` + `update` + `finish`, dispatched
/// directly to the selected back-end without going through the streaming
/// buffer.
pub fn auth(key: &Key, message: &[u8]) -> Tag {
    let implementation = self_test::current();
    let mut mac = [0u8; TAGBYTES];
    implementation.auth(&mut mac, message, &key.0);
    Tag(mac)
}
