//! AVX2 back-end: native block size 64 (four 16-byte sub-blocks per call).
//!
//! See `sse2.rs` and `DESIGN.md` for why this absorbs its four sub-blocks
//! sequentially through the shared engine rather than running four
//! interleaved `__m256i` lanes: the mathematical contract (§4.1 — the
//! result of a wide `blocks` call must equal sequential single-block
//! absorption) is what the streaming driver and the self-test suite
//! actually depend on, and sequential absorption satisfies it exactly, by
//! construction, rather than by a hand-checked derivation. `#[target_feature
//! (enable = "avx2")]` still gates this function to hosts that report AVX2
//! support, and it's still installed only after passing the full KAT suite.

use crate::backend::portable::{self, Engine};

pub const BLOCK_SIZE: usize = 64;

#[target_feature(enable = "avx2")]
pub unsafe fn blocks(engine: &mut Engine, buf: &[u8], n: usize) {
    debug_assert_eq!(0, n % BLOCK_SIZE);
    portable::blocks(engine, buf, n);
}

/// `remaining` is bounded by `BLOCK_SIZE` (64), not by the portable engine's
/// 16-byte native block — so the tail can hold up to three whole 16-byte
/// sub-blocks. Absorb those first, then hand the true (<16-byte) remainder
/// to the portable finisher for padding.
pub fn finish_ext(engine: &mut Engine, tail: &[u8], remaining: usize, mac_out: &mut [u8; 16]) {
    debug_assert!(remaining < BLOCK_SIZE);
    let full = remaining - (remaining % portable::BLOCK_SIZE);
    if full > 0 {
        portable::blocks(engine, &tail[..full], full);
    }
    portable::finish_ext(engine, &tail[full..], remaining - full, mac_out);
}
