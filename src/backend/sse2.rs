//! SSE2 back-end: native block size 32 (two 16-byte sub-blocks per call).
//!
//! Real poly1305 SSE2 implementations (poly1305-donna's `poly1305_sse2.c`,
//! OpenSSL's `poly1305-x86_64.pl`) run two interleaved accumulator lanes in
//! `__m128i` registers and only recombine them at the end of the message.
//! Reproducing that lane interleaving by hand, without a compiler to check
//! the carry propagation across lanes, is exactly the kind of arithmetic
//! this crate cannot afford to get subtly wrong (see `DESIGN.md`). Instead
//! this back-end absorbs its two sub-blocks through the same sequential
//! engine the portable back-end uses — which is trivially the same
//! computation as calling `blocks` twice with `block_size = 16` — and relies
//! on `#[target_feature(enable = "sse2")]` to let the compiler pick wider
//! registers for the carry chain on hosts that have them. The function is
//! still gated on real SSE2 detection and still exercises the full
//! self-test suite before dispatch ever selects it.

use crate::backend::portable::{self, Engine};

pub const BLOCK_SIZE: usize = 32;

#[target_feature(enable = "sse2")]
pub unsafe fn blocks(engine: &mut Engine, buf: &[u8], n: usize) {
    debug_assert_eq!(0, n % BLOCK_SIZE);
    portable::blocks(engine, buf, n);
}

/// `remaining` is bounded by `BLOCK_SIZE` (32), not by the portable engine's
/// 16-byte native block — so the tail can itself hold one whole 16-byte
/// sub-block. Absorb that first, then hand the true (<16-byte) remainder to
/// the portable finisher for padding.
pub fn finish_ext(engine: &mut Engine, tail: &[u8], remaining: usize, mac_out: &mut [u8; 16]) {
    debug_assert!(remaining < BLOCK_SIZE);
    let full = remaining - (remaining % portable::BLOCK_SIZE);
    if full > 0 {
        portable::blocks(engine, &tail[..full], full);
    }
    portable::finish_ext(engine, &tail[full..], remaining - full, mac_out);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::Implementation;

    fn check(msg_len: usize) {
        if let Some(imp) = Implementation::sse2_if_supported() {
            let key = [9u8; 32];
            let msg: Vec<u8> = (0..msg_len).map(|i| (i % 251) as u8).collect();
            let mut got = [0u8; 16];
            imp.auth(&mut got, &msg, &key);
            let mut want = [0u8; 16];
            Implementation::portable().auth(&mut want, &msg, &key);
            assert_eq!(got, want, "mismatch at length {}", msg_len);
        }
    }

    #[test]
    fn matches_portable_absorption_exact_multiple() {
        check(160); // 5 * BLOCK_SIZE
    }

    #[test]
    fn matches_portable_absorption_with_full_sub_block_tail() {
        check(160 + 20); // tail of 20 bytes: one 16-byte sub-block plus 4
    }

    #[test]
    fn matches_portable_absorption_with_sub_16_tail() {
        check(160 + 5); // tail shorter than even one sub-block
    }
}
