//! Back-end polymorphism without dynamic dispatch.
//!
//! Each back-end is a record of behavior sharing one opaque [`Engine`] state
//! layout (see `portable::Engine`). Since the set of back-ends is fixed at
//! build time, [`Implementation`] is a tagged variant with an exhaustive
//! match, mirroring `blake2b_simd::guts::Implementation`/`Platform` rather
//! than a `dyn Trait`.
//!
//! Every back-end absorbs message bytes through the same 26-bit-limb engine
//! (`portable::Engine::absorb_block`); what varies between back-ends is only
//! the native block size advertised to the streaming driver, and — for the
//! vector back-ends — the CPU feature gate under which their `blocks` loop
//! runs. See `DESIGN.md` for why the vector back-ends don't hand-roll raw
//! SIMD carry-save arithmetic.

pub mod portable;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod avx2;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod sse2;

pub use portable::Engine;

/// The capability tags this dispatcher knows how to ask the host about.
/// `X86Baseline` and `Avx` are part of the taxonomy this crate was grounded
/// on (poly1305-donna's extension set) but, unlike `Reference`, `Sse2`, and
/// `Avx2`, have no back-end of their own here: the reference engine already
/// covers what `X86Baseline` would add, and `Avx` sits strictly between the
/// `Sse2` and `Avx2` back-ends this crate actually ships.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Capability {
    Reference,
    X86Baseline,
    Sse2,
    Avx,
    Avx2,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Platform {
    Portable,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Sse2,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Avx2,
}

/// A selected back-end. Carries no state of its own beyond which platform
/// variant it is; all the actual arithmetic state lives in the caller-owned
/// [`Engine`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Implementation(Platform);

impl Implementation {
    pub fn portable() -> Self {
        Implementation(Platform::Portable)
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[allow(unreachable_code)]
    pub fn sse2_if_supported() -> Option<Self> {
        #[cfg(target_feature = "sse2")]
        {
            return Some(Implementation(Platform::Sse2));
        }
        #[cfg(feature = "std")]
        {
            if is_x86_feature_detected!("sse2") {
                return Some(Implementation(Platform::Sse2));
            }
        }
        None
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[allow(unreachable_code)]
    pub fn avx2_if_supported() -> Option<Self> {
        #[cfg(target_feature = "avx2")]
        {
            return Some(Implementation(Platform::Avx2));
        }
        #[cfg(feature = "std")]
        {
            if is_x86_feature_detected!("avx2") {
                return Some(Implementation(Platform::Avx2));
            }
        }
        None
    }

    /// Every candidate this host could possibly support, most capable
    /// first, ending with the reference back-end. `detect` (in
    /// `crate::self_test`) walks this list and self-tests each one before
    /// trusting it; this function does no testing of its own.
    pub(crate) fn candidates() -> arrayvec::ArrayVec<[Implementation; 3]> {
        let mut v = arrayvec::ArrayVec::new();
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            if let Some(imp) = Self::avx2_if_supported() {
                v.push(imp);
            }
            if let Some(imp) = Self::sse2_if_supported() {
                v.push(imp);
            }
        }
        v.push(Self::portable());
        v
    }

    pub fn capability(&self) -> Capability {
        match self.0 {
            Platform::Portable => Capability::Reference,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Platform::Sse2 => Capability::Sse2,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Platform::Avx2 => Capability::Avx2,
        }
    }

    /// Native block size: the number of message bytes this back-end expects
    /// per call to `blocks`. Always 16, 32, or 64.
    pub fn block_size(&self) -> usize {
        match self.0 {
            Platform::Portable => portable::BLOCK_SIZE,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Platform::Sse2 => sse2::BLOCK_SIZE,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Platform::Avx2 => avx2::BLOCK_SIZE,
        }
    }

    /// Initialize `engine` from `key`. `bytes_hint` (0 if unknown) is passed
    /// through to back-ends that could use it to precompute powers of `r`;
    /// none of the back-ends in this crate do, and the hint must not change
    /// the resulting tag either way.
    pub fn init_ext(&self, key: &[u8; 32], _bytes_hint: u64) -> Engine {
        Engine::new(key)
    }

    /// Absorb exactly `n` bytes, a nonzero multiple of `self.block_size()`.
    pub fn blocks(&self, engine: &mut Engine, buf: &[u8], n: usize) {
        debug_assert_eq!(0, n % self.block_size());
        match self.0 {
            Platform::Portable => portable::blocks(engine, buf, n),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Platform::Sse2 => unsafe { sse2::blocks(engine, buf, n) },
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Platform::Avx2 => unsafe { avx2::blocks(engine, buf, n) },
        }
    }

    /// Absorb the final `remaining` bytes (0 <= remaining < block_size) and
    /// write the 16-byte tag to `mac_out`. `remaining` is bounded by *this*
    /// back-end's own block size, so a wide back-end's tail can itself
    /// contain several 16-byte sub-blocks; each back-end is responsible for
    /// absorbing those before padding the final (<16-byte) remainder.
    pub fn finish_ext(&self, engine: &mut Engine, tail: &[u8], remaining: usize, mac_out: &mut [u8; 16]) {
        debug_assert!(remaining < self.block_size());
        match self.0 {
            Platform::Portable => portable::finish_ext(engine, tail, remaining, mac_out),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Platform::Sse2 => sse2::finish_ext(engine, tail, remaining, mac_out),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Platform::Avx2 => avx2::finish_ext(engine, tail, remaining, mac_out),
        }
    }

    /// One-shot equivalent of `init_ext` + `blocks` + `finish_ext` over a
    /// contiguous buffer.
    pub fn auth(&self, mac_out: &mut [u8; 16], m: &[u8], key: &[u8; 32]) {
        let mut engine = self.init_ext(key, m.len() as u64);
        let block_size = self.block_size();
        let full_len = m.len() - (m.len() % block_size);
        if full_len > 0 {
            self.blocks(&mut engine, &m[..full_len], full_len);
        }
        self.finish_ext(&mut engine, &m[full_len..], m.len() - full_len, mac_out);
    }
}
