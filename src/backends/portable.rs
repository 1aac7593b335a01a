//! Built-in scrypt (RFC 7914) for builds without native or platform backends.
//!
//! PBKDF2-HMAC-SHA256 expands the password into `p` blocks of `128 * r`
//! bytes, each block goes through ROMix (Salsa20/8 BlockMix), and a final
//! PBKDF2 pass compresses the mixed blocks into the output key.
//!
//! Integerify is reduced `mod N` rather than masked with `N - 1`, so even
//! costs that are not powers of two are computed as well.

use super::{BackendKind, ScryptBackend};
use crate::error::{Result, ScryptError};
use crate::params::ScryptParams;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

/// 32-bit words in one Salsa20 block
const SALSA_WORDS: usize = 16;

#[derive(Debug, Clone, Copy, Default)]
pub struct PortableBackend;

impl ScryptBackend for PortableBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Portable
    }

    fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &ScryptParams,
        output: &mut [u8],
    ) -> Result<()> {
        params.check_memory()?;

        let n = to_usize(params.cost(), params)?;
        let r = to_usize(params.block_size(), params)?;
        let p = to_usize(params.parallelization(), params)?;

        let block_bytes = r.checked_mul(128).ok_or_else(|| exhausted(params))?;
        let block_words = block_bytes / 4;
        let b_len = block_bytes.checked_mul(p).ok_or_else(|| exhausted(params))?;
        let v_len = block_words.checked_mul(n).ok_or_else(|| exhausted(params))?;

        let mut b = Zeroizing::new(try_alloc::<u8>(b_len, params)?);
        let mut v = Zeroizing::new(try_alloc::<u32>(v_len, params)?);
        let mut x = Zeroizing::new(try_alloc::<u32>(block_words, params)?);
        let mut y = Zeroizing::new(try_alloc::<u32>(block_words, params)?);

        pbkdf2_hmac::<Sha256>(password, salt, 1, &mut b);
        for block in b.chunks_exact_mut(block_bytes) {
            ro_mix(block, n, r, &mut v, &mut x, &mut y);
        }
        pbkdf2_hmac::<Sha256>(password, &b, 1, output);
        Ok(())
    }
}

fn exhausted(params: &ScryptParams) -> ScryptError {
    ScryptError::ResourceExhausted {
        required: params.memory_required().unwrap_or(u128::MAX),
        max_memory: params.max_memory(),
    }
}

fn to_usize(value: u64, params: &ScryptParams) -> Result<usize> {
    usize::try_from(value).map_err(|_| exhausted(params))
}

/// Allocates a zeroed buffer, failing instead of aborting when the
/// allocator refuses.
fn try_alloc<T: Clone + Default>(len: usize, params: &ScryptParams) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| exhausted(params))?;
    buf.resize(len, T::default());
    Ok(buf)
}

/// ROMix over one `128 * r` byte block, in place.
///
/// `v` holds `n` blocks, `x` and `y` one block each (in 32-bit words).
fn ro_mix(block: &mut [u8], n: usize, r: usize, v: &mut [u32], x: &mut [u32], y: &mut [u32]) {
    let block_words = x.len();

    for (word, bytes) in x.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }

    for slot in v.chunks_exact_mut(block_words) {
        slot.copy_from_slice(x);
        block_mix(x, y, r);
        x.copy_from_slice(y);
    }

    for _ in 0..n {
        let j = (integerify(x, r) % n as u64) as usize;
        let vj = &v[j * block_words..(j + 1) * block_words];
        for (xw, vw) in x.iter_mut().zip(vj) {
            *xw ^= vw;
        }
        block_mix(x, y, r);
        x.copy_from_slice(y);
    }

    for (bytes, word) in block.chunks_exact_mut(4).zip(x.iter()) {
        bytes.copy_from_slice(&word.to_le_bytes());
    }
}

/// First 64 bits of the last Salsa20 block, little endian.
fn integerify(x: &[u32], r: usize) -> u64 {
    let k = (2 * r - 1) * SALSA_WORDS;
    u64::from(x[k]) | (u64::from(x[k + 1]) << 32)
}

/// BlockMix: `2r` Salsa20/8 blocks, even outputs first, then odd ones.
fn block_mix(input: &[u32], output: &mut [u32], r: usize) {
    let mut t = [0u32; SALSA_WORDS];
    t.copy_from_slice(&input[(2 * r - 1) * SALSA_WORDS..]);

    for (i, chunk) in input.chunks_exact(SALSA_WORDS).enumerate() {
        for (tw, cw) in t.iter_mut().zip(chunk) {
            *tw ^= cw;
        }
        salsa20_8(&mut t);
        let slot = if i % 2 == 0 { i / 2 } else { r + i / 2 };
        output[slot * SALSA_WORDS..(slot + 1) * SALSA_WORDS].copy_from_slice(&t);
    }

    t.zeroize();
}

fn salsa20_8(b: &mut [u32; SALSA_WORDS]) {
    let mut x = *b;
    for _ in 0..4 {
        // columns
        quarter_round(&mut x, 0, 4, 8, 12);
        quarter_round(&mut x, 5, 9, 13, 1);
        quarter_round(&mut x, 10, 14, 2, 6);
        quarter_round(&mut x, 15, 3, 7, 11);
        // rows
        quarter_round(&mut x, 0, 1, 2, 3);
        quarter_round(&mut x, 5, 6, 7, 4);
        quarter_round(&mut x, 10, 11, 8, 9);
        quarter_round(&mut x, 15, 12, 13, 14);
    }
    for (bw, xw) in b.iter_mut().zip(x.iter()) {
        *bw = bw.wrapping_add(*xw);
    }
    x.zeroize();
}

#[inline(always)]
fn quarter_round(x: &mut [u32; SALSA_WORDS], a: usize, b: usize, c: usize, d: usize) {
    x[b] ^= x[a].wrapping_add(x[d]).rotate_left(7);
    x[c] ^= x[b].wrapping_add(x[a]).rotate_left(9);
    x[d] ^= x[c].wrapping_add(x[b]).rotate_left(13);
    x[a] ^= x[d].wrapping_add(x[c]).rotate_left(18);
}
