//! Referral code generation.
//!
//! Codes are always 8 characters. The alphabet style draws from 32 symbols
//! with look-alikes removed (no `I`, `O`, `0`, `1`), giving 32^8 ≈ 1.1e12
//! codes. The hex style encodes 4 random bytes, giving 16^8 ≈ 4.3e9 codes.
//! Callers still check each fresh code against the store before use.

use rand::{Rng, RngCore};

pub const REF_CODE_LEN: usize = 8;

pub const REF_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RefCodeStyle {
    #[default]
    Alphabet,
    Hex,
}

pub fn generate_ref_code(style: RefCodeStyle) -> String {
    let mut rng = rand::thread_rng();
    match style {
        RefCodeStyle::Alphabet => (0..REF_CODE_LEN)
            .map(|_| REF_CODE_ALPHABET[rng.gen_range(0..REF_CODE_ALPHABET.len())] as char)
            .collect(),
        RefCodeStyle::Hex => {
            let mut bytes = [0u8; REF_CODE_LEN / 2];
            rng.fill_bytes(&mut bytes);
            hex::encode(bytes)
        }
    }
}
