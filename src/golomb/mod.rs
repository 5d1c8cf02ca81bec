// Signed exponential-Golomb bit coding.
//
// # Modules
//
// - `bits`: MSB-first bit accumulators over `Write` / `Read`
// - `codeword`: Codeword construction and lengths
// - `encoder`: Streaming encoder (values -> bitstream)
// - `decoder`: Resumable state-machine decoder (bitstream -> values)

pub mod bits;
pub mod codeword;
pub mod decoder;
pub mod encoder;

pub use bits::{BitReader, BitWriter};
pub use codeword::{Codeword, bit_length, codeword_len};
pub use decoder::{DecodeError, Decoder, State, decode, decode_all};
pub use encoder::{EncodeError, Encoder, encode, encode_to};
