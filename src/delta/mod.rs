// Delta transform over the Exp-Golomb coder.
//
// Slowly-varying sequences (timestamps, counters, sensor samples) turn
// into small residuals, which the Exp-Golomb code stores in a few bits.
//
// - `encoder`: DeltaEncoder: differences, then Exp-Golomb
// - `decoder`: DeltaDecoder: Exp-Golomb, then running sum

pub mod decoder;
pub mod encoder;

pub use decoder::{DeltaDecoder, delta_decode};
pub use encoder::{DeltaEncoder, delta_encode, delta_encode_to};
