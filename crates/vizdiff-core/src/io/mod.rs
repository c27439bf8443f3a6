pub mod codec;

pub use codec::{decode, encode_png, probe, sniff_format, ImageInfo};
