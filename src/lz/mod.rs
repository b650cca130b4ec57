pub mod decoder;
pub mod encoder;
pub mod format;
pub mod tokens;

pub use decoder::{decompress, Decompressed, LzDecoder};
pub use encoder::{compress, encode_tokens, tokenize, Compressed, Encoder};
pub use format::Header;
pub use tokens::Token;
