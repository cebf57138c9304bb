mod base16;
pub use base16::Base16;
