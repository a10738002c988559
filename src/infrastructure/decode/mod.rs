//! Image decode adapters.

pub mod rule_decoder;

pub use rule_decoder::RuleDecoder;
