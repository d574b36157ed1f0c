//! Multi-language static-analysis scanner that emits a Cryptographic Bill of
//! Materials: per-language AST call-site extraction with a regex fallback,
//! a normalizer collapsing vendor spellings into a canonical taxonomy, and
//! an orchestrator that fans scanning out and serializes the result.

pub mod ast;
pub mod cli;
pub mod errors;
pub mod logging;
pub mod model;
pub mod normalizer;
pub mod orchestrator;
pub mod output;
pub mod rules;
pub mod scanners;
