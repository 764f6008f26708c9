// Core modules implementing the query grammar, encoding, and error modeling.
pub mod codec;
pub mod encoding;
pub mod error;
pub mod grammar;
pub mod location;
pub mod value;
