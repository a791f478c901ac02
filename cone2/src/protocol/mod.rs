// cone2-rs/cone2/src/protocol/mod.rs
//! Protocol registry: supported protocol names, their SAM codes and their
//! hunt-phase search contributions.

pub mod contact;
pub mod contactless;

pub use contact::ContactProtocol;
pub use contactless::{
    ContactlessProtocol, HuntPhaseParameters, ProtocolTable, SearchMask, SearchRequest,
    SearchTechnologies,
};
