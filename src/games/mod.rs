//! Game components used by the CFR trainer.
//!
//! The trainer in [`crate::cfr`] treats the cards as an external
//! collaborator: it needs a deck that deals two disjoint hands and an
//! evaluator that orders hands at showdown. Both live here.
//!
//! ## Available Games
//!
//! - [`five_card`]: heads-up five-card poker with a 52-card deck

pub mod five_card;
