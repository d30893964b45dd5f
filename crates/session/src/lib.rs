//! Session layer of sqlchat.
//!
//! A [`Session`] owns the [`Transcript`] and drives one question at a time
//! through an [`agent::Assistant`], drawing on a [`Surface`]. Before the
//! first question, [`prepare`] turns the [`Sidebar`] settings into an agent
//! or a [`Halt`] explaining what is missing.

pub use {
    session::{Session, State},
    setup::{Bootstrap, Connect, Halt, Setup, prepare},
    sidebar::Sidebar,
    surface::Surface,
    transcript::{GREETING, Role, Transcript, Turn},
};

mod session;
mod setup;
mod sidebar;
mod surface;
mod transcript;
