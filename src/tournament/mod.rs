// src/tournament/mod.rs

pub mod lobby;

pub use lobby::BracketLobby;
