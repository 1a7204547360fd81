//! Agri Voice: push-to-talk bilingual farming assistant engine.
//!
//! * [`assistant`]: conversation state machine and controller.
//! * [`speech`]: capture and output adapter ports.
//! * [`llm`]: prompt composer and the Gemini backend client.
//! * [`config`]: TOML settings and platform paths.

pub mod assistant;
pub mod config;
pub mod llm;
pub mod speech;
