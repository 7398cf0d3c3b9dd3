//! Step-by-step replay of scripted multi-window sessions.
//!
//! A [`script::Script`] is flattened into a [`timeline::Timeline`] and played
//! forward and backward by [`engine::StepEngine`], which keeps an
//! [`state::AccumulatedState`] and asks a [`window::WindowFocus`] to raise the
//! window each step touches. The remaining modules host the replay in a
//! terminal.

pub mod actions;
pub mod app;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod engine;
pub mod error;
pub mod event_loop;
pub mod keybindings;
pub mod layout;
pub mod runner;
pub mod script;
pub mod state;
pub mod timeline;
pub mod tracing_sub;
pub mod ui;
pub mod window;
