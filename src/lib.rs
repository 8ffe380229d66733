//! A blocking busy overlay for terminal pages.
//!
//! [`controller::BlockUi`] is the core: an edge-triggered controller that traps
//! keyboard focus inside a region while it is blocked, restores focus when the
//! block lifts, and keeps the busy message on screen while the page scrolls.
//! It talks to the page through the [`host::Host`] trait; [`dom::Document`] is
//! the in-memory page used by the demo binary and the tests.
//! [`components::BlockUiComponent`] wires the controller into a ratatui page.

pub mod component_context;
pub mod components;
pub mod config;
pub mod controller;
pub mod dom;
pub mod drivers;
pub mod event_loop;
pub mod focus_trap;
pub mod geometry;
pub mod host;
pub mod keybindings;
pub mod scheduler;
pub mod scroll;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod viewport;
