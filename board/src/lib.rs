//! Replicated board engine for one whiteboard room.
//!
//! The engine keeps a client-local copy of the room (images, game frames
//! and the games inside them) and turns pointer input, host callbacks and
//! inbound relay messages into [`session::Action`]s. It performs no I/O and
//! owns no clocks, so a browser host, the CLI and the tests drive it the same
//! way. Consistency is last-writer-wins in the order the relay delivers.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | [`session::BoardSession`] dispatcher, actions and outbound messages |
//! | [`games`] | Game channel handlers: puzzle and memory operations |
//! | [`store`] | Images and game frames with absolute geometry |
//! | [`focus`] | Single-focus arbitration and the settings panel |
//! | [`puzzle`] | Sliding-tile puzzle state machine |
//! | [`memory`] | Memory-match state machine |
//! | [`presets`] | Built-in memory image sets |
//! | [`hit`] | Hit-testing against frames and images |
//! | [`input`] | Pen style and the gesture state machine |
//! | [`throttle`] | One interim update per animation frame |
//! | [`ids`] | Image and frame id counters |
//! | [`geom`] | Points and rectangles |
//! | [`config`] | Engine tunables |
//! | [`consts`] | Shared numeric defaults |

pub mod config;
pub mod consts;
pub mod focus;
pub mod games;
pub mod geom;
pub mod hit;
pub mod ids;
pub mod input;
pub mod memory;
pub mod presets;
pub mod puzzle;
pub mod session;
pub mod store;
pub mod throttle;

pub use config::SessionConfig;
pub use session::{Action, BoardSession, Outbound};
