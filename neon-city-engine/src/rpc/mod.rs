//! JSON-RPC 2.0 communication layer for the embedding web page.
//!
//! Implements bidirectional messaging between the Bevy engine and its host
//! page via iframe postMessage, supporting both request-response and
//! notification patterns.
//!
//! ## Architecture
//!
//! The RPC system uses standard JSON-RPC 2.0 protocol with:
//! - **Requests**: Expect responses with matching IDs
//! - **Notifications**: One-way messages without responses
//! - **Responses**: Reply to requests with results or errors
//!
//! ## Message Flow
//!
//! ```text
//! Host (Parent Window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ──────┤
//! ```
//!
//! ## Adding Methods
//!
//! Add a match arm in `handle_rpc_request()` and a `handle_*` function taking
//! the request params and the `RpcContext`. Parameters are deserialised into a
//! local `#[derive(Deserialize)]` struct; a mismatch maps to
//! `RpcError::invalid_params`. State that only exists after generation is
//! optional in the context and reports `-32603` while the city loads.
//!
//! Push unsolicited updates with `WebRpcInterface::send_notification()`.
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! ## Existing Methods
//!
//! ### Diagnostics
//! - `get_fps`: Retrieve current frame rate
//!
//! ### Day/Night Cycle
//! - `get_time_of_day`: Phase, day/night weights and pause flag
//! - `set_time_of_day`: Jump to a phase in `[0, 1)`
//! - `set_day_night_paused`: Freeze or resume the cycle
//!
//! ### Scene
//! - `get_city_stats`: Seed, object counts, and whether defaults replaced the config file
//!
//! ## Notifications
//! - `fps_update`: every 0.5 s
//! - `day_night_update`: every 1 s, same payload as `get_time_of_day`

/// JSON-RPC 2.0 bidirectional communication system for the host page.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
