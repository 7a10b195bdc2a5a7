//! Client-side session gate.

pub mod state;

pub use state::{GateState, Navigation, RouteAccess, SessionGate};
