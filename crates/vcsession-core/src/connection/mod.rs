//! Remote session lifecycle.
//!
//! [`ConnectionManager`] drives login, logout and resume against any
//! [`RemoteClient`], persisting identity through a
//! [`SessionStore`](crate::session::SessionStore).

mod client;
mod error;
mod manager;
#[cfg(feature = "vsphere")]
mod vsphere;

pub use client::{ConnectRequest, Connection, RemoteClient};
pub use error::{ClientError, ClientResult, ConnectionError, ConnectionResult};
pub use manager::{
    ConnectionManager, STATUS_CONNECTED, STATUS_CONNECTING, STATUS_DISCONNECTED, STATUS_LOGGED_OUT,
};
#[cfg(feature = "vsphere")]
pub use vsphere::{VsphereClient, VsphereSession};
