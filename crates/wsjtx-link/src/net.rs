//! The blocking socket pump
//!
//! One socket, one thread, no receive timeout: the peer's periodic
//! heartbeats are what keeps the loop turning. Each datagram is fully
//! handled and the session's outbound queue drained before the next
//! receive. A malformed datagram only costs a log line; an unrelated
//! sender must never take the listener down.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use wsjtx_protocol::{Payload, MAX_DATAGRAM};

use crate::error::LinkError;
use crate::session::Session;

/// Requests loop shutdown from another thread (the signal handler)
///
/// The receive call blocks without timeout, so besides setting the flag the
/// handle pokes the socket with an empty loopback datagram to wake it.
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl ShutdownHandle {
    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
        let mut wake = self.addr;
        if wake.ip().is_unspecified() {
            wake.set_ip(IpAddr::V4(Ipv4Addr::LOCALHOST));
        }
        let poke = UdpSocket::bind(("127.0.0.1", 0)).and_then(|s| s.send_to(&[], wake));
        if let Err(e) = poke {
            warn!(error = %e, "could not wake the receive loop");
        }
    }
}

/// Owns the socket and pumps datagrams through a [`Session`]
pub struct UdpLink {
    socket: UdpSocket,
    session: Session,
    shutdown: Arc<AtomicBool>,
}

impl UdpLink {
    /// Bind the listening socket
    pub fn bind(addr: &str, session: Session) -> Result<Self, LinkError> {
        let socket = UdpSocket::bind(addr)?;
        Ok(Self {
            socket,
            session,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, LinkError> {
        Ok(self.socket.local_addr()?)
    }

    /// Handle for requesting shutdown from a signal handler
    pub fn shutdown_handle(&self) -> Result<ShutdownHandle, LinkError> {
        Ok(ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            addr: self.local_addr()?,
        })
    }

    /// Receive and dispatch until the peer closes or shutdown is requested.
    /// Teardown (decolor and flush) runs even when the pump fails, so the
    /// remote application is never left with stale highlighting.
    pub fn run(&mut self) -> Result<(), LinkError> {
        info!(addr = %self.local_addr()?, "listening");
        let result = self.pump();
        self.session.shutdown();
        if let Err(e) = self.send_outbound() {
            warn!(error = %e, "teardown flush failed");
        }
        result
    }

    fn pump(&mut self) -> Result<(), LinkError> {
        let mut buf = [0u8; MAX_DATAGRAM];
        loop {
            let (len, from) = self.socket.recv_from(&mut buf)?;
            if self.shutdown.load(Ordering::SeqCst) {
                info!("shutdown requested");
                return Ok(());
            }
            match self.session.accept(from, &buf[..len]) {
                Ok(tel) => {
                    if is_routine(&tel.payload) {
                        trace!(%from, "{tel}");
                    } else {
                        info!(%from, "{tel}");
                    }
                }
                Err(e) => warn!(%from, error = %e, "dropping malformed datagram"),
            }
            self.send_outbound()?;
            if self.session.is_closed() {
                return Ok(());
            }
        }
    }

    fn send_outbound(&mut self) -> Result<(), LinkError> {
        let telegrams = self.session.drain_outbound();
        let Some(peer) = self.session.peer() else {
            debug!(queued = telegrams.len(), "no peer to send to");
            return Ok(());
        };
        for tel in telegrams {
            let bytes = tel.encode()?;
            self.socket.send_to(&bytes, peer)?;
            trace!(%peer, "sent {tel}");
        }
        Ok(())
    }
}

/// Telegrams that arrive every receive period and are not worth an
/// info-level line each
fn is_routine(payload: &Payload) -> bool {
    matches!(
        payload,
        Payload::Heartbeat(_)
            | Payload::Status(_)
            | Payload::Decode(_)
            | Payload::QsoLogged(_)
            | Payload::LoggedAdif(_)
    )
}
