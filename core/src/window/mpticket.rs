//! Classic multiplayer join tickets.
//!
//! An external program may drop an `mpticket` file in the instance's root
//! folder to make a classic target join a server on startup. The file holds
//! three lines: server, port and mppass, in that order.

use std::fs;
use std::path::Path;

pub const MPTICKET_FILE: &str = "mpticket";
pub const MPTICKET_CORRUPT_FILE: &str = "mpticket.corrupt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MpTicket {
    pub server: String,
    pub port: String,
    pub mppass: String,
}

impl MpTicket {
    /// Read the ticket from `instance_dir`, if there is one.
    ///
    /// A ticket with fewer than three lines is moved aside to
    /// `mpticket.corrupt` so it is not picked up again. Read failures are
    /// logged and treated as no ticket.
    pub fn load(instance_dir: &Path) -> Option<Self> {
        let path = instance_dir.join(MPTICKET_FILE);
        if !path.exists() {
            return None;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Failed to read mpticket file: {}", e);
                return None;
            }
        };

        let mut lines = content.lines();
        match (lines.next(), lines.next(), lines.next()) {
            (Some(server), Some(port), Some(mppass)) => Some(Self {
                server: server.to_string(),
                port: port.to_string(),
                mppass: mppass.to_string(),
            }),
            _ => {
                tracing::warn!("mpticket file is corrupted");
                if let Err(e) = fs::rename(&path, instance_dir.join(MPTICKET_CORRUPT_FILE)) {
                    tracing::error!("Failed to move corrupted mpticket aside: {}", e);
                }
                None
            }
        }
    }
}
