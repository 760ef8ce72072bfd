//! Compatibility wrapper seam.
//!
//! Old targets are embeddable components rather than programs: they expect
//! a host window to hand them parameters and drive their lifecycle. This
//! module defines that boundary. Rendering is the window implementation's
//! business; the orchestrator only assembles the session and the parameters.

mod applet;
mod mpticket;

use std::collections::BTreeMap;

use crate::error::LaunchError;

pub use applet::AppletWindowFactory;
pub use mpticket::{MPTICKET_CORRUPT_FILE, MPTICKET_FILE, MpTicket};

/// An instantiated applet-like component of the target.
pub trait Applet: Send {
    fn class_name(&self) -> &str;

    /// Initialise and start the component inside `frame`.
    fn start(&mut self, frame: &FrameGeometry, params: &AppletParameters) -> anyhow::Result<()>;
}

/// A window hosting one applet. Owns its own lifecycle once started.
pub trait CompatWindow: Send {
    fn start(self: Box<Self>, session: WrapperSession) -> anyhow::Result<()>;
}

/// Constructs compatibility windows.
pub trait WindowFactory: Send + Sync {
    fn construct(
        &self,
        title: &str,
        applet: Box<dyn Applet>,
    ) -> Result<Box<dyn CompatWindow>, LaunchError>;
}

/// Everything the wrapper needs to start an applet session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperSession {
    pub user: String,
    pub session: String,
    pub width: u32,
    pub height: u32,
    pub maximize: bool,
    pub server_address: Option<String>,
    pub server_port: Option<String>,
    pub demo: bool,
    /// Classic-server join ticket found next to the instance.
    pub ticket: Option<MpTicket>,
}

/// Title and size of the host window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameGeometry {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub maximize: bool,
}

/// Named string parameters an applet reads from its host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppletParameters {
    values: BTreeMap<String, String>,
}

impl AppletParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parameter set for a session.
    ///
    /// The ticket supplies `server`, `port` and `mppass`; an explicit server
    /// address from the parent overrides the ticket's server and port.
    pub fn from_session(session: &WrapperSession) -> Self {
        let mut params = Self::new();

        if let Some(ticket) = &session.ticket {
            params.set("server", &ticket.server);
            params.set("port", &ticket.port);
            params.set("mppass", &ticket.mppass);
        }

        if let Some(address) = &session.server_address {
            params.set("server", address);
            if let Some(port) = &session.server_port {
                params.set("port", port);
            }
        }

        params.set("username", &session.user);
        params.set("sessionid", &session.session);
        // Shows the quit button; often ignored.
        params.set("stand-alone", "true");
        // Some old versions need this for world saves to work.
        params.set("haspaid", "true");
        params.set("demo", session.demo.to_string());
        params.set("fullscreen", "false");

        params
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> WrapperSession {
        WrapperSession {
            user: "alice".to_string(),
            session: "token".to_string(),
            width: 854,
            height: 480,
            maximize: false,
            server_address: None,
            server_port: None,
            demo: false,
            ticket: None,
        }
    }

    #[test]
    fn test_parameters_from_plain_session() {
        let params = AppletParameters::from_session(&session());
        assert_eq!(params.get("username"), Some("alice"));
        assert_eq!(params.get("sessionid"), Some("token"));
        assert_eq!(params.get("stand-alone"), Some("true"));
        assert_eq!(params.get("haspaid"), Some("true"));
        assert_eq!(params.get("demo"), Some("false"));
        assert_eq!(params.get("fullscreen"), Some("false"));
        assert_eq!(params.get("server"), None);
        assert_eq!(params.get("mppass"), None);
    }

    #[test]
    fn test_parameters_demo_flag() {
        let params = AppletParameters::from_session(&WrapperSession {
            demo: true,
            ..session()
        });
        assert_eq!(params.get("demo"), Some("true"));
    }

    #[test]
    fn test_parameters_from_ticket() {
        let params = AppletParameters::from_session(&WrapperSession {
            ticket: Some(MpTicket {
                server: "classic.example.net".to_string(),
                port: "25565".to_string(),
                mppass: "secret".to_string(),
            }),
            ..session()
        });
        assert_eq!(params.get("server"), Some("classic.example.net"));
        assert_eq!(params.get("port"), Some("25565"));
        assert_eq!(params.get("mppass"), Some("secret"));
    }

    #[test]
    fn test_explicit_server_overrides_ticket() {
        let params = AppletParameters::from_session(&WrapperSession {
            server_address: Some("play.example.org".to_string()),
            server_port: Some("25570".to_string()),
            ticket: Some(MpTicket {
                server: "classic.example.net".to_string(),
                port: "25565".to_string(),
                mppass: "secret".to_string(),
            }),
            ..session()
        });
        assert_eq!(params.get("server"), Some("play.example.org"));
        assert_eq!(params.get("port"), Some("25570"));
        assert_eq!(params.get("mppass"), Some("secret"));
    }
}
