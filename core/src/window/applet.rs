//! Window factory that hands the session straight to the applet.

use crate::error::LaunchError;

use super::{Applet, AppletParameters, CompatWindow, FrameGeometry, WindowFactory, WrapperSession};

/// Builds windows that pass geometry and parameters through to the applet.
///
/// Drawing the frame is the applet's concern; this factory only performs the
/// parameter hand-off the host window would do.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppletWindowFactory;

struct AppletWindow {
    title: String,
    applet: Box<dyn Applet>,
}

impl WindowFactory for AppletWindowFactory {
    fn construct(
        &self,
        title: &str,
        applet: Box<dyn Applet>,
    ) -> Result<Box<dyn CompatWindow>, LaunchError> {
        tracing::debug!("Constructing window '{}' for {}", title, applet.class_name());
        Ok(Box::new(AppletWindow {
            title: title.to_string(),
            applet,
        }))
    }
}

impl CompatWindow for AppletWindow {
    fn start(mut self: Box<Self>, session: WrapperSession) -> anyhow::Result<()> {
        let frame = FrameGeometry {
            title: self.title.clone(),
            width: session.width,
            height: session.height,
            maximize: session.maximize,
        };
        let params = AppletParameters::from_session(&session);

        tracing::info!(
            "Starting {} in a {}x{} window{}",
            self.applet.class_name(),
            frame.width,
            frame.height,
            if frame.maximize { " (maximized)" } else { "" }
        );

        self.applet.start(&frame, &params)
    }
}
