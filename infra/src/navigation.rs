use lettervideo_domain::{Navigator, Route};
use tokio::sync::mpsc;

/// Forwards navigation requests to whoever renders the views.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    sender: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "navigating");
        if self.sender.send(route).is_err() {
            tracing::warn!("navigation dropped; no view is listening");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn routes_arrive_in_order() {
        let (navigator, mut routes) = ChannelNavigator::channel();
        navigator.navigate(Route::Create);
        navigator.navigate(Route::Video {
            id: "abc".to_string(),
        });

        assert_eq!(routes.recv().await, Some(Route::Create));
        assert_eq!(
            routes.recv().await,
            Some(Route::Video {
                id: "abc".to_string()
            })
        );
    }

    #[test]
    fn navigating_without_a_listener_is_harmless() {
        let (navigator, routes) = ChannelNavigator::channel();
        drop(routes);
        navigator.navigate(Route::Gallery);
    }
}
