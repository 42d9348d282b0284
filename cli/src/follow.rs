use lettervideo_application::{ControllerSnapshot, JobLifecycleController, UiPageState};
use lettervideo_domain::Route;
use tokio::sync::mpsc;

#[derive(Debug, PartialEq, Eq)]
pub enum FollowOutcome {
    Completed(Route),
    Failed(String),
    /// Ctrl-C: polling stopped, the job stays pending.
    Detached,
}

/// Prints progress until the controller navigates away, reports an error or the user
/// interrupts.
pub async fn follow_job(
    controller: &JobLifecycleController,
    routes: &mut mpsc::UnboundedReceiver<Route>,
) -> FollowOutcome {
    let mut updates = controller.subscribe();
    let mut last_line = None;
    let snapshot = updates.borrow_and_update().clone();
    render(&snapshot, &mut last_line);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            route = routes.recv() => {
                return match route {
                    Some(route) => FollowOutcome::Completed(route),
                    None => FollowOutcome::Failed("navigation channel closed".to_string()),
                };
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    return FollowOutcome::Detached;
                }
                let snapshot = updates.borrow_and_update().clone();
                if snapshot.page == UiPageState::Error {
                    let message = snapshot
                        .error
                        .unwrap_or_else(|| "video generation failed".to_string());
                    return FollowOutcome::Failed(message);
                }
                render(&snapshot, &mut last_line);
            }
            _ = &mut ctrl_c => {
                controller.shutdown().await;
                return FollowOutcome::Detached;
            }
        }
    }
}

fn render(snapshot: &ControllerSnapshot, last_line: &mut Option<String>) {
    let Some(line) = status_line(snapshot) else {
        return;
    };
    if last_line.as_deref() != Some(line.as_str()) {
        println!("{line}");
        *last_line = Some(line);
    }
}

fn status_line(snapshot: &ControllerSnapshot) -> Option<String> {
    if snapshot.page != UiPageState::InProgress {
        return None;
    }
    let status = snapshot.status_message.as_deref().unwrap_or("Waiting…");
    let mut line = if snapshot.queue_position > 0 {
        format!("{status} (queue position {})", snapshot.queue_position)
    } else {
        status.to_string()
    };
    if !snapshot.handle_persisted {
        line.push_str(" [job id not saved, `resume` will not find it]");
    }
    Some(line)
}
