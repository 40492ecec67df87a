//! Bridge between shelfly-core's watch channels and the TUI action loop.
//!
//! Runs as a background task: resolves the session, performs the initial
//! catalog refresh, then forwards every store/session change as an Action
//! until cancelled.

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use shelfly_core::{Catalog, CoreError, SessionState};

use crate::action::{Action, Notification};

/// Spawn the data bridge task.
///
/// The bridge owns its own `Catalog` clone; dropping the returned token
/// (or cancelling it) stops the task.
pub fn spawn_data_bridge(
    catalog: Catalog,
    action_tx: UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    tokio::spawn(async move {
        run(catalog, action_tx, cancel).await;
    });
}

async fn run(catalog: Catalog, action_tx: UnboundedSender<Action>, cancel: CancellationToken) {
    // Establish the session first so the UI can route past the sign-in gate.
    match catalog.resolve_session().await {
        Ok(state) => {
            let signed_in = state.is_signed_in();
            let _ = action_tx.send(Action::SessionChanged(state));

            if signed_in {
                if let Err(err) = catalog.refresh().await {
                    report_error(&action_tx, &err);
                }
            }
        }
        Err(err) => {
            let _ = action_tx.send(Action::SessionChanged(SessionState::SignedOut));
            report_error(&action_tx, &err);
        }
    }

    let mut books = catalog.books();
    let mut session = catalog.session_state();

    // Push the current snapshot before waiting on changes, so screens
    // render data even if nothing changes again.
    let _ = action_tx.send(Action::BooksUpdated(books.current().clone()));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("data bridge cancelled");
                break;
            }

            changed = books.changed() => {
                match changed {
                    Some(snapshot) => {
                        if action_tx.send(Action::BooksUpdated(snapshot)).is_err() {
                            break;
                        }
                    }
                    None => {
                        warn!("book store closed; stopping data bridge");
                        break;
                    }
                }
            }

            changed = session.changed() => {
                match changed {
                    Ok(()) => {
                        let state = session.borrow_and_update().clone();
                        if action_tx.send(Action::SessionChanged(state)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        warn!("session channel closed; stopping data bridge");
                        break;
                    }
                }
            }
        }
    }
}

fn report_error(action_tx: &UnboundedSender<Action>, err: &CoreError) {
    warn!(error = %err, "data bridge operation failed");
    let _ = action_tx.send(Action::Notify(Notification::error(err.to_string())));
}
