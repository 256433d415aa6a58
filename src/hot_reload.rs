//! Development-only live reload. A filesystem watcher on the content
//! directory broadcasts a signal; connected browsers reload over the
//! websocket. Nothing server-side is refreshed here: content is read per
//! request, so a browser reload is all it takes to see the new files.

use std::{path::PathBuf, time::Duration};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use notify_debouncer_full::{
    new_debouncer,
    notify::{Error as NotifyError, RecursiveMode, Watcher},
    DebouncedEvent,
};
use tracing::{debug, error, info};

use crate::state::RefreshBroadcaster;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(tx): State<RefreshBroadcaster>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, tx))
}

async fn handle_socket(mut socket: WebSocket, tx: RefreshBroadcaster) {
    let mut rx = tx.subscribe();

    if rx.recv().await.is_ok() {
        if socket
            .send(Message::Text("reload".to_string().into()))
            .await
            .is_err()
        {
            debug!("client disconnected before reload message could be sent");
        }
    }
}

/// Editor temp files (Emacs lockfiles, `~` backups) churn constantly and
/// must not trigger reloads.
fn is_temp_file(event: &DebouncedEvent) -> bool {
    event.event.paths.iter().any(|path| {
        path.file_name()
            .and_then(|name| name.to_str())
            .map_or(false, |s| s.starts_with(".#") || s.ends_with('~'))
    })
}

pub fn start_content_watcher(tx: RefreshBroadcaster, content_dir: PathBuf) {
    info!("starting content watcher for live reload");
    tokio::spawn(async move {
        let (watcher_tx, mut watcher_rx) = tokio::sync::mpsc::channel(1);

        let mut debouncer = new_debouncer(
            Duration::from_millis(200),
            None,
            move |res: Result<Vec<DebouncedEvent>, Vec<NotifyError>>| match res {
                Ok(events) => {
                    let relevant = events.iter().any(|event| {
                        (event.kind.is_modify()
                            || event.kind.is_create()
                            || event.kind.is_remove())
                            && !is_temp_file(event)
                    });
                    if relevant {
                        debug!(
                            paths = ?events
                                .iter()
                                .flat_map(|e| &e.event.paths)
                                .collect::<Vec<_>>(),
                            "content change detected"
                        );
                        if let Err(e) = watcher_tx.blocking_send(()) {
                            error!("failed to forward watcher event: {}", e);
                        }
                    }
                }
                Err(errors) => {
                    for e in errors {
                        error!("watcher error: {}", e);
                    }
                }
            },
        )
        .expect("failed to create debouncer");

        debouncer
            .watcher()
            .watch(content_dir.as_path(), RecursiveMode::Recursive)
            .expect("failed to watch content directory");

        while watcher_rx.recv().await.is_some() {
            info!("content changed, signalling connected clients");
            if let Err(e) = tx.send(()) {
                debug!("no live-reload clients connected: {}", e);
            }
        }
    });
}
