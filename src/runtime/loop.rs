use crate::app::App;
use crate::state::JobUpdate;
use std::time::Instant;
use tokio::sync::mpsc;

use super::frontend::FrontendAdapter;

/// Single owner of all mutable UI and job state. Drive tasks only reach it
/// through `update_rx`.
pub struct Runtime {
    pub app: App,
    update_rx: mpsc::UnboundedReceiver<JobUpdate>,
}

impl Runtime {
    pub fn new(app: App, update_rx: mpsc::UnboundedReceiver<JobUpdate>) -> Self {
        Self { app, update_rx }
    }

    pub async fn run<F: FrontendAdapter>(&mut self, frontend: &mut F) {
        self.app.check_summarizer();

        loop {
            if let Some(event) = frontend.poll_user_input(&self.app) {
                self.app.on_user_input(event);
            }

            self.drain_updates(Instant::now());
            self.app.tick(Instant::now());
            frontend.render(&self.app);

            if frontend.should_quit() || self.app.quit_requested() {
                self.app.shutdown();
                break;
            }
            tokio::task::yield_now().await;
        }
    }

    /// Applies every queued drive-task update, in arrival order.
    pub fn drain_updates(&mut self, now: Instant) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.update_rx.try_recv() {
            self.app.handle_update(update, now);
            applied += 1;
        }
        applied
    }

    #[cfg(test)]
    pub async fn next_update(&mut self) -> Option<JobUpdate> {
        self.update_rx.recv().await
    }
}
