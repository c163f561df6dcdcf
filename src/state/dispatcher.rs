use super::job::{Job, TokenCounter};
use crate::types::{StreamEvent, Summary};
use crate::ui::Presenter;

pub const FINALIZING_MESSAGE: &str = "Finalizing results...";
pub const FINALIZING_PERCENT: f64 = 85.0;
pub const COMPLETE_MESSAGE: &str = "Complete!";
pub const COMPLETE_PERCENT: f64 = 100.0;

/// What the controller must do after an event has been applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Continue,
    /// A `result` arrived; the final list is already in the job.
    Finalize { tokens: TokenCounter },
    Fail(String),
}

/// Applies exactly one transition for `event`.
pub fn dispatch_event(event: StreamEvent, job: &mut Job, presenter: &mut dyn Presenter) -> Dispatch {
    match event {
        StreamEvent::Progress { message, progress } => {
            presenter.show_loading(&message, progress);
            Dispatch::Continue
        }
        StreamEvent::Tokens {
            input_tokens,
            output_tokens,
        } => {
            job.tokens = TokenCounter::new(input_tokens, output_tokens);
            presenter.show_tokens(job.tokens);
            Dispatch::Continue
        }
        StreamEvent::Summary {
            summary,
            published_time,
        } => {
            job.results.push(Summary {
                summary,
                published_time,
            });
            presenter.render_results(job.results.as_slice());
            Dispatch::Continue
        }
        StreamEvent::Result {
            summaries,
            total_input_tokens,
            total_output_tokens,
            summarizer_available,
        } => {
            job.results.replace(summaries);
            job.tokens = TokenCounter::new(total_input_tokens, total_output_tokens);
            presenter.show_loading(FINALIZING_MESSAGE, FINALIZING_PERCENT);
            if !summarizer_available {
                presenter.show_capability_warning();
            }
            Dispatch::Finalize { tokens: job.tokens }
        }
        StreamEvent::Error { message } => Dispatch::Fail(message),
        StreamEvent::Unknown => Dispatch::Continue,
    }
}
