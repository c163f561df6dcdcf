pub mod layout;
pub mod render;
pub mod text;
pub mod view;

pub use view::{
    format_published_time, LoadingView, Presenter, ResultsView, SummaryView, TriggerState,
    ViewState,
};
