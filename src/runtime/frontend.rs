use crate::app::App;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookbackEdit {
    Insert(char),
    Backspace,
    Clear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserInputEvent {
    /// The fetch/stop control.
    Trigger,
    ToggleTheme,
    CycleSummaryType,
    EditLookback(LookbackEdit),
    Interrupt,
    Quit,
}

pub trait FrontendAdapter {
    fn poll_user_input(&mut self, app: &App) -> Option<UserInputEvent>;
    fn render(&mut self, app: &App);
    fn should_quit(&self) -> bool;
}
