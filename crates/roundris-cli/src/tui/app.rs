use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Trait for TUI applications.
///
/// Applications executed by `Tui::run()` must implement this trait.
pub trait App {
    /// Initializes the application.
    ///
    /// Called at the start of `Tui::run()`. Use this to configure the frame rate.
    fn init(&mut self, tui: &mut Tui);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Time until the application next wants `update()`, measured from the
    /// previous update. `None` means only terminal events matter.
    fn next_update(&self) -> Option<Duration>;

    /// Advances the application by the wall-clock time since the previous update.
    ///
    /// Also called right before every terminal event, so `handle_event()`
    /// always sees up-to-date state.
    fn update(&mut self, tui: &mut Tui, elapsed: Duration);

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    /// Draws the screen (called on each `Event::Render`).
    fn draw(&self, frame: &mut Frame);
}
