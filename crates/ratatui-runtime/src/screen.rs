use std::fmt;

use crossterm::event::Event;
use ratatui::Frame;

use crate::{App, Runtime};

/// One screen of the application, managed by a [`ScreenStack`].
///
/// # Lifecycle
///
/// ```text
/// Push ─▶ on_active() ─▶ foreground ─▶ on_inactive() ─┬─▶ background ─┐
///             ▲                                       │   (Push)      │
///             └──────────── screen above popped ──────┼───────────────┘
///                                                     └─▶ on_close() ─▶ Drop
///                                                         (Pop / Exit)
/// ```
///
/// Only the foreground screen receives events, timer ticks and draw calls.
///
/// # Timer
///
/// The foreground screen owns the [`Runtime`] timer. It arms it in
/// [`on_active`] (or later, from any hook). Whenever a screen leaves the
/// foreground the stack cancels the timer, so the next screen always starts
/// without one and never sees ticks meant for another screen.
///
/// ```rust
/// use std::time::Duration;
///
/// use crossterm::event::Event;
/// use ratatui::Frame;
/// use ratatui_runtime::{RenderMode, Runtime, Screen, ScreenTransition};
///
/// #[derive(Debug)]
/// struct Blinker {
///     on: bool,
/// }
///
/// impl Screen for Blinker {
///     fn on_active(&mut self, runtime: &mut Runtime) {
///         runtime.arm_timer(Duration::from_millis(500));
///         runtime.set_render_mode(RenderMode::throttled_from_rate(60.0));
///     }
///
///     fn handle_event(&mut self, _runtime: &mut Runtime, _event: &Event) -> ScreenTransition {
///         ScreenTransition::Pop
///     }
///
///     fn update(&mut self, _runtime: &mut Runtime) {
///         self.on = !self.on;
///     }
///
///     fn draw(&self, _frame: &mut Frame) {}
/// }
/// ```
///
/// [`on_active`]: Self::on_active
pub trait Screen: fmt::Debug {
    /// The screen came to the foreground: at startup, after being pushed, or
    /// after the screen above it was popped.
    fn on_active(&mut self, runtime: &mut Runtime);

    /// The screen left the foreground. The timer is cancelled right after.
    fn on_inactive(&mut self, _runtime: &mut Runtime) {}

    /// The screen is being removed for good. Always preceded by
    /// [`on_inactive`](Self::on_inactive).
    fn on_close(&mut self, _runtime: &mut Runtime) {}

    /// Handles a terminal event and returns the resulting transition.
    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> ScreenTransition;

    /// Called on each timer tick.
    fn update(&mut self, _runtime: &mut Runtime) {}

    fn draw(&self, frame: &mut Frame);
}

/// What the stack does after the foreground screen handled an event.
#[derive(Debug)]
pub enum ScreenTransition {
    Stay,
    /// Suspend the current screen and bring a new one to the foreground.
    Push(Box<dyn Screen>),
    /// Close the current screen and resume the one below it.
    Pop,
    /// Close every screen, top first, and end the application.
    Exit,
}

/// A stack of screens driven as one [`App`].
///
/// The application exits once the stack is empty or a screen asks for
/// [`ScreenTransition::Exit`].
#[derive(Debug)]
pub struct ScreenStack<'a> {
    screens: Vec<Box<dyn Screen + 'a>>,
    should_exit: bool,
}

impl<'a> ScreenStack<'a> {
    #[must_use]
    pub fn new(initial: Box<dyn Screen + 'a>) -> Self {
        Self {
            screens: vec![initial],
            should_exit: false,
        }
    }

    /// Takes the top screen out of the foreground and drops its timer.
    fn suspend_top(&mut self, runtime: &mut Runtime) {
        if let Some(top) = self.screens.last_mut() {
            top.on_inactive(runtime);
        }
        runtime.cancel_timer();
    }

    fn resume_top(&mut self, runtime: &mut Runtime) {
        if let Some(top) = self.screens.last_mut() {
            top.on_active(runtime);
        }
    }

    /// Suspends and closes the top screen. Returns `false` on an empty stack.
    fn close_top(&mut self, runtime: &mut Runtime) -> bool {
        self.suspend_top(runtime);
        let Some(mut top) = self.screens.pop() else {
            return false;
        };
        top.on_close(runtime);
        true
    }

    fn apply_transition(&mut self, runtime: &mut Runtime, transition: ScreenTransition) {
        match transition {
            ScreenTransition::Stay => {}
            ScreenTransition::Push(mut screen) => {
                self.suspend_top(runtime);
                screen.on_active(runtime);
                self.screens.push(screen);
            }
            ScreenTransition::Pop => {
                self.close_top(runtime);
                self.resume_top(runtime);
            }
            ScreenTransition::Exit => {
                while self.close_top(runtime) {}
                self.should_exit = true;
            }
        }
    }
}

impl App for ScreenStack<'_> {
    fn init(&mut self, runtime: &mut Runtime) {
        self.resume_top(runtime);
    }

    fn should_exit(&self) -> bool {
        self.should_exit || self.screens.is_empty()
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        if let Some(top) = self.screens.last_mut() {
            let transition = top.handle_event(runtime, &event);
            self.apply_transition(runtime, transition);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        if let Some(top) = self.screens.last() {
            top.draw(frame);
        }
    }

    fn update(&mut self, runtime: &mut Runtime) {
        if let Some(top) = self.screens.last_mut() {
            top.update(runtime);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, time::Duration};

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;

    const PERIOD: Duration = Duration::from_millis(1000);

    type Journal = Rc<RefCell<Vec<String>>>;

    /// Writes every hook it receives into a shared journal.
    ///
    /// Arms the timer when activated if `period` is set, and never cancels it
    /// itself.
    #[derive(Debug)]
    struct Recorder {
        name: &'static str,
        journal: Journal,
        period: Option<Duration>,
        next: Vec<ScreenTransition>,
    }

    impl Recorder {
        fn new(name: &'static str, journal: &Journal) -> Self {
            Self {
                name,
                journal: Rc::clone(journal),
                period: None,
                next: Vec::new(),
            }
        }

        fn timed(mut self, period: Duration) -> Self {
            self.period = Some(period);
            self
        }

        /// Queues the transitions returned by the following events, in order.
        fn answering(mut self, transitions: impl IntoIterator<Item = ScreenTransition>) -> Self {
            self.next = transitions.into_iter().collect();
            self.next.reverse();
            self
        }

        fn note(&self, hook: &str) {
            self.journal.borrow_mut().push(format!("{} {hook}", self.name));
        }
    }

    impl Screen for Recorder {
        fn on_active(&mut self, runtime: &mut Runtime) {
            self.note("active");
            if let Some(period) = self.period {
                runtime.arm_timer(period);
            }
        }

        fn on_inactive(&mut self, _runtime: &mut Runtime) {
            self.note("inactive");
        }

        fn on_close(&mut self, _runtime: &mut Runtime) {
            self.note("close");
        }

        fn handle_event(&mut self, _runtime: &mut Runtime, _event: &Event) -> ScreenTransition {
            self.note("event");
            self.next.pop().unwrap_or(ScreenTransition::Stay)
        }

        fn update(&mut self, _runtime: &mut Runtime) {
            self.note("tick");
        }

        fn draw(&self, _frame: &mut Frame) {}
    }

    fn any_key() -> Event {
        Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
    }

    fn drain(journal: &Journal) -> Vec<String> {
        journal.borrow_mut().drain(..).collect()
    }

    #[test]
    fn test_push_suspends_and_pop_resumes() {
        let journal = Journal::default();
        let child = Recorder::new("child", &journal).answering([ScreenTransition::Pop]);
        let root = Recorder::new("root", &journal)
            .answering([ScreenTransition::Push(Box::new(child))]);
        let mut stack = ScreenStack::new(Box::new(root));
        let mut runtime = Runtime::new();

        stack.init(&mut runtime);
        assert_eq!(drain(&journal), ["root active"]);

        stack.handle_event(&mut runtime, any_key());
        assert_eq!(
            drain(&journal),
            ["root event", "root inactive", "child active"]
        );

        stack.update(&mut runtime);
        assert_eq!(drain(&journal), ["child tick"], "only the top is ticked");

        stack.handle_event(&mut runtime, any_key());
        assert_eq!(
            drain(&journal),
            ["child event", "child inactive", "child close", "root active"]
        );
        assert!(!stack.should_exit());
    }

    #[test]
    fn test_exit_closes_top_down() {
        let journal = Journal::default();
        let child = Recorder::new("child", &journal).answering([ScreenTransition::Exit]);
        let root = Recorder::new("root", &journal)
            .answering([ScreenTransition::Push(Box::new(child))]);
        let mut stack = ScreenStack::new(Box::new(root));
        let mut runtime = Runtime::new();

        stack.init(&mut runtime);
        stack.handle_event(&mut runtime, any_key());
        drain(&journal);

        stack.handle_event(&mut runtime, any_key());
        assert_eq!(
            drain(&journal),
            [
                "child event",
                "child inactive",
                "child close",
                "root inactive",
                "root close",
            ]
        );
        assert!(stack.should_exit());
    }

    #[test]
    fn test_popping_last_screen_exits() {
        let journal = Journal::default();
        let root = Recorder::new("root", &journal).answering([ScreenTransition::Pop]);
        let mut stack = ScreenStack::new(Box::new(root));
        let mut runtime = Runtime::new();

        stack.init(&mut runtime);
        assert!(!stack.should_exit());
        stack.handle_event(&mut runtime, any_key());
        assert!(stack.should_exit());
    }

    #[test]
    fn test_timer_follows_foreground_screen() {
        let journal = Journal::default();
        let game = Recorder::new("game", &journal)
            .timed(PERIOD)
            .answering([ScreenTransition::Stay, ScreenTransition::Pop]);
        let host = Recorder::new("host", &journal)
            .answering([ScreenTransition::Push(Box::new(game))]);
        let mut stack = ScreenStack::new(Box::new(host));
        let mut runtime = Runtime::new();

        stack.init(&mut runtime);
        assert_eq!(runtime.timer_period(), None);

        stack.handle_event(&mut runtime, any_key());
        assert_eq!(runtime.timer_period(), Some(PERIOD));
        stack.handle_event(&mut runtime, any_key());
        assert_eq!(runtime.timer_period(), Some(PERIOD));

        stack.handle_event(&mut runtime, any_key());
        assert_eq!(
            runtime.timer_period(),
            None,
            "a popped screen leaves no timer behind"
        );
    }

    #[test]
    fn test_push_cancels_timer_of_covered_screen() {
        let journal = Journal::default();
        let overlay = Recorder::new("overlay", &journal);
        let game = Recorder::new("game", &journal)
            .timed(PERIOD)
            .answering([ScreenTransition::Push(Box::new(overlay))]);
        let mut stack = ScreenStack::new(Box::new(game));
        let mut runtime = Runtime::new();

        stack.init(&mut runtime);
        assert_eq!(runtime.timer_period(), Some(PERIOD));

        stack.handle_event(&mut runtime, any_key());
        assert_eq!(runtime.timer_period(), None);
    }
}
