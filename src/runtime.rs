use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};

use crate::app::{App, KeyOutcome};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events. Everything runs on the UI thread, so a source
/// only ever blocks the caller for up to `timeout`.
pub trait EventSource {
    /// Ok(None) when nothing relevant arrived before `timeout`.
    fn wait(&mut self, timeout: Duration) -> io::Result<Option<AppEvent>>;
}

/// Production event source polling crossterm directly
#[derive(Debug, Default)]
pub struct CrosstermEventSource;

impl CrosstermEventSource {
    pub fn new() -> Self {
        Self
    }
}

impl EventSource for CrosstermEventSource {
    fn wait(&mut self, timeout: Duration) -> io::Result<Option<AppEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(match event::read()? {
            // some platforms also report releases
            CtEvent::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            CtEvent::Resize(_, _) => Some(AppEvent::Resize),
            _ => None,
        })
    }
}

/// Scripted event source for tests. Once drained it only yields ticks,
/// without sleeping.
#[derive(Debug, Default)]
pub struct TestEventSource {
    queue: VecDeque<AppEvent>,
    pacing: Duration,
}

impl TestEventSource {
    pub fn new(events: impl IntoIterator<Item = AppEvent>) -> Self {
        Self {
            queue: events.into_iter().collect(),
            pacing: Duration::ZERO,
        }
    }

    /// Sleep `pacing` before handing out each queued event, like a typist
    /// holding a key down.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn push(&mut self, event: AppEvent) {
        self.queue.push_back(event);
    }
}

impl EventSource for TestEventSource {
    fn wait(&mut self, _timeout: Duration) -> io::Result<Option<AppEvent>> {
        if !self.queue.is_empty() && !self.pacing.is_zero() {
            std::thread::sleep(self.pacing);
        }
        Ok(self.queue.pop_front())
    }
}

/// Configurable ticker interface
pub trait Ticker {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&mut self) -> io::Result<AppEvent> {
        Ok(self
            .event_source
            .wait(self.ticker.interval())?
            .unwrap_or(AppEvent::Tick))
    }

    pub fn event_source_mut(&mut self) -> &mut E {
        &mut self.event_source
    }
}

/// Draw, wait for the next event, dispatch it to the app. Returns when the
/// user quits.
pub fn run<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E, T>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let event = runner.step()?;
        // due ticks fire before the key, so an expired test is locked first
        let now = Instant::now();
        app.on_tick(now);

        if let AppEvent::Key(key) = event {
            if app.on_key(key, now) == KeyOutcome::Quit {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn step_returns_tick_when_idle() {
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let mut runner = Runner::new(TestEventSource::default(), ticker);

        assert_eq!(runner.step().unwrap(), AppEvent::Tick);
    }

    #[test]
    fn step_passes_through_events_in_order() {
        let key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        let es = TestEventSource::new([AppEvent::Resize, AppEvent::Key(key)]);
        let mut runner = Runner::new(es, FixedTicker::new(Duration::from_millis(10)));

        assert_eq!(runner.step().unwrap(), AppEvent::Resize);
        assert_eq!(runner.step().unwrap(), AppEvent::Key(key));
        assert_eq!(runner.step().unwrap(), AppEvent::Tick);

        runner.event_source_mut().push(AppEvent::Resize);
        assert_eq!(runner.step().unwrap(), AppEvent::Resize);
    }
}
