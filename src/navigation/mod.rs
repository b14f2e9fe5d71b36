//! # Event navigation
//!
//! [`NavigationController`] is the explicit context object of the display: it owns the event
//! store, the configuration, the cache of the event on display, the scene arena handed to the
//! renderer, and the navigation state.
//!
//! ## State machine
//!
//! ```text
//!              goto_event(i) ok
//!   NoEvent ───────────────────────► EventLoaded(i)
//!      ▲  │                             │      ▲
//!      │  │ any failure                 │      │ goto_event(j) ok
//!      └──┘                             └──────┘ (j may equal i)
//! ```
//!
//! A failure (out-of-range index, empty entry, bad prompt input, hit outside the detector) is
//! returned as `Err` and never stored: the state, the cache and the scene stay exactly as they
//! were before the call. `next`/`prev` are `goto_event(current ± 1)`, with `current = -1` while
//! no event has been loaded.
//!
//! ## Commands
//!
//! The three interactive commands map onto controller methods through a static table of
//! function pointers ([`NavCommand::handler`]), so a UI can bind one button per
//! [`NavCommand::ALL`] entry and call [`NavigationController::dispatch`].
//!
//! Modules
//! -----------------
//! * [`event_cache`](crate::navigation::event_cache) – Per-event recomputation and its results.
//! * [`render`](crate::navigation::render) – Rendering collaborator trait and scene arena.
//! * [`prompt`](crate::navigation::prompt) – Input collaborator of the `GoTo` command.
use std::fmt;

use tracing::{info, warn};

use crate::{
    constants::NavIndex,
    display_params::DisplayParams,
    hits::event_store::EventStore,
    navigation::{
        event_cache::EventCache,
        prompt::IndexPrompt,
        render::{NullRenderer, RenderSink, Scene},
    },
    shower_errors::ShowerError,
};

pub mod event_cache;
pub mod prompt;
pub mod render;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    NoEvent,
    EventLoaded(NavIndex),
}

impl NavState {
    pub fn index(&self) -> Option<NavIndex> {
        match self {
            NavState::NoEvent => None,
            NavState::EventLoaded(i) => Some(*i),
        }
    }
}

/// The interactive commands of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavCommand {
    Next,
    Prev,
    GoTo,
}

/// Signature shared by every command handler.
pub type CommandHandler<S, R> =
    fn(&mut NavigationController<S, R>, &mut dyn IndexPrompt) -> Result<NavIndex, ShowerError>;

impl NavCommand {
    pub const ALL: [NavCommand; 3] = [NavCommand::Next, NavCommand::Prev, NavCommand::GoTo];

    /// Button text.
    pub fn label(&self) -> &'static str {
        match self {
            NavCommand::Next => "Next",
            NavCommand::Prev => "Prev",
            NavCommand::GoTo => "Go To",
        }
    }

    /// Controller method bound to the command.
    pub fn handler<S: EventStore, R: RenderSink>(&self) -> CommandHandler<S, R> {
        match self {
            NavCommand::Next => |nav, _| nav.next(),
            NavCommand::Prev => |nav, _| nav.prev(),
            NavCommand::GoTo => |nav, prompt| nav.go_to(prompt),
        }
    }
}

impl fmt::Display for NavCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub struct NavigationController<S: EventStore, R: RenderSink = NullRenderer> {
    store: S,
    renderer: R,
    params: DisplayParams,
    state: NavState,
    cache: Option<EventCache>,
    scene: Scene,
}

impl<S: EventStore> NavigationController<S, NullRenderer> {
    /// Controller without a display, in the `NoEvent` state.
    pub fn new(store: S, params: DisplayParams) -> Self {
        NavigationController::with_renderer(store, params, NullRenderer)
    }
}

impl<S: EventStore, R: RenderSink> NavigationController<S, R> {
    /// Controller drawing through `renderer`, in the `NoEvent` state.
    ///
    /// Nothing is loaded until [`start`](Self::start) or another navigation call.
    pub fn with_renderer(store: S, params: DisplayParams, renderer: R) -> Self {
        NavigationController {
            store,
            renderer,
            params,
            state: NavState::NoEvent,
            cache: None,
            scene: Scene::new(),
        }
    }

    /// Load the first event.
    pub fn start(&mut self) -> Result<NavIndex, ShowerError> {
        self.goto_event(0)
    }

    /// Display the event at navigation index `index`.
    ///
    /// Arguments
    /// -----------------
    /// * `index`: Target index. Signed so that `current - 1` from the first event is
    ///   representable and rejected instead of wrapping.
    ///
    /// Return
    /// ----------
    /// * `Ok(index)` once the cache and the scene have been replaced and presented.
    /// * `Err(ShowerError::InvalidIndex)` if `index` is outside `[0, event_count)`; the renderer
    ///   is not touched.
    /// * `Err(ShowerError::EmptyEntry)` if the store has no hits for `index`.
    /// * `Err(ShowerError::LayerOutOfRange)` if a hit lies outside the configured detector.
    ///
    /// On any error the state, cache and scene are left as they were; after an in-range
    /// failure the previous event, if any, is presented again.
    pub fn goto_event(&mut self, index: i64) -> Result<NavIndex, ShowerError> {
        let event_count = self.store.event_count();
        let nav_index = match usize::try_from(index) {
            Ok(i) if i < event_count => i,
            _ => {
                warn!(index, event_count, "Invalid event id");
                return Err(ShowerError::InvalidIndex { index, event_count });
            }
        };

        info!("Going to event {nav_index}");
        self.renderer.invalidate();

        match self.load(nav_index) {
            Ok(cache) => {
                self.scene.rebuild(&cache, &self.params);
                self.renderer.present(&cache, &self.scene);
                self.cache = Some(cache);
                self.state = NavState::EventLoaded(nav_index);
                Ok(nav_index)
            }
            Err(err) => {
                warn!(event = nav_index, %err, "navigation failed, keeping the current event");
                if let Some(previous) = &self.cache {
                    self.renderer.present(previous, &self.scene);
                }
                Err(err)
            }
        }
    }

    fn load(&self, nav_index: NavIndex) -> Result<EventCache, ShowerError> {
        let entry = self.store.get_entry(nav_index)?;
        if entry.is_empty() {
            return Err(ShowerError::EmptyEntry(nav_index));
        }
        info!(
            event = nav_index,
            hits = entry.hit_count,
            energy = entry.total_energy,
            "number of hits {}, sum energy {:.3}",
            entry.hit_count,
            entry.total_energy
        );
        EventCache::compute(nav_index, entry, &self.params)
    }

    fn current(&self) -> i64 {
        self.state.index().map_or(-1, |i| i as i64)
    }

    pub fn next(&mut self) -> Result<NavIndex, ShowerError> {
        self.goto_event(self.current() + 1)
    }

    pub fn prev(&mut self) -> Result<NavIndex, ShowerError> {
        self.goto_event(self.current() - 1)
    }

    /// Ask `prompt` for a target and navigate to it.
    pub fn go_to<P>(&mut self, prompt: &mut P) -> Result<NavIndex, ShowerError>
    where
        P: IndexPrompt + ?Sized,
    {
        let index = prompt.prompt_index().inspect_err(|err| {
            warn!(%err, "Go To cancelled");
        })?;
        self.goto_event(index)
    }

    /// Run the handler bound to `command`.
    pub fn dispatch(
        &mut self,
        command: NavCommand,
        prompt: &mut dyn IndexPrompt,
    ) -> Result<NavIndex, ShowerError> {
        let handler = command.handler::<S, R>();
        handler(self, prompt)
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn current_index(&self) -> Option<NavIndex> {
        self.state.index()
    }

    pub fn cache(&self) -> Option<&EventCache> {
        self.cache.as_ref()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn event_count(&self) -> usize {
        self.store.event_count()
    }

    pub fn params(&self) -> &DisplayParams {
        &self.params
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

#[cfg(test)]
mod navigation_test {
    use super::*;
    use crate::hits::{event_store::InMemoryEventStore, Hit};

    fn spread(layer: usize, n: usize) -> Vec<Hit> {
        let z = 0.5 + 15.0 * layer as f64;
        (0..n)
            .map(|i| Hit::new(i as f64, (i % 3) as f64, z, layer, 1.0))
            .collect()
    }

    fn store() -> InMemoryEventStore {
        let event = |n| {
            let mut hits = spread(0, n);
            hits.extend(spread(1, n));
            hits
        };
        InMemoryEventStore::new(vec![event(12), vec![], event(20)])
    }

    #[test]
    fn test_initial_state() {
        let nav = NavigationController::new(store(), DisplayParams::default());
        assert_eq!(nav.state(), NavState::NoEvent);
        assert!(nav.cache().is_none());
        assert!(nav.scene().is_empty());
        assert_eq!(nav.event_count(), 3);
    }

    #[test]
    fn test_prev_without_event() {
        let mut nav = NavigationController::new(store(), DisplayParams::default());
        assert_eq!(
            nav.prev(),
            Err(ShowerError::InvalidIndex {
                index: -2,
                event_count: 3
            })
        );
        assert_eq!(nav.next(), Ok(0));
    }

    #[test]
    fn test_empty_entry_keeps_state() {
        let mut nav = NavigationController::new(store(), DisplayParams::default());
        nav.start().unwrap();
        let before = nav.cache().cloned();
        let scene = nav.scene().clone();

        assert_eq!(nav.next(), Err(ShowerError::EmptyEntry(1)));
        assert_eq!(nav.state(), NavState::EventLoaded(0));
        assert_eq!(nav.cache().cloned(), before);
        assert_eq!(nav.scene(), &scene);

        assert_eq!(nav.goto_event(2), Ok(2));
        assert_eq!(nav.cache().unwrap().hit_count(), 40);
        assert_eq!(nav.scene().len(), 40);
    }

    #[test]
    fn test_dispatch_table() {
        let labels: Vec<_> = NavCommand::ALL.iter().map(NavCommand::label).collect();
        assert_eq!(labels, ["Next", "Prev", "Go To"]);

        let mut nav = NavigationController::new(store(), DisplayParams::default());
        let mut prompt = || -> Result<i64, ShowerError> { Ok(2) };
        assert_eq!(nav.dispatch(NavCommand::GoTo, &mut prompt), Ok(2));
        assert_eq!(
            nav.dispatch(NavCommand::Next, &mut prompt),
            Err(ShowerError::InvalidIndex {
                index: 3,
                event_count: 3
            })
        );
        // event 1 is empty
        assert!(nav.dispatch(NavCommand::Prev, &mut prompt).is_err());
        assert_eq!(nav.current_index(), Some(2));
    }
}
