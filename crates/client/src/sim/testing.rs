// Test doubles for the simulation core.
//
// Scene and sink share one event log so tests can assert ordering across
// the two seams (e.g. scene cleared before the start action goes out).
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use protocol::{ClientAction, Coord};

use crate::scene::{SceneAdapter, SceneError};
use crate::sim::{ActionSink, SendError};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SceneCleared,
    CameraMoved(f32),
    FrameRendered,
    Added(Coord),
    Removed(Coord),
    Sent(ClientAction),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// A scene adapter harness plus a recording sink over a shared event log.
pub fn harness() -> (MockScene, RecordingSink, EventLog) {
    let events: EventLog = Rc::new(RefCell::new(Vec::new()));
    (
        MockScene::with_events(events.clone()),
        RecordingSink {
            events: events.clone(),
        },
        events,
    )
}

pub struct MockScene {
    events: EventLog,
    next_handle: u32,
    by_handle: HashMap<u32, Coord>,
    in_scene: HashSet<u32>,
    fail_at: HashSet<Coord>,
}

impl MockScene {
    pub fn new() -> Self {
        Self::with_events(Rc::new(RefCell::new(Vec::new())))
    }

    pub fn with_events(events: EventLog) -> Self {
        Self {
            events,
            next_handle: 0,
            by_handle: HashMap::new(),
            in_scene: HashSet::new(),
            fail_at: HashSet::new(),
        }
    }

    /// Make `create_visual` fail for this coordinate.
    pub fn fail_create_at(&mut self, coord: Coord) {
        self.fail_at.insert(coord);
    }

    /// Coordinates of everything currently in the scene.
    pub fn rendered(&self) -> Vec<Coord> {
        self.in_scene
            .iter()
            .map(|handle| self.by_handle[handle])
            .collect()
    }

    /// Total number of handles ever created (leak/duplication check).
    pub fn handles_created(&self) -> u32 {
        self.next_handle
    }
}

impl SceneAdapter for MockScene {
    type Handle = u32;

    fn create_visual(&mut self, at: Coord) -> Result<u32, SceneError> {
        if self.fail_at.contains(&at) {
            return Err(SceneError::CreateFailed {
                coord: at,
                reason: "injected failure".to_string(),
            });
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.by_handle.insert(handle, at);
        Ok(handle)
    }

    fn add_to_scene(&mut self, handle: &u32) {
        self.in_scene.insert(*handle);
        self.events
            .borrow_mut()
            .push(Event::Added(self.by_handle[handle]));
    }

    fn remove_from_scene(&mut self, handle: &u32) {
        self.in_scene.remove(handle);
        self.events
            .borrow_mut()
            .push(Event::Removed(self.by_handle[handle]));
    }

    fn clear_scene(&mut self) {
        self.in_scene.clear();
        self.events.borrow_mut().push(Event::SceneCleared);
    }

    fn position_camera(&mut self, distance: f32) {
        self.events.borrow_mut().push(Event::CameraMoved(distance));
    }

    fn render_frame(&mut self) {
        self.events.borrow_mut().push(Event::FrameRendered);
    }
}

pub struct RecordingSink {
    pub events: EventLog,
}

impl ActionSink for RecordingSink {
    fn send(&mut self, action: &ClientAction) -> Result<(), SendError> {
        self.events.borrow_mut().push(Event::Sent(action.clone()));
        Ok(())
    }
}
