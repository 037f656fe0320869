use crate::input::InputState;

/// Core trait a tick-driven single-player simulation implements.
///
/// The host owns the frame cadence and the input sampling; the game only
/// advances itself when asked and reports what happened.
pub trait SimulationGame {
    /// Notification produced during a tick (scoring, damage, level change).
    type Event;

    /// Called once per frame, paused or not. Returns this tick's events.
    fn tick(&mut self, input: &InputState) -> Vec<Self::Event>;

    /// Serialize the gameplay-relevant state (entities, counters, flags).
    /// Purely visual state is excluded.
    fn serialize_state(&self) -> Vec<u8>;

    /// Request a pause/resume flip. Returns whether the request was honoured.
    fn toggle_pause(&mut self) -> bool;

    fn is_paused(&self) -> bool;

    /// Whether the session has ended (defeat or victory).
    fn is_over(&self) -> bool;
}
