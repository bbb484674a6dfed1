//! Game registry for automatic front-end discovery.
//!
//! Each game self-registers via [`inventory::submit!`] with a [`GameEntry`]
//! containing its CLI name, a short description, its preferred frame
//! interval and a factory function. Front-ends discover available games at
//! runtime without any central list.

use std::time::Duration;

use pixelbox_core::game::Game;

/// Describes a launchable game.
pub struct GameEntry {
    /// CLI name used to select this game (e.g., "snake").
    pub name: &'static str,
    /// One-line description for listings.
    pub description: &'static str,
    /// Frame interval the game was tuned for.
    pub frame_interval: Duration,
    /// Factory: construct a fresh game instance.
    pub create: fn() -> Box<dyn Game>,
}

impl GameEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        frame_interval: Duration,
        create: fn() -> Box<dyn Game>,
    ) -> Self {
        Self {
            name,
            description,
            frame_interval,
            create,
        }
    }
}

inventory::collect!(GameEntry);

/// Return all registered games, sorted by name.
pub fn all() -> Vec<&'static GameEntry> {
    let mut entries: Vec<_> = inventory::iter::<GameEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up a game by its CLI name.
pub fn find(name: &str) -> Option<&'static GameEntry> {
    inventory::iter::<GameEntry>
        .into_iter()
        .find(|e| e.name == name)
}
