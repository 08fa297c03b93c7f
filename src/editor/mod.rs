pub mod controller;
pub mod error;
pub mod machine;
pub mod notice;

pub use controller::{
    Bindings, ControllerSettings, EditorController, Gesture, GestureOutcome, HoleSeed, Modifier,
    Modifiers,
};
pub use error::{EditError, EditResult};
pub use machine::{EditSession, OUTER_RING, RingEditor};
pub use notice::{Notice, Notifier};
