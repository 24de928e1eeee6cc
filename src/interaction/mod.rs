pub mod config;
pub mod event;
pub mod gesture;
pub mod layer;

pub use config::InteractionConfig;
pub use event::{Modifiers, PointerButton, PointerEvent};
pub use gesture::{GestureRecognizer, GestureState, PendingDragSelection};
pub use layer::{DragIntent, InteractionLayer, SelectionRect, TimelineAction};
