//! Canvas controller: view transform, hit testing, gestures and the editing
//! session that ties the graph, history and a render target together.

pub mod geometry;
mod gesture;
mod hit;
mod scene;
mod session;
mod transform;

pub use geometry::{EdgePath, Point, Rect, Viewport};
pub use gesture::{GestureState, Key, Modifiers, PointerButton, Shortcut};
pub use hit::{hit_test, HitTarget, EDGE_HIT_TOLERANCE};
pub use scene::{
    EdgeShape, NodeShape, Notification, NotificationLevel, RenderTarget, Scene, SceneBuffer,
};
pub use session::{CanvasSession, CanvasSessionState, LoadKind, ModelInfo, SESSION_KEY};
pub use transform::Transform;
