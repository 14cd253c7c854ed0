/// State management module
///
/// This module owns all mutable session state:
/// - Per-image crop session state machine (session.rs)
/// - Pending image queue and back-navigation history (queue.rs)
///
/// The presentation layer only reads rectangles and images to display;
/// every mutation goes through these types from the single update loop.

pub mod queue;
pub mod session;
