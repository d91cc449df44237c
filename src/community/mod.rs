//! Meetings and the member feed

pub mod meetings;
pub mod posts;

pub use meetings::{MeetingBoard, NewMeeting};
pub use posts::{Feed, NewPost};
