pub mod call_log;
pub mod mock_media;
pub mod paired_signaling;

pub use call_log::{Call, CallLog};
pub use mock_connection::{GATHERED, MockConnection};
pub use mock_media::{MockCamera, file_playback, selector, synthetic};
pub use mock_signaling::MockSignaling;
pub use paired_signaling::PairedSignaling;
