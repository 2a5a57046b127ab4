pub mod context;
pub mod daglo;
pub mod question;
pub mod segment;
pub mod stt;
pub mod whisper;

pub use context::*;
pub use daglo::*;
pub use question::*;
pub use segment::*;
pub use stt::*;
pub use whisper::*;
