//! Agronomy domain: what the service asks the model and how it reads the answers.
//!
//! Every analysis follows the same path: a prompt from [`prompts`], a reply
//! parsed by [`reply`], and a fixed-shape record ([`DiseaseReport`],
//! [`SoilReport`], [`ChatReply`]) that falls back to a static value when
//! anything goes wrong.

mod chat;
mod disease;
pub mod prompts;
pub mod reply;
mod soil;
mod upload;

pub use chat::{ChatReply, DEFAULT_USER_NAME};
pub use disease::{normalize_confidence, DiseaseReport, DEFAULT_CONFIDENCE};
pub use reply::{extract_json_block, parse_reply_object, ReplyError, ReplyFields};
pub use soil::{SoilReport, DEFAULT_PH};
pub use upload::{ImageError, UploadedImage};
