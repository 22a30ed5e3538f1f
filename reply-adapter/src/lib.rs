//! Conversational reply adapter.
//!
//! Turns whatever the assistant backend returns into something safe to show:
//!
//! ```text
//! AssistantReply ──► RawReply::normalize ──► round numbers ──► strip code
//!        │                                                       │
//!        └── dataframe ──► ResultTable ──► round floats ──► markdown (≤ N rows)
//!                                                                │
//!                                                         DisplayPayload
//! ```
//!
//! [`ChatService`] wires this to an [`AssistantBackend`] and the audit ledger
//! for a full chat turn.

pub mod adapter;
pub mod assistant;
pub mod chat;
pub mod reply;
pub mod rounding;
pub mod table;

pub use adapter::{DisplayPayload, ReplyFormatter, DEFAULT_DECIMAL_PLACES, DEFAULT_MAX_INLINE_ROWS};
pub use assistant::{AssistantBackend, AssistantError, AssistantReply, MockAssistant};
pub use chat::{ChatService, ChatTurn, APOLOGY_TEXT, MAX_QUESTION_CHARS};
pub use reply::{RawReply, NO_RESPONSE};
pub use rounding::round_numbers_in_text;
pub use table::{Column, ColumnData, ResultTable};
