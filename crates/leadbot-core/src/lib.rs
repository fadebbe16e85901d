//! Transport-independent core of the lead intake bot.
//!
//! The intake flow walks a prospective customer through five questions
//! (audience, language, goal, name, phone) and forwards a formatted lead to
//! a staff chat. Everything in this crate is free of Telegram types so the
//! flow can be driven and tested without a live bot.
//!
//! # Modules
//!
//! - [`phone`]: phone validation and normalization
//! - [`flow`]: the pure intake state machine
//! - [`session`]: the session store seam and an in-memory implementation
//! - [`lead`]: the lead record and its text layout
//! - [`gateway`]: the delivery gateway seam
//! - [`intake`]: the effect interpreter tying the above together
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use leadbot_core::{Event, Intake, InMemorySessionStore, SessionKey, Sender};
//! # use leadbot_core::{DeliveryGateway, DeliveryError, Sent};
//! # struct Noop;
//! # #[async_trait::async_trait]
//! # impl DeliveryGateway for Noop {
//! #     async fn deliver(&self, _text: &str) -> Result<Sent, DeliveryError> {
//! #         Err(DeliveryError::Unconfigured)
//! #     }
//! # }
//!
//! # async fn run() {
//! let intake = Intake::new(Arc::new(InMemorySessionStore::default()), Arc::new(Noop));
//! let key = SessionKey::new(42, 7);
//! let sender = Sender::new(7);
//! let replies = intake.handle(key, &sender, Event::Start).await;
//! assert!(!replies.is_empty());
//! # }
//! ```

pub mod error;
pub mod flow;
pub mod gateway;
pub mod intake;
pub mod lead;
pub mod menu;
pub mod phone;
pub mod prompts;
pub mod session;

pub use error::DeliveryError;
pub use flow::{advance, Effect, Event, Keyboard, Reply, Stage, Transition};
pub use gateway::{DeliveryGateway, Sent};
pub use intake::Intake;
pub use lead::{format_lead, LeadRecord, Sender, PLACEHOLDER};
pub use menu::{Audience, Choice, Language};
pub use phone::{looks_like_phone, normalize};
pub use session::{Answers, InMemorySessionStore, Session, SessionKey, SessionStore};
