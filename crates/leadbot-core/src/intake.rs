//! Effect interpreter for the intake flow.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, error, info, warn};

use crate::error::DeliveryError;
use crate::flow::{advance, Effect, Event, Reply};
use crate::gateway::{DeliveryGateway, Sent};
use crate::lead::{format_lead, LeadRecord, Sender};
use crate::prompts;
use crate::session::{SessionKey, SessionStore};

/// Drives conversations through the flow: loads the session, applies the
/// transition, performs deliveries and stores the result.
///
/// Events for one key must not interleave; events for different keys may
/// run concurrently.
pub struct Intake {
    sessions: Arc<dyn SessionStore>,
    gateway: Arc<dyn DeliveryGateway>,
}

impl Intake {
    pub fn new(sessions: Arc<dyn SessionStore>, gateway: Arc<dyn DeliveryGateway>) -> Self {
        Self { sessions, gateway }
    }

    /// Handle one event and return the replies to send, in order.
    pub async fn handle(&self, key: SessionKey, sender: &Sender, event: Event) -> Vec<Reply> {
        self.handle_at(key, sender, event, Local::now().naive_local())
            .await
    }

    /// [`Intake::handle`] with an explicit submission time.
    pub async fn handle_at(
        &self,
        key: SessionKey,
        sender: &Sender,
        event: Event,
        now: NaiveDateTime,
    ) -> Vec<Reply> {
        let mut session = self.sessions.get(key).await;
        let mut pending = Some(event);
        let mut replies = Vec::new();

        while let Some(event) = pending.take() {
            let transition = advance(session, event);
            session = transition.session;

            for effect in transition.effects {
                match effect {
                    Effect::Reply(reply) => replies.push(reply),
                    Effect::Submit(answers) => {
                        let lead = LeadRecord::new(answers, sender.clone(), now);
                        let outcome = self.submit(key, &lead).await;
                        pending = Some(Event::Delivered(outcome));
                    }
                }
            }
        }

        match session {
            Some(session) => {
                debug!(chat_id = key.chat_id, user_id = key.user_id, stage = ?session.stage, "Session updated");
                self.sessions.put(key, session).await;
            }
            None => self.sessions.clear(key).await,
        }

        replies
    }

    async fn submit(&self, key: SessionKey, lead: &LeadRecord) -> Result<Sent, DeliveryError> {
        let outcome = self.gateway.deliver(&format_lead(lead)).await;
        match &outcome {
            Ok(sent) => info!(
                chat_id = key.chat_id,
                user_id = key.user_id,
                message_id = sent.message_id,
                "Lead delivered"
            ),
            Err(e) if e.is_configuration() => warn!(
                chat_id = key.chat_id,
                user_id = key.user_id,
                error = %e,
                "Lead not delivered, check ADMIN_CHAT_ID"
            ),
            Err(e) => error!(
                chat_id = key.chat_id,
                user_id = key.user_id,
                error = %e,
                "Lead delivery failed"
            ),
        }
        outcome
    }

    /// Send a test message to the destination and describe the outcome.
    pub async fn ping_destination(&self) -> String {
        let result = self.gateway.deliver(prompts::PING_TEXT).await.map(|_| ());
        if let Err(e) = &result {
            warn!(error = %e, "Destination ping failed");
        }
        prompts::ping_result(&result)
    }
}
