//! The intake state machine.
//!
//! [`advance`] is a pure function from the current session and one inbound
//! event to the next session and a list of effects. It never talks to the
//! transport or the staff chat; [`crate::Intake`] interprets the effects.
//!
//! ```text
//! AwaitingAudience --choice--> AwaitingLanguage --choice--> AwaitingGoal
//!     --text--> AwaitingName --text--> AwaitingPhone --valid phone--> Submit
//! ```
//!
//! `Start` from anywhere resets to `AwaitingAudience`.

use crate::error::DeliveryError;
use crate::gateway::Sent;
use crate::menu::Choice;
use crate::phone::{looks_like_phone, normalize};
use crate::prompts;
use crate::session::{Answers, Session};

/// Position in the intake flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingAudience,
    AwaitingLanguage,
    AwaitingGoal,
    AwaitingName,
    AwaitingPhone,
}

/// Something that happened in a conversation.
#[derive(Debug)]
pub enum Event {
    /// Start or restart the flow.
    Start,
    /// A menu button was pressed.
    Choice(Choice),
    /// A free text message.
    Text(String),
    /// Outcome of the delivery requested by [`Effect::Submit`].
    Delivered(Result<Sent, DeliveryError>),
}

/// Keyboard attached to a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    Audience,
    Language,
    /// The persistent start button.
    StartButton,
}

/// A message to send back into the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Reply(Reply),
    /// Build a lead from these answers and deliver it, then feed the
    /// outcome back as [`Event::Delivered`].
    Submit(Answers),
}

/// Result of one step of the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// `None` clears the stored session.
    pub session: Option<Session>,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(session: Session, effects: Vec<Effect>) -> Self {
        Self {
            session: Some(session),
            effects,
        }
    }

    fn reply(session: Option<Session>, reply: Reply) -> Self {
        Self {
            session,
            effects: vec![Effect::Reply(reply)],
        }
    }

    fn unchanged(session: Option<Session>) -> Self {
        Self {
            session,
            effects: Vec::new(),
        }
    }

    /// Replies in emission order.
    pub fn replies(&self) -> impl Iterator<Item = &Reply> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Reply(reply) => Some(reply),
            Effect::Submit(_) => None,
        })
    }
}

fn ask(stage: Stage) -> Reply {
    match stage {
        Stage::AwaitingAudience => Reply::with_keyboard(prompts::ASK_AUDIENCE, Keyboard::Audience),
        Stage::AwaitingLanguage => Reply::with_keyboard(prompts::ASK_LANGUAGE, Keyboard::Language),
        Stage::AwaitingGoal => Reply::text(prompts::ASK_GOAL),
        Stage::AwaitingName => Reply::text(prompts::ASK_NAME),
        Stage::AwaitingPhone => Reply::text(prompts::ASK_PHONE),
    }
}

/// Advance the flow by one event.
pub fn advance(session: Option<Session>, event: Event) -> Transition {
    match event {
        Event::Start => Transition::to(
            Session::new(),
            vec![
                Effect::Reply(Reply::with_keyboard(prompts::WELCOME, Keyboard::StartButton)),
                Effect::Reply(ask(Stage::AwaitingAudience)),
            ],
        ),
        Event::Choice(choice) => match session {
            Some(session) => on_choice(session, choice),
            None => Transition::unchanged(None),
        },
        Event::Text(text) => match session {
            Some(session) => on_text(session, &text),
            None => Transition::reply(
                None,
                Reply::with_keyboard(prompts::IDLE_HINT, Keyboard::StartButton),
            ),
        },
        Event::Delivered(outcome) => match session {
            Some(session) => on_delivered(session, outcome),
            None => Transition::unchanged(None),
        },
    }
}

fn on_choice(mut session: Session, choice: Choice) -> Transition {
    match (session.stage, choice) {
        (Stage::AwaitingAudience, Choice::Audience(audience)) => {
            session.answers.audience = Some(audience.label().to_string());
            session.stage = Stage::AwaitingLanguage;
        }
        (Stage::AwaitingLanguage, Choice::Language(language)) => {
            session.answers.language = Some(language.label().to_string());
            session.stage = Stage::AwaitingGoal;
        }
        // Stale button from an earlier message.
        _ => return Transition::unchanged(Some(session)),
    }
    let prompt = ask(session.stage);
    Transition::to(session, vec![Effect::Reply(prompt)])
}

fn on_text(mut session: Session, text: &str) -> Transition {
    let text = text.trim();
    match session.stage {
        Stage::AwaitingAudience | Stage::AwaitingLanguage => {
            let mut prompt = ask(session.stage);
            prompt.text = format!("{}\n{}", prompts::PICK_FROM_MENU, prompt.text);
            Transition::reply(Some(session), prompt)
        }
        Stage::AwaitingGoal => {
            session.answers.goal = Some(text.to_string());
            session.stage = Stage::AwaitingName;
            Transition::to(session, vec![Effect::Reply(ask(Stage::AwaitingName))])
        }
        Stage::AwaitingName => {
            session.answers.name = Some(text.to_string());
            session.stage = Stage::AwaitingPhone;
            Transition::to(session, vec![Effect::Reply(ask(Stage::AwaitingPhone))])
        }
        Stage::AwaitingPhone => {
            if !looks_like_phone(text) {
                return Transition::reply(Some(session), Reply::text(prompts::PHONE_RETRY));
            }
            session.answers.phone = Some(normalize(text));
            let answers = session.answers.clone();
            Transition::to(session, vec![Effect::Submit(answers)])
        }
    }
}

fn on_delivered(mut session: Session, outcome: Result<Sent, DeliveryError>) -> Transition {
    if session.stage != Stage::AwaitingPhone {
        return Transition::unchanged(Some(session));
    }
    let Some(phone) = session.answers.phone.take() else {
        return Transition::unchanged(Some(session));
    };

    match outcome {
        Ok(_) => Transition::reply(
            None,
            Reply::with_keyboard(prompts::confirmation(&phone), Keyboard::StartButton),
        ),
        // Answers stay so resending the phone retries delivery.
        Err(e) => Transition::reply(Some(session), Reply::text(prompts::delivery_failed(&e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{Audience, Language};

    fn at_stage(stage: Stage) -> Session {
        let mut session = Session::new();
        session.stage = stage;
        session
    }

    fn run(session: Option<Session>, events: Vec<Event>) -> Transition {
        let mut transition = Transition::unchanged(session);
        for event in events {
            transition = advance(transition.session, event);
        }
        transition
    }

    #[test]
    fn test_start_from_nothing() {
        let t = advance(None, Event::Start);

        assert_eq!(t.session, Some(Session::new()));
        let replies: Vec<_> = t.replies().collect();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].keyboard, Some(Keyboard::StartButton));
        assert_eq!(replies[1].keyboard, Some(Keyboard::Audience));
    }

    #[test]
    fn test_linear_walk_to_submit() {
        let t = run(
            None,
            vec![
                Event::Start,
                Event::Choice(Choice::Audience(Audience::Adult)),
                Event::Choice(Choice::Language(Language::English)),
                Event::Text("  travel ".to_string()),
                Event::Text("Anna".to_string()),
                Event::Text("8 999 123 45 67".to_string()),
            ],
        );

        let expected = Answers {
            audience: Some(Audience::Adult.label().to_string()),
            language: Some("English".to_string()),
            goal: Some("travel".to_string()),
            name: Some("Anna".to_string()),
            phone: Some("+79991234567".to_string()),
        };
        assert_eq!(t.effects, vec![Effect::Submit(expected)]);
        assert_eq!(t.session.map(|s| s.stage), Some(Stage::AwaitingPhone));
    }

    #[test]
    fn test_each_step_prompts_next_question() {
        let t = advance(
            Some(at_stage(Stage::AwaitingAudience)),
            Event::Choice(Choice::Audience(Audience::Minor)),
        );
        assert_eq!(t.replies().next().and_then(|r| r.keyboard), Some(Keyboard::Language));

        let t = advance(
            Some(at_stage(Stage::AwaitingLanguage)),
            Event::Choice(Choice::Language(Language::Italian)),
        );
        assert_eq!(t.replies().next().map(|r| r.text.as_str()), Some(prompts::ASK_GOAL));

        let t = advance(Some(at_stage(Stage::AwaitingGoal)), Event::Text(String::new()));
        let session = t.session.clone().unwrap();
        assert_eq!(session.answers.goal.as_deref(), Some(""));
        assert_eq!(session.stage, Stage::AwaitingName);
    }

    #[test]
    fn test_invalid_phone_self_loops() {
        let mut session = at_stage(Stage::AwaitingPhone);
        session.answers.name = Some("Anna".to_string());

        let t = advance(Some(session.clone()), Event::Text("abc".to_string()));

        assert_eq!(t.session, Some(session));
        assert_eq!(
            t.effects,
            vec![Effect::Reply(Reply::text(prompts::PHONE_RETRY))]
        );
    }

    #[test]
    fn test_stale_choice_is_ignored() {
        let session = at_stage(Stage::AwaitingGoal);
        let t = advance(
            Some(session.clone()),
            Event::Choice(Choice::Audience(Audience::Adult)),
        );
        assert_eq!(t.session, Some(session));
        assert!(t.effects.is_empty());

        let t = advance(None, Event::Choice(Choice::Language(Language::French)));
        assert!(t.session.is_none());
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_text_instead_of_choice_repeats_menu() {
        let session = at_stage(Stage::AwaitingLanguage);
        let t = advance(Some(session.clone()), Event::Text("English".to_string()));

        assert_eq!(t.session, Some(session));
        let reply = t.replies().next().unwrap();
        assert_eq!(reply.keyboard, Some(Keyboard::Language));
        assert!(reply.text.starts_with(prompts::PICK_FROM_MENU));
    }

    #[test]
    fn test_text_without_session_hints_start() {
        let t = advance(None, Event::Text("hello".to_string()));
        assert!(t.session.is_none());
        assert_eq!(
            t.replies().next().and_then(|r| r.keyboard),
            Some(Keyboard::StartButton)
        );
    }

    #[test]
    fn test_start_mid_flow_discards_answers() {
        let t = run(
            None,
            vec![
                Event::Start,
                Event::Choice(Choice::Audience(Audience::Adult)),
                Event::Choice(Choice::Language(Language::Spanish)),
                Event::Start,
            ],
        );
        assert_eq!(t.session, Some(Session::new()));
    }

    fn submitted() -> Session {
        let mut session = at_stage(Stage::AwaitingPhone);
        session.answers.name = Some("Anna".to_string());
        session.answers.phone = Some("+79991234567".to_string());
        session
    }

    #[test]
    fn test_delivery_success_clears_session() {
        let t = advance(
            Some(submitted()),
            Event::Delivered(Ok(Sent { message_id: 10 })),
        );

        assert!(t.session.is_none());
        let reply = t.replies().next().unwrap();
        assert!(reply.text.contains("+79991234567"));
        assert_eq!(reply.keyboard, Some(Keyboard::StartButton));
    }

    #[test]
    fn test_delivery_failure_keeps_answers_without_phone() {
        let t = advance(
            Some(submitted()),
            Event::Delivered(Err(DeliveryError::Unconfigured)),
        );

        let session = t.session.clone().unwrap();
        assert_eq!(session.stage, Stage::AwaitingPhone);
        assert_eq!(session.answers.name.as_deref(), Some("Anna"));
        assert!(session.answers.phone.is_none());
        assert_eq!(
            t.replies().next().map(|r| r.text.clone()),
            Some(prompts::delivery_failed(&DeliveryError::Unconfigured))
        );
    }

    #[test]
    fn test_delivery_outcome_without_submission_is_ignored() {
        let session = at_stage(Stage::AwaitingName);
        let t = advance(
            Some(session.clone()),
            Event::Delivered(Ok(Sent { message_id: 1 })),
        );
        assert_eq!(t.session, Some(session));
        assert!(t.effects.is_empty());
    }
}
