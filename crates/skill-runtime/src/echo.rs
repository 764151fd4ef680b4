//! A small demo skill that repeats what the user says.

use async_trait::async_trait;
use skill_gateway::{HandlerResult, SkillHandler};
use skill_types::{
    Card, IntentRequest, LaunchRequest, RequestEnvelope, ResponseEnvelope, SessionEndedRequest,
};
use tracing::info;

pub const ECHO_INTENT: &str = "EchoIntent";
pub const PHRASE_SLOT: &str = "phrase";

const HELP_INTENT: &str = "AMAZON.HelpIntent";
const STOP_INTENT: &str = "AMAZON.StopIntent";
const CANCEL_INTENT: &str = "AMAZON.CancelIntent";

const WELCOME: &str = "Welcome to echo. Say something and I will repeat it.";
const HELP: &str = "Say a phrase, like echo hello world.";
const GOODBYE: &str = "Goodbye.";
const NOT_UNDERSTOOD: &str = "Sorry, I didn't catch that.";

/// Echo skill
#[derive(Debug, Default, Clone)]
pub struct EchoSkill;

#[async_trait]
impl SkillHandler for EchoSkill {
    async fn on_launch(
        &self,
        _envelope: &RequestEnvelope,
        _request: &LaunchRequest,
    ) -> HandlerResult {
        Ok(Some(
            ResponseEnvelope::speak(WELCOME)
                .with_reprompt(HELP)
                .end_session(false),
        ))
    }

    async fn on_intent(
        &self,
        _envelope: &RequestEnvelope,
        request: &IntentRequest,
    ) -> HandlerResult {
        let response = match request.intent.name.as_str() {
            ECHO_INTENT => match request.intent.slot_value(PHRASE_SLOT) {
                Some(phrase) => ResponseEnvelope::speak(phrase)
                    .with_card(Card::simple("Echo", phrase))
                    .end_session(false),
                None => ResponseEnvelope::speak(NOT_UNDERSTOOD)
                    .with_reprompt(HELP)
                    .end_session(false),
            },
            HELP_INTENT => ResponseEnvelope::speak(HELP)
                .with_reprompt(HELP)
                .end_session(false),
            STOP_INTENT | CANCEL_INTENT => ResponseEnvelope::speak(GOODBYE).end_session(true),
            _ => ResponseEnvelope::speak(NOT_UNDERSTOOD).end_session(false),
        };

        Ok(Some(response))
    }

    async fn on_session_ended(
        &self,
        envelope: &RequestEnvelope,
        request: &SessionEndedRequest,
    ) -> HandlerResult {
        info!(
            session_id = %envelope.session.session_id,
            reason = request.reason.as_deref().unwrap_or("unknown"),
            "Session ended"
        );
        Ok(None)
    }
}
