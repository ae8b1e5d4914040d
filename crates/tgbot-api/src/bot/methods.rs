//! Outgoing Bot API methods: identity, messages, media re-sends, chat actions.

use super::configs::*;
use super::request::Params;
use super::Bot;
use tgbot_core::{
    error::BotError,
    types::{Message, User, UserProfilePhotos},
};
use tracing::debug;

impl Bot {
    /// Identity of the bot account behind the token.
    pub async fn get_me(&self) -> Result<User, BotError> {
        let me: User = self.call("getMe", &Params::new()).await?;
        debug!("getMe: {} (id {})", me.display_name(), me.id);
        Ok(me)
    }

    pub async fn send_message(&self, config: &MessageConfig) -> Result<Message, BotError> {
        self.call("sendMessage", &config.params()).await
    }

    pub async fn forward_message(&self, config: &ForwardConfig) -> Result<Message, BotError> {
        self.call("forwardMessage", &config.params()).await
    }

    pub async fn send_location(&self, config: &LocationConfig) -> Result<Message, BotError> {
        self.call("sendLocation", &config.params()).await
    }

    pub async fn send_photo(&self, config: &PhotoConfig) -> Result<Message, BotError> {
        self.call("sendPhoto", &config.params()).await
    }

    pub async fn send_audio(&self, config: &AudioConfig) -> Result<Message, BotError> {
        self.call("sendAudio", &config.params()).await
    }

    pub async fn send_document(&self, config: &DocumentConfig) -> Result<Message, BotError> {
        self.call("sendDocument", &config.params()).await
    }

    /// Show a chat action (e.g. "typing") for a few seconds.
    pub async fn send_chat_action(&self, config: &ChatActionConfig) -> Result<(), BotError> {
        self.call_raw("sendChatAction", &config.params(), self.request_timeout)
            .await?;
        Ok(())
    }

    pub async fn get_user_profile_photos(
        &self,
        config: &UserProfilePhotosConfig,
    ) -> Result<UserProfilePhotos, BotError> {
        self.call("getUserProfilePhotos", &config.params()).await
    }
}
