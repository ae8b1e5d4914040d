//! Typed parameters for the outgoing Bot API methods.
//!
//! Optional numeric fields use 0 for "not set" and are left out of the
//! request, matching how the Bot API treats missing parameters.

use super::request::Params;
use serde_json::Value;

/// Text formatting mode for `sendMessage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Markdown,
    MarkdownV2,
    Html,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "Markdown",
            Self::MarkdownV2 => "MarkdownV2",
            Self::Html => "HTML",
        }
    }
}

/// Status shown to the user while the bot prepares a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    Typing,
    UploadPhoto,
    RecordVideo,
    UploadVideo,
    RecordAudio,
    UploadAudio,
    UploadDocument,
    FindLocation,
}

impl ChatAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::UploadPhoto => "upload_photo",
            Self::RecordVideo => "record_video",
            Self::UploadVideo => "upload_video",
            Self::RecordAudio => "record_audio",
            Self::UploadAudio => "upload_audio",
            Self::UploadDocument => "upload_document",
            Self::FindLocation => "find_location",
        }
    }
}

fn push_reply(params: &mut Params, reply_to_message_id: i64, reply_markup: Option<&Value>) {
    if reply_to_message_id != 0 {
        params.push(("reply_to_message_id", reply_to_message_id.to_string()));
    }
    if let Some(markup) = reply_markup {
        params.push(("reply_markup", markup.to_string()));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageConfig {
    pub chat_id: i64,
    pub text: String,
    pub disable_web_page_preview: bool,
    pub reply_to_message_id: i64,
    pub parse_mode: Option<ParseMode>,
    pub reply_markup: Option<Value>,
}

impl MessageConfig {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            disable_web_page_preview: false,
            reply_to_message_id: 0,
            parse_mode: None,
            reply_markup: None,
        }
    }

    pub fn reply_to(mut self, message_id: i64) -> Self {
        self.reply_to_message_id = message_id;
        self
    }

    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    pub(crate) fn params(&self) -> Params {
        let mut params = vec![
            ("chat_id", self.chat_id.to_string()),
            ("text", self.text.clone()),
            (
                "disable_web_page_preview",
                self.disable_web_page_preview.to_string(),
            ),
        ];
        if let Some(mode) = self.parse_mode {
            params.push(("parse_mode", mode.as_str().to_string()));
        }
        push_reply(&mut params, self.reply_to_message_id, self.reply_markup.as_ref());
        params
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardConfig {
    pub chat_id: i64,
    pub from_chat_id: i64,
    pub message_id: i64,
}

impl ForwardConfig {
    pub fn new(chat_id: i64, from_chat_id: i64, message_id: i64) -> Self {
        Self {
            chat_id,
            from_chat_id,
            message_id,
        }
    }

    pub(crate) fn params(&self) -> Params {
        vec![
            ("chat_id", self.chat_id.to_string()),
            ("from_chat_id", self.from_chat_id.to_string()),
            ("message_id", self.message_id.to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationConfig {
    pub chat_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub reply_to_message_id: i64,
    pub reply_markup: Option<Value>,
}

impl LocationConfig {
    pub fn new(chat_id: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            chat_id,
            latitude,
            longitude,
            reply_to_message_id: 0,
            reply_markup: None,
        }
    }

    pub(crate) fn params(&self) -> Params {
        let mut params = vec![
            ("chat_id", self.chat_id.to_string()),
            ("latitude", format!("{:.6}", self.latitude)),
            ("longitude", format!("{:.6}", self.longitude)),
        ];
        push_reply(&mut params, self.reply_to_message_id, self.reply_markup.as_ref());
        params
    }
}

/// Re-send a photo already stored on Telegram servers.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoConfig {
    pub chat_id: i64,
    pub file_id: String,
    pub caption: String,
    pub reply_to_message_id: i64,
    pub reply_markup: Option<Value>,
}

impl PhotoConfig {
    pub fn new(chat_id: i64, file_id: impl Into<String>) -> Self {
        Self {
            chat_id,
            file_id: file_id.into(),
            caption: String::new(),
            reply_to_message_id: 0,
            reply_markup: None,
        }
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub(crate) fn params(&self) -> Params {
        let mut params = vec![
            ("chat_id", self.chat_id.to_string()),
            ("photo", self.file_id.clone()),
        ];
        if !self.caption.is_empty() {
            params.push(("caption", self.caption.clone()));
        }
        push_reply(&mut params, self.reply_to_message_id, self.reply_markup.as_ref());
        params
    }
}

/// Re-send an audio file already stored on Telegram servers.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioConfig {
    pub chat_id: i64,
    pub file_id: String,
    pub reply_to_message_id: i64,
    pub reply_markup: Option<Value>,
}

impl AudioConfig {
    pub fn new(chat_id: i64, file_id: impl Into<String>) -> Self {
        Self {
            chat_id,
            file_id: file_id.into(),
            reply_to_message_id: 0,
            reply_markup: None,
        }
    }

    pub(crate) fn params(&self) -> Params {
        let mut params = vec![
            ("chat_id", self.chat_id.to_string()),
            ("audio", self.file_id.clone()),
        ];
        push_reply(&mut params, self.reply_to_message_id, self.reply_markup.as_ref());
        params
    }
}

/// Re-send a document already stored on Telegram servers.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentConfig {
    pub chat_id: i64,
    pub file_id: String,
    pub reply_to_message_id: i64,
    pub reply_markup: Option<Value>,
}

impl DocumentConfig {
    pub fn new(chat_id: i64, file_id: impl Into<String>) -> Self {
        Self {
            chat_id,
            file_id: file_id.into(),
            reply_to_message_id: 0,
            reply_markup: None,
        }
    }

    pub(crate) fn params(&self) -> Params {
        let mut params = vec![
            ("chat_id", self.chat_id.to_string()),
            ("document", self.file_id.clone()),
        ];
        push_reply(&mut params, self.reply_to_message_id, self.reply_markup.as_ref());
        params
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatActionConfig {
    pub chat_id: i64,
    pub action: ChatAction,
}

impl ChatActionConfig {
    pub fn new(chat_id: i64, action: ChatAction) -> Self {
        Self { chat_id, action }
    }

    pub(crate) fn params(&self) -> Params {
        vec![
            ("chat_id", self.chat_id.to_string()),
            ("action", self.action.as_str().to_string()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserProfilePhotosConfig {
    pub user_id: i64,
    pub offset: i64,
    pub limit: u32,
}

impl UserProfilePhotosConfig {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            offset: 0,
            limit: 0,
        }
    }

    pub(crate) fn params(&self) -> Params {
        let mut params = vec![("user_id", self.user_id.to_string())];
        if self.offset != 0 {
            params.push(("offset", self.offset.to_string()));
        }
        if self.limit != 0 {
            params.push(("limit", self.limit.to_string()));
        }
        params
    }
}
