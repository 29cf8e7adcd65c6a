//! Telegram channel — posts to the configured channel via the Bot API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use vitrina_core::config::TelegramConfig;
use vitrina_core::error::{Result, VitrinaError};
use vitrina_core::traits::Publisher;
use vitrina_core::types::LinkAction;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Telegram Bot API publisher bound to one channel.
pub struct TelegramChannel {
    bot_token: String,
    channel_id: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    /// Build from config. The bot token falls back to the
    /// TELEGRAM_BOT_TOKEN env var when the config field is empty.
    pub fn from_config(config: &TelegramConfig) -> Result<Self> {
        let bot_token = if !config.bot_token.is_empty() {
            config.bot_token.clone()
        } else {
            std::env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default()
        };
        if bot_token.is_empty() {
            return Err(VitrinaError::Config("no Telegram bot token configured".into()));
        }
        if config.channel_id.is_empty() {
            return Err(VitrinaError::Config("no Telegram channel id configured".into()));
        }
        Ok(Self {
            bot_token,
            channel_id: config.channel_id.clone(),
            client: reqwest::Client::new(),
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{method}", self.bot_token)
    }

    async fn call(&self, method: &str, body: &Value) -> Result<()> {
        let response = self
            .client
            .post(self.api_url(method))
            .json(body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| VitrinaError::Channel(format!("{method} failed: {e}")))?;

        let body: TelegramApiResponse<Value> = response
            .json()
            .await
            .map_err(|e| VitrinaError::Channel(format!("invalid {method} response: {e}")))?;

        if !body.ok {
            return Err(VitrinaError::Channel(format!(
                "{method} error: {}",
                body.description.unwrap_or_default()
            )));
        }
        tracing::debug!("{method} ok");
        Ok(())
    }

    /// Verify the token and fetch the bot identity.
    pub async fn get_me(&self) -> Result<TelegramUser> {
        let response = self
            .client
            .get(self.api_url("getMe"))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| VitrinaError::Channel(format!("getMe failed: {e}")))?;
        let body: TelegramApiResponse<TelegramUser> = response
            .json()
            .await
            .map_err(|e| VitrinaError::Channel(format!("invalid getMe response: {e}")))?;
        body.result
            .ok_or_else(|| VitrinaError::Channel("no bot info".into()))
    }
}

#[async_trait]
impl Publisher for TelegramChannel {
    async fn post_media_group(&self, image_urls: &[String], caption: Option<&str>) -> Result<()> {
        let body = json!({
            "chat_id": self.channel_id,
            "media": media_items(image_urls, caption),
        });
        self.call("sendMediaGroup", &body).await
    }

    async fn post_message(&self, text: &str, action: Option<&LinkAction>) -> Result<()> {
        self.call("sendMessage", &message_body(&self.channel_id, text, action))
            .await
    }
}

/// Photo items for sendMediaGroup. Telegram fetches each URL itself; the
/// caption rides on the first item only.
fn media_items(image_urls: &[String], caption: Option<&str>) -> Vec<Value> {
    image_urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            let mut item = json!({ "type": "photo", "media": url });
            if i == 0 {
                if let Some(caption) = caption {
                    item["caption"] = json!(caption);
                    item["parse_mode"] = json!("Markdown");
                }
            }
            item
        })
        .collect()
}

fn message_body(chat_id: &str, text: &str, action: Option<&LinkAction>) -> Value {
    let mut body = json!({
        "chat_id": chat_id,
        "text": text,
        "parse_mode": "Markdown",
    });
    if let Some(action) = action {
        body["reply_markup"] = json!({
            "inline_keyboard": [[{ "text": action.label, "url": action.url }]],
        });
    }
    body
}

// --- Telegram API types ---

#[derive(Debug, Deserialize)]
pub struct TelegramApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_lands_on_the_first_media_item_only() {
        let urls = vec!["http://cdn/1.jpg".to_string(), "http://cdn/2.jpg".to_string()];
        let items = media_items(&urls, Some("*Рюкзак*"));

        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["caption"], "*Рюкзак*");
        assert_eq!(items[0]["parse_mode"], "Markdown");
        assert_eq!(items[1].get("caption"), None);
        assert_eq!(items[1]["media"], "http://cdn/2.jpg");
    }

    #[test]
    fn uncaptioned_media_items_stay_bare() {
        let urls = vec!["http://cdn/1.jpg".to_string()];
        let items = media_items(&urls, None);
        assert_eq!(items[0].get("caption"), None);
    }

    #[test]
    fn button_message_carries_an_inline_url_keyboard() {
        let action = LinkAction {
            label: "Замовити зараз".into(),
            url: "https://shop.example/order".into(),
        };
        let body = message_body("@showcase", "text", Some(&action));
        assert_eq!(
            body["reply_markup"]["inline_keyboard"][0][0]["url"],
            "https://shop.example/order"
        );

        let plain = message_body("@showcase", "text", None);
        assert_eq!(plain.get("reply_markup"), None);
    }
}
