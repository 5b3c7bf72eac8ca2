//! Layered error definitions
//!
//! Categorized by source: channel / topic / directory / payload / config / store / http

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Channel Errors =====
    /// Channel create error
    #[error("channel '{channel}' create error: {message}")]
    ChannelCreate { channel: String, message: String },

    /// Channel receive error
    #[error("channel '{channel}' receive error: {message}")]
    ChannelReceive { channel: String, message: String },

    /// Channel send error
    #[error("channel '{channel}' send error: {message}")]
    ChannelSend { channel: String, message: String },

    /// Channel delete (acknowledge) error
    #[error("channel '{channel}' delete error: {message}")]
    ChannelDelete { channel: String, message: String },

    // ===== Topic Errors =====
    /// Topic create error
    #[error("topic '{topic}' create error: {message}")]
    TopicCreate { topic: String, message: String },

    /// Topic publish error
    #[error("topic '{topic}' publish error: {message}")]
    TopicPublish { topic: String, message: String },

    /// Subscription listing error
    #[error("topic '{topic}' subscription listing error: {message}")]
    SubscriptionList { topic: String, message: String },

    // ===== Directory Errors =====
    /// Fleet query error
    #[error("fleet query error: {message}")]
    FleetQuery { message: String },

    // ===== Payload Errors =====
    /// Entry payload parse error
    #[error("payload parse error on channel '{channel}': {message}")]
    PayloadParse { channel: String, message: String },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Store Errors =====
    /// Row store write error
    #[error("store write error for table '{table}': {message}")]
    StoreWrite { table: String, message: String },

    // ===== HTTP Errors =====
    /// Downstream HTTP error
    #[error("http error for '{url}': {message}")]
    Http { url: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create channel create error
    pub fn channel_create(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ChannelCreate {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create channel receive error
    pub fn channel_receive(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ChannelReceive {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create channel send error
    pub fn channel_send(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ChannelSend {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create channel delete error
    pub fn channel_delete(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ChannelDelete {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create topic create error
    pub fn topic_create(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TopicCreate {
            topic: topic.into(),
            message: message.into(),
        }
    }

    /// Create topic publish error
    pub fn topic_publish(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TopicPublish {
            topic: topic.into(),
            message: message.into(),
        }
    }

    /// Create subscription listing error
    pub fn subscription_list(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SubscriptionList {
            topic: topic.into(),
            message: message.into(),
        }
    }

    /// Create fleet query error
    pub fn fleet_query(message: impl Into<String>) -> Self {
        Self::FleetQuery {
            message: message.into(),
        }
    }

    /// Create payload parse error
    pub fn payload_parse(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PayloadParse {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create row store write error
    pub fn store_write(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreWrite {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create downstream HTTP error
    pub fn http(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            message: message.into(),
        }
    }
}
