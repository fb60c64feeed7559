//! Adapters for the deprecated key/value hook shapes.
//!
//! Two legacy hook forms (dictionary-keyed server input and post-render
//! notifications) remain dispatchable. Each is produced on demand from
//! the canonical structured event by a pure function here, lossless for
//! the attributes it covers. JSON values carry the arrays and numbers
//! that a flat string map could not.

use serde_json::{json, Map, Value};

use crate::ext::events::{PostedMessage, ServerInputEvent};

/// The deprecated key/value attribute shape.
pub type LegacyAttributes = Map<String, Value>;

// Sender attribute keys for the legacy server-input form.
pub const SENDER_IS_SERVER: &str = "senderIsServer";
pub const SENDER_HOSTMASK: &str = "senderHostmask";
pub const SENDER_NICKNAME: &str = "senderNickname";
pub const SENDER_USERNAME: &str = "senderUsername";
pub const SENDER_ADDRESS: &str = "senderAddress";

// Message attribute keys for the legacy server-input form.
pub const MESSAGE_RECEIVED_AT: &str = "messageReceivedAtTime";
pub const MESSAGE_PARAMS: &str = "messageParamaters";
pub const MESSAGE_COMMAND: &str = "messageCommand";
pub const MESSAGE_NUMERIC: &str = "messageNumericReply";
pub const MESSAGE_SEQUENCE: &str = "messageSequence";
pub const MESSAGE_NETWORK_ADDRESS: &str = "messageNetworkAddress";
pub const MESSAGE_NETWORK_NAME: &str = "messageNetworkName";

// Attribute keys for the legacy post-render form.
pub const POST_LINE_NUMBER: &str = "lineNumber";
pub const POST_SENDER_NICKNAME: &str = "senderNickname";
pub const POST_LINE_TYPE: &str = "lineType";
pub const POST_MEMBER_TYPE: &str = "memberType";
pub const POST_RECEIVED_AT: &str = "receivedAtTime";
pub const POST_HYPERLINKS: &str = "listOfHyperlinks";
pub const POST_USERS: &str = "listOfUsers";
pub const POST_BODY: &str = "messageBody";
pub const POST_KEYWORD_MATCH: &str = "keywordMatchFound";

/// Produce the legacy (sender, message) attribute pair for a server
/// input event.
pub fn server_input_attributes(
    event: &ServerInputEvent,
) -> (LegacyAttributes, LegacyAttributes) {
    let mut sender = Map::new();
    sender.insert(SENDER_IS_SERVER.into(), json!(event.sender.is_server));
    sender.insert(SENDER_HOSTMASK.into(), json!(event.sender.hostmask()));
    sender.insert(SENDER_NICKNAME.into(), json!(event.sender.nickname));
    sender.insert(SENDER_USERNAME.into(), json!(event.sender.username));
    sender.insert(SENDER_ADDRESS.into(), json!(event.sender.address));

    let mut message = Map::new();
    message.insert(
        MESSAGE_RECEIVED_AT.into(),
        json!(event.received_at.timestamp_millis()),
    );
    message.insert(MESSAGE_PARAMS.into(), json!(event.params));
    message.insert(MESSAGE_COMMAND.into(), json!(event.command));
    message.insert(MESSAGE_NUMERIC.into(), json!(event.numeric.unwrap_or(0)));
    message.insert(MESSAGE_SEQUENCE.into(), json!(event.sequence));
    message.insert(
        MESSAGE_NETWORK_ADDRESS.into(),
        json!(event.network_address),
    );
    message.insert(MESSAGE_NETWORK_NAME.into(), json!(event.network_name));

    (sender, message)
}

/// Produce the legacy attribute map for a posted message.
pub fn posted_message_attributes(event: &PostedMessage) -> LegacyAttributes {
    let hyperlinks: Vec<Value> = event
        .hyperlinks
        .iter()
        .map(|(range, url)| json!([[range.start, range.end], url]))
        .collect();

    let mut attributes = Map::new();
    attributes.insert(POST_LINE_NUMBER.into(), json!(event.line_number));
    attributes.insert(POST_SENDER_NICKNAME.into(), json!(event.sender_nickname));
    attributes.insert(POST_LINE_TYPE.into(), json!(event.line_type.as_str()));
    attributes.insert(POST_MEMBER_TYPE.into(), json!(event.member_type.as_str()));
    attributes.insert(
        POST_RECEIVED_AT.into(),
        json!(event.received_at.timestamp_millis()),
    );
    attributes.insert(POST_HYPERLINKS.into(), Value::Array(hyperlinks));
    attributes.insert(POST_USERS.into(), json!(event.mentioned_users));
    attributes.insert(POST_BODY.into(), json!(event.contents));
    attributes.insert(POST_KEYWORD_MATCH.into(), json!(event.keyword_match));
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ext::events::{LineType, MemberType, Sender};
    use chrono::DateTime;

    fn server_event() -> ServerInputEvent {
        ServerInputEvent {
            sender: Sender {
                nickname: "alice".into(),
                username: "ali".into(),
                address: "host.example.net".into(),
                is_server: false,
            },
            received_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            command: "301".into(),
            numeric: Some(301),
            params: vec!["me".into(), "alice".into(), "gone fishing".into()],
            sequence: ":alice!ali@host.example.net 301 me alice :gone fishing".into(),
            network_name: "ExampleNet".into(),
            network_address: "irc.example.net".into(),
        }
    }

    #[test]
    fn server_input_translation_is_lossless_for_covered_attributes() {
        let event = server_event();
        let (sender, message) = server_input_attributes(&event);

        assert_eq!(sender[SENDER_NICKNAME], json!("alice"));
        assert_eq!(sender[SENDER_IS_SERVER], json!(false));
        assert_eq!(
            sender[SENDER_HOSTMASK],
            json!("alice!ali@host.example.net")
        );

        assert_eq!(message[MESSAGE_COMMAND], json!("301"));
        assert_eq!(message[MESSAGE_NUMERIC], json!(301));
        // Params survive as an array, spaces intact.
        assert_eq!(
            message[MESSAGE_PARAMS],
            json!(["me", "alice", "gone fishing"])
        );
        assert_eq!(
            message[MESSAGE_RECEIVED_AT],
            json!(1_700_000_000_000i64)
        );
        assert_eq!(message[MESSAGE_NETWORK_NAME], json!("ExampleNet"));
    }

    #[test]
    fn posted_message_translation_covers_hyperlink_ranges() {
        let event = PostedMessage {
            line_number: "line-42".into(),
            contents: "see www.example.com now".into(),
            sender_nickname: "bob".into(),
            line_type: LineType::Privmsg,
            member_type: MemberType::Normal,
            received_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            hyperlinks: vec![(4..19, "http://www.example.com".into())],
            mentioned_users: vec!["alice".into()],
            keyword_match: true,
            is_bulk: false,
        };

        let attributes = posted_message_attributes(&event);
        assert_eq!(attributes[POST_LINE_NUMBER], json!("line-42"));
        assert_eq!(attributes[POST_LINE_TYPE], json!("privmsg"));
        assert_eq!(
            attributes[POST_HYPERLINKS],
            json!([[[4, 19], "http://www.example.com"]])
        );
        assert_eq!(attributes[POST_USERS], json!(["alice"]));
        assert_eq!(attributes[POST_KEYWORD_MATCH], json!(true));
    }
}
