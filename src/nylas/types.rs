//! Nylas API type definitions
//!
//! These types mirror the API responses. Each object type also carries its
//! collection name and attribute whitelist through [`Resource`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};
use crate::nylas::resource::{BodyKind, Parent, Resource};

/// A name/address pair
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EmailAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub email: String,
}

/// An event participant
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Participant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub email: String,

    /// RSVP status (yes, no, maybe, noreply)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Event time span; which fields are set depends on `object`
/// (`time`, `timespan`, `date` or `datespan`)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct When {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// The account the access token belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// `label` or `folder`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_at: Option<i64>,
}

impl Resource for Account {
    const COLLECTION: &'static str = "account";
    const ATTRS: &'static [&'static str] = &[
        "id",
        "account_id",
        "object",
        "name",
        "email_address",
        "provider",
        "organization_unit",
        "sync_state",
        "linked_at",
    ];
    const UPDATABLE: bool = false;
}

/// A conversation thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default)]
    pub participants: Vec<EmailAddress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_message_timestamp: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_timestamp: Option<i64>,

    #[serde(default)]
    pub unread: bool,

    #[serde(default)]
    pub starred: bool,

    #[serde(default)]
    pub has_attachments: bool,

    #[serde(default)]
    pub message_ids: Vec<String>,

    #[serde(default)]
    pub draft_ids: Vec<String>,

    #[serde(default)]
    pub labels: Vec<Label>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl Resource for Thread {
    const COLLECTION: &'static str = "threads";
    const ATTRS: &'static [&'static str] = &[
        "id",
        "subject",
        "participants",
        "snippet",
        "unread",
        "starred",
        "label_ids",
        "folder_id",
        "version",
    ];
}

/// An email message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default)]
    pub from: Vec<EmailAddress>,

    #[serde(default)]
    pub to: Vec<EmailAddress>,

    #[serde(default)]
    pub cc: Vec<EmailAddress>,

    #[serde(default)]
    pub bcc: Vec<EmailAddress>,

    #[serde(default)]
    pub reply_to: Vec<EmailAddress>,

    /// Unix timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,

    #[serde(default)]
    pub unread: bool,

    #[serde(default)]
    pub starred: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default)]
    pub files: Vec<File>,

    #[serde(default)]
    pub labels: Vec<Label>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<Value>,
}

impl Resource for Message {
    const COLLECTION: &'static str = "messages";
    const ATTRS: &'static [&'static str] = &[
        "id",
        "thread_id",
        "subject",
        "from",
        "to",
        "cc",
        "bcc",
        "reply_to",
        "date",
        "unread",
        "starred",
        "snippet",
        "body",
        "files",
        "label_ids",
        "folder_id",
    ];
}

/// An unsent message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default)]
    pub to: Vec<EmailAddress>,

    #[serde(default)]
    pub cc: Vec<EmailAddress>,

    #[serde(default)]
    pub bcc: Vec<EmailAddress>,

    #[serde(default)]
    pub reply_to: Vec<EmailAddress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default)]
    pub files: Vec<File>,

    /// Required when updating or sending
    #[serde(default)]
    pub version: i64,
}

impl Resource for Draft {
    const COLLECTION: &'static str = "drafts";
    const ATTRS: &'static [&'static str] = &[
        "id",
        "thread_id",
        "subject",
        "to",
        "cc",
        "bcc",
        "reply_to",
        "reply_to_message_id",
        "body",
        "file_ids",
        "version",
    ];
}

/// A label (or folder, on folder-based providers)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Label {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Resource for Label {
    const COLLECTION: &'static str = "labels";
    const ATTRS: &'static [&'static str] = &["id", "name", "display_name"];
}

/// An uploaded file or message attachment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct File {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,

    #[serde(default)]
    pub message_ids: Vec<String>,
}

impl Resource for File {
    const COLLECTION: &'static str = "files";
    const ATTRS: &'static [&'static str] = &[
        "id",
        "filename",
        "content_type",
        "size",
        "content_id",
        "message_ids",
    ];
    const BODY: BodyKind = BodyKind::Multipart;
    const UPDATABLE: bool = false;
}

/// A contact email entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactEmail {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,

    pub email: String,
}

/// A contact phone number entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhoneNumber {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub number_type: Option<String>,

    pub number: String,
}

/// An address book contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    #[serde(default)]
    pub emails: Vec<ContactEmail>,

    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Resource for Contact {
    const COLLECTION: &'static str = "contacts";
    const ATTRS: &'static [&'static str] = &[
        "id",
        "given_name",
        "middle_name",
        "surname",
        "nickname",
        "company_name",
        "job_title",
        "emails",
        "phone_numbers",
        "notes",
    ];
}

/// A calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default)]
    pub read_only: bool,
}

impl Resource for Calendar {
    const COLLECTION: &'static str = "calendars";
    const ATTRS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "location",
        "timezone",
        "read_only",
    ];
}

/// A calendar event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default)]
    pub read_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<When>,

    #[serde(default)]
    pub busy: bool,

    #[serde(default)]
    pub participants: Vec<Participant>,

    /// RRULE set and timezone, passed through as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_event_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_start_time: Option<i64>,
}

impl Resource for Event {
    const COLLECTION: &'static str = "events";
    const ATTRS: &'static [&'static str] = &[
        "id",
        "namespace_id",
        "title",
        "description",
        "location",
        "read_only",
        "when",
        "busy",
        "participants",
        "calendar_id",
        "recurrence",
        "status",
        "master_event_id",
        "original_start_time",
    ];

    /// Events must name a calendar; a calendar's own event collection
    /// supplies it.
    fn prepare_create(data: &mut Map<String, Value>, parent: Option<&Parent>) -> Result<()> {
        if data.contains_key("calendar_id") {
            return Ok(());
        }

        match parent {
            Some(parent) if parent.collection == Calendar::COLLECTION => {
                data.insert("calendar_id".to_string(), Value::String(parent.id.clone()));
                Ok(())
            }
            _ => Err(ValidationError::MissingField {
                field: "calendar_id".to_string(),
            }
            .into()),
        }
    }
}
