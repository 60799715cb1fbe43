use crate::error::model_error::ModelError;
use crate::event::{EventType, Host};
use crate::ErrorLocation;

use std::panic::Location;

pub const DEFAULT_MEDIA_FOLDER: &str = "Event_Management/Event";

/// A file attached to a multipart request.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

// Byte payloads are elided so uploads can be logged.
impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Fields submitted when creating or updating an event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub start_at: String,
    pub end_at: String,
    pub contact_info: String,
    pub venue: Option<String>,
    pub join_link: Option<String>,
    pub hosts: Vec<Host>,
    /// `Some` only when the event has limited seats.
    pub total_seats: Option<u32>,
    pub folder: String,
    pub thumbnail: Option<Upload>,
    pub media: Vec<Upload>,
}

/// Builder for [`EventForm`].
///
/// Checks that every field the backend requires is present; content rules
/// (lengths, URL shapes, date ordering) are left to the backend.
#[derive(Debug, Default)]
pub struct EventFormBuilder {
    title: Option<String>,
    description: Option<String>,
    event_type: Option<EventType>,
    start_at: Option<String>,
    end_at: Option<String>,
    contact_info: Option<String>,
    venue: Option<String>,
    join_link: Option<String>,
    hosts: Vec<Host>,
    total_seats: Option<u32>,
    folder: Option<String>,
    thumbnail: Option<Upload>,
    media: Vec<Upload>,
}

impl EventFormBuilder {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn with_schedule(mut self, start_at: impl Into<String>, end_at: impl Into<String>) -> Self {
        self.start_at = Some(start_at.into());
        self.end_at = Some(end_at.into());
        self
    }

    pub fn with_contact_info(mut self, contact: impl Into<String>) -> Self {
        self.contact_info = Some(contact.into());
        self
    }

    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    pub fn with_join_link(mut self, link: impl Into<String>) -> Self {
        self.join_link = Some(link.into());
        self
    }

    pub fn with_host(mut self, host: Host) -> Self {
        self.hosts.push(host);
        self
    }

    pub fn with_total_seats(mut self, seats: u32) -> Self {
        self.total_seats = Some(seats);
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: Upload) -> Self {
        self.thumbnail = Some(thumbnail);
        self
    }

    pub fn with_media(mut self, media: Upload) -> Self {
        self.media.push(media);
        self
    }

    #[track_caller]
    pub fn build(self) -> Result<EventForm, ModelError> {
        let title = required(self.title, "Title")?;
        let description = required(self.description, "Description")?;
        let event_type = self.event_type.ok_or_else(|| ModelError::Validation {
            message: String::from("Type is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;
        let start_at = required(self.start_at, "Start date")?;
        let end_at = required(self.end_at, "End date")?;
        let contact_info = required(self.contact_info, "Contact info")?;

        Ok(EventForm {
            title,
            description,
            event_type,
            start_at,
            end_at,
            contact_info,
            venue: self.venue.filter(|v| !v.is_empty()),
            join_link: self.join_link.filter(|l| !l.is_empty()),
            hosts: self.hosts,
            total_seats: self.total_seats,
            folder: self
                .folder
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| DEFAULT_MEDIA_FOLDER.to_string()),
            thumbnail: self.thumbnail,
            media: self.media,
        })
    }
}

#[track_caller]
fn required(value: Option<String>, field: &str) -> Result<String, ModelError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ModelError::Validation {
            message: format!("{field} is required"),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
