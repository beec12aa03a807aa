//! Named steps run by the event write path.
//!
//! Creates and updates both go through [`run`], which applies, in order:
//!
//! 1. [`validate_fields`]: trim and require descriptive fields, parse the mode
//!    and check the tag and agenda lists.
//! 2. [`assign_slug`]: derive and probe a unique slug when the title changed
//!    or no slug exists yet.
//! 3. [`normalize_date`]: canonicalize the date when it changed.
//! 4. [`normalize_time`]: validate the time when it changed.
//!
//! A create treats every field as modified. An update treats a field as
//! modified only when the patch sets it to something other than the stored
//! value, so untouched slugs, dates and times are carried over unchanged.

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, error};

use crate::domain::ports::{EventRepository, EventRepositoryError};
use crate::domain::{
    Error, Event, EventDate, EventDraft, EventId, EventMode, EventPatch, EventTime, Slug,
    UnknownEventMode,
};

/// Field values for one write. `None` means the write leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventWrite {
    pub fields: EventPatch,
}

impl From<EventDraft> for EventWrite {
    fn from(draft: EventDraft) -> Self {
        Self {
            fields: EventPatch {
                title: Some(draft.title),
                description: Some(draft.description),
                overview: Some(draft.overview),
                venue: Some(draft.venue),
                location: Some(draft.location),
                date: Some(draft.date),
                time: Some(draft.time),
                mode: Some(draft.mode),
                audience: Some(draft.audience),
                agenda: Some(draft.agenda),
                organizer: Some(draft.organizer),
                tags: Some(draft.tags),
            },
        }
    }
}

impl From<EventPatch> for EventWrite {
    fn from(fields: EventPatch) -> Self {
        Self { fields }
    }
}

/// Which derived fields the current write touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangedFields {
    pub title: bool,
    pub date: bool,
    pub time: bool,
}

impl ChangedFields {
    /// Every field counts as modified.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            title: true,
            date: true,
            time: true,
        }
    }
}

/// Descriptive fields after trimming and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub venue: String,
    pub location: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

/// Identity and audit data the pipeline cannot derive from the fields.
#[derive(Debug, Clone, Copy)]
pub struct WriteContext<'a> {
    /// Stored event for updates, `None` for creates.
    pub existing: Option<&'a Event>,
    /// Identifier assigned to a new event; ignored for updates.
    pub new_id: EventId,
    /// Current time from the injected clock.
    pub now: DateTime<Utc>,
    /// First suffix the slug probe may use. Raised after a storage conflict.
    pub min_suffix: u32,
}

/// Result of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedEvent {
    pub event: Event,
    /// Suffix chosen by the slug probe, `None` when the slug was kept.
    pub slug_suffix: Option<u32>,
}

/// Run every step and assemble the event to store.
///
/// `image` replaces the stored banner URL when supplied.
pub async fn run<R>(
    repo: &R,
    write: &EventWrite,
    image: Option<String>,
    ctx: WriteContext<'_>,
) -> Result<PreparedEvent, Error>
where
    R: EventRepository + ?Sized,
{
    let (fields, changed) = validate_fields(&write.fields, ctx.existing)?;
    let (slug, slug_suffix) = assign_slug(repo, &fields.title, &changed, ctx).await?;
    let date = normalize_date(write.fields.date.as_deref(), ctx.existing, changed.date)?;
    let time = normalize_time(write.fields.time.as_deref(), ctx.existing, changed.time)?;

    let (id, image, created_at) = match ctx.existing {
        Some(existing) => (
            existing.id,
            image.unwrap_or_else(|| existing.image.clone()),
            existing.created_at,
        ),
        None => {
            let image =
                image.ok_or_else(|| field_error("image", "required", "Image is required"))?;
            (ctx.new_id, image, ctx.now)
        }
    };

    Ok(PreparedEvent {
        event: Event {
            id,
            slug,
            title: fields.title,
            description: fields.description,
            overview: fields.overview,
            image,
            venue: fields.venue,
            location: fields.location,
            date,
            time,
            mode: fields.mode,
            audience: fields.audience,
            agenda: fields.agenda,
            organizer: fields.organizer,
            tags: fields.tags,
            created_at,
            updated_at: ctx.now,
        },
        slug_suffix,
    })
}

/// Step 1: trim and check descriptive fields.
///
/// Unset fields fall back to the stored event. A field missing from both is
/// reported as required.
pub fn validate_fields(
    patch: &EventPatch,
    existing: Option<&Event>,
) -> Result<(ValidatedFields, ChangedFields), Error> {
    let title = required_text(
        "title",
        "Title",
        patch.title.as_deref(),
        existing.map(|e| e.title.as_str()),
    )?;
    let fields = ValidatedFields {
        description: required_text(
            "description",
            "Description",
            patch.description.as_deref(),
            existing.map(|e| e.description.as_str()),
        )?,
        overview: required_text(
            "overview",
            "Overview",
            patch.overview.as_deref(),
            existing.map(|e| e.overview.as_str()),
        )?,
        venue: required_text(
            "venue",
            "Venue",
            patch.venue.as_deref(),
            existing.map(|e| e.venue.as_str()),
        )?,
        location: required_text(
            "location",
            "Location",
            patch.location.as_deref(),
            existing.map(|e| e.location.as_str()),
        )?,
        mode: parse_mode(patch.mode.as_deref(), existing.map(|e| e.mode))?,
        audience: required_text(
            "audience",
            "Audience",
            patch.audience.as_deref(),
            existing.map(|e| e.audience.as_str()),
        )?,
        agenda: required_list(
            "agenda",
            "Agenda",
            patch.agenda.as_deref(),
            existing.map(|e| e.agenda.as_slice()),
            false,
        )?,
        organizer: required_text(
            "organizer",
            "Organizer",
            patch.organizer.as_deref(),
            existing.map(|e| e.organizer.as_str()),
        )?,
        tags: required_list(
            "tags",
            "Tags",
            patch.tags.as_deref(),
            existing.map(|e| e.tags.as_slice()),
            true,
        )?,
        title,
    };

    let changed = match existing {
        None => ChangedFields::all(),
        Some(event) => ChangedFields {
            title: fields.title != event.title,
            date: patch
                .date
                .as_deref()
                .is_some_and(|raw| raw != event.date.to_string()),
            time: patch
                .time
                .as_deref()
                .is_some_and(|raw| raw != event.time.to_string()),
        },
    };
    Ok((fields, changed))
}

/// Step 2: pick a slug unused by any other event.
///
/// Keeps the stored slug when the title is unchanged. Otherwise probes the
/// derived base, then `base-1`, `base-2`, and so on, starting from
/// `ctx.min_suffix`.
pub async fn assign_slug<R>(
    repo: &R,
    title: &str,
    changed: &ChangedFields,
    ctx: WriteContext<'_>,
) -> Result<(Slug, Option<u32>), Error>
where
    R: EventRepository + ?Sized,
{
    if let Some(existing) = ctx.existing.filter(|_| !changed.title) {
        return Ok((existing.slug.clone(), None));
    }

    let base = Slug::derive(title, ctx.now);
    let excluding = ctx.existing.map(|event| event.id);
    let mut suffix = ctx.min_suffix;
    loop {
        let candidate = base.with_suffix(suffix);
        let taken = repo
            .exists_by_slug_excluding(&candidate, excluding)
            .await
            .map_err(map_probe_error)?;
        if !taken {
            return Ok((candidate, Some(suffix)));
        }
        debug!(slug = %candidate, "slug taken, probing next suffix");
        suffix = suffix.checked_add(1).ok_or_else(|| {
            Error::conflict(format!("no free slug remains for base '{base}'"))
        })?;
    }
}

/// Step 3: canonicalize the date when it changed.
pub fn normalize_date(
    raw: Option<&str>,
    existing: Option<&Event>,
    changed: bool,
) -> Result<EventDate, Error> {
    match (existing, changed) {
        (Some(event), false) => Ok(event.date),
        _ => {
            let raw = raw.ok_or_else(|| field_error("date", "required", "Date is required"))?;
            if raw.trim().is_empty() {
                return Err(field_error("date", "required", "Date is required"));
            }
            EventDate::parse(raw)
                .map_err(|err| field_error("date", "invalid_format", err.to_string()))
        }
    }
}

/// Step 4: validate the time when it changed.
pub fn normalize_time(
    raw: Option<&str>,
    existing: Option<&Event>,
    changed: bool,
) -> Result<EventTime, Error> {
    match (existing, changed) {
        (Some(event), false) => Ok(event.time),
        _ => {
            let raw = raw.ok_or_else(|| field_error("time", "required", "Time is required"))?;
            if raw.trim().is_empty() {
                return Err(field_error("time", "required", "Time is required"));
            }
            EventTime::parse(raw)
                .map_err(|err| field_error("time", "invalid_format", err.to_string()))
        }
    }
}

fn required_text(
    field: &str,
    label: &str,
    patched: Option<&str>,
    stored: Option<&str>,
) -> Result<String, Error> {
    let value = patched.or(stored).map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(field_error(field, "required", format!("{label} is required")));
    }
    Ok(value.to_owned())
}

fn required_list(
    field: &str,
    label: &str,
    patched: Option<&[String]>,
    stored: Option<&[String]>,
    dedupe: bool,
) -> Result<Vec<String>, Error> {
    let Some(items) = patched.or(stored) else {
        return Err(field_error(field, "required", format!("{label} are required")));
    };
    let mut cleaned: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if item.is_empty() {
            return Err(field_error(
                field,
                "blank_item",
                format!("{label} must not contain blank items"),
            ));
        }
        if dedupe && cleaned.iter().any(|seen| seen == item) {
            continue;
        }
        cleaned.push(item.to_owned());
    }
    if cleaned.is_empty() {
        return Err(field_error(
            field,
            "empty",
            format!("{label} must contain at least one item"),
        ));
    }
    Ok(cleaned)
}

fn parse_mode(patched: Option<&str>, stored: Option<EventMode>) -> Result<EventMode, Error> {
    match (patched, stored) {
        (Some(raw), _) if raw.trim().is_empty() => {
            Err(field_error("mode", "required", "Mode is required"))
        }
        (Some(raw), _) => raw.parse().map_err(|err: UnknownEventMode| {
            field_error("mode", "invalid_value", capitalize(&err.to_string()))
        }),
        (None, Some(mode)) => Ok(mode),
        (None, None) => Err(field_error("mode", "required", "Mode is required")),
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

fn map_probe_error(error: EventRepositoryError) -> Error {
    match error {
        EventRepositoryError::Connection { message } => {
            error!(%message, "slug probe could not reach the event store");
            Error::service_unavailable("Event storage is unavailable")
        }
        other => {
            error!(error = %other, "slug probe failed");
            Error::internal("Event storage error")
        }
    }
}
