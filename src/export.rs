//! Export the contact collection as CSV.
//!
//! Each contact is flattened into an ordered list of `(column, value)`
//! pairs by walking the known [`Contact`] schema: nested groupings become
//! dotted columns (`preferences.dietary`), lists are joined with `"; "`,
//! and absent fields are left out. The header is the union of every
//! contact's columns in first-seen order; each row fills the columns its
//! contact lacks with an empty string.
//!
//! Every row value is wrapped in double quotes with embedded quotes
//! doubled. Rows are joined with `\n`. An empty collection renders as an
//! empty string.

use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use crate::models::{
    Accessories, Contact, CustomDate, IdealCustomerProfile, Interaction, Journey,
    PhysicalFeatures, Preferences, ProfessionalContext, RelationshipNotes, SignificantDates,
};

/// MIME type of the exported file.
pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8";

/// Separator used when a list field collapses into one cell.
pub const LIST_SEPARATOR: &str = "; ";

/// Where an export is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// Write `contacts_<timestamp>.csv` into this directory.
    Directory(PathBuf),
    /// Stream the CSV to stdout.
    Stdout,
}

/// One contact flattened to ordered `(column, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatRecord {
    fields: Vec<(String, String)>,
}

impl FlatRecord {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    fn scalar(&mut self, key: &str, value: Option<&str>) {
        if let Some(v) = value {
            self.push(key, v);
        }
    }

    fn group(&mut self, prefix: &'static str) -> GroupWriter<'_> {
        GroupWriter {
            record: self,
            prefix,
        }
    }
}

/// Writes columns under a fixed `prefix.` namespace.
struct GroupWriter<'a> {
    record: &'a mut FlatRecord,
    prefix: &'static str,
}

impl GroupWriter<'_> {
    fn scalar(&mut self, name: &str, value: Option<&str>) {
        if let Some(v) = value {
            self.record.push(format!("{}.{}", self.prefix, name), v);
        }
    }

    fn list(&mut self, name: &str, value: Option<&[String]>) {
        if let Some(items) = value {
            self.record
                .push(format!("{}.{}", self.prefix, name), items.join(LIST_SEPARATOR));
        }
    }

    fn custom_dates(&mut self, name: &str, value: Option<&[CustomDate]>) {
        if let Some(items) = value {
            let joined = items
                .iter()
                .map(|d| format!("{}: {}", d.date, d.description))
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR);
            self.record.push(format!("{}.{}", self.prefix, name), joined);
        }
    }
}

/// Flatten one contact in schema order.
pub fn flatten_contact(contact: &Contact) -> FlatRecord {
    let mut rec = FlatRecord::default();

    rec.push("id", contact.id.as_str());
    rec.push("firstName", contact.first_name.as_str());
    rec.push("lastName", contact.last_name.as_str());
    rec.push("email", contact.email.as_str());
    rec.scalar("phone", contact.phone.as_deref());
    rec.scalar("company", contact.company.as_deref());
    rec.scalar("role", contact.role.as_deref());

    let groups = &contact.groups;
    if let Some(g) = &groups.professional_context {
        flatten_professional(&mut rec, g);
    }
    if let Some(g) = &groups.journey {
        flatten_journey(&mut rec, g);
    }
    if let Some(g) = &groups.preferences {
        flatten_preferences(&mut rec, g);
    }
    if let Some(g) = &groups.significant_dates {
        flatten_significant_dates(&mut rec, g);
    }
    if let Some(g) = &groups.relationship_notes {
        flatten_relationship_notes(&mut rec, g);
    }
    if let Some(g) = &groups.physical_features {
        flatten_physical_features(&mut rec, g);
    }
    if let Some(g) = &groups.accessories {
        flatten_accessories(&mut rec, g);
    }
    if let Some(g) = &groups.icp {
        flatten_icp(&mut rec, g);
    }

    let updates = contact
        .updates
        .iter()
        .map(format_interaction)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR);
    rec.push("updates", updates);
    rec.push("createdAt", format_ts(contact.created_at));
    rec.push("updatedAt", format_ts(contact.updated_at));

    rec
}

fn flatten_professional(rec: &mut FlatRecord, g: &ProfessionalContext) {
    let mut w = rec.group("professionalContext");
    w.scalar("company", g.company.as_deref());
    w.scalar("role", g.role.as_deref());
}

fn flatten_journey(rec: &mut FlatRecord, g: &Journey) {
    let mut w = rec.group("journey");
    w.list("dreams", g.dreams.as_deref());
    w.list("values", g.values.as_deref());
    w.list("interests", g.interests.as_deref());
    w.list("aspirations", g.aspirations.as_deref());
}

fn flatten_preferences(rec: &mut FlatRecord, g: &Preferences) {
    let mut w = rec.group("preferences");
    w.list("dietary", g.dietary.as_deref());
    w.list("cultural", g.cultural.as_deref());
    w.list("communication", g.communication.as_deref());
    w.list("general", g.general.as_deref());
}

fn flatten_significant_dates(rec: &mut FlatRecord, g: &SignificantDates) {
    let mut w = rec.group("significantDates");
    w.scalar("birthday", g.birthday.as_deref());
    w.scalar("anniversary", g.anniversary.as_deref());
    w.custom_dates("customDates", g.custom_dates.as_deref());
}

fn flatten_relationship_notes(rec: &mut FlatRecord, g: &RelationshipNotes) {
    let mut w = rec.group("relationshipNotes");
    w.scalar("meetingContext", g.meeting_context.as_deref());
    w.list("sharedExperiences", g.shared_experiences.as_deref());
    w.list("mutualConnections", g.mutual_connections.as_deref());
    w.list("interests", g.interests.as_deref());
}

fn flatten_physical_features(rec: &mut FlatRecord, g: &PhysicalFeatures) {
    let mut w = rec.group("physicalFeatures");
    w.scalar("height", g.height.as_deref());
    w.scalar("hair", g.hair.as_deref());
    w.scalar("eyes", g.eyes.as_deref());
    w.list("distinguishingFeatures", g.distinguishing_features.as_deref());
}

fn flatten_accessories(rec: &mut FlatRecord, g: &Accessories) {
    let mut w = rec.group("accessories");
    w.scalar("glasses", g.glasses.as_deref());
    w.list("jewelry", g.jewelry.as_deref());
    w.scalar("style", g.style.as_deref());
}

fn flatten_icp(rec: &mut FlatRecord, g: &IdealCustomerProfile) {
    let mut w = rec.group("icp");
    w.scalar("industry", g.industry.as_deref());
    w.scalar("companySize", g.company_size.as_deref());
    w.scalar("budget", g.budget.as_deref());
    w.list("painPoints", g.pain_points.as_deref());
    w.list("goals", g.goals.as_deref());
}

/// `"<date> [<type>] <content>"`, plus `" (follow-up: ...)"` when set.
fn format_interaction(interaction: &Interaction) -> String {
    let mut out = format!(
        "{} [{}] {}",
        format_ts(interaction.date),
        interaction.kind,
        interaction.content
    );
    if let Some(follow_up) = &interaction.follow_up {
        out.push_str(&format!(" (follow-up: {})", follow_up));
    }
    out
}

fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Union of all columns across `records`, in first-seen order.
pub fn header(records: &[FlatRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for record in records {
        for key in record.keys() {
            if seen.insert(key) {
                columns.push(key.to_string());
            }
        }
    }
    columns
}

/// Wrap a value in double quotes, doubling any embedded quote.
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render the full CSV document for `contacts`, in collection order.
pub fn render_csv(contacts: &[Contact]) -> String {
    let records: Vec<FlatRecord> = contacts.iter().map(flatten_contact).collect();
    let columns = header(&records);
    if columns.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(columns.join(","));
    for record in &records {
        let row = columns
            .iter()
            .map(|column| quote_field(record.get(column).unwrap_or("")))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }
    lines.join("\n")
}

/// `contacts_<ISO-8601 basic UTC timestamp>.csv`, safe on every filesystem.
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("contacts_{}.csv", at.format("%Y%m%dT%H%M%S%.3fZ"))
}

/// Render and deliver the CSV. Returns the written path for
/// [`ExportTarget::Directory`], `None` for stdout.
pub async fn export_csv(contacts: &[Contact], target: &ExportTarget) -> Result<Option<PathBuf>> {
    let csv = render_csv(contacts);

    match target {
        ExportTarget::Directory(dir) => {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create export dir: {}", dir.display()))?;
            let path = dir.join(export_filename(Utc::now()));
            tokio::fs::write(&path, csv.as_bytes())
                .await
                .with_context(|| format!("Failed to write export file: {}", path.display()))?;
            info!(
                contacts = contacts.len(),
                path = %path.display(),
                content_type = CSV_CONTENT_TYPE,
                "contacts exported"
            );
            Ok(Some(path))
        }
        ExportTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(csv.as_bytes())?;
            if !csv.is_empty() {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
            info!(contacts = contacts.len(), "contacts exported to stdout");
            Ok(None)
        }
    }
}
