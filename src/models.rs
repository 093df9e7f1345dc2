//! Core data models used throughout Contact Keeper.
//!
//! [`Contact`] is the only persisted entity. Payloads that flow into the
//! store ([`NewContact`], [`ContactPatch`], [`NewInteraction`]) never carry
//! an id or audit timestamps; those are owned by the store.
//!
//! All types serialize with camelCase field names and omit absent optional
//! fields, so the persisted envelope reads the same as the original
//! browser-storage record.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted contact record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub groups: ContactGroups,
    /// Interaction history, most recent first.
    #[serde(default)]
    pub updates: Vec<Interaction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Trim list entries and drop blank ones in every list-valued field.
    pub fn normalize(&mut self) {
        self.groups.normalize();
    }

    /// Case-insensitive match of `term` against first name, last name, or email.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.first_name.to_lowercase().contains(&term)
            || self.last_name.to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term)
    }
}

/// The optional nested groupings of a contact.
///
/// Kept as a separate struct so that [`NewContact`] and [`Contact`] share
/// one definition; serde flattens it into the parent object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactGroups {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_context: Option<ProfessionalContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journey: Option<Journey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub significant_dates: Option<SignificantDates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_notes: Option<RelationshipNotes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_features: Option<PhysicalFeatures>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessories: Option<Accessories>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icp: Option<IdealCustomerProfile>,
}

impl ContactGroups {
    pub fn normalize(&mut self) {
        if let Some(journey) = self.journey.as_mut() {
            clean_list(&mut journey.dreams);
            clean_list(&mut journey.values);
            clean_list(&mut journey.interests);
            clean_list(&mut journey.aspirations);
        }
        if let Some(prefs) = self.preferences.as_mut() {
            clean_list(&mut prefs.dietary);
            clean_list(&mut prefs.cultural);
            clean_list(&mut prefs.communication);
            clean_list(&mut prefs.general);
        }
        if let Some(notes) = self.relationship_notes.as_mut() {
            clean_list(&mut notes.shared_experiences);
            clean_list(&mut notes.mutual_connections);
            clean_list(&mut notes.interests);
        }
        if let Some(physical) = self.physical_features.as_mut() {
            clean_list(&mut physical.distinguishing_features);
        }
        if let Some(accessories) = self.accessories.as_mut() {
            clean_list(&mut accessories.jewelry);
        }
        if let Some(icp) = self.icp.as_mut() {
            clean_list(&mut icp.pain_points);
            clean_list(&mut icp.goals);
        }
    }
}

fn clean_list(list: &mut Option<Vec<String>>) {
    if let Some(items) = list.as_mut() {
        items.retain(|s| !s.trim().is_empty());
        for item in items.iter_mut() {
            let trimmed = item.trim();
            if trimmed.len() != item.len() {
                *item = trimmed.to_string();
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Dreams, values, interests and aspirations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dreams: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspirations: Option<Vec<String>>,
}

impl Journey {
    pub fn list_mut(&mut self, category: JourneyCategory) -> &mut Vec<String> {
        let slot = match category {
            JourneyCategory::Dreams => &mut self.dreams,
            JourneyCategory::Values => &mut self.values,
            JourneyCategory::Interests => &mut self.interests,
            JourneyCategory::Aspirations => &mut self.aspirations,
        };
        slot.get_or_insert_with(Vec::new)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general: Option<Vec<String>>,
}

impl Preferences {
    pub fn list_mut(&mut self, category: PreferenceCategory) -> &mut Vec<String> {
        let slot = match category {
            PreferenceCategory::Dietary => &mut self.dietary,
            PreferenceCategory::Cultural => &mut self.cultural,
            PreferenceCategory::Communication => &mut self.communication,
            PreferenceCategory::General => &mut self.general,
        };
        slot.get_or_insert_with(Vec::new)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignificantDates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anniversary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_dates: Option<Vec<CustomDate>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomDate {
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipNotes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_experiences: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutual_connections: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eyes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinguishing_features: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessories {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glasses: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jewelry: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// Ideal-customer-profile attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdealCustomerProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_points: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<String>>,
}

/// A timestamped interaction attached to a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub date: DateTime<Utc>,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Meeting,
    Call,
    Email,
    Note,
    Other,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 5] = [
        InteractionKind::Meeting,
        InteractionKind::Call,
        InteractionKind::Email,
        InteractionKind::Note,
        InteractionKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Meeting => "meeting",
            InteractionKind::Call => "call",
            InteractionKind::Email => "email",
            InteractionKind::Note => "note",
            InteractionKind::Other => "other",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "meeting" => Ok(InteractionKind::Meeting),
            "call" => Ok(InteractionKind::Call),
            "email" => Ok(InteractionKind::Email),
            "note" => Ok(InteractionKind::Note),
            "other" => Ok(InteractionKind::Other),
            other => bail!(
                "Unknown interaction type: '{}'. Must be meeting, call, email, note, or other.",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sentiment {
    Positive,
    Neutral,
    NeedsAttention,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [
        Sentiment::Positive,
        Sentiment::Neutral,
        Sentiment::NeedsAttention,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::NeedsAttention => "needs-attention",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "needs-attention" | "needs_attention" => Ok(Sentiment::NeedsAttention),
            other => bail!(
                "Unknown sentiment: '{}'. Must be positive, neutral, or needs-attention.",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceCategory {
    Dietary,
    Cultural,
    Communication,
    General,
}

impl FromStr for PreferenceCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dietary" => Ok(PreferenceCategory::Dietary),
            "cultural" => Ok(PreferenceCategory::Cultural),
            "communication" => Ok(PreferenceCategory::Communication),
            "general" => Ok(PreferenceCategory::General),
            other => bail!(
                "Unknown preference category: '{}'. Must be dietary, cultural, communication, or general.",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JourneyCategory {
    Dreams,
    Values,
    Interests,
    Aspirations,
}

impl FromStr for JourneyCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dreams" | "dream" => Ok(JourneyCategory::Dreams),
            "values" | "value" => Ok(JourneyCategory::Values),
            "interests" | "interest" => Ok(JourneyCategory::Interests),
            "aspirations" | "aspiration" => Ok(JourneyCategory::Aspirations),
            other => bail!(
                "Unknown journey category: '{}'. Must be dreams, values, interests, or aspirations.",
                other
            ),
        }
    }
}

/// Payload for [`ContactStore::add`](crate::store::ContactStore::add).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub groups: ContactGroups,
    #[serde(default)]
    pub updates: Vec<Interaction>,
}

impl NewContact {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Required-field check applied at the input boundary.
    pub fn validate(&self) -> Result<()> {
        require_non_empty("first name", &self.first_name)?;
        require_non_empty("last name", &self.last_name)?;
        require_non_empty("email", &self.email)?;
        Ok(())
    }

    pub(crate) fn into_contact(self, id: String, now: DateTime<Utc>) -> Contact {
        let mut contact = Contact {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            role: self.role,
            groups: self.groups,
            updates: self.updates,
            created_at: now,
            updated_at: now,
        };
        contact.normalize();
        contact
    }
}

/// Partial update. Every field that is `Some` replaces the stored field;
/// nested groupings are replaced as a whole, never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_context: Option<ProfessionalContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journey: Option<Journey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub significant_dates: Option<SignificantDates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_notes: Option<RelationshipNotes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_features: Option<PhysicalFeatures>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessories: Option<Accessories>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icp: Option<IdealCustomerProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updates: Option<Vec<Interaction>>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        *self == ContactPatch::default()
    }

    /// Required fields may be replaced but not blanked.
    pub fn validate(&self) -> Result<()> {
        if let Some(v) = &self.first_name {
            require_non_empty("first name", v)?;
        }
        if let Some(v) = &self.last_name {
            require_non_empty("last name", v)?;
        }
        if let Some(v) = &self.email {
            require_non_empty("email", v)?;
        }
        Ok(())
    }

    pub(crate) fn apply_to(self, contact: &mut Contact) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }
        fn set_opt<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        set(&mut contact.first_name, self.first_name);
        set(&mut contact.last_name, self.last_name);
        set(&mut contact.email, self.email);
        set_opt(&mut contact.phone, self.phone);
        set_opt(&mut contact.company, self.company);
        set_opt(&mut contact.role, self.role);

        let groups = &mut contact.groups;
        set_opt(&mut groups.professional_context, self.professional_context);
        set_opt(&mut groups.journey, self.journey);
        set_opt(&mut groups.preferences, self.preferences);
        set_opt(&mut groups.significant_dates, self.significant_dates);
        set_opt(&mut groups.relationship_notes, self.relationship_notes);
        set_opt(&mut groups.physical_features, self.physical_features);
        set_opt(&mut groups.accessories, self.accessories);
        set_opt(&mut groups.icp, self.icp);

        set(&mut contact.updates, self.updates);
        contact.normalize();
    }
}

/// Payload for logging a new interaction against a contact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewInteraction {
    pub content: String,
    /// Defaults to [`InteractionKind::Note`].
    pub kind: Option<InteractionKind>,
    pub follow_up: Option<String>,
    /// Defaults to [`Sentiment::Neutral`].
    pub sentiment: Option<Sentiment>,
}

impl NewInteraction {
    pub fn note(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub(crate) fn into_interaction(self, date: DateTime<Utc>) -> Interaction {
        Interaction {
            date,
            content: self.content,
            kind: self.kind.unwrap_or(InteractionKind::Note),
            follow_up: self.follow_up.filter(|f| !f.trim().is_empty()),
            sentiment: Some(self.sentiment.unwrap_or(Sentiment::Neutral)),
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        bail!("{} must not be empty", field);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_contact() -> Contact {
        NewContact::new("Ann", "Lee", "a@x.com").into_contact("id-1".to_string(), Utc::now())
    }

    #[test]
    fn test_serializes_camel_case_and_omits_absent_fields() {
        let contact = sample_contact();
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["firstName"], "Ann");
        assert_eq!(json["lastName"], "Lee");
        assert!(json.get("phone").is_none());
        assert!(json.get("preferences").is_none());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["updates"], serde_json::json!([]));
    }

    #[test]
    fn test_interaction_wire_names() {
        let interaction = Interaction {
            date: Utc::now(),
            content: "Coffee".to_string(),
            kind: InteractionKind::Meeting,
            follow_up: Some("Send deck".to_string()),
            sentiment: Some(Sentiment::NeedsAttention),
        };
        let json = serde_json::to_value(&interaction).unwrap();
        assert_eq!(json["type"], "meeting");
        assert_eq!(json["followUp"], "Send deck");
        assert_eq!(json["sentiment"], "needs-attention");
    }

    #[test]
    fn test_deserializes_original_record_shape() {
        let raw = r#"{
            "id": "abc",
            "firstName": "Ann",
            "lastName": "Lee",
            "email": "a@x.com",
            "preferences": { "dietary": ["vegan"] },
            "updates": [{ "date": "2024-01-02T03:04:05Z", "content": "hi", "type": "call" }],
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;
        let contact: Contact = serde_json::from_str(raw).unwrap();
        let prefs = contact.groups.preferences.unwrap();
        assert_eq!(prefs.dietary, Some(vec!["vegan".to_string()]));
        assert_eq!(contact.updates[0].kind, InteractionKind::Call);
        assert_eq!(contact.updates[0].sentiment, None);
    }

    #[test]
    fn test_normalize_drops_blank_list_entries() {
        let mut contact = sample_contact();
        contact.groups.preferences = Some(Preferences {
            dietary: Some(vec!["  vegan ".into(), "".into(), "   ".into()]),
            ..Default::default()
        });
        contact.normalize();
        let prefs = contact.groups.preferences.unwrap();
        assert_eq!(prefs.dietary, Some(vec!["vegan".to_string()]));
    }

    #[test]
    fn test_validate_required_fields() {
        assert!(NewContact::new("Ann", "Lee", "a@x.com").validate().is_ok());
        assert!(NewContact::new("", "Lee", "a@x.com").validate().is_err());
        assert!(NewContact::new("Ann", " ", "a@x.com").validate().is_err());
        assert!(NewContact::new("Ann", "Lee", "").validate().is_err());

        let patch = ContactPatch {
            email: Some("".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_patch_replaces_nested_group_wholesale() {
        let mut contact = sample_contact();
        contact.groups.preferences = Some(Preferences {
            dietary: Some(vec!["vegan".into()]),
            cultural: Some(vec!["holiday-aware".into()]),
            ..Default::default()
        });
        let patch = ContactPatch {
            preferences: Some(Preferences {
                general: Some(vec!["morning calls".into()]),
                ..Default::default()
            }),
            role: Some("CTO".into()),
            ..Default::default()
        };
        patch.apply_to(&mut contact);

        let prefs = contact.groups.preferences.as_ref().unwrap();
        assert_eq!(prefs.dietary, None);
        assert_eq!(prefs.general, Some(vec!["morning calls".to_string()]));
        assert_eq!(contact.role.as_deref(), Some("CTO"));
        assert_eq!(contact.email, "a@x.com");
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Call".parse::<InteractionKind>().unwrap(), InteractionKind::Call);
        assert!("visit".parse::<InteractionKind>().is_err());
        assert_eq!(
            "needs-attention".parse::<Sentiment>().unwrap(),
            Sentiment::NeedsAttention
        );
        assert_eq!(
            "dietary".parse::<PreferenceCategory>().unwrap(),
            PreferenceCategory::Dietary
        );
        assert_eq!(
            "dream".parse::<JourneyCategory>().unwrap(),
            JourneyCategory::Dreams
        );
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let contact = sample_contact();
        assert!(contact.matches("ann"));
        assert!(contact.matches("LEE"));
        assert!(contact.matches("x.com"));
        assert!(!contact.matches("bob"));
    }

    #[test]
    fn test_new_interaction_defaults() {
        let interaction = NewInteraction::note("Called about renewal").into_interaction(Utc::now());
        assert_eq!(interaction.kind, InteractionKind::Note);
        assert_eq!(interaction.sentiment, Some(Sentiment::Neutral));
        assert_eq!(interaction.follow_up, None);
    }
}
