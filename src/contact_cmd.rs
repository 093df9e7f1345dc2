//! Contact commands for the `ck` CLI.
//!
//! This is the input boundary: it collects flags into store payloads,
//! enforces required fields, and prints results. All writes go through
//! [`ContactStore`](crate::store::ContactStore).

use anyhow::{bail, Result};
use clap::Args;

use crate::config::Config;
use crate::export::ExportTarget;
use crate::models::{
    Contact, ContactGroups, ContactPatch, Journey, JourneyCategory, NewContact, NewInteraction,
    Preferences, PreferenceCategory, ProfessionalContext, RelationshipNotes, SignificantDates,
};
use crate::store::open_store;

/// Optional contact fields shared by `ck add` and `ck update`.
#[derive(Args, Debug, Clone, Default)]
pub struct ContactFields {
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub role: Option<String>,

    /// Company in the professional-context grouping.
    #[arg(long)]
    pub work_company: Option<String>,
    /// Role in the professional-context grouping.
    #[arg(long)]
    pub work_role: Option<String>,

    /// Dietary preference (repeatable).
    #[arg(long = "dietary")]
    pub dietary: Vec<String>,
    /// Cultural preference (repeatable).
    #[arg(long = "cultural")]
    pub cultural: Vec<String>,
    /// Communication preference (repeatable).
    #[arg(long = "communication")]
    pub communication: Vec<String>,
    /// General note or preference (repeatable).
    #[arg(long = "general")]
    pub general: Vec<String>,

    #[arg(long = "dream")]
    pub dreams: Vec<String>,
    #[arg(long = "value")]
    pub values: Vec<String>,
    #[arg(long = "interest")]
    pub interests: Vec<String>,
    #[arg(long = "aspiration")]
    pub aspirations: Vec<String>,

    #[arg(long)]
    pub birthday: Option<String>,
    #[arg(long)]
    pub anniversary: Option<String>,

    /// Where and how you met.
    #[arg(long)]
    pub meeting_context: Option<String>,
}

impl ContactFields {
    fn professional_context(&self) -> Option<ProfessionalContext> {
        if self.work_company.is_none() && self.work_role.is_none() {
            return None;
        }
        Some(ProfessionalContext {
            company: self.work_company.clone(),
            role: self.work_role.clone(),
        })
    }

    fn preferences(&self) -> Option<Preferences> {
        let prefs = Preferences {
            dietary: non_empty(&self.dietary),
            cultural: non_empty(&self.cultural),
            communication: non_empty(&self.communication),
            general: non_empty(&self.general),
        };
        (prefs != Preferences::default()).then_some(prefs)
    }

    fn journey(&self) -> Option<Journey> {
        let journey = Journey {
            dreams: non_empty(&self.dreams),
            values: non_empty(&self.values),
            interests: non_empty(&self.interests),
            aspirations: non_empty(&self.aspirations),
        };
        (journey != Journey::default()).then_some(journey)
    }

    fn significant_dates(&self) -> Option<SignificantDates> {
        if self.birthday.is_none() && self.anniversary.is_none() {
            return None;
        }
        Some(SignificantDates {
            birthday: self.birthday.clone(),
            anniversary: self.anniversary.clone(),
            custom_dates: None,
        })
    }

    fn relationship_notes(&self) -> Option<RelationshipNotes> {
        self.meeting_context.as_ref().map(|ctx| RelationshipNotes {
            meeting_context: Some(ctx.clone()),
            ..Default::default()
        })
    }

    pub fn into_new_contact(self, first_name: String, last_name: String, email: String) -> NewContact {
        let groups = ContactGroups {
            professional_context: self.professional_context(),
            journey: self.journey(),
            preferences: self.preferences(),
            significant_dates: self.significant_dates(),
            relationship_notes: self.relationship_notes(),
            ..Default::default()
        };
        NewContact {
            first_name,
            last_name,
            email,
            phone: self.phone,
            company: self.company,
            role: self.role,
            groups,
            updates: Vec::new(),
        }
    }

    pub fn into_patch(
        self,
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
    ) -> ContactPatch {
        ContactPatch {
            first_name,
            last_name,
            email,
            professional_context: self.professional_context(),
            journey: self.journey(),
            preferences: self.preferences(),
            significant_dates: self.significant_dates(),
            relationship_notes: self.relationship_notes(),
            phone: self.phone,
            company: self.company,
            role: self.role,
            ..Default::default()
        }
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

pub async fn run_add(config: &Config, data: NewContact) -> Result<()> {
    data.validate()?;
    let mut store = open_store(config).await?;
    let contact = store.add(data).await?;
    println!("Added contact {} ({})", contact.id, contact.full_name());
    Ok(())
}

pub async fn run_update(config: &Config, id: &str, patch: ContactPatch) -> Result<()> {
    if patch.is_empty() {
        bail!("nothing to update: pass at least one field");
    }
    patch.validate()?;
    let mut store = open_store(config).await?;
    match store.update(id, patch).await? {
        Some(contact) => {
            println!("Updated contact {} ({})", contact.id, contact.full_name());
            Ok(())
        }
        None => bail!("contact not found: {}", id),
    }
}

pub async fn run_delete(config: &Config, id: &str) -> Result<()> {
    let mut store = open_store(config).await?;
    if store.delete(id).await? {
        println!("Deleted contact {}", id);
        Ok(())
    } else {
        bail!("contact not found: {}", id)
    }
}

pub async fn run_list(config: &Config, search: Option<&str>) -> Result<()> {
    let store = open_store(config).await?;
    let contacts = store.search(search.unwrap_or(""));

    if contacts.is_empty() {
        println!("No contacts found");
        return Ok(());
    }

    println!("{:<36}  {:<28} {:<32} UPDATED", "ID", "NAME", "EMAIL");
    for c in contacts {
        println!(
            "{:<36}  {:<28} {:<32} {}",
            c.id,
            truncate(&c.full_name(), 28),
            truncate(&c.email, 32),
            c.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

pub async fn run_show(config: &Config, id: &str) -> Result<()> {
    let store = open_store(config).await?;
    match store.get(id) {
        Some(contact) => {
            print_contact(contact);
            Ok(())
        }
        None => bail!("contact not found: {}", id),
    }
}

pub async fn run_log(config: &Config, id: &str, interaction: NewInteraction) -> Result<()> {
    if interaction.content.trim().is_empty() {
        bail!("interaction content must not be empty");
    }
    let mut store = open_store(config).await?;
    match store.log_interaction(id, interaction).await? {
        Some(contact) => {
            println!(
                "Logged interaction for {} ({} total)",
                contact.full_name(),
                contact.updates.len()
            );
            Ok(())
        }
        None => bail!("contact not found: {}", id),
    }
}

pub async fn run_prefer(
    config: &Config,
    id: &str,
    category: PreferenceCategory,
    value: &str,
) -> Result<()> {
    let mut store = open_store(config).await?;
    match store.add_preference(id, category, value).await? {
        Some(contact) => {
            println!("Updated preferences for {}", contact.full_name());
            Ok(())
        }
        None => bail!("contact not found: {}", id),
    }
}

pub async fn run_journey(
    config: &Config,
    id: &str,
    category: JourneyCategory,
    value: &str,
) -> Result<()> {
    let mut store = open_store(config).await?;
    match store.add_journey_item(id, category, value).await? {
        Some(contact) => {
            println!("Updated journey for {}", contact.full_name());
            Ok(())
        }
        None => bail!("contact not found: {}", id),
    }
}

pub async fn run_export(config: &Config, target: ExportTarget) -> Result<()> {
    let store = open_store(config).await?;
    if let Some(path) = store.export(&target).await? {
        eprintln!("Exported {} contacts to {}", store.len(), path.display());
    }
    Ok(())
}

fn print_contact(c: &Contact) {
    println!("--- Contact ---");
    println!("id:          {}", c.id);
    println!("name:        {}", c.full_name());
    println!("email:       {}", c.email);
    if let Some(phone) = &c.phone {
        println!("phone:       {}", phone);
    }
    if let Some(company) = &c.company {
        println!("company:     {}", company);
    }
    if let Some(role) = &c.role {
        println!("role:        {}", role);
    }
    println!("created_at:  {}", c.created_at.to_rfc3339());
    println!("updated_at:  {}", c.updated_at.to_rfc3339());

    let groups = serde_json::to_value(&c.groups).unwrap_or_default();
    if groups.as_object().is_some_and(|o| !o.is_empty()) {
        println!();
        println!("--- Details ---");
        println!(
            "{}",
            serde_json::to_string_pretty(&groups).unwrap_or_default()
        );
    }

    println!();
    println!("--- Interactions ({}) ---", c.updates.len());
    for u in &c.updates {
        let sentiment = u.sentiment.map(|s| format!(" ({})", s)).unwrap_or_default();
        println!(
            "[{}] {}{}: {}",
            u.date.format("%Y-%m-%d %H:%M"),
            u.kind,
            sentiment,
            u.content
        );
        if let Some(follow_up) = &u.follow_up {
            println!("    follow-up: {}", follow_up);
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
