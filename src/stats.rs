//! Collection statistics.
//!
//! Provides a quick summary of what is stored: contact and interaction
//! counts, the mix of interaction types and sentiments, and how many
//! contacts have an open follow-up. Used by `ck stats`.

use std::fmt::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::models::{Contact, InteractionKind, Sentiment};
use crate::store;

#[derive(Debug, Clone, PartialEq)]
pub struct ContactStats {
    pub total_contacts: usize,
    pub total_interactions: usize,
    pub by_kind: Vec<(InteractionKind, usize)>,
    pub by_sentiment: Vec<(Sentiment, usize)>,
    /// Contacts whose most recent interaction carries a follow-up note.
    pub pending_follow_ups: usize,
    /// Name and timestamp of the most recently modified contact.
    pub last_updated: Option<(String, DateTime<Utc>)>,
}

pub fn summarize(contacts: &[Contact]) -> ContactStats {
    let interactions = contacts.iter().flat_map(|c| c.updates.iter());

    let mut by_kind: Vec<(InteractionKind, usize)> =
        InteractionKind::ALL.iter().map(|k| (*k, 0)).collect();
    let mut by_sentiment: Vec<(Sentiment, usize)> =
        Sentiment::ALL.iter().map(|s| (*s, 0)).collect();
    let mut total_interactions = 0;

    for interaction in interactions {
        total_interactions += 1;
        if let Some(slot) = by_kind.iter_mut().find(|(k, _)| *k == interaction.kind) {
            slot.1 += 1;
        }
        if let Some(sentiment) = interaction.sentiment {
            if let Some(slot) = by_sentiment.iter_mut().find(|(s, _)| *s == sentiment) {
                slot.1 += 1;
            }
        }
    }

    let pending_follow_ups = contacts
        .iter()
        .filter(|c| c.updates.first().is_some_and(|u| u.follow_up.is_some()))
        .count();

    let last_updated = contacts
        .iter()
        .max_by_key(|c| c.updated_at)
        .map(|c| (c.full_name(), c.updated_at));

    ContactStats {
        total_contacts: contacts.len(),
        total_interactions,
        by_kind,
        by_sentiment,
        pending_follow_ups,
        last_updated,
    }
}

/// Render the stats block printed by `ck stats`.
pub fn render_stats(stats: &ContactStats, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Contact Keeper — Stats");
    let _ = writeln!(out, "======================");
    let _ = writeln!(out);
    let _ = writeln!(out, "  Contacts:      {}", stats.total_contacts);
    let _ = writeln!(out, "  Interactions:  {}", stats.total_interactions);
    let _ = writeln!(out, "  Follow-ups:    {}", stats.pending_follow_ups);
    if let Some((name, at)) = &stats.last_updated {
        let _ = writeln!(
            out,
            "  Last updated:  {} ({})",
            name,
            format_ts_relative(*at, now)
        );
    }

    if stats.total_interactions > 0 {
        let _ = writeln!(out);
        let _ = writeln!(out, "  {:<18} {:>6}", "TYPE", "COUNT");
        let _ = writeln!(out, "  {}", "-".repeat(25));
        for (kind, count) in stats.by_kind.iter().filter(|(_, n)| *n > 0) {
            let _ = writeln!(out, "  {:<18} {:>6}", kind.as_str(), count);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "  {:<18} {:>6}", "SENTIMENT", "COUNT");
        let _ = writeln!(out, "  {}", "-".repeat(25));
        for (sentiment, count) in stats.by_sentiment.iter().filter(|(_, n)| *n > 0) {
            let _ = writeln!(out, "  {:<18} {:>6}", sentiment.as_str(), count);
        }
    }

    out
}

/// Run the stats command: load the collection and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let store = store::open_store(config).await?;
    let stats = summarize(store.contacts());
    print!("{}", render_stats(&stats, Utc::now()));
    Ok(())
}

/// Format a timestamp relative to `now` (e.g. "3 hours ago").
fn format_ts_relative(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = (now - ts).num_seconds();

    if delta < 0 {
        return format_ts_iso(ts);
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if delta < 86400 * 30 {
        let days = delta / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        format_ts_iso(ts)
    }
}

fn format_ts_iso(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Interaction, NewContact};
    use chrono::{Duration, TimeZone};

    fn interaction(kind: InteractionKind, follow_up: Option<&str>) -> Interaction {
        Interaction {
            date: Utc::now(),
            content: "x".into(),
            kind,
            follow_up: follow_up.map(str::to_string),
            sentiment: Some(Sentiment::Positive),
        }
    }

    #[test]
    fn test_summarize_counts() {
        let now = Utc::now();
        let mut a = NewContact::new("Ann", "Lee", "a@x.com").into_contact("1".into(), now);
        a.updates = vec![
            interaction(InteractionKind::Call, Some("send quote")),
            interaction(InteractionKind::Meeting, None),
        ];
        let mut b = NewContact::new("Bob", "Ray", "b@x.com")
            .into_contact("2".into(), now + Duration::seconds(5));
        b.updates = vec![
            interaction(InteractionKind::Note, None),
            interaction(InteractionKind::Call, Some("old follow-up")),
        ];

        let stats = summarize(&[a, b]);
        assert_eq!(stats.total_contacts, 2);
        assert_eq!(stats.total_interactions, 4);
        assert_eq!(stats.pending_follow_ups, 1);
        assert!(stats.by_kind.contains(&(InteractionKind::Call, 2)));
        assert!(stats.by_sentiment.contains(&(Sentiment::Positive, 4)));
        assert_eq!(stats.last_updated.unwrap().0, "Bob Ray");
    }

    #[test]
    fn test_summarize_empty() {
        let stats = summarize(&[]);
        assert_eq!(stats.total_contacts, 0);
        assert_eq!(stats.last_updated, None);
        let text = render_stats(&stats, Utc::now());
        assert!(text.contains("Contacts:      0"));
        assert!(!text.contains("TYPE"));
    }

    #[test]
    fn test_format_ts_relative() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(format_ts_relative(now, now), "just now");
        assert_eq!(
            format_ts_relative(now - Duration::minutes(1), now),
            "1 min ago"
        );
        assert_eq!(
            format_ts_relative(now - Duration::hours(3), now),
            "3 hours ago"
        );
        assert_eq!(
            format_ts_relative(now - Duration::days(40), now),
            "2025-01-29 12:00"
        );
    }
}
