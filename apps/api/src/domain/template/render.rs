use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::template::{SectionKind, Template, Theme};
use crate::domain::event::Event;
use crate::domain::partner::{Partner, PartnerTier, Prize};
use crate::domain::placeholders::substitute;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrizeItem {
    pub title: String,
    pub description: Option<String>,
    pub value: Option<Decimal>,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SponsorItem {
    pub name: String,
    pub website: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SponsorTierGroup {
    pub tier: PartnerTier,
    pub sponsors: Vec<SponsorItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSection {
    pub kind: SectionKind,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prizes: Vec<PrizeItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sponsors: Vec<SponsorTierGroup>,
}

/// Public landing page for an event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    pub event_slug: String,
    pub title: String,
    pub theme: Theme,
    pub sections: Vec<RenderedSection>,
}

fn event_vars(event: &Event) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    vars.insert("event.name".to_string(), event.name().to_string());
    vars.insert("event.slug".to_string(), event.slug().to_string());
    vars.insert("event.description".to_string(), event.description().to_string());
    vars.insert(
        "event.location".to_string(),
        event.location().unwrap_or("Online").to_string(),
    );
    vars.insert(
        "event.starts_at".to_string(),
        event.starts_at().format("%B %-d, %Y").to_string(),
    );
    vars.insert(
        "event.ends_at".to_string(),
        event.ends_at().format("%B %-d, %Y").to_string(),
    );
    vars.insert(
        "event.registration_deadline".to_string(),
        event
            .registration_deadline()
            .map(|d| d.format("%B %-d, %Y").to_string())
            .unwrap_or_default(),
    );
    vars.insert(
        "event.capacity".to_string(),
        event.capacity().map(|c| c.to_string()).unwrap_or_default(),
    );
    vars.insert("event.status".to_string(), event.status().to_string());
    vars
}

fn sponsor_groups(event: &Event, partners: &[Partner]) -> Vec<SponsorTierGroup> {
    let mut sponsors: Vec<&Partner> = partners.iter().filter(|p| p.sponsors(event.id())).collect();
    sponsors.sort_by(|a, b| a.tier().cmp(&b.tier()).then_with(|| a.name().cmp(b.name())));

    let mut groups: Vec<SponsorTierGroup> = Vec::new();
    for partner in sponsors {
        let item = SponsorItem {
            name: partner.name().to_string(),
            website: partner.website().map(str::to_string),
            logo_url: partner.logo_url().map(str::to_string),
        };
        match groups.last_mut() {
            Some(group) if group.tier == partner.tier() => group.sponsors.push(item),
            _ => groups.push(SponsorTierGroup {
                tier: partner.tier(),
                sponsors: vec![item],
            }),
        }
    }
    groups
}

/// Renders `template` for `event`
///
/// Hidden sections are dropped and `{{event.*}}` placeholders in titles and
/// bodies are substituted. The prizes section lists the event's prizes and
/// the sponsors section lists sponsoring partners grouped by tier.
pub fn render(
    template: &Template,
    event: &Event,
    prizes: &[Prize],
    partners: &[Partner],
) -> RenderedPage {
    let vars = event_vars(event);

    let sections = template
        .sections()
        .iter()
        .filter(|section| section.visible)
        .map(|section| {
            let prizes = match section.kind {
                SectionKind::Prizes => prizes
                    .iter()
                    .filter(|p| p.event_id() == event.id())
                    .map(|p| PrizeItem {
                        title: p.title().to_string(),
                        description: p.description().map(str::to_string),
                        value: p.value(),
                        quantity: p.quantity(),
                    })
                    .collect(),
                _ => Vec::new(),
            };
            let sponsors = match section.kind {
                SectionKind::Sponsors => sponsor_groups(event, partners),
                _ => Vec::new(),
            };

            RenderedSection {
                kind: section.kind,
                title: substitute(&section.title, &vars),
                body: substitute(&section.body, &vars),
                prizes,
                sponsors,
            }
        })
        .collect();

    RenderedPage {
        event_slug: event.slug().to_string(),
        title: event.name().to_string(),
        theme: template.theme().clone(),
        sections,
    }
}
