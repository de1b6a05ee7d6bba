//! Care teams section: the first care team organizer and its members.

use ccda_core::CareTeamRecord;

use super::parties::{author, participant, performer};
use super::{first_non_empty, statement_of, status_code, EffectiveTime};
use crate::codes::resolve_code;
use crate::locator::section_title;
use crate::xml::Element;

pub fn extract(sections: &[Element<'_>]) -> Option<CareTeamRecord> {
    let (section, team) = sections.iter().find_map(|section| {
        let entry = section.child("entry")?;
        let team = entry.find("organizer").unwrap_or_else(|| statement_of(entry));
        Some((*section, team))
    })?;
    if team.is("entry") {
        return None;
    }

    // Members are listed on the organizer itself and on each member act.
    let members = team
        .children_named("performer")
        .chain(
            team.children_named("component")
                .filter_map(|component| component.child("act"))
                .flat_map(|act| act.children_named("performer")),
        )
        .map(performer)
        .collect::<Vec<_>>();

    let code = resolve_code(team);
    let time = EffectiveTime::of(team);
    let record = CareTeamRecord {
        title: first_non_empty([
            code.display_name.clone(),
            section_title(section),
            code.code.clone(),
        ]),
        code,
        status_code: status_code(team),
        effective_time: time.value,
        effective_time_low: time.low,
        effective_time_high: time.high,
        members,
        participants: team.children_named("participant").map(participant).collect(),
        authors: team.children_named("author").map(author).collect(),
    };

    tracing::trace!(members = record.members.len(), "care team extracted");
    Some(record)
}
